//! OAuth access token cache
//!
//! Holds one bearer token and the instant it must be refreshed. The lock is
//! held across a refresh so concurrent callers wait for a single token request.

use std::future::Future;
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::RoutingError;

/// Lifetime assumed when the token endpoint omits `expires_in`
pub(crate) const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Refresh this long before the token actually expires
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

/// A token as returned by the token endpoint
#[derive(Debug)]
pub(crate) struct IssuedToken {
    pub token: SecretString,
    pub expires_in: Duration,
}

#[derive(Debug)]
struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Single-flight token cache
#[derive(Debug)]
pub(crate) struct TokenCache {
    state: Mutex<Option<CachedToken>>,
    skew: Duration,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            skew: EXPIRY_SKEW,
        }
    }

    /// Return the cached token, or obtain a new one through `refresh`
    ///
    /// # Errors
    ///
    /// Propagates the refresh error; the cache stays empty in that case.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<SecretString, RoutingError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<IssuedToken, RoutingError>>,
    {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.as_ref()
            && Instant::now() < cached.refresh_at
        {
            return Ok(cached.token.clone());
        }

        debug!("Refreshing access token");
        let issued = refresh().await?;
        let refresh_at = Instant::now() + issued.expires_in.saturating_sub(self.skew);
        *state = Some(CachedToken {
            token: issued.token.clone(),
            refresh_at,
        });

        Ok(issued.token)
    }

    /// Drop the cached token (e.g. after the provider rejected it)
    pub async fn invalidate(&self) {
        self.state.lock().await.take();
    }
}
