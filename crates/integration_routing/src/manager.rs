//! Ordered provider fallback

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use domain::{GeoLocation, ProviderDetail, ProviderId, ProviderStatus, RouteResult, TravelMode};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::{RoutingConfig, build_fallback_chain},
    error::RoutingError,
    google::GoogleMapsClient,
    mapbox::MapboxClient,
    mapmyindia::MapMyIndiaClient,
    osrm::OsrmClient,
    provider::ProviderClient,
};

/// Drives routing providers in fallback order
///
/// Providers are tried strictly one after another; the first success wins.
/// Dropping the future returned by [`RouterManager::route`] cancels the
/// in-flight call and skips the remaining providers.
pub struct RouterManager {
    providers: BTreeMap<ProviderId, Arc<dyn ProviderClient>>,
    preferred: ProviderId,
    fallback_chain: Vec<ProviderId>,
}

impl fmt::Debug for RouterManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterManager")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("preferred", &self.preferred)
            .field("fallback_chain", &self.fallback_chain)
            .finish()
    }
}

impl RouterManager {
    /// Build a manager with one client per provider from the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a provider's HTTP client cannot be created.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let providers: Vec<Arc<dyn ProviderClient>> = vec![
            Arc::new(MapboxClient::new(config)?),
            Arc::new(GoogleMapsClient::new(config)?),
            Arc::new(MapMyIndiaClient::new(config)?),
            Arc::new(OsrmClient::new(config)?),
        ];

        config.log_status();
        let manager = Self::with_providers(config.preferred_provider, providers);
        info!(chain = ?manager.fallback_chain, "Routing fallback chain ready");
        Ok(manager)
    }

    /// Build a manager from explicit provider clients
    ///
    /// Usability is taken from each client's [`ProviderClient::is_configured`].
    /// Providers without a client count as unusable, except the
    /// credential-free provider, which always closes the chain.
    #[must_use]
    pub fn with_providers(
        preferred: ProviderId,
        providers: impl IntoIterator<Item = Arc<dyn ProviderClient>>,
    ) -> Self {
        let providers: BTreeMap<_, _> = providers.into_iter().map(|p| (p.id(), p)).collect();
        let fallback_chain = build_fallback_chain(preferred, |id| {
            providers.get(&id).is_some_and(|p| p.is_configured())
        });

        Self {
            providers,
            preferred,
            fallback_chain,
        }
    }

    /// The precomputed fallback chain
    #[must_use]
    pub fn fallback_chain(&self) -> &[ProviderId] {
        &self.fallback_chain
    }

    fn is_usable(&self, id: ProviderId) -> bool {
        self.fallback_chain.contains(&id)
    }

    /// Provider order for one request
    ///
    /// A usable override goes first, followed by the rest of the chain.
    #[must_use]
    pub fn provider_order(&self, preferred: Option<ProviderId>) -> Vec<ProviderId> {
        match preferred {
            Some(p) if self.is_usable(p) => std::iter::once(p)
                .chain(self.fallback_chain.iter().copied().filter(|id| *id != p))
                .collect(),
            _ => self.fallback_chain.clone(),
        }
    }

    /// Route through the providers in fallback order
    ///
    /// Returns `None` when every provider failed or was unconfigured.
    #[instrument(skip(self))]
    pub async fn route(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        mode: TravelMode,
        preferred: Option<ProviderId>,
    ) -> Option<RouteResult> {
        let order = self.provider_order(preferred);

        for id in &order {
            let Some(provider) = self.providers.get(id) else {
                debug!(provider = %id, "No client registered, skipping");
                continue;
            };

            match provider.route(origin, destination, mode).await {
                Ok(route) => {
                    info!(provider = %id, "Route served");
                    return Some(route.stamped(*id));
                },
                Err(e) if e.is_unconfigured() => {
                    debug!(provider = %id, "Provider not configured, skipping");
                },
                Err(e) => {
                    warn!(provider = %id, error = %e, "Provider failed, trying next");
                    if !e.should_fallback() {
                        break;
                    }
                },
            }
        }

        error!(tried = ?order, "All routing providers failed");
        None
    }

    /// Configuration status of every provider, without credential values
    #[must_use]
    pub fn status(&self) -> ProviderStatus {
        let provider_details = ProviderId::ALL
            .into_iter()
            .map(|id| {
                (
                    id,
                    ProviderDetail {
                        configured: self.is_usable(id),
                        requires_key: id.requires_credentials(),
                    },
                )
            })
            .collect();

        ProviderStatus {
            configured_providers: ProviderId::ALL
                .into_iter()
                .filter(|id| self.is_usable(*id))
                .collect(),
            preferred_provider: self.preferred,
            fallback_chain: self.fallback_chain.clone(),
            provider_details,
        }
    }
}
