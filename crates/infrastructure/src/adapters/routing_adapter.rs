//! Routing adapter - Implements RoutingPort using integration_routing

use application::ports::{RouteQuery, RoutingPort};
use async_trait::async_trait;
use domain::{ProviderStatus, RouteResult};
use integration_routing::{RouterManager, RoutingConfig, RoutingError};
use tracing::{debug, instrument};

/// Adapter driving the remote routing providers in fallback order
#[derive(Debug)]
pub struct RoutingAdapter {
    manager: RouterManager,
}

impl RoutingAdapter {
    /// Wrap an existing manager
    #[must_use]
    pub const fn new(manager: RouterManager) -> Self {
        Self { manager }
    }

    /// Build the manager from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a provider client cannot be created.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, RoutingError> {
        Ok(Self::new(RouterManager::new(config)?))
    }
}

#[async_trait]
impl RoutingPort for RoutingAdapter {
    #[instrument(skip(self, query), fields(mode = %query.mode))]
    async fn route(&self, query: &RouteQuery) -> Option<RouteResult> {
        debug!(preferred = ?query.preferred_provider, "Routing request");
        self.manager
            .route(
                query.origin,
                query.destination,
                query.mode,
                query.preferred_provider,
            )
            .await
    }

    fn provider_status(&self) -> ProviderStatus {
        self.manager.status()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use domain::{GeoLocation, ProviderId, TravelMode};
    use integration_routing::ProviderClient;

    use super::*;

    #[derive(Debug)]
    struct FixedProvider {
        id: ProviderId,
        succeed: bool,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn new(id: ProviderId, succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                id,
                succeed,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ProviderClient for FixedProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn route(
            &self,
            _origin: GeoLocation,
            _destination: GeoLocation,
            _mode: TravelMode,
        ) -> Result<RouteResult, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(RouteResult::new(self.id, "abc".to_string(), 1000.0, 120.0, Vec::new()))
            } else {
                Err(RoutingError::NoRoute("no path".to_string()))
            }
        }
    }

    fn query() -> RouteQuery {
        RouteQuery::new(
            GeoLocation::new(12.9166, 77.6101).unwrap(),
            GeoLocation::bangalore_center(),
            TravelMode::Car,
        )
    }

    #[tokio::test]
    async fn forwards_query_to_manager() {
        let mapbox = FixedProvider::new(ProviderId::Mapbox, false);
        let osrm = FixedProvider::new(ProviderId::Osrm, true);
        let manager = RouterManager::with_providers(
            ProviderId::Mapbox,
            [
                mapbox.clone() as Arc<dyn ProviderClient>,
                osrm.clone() as Arc<dyn ProviderClient>,
            ],
        );
        let adapter = RoutingAdapter::new(manager);

        let route = adapter.route(&query()).await.unwrap();
        assert_eq!(route.provider_used, ProviderId::Osrm);
        assert_eq!(mapbox.calls.load(Ordering::SeqCst), 1);
        assert_eq!(osrm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_chain_returns_none() {
        let osrm = FixedProvider::new(ProviderId::Osrm, false);
        let manager =
            RouterManager::with_providers(ProviderId::Osrm, [osrm as Arc<dyn ProviderClient>]);
        let adapter = RoutingAdapter::new(manager);

        assert!(adapter.route(&query()).await.is_none());
    }

    #[test]
    fn status_from_unconfigured_config() {
        let adapter = RoutingAdapter::from_config(&RoutingConfig::for_testing()).unwrap();
        let status = adapter.provider_status();
        assert_eq!(status.fallback_chain, vec![ProviderId::Osrm]);
        assert_eq!(status.configured_providers, vec![ProviderId::Osrm]);
    }
}
