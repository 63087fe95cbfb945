//! Routing provider configuration snapshot

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::ProviderId;

/// Per-provider configuration details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDetail {
    /// Whether credentials are present (always true for credential-free providers)
    pub configured: bool,
    /// Whether the provider needs credentials at all
    pub requires_key: bool,
}

/// Status of every routing provider
///
/// Carries booleans and identities only; credential values never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Providers whose credentials are present, in enumeration order
    pub configured_providers: Vec<ProviderId>,
    /// Preferred provider from configuration
    pub preferred_provider: ProviderId,
    /// Resolved fallback chain
    pub fallback_chain: Vec<ProviderId>,
    /// Details keyed by provider
    pub provider_details: BTreeMap<ProviderId, ProviderDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_provider_keys_by_name() {
        let mut provider_details = BTreeMap::new();
        provider_details.insert(
            ProviderId::Osrm,
            ProviderDetail {
                configured: true,
                requires_key: false,
            },
        );
        let status = ProviderStatus {
            configured_providers: vec![ProviderId::Osrm],
            preferred_provider: ProviderId::Osrm,
            fallback_chain: vec![ProviderId::Osrm],
            provider_details,
        };

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["preferred_provider"], "osrm");
        assert_eq!(json["provider_details"]["osrm"]["requires_key"], false);
    }
}
