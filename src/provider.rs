//! Provider context and resource registry.

use std::collections::HashMap;

use crate::{
    api::SiloClient,
    config::ApiConfig,
    error::ProviderError,
    resources::{GeoIpRulesResource, Resource, SamlGroupSyncResource},
};

/// Shared dependencies handed to every adapter operation.
///
/// Holds the API client; adapters keep no state of their own, so one context
/// can serve any number of resource instances.
#[derive(Clone)]
pub struct ProviderContext {
    pub client: SiloClient,
}

impl ProviderContext {
    /// Build a context from explicit configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self {
            client: SiloClient::new(config)?,
        })
    }

    /// Build a context from `SILO_API_KEY` / `SILO_API_HOST`.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(&ApiConfig::from_env()?)
    }
}

/// All resource types exposed by this provider, keyed by type name.
pub fn resources() -> HashMap<&'static str, Box<dyn Resource>> {
    let entries: Vec<Box<dyn Resource>> =
        vec![Box::new(GeoIpRulesResource), Box::new(SamlGroupSyncResource)];

    entries
        .into_iter()
        .map(|resource| (resource.schema().name, resource))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_all_resource_types() {
        let registry = resources();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains_key("silo_repository_geo_ip_rules"));
        assert!(registry.contains_key("silo_saml_group_sync"));
    }

    #[test]
    fn test_context_rejects_invalid_host() {
        let config = ApiConfig::new("k").with_host("not a url");
        assert!(ProviderContext::new(&config).is_err());
    }
}
