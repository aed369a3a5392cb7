//! Declarative resource adapters for the Silo package registry API.
//!
//! Silo exposes a REST API for managing package repositories and the
//! organizations that own them. This crate implements the provisioning side
//! of that API as declarative resource adapters: each adapter reads a
//! desired-state description, issues the API calls needed to converge the
//! remote side (polling where the API is eventually consistent), and writes
//! the results back into state.
//!
//! Two resource types are exposed:
//!
//! - `silo_repository_geo_ip_rules` - CIDR and country-code allow/deny lists
//!   attached to a repository.
//! - `silo_saml_group_sync` - SAML IdP-attribute-to-team mappings for an
//!   organization.
//!
//! # Example
//!
//! ```ignore
//! use silo_provider::{ApiConfig, ProviderContext, ResourceState, provider};
//!
//! let ctx = ProviderContext::new(&ApiConfig::new("my-api-key"))?;
//! let resources = provider::resources();
//! let geo = &resources["silo_repository_geo_ip_rules"];
//!
//! let mut state = ResourceState::new();
//! state.set("namespace", "acme");
//! state.set("repository", "widgets");
//! state.set("cidr_allow", serde_json::json!(["10.0.0.0/8"]));
//! state.set("cidr_deny", serde_json::json!([]));
//! state.set("country_code_allow", serde_json::json!([]));
//! state.set("country_code_deny", serde_json::json!([]));
//!
//! geo.create(&ctx, &mut state).await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;
pub mod waiter;

#[cfg(test)]
mod tests;

pub use config::ApiConfig;
pub use error::ProviderError;
pub use provider::ProviderContext;
pub use resources::Resource;
pub use state::ResourceState;
