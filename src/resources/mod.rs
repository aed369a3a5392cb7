//! Resource adapters exposed by the provider.
//!
//! Each adapter translates declared state into Silo API calls and maps the
//! responses back. Operations take the shared provider context plus the
//! mutable state object supplied by the invoking framework; they return
//! `Ok(())` once local state reflects the remote side.

mod geo_ip_rules;
mod saml_group_sync;

use async_trait::async_trait;
pub use geo_ip_rules::GeoIpRulesResource;
pub use saml_group_sync::SamlGroupSyncResource;

use crate::{
    error::ProviderError, provider::ProviderContext, schema::ResourceSchema, state::ResourceState,
};

/// CRUD entry points for one resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Attribute schema for this resource type.
    fn schema(&self) -> &'static ResourceSchema;

    /// Create the remote resource from the declared state.
    async fn create(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError>;

    /// Refresh the declared state from the remote resource.
    ///
    /// An absent remote resource clears the identity and is not an error.
    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError>;

    /// Reconcile the remote resource with changed declared state.
    async fn update(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError>;

    /// Remove the remote resource.
    async fn delete(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError>;

    /// Seed state from an externally supplied import identifier.
    async fn import(
        &self,
        _ctx: &ProviderContext,
        _state: &mut ResourceState,
        _id: &str,
    ) -> Result<(), ProviderError> {
        Err(ProviderError::ImportUnsupported(self.schema().name))
    }
}
