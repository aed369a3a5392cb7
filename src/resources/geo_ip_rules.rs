//! Geo-IP access rules for a repository.
//!
//! Rules are keyed by `{namespace, repository}` and managed as one unit: the
//! update endpoint replaces all four allow/deny lists in a single call. The
//! API has no delete endpoint for this entity, so delete submits an all-empty
//! rule set instead.

use async_trait::async_trait;
use tracing::debug;

use super::Resource;
use crate::{
    api::{
        ApiError,
        types::{AllowDenyList, GeoIpRules},
    },
    error::ProviderError,
    provider::ProviderContext,
    schema::{AttrSchema, ResourceSchema},
    state::ResourceState,
};

const NAMESPACE: &str = "namespace";
const REPOSITORY: &str = "repository";
const CIDR_ALLOW: &str = "cidr_allow";
const CIDR_DENY: &str = "cidr_deny";
const COUNTRY_CODE_ALLOW: &str = "country_code_allow";
const COUNTRY_CODE_DENY: &str = "country_code_deny";

static SCHEMA: ResourceSchema = ResourceSchema {
    name: "silo_repository_geo_ip_rules",
    attrs: &[
        (CIDR_ALLOW, AttrSchema::string_set().required()),
        (CIDR_DENY, AttrSchema::string_set().required()),
        (COUNTRY_CODE_ALLOW, AttrSchema::string_set().required()),
        (COUNTRY_CODE_DENY, AttrSchema::string_set().required()),
        (NAMESPACE, AttrSchema::string().required().force_new()),
        (REPOSITORY, AttrSchema::string().required().force_new()),
    ],
};

/// Adapter for the `silo_repository_geo_ip_rules` resource.
pub struct GeoIpRulesResource;

impl GeoIpRulesResource {
    fn rules_from_state(state: &ResourceState) -> Result<GeoIpRules, ProviderError> {
        Ok(GeoIpRules {
            cidr: AllowDenyList {
                allow: state.string_set(CIDR_ALLOW)?,
                deny: state.string_set(CIDR_DENY)?,
            },
            country_code: AllowDenyList {
                allow: state.string_set(COUNTRY_CODE_ALLOW)?,
                deny: state.string_set(COUNTRY_CODE_DENY)?,
            },
        })
    }
}

#[async_trait]
impl Resource for GeoIpRulesResource {
    fn schema(&self) -> &'static ResourceSchema {
        &SCHEMA
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        SCHEMA.validate(state)?;
        let namespace = state.required_str(NAMESPACE)?.to_string();
        let repository = state.required_str(REPOSITORY)?.to_string();

        // Rules only take effect once filtering is enabled on the repository.
        ctx.client
            .enable_geo_ip_filtering(&namespace, &repository)
            .await?;

        // Create is otherwise identical to update for this resource.
        self.update(ctx, state).await
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        let namespace = state.required_str(NAMESPACE)?.to_string();
        let repository = state.required_str(REPOSITORY)?.to_string();

        let rules = match ctx.client.read_geo_ip_rules(&namespace, &repository).await {
            Ok(rules) => rules,
            Err(ApiError::NotFound) => {
                debug!(%namespace, %repository, "Geo-IP rules are gone, clearing state");
                state.clear_id();
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };

        state.set_strings(CIDR_ALLOW, &rules.cidr.allow);
        state.set_strings(CIDR_DENY, &rules.cidr.deny);
        state.set_strings(COUNTRY_CODE_ALLOW, &rules.country_code.allow);
        state.set_strings(COUNTRY_CODE_DENY, &rules.country_code.deny);

        // The read endpoint does not return the repository coordinates; echo
        // back the declared values. ForceNew on both ensures a change
        // replaces the resource.
        state.set(NAMESPACE, namespace);
        state.set(REPOSITORY, repository);

        Ok(())
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        SCHEMA.validate(state)?;
        let namespace = state.required_str(NAMESPACE)?.to_string();
        let repository = state.required_str(REPOSITORY)?.to_string();
        let rules = Self::rules_from_state(state)?;

        ctx.client
            .update_geo_ip_rules(&namespace, &repository, &rules)
            .await?;

        state.set_id(format!("{namespace}_{repository}_geo_ip_rules"));

        self.read(ctx, state).await
    }

    async fn delete(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        let namespace = state.required_str(NAMESPACE)?.to_string();
        let repository = state.required_str(REPOSITORY)?.to_string();

        // No delete endpoint exists; an all-empty rule set is the off state.
        // Geo-IP filtering itself stays enabled on the repository.
        ctx.client
            .update_geo_ip_rules(&namespace, &repository, &GeoIpRules::default())
            .await?;

        state.clear_id();
        Ok(())
    }
}
