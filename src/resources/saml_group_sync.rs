//! SAML group-sync mappings for an organization.
//!
//! A mapping ties an IdP attribute to a team/role assignment. The API
//! assigns each mapping an opaque slug and is eventually consistent: a
//! freshly created mapping can take a while to show up in list responses,
//! and a deleted one to drop out, so create and delete both poll the list
//! endpoint before returning.

use async_trait::async_trait;
use tracing::debug;
use validator::Validate;

use super::Resource;
use crate::{
    api::{
        ApiError, SiloClient,
        types::{GroupSyncEntry, GroupSyncRequest, SyncRole},
    },
    error::ProviderError,
    provider::ProviderContext,
    schema::{AttrSchema, ResourceSchema},
    state::ResourceState,
    waiter::{Poll, WaitConfig, wait_until},
};

const ORGANIZATION: &str = "organization";
const IDP_KEY: &str = "idp_key";
const IDP_VALUE: &str = "idp_value";
const ROLE: &str = "role";
const TEAM: &str = "team";
const SLUG_PERM: &str = "slug_perm";

const DEFAULT_ROLE: &str = "Member";

/// Maximum page size accepted by the list endpoint.
const LIST_PAGE_SIZE: u32 = 500;

static SCHEMA: ResourceSchema = ResourceSchema {
    name: "silo_saml_group_sync",
    attrs: &[
        (ORGANIZATION, AttrSchema::string().required().force_new()),
        (IDP_KEY, AttrSchema::string().required()),
        (IDP_VALUE, AttrSchema::string().required()),
        (
            ROLE,
            AttrSchema::string()
                .with_default(DEFAULT_ROLE)
                .one_of(&["Member", "Manager"]),
        ),
        (TEAM, AttrSchema::string().required()),
        (SLUG_PERM, AttrSchema::string().computed()),
    ],
};

/// Adapter for the `silo_saml_group_sync` resource.
pub struct SamlGroupSyncResource;

/// Page through the list endpoint until a short page signals the end.
async fn list_all_mappings(
    client: &SiloClient,
    organization: &str,
) -> Result<Vec<GroupSyncEntry>, ApiError> {
    let mut entries = Vec::new();
    let mut page = 1;

    loop {
        let batch = client
            .list_saml_mappings(organization, page, LIST_PAGE_SIZE)
            .await?;
        let last = (batch.len() as u32) < LIST_PAGE_SIZE;
        entries.extend(batch);
        if last {
            return Ok(entries);
        }
        page += 1;
    }
}

fn request_from_state(state: &ResourceState) -> Result<GroupSyncRequest, ProviderError> {
    let role_name = state.optional_str(ROLE, DEFAULT_ROLE);
    let role = SyncRole::parse(role_name).ok_or_else(|| ProviderError::InvalidAttribute {
        key: ROLE,
        reason: format!("unknown role `{role_name}`"),
    })?;

    let request = GroupSyncRequest {
        idp_key: state.required_str(IDP_KEY)?.to_string(),
        idp_value: state.required_str(IDP_VALUE)?.to_string(),
        role,
        team: state.required_str(TEAM)?.to_string(),
        organization: state.required_str(ORGANIZATION)?.to_string(),
    };
    request.validate()?;

    Ok(request)
}

#[async_trait]
impl Resource for SamlGroupSyncResource {
    fn schema(&self) -> &'static ResourceSchema {
        &SCHEMA
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        SCHEMA.validate(state)?;
        let organization = state.required_str(ORGANIZATION)?.to_string();
        let request = request_from_state(state)?;

        let created = ctx.client.create_saml_mapping(&organization, &request).await?;
        state.set_id(created.slug_perm.clone());

        // Creation is asynchronous; the org's list endpoint keeps returning
        // 404 until the mapping has been processed. A 422 here means the
        // target team does not exist and no amount of waiting will fix it.
        let resource = format!("SAML group sync ({})", created.slug_perm);
        wait_until(WaitConfig::creation(), &resource, "created", || {
            let client = ctx.client.clone();
            let organization = organization.clone();
            async move {
                match client
                    .list_saml_mappings(&organization, 1, LIST_PAGE_SIZE)
                    .await
                {
                    Ok(_) => Poll::Ready,
                    Err(ApiError::NotFound) => Poll::Pending,
                    Err(ApiError::Unprocessable(detail)) => Poll::Fatal(
                        ApiError::Unprocessable(format!("team does not exist: {detail}")).into(),
                    ),
                    Err(error) => Poll::Fatal(error.into()),
                }
            }
        })
        .await?;

        self.read(ctx, state).await
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        let organization = state.required_str(ORGANIZATION)?.to_string();
        let Some(slug_perm) = state.id().map(str::to_string) else {
            return Ok(());
        };

        let entries = match list_all_mappings(&ctx.client, &organization).await {
            Ok(entries) => entries,
            Err(ApiError::NotFound) => {
                state.clear_id();
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };

        let Some(entry) = entries.into_iter().find(|entry| entry.slug_perm == slug_perm) else {
            debug!(%organization, %slug_perm, "SAML group sync mapping is gone, clearing state");
            state.clear_id();
            return Ok(());
        };

        state.set(IDP_KEY, entry.idp_key);
        state.set(IDP_VALUE, entry.idp_value);
        state.set(ROLE, entry.role.as_str());
        state.set(TEAM, entry.team);
        state.set(SLUG_PERM, entry.slug_perm);

        // The list endpoint omits the owning organization; echo back the
        // declared value.
        state.set(ORGANIZATION, organization);

        Ok(())
    }

    /// The API has no update endpoint for mappings; the mapping is replaced
    /// by recreating it. Not atomic: a create failure after the delete
    /// leaves the mapping gone until the next apply.
    async fn update(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        self.delete(ctx, state).await?;
        self.create(ctx, state).await
    }

    async fn delete(
        &self,
        ctx: &ProviderContext,
        state: &mut ResourceState,
    ) -> Result<(), ProviderError> {
        let organization = state.required_str(ORGANIZATION)?.to_string();
        let Some(slug_perm) = state.id().map(str::to_string) else {
            return Ok(());
        };

        ctx.client
            .delete_saml_mapping(&organization, &slug_perm)
            .await?;

        // Deletion is asynchronous as well; wait for the row to drop out of
        // list responses. A 404 for the whole organization counts as gone.
        let resource = format!("SAML group sync ({slug_perm})");
        wait_until(WaitConfig::deletion(), &resource, "deleted", || {
            let client = ctx.client.clone();
            let organization = organization.clone();
            let slug_perm = slug_perm.clone();
            async move {
                match list_all_mappings(&client, &organization).await {
                    Ok(entries) if entries.iter().any(|e| e.slug_perm == slug_perm) => {
                        Poll::Pending
                    }
                    Ok(_) | Err(ApiError::NotFound) => Poll::Ready,
                    Err(error) => Poll::Fatal(error.into()),
                }
            }
        })
        .await?;

        state.clear_id();
        Ok(())
    }

    async fn import(
        &self,
        _ctx: &ProviderContext,
        state: &mut ResourceState,
        id: &str,
    ) -> Result<(), ProviderError> {
        let parts: Vec<&str> = id.split('.').collect();
        let [organization, slug_perm] = parts.as_slice() else {
            return Err(ProviderError::InvalidImportId(id.to_string()));
        };

        state.set(ORGANIZATION, *organization);
        state.set_id(*slug_perm);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::ApiConfig;

    fn test_context() -> ProviderContext {
        ProviderContext::new(&ApiConfig::new("test-key")).unwrap()
    }

    #[tokio::test]
    async fn test_import_splits_composite_id() {
        let ctx = test_context();
        let mut state = ResourceState::new();

        SamlGroupSyncResource
            .import(&ctx, &mut state, "org1.abc123")
            .await
            .unwrap();

        assert_eq!(state.get(ORGANIZATION).and_then(|v| v.as_str()), Some("org1"));
        assert_eq!(state.id(), Some("abc123"));
    }

    #[rstest]
    #[case::no_separator("org1")]
    #[case::too_many_parts("org1.abc.extra")]
    #[tokio::test]
    async fn test_import_rejects_malformed_ids(#[case] id: &str) {
        let ctx = test_context();
        let mut state = ResourceState::new();

        let result = SamlGroupSyncResource.import(&ctx, &mut state, id).await;
        assert!(matches!(result, Err(ProviderError::InvalidImportId(_))));
        assert_eq!(state.id(), None);
    }

    #[test]
    fn test_request_from_state_defaults_role_to_member() {
        let mut state = ResourceState::new();
        state.set(ORGANIZATION, "acme");
        state.set(IDP_KEY, "department");
        state.set(IDP_VALUE, "engineering");
        state.set(TEAM, "platform");

        let request = request_from_state(&state).unwrap();
        assert_eq!(request.role, SyncRole::Member);
        assert_eq!(request.organization, "acme");
    }

    #[test]
    fn test_request_from_state_rejects_unknown_role() {
        let mut state = ResourceState::new();
        state.set(ORGANIZATION, "acme");
        state.set(IDP_KEY, "department");
        state.set(IDP_VALUE, "engineering");
        state.set(TEAM, "platform");
        state.set(ROLE, "Owner");

        assert!(matches!(
            request_from_state(&state),
            Err(ProviderError::InvalidAttribute { key: "role", .. })
        ));
    }

    #[test]
    fn test_schema_shape() {
        assert_eq!(SCHEMA.name, "silo_saml_group_sync");
        assert!(SCHEMA.attr(ORGANIZATION).unwrap().force_new);
        assert!(!SCHEMA.attr(TEAM).unwrap().force_new);
        assert_eq!(SCHEMA.attr(ROLE).unwrap().default, Some("Member"));
        assert!(SCHEMA.attr(SLUG_PERM).unwrap().computed);
    }
}
