//! Typed client for the Silo REST API.
//!
//! Covers the repository Geo-IP endpoints and the organization SAML
//! group-sync endpoints used by the resource adapters. Authentication is an
//! API key sent in the `X-Api-Key` header on every request.

mod error;
pub mod types;

use http::StatusCode;
use reqwest::{Client, Response};
use tracing::debug;

pub use error::ApiError;

use crate::config::ApiConfig;
use types::{ErrorDetail, GeoIpRules, GroupSyncEntry, GroupSyncRequest};

/// Result type for Silo API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Client for the Silo REST API.
#[derive(Clone)]
pub struct SiloClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl SiloClient {
    /// Create a client from provider configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let mut base_url = config.host.clone();
        // Remove trailing slash
        if base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http_client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Enable Geo-IP filtering on a repository.
    ///
    /// The toggle is idempotent on the remote side.
    pub async fn enable_geo_ip_filtering(
        &self,
        namespace: &str,
        repository: &str,
    ) -> ApiResult<()> {
        let url = format!(
            "{}/v1/repos/{}/{}/geoip/enable",
            self.base_url, namespace, repository
        );
        debug!(namespace, repository, "Enabling Geo-IP filtering");
        self.send(self.http_client.post(&url)).await?;
        Ok(())
    }

    /// Fetch the current Geo-IP rule set for a repository.
    pub async fn read_geo_ip_rules(
        &self,
        namespace: &str,
        repository: &str,
    ) -> ApiResult<GeoIpRules> {
        let url = format!("{}/v1/repos/{}/{}/geoip", self.base_url, namespace, repository);
        let response = self.send(self.http_client.get(&url)).await?;
        Ok(response.json().await?)
    }

    /// Replace the Geo-IP rule set for a repository.
    pub async fn update_geo_ip_rules(
        &self,
        namespace: &str,
        repository: &str,
        rules: &GeoIpRules,
    ) -> ApiResult<()> {
        let url = format!("{}/v1/repos/{}/{}/geoip", self.base_url, namespace, repository);
        debug!(namespace, repository, "Updating Geo-IP rules");
        self.send(self.http_client.put(&url).json(rules)).await?;
        Ok(())
    }

    /// Create a SAML group-sync mapping for an organization.
    pub async fn create_saml_mapping(
        &self,
        organization: &str,
        request: &GroupSyncRequest,
    ) -> ApiResult<GroupSyncEntry> {
        let url = format!("{}/v1/orgs/{}/saml-group-sync", self.base_url, organization);
        debug!(organization, team = %request.team, "Creating SAML group-sync mapping");
        let response = self.send(self.http_client.post(&url).json(request)).await?;
        Ok(response.json().await?)
    }

    /// List one page of SAML group-sync mappings for an organization.
    pub async fn list_saml_mappings(
        &self,
        organization: &str,
        page: u32,
        page_size: u32,
    ) -> ApiResult<Vec<GroupSyncEntry>> {
        let url = format!("{}/v1/orgs/{}/saml-group-sync", self.base_url, organization);
        let response = self
            .send(
                self.http_client
                    .get(&url)
                    .query(&[("page", page), ("page_size", page_size)]),
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Delete a SAML group-sync mapping by its server-assigned slug.
    pub async fn delete_saml_mapping(&self, organization: &str, slug_perm: &str) -> ApiResult<()> {
        let url = format!(
            "{}/v1/orgs/{}/saml-group-sync/{}",
            self.base_url, organization, slug_perm
        );
        debug!(organization, slug_perm, "Deleting SAML group-sync mapping");
        self.send(self.http_client.delete(&url)).await?;
        Ok(())
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<Response> {
        let response = request
            .header("X-Api-Key", self.api_key.as_str())
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ApiError::Unprocessable(detail_from_body(&body)));
        }

        Err(ApiError::Unexpected { status, body })
    }
}

/// Extract the `detail` field from an error body, falling back to the raw
/// body text.
fn detail_from_body(body: &str) -> String {
    serde_json::from_str::<ErrorDetail>(body)
        .ok()
        .and_then(|d| d.detail)
        .unwrap_or_else(|| {
            if body.is_empty() {
                "unprocessable entity".to_string()
            } else {
                body.to_string()
            }
        })
}
