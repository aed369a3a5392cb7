//! Wire types for the Silo REST API.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Allow/deny lists for one rule family (CIDR blocks or country codes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowDenyList {
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
}

/// Full Geo-IP rule set for a repository.
///
/// The update endpoint replaces the complete rule set in one call. An empty
/// list means "no rule"; there is no partial-update form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoIpRules {
    #[serde(default)]
    pub cidr: AllowDenyList,
    #[serde(default)]
    pub country_code: AllowDenyList,
}

/// Role granted to members synced into a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncRole {
    #[default]
    Member,
    Manager,
}

impl SyncRole {
    /// Role name as it appears on the wire and in declared state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Manager => "Manager",
        }
    }

    /// Parse a role name; `None` for anything other than the known roles.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Member" => Some(Self::Member),
            "Manager" => Some(Self::Manager),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for creating a SAML group-sync mapping.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct GroupSyncRequest {
    #[validate(length(min = 1))]
    pub idp_key: String,
    #[validate(length(min = 1))]
    pub idp_value: String,
    pub role: SyncRole,
    #[validate(length(min = 1))]
    pub team: String,
    #[validate(length(min = 1))]
    pub organization: String,
}

/// One SAML group-sync mapping as returned by the create and list endpoints.
///
/// The owning organization is not part of the payload; callers carry it
/// alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSyncEntry {
    pub slug_perm: String,
    pub idp_key: String,
    pub idp_value: String,
    pub role: SyncRole,
    pub team: String,
}

/// Error detail body the API attaches to 4xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_sync_list() {
        let json = r#"[
            {
                "slug_perm": "aBcD1234",
                "idp_key": "department",
                "idp_value": "engineering",
                "role": "Manager",
                "team": "platform"
            }
        ]"#;

        let entries: Vec<GroupSyncEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug_perm, "aBcD1234");
        assert_eq!(entries[0].role, SyncRole::Manager);
    }

    #[test]
    fn test_parse_geo_ip_rules_with_missing_sections() {
        // The read endpoint may omit empty sections entirely.
        let rules: GeoIpRules = serde_json::from_str(r#"{"cidr": {"allow": ["10.0.0.0/8"]}}"#).unwrap();
        assert_eq!(rules.cidr.allow, vec!["10.0.0.0/8".to_string()]);
        assert!(rules.cidr.deny.is_empty());
        assert!(rules.country_code.allow.is_empty());
    }

    #[test]
    fn test_geo_ip_rules_empty_serialization() {
        let json = serde_json::to_value(GeoIpRules::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cidr": {"allow": [], "deny": []},
                "country_code": {"allow": [], "deny": []},
            })
        );
    }

    #[test]
    fn test_sync_role_round_trip() {
        assert_eq!(SyncRole::parse("Member"), Some(SyncRole::Member));
        assert_eq!(SyncRole::parse("Manager"), Some(SyncRole::Manager));
        assert_eq!(SyncRole::parse("manager"), None);
        assert_eq!(SyncRole::default().as_str(), "Member");

        let serialized = serde_json::to_string(&SyncRole::Manager).unwrap();
        assert_eq!(serialized, r#""Manager""#);
    }

    #[test]
    fn test_group_sync_request_validation() {
        let request = GroupSyncRequest {
            idp_key: "department".to_string(),
            idp_value: "engineering".to_string(),
            role: SyncRole::Member,
            team: String::new(),
            organization: "acme".to_string(),
        };

        assert!(request.validate().is_err());
    }
}
