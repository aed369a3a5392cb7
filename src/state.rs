//! Declared resource state and field helpers.
//!
//! [`ResourceState`] mirrors the mutable state object the invoking framework
//! hands to each adapter operation: an identity plus a flat map of attribute
//! values. The helpers extract required and optional scalars and convert
//! between the attribute representation and the list-of-strings shape the
//! API payloads use.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ProviderError;

/// Declared state for one resource instance.
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    id: Option<String>,
    attrs: HashMap<String, Value>,
}

impl ResourceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the remote resource, if one is currently tracked.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Drop the identity, marking the remote resource as absent.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    /// Required scalar string attribute.
    pub fn required_str(&self, key: &'static str) -> Result<&str, ProviderError> {
        self.attrs
            .get(key)
            .and_then(Value::as_str)
            .ok_or(ProviderError::MissingAttribute(key))
    }

    /// Optional scalar string attribute with a schema-level default.
    pub fn optional_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attrs
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    /// Expand a set attribute into a list of strings.
    pub fn string_set(&self, key: &'static str) -> Result<Vec<String>, ProviderError> {
        let Some(value) = self.attrs.get(key) else {
            return Err(ProviderError::MissingAttribute(key));
        };
        let Some(items) = value.as_array() else {
            return Err(ProviderError::InvalidAttribute {
                key,
                reason: "expected a set of strings".to_string(),
            });
        };

        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ProviderError::InvalidAttribute {
                        key,
                        reason: "set elements must be strings".to_string(),
                    }
                })
            })
            .collect()
    }

    /// Flatten a list of strings back into a set attribute.
    pub fn set_strings(&mut self, key: &str, values: &[String]) {
        self.attrs.insert(key.to_string(), Value::from(values.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_identity_tracking() {
        let mut state = ResourceState::new();
        assert_eq!(state.id(), None);

        state.set_id("abc123");
        assert_eq!(state.id(), Some("abc123"));

        state.clear_id();
        assert_eq!(state.id(), None);
    }

    #[test]
    fn test_required_str() {
        let mut state = ResourceState::new();
        state.set("namespace", "acme");

        assert_eq!(state.required_str("namespace").unwrap(), "acme");
        assert!(matches!(
            state.required_str("repository"),
            Err(ProviderError::MissingAttribute("repository"))
        ));
    }

    #[test]
    fn test_optional_str_falls_back_to_default() {
        let mut state = ResourceState::new();
        assert_eq!(state.optional_str("role", "Member"), "Member");

        state.set("role", "Manager");
        assert_eq!(state.optional_str("role", "Member"), "Manager");
    }

    #[test]
    fn test_string_set_round_trip() {
        let mut state = ResourceState::new();
        let values = vec!["10.0.0.0/8".to_string(), "192.168.0.0/16".to_string()];
        state.set_strings("cidr_allow", &values);

        assert_eq!(state.string_set("cidr_allow").unwrap(), values);
    }

    #[test]
    fn test_string_set_rejects_non_string_elements() {
        let mut state = ResourceState::new();
        state.set("cidr_allow", json!(["10.0.0.0/8", 42]));

        assert!(matches!(
            state.string_set("cidr_allow"),
            Err(ProviderError::InvalidAttribute { key: "cidr_allow", .. })
        ));
    }

    #[test]
    fn test_string_set_rejects_scalars() {
        let mut state = ResourceState::new();
        state.set("cidr_allow", "10.0.0.0/8");

        assert!(matches!(
            state.string_set("cidr_allow"),
            Err(ProviderError::InvalidAttribute { key: "cidr_allow", .. })
        ));
    }
}
