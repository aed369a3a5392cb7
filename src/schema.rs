//! Attribute schemas for the exposed resources.
//!
//! The schema captures the declarative contract for each resource type:
//! which attributes exist, whether they are required, whether a change
//! forces replacement, and which values are acceptable. Adapters validate
//! declared state against their schema before touching the remote API.

use crate::{error::ProviderError, state::ResourceState};

/// Attribute value kinds understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    String,
    StringSet,
}

/// Schema for a single resource attribute.
#[derive(Debug, Clone, Copy)]
pub struct AttrSchema {
    pub kind: AttrKind,
    pub required: bool,
    /// A change to this attribute replaces the resource instead of updating
    /// it in place.
    pub force_new: bool,
    /// Assigned by the server; never supplied in declared state.
    pub computed: bool,
    pub default: Option<&'static str>,
    /// Allowed values; empty means unrestricted.
    pub allowed: &'static [&'static str],
}

impl AttrSchema {
    pub const fn string() -> Self {
        Self {
            kind: AttrKind::String,
            required: false,
            force_new: false,
            computed: false,
            default: None,
            allowed: &[],
        }
    }

    pub const fn string_set() -> Self {
        Self {
            kind: AttrKind::StringSet,
            required: false,
            force_new: false,
            computed: false,
            default: None,
            allowed: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }
}

/// Attribute table for one resource type.
#[derive(Debug)]
pub struct ResourceSchema {
    /// Resource type name as the invoking framework knows it.
    pub name: &'static str,
    pub attrs: &'static [(&'static str, AttrSchema)],
}

impl ResourceSchema {
    pub fn attr(&self, key: &str) -> Option<&AttrSchema> {
        self.attrs
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, attr)| attr)
    }

    /// Validate declared state against this schema.
    pub fn validate(&self, state: &ResourceState) -> Result<(), ProviderError> {
        for &(key, attr) in self.attrs {
            let Some(value) = state.get(key) else {
                if attr.required && !attr.computed {
                    return Err(ProviderError::MissingAttribute(key));
                }
                continue;
            };

            match attr.kind {
                AttrKind::String => {
                    let Some(text) = value.as_str() else {
                        return Err(invalid(key, "expected a string"));
                    };
                    if text.is_empty() {
                        return Err(invalid(key, "must not be empty"));
                    }
                    if !attr.allowed.is_empty() && !attr.allowed.contains(&text) {
                        return Err(ProviderError::InvalidAttribute {
                            key,
                            reason: format!("must be one of {:?}", attr.allowed),
                        });
                    }
                }
                AttrKind::StringSet => {
                    let Some(items) = value.as_array() else {
                        return Err(invalid(key, "expected a set of strings"));
                    };
                    for item in items {
                        match item.as_str() {
                            Some(text) if !text.is_empty() => {}
                            _ => {
                                return Err(invalid(
                                    key,
                                    "set elements must be non-empty strings",
                                ));
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn invalid(key: &'static str, reason: &str) -> ProviderError {
    ProviderError::InvalidAttribute {
        key,
        reason: reason.to_string(),
    }
}
