// crates/dirconf-validators/src/value.rs
// ============================================================================
// Module: Attribute Values
// Description: Tri-state attribute values for partially-known configuration.
// Purpose: Give rules a closed value model with explicit unknown/null states.
// Dependencies: serde, serde_json::Number, std::collections
// ============================================================================

//! ## Overview
//! An attribute is exactly one of `Unknown`, `Null`, or `Present(payload)`.
//! Rules never treat `Unknown` as either present or absent; they defer. The
//! payload is a closed union so "expected a string" is a match arm rather
//! than a runtime cast.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;

// ============================================================================
// SECTION: Attribute Value
// ============================================================================

/// Tri-state value of a single configuration attribute
///
/// # Invariants
/// - Exactly one state holds. A value read through a [`crate::Document`] with
///   any unknown element anywhere inside it is reported as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Value will only be known later (e.g. computed during apply)
    Unknown,
    /// Attribute explicitly has no value
    Null,
    /// Attribute is configured
    Present(Payload),
}

/// Concrete contents of a configured attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// String scalar
    String(String),
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(Number),
    /// Ordered collection
    List(Vec<AttributeValue>),
    /// Unordered collection, kept in the order the host supplied
    Set(Vec<AttributeValue>),
    /// String-keyed collection with host-defined keys
    Map(BTreeMap<String, AttributeValue>),
    /// Nested block with schema-declared attributes
    Object(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Creates a present string value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Present(Payload::String(value.into()))
    }

    /// Creates a present boolean value.
    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self::Present(Payload::Bool(value))
    }

    /// Creates a present numeric value.
    #[must_use]
    pub fn number(value: impl Into<Number>) -> Self {
        Self::Present(Payload::Number(value.into()))
    }

    /// Creates a present list value.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Present(Payload::List(items.into_iter().collect()))
    }

    /// Creates a present set value.
    #[must_use]
    pub fn set(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Present(Payload::Set(items.into_iter().collect()))
    }

    /// Creates a present map value.
    #[must_use]
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Present(Payload::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()))
    }

    /// Creates a present nested object.
    #[must_use]
    pub fn object<K: Into<String>>(attributes: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Present(Payload::Object(
            attributes.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Returns true if the value is `Unknown`
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns true if the value is `Null`
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the value is `Present`
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the payload when present.
    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Present(payload) => Some(payload),
            Self::Unknown | Self::Null => None,
        }
    }

    /// Returns the string contents when the value is a present string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.payload().and_then(Payload::as_str)
    }

    /// Returns true when no `Unknown` appears anywhere inside this value.
    #[must_use]
    pub fn is_wholly_known(&self) -> bool {
        match self {
            Self::Unknown => false,
            Self::Null => true,
            Self::Present(payload) => payload.is_wholly_known(),
        }
    }
}

impl Payload {
    /// Returns the string contents for string scalars.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Short type label used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Returns true when no nested element is `Unknown`.
    #[must_use]
    pub fn is_wholly_known(&self) -> bool {
        match self {
            Self::String(_) | Self::Bool(_) | Self::Number(_) => true,
            Self::List(items) | Self::Set(items) => items.iter().all(AttributeValue::is_wholly_known),
            Self::Map(entries) | Self::Object(entries) => {
                entries.values().all(AttributeValue::is_wholly_known)
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Present(Payload::String(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::bool(value)
    }
}
