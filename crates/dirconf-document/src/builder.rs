// crates/dirconf-document/src/builder.rs
// ============================================================================
// Module: Document Builder
// Description: Fluent construction of configuration documents.
// Dependencies: dirconf-validators, std::collections
// ============================================================================

//! ## Overview
//! Hosts that already hold typed attribute values build documents directly
//! instead of going through JSON.

use std::collections::BTreeMap;

use dirconf_validators::AttributeValue;

use crate::document::ConfigDocument;

/// Builder for [`ConfigDocument`]
///
/// Later assignments to the same attribute replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    /// Top-level attributes collected so far.
    attributes: BTreeMap<String, AttributeValue>,
}

impl DocumentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an attribute with the given value.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Declares an attribute whose value is not known yet.
    #[must_use]
    pub fn unknown(self, name: impl Into<String>) -> Self {
        self.attribute(name, AttributeValue::Unknown)
    }

    /// Declares an attribute that is explicitly unset.
    #[must_use]
    pub fn null(self, name: impl Into<String>) -> Self {
        self.attribute(name, AttributeValue::Null)
    }

    /// Finishes the document.
    #[must_use]
    pub fn build(self) -> ConfigDocument {
        ConfigDocument::new(self.attributes)
    }
}
