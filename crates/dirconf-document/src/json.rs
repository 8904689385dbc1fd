// crates/dirconf-document/src/json.rs
// ============================================================================
// Module: JSON Documents
// Description: Loads configuration documents from planned JSON values.
// Purpose: Map JSON (with unknown/map/set markers) onto tri-state values
//          with hard size and depth limits.
// Dependencies: dirconf-validators, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! JSON has no notion of "not yet known", nor does it distinguish maps from
//! nested blocks or lists from sets. Three single-key marker objects fill the
//! gap:
//! - `{"$unknown": true}` is an unknown value,
//! - `{"$map": {...}}` is a string-keyed map,
//! - `{"$set": [...]}` is a set.
//!
//! Every other object is a nested block and every array is a list. JSON
//! `null` is `Null`.
//! Security posture: plan documents are untrusted; inputs are bounded before
//! and during conversion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use dirconf_validators::AttributeValue;
use dirconf_validators::Payload;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::document::ConfigDocument;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted JSON document size in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 1024 * 1024;
/// Maximum nesting depth of converted values.
pub const MAX_DOCUMENT_DEPTH: usize = 64;

/// Marker key for unknown values.
const UNKNOWN_MARKER: &str = "$unknown";
/// Marker key for maps.
const MAP_MARKER: &str = "$map";
/// Marker key for sets.
const SET_MARKER: &str = "$set";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Input exceeded the size limit.
    #[error("document exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input is not valid JSON.
    #[error("document parse error: {0}")]
    Parse(String),
    /// Values are nested deeper than the limit.
    #[error("document exceeds max depth {max_depth}")]
    TooDeep {
        /// Maximum supported depth.
        max_depth: usize,
    },
    /// Root value is not an object.
    #[error("document root must be an object, found {found}")]
    NotAnObject {
        /// Type label of the root.
        found: &'static str,
    },
    /// A marker object is malformed.
    #[error("invalid `{marker}` marker: {reason}")]
    InvalidMarker {
        /// Marker key.
        marker: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl ConfigDocument {
    /// Parses a document from JSON text.
    ///
    /// Attributes a rule reaches must be present in the JSON (use `null` for
    /// unset ones) unless the document is switched to
    /// [`UndeclaredAttributes::Null`](crate::document::UndeclaredAttributes::Null)
    /// with [`ConfigDocument::with_undeclared`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the input is too large, not JSON, or
    /// not a valid document.
    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        if input.len() > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge {
                max_bytes: MAX_DOCUMENT_BYTES,
                actual_bytes: input.len(),
            });
        }
        let value: Value =
            serde_json::from_str(input).map_err(|err| DocumentError::Parse(err.to_string()))?;
        Self::from_json_value(value)
    }

    /// Builds a document from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the value is too deep, uses a malformed
    /// marker, or is not an object.
    pub fn from_json_value(value: Value) -> Result<Self, DocumentError> {
        let root = convert(value, 0)?;
        let document = Self::from_value(root)?;
        tracing::debug!(attributes = document.attribute_names().count(), "document loaded");
        Ok(document)
    }
}

/// Converts one JSON value at the given depth.
fn convert(value: Value, depth: usize) -> Result<AttributeValue, DocumentError> {
    if depth > MAX_DOCUMENT_DEPTH {
        return Err(DocumentError::TooDeep {
            max_depth: MAX_DOCUMENT_DEPTH,
        });
    }
    let payload = match value {
        Value::Null => return Ok(AttributeValue::Null),
        Value::Bool(flag) => Payload::Bool(flag),
        Value::Number(number) => Payload::Number(number),
        Value::String(text) => Payload::String(text),
        Value::Array(items) => Payload::List(convert_items(items, depth)?),
        Value::Object(object) => return convert_object(object, depth),
    };
    Ok(AttributeValue::Present(payload))
}

/// Converts an object, honoring the single-key markers.
fn convert_object(
    mut object: Map<String, Value>,
    depth: usize,
) -> Result<AttributeValue, DocumentError> {
    if object.len() != 1 {
        return Ok(AttributeValue::Present(Payload::Object(convert_entries(object, depth)?)));
    }
    if let Some(flag) = object.remove(UNKNOWN_MARKER) {
        return match flag {
            Value::Bool(true) => Ok(AttributeValue::Unknown),
            _ => Err(DocumentError::InvalidMarker {
                marker: UNKNOWN_MARKER,
                reason: "value must be true",
            }),
        };
    }
    if let Some(entries) = object.remove(MAP_MARKER) {
        return match entries {
            Value::Object(entries) => {
                Ok(AttributeValue::Present(Payload::Map(convert_entries(entries, depth)?)))
            }
            _ => Err(DocumentError::InvalidMarker {
                marker: MAP_MARKER,
                reason: "value must be an object",
            }),
        };
    }
    if let Some(items) = object.remove(SET_MARKER) {
        return match items {
            Value::Array(items) => {
                Ok(AttributeValue::Present(Payload::Set(convert_items(items, depth)?)))
            }
            _ => Err(DocumentError::InvalidMarker {
                marker: SET_MARKER,
                reason: "value must be an array",
            }),
        };
    }
    Ok(AttributeValue::Present(Payload::Object(convert_entries(object, depth)?)))
}

/// Converts array elements one level deeper.
fn convert_items(items: Vec<Value>, depth: usize) -> Result<Vec<AttributeValue>, DocumentError> {
    items.into_iter().map(|item| convert(item, depth + 1)).collect()
}

/// Converts object entries one level deeper.
fn convert_entries(
    entries: Map<String, Value>,
    depth: usize,
) -> Result<BTreeMap<String, AttributeValue>, DocumentError> {
    entries.into_iter().map(|(key, item)| Ok((key, convert(item, depth + 1)?))).collect()
}
