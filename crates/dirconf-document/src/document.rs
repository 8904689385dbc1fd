// crates/dirconf-document/src/document.rs
// ============================================================================
// Module: Config Document
// Description: In-memory attribute tree implementing the document contract.
// Purpose: Resolve path expressions to concrete paths and read tri-state
//          values for the validation engine.
// Dependencies: dirconf-validators, std::collections
// ============================================================================

//! ## Overview
//! A [`ConfigDocument`] owns the top-level attributes of one configuration
//! object. Resolution expands an expression step by step, keeping document
//! order: list and set elements in stored order, map values in key order.
//! Expansion stops at an `Unknown` or `Null` ancestor and yields that ancestor,
//! so rules see the unknown (and defer) or the null (and skip it).
//! Plans that omit unset attributes instead of writing them as `null` can opt
//! into [`UndeclaredAttributes::Null`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use dirconf_validators::AttributeValue;
use dirconf_validators::Document;
use dirconf_validators::ExpressionStep;
use dirconf_validators::Path;
use dirconf_validators::PathExpression;
use dirconf_validators::PathStep;
use dirconf_validators::Payload;
use dirconf_validators::ResolveError;

use crate::json::DocumentError;

// ============================================================================
// SECTION: Undeclared Attributes
// ============================================================================

/// How resolution treats an attribute step naming an undeclared attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UndeclaredAttributes {
    /// Fail with [`ResolveError::UnknownAttribute`].
    #[default]
    Reject,
    /// Match the attribute path and read it as `Null`.
    Null,
}

/// Value matched for undeclared attributes under [`UndeclaredAttributes::Null`].
static UNDECLARED: AttributeValue = AttributeValue::Null;

// ============================================================================
// SECTION: Document
// ============================================================================

/// One configuration object as seen by the validation engine
///
/// # Invariants
/// - The root is always an object; its keys are the declared attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Root object.
    root: AttributeValue,
    /// Handling of undeclared attribute steps.
    undeclared: UndeclaredAttributes,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl ConfigDocument {
    /// Creates a document from its top-level attributes.
    #[must_use]
    pub fn new(attributes: BTreeMap<String, AttributeValue>) -> Self {
        Self {
            root: AttributeValue::Present(Payload::Object(attributes)),
            undeclared: UndeclaredAttributes::Reject,
        }
    }

    /// Sets how undeclared attribute steps resolve.
    #[must_use]
    pub const fn with_undeclared(mut self, undeclared: UndeclaredAttributes) -> Self {
        self.undeclared = undeclared;
        self
    }

    /// Returns how undeclared attribute steps resolve.
    #[must_use]
    pub const fn undeclared(&self) -> UndeclaredAttributes {
        self.undeclared
    }

    /// Creates a document from a root value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotAnObject`] for any other root.
    pub fn from_value(root: AttributeValue) -> Result<Self, DocumentError> {
        match root {
            AttributeValue::Present(Payload::Object(attributes)) => Ok(Self::new(attributes)),
            AttributeValue::Present(payload) => Err(DocumentError::NotAnObject {
                found: payload.type_name(),
            }),
            AttributeValue::Unknown => Err(DocumentError::NotAnObject {
                found: "unknown",
            }),
            AttributeValue::Null => Err(DocumentError::NotAnObject {
                found: "null",
            }),
        }
    }

    /// Returns the top-level attribute value, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes().and_then(|attributes| attributes.get(name))
    }

    /// Names of the declared top-level attributes, sorted.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes().into_iter().flat_map(|attributes| attributes.keys().map(String::as_str))
    }

    /// Returns the root object as a value.
    #[must_use]
    pub const fn root(&self) -> &AttributeValue {
        &self.root
    }

    /// Top-level attribute map.
    fn attributes(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match &self.root {
            AttributeValue::Present(Payload::Object(attributes)) => Some(attributes),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Document Contract
// ============================================================================

impl Document for ConfigDocument {
    fn resolve(&self, expression: &PathExpression) -> Result<Vec<Path>, ResolveError> {
        let mut frontier: Vec<(Path, &AttributeValue)> = vec![(Path::root(), &self.root)];
        for step in expression.steps() {
            let mut next = Vec::with_capacity(frontier.len());
            for (path, value) in frontier {
                expand(path, value, step, self.undeclared, &mut next)?;
            }
            frontier = next;
        }
        Ok(frontier.into_iter().map(|(path, _)| path).collect())
    }

    fn value(&self, path: &Path) -> AttributeValue {
        let mut current = &self.root;
        for step in path.steps() {
            let next = match current {
                AttributeValue::Unknown => return AttributeValue::Unknown,
                AttributeValue::Null => return AttributeValue::Null,
                AttributeValue::Present(payload) => child(payload, step),
            };
            match next {
                Some(value) => current = value,
                None => return AttributeValue::Null,
            }
        }
        if current.is_wholly_known() { current.clone() } else { AttributeValue::Unknown }
    }
}

// ============================================================================
// SECTION: Resolution Helpers
// ============================================================================

/// Applies one expression step to one matched value, appending the results.
fn expand<'a>(
    path: Path,
    value: &'a AttributeValue,
    step: &ExpressionStep,
    undeclared: UndeclaredAttributes,
    out: &mut Vec<(Path, &'a AttributeValue)>,
) -> Result<(), ResolveError> {
    let payload = match value {
        AttributeValue::Unknown | AttributeValue::Null => {
            out.push((path, value));
            return Ok(());
        }
        AttributeValue::Present(payload) => payload,
    };
    match (step, payload) {
        (ExpressionStep::Attribute(name), Payload::Object(attributes)) => {
            let child = match (attributes.get(name), undeclared) {
                (Some(child), _) => child,
                (None, UndeclaredAttributes::Null) => &UNDECLARED,
                (None, UndeclaredAttributes::Reject) => {
                    return Err(ResolveError::UnknownAttribute {
                        path,
                        name: name.clone(),
                    });
                }
            };
            out.push((path.join(PathStep::Attribute(name.clone())), child));
        }
        (ExpressionStep::AnyElement, Payload::List(items) | Payload::Set(items)) => {
            out.extend(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (path.join(PathStep::Index(index)), item)),
            );
        }
        (ExpressionStep::AnyElement, Payload::Map(entries)) => {
            out.extend(
                entries.iter().map(|(key, item)| (path.join(PathStep::Key(key.clone())), item)),
            );
        }
        (ExpressionStep::Index(index), Payload::List(items) | Payload::Set(items)) => {
            if let Some(item) = items.get(*index) {
                out.push((path.join(PathStep::Index(*index)), item));
            }
        }
        (ExpressionStep::Key(key), Payload::Map(entries)) => {
            if let Some(item) = entries.get(key) {
                out.push((path.join(PathStep::Key(key.clone())), item));
            }
        }
        (step, payload) => {
            return Err(ResolveError::NotTraversable {
                path,
                step: step.to_string(),
                found: payload.type_name(),
            });
        }
    }
    Ok(())
}

/// Follows one concrete step into a payload.
fn child<'a>(payload: &'a Payload, step: &PathStep) -> Option<&'a AttributeValue> {
    match (step, payload) {
        (PathStep::Attribute(name), Payload::Object(attributes)) => attributes.get(name),
        (PathStep::Index(index), Payload::List(items) | Payload::Set(items)) => items.get(*index),
        (PathStep::Key(key), Payload::Map(entries)) => entries.get(key),
        _ => None,
    }
}
