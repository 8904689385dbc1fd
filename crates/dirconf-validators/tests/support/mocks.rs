// crates/dirconf-validators/tests/support/mocks.rs
// ============================================================================
// Module: Mock Document
// Description: Resolver-controlled document for rule tests.
// ============================================================================
//! ## Overview
//! A [`Document`] whose expression matches and values are registered
//! explicitly, so tests control match order and tri-state values exactly.

use std::collections::HashMap;

use dirconf_validators::AttributeValue;
use dirconf_validators::Document;
use dirconf_validators::Path;
use dirconf_validators::PathExpression;
use dirconf_validators::PathStep;
use dirconf_validators::ResolveError;

// ========================================================================
// Mock Document
// ========================================================================

/// Document with explicitly registered matches.
#[derive(Debug, Default, Clone)]
pub struct MockDocument {
    /// Expression text to matched paths, in resolver order.
    matches: HashMap<String, Vec<Path>>,
    /// Values by concrete path; unregistered paths read as `Null`.
    values: HashMap<Path, AttributeValue>,
    /// Expressions whose resolution fails.
    failing: Vec<String>,
}

impl MockDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a single-path attribute named `name`.
    #[must_use]
    pub fn attribute(mut self, name: &str, value: AttributeValue) -> Self {
        let path: Path = std::iter::once(PathStep::Attribute(name.to_string())).collect();
        self.matches.insert(name.to_string(), vec![path.clone()]);
        self.values.insert(path, value);
        self
    }

    /// Registers an expression matching one path per value, in the given order.
    #[must_use]
    pub fn repeated(mut self, expression: &str, values: Vec<AttributeValue>) -> Self {
        let mut paths = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            let path: Path = [PathStep::Attribute(expression.to_string()), PathStep::Index(index)]
                .into_iter()
                .collect();
            self.values.insert(path.clone(), value);
            paths.push(path);
        }
        self.matches.insert(expression.to_string(), paths);
        self
    }

    /// Makes resolution of `expression` fail.
    #[must_use]
    pub fn failing(mut self, expression: &str) -> Self {
        self.failing.push(expression.to_string());
        self
    }
}

impl Document for MockDocument {
    fn resolve(&self, expression: &PathExpression) -> Result<Vec<Path>, ResolveError> {
        let key = expression.to_string();
        if self.failing.contains(&key) {
            return Err(ResolveError::Collaborator(format!("forced failure for {key}")));
        }
        self.matches
            .get(&key)
            .cloned()
            .ok_or_else(|| ResolveError::Collaborator(format!("unregistered expression {key}")))
    }

    fn value(&self, path: &Path) -> AttributeValue {
        self.values.get(path).cloned().unwrap_or(AttributeValue::Null)
    }
}

/// Shorthand for a present string value.
#[must_use]
pub fn s(value: &str) -> AttributeValue {
    AttributeValue::string(value)
}

/// Shorthand for a top-level expression.
#[must_use]
pub fn p(name: &str) -> PathExpression {
    PathExpression::root(name)
}
