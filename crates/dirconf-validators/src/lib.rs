// crates/dirconf-validators/src/lib.rs
// ============================================================================
// Module: Dirconf Validators Root
// Description: Public API surface for cross-field configuration validation.
// Purpose: Wire together values, paths, diagnostics, rules, and the runner.
// Dependencies: crate::{diagnostics, path, rules, runner, serde_support, value, walk}
// ============================================================================

//! ## Overview
//! Cross-field validation for directory-server configuration objects. Rules
//! check relationships between attributes of a partially-known document
//! before it is sent to the server. Three-valued attribute state drives every
//! decision: unknown values defer judgment silently, so a plan is never
//! rejected on a fact that has not been computed yet.
//!
//! The host supplies the document through [`Document`], builds a [`RuleSet`]
//! per object type, and blocks the operation when the resulting
//! [`Diagnostics`] contain errors.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod diagnostics;
pub mod path;
pub mod rules;
pub mod runner;
pub mod serde_support;
pub mod value;
pub mod walk;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use diagnostics::Diagnostic;
pub use diagnostics::Diagnostics;
pub use diagnostics::Severity;
pub use path::Document;
pub use path::ExpressionStep;
pub use path::Path;
pub use path::PathExpression;
pub use path::PathExpressionError;
pub use path::PathStep;
pub use path::ResolveError;
pub use rules::Implies;
pub use rules::ImpliesOtherAttributeOneOfString;
pub use rules::ImpliesOtherValidator;
pub use rules::Rule;
pub use rules::ValueImpliesAttributeRequired;
pub use rules::Verdict;
pub use runner::EvaluationMode;
pub use runner::NoopTrace;
pub use runner::RuleSet;
pub use runner::ValidationTrace;
pub use serde_support::RuleSpec;
pub use serde_support::RuleSpecCodec;
pub use serde_support::RuleSpecValidator;
pub use serde_support::SpecConfig;
pub use serde_support::SpecError;
pub use value::AttributeValue;
pub use value::Payload;

// ============================================================================
// SECTION: Convenience Constructors
// ============================================================================

/// Shorthand constructors for static rule lists
pub mod convenience {
    use super::Implies;
    use super::ImpliesOtherAttributeOneOfString;
    use super::ImpliesOtherValidator;
    use super::PathExpression;
    use super::Rule;
    use super::ValueImpliesAttributeRequired;

    /// Selects a top-level attribute.
    #[must_use]
    pub fn attr(name: &str) -> PathExpression {
        PathExpression::root(name)
    }

    /// `If condition is configured, implied must be configured.`
    #[must_use]
    pub fn implies(condition: PathExpression, implied: PathExpression) -> Box<dyn Rule> {
        Box::new(Implies::new(condition, implied))
    }

    /// `If condition is configured, implied must be one of allowed.`
    #[must_use]
    pub fn implies_one_of(
        condition: PathExpression,
        implied: PathExpression,
        allowed: &[&str],
    ) -> Box<dyn Rule> {
        Box::new(ImpliesOtherAttributeOneOfString::new(condition, implied, allowed.iter().copied()))
    }

    /// `If condition is in values, inner must pass.`
    #[must_use]
    pub fn implies_validator(
        condition: PathExpression,
        values: &[&str],
        inner: Box<dyn Rule>,
    ) -> Box<dyn Rule> {
        Box::new(ImpliesOtherValidator::new(condition, values.iter().copied(), inner))
    }

    /// `If condition equals value, every implied attribute must be configured.`
    #[must_use]
    pub fn value_requires(
        condition: PathExpression,
        value: &str,
        implied: Vec<PathExpression>,
    ) -> Box<dyn Rule> {
        Box::new(ValueImpliesAttributeRequired::new(condition, value, implied))
    }
}
