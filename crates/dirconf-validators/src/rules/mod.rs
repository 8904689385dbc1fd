// crates/dirconf-validators/src/rules/mod.rs
// ============================================================================
// Module: Validation Rules
// Description: Rule contract and the shared condition scans.
// Purpose: Define the `Rule` trait every cross-field validator implements.
// Dependencies: crate::{diagnostics, path, walk}
// ============================================================================

//! ## Overview
//! A [`Rule`] inspects one document and appends zero or more diagnostics. The
//! returned [`Verdict`] exposes which terminal state the rule reached so
//! callers can tell "passed" from "deferred on an unknown value" even though
//! neither appends anything.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod implies;
mod one_of_string;
mod other_validator;
mod value_implies_required;

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::Diagnostics;
use crate::diagnostics::INVALID_ATTRIBUTE_TYPE;
use crate::path::Document;
use crate::path::Path;
use crate::path::PathExpression;
use crate::walk::Step;
use crate::walk::Walk;
use crate::walk::walk;

pub use implies::Implies;
pub use one_of_string::ImpliesOtherAttributeOneOfString;
pub use other_validator::ImpliesOtherValidator;
pub use value_implies_required::ValueImpliesAttributeRequired;

// ============================================================================
// SECTION: Rule Contract
// ============================================================================

/// Terminal outcome of one rule evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Condition held and the implication was satisfied
    Satisfied,
    /// Condition did not hold; nothing to check
    Vacuous,
    /// An unknown value was reached; judgment deferred without diagnostics
    Deferred,
    /// The rule appended at least one constraint-violation diagnostic
    Violated,
    /// The rule could not be evaluated; a diagnostic explains why
    Malformed,
}

impl Verdict {
    /// Returns true when the rule appended diagnostics.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Violated | Self::Malformed)
    }

    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Satisfied => "satisfied",
            Self::Vacuous => "vacuous",
            Self::Deferred => "deferred",
            Self::Violated => "violated",
            Self::Malformed => "malformed",
        }
    }
}

/// Cross-field validation rule
///
/// Rules are immutable after construction and are evaluated many times,
/// possibly from several threads at once. They never mutate the document.
pub trait Rule: Send + Sync {
    /// Human-readable restatement of the rule.
    fn description(&self) -> String;

    /// Evaluates the rule, appending any findings to `diagnostics`.
    fn evaluate(&self, document: &dyn Document, diagnostics: &mut Diagnostics) -> Verdict;

    /// Evaluates the rule for its diagnostics only.
    fn check(&self, document: &dyn Document, diagnostics: &mut Diagnostics) {
        let _ = self.evaluate(document, diagnostics);
    }
}

// ============================================================================
// SECTION: Condition Scans
// ============================================================================

/// Result of scanning a rule's condition expression.
enum Condition {
    /// Condition holds.
    Met,
    /// No matched path satisfies the condition.
    NotMet,
    /// An unknown value was reached first.
    Deferred,
    /// Resolution or type check failed; diagnostic already appended.
    Malformed,
}

/// Scans for the first configured value; any present value satisfies.
fn condition_configured(
    document: &dyn Document,
    expression: &PathExpression,
    diagnostics: &mut Diagnostics,
) -> Condition {
    match walk(document, expression, diagnostics, |_, _| Step::Stop(())) {
        Walk::Found(()) => Condition::Met,
        Walk::Exhausted => Condition::NotMet,
        Walk::Aborted => Condition::Deferred,
        Walk::Malformed => Condition::Malformed,
    }
}

/// Scans for a string value accepted by `accepts`.
///
/// Present values that are not accepted keep the scan going; a present
/// non-string value stops it with a type diagnostic.
fn condition_matches<F>(
    document: &dyn Document,
    expression: &PathExpression,
    diagnostics: &mut Diagnostics,
    accepts: F,
) -> Condition
where
    F: Fn(&str) -> bool,
{
    let scan = walk(document, expression, diagnostics, |path, payload| match payload.as_str() {
        Some(value) if accepts(value) => Step::Stop(Ok(())),
        Some(_) => Step::Continue,
        None => Step::Stop(Err((path.clone(), payload.type_name()))),
    });
    match scan {
        Walk::Found(Ok(())) => Condition::Met,
        Walk::Found(Err((path, found))) => {
            diagnostics.push(non_string_value(path, found));
            Condition::Malformed
        }
        Walk::Exhausted => Condition::NotMet,
        Walk::Aborted => Condition::Deferred,
        Walk::Malformed => Condition::Malformed,
    }
}

// ============================================================================
// SECTION: Formatting Helpers
// ============================================================================

/// Builds the type-mismatch diagnostic for a non-string value.
fn non_string_value(path: Path, found: &str) -> Diagnostic {
    Diagnostic::error(
        INVALID_ATTRIBUTE_TYPE,
        format!("attribute {path} has non-string value of type {found}"),
    )
    .at(path)
}

/// Renders string literals as `["a", "b"]`.
fn quoted_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|value| format!("\"{value}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Renders expressions as `[a, b.c]`.
fn expression_list(expressions: &[PathExpression]) -> String {
    let rendered: Vec<String> = expressions.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}
