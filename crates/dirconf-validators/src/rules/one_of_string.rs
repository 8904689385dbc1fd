// crates/dirconf-validators/src/rules/one_of_string.rs
// ============================================================================
// Module: Implies One-Of Rule
// Description: "If A is configured, B must hold one of these strings."
// Dependencies: crate::{diagnostics, path, walk}
// ============================================================================

use super::Condition;
use super::Rule;
use super::Verdict;
use super::condition_configured;
use super::non_string_value;
use super::quoted_list;
use crate::diagnostics::DISALLOWED_VALUE_DETAIL;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::Diagnostics;
use crate::diagnostics::INVALID_ATTRIBUTE_COMBINATION;
use crate::path::Document;
use crate::path::Path;
use crate::path::PathExpression;
use crate::walk::Step;
use crate::walk::Walk;
use crate::walk::walk;

/// Restricts a discriminator when another attribute is configured
///
/// Typical use: attribute X only makes sense when `type` is one of a few
/// values. Only values that are set are constrained; an unset discriminator
/// passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpliesOtherAttributeOneOfString {
    /// Attribute(s) whose presence triggers the rule.
    condition: PathExpression,
    /// Attribute whose value is constrained.
    implied: PathExpression,
    /// Accepted values, compared exactly and case-sensitively.
    allowed_values: Vec<String>,
}

/// First present implied value, classified.
enum ImpliedValue {
    /// Value is in the allowed set.
    Allowed,
    /// String outside the allowed set.
    Disallowed(Path, String),
    /// Value is not a string.
    NotString(Path, &'static str),
}

impl ImpliesOtherAttributeOneOfString {
    /// Creates the rule.
    pub fn new<I, S>(condition: PathExpression, implied: PathExpression, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            condition,
            implied,
            allowed_values: allowed_values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the accepted values.
    #[must_use]
    pub fn allowed_values(&self) -> &[String] {
        &self.allowed_values
    }
}

impl Rule for ImpliesOtherAttributeOneOfString {
    fn description(&self) -> String {
        format!(
            "If {} is configured, then {} must be one of {}",
            self.condition,
            self.implied,
            quoted_list(&self.allowed_values)
        )
    }

    fn evaluate(&self, document: &dyn Document, diagnostics: &mut Diagnostics) -> Verdict {
        match condition_configured(document, &self.condition, diagnostics) {
            Condition::Met => {}
            Condition::NotMet => return Verdict::Vacuous,
            Condition::Deferred => return Verdict::Deferred,
            Condition::Malformed => return Verdict::Malformed,
        }

        let scan = walk(document, &self.implied, diagnostics, |path, payload| {
            Step::Stop(match payload.as_str() {
                Some(value) if self.allowed_values.iter().any(|allowed| allowed == value) => {
                    ImpliedValue::Allowed
                }
                Some(value) => ImpliedValue::Disallowed(path.clone(), value.to_string()),
                None => ImpliedValue::NotString(path.clone(), payload.type_name()),
            })
        });

        match scan {
            Walk::Found(ImpliedValue::Allowed) => Verdict::Satisfied,
            Walk::Found(ImpliedValue::Disallowed(path, value)) => {
                let detail = format!(
                    "{DISALLOWED_VALUE_DETAIL}: {} ({path} is \"{value}\")",
                    self.description()
                );
                diagnostics.push(Diagnostic::error(INVALID_ATTRIBUTE_COMBINATION, detail).at(path));
                Verdict::Violated
            }
            Walk::Found(ImpliedValue::NotString(path, found)) => {
                diagnostics.push(non_string_value(path, found));
                Verdict::Malformed
            }
            Walk::Exhausted => Verdict::Vacuous,
            Walk::Aborted => Verdict::Deferred,
            Walk::Malformed => Verdict::Malformed,
        }
    }
}
