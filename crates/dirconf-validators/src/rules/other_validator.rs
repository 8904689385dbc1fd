// crates/dirconf-validators/src/rules/other_validator.rs
// ============================================================================
// Module: Implies Other Validator Rule
// Description: "If A holds one of these strings, rule R must pass."
// Dependencies: crate::{diagnostics, path}
// ============================================================================

use super::Condition;
use super::Rule;
use super::Verdict;
use super::condition_matches;
use super::quoted_list;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::Diagnostics;
use crate::diagnostics::IMPLIED_VALIDATOR_DETAIL;
use crate::diagnostics::IMPLIED_VALIDATOR_FAILED;
use crate::path::Document;
use crate::path::PathExpression;

/// Runs a nested rule only when a discriminator holds one of the given values
///
/// Nested failures are reported twice: the nested rule's own diagnostic and
/// one contextual diagnostic from this rule.
pub struct ImpliesOtherValidator {
    /// Attribute(s) compared against `condition_values`.
    condition: PathExpression,
    /// Values that activate the nested rule.
    condition_values: Vec<String>,
    /// Rule run against the same document and sink.
    implied: Box<dyn Rule>,
}

impl ImpliesOtherValidator {
    /// Creates the rule.
    pub fn new<I, S>(condition: PathExpression, condition_values: I, implied: Box<dyn Rule>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            condition,
            condition_values: condition_values.into_iter().map(Into::into).collect(),
            implied,
        }
    }
}

impl std::fmt::Debug for ImpliesOtherValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpliesOtherValidator")
            .field("condition", &self.condition)
            .field("condition_values", &self.condition_values)
            .field("implied", &self.implied.description())
            .finish()
    }
}

impl Rule for ImpliesOtherValidator {
    fn description(&self) -> String {
        format!(
            "If {} has a value in {}, then the following validator must pass: {}",
            self.condition,
            quoted_list(&self.condition_values),
            self.implied.description()
        )
    }

    fn evaluate(&self, document: &dyn Document, diagnostics: &mut Diagnostics) -> Verdict {
        let condition = condition_matches(document, &self.condition, diagnostics, |value| {
            self.condition_values.iter().any(|candidate| candidate == value)
        });
        match condition {
            Condition::Met => {}
            Condition::NotMet => return Verdict::Vacuous,
            Condition::Deferred => return Verdict::Deferred,
            Condition::Malformed => return Verdict::Malformed,
        }

        let errors_before = diagnostics.error_count();
        let verdict = self.implied.evaluate(document, diagnostics);
        if diagnostics.error_count() > errors_before {
            let detail = format!("{IMPLIED_VALIDATOR_DETAIL}: {}", self.description());
            diagnostics.push(Diagnostic::error(IMPLIED_VALIDATOR_FAILED, detail));
            return Verdict::Violated;
        }
        verdict
    }
}
