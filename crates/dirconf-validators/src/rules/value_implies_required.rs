// crates/dirconf-validators/src/rules/value_implies_required.rs
// ============================================================================
// Module: Value Implies Required Rule
// Description: "If A equals v, every listed attribute must be configured."
// Dependencies: crate::{diagnostics, path, walk}
// ============================================================================

use super::Condition;
use super::Rule;
use super::Verdict;
use super::condition_matches;
use super::expression_list;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::Diagnostics;
use crate::diagnostics::MISSING_IMPLIED_ATTRIBUTE;
use crate::path::Document;
use crate::path::PathExpression;
use crate::walk::Step;
use crate::walk::Walk;
use crate::walk::walk;

/// Requires a set of attributes when a discriminator has one exact value
///
/// Stops at the first missing attribute; it does not list every missing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueImpliesAttributeRequired {
    /// Attribute(s) compared against `condition_value`.
    condition: PathExpression,
    /// Value that activates the requirement.
    condition_value: String,
    /// Each expression must match at least one present value.
    implied: Vec<PathExpression>,
}

impl ValueImpliesAttributeRequired {
    /// Creates the rule.
    pub fn new(
        condition: PathExpression,
        condition_value: impl Into<String>,
        implied: Vec<PathExpression>,
    ) -> Self {
        Self {
            condition,
            condition_value: condition_value.into(),
            implied,
        }
    }
}

impl Rule for ValueImpliesAttributeRequired {
    fn description(&self) -> String {
        format!(
            "If {} has the value \"{}\", then the following attributes must be configured: {}",
            self.condition,
            self.condition_value,
            expression_list(&self.implied)
        )
    }

    fn evaluate(&self, document: &dyn Document, diagnostics: &mut Diagnostics) -> Verdict {
        let expected = self.condition_value.as_str();
        match condition_matches(document, &self.condition, diagnostics, |value| value == expected)
        {
            Condition::Met => {}
            Condition::NotMet => return Verdict::Vacuous,
            Condition::Deferred => return Verdict::Deferred,
            Condition::Malformed => return Verdict::Malformed,
        }

        for expression in &self.implied {
            // Every match is scanned so a later unknown still defers the rule.
            let mut configured = false;
            let scan: Walk<()> = walk(document, expression, diagnostics, |_, _| {
                configured = true;
                Step::Continue
            });
            match scan {
                Walk::Aborted => return Verdict::Deferred,
                Walk::Malformed => return Verdict::Malformed,
                Walk::Exhausted | Walk::Found(()) if configured => {}
                Walk::Exhausted | Walk::Found(()) => {
                    let detail = format!("{} ({expression} is not configured)", self.description());
                    diagnostics.push(Diagnostic::error(MISSING_IMPLIED_ATTRIBUTE, detail));
                    return Verdict::Violated;
                }
            }
        }
        Verdict::Satisfied
    }
}
