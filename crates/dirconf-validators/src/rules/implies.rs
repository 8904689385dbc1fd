// crates/dirconf-validators/src/rules/implies.rs
// ============================================================================
// Module: Implies Rule
// Description: "If A is configured, B must be configured."
// Dependencies: crate::{diagnostics, path, walk}
// ============================================================================

use super::Condition;
use super::Rule;
use super::Verdict;
use super::condition_configured;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::Diagnostics;
use crate::diagnostics::MISSING_IMPLIED_ATTRIBUTE;
use crate::path::Document;
use crate::path::PathExpression;
use crate::walk::Step;
use crate::walk::Walk;
use crate::walk::walk;

/// Requires `implied` to be configured whenever `condition` is configured
///
/// The first present condition match decides; an unknown value met before
/// that defers the whole rule. On the implied side any present match
/// satisfies the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implies {
    /// Attribute(s) whose presence triggers the rule.
    condition: PathExpression,
    /// Attribute(s) that must then be present.
    implied: PathExpression,
}

impl Implies {
    /// Creates the rule.
    #[must_use]
    pub const fn new(condition: PathExpression, implied: PathExpression) -> Self {
        Self {
            condition,
            implied,
        }
    }
}

impl Rule for Implies {
    fn description(&self) -> String {
        format!("If {} is configured, then {} must also be configured", self.condition, self.implied)
    }

    fn evaluate(&self, document: &dyn Document, diagnostics: &mut Diagnostics) -> Verdict {
        match condition_configured(document, &self.condition, diagnostics) {
            Condition::Met => {}
            Condition::NotMet => return Verdict::Vacuous,
            Condition::Deferred => return Verdict::Deferred,
            Condition::Malformed => return Verdict::Malformed,
        }

        match walk(document, &self.implied, diagnostics, |_, _| Step::Stop(())) {
            Walk::Found(()) => Verdict::Satisfied,
            Walk::Aborted => Verdict::Deferred,
            Walk::Malformed => Verdict::Malformed,
            Walk::Exhausted => {
                diagnostics.push(Diagnostic::error(MISSING_IMPLIED_ATTRIBUTE, self.description()));
                Verdict::Violated
            }
        }
    }
}
