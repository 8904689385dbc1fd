// crates/dirconf-validators/src/runner.rs
// ============================================================================
// Module: Rule Set Runner
// Description: Runs every rule registered for one configuration object type.
// Purpose: Merge per-rule diagnostics deterministically, sequentially or on
//          a rayon pool, with an optional trace hook.
// Dependencies: crate::{diagnostics, path, rules}, rayon, serde, tracing
// ============================================================================

//! ## Overview
//! A [`RuleSet`] is built once per object type and run against every document
//! of that type. Rules are independent, so parallel evaluation is allowed;
//! each rule then writes to its own sink and the sinks are merged in
//! declaration order, which keeps the output identical to sequential mode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rayon::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::path::Document;
use crate::rules::Rule;
use crate::rules::Verdict;

// ============================================================================
// SECTION: Evaluation Mode
// ============================================================================

/// How a [`RuleSet`] schedules its rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// One rule after another on the calling thread
    #[default]
    Sequential,
    /// Rules spread over the rayon global pool
    Parallel,
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Trace hook invoked once per top-level rule, in declaration order
pub trait ValidationTrace {
    /// Called after a rule has been evaluated
    fn on_rule_evaluated(&mut self, index: usize, rule: &dyn Rule, verdict: Verdict, appended: usize);
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default)]
pub struct NoopTrace;

impl ValidationTrace for NoopTrace {
    fn on_rule_evaluated(
        &mut self,
        _index: usize,
        _rule: &dyn Rule,
        _verdict: Verdict,
        _appended: usize,
    ) {
    }
}

// ============================================================================
// SECTION: Rule Set
// ============================================================================

/// Ordered, immutable list of rules for one configuration object type
pub struct RuleSet {
    /// Rules in declaration order.
    rules: Vec<Box<dyn Rule>>,
    /// Scheduling mode.
    mode: EvaluationMode,
}

impl RuleSet {
    /// Creates a sequential rule set.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            mode: EvaluationMode::Sequential,
        }
    }

    /// Sets the scheduling mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the scheduling mode.
    #[must_use]
    pub const fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule descriptions in declaration order.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.description()).collect()
    }

    /// Runs every rule and returns a fresh sink with the findings.
    #[must_use]
    pub fn validate(&self, document: &(dyn Document + Sync)) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        self.check(document, &mut diagnostics);
        diagnostics
    }

    /// Runs every rule, appending findings to `diagnostics`.
    pub fn check(&self, document: &(dyn Document + Sync), diagnostics: &mut Diagnostics) {
        self.check_with_trace(document, diagnostics, &mut NoopTrace);
    }

    /// Runs every rule and reports each outcome to `trace`.
    pub fn check_with_trace<T: ValidationTrace>(
        &self,
        document: &(dyn Document + Sync),
        diagnostics: &mut Diagnostics,
        trace: &mut T,
    ) {
        match self.mode {
            EvaluationMode::Sequential => {
                for (index, rule) in self.rules.iter().enumerate() {
                    let before = diagnostics.len();
                    let verdict = rule.evaluate(document, diagnostics);
                    record(trace, index, rule.as_ref(), verdict, diagnostics.len() - before);
                }
            }
            EvaluationMode::Parallel => {
                let outcomes: Vec<(Verdict, Diagnostics)> = self
                    .rules
                    .par_iter()
                    .map(|rule| {
                        let mut local = Diagnostics::new();
                        let verdict = rule.evaluate(document, &mut local);
                        (verdict, local)
                    })
                    .collect();
                for (index, (rule, (verdict, local))) in
                    self.rules.iter().zip(outcomes).enumerate()
                {
                    record(trace, index, rule.as_ref(), verdict, local.len());
                    diagnostics.extend(local);
                }
            }
        }
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.descriptions())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Logs and traces one rule outcome.
fn record<T: ValidationTrace>(
    trace: &mut T,
    index: usize,
    rule: &dyn Rule,
    verdict: Verdict,
    appended: usize,
) {
    tracing::debug!(rule = index, verdict = verdict.as_str(), appended, "rule evaluated");
    trace.on_rule_evaluated(index, rule, verdict, appended);
}
