// crates/dirconf-validators/src/walk.rs
// ============================================================================
// Module: Path Walk
// Description: Shared tri-state scan over the paths an expression matches.
// Purpose: Implement the unknown-aborts / null-continues / present-decides
//          state machine once for every rule kind.
// Dependencies: crate::{diagnostics, path, value}, tracing
// ============================================================================

//! ## Overview
//! Every rule scans resolved paths in resolver order:
//!
//! | next value | transition |
//! |---|---|
//! | `Unknown` | `Aborted` (terminal, silent) |
//! | `Null` | keep scanning |
//! | `Present` | rule-specific [`Step`]: keep scanning or stop with a result |
//! | no more paths | `Exhausted` |
//!
//! Resolution failures are appended as diagnostics and reported as
//! [`Walk::Malformed`]; only the rule that triggered them stops.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ops::ControlFlow;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::Diagnostics;
use crate::diagnostics::INVALID_PATH_EXPRESSION;
use crate::path::Document;
use crate::path::Path;
use crate::path::PathExpression;
use crate::value::AttributeValue;
use crate::value::Payload;

// ============================================================================
// SECTION: Walk States
// ============================================================================

/// Decision a rule makes about one present value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// Keep scanning the remaining paths
    Continue,
    /// Stop scanning and report `T`
    Stop(T),
}

/// Terminal state of a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Walk<T> {
    /// A present value stopped the scan
    Found(T),
    /// Every path was scanned without a stop
    Exhausted,
    /// An unknown value was reached before any stop
    Aborted,
    /// The expression failed to resolve; a diagnostic was appended
    Malformed,
}

// ============================================================================
// SECTION: Walk Helpers
// ============================================================================

/// Resolves `expression` and walks the matched paths.
///
/// Appends an [`INVALID_PATH_EXPRESSION`] diagnostic when resolution fails.
pub fn walk<T, F>(
    document: &dyn Document,
    expression: &PathExpression,
    diagnostics: &mut Diagnostics,
    step: F,
) -> Walk<T>
where
    F: FnMut(&Path, &Payload) -> Step<T>,
{
    match document.resolve(expression) {
        Ok(paths) => walk_paths(document, &paths, step),
        Err(err) => {
            tracing::warn!(
                expression = %expression,
                error = %err,
                "path expression failed to resolve"
            );
            diagnostics.push(Diagnostic::error(
                INVALID_PATH_EXPRESSION,
                format!("could not resolve `{expression}`: {err}"),
            ));
            Walk::Malformed
        }
    }
}

/// Walks already-resolved paths in the given order.
pub fn walk_paths<T, F>(document: &dyn Document, paths: &[Path], mut step: F) -> Walk<T>
where
    F: FnMut(&Path, &Payload) -> Step<T>,
{
    let flow = paths.iter().try_for_each(|path| match document.value(path) {
        AttributeValue::Unknown => ControlFlow::Break(Walk::Aborted),
        AttributeValue::Null => ControlFlow::Continue(()),
        AttributeValue::Present(payload) => match step(path, &payload) {
            Step::Continue => ControlFlow::Continue(()),
            Step::Stop(found) => ControlFlow::Break(Walk::Found(found)),
        },
    });
    match flow {
        ControlFlow::Break(terminal) => terminal,
        ControlFlow::Continue(()) => Walk::Exhausted,
    }
}
