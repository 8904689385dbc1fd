// crates/dirconf-validators/src/diagnostics.rs
// ============================================================================
// Module: Diagnostics
// Description: Append-only collection of validation findings.
// Purpose: Carry rule failures to the host without aborting validation.
// Dependencies: serde, crate::path
// ============================================================================

//! ## Overview
//! Rules report failures only by appending a [`Diagnostic`]; they never return
//! errors. The host decides whether the operation is blocked, by convention
//! whenever [`Diagnostics::has_errors`] is true after all rules have run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

use crate::path::Path;

// ============================================================================
// SECTION: Summaries
// ============================================================================

/// Summary for a required attribute that is not configured.
pub const MISSING_IMPLIED_ATTRIBUTE: &str = "Missing Implied Attribute Configuration";
/// Summary for a configured attribute holding a disallowed value.
pub const INVALID_ATTRIBUTE_COMBINATION: &str = "Invalid Attribute Combination";
/// Summary for a value that was expected to be a string.
pub const INVALID_ATTRIBUTE_TYPE: &str = "Invalid Attribute Type";
/// Summary for an expression the document could not resolve.
pub const INVALID_PATH_EXPRESSION: &str = "Invalid Attribute Path Expression";
/// Summary appended by a composite rule when its nested rule fails.
pub const IMPLIED_VALIDATOR_FAILED: &str = "Implied Validator Check Failed";

/// Detail prefix for a configured attribute holding a disallowed value.
pub const DISALLOWED_VALUE_DETAIL: &str =
    "condition attribute is configured but implied attribute does not have an allowed value";
/// Detail prefix appended by a composite rule when its nested rule fails.
pub const IMPLIED_VALIDATOR_DETAIL: &str =
    "condition attribute is present but implied validator check failed";

// ============================================================================
// SECTION: Diagnostic
// ============================================================================

/// Severity of a diagnostic
///
/// The validators only emit `Error`; `Warning` exists so hosts can share one sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the surrounding operation
    Error,
    /// Informational finding
    Warning,
}

impl Severity {
    /// Returns a stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity of the finding.
    pub severity: Severity,
    /// Short title.
    pub summary: String,
    /// Human-readable explanation.
    pub detail: String,
    /// Attribute the finding concerns, when one can be named.
    pub attribute: Option<Path>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    /// Creates a warning diagnostic; warnings never block an operation.
    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary, detail)
        }
    }

    /// Attaches the attribute path the finding concerns.
    #[must_use]
    pub fn at(mut self, path: Path) -> Self {
        self.attribute = Some(path);
        self
    }

    /// Returns true for error severity.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity.as_str(), self.summary, self.detail)?;
        if let Some(path) = &self.attribute {
            write!(f, " (at {path})")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Append-only diagnostic sink owned by the caller of a validation pass
///
/// # Invariants
/// - Entries are only ever appended, never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    /// Findings in append order.
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends one finding.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Appends an error with the given summary and detail.
    pub fn error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    /// Appends every finding from another sink, preserving order.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of error-severity findings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    /// Returns true when at least one error was appended.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_error)
    }

    /// Iterates findings in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Consumes the sink, returning the findings.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
