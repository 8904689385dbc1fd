// crates/dirconf-validators/src/path.rs
// ============================================================================
// Module: Attribute Paths
// Description: Path expressions, concrete paths, and the document contract.
// Purpose: Address attributes inside a configuration document independently
//          of how the host stores that document.
// Dependencies: serde, smallvec, thiserror, crate::value
// ============================================================================

//! ## Overview
//! A [`PathExpression`] is authored once per rule and may match any number of
//! concrete [`Path`]s in a document, e.g. `servers[*].host` matches one path
//! per configured server. Hosts plug in their document representation through
//! the [`Document`] trait.
//!
//! ### Grammar
//! - `name` selects an attribute; `.name` selects a nested attribute
//! - `"a.b"` / `."a.b"` select attributes whose names are not plain
//!   identifiers (`[A-Za-z0-9_-]+`); escapes as for keys
//! - `[*]` selects every element of a list or set, or every value of a map
//! - `[3]` selects one element by position
//! - `["key"]` selects one map value (`\"` and `\\` escape inside the key)
//!
//! Security posture: expressions may come from authored rule files; parsing is
//! bounded in size and step count.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use smallvec::SmallVec;
use thiserror::Error;

use crate::value::AttributeValue;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted expression length in bytes.
const MAX_EXPRESSION_BYTES: usize = 1024;
/// Maximum number of steps in one expression.
const MAX_EXPRESSION_STEPS: usize = 32;

// ============================================================================
// SECTION: Expression Steps
// ============================================================================

/// One step of a [`PathExpression`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpressionStep {
    /// Named attribute of an object
    Attribute(String),
    /// Every element of a list/set or every value of a map
    AnyElement,
    /// Element at a fixed position
    Index(usize),
    /// Map value under a fixed key
    Key(String),
}

impl fmt::Display for ExpressionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(name) => {
                f.write_str(".")?;
                write_name(f, name)
            }
            Self::AnyElement => f.write_str("[*]"),
            Self::Index(position) => write!(f, "[{position}]"),
            Self::Key(key) => write_key(f, key),
        }
    }
}

/// One step of a concrete [`Path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Named attribute of an object
    Attribute(String),
    /// Element position in a list or set
    Index(usize),
    /// Key in a map
    Key(String),
}

// ============================================================================
// SECTION: Path Expression
// ============================================================================

/// Pattern addressing one or more attributes of a configuration document
///
/// # Invariants
/// - Contains at least one step and starts with an attribute step.
/// - Immutable once constructed; safe to share across validation runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    /// Steps applied from the document root.
    steps: SmallVec<[ExpressionStep; 4]>,
}

impl PathExpression {
    /// Creates an expression selecting a top-level attribute.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        let mut steps = SmallVec::new();
        steps.push(ExpressionStep::Attribute(name.into()));
        Self {
            steps,
        }
    }

    /// Appends a nested attribute step.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.steps.push(ExpressionStep::Attribute(name.into()));
        self
    }

    /// Appends a `[*]` step.
    #[must_use]
    pub fn any_element(mut self) -> Self {
        self.steps.push(ExpressionStep::AnyElement);
        self
    }

    /// Appends an `[index]` step.
    #[must_use]
    pub fn element(mut self, index: usize) -> Self {
        self.steps.push(ExpressionStep::Index(index));
        self
    }

    /// Appends a `["key"]` step.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.steps.push(ExpressionStep::Key(key.into()));
        self
    }

    /// Returns the expression steps in order.
    #[must_use]
    pub fn steps(&self) -> &[ExpressionStep] {
        &self.steps
    }

    /// Parses an expression from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`PathExpressionError`] when the input is empty, too large, or
    /// not valid expression syntax.
    pub fn parse(input: &str) -> Result<Self, PathExpressionError> {
        if input.trim().is_empty() {
            return Err(PathExpressionError::Empty);
        }
        if input.len() > MAX_EXPRESSION_BYTES {
            return Err(PathExpressionError::TooLarge {
                max_bytes: MAX_EXPRESSION_BYTES,
                actual_bytes: input.len(),
            });
        }
        let mut parser = Parser {
            input,
            pos: 0,
        };
        let mut steps = SmallVec::new();
        steps.push(ExpressionStep::Attribute(parser.name()?));
        while let Some(byte) = parser.peek() {
            let step = match byte {
                b'.' => {
                    parser.pos += 1;
                    ExpressionStep::Attribute(parser.name()?)
                }
                b'[' => {
                    parser.pos += 1;
                    parser.bracket()?
                }
                _ => return Err(parser.unexpected("`.` or `[`")),
            };
            steps.push(step);
            if steps.len() > MAX_EXPRESSION_STEPS {
                return Err(PathExpressionError::TooManySteps {
                    max_steps: MAX_EXPRESSION_STEPS,
                });
            }
        }
        Ok(Self {
            steps,
        })
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                ExpressionStep::Attribute(name) if index == 0 => write_name(f, name)?,
                step => write!(f, "{step}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for PathExpression {
    type Err = PathExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PathExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PathExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Expression Parser
// ============================================================================

/// Cursor over expression input.
struct Parser<'a> {
    /// Full input text.
    input: &'a str,
    /// Current byte offset; always on a char boundary.
    pos: usize,
}

impl Parser<'_> {
    /// Returns the byte at the cursor.
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Builds an unexpected-token error at the cursor.
    fn unexpected(&self, expected: &'static str) -> PathExpressionError {
        let found = self.input[self.pos ..]
            .chars()
            .next()
            .map_or_else(|| "end of input".to_string(), |ch| ch.to_string());
        PathExpressionError::UnexpectedToken {
            expected,
            found,
            position: self.pos,
        }
    }

    /// Consumes one expected byte.
    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), PathExpressionError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Reads a bare or quoted attribute name.
    fn name(&mut self) -> Result<String, PathExpressionError> {
        if self.peek() == Some(b'"') {
            self.pos += 1;
            return self.quoted();
        }
        self.identifier()
    }

    /// Reads a bare attribute name.
    fn identifier(&mut self) -> Result<String, PathExpressionError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if is_identifier_byte(byte) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.unexpected("attribute name"));
        }
        Ok(self.input[start .. self.pos].to_string())
    }

    /// Reads the inside of `[...]`, cursor positioned after `[`.
    fn bracket(&mut self) -> Result<ExpressionStep, PathExpressionError> {
        let step = match self.peek() {
            Some(b'*') => {
                self.pos += 1;
                ExpressionStep::AnyElement
            }
            Some(b'"') => {
                self.pos += 1;
                ExpressionStep::Key(self.quoted()?)
            }
            Some(byte) if byte.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                let raw = &self.input[start .. self.pos];
                let index = raw.parse::<usize>().map_err(|_| PathExpressionError::InvalidIndex {
                    raw: raw.to_string(),
                    position: start,
                })?;
                ExpressionStep::Index(index)
            }
            _ => return Err(self.unexpected("`*`, an index, or a quoted key")),
        };
        self.expect(b']', "`]`")?;
        Ok(step)
    }

    /// Reads a quoted key or name, cursor positioned after the opening quote.
    fn quoted(&mut self) -> Result<String, PathExpressionError> {
        let start = self.pos;
        let mut key = String::new();
        let mut chars = self.input[self.pos ..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '"' => {
                    self.pos = start + offset + 1;
                    return Ok(key);
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => key.push(escaped),
                    None => break,
                },
                _ => key.push(ch),
            }
        }
        Err(PathExpressionError::UnterminatedKey {
            position: start.saturating_sub(1),
        })
    }
}

/// Bytes allowed in a bare attribute name.
const fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Writes an attribute name, quoting it when it is not a bare identifier.
fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if !name.is_empty() && name.bytes().all(is_identifier_byte) {
        f.write_str(name)
    } else {
        write_quoted(f, name)
    }
}

/// Writes a `["key"]` step with escapes.
fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    f.write_str("[")?;
    write_quoted(f, key)?;
    f.write_str("]")
}

/// Writes a double-quoted string, escaping `"` and `\`.
fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    f.write_str("\"")
}

/// Errors produced while parsing a [`PathExpression`]
///
/// # Invariants
/// - Positions are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathExpressionError {
    /// Input was empty or whitespace.
    #[error("path expression is empty")]
    Empty,
    /// Input exceeded the size limit.
    #[error("path expression exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Expression has too many steps.
    #[error("path expression exceeds {max_steps} steps")]
    TooManySteps {
        /// Maximum allowed steps.
        max_steps: usize,
    },
    /// Unexpected character.
    #[error("unexpected `{found}` at {position}, expected {expected}")]
    UnexpectedToken {
        /// What the parser expected.
        expected: &'static str,
        /// What it found.
        found: String,
        /// Byte offset.
        position: usize,
    },
    /// Index literal does not fit in `usize`.
    #[error("invalid index `{raw}` at {position}")]
    InvalidIndex {
        /// Raw digits.
        raw: String,
        /// Byte offset.
        position: usize,
    },
    /// Quoted key or name without closing quote.
    #[error("unterminated key starting at {position}")]
    UnterminatedKey {
        /// Byte offset of the opening quote.
        position: usize,
    },
}

// ============================================================================
// SECTION: Concrete Path
// ============================================================================

/// Resolved location of one attribute inside one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    /// Steps from the document root.
    steps: SmallVec<[PathStep; 4]>,
}

impl Path {
    /// Returns the document root path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path extended by one step.
    #[must_use]
    pub fn join(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            steps,
        }
    }

    /// Returns the path steps in order.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Returns true for the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(steps: I) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("(root)");
        }
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if index == 0 => write_name(f, name)?,
                PathStep::Attribute(name) => {
                    f.write_str(".")?;
                    write_name(f, name)?;
                }
                PathStep::Index(position) => write!(f, "[{position}]")?,
                PathStep::Key(key) => write_key(f, key)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// SECTION: Document Contract
// ============================================================================

/// Errors reported by a [`Document`] while resolving an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Expression names an attribute the object does not declare.
    #[error("attribute `{name}` is not declared at {path}")]
    UnknownAttribute {
        /// Object the lookup was applied to.
        path: Path,
        /// Missing attribute name.
        name: String,
    },
    /// Step cannot be applied to the value it reached.
    #[error("cannot apply `{step}` to {found} value at {path}")]
    NotTraversable {
        /// Location of the value.
        path: Path,
        /// Offending step rendered as text.
        step: String,
        /// Type label of the value.
        found: &'static str,
    },
    /// Host-specific resolution failure.
    #[error("path resolution failed: {0}")]
    Collaborator(String),
}

/// Configuration document the rules read from
///
/// Implementations must be deterministic: the same document and expression
/// always resolve to the same paths in the same order. Rules treat that order
/// as significant.
pub trait Document {
    /// Resolves an expression to the concrete paths it matches, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the expression cannot be applied to this document.
    fn resolve(&self, expression: &PathExpression) -> Result<Vec<Path>, ResolveError>;

    /// Reads the value at a resolved path. Absence reads as `Null`.
    fn value(&self, path: &Path) -> AttributeValue;
}
