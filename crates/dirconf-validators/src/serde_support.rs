// crates/dirconf-validators/src/serde_support.rs
// ============================================================================
// Module: Rule Specs
// Description: Declarative, serializable form of the validation rules.
// Purpose: Let rule lists be authored as data (JSON, RON, TOML) and
//          validated before they are turned into runtime rules.
// Dependencies: crate::{path, rules}, serde, serde_json, ron, thiserror
// ============================================================================

//! ## Overview
//! [`RuleSpec`] mirrors the four rule kinds with path expressions in their
//! textual form. Specs are validated against [`SpecConfig`] limits and then
//! built into boxed [`Rule`]s.
//! Security posture: authored specs are untrusted; validate and fail closed
//! before building.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::path::PathExpression;
use crate::rules::Implies;
use crate::rules::ImpliesOtherAttributeOneOfString;
use crate::rules::ImpliesOtherValidator;
use crate::rules::Rule;
use crate::rules::ValueImpliesAttributeRequired;

// ============================================================================
// SECTION: Rule Spec
// ============================================================================

/// Declarative rule definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum RuleSpec {
    /// See [`Implies`]
    Implies {
        /// Triggering attribute(s).
        condition: PathExpression,
        /// Attribute(s) that must then be configured.
        implied: PathExpression,
    },
    /// See [`ImpliesOtherAttributeOneOfString`]
    ImpliesOneOf {
        /// Triggering attribute(s).
        condition: PathExpression,
        /// Constrained attribute.
        implied: PathExpression,
        /// Accepted values.
        allowed_values: Vec<String>,
    },
    /// See [`ImpliesOtherValidator`]
    ImpliesOtherValidator {
        /// Discriminator attribute(s).
        condition: PathExpression,
        /// Values that activate the nested rule.
        condition_values: Vec<String>,
        /// Nested rule.
        implied: Box<Self>,
    },
    /// See [`ValueImpliesAttributeRequired`]
    ValueImpliesRequired {
        /// Discriminator attribute(s).
        condition: PathExpression,
        /// Value that activates the requirement.
        condition_value: String,
        /// Attributes that must then be configured.
        implied: Vec<PathExpression>,
    },
}

impl RuleSpec {
    /// Builds the runtime rule.
    #[must_use]
    pub fn build(&self) -> Box<dyn Rule> {
        match self {
            Self::Implies {
                condition,
                implied,
            } => Box::new(Implies::new(condition.clone(), implied.clone())),
            Self::ImpliesOneOf {
                condition,
                implied,
                allowed_values,
            } => Box::new(ImpliesOtherAttributeOneOfString::new(
                condition.clone(),
                implied.clone(),
                allowed_values.iter().cloned(),
            )),
            Self::ImpliesOtherValidator {
                condition,
                condition_values,
                implied,
            } => Box::new(ImpliesOtherValidator::new(
                condition.clone(),
                condition_values.iter().cloned(),
                implied.build(),
            )),
            Self::ValueImpliesRequired {
                condition,
                condition_value,
                implied,
            } => Box::new(ValueImpliesAttributeRequired::new(
                condition.clone(),
                condition_value.clone(),
                implied.clone(),
            )),
        }
    }

    /// Nesting depth; a rule without nested rules has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::ImpliesOtherValidator {
                implied, ..
            } => 1 + implied.depth(),
            Self::Implies {
                ..
            }
            | Self::ImpliesOneOf {
                ..
            }
            | Self::ValueImpliesRequired {
                ..
            } => 1,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while decoding or validating rule specs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Input could not be decoded.
    #[error("rule spec parse error: {0}")]
    Parse(String),
    /// Spec could not be encoded.
    #[error("rule spec serialize error: {0}")]
    Serialize(String),
    /// Nested rules exceed the depth limit.
    #[error("rule spec too deep: {actual_depth} levels (max {max_depth})")]
    TooDeep {
        /// Maximum supported depth.
        max_depth: usize,
        /// Depth encountered.
        actual_depth: usize,
    },
    /// A list that must contain entries is empty.
    #[error("{field} must not be empty")]
    EmptyList {
        /// Offending field.
        field: &'static str,
    },
    /// A list exceeds its size limit.
    #[error("{field} has {actual} entries (max {max})")]
    TooManyEntries {
        /// Offending field.
        field: &'static str,
        /// Maximum allowed entries.
        max: usize,
        /// Entries provided.
        actual: usize,
    },
    /// A string literal is empty.
    #[error("{field} must not contain empty strings")]
    EmptyValue {
        /// Offending field.
        field: &'static str,
    },
}

// ============================================================================
// SECTION: Spec Configuration
// ============================================================================

/// Limits applied to authored rule specs
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecConfig {
    /// Maximum nesting depth of composite rules.
    pub max_depth: usize,
    /// Maximum entries in a value list.
    pub max_values: usize,
    /// Maximum implied targets of a value-implies-required rule.
    pub max_targets: usize,
    /// Whether decoding validates automatically.
    pub validate_on_deserialize: bool,
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_values: 256,
            max_targets: 64,
            validate_on_deserialize: true,
        }
    }
}

// ============================================================================
// SECTION: Spec Validator
// ============================================================================

/// Structural validator for rule specs
#[derive(Debug, Clone, Default)]
pub struct RuleSpecValidator {
    /// Limits used for every check.
    config: SpecConfig,
}

impl RuleSpecValidator {
    /// Creates a validator with the given limits.
    #[must_use]
    pub const fn new(config: SpecConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the configured limits.
    #[must_use]
    pub const fn config(&self) -> &SpecConfig {
        &self.config
    }

    /// Validates one spec, including nested specs.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when the spec violates a structural limit.
    pub fn validate(&self, spec: &RuleSpec) -> Result<(), SpecError> {
        let depth = spec.depth();
        if depth > self.config.max_depth {
            return Err(SpecError::TooDeep {
                max_depth: self.config.max_depth,
                actual_depth: depth,
            });
        }
        self.validate_fields(spec)
    }

    /// Validates every spec in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`SpecError`] encountered.
    pub fn validate_all(&self, specs: &[RuleSpec]) -> Result<(), SpecError> {
        specs.iter().try_for_each(|spec| self.validate(spec))
    }

    /// Field-level checks, recursing into nested specs.
    fn validate_fields(&self, spec: &RuleSpec) -> Result<(), SpecError> {
        match spec {
            RuleSpec::Implies {
                ..
            } => Ok(()),
            RuleSpec::ImpliesOneOf {
                allowed_values, ..
            } => self.check_values("allowed_values", allowed_values),
            RuleSpec::ImpliesOtherValidator {
                condition_values,
                implied,
                ..
            } => {
                self.check_values("condition_values", condition_values)?;
                self.validate_fields(implied)
            }
            RuleSpec::ValueImpliesRequired {
                condition_value,
                implied,
                ..
            } => {
                if condition_value.is_empty() {
                    return Err(SpecError::EmptyValue {
                        field: "condition_value",
                    });
                }
                check_len("implied", implied.len(), self.config.max_targets)
            }
        }
    }

    /// Checks a string list for emptiness and size.
    fn check_values(&self, field: &'static str, values: &[String]) -> Result<(), SpecError> {
        check_len(field, values.len(), self.config.max_values)?;
        if values.iter().any(String::is_empty) {
            return Err(SpecError::EmptyValue {
                field,
            });
        }
        Ok(())
    }
}

/// Checks that a list is non-empty and within `max`.
const fn check_len(field: &'static str, actual: usize, max: usize) -> Result<(), SpecError> {
    if actual == 0 {
        return Err(SpecError::EmptyList {
            field,
        });
    }
    if actual > max {
        return Err(SpecError::TooManyEntries {
            field,
            max,
            actual,
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Encodes and decodes rule specs, validating on the way in
#[derive(Debug, Clone, Default)]
pub struct RuleSpecCodec {
    /// Validator applied to decoded specs.
    validator: RuleSpecValidator,
}

impl RuleSpecCodec {
    /// Creates a codec with the given limits.
    #[must_use]
    pub const fn new(config: SpecConfig) -> Self {
        Self {
            validator: RuleSpecValidator::new(config),
        }
    }

    /// Decodes a list of specs from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when decoding or validation fails.
    pub fn from_json(&self, input: &str) -> Result<Vec<RuleSpec>, SpecError> {
        let specs: Vec<RuleSpec> =
            serde_json::from_str(input).map_err(|err| SpecError::Parse(err.to_string()))?;
        self.checked(specs)
    }

    /// Encodes specs as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when encoding fails.
    pub fn to_json(&self, specs: &[RuleSpec]) -> Result<String, SpecError> {
        serde_json::to_string_pretty(specs).map_err(|err| SpecError::Serialize(err.to_string()))
    }

    /// Decodes a list of specs from RON, the preferred authoring format.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when decoding or validation fails.
    pub fn from_ron(&self, input: &str) -> Result<Vec<RuleSpec>, SpecError> {
        let specs: Vec<RuleSpec> =
            ron::from_str(input).map_err(|err| SpecError::Parse(err.to_string()))?;
        self.checked(specs)
    }

    /// Encodes specs as pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when encoding fails.
    pub fn to_ron(&self, specs: &[RuleSpec]) -> Result<String, SpecError> {
        ron::ser::to_string_pretty(specs, ron::ser::PrettyConfig::default())
            .map_err(|err| SpecError::Serialize(err.to_string()))
    }

    /// Applies validation when enabled.
    fn checked(&self, specs: Vec<RuleSpec>) -> Result<Vec<RuleSpec>, SpecError> {
        if self.validator.config().validate_on_deserialize {
            self.validator.validate_all(&specs)?;
        }
        Ok(specs)
    }
}
