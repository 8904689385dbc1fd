// crates/dirconf-config/src/config.rs
// ============================================================================
// Module: Dirconf Configuration
// Description: Configuration loading and validation for rule catalogs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: dirconf-validators, serde, toml, tracing
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! It declares engine settings and, per configuration-object type, the rules
//! to run. Missing or invalid configuration fails closed.
//! Security posture: config inputs are untrusted; every rule spec is
//! validated before a catalog is built from it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use dirconf_validators::EvaluationMode;
use dirconf_validators::RuleSpec;
use dirconf_validators::RuleSpecValidator;
use dirconf_validators::SpecConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "dirconf.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "DIRCONF_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of object types in one catalog.
pub(crate) const MAX_OBJECT_TYPES: usize = 512;
/// Maximum length of an object type name.
pub(crate) const MAX_OBJECT_TYPE_NAME_LENGTH: usize = 128;
/// Default maximum nesting depth of composite rules.
pub(crate) const DEFAULT_MAX_RULE_DEPTH: usize = 8;
/// Upper bound accepted for `validation.max_rule_depth`.
pub(crate) const MAX_RULE_DEPTH_LIMIT: usize = 32;
/// Default maximum number of rules per object type.
pub(crate) const DEFAULT_MAX_RULES_PER_TYPE: usize = 256;
/// Upper bound accepted for `validation.max_rules_per_type`.
pub(crate) const MAX_RULES_PER_TYPE_LIMIT: usize = 4096;
/// Default maximum entries in a rule value list.
pub(crate) const DEFAULT_MAX_VALUES: usize = 256;
/// Upper bound accepted for `validation.max_values`.
pub(crate) const MAX_VALUES_LIMIT: usize = 4096;
/// Default maximum implied targets of one rule.
pub(crate) const DEFAULT_MAX_TARGETS: usize = 64;
/// Upper bound accepted for `validation.max_targets`.
pub(crate) const MAX_TARGETS_LIMIT: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Dirconf rule catalog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirconfConfig {
    /// Engine settings and rule limits.
    #[serde(default)]
    pub validation: ValidationSettings,
    /// Rule lists keyed by configuration object type.
    #[serde(default)]
    pub object_types: Vec<ObjectTypeConfig>,
}

impl DirconfConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = config_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml_str(content)?;
        tracing::debug!(
            path = %resolved.display(),
            object_types = config.object_types.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validation.validate()?;
        if self.object_types.len() > MAX_OBJECT_TYPES {
            return Err(ConfigError::Invalid(format!(
                "object_types exceeds max entries ({MAX_OBJECT_TYPES})"
            )));
        }
        let validator = RuleSpecValidator::new(self.spec_config());
        let mut seen = BTreeSet::new();
        for object_type in &self.object_types {
            object_type.validate(&self.validation, &validator)?;
            if !seen.insert(object_type.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate object type: {}",
                    object_type.name
                )));
            }
        }
        Ok(())
    }

    /// Rule spec limits derived from the validation settings.
    #[must_use]
    pub fn spec_config(&self) -> SpecConfig {
        SpecConfig {
            max_depth: self.validation.max_rule_depth,
            max_values: self.validation.max_values,
            max_targets: self.validation.max_targets,
            validate_on_deserialize: true,
        }
    }

    /// Returns the entry for an object type, if configured.
    #[must_use]
    pub fn object_type(&self, name: &str) -> Option<&ObjectTypeConfig> {
        self.object_types.iter().find(|object_type| object_type.name == name)
    }
}

/// Engine settings and rule limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSettings {
    /// Rule scheduling mode for every rule set.
    #[serde(default)]
    pub mode: EvaluationMode,
    /// Maximum nesting depth of composite rules.
    #[serde(default = "default_max_rule_depth")]
    pub max_rule_depth: usize,
    /// Maximum number of rules per object type.
    #[serde(default = "default_max_rules_per_type")]
    pub max_rules_per_type: usize,
    /// Maximum entries in `allowed_values` and `condition_values`.
    #[serde(default = "default_max_values")]
    pub max_values: usize,
    /// Maximum implied targets of a `value_implies_required` rule.
    #[serde(default = "default_max_targets")]
    pub max_targets: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            mode: EvaluationMode::default(),
            max_rule_depth: default_max_rule_depth(),
            max_rules_per_type: default_max_rules_per_type(),
            max_values: default_max_values(),
            max_targets: default_max_targets(),
        }
    }
}

impl ValidationSettings {
    /// Validates limit ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_limit("validation.max_rule_depth", self.max_rule_depth, MAX_RULE_DEPTH_LIMIT)?;
        validate_limit(
            "validation.max_rules_per_type",
            self.max_rules_per_type,
            MAX_RULES_PER_TYPE_LIMIT,
        )?;
        validate_limit("validation.max_values", self.max_values, MAX_VALUES_LIMIT)?;
        validate_limit("validation.max_targets", self.max_targets, MAX_TARGETS_LIMIT)
    }
}

/// Rules registered for one configuration object type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectTypeConfig {
    /// Object type name, e.g. `identity_provider`.
    pub name: String,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl ObjectTypeConfig {
    /// Validates the name, rule count, and every rule spec.
    fn validate(
        &self,
        settings: &ValidationSettings,
        validator: &RuleSpecValidator,
    ) -> Result<(), ConfigError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("object_types.name must be non-empty".to_string()));
        }
        if name != self.name {
            return Err(ConfigError::Invalid(format!(
                "object_types.name must not have surrounding whitespace: `{}`",
                self.name
            )));
        }
        if name.len() > MAX_OBJECT_TYPE_NAME_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "object_types.name exceeds max length ({MAX_OBJECT_TYPE_NAME_LENGTH})"
            )));
        }
        if self.rules.len() > settings.max_rules_per_type {
            return Err(ConfigError::Invalid(format!(
                "object type {name} has {} rules (max {})",
                self.rules.len(),
                settings.max_rules_per_type
            )));
        }
        for (index, rule) in self.rules.iter().enumerate() {
            validator.validate(rule).map_err(|err| {
                ConfigError::Invalid(format!("object type {name} rules[{index}]: {err}"))
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default for `validation.max_rule_depth`.
const fn default_max_rule_depth() -> usize {
    DEFAULT_MAX_RULE_DEPTH
}

/// Default for `validation.max_rules_per_type`.
const fn default_max_rules_per_type() -> usize {
    DEFAULT_MAX_RULES_PER_TYPE
}

/// Default for `validation.max_values`.
const fn default_max_values() -> usize {
    DEFAULT_MAX_VALUES
}

/// Default for `validation.max_targets`.
const fn default_max_targets() -> usize {
    DEFAULT_MAX_TARGETS
}

/// Checks that a limit is positive and within its hard cap.
fn validate_limit(field: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    if value > max {
        return Err(ConfigError::Invalid(format!("{field} must be at most {max}")));
    }
    Ok(())
}

/// Picks the config file (explicit path, then a non-empty `DIRCONF_CONFIG`,
/// then the default name) and bounds its length.
fn config_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let resolved = match path {
        Some(path) => path.to_path_buf(),
        None => env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from),
    };
    if resolved.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    let oversized = resolved
        .components()
        .any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH);
    if oversized {
        return Err(ConfigError::Invalid("config path component too long".to_string()));
    }
    Ok(resolved)
}
