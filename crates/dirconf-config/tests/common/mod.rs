// crates/dirconf-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for dirconf-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use dirconf_config::ConfigError;
use dirconf_config::DirconfConfig;

/// Test result carrying a readable failure message.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `DirconfConfig` without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<DirconfConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<DirconfConfig, toml::de::Error> {
    config_from_toml("")
}

/// Identity provider catalog used across suites.
pub const IDENTITY_PROVIDER_TOML: &str = r#"
[validation]
mode = "parallel"

[[object_types]]
name = "identity_provider"

[[object_types.rules]]
kind = "value_implies_required"
condition = "type"
condition_value = "openid-connect"
implied = ["allowed_signing_algorithm"]

[[object_types.rules]]
kind = "implies_other_validator"
condition = "type"
condition_values = ["ldap-pass-through"]

[object_types.rules.implied]
kind = "implies"
condition = "search_base"
implied = "search_filter"

[[object_types]]
name = "gauge"

[[object_types.rules]]
kind = "implies_one_of"
condition = "data_orientation"
implied = "type"
allowed_values = ["numeric"]
"#;

/// Checks that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
