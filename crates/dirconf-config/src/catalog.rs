// crates/dirconf-config/src/catalog.rs
// ============================================================================
// Module: Rule Catalog
// Description: Rule sets built from configuration, keyed by object type.
// Purpose: Build every rule set once and route documents to the right one.
// Dependencies: crate::config, dirconf-validators, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`RuleCatalog`] is the rule-registration collaborator: it owns one
//! immutable [`RuleSet`] per configured object type and validates documents
//! by type name. Catalogs are only built from validated configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use dirconf_validators::Diagnostics;
use dirconf_validators::Document;
use dirconf_validators::RuleSet;
use dirconf_validators::RuleSpec;
use thiserror::Error;

use crate::config::ConfigError;
use crate::config::DirconfConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when routing a document through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No rules are registered for the object type.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Immutable rule sets keyed by configuration object type.
pub struct RuleCatalog {
    /// Rule sets by object type name.
    sets: BTreeMap<String, RuleSet>,
}

impl RuleCatalog {
    /// Validates `config` and builds one rule set per object type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn from_config(config: &DirconfConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = config.validation.mode;
        let sets = config
            .object_types
            .iter()
            .map(|object_type| {
                let rules = object_type.rules.iter().map(RuleSpec::build).collect();
                let set = RuleSet::new(rules).with_mode(mode);
                tracing::debug!(
                    object_type = %object_type.name,
                    rules = set.len(),
                    "rule set built"
                );
                (object_type.name.clone(), set)
            })
            .collect();
        Ok(Self {
            sets,
        })
    }

    /// Object type names, sorted.
    pub fn object_types(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Returns the rule set for an object type.
    #[must_use]
    pub fn rule_set(&self, object_type: &str) -> Option<&RuleSet> {
        self.sets.get(object_type)
    }

    /// Validates a document of the given type into a fresh sink.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownObjectType`] when the type has no entry.
    pub fn validate(
        &self,
        object_type: &str,
        document: &(dyn Document + Sync),
    ) -> Result<Diagnostics, CatalogError> {
        let mut diagnostics = Diagnostics::new();
        self.check(object_type, document, &mut diagnostics)?;
        Ok(diagnostics)
    }

    /// Validates a document of the given type, appending to `diagnostics`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownObjectType`] when the type has no entry.
    pub fn check(
        &self,
        object_type: &str,
        document: &(dyn Document + Sync),
        diagnostics: &mut Diagnostics,
    ) -> Result<(), CatalogError> {
        let set = self
            .rule_set(object_type)
            .ok_or_else(|| CatalogError::UnknownObjectType(object_type.to_string()))?;
        set.check(document, diagnostics);
        Ok(())
    }
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.sets.iter().map(|(name, set)| (name, set.len()))).finish()
    }
}
