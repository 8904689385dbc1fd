// crates/dirconf-config/src/lib.rs
// ============================================================================
// Module: Dirconf Config Library
// Description: Rule catalog configuration model, validation, and catalogs.
// Purpose: Single source of truth for dirconf.toml semantics.
// Dependencies: dirconf-validators, serde, toml
// ============================================================================

//! ## Overview
//! `dirconf-config` loads the TOML file that registers rules per
//! configuration-object type, validates it fail-closed, and turns it into a
//! [`RuleCatalog`] that validates documents by type.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::CatalogError;
pub use catalog::RuleCatalog;
pub use config::ConfigError;
pub use config::DirconfConfig;
pub use config::ObjectTypeConfig;
pub use config::ValidationSettings;
