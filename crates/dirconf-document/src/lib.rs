// crates/dirconf-document/src/lib.rs
// ============================================================================
// Module: Dirconf Document Root
// Description: Reference configuration document for the validation engine.
// Purpose: Provide path resolution and value reads over an in-memory tree.
// Dependencies: crate::{builder, document, json}
// ============================================================================

//! ## Overview
//! `dirconf-document` implements [`dirconf_validators::Document`] for a
//! configuration object held in memory, built either with
//! [`DocumentBuilder`] or from a JSON plan value.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod builder;
pub mod document;
pub mod json;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::DocumentBuilder;
pub use document::ConfigDocument;
pub use document::UndeclaredAttributes;
pub use json::DocumentError;
pub use json::MAX_DOCUMENT_BYTES;
pub use json::MAX_DOCUMENT_DEPTH;
