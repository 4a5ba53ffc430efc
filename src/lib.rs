//! Armature - declarative cluster definitions to cloud deployment templates
//!
//! Armature turns a JSON cluster definition (orchestrator type and version,
//! master profile, agent pools) into a ready-to-submit deployment template.
//! When the target orchestrator bootstraps trust over mutual TLS, it also
//! mints a self-contained PKI bundle (CA plus API-server and client leaf
//! certificates) and embeds the material into the master provisioning data.
//!
//! # Pipeline
//!
//! raw JSON → parse/default/validate → (if secure) mint PKI bundle →
//! assemble document sections → expand base template → output text.
//!
//! # Modules
//!
//! - [`model`] - Validated, defaulted cluster definition model
//! - [`assets`] - Template parts loading and required-asset pre-flight
//! - [`pki`] - PKI bundle generation (CA + leaf certificates)
//! - [`names`] - Azure endpoint naming helpers
//! - [`template`] - Document assembly and base-template rendering
//! - [`pipeline`] - End-to-end generation wiring
//! - [`error`] - Error types for the generator

#![deny(missing_docs)]

pub mod assets;
pub mod error;
pub mod model;
pub mod names;
pub mod pipeline;
pub mod pki;
pub mod template;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
