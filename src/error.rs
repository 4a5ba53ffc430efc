//! Error types for template generation

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for armature operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An unreadable file or directory
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path of the file or directory that could not be read
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON cluster definition
    #[error("parse error: {0}")]
    Parse(String),

    /// A cluster-definition invariant was violated
    #[error("validation error: {field}: {constraint}")]
    Validation {
        /// JSON field path of the offending value (e.g. `agentPoolProfiles[2].count`)
        field: String,
        /// Human-readable constraint that was violated
        constraint: String,
    },

    /// Two files mapped to the same relative asset path
    #[error("duplicate asset path '{0}'")]
    DuplicateAsset(String),

    /// A required template part is absent
    #[error("required template file {path} does not exist, did you specify the correct template directory?")]
    MissingAsset {
        /// Path of the missing file
        path: PathBuf,
    },

    /// No composition logic registered for the orchestrator type
    #[error("orchestrator '{0}' is unsupported")]
    UnsupportedOrchestrator(String),

    /// A secure orchestrator was requested without a PKI bundle
    #[error("orchestrator '{0}' requires mutual-TLS bootstrap material but no PKI bundle was supplied")]
    MissingCredentials(String),

    /// Key generation, signing or encoding failed
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The base template source could not be parsed
    #[error("template syntax error in {file}: {source}")]
    TemplateSyntax {
        /// Name of the template part the source came from
        file: String,
        /// Underlying engine error
        #[source]
        source: minijinja::Error,
    },

    /// Expanding the base template failed at execution time
    #[error("template execution error in {file}: {source}")]
    TemplateExecution {
        /// Name of the template part being expanded
        file: String,
        /// Underlying engine error
        #[source]
        source: minijinja::Error,
    },
}

impl Error {
    /// Create an io error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error with the given message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error for a field path and constraint
    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Create a crypto error with the given message
    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Story Tests: Error Context for Operators
    // ==========================================================================
    //
    // Every failure must carry enough context (file name, field path,
    // orchestrator type) that the operator can act without re-running.

    /// Story: validation errors name the offending field and the constraint
    #[test]
    fn story_validation_errors_carry_field_path() {
        let err = Error::validation(
            "agentPoolProfiles[0].count",
            "count must be in the range [1,100]",
        );
        let msg = err.to_string();
        assert!(msg.contains("agentPoolProfiles[0].count"));
        assert!(msg.contains("[1,100]"));

        match err {
            Error::Validation { field, .. } => assert_eq!(field, "agentPoolProfiles[0].count"),
            _ => panic!("expected Validation variant"),
        }
    }

    /// Story: missing-asset errors point at the exact file
    #[test]
    fn story_missing_asset_names_the_file() {
        let err = Error::MissingAsset {
            path: PathBuf::from("/templates/kubernetesbase.t"),
        };
        assert!(err.to_string().contains("kubernetesbase.t"));
        assert!(err.to_string().contains("correct template directory"));
    }

    /// Story: unsupported orchestrators are reported by name
    #[test]
    fn story_unsupported_orchestrator_is_named() {
        let err = Error::UnsupportedOrchestrator("Mesos".to_string());
        assert!(err.to_string().contains("Mesos"));
        assert!(err.to_string().contains("unsupported"));
    }

    /// Story: helper constructors accept both String and &str
    #[test]
    fn story_error_construction_ergonomics() {
        let pool = "agentpublic";
        let err = Error::validation(
            format!("agentPoolProfiles[{pool}].name"),
            "pool names must be unique",
        );
        assert!(err.to_string().contains("agentpublic"));

        let err = Error::crypto("failed to generate CA key");
        assert!(err.to_string().contains("crypto error"));
    }
}
