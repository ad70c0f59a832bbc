//! Error types and handling for kbcm
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Per-component installation failures are not raised as errors: the resolver
//! wraps a `KbcmError` into an [`InstallFailure`](crate::resolver::InstallFailure)
//! value so that sibling requests keep running.

use miette::Diagnostic;
use thiserror::Error;

use crate::validator::ValidationFailure;

/// Main error type for kbcm operations
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum KbcmError {
    // Component errors
    #[error("Component '{name}' not found")]
    #[diagnostic(
        code(kbcm::component::not_found),
        help("Check that the component identifier is declared in the knowledge base")
    )]
    ComponentNotFound { name: String },

    #[error("Component '{name}' is not specified correctly: {reason}")]
    #[diagnostic(code(kbcm::component::validation_failed))]
    ComponentValidationFailed {
        name: String,
        reason: ValidationFailure,
    },

    #[error("{count} requested component(s) could not be installed: {components}")]
    #[diagnostic(
        code(kbcm::install::failed),
        help("Run with --verbose for the failing stage of each component")
    )]
    InstallFailed { count: usize, components: String },

    // Artifact errors
    #[error("Invalid artifact location: {location}")]
    #[diagnostic(
        code(kbcm::artifact::invalid_location),
        help("Artifact locations look like https://github.com/author/repository")
    )]
    InvalidArtifactLocation { location: String },

    #[error("Directory '{path}' already holds a clone of '{existing}', not '{location}'")]
    #[diagnostic(
        code(kbcm::artifact::collision),
        help(
            "Artifacts are stored by repository name only, so repositories with the same name \
             from different owners share one directory and only the first can be installed; \
             remove the existing directory or rename one of the repositories"
        )
    )]
    ArtifactCollision {
        path: String,
        existing: String,
        location: String,
    },

    #[error("Failed to fetch artifact '{location}': {reason}")]
    #[diagnostic(code(kbcm::artifact::fetch_failed))]
    ArtifactFetchFailed { location: String, reason: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(kbcm::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(kbcm::git::clone_failed),
        help("Check that URL is correct and you have access to repository")
    )]
    GitCloneFailed { url: String, reason: String },

    // Import errors
    #[error("Failed to import '{path}': {reason}")]
    #[diagnostic(code(kbcm::import::failed))]
    ImportFailed { path: String, reason: String },

    #[error("Invalid declarative file pattern '{pattern}': {reason}")]
    #[diagnostic(code(kbcm::import::invalid_pattern))]
    InvalidFilePattern { pattern: String, reason: String },

    // Registry errors
    #[error("Failed to load knowledge base '{path}': {reason}")]
    #[diagnostic(
        code(kbcm::registry::load_failed),
        help("Set `knowledge_base` in kbcm.yaml or KBCM_KNOWLEDGE_BASE to a valid snapshot file")
    )]
    RegistryLoadFailed { path: String, reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(kbcm::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(kbcm::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(kbcm::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(kbcm::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for KbcmError {
    fn from(err: std::io::Error) -> Self {
        KbcmError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for KbcmError {
    fn from(err: serde_yaml::Error) -> Self {
        KbcmError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for KbcmError {
    fn from(err: serde_json::Error) -> Self {
        KbcmError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for KbcmError {
    fn from(err: git2::Error) -> Self {
        KbcmError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, KbcmError>;
