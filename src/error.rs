//! Error types for document loading and report generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a document, rendering it, or writing the report.
///
/// Unresolvable references are not errors: the renderer skips them.
#[derive(Debug, Error)]
pub enum ReportError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON document: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML document: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid options in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("failed to format report")]
    Format(#[from] std::fmt::Error),
}

impl ReportError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::FileNotFound { .. }
            | ReportError::ReadError { .. }
            | ReportError::WriteError { .. } => 3,
            _ => 2,
        }
    }
}
