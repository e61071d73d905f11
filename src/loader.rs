//! Document and options loading, report writing.
//!
//! Documents and option files may be JSON or YAML. The format is taken from
//! the file extension when it is `.json`, `.yaml` or `.yml`, and sniffed from
//! the content otherwise (JSON documents start with `{`).

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::document::Document;
use crate::error::ReportError;
use crate::types::ReportOptions;

/// Serialization format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format for `content`, preferring the extension of `path`.
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        let extension = path
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Format::Json,
            Some("yaml") | Some("yml") => Format::Yaml,
            _ if content.trim_start().starts_with('{') => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `ReportError::FileNotFound` if the file doesn't exist,
/// `ReportError::ReadError` if it can't be read, or
/// `ReportError::InvalidJson`/`InvalidYaml` if its top-level structure
/// doesn't parse.
pub fn load_document(path: &Path) -> Result<Document, ReportError> {
    let content = read_file(path)?;
    parse(&content, Format::detect(Some(path), &content))
}

/// Load a document from a string, sniffing JSON or YAML.
///
/// # Errors
///
/// Returns `ReportError::InvalidJson`/`InvalidYaml` if the content doesn't
/// parse.
pub fn load_document_str(content: &str) -> Result<Document, ReportError> {
    parse(content, Format::detect(None, content))
}

/// Load report options from a JSON or YAML file.
///
/// # Errors
///
/// Returns an IO error if the file can't be read, or
/// `ReportError::InvalidConfig` if it doesn't describe valid options.
pub fn load_options(path: &Path) -> Result<ReportOptions, ReportError> {
    let content = read_file(path)?;
    parse(&content, Format::detect(Some(path), &content)).map_err(|e| {
        ReportError::InvalidConfig {
            path: path.to_path_buf(),
            message: match e {
                ReportError::InvalidJson { source } => source.to_string(),
                ReportError::InvalidYaml { source } => source.to_string(),
                other => other.to_string(),
            },
        }
    })
}

/// Write a finished report, replacing any existing file.
///
/// # Errors
///
/// Returns `ReportError::WriteError` if the destination can't be written.
pub fn write_report(path: &Path, report: &str) -> Result<(), ReportError> {
    std::fs::write(path, report).map_err(|source| ReportError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<String, ReportError> {
    if !path.exists() {
        return Err(ReportError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| ReportError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, ReportError> {
    match format {
        Format::Json => {
            serde_json::from_str(content).map_err(|source| ReportError::InvalidJson { source })
        }
        Format::Yaml => {
            serde_yaml::from_str(content).map_err(|source| ReportError::InvalidYaml { source })
        }
    }
}
