//! End-to-end conversion: read a document, render it, write the report.

use std::path::Path;

use tracing::info;

use crate::error::ReportError;
use crate::loader::{load_document, write_report};
use crate::renderer::render;
use crate::types::ReportOptions;

/// Convert the document at `source` into a Markdown report at `destination`.
///
/// The report is rendered completely before the destination is opened, so a
/// document that fails to parse leaves the destination untouched.
///
/// # Errors
///
/// Returns IO errors for an unreadable source or unwritable destination, and
/// parse errors for a malformed document.
pub fn generate(
    source: &Path,
    destination: &Path,
    options: &ReportOptions,
) -> Result<(), ReportError> {
    let report = generate_string(source, options)?;
    write_report(destination, &report)?;
    info!(path = %destination.display(), "markdown report written");
    Ok(())
}

/// Convert the document at `source` and return the report.
///
/// # Errors
///
/// Same as [`generate`], minus the write.
pub fn generate_string(source: &Path, options: &ReportOptions) -> Result<String, ReportError> {
    let document = load_document(source)?;
    info!(
        source = %source.display(),
        paths = document.paths.len(),
        definitions = document.definitions.len(),
        "document loaded"
    );
    render(&document, options)
}
