//! Document linting - static checks that rendering would otherwise skip
//! silently.
//!
//! Reports:
//! - Syntax errors and malformed top-level structure
//! - Composite (`allOf`) inclusion cycles
//! - References that don't resolve to a model definition

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::document::{Document, Schema, SchemaKind};
use crate::loader::load_document;
use crate::resolver::{expand_definition, ref_name, Models};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// JSON Pointer to the issue (e.g., "/definitions/User/properties/role/$ref")
    pub path: String,
    pub message: String,
}

/// Result of linting one document.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl LintResult {
    fn from_diagnostics(file: Option<PathBuf>, diagnostics: Vec<Diagnostic>) -> Self {
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        LintResult {
            file,
            errors,
            warnings: diagnostics.len() - errors,
            diagnostics,
        }
    }

    /// Returns true if there are no errors (and, when `strict`, no warnings).
    pub fn is_ok(&self, strict: bool) -> bool {
        self.errors == 0 && (!strict || self.warnings == 0)
    }
}

/// Lint a document file, reporting load failures as diagnostics.
pub fn lint_file(path: &Path) -> LintResult {
    match load_document(path) {
        Ok(document) => {
            let mut result = lint(&document);
            result.file = Some(path.to_path_buf());
            result
        }
        Err(e) => LintResult::from_diagnostics(
            Some(path.to_path_buf()),
            vec![Diagnostic {
                severity: Severity::Error,
                code: "E001".to_string(),
                path: "/".to_string(),
                message: format!("cannot load document: {}", e),
            }],
        ),
    }
}

/// Lint a parsed document.
pub fn lint(document: &Document) -> LintResult {
    let models = &document.definitions;
    let mut diagnostics = Vec::new();

    for (name, definition) in models {
        let path = format!("/definitions/{}", escape(name));

        let merged = expand_definition(name, definition, models);
        let mut cycles = merged.cycles;
        cycles.dedup();
        for cycle in cycles {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E002".to_string(),
                path: path.clone(),
                message: format!("composite inclusion cycle through {}", cycle),
            });
        }

        check_refs(definition, &path, models, &mut diagnostics);
    }

    for endpoint in document.endpoints() {
        let base = format!("/paths/{}/{}", escape(endpoint.path), endpoint.method);
        for (i, param) in endpoint.parameters().enumerate() {
            let path = format!("{}/parameters/{}/schema", base, i);
            check_refs(&param.schema, &path, models, &mut diagnostics);
        }
        for (code, response) in &endpoint.operation.responses {
            if let Some(schema) = &response.schema {
                let path = format!("{}/responses/{}/schema", base, escape(code));
                check_refs(schema, &path, models, &mut diagnostics);
            }
        }
    }

    LintResult::from_diagnostics(None, diagnostics)
}

/// Recursively check `$ref` values in a schema.
fn check_refs(schema: &Schema, path: &str, models: &Models, diagnostics: &mut Vec<Diagnostic>) {
    match &schema.kind {
        SchemaKind::Reference(locator) => {
            if !models.contains_key(ref_name(locator)) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W001".to_string(),
                    path: format!("{}/$ref", path),
                    message: format!("unresolvable reference: {}", locator),
                });
            }
        }
        SchemaKind::Array(items) => {
            check_refs(items, &format!("{}/items", path), models, diagnostics);
        }
        SchemaKind::Object(properties) => {
            for (name, property) in properties {
                let child_path = format!("{}/properties/{}", path, escape(name));
                check_refs(property, &child_path, models, diagnostics);
            }
        }
        SchemaKind::Composite { parts, properties } => {
            for (i, part) in parts.iter().enumerate() {
                check_refs(part, &format!("{}/allOf/{}", path, i), models, diagnostics);
            }
            for (name, property) in properties {
                let child_path = format!("{}/properties/{}", path, escape(name));
                check_refs(property, &child_path, models, diagnostics);
            }
        }
        SchemaKind::Primitive => {}
    }
}

/// JSON Pointer encoding (~ -> ~0, / -> ~1).
fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn clean_document_passes() {
        let doc = document(json!({
            "paths": { "/u": { "get": { "responses": { "200": { "schema": { "$ref": "#/definitions/User" } } } } } },
            "definitions": { "User": { "properties": { "id": { "type": "string" } } } }
        }));
        let result = lint(&doc);
        assert!(result.is_ok(true));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unresolvable_reference_is_a_warning() {
        let doc = document(json!({
            "paths": { "/api/user": { "post": {
                "parameters": [{ "name": "body", "in": "body", "schema": { "$ref": "#/definitions/Ghost" } }]
            } } },
            "definitions": { "User": { "properties": {
                "roles": { "type": "array", "items": { "$ref": "#/definitions/Role" } }
            } } }
        }));
        let result = lint(&doc);

        assert_eq!(result.errors, 0);
        assert_eq!(result.warnings, 2);
        assert!(result.is_ok(false));
        assert!(!result.is_ok(true));

        let paths: Vec<_> = result.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"/definitions/User/properties/roles/items/$ref"));
        assert!(paths.contains(&"/paths/~1api~1user/post/parameters/0/schema/$ref"));
    }

    #[test]
    fn composite_cycle_is_an_error() {
        let doc = document(json!({
            "definitions": {
                "A": { "allOf": [{ "$ref": "#/definitions/B" }] },
                "B": { "allOf": [{ "$ref": "#/definitions/A" }] }
            }
        }));
        let result = lint(&doc);

        assert_eq!(result.errors, 2);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.code == "E002" && d.severity == Severity::Error));
    }

    #[test]
    fn self_referencing_property_is_not_a_cycle() {
        let doc = document(json!({
            "definitions": { "Node": { "properties": {
                "children": { "type": "array", "items": { "$ref": "#/definitions/Node" } }
            } } }
        }));
        assert!(lint(&doc).diagnostics.is_empty());
    }

    #[test]
    fn lint_file_reports_syntax_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();

        let result = lint_file(file.path());
        assert_eq!(result.errors, 1);
        assert_eq!(result.diagnostics[0].code, "E001");
        assert_eq!(result.file.as_deref(), Some(file.path()));
    }
}
