//! Swagger Markdown
//!
//! Converts Swagger/OpenAPI documents into Markdown API reports.
//!
//! Model references are resolved against the document's definitions,
//! `allOf` compositions are flattened into a single field table, and each
//! endpoint gets a parameter table plus one structure section per response.
//!
//! # Example
//!
//! ```
//! use swagger_markdown::{load_document_str, render, ReportOptions};
//!
//! let document = load_document_str(r##"{
//!     "info": { "title": "Users", "version": "1.0" },
//!     "paths": {
//!         "/api/user/register": {
//!             "post": {
//!                 "summary": "Register",
//!                 "parameters": [{
//!                     "name": "body",
//!                     "in": "body",
//!                     "schema": { "$ref": "#/definitions/UserRegister" }
//!                 }]
//!             }
//!         }
//!     },
//!     "definitions": {
//!         "UserRegister": {
//!             "type": "object",
//!             "required": ["name"],
//!             "properties": {
//!                 "name": { "type": "string" },
//!                 "_app_id": { "type": "string" }
//!             }
//!         }
//!     }
//! }"##).unwrap();
//!
//! let options = ReportOptions::new().ignore("_app_id");
//! let report = render(&document, &options).unwrap();
//!
//! assert!(report.contains("| name | `string` | Yes |"));
//! assert!(!report.contains("_app_id"));
//! ```
//!
//! # Field types
//!
//! | Schema | Rendered type |
//! |--------|---------------|
//! | `$ref: "#/definitions/User"` | `User` |
//! | array of `$ref` | `[]User` |
//! | array of `string` | `[]string` |
//! | `type` + `format` | `integer (int64)` |
//! | inline `properties` | `object` |
//! | `allOf` | `object (composite)` |
//! | anything else | the declared `type` |

mod document;
mod error;
mod generator;
mod linter;
mod loader;
mod renderer;
mod resolver;
mod types;

pub use document::{
    Document, Endpoint, Info, Operation, Parameter, PathItem, Properties, Response, Schema,
    SchemaKind, HTTP_METHODS,
};
pub use error::ReportError;
pub use generator::{generate, generate_string};
pub use linter::{lint, lint_file, Diagnostic, LintResult, Severity};
pub use loader::{load_document, load_document_str, load_options, write_report, Format};
pub use renderer::{render, rendered_type, sorted_endpoints};
pub use resolver::{
    expand_composite, expand_definition, ref_name, resolve_definition, MergedFields, Models,
};
pub use types::{Labels, Language, ReportOptions};
