//! Markdown rendering of a parsed document.
//!
//! One pass over the document: header, overview, then one section per
//! endpoint with its parameter table and response structures. Nested
//! references are expanded in place; a reference back into a definition that
//! is already being rendered produces a circular-reference marker instead of
//! recursing.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{self, Write};

use tracing::debug;

use crate::document::{Document, Endpoint, Parameter, Schema, SchemaKind};
use crate::error::ReportError;
use crate::resolver::{
    expand_composite, expand_definition, ref_name, resolve_definition, MergedFields, Models,
};
use crate::types::{Labels, ReportOptions};

/// Render `document` as a Markdown report.
///
/// # Errors
///
/// Returns `ReportError::Format` only if writing into the output buffer
/// fails. Unresolvable references are skipped silently.
pub fn render(document: &Document, options: &ReportOptions) -> Result<String, ReportError> {
    let endpoints = sorted_endpoints(document, options);
    debug!(endpoints = endpoints.len(), "rendering document");

    let mut renderer = Renderer::new(&document.definitions, options);
    renderer.write_header(document, &endpoints)?;
    for endpoint in &endpoints {
        renderer.write_endpoint(endpoint)?;
    }
    Ok(renderer.out)
}

/// Endpoints in report order.
///
/// Paths with an assigned priority come first, ascending by priority; the
/// remaining paths follow in lexical order. The sort is stable, so methods of
/// the same path keep their enumeration order.
pub fn sorted_endpoints<'a>(document: &'a Document, options: &ReportOptions) -> Vec<Endpoint<'a>> {
    let mut endpoints = document.endpoints();
    endpoints.sort_by(|a, b| compare_paths(a.path, b.path, options));
    endpoints
}

fn compare_paths(a: &str, b: &str, options: &ReportOptions) -> Ordering {
    match (options.priority(a), options.priority(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Type column value for a field.
///
/// In priority order: the referenced model name; `[]` followed by the element
/// type; `type (format)`, or the format alone when no type is declared;
/// `object` for inline properties; `object (composite)` for `allOf`; the bare
/// declared type.
pub fn rendered_type(schema: &Schema) -> String {
    match &schema.kind {
        SchemaKind::Reference(locator) => ref_name(locator).to_string(),
        SchemaKind::Array(items) => format!("[]{}", rendered_type(items)),
        kind => {
            if let Some(format) = &schema.format {
                if schema.type_name.is_empty() {
                    return format.clone();
                }
                return format!("{} ({})", schema.type_name, format);
            }
            match kind {
                SchemaKind::Object(_) => "object".to_string(),
                SchemaKind::Composite { properties, .. } if !properties.is_empty() => {
                    "object".to_string()
                }
                SchemaKind::Composite { .. } => "object (composite)".to_string(),
                _ => schema.type_name.clone(),
            }
        }
    }
}

/// Escape a value for a table cell.
fn cell(text: &str) -> String {
    text.trim()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

fn type_cell(schema: &Schema) -> String {
    let rendered = rendered_type(schema);
    if rendered.is_empty() {
        String::new()
    } else {
        format!("`{}`", rendered)
    }
}

struct Renderer<'a> {
    models: &'a Models,
    options: &'a ReportOptions,
    labels: &'static Labels,
    out: String,
    /// Definition names currently being rendered, outermost first.
    stack: Vec<String>,
}

impl<'a> Renderer<'a> {
    fn new(models: &'a Models, options: &'a ReportOptions) -> Self {
        Self {
            models,
            options,
            labels: options.labels(),
            out: String::new(),
            stack: Vec::new(),
        }
    }

    fn write_header(&mut self, document: &Document, endpoints: &[Endpoint<'_>]) -> fmt::Result {
        let info = &document.info;
        let labels = self.labels;
        writeln!(self.out, "# {}\n", info.title)?;
        writeln!(self.out, "**{}**: {}  ", labels.version, info.version)?;
        writeln!(self.out, "**{}**: {}\n", labels.description, info.description)?;

        writeln!(self.out, "## {}\n", labels.overview)?;
        for endpoint in endpoints {
            writeln!(
                self.out,
                "- `{} {}` {}",
                endpoint.method.to_uppercase(),
                endpoint.path,
                endpoint.operation.summary.trim()
            )?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "## {}\n", labels.details)
    }

    fn write_endpoint(&mut self, endpoint: &Endpoint<'a>) -> fmt::Result {
        let labels = self.labels;
        let operation = endpoint.operation;
        let method = endpoint.method.to_uppercase();

        let title = operation.summary.trim();
        if title.is_empty() {
            writeln!(self.out, "### {} {}\n", method, endpoint.path)?;
        } else {
            writeln!(self.out, "### {}\n", title)?;
        }
        writeln!(self.out, "**{}**: `{}`  ", labels.path, endpoint.path)?;
        writeln!(self.out, "**{}**: `{}`  ", labels.method, method)?;
        if !operation.description.trim().is_empty() {
            writeln!(
                self.out,
                "**{}**: {}  ",
                labels.endpoint_description, operation.description
            )?;
        }
        if !operation.tags.is_empty() {
            writeln!(self.out, "**{}**: {}  ", labels.tags, operation.tags.join(", "))?;
        }
        if operation.deprecated {
            writeln!(self.out, "**{}**  ", labels.deprecated)?;
        }

        let parameters: Vec<&'a Parameter> = endpoint.parameters().collect();
        if !parameters.is_empty() {
            self.write_parameters(&parameters)?;
        }

        let mut responses: Vec<(&'a str, &'a Schema)> = operation
            .responses
            .iter()
            .filter_map(|(code, response)| {
                response
                    .schema
                    .as_ref()
                    .filter(|schema| !schema.is_empty())
                    .map(|schema| (code.as_str(), schema))
            })
            .collect();
        responses.sort_by(|a, b| a.0.cmp(b.0));

        for (code, schema) in responses {
            writeln!(
                self.out,
                "\n**{}** (`{}`):\n",
                labels.response_structure, code
            )?;
            self.write_schema(schema)?;
        }

        writeln!(self.out, "\n---\n")
    }

    fn write_parameters(&mut self, parameters: &[&'a Parameter]) -> fmt::Result {
        let labels = self.labels;
        writeln!(self.out, "\n**{}**:\n", labels.request_parameters)?;
        writeln!(
            self.out,
            "| {} | {} | {} | {} |",
            labels.name, labels.type_name, labels.required, labels.description
        )?;
        writeln!(self.out, "|------|------|----------|------|")?;

        for param in parameters {
            if let Some(locator) = param.schema.ref_locator() {
                // A referenced body model contributes one row per field.
                if let Some(definition) = resolve_definition(locator, self.models) {
                    let merged = expand_definition(ref_name(locator), definition, self.models);
                    for (field, schema) in &merged.fields {
                        if self.options.is_ignored(field) {
                            continue;
                        }
                        let required = merged.is_required(field);
                        self.write_parameter_row(field, schema, required, &schema.description)?;
                    }
                }
                continue;
            }

            if self.options.is_ignored(&param.name) {
                continue;
            }
            self.write_parameter_row(
                &param.name,
                &param.schema,
                param.required,
                &param.description,
            )?;
        }
        writeln!(self.out)
    }

    fn write_parameter_row(
        &mut self,
        name: &str,
        schema: &Schema,
        required: bool,
        description: &str,
    ) -> fmt::Result {
        let labels = self.labels;
        writeln!(
            self.out,
            "| {} | {} | {} | {} |",
            cell(name),
            type_cell(schema),
            if required { labels.yes } else { labels.no },
            cell(description)
        )
    }

    /// Render a response (or array element) schema.
    fn write_schema(&mut self, schema: &'a Schema) -> fmt::Result {
        match &schema.kind {
            SchemaKind::Composite { parts, properties } => {
                for part in parts {
                    self.write_schema(part)?;
                }
                if !properties.is_empty() {
                    self.write_fields(properties.iter().map(|(k, v)| (k.as_str(), v)).collect())?;
                }
                Ok(())
            }
            SchemaKind::Reference(locator) => self.write_reference(locator),
            SchemaKind::Array(items) => {
                writeln!(
                    self.out,
                    "{}: `{}`\n",
                    self.labels.array_type,
                    rendered_type(schema)
                )?;
                if self.has_structure(items) {
                    writeln!(self.out, "**{}**:\n", self.labels.element_structure)?;
                    self.write_schema(items)?;
                }
                Ok(())
            }
            SchemaKind::Object(properties) => {
                self.write_fields(properties.iter().map(|(k, v)| (k.as_str(), v)).collect())
            }
            SchemaKind::Primitive if !schema.type_name.is_empty() => {
                writeln!(self.out, "`{}`\n", schema.type_name)
            }
            SchemaKind::Primitive => writeln!(self.out, "`{}`\n", rendered_type(schema)),
        }
    }

    /// Render the definition a reference points to, unless it is already
    /// being rendered further up.
    fn write_reference(&mut self, locator: &str) -> fmt::Result {
        let Some(definition) = resolve_definition(locator, self.models) else {
            return Ok(());
        };
        let name = ref_name(locator);
        if self.stack.iter().any(|open| open == name) {
            debug!(definition = name, "circular reference truncated");
            return self.write_circular(name);
        }

        self.stack.push(name.to_string());
        let result = self.write_definition(definition);
        self.stack.pop();
        result
    }

    fn write_definition(&mut self, definition: &'a Schema) -> fmt::Result {
        match definition.kind {
            SchemaKind::Object(_) | SchemaKind::Composite { .. } => self.write_merged(definition),
            _ => self.write_schema(definition),
        }
    }

    /// Flatten `schema` and write the merged field table.
    ///
    /// Every definition on the stack counts as visited, and every definition
    /// merged in stays on the stack while the nested sections are written.
    fn write_merged(&mut self, schema: &'a Schema) -> fmt::Result {
        let mut visited: HashSet<String> = self.stack.iter().cloned().collect();
        let merged = expand_composite(schema, self.models, &mut visited);

        let depth = self.stack.len();
        for name in &merged.expanded {
            if !self.stack.iter().any(|open| open == name) {
                self.stack.push(name.to_string());
            }
        }
        let result = self.write_merged_fields(&merged);
        self.stack.truncate(depth);
        result
    }

    fn write_merged_fields(&mut self, merged: &MergedFields<'a>) -> fmt::Result {
        self.write_fields(merged.fields.iter().map(|(k, v)| (*k, *v)).collect())?;
        for cycle in &merged.cycles {
            self.write_circular(cycle)?;
        }
        Ok(())
    }

    fn write_circular(&mut self, name: &str) -> fmt::Result {
        writeln!(self.out, "> {} `{}`\n", self.labels.circular, name)
    }

    /// Field table followed by a sub-section for every field with nested
    /// structure.
    fn write_fields(&mut self, fields: Vec<(&'a str, &'a Schema)>) -> fmt::Result {
        let fields: Vec<(&'a str, &'a Schema)> = fields
            .into_iter()
            .filter(|(name, _)| !self.options.is_ignored(name))
            .collect();
        if fields.is_empty() {
            return Ok(());
        }

        let labels = self.labels;
        writeln!(
            self.out,
            "| {} | {} | {} |",
            labels.field, labels.type_name, labels.description
        )?;
        writeln!(self.out, "|------|------|------|")?;
        for (name, schema) in &fields {
            writeln!(
                self.out,
                "| {} | {} | {} |",
                cell(name),
                type_cell(schema),
                cell(&schema.description)
            )?;
        }
        writeln!(self.out)?;

        for (name, schema) in fields {
            self.write_nested(name, schema)?;
        }
        Ok(())
    }

    fn write_nested(&mut self, field: &str, schema: &'a Schema) -> fmt::Result {
        if !self.has_structure(schema) {
            return Ok(());
        }
        let labels = self.labels;

        match &schema.kind {
            SchemaKind::Object(properties) => {
                writeln!(self.out, "**{}{}**:\n", field, labels.structure_suffix)?;
                self.write_fields(properties.iter().map(|(k, v)| (k.as_str(), v)).collect())
            }
            SchemaKind::Reference(locator) => {
                writeln!(self.out, "**{}{}**:\n", field, labels.structure_suffix)?;
                self.write_reference(locator)
            }
            SchemaKind::Composite { .. } => {
                writeln!(self.out, "**{}{}**:\n", field, labels.structure_suffix)?;
                self.write_merged(schema)
            }
            SchemaKind::Array(items) => {
                writeln!(self.out, "**{}{}**:\n", field, labels.element_suffix)?;
                self.write_schema(items)
            }
            SchemaKind::Primitive => Ok(()),
        }
    }

    /// True if `schema` has something to expand below its own table row.
    fn has_structure(&self, schema: &Schema) -> bool {
        match &schema.kind {
            SchemaKind::Reference(locator) => self.models.contains_key(ref_name(locator)),
            SchemaKind::Object(properties) => !properties.is_empty(),
            SchemaKind::Composite { .. } => true,
            SchemaKind::Array(items) => self.has_structure(items),
            SchemaKind::Primitive => false,
        }
    }
}
