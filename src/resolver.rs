//! Reference resolution and composite (`allOf`) expansion.
//!
//! Resolution never fails: a reference whose name is missing from the model
//! table resolves to nothing and callers skip that part of the output.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::document::{Schema, SchemaKind};

/// Model table: definition name -> schema.
pub type Models = IndexMap<String, Schema>;

/// Extract the lookup key of a reference locator (its last `/` segment).
///
/// `"#/definitions/User"` -> `"User"`. A locator without separators is
/// returned unchanged.
pub fn ref_name(locator: &str) -> &str {
    locator.rsplit('/').next().unwrap_or(locator)
}

/// Look up the definition a reference points to.
///
/// Returns `None` when the name is not in the model table.
pub fn resolve_definition<'a>(locator: &str, models: &'a Models) -> Option<&'a Schema> {
    let name = ref_name(locator);
    let found = models.get(name);
    if found.is_none() {
        debug!(reference = locator, "unresolvable reference skipped");
    }
    found
}

/// Field set produced by flattening a schema and its composite inclusions.
#[derive(Debug, Clone, Default)]
pub struct MergedFields<'a> {
    /// Field name -> schema. Each name appears once, at its first position;
    /// later definitions of the same name replace the schema.
    pub fields: IndexMap<&'a str, &'a Schema>,
    /// Union of the required lists of every merged part.
    pub required: Vec<&'a str>,
    /// Definition names whose expansion was cut because they were already
    /// being expanded.
    pub cycles: Vec<String>,
    /// Reference locators that did not resolve.
    pub missing: Vec<String>,
    /// Names of the definitions merged in, each listed once.
    pub expanded: Vec<&'a str>,
}

impl<'a> MergedFields<'a> {
    /// Returns true if `field` is required by any merged part.
    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|r| *r == field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn merge(&mut self, other: MergedFields<'a>) {
        for (name, schema) in other.fields {
            self.fields.insert(name, schema);
        }
        for name in other.required {
            self.add_required(name);
        }
        self.cycles.extend(other.cycles);
        self.missing.extend(other.missing);
        for name in other.expanded {
            if !self.expanded.contains(&name) {
                self.expanded.push(name);
            }
        }
    }

    fn add_required(&mut self, name: &'a str) {
        if !self.is_required(name) {
            self.required.push(name);
        }
    }
}

/// Flatten `schema` into a single field set.
///
/// Composite parts are merged first, in order, followed by the schema's own
/// properties. References are resolved and expanded recursively. `visited`
/// holds the definition names on the current expansion path; reaching one of
/// them again is a no-op recorded in [`MergedFields::cycles`]. Names are
/// removed again on the way out, so a definition included through two
/// separate branches is still expanded on both.
pub fn expand_composite<'a>(
    schema: &'a Schema,
    models: &'a Models,
    visited: &mut HashSet<String>,
) -> MergedFields<'a> {
    let mut merged = MergedFields::default();

    match &schema.kind {
        SchemaKind::Reference(locator) => {
            let name = ref_name(locator);
            if visited.contains(name) {
                debug!(definition = name, "composite cycle truncated");
                merged.cycles.push(name.to_string());
                return merged;
            }
            let Some(definition) = resolve_definition(locator, models) else {
                merged.missing.push(locator.clone());
                return merged;
            };

            visited.insert(name.to_string());
            let inner = expand_composite(definition, models, visited);
            visited.remove(name);
            merged.expanded.push(name);
            merged.merge(inner);
        }
        SchemaKind::Composite { parts, properties } => {
            for part in parts {
                let inner = expand_composite(part, models, visited);
                merged.merge(inner);
            }
            for (name, property) in properties {
                merged.fields.insert(name.as_str(), property);
            }
        }
        SchemaKind::Object(properties) => {
            for (name, property) in properties {
                merged.fields.insert(name.as_str(), property);
            }
        }
        SchemaKind::Primitive | SchemaKind::Array(_) => {}
    }

    for name in &schema.required {
        merged.add_required(name);
    }

    merged
}

/// Expand a named definition, seeding the visited set with its own name so a
/// definition that includes itself is detected.
pub fn expand_definition<'a>(
    name: &str,
    definition: &'a Schema,
    models: &'a Models,
) -> MergedFields<'a> {
    let mut visited = HashSet::new();
    visited.insert(name.to_string());
    expand_composite(definition, models, &mut visited)
}
