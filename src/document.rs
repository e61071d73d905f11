//! Strongly typed view of a Swagger/OpenAPI document.
//!
//! Every region is parsed directly into its final shape: raw serde structs
//! capture the loose key/value layout and are converted once, at parse time,
//! into the types below. Missing optional fields (and explicit `null`s) are
//! treated as absent.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Named fields of an object schema, in document order.
pub type Properties = IndexMap<String, Schema>;

/// HTTP methods recognised under a path entry, in enumeration order.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Treat an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The full API description being converted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    pub info: Info,
    pub paths: IndexMap<String, PathItem>,
    /// Model table: `definitions`, plus OpenAPI 3 `components.schemas`.
    pub definitions: IndexMap<String, Schema>,
}

/// Document metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub version: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

/// Operations available on a single path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
    /// Parameters shared by every operation on this path.
    #[serde(default, deserialize_with = "nullable")]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Returns the operation registered for `method` (lowercase).
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        match method {
            "get" => self.get.as_ref(),
            "put" => self.put.as_ref(),
            "post" => self.post.as_ref(),
            "delete" => self.delete.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "patch" => self.patch.as_ref(),
            "trace" => self.trace.as_ref(),
            _ => None,
        }
    }

    /// Iterate over the defined operations in [`HTTP_METHODS`] order.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        HTTP_METHODS
            .iter()
            .filter_map(move |&method| self.operation(method).map(|op| (method, op)))
    }
}

/// One HTTP method on one path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawOperation")]
pub struct Operation {
    pub summary: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    /// Status code -> response, in document order.
    pub responses: IndexMap<String, Response>,
    pub tags: Vec<String>,
    pub deprecated: bool,
}

/// A single request parameter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawParameter")]
pub struct Parameter {
    pub name: String,
    /// Where the parameter lives (`body`, `query`, `path`, ...).
    pub location: String,
    pub description: String,
    pub required: bool,
    /// Embedded body schema, or a schema built from the parameter's own
    /// `type`/`format`/`items`.
    pub schema: Schema,
}

/// A single response entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawResponse")]
pub struct Response {
    pub description: String,
    pub schema: Option<Schema>,
}

/// Any schema node: a model definition, a property, array items, or a
/// composite part.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawSchema")]
pub struct Schema {
    pub kind: SchemaKind,
    /// Declared `type`; empty when absent.
    pub type_name: String,
    pub format: Option<String>,
    pub description: String,
    /// Names of required properties (object and composite schemas).
    pub required: Vec<String>,
}

/// Shape of a schema node, decided once when the node is parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SchemaKind {
    /// A plain value; the type is in [`Schema::type_name`].
    #[default]
    Primitive,
    /// `$ref` to a named model definition.
    Reference(String),
    /// `type: array` with an `items` descriptor.
    Array(Box<Schema>),
    /// Anonymous object with inline properties.
    Object(Properties),
    /// `allOf`: the union of every part plus the node's own properties.
    Composite {
        parts: Vec<Schema>,
        properties: Properties,
    },
}

impl Schema {
    /// A bare primitive schema such as `string` or `integer`.
    pub fn primitive(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// A schema pointing at `locator`.
    pub fn reference(locator: impl Into<String>) -> Self {
        Self {
            kind: SchemaKind::Reference(locator.into()),
            ..Self::default()
        }
    }

    /// Returns the reference locator if this node is a `$ref`.
    pub fn ref_locator(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Reference(locator) => Some(locator),
            _ => None,
        }
    }

    /// Returns the element schema if this node is an array.
    pub fn items(&self) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the inline properties of an object or composite node.
    pub fn properties(&self) -> Option<&Properties> {
        match &self.kind {
            SchemaKind::Object(properties) | SchemaKind::Composite { properties, .. } => {
                Some(properties)
            }
            _ => None,
        }
    }

    /// True when there is nothing to describe: no reference, no type, no
    /// composite parts and no inline properties.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, SchemaKind::Primitive) && self.type_name.is_empty()
    }
}

/// A resolved endpoint: one operation together with its path context.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub path: &'a str,
    /// Lowercase HTTP method.
    pub method: &'static str,
    pub operation: &'a Operation,
    shared: &'a [Parameter],
}

impl<'a> Endpoint<'a> {
    /// Path-level parameters followed by the operation's own parameters.
    ///
    /// An operation parameter with the same name and location replaces the
    /// path-level one.
    pub fn parameters(&self) -> impl Iterator<Item = &'a Parameter> + 'a {
        let operation: &'a Operation = self.operation;
        let own = &operation.parameters;
        let shared: &'a [Parameter] = self.shared;
        shared
            .iter()
            .filter(move |param| {
                !own.iter()
                    .any(|p| p.name == param.name && p.location == param.location)
            })
            .chain(own.iter())
    }
}

impl Document {
    /// Flatten the path -> method -> operation table, in document order.
    pub fn endpoints(&self) -> Vec<Endpoint<'_>> {
        self.paths
            .iter()
            .flat_map(|(path, item)| {
                item.operations().map(move |(method, operation)| Endpoint {
                    path,
                    method,
                    operation,
                    shared: &item.parameters,
                })
            })
            .collect()
    }
}

// --- Raw serde shapes ---

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default, deserialize_with = "nullable")]
    info: Info,
    #[serde(default, deserialize_with = "nullable")]
    paths: IndexMap<String, PathItem>,
    #[serde(default, deserialize_with = "nullable")]
    definitions: IndexMap<String, Schema>,
    #[serde(default, deserialize_with = "nullable")]
    components: RawComponents,
}

#[derive(Default, Deserialize)]
struct RawComponents {
    #[serde(default, deserialize_with = "nullable")]
    schemas: IndexMap<String, Schema>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let mut definitions = raw.components.schemas;
        // Swagger 2 definitions take precedence on a name clash.
        for (name, schema) in raw.definitions {
            definitions.insert(name, schema);
        }
        Document {
            info: raw.info,
            paths: raw.paths,
            definitions,
        }
    }
}

#[derive(Deserialize)]
struct RawOperation {
    summary: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    parameters: Vec<Parameter>,
    #[serde(rename = "requestBody")]
    request_body: Option<RawRequestBody>,
    #[serde(default, deserialize_with = "status_keyed")]
    responses: IndexMap<String, Response>,
    #[serde(default, deserialize_with = "nullable")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    deprecated: bool,
}

impl From<RawOperation> for Operation {
    fn from(raw: RawOperation) -> Self {
        let mut parameters = raw.parameters;
        // OpenAPI 3 request bodies become a synthetic body parameter.
        if let Some(body) = raw.request_body {
            if let Some(schema) = first_media_schema(body.content) {
                parameters.push(Parameter {
                    name: "body".to_string(),
                    location: "body".to_string(),
                    description: body.description.unwrap_or_default(),
                    required: body.required.unwrap_or(false),
                    schema,
                });
            }
        }
        Operation {
            summary: raw.summary.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            parameters,
            responses: raw.responses,
            tags: raw.tags,
            deprecated: raw.deprecated,
        }
    }
}

#[derive(Deserialize)]
struct RawRequestBody {
    description: Option<String>,
    required: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    content: IndexMap<String, RawMediaType>,
}

#[derive(Deserialize)]
struct RawMediaType {
    schema: Option<Schema>,
}

fn first_media_schema(content: IndexMap<String, RawMediaType>) -> Option<Schema> {
    content.into_values().find_map(|media| media.schema)
}

/// Response keys are strings in JSON but may be bare integers in YAML.
#[derive(PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
enum StatusKey {
    Code(u64),
    Name(String),
}

impl StatusKey {
    fn into_string(self) -> String {
        match self {
            StatusKey::Code(code) => code.to_string(),
            StatusKey::Name(name) => name,
        }
    }
}

fn status_keyed<'de, D>(deserializer: D) -> Result<IndexMap<String, Response>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<StatusKey, Response>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, response)| (key.into_string(), response))
        .collect())
}

#[derive(Deserialize)]
struct RawResponse {
    description: Option<String>,
    schema: Option<Schema>,
    #[serde(default, deserialize_with = "nullable")]
    content: IndexMap<String, RawMediaType>,
}

impl From<RawResponse> for Response {
    fn from(raw: RawResponse) -> Self {
        let schema = raw.schema.or_else(|| first_media_schema(raw.content));
        Response {
            description: raw.description.unwrap_or_default(),
            schema,
        }
    }
}

#[derive(Deserialize)]
struct RawParameter {
    name: Option<String>,
    #[serde(rename = "in")]
    location: Option<String>,
    description: Option<String>,
    required: Option<bool>,
    #[serde(rename = "type")]
    type_name: Option<TypeName>,
    format: Option<String>,
    items: Option<Box<Schema>>,
    schema: Option<Schema>,
}

impl From<RawParameter> for Parameter {
    fn from(raw: RawParameter) -> Self {
        let schema = match raw.schema {
            Some(schema) => schema,
            None => Schema::from(RawSchema {
                type_name: raw.type_name,
                format: raw.format,
                items: raw.items,
                ..RawSchema::default()
            }),
        };
        Parameter {
            name: raw.name.unwrap_or_default(),
            location: raw.location.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            required: raw.required.unwrap_or(false),
            schema,
        }
    }
}

/// `type` is a string in Swagger 2 and may be a list in OpenAPI 3.1.
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeName {
    One(String),
    Many(Vec<String>),
}

impl TypeName {
    fn into_name(self) -> String {
        match self {
            TypeName::One(name) => name,
            TypeName::Many(names) => names
                .into_iter()
                .find(|name| name != "null")
                .unwrap_or_default(),
        }
    }
}

/// `required` is a name list on schemas; some documents misuse it as a flag.
#[derive(Deserialize)]
#[serde(untagged)]
enum RequiredList {
    Names(Vec<String>),
    Flag(bool),
}

#[derive(Default, Deserialize)]
struct RawSchema {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(rename = "type")]
    type_name: Option<TypeName>,
    format: Option<String>,
    description: Option<String>,
    items: Option<Box<Schema>>,
    properties: Option<Properties>,
    #[serde(rename = "allOf")]
    all_of: Option<Vec<Schema>>,
    required: Option<RequiredList>,
}

impl From<RawSchema> for Schema {
    fn from(raw: RawSchema) -> Self {
        let type_name = raw.type_name.map(TypeName::into_name).unwrap_or_default();
        let all_of = raw.all_of.unwrap_or_default();

        let kind = if let Some(locator) = raw.reference {
            SchemaKind::Reference(locator)
        } else if let Some(items) = raw.items.filter(|_| type_name == "array") {
            SchemaKind::Array(items)
        } else if !all_of.is_empty() {
            SchemaKind::Composite {
                parts: all_of,
                properties: raw.properties.unwrap_or_default(),
            }
        } else if let Some(properties) = raw.properties {
            SchemaKind::Object(properties)
        } else {
            SchemaKind::Primitive
        };

        let required = match raw.required {
            Some(RequiredList::Names(names)) => names,
            Some(RequiredList::Flag(_)) | None => Vec::new(),
        };

        Schema {
            kind,
            type_name,
            format: raw.format.filter(|f| !f.is_empty()),
            description: raw.description.unwrap_or_default(),
            required,
        }
    }
}
