//! Report configuration and output labels.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Language of the headings and table labels in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en", alias = "english")]
    English,
    #[serde(rename = "zh", alias = "chinese")]
    Chinese,
}

impl Language {
    /// Parse a language code.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "zh" | "chinese" => Some(Language::Chinese),
            _ => None,
        }
    }

    /// Returns the label set for this language.
    pub fn labels(&self) -> &'static Labels {
        match self {
            Language::English => &ENGLISH,
            Language::Chinese => &CHINESE,
        }
    }
}

/// Fixed strings used when rendering a report.
#[derive(Debug)]
pub struct Labels {
    pub version: &'static str,
    pub description: &'static str,
    pub overview: &'static str,
    pub details: &'static str,
    pub path: &'static str,
    pub method: &'static str,
    pub endpoint_description: &'static str,
    pub tags: &'static str,
    pub deprecated: &'static str,
    pub request_parameters: &'static str,
    pub name: &'static str,
    pub field: &'static str,
    pub type_name: &'static str,
    pub required: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub response_structure: &'static str,
    pub array_type: &'static str,
    pub element_structure: &'static str,
    /// Appended to a field name to title its nested structure.
    pub structure_suffix: &'static str,
    /// Appended to a field name to title its array element structure.
    pub element_suffix: &'static str,
    pub circular: &'static str,
}

static ENGLISH: Labels = Labels {
    version: "Version",
    description: "Description",
    overview: "Overview",
    details: "Endpoints",
    path: "Path",
    method: "Method",
    endpoint_description: "Description",
    tags: "Tags",
    deprecated: "Deprecated",
    request_parameters: "Request parameters",
    name: "Name",
    field: "Field",
    type_name: "Type",
    required: "Required",
    yes: "Yes",
    no: "No",
    response_structure: "Response structure",
    array_type: "Array type",
    element_structure: "Array element structure",
    structure_suffix: " structure",
    element_suffix: " array element structure",
    circular: "Circular reference, not expanded:",
};

static CHINESE: Labels = Labels {
    version: "版本",
    description: "描述",
    overview: "接口概览",
    details: "接口详情",
    path: "接口地址",
    method: "请求方式",
    endpoint_description: "接口描述",
    tags: "标签",
    deprecated: "已废弃",
    request_parameters: "请求参数",
    name: "名称",
    field: "字段",
    type_name: "类型",
    required: "是否必填",
    yes: "是",
    no: "否",
    response_structure: "响应体结构",
    array_type: "数组类型",
    element_structure: "数组元素结构",
    structure_suffix: " 结构详情",
    element_suffix: " 数组元素结构",
    circular: "循环引用，不再展开:",
};

/// Options for report generation.
///
/// Immutable for the duration of a render; build it up front and pass it by
/// reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Endpoint path -> priority. Prioritized paths come first, lowest
    /// priority value first; the rest follow in lexical path order.
    pub order: HashMap<String, i64>,
    /// Field and parameter names suppressed from every table.
    pub ignore: BTreeSet<String>,
    pub language: Language,
}

impl ReportOptions {
    /// Create options with no ordering, nothing ignored, English labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a priority to an endpoint path.
    pub fn order(mut self, path: impl Into<String>, priority: i64) -> Self {
        self.order.insert(path.into(), priority);
        self
    }

    /// Suppress a field or parameter name.
    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.ignore.insert(name.into());
        self
    }

    /// Select the report language.
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Returns the priority assigned to `path`, if any.
    pub fn priority(&self, path: &str) -> Option<i64> {
        self.order.get(path).copied()
    }

    /// Returns true if `name` must not appear in any table.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.contains(name)
    }

    pub fn labels(&self) -> &'static Labels {
        self.language.labels()
    }
}
