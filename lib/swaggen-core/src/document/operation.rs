use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Location of a [`Parameter`] (the Swagger `in` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterIn {
    /// Path template segment.
    Path,
    /// Query string.
    Query,
    /// Request body.
    Body,
    /// Request header.
    Header,
    /// Form field.
    FormData,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,

    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,

    /// Nested type description; for body parameters it may carry an `example`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    /// Fields not interpreted by the pipeline (`required`, `type`, `description`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Parameter {
    /// Creates a parameter without schema.
    pub fn new(name: impl Into<String>, location: ParameterIn) -> Self {
        Self {
            name: name.into(),
            location,
            schema: None,
            extra: IndexMap::new(),
        }
    }

    /// Body parameter whose schema carries a captured payload as example.
    pub fn body_example(name: impl Into<String>, example: Value) -> Self {
        let schema = serde_json::json!({ "example": example });
        Self {
            schema: Some(schema),
            ..Self::new(name, ParameterIn::Body)
        }
    }

    /// Returns `true` for the path parameter with the given name.
    pub fn is_path_param(&self, name: &str) -> bool {
        self.location == ParameterIn::Path && self.name == name
    }
}

/// A documented response for one status code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Examples by content type: a JSON value, or raw text for non-JSON types.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Value>,

    /// Fields not interpreted by the pipeline (`description`, `schema`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One HTTP method's behavior on one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Raw, possibly multi-line, description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Short summary derived from the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Ordered parameters; may be absent in generator output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,

    /// Responses by status code string.
    #[serde(default)]
    pub responses: IndexMap<String, ResponseSpec>,

    /// Content types this operation produces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,

    /// Deprecation flag; `None` when the generator did not emit one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Fields not interpreted by the pipeline (`operationId`, `tags`, `consumes`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Operation {
    /// Returns `true` if the operation is flagged as deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or_default()
    }

    /// Removes the parameters matching the predicate, keeping the order of the others.
    ///
    /// Returns the number of removed parameters. An absent list stays absent.
    pub fn remove_parameters(&mut self, predicate: impl Fn(&Parameter) -> bool) -> usize {
        let Some(parameters) = self.parameters.as_mut() else {
            return 0;
        };
        let before = parameters.len();
        parameters.retain(|param| !predicate(param));
        before - parameters.len()
    }

    /// Adds a content type to `produces` unless already present.
    pub fn add_produces(&mut self, content_type: &str) {
        let produces = self.produces.get_or_insert_with(Vec::new);
        if !produces.iter().any(|existing| existing == content_type) {
            produces.push(content_type.to_string());
        }
    }
}
