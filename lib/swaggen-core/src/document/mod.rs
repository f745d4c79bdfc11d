//! Swagger/OpenAPI document model.
//!
//! Only the fields the pipeline reads or writes are typed; everything else the
//! generator emits is carried in `extra` maps so that it reaches the artifact unchanged.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::annotate::DeprecatedPaths;
use crate::error::SwaggenError;

mod operation;
pub use self::operation::{Operation, Parameter, ParameterIn, ResponseSpec};

mod path_item;
pub use self::path_item::{OPERATION_METHODS, PathItem};

/// Key under which a generator may embed the deprecated paths inside the document.
const DEPRECATED_PATHS_KEY: &str = "deprecated_paths";

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    #[serde(default)]
    pub title: String,
    /// Released version of the API.
    #[serde(default)]
    pub version: String,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Other metadata fields (`contact`, `license`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// The root schema artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Metadata.
    #[serde(default)]
    pub info: Info,
    /// Published host, `null` when the document is host-agnostic.
    #[serde(default)]
    pub host: Option<String>,
    /// Supported protocols.
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Accepted request content types.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Path items by path template.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Freshness timestamp set on finalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Other top-level fields (`swagger`, `basePath`, `definitions`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A raw document as produced by the upstream generator.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOutput {
    /// The parsed document.
    pub document: SchemaDocument,
    /// Deprecated paths embedded in the document, in generator path form.
    pub deprecated_paths: DeprecatedPaths,
}

impl SchemaDocument {
    /// Parses raw generator output.
    ///
    /// A top-level `deprecated_paths` array is moved out of the document.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidDocument`] with the location of the failure when
    /// the text is not a document of the expected shape.
    pub fn from_json(json: &str) -> Result<GeneratorOutput, SwaggenError> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let mut document: Self = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |err| SwaggenError::InvalidDocument {
                path: err.path().to_string(),
                error: err.into_inner(),
            },
        )?;
        deserializer
            .end()
            .map_err(|error| SwaggenError::InvalidDocument {
                path: String::new(),
                error,
            })?;

        let deprecated_paths = match document.extra.shift_remove(DEPRECATED_PATHS_KEY) {
            Some(paths) => DeprecatedPaths::from_value(paths)?,
            None => DeprecatedPaths::default(),
        };
        debug!(
            paths = document.paths.len(),
            deprecated = deprecated_paths.len(),
            "parsed generator output"
        );

        Ok(GeneratorOutput {
            document,
            deprecated_paths,
        })
    }

    /// Serializes with sorted keys and two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::JsonValueError`] if the document cannot be represented as JSON.
    pub fn to_canonical_json(&self) -> Result<String, SwaggenError> {
        to_canonical_json(self)
    }
}

/// Serializes any value with object keys sorted at every depth, whatever the
/// key order of `serde_json::Map` in the build.
pub(crate) fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, SwaggenError> {
    let value = sort_keys(serde_json::to_value(value)?);
    let json = serde_json::to_string_pretty(&value)?;
    Ok(json)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(fields) => {
            let sorted = fields
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use serde_json::json;

    #[test]
    fn should_parse_generator_output() {
        let raw = r#"{
            "swagger": "2.0",
            "info": {"title": "AWX API", "version": "", "contact": {"email": "a@b.c"}},
            "basePath": "/",
            "paths": {
                "/api/": {"get": {"description": "List versions", "responses": {}}}
            },
            "deprecated_paths": ["/api/{version}/old/"]
        }"#;

        let GeneratorOutput {
            document,
            deprecated_paths,
        } = SchemaDocument::from_json(raw).expect("valid document");

        assert_eq!(document.info.title, "AWX API");
        assert!(document.paths.contains_key("/api/"));
        assert!(deprecated_paths.contains("/api/{version}/old/"));
        assert!(!document.extra.contains_key("deprecated_paths"));
        assert_eq!(document.extra.get("swagger"), Some(&Value::from("2.0")));
    }

    #[test]
    fn should_report_invalid_operation() {
        let raw = r#"{"info": {"title": "x", "version": "1"}, "paths": {"/a/": {"get": []}}}"#;

        let err = SchemaDocument::from_json(raw).expect_err("invalid operation");

        assert!(
            matches!(&err, SwaggenError::InvalidDocument { error, .. } if error.to_string().starts_with("get:")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn should_keep_generator_path_order() {
        let raw = r#"{"paths": {"/b/": {}, "/c/": {}, "/a/": {}}, "deprecated_paths": []}"#;

        let output = SchemaDocument::from_json(raw).expect("valid document");

        let paths = output.document.paths.keys().collect::<Vec<_>>();
        assert_eq!(paths, ["/b/", "/c/", "/a/"]);
        assert!(output.deprecated_paths.is_empty());
    }

    #[test]
    fn should_reject_trailing_content() {
        let result = SchemaDocument::from_json(r#"{"paths": {}} {}"#);

        assert!(matches!(result, Err(SwaggenError::InvalidDocument { .. })));
    }

    #[test]
    fn should_sort_keys_inserted_out_of_order() {
        let mut fields = IndexMap::new();
        fields.insert("zeta", json!({"b": 1, "a": [{"y": true, "x": null}]}));
        fields.insert("alpha", json!("first"));

        let json = to_canonical_json(&fields).expect("serialize");

        assert_eq!(
            json,
            "{\n  \"alpha\": \"first\",\n  \"zeta\": {\n    \"a\": [\n      {\n        \"x\": null,\n        \"y\": true\n      }\n    ],\n    \"b\": 1\n  }\n}"
        );
    }

    #[test]
    fn should_serialize_with_sorted_keys() {
        let raw = r#"{
            "swagger": "2.0",
            "paths": {"/b/": {"get": {"responses": {}}}, "/a/": {}},
            "info": {"version": "1", "title": "T"}
        }"#;
        let output = SchemaDocument::from_json(raw).expect("valid document");

        let json = output.document.to_canonical_json().expect("serialize");

        assert_snapshot!(json, @r#"
        {
          "consumes": [],
          "host": null,
          "info": {
            "title": "T",
            "version": "1"
          },
          "paths": {
            "/a/": {},
            "/b/": {
              "get": {
                "responses": {}
              }
            }
          },
          "schemes": [],
          "swagger": "2.0"
        }
        "#);
    }
}
