//! Captured traffic examples and their merge into the document.

use http::{Method, StatusCode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SwaggenError;

mod merger;
pub use self::merger::{BODY_EXAMPLE_PARAM, ExampleMerger, MergeReport};

mod pattern;
pub use self::pattern::{PathPattern, PlaceholderTable};

/// A captured payload: raw text or an already parsed JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExampleBody {
    /// Body text as received.
    Raw(String),
    /// Structured body.
    Parsed(Value),
}

impl ExampleBody {
    /// Returns `true` for bodies carrying no data (blank text, `null`, `""`, `{}`, `[]`).
    ///
    /// Raw text holding one of these JSON values is empty as well, so a payload is
    /// judged the same whether it was captured raw or parsed.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Raw(text) if text.trim().is_empty() => true,
            Self::Raw(text) => serde_json::from_str::<Value>(text)
                .is_ok_and(|value| is_empty_value(&value)),
            Self::Parsed(value) => is_empty_value(value),
        }
    }

    /// The body as stored in the document, without interpretation.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Raw(text) => Value::String(text.clone()),
            Self::Parsed(value) => value.clone(),
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

impl From<&str> for ExampleBody {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for ExampleBody {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<Value> for ExampleBody {
    fn from(value: Value) -> Self {
        Self::Parsed(value)
    }
}

/// One captured request/response pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleRecord {
    /// HTTP method of the request.
    pub method: Method,
    /// Status code of the response.
    pub status: StatusCode,
    /// Content type of the response.
    pub content_type: Option<String>,
    /// Response payload.
    pub response_body: Option<ExampleBody>,
    /// Request payload.
    pub request_body: Option<ExampleBody>,
}

impl ExampleRecord {
    /// Creates a record without content.
    pub fn new(method: Method, status: StatusCode) -> Self {
        Self {
            method,
            status,
            content_type: None,
            response_body: None,
            request_body: None,
        }
    }

    /// Sets the response content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the response payload.
    pub fn with_response_body(mut self, body: impl Into<ExampleBody>) -> Self {
        self.response_body = Some(body.into());
        self
    }

    /// Sets the request payload.
    pub fn with_request_body(mut self, body: impl Into<ExampleBody>) -> Self {
        self.request_body = Some(body.into());
        self
    }
}

/// Records captured on one literal path.
pub type Records<'a> = indexmap::map::Values<'a, (Method, StatusCode), ExampleRecord>;

/// Captured records grouped per literal path, keyed by method and status code.
///
/// Recording the same `(path, method, status)` again replaces the previous capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamplePool {
    paths: IndexMap<String, IndexMap<(Method, StatusCode), ExampleRecord>>,
}

impl ExamplePool {
    /// Adds a record captured on a literal path.
    pub fn record(&mut self, path: impl Into<String>, record: ExampleRecord) {
        let key = (record.method.clone(), record.status);
        self.paths
            .entry(path.into())
            .or_default()
            .insert(key, record);
    }

    /// Adds a batch of captured exchanges.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidExampleRecord`] for an exchange with an invalid
    /// method or status code; exchanges before it are kept.
    pub fn extend_captures(
        &mut self,
        captures: impl IntoIterator<Item = CapturedExchange>,
    ) -> Result<(), SwaggenError> {
        for capture in captures {
            let (path, record) = capture.into_record()?;
            self.record(path, record);
        }
        Ok(())
    }

    /// Literal paths with their records.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Records<'_>)> {
        self.paths
            .iter()
            .map(|(path, records)| (path.as_str(), records.values()))
    }

    /// Number of captured literal paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Serialized form of a captured exchange, as written by a traffic capture harness.
///
/// ```json
/// {"path": "/api/v2/ping/", "method": "GET", "status": 200,
///  "content_type": "application/json", "response_body": "{\"ha\": false}"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedExchange {
    /// Literal path hit during capture.
    pub path: String,
    /// HTTP method name.
    pub method: String,
    /// Response status code.
    pub status: u16,
    /// Response content type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Response payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<ExampleBody>,
    /// Request payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ExampleBody>,
}

impl CapturedExchange {
    /// Splits into the literal path and a typed record.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidExampleRecord`] for an invalid method or status code.
    pub fn into_record(self) -> Result<(String, ExampleRecord), SwaggenError> {
        let Self {
            path,
            method,
            status,
            content_type,
            response_body,
            request_body,
        } = self;

        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|err| {
            SwaggenError::InvalidExampleRecord {
                path: path.clone(),
                message: format!("invalid method '{method}': {err}"),
            }
        })?;
        let status =
            StatusCode::from_u16(status).map_err(|err| SwaggenError::InvalidExampleRecord {
                path: path.clone(),
                message: format!("invalid status {status}: {err}"),
            })?;

        let record = ExampleRecord {
            method,
            status,
            content_type,
            response_body,
            request_body,
        };
        Ok((path, record))
    }
}
