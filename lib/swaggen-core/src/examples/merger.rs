use std::collections::HashSet;

use http::Method;
use tracing::{debug, info};

use super::{ExampleBody, ExamplePool, ExampleRecord, PathPattern, PlaceholderTable};
use crate::document::{Operation, Parameter, ParameterIn, SchemaDocument};
use crate::error::SwaggenError;

/// Name of the body parameter carrying a captured request payload.
pub const BODY_EXAMPLE_PARAM: &str = "data";

/// How a response content type is stored as an example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentKind {
    Json,
    Html,
    Other,
}

impl ContentKind {
    fn of(content_type: &str) -> Self {
        let Ok(mime) = content_type.parse::<mime::Mime>() else {
            return Self::Other;
        };
        if mime.type_() == mime::TEXT && mime.subtype() == mime::HTML {
            Self::Html
        } else if mime.type_() == mime::APPLICATION
            && (mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON))
        {
            Self::Json
        } else {
            Self::Other
        }
    }
}

/// Outcome of one [`ExampleMerger::merge`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of `(template, literal path)` pairs that matched.
    pub matches: usize,
    /// Response examples written.
    pub response_examples: usize,
    /// Request body examples written.
    pub request_examples: usize,
    /// Literal paths that matched no template.
    pub unmatched_paths: Vec<String>,
    /// Records whose method is not documented on the matched template.
    pub skipped_methods: Vec<(String, Method)>,
    /// The schema-generation-only mode stopped the merge at the first request example.
    pub short_circuited: bool,
}

enum Flow {
    Continue,
    ShortCircuit,
}

/// Enriches a normalized document with captured traffic examples.
///
/// Every captured literal path is tested against every path template of the document;
/// all matching templates are enriched. A record contributes:
///
/// - its content type to the operation's `produces`,
/// - its request payload, on success responses, as the example of a body parameter
///   replacing the generator's inferred one,
/// - its response payload as `responses[status].examples[content_type]`, parsed when
///   the content type is JSON, skipped when it is HTML.
///
/// Merging is idempotent: merging a pool again leaves the document unchanged.
#[derive(Debug, Clone, Copy)]
pub struct ExampleMerger<'a> {
    placeholders: &'a PlaceholderTable,
    schema_only: bool,
}

impl<'a> ExampleMerger<'a> {
    /// Creates a merger using the placeholder table.
    pub fn new(placeholders: &'a PlaceholderTable) -> Self {
        Self {
            placeholders,
            schema_only: false,
        }
    }

    /// In schema-generation-only mode the merge stops at the first request example.
    pub fn with_schema_only(mut self, schema_only: bool) -> Self {
        self.schema_only = schema_only;
        self
    }

    /// Merges the captured examples into the document.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidPattern`] if a template cannot be compiled, and
    /// [`SwaggenError::MalformedJsonBody`] if a JSON response body does not parse.
    pub fn merge(
        &self,
        document: &mut SchemaDocument,
        pool: &ExamplePool,
    ) -> Result<MergeReport, SwaggenError> {
        let patterns = document
            .paths
            .keys()
            .map(|template| self.placeholders.compile(template))
            .collect::<Result<Vec<PathPattern>, _>>()?;

        let mut report = MergeReport::default();
        let mut matched = HashSet::new();

        for pattern in &patterns {
            let Some(item) = document.paths.get_mut(pattern.template()) else {
                continue;
            };
            for (literal, records) in pool.iter() {
                if !pattern.is_match(literal) {
                    continue;
                }
                matched.insert(literal);
                report.matches += 1;
                debug!(template = pattern.template(), %literal, "merging captured examples");

                for record in records {
                    let Some(operation) = item.operation_mut(&record.method) else {
                        debug!(%literal, method = %record.method, "method not documented, skipping");
                        report
                            .skipped_methods
                            .push((literal.to_string(), record.method.clone()));
                        continue;
                    };
                    if let Flow::ShortCircuit =
                        self.merge_record(operation, literal, record, &mut report)?
                    {
                        info!(%literal, "schema generation only, skipping example injection");
                        report.short_circuited = true;
                        return Ok(report);
                    }
                }
            }
        }

        report.unmatched_paths = pool
            .iter()
            .map(|(literal, _)| literal)
            .filter(|literal| !matched.contains(literal))
            .map(ToString::to_string)
            .collect();
        if !report.unmatched_paths.is_empty() {
            debug!(unmatched = ?report.unmatched_paths, "captured paths outside the documented surface");
        }

        Ok(report)
    }

    fn merge_record(
        &self,
        operation: &mut Operation,
        literal: &str,
        record: &ExampleRecord,
        report: &mut MergeReport,
    ) -> Result<Flow, SwaggenError> {
        let content_type = record
            .content_type
            .as_deref()
            .filter(|content_type| !content_type.is_empty());
        if let Some(content_type) = content_type {
            operation.add_produces(content_type);
        }

        let request = record.request_body.as_ref().filter(|body| !body.is_empty());
        if let Some(request) = request.filter(|_| record.status.is_success()) {
            let parameter = Parameter::body_example(BODY_EXAMPLE_PARAM, request.to_value());
            let already_merged = operation
                .parameters
                .iter()
                .flatten()
                .any(|existing| *existing == parameter);
            if !already_merged {
                operation.remove_parameters(|param| param.location == ParameterIn::Body);
                if self.schema_only {
                    return Ok(Flow::ShortCircuit);
                }
                operation
                    .parameters
                    .get_or_insert_with(Vec::new)
                    .push(parameter);
                report.request_examples += 1;
            }
        }

        let Some(response) = record.response_body.as_ref().filter(|body| !body.is_empty()) else {
            return Ok(Flow::Continue);
        };
        let Some(content_type) = content_type else {
            debug!(%literal, status = %record.status, "response without content type, skipping");
            return Ok(Flow::Continue);
        };
        let example = match ContentKind::of(content_type) {
            ContentKind::Html => return Ok(Flow::Continue),
            ContentKind::Json => parse_json_body(response, literal, record, content_type)?,
            ContentKind::Other => response.to_value(),
        };

        operation
            .responses
            .entry(record.status.as_str().to_string())
            .or_default()
            .examples
            .insert(content_type.to_string(), example);
        report.response_examples += 1;

        Ok(Flow::Continue)
    }
}

fn parse_json_body(
    body: &ExampleBody,
    literal: &str,
    record: &ExampleRecord,
    content_type: &str,
) -> Result<serde_json::Value, SwaggenError> {
    match body {
        ExampleBody::Parsed(value) => Ok(value.clone()),
        ExampleBody::Raw(text) => {
            serde_json::from_str(text).map_err(|error| SwaggenError::MalformedJsonBody {
                path: literal.to_string(),
                status: record.status,
                content_type: content_type.to_string(),
                error,
                body: text.clone(),
            })
        }
    }
}
