//! Summaries and deprecation flags.

use http::HeaderMap;
use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

use crate::document::SchemaDocument;
use crate::error::SwaggenError;
use crate::normalize::PathOrigins;

/// Response header carrying the deprecated paths as a JSON array.
pub const DEPRECATED_PATHS_HEADER: &str = "x-deprecated-paths";

/// Generator-form path templates reported as deprecated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeprecatedPaths(IndexSet<String>);

impl DeprecatedPaths {
    /// Reads the [`DEPRECATED_PATHS_HEADER`] header; an absent header yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidDeprecatedPaths`] if the header is not a JSON array of strings.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SwaggenError> {
        let Some(header) = headers.get(DEPRECATED_PATHS_HEADER) else {
            return Ok(Self::default());
        };
        let text = header
            .to_str()
            .map_err(|err| SwaggenError::InvalidDeprecatedPaths {
                message: err.to_string(),
            })?;
        Self::from_json(text)
    }

    /// Parses a JSON array of paths.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidDeprecatedPaths`] if the text is not a JSON array of strings.
    pub fn from_json(text: &str) -> Result<Self, SwaggenError> {
        let paths = serde_json::from_str::<Vec<String>>(text).map_err(|err| {
            SwaggenError::InvalidDeprecatedPaths {
                message: err.to_string(),
            }
        })?;
        Ok(paths.into_iter().collect())
    }

    pub(crate) fn from_value(value: Value) -> Result<Self, SwaggenError> {
        let paths = serde_json::from_value::<Vec<String>>(value).map_err(|err| {
            SwaggenError::InvalidDeprecatedPaths {
                message: err.to_string(),
            }
        })?;
        Ok(paths.into_iter().collect())
    }

    /// Returns `true` if the generator path is deprecated.
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    /// Number of deprecated paths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no path is deprecated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds the paths of another signal.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl<S: Into<String>> FromIterator<S> for DeprecatedPaths {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Splits a description into its summary line and the remaining text.
///
/// The first line loses surrounding `#` and `:` characters and whitespace, so a
/// markdown heading becomes a plain summary. Returns `None` for an empty description.
///
/// ```rust
/// use swaggen_core::split_description;
///
/// let (summary, rest) = split_description("# Create a credential\nAdditional detail.")
///     .expect("non empty");
/// assert_eq!(summary, "Create a credential");
/// assert_eq!(rest, "Additional detail.");
/// ```
pub fn split_description(description: &str) -> Option<(String, String)> {
    let mut lines = description.lines();
    let first = lines.next()?;
    let summary = first.trim_matches(['#', ':']).trim().to_string();
    let rest = lines.collect::<Vec<_>>().join("\n");
    Some((summary, rest))
}

fn missing_description(method: &str, path: &str) -> String {
    format!(
        "No Description for {} on {path}",
        method.to_ascii_uppercase()
    )
}

/// Derives summaries and applies deprecation flags.
#[derive(Debug, Clone, Copy)]
pub struct OperationAnnotator<'a> {
    deprecated: &'a DeprecatedPaths,
}

impl<'a> OperationAnnotator<'a> {
    /// Creates an annotator for the given deprecation signal.
    pub fn new(deprecated: &'a DeprecatedPaths) -> Self {
        Self { deprecated }
    }

    /// Annotates every operation of a normalized document.
    ///
    /// Deprecation is looked up with the generator path recorded in `origins`.
    /// Operations without a `description` field are left as is.
    pub fn annotate(&self, document: &mut SchemaDocument, origins: &PathOrigins) {
        for (path, item) in &mut document.paths {
            let is_deprecated = self.deprecated.contains(origins.original(path));
            if is_deprecated {
                debug!(%path, "marking path as deprecated");
            }

            for (method, operation) in &mut item.operations {
                if is_deprecated {
                    operation.deprecated = Some(true);
                }

                let Some(description) = operation.description.as_deref() else {
                    continue;
                };
                match split_description(description) {
                    Some((summary, rest)) => {
                        operation.summary = Some(summary);
                        operation.description = Some(rest);
                    }
                    None => {
                        operation.summary = Some(missing_description(method, path));
                        operation.description = Some(String::new());
                    }
                }
            }
        }
    }
}
