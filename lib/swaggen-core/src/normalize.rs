use std::mem;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::document::SchemaDocument;

/// Name of the mandatory version path parameter emitted by the generator.
pub const VERSION_PARAM: &str = "version";

fn placeholder(param_name: &str) -> String {
    ["{", param_name, "}"].concat()
}

/// Bakes the API version into path templates.
///
/// Every `{version}` segment is replaced by the default version and the matching
/// `version` path parameter is dropped from the operations, since clients no longer
/// supply it.
///
/// ```rust
/// use swaggen_core::PathNormalizer;
///
/// let normalizer = PathNormalizer::new("v2");
/// assert_eq!(normalizer.normalize_path("/api/{version}/ping/"), "/api/v2/ping/");
/// ```
#[derive(Debug, Clone)]
pub struct PathNormalizer {
    param_name: String,
    placeholder: String,
    version: String,
}

impl PathNormalizer {
    /// Creates a normalizer for the `version` placeholder.
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_param(VERSION_PARAM, version)
    }

    /// Creates a normalizer for a custom version placeholder name.
    pub fn with_param(param_name: impl Into<String>, version: impl Into<String>) -> Self {
        let param_name = param_name.into();
        Self {
            placeholder: placeholder(&param_name),
            param_name,
            version: version.into(),
        }
    }

    /// Replaces every version placeholder of a path template.
    pub fn normalize_path(&self, path: &str) -> String {
        path.replace(&self.placeholder, &self.version)
    }

    /// Rewrites every path key of the document and strips the version path parameter.
    ///
    /// When two generator paths normalize to the same key, the later one wins.
    pub fn normalize(&self, document: &mut SchemaDocument) -> PathOrigins {
        let paths = mem::take(&mut document.paths);
        let mut origins = PathOrigins::default();

        for (raw_path, mut item) in paths {
            let mut removed = 0;
            if let Some(shared) = item.parameters.as_mut() {
                let before = shared.len();
                shared.retain(|param| !param.is_path_param(&self.param_name));
                removed += before - shared.len();
            }
            for operation in item.operations.values_mut() {
                removed += operation.remove_parameters(|param| param.is_path_param(&self.param_name));
            }

            let path = self.normalize_path(&raw_path);
            debug!(%raw_path, %path, removed, "normalized path");
            if document.paths.insert(path.clone(), item).is_some() {
                warn!(%raw_path, %path, "normalized path collides with another path, keeping the latter");
            }
            origins.0.insert(path, raw_path);
        }

        origins
    }
}

/// Generator path each normalized path key comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathOrigins(IndexMap<String, String>);

impl PathOrigins {
    /// The generator form of a normalized path; unknown paths map to themselves.
    pub fn original<'a>(&'a self, path: &'a str) -> &'a str {
        self.0.get(path).map_or(path, String::as_str)
    }
}
