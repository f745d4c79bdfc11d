//! Pipeline orchestration.
//!
//! ```text
//! generator output ─▶ PathNormalizer ─▶ OperationAnnotator ─▶ ExampleMerger (repeatable)
//!                  ─▶ finalize: version + freshness ─▶ canonical JSON ─▶ Redactor ─▶ sink
//! ```
//!
//! Stage order is fixed: the merger matches captured paths against normalized templates.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::annotate::OperationAnnotator;
use crate::document::{GeneratorOutput, SchemaDocument};
use crate::error::SwaggenError;
use crate::examples::{ExampleMerger, ExamplePool, MergeReport, PlaceholderTable};
use crate::normalize::PathNormalizer;
use crate::redaction::{RedactionConfig, Redactor};

mod cache;
pub use self::cache::DocumentCache;

mod sink;
pub use self::sink::{ArtifactSink, DEFAULT_ARTIFACT, FileSink};

/// Default API version baked into path templates.
pub const DEFAULT_VERSION: &str = "v2";

/// Settings of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Version replacing the `{version}` placeholder.
    pub default_version: String,
    /// Published host; `None` serializes as `null`.
    pub host: Option<String>,
    /// Supported protocols.
    pub schemes: Vec<String>,
    /// Accepted request content types.
    pub consumes: Vec<String>,
    /// Schema-generation-only mode: no example injection, no freshness timestamp.
    pub schema_only: bool,
    /// Placeholder value classes used to match captured paths.
    pub placeholders: PlaceholderTable,
    /// Canonical values of the redaction pass.
    pub redaction: RedactionConfig,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            host: None,
            schemes: vec!["https".to_string()],
            consumes: vec!["application/json".to_string()],
            schema_only: false,
            placeholders: PlaceholderTable::default(),
            redaction: RedactionConfig::default(),
        }
    }
}

impl AssemblerConfig {
    /// Sets the version replacing the `{version}` placeholder.
    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }

    /// Sets the published host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the supported protocols.
    pub fn with_schemes(mut self, schemes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the accepted request content types.
    pub fn with_consumes(mut self, consumes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.consumes = consumes.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables the schema-generation-only mode.
    pub fn with_schema_only(mut self, schema_only: bool) -> Self {
        self.schema_only = schema_only;
        self
    }

    /// Sets the placeholder table.
    pub fn with_placeholders(mut self, placeholders: PlaceholderTable) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Sets the redaction canonical values.
    pub fn with_redaction(mut self, redaction: RedactionConfig) -> Self {
        self.redaction = redaction;
        self
    }
}

/// A normalized, annotated document waiting for examples and finalization.
///
/// Finalizing consumes the assembler, so a document is finalized at most once.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    document: SchemaDocument,
    config: AssemblerConfig,
    redactor: Redactor,
}

impl DocumentAssembler {
    /// Applies the publishing defaults, normalizes the paths and annotates the operations.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidPattern`] if the redaction rules do not compile.
    pub fn prepare(output: GeneratorOutput, config: AssemblerConfig) -> Result<Self, SwaggenError> {
        let GeneratorOutput {
            mut document,
            deprecated_paths,
        } = output;
        let redactor = Redactor::new(&config.redaction)?;

        document.host.clone_from(&config.host);
        document.schemes.clone_from(&config.schemes);
        document.consumes.clone_from(&config.consumes);

        let origins = PathNormalizer::new(&config.default_version).normalize(&mut document);
        OperationAnnotator::new(&deprecated_paths).annotate(&mut document, &origins);
        info!(
            paths = document.paths.len(),
            deprecated = deprecated_paths.len(),
            version = %config.default_version,
            "document prepared"
        );

        Ok(Self {
            document,
            config,
            redactor,
        })
    }

    /// The document in its current state.
    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    /// The settings of this run.
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Merges the captured examples; may be called again as more traffic is captured.
    ///
    /// # Errors
    ///
    /// See [`ExampleMerger::merge`].
    pub fn merge_examples(&mut self, pool: &ExamplePool) -> Result<MergeReport, SwaggenError> {
        let report = ExampleMerger::new(&self.config.placeholders)
            .with_schema_only(self.config.schema_only)
            .merge(&mut self.document, pool)?;
        info!(
            matches = report.matches,
            responses = report.response_examples,
            requests = report.request_examples,
            unmatched = report.unmatched_paths.len(),
            "examples merged"
        );
        Ok(report)
    }

    /// Sets the release version and freshness timestamp, then renders the redacted artifact.
    ///
    /// The freshness timestamp is not set in schema-generation-only mode.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::JsonValueError`] if the document cannot be serialized.
    pub fn finalize(self, release: impl Into<String>, now: DateTime<Utc>) -> Result<String, SwaggenError> {
        let Self {
            mut document,
            config,
            redactor,
        } = self;

        document.info.version = release.into();
        if !config.schema_only {
            document.modified = Some(now.to_rfc3339_opts(SecondsFormat::Micros, true));
        }
        if document.paths.is_empty() {
            warn!("finalizing a document without paths");
        }

        let json = document.to_canonical_json()?;
        Ok(redactor.redact(&json))
    }

    /// Finalizes and writes the artifact to the sink.
    ///
    /// # Errors
    ///
    /// See [`finalize`](Self::finalize) and [`ArtifactSink::write`].
    pub fn write_to(
        self,
        release: impl Into<String>,
        now: DateTime<Utc>,
        sink: &mut impl ArtifactSink,
    ) -> Result<(), SwaggenError> {
        let artifact = self.finalize(release, now)?;
        sink.write(&artifact)
    }
}
