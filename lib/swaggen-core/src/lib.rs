//! # Swaggen Core
//!
//! Turn a machine-generated Swagger/OpenAPI document into a stable, example-augmented
//! artifact suitable for publishing and for diff-based regression testing.
//!
//! The pipeline runs in a fixed order:
//!
//! 1. [`PathNormalizer`] bakes the default API version into path templates and drops the
//!    `version` path parameter.
//! 2. [`OperationAnnotator`] derives summaries from descriptions and flags deprecated paths.
//! 3. [`ExampleMerger`] enriches operations with captured traffic ([`ExamplePool`]); it can
//!    run any number of times as more traffic is captured.
//! 4. [`DocumentAssembler::finalize`] sets the release version, serializes with sorted
//!    keys and passes the text through the [`Redactor`].
//!
//! ## Quick Start
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use swaggen_core::{AssemblerConfig, DocumentAssembler, ExamplePool, ExampleRecord, SchemaDocument};
//!
//! # fn main() -> Result<(), swaggen_core::SwaggenError> {
//! let raw = r#"{
//!     "info": {"title": "API", "version": ""},
//!     "paths": {"/api/{version}/ping/": {"get": {"description": "Ping\ndetail", "responses": {}}}}
//! }"#;
//!
//! let output = SchemaDocument::from_json(raw)?;
//! let mut assembler = DocumentAssembler::prepare(output, AssemblerConfig::default())?;
//!
//! let mut pool = ExamplePool::default();
//! pool.record(
//!     "/api/v2/ping/",
//!     ExampleRecord::new(Method::GET, StatusCode::OK)
//!         .with_content_type("application/json")
//!         .with_response_body(r#"{"status":"ok"}"#),
//! );
//! assembler.merge_examples(&pool)?;
//!
//! let artifact = assembler.finalize("1.0.0", chrono::Utc::now())?;
//! assert!(artifact.contains(r#""/api/v2/ping/""#));
//! # Ok(())
//! # }
//! ```
//!
//! ## Deprecated paths
//!
//! Deprecation is signaled in generator path form, either embedded in the raw document
//! (`deprecated_paths`) or through the `X-Deprecated-Paths` response header, see
//! [`DeprecatedPaths::from_headers`].

mod annotate;
pub use self::annotate::{
    DEPRECATED_PATHS_HEADER, DeprecatedPaths, OperationAnnotator, split_description,
};

mod assembler;
pub use self::assembler::{
    ArtifactSink, AssemblerConfig, DEFAULT_ARTIFACT, DEFAULT_VERSION, DocumentAssembler,
    DocumentCache, FileSink,
};

mod document;
pub use self::document::{
    GeneratorOutput, Info, OPERATION_METHODS, Operation, Parameter, ParameterIn, PathItem,
    ResponseSpec, SchemaDocument,
};

mod error;
pub use self::error::SwaggenError;

mod examples;
pub use self::examples::{
    BODY_EXAMPLE_PARAM, CapturedExchange, ExampleBody, ExampleMerger, ExamplePool, ExampleRecord,
    MergeReport, PathPattern, PlaceholderTable, Records,
};

mod normalize;
pub use self::normalize::{PathNormalizer, PathOrigins, VERSION_PARAM};

mod redaction;
pub use self::redaction::{RedactionConfig, Redactor};
