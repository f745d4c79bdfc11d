/// Errors that can occur while building the final schema artifact.
///
/// Structural mismatches (a missing `parameters` list, a record for an undocumented
/// method, a literal path that matches no template) are not errors: they are logged
/// and reported through [`MergeReport`](crate::MergeReport).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum SwaggenError {
    /// JSON serialization/deserialization error.
    ///
    /// Occurs when the in-memory document cannot be turned into JSON.
    JsonValueError(serde_json::Error),

    /// The artifact could not be written.
    SinkError(std::io::Error),

    /// A placeholder value class or a redaction rule is not a valid regular expression.
    InvalidPattern(regex::Error),

    /// The raw generator document does not have the expected shape.
    #[display("Invalid schema document at '{path}': {error}")]
    #[from(skip)]
    InvalidDocument {
        /// Location of the failure inside the document.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
    },

    /// A captured JSON response body is not valid JSON.
    ///
    /// Generated examples must be faithful, so this is never skipped.
    #[display("Malformed JSON body for {status} on '{path}' ({content_type}): {error}\n{body}")]
    #[from(skip)]
    MalformedJsonBody {
        /// The literal captured path.
        path: String,
        /// The captured status code.
        status: http::StatusCode,
        /// The declared content type.
        content_type: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The body that failed to parse.
        body: String,
    },

    /// The deprecated paths signal is not a JSON array of strings.
    #[display("Invalid deprecated paths signal: {message}")]
    #[from(skip)]
    InvalidDeprecatedPaths {
        /// Description of the problem.
        message: String,
    },

    /// A captured exchange cannot be turned into an [`ExampleRecord`](crate::ExampleRecord).
    #[display("Invalid example record for '{path}': {message}")]
    #[from(skip)]
    InvalidExampleRecord {
        /// The literal captured path.
        path: String,
        /// Description of the problem.
        message: String,
    },
}
