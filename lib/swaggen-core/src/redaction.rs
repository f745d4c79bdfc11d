//! Diff-stabilizing redaction of the serialized artifact.
//!
//! Rules run on the rendered JSON text, whichever field holds the value, and only
//! substitute characters: JSON structure and escaping are left untouched.
//!
//! ```rust
//! use swaggen_core::{RedactionConfig, Redactor};
//!
//! let redactor = Redactor::new(&RedactionConfig::default()).expect("valid rules");
//! let text = r#"{"created": "2024-05-06T07:08:09.123Z", "uuid": "a1b2c3d4-0000-4000-8000-123456789abc"}"#;
//! assert_eq!(
//!     redactor.redact(text),
//!     r#"{"created": "2018-02-01T08:00:00.000000Z", "uuid": "00000000-0000-0000-0000-000000000000"}"#
//! );
//! ```

use regex::Regex;
use tracing::debug;

use crate::error::SwaggenError;

const TIMESTAMP_PATTERN: &str = r"[0-9]{4}-[0-9]{2}-[0-9]{2}(?:T|\s)[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:Z|[+-][0-9]{2}:[0-9]{2})?";

const UUID_PATTERN: &str = r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// Canonical values used by the [`Redactor`].
///
/// Replacement values end up inside JSON strings and must not contain `"` or `\`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionConfig {
    /// Replacement for every timestamp.
    pub canonical_timestamp: String,
    /// Field holding 40-character client identifiers.
    pub client_id_field: String,
    /// Replacement for client identifiers.
    pub client_id_placeholder: String,
    /// Field holding the name of the node that ran an action.
    pub node_field: String,
    /// Replacement for node names.
    pub canonical_node: String,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            canonical_timestamp: "2018-02-01T08:00:00.000000Z".to_string(),
            client_id_field: "client_id".to_string(),
            client_id_placeholder: "xxxx".to_string(),
            node_field: "action_node".to_string(),
            canonical_node: "awx".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: String,
}

/// Compiled redaction rules, applied in order: timestamps, client identifiers,
/// node names, UUIDs.
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<Rule>,
}

impl Redactor {
    /// Compiles the rules for the given canonical values.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidPattern`] if a rule does not compile.
    pub fn new(config: &RedactionConfig) -> Result<Self, SwaggenError> {
        let client_id = format!(
            r#"(\s+"{}": ")[a-zA-Z0-9]{{40}}(",\s*)"#,
            regex::escape(&config.client_id_field)
        );
        let node = format!(
            r#""{}": "(?:[^"\\]|\\.)*""#,
            regex::escape(&config.node_field)
        );

        let rules = vec![
            Rule {
                name: "timestamp",
                pattern: Regex::new(TIMESTAMP_PATTERN)?,
                replacement: escape_replacement(&config.canonical_timestamp),
            },
            Rule {
                name: "client_id",
                pattern: Regex::new(&client_id)?,
                replacement: format!(
                    "${{1}}{}${{2}}",
                    escape_replacement(&config.client_id_placeholder)
                ),
            },
            Rule {
                name: "node",
                pattern: Regex::new(&node)?,
                replacement: escape_replacement(&format!(
                    r#""{}": "{}""#,
                    config.node_field, config.canonical_node
                )),
            },
            Rule {
                name: "uuid",
                pattern: Regex::new(UUID_PATTERN)?,
                replacement: uuid::Uuid::nil().hyphenated().to_string(),
            },
        ];

        Ok(Self { rules })
    }

    /// Rewrites every volatile substring to its canonical value.
    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            let redacted = rule.pattern.replace_all(&result, rule.replacement.as_str());
            if let std::borrow::Cow::Owned(redacted) = redacted {
                debug!(rule = rule.name, "redacted volatile values");
                result = redacted;
            }
        }
        result
    }
}

fn escape_replacement(value: &str) -> String {
    value.replace('$', "$$")
}
