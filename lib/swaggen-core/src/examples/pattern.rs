use regex::Regex;

use crate::error::SwaggenError;

/// Placeholder tokens and the value class each one stands for.
///
/// Literal template text is escaped; a placeholder missing from the table only
/// matches itself, so templates using it receive no captured examples.
///
/// ```rust
/// use swaggen_core::PlaceholderTable;
///
/// let table = PlaceholderTable::default().with_placeholder("{uuid}", "[0-9a-f-]{36}");
/// let pattern = table.compile("/api/v2/jobs/{id}/").expect("valid pattern");
/// assert!(pattern.is_match("/api/v2/jobs/42/"));
/// assert!(!pattern.is_match("/api/v2/jobs/abc/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTable {
    entries: Vec<(String, String)>,
}

impl Default for PlaceholderTable {
    fn default() -> Self {
        Self::empty()
            .with_placeholder("{id}", "[0-9]+")
            .with_placeholder("{category_slug}", r"[a-zA-Z0-9\-]+")
    }
}

impl PlaceholderTable {
    /// A table without any placeholder.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces the value class of a placeholder token.
    pub fn with_placeholder(mut self, token: impl Into<String>, class: impl Into<String>) -> Self {
        let token = token.into();
        let class = class.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == token) {
            Some(entry) => entry.1 = class,
            None => self.entries.push((token, class)),
        }
        self
    }

    fn class_for<'t>(&self, text: &'t str) -> Option<(&str, &'t str)> {
        self.entries.iter().find_map(|(token, class)| {
            text.strip_prefix(token.as_str())
                .map(|after| (class.as_str(), after))
        })
    }

    /// Builds the anchored pattern matching literal paths of a template.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::InvalidPattern`] if a value class is not a valid regex.
    pub fn compile(&self, template: &str) -> Result<PathPattern, SwaggenError> {
        let mut pattern = String::from("^");
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            let (literal, tail) = rest.split_at(start);
            pattern.push_str(&regex::escape(literal));
            match self.class_for(tail) {
                Some((class, after)) => {
                    pattern.push_str("(?:");
                    pattern.push_str(class);
                    pattern.push(')');
                    rest = after;
                }
                None => {
                    pattern.push_str(r"\{");
                    rest = tail.get(1..).unwrap_or_default();
                }
            }
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let regex = Regex::new(&pattern)?;
        Ok(PathPattern {
            template: template.to_string(),
            regex,
        })
    }
}

/// Anchored matcher of literal paths for one path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
}

impl PathPattern {
    /// The path template this pattern was built from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns `true` if the whole literal path matches the template.
    pub fn is_match(&self, literal: &str) -> bool {
        self.regex.is_match(literal)
    }
}
