//! Marking matched terms inside snippet text.

use regex::{Captures, Regex, RegexBuilder};

/// Default CSS class of the span around a match.
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "search-word";

/// Wraps case-insensitive occurrences of a set of terms in a styled span.
///
/// Existing markup in the text is not escaped.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
    class: String,
}

impl Highlighter {
    /// Build a highlighter matching any of `terms`.
    ///
    /// With no usable terms the highlighter leaves text unchanged.
    #[must_use]
    pub fn new<T: AsRef<str>>(terms: &[T], class: &str) -> Self {
        let alternation = terms
            .iter()
            .map(AsRef::as_ref)
            .filter(|term| !term.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        let pattern = if alternation.is_empty() {
            None
        } else {
            RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .ok()
        };

        Self {
            pattern,
            class: class.to_string(),
        }
    }

    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };

        pattern
            .replace_all(text, |caps: &Captures| {
                format!("<span class=\"{}\">{}</span>", self.class, &caps[0])
            })
            .into_owned()
    }
}

/// One-off form of [`Highlighter::apply`] using the default class.
#[must_use]
pub fn highlight<T: AsRef<str>>(text: &str, terms: &[T]) -> String {
    Highlighter::new(terms, DEFAULT_HIGHLIGHT_CLASS).apply(text)
}
