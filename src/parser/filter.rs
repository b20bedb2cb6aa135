//! Heading-title filter.
//!
//! Un-rendered math source occasionally parses as a heading (a setext
//! underline under a matrix, a stray `#` in front of a formula). Such titles
//! are noise in a table of contents, so headings are rejected when their
//! text is empty, too long, or looks like LaTeX.

use crate::error::ConfigError;
use regex::{Regex, RegexSet};
use std::fmt;
use std::sync::OnceLock;

/// Heading texts with this many characters or more are rejected.
pub const DEFAULT_MAX_HEADING_CHARS: usize = 200;

/// Patterns that mark a heading text as math source rather than a title.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    r"\\begin\{[^}]*\}",
    r"\\end\{[^}]*\}",
    r"\\[a-zA-Z]+",
    r"[\[\]{}]",
    r"\^",
    r"_",
    r"(?-u:\b)(?:pmatrix|matrix|bmatrix|vmatrix|Vmatrix|align|equation|gather)(?-u:\b)",
];

/// Why a heading was left out of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    TooLong { chars: usize },
    Pattern(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "empty text"),
            Rejection::TooLong { chars } => write!(f, "{} characters", chars),
            Rejection::Pattern(pattern) => write!(f, "matches `{}`", pattern),
        }
    }
}

/// Length cutoff plus a set of exclusion patterns.
#[derive(Debug, Clone)]
pub struct HeadingFilter {
    max_chars: usize,
    patterns: RegexSet,
}

impl HeadingFilter {
    /// Build a filter from a character cutoff and a list of patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] naming the first pattern that does
    /// not compile.
    pub fn new<I, S>(max_chars: usize, patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        // Compile individually first so the error names the bad pattern.
        for pattern in &patterns {
            Regex::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
        }

        let set = RegexSet::new(&patterns).map_err(|source| ConfigError::Pattern {
            pattern: patterns.join(" | "),
            source,
        })?;

        Ok(Self {
            max_chars,
            patterns: set,
        })
    }

    /// The character cutoff.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// The exclusion patterns, in configuration order.
    pub fn patterns(&self) -> &[String] {
        self.patterns.patterns()
    }

    /// Return the reason `text` would be rejected, or `None` if it is kept.
    ///
    /// `text` is expected to be trimmed already.
    ///
    /// # Examples
    ///
    /// ```
    /// use toctree::parser::filter::{HeadingFilter, Rejection};
    ///
    /// let filter = HeadingFilter::default();
    /// assert_eq!(filter.rejection("Introduction"), None);
    /// assert_eq!(filter.rejection(""), Some(Rejection::Empty));
    /// assert!(filter.rejection(r"\frac{a}{b}").is_some());
    /// ```
    pub fn rejection(&self, text: &str) -> Option<Rejection> {
        if text.is_empty() {
            return Some(Rejection::Empty);
        }

        let chars = text.chars().count();
        if chars >= self.max_chars {
            return Some(Rejection::TooLong { chars });
        }

        self.patterns
            .matches(text)
            .iter()
            .next()
            .map(|idx| Rejection::Pattern(self.patterns.patterns()[idx].clone()))
    }

    /// Whether `text` is kept.
    pub fn accepts(&self, text: &str) -> bool {
        self.rejection(text).is_none()
    }
}

impl Default for HeadingFilter {
    fn default() -> Self {
        static DEFAULT: OnceLock<HeadingFilter> = OnceLock::new();
        DEFAULT
            .get_or_init(|| {
                HeadingFilter::new(DEFAULT_MAX_HEADING_CHARS, DEFAULT_EXCLUDE_PATTERNS)
                    .expect("built-in exclusion patterns compile")
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_titles_are_kept() {
        let filter = HeadingFilter::default();
        for title in ["Introduction", "Step 1: Install", "Q&A", "What's new?", "C++ tips"] {
            assert!(filter.accepts(title), "{title} should be kept");
        }
    }

    #[test]
    fn test_matrix_source_is_rejected() {
        let filter = HeadingFilter::default();
        let text = r"\begin{pmatrix} 1 & 0 \\ 0 & 1 \end{pmatrix}";
        assert_eq!(
            filter.rejection(text),
            Some(Rejection::Pattern(DEFAULT_EXCLUDE_PATTERNS[0].to_string()))
        );
    }

    #[test]
    fn test_each_latex_marker_is_rejected() {
        let filter = HeadingFilter::default();
        for text in [
            r"\end{align}",
            r"\alpha + \beta",
            "f[x]",
            "set {a, b}",
            "x^2",
            "a_i",
            "pmatrix",
            "Vmatrix",
            "the equation",
            "gather terms",
            "align",
        ] {
            assert!(!filter.accepts(text), "{text} should be rejected");
        }
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        let filter = HeadingFilter::default();
        assert!(filter.accepts("Alignment"));
        assert!(filter.accepts("Equations"));
        assert!(filter.accepts("Gathering"));
        assert!(filter.accepts("Matrices"));
    }

    #[test]
    fn test_keyword_boundary_is_ascii() {
        // Non-ASCII letters end an ASCII word, so the keyword still stands alone.
        let filter = HeadingFilter::default();
        assert!(!filter.accepts("alignée"));
        assert!(!filter.accepts("ématrix"));
        assert!(filter.accepts("alignement"));
    }

    #[test]
    fn test_length_cutoff() {
        let filter = HeadingFilter::default();
        assert!(filter.accepts(&"a".repeat(199)));
        assert_eq!(
            filter.rejection(&"a".repeat(200)),
            Some(Rejection::TooLong { chars: 200 })
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let filter = HeadingFilter::default();
        assert!(filter.accepts(&"é".repeat(199)));
    }

    #[test]
    fn test_custom_patterns_replace_defaults() {
        let filter = HeadingFilter::new(50, ["^TODO"]).unwrap();
        assert!(filter.accepts("x^2"));
        assert!(!filter.accepts("TODO later"));
        assert!(!filter.accepts(&"b".repeat(50)));
        assert_eq!(filter.patterns(), ["^TODO"]);
    }

    #[test]
    fn test_invalid_pattern_is_named() {
        let err = HeadingFilter::new(200, ["ok", "(unclosed"]).unwrap_err();
        match err {
            ConfigError::Pattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
