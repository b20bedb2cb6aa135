//! Heading identifiers.
//!
//! The same function names table-of-contents entries and the `id`
//! attributes of rendered heading elements, so that an outline entry can be
//! resolved to its heading by exact string match.

/// Generate the identifier (slug) for a heading's text.
///
/// Lower-cases the text, drops every character that is not an ASCII word
/// character, whitespace or `-`, turns whitespace runs into `-`, collapses
/// repeated hyphens and trims hyphens from both ends.
///
/// Identical texts always produce identical identifiers; duplicates are not
/// disambiguated.
///
/// # Examples
///
/// ```
/// use toctree::parser::slug::heading_id;
///
/// assert_eq!(heading_id("Hello, World!"), "hello-world");
/// assert_eq!(heading_id("  Step 1 -- Setup  "), "step-1-setup");
/// assert_eq!(heading_id("snake_case"), "snake_case");
/// ```
pub fn heading_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.to_lowercase().chars() {
        if is_separator(ch) || ch == '-' {
            pending_hyphen = true;
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_hyphen && !id.is_empty() {
                id.push('-');
            }
            pending_hyphen = false;
            id.push(ch);
        }
        // Anything else is dropped without breaking the current run, so
        // "a - b" and "a -, b" both collapse to "a-b".
    }

    id
}

/// Whitespace as web identifiers see it: the ECMAScript `\s` set.
///
/// Differs from [`char::is_whitespace`]: includes U+FEFF, excludes U+0085.
fn is_separator(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_id_basic() {
        assert_eq!(heading_id("Hello, World!"), "hello-world");
        assert_eq!(heading_id("API Reference"), "api-reference");
        assert_eq!(heading_id("1. Getting Started"), "1-getting-started");
    }

    #[test]
    fn test_heading_id_is_deterministic() {
        let text = "Results & Discussion (2024)";
        assert_eq!(heading_id(text), heading_id(text));
        assert_eq!(heading_id(text), "results-discussion-2024");
    }

    #[test]
    fn test_heading_id_collapses_hyphens_and_whitespace() {
        assert_eq!(heading_id("a - b"), "a-b");
        assert_eq!(heading_id("a\t\n b"), "a-b");
        assert_eq!(heading_id("--leading and trailing--"), "leading-and-trailing");
        assert_eq!(heading_id("a---b"), "a-b");
    }

    #[test]
    fn test_heading_id_whitespace_set() {
        assert_eq!(heading_id("a\u{feff}b"), "a-b");
        assert_eq!(heading_id("a\u{85}b"), "ab");
        assert_eq!(heading_id("a\u{a0}b\u{3000}c"), "a-b-c");
    }

    #[test]
    fn test_heading_id_drops_non_ascii_word_chars() {
        assert_eq!(heading_id("Café Menu"), "caf-menu");
        assert_eq!(heading_id("日本語"), "");
        assert_eq!(heading_id("C++ & Rust"), "c-rust");
    }

    #[test]
    fn test_heading_id_keeps_underscores() {
        assert_eq!(heading_id("my_var Usage"), "my_var-usage");
    }

    #[test]
    fn test_heading_id_empty() {
        assert_eq!(heading_id(""), "");
        assert_eq!(heading_id("   "), "");
        assert_eq!(heading_id("!!!"), "");
    }
}
