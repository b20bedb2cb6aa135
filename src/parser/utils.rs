//! Utility functions for markdown parsing.
//!
//! Shared helper functions used across the parser module.

/// Incrementally maps byte offsets to 1-indexed line numbers.
///
/// Offsets are expected to arrive in non-decreasing order, as they do from
/// a parser's offset iterator; an offset behind the last one seen is
/// answered with the current line.
///
/// # Examples
///
/// ```
/// # use toctree::parser::utils::LineCounter;
/// let text = "one\ntwo\nthree";
/// let mut lines = LineCounter::new(text);
/// assert_eq!(lines.line_at(0), 1);
/// assert_eq!(lines.line_at(4), 2);
/// assert_eq!(lines.line_at(8), 3);
/// ```
#[derive(Debug)]
pub struct LineCounter<'a> {
    content: &'a str,
    last_offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            last_offset: 0,
            line: 1,
        }
    }

    /// Line number containing byte `offset`.
    pub fn line_at(&mut self, offset: usize) -> usize {
        let offset = offset.min(self.content.len());
        if offset > self.last_offset {
            self.line += self.content.as_bytes()[self.last_offset..offset]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.last_offset = offset;
        }
        self.line
    }
}
