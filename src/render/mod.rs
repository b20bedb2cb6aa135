//! Pre- and post-processing around markdown rendering.
//!
//! - [`preprocess_math`] normalises `$…$` and `$$…$$` spans before parsing.
//! - [`render_html`] renders an HTML fragment whose heading elements carry
//!   the same identifiers as the outline, so outline entries can scroll to
//!   them.
//! - [`reading_time`] and [`preview_text`] produce the listing metadata shown
//!   next to a post.

use crate::parser::heading_id;
use crate::parser::markdown_options;
use crate::parser::visit::{push_inline_text, walk};
use pulldown_cmark::{CowStr, Event, Parser, Tag, TagEnd, html};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::ops::Range;
use std::sync::OnceLock;

/// Options for [`render_html`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Run [`preprocess_math`] before parsing
    pub preprocess_math: bool,
    /// Recognise a leading `---` YAML block as front matter
    pub front_matter: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preprocess_math: true,
            front_matter: true,
        }
    }
}

/// Normalise math delimiters for the formula renderer.
///
/// Display blocks (`$$ … $$`) are moved onto their own lines with blank
/// lines around them; single-line inline spans (`$ … $`) have the
/// whitespace inside the delimiters trimmed.
///
/// Heading lines (ATX lines and the paragraph above a setext underline) are
/// copied unchanged, so headings parse to the same text the outline sees.
///
/// # Examples
///
/// ```
/// use toctree::render::preprocess_math;
///
/// assert_eq!(preprocess_math("a $$ x^2 $$ b"), "a \n\n$$\nx^2\n$$\n\n b");
/// assert_eq!(preprocess_math("inline $ y $ here"), "inline $y$ here");
/// assert_eq!(preprocess_math("## Sum $$x$$ total"), "## Sum $$x$$ total");
/// ```
pub fn preprocess_math(content: &str) -> String {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let headings = heading_lines(&lines);

    let mut out = String::with_capacity(content.len());
    let mut run = String::new();
    for (line, is_heading) in lines.iter().zip(headings) {
        if is_heading {
            out.push_str(&rewrite_math(&run));
            run.clear();
            out.push_str(line);
        } else {
            run.push_str(line);
        }
    }
    out.push_str(&rewrite_math(&run));
    out
}

/// Mark the lines that may end up inside a heading.
///
/// Errs toward marking too much: an extra marked line only keeps its math
/// untouched.
fn heading_lines(lines: &[&str]) -> Vec<bool> {
    static ATX: OnceLock<Regex> = OnceLock::new();
    static SETEXT: OnceLock<Regex> = OnceLock::new();

    // Container prefixes (quotes, list markers) may precede the `#`s.
    let atx = ATX.get_or_init(|| {
        Regex::new(r"^(?:[ \t]*(?:>|[-+*]|\d{1,9}[.)])[ \t]*)*[ \t]*#{1,6}(?:[ \t]|\r?\n|$)")
            .unwrap()
    });
    let setext = SETEXT.get_or_init(|| Regex::new(r"^[ \t>]*(?:=+|-+)[ \t]*\r?\n?$").unwrap());

    let mut marked = vec![false; lines.len()];
    for (i, line) in lines.iter().enumerate() {
        if atx.is_match(line) {
            marked[i] = true;
        } else if setext.is_match(line) {
            let mut j = i;
            while j > 0 && !lines[j - 1].trim().is_empty() {
                j -= 1;
                marked[j] = true;
            }
        }
    }
    marked
}

fn rewrite_math(content: &str) -> String {
    static DISPLAY: OnceLock<Regex> = OnceLock::new();
    static INLINE: OnceLock<Regex> = OnceLock::new();

    let display = DISPLAY.get_or_init(|| Regex::new(r"(?s)\$\$\s*(.*?)\s*\$\$").unwrap());
    let inline = INLINE.get_or_init(|| Regex::new(r"\$([^$\n]+)\$").unwrap());

    let content = display.replace_all(content, |caps: &Captures| {
        format!("\n\n$$\n{}\n$$\n\n", caps[1].trim())
    });
    inline
        .replace_all(&content, |caps: &Captures| format!("${}$", caps[1].trim()))
        .into_owned()
}

/// Render markdown to an HTML fragment with identifiers on headings.
///
/// Each heading with non-empty text gets `id="…"` computed by
/// [`heading_id`] from the same text the outline uses. Unlike the outline,
/// no heading is filtered out here.
///
/// # Examples
///
/// ```
/// use toctree::render::{RenderOptions, render_html};
///
/// let html = render_html("## Hello, World!", &RenderOptions::default());
/// assert_eq!(html, "<h2 id=\"hello-world\">Hello, World!</h2>\n");
/// ```
pub fn render_html(markdown: &str, options: &RenderOptions) -> String {
    let source = if options.preprocess_math {
        Cow::Owned(preprocess_math(markdown))
    } else {
        Cow::Borrowed(markdown)
    };

    let parser = Parser::new_ext(&source, markdown_options(options.front_matter));
    let events = with_heading_ids(parser.into_offset_iter());

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

/// Buffer each heading's events and stamp its start tag with an identifier.
fn with_heading_ids<'a>(
    events: impl Iterator<Item = (Event<'a>, Range<usize>)>,
) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut heading: Vec<(Event<'a>, Range<usize>)> = Vec::new();

    for (event, range) in events {
        match event {
            Event::Start(Tag::Heading { .. }) => heading.push((event, range)),
            Event::End(TagEnd::Heading(_)) if !heading.is_empty() => {
                heading.push((event, range));
                out.extend(tag_heading(std::mem::take(&mut heading)));
            }
            event if !heading.is_empty() => heading.push((event, range)),
            event => out.push(event),
        }
    }

    out
}

fn tag_heading<'a>(
    mut events: Vec<(Event<'a>, Range<usize>)>,
) -> impl Iterator<Item = Event<'a>> {
    let mut text = String::new();
    walk(events.iter().skip(1).cloned(), |event, _| {
        push_inline_text(&mut text, event)
    });

    let text = text.trim();
    if !text.is_empty() {
        if let Some((Event::Start(Tag::Heading { id, .. }), _)) = events.first_mut() {
            *id = Some(CowStr::from(heading_id(text)));
        }
    }

    events.into_iter().map(|(event, _)| event)
}

/// Estimated reading time in whole minutes.
///
/// Code, math and images are not counted; link text is. Returns 0 for blank
/// content and at least 1 otherwise.
///
/// # Examples
///
/// ```
/// use toctree::render::reading_time;
///
/// assert_eq!(reading_time("", 200), 0);
/// assert_eq!(reading_time("a few words", 200), 1);
/// assert_eq!(reading_time(&"word ".repeat(401), 200), 3);
/// ```
pub fn reading_time(content: &str, words_per_minute: u32) -> u32 {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

    if content.trim().is_empty() {
        return 0;
    }

    let patterns = PATTERNS.get_or_init(|| {
        vec![
            (Regex::new(r"(?s)```.*?```").unwrap(), ""),
            (Regex::new(r"`[^`]+`").unwrap(), ""),
            (Regex::new(r"(?s)\$\$.*?\$\$").unwrap(), ""),
            (Regex::new(r"\$[^$]+\$").unwrap(), ""),
            (Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap(), ""),
            (Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(), "$1"),
            (Regex::new(r"#+\s").unwrap(), ""),
            (Regex::new(r"[*_~`]").unwrap(), ""),
            (Regex::new(r"\n+").unwrap(), " "),
        ]
    });

    let plain = apply(patterns, content);
    let words = plain.split_whitespace().count() as u32;
    words.div_ceil(words_per_minute.max(1)).max(1)
}

/// Plain-text excerpt for post listings.
///
/// Code becomes `[code]`, math `[formula]`, images `[image]`; links keep
/// their text. Longer results are cut at the last space before `max_len`
/// characters and suffixed with `...`.
///
/// # Examples
///
/// ```
/// use toctree::render::preview_text;
///
/// assert_eq!(preview_text("# Title\n\nSee `x` and $y$.", 300), "Title See [code] and [formula].");
/// assert_eq!(preview_text("one two three", 9), "one two...");
/// ```
pub fn preview_text(content: &str, max_len: usize) -> String {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

    if content.trim().is_empty() {
        return String::new();
    }

    let patterns = PATTERNS.get_or_init(|| {
        vec![
            (Regex::new(r"(?s)```.*?```").unwrap(), "[code]"),
            (Regex::new(r"`[^`]+`").unwrap(), "[code]"),
            (Regex::new(r"(?s)\$\$.*?\$\$").unwrap(), "[formula]"),
            (Regex::new(r"\$[^$]+\$").unwrap(), "[formula]"),
            (Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap(), "[image]"),
            (Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(), "$1"),
            (Regex::new(r"#+\s").unwrap(), ""),
            (Regex::new(r"[*_~]").unwrap(), ""),
            (Regex::new(r"\n+").unwrap(), " "),
            (Regex::new(r"\s+").unwrap(), " "),
        ]
    });

    let plain = apply(patterns, content);
    let plain = plain.trim();

    if plain.chars().count() <= max_len {
        return plain.to_string();
    }

    let truncated: String = plain.chars().take(max_len).collect();
    match truncated.rfind(' ') {
        Some(idx) if idx > 0 => format!("{}...", &truncated[..idx]),
        _ => format!("{}...", truncated),
    }
}

fn apply(patterns: &[(Regex, &'static str)], content: &str) -> String {
    let mut result = content.to_string();
    for (pattern, replacement) in patterns {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }
    result
}
