//! Markdown parsing and outline extraction.
//!
//! This module turns markdown text into a list of headings and a nested
//! heading tree suitable for a table of contents.
//!
//! Parsing is delegated to `pulldown-cmark` with math enabled, so formulas
//! inside headings are recognised as math and left out of the heading text.
//! A fresh parser is created for every call; nothing is shared between
//! documents.

mod document;
pub mod filter;
pub mod output;
pub mod slug;
pub mod utils;
pub mod visit;

pub use document::{Document, Heading, HeadingNode, build_forest};
pub use filter::{HeadingFilter, Rejection};
pub use output::TocOutput;
pub use slug::heading_id;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::path::Path;
use utils::LineCounter;
use visit::{Visit, push_inline_text, walk};

/// Options controlling how headings are extracted.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Filter deciding which heading texts are kept
    pub filter: HeadingFilter,
    /// Recognise a leading `---` YAML block as front matter
    pub front_matter: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filter: HeadingFilter::default(),
            front_matter: true,
        }
    }
}

impl ParseOptions {
    /// `pulldown-cmark` extensions used for both outline and HTML rendering.
    pub fn markdown_options(&self) -> Options {
        markdown_options(self.front_matter)
    }
}

pub(crate) fn markdown_options(front_matter: bool) -> Options {
    let mut options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH;
    if front_matter {
        options |= Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
    }
    options
}

/// Parse a markdown file and extract its structure.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_file(path: &Path) -> std::io::Result<Document> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_markdown(&content))
}

/// Parse markdown content with the default options.
pub fn parse_markdown(content: &str) -> Document {
    parse_markdown_with(content, &ParseOptions::default())
}

/// Parse markdown content and collect the headings that pass the filter.
///
/// Headings are visited in document order, including those inside block
/// quotes and list items. Rejected headings are logged at debug level and
/// left out.
pub fn parse_markdown_with(content: &str, options: &ParseOptions) -> Document {
    let parser = Parser::new_ext(content, options.markdown_options());
    let mut lines = LineCounter::new(content);
    let mut headings = Vec::new();
    let mut pending: Option<PendingHeading> = None;

    walk(parser.into_offset_iter(), |event, range| {
        if let Event::End(TagEnd::Heading(_)) = event {
            if let Some(done) = pending.take() {
                headings.extend(done.finish(&options.filter));
            }
            return Visit::Continue;
        }

        if let Some(heading) = pending.as_mut() {
            return push_inline_text(&mut heading.text, event);
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                pending = Some(PendingHeading {
                    level: *level as usize,
                    line: lines.line_at(range.start),
                    offset: range.start,
                    text: String::new(),
                });
                Visit::Continue
            }
            // Blocks that cannot contain headings.
            Event::Start(
                Tag::Paragraph
                | Tag::CodeBlock(_)
                | Tag::Table(_)
                | Tag::HtmlBlock
                | Tag::MetadataBlock(_),
            ) => Visit::SkipChildren,
            _ => Visit::Continue,
        }
    });

    tracing::debug!(count = headings.len(), "extracted headings");
    Document::new(content.to_string(), headings)
}

struct PendingHeading {
    level: usize,
    line: usize,
    offset: usize,
    text: String,
}

impl PendingHeading {
    fn finish(self, filter: &HeadingFilter) -> Option<Heading> {
        let text = self.text.trim();
        if let Some(reason) = filter.rejection(text) {
            tracing::debug!(line = self.line, level = self.level, %reason, "skipping heading");
            return None;
        }

        Some(Heading {
            level: self.level,
            id: heading_id(text),
            text: text.to_string(),
            line: self.line,
            offset: self.offset,
        })
    }
}

/// Extract the table-of-contents forest from markdown text.
///
/// # Examples
///
/// ```
/// let toc = toctree::extract_toc("# Intro\n## Background\n# End");
/// assert_eq!(toc.len(), 2);
/// assert_eq!(toc[0].children[0].id, "background");
/// ```
pub fn extract_toc(content: &str) -> Vec<HeadingNode> {
    parse_markdown(content).build_tree()
}

/// Text of the first level-1 heading, reading no further than needed.
pub fn extract_title(content: &str) -> Option<String> {
    extract_title_with(content, &ParseOptions::default())
}

/// [`extract_title`] with explicit parse options.
///
/// Only `front_matter` matters here; the heading filter is not applied.
pub fn extract_title_with(content: &str, options: &ParseOptions) -> Option<String> {
    let parser = Parser::new_ext(content, options.markdown_options());
    let mut title: Option<String> = None;

    walk(parser.into_offset_iter(), |event, _| {
        if let Some(text) = title.as_mut() {
            return match event {
                Event::End(TagEnd::Heading(_)) => Visit::Stop,
                _ => push_inline_text(text, event),
            };
        }

        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => {
                title = Some(String::new());
                Visit::Continue
            }
            Event::Start(Tag::Paragraph | Tag::CodeBlock(_) | Tag::HtmlBlock) => {
                Visit::SkipChildren
            }
            _ => Visit::Continue,
        }
    });

    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(doc: &Document) -> Vec<&str> {
        doc.headings.iter().map(|h| h.text.as_str()).collect()
    }

    #[test]
    fn test_parse_headings() {
        let md = r#"# Title
Some content

## Section 1
More content

### Subsection
Details

## Section 2
End"#;

        let doc = parse_markdown(md);
        assert_eq!(doc.headings.len(), 4);
        assert_eq!(doc.headings[0].level, 1);
        assert_eq!(doc.headings[0].text, "Title");
        assert_eq!(doc.headings[0].id, "title");
        assert_eq!(doc.headings[1].level, 2);
        assert_eq!(doc.headings[1].text, "Section 1");
        assert_eq!(doc.headings[1].id, "section-1");
    }

    #[test]
    fn test_no_headings_yields_empty_forest() {
        assert!(extract_toc("").is_empty());
        assert!(extract_toc("just a paragraph\n\n- a list\n- items").is_empty());
        assert!(extract_toc("```\n# not a heading\n```").is_empty());
    }

    #[test]
    fn test_toc_example_shape() {
        let md = "# Intro\n## Background\n## Method\n### Details\n# Conclusion\n";
        let toc = extract_toc(md);

        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].text, "Intro");
        assert_eq!(toc[0].children.len(), 2);
        assert_eq!(toc[0].children[0].text, "Background");
        assert!(toc[0].children[0].children.is_empty());
        assert_eq!(toc[0].children[1].text, "Method");
        assert_eq!(toc[0].children[1].children.len(), 1);
        assert_eq!(toc[0].children[1].children[0].text, "Details");
        assert_eq!(toc[1].text, "Conclusion");
        assert!(toc[1].children.is_empty());
    }

    #[test]
    fn test_formatting_is_stripped() {
        let md = "# Title\n\n## **Bold** Section\n\n#### **1. Item** with `code` and [link](https://x.y)";
        let doc = parse_markdown(md);
        assert_eq!(texts(&doc), ["Title", "Bold Section", "1. Item with code and link"]);
    }

    #[test]
    fn test_math_is_excluded_from_heading_text() {
        let doc = parse_markdown("## Proof of $x^2$\n\n## $$E = mc^2$$ Energy");
        assert_eq!(texts(&doc), ["Proof of", "Energy"]);
        assert_eq!(doc.headings[0].id, "proof-of");
    }

    #[test]
    fn test_math_only_heading_is_dropped() {
        let doc = parse_markdown("# $\\alpha$\n\n# Real");
        assert_eq!(texts(&doc), ["Real"]);
    }

    #[test]
    fn test_latex_heading_is_dropped() {
        let md = "# Intro\n\n# \\begin{pmatrix} 1 & 0 \\\\ 0 & 1 \\end{pmatrix}\n\n# Outro";
        let doc = parse_markdown(md);
        assert_eq!(texts(&doc), ["Intro", "Outro"]);
    }

    #[test]
    fn test_setext_matrix_source_is_dropped() {
        let md = "\\begin{bmatrix} a & b\n---\n\n## Kept";
        let doc = parse_markdown(md);
        assert_eq!(texts(&doc), ["Kept"]);
    }

    #[test]
    fn test_length_boundary() {
        let kept = format!("# {}\n\n# {}\n", "a".repeat(199), "b".repeat(200));
        let doc = parse_markdown(&kept);
        assert_eq!(doc.headings.len(), 1);
        assert_eq!(doc.headings[0].text.len(), 199);
    }

    #[test]
    fn test_empty_heading_is_dropped() {
        let doc = parse_markdown("#\n\n##   \n\n# Real");
        assert_eq!(texts(&doc), ["Real"]);
    }

    #[test]
    fn test_duplicate_headings_share_ids() {
        let doc = parse_markdown("## Notes\ntext\n## Notes\n");
        assert_eq!(doc.headings.len(), 2);
        assert_eq!(doc.headings[0].id, "notes");
        assert_eq!(doc.headings[1].id, "notes");
    }

    #[test]
    fn test_nested_block_headings_are_found() {
        let md = "> # Quoted\n\n- item\n\n  ## In list\n";
        let doc = parse_markdown(md);
        assert_eq!(texts(&doc), ["Quoted", "In list"]);
    }

    #[test]
    fn test_front_matter_is_not_a_heading() {
        let md = "---\ntitle: Post\n---\n\n# Body";
        assert_eq!(texts(&parse_markdown(md)), ["Body"]);

        let options = ParseOptions {
            front_matter: false,
            ..ParseOptions::default()
        };
        let doc = parse_markdown_with(md, &options);
        assert_eq!(texts(&doc), ["title: Post", "Body"]);
    }

    #[test]
    fn test_custom_filter() {
        let options = ParseOptions {
            filter: HeadingFilter::new(10, ["(?i)draft"]).unwrap(),
            ..ParseOptions::default()
        };
        let doc = parse_markdown_with("# x^2\n# Draft notes\n# Much too long title\n# Ok", &options);
        assert_eq!(texts(&doc), ["x^2", "Ok"]);
    }

    #[test]
    fn test_headings_store_offsets_and_lines() {
        let md = "# First\nContent here\n\n## Second\nMore content";
        let doc = parse_markdown(md);

        assert_eq!(doc.headings[0].offset, 0);
        assert_eq!(doc.headings[0].line, 1);
        assert_eq!(doc.headings[1].line, 4);
        assert_eq!(&md[doc.headings[1].offset..][..9], "## Second");
    }

    #[test]
    fn test_forest_flattens_to_heading_list() {
        let md = "## a\n# b\n### c\n#### d\n## e\n###### f\n# g\n##### h";
        let doc = parse_markdown(md);
        let tree = doc.build_tree();

        let flat: Vec<&str> = tree
            .iter()
            .flat_map(|n| n.flatten())
            .map(|n| n.id.as_str())
            .collect();
        let ids: Vec<&str> = doc.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(flat, ids);
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("intro\n\n## Sub\n\n# The **Title**\n\n# Second"),
            Some("The Title".to_string())
        );
        assert_eq!(extract_title("## Only h2"), None);
        assert_eq!(extract_title("# $x$"), None);
    }

    #[test]
    fn test_extract_title_follows_front_matter_option() {
        let md = "---\n# draft\n---\n\n# Body";
        assert_eq!(extract_title(md), Some("Body".to_string()));

        let options = ParseOptions {
            front_matter: false,
            ..ParseOptions::default()
        };
        assert_eq!(extract_title_with(md, &options), Some("draft".to_string()));
    }
}
