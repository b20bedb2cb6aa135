//! # toctree
//!
//! Table-of-contents extraction for markdown posts.
//!
//! This library parses markdown, collects its headings, and assembles them
//! into a nested outline. Each heading gets an identifier derived from its
//! text; the HTML renderer stamps the same identifier onto the rendered
//! heading, so an outline entry can always be resolved to its element.
//!
//! ## Features
//!
//! - Heading extraction with math excluded from heading text
//! - Filtering of headings that are really LaTeX source
//! - Nested outline (forest) built from heading levels
//! - HTML rendering with heading identifiers
//! - Reading time and plain-text previews
//!
//! ## Example
//!
//! ```rust
//! use toctree::{extract_toc, heading_id, parse_markdown};
//!
//! let markdown = r#"
//! ## Introduction
//! Some content here.
//!
//! ### Background of $x^2$
//! More details.
//!
//! ## \begin{pmatrix} 1 & 0 \end{pmatrix}
//! "#;
//!
//! let toc = extract_toc(markdown);
//! assert_eq!(toc.len(), 1);
//! assert_eq!(toc[0].children[0].text, "Background of");
//! assert_eq!(toc[0].children[0].id, heading_id("Background of"));
//!
//! let doc = parse_markdown(markdown);
//! for node in &doc.build_tree() {
//!     print!("{}", node.render_box_tree("", true));
//! }
//! ```

/// Configuration module for persisting user preferences.
///
/// Holds the heading filter patterns, render settings and default output
/// format.
pub mod config;

/// Error types for configuration and input.
pub mod error;

/// Input handling module for stdin and file sources.
pub mod input;

/// Logging initialisation.
pub mod logging;

/// Parser module for markdown documents.
///
/// Provides heading extraction, identifiers and the outline tree.
pub mod parser;

/// Rendering helpers: math preprocessing, HTML with heading identifiers,
/// reading time and previews.
pub mod render;

/// File watching for live reload.
pub mod watcher;

// Re-export commonly used types for convenience
pub use config::Config;
pub use parser::{
    Document, Heading, HeadingNode, ParseOptions, extract_title, extract_title_with, extract_toc,
    heading_id, parse_file, parse_markdown, parse_markdown_with,
};
