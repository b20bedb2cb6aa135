use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[cfg(feature = "unstable-dynamic")]
use clap_complete::engine::{ArgValueCompleter, PathCompleter};

#[derive(Parser, Debug)]
#[command(name = "toctree")]
#[command(version)]
#[command(about = "Extract a table of contents from markdown posts")]
#[command(
    long_about = "toctree - Table-of-contents extraction for markdown posts.\n\n\
    Prints the heading outline of a markdown document. Math inside headings is\n\
    left out of the heading text, and headings that are really LaTeX source are\n\
    skipped. Identifiers match the ids of headings rendered with `toctree render`.\n\n\
    Examples:\n  \
    toctree post.md               # Show heading tree\n  \
    toctree -l --ids post.md      # List headings with identifiers\n  \
    toctree -o json post.md       # Outline as JSON\n  \
    toctree -s Method post.md     # Extract section\n  \
    toctree --watch post.md       # Re-print on every save\n  \
    toctree slug 'Hello, World!'  # Identifier for a heading"
)]
pub struct Cli {
    /// Markdown file to read (.md or .markdown), or '-' for stdin
    ///
    /// If no file is specified and stdin is piped, input is read from stdin.
    ///
    /// Examples:
    ///   toctree post.md            # Read file
    ///   toctree -                  # Read from stdin
    ///   cat post.md | toctree -l   # Pipe markdown
    #[arg(add = markdown_file_completer())]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// List all headings in document order
    ///
    /// Displays headings with their level indicators (# for h1, ## for h2, etc.).
    /// Combine with --filter or --level to narrow results.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Show the heading tree with box-drawing characters (default)
    ///
    /// Takes precedence over --list.
    #[arg(long = "tree")]
    pub tree: bool,

    /// Show heading identifiers next to each heading in --list mode
    #[arg(long = "ids")]
    pub ids: bool,

    /// Filter headings by text pattern (case-insensitive)
    ///
    /// Example: --filter "install" matches "Installation" and "Installing"
    #[arg(long = "filter", value_name = "PATTERN")]
    pub filter: Option<String>,

    /// Show only headings at a specific level (1-6)
    #[arg(short = 'L', long = "level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(1..=6))]
    pub level: Option<u8>,

    /// Output format for --list and --tree modes
    ///
    ///   plain - Human-readable text
    ///   json  - JSON for scripting
    ///   tree  - Box-drawing tree structure
    ///
    /// Defaults to the `[output] format` config setting, then plain.
    #[arg(short = 'o', long = "output")]
    pub output: Option<OutputFormat>,

    /// Extract a section by heading text or identifier
    ///
    /// Prints from the heading to the next heading of the same or higher level.
    #[arg(short = 's', long = "section", value_name = "HEADING")]
    pub section: Option<String>,

    /// Count headings by level
    #[arg(long = "count")]
    pub count: bool,

    /// Watch the file and print again whenever it changes
    #[arg(short = 'w', long = "watch")]
    pub watch: bool,

    /// Load configuration from this file instead of the default location
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Whether to print the flat heading list rather than the tree.
    pub fn list_mode(&self) -> bool {
        self.list && !self.tree
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Show the heading whose section contains a line
    ///
    /// Finds the heading that appears at or before the given line number.
    AtLine {
        /// Line number in the markdown file (1-indexed)
        line: usize,
    },

    /// Print the identifier for a heading text
    Slug {
        /// Heading text
        text: String,
    },

    /// Render the document to HTML with identifiers on headings
    Render,

    /// Show title, heading count, reading time and preview
    Summary,

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// JSON output
    Json,
    /// Tree format with box-drawing
    Tree,
}

/// Files `toctree` reads: `.md` and `.markdown`, any case.
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// Complete markdown files, plus directories to descend into.
#[cfg(feature = "unstable-dynamic")]
fn markdown_file_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(PathCompleter::any().filter(|path| path.is_dir() || is_markdown(path)))
}

#[cfg(not(feature = "unstable-dynamic"))]
fn markdown_file_completer() -> clap::builder::ValueHint {
    clap::ValueHint::FilePath
}
