//! # toctree
//!
//! Table-of-contents extraction for markdown posts.
//!
//! ## Usage
//!
//! Show the heading tree:
//! ```sh
//! toctree post.md
//! ```
//!
//! List headings with their identifiers:
//! ```sh
//! toctree -l --ids post.md
//! ```
//!
//! Render HTML whose headings carry the same identifiers:
//! ```sh
//! toctree post.md render
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, Command, OutputFormat};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use std::path::Path;
use std::process;
use std::thread;
use std::time::Duration;
use toctree::error::{ConfigError, InputError};
use toctree::input::{self, InputSource};
use toctree::parser::{self, Document, Heading, TocOutput};
use toctree::render;
use toctree::watcher::FileWatcher;
use toctree::{Config, ParseOptions};
use unicode_width::UnicodeWidthStr;

fn main() -> Result<()> {
    color_eyre::install()?;

    // Handle dynamic shell completions
    #[cfg(feature = "unstable-dynamic")]
    clap_complete::CompleteEnv::with_factory(|| {
        use clap::CommandFactory;
        Cli::command()
    })
    .complete();

    let args = Cli::parse();
    toctree::logging::init(args.verbose);

    // Commands that don't need a document or a loaded config
    match &args.command {
        Some(Command::Slug { text }) => {
            println!("{}", toctree::heading_id(text));
            return Ok(());
        }
        Some(Command::InitConfig { force }) => {
            return init_config(args.config.as_deref(), *force);
        }
        _ => {}
    }

    let config = match args.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let options = config.parse_options()?;
    let format = resolve_format(&args, &config);

    let source = match input::determine_input_source(args.file.as_deref()) {
        Ok(source) => source,
        Err(InputError::NoTty) => {
            eprintln!("Error: markdown file argument is required");
            eprintln!("\nUsage: toctree [OPTIONS] <FILE>");
            eprintln!("       toctree [OPTIONS] -");
            eprintln!("       cat post.md | toctree [OPTIONS]\n");
            eprintln!("Use '-' to explicitly read from stdin, or pipe input.");
            process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if args.watch {
        return watch(&args, &config, &options, format, source);
    }

    if !run(&args, &config, &options, format, &source)? {
        process::exit(1);
    }
    Ok(())
}

/// Priority: CLI flag > config file > plain.
fn resolve_format(args: &Cli, config: &Config) -> OutputFormat {
    if let Some(format) = args.output {
        return format;
    }
    config
        .output
        .format
        .parse::<OutputFormat>()
        .unwrap_or_else(|_| {
            tracing::warn!(
                format = %config.output.format,
                "unknown output format in config, using plain"
            );
            OutputFormat::Plain
        })
}

/// Read, parse and print once. Returns `false` when the requested heading
/// or section does not exist.
fn run(
    args: &Cli,
    config: &Config,
    options: &ParseOptions,
    format: OutputFormat,
    source: &InputSource,
) -> Result<bool> {
    let content = input::read_input(source)?;
    let doc = parser::parse_markdown_with(&content, options);

    match &args.command {
        Some(Command::AtLine { line }) => Ok(print_heading_at_line(&doc, *line)),
        Some(Command::Render) => {
            print!("{}", render::render_html(&content, &config.render_options()));
            Ok(true)
        }
        Some(Command::Summary) => {
            print_summary(&doc, config, options);
            Ok(true)
        }
        Some(Command::Slug { .. } | Command::InitConfig { .. }) | None => {
            handle_cli_mode(args, &doc, config, format, source)
        }
    }
}

fn handle_cli_mode(
    args: &Cli,
    doc: &Document,
    config: &Config,
    format: OutputFormat,
    source: &InputSource,
) -> Result<bool> {
    if args.count {
        print_heading_counts(doc);
        return Ok(true);
    }

    if let Some(ref section_name) = args.section {
        return Ok(extract_section(doc, section_name));
    }

    if args.list_mode() {
        let headings: Vec<&Heading> = match (&args.filter, args.level) {
            (Some(pattern), Some(level)) => doc
                .filter_headings(pattern)
                .into_iter()
                .filter(|h| h.level == usize::from(level))
                .collect(),
            (Some(pattern), None) => doc.filter_headings(pattern),
            (None, Some(level)) => doc.headings_at_level(usize::from(level)),
            (None, None) => doc.headings.iter().collect(),
        };
        return print_headings(&headings, format, args.ids);
    }

    print_tree(doc, format, config, source)?;
    Ok(true)
}

fn print_headings(headings: &[&Heading], format: OutputFormat, show_ids: bool) -> Result<bool> {
    match format {
        OutputFormat::Plain => {
            let labels: Vec<String> = headings
                .iter()
                .map(|h| format!("{} {}", "#".repeat(h.level), h.text))
                .collect();
            let width = labels.iter().map(|l| l.width()).max().unwrap_or(0);

            for (label, heading) in labels.iter().zip(headings) {
                if show_ids {
                    let pad = width - label.width();
                    println!("{}{}  #{}", label, " ".repeat(pad), heading.id);
                } else {
                    println!("{}", label);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(headings)?);
        }
        OutputFormat::Tree => {
            eprintln!("Use --tree for tree output");
            return Ok(false);
        }
    }
    Ok(true)
}

fn print_tree(
    doc: &Document,
    format: OutputFormat,
    config: &Config,
    source: &InputSource,
) -> Result<()> {
    match format {
        OutputFormat::Tree | OutputFormat::Plain => {
            let tree = doc.build_tree();
            if tree.is_empty() {
                println!("No headings found.");
            }
            for (i, node) in tree.iter().enumerate() {
                let is_last = i == tree.len() - 1;
                print!("{}", node.render_box_tree("", is_last));
            }
        }
        OutputFormat::Json => {
            let output = TocOutput::from_document(
                doc,
                Some(source.name()),
                config.render.words_per_minute,
            );
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_heading_counts(doc: &Document) {
    println!("Heading counts:");
    for (level, count) in doc.level_counts() {
        println!("  {}: {}", "#".repeat(level), count);
    }
    println!("\nTotal: {}", doc.headings.len());
}

fn extract_section(doc: &Document, section_name: &str) -> bool {
    match doc.extract_section(section_name) {
        Some(section) => {
            println!("{}", section);
            true
        }
        None => {
            eprintln!("Section '{}' not found", section_name);
            false
        }
    }
}

fn print_heading_at_line(doc: &Document, line: usize) -> bool {
    match doc.heading_at_line(line) {
        Some(heading) => {
            println!(
                "{} {} (line {})  #{}",
                "#".repeat(heading.level),
                heading.text,
                heading.line,
                heading.id
            );
            true
        }
        None => {
            eprintln!("No heading at or before line {}", line);
            false
        }
    }
}

fn print_summary(doc: &Document, config: &Config, options: &ParseOptions) {
    let title = parser::extract_title_with(&doc.content, options);
    let minutes = render::reading_time(&doc.content, config.render.words_per_minute);
    let preview = render::preview_text(&doc.content, config.render.preview_length);

    println!("Title:        {}", title.as_deref().unwrap_or("(untitled)"));
    println!("Headings:     {}", doc.headings.len());
    println!("Reading time: {} min", minutes);
    if !preview.is_empty() {
        println!("\n{}", preview);
    }
}

fn watch(
    args: &Cli,
    config: &Config,
    options: &ParseOptions,
    format: OutputFormat,
    source: InputSource,
) -> Result<()> {
    let InputSource::File(path) = source else {
        bail!("--watch needs a file path, not stdin");
    };
    let path = path
        .canonicalize()
        .wrap_err_with(|| format!("cannot watch {}", path.display()))?;

    let mut watcher = FileWatcher::new()?;
    watcher.watch(&path)?;
    let source = InputSource::File(path);

    run(args, config, options, format, &source)?;
    loop {
        thread::sleep(Duration::from_millis(100));
        if watcher.check_for_changes() {
            tracing::debug!("change detected, re-reading");
            println!();
            // The file may be briefly missing while an editor replaces it
            if let Err(e) = run(args, config, options, format, &source) {
                tracing::warn!("{:#}", e);
            }
        }
    }
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .or_else(Config::config_path)
        .ok_or(ConfigError::NoConfigDir)?;

    if target.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    Config::default().save_to(&target)?;
    println!("Wrote {}", target.display());
    Ok(())
}
