//! Error types for configuration and input handling.
//!
//! Outline extraction itself never fails; these cover the edges around it:
//! reading config files, compiling user-supplied exclusion patterns, and
//! reading markdown from files or stdin.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating, or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid heading exclusion pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while reading markdown input.
#[derive(Debug, Error)]
pub enum InputError {
    /// No file argument was given and stdin is an interactive terminal.
    #[error("no input: pass a markdown file, '-' for stdin, or pipe content")]
    NoTty,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
}
