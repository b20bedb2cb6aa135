//! Command-line interface definition.

mod commands;

pub use commands::{Cli, Command, OutputFormat};
