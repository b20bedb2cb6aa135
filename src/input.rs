//! Input handling for file and stdin sources.

use crate::error::InputError;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Where the markdown comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file, re-read on every [`read_input`] call
    File(PathBuf),
    /// Content already read from stdin
    Stdin(String),
}

impl InputSource {
    /// Display name used in output metadata.
    pub fn name(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin(_) => "<stdin>".to_string(),
        }
    }
}

/// Resolve the input source from the optional file argument.
///
/// `-` reads stdin explicitly. With no argument, stdin is used when it is
/// piped; an interactive terminal yields [`InputError::NoTty`].
pub fn determine_input_source(file: Option<&Path>) -> Result<InputSource, InputError> {
    match file {
        Some(path) if path.as_os_str() == "-" => read_stdin().map(InputSource::Stdin),
        Some(path) => Ok(InputSource::File(path.to_path_buf())),
        None if io::stdin().is_terminal() => Err(InputError::NoTty),
        None => read_stdin().map(InputSource::Stdin),
    }
}

/// Read the markdown content of a source.
pub fn read_input(source: &InputSource) -> Result<String, InputError> {
    let content = match source {
        InputSource::File(path) => fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.clone(),
            source,
        })?,
        InputSource::Stdin(content) => content.clone(),
    };
    Ok(strip_bom(content))
}

fn read_stdin() -> Result<String, InputError> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(InputError::Stdin)?;
    Ok(buf)
}

fn strip_bom(content: String) -> String {
    match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    }
}
