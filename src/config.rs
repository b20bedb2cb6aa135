use crate::error::ConfigError;
use crate::parser::ParseOptions;
use crate::parser::filter::{DEFAULT_EXCLUDE_PATTERNS, DEFAULT_MAX_HEADING_CHARS, HeadingFilter};
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub outline: OutlineConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Heading extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Headings with this many characters or more are left out (default: 200)
    #[serde(default = "default_max_heading_chars")]
    pub max_heading_chars: usize,

    /// Regular expressions marking a heading as math source. Replaces the
    /// built-in list entirely when set.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Treat a leading `---` YAML block as front matter (default: true)
    #[serde(default = "default_front_matter")]
    pub front_matter: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_heading_chars: default_max_heading_chars(),
            exclude_patterns: default_exclude_patterns(),
            front_matter: default_front_matter(),
        }
    }
}

fn default_max_heading_chars() -> usize {
    DEFAULT_MAX_HEADING_CHARS
}

fn default_exclude_patterns() -> Vec<String> {
    DEFAULT_EXCLUDE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_front_matter() -> bool {
    true
}

/// HTML rendering and listing metadata settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Normalise `$…$` / `$$…$$` before rendering (default: true)
    #[serde(default = "default_preprocess_math")]
    pub preprocess_math: bool,

    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Maximum preview length in characters
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            preprocess_math: default_preprocess_math(),
            words_per_minute: default_words_per_minute(),
            preview_length: default_preview_length(),
        }
    }
}

fn default_preprocess_math() -> bool {
    true
}

fn default_words_per_minute() -> u32 {
    200
}

fn default_preview_length() -> usize {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format when `-o` is not given: "plain", "json" or "tree"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "plain".to_string()
}

impl Config {
    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/toctree/config.toml
    /// - Linux: ~/.config/toctree/config.toml
    /// - Windows: %APPDATA%/toctree/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("toctree").join("config.toml"))
    }

    /// Load config from the default location.
    ///
    /// A missing file yields the defaults. An unreadable or invalid file is
    /// reported as a warning and also yields the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("{}; using default configuration", e);
            Self::default()
        })
    }

    /// Load config from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to `path`, replacing any existing file atomically.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;

        let contents = toml::to_string_pretty(self)?;

        // Write to a sibling temp file, then rename over the target
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
        file.persist(path).map_err(|e| io_err(e.error))?;

        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Heading extraction options, compiling the configured patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if an exclusion pattern is invalid.
    pub fn parse_options(&self) -> Result<ParseOptions, ConfigError> {
        Ok(ParseOptions {
            filter: HeadingFilter::new(
                self.outline.max_heading_chars,
                &self.outline.exclude_patterns,
            )?,
            front_matter: self.outline.front_matter,
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            preprocess_math: self.render.preprocess_math,
            front_matter: self.outline.front_matter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_filter() {
        let config = Config::default();
        assert_eq!(config.outline.max_heading_chars, 200);
        assert_eq!(config.outline.exclude_patterns.len(), DEFAULT_EXCLUDE_PATTERNS.len());
        assert_eq!(config.render.words_per_minute, 200);
        assert_eq!(config.output.format, "plain");

        let options = config.parse_options().unwrap();
        assert_eq!(options.filter.patterns(), HeadingFilter::default().patterns());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[render]\nwords_per_minute = 250\n").unwrap();
        assert_eq!(config.render.words_per_minute, 250);
        assert_eq!(config.render.preview_length, 300);
        assert_eq!(config.outline.max_heading_chars, 200);
        assert!(config.outline.front_matter);
    }

    #[test]
    fn test_custom_patterns_from_toml() {
        let config: Config = toml::from_str(
            r#"
[outline]
max_heading_chars = 80
exclude_patterns = ['\\\\', '^Draft:']
"#,
        )
        .unwrap();

        let options = config.parse_options().unwrap();
        assert_eq!(options.filter.max_chars(), 80);
        assert!(options.filter.accepts("x^2"));
        assert!(!options.filter.accepts("Draft: later"));
        assert!(!options.filter.accepts(r"\\ line break"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut config = Config::default();
        config.outline.exclude_patterns = vec!["[unclosed".to_string()];

        match config.parse_options() {
            Err(ConfigError::Pattern { pattern, .. }) => assert_eq!(pattern, "[unclosed"),
            other => panic!("expected pattern error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.render.preview_length = 120;
        config.outline.front_matter = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.render.preview_length, 120);
        assert!(!loaded.outline.front_matter);
        assert_eq!(loaded.outline.exclude_patterns, config.outline.exclude_patterns);
    }

    #[test]
    fn test_load_from_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[outline\nmax_heading_chars = ").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load_from(&dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
