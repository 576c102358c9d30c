//! Configuration management for markups.
//!
//! Parses `markups.toml` with serde. When no explicit path is given, the file
//! is searched for in the current directory and its parents, then in the
//! platform configuration directory (`~/.config/markups/` on Linux,
//! `~/Library/Application Support/markups/` on macOS). Without any file,
//! defaults are used.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in:
//! - `restructuredtext.python`
//! - `graphviz.dot`
//! - `mathjax.web_url`
//! - `mathjax.local_url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use markups::{HighlightStyle, MATHJAX_LOCAL_URL, MATHJAX_WEB_URL, MathJaxUrls};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "markups.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the Python interpreter used to run Docutils.
    pub python: Option<String>,
    /// Extra Docutils settings as `(key, value)` pairs. Values that parse as
    /// JSON (`true`, `3`, `"x"`) keep their type; anything else is a string.
    pub settings: Vec<(String, String)>,
    /// Override whether Graphviz support is enabled.
    pub graphviz_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// reStructuredText (Docutils) configuration.
    pub restructuredtext: RestructuredTextConfig,
    /// MathJax script locations.
    pub mathjax: MathJaxConfig,
    /// Code highlighting configuration.
    highlight: HighlightConfigRaw,
    /// Graphviz diagram configuration.
    pub graphviz: GraphvizConfig,

    /// Resolved highlight style (set after loading).
    #[serde(skip)]
    pub highlight_style: HighlightStyle,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// reStructuredText configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RestructuredTextConfig {
    /// Python interpreter with Docutils installed.
    pub python: String,
    /// Docutils setting overrides, e.g. `toc_backlinks = "none"`.
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl Default for RestructuredTextConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_owned(),
            settings: BTreeMap::new(),
        }
    }
}

/// MathJax configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MathJaxConfig {
    /// Script URL for documents targeting the web.
    pub web_url: String,
    /// Script URL for local previews.
    pub local_url: String,
}

impl Default for MathJaxConfig {
    fn default() -> Self {
        Self {
            web_url: MATHJAX_WEB_URL.to_owned(),
            local_url: MATHJAX_LOCAL_URL.to_owned(),
        }
    }
}

impl MathJaxConfig {
    /// MathJax URL pair for converted documents.
    #[must_use]
    pub fn urls(&self) -> MathJaxUrls {
        MathJaxUrls {
            web: self.web_url.clone(),
            local: self.local_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HighlightConfigRaw {
    style: String,
}

impl Default for HighlightConfigRaw {
    fn default() -> Self {
        Self {
            style: "default".to_owned(),
        }
    }
}

/// Graphviz configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphvizConfig {
    /// Whether `graphviz`, `graph` and `digraph` directives are registered
    /// (when the `dot` executable is found).
    pub enabled: bool,
    /// The `dot` executable.
    pub dot: String,
    /// Extra arguments passed to `dot`.
    pub dot_args: Vec<String>,
    /// Image format: `svg` or `png`.
    pub output_format: String,
}

impl Default for GraphvizConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dot: "dot".to_owned(),
            dot_args: Vec::new(),
            output_format: "svg".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`graphviz.dot`").
        field: String,
        /// Error message (e.g., "${`DOT`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a script URL to use http://, https:// or file:// scheme.
fn require_script_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !["http://", "https://", "file://"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http://, https:// or file://"
        )));
    }
    Ok(())
}

/// Parse a CLI setting value, keeping JSON scalars typed.
fn parse_setting_value(value: &str) -> serde_json::Value {
    serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_owned()))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `markups.toml` (see crate docs) and falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if parsing,
    /// expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Using discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(python) = &settings.python {
            self.restructuredtext.python.clone_from(python);
        }
        for (key, value) in &settings.settings {
            self.restructuredtext
                .settings
                .insert(key.clone(), parse_setting_value(value));
        }
        if let Some(enabled) = settings.graphviz_enabled {
            self.graphviz.enabled = enabled;
        }
    }

    /// Search the current directory and its parents, then the user
    /// configuration directory.
    fn discover_config() -> Option<PathBuf> {
        if let Ok(mut current) = std::env::current_dir() {
            loop {
                let candidate = current.join(CONFIG_FILENAME);
                if candidate.exists() {
                    return Some(candidate);
                }
                if !current.pop() {
                    break;
                }
            }
        }

        let candidate = user_config_path()?;
        candidate.exists().then_some(candidate)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse, expand and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, environment expansion or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.restructuredtext.python, "restructuredtext.python")?;
        require_script_url(&self.mathjax.web_url, "mathjax.web_url")?;
        require_script_url(&self.mathjax.local_url, "mathjax.local_url")?;
        self.validate_graphviz()?;
        Ok(())
    }

    fn validate_graphviz(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.graphviz.dot, "graphviz.dot")?;
        if !matches!(self.graphviz.output_format.as_str(), "svg" | "png") {
            return Err(ConfigError::Validation(format!(
                "graphviz.output_format must be 'svg' or 'png', got '{}'",
                self.graphviz.output_format
            )));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.restructuredtext.python =
            expand::expand_env(&self.restructuredtext.python, "restructuredtext.python")?;
        self.graphviz.dot = expand::expand_env(&self.graphviz.dot, "graphviz.dot")?;
        self.mathjax.web_url = expand::expand_env(&self.mathjax.web_url, "mathjax.web_url")?;
        self.mathjax.local_url = expand::expand_env(&self.mathjax.local_url, "mathjax.local_url")?;
        Ok(())
    }

    fn resolve(&mut self) -> Result<(), ConfigError> {
        self.highlight_style = HighlightStyle::parse(&self.highlight.style).ok_or_else(|| {
            ConfigError::Validation(format!(
                "highlight.style must be 'default' or empty, got '{}'",
                self.highlight.style
            ))
        })?;
        Ok(())
    }
}

/// `markups.toml` inside the platform configuration directory.
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("markups").join(CONFIG_FILENAME))
}
