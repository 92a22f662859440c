//! Configuration management for lazyimg.
//!
//! Parses `lazyimg.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## File format
//!
//! ```toml
//! [lazyload]
//! target_class = "photo"   # empty or absent: rewrite every image
//! include_script = true    # append the deferred-loading script tag
//!
//! [script]
//! url = "js/lazysizes.js"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `lazyload.target_class` and `script.url` support `${VAR}` (errors if
//! unset) and `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};

use lazyimg_rewriter::RewriteConfig;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the target class name.
    pub target_class: Option<String>,
    /// Override the script inclusion flag.
    pub include_script: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lazyimg.toml";

/// Default location of the deferred-loading script.
const DEFAULT_SCRIPT_URL: &str = "js/lazysizes.js";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rewriting configuration.
    pub lazyload: LazyloadConfig,
    /// Client-side script configuration.
    pub script: ScriptConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rewriting configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LazyloadConfig {
    /// Class name to target. Empty means every image.
    pub target_class: String,
    /// Whether the host page should load the deferred-loading script.
    pub include_script: bool,
}

/// Client-side script configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// URL the page loads the script from.
    pub url: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SCRIPT_URL.to_owned(),
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
        /// Config field path (e.g., "`script.url`").
        field: String,
        /// Error message (e.g., "${`CDN_HOST`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lazyimg.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and validated together with the
    /// file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting values are invalid.
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
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Configuration handed to the rewriter for each call.
    #[must_use]
    pub fn rewrite_config(&self) -> RewriteConfig {
        RewriteConfig::new(self.lazyload.target_class.clone())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const FORBIDDEN: [char; 3] = ['"', '<', '>'];

        if let Some(c) = self
            .lazyload
            .target_class
            .chars()
            .find(|c| FORBIDDEN.contains(c))
        {
            return Err(ConfigError::Validation(format!(
                "lazyload.target_class cannot contain '{c}'"
            )));
        }

        if self.script.url.is_empty() {
            return Err(ConfigError::Validation(
                "script.url cannot be empty".to_owned(),
            ));
        }

        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(target_class) = &settings.target_class {
            self.lazyload.target_class.clone_from(target_class);
        }
        if let Some(include_script) = settings.include_script {
            self.lazyload.include_script = include_script;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_from(&start)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.exists())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.lazyload.target_class =
            expand::expand_env(&self.lazyload.target_class, "lazyload.target_class")?;
        self.script.url = expand::expand_env(&self.script.url, "script.url")?;
        Ok(())
    }
}
