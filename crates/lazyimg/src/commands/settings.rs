//! Options shared by every command.

use std::path::PathBuf;

use clap::Args;
use lazyimg_config::{CliSettings, Config};

use crate::error::CliError;

/// Configuration options shared by `rewrite` and `batch`.
#[derive(Args)]
pub(crate) struct SettingsArgs {
    /// Path to configuration file (default: auto-discover lazyimg.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Class name to target; empty rewrites every image (overrides config).
    #[arg(long = "class", env = "LAZYIMG_CLASS")]
    pub target_class: Option<String>,

    /// Append the deferred-loading script tag (overrides config).
    #[arg(long)]
    pub include_script: bool,

    /// Do not append the deferred-loading script tag.
    #[arg(long, conflicts_with = "include_script")]
    pub no_include_script: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SettingsArgs {
    /// Load configuration with these options applied on top.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            target_class: self.target_class.clone(),
            include_script: self.resolve_include_script(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Resolve `include_script` from --include-script/--no-include-script flags.
    fn resolve_include_script(&self) -> Option<bool> {
        if self.no_include_script {
            Some(false)
        } else {
            self.include_script.then_some(true)
        }
    }
}
