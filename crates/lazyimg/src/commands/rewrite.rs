//! `lazyimg rewrite` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use lazyimg_config::Config;
use lazyimg_rewriter::{LazyRewriter, RewriteOutput};

use super::SettingsArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::script::append_script;

/// Arguments for the rewrite command.
#[derive(Args)]
pub(crate) struct RewriteArgs {
    /// HTML file to rewrite (default: read stdin).
    pub input: Option<PathBuf>,

    /// File to write the result to (default: write stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

impl RewriteArgs {
    /// Execute the rewrite command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or input/output can't be accessed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.settings.load_config()?;

        if self.settings.verbose {
            print_settings(&output, &config);
        }

        let html = read_input(self.input.as_deref())?;
        let rewriter = LazyRewriter::new(&config.rewrite_config());
        let result = transform(&html, &rewriter, &config);

        match &self.output {
            Some(path) => std::fs::write(path, &result.html).map_err(|e| CliError::file(path, e))?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(result.html.as_bytes())?;
                stdout.flush()?;
            }
        }

        tracing::info!(rewritten = result.rewritten, "Rewrite completed");
        Ok(())
    }
}

/// Rewrite `html` and append the script tag when the config asks for it.
pub(crate) fn transform(html: &str, rewriter: &LazyRewriter, config: &Config) -> RewriteOutput {
    let mut result = rewriter.rewrite_with_stats(html);
    if config.lazyload.include_script && append_script(&mut result.html, &config.script.url) {
        tracing::debug!(url = %config.script.url, "Appended script tag");
    }
    result
}

/// Print the effective settings to stderr.
pub(crate) fn print_settings(output: &Output, config: &Config) {
    if let Some(path) = &config.config_path {
        output.info(&format!("Config: {}", path.display()));
    }
    if config.lazyload.target_class.is_empty() {
        output.info("Target: all images");
    } else {
        output.info(&format!(
            "Target: images with class containing \"{}\"",
            config.lazyload.target_class
        ));
    }
    if config.lazyload.include_script {
        output.info(&format!("Script: {}", config.script.url));
    } else {
        output.info("Script: not included");
    }
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| CliError::file(path, e)),
        None => {
            let mut html = String::new();
            std::io::stdin().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(input: PathBuf, output: PathBuf, include_script: bool) -> RewriteArgs {
        RewriteArgs {
            input: Some(input),
            output: Some(output),
            settings: SettingsArgs {
                config: None,
                target_class: Some(String::new()),
                include_script,
                no_include_script: !include_script,
                verbose: false,
            },
        }
    }

    #[test]
    fn test_transform_without_script() {
        let config = Config::default();
        let rewriter = LazyRewriter::new(&config.rewrite_config());

        let result = transform(r#"<img src="a.png" />"#, &rewriter, &config);

        assert_eq!(result.rewritten, 1);
        assert_eq!(
            result.html,
            r#"<img class="lazyload" data-src="a.png" /><noscript><img src="a.png" /></noscript>"#
        );
    }

    #[test]
    fn test_transform_with_script() {
        let mut config = Config::default();
        config.lazyload.include_script = true;
        let rewriter = LazyRewriter::new(&config.rewrite_config());

        let result = transform("<p>hi</p>", &rewriter, &config);

        assert_eq!(result.rewritten, 0);
        assert_eq!(
            result.html,
            "<p>hi</p>\n<script src=\"js/lazysizes.js\" async></script>\n"
        );
    }

    #[test]
    fn test_execute_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("post.html");
        let output = dir.path().join("out.html");
        std::fs::write(&input, r#"<p><img src="a.png" class="photo" /></p>"#).unwrap();

        args(input, output.clone(), false).execute().unwrap();

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            r#"<p><img data-src="a.png" class="lazyload photo" /><noscript><img src="a.png" class="photo" /></noscript></p>"#
        );
    }

    #[test]
    fn test_execute_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.html");
        let output = dir.path().join("out.html");

        let err = args(input, output.clone(), false).execute().unwrap_err();

        assert!(matches!(err, CliError::File { .. }));
        assert!(err.to_string().contains("missing.html"));
        assert!(!output.exists());
    }
}
