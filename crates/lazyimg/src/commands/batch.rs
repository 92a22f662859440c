//! `lazyimg batch` command implementation.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use clap::Args;
use lazyimg_config::Config;
use lazyimg_rewriter::LazyRewriter;
use rayon::prelude::*;
use regex::Regex;

use super::SettingsArgs;
use super::rewrite::{print_settings, transform};
use crate::error::CliError;
use crate::output::Output;

/// Regex to match a noscript fallback left by an earlier run.
static FALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<noscript>\s*<img[\s/]").unwrap());

/// Arguments for the batch command.
///
/// Rewriting is not idempotent: a second pass would rewrite the fallback copies
/// too and nest `<noscript>` elements. Files that already contain a
/// `<noscript><img` fallback are therefore skipped.
#[derive(Args)]
pub(crate) struct BatchArgs {
    /// Glob pattern of HTML files to rewrite in place (e.g. `site/**/*.html`).
    pub pattern: String,

    /// Report what would change without writing files.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Outcome for a single file.
#[derive(Debug)]
pub(crate) struct FileReport {
    pub path: PathBuf,
    pub rewritten: usize,
    pub changed: bool,
    pub skipped: bool,
}

/// Transformed content of one file, not yet written.
struct PlannedFile {
    path: PathBuf,
    new_html: Option<String>,
    rewritten: usize,
    skipped: bool,
}

impl PlannedFile {
    fn into_report(self) -> FileReport {
        FileReport {
            changed: self.new_html.is_some(),
            path: self.path,
            rewritten: self.rewritten,
            skipped: self.skipped,
        }
    }
}

impl BatchArgs {
    /// Execute the batch command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the pattern is invalid or
    /// matches nothing, or any file can't be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.settings.load_config()?;

        if self.settings.verbose {
            print_settings(&output, &config);
        }

        let paths = collect_paths(&self.pattern)?;
        if paths.is_empty() {
            return Err(CliError::Validation(format!(
                "No files match pattern: {}",
                self.pattern
            )));
        }

        let reports = rewrite_files(&paths, &config, self.dry_run)?;

        let mut total = 0;
        for report in &reports {
            total += report.rewritten;
            let path = report.path.display();
            if report.skipped {
                output.warning(&format!("{path}: already rewritten, skipped"));
            } else if report.rewritten > 0 {
                output.success(&format!("{path}: {} image(s) rewritten", report.rewritten));
            } else if report.changed {
                output.info(&format!("{path}: script tag added"));
            } else if self.settings.verbose {
                output.warning(&format!("{path}: no matching images"));
            }
        }

        let prefix = if self.dry_run { "Would rewrite" } else { "Rewrote" };
        output.summary(&format!(
            "{prefix} {total} image(s) in {} file(s)",
            reports.len()
        ));
        Ok(())
    }
}

/// Expand a glob pattern to the list of matching files, sorted.
fn collect_paths(pattern: &str) -> Result<Vec<PathBuf>, CliError> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Rewrite every file, sharing one rewriter.
///
/// All files are read and transformed in parallel before anything is written,
/// so a file that can't be read aborts the batch with every file untouched.
/// Reports are returned in input order.
pub(crate) fn rewrite_files(
    paths: &[PathBuf],
    config: &Config,
    dry_run: bool,
) -> Result<Vec<FileReport>, CliError> {
    let rewriter = LazyRewriter::new(&config.rewrite_config());

    let planned = paths
        .par_iter()
        .map(|path| plan_file(path, &rewriter, config))
        .collect::<Result<Vec<_>, _>>()?;

    if !dry_run {
        write_planned(&planned)?;
    }

    Ok(planned.into_iter().map(PlannedFile::into_report).collect())
}

fn plan_file(
    path: &Path,
    rewriter: &LazyRewriter,
    config: &Config,
) -> Result<PlannedFile, CliError> {
    let html = std::fs::read_to_string(path).map_err(|e| CliError::file(path, e))?;

    if FALLBACK_RE.is_match(&html) {
        tracing::debug!(path = %path.display(), "Skipping already rewritten file");
        return Ok(PlannedFile {
            path: path.to_path_buf(),
            new_html: None,
            rewritten: 0,
            skipped: true,
        });
    }

    let result = transform(&html, rewriter, config);
    let changed = result.html != html;

    tracing::debug!(
        path = %path.display(),
        rewritten = result.rewritten,
        changed,
        "Processed file"
    );

    Ok(PlannedFile {
        path: path.to_path_buf(),
        new_html: changed.then_some(result.html),
        rewritten: result.rewritten,
        skipped: false,
    })
}

/// Write changed files in order; on failure, report how many were written.
fn write_planned(planned: &[PlannedFile]) -> Result<(), CliError> {
    let mut written = 0;
    for file in planned {
        if let Some(html) = &file.new_html {
            std::fs::write(&file.path, html).map_err(|source| CliError::BatchWrite {
                path: file.path.clone(),
                written,
                source,
            })?;
            written += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PHOTO: &str = r#"<img class="photo" src="a.png" />"#;
    const PHOTO_REWRITTEN: &str = r#"<img class="lazyload photo" data-src="a.png" /><noscript><img class="photo" src="a.png" /></noscript>"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_collect_paths_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.html", "");
        write(dir.path(), "a.html", "");
        write(dir.path(), "c.txt", "");
        std::fs::create_dir(dir.path().join("d.html")).unwrap();

        let pattern = format!("{}/*.html", dir.path().display());
        let paths = collect_paths(&pattern).unwrap();

        assert_eq!(
            paths,
            vec![dir.path().join("a.html"), dir.path().join("b.html")]
        );
    }

    #[test]
    fn test_collect_paths_invalid_pattern() {
        let err = collect_paths("[").unwrap_err();
        assert!(matches!(err, CliError::Pattern(_)));
    }

    #[test]
    fn test_rewrite_files_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let with_image = write(dir.path(), "post.html", PHOTO);
        let without_image = write(dir.path(), "about.html", "<p>about</p>");
        let mut config = Config::default();
        config.lazyload.target_class = "photo".to_owned();

        let reports =
            rewrite_files(&[with_image.clone(), without_image.clone()], &config, false).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].path, with_image);
        assert_eq!(reports[0].rewritten, 1);
        assert!(reports[0].changed);
        assert_eq!(reports[1].rewritten, 0);
        assert!(!reports[1].changed);
        assert_eq!(std::fs::read_to_string(&with_image).unwrap(), PHOTO_REWRITTEN);
        assert_eq!(std::fs::read_to_string(&without_image).unwrap(), "<p>about</p>");
    }

    #[test]
    fn test_rewrite_files_dry_run_leaves_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "post.html", PHOTO);

        let reports = rewrite_files(&[path.clone()], &Config::default(), true).unwrap();

        assert_eq!(reports[0].rewritten, 1);
        assert!(reports[0].changed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PHOTO);
    }

    #[test]
    fn test_rewrite_files_script_added_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "about.html", "<p>about</p>\n");
        let mut config = Config::default();
        config.lazyload.include_script = true;

        let first = rewrite_files(&[path.clone()], &config, false).unwrap();
        let second = rewrite_files(&[path.clone()], &config, false).unwrap();

        assert!(first[0].changed);
        assert!(!second[0].changed);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<p>about</p>\n<script src=\"js/lazysizes.js\" async></script>\n"
        );
    }

    #[test]
    fn test_rewrite_files_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.html");

        let err = rewrite_files(&[missing], &Config::default(), false).unwrap_err();

        assert!(matches!(err, CliError::File { .. }));
    }

    #[test]
    fn test_rewrite_files_unreadable_file_leaves_others_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(dir.path(), "a.html", PHOTO);
        let missing = dir.path().join("b.html");
        let last = write(dir.path(), "c.html", PHOTO);

        let err = rewrite_files(&[first.clone(), missing, last.clone()], &Config::default(), false)
            .unwrap_err();

        assert!(matches!(err, CliError::File { .. }));
        assert!(err.to_string().contains("b.html"));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), PHOTO);
        assert_eq!(std::fs::read_to_string(&last).unwrap(), PHOTO);
    }

    #[test]
    fn test_rewrite_files_second_run_skips_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "post.html", PHOTO);
        let config = Config::default();

        let first = rewrite_files(&[path.clone()], &config, false).unwrap();
        let second = rewrite_files(&[path.clone()], &config, false).unwrap();

        assert_eq!(first[0].rewritten, 1);
        assert!(!first[0].skipped);
        assert!(second[0].skipped);
        assert!(!second[0].changed);
        assert_eq!(second[0].rewritten, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PHOTO_REWRITTEN);
    }

    #[test]
    fn test_fallback_detection() {
        assert!(FALLBACK_RE.is_match(PHOTO_REWRITTEN));
        assert!(FALLBACK_RE.is_match("<NOSCRIPT>\n<IMG src=\"a.png\" /></NOSCRIPT>"));
        assert!(!FALLBACK_RE.is_match(PHOTO));
        assert!(!FALLBACK_RE.is_match("<noscript><p>enable js</p></noscript>"));
    }
}
