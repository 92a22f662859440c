//! Colored status output on stderr.
//!
//! Rewritten HTML may go to stdout, so every status line goes to stderr.

use console::{Style, Term};

/// Status line writer.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    warn: Style,
    err: Style,
    summary: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            err: Style::new().red(),
            summary: Style::new().cyan().bold(),
        }
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg, None);
    }

    /// Green status line.
    pub(crate) fn success(&self, msg: &str) {
        self.line(msg, Some(&self.ok));
    }

    /// Yellow status line.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(msg, Some(&self.warn));
    }

    /// Red status line.
    pub(crate) fn error(&self, msg: &str) {
        self.line(msg, Some(&self.err));
    }

    /// Bold cyan closing line of a batch run.
    pub(crate) fn summary(&self, msg: &str) {
        self.line(msg, Some(&self.summary));
    }

    fn line(&self, msg: &str, style: Option<&Style>) {
        // Status output is best-effort.
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }
}
