//! Fragment-level rewriting.

use regex::{Captures, Regex};

use crate::config::RewriteConfig;
use crate::pattern::selection_regex;
use crate::tag::{noscript_fallback, rewrite_tag};

/// Result of rewriting a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutput {
    /// Rewritten HTML.
    pub html: String,
    /// Number of image elements that were rewritten.
    pub rewritten: usize,
}

/// Image rewriter with a precompiled selection pattern.
///
/// Holds no mutable state, so one instance can be shared across threads and
/// reused for any number of fragments.
#[derive(Debug, Clone)]
pub struct LazyRewriter {
    selector: Option<Regex>,
}

impl LazyRewriter {
    /// Create a rewriter for the given configuration.
    #[must_use]
    pub fn new(config: &RewriteConfig) -> Self {
        Self {
            selector: selection_regex(config),
        }
    }

    /// Rewrite every selected image element in `html`.
    ///
    /// Returns the input unchanged when nothing is selected.
    #[must_use]
    pub fn rewrite(&self, html: &str) -> String {
        self.rewrite_with_stats(html).html
    }

    /// Rewrite `html` and report how many elements were rewritten.
    ///
    /// Matches are replaced left to right in a single pass. Each selected
    /// element becomes its rewritten form immediately followed by a
    /// `<noscript>` fallback holding the original text.
    #[must_use]
    pub fn rewrite_with_stats(&self, html: &str) -> RewriteOutput {
        let Some(selector) = &self.selector else {
            return RewriteOutput {
                html: html.to_owned(),
                rewritten: 0,
            };
        };

        let mut rewritten = 0;
        let result = selector.replace_all(html, |caps: &Captures| {
            rewritten += 1;
            lazy_markup(&caps[0])
        });

        if rewritten > 0 {
            tracing::debug!(rewritten, "Rewrote image tags");
        }

        RewriteOutput {
            html: result.into_owned(),
            rewritten,
        }
    }
}

/// Rewrite `html` for deferred image loading.
///
/// Convenience wrapper around [`LazyRewriter`] for one-off calls.
#[must_use]
pub fn rewrite(html: &str, config: &RewriteConfig) -> String {
    LazyRewriter::new(config).rewrite(html)
}

fn lazy_markup(tag: &str) -> String {
    let mut markup = rewrite_tag(tag);
    markup.push_str(&noscript_fallback(tag));
    markup
}
