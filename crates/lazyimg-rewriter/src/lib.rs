//! Deferred image loading for HTML fragments.
//!
//! This crate rewrites self-closing `<img ... />` elements so that a
//! client-side loader can fetch them later:
//! - the `lazyload` class is added (or prepended to the existing class list)
//! - `src=` and `srcset=` are renamed to `data-src=` and `data-srcset=`
//! - the original element is kept inside a `<noscript>` fallback
//!
//! Matching is best-effort pattern matching, not an HTML parser. Markup that
//! doesn't look like a self-closing image element is left untouched, and the
//! transform is defined for every input string.
//!
//! # Example
//!
//! ```
//! use lazyimg_rewriter::{RewriteConfig, rewrite};
//!
//! let html = r#"<p><img src="a.png" /></p>"#;
//! let result = rewrite(html, &RewriteConfig::default());
//! assert_eq!(
//!     result,
//!     r#"<p><img class="lazyload" data-src="a.png" /><noscript><img src="a.png" /></noscript></p>"#
//! );
//! ```
//!
//! # Known limitations
//!
//! - Attribute renaming is literal text substitution: any attribute whose
//!   name ends in `src` (including an existing `data-src`) is renamed too.
//! - Byte-identical duplicate elements always produce byte-identical
//!   replacements.
//! - The output is not a fixed point: rewriting it again rewrites the
//!   fallback copy as well and nests `<noscript>` elements. Hosts that may
//!   see the same content twice should skip input that already contains a
//!   `<noscript><img` fallback, as `lazyimg batch` does.

mod config;
mod pattern;
mod rewriter;
mod tag;

pub use config::RewriteConfig;
pub use rewriter::{LazyRewriter, RewriteOutput, rewrite};
pub use tag::{LAZYLOAD_CLASS, noscript_fallback, rewrite_tag};
