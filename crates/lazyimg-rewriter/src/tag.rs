//! Markup produced for a single selected image element.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Class added to every rewritten image.
pub const LAZYLOAD_CLASS: &str = "lazyload";

/// Regex to match a `class` attribute name.
static CLASS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\sclass\s*=").unwrap());

/// Regex to match the start of a `class` value: an opening quote, or a whole
/// unquoted value.
static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\sclass\s*=\s*)(?:(["'])|([^\s"'=<>`/]+))"#).unwrap()
});

/// Regex to match the tag name at the start of the element.
static TAG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^<img").unwrap());

/// Rewrite one image element for deferred loading.
///
/// Adds `class="lazyload"` right after the tag name when the element has no
/// class attribute, otherwise prepends `lazyload ` to the existing class
/// value. An unquoted value is quoted as `class="lazyload value"`; a `class`
/// attribute whose value can't be read is left alone. Then renames `src=` to `data-src=` and `srcset=` to `data-srcset=`.
///
/// The renaming is plain text substitution: it also hits any other attribute
/// name ending in `src`, and an existing `data-src=` becomes `data-data-src=`.
///
/// # Examples
///
/// ```
/// use lazyimg_rewriter::rewrite_tag;
///
/// assert_eq!(
///     rewrite_tag(r#"<img src="a.png" class="foo" />"#),
///     r#"<img data-src="a.png" class="lazyload foo" />"#
/// );
/// ```
#[must_use]
pub fn rewrite_tag(tag: &str) -> String {
    let classed = if CLASS_ATTR_RE.is_match(tag) {
        CLASS_ATTR_RE.replace(tag, prepend_class)
    } else if CLASS_NAME_RE.is_match(tag) {
        Cow::Borrowed(tag)
    } else {
        TAG_NAME_RE.replace(tag, format!(r#"${{0}} class="{LAZYLOAD_CLASS}""#))
    };

    classed
        .replace("src=", "data-src=")
        .replace("srcset=", "data-srcset=")
}

fn prepend_class(caps: &Captures<'_>) -> String {
    let name = &caps[1];
    if let Some(quote) = caps.get(2) {
        format!("{name}{}{LAZYLOAD_CLASS} ", quote.as_str())
    } else if let Some(value) = caps.get(3) {
        format!(r#"{name}"{LAZYLOAD_CLASS} {}""#, value.as_str())
    } else {
        caps[0].to_owned()
    }
}

/// Wrap the original element in a `<noscript>` fallback.
#[must_use]
pub fn noscript_fallback(tag: &str) -> String {
    format!("<noscript>{tag}</noscript>")
}
