//! Deferred-loading script inclusion.
//!
//! The rewriter only renames attributes; a client-side loader has to swap
//! `data-src` back in. When enabled, the CLI appends a `<script>` tag for it
//! after the content, where a page footer would load it.

/// Build the `<script>` tag loading the deferred-loading script from `url`.
pub(crate) fn script_tag(url: &str) -> String {
    format!(r#"<script src="{}" async></script>"#, escape_attr(url))
}

/// Append the script tag to `html` unless it is already present.
///
/// Returns whether the tag was appended.
pub(crate) fn append_script(html: &mut String, url: &str) -> bool {
    let tag = script_tag(url);
    if html.contains(&tag) {
        return false;
    }
    if !html.is_empty() && !html.ends_with('\n') {
        html.push('\n');
    }
    html.push_str(&tag);
    html.push('\n');
    true
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
