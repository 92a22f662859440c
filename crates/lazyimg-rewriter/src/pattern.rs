//! Selection patterns for image elements.
//!
//! Each pattern stays inside a single tag, so a match never swallows
//! neighbouring markup, and only self-closing elements (`/>`) are selected.
//! A quoted attribute value may contain `>` but not `<`; an unbalanced quote
//! is read as a plain character.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::RewriteConfig;

/// One unit of attribute text: a quoted value or any character but `>`.
const ATTR_UNIT: &str = r#"(?:"[^"<]*"|'[^'<]*'|[^>])"#;

/// Regex to match any self-closing image element.
static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)<img(?:\s{ATTR_UNIT}*)?/>")).unwrap());

/// Build the selection regex for a configuration.
///
/// The target class is escaped, so it is matched as a literal substring of the
/// quoted `class` value. Returns `None` only if the pattern can't be compiled
/// (an absurdly long class name exceeding the regex size limit), in which case
/// nothing is selected.
pub(crate) fn selection_regex(config: &RewriteConfig) -> Option<Regex> {
    if config.matches_all() {
        return Some(IMG_TAG_RE.clone());
    }

    let pattern = format!(
        r#"(?i)<img\s(?:{ATTR_UNIT}*?\s)?class="[^"]*{}[^"]*"{ATTR_UNIT}*/>"#,
        regex::escape(&config.target_class)
    );
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(
                target_class = %config.target_class,
                error = %e,
                "Failed to compile image selection pattern"
            );
            None
        }
    }
}
