//! Rewrite configuration.

/// Settings for a single rewrite call.
///
/// An empty `target_class` selects every image element. A non-empty value
/// selects only elements whose `class="..."` value contains it as a
/// substring (compared case-insensitively).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Class name substring an image must carry to be rewritten.
    pub target_class: String,
}

impl RewriteConfig {
    /// Create a configuration targeting images with the given class.
    #[must_use]
    pub fn new(target_class: impl Into<String>) -> Self {
        Self {
            target_class: target_class.into(),
        }
    }

    /// Whether every image element is selected.
    #[must_use]
    pub fn matches_all(&self) -> bool {
        self.target_class.is_empty()
    }
}
