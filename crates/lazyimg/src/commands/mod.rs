//! CLI command implementations.

pub(crate) mod batch;
pub(crate) mod rewrite;
mod settings;

pub(crate) use batch::BatchArgs;
pub(crate) use rewrite::RewriteArgs;
pub(crate) use settings::SettingsArgs;
