//! Configuration defaults for lockranger.

/// Prompt shown before each read from an interactive terminal.
pub const DEFAULT_PROMPT: &str = "CMD> ";

/// `ctime(3)`-style timestamp used in requesting/received messages.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

// Default value functions for serde
pub(crate) fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}
pub(crate) fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
