//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one lock session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt printed before each read when commands come from a terminal.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Whether to print the data file name and command overview at startup.
    #[serde(default = "default_true")]
    pub banner: bool,

    /// chrono format string for the timestamps in requesting/received
    /// messages (local time).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// NDJSON file that receives one record per requesting/received
    /// message. Disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            banner: default_true(),
            timestamp_format: default_timestamp_format(),
            event_log: None,
        }
    }
}
