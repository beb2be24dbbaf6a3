use std::fmt::Debug;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_HISTORY_LENGTH;
use crate::constants::DEFAULT_HISTORY_TAG;
use crate::constants::DEFAULT_PREFIX;
use crate::Error;
use crate::Result;

/// Ring buffer and naming parameters of one history module
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryConfig {
    /// Number of entries in every history buffer
    /// Fixed per module, buffers are never resized
    #[serde(default = "default_history_length")]
    pub history_length: usize,

    /// Tag used to find variables to be added to the history
    #[serde(default = "default_history_tag")]
    pub history_tag: String,

    /// Creates an additional buffer per history buffer holding the time
    /// stamps (seconds since epoch) of each entry
    #[serde(default)]
    pub enable_time_stamps: bool,

    /// Directory the history outputs are published under
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_length: default_history_length(),
            history_tag: default_history_tag(),
            enable_time_stamps: false,
            prefix: default_prefix(),
        }
    }
}

impl HistoryConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.history_length == 0 {
            return Err(Error::Config(ConfigError::Message(
                "history_length must be greater than 0".into(),
            )));
        }

        if self.history_tag.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "history_tag cannot be empty".into(),
            )));
        }

        // An empty prefix would publish history outputs under the names of their inputs
        if self.prefix.split('/').all(|segment| segment.is_empty()) {
            return Err(Error::Config(ConfigError::Message(format!(
                "prefix '{}' must contain at least one path segment",
                self.prefix
            ))));
        }

        Ok(())
    }
}

fn default_history_length() -> usize {
    DEFAULT_HISTORY_LENGTH
}
fn default_history_tag() -> String {
    DEFAULT_HISTORY_TAG.to_string()
}
fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}
