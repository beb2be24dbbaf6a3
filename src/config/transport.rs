use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_OBSERVATION_QUEUE_CAPACITY;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransportConfig {
    /// Capacity of the queue all producers of one module push observations into.
    /// Producers wait when it is full.
    #[serde(default = "default_observation_queue_capacity")]
    pub observation_queue_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            observation_queue_capacity: default_observation_queue_capacity(),
        }
    }
}

impl TransportConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.observation_queue_capacity == 0 {
            return Err(Error::Config(ConfigError::Message(
                "observation_queue_capacity must be > 0".into(),
            )));
        }
        Ok(())
    }
}

fn default_observation_queue_capacity() -> usize {
    DEFAULT_OBSERVATION_QUEUE_CAPACITY
}
