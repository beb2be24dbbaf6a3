//! Fluent construction of a [`ServerHistory`].
//!
//! ## Example
//! ```ignore
//! let builder = ServerHistoryBuilder::new("ServerHistory");
//! let outputs = builder.outputs();
//! let mut history = builder.build(&application)?;
//! history.add_source(&device, "")?;
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! history.run(shutdown_rx).await?;
//! ```
//!
//! Without an explicit configuration the builder loads it the usual way
//! (defaults, `CONFIG_PATH` file, `HISTORY__*` environment). Without an
//! explicit sink the outputs are published to an in-process
//! [`OutputRegistry`].

use std::sync::Arc;

use tracing::info;

use crate::OutputRegistry;
use crate::ProcessVariableSink;
use crate::Result;
use crate::ServerHistory;
use crate::ServerHistoryConfig;
use crate::VariableModel;

pub struct ServerHistoryBuilder {
    name: String,
    config: Option<ServerHistoryConfig>,
    config_path: Option<String>,
    sink: Option<Arc<dyn ProcessVariableSink>>,
    outputs: Arc<OutputRegistry>,
}

impl ServerHistoryBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            config: None,
            config_path: None,
            sink: None,
            outputs: OutputRegistry::new(),
        }
    }

    /// Uses `config` instead of loading one
    pub fn config(
        mut self,
        config: ServerHistoryConfig,
    ) -> Self {
        self.config = Some(config);
        self
    }

    /// Layers the file at `path` over the loaded configuration
    pub fn config_path(
        mut self,
        path: &str,
    ) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    /// Publishes through `sink` instead of the default [`OutputRegistry`]
    pub fn sink(
        mut self,
        sink: Arc<dyn ProcessVariableSink>,
    ) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Registry receiving the outputs when no custom sink is set
    pub fn outputs(&self) -> Arc<OutputRegistry> {
        self.outputs.clone()
    }

    pub fn build(
        self,
        scope: &dyn VariableModel,
    ) -> Result<ServerHistory> {
        let mut config = match self.config {
            Some(config) => config,
            None => ServerHistoryConfig::new()?,
        };
        if let Some(path) = &self.config_path {
            info!("with_override_config from: {}", path);
            config = config.with_override_config(path)?;
        }

        let sink: Arc<dyn ProcessVariableSink> = match self.sink {
            Some(sink) => sink,
            None => self.outputs.clone(),
        };
        ServerHistory::new(&self.name, config, scope, sink)
    }
}
