//! The server history module.
//!
//! A [`ServerHistory`] owns the ring buffers of every variable it monitors.
//! Variables are collected before the module runs, either automatically from
//! its scope by tag or explicitly from added sources. Once running, every
//! value written by a producer is appended to the buffers of its variable and
//! the full buffers are republished.
//!
//! ## Lifecycle
//! ```text
//! new()/add_source()  ──prepare()──>  Running  ──main_loop()/process_pending()
//!     Preparing
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::discovery::discover_source;
use crate::discovery::discover_tagged;
use crate::metrics::register_custom_metrics;
use crate::metrics::OBSERVATIONS_PROCESSED;
use crate::metrics::UNMATCHED_OBSERVATIONS;
use crate::utils::time::get_now_as_u64;
use crate::DataFaultFlag;
use crate::DataValidity;
use crate::HistoryNaming;
use crate::InputHub;
use crate::LifecycleError;
use crate::Observation;
use crate::ProcessVariableSink;
use crate::ReadAnyGroup;
use crate::Result;
use crate::ServerHistoryConfig;
use crate::SetupError;
use crate::VariableModel;
use crate::VariableRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Variables can be added, nothing is published yet
    Preparing,
    /// Buffers are published and updated on every observation
    Running,
}

/// History module: keeps the last values of every monitored variable
#[derive(Debug)]
pub struct ServerHistory {
    name: String,
    config: ServerHistoryConfig,
    registry: VariableRegistry,
    inputs: Arc<InputHub>,
    read_group: ReadAnyGroup,
    state: ModuleState,
    fault: DataFaultFlag,
}

impl ServerHistory {
    /// Creates the module and registers every variable of `scope` carrying the
    /// configured history tag.
    pub fn new(
        name: &str,
        config: ServerHistoryConfig,
        scope: &dyn VariableModel,
        sink: Arc<dyn ProcessVariableSink>,
    ) -> Result<Self> {
        let config = config.validate()?;
        register_custom_metrics();

        let (inputs, read_group) = InputHub::new(config.transport.observation_queue_capacity);
        let inputs = Arc::new(inputs);
        let naming = HistoryNaming::from_config(name, &config.history);
        let mut registry = VariableRegistry::new(naming, config.history.history_length, inputs.clone(), sink);

        let added = discover_tagged(name, scope, &mut registry)?;
        info!(
            "ServerHistory '{}': {} variable(s) found by tag '{}'",
            name, added, config.history.history_tag
        );

        Ok(Self {
            name: name.to_string(),
            config,
            registry,
            inputs,
            read_group,
            state: ModuleState::Preparing,
            fault: DataFaultFlag::default(),
        })
    }

    /// Registers every variable of `source`, tags ignored.
    ///
    /// With a non-empty `submodule` only variables inside that directory of
    /// the source are added. Returns the number of variables added.
    pub fn add_source(
        &mut self,
        source: &dyn VariableModel,
        submodule: &str,
    ) -> Result<usize> {
        if self.state != ModuleState::Preparing {
            return Err(LifecycleError::AlreadyRunning {
                module: self.name.clone(),
            }
            .into());
        }

        let added = discover_source(source, submodule, &mut self.registry)?;
        info!(
            "ServerHistory '{}': {} variable(s) added from source (submodule: '{}')",
            self.name, added, submodule
        );
        Ok(added)
    }

    pub fn get_number_of_variables(&self) -> usize {
        self.registry.len()
    }

    /// Publishes every buffer once with faulty validity and enters the
    /// running state.
    pub fn prepare(&mut self) -> Result<()> {
        if self.state != ModuleState::Preparing {
            return Err(LifecycleError::AlreadyRunning {
                module: self.name.clone(),
            }
            .into());
        }
        if self.registry.is_empty() {
            return Err(SetupError::NoVariablesConnected {
                module: self.name.clone(),
            }
            .into());
        }

        self.fault.enter();
        self.registry.publish_all(self.fault.validity_for(DataValidity::Ok))?;
        self.fault.exit();

        self.state = ModuleState::Running;
        info!(
            "ServerHistory '{}' running with {} variable(s)",
            self.name,
            self.registry.len()
        );
        Ok(())
    }

    /// Processes observations until the shutdown signal fires.
    ///
    /// Each observation is handled to completion before the next one is
    /// received.
    pub async fn main_loop(
        &mut self,
        mut shutdown: watch::Receiver<()>,
    ) -> Result<()> {
        self.ensure_running()?;

        loop {
            tokio::select! {
                biased;
                // P0: shutdown received
                _ = shutdown.changed() => {
                    warn!("[ServerHistory:{}] shutdown signal received.", self.name);
                    return Ok(());
                }
                // P1: next observation of any input
                observation = self.read_group.read_any() => {
                    match observation {
                        Some(observation) => self.handle_observation(observation)?,
                        None => {
                            warn!("[ServerHistory:{}] observation channel closed.", self.name);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// [`Self::prepare`] followed by [`Self::main_loop`]
    pub async fn run(
        &mut self,
        shutdown: watch::Receiver<()>,
    ) -> Result<()> {
        self.prepare()?;
        self.main_loop(shutdown).await
    }

    /// Handles every queued observation without waiting and returns how many
    /// there were.
    pub fn process_pending(&mut self) -> Result<usize> {
        self.ensure_running()?;

        let mut handled = 0;
        while let Some(observation) = self.read_group.try_read_any() {
            self.handle_observation(observation)?;
            handled += 1;
        }
        Ok(handled)
    }

    pub(crate) fn handle_observation(
        &mut self,
        mut observation: Observation,
    ) -> Result<()> {
        observation.validity = self.fault.validity_for(observation.validity);
        let now = get_now_as_u64();

        match self.registry.find_mut(observation.source) {
            Some(slot) => {
                if let Err(e) = slot.apply(&observation, now) {
                    error!("[ServerHistory:{}] update of '{}' failed: {:?}", self.name, slot.name(), e);
                    return Err(e);
                }
                OBSERVATIONS_PROCESSED.with_label_values(&[self.name.as_str()]).inc();
            }
            None => {
                debug!(source = %observation.source, "observation from unmonitored source ignored");
                UNMATCHED_OBSERVATIONS.with_label_values(&[self.name.as_str()]).inc();
            }
        }
        Ok(())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state != ModuleState::Running {
            return Err(LifecycleError::NotPrepared {
                module: self.name.clone(),
            }
            .into());
        }
        Ok(())
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Input factory producers get their writers from
    pub fn inputs(&self) -> Arc<InputHub> {
        self.inputs.clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ServerHistoryConfig {
        &self.config
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Tag carried by every input and output the module creates
    pub fn internal_tag(&self) -> String {
        self.registry.naming().internal_tag()
    }
}
