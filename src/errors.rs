//! History Module Error Hierarchy
//!
//! Defines the error types of the server history module, categorized by the
//! phase in which they can occur: configuration, registration (setup),
//! transport between producers and the module, and the module lifecycle.

use config::ConfigError;

use crate::ValueKind;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Module configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Discovery and registration failures, raised before the main loop starts
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Failures between producers, the module and its outputs
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Lifecycle hooks called in the wrong state
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Metrics registration or encoding failures
    #[error(transparent)]
    Metrics(#[from] prometheus::Error),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The owning scope offers no directory to search for tagged variables
    #[error("ServerHistory '{module}': no directory found to search for history variables")]
    SearchRootNotFound { module: String },

    /// A variable with the same fully qualified name is already monitored
    #[error("ServerHistory: Variable name '{name}' already taken.")]
    DuplicateVariable { name: String },

    /// A variable declaring no elements can not be buffered
    #[error("ServerHistory: Variable '{name}' has no elements.")]
    EmptyVariable { name: String },

    /// Entering the run phase with nothing to monitor
    #[error(
        "No variables are connected to the ServerHistory module '{module}'. Did you use the correct tag or add a source?"
    )]
    NoVariablesConnected { module: String },

    /// Two outputs resolved to the same published name
    #[error("Output '{name}' is already defined")]
    DuplicateOutput { name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No input was created under this name
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// No output was defined under this name
    #[error("Unknown output: {0}")]
    UnknownOutput(String),

    /// Producer and consumer disagree on the value kind
    #[error("Variable '{name}' is of kind {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Producer wrote a different number of elements than declared
    #[error("Variable '{name}' has {expected} elements, got {actual}")]
    ElementCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Observation queue is full (non-blocking writes only)
    #[error("Observation queue full while writing '{0}'")]
    QueueFull(String),

    /// The receiving module is gone
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("ServerHistory '{module}' must be prepared before entering the main loop")]
    NotPrepared { module: String },

    #[error("ServerHistory '{module}' is already running")]
    AlreadyRunning { module: String },
}
