//! Server-side history for process variables.
//!
//! A [`ServerHistory`] module monitors a set of process variables and keeps the
//! last `history_length` values of each of them in ring buffers. Every update
//! of a variable rotates its buffers and republishes them, so consumers always
//! see the complete recent history of the variable as an array output.
//!
//! ```ignore
//! let builder = ServerHistoryBuilder::new("ServerHistory");
//! let outputs = builder.outputs();
//! let mut history = builder.build(&application)?;
//! history.add_source(&device, "")?;
//! history.run(shutdown_rx).await?;
//! ```

mod config;
mod constants;
mod discovery;
mod errors;
mod history;
mod metrics;
mod model;
mod registry;
mod server;
mod transport;
pub(crate) mod utils;

pub use config::*;
pub use discovery::*;
pub use errors::*;
pub use history::*;
pub use metrics::gather_metrics;
pub use model::*;
pub use registry::*;
pub use server::*;
pub use transport::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
