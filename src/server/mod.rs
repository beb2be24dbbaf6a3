mod builder;
mod fault_flag;
mod server_history;

pub use builder::*;
pub use fault_flag::*;
pub use server_history::*;

#[cfg(test)]
mod builder_test;
