mod buffer;
mod entry;
mod naming;

pub use buffer::*;
pub(crate) use entry::*;
pub use naming::*;

#[cfg(test)]
mod naming_test;
