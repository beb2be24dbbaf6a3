mod variable_registry;

pub use variable_registry::*;
