mod value;
mod variable;

pub use value::*;
pub use variable::*;
