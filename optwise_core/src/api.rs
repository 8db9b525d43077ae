mod core;
mod group;
mod option;
mod types;
mod values;

pub use self::core::OptionParser;
pub use group::OptionGroup;
pub use option::{Callback, Opt};
pub use types::{Checker, TypeRegistry};
pub use values::Values;
