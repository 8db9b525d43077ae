//! Builder module for `optwise`.
//! See [documentation root](https://docs.rs/optwise/latest/optwise/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;
pub mod prelude;

pub use api::*;
pub use model::*;
pub use parser::{
    BadOptionError, ConfigError, HelpFormatter, HelpStyle, IndentedStyle, OptionValueError,
    ParseError, ParseOutcome, Parser, TitledStyle,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
