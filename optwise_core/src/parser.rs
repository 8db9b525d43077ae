mod base;
mod interface;
mod middleware;
mod printer;

pub use base::{BadOptionError, ConfigError, OptionValueError, ParseError, ParseOutcome};
pub(crate) use base::Flow;
pub(crate) use interface::{ConsoleInterface, UserInterface};
pub use middleware::Parser;
pub use printer::{HelpFormatter, HelpStyle, IndentedStyle, TitledStyle};

#[cfg(test)]
pub(crate) use interface::util;
