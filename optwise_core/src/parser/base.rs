use thiserror::Error;

use crate::api::Values;
use crate::prelude::Translator;

/// A mistake in the parser setup (ex: two options sharing a flag).
/// These are programming errors, raised when options are registered - never while parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An option was declared without any flags.
    #[error("Config error: at least one option string must be supplied.")]
    MissingFlags,

    /// A flag isn't of the form `-x` or `--name`.
    #[error("Config error: invalid option string '{flag}': {reason}.")]
    InvalidFlag {
        /// The offending flag.
        flag: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A flag is already registered on the parser.
    #[error("Config error: conflicting option string: {flag}.")]
    DuplicateFlag {
        /// The flag registered twice.
        flag: String,
    },

    /// A metavar delimiter other than the two supported spellings.
    #[error("Config error: invalid metavar delimiter for {kind} options: '{delimiter}'.")]
    InvalidDelimiter {
        /// Either `short` or `long`.
        kind: &'static str,
        /// The rejected delimiter.
        delimiter: String,
    },

    /// A type tag which is not in the parser's type registry.
    #[error("Config error: option {option}: invalid option type '{kind}'.")]
    UnknownType {
        /// The option, as `-f/--file`.
        option: String,
        /// The unregistered type tag.
        kind: String,
    },

    /// Attributes which don't make sense together (ex: a type on a `count` option).
    #[error("Config error: option {option}: {message}.")]
    InvalidAttribute {
        /// The option, as `-f/--file`.
        option: String,
        /// What is inconsistent.
        message: String,
    },
}

/// An option on the Cli which the parser doesn't accept as written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BadOptionError {
    /// The flag (or long flag prefix) matches nothing.
    #[error("no such option: {0}")]
    NoSuchOption(String),

    /// The long flag prefix matches several long flags.
    #[error("ambiguous option: {flag} ({}?)", .candidates.join(", "))]
    Ambiguous {
        /// The prefix as written.
        flag: String,
        /// The matching long flags, sorted.
        candidates: Vec<String>,
    },

    /// The tokens ran out before the option received its values.
    #[error("{flag} option requires {count} argument{}", plural_suffix(.count))]
    MissingValue {
        /// The resolved flag.
        flag: String,
        /// How many values the option takes.
        count: usize,
    },

    /// A `--flag=value` was given to an option which takes no value.
    #[error("{0} option does not take a value")]
    UnexpectedValue(String),
}

fn plural_suffix(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

/// A value on the Cli which cannot be converted for its option.
/// The message names the offending option string and value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct OptionValueError(pub String);

impl OptionValueError {
    /// Create an option value error with a complete message.
    pub fn new(message: impl Into<String>) -> Self {
        OptionValueError(message.into())
    }
}

/// Any error which ends parsing with a usage message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// See [`BadOptionError`].
    #[error(transparent)]
    BadOption(#[from] BadOptionError),

    /// See [`OptionValueError`].
    #[error(transparent)]
    OptionValue(#[from] OptionValueError),

    /// Raised by callbacks (see [`ParseError::usage`]).
    #[error("{0}")]
    Usage(String),
}

impl ParseError {
    /// Create a free-form usage error, typically from within a callback.
    pub fn usage(message: impl Into<String>) -> Self {
        ParseError::Usage(message.into())
    }

    /// Render this error through the `translator`.
    /// With the identity translator, this is the same as `to_string()`.
    pub fn localize(&self, translator: &dyn Translator) -> String {
        match self {
            ParseError::BadOption(BadOptionError::NoSuchOption(flag)) => {
                fill(&translator.gettext("no such option: %s"), &[flag.as_str()])
            }
            ParseError::BadOption(BadOptionError::Ambiguous { flag, candidates }) => fill(
                &translator.gettext("ambiguous option: %s (%s?)"),
                &[flag.as_str(), candidates.join(", ").as_str()],
            ),
            ParseError::BadOption(BadOptionError::MissingValue { flag, count }) => fill(
                &translator.ngettext(
                    "%s option requires %d argument",
                    "%s option requires %d arguments",
                    *count,
                ),
                &[flag.as_str(), count.to_string().as_str()],
            ),
            ParseError::BadOption(BadOptionError::UnexpectedValue(flag)) => {
                fill(
                    &translator.gettext("%s option does not take a value"),
                    &[flag.as_str()],
                )
            }
            ParseError::OptionValue(error) => error.to_string(),
            ParseError::Usage(message) => message.clone(),
        }
    }
}

/// Substitute the `%s`/`%d` placeholders of a message template, in order.
pub(crate) fn fill(template: &str, arguments: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut arguments = arguments.iter();
    let mut rest = template;

    while let Some(index) = rest.find('%') {
        out.push_str(&rest[..index]);
        let placeholder = &rest[index..];

        if placeholder.starts_with("%s") || placeholder.starts_with("%d") {
            if let Some(argument) = arguments.next() {
                out.push_str(argument);
            }
            rest = &placeholder[2..];
        } else {
            out.push('%');
            rest = &placeholder[1..];
        }
    }

    out.push_str(rest);
    out
}

/// What the scanner should do after an option has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    PrintHelp,
    PrintVersion,
}

/// The result of [`Parser::consume`](./struct.Parser.html#method.consume).
#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
    /// Every token was consumed.
    Complete {
        /// The option values, including defaults.
        values: Values,
        /// The positional arguments, in order.
        args: Vec<String>,
    },
    /// The help option was matched; nothing after it was scanned.
    Help,
    /// The version option was matched; nothing after it was scanned.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Untranslated;
    use rstest::rstest;

    #[rstest]
    #[case(BadOptionError::NoSuchOption("--bogus".to_string()), "no such option: --bogus")]
    #[case(
        BadOptionError::Ambiguous {
            flag: "--fo".to_string(),
            candidates: vec!["--foo".to_string(), "--fork".to_string()],
        },
        "ambiguous option: --fo (--foo, --fork?)"
    )]
    #[case(
        BadOptionError::MissingValue { flag: "-f".to_string(), count: 1 },
        "-f option requires 1 argument"
    )]
    #[case(
        BadOptionError::MissingValue { flag: "--point".to_string(), count: 3 },
        "--point option requires 3 arguments"
    )]
    #[case(
        BadOptionError::UnexpectedValue("--verbose".to_string()),
        "--verbose option does not take a value"
    )]
    fn bad_option_display(#[case] error: BadOptionError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
        let error = ParseError::from(error);
        assert_eq!(error.to_string(), expected);
        assert_eq!(error.localize(&Untranslated), expected);
    }

    #[test]
    fn option_value_display() {
        let error = ParseError::from(OptionValueError::new(
            "option -n: invalid integer value: 'x'",
        ));
        assert_eq!(error.to_string(), "option -n: invalid integer value: 'x'");
        assert_eq!(error.localize(&Untranslated), error.to_string());
    }

    #[test]
    fn usage_display() {
        let error = ParseError::usage("too many cooks");
        assert_eq!(error.to_string(), "too many cooks");
        assert_eq!(error.localize(&Untranslated), "too many cooks");
    }

    struct German;

    impl Translator for German {
        fn gettext(&self, message: &str) -> String {
            match message {
                "no such option: %s" => "unbekannte Option: %s".to_string(),
                "%s option requires %d argument" => "%s erwartet %d Argument".to_string(),
                "%s option requires %d arguments" => "%s erwartet %d Argumente".to_string(),
                _ => message.to_string(),
            }
        }
    }

    #[rstest]
    #[case(BadOptionError::NoSuchOption("-q".to_string()), "unbekannte Option: -q")]
    #[case(
        BadOptionError::MissingValue { flag: "-f".to_string(), count: 1 },
        "-f erwartet 1 Argument"
    )]
    #[case(
        BadOptionError::MissingValue { flag: "-p".to_string(), count: 2 },
        "-p erwartet 2 Argumente"
    )]
    fn localize(#[case] error: BadOptionError, #[case] expected: &str) {
        assert_eq!(ParseError::from(error).localize(&German), expected);
    }

    #[rstest]
    #[case("no placeholders", vec![], "no placeholders")]
    #[case("%s and %d", vec!["a", "1"], "a and 1")]
    #[case("100% of %s", vec!["x"], "100% of x")]
    #[case("%s %s", vec!["only"], "only ")]
    #[case("trailing %", vec![], "trailing %")]
    fn fill_template(#[case] template: &str, #[case] arguments: Vec<&str>, #[case] expected: &str) {
        assert_eq!(fill(template, &arguments), expected);
    }

    #[test]
    fn config_display() {
        assert_eq!(
            ConfigError::DuplicateFlag {
                flag: "-f".to_string()
            }
            .to_string(),
            "Config error: conflicting option string: -f."
        );
        assert_eq!(
            ConfigError::InvalidDelimiter {
                kind: "short",
                delimiter: "=".to_string()
            }
            .to_string(),
            "Config error: invalid metavar delimiter for short options: '='."
        );
    }
}
