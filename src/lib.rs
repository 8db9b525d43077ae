//! `optwise` is a declarative command line option parser for Rust.
//!
//! The design follows the classic `optparse` family of option parsers:
//! * *Options, then positionals*:
//! Options are declared up front, each with one or more flags (ex: `-f`, `--file`).
//! Whatever the parser doesn't recognize as an option is handed back, in order, as a positional argument.
//! * *Actions*:
//! Each option has an [`Action`] which decides what happens when it is matched on the Cli (store a value, count, append, invoke a callback, etc).
//! * *Typed values*:
//! Values are converted by a type tag (`string`, `int`, `float`, `choice`, or any tag registered via [`OptionParser::register_type`]).
//! * *Formatted help*:
//! The help message is laid out in columns, word wrapped to the terminal width, and `%default` in an option's help expands to its default value.
//!
//! # Usage
//! More examples are outlined in [the source](https://github.com/optwise/optwise/tree/main/demos).
//!
//! ```no_run
#![doc = include_str!("../demos/file_reader.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ file_reader -h
//! Usage: file_reader [options] [PATTERN...]
//!
//! Read lines from FILE, and print those matching any PATTERN.
//!
//! Options:
//!   --version             show program's version number and exit
//!   -h, --help            show this help message and exit
//!   -f FILE, --file=FILE  read from FILE [default: -]
//!   -q, --quiet           don't print status messages
//!   -m MODE, --mode=MODE  output mode, one of plain or numbered [default: plain]
//!
//!   Limits:
//!     Stop reading early.
//!
//!     -n N, --max-lines=N
//!                         stop after N lines
//!
//! $ file_reader -qf data.txt --mode=numbered error
//! mode: numbered, max lines: None
//!
//! $ file_reader --mode=fancy
//! Usage: file_reader [options] [PATTERN...]
//!
//! file_reader: error: option --mode: invalid choice: 'fancy' (choose from 'plain', 'numbered')
//! ```
//!
//! # Builder Api
//! Configure `optwise` by starting with an [`OptionParser`], `add`ing options and `group`ing related options into an [`OptionGroup`].
//! Building results in a [`Parser`], which scans the Cli tokens:
//! * [`Parser::parse`] reads `std::env::args`, and exits the program on `--help`, `--version` or a usage error.
//! * [`Parser::parse_tokens`] scans the given tokens, printing help/errors, but returns the exit code instead of exiting.
//! * [`Parser::consume`] scans the given tokens without printing anything.
//!
//! ### Options
//! An [`Opt`] is declared from its flags; everything else is optional:
//! * The `dest` is where the option's value lands in [`Values`].
//! It defaults to the first long flag (with `-` replaced by `_`), else the first short flag.
//! * The `kind` is a type tag; storing and appending options without one are `string` typed.
//! * `nargs` makes an option consume several tokens, collected into a [`Value::List`].
//!
//! ### Callbacks
//! An option with [`Action::Callback`] hands its (converted) value to a closure, along with the live [`Parser`].
//! The callback may inspect and update the values collected so far, consume the remaining tokens, or register more options.
//! Returning a [`ParseError`] ends the parse with a usage error.
//!
//! ```no_run
#![doc = include_str!("../demos/verbosity.rs")]
//! ```
//!
//! ### Help formatting
//! The help message is rendered by a [`HelpFormatter`]: [`HelpFormatter::indented`] (the default) or [`HelpFormatter::titled`].
//! A custom [`HelpStyle`] changes how the usage and the headings look, while a [`Highlighter`](./prelude/trait.Highlighter.html) decorates them (ex: with terminal colours).
//! User facing messages may be localized with a [`Translator`](./prelude/trait.Translator.html).
//!
//! # Features
//! * `tracing_debug`: emit debug tracing of the option registration and the token scan.
pub use optwise_core::*;
