use std::collections::{HashMap, VecDeque};
use std::env;
use std::rc::Rc;

use crate::api::{Opt, OptionGroup, TypeRegistry, Values};
use crate::constant::*;
use crate::matcher::{classify, FlagIndex, Token};
use crate::model::Value;
use crate::parser::base::*;
use crate::parser::interface::UserInterface;
use crate::parser::printer::HelpFormatter;
use crate::prelude::Translator;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The configured option parser.
/// Built via [`OptionParser::build`](./struct.OptionParser.html#method.build).
///
/// Options may still be added or removed after building (including from within a callback).
/// Each parse starts from fresh values and positional arguments.
pub struct Parser {
    pub(crate) prog: String,
    pub(crate) usage: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) epilog: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) option_list: Vec<Rc<Opt>>,
    pub(crate) option_groups: Vec<OptionGroup>,
    pub(crate) index: FlagIndex,
    pub(crate) defaults: HashMap<String, Option<Value>>,
    pub(crate) allow_interspersed_args: bool,
    pub(crate) types: TypeRegistry,
    pub(crate) translator: Rc<dyn Translator>,
    pub(crate) formatter: HelpFormatter,
    pub(crate) user_interface: Box<dyn UserInterface>,
    pub(crate) values: Values,
    pub(crate) largs: Vec<String>,
    pub(crate) rargs: VecDeque<String>,
}

impl Parser {
    /// Register an option at the top level of the parser.
    ///
    /// The option's `dest` gets its default: the option's own, else null (unless the `dest` already has one).
    pub fn add_option(&mut self, option: Opt) -> Result<(), ConfigError> {
        let option = self.register(option)?;
        self.option_list.push(option);
        Ok(())
    }

    /// Register an option group and its options.
    /// When any of its options is rejected, none of them stay registered.
    pub fn add_option_group(&mut self, mut group: OptionGroup) -> Result<(), ConfigError> {
        let defaults = self.defaults.clone();

        for option in group.take_pending() {
            match self.register(option) {
                Ok(option) => group.option_list.push(option),
                Err(error) => {
                    for registered in group.option_list.drain(..) {
                        self.index.remove(registered.opt_string());
                    }

                    self.defaults = defaults;
                    return Err(error);
                }
            }
        }

        self.option_groups.push(group);
        Ok(())
    }

    fn register(&mut self, option: Opt) -> Result<Rc<Opt>, ConfigError> {
        let option = Rc::new(option.check(&self.types)?);
        self.index.insert(&option)?;

        if let Some(dest) = option.get_dest() {
            match option.get_default() {
                Some(default) => {
                    self.defaults.insert(dest.to_string(), Some(default.clone()));
                }
                None => {
                    self.defaults.entry(dest.to_string()).or_insert(None);
                }
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registered {option:?}.");
        }

        Ok(option)
    }

    /// Remove the option which owns `flag` (along with all its other flags).
    /// Returns whether there was such an option.
    pub fn remove_option(&mut self, flag: &str) -> bool {
        match self.index.remove(flag) {
            Some(option) => {
                let kept = |candidate: &Rc<Opt>| !Rc::ptr_eq(candidate, &option);
                self.option_list.retain(kept);

                for group in self.option_groups.iter_mut() {
                    group.option_list.retain(kept);
                }

                true
            }
            None => false,
        }
    }

    /// The option which owns `flag`.
    pub fn get_option(&self, flag: &str) -> Option<&Opt> {
        self.index.get(flag).map(AsRef::as_ref)
    }

    /// Whether some option owns `flag`.
    pub fn has_option(&self, flag: &str) -> bool {
        self.index.get(flag).is_some()
    }

    /// The group holding the option which owns `flag`.
    pub fn get_option_group(&self, flag: &str) -> Option<&OptionGroup> {
        let option = self.index.get(flag)?;
        self.option_groups.iter().find(|group| {
            group
                .option_list
                .iter()
                .any(|candidate| Rc::ptr_eq(candidate, option))
        })
    }

    /// Set the default value of `dest`, overriding the option's own default.
    pub fn set_default(&mut self, dest: impl Into<String>, value: impl Into<Value>) {
        self.defaults.insert(dest.into(), Some(value.into()));
    }

    /// Make the default of `dest` null.
    pub fn clear_default(&mut self, dest: impl Into<String>) {
        self.defaults.insert(dest.into(), None);
    }

    /// The values a parse starts from.
    /// String defaults of typed options are converted like a Cli value would be.
    pub fn get_default_values(&self) -> Result<Values, OptionValueError> {
        let mut defaults = self.defaults.clone();

        for option in self.all_options() {
            if let Some(dest) = option.get_dest() {
                let raw = match defaults.get(dest) {
                    Some(Some(Value::Str(raw))) => raw.clone(),
                    _ => continue,
                };
                let value = option.check_value(option.opt_string(), &raw, &self.types)?;
                defaults.insert(dest.to_string(), Some(value));
            }
        }

        Ok(Values::from_defaults(defaults))
    }

    fn all_options(&self) -> impl Iterator<Item = &Rc<Opt>> {
        self.option_list.iter().chain(
            self.option_groups
                .iter()
                .flat_map(|group| group.option_list.iter()),
        )
    }

    /// Let options follow positional arguments (the default).
    pub fn enable_interspersed_args(&mut self) {
        self.allow_interspersed_args = true;
    }

    /// Stop scanning for options at the first positional argument.
    pub fn disable_interspersed_args(&mut self) {
        self.allow_interspersed_args = false;
    }

    /// The values of the parse in progress.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// The values of the parse in progress, for callbacks to update.
    pub fn values_mut(&mut self) -> &mut Values {
        &mut self.values
    }

    /// The positional arguments collected so far by the parse in progress.
    pub fn largs_mut(&mut self) -> &mut Vec<String> {
        &mut self.largs
    }

    /// The tokens not yet scanned by the parse in progress.
    /// A callback may consume (or push back) tokens here.
    pub fn rargs_mut(&mut self) -> &mut VecDeque<String> {
        &mut self.rargs
    }

    /// The program name.
    pub fn prog(&self) -> &str {
        &self.prog
    }

    /// Parse the `tokens` without printing anything.
    ///
    /// ### Example
    /// ```
    /// # use optwise_core as optwise;
    /// use optwise::{OptionParser, Opt, ParseOutcome, Value};
    ///
    /// let mut parser = OptionParser::new("program")
    ///     .add(Opt::new(["-n"]).kind("int").default(1))
    ///     .build_parser()
    ///     .unwrap();
    ///
    /// match parser.consume(&["-n", "5", "rest"]).unwrap() {
    ///     ParseOutcome::Complete { values, args } => {
    ///         assert_eq!(values.get("n"), Some(&Value::Int(5)));
    ///         assert_eq!(args, vec!["rest".to_string()]);
    ///     }
    ///     _ => unreachable!(),
    /// }
    ///
    /// assert_eq!(parser.consume(&["--help"]).unwrap(), ParseOutcome::Help);
    /// ```
    pub fn consume(&mut self, tokens: &[&str]) -> Result<ParseOutcome, ParseError> {
        self.values = self.get_default_values()?;
        self.largs = Vec::default();
        self.rargs = tokens.iter().map(|token| token.to_string()).collect();

        let flow = self.process_args();
        let values = std::mem::take(&mut self.values);
        let mut args = std::mem::take(&mut self.largs);
        args.extend(self.rargs.drain(..));

        match flow? {
            Flow::Continue => Ok(ParseOutcome::Complete { values, args }),
            Flow::PrintHelp => Ok(ParseOutcome::Help),
            Flow::PrintVersion => Ok(ParseOutcome::Version),
        }
    }

    fn process_args(&mut self) -> Result<Flow, ParseError> {
        while let Some(token) = self.rargs.front() {
            let flow = match classify(token) {
                Token::Terminator => {
                    self.rargs.pop_front();
                    return Ok(Flow::Continue);
                }
                Token::Long => self.process_long()?,
                Token::Short => self.process_short()?,
                Token::Positional => {
                    if !self.allow_interspersed_args {
                        return Ok(Flow::Continue);
                    }

                    if let Some(token) = self.rargs.pop_front() {
                        self.largs.push(token);
                    }

                    Flow::Continue
                }
            };

            if flow != Flow::Continue {
                return Ok(flow);
            }
        }

        Ok(Flow::Continue)
    }

    fn process_long(&mut self) -> Result<Flow, ParseError> {
        let token = self.rargs.pop_front().unwrap_or_default();
        let (flag, explicit_value) = match token.split_once('=') {
            Some((flag, value)) => {
                self.rargs.push_front(value.to_string());
                (flag.to_string(), true)
            }
            None => (token, false),
        };
        let (opt_str, option) = self.index.match_long(&flag)?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Matched {flag} to {option:?}.");
        }

        let value = if option.takes_value() {
            Some(self.take_values(&option, &opt_str)?)
        } else if explicit_value {
            return Err(BadOptionError::UnexpectedValue(opt_str).into());
        } else {
            None
        };

        option.process(&opt_str, value, self)
    }

    fn process_short(&mut self) -> Result<Flow, ParseError> {
        let token = self.rargs.pop_front().unwrap_or_default();

        for (position, character) in token.char_indices().skip(1) {
            let opt_str = format!("-{character}");
            let option = match self.index.short(&opt_str) {
                Some(option) => option.clone(),
                None => return Err(BadOptionError::NoSuchOption(opt_str).into()),
            };

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Matched {opt_str} to {option:?}.");
            }

            let mut stop = false;
            let value = if option.takes_value() {
                // The rest of the cluster is the (first) value.
                let rest = &token[position + character.len_utf8()..];

                if !rest.is_empty() {
                    self.rargs.push_front(rest.to_string());
                    stop = true;
                }

                Some(self.take_values(&option, &opt_str)?)
            } else {
                None
            };

            let flow = option.process(&opt_str, value, self)?;

            if flow != Flow::Continue || stop {
                return Ok(flow);
            }
        }

        Ok(Flow::Continue)
    }

    fn take_values(&mut self, option: &Opt, opt_str: &str) -> Result<Value, ParseError> {
        let nargs = option.get_nargs();

        if self.rargs.len() < nargs {
            return Err(BadOptionError::MissingValue {
                flag: opt_str.to_string(),
                count: nargs,
            }
            .into());
        }

        let raws: Vec<String> = self.rargs.drain(..nargs).collect();
        Ok(option.convert_value(opt_str, &raws, &self.types)?)
    }

    /// Parse the `tokens`, returning the values and positional arguments.
    ///
    /// On help/version, prints the message and returns `Err(0)`.
    /// On a usage error, prints the usage line and the error to stderr and returns `Err(2)`.
    pub fn parse_tokens(&mut self, tokens: &[&str]) -> Result<(Values, Vec<String>), i32> {
        match self.consume(tokens) {
            Ok(ParseOutcome::Complete { values, args }) => Ok((values, args)),
            Ok(ParseOutcome::Help) => {
                self.print_help();
                Err(EXIT_SUCCESS)
            }
            Ok(ParseOutcome::Version) => {
                self.print_version();
                Err(EXIT_SUCCESS)
            }
            Err(error) => {
                self.print_error(&error);
                Err(EXIT_USAGE)
            }
        }
    }

    /// Parse the program's Cli arguments ([`std::env::args`]).
    /// Exits (via [`std::process::exit`]) on help/version (`0`) and usage errors (`2`).
    pub fn parse(&mut self) -> (Values, Vec<String>) {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(result) => result,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }
}
