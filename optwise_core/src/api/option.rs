use std::rc::Rc;

use crate::api::TypeRegistry;
use crate::model::{Action, Value};
use crate::parser::{ConfigError, Flow, OptionValueError, ParseError, Parser};

/// The function invoked by an [`Action::Callback`] option.
///
/// Receives the option, the flag as written on the Cli, the converted value (for options which take one) and the live parser.
/// Through the parser, the callback may read/write the in-progress [`Values`](./struct.Values.html), the remaining tokens, or register further options.
pub type Callback = Rc<dyn Fn(&Opt, &str, Option<&Value>, &mut Parser) -> Result<(), ParseError>>;

/// An option on the Cli, such as `-f FILE` or `--verbose`.
///
/// Configure an option with its builder methods, then register it on an [`OptionParser`](./struct.OptionParser.html) (or a [`Parser`]).
/// The attributes are validated upon registration: missing attributes are derived (ex: `dest` from the first long flag) and inconsistent ones are rejected with a [`ConfigError`].
///
/// ### Example
/// ```
/// # use optwise_core as optwise;
/// use optwise::{Action, OptionParser, Opt, Value};
///
/// let mut parser = OptionParser::new("program")
///     .add(Opt::new(["-f", "--file"]).help("read from FILE"))
///     .add(Opt::new(["-v"]).action(Action::Count).dest("verbosity"))
///     .build_parser()
///     .unwrap();
///
/// let (values, args) = parser.parse_tokens(&["-vv", "--file=data.txt", "rest"]).unwrap();
///
/// assert_eq!(values.get("file"), Some(&Value::from("data.txt")));
/// assert_eq!(values.get("verbosity"), Some(&Value::Int(2)));
/// assert_eq!(args, vec!["rest".to_string()]);
/// ```
#[derive(Clone)]
pub struct Opt {
    short_flags: Vec<String>,
    long_flags: Vec<String>,
    action: Action,
    kind: Option<String>,
    dest: Option<String>,
    nargs: Option<usize>,
    default: Option<Value>,
    constant: Option<Value>,
    choices: Option<Vec<String>>,
    callback: Option<Callback>,
    help: Option<String>,
    hidden: bool,
    metavar: Option<String>,
}

impl Opt {
    /// Create an option from its flags, any mix of short (`-f`) and long (`--file`) ones.
    /// The default action is [`Action::Store`].
    pub fn new<S: Into<String>>(flags: impl IntoIterator<Item = S>) -> Self {
        let mut short_flags = Vec::default();
        let mut long_flags = Vec::default();

        for flag in flags.into_iter().map(Into::into) {
            if flag.starts_with("--") {
                long_flags.push(flag);
            } else {
                short_flags.push(flag);
            }
        }

        Self {
            short_flags,
            long_flags,
            action: Action::Store,
            kind: None,
            dest: None,
            nargs: None,
            default: None,
            constant: None,
            choices: None,
            callback: None,
            help: None,
            hidden: false,
            metavar: None,
        }
    }

    /// Set the action taken when the option is matched.
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set the type tag used to convert the option's values (ex: `int`).
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind.replace(kind.into());
        self
    }

    /// Set the destination key in [`Values`](./struct.Values.html).
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest.replace(dest.into());
        self
    }

    /// Set the number of values the option consumes.
    pub fn nargs(mut self, nargs: usize) -> Self {
        self.nargs.replace(nargs);
        self
    }

    /// Set the default value of the option's destination.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default.replace(value.into());
        self
    }

    /// Set the constant used by [`Action::StoreConst`] and [`Action::AppendConst`].
    pub fn constant(mut self, value: impl Into<Value>) -> Self {
        self.constant.replace(value.into());
        self
    }

    /// Restrict the option's values; implies the `choice` type.
    pub fn choices<S: Into<String>>(mut self, choices: impl IntoIterator<Item = S>) -> Self {
        self.choices
            .replace(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Set the callback; implies [`Action::Callback`].
    pub fn callback(
        mut self,
        callback: impl Fn(&Opt, &str, Option<&Value>, &mut Parser) -> Result<(), ParseError> + 'static,
    ) -> Self {
        self.action = Action::Callback;
        self.callback.replace(Rc::new(callback));
        self
    }

    /// Document the option in the help message.
    /// The text `%default` is replaced by the option's default value.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help.replace(help.into());
        self
    }

    /// Leave the option out of the help message.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the name of the value placeholder in the help message.
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar.replace(metavar.into());
        self
    }

    /// The short flags, such as `-f`.
    pub fn short_flags(&self) -> &[String] {
        &self.short_flags
    }

    /// The long flags, such as `--file`.
    pub fn long_flags(&self) -> &[String] {
        &self.long_flags
    }

    pub(crate) fn flags(&self) -> impl Iterator<Item = &String> {
        self.short_flags.iter().chain(self.long_flags.iter())
    }

    /// The action taken when the option is matched.
    pub fn get_action(&self) -> Action {
        self.action
    }

    /// The type tag, for options which take values.
    pub fn get_kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// The destination key.
    pub fn get_dest(&self) -> Option<&str> {
        self.dest.as_deref()
    }

    /// The number of values consumed (0 for options which take none).
    pub fn get_nargs(&self) -> usize {
        self.nargs.unwrap_or(0)
    }

    /// The default value declared on the option.
    pub fn get_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The allowed values of a `choice` option.
    pub fn get_choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// The help text, even for hidden options.
    pub fn get_help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Whether the option is left out of the help message.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The value placeholder name, if set explicitly.
    pub fn get_metavar(&self) -> Option<&str> {
        self.metavar.as_deref()
    }

    /// Whether the option consumes values from the Cli.
    pub fn takes_value(&self) -> bool {
        self.get_nargs() > 0
    }

    /// The flag which best represents the option: the first long flag, else the first short flag.
    pub fn opt_string(&self) -> &str {
        self.long_flags
            .first()
            .or_else(|| self.short_flags.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Convert a single raw token for this option.
    pub fn check_value(
        &self,
        opt_str: &str,
        raw: &str,
        types: &TypeRegistry,
    ) -> Result<Value, OptionValueError> {
        types.check(self, opt_str, raw)
    }

    /// Convert the raw tokens consumed by this option: a scalar when the option takes one value, a list otherwise.
    pub(crate) fn convert_value(
        &self,
        opt_str: &str,
        raws: &[String],
        types: &TypeRegistry,
    ) -> Result<Value, OptionValueError> {
        match raws {
            [raw] if self.get_nargs() == 1 => self.check_value(opt_str, raw, types),
            _ => Ok(Value::List(
                raws.iter()
                    .map(|raw| self.check_value(opt_str, raw, types))
                    .collect::<Result<Vec<Value>, OptionValueError>>()?,
            )),
        }
    }

    /// Take the option's action for a match of `opt_str` on the Cli.
    pub(crate) fn process(
        &self,
        opt_str: &str,
        value: Option<Value>,
        parser: &mut Parser,
    ) -> Result<Flow, ParseError> {
        let dest = self.dest.as_deref().unwrap_or_default();

        match self.action {
            Action::Store => match value {
                Some(value) => parser.values_mut().set(dest, value),
                None => parser.values_mut().set_null(dest),
            },
            Action::StoreConst => {
                if let Some(constant) = &self.constant {
                    parser.values_mut().set(dest, constant.clone());
                }
            }
            Action::StoreTrue => parser.values_mut().set(dest, true),
            Action::StoreFalse => parser.values_mut().set(dest, false),
            Action::Append => {
                if let Some(value) = value {
                    parser.values_mut().append(dest, value);
                }
            }
            Action::AppendConst => {
                if let Some(constant) = &self.constant {
                    parser.values_mut().append(dest, constant.clone());
                }
            }
            Action::Count => parser.values_mut().increment(dest),
            Action::Callback => {
                if let Some(callback) = &self.callback {
                    callback(self, opt_str, value.as_ref(), parser)?;
                }
            }
            Action::Help => return Ok(Flow::PrintHelp),
            Action::Version => return Ok(Flow::PrintVersion),
        }

        Ok(Flow::Continue)
    }

    /// Validate the option, filling in the derived attributes.
    pub(crate) fn check(mut self, types: &TypeRegistry) -> Result<Self, ConfigError> {
        self.check_flags()?;
        self.check_type(types)?;
        self.check_choices()?;
        self.check_dest();
        self.check_constant()?;
        self.check_nargs()?;
        self.check_callback()?;
        Ok(self)
    }

    fn invalid(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::InvalidAttribute {
            option: self.to_string(),
            message: message.into(),
        }
    }

    fn check_flags(&self) -> Result<(), ConfigError> {
        if self.short_flags.is_empty() && self.long_flags.is_empty() {
            return Err(ConfigError::MissingFlags);
        }

        for flag in &self.short_flags {
            let mut chars = flag.chars();
            let well_formed = chars.next() == Some('-')
                && matches!(chars.next(), Some(c) if c != '-')
                && chars.next().is_none();

            if !well_formed {
                return Err(ConfigError::InvalidFlag {
                    flag: flag.clone(),
                    reason: "must be of the form -x, (x any non-dash char)",
                });
            }
        }

        for flag in &self.long_flags {
            if flag.len() < 3 || flag[2..].starts_with('-') || flag.contains('=') {
                return Err(ConfigError::InvalidFlag {
                    flag: flag.clone(),
                    reason: "must be of the form --name, (name not starting with '-', without '=')",
                });
            }
        }

        Ok(())
    }

    fn check_type(&mut self, types: &TypeRegistry) -> Result<(), ConfigError> {
        if self.kind.is_none() {
            let implied = self.action.always_typed()
                || (self.action == Action::Callback && self.nargs.is_some_and(|n| n > 0));

            if implied {
                let kind = if self.choices.is_some() {
                    "choice"
                } else {
                    "string"
                };
                self.kind.replace(kind.to_string());
            }
        }

        if let Some(kind) = &self.kind {
            if !types.contains(kind) {
                return Err(ConfigError::UnknownType {
                    option: self.to_string(),
                    kind: kind.clone(),
                });
            }

            if !self.action.typed() {
                return Err(self.invalid(format!(
                    "must not supply a type for action '{}'",
                    self.action
                )));
            }
        }

        Ok(())
    }

    fn check_choices(&self) -> Result<(), ConfigError> {
        match (self.kind.as_deref(), &self.choices) {
            (Some("choice"), None) => Err(self.invalid("must supply a list of choices for type 'choice'")),
            (Some("choice"), Some(choices)) if choices.is_empty() => {
                Err(self.invalid("must supply a list of choices for type 'choice'"))
            }
            (Some("choice"), Some(_)) | (_, None) => Ok(()),
            (kind, Some(_)) => Err(self.invalid(format!(
                "must not supply choices for type '{}'",
                kind.unwrap_or("none")
            ))),
        }
    }

    fn check_dest(&mut self) {
        let takes_value = self.action.stores() || self.kind.is_some();

        if self.dest.is_none() && takes_value {
            // Ex: '--dry-run' -> 'dry_run', '-f' -> 'f'.
            let derived = match (self.long_flags.first(), self.short_flags.first()) {
                (Some(long), _) => Some(long[2..].replace('-', "_")),
                (None, Some(short)) => Some(short[1..].to_string()),
                (None, None) => None,
            };
            self.dest = derived;
        }
    }

    fn check_constant(&self) -> Result<(), ConfigError> {
        match (self.action.uses_constant(), &self.constant) {
            (true, None) => Err(self.invalid(format!(
                "must supply a constant for action '{}'",
                self.action
            ))),
            (false, Some(_)) => Err(self.invalid(format!(
                "'const' must not be supplied for action '{}'",
                self.action
            ))),
            _ => Ok(()),
        }
    }

    fn check_nargs(&mut self) -> Result<(), ConfigError> {
        match (self.kind.is_some(), self.nargs) {
            (true, None) => {
                self.nargs.replace(1);
                Ok(())
            }
            (true, Some(0)) => Err(self.invalid("'nargs' must be at least 1 for a typed option")),
            (true, Some(_)) => Ok(()),
            (false, None) => {
                self.nargs.replace(0);
                Ok(())
            }
            (false, Some(0)) => Ok(()),
            (false, Some(_)) => Err(self.invalid(format!(
                "'nargs' must not be supplied for action '{}'",
                self.action
            ))),
        }
    }

    fn check_callback(&self) -> Result<(), ConfigError> {
        match (self.action, &self.callback) {
            (Action::Callback, None) => {
                Err(self.invalid("must supply a callback for action 'callback'"))
            }
            (Action::Callback, Some(_)) | (_, None) => Ok(()),
            (action, Some(_)) => Err(self.invalid(format!(
                "must not supply a callback for action '{action}'"
            ))),
        }
    }
}

impl std::fmt::Display for Opt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags: Vec<&str> = self.flags().map(String::as_str).collect();
        write!(f, "{}", flags.join("/"))
    }
}

impl std::fmt::Debug for Opt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            Some(k) => format!(", {k}"),
            None => "".to_string(),
        };
        let dest = match &self.dest {
            Some(d) => format!(", dest={d}"),
            None => "".to_string(),
        };
        let help = match &self.help {
            Some(h) => format!(", {h}"),
            None => "".to_string(),
        };

        write!(f, "Opt[{self}, {action}{kind}{dest}{help}]", action = self.action)
    }
}
