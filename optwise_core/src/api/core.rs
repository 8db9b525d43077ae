use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::api::{Opt, OptionGroup, TypeRegistry, Values};
use crate::constant::*;
use crate::matcher::FlagIndex;
use crate::model::{Action, Value};
use crate::parser::{
    ConfigError, ConsoleInterface, HelpFormatter, OptionValueError, Parser, UserInterface,
};
use crate::prelude::{Translator, Untranslated};

/// The option parser builder.
///
/// ### Example
/// ```
/// # use optwise_core as optwise;
/// use optwise::{OptionParser};
///
/// let mut parser = OptionParser::new("program")
///     // Configure with OptionParser::add and OptionParser::group.
///     .build();
/// parser.parse_tokens(empty::slice()).unwrap();
/// ```
pub struct OptionParser {
    prog: String,
    usage: Option<String>,
    description: Option<String>,
    epilog: Option<String>,
    version: Option<String>,
    add_help_option: bool,
    allow_interspersed_args: bool,
    formatter: Option<HelpFormatter>,
    translator: Rc<dyn Translator>,
    types: TypeRegistry,
    options: Vec<Opt>,
    groups: Vec<OptionGroup>,
    defaults: Vec<(String, Value)>,
}

impl OptionParser {
    /// Create an option parser builder for the program `prog`.
    ///
    /// ### Example
    /// ```
    /// # use optwise_core as optwise;
    /// use optwise::OptionParser;
    ///
    /// let parser = OptionParser::new("program")
    ///     .build();
    ///
    /// assert_eq!(parser.get_usage(), "Usage: program [options]\n");
    /// ```
    pub fn new(prog: impl Into<String>) -> Self {
        Self {
            prog: prog.into(),
            usage: Some(DEFAULT_USAGE.to_string()),
            description: None,
            epilog: None,
            version: None,
            add_help_option: true,
            allow_interspersed_args: true,
            formatter: None,
            translator: Rc::new(Untranslated),
            types: TypeRegistry::default(),
            options: Vec::default(),
            groups: Vec::default(),
            defaults: Vec::default(),
        }
    }

    /// Set the usage text; `%prog` is replaced by the program name.
    /// Defaults to `%prog [options]`.
    ///
    /// ### Example
    /// ```
    /// # use optwise_core as optwise;
    /// use optwise::OptionParser;
    ///
    /// let parser = OptionParser::new("program")
    ///     .usage("%prog [options] FILE...")
    ///     .build();
    ///
    /// assert_eq!(parser.get_usage(), "Usage: program [options] FILE...\n");
    /// ```
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage.replace(usage.into());
        self
    }

    /// Leave the usage out of the help and error messages.
    pub fn suppress_usage(mut self) -> Self {
        self.usage = None;
        self
    }

    /// Document the program in full sentence/paragraph format; shown after the usage.
    /// `%prog` is replaced by the program name.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Text shown after the options in the help message.
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog.replace(epilog.into());
        self
    }

    /// Set the version text (`%prog` is replaced by the program name), and add a `--version` option which prints it.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version.replace(version.into());
        self
    }

    /// Whether to add the `-h, --help` option (the default).
    pub fn add_help_option(mut self, add_help_option: bool) -> Self {
        self.add_help_option = add_help_option;
        self
    }

    /// Whether options may follow positional arguments (the default).
    /// When not, the first positional argument ends the options.
    pub fn interspersed(mut self, allow_interspersed_args: bool) -> Self {
        self.allow_interspersed_args = allow_interspersed_args;
        self
    }

    /// Use `formatter` for the help message, rather than [`HelpFormatter::indented`].
    pub fn formatter(mut self, formatter: HelpFormatter) -> Self {
        self.formatter.replace(formatter);
        self
    }

    /// Localize the user facing messages through `translator`.
    pub fn translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Rc::new(translator);
        self
    }

    /// Register (or replace) a type tag, for use with [`Opt::kind`].
    ///
    /// ### Example
    /// ```
    /// # use optwise_core as optwise;
    /// use optwise::{OptionParser, Opt, OptionValueError, Value};
    ///
    /// let mut parser = OptionParser::new("program")
    ///     .register_type("even", |_, opt_str, raw| match raw.parse::<i64>() {
    ///         Ok(number) if number % 2 == 0 => Ok(Value::Int(number)),
    ///         _ => Err(OptionValueError::new(format!("option {opt_str}: not even: '{raw}'"))),
    ///     })
    ///     .add(Opt::new(["-n"]).kind("even"))
    ///     .build_parser()
    ///     .unwrap();
    ///
    /// let (values, _) = parser.parse_tokens(&["-n", "4"]).unwrap();
    /// assert_eq!(values.get("n"), Some(&Value::Int(4)));
    /// ```
    pub fn register_type(
        mut self,
        tag: impl Into<String>,
        checker: impl Fn(&Opt, &str, &str) -> Result<Value, OptionValueError> + 'static,
    ) -> Self {
        self.types.register(tag, checker);
        self
    }

    /// Set the default value of `dest`, overriding the option's own default.
    pub fn default(mut self, dest: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.push((dest.into(), value.into()));
        self
    }

    /// Add an option at the top level of the parser.
    ///
    /// The order of options is the order of the help message; it does not affect the parsing.
    pub fn add(mut self, option: Opt) -> Self {
        self.options.push(option);
        self
    }

    /// Add an option group, shown after the top level options.
    pub fn group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<Parser, ConfigError> {
        let OptionParser {
            prog,
            usage,
            description,
            epilog,
            version,
            add_help_option,
            allow_interspersed_args,
            formatter,
            translator,
            types,
            options,
            groups,
            defaults,
        } = self;
        let mut formatter = formatter.unwrap_or_default();
        formatter.set_translator(translator.clone());
        let has_version = version.is_some();

        let mut parser = Parser {
            prog,
            usage,
            description,
            epilog,
            version,
            option_list: Vec::default(),
            option_groups: Vec::default(),
            index: FlagIndex::default(),
            defaults: HashMap::default(),
            allow_interspersed_args,
            types,
            translator: translator.clone(),
            formatter,
            user_interface,
            values: Values::default(),
            largs: Vec::default(),
            rargs: VecDeque::default(),
        };

        if has_version {
            parser.add_option(
                Opt::new([VERSION_LONG])
                    .action(Action::Version)
                    .help(translator.gettext(VERSION_MESSAGE)),
            )?;
        }

        if add_help_option {
            parser.add_option(
                Opt::new([HELP_SHORT, HELP_LONG])
                    .action(Action::Help)
                    .help(translator.gettext(HELP_MESSAGE)),
            )?;
        }

        for option in options {
            parser.add_option(option)?;
        }

        for group in groups {
            parser.add_option_group(group)?;
        }

        for (dest, value) in defaults {
            parser.set_default(dest, value);
        }

        Ok(parser)
    }

    /// Build the option parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated flag).
    pub fn build_parser(self) -> Result<Parser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the option parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated flag).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> Parser {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::channel_interface;
    use crate::parser::{ParseError, ParseOutcome};
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::path::Path;

    const FILE_HELP: &str = "read from FILE [default: %default]";
    const HELP_PREFIX: &str = "Usage: test [options]\n\nOptions:\n  -h, --help            show this help message and exit\n";

    fn expand_defaults() -> OptionParser {
        OptionParser::new("test").formatter(HelpFormatter::indented().width(78))
    }

    #[test]
    fn empty() {
        // Setup
        let (sender, receiver) = channel_interface();
        let mut parser = OptionParser::new("program")
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let (values, args) = parser.parse_tokens(empty::slice()).unwrap();

        // Verify
        assert!(values.is_empty());
        assert!(args.is_empty());
        assert_eq!(receiver.consume(), (None, None));
    }

    #[test]
    fn option_default() {
        let mut parser = expand_defaults()
            .add(Opt::new(["-f", "--file"]).default("foo.txt").help(FILE_HELP))
            .build_parser()
            .unwrap();

        assert_eq!(
            parser.format_help(),
            format!("{HELP_PREFIX}  -f FILE, --file=FILE  read from FILE [default: foo.txt]\n")
        );
    }

    #[test]
    fn parser_default() {
        let mut parser = expand_defaults()
            .add(Opt::new(["-f", "--file"]).help(FILE_HELP))
            .default("file", "foo.txt")
            .build_parser()
            .unwrap();

        assert_eq!(
            parser.format_help(),
            format!("{HELP_PREFIX}  -f FILE, --file=FILE  read from FILE [default: foo.txt]\n")
        );
    }

    #[test]
    fn no_default() {
        let mut parser = expand_defaults()
            .add(Opt::new(["-f", "--file"]).default("foo.txt").help(FILE_HELP))
            .build_parser()
            .unwrap();
        parser.clear_default("file");

        assert_eq!(
            parser.format_help(),
            format!("{HELP_PREFIX}  -f FILE, --file=FILE  read from FILE [default: none]\n")
        );
    }

    #[test]
    fn float_default() {
        let mut parser = expand_defaults()
            .add(Opt::new(["-p", "--prob"]).help("blow up with probability PROB [default: %default]"))
            .default("prob", 0.43)
            .build_parser()
            .unwrap();

        assert_eq!(
            parser.format_help(),
            format!("{HELP_PREFIX}  -p PROB, --prob=PROB  blow up with probability PROB [default: 0.43]\n")
        );
    }

    #[test]
    fn callback_help() {
        // Setup
        let mut parser = OptionParser::new("test")
            .suppress_usage()
            .formatter(HelpFormatter::indented().width(78))
            .build_parser()
            .unwrap();
        parser.remove_option("-h");
        parser
            .add_option(
                Opt::new(["-t", "--test"])
                    .callback(|_, _, _, _| Ok(()))
                    .kind("string")
                    .help("foo"),
            )
            .unwrap();

        // Execute
        let help = parser.format_help();

        // Verify
        assert_eq!(help, "Options:\n  -t TEST, --test=TEST  foo\n");
    }

    #[test]
    fn nothing_to_show() {
        let mut parser = OptionParser::new("test")
            .add_help_option(false)
            .formatter(HelpFormatter::indented().width(78))
            .build_parser()
            .unwrap();

        assert_eq!(parser.format_option_help(), "");
        assert_eq!(parser.format_help(), "Usage: test [options]\n\n");
    }

    #[test]
    fn full_layout() {
        // Setup
        let mut parser = OptionParser::new("prog")
            .usage("%prog [options] FILE")
            .description("Process the FILE with care.")
            .epilog("See the manual for more.")
            .formatter(HelpFormatter::indented().width(60))
            .add(Opt::new(["-v", "--verbose"]).action(Action::StoreTrue).help("talk more"))
            .add(Opt::new(["--secret"]).action(Action::StoreTrue).help("never shown").hide())
            .group(
                OptionGroup::new("Debug Options")
                    .description("Use these at your own risk.")
                    .option(Opt::new(["-d", "--debug-level"]).kind("int").help("set the debug level")),
            )
            .build_parser()
            .unwrap();

        // Execute
        let help = parser.format_help();

        // Verify
        let help_indent = " ".repeat(24);
        assert_eq!(
            help,
            format!(
                "Usage: prog [options] FILE\n\
                 \n\
                 Process the FILE with care.\n\
                 \n\
                 Options:\n  \
                 -h, --help            show this help message and exit\n  \
                 -v, --verbose         talk more\n\
                 \n  \
                 Debug Options:\n    \
                 Use these at your own risk.\n\
                 \n    \
                 -d DEBUG_LEVEL, --debug-level=DEBUG_LEVEL\n\
                 {help_indent}set the debug level\n\
                 \n\
                 See the manual for more.\n"
            )
        );
    }

    #[test]
    fn titled_layout() {
        let mut parser = OptionParser::new("prog")
            .formatter(HelpFormatter::titled().width(60))
            .add(Opt::new(["-f", "--file"]).help("read from FILE"))
            .group(OptionGroup::new("Extra").option(Opt::new(["-q"]).action(Action::StoreTrue).help("be quiet")))
            .build_parser()
            .unwrap();

        assert_eq!(
            parser.format_help(),
            "Usage\n=====\n  prog [options]\n\
             \n\
             Options\n=======\n\
             --help, -h            show this help message and exit\n\
             --file=FILE, -f FILE  read from FILE\n\
             \n\
             Extra\n-----\n\
             -q                    be quiet\n"
        );
    }

    #[test]
    fn version_option() {
        let mut parser = OptionParser::new("prog")
            .version("%prog 2.0")
            .formatter(HelpFormatter::indented().width(78))
            .build_parser()
            .unwrap();

        assert_eq!(parser.get_version(), "prog 2.0");
        assert_eq!(parser.consume(&["--version"]).unwrap(), ParseOutcome::Version);
        assert_contains!(
            parser.format_help(),
            "  --version   show program's version number and exit\n  -h, --help  show this help message and exit\n"
        );
    }

    #[test]
    fn prog_expansion() {
        let parser = OptionParser::new("tool")
            .usage("%prog [-v] FILE")
            .description("%prog reads FILE.")
            .build_parser()
            .unwrap();

        assert_eq!(parser.get_usage(), "Usage: tool [-v] FILE\n");
        assert_eq!(parser.get_description(), "tool reads FILE.");
        assert_eq!(parser.get_version(), "");
    }

    #[rstest]
    #[case(
        OptionParser::new("p").add(Opt::new(["-a"])).add(Opt::new(["-a", "--alpha"])),
        ConfigError::DuplicateFlag { flag: "-a".to_string() }
    )]
    #[case(
        OptionParser::new("p").add(Opt::new(["-h"])),
        ConfigError::DuplicateFlag { flag: "-h".to_string() }
    )]
    #[case(
        OptionParser::new("p")
            .add(Opt::new(["--alpha"]))
            .group(OptionGroup::new("Group").option(Opt::new(["--alpha"]))),
        ConfigError::DuplicateFlag { flag: "--alpha".to_string() }
    )]
    #[case(
        OptionParser::new("p").add(Opt::new(["-f"]).kind("file")),
        ConfigError::UnknownType { option: "-f".to_string(), kind: "file".to_string() }
    )]
    #[case(
        OptionParser::new("p").add(Opt::new(["file"])),
        ConfigError::InvalidFlag {
            flag: "file".to_string(),
            reason: "must be of the form -x, (x any non-dash char)",
        }
    )]
    fn build_errors(#[case] builder: OptionParser, #[case] expected: ConfigError) {
        match builder.build_parser() {
            Ok(_) => panic!("expected {expected}"),
            Err(error) => assert_eq!(error, expected),
        }
    }

    #[test]
    fn help_option_disabled() {
        let mut parser = OptionParser::new("p")
            .add_help_option(false)
            .add(Opt::new(["-h", "--host"]))
            .build_parser()
            .unwrap();

        let (values, _) = parser.parse_tokens(&["-h", "example.org"]).unwrap();
        assert_eq!(values.get("host"), Some(&Value::from("example.org")));
    }

    fn check_file(_option: &Opt, _opt_str: &str, raw: &str) -> Result<Value, OptionValueError> {
        let path = Path::new(raw);

        if !path.exists() {
            Err(OptionValueError::new(format!("{raw}: file does not exist")))
        } else if !path.is_file() {
            Err(OptionValueError::new(format!("{raw}: not a regular file")))
        } else {
            Ok(Value::from(raw))
        }
    }

    #[test]
    fn custom_type() {
        // Setup
        let directory = std::env::temp_dir();
        let file = directory.join(format!("optwise-custom-type-{}", std::process::id()));
        std::fs::write(&file, "").unwrap();
        let missing = directory.join("optwise-custom-type-missing");
        let (sender, receiver) = channel_interface();
        let mut parser = OptionParser::new("p")
            .suppress_usage()
            .register_type("file", check_file)
            .add(Opt::new(["-a"]).kind("string").dest("a"))
            .add(Opt::new(["-f", "--file"]).kind("file").dest("file"))
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let file_str = file.to_string_lossy().to_string();
        let ok = parser.parse_tokens(&["--file", &file_str, "-afoo"]);
        let not_file = parser.parse_tokens(&["--file", &directory.to_string_lossy(), "-afoo"]);
        let not_file_error = receiver.consume_error();
        let missing_str = missing.to_string_lossy().to_string();
        let no_file = parser.parse_tokens(&["--file", &missing_str, "-afoo"]);
        std::fs::remove_file(&file).unwrap();

        // Verify
        let (values, args) = ok.unwrap();
        assert_eq!(values.get("file"), Some(&Value::from(file_str.as_str())));
        assert_eq!(values.get("a"), Some(&Value::from("foo")));
        assert!(args.is_empty());

        assert_eq!(not_file.unwrap_err(), 2);
        assert_contains!(not_file_error, "not a regular file");
        assert_eq!(no_file.unwrap_err(), 2);
        assert_eq!(
            receiver.consume_error(),
            format!("p: error: {missing_str}: file does not exist\n")
        );
    }

    struct Pirate;

    impl Translator for Pirate {
        fn gettext(&self, message: &str) -> String {
            match message {
                "Options" => "Yer Options".to_string(),
                "show this help message and exit" => "abandon ship".to_string(),
                "no such option: %s" => "what be %s".to_string(),
                "Usage: %s" => "Orders: %s".to_string(),
                "%s: error: %s" => "%s: blunder: %s".to_string(),
                _ => message.to_string(),
            }
        }
    }

    #[test]
    fn translator() {
        // Setup
        let (sender, receiver) = channel_interface();
        let mut parser = OptionParser::new("prog")
            .translator(Pirate)
            .formatter(HelpFormatter::indented().width(78))
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let help = parser.format_help();
        let exit_code = parser.parse_tokens(&["--x"]).unwrap_err();

        // Verify
        assert_eq!(help, "Orders: prog [options]\n\nYer Options:\n  -h, --help  abandon ship\n");
        assert_eq!(exit_code, 2);
        assert_eq!(
            receiver.consume_error(),
            "Orders: prog [options]\n\nprog: blunder: what be --x\n"
        );
    }

    #[test]
    fn callback_sees_live_values() {
        let mut parser = OptionParser::new("p")
            .add(Opt::new(["-x"]).callback(|option, opt_str, value, parser| {
                assert_eq!(option.short_flags(), &["-x".to_string()]);
                assert_eq!(opt_str, "-x");
                assert_eq!(value, None);
                assert_eq!(parser.values().to_string(), "filename: null");
                parser.values_mut().set("x", 42);
                Ok(())
            }))
            .add(
                Opt::new(["-f", "--file"])
                    .callback(|option, opt_str, value, parser| {
                        assert_eq!(opt_str, "--file");
                        assert_eq!(parser.values().to_string(), "filename: null, x: 42");
                        let dest = option.get_dest().unwrap_or_default().to_string();
                        match value {
                            Some(value) => parser.values_mut().set(dest, value.clone()),
                            None => return Err(ParseError::usage("no file")),
                        }
                        Ok(())
                    })
                    .kind("string")
                    .dest("filename"),
            )
            .build_parser()
            .unwrap();

        let (values, args) = parser.parse_tokens(&["-x", "--file=foo"]).unwrap();

        assert_eq!(values.to_string(), "filename: foo, x: 42");
        assert!(args.is_empty());
    }
}
