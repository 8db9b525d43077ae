use std::collections::HashMap;
use std::rc::Rc;
use terminal_size::{terminal_size, Width};

use crate::api::{Opt, OptionGroup};
use crate::constant::*;
use crate::model::{Emphasis, Value};
use crate::parser::base::{fill, ConfigError, ParseError};
use crate::parser::interface::wrap;
use crate::parser::Parser;
use crate::prelude::{Highlighter, Plain, Translator, Untranslated};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The presentation hooks of a [`HelpFormatter`]: how the usage line and section headings look.
pub trait HelpStyle {
    /// Render the (already `%prog` expanded) usage text.
    fn format_usage(&self, formatter: &HelpFormatter, usage: &str) -> String;

    /// Render a section heading, at the formatter's current indentation.
    fn format_heading(&self, formatter: &HelpFormatter, heading: &str) -> String;
}

/// `Usage: <usage>` and `Options:` style headings.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndentedStyle;

impl HelpStyle for IndentedStyle {
    fn format_usage(&self, formatter: &HelpFormatter, usage: &str) -> String {
        format!("{}\n", fill(&formatter.translate(USAGE_TEMPLATE), &[usage]))
    }

    fn format_heading(&self, formatter: &HelpFormatter, heading: &str) -> String {
        format!(
            "{:indent$}{}\n",
            "",
            formatter.highlight(&format!("{heading}:"), Emphasis::Heading),
            indent = formatter.current_indent(),
        )
    }
}

/// Underlined headings: `=` at the top level, `-` below.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitledStyle;

impl HelpStyle for TitledStyle {
    fn format_usage(&self, formatter: &HelpFormatter, usage: &str) -> String {
        let heading = self.format_heading(formatter, &formatter.translate(USAGE_HEADING));
        format!("{heading}  {usage}\n")
    }

    fn format_heading(&self, formatter: &HelpFormatter, heading: &str) -> String {
        let underline = if formatter.level() == 0 { "=" } else { "-" };
        format!(
            "{}\n{}\n",
            formatter.highlight(heading, Emphasis::Heading),
            underline.repeat(heading.chars().count()),
        )
    }
}

/// Lays out and renders the help message.
///
/// The option column is sized to the widest flag string (see [`HelpFormatter::store_option_strings`]), capped at the max help position.
/// Help text is word wrapped into the remaining width.
///
/// ### Example
/// ```
/// # use optwise_core as optwise;
/// use optwise::{HelpFormatter, OptionParser, Opt};
///
/// let mut formatter = HelpFormatter::indented().width(60);
/// formatter.set_long_delimiter(" ").unwrap();
///
/// let mut parser = OptionParser::new("program")
///     .add_help_option(false)
///     .suppress_usage()
///     .formatter(formatter)
///     .add(Opt::new(["-f", "--file"]).help("read from FILE"))
///     .build_parser()
///     .unwrap();
///
/// assert_eq!(
///     parser.format_help(),
///     "Options:\n  -f FILE, --file FILE  read from FILE\n"
/// );
/// ```
pub struct HelpFormatter {
    style: Box<dyn HelpStyle>,
    highlighter: Box<dyn Highlighter>,
    translator: Rc<dyn Translator>,
    indent_increment: usize,
    max_help_position: usize,
    width: usize,
    short_first: bool,
    current_indent: usize,
    level: usize,
    help_position: usize,
    help_width: usize,
    default_tag: Option<String>,
    option_strings: HashMap<String, String>,
    short_delimiter: &'static str,
    long_delimiter: &'static str,
}

impl Default for HelpFormatter {
    fn default() -> Self {
        Self::indented()
    }
}

impl HelpFormatter {
    /// The default formatter: 2 space indentation, help at column 24 at most, short flags first.
    pub fn indented() -> Self {
        Self::new(IndentedStyle, 2, 24, None, true)
    }

    /// Underlined headings without indentation, long flags first.
    pub fn titled() -> Self {
        Self::new(TitledStyle, 0, 24, None, false)
    }

    /// Create a formatter.
    /// Without a `width`, the terminal width (minus 2) is used.
    pub fn new(
        style: impl HelpStyle + 'static,
        indent_increment: usize,
        max_help_position: usize,
        width: Option<usize>,
        short_first: bool,
    ) -> Self {
        let width = width.unwrap_or_else(|| {
            let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
                terminal_width as usize
            } else {
                FALLBACK_WIDTH
            };
            terminal_width.saturating_sub(WIDTH_MARGIN)
        });

        Self {
            style: Box::new(style),
            highlighter: Box::new(Plain),
            translator: Rc::new(Untranslated),
            indent_increment,
            max_help_position,
            width,
            short_first,
            current_indent: 0,
            level: 0,
            help_position: max_help_position,
            help_width: width.saturating_sub(max_help_position),
            default_tag: Some(DEFAULT_TAG.to_string()),
            option_strings: HashMap::default(),
            short_delimiter: " ",
            long_delimiter: "=",
        }
    }

    /// Use an explicit total width.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self.help_width = width.saturating_sub(self.help_position);
        self
    }

    /// Set what goes between a short flag and its metavar: `" "` (`-f FILE`) or `""` (`-fFILE`).
    pub fn set_short_delimiter(&mut self, delimiter: &str) -> Result<(), ConfigError> {
        self.short_delimiter = match delimiter {
            " " => " ",
            "" => "",
            _ => {
                return Err(ConfigError::InvalidDelimiter {
                    kind: "short",
                    delimiter: delimiter.to_string(),
                })
            }
        };
        Ok(())
    }

    /// Set what goes between a long flag and its metavar: `"="` (`--file=FILE`) or `" "` (`--file FILE`).
    pub fn set_long_delimiter(&mut self, delimiter: &str) -> Result<(), ConfigError> {
        self.long_delimiter = match delimiter {
            "=" => "=",
            " " => " ",
            _ => {
                return Err(ConfigError::InvalidDelimiter {
                    kind: "long",
                    delimiter: delimiter.to_string(),
                })
            }
        };
        Ok(())
    }

    /// Set the text in option help replaced by the option's default; `None` disables the replacement.
    pub fn set_default_tag(&mut self, tag: Option<&str>) {
        self.default_tag = tag.map(str::to_string);
    }

    /// Decorate headings and flags with `highlighter`.
    pub fn set_highlighter(&mut self, highlighter: impl Highlighter + 'static) {
        self.highlighter = Box::new(highlighter);
    }

    pub(crate) fn set_translator(&mut self, translator: Rc<dyn Translator>) {
        self.translator = translator;
    }

    /// Increase the indentation by one level.
    pub fn indent(&mut self) {
        self.current_indent += self.indent_increment;
        self.level += 1;
    }

    /// Decrease the indentation by one level.
    ///
    /// Panics when already at the top level.
    pub fn dedent(&mut self) {
        assert!(self.level > 0, "internal error - indent decreased below 0");
        self.current_indent -= self.indent_increment;
        self.level -= 1;
    }

    /// The current indentation, in spaces.
    pub fn current_indent(&self) -> usize {
        self.current_indent
    }

    /// The current nesting level (0 at the top).
    pub fn level(&self) -> usize {
        self.level
    }

    /// The column at which option help starts.
    pub fn help_position(&self) -> usize {
        self.help_position
    }

    /// The width of the option help column.
    pub fn help_width(&self) -> usize {
        self.help_width
    }

    /// The total width.
    pub fn get_width(&self) -> usize {
        self.width
    }

    /// Translate a user facing message.
    pub fn translate(&self, message: &str) -> String {
        self.translator.gettext(message)
    }

    /// Decorate `text` through the formatter's highlighter.
    pub fn highlight(&self, text: &str, emphasis: Emphasis) -> String {
        self.highlighter.highlight(text, emphasis)
    }

    /// Render the usage text (see [`HelpStyle::format_usage`]).
    pub fn format_usage(&self, usage: &str) -> String {
        self.style.format_usage(self, usage)
    }

    /// Render a heading (see [`HelpStyle::format_heading`]).
    pub fn format_heading(&self, heading: &str) -> String {
        self.style.format_heading(self, heading)
    }

    /// Word wrap free text at the current indentation; `""` for empty text.
    pub fn format_description(&self, description: &str) -> String {
        if description.is_empty() {
            String::default()
        } else {
            format!("{}\n", self.format_text(description))
        }
    }

    /// As [`HelpFormatter::format_description`], preceded by a blank line.
    pub fn format_epilog(&self, epilog: &str) -> String {
        if epilog.is_empty() {
            String::default()
        } else {
            format!("\n{}\n", self.format_text(epilog))
        }
    }

    fn format_text(&self, text: &str) -> String {
        let text_width = self.width.saturating_sub(self.current_indent);
        let indent = " ".repeat(self.current_indent);
        wrap(text, text_width)
            .into_iter()
            .map(|line| format!("{indent}{line}"))
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// The option's help, with the default tag replaced by the `dest` entry of `defaults`.
    /// Unset and null defaults read as `none`.
    pub fn expand_default(
        &self,
        option: &Opt,
        defaults: Option<&HashMap<String, Option<Value>>>,
    ) -> String {
        let help = option.get_help().unwrap_or_default();

        match (defaults, self.default_tag.as_deref()) {
            (Some(defaults), Some(tag)) if !tag.is_empty() => {
                let default_value = option
                    .get_dest()
                    .and_then(|dest| defaults.get(dest))
                    .and_then(Option::as_ref)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| NO_DEFAULT_VALUE.to_string());
                help.replace(tag, &default_value)
            }
            _ => help.to_string(),
        }
    }

    /// Render one option: its flag string and (wrapped) help.
    pub fn format_option(
        &self,
        option: &Opt,
        defaults: Option<&HashMap<String, Option<Value>>>,
    ) -> String {
        let flags = match self.option_strings.get(&option.to_string()) {
            Some(flags) => flags.clone(),
            None => self.format_option_strings(option),
        };
        let flags_length = flags.chars().count();
        let opt_width = self
            .help_position
            .saturating_sub(self.current_indent + 2);
        let highlighted = self.highlight(&flags, Emphasis::Flags);

        let (mut result, indent_first) = if flags_length > opt_width {
            (
                format!("{:indent$}{highlighted}\n", "", indent = self.current_indent),
                self.help_position,
            )
        } else {
            // Help starts on the same line as the flags.
            (
                format!(
                    "{:indent$}{highlighted}{:padding$}  ",
                    "",
                    "",
                    indent = self.current_indent,
                    padding = opt_width - flags_length,
                ),
                0,
            )
        };

        match option.get_help() {
            Some(help) if !help.is_empty() => {
                let help_text = self.expand_default(option, defaults);
                let mut lines = wrap(&help_text, self.help_width).into_iter();

                if let Some(first) = lines.next() {
                    result.push_str(&format!("{:indent_first$}{first}\n", ""));
                }

                for line in lines {
                    result.push_str(&format!(
                        "{:indent$}{line}\n",
                        "",
                        indent = self.help_position
                    ));
                }
            }
            _ => {
                if !result.ends_with('\n') {
                    result.push('\n');
                }
            }
        }

        result
    }

    /// Compute the layout: the flag string of every shown option, and from their widest the help position.
    /// Top level options are measured one level in, grouped options two.
    pub fn store_option_strings(&mut self, options: &[Rc<Opt>], groups: &[OptionGroup]) {
        self.option_strings.clear();
        self.indent();
        let mut max_length = 0;

        for option in options.iter().map(AsRef::as_ref) {
            max_length = std::cmp::max(max_length, self.store_option(option));
        }

        self.indent();

        for option in groups.iter().flat_map(OptionGroup::options) {
            max_length = std::cmp::max(max_length, self.store_option(option));
        }

        self.dedent();
        self.dedent();
        self.help_position = std::cmp::min(max_length + 2, self.max_help_position);
        self.help_width = self.width.saturating_sub(self.help_position);

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Widest option string {max_length}.  Selecting help position {}, help width {}.",
                self.help_position, self.help_width
            );
        }
    }

    fn store_option(&mut self, option: &Opt) -> usize {
        if option.is_hidden() {
            return 0;
        }

        let flags = self.format_option_strings(option);
        let length = flags.chars().count() + self.current_indent;
        self.option_strings.insert(option.to_string(), flags);
        length
    }

    /// Render the flags of an option, ex: `-f FILE, --file=FILE`.
    pub fn format_option_strings(&self, option: &Opt) -> String {
        let (short_flags, long_flags): (Vec<String>, Vec<String>) = if option.takes_value() {
            let metavar = match option.get_metavar() {
                Some(metavar) => metavar.to_string(),
                None => option
                    .get_dest()
                    .map(str::to_uppercase)
                    .unwrap_or_default(),
            };

            (
                option
                    .short_flags()
                    .iter()
                    .map(|flag| format!("{flag}{}{metavar}", self.short_delimiter))
                    .collect(),
                option
                    .long_flags()
                    .iter()
                    .map(|flag| format!("{flag}{}{metavar}", self.long_delimiter))
                    .collect(),
            )
        } else {
            (option.short_flags().to_vec(), option.long_flags().to_vec())
        };

        let flags = if self.short_first {
            [short_flags, long_flags].concat()
        } else {
            [long_flags, short_flags].concat()
        };

        flags.join(", ")
    }
}

fn format_options(
    formatter: &HelpFormatter,
    options: &[Rc<Opt>],
    defaults: &HashMap<String, Option<Value>>,
) -> String {
    options
        .iter()
        .filter(|option| !option.is_hidden())
        .map(|option| formatter.format_option(option, Some(defaults)))
        .collect()
}

fn format_group(
    formatter: &mut HelpFormatter,
    group: &OptionGroup,
    defaults: &HashMap<String, Option<Value>>,
) -> String {
    let mut result = formatter.format_heading(group.title());
    formatter.indent();
    let mut sections = Vec::default();

    if let Some(description) = group.get_description() {
        if !description.is_empty() {
            sections.push(formatter.format_description(description));
        }
    }

    if !group.option_list.is_empty() {
        sections.push(format_options(formatter, &group.option_list, defaults));
    }

    result.push_str(&sections.join("\n"));
    formatter.dedent();
    result
}

impl Parser {
    fn expand_prog_name(&self, text: &str) -> String {
        text.replace(PROG_TAG, &self.prog)
    }

    /// The rendered usage line; `""` when usage is suppressed.
    pub fn get_usage(&self) -> String {
        match &self.usage {
            Some(usage) => self.formatter.format_usage(&self.expand_prog_name(usage)),
            None => String::default(),
        }
    }

    /// The version text, with `%prog` expanded; `""` without a version.
    pub fn get_version(&self) -> String {
        match &self.version {
            Some(version) => self.expand_prog_name(version),
            None => String::default(),
        }
    }

    /// The description, with `%prog` expanded; `""` without a description.
    pub fn get_description(&self) -> String {
        match &self.description {
            Some(description) => self.expand_prog_name(description),
            None => String::default(),
        }
    }

    /// Render the option sections of the help message.
    pub fn format_option_help(&mut self) -> String {
        self.formatter
            .store_option_strings(&self.option_list, &self.option_groups);
        let formatter = &mut self.formatter;
        let mut parts = vec![formatter.format_heading(&self.translator.gettext(OPTIONS_HEADING))];
        formatter.indent();

        if !self.option_list.is_empty() {
            parts.push(format_options(formatter, &self.option_list, &self.defaults));
            parts.push("\n".to_string());
        }

        for group in &self.option_groups {
            parts.push(format_group(formatter, group, &self.defaults));
            parts.push("\n".to_string());
        }

        formatter.dedent();
        // Drop the last newline, or the heading when there is nothing under it.
        parts.pop();
        parts.concat()
    }

    /// Render the full help message: usage, description, options and epilog.
    pub fn format_help(&mut self) -> String {
        let mut result = String::default();

        if self.usage.is_some() {
            result.push_str(&self.get_usage());
            result.push('\n');
        }

        let description = self.get_description();

        if !description.is_empty() {
            result.push_str(&self.formatter.format_description(&description));
            result.push('\n');
        }

        result.push_str(&self.format_option_help());

        if let Some(epilog) = &self.epilog {
            result.push_str(&self.formatter.format_epilog(epilog));
        }

        result
    }

    /// Print the help message.
    pub fn print_help(&mut self) {
        let help = self.format_help();
        self.user_interface.print(help);
    }

    /// Print the usage line, if any.
    pub fn print_usage(&self) {
        if self.usage.is_some() {
            self.user_interface.print(self.get_usage());
        }
    }

    /// Print the version, if any.
    pub fn print_version(&self) {
        if self.version.is_some() {
            self.user_interface.print(format!("{}\n", self.get_version()));
        }
    }

    pub(crate) fn print_error(&self, error: &ParseError) {
        let mut message = String::default();

        if self.usage.is_some() {
            message.push_str(&self.get_usage());
            message.push('\n');
        }

        message.push_str(&fill(
            &self.translator.gettext(ERROR_TEMPLATE),
            &[&self.prog, &error.localize(self.translator.as_ref())],
        ));
        message.push('\n');
        self.user_interface.print_error(message);
    }
}
