use std::rc::Rc;

use crate::api::Opt;

/// A titled section of options in the help message.
///
/// Grouping only affects the help output: grouped options share the parser's flag namespace.
///
/// ### Example
/// ```
/// # use optwise_core as optwise;
/// use optwise::{Action, OptionGroup, OptionParser, Opt};
///
/// let parser = OptionParser::new("program")
///     .group(
///         OptionGroup::new("Debug Options")
///             .description("Caution: use these at your own risk.")
///             .option(Opt::new(["-d", "--debug"]).action(Action::StoreTrue)),
///     )
///     .build_parser()
///     .unwrap();
///
/// assert!(parser.has_option("--debug"));
/// assert!(parser.get_option_group("-d").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct OptionGroup {
    title: String,
    description: Option<String>,
    pending: Vec<Opt>,
    pub(crate) option_list: Vec<Rc<Opt>>,
}

impl OptionGroup {
    /// Create an empty option group.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            pending: Vec::default(),
            option_list: Vec::default(),
        }
    }

    /// Document the group; shown under its heading.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Add an option to the group.
    /// The option is validated when the group is registered on a parser.
    pub fn option(mut self, option: Opt) -> Self {
        self.pending.push(option);
        self
    }

    /// The group's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The group's description.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The registered options, in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &Opt> {
        self.option_list.iter().map(AsRef::as_ref)
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Opt> {
        std::mem::take(&mut self.pending)
    }
}
