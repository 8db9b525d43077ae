pub(crate) const HELP_SHORT: &str = "-h";
pub(crate) const HELP_LONG: &str = "--help";
pub(crate) const HELP_MESSAGE: &str = "show this help message and exit";
pub(crate) const VERSION_LONG: &str = "--version";
pub(crate) const VERSION_MESSAGE: &str = "show program's version number and exit";

pub(crate) const PROG_TAG: &str = "%prog";
pub(crate) const DEFAULT_USAGE: &str = "%prog [options]";
pub(crate) const DEFAULT_TAG: &str = "%default";
pub(crate) const NO_DEFAULT_VALUE: &str = "none";

pub(crate) const OPTIONS_HEADING: &str = "Options";
pub(crate) const USAGE_HEADING: &str = "Usage";
pub(crate) const USAGE_TEMPLATE: &str = "Usage: %s";
pub(crate) const ERROR_TEMPLATE: &str = "%s: error: %s";

// Used when the terminal width cannot be detected.
pub(crate) const FALLBACK_WIDTH: usize = 80;
// Keep a little room on the right edge of the terminal.
pub(crate) const WIDTH_MARGIN: usize = 2;

pub(crate) const EXIT_SUCCESS: i32 = 0;
pub(crate) const EXIT_USAGE: i32 = 2;
