//! Traits which, typically, may be imported without concern: `use optwise::prelude::*`.
use crate::model::Emphasis;

/// Behaviour to localize the user facing messages of the parser.
// Needs to be imported in order to implement a custom `Translator`.
pub trait Translator {
    /// Translate a message template.
    fn gettext(&self, message: &str) -> String;

    /// Translate a message template which has a plural form.
    fn ngettext(&self, singular: &str, plural: &str, count: usize) -> String {
        if count == 1 {
            self.gettext(singular)
        } else {
            self.gettext(plural)
        }
    }
}

/// The identity `Translator`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Untranslated;

impl Translator for Untranslated {
    fn gettext(&self, message: &str) -> String {
        message.to_string()
    }
}

/// Behaviour to decorate help text (ex: with terminal colours).
// Needs to be imported in order to implement a custom `Highlighter`.
pub trait Highlighter {
    /// Decorate `text`, which plays the role `emphasis` in the help output.
    fn highlight(&self, text: &str, emphasis: Emphasis) -> String;
}

/// The identity `Highlighter`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl Highlighter for Plain {
    fn highlight(&self, text: &str, _emphasis: Emphasis) -> String {
        text.to_string()
    }
}
