use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::api::Opt;
use crate::parser::{BadOptionError, ConfigError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// How the scanner treats a Cli token.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token {
    /// `--`: everything after is positional.
    Terminator,
    /// `--name` or `--name=value`.
    Long,
    /// `-x`, or a cluster such as `-xvf` / `-fFILE`.
    Short,
    /// Anything else, including a lone `-`.
    Positional,
}

pub(crate) fn classify(token: &str) -> Token {
    if token == "--" {
        Token::Terminator
    } else if token.starts_with("--") {
        Token::Long
    } else if token.starts_with('-') && token.len() > 1 {
        Token::Short
    } else {
        Token::Positional
    }
}

/// Resolves flags to their registered option.
#[derive(Debug, Default)]
pub(crate) struct FlagIndex {
    short: HashMap<String, Rc<Opt>>,
    long: HashMap<String, Rc<Opt>>,
}

impl FlagIndex {
    /// Register every flag of `option`; nothing is registered when any flag is taken (or repeated by the option itself).
    pub(crate) fn insert(&mut self, option: &Rc<Opt>) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for flag in option.flags() {
            if self.get(flag).is_some() || !seen.insert(flag) {
                return Err(ConfigError::DuplicateFlag { flag: flag.clone() });
            }
        }

        for flag in option.short_flags() {
            self.short.insert(flag.clone(), option.clone());
        }

        for flag in option.long_flags() {
            self.long.insert(flag.clone(), option.clone());
        }

        Ok(())
    }

    /// Unregister every flag of the option which owns `flag`, returning that option.
    pub(crate) fn remove(&mut self, flag: &str) -> Option<Rc<Opt>> {
        let option = self.get(flag)?.clone();

        for flag in option.short_flags() {
            self.short.remove(flag);
        }

        for flag in option.long_flags() {
            self.long.remove(flag);
        }

        Some(option)
    }

    pub(crate) fn get(&self, flag: &str) -> Option<&Rc<Opt>> {
        self.short.get(flag).or_else(|| self.long.get(flag))
    }

    pub(crate) fn short(&self, flag: &str) -> Option<&Rc<Opt>> {
        self.short.get(flag)
    }

    /// Resolve a long flag as written on the Cli: an exact match, else the only long flag it abbreviates.
    pub(crate) fn match_long(&self, flag: &str) -> Result<(String, Rc<Opt>), BadOptionError> {
        if let Some(option) = self.long.get(flag) {
            return Ok((flag.to_string(), option.clone()));
        }

        let mut candidates: Vec<&String> = self
            .long
            .keys()
            .filter(|long| long.starts_with(flag))
            .collect();
        candidates.sort();

        match candidates.as_slice() {
            [] => Err(BadOptionError::NoSuchOption(flag.to_string())),
            [only] => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Abbreviation {flag} resolved to {only}.");
                }

                Ok(((*only).clone(), self.long[*only].clone()))
            }
            _ => Err(BadOptionError::Ambiguous {
                flag: flag.to_string(),
                candidates: candidates.into_iter().cloned().collect(),
            }),
        }
    }
}
