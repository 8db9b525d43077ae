use std::collections::HashMap;

use crate::model::Value;

/// The parsed option values, keyed by option destination.
///
/// After parsing, every registered destination is present.
/// A destination without a default (and not given on the Cli) is present but null.
///
/// ### Example
/// ```
/// # use optwise_core as optwise;
/// use optwise::{Value, Values};
///
/// let mut values = Values::default();
/// values.set("verbose", true);
/// values.set_null("file");
///
/// assert_eq!(values.get("verbose"), Some(&Value::Bool(true)));
/// assert!(values.contains("file"));
/// assert_eq!(values.get("file"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    entries: HashMap<String, Option<Value>>,
}

impl Values {
    pub(crate) fn from_defaults(defaults: HashMap<String, Option<Value>>) -> Self {
        Self { entries: defaults }
    }

    /// Get the value for `dest`; `None` when it is absent or null.
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.entries.get(dest).and_then(Option::as_ref)
    }

    /// Whether `dest` has an entry (possibly null).
    pub fn contains(&self, dest: &str) -> bool {
        self.entries.contains_key(dest)
    }

    /// Set the value for `dest`, replacing what was there.
    pub fn set(&mut self, dest: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(dest.into(), Some(value.into()));
    }

    /// Set `dest` to null, keeping the entry.
    pub fn set_null(&mut self, dest: impl Into<String>) {
        self.entries.insert(dest.into(), None);
    }

    /// Set `dest` to `value` only if it is absent or null, and hand back the (possibly pre-existing) value.
    pub fn set_if_absent(&mut self, dest: impl Into<String>, value: impl Into<Value>) -> &mut Value {
        self.entries
            .entry(dest.into())
            .or_insert(None)
            .get_or_insert_with(|| value.into())
    }

    /// Remove the entry for `dest`, returning its value.
    pub fn unset(&mut self, dest: &str) -> Option<Value> {
        self.entries.remove(dest).flatten()
    }

    /// Iterate over the entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries
            .iter()
            .map(|(dest, value)| (dest.as_str(), value.as_ref()))
    }

    /// The number of entries (including null ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // An absent or null `dest` starts as an empty list; a scalar (ex: a default) becomes the first item.
    pub(crate) fn append(&mut self, dest: &str, value: Value) {
        let existing = self.set_if_absent(dest, Value::List(Vec::default()));

        match existing {
            Value::List(items) => items.push(value),
            scalar => {
                let first = std::mem::replace(scalar, Value::List(Vec::default()));
                *scalar = Value::List(vec![first, value]);
            }
        }
    }

    pub(crate) fn increment(&mut self, dest: &str) {
        let existing = self.set_if_absent(dest, Value::Int(0));

        match existing {
            Value::Int(count) => *count += 1,
            other => *other = Value::Int(1),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Value>)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, Option<Value>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(dest, value)| (dest.into(), value))
                .collect(),
        }
    }
}

impl std::fmt::Display for Values {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut entries: Vec<(&String, &Option<Value>)> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let parts: Vec<String> = entries
            .into_iter()
            .map(|(dest, value)| match value {
                Some(v) => format!("{dest}: {v}"),
                None => format!("{dest}: null"),
            })
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
