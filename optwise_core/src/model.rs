/// A parsed (or default) value held in [`Values`](./struct.Values.html).
///
/// Scalars come out of the type checkers; `List` is produced by the appending actions and by options with `nargs > 1`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Produced by `StoreTrue`/`StoreFalse`.
    Bool(bool),
    /// Produced by the `int` type and by `Count`.
    Int(i64),
    /// Produced by the `float` type.
    Float(f64),
    /// Produced by the `string` and `choice` types.
    Str(String),
    /// Produced by `Append`/`AppendConst`, or by an option taking several values.
    List(Vec<Value>),
}

impl Value {
    /// The string slice, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float, if this is a `Float` (an `Int` widens).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The items, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// What happens when an option is matched on the Cli.
///
/// Inspired by optparse: <https://docs.python.org/3/library/optparse.html#standard-option-actions>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Store the (converted) value into the destination.
    Store,
    /// Store the option's constant into the destination.
    StoreConst,
    /// Store `true` into the destination.
    StoreTrue,
    /// Store `false` into the destination.
    StoreFalse,
    /// Append the (converted) value to the destination list.
    /// A scalar default becomes the first item of the list.
    Append,
    /// Append the option's constant to the destination list.
    AppendConst,
    /// Increment the destination counter.
    Count,
    /// Invoke the option's callback.
    Callback,
    /// Print the help message and stop parsing.
    Help,
    /// Print the version and stop parsing.
    Version,
}

impl Action {
    /// Actions which write into `dest`, and therefore need one.
    pub(crate) fn stores(&self) -> bool {
        matches!(
            self,
            Action::Store
                | Action::StoreConst
                | Action::StoreTrue
                | Action::StoreFalse
                | Action::Append
                | Action::AppendConst
                | Action::Count
        )
    }

    /// Actions which may carry a type tag.
    pub(crate) fn typed(&self) -> bool {
        matches!(self, Action::Store | Action::Append | Action::Callback)
    }

    /// Actions which are typed even when the user doesn't say so.
    pub(crate) fn always_typed(&self) -> bool {
        matches!(self, Action::Store | Action::Append)
    }

    pub(crate) fn uses_constant(&self) -> bool {
        matches!(self, Action::StoreConst | Action::AppendConst)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Store => "store",
            Action::StoreConst => "store_const",
            Action::StoreTrue => "store_true",
            Action::StoreFalse => "store_false",
            Action::Append => "append",
            Action::AppendConst => "append_const",
            Action::Count => "count",
            Action::Callback => "callback",
            Action::Help => "help",
            Action::Version => "version",
        };
        write!(f, "{name}")
    }
}

/// The role a piece of help text plays, as seen by a [`Highlighter`](./prelude/trait.Highlighter.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Section headings (ex: `Options:`).
    Heading,
    /// Option flag strings (ex: `-f FILE, --file=FILE`).
    Flags,
}
