use std::collections::HashMap;
use std::rc::Rc;

use crate::api::Opt;
use crate::model::Value;
use crate::parser::OptionValueError;

/// Converts a raw Cli token for an option.
/// Called with the option, the flag as written on the Cli (ex: `--file`) and the raw token.
pub type Checker = Rc<dyn Fn(&Opt, &str, &str) -> Result<Value, OptionValueError>>;

/// The type tags known to a parser, each mapped to its [`Checker`].
///
/// Built-in tags: `string`, `int`, `float` and `choice`.
/// Register more with [`OptionParser::register_type`](./struct.OptionParser.html#method.register_type).
#[derive(Clone)]
pub struct TypeRegistry {
    checkers: HashMap<String, Checker>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&String> = self.checkers.keys().collect();
        tags.sort();
        f.debug_struct("TypeRegistry").field("tags", &tags).finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            checkers: HashMap::default(),
        };
        registry.register("string", |_, _, raw| Ok(Value::Str(raw.to_string())));
        registry.register("int", check_int);
        registry.register("float", check_float);
        registry.register("choice", check_choice);
        registry
    }
}

impl TypeRegistry {
    /// Register (or replace) the checker for a type tag.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        checker: impl Fn(&Opt, &str, &str) -> Result<Value, OptionValueError> + 'static,
    ) {
        self.checkers.insert(tag.into(), Rc::new(checker));
    }

    /// Whether the type tag is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.checkers.contains_key(tag)
    }

    pub(crate) fn check(
        &self,
        option: &Opt,
        opt_str: &str,
        raw: &str,
    ) -> Result<Value, OptionValueError> {
        match option.get_kind().and_then(|tag| self.checkers.get(tag)) {
            Some(checker) => checker(option, opt_str, raw),
            // Untyped options (and tags removed after registration) see the raw token.
            None => Ok(Value::Str(raw.to_string())),
        }
    }
}

fn check_int(_option: &Opt, opt_str: &str, raw: &str) -> Result<Value, OptionValueError> {
    parse_int(raw).map(Value::Int).ok_or_else(|| {
        OptionValueError::new(format!("option {opt_str}: invalid integer value: '{raw}'"))
    })
}

fn check_float(_option: &Opt, opt_str: &str, raw: &str) -> Result<Value, OptionValueError> {
    raw.parse::<f64>().map(Value::Float).map_err(|_| {
        OptionValueError::new(format!(
            "option {opt_str}: invalid floating-point value: '{raw}'"
        ))
    })
}

fn check_choice(option: &Opt, opt_str: &str, raw: &str) -> Result<Value, OptionValueError> {
    let choices = option.get_choices().unwrap_or_default();

    if choices.iter().any(|choice| choice == raw) {
        Ok(Value::Str(raw.to_string()))
    } else {
        let listed: Vec<String> = choices.iter().map(|c| format!("'{c}'")).collect();
        Err(OptionValueError::new(format!(
            "option {opt_str}: invalid choice: '{raw}' (choose from {})",
            listed.join(", ")
        )))
    }
}

/// Integers may be written in decimal, hex (`0x1f`), binary (`0b101`) or octal (`017`, `0o17`).
fn parse_int(raw: &str) -> Option<i64> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(digits) = lower.strip_prefix("0x") {
        (16, digits)
    } else if let Some(digits) = lower.strip_prefix("0b") {
        (2, digits)
    } else if let Some(digits) = lower.strip_prefix("0o") {
        (8, digits)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Action;
    use rstest::rstest;

    fn typed(kind: &str) -> Opt {
        Opt::new(["-n", "--number"])
            .kind(kind)
            .check(&TypeRegistry::default())
            .unwrap()
    }

    #[rstest]
    #[case("0", 0)]
    #[case("42", 42)]
    #[case("-42", -42)]
    #[case("+7", 7)]
    #[case("0x1F", 31)]
    #[case("0b101", 5)]
    #[case("017", 15)]
    #[case("0o17", 15)]
    #[case("-0x10", -16)]
    fn int_ok(#[case] raw: &str, #[case] expected: i64) {
        let option = typed("int");
        assert_eq!(
            TypeRegistry::default().check(&option, "-n", raw).unwrap(),
            Value::Int(expected)
        );
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("0x")]
    #[case("1.5")]
    #[case("--1")]
    #[case("09")]
    fn int_invalid(#[case] raw: &str) {
        let option = typed("int");
        let error = TypeRegistry::default()
            .check(&option, "--number", raw)
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            format!("option --number: invalid integer value: '{raw}'")
        );
    }

    #[rstest]
    #[case("0.43", 0.43)]
    #[case("-1", -1.0)]
    #[case("1e3", 1000.0)]
    fn float_ok(#[case] raw: &str, #[case] expected: f64) {
        let option = typed("float");
        assert_eq!(
            TypeRegistry::default().check(&option, "-n", raw).unwrap(),
            Value::Float(expected)
        );
    }

    #[test]
    fn float_invalid() {
        let option = typed("float");
        let error = TypeRegistry::default()
            .check(&option, "-n", "many")
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "option -n: invalid floating-point value: 'many'"
        );
    }

    #[test]
    fn choice() {
        let option = Opt::new(["-m", "--mode"])
            .choices(["fast", "slow"])
            .check(&TypeRegistry::default())
            .unwrap();
        let registry = TypeRegistry::default();

        assert_eq!(
            registry.check(&option, "-m", "fast").unwrap(),
            Value::from("fast")
        );
        assert_eq!(
            registry.check(&option, "--mode", "medium").unwrap_err(),
            OptionValueError::new(
                "option --mode: invalid choice: 'medium' (choose from 'fast', 'slow')"
            )
        );
    }

    #[test]
    fn string() {
        let option = typed("string");
        assert_eq!(
            TypeRegistry::default().check(&option, "-n", "-x").unwrap(),
            Value::from("-x")
        );
    }

    #[test]
    fn untyped_passthrough() {
        let option = Opt::new(["-x"])
            .action(Action::Callback)
            .callback(|_, _, _, _| Ok(()))
            .check(&TypeRegistry::default())
            .unwrap();
        assert_eq!(
            TypeRegistry::default().check(&option, "-x", "raw").unwrap(),
            Value::from("raw")
        );
    }

    #[test]
    fn register_custom() {
        let mut registry = TypeRegistry::default();
        assert!(!registry.contains("upper"));
        registry.register("upper", |_, _, raw| Ok(Value::Str(raw.to_uppercase())));
        assert!(registry.contains("upper"));

        let option = Opt::new(["-u"]).kind("upper").check(&registry).unwrap();
        assert_eq!(
            registry.check(&option, "-u", "shout").unwrap(),
            Value::from("SHOUT")
        );
    }

    #[test]
    fn debug_lists_tags() {
        assert_eq!(
            format!("{:?}", TypeRegistry::default()),
            r#"TypeRegistry { tags: ["choice", "float", "int", "string"] }"#
        );
    }
}
