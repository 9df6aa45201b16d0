//! Constructor arguments and their canonical literal form.
//!
//! A transformer keeps its arguments as [`Params`]. Rendering them back gives
//! the step identity recorded in a document, e.g.
//! `RemoveStopWords(language='english', case_sensitive=True)`, which the step
//! parser can read again.

use std::fmt::{self, Write};

use crate::error::TransformError;

/// A literal argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::None => "None",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write_quoted(f, s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) if x.is_nan() => f.write_str("nan"),
            // `{:?}` keeps a fractional part or an exponent, and prints
            // `inf`/`-inf`, so the literal lexes back as a float.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::None => f.write_str("None"),
            Value::List(items) => {
                f.write_char('[')?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for ch in s.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            other => f.write_char(other)?,
        }
    }
    f.write_char('\'')
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

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

/// Ordered positional and keyword arguments of one transformer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    args: Vec<Value>,
    kwargs: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Adds a keyword argument, replacing an earlier one with the same key
    /// in its original position.
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_kwarg(key.into(), value.into());
        self
    }

    pub(crate) fn push_arg(&mut self, value: Value) {
        self.args.push(value);
    }

    pub(crate) fn insert_kwarg(&mut self, key: String, value: Value) {
        match self.kwargs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.kwargs.push((key, value)),
        }
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &[(String, Value)] {
        &self.kwargs
    }

    pub fn kwarg_value(&self, key: &str) -> Option<&Value> {
        self.kwargs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }

    /// `Name(arg1, arg2, key1=value1, ...)`.
    pub fn render(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2 + 16 * (self.args.len() + self.kwargs.len()));
        out.push_str(name);
        out.push('(');
        let mut first = true;
        for value in &self.args {
            if !first {
                out.push_str(", ");
            }
            first = false;
            let _ = write!(out, "{value}");
        }
        for (key, value) in &self.kwargs {
            if !first {
                out.push_str(", ");
            }
            first = false;
            let _ = write!(out, "{key}={value}");
        }
        out.push(')');
        out
    }

    /// Binds arguments to the parameter `names` of `transformer`, the way a
    /// call binds to a signature: positionals fill `names` left to right,
    /// keywords fill by name.
    pub fn bind(
        &self,
        transformer: &str,
        names: &[&'static str],
    ) -> Result<BoundArgs, TransformError> {
        if self.args.len() > names.len() {
            return Err(TransformError::Type(format!(
                "{transformer}() takes {} argument(s) but {} positional were given",
                names.len(),
                self.args.len()
            )));
        }

        let mut slots: Vec<(&'static str, Option<Value>)> =
            names.iter().map(|name| (*name, None)).collect();
        for (slot, value) in slots.iter_mut().zip(&self.args) {
            slot.1 = Some(value.clone());
        }
        for (key, value) in &self.kwargs {
            let slot = slots
                .iter_mut()
                .find(|(name, _)| *name == key.as_str())
                .ok_or_else(|| {
                    TransformError::Type(format!(
                        "{transformer}() got an unexpected keyword argument '{key}'"
                    ))
                })?;
            if slot.1.is_some() {
                return Err(TransformError::Type(format!(
                    "{transformer}() got multiple values for argument '{key}'"
                )));
            }
            slot.1 = Some(value.clone());
        }

        Ok(BoundArgs {
            transformer: transformer.to_string(),
            slots,
        })
    }
}

/// Arguments bound to named parameters, with typed accessors.
#[derive(Debug, Clone)]
pub struct BoundArgs {
    transformer: String,
    slots: Vec<(&'static str, Option<Value>)>,
}

impl BoundArgs {
    fn get(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|(slot, _)| *slot == name)
            .and_then(|(_, value)| value.as_ref())
    }

    fn mismatch(&self, name: &str, expected: &str, got: &Value) -> TransformError {
        TransformError::Type(format!(
            "{}() argument '{name}' must be {expected}, not {}",
            self.transformer,
            got.type_name()
        ))
    }

    pub fn required_str(&self, name: &str) -> Result<String, TransformError> {
        match self.get(name) {
            Some(Value::Str(s)) => Ok(s.clone()),
            Some(other) => Err(self.mismatch(name, "str", other)),
            None => Err(TransformError::Type(format!(
                "{}() missing required argument '{name}'",
                self.transformer
            ))),
        }
    }

    pub fn str_or(&self, name: &str, default: &str) -> Result<String, TransformError> {
        match self.get(name) {
            Some(Value::Str(s)) => Ok(s.clone()),
            Some(other) => Err(self.mismatch(name, "str", other)),
            None => Ok(default.to_string()),
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, TransformError> {
        match self.get(name) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.mismatch(name, "bool", other)),
            None => Ok(default),
        }
    }

    pub fn int_or(&self, name: &str, default: i64) -> Result<i64, TransformError> {
        match self.get(name) {
            Some(Value::Int(i)) => Ok(*i),
            Some(other) => Err(self.mismatch(name, "int", other)),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn render_without_arguments() {
        assert_eq!(Params::new().render("Base"), "Base()");
    }

    #[test]
    fn render_positional_and_keyword() {
        let p = Params::new()
            .arg(1i64)
            .arg("str")
            .arg(3.0)
            .arg(Value::List(vec![Value::Int(1)]));
        assert_eq!(p.render("Base"), "Base(1, 'str', 3.0, [1])");

        let p = Params::new()
            .kwarg("a", 1i64)
            .kwarg("b", "str")
            .kwarg("c", 3.0)
            .kwarg("d", vec![Value::from("str"), Value::from(1i64)]);
        assert_eq!(p.render("Base"), "Base(a=1, b='str', c=3.0, d=['str', 1])");

        let p = Params::new().arg(1i64).arg("str").kwarg("a", true).kwarg("b", Value::None);
        assert_eq!(p.render("Base"), "Base(1, 'str', a=True, b=None)");
    }

    #[test]
    fn strings_are_escaped() {
        let p = Params::new().arg("it's a\\b\n");
        assert_eq!(p.render("X"), r"X('it\'s a\\b\n')");
    }

    #[test]
    fn kwarg_replaces_in_place() {
        let p = Params::new().kwarg("a", 1i64).kwarg("b", 2i64).kwarg("a", 3i64);
        assert_eq!(p.render("X"), "X(a=3, b=2)");
    }

    #[test]
    fn bind_fills_positional_then_keyword() {
        let p = Params::new().arg("english").kwarg("case_sensitive", false);
        let bound = p.bind("RemoveStopWords", &["language", "case_sensitive"]).unwrap();
        assert_eq!(bound.str_or("language", "x").unwrap(), "english");
        assert!(!bound.bool_or("case_sensitive", true).unwrap());
    }

    #[test]
    fn bind_rejects_bad_calls_as_type_errors() {
        let too_many = Params::new().arg(1i64).arg(2i64);
        let err = too_many.bind("CaseTokens", &["mode"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let unknown = Params::new().kwarg("colour", "red");
        let err = unknown.bind("CaseTokens", &["mode"]).unwrap_err();
        assert!(err.to_string().contains("unexpected keyword argument 'colour'"));

        let dup = Params::new().arg("lower").kwarg("mode", "upper");
        let err = dup.bind("CaseTokens", &["mode"]).unwrap_err();
        assert!(err.to_string().contains("multiple values"));
    }

    #[test]
    fn typed_accessors_report_mismatches() {
        let p = Params::new().kwarg("mode", 1i64);
        let bound = p.bind("CaseTokens", &["mode"]).unwrap();
        let err = bound.str_or("mode", "lower").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(err.to_string().contains("must be str, not int"));

        let p = Params::new();
        let bound = p.bind("WordEmbeddings", &["path"]).unwrap();
        assert!(bound.required_str("path").is_err());
    }
}
