//! Parameter bindings injected as the first cell of a debug notebook.

use std::fmt::{self, Write};

use indexmap::IndexMap;
use serde::Deserialize;

/// A value that can be written as a Python literal.
///
/// `Expr` carries source that is already valid Python (e.g. `np.arange(10)`) and is
/// emitted verbatim; it can't be read from configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ParamValue>),
    Tuple(Vec<ParamValue>),
    Dict(IndexMap<String, ParamValue>),
    #[serde(skip_deserializing)]
    Expr(String),
}

impl ParamValue {
    /// Pre-serialized Python source, emitted as-is.
    pub fn expr(source: impl Into<String>) -> Self {
        Self::Expr(source.into())
    }

    /// Python source for this value, as `repr()` would print it.
    pub fn to_source(&self) -> String {
        self.to_string()
    }

    fn write_source<W: Write>(&self, f: &mut W) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write_float(f, *v),
            Self::Str(s) => write_str_repr(f, s),
            Self::List(items) => {
                f.write_char('[')?;
                write_items(f, items)?;
                f.write_char(']')
            }
            Self::Tuple(items) => {
                f.write_char('(')?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::Dict(map) => {
                f.write_char('{')?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_str_repr(f, key)?;
                    f.write_str(": ")?;
                    value.write_source(f)?;
                }
                f.write_char('}')
            }
            Self::Expr(source) => f.write_str(source),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_source(f)
    }
}

fn write_items<W: Write>(f: &mut W, items: &[ParamValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.write_source(f)?;
    }
    Ok(())
}

/// Floats always keep a `.0` or exponent so they stay floats when read back.
fn write_float<W: Write>(f: &mut W, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("float('nan')")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "float('inf')" } else { "float('-inf')" })
    } else {
        let s = v.to_string();
        if s.contains(['.', 'e', 'E']) {
            f.write_str(&s)
        } else {
            write!(f, "{s}.0")
        }
    }
}

/// Python's `str.__repr__`: single quotes unless the string contains a single quote
/// and no double quote.
fn write_str_repr<W: Write>(f: &mut W, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c.is_control() => {
                let code = u32::from(c);
                if code <= 0xff {
                    write!(f, "\\x{code:02x}")?;
                } else {
                    write!(f, "\\u{code:04x}")?;
                }
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

macro_rules! from_impl {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

from_impl! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f64 => Float,
    f32 => Float,
    String => Str,
    &str => Str,
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// Ordered mapping from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ParameterBindings(IndexMap<String, ParamValue>);

impl ParameterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One `name = literal` assignment per binding, in insertion order.
    pub fn to_assignments(&self) -> String {
        self.0.iter().map(|(name, value)| format!("{name} = {value}\n")).collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterBindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
