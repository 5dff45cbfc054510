//! Payload values carried by nodes.
//!
//! Rings compare payloads two ways:
//!
//! - **Strict** (`PartialEq`): used by `get_nodes`, value-based
//!   `remove`/`replace` and ring equality.
//! - **Loose** ([`Payload::loosely_eq`]): used by `index_of`. Defaults to
//!   strict equality; [`Value`] widens it to numeric equality across
//!   booleans, integers and floats.

use std::fmt;

/// A value that can live in a node.
///
/// `Clone` is required so rings can be cloned and values can be wrapped
/// into one fresh node per subscriber during hub fan-out.
pub trait Payload: Clone + PartialEq + fmt::Debug {
    /// Loose equality used by index searches.
    ///
    /// Must be reflexive for non-NaN values and must hold whenever `==`
    /// holds.
    fn loosely_eq(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! strict_payload {
    ($($t:ty),* $(,)?) => {
        $(impl Payload for $t {})*
    };
}

strict_payload!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    String, &'static str, ()
);

impl<T: Payload> Payload for Option<T> {
    fn loosely_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.loosely_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Payload> Payload for Vec<T> {
    fn loosely_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.loosely_eq(b))
    }
}

impl<A: Payload, B: Payload> Payload for (A, B) {
    fn loosely_eq(&self, other: &Self) -> bool {
        self.0.loosely_eq(&other.0) && self.1.loosely_eq(&other.1)
    }
}

/// A dynamically-typed payload.
///
/// Strict equality is exact: `Int(1)`, `Float(1.0)` and `Bool(true)` are
/// three different values. Loose equality compares the numeric view of
/// `Bool` (0/1), `Int` and `Float`, so all three match each other.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A double-precision float.
    Float(f64),
    /// A string.
    Text(String),
}

impl Value {
    /// Numeric view used by loose equality.
    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            Self::Null | Self::Text(_) => None,
        }
    }
}

impl Payload for Value {
    fn loosely_eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Compare integers exactly; the f64 view loses precision past 2^53.
            (Self::Int(a), Self::Int(b)) => a == b,
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a == b,
                _ => self == other,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
