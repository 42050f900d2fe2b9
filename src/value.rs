//! A dynamically typed tree of values, the domain of the deep and JSON equality strategies.
use crate::error::{CollectionError, Result};
use crate::equality::fnv_hash;
use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

/// A value that is either a primitive or a container of values.
///
/// The native equality of `Value` is structural. Lists and sequences compare in order, sets and
/// maps regardless of order. Floats compare by [f64::total_cmp], so every value is equal to
/// itself and `Value` can be used as a key in hash tables, including its own sets and maps.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// an indexable list
    List(Vec<Value>),
    /// an ordered sequence that is not a list
    Seq(VecDeque<Value>),
    Set(IndexSet<Value>),
    Map(IndexMap<Value, Value>),
}

/// The kind of a [Value], without its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Seq,
    Set,
    Map,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Seq(_) => ValueKind::Seq,
            Value::Set(_) => ValueKind::Set,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// true for lists, sequences, sets and maps
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::List(_) | Value::Seq(_) | Value::Set(_) | Value::Map(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Natural ordering between two values.
    ///
    /// Numbers are ordered numerically, also across `Int` and `Float`. Strings and booleans are
    /// ordered among themselves. Any other combination has no natural ordering.
    ///
    /// Note that `Int(1)` and `Float(1.0)` compare as `Equal` while not being equal values.
    pub fn try_cmp(&self, that: &Value) -> Result<Ordering> {
        match (self, that) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(a.total_cmp(b)),
            (Value::Int(a), Value::Float(b)) => Ok((*a as f64).total_cmp(b)),
            (Value::Float(a), Value::Int(b)) => Ok(a.total_cmp(&(*b as f64))),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            _ => Err(CollectionError::TypeMismatch {
                left: self.kind(),
                right: that.kind(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, that: &Self) -> bool {
        match (self, that) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b) == Ordering::Equal,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(text) => text.hash(state),
            Value::List(xs) => xs.hash(state),
            Value::Seq(xs) => xs.hash(state),
            // sets and maps are equal regardless of order, so combine with a commutative op
            Value::Set(xs) => {
                state.write_usize(xs.len());
                state.write_u64(xs.iter().map(fnv_hash).fold(0, u64::wrapping_add));
            }
            Value::Map(m) => {
                state.write_usize(m.len());
                let entries = m.iter().map(|entry| fnv_hash(&entry));
                state.write_u64(entries.fold(0, u64::wrapping_add));
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
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

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(text) => serializer.serialize_str(text),
            Value::List(xs) => serializer.collect_seq(xs),
            Value::Seq(xs) => serializer.collect_seq(xs),
            Value::Set(xs) => serializer.collect_seq(xs),
            Value::Map(m) => serializer.collect_map(m),
        }
    }
}
