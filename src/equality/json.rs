use super::structural::{ordered_hash, unordered_hash};
use super::{fnv_hash, Equality};
use crate::value::Value;

/// Equality of JSON shaped [Value] trees: lists, maps with string keys, and primitives.
///
/// Lists compare in order, maps regardless of order, primitives by their native equality.
/// As soon as either side is not JSON shaped (a set, a sequence, or a map with a non-string
/// key somewhere), the values are not equal, even if they are natively equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonEquality;

fn is_json(value: &Value) -> bool {
    match value {
        Value::List(xs) => xs.iter().all(is_json),
        Value::Map(m) => m.iter().all(|(k, v)| k.as_str().is_some() && is_json(v)),
        Value::Seq(_) | Value::Set(_) => false,
        _ => true,
    }
}

impl Equality<Value> for JsonEquality {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.equals(x, y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        k.as_str().is_some() && b.get(k).map_or(false, |w| self.equals(v, w))
                    })
            }
            (Value::Seq(_), _) | (_, Value::Seq(_)) => false,
            (Value::Set(_), _) | (_, Value::Set(_)) => false,
            (Value::List(_), _) | (_, Value::List(_)) => false,
            (Value::Map(_), _) | (_, Value::Map(_)) => false,
            _ => a == b,
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match value {
            Value::List(xs) => ordered_hash(xs.iter().map(|x| self.hash(x))),
            Value::Map(m) => unordered_hash(m.iter().map(|(k, v)| {
                fnv_hash(k)
                    .wrapping_mul(3)
                    .wrapping_add(self.hash(v).wrapping_mul(7))
            })),
            Value::Seq(_) | Value::Set(_) => 0,
            _ => fnv_hash(value),
        }
    }

    fn is_valid_key(&self, value: &Value) -> bool {
        is_json(value)
    }
}
