use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Deep structural hash of a [`Value`].
///
/// Two values that are deeply equal produce the same hash regardless of
/// which instances they are. Equality of hashes is treated as equality of
/// values; collisions are not handled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueHash([u8; 32]);

impl ValueHash {
    /// Hash a value with the default hasher.
    pub fn of(value: &Value) -> Self {
        ValueHasher::VALUE.hash(value)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueHash({})", self.short_hex())
    }
}

impl fmt::Display for ValueHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Domain-separated BLAKE3 hasher over a canonical value encoding.
///
/// Every node is written as a one-byte type tag followed by its payload.
/// Strings and keys are length-prefixed. Object entries are written in
/// sorted key order so insertion order does not affect the hash; array
/// order does. Numbers are written by numeric value, so `1` and `1.0` hash
/// equal.
pub struct ValueHasher {
    domain: &'static str,
}

const TAG_NULL: u8 = 0;
const TAG_FALSE: u8 = 1;
const TAG_TRUE: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_UINT: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_STRING: u8 = 6;
const TAG_DATE: u8 = 7;
const TAG_REGEX: u8 = 8;
const TAG_ARRAY: u8 = 9;
const TAG_OBJECT: u8 = 10;
const TAG_UNSUPPORTED: u8 = 11;

impl ValueHasher {
    /// Hasher used for diff equality.
    pub const VALUE: Self = Self {
        domain: "chronicle-value-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash a value with domain separation.
    pub fn hash(&self, value: &Value) -> ValueHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        write_value(&mut hasher, value);
        ValueHash(*hasher.finalize().as_bytes())
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

fn write_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn write_number(hasher: &mut blake3::Hasher, n: &serde_json::Number) {
    if let Some(i) = n.as_i64() {
        hasher.update(&[TAG_INT]);
        hasher.update(&i.to_le_bytes());
    } else if let Some(u) = n.as_u64() {
        hasher.update(&[TAG_UINT]);
        hasher.update(&u.to_le_bytes());
    } else {
        let f = n.as_f64().unwrap_or(f64::NAN);
        // Integral floats collapse onto the integer encoding.
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            hasher.update(&[TAG_INT]);
            hasher.update(&(f as i64).to_le_bytes());
        } else if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
            // [2^63, 2^64): the range only a u64 reaches.
            hasher.update(&[TAG_UINT]);
            hasher.update(&(f as u64).to_le_bytes());
        } else {
            hasher.update(&[TAG_FLOAT]);
            hasher.update(&f.to_bits().to_le_bytes());
        }
    }
}

fn write_value(hasher: &mut blake3::Hasher, value: &Value) {
    match value {
        Value::Null => {
            hasher.update(&[TAG_NULL]);
        }
        Value::Bool(false) => {
            hasher.update(&[TAG_FALSE]);
        }
        Value::Bool(true) => {
            hasher.update(&[TAG_TRUE]);
        }
        Value::Number(n) => write_number(hasher, n),
        Value::String(s) => {
            hasher.update(&[TAG_STRING]);
            write_str(hasher, s);
        }
        Value::Date(date) => {
            hasher.update(&[TAG_DATE]);
            hasher.update(&date.timestamp().to_le_bytes());
            hasher.update(&date.timestamp_subsec_nanos().to_le_bytes());
        }
        Value::Regex { pattern, flags } => {
            hasher.update(&[TAG_REGEX]);
            write_str(hasher, pattern);
            write_str(hasher, flags);
        }
        Value::Array(items) => {
            hasher.update(&[TAG_ARRAY]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                write_value(hasher, item);
            }
        }
        Value::Object(map) => {
            hasher.update(&[TAG_OBJECT]);
            hasher.update(&(map.len() as u64).to_le_bytes());
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, item) in entries {
                write_str(hasher, key);
                write_value(hasher, item);
            }
        }
        Value::Unsupported(name) => {
            hasher.update(&[TAG_UNSUPPORTED]);
            write_str(hasher, name);
        }
    }
}
