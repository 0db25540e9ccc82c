//! Value classification for diff routing.

use chronicle_types::Value;

/// How the diff engine treats a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Compared as a whole by structural hash: null, booleans, numbers,
    /// strings, dates and regexes.
    Scalar,
    /// A keyed map, recursed into.
    Map,
    /// An ordered sequence, handed to the array reconciler.
    Sequence,
    /// Excluded from comparison without error.
    Unsupported,
}

impl ValueKind {
    /// Scalars and sequences are reported whole as a single record.
    pub fn is_leaf(self) -> bool {
        matches!(self, ValueKind::Scalar | ValueKind::Sequence)
    }
}

/// Classify a value.
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Date(_)
        | Value::Regex { .. } => ValueKind::Scalar,
        Value::Object(_) => ValueKind::Map,
        Value::Array(_) => ValueKind::Sequence,
        Value::Unsupported(_) => ValueKind::Unsupported,
    }
}
