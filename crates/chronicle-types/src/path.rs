use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a property inside a nested map structure.
///
/// Internally a path is a sequence of literal key segments. At the
/// serialization boundary it is rendered as a dot-delimited string
/// (`"a.b.c"`). Literal dots inside keys are not escaped, so a key named
/// `"b.c"` under `"a"` renders the same as the path `a -> b -> c`.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// The empty path, addressing the root map itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dot-delimited path. The empty string is the root path.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self {
            segments: dotted.split('.').map(str::to_owned).collect(),
        }
    }

    /// A new path extending this one by a single key.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(key.to_owned());
        Self { segments }
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The key segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The dot-delimited rendering.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Debug for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyPath({})", self.dotted())
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl From<&str> for PropertyPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<String> for PropertyPath {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

impl From<PropertyPath> for String {
    fn from(path: PropertyPath) -> Self {
        path.dotted()
    }
}
