use std::collections::HashSet;

use chronicle_types::PropertyPath;

/// Configuration for a single [`compare`](crate::compare) call.
///
/// Immutable once built; share it freely between threads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffOptions {
    ignore_paths: HashSet<String>,
}

impl DiffOptions {
    /// Options with an empty ignore list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options ignoring the given dot-delimited paths.
    ///
    /// The subtree rooted at each path is skipped entirely: nothing below it
    /// is reported as created, edited, deleted or changed.
    pub fn with_ignored<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a copy that also ignores `path`.
    pub fn ignore(mut self, path: impl Into<String>) -> Self {
        self.ignore_paths.insert(path.into());
        self
    }

    /// Whether `path` is on the ignore list.
    ///
    /// Matching is on the dotted rendering, exactly as configured.
    pub fn is_ignored(&self, path: &PropertyPath) -> bool {
        !self.ignore_paths.is_empty() && self.ignore_paths.contains(&path.dotted())
    }

    /// The configured ignore list.
    pub fn ignore_paths(&self) -> impl Iterator<Item = &str> {
        self.ignore_paths.iter().map(String::as_str)
    }
}
