//! Normalized cache keys

use std::fmt;

/// A search term normalized for use as a cache filename stem
///
/// A key is always a single, non-empty path component, so the file it maps
/// to can never land outside the cache root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    /// Normalizes a search term into a cache key
    ///
    /// Returns `None` for degenerate terms: empty after trimming, `.` or `..`,
    /// or containing a path separator or NUL. Callers skip caching for those.
    pub fn new(word: &str) -> Option<Self> {
        let key = word.trim().to_lowercase();
        if key.is_empty() || key == "." || key == ".." {
            return None;
        }
        if key.contains(['/', '\\', '\0']) {
            return None;
        }
        Some(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the cache file for this key
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
