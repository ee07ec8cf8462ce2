//! Generated file sets
//!
//! A [`GeneratedFileSet`] maps relative paths to file contents. It is the
//! only output of generation; writing it to disk is the caller's job.

use crate::hash::{ContentHash, ContentHasher};
use crate::path::{PathError, RelativePath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping of relative path to file content
///
/// Iteration order is the path order, so everything derived from a file
/// set (fingerprints, validation reports) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedFileSet {
    files: BTreeMap<RelativePath, String>,
}

impl GeneratedFileSet {
    /// Create an empty file set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new file
    ///
    /// # Errors
    /// Returns [`FileSetError::DuplicatePath`] if the path is already present
    pub fn insert(
        &mut self,
        path: RelativePath,
        content: impl Into<String>,
    ) -> Result<(), FileSetError> {
        if self.files.contains_key(&path) {
            return Err(FileSetError::DuplicatePath(path.to_string()));
        }
        self.files.insert(path, content.into());
        Ok(())
    }

    /// Insert a file addressed by a string path
    ///
    /// # Errors
    /// Returns error if the path is invalid or already present
    pub fn insert_str(&mut self, path: &str, content: impl Into<String>) -> Result<(), FileSetError> {
        let path: RelativePath = path.parse()?;
        self.insert(path, content)
    }

    /// Content of a file
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        let path: RelativePath = path.parse().ok()?;
        self.files.get(&path).map(String::as_str)
    }

    /// Whether a path is present
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no files were generated
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate `(path, content)` in path order
    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.files.iter().map(|(path, content)| (path, content.as_str()))
    }

    /// All paths as strings, in path order
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.keys().map(ToString::to_string).collect()
    }

    /// Total content size in bytes
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.files.values().map(String::len).sum()
    }

    /// Fingerprint over every `(path, content)` pair
    ///
    /// Two file sets are byte-identical iff their fingerprints match.
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        let mut hasher = ContentHasher::new();
        for (path, content) in &self.files {
            hasher.record(path.to_string().as_bytes());
            hasher.record(content.as_bytes());
        }
        hasher.finish()
    }
}

impl<'a> IntoIterator for &'a GeneratedFileSet {
    type Item = (&'a RelativePath, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, RelativePath, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Errors when assembling a file set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileSetError {
    /// Same path emitted twice
    #[error("duplicate path in file set: {0}")]
    DuplicatePath(String),

    /// Path failed validation
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GeneratedFileSet {
        let mut files = GeneratedFileSet::new();
        files.insert_str("nodes.py", "class A: ...\n").unwrap();
        files.insert_str("docs/design.md", "# Design\n").unwrap();
        files
    }

    #[test]
    fn iteration_is_path_ordered() {
        assert_eq!(sample().paths(), vec!["docs/design.md", "nodes.py"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut files = sample();
        let err = files.insert_str("nodes.py", "other").unwrap_err();
        assert_eq!(err, FileSetError::DuplicatePath("nodes.py".to_string()));
        assert_eq!(files.get("nodes.py"), Some("class A: ...\n"));
    }

    #[test]
    fn invalid_path_is_rejected() {
        let mut files = GeneratedFileSet::new();
        assert!(matches!(
            files.insert_str("/abs.py", ""),
            Err(FileSetError::InvalidPath(PathError::Absolute(_)))
        ));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = GeneratedFileSet::new();
        c.insert_str("nodes.py", "class B: ...\n").unwrap();
        c.insert_str("docs/design.md", "# Design\n").unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn total_bytes_sums_contents() {
        assert_eq!(sample().total_bytes(), "class A: ...\n".len() + "# Design\n".len());
    }

    #[test]
    fn serializes_as_path_map() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["docs/design.md"], "# Design\n");
    }
}
