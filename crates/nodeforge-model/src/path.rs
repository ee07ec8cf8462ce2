//! Relative paths for generated files
//!
//! Provides [`RelativePath`], the key type of a generated file set.
//! Paths always use `/` separators and never escape the output root.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Relative, forward-slash path inside a generated project
///
/// # Examples
/// - `["docs", "design.md"]` → `docs/design.md`
/// - `["tests", "test_nodes.py"]` → `tests/test_nodes.py`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(Vec<String>);

impl RelativePath {
    /// Build a path from already separated segments
    ///
    /// # Errors
    /// Returns error if any segment is empty, `.`, `..`, or contains a
    /// separator or drive prefix
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Final segment (the file name)
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// File name without its extension
    #[must_use]
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Extension without the dot, if any
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Directory part (if the path is nested)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() < 2 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Append a segment, returning a new path
    ///
    /// # Errors
    /// Returns error if the segment is invalid
    pub fn join(&self, segment: &str) -> Result<Self, PathError> {
        check_segment(segment)?;
        let mut next = self.clone();
        next.0.push(segment.to_string());
        Ok(next)
    }

    /// Whether the first segment is `dir`
    #[inline]
    #[must_use]
    pub fn is_under(&self, dir: &str) -> bool {
        self.0.len() > 1 && self.0[0] == dir
    }

    /// Python source file
    #[inline]
    #[must_use]
    pub fn is_python(&self) -> bool {
        self.extension() == Some("py")
    }
}

fn check_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if segment == "." || segment == ".." {
        return Err(PathError::Traversal(segment.to_string()));
    }
    if segment.contains('\\') || segment.contains('/') {
        return Err(PathError::InvalidSegment(segment.to_string()));
    }
    if segment.contains(':') {
        return Err(PathError::DrivePrefix(segment.to_string()));
    }
    Ok(())
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for RelativePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        if s.starts_with('/') {
            return Err(PathError::Absolute(s.to_string()));
        }
        if s.contains('\\') {
            return Err(PathError::InvalidSegment(s.to_string()));
        }
        Self::from_segments(s.split('/'))
    }
}

impl serde::Serialize for RelativePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for RelativePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors related to relative paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// No segments at all
    #[error("path is empty")]
    Empty,

    /// Empty segment (`a//b`, trailing slash)
    #[error("path contains empty segment")]
    EmptySegment,

    /// Leading slash
    #[error("path must be relative: {0}")]
    Absolute(String),

    /// `.` or `..` segment
    #[error("path segment escapes the output root: {0}")]
    Traversal(String),

    /// Windows drive prefix or other `:` in a segment
    #[error("path segment contains a drive prefix: {0}")]
    DrivePrefix(String),

    /// Separator characters inside a segment
    #[error("invalid segment: {0} (backslashes are not allowed)")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_path() {
        let path: RelativePath = "tests/test_nodes.py".parse().unwrap();
        assert_eq!(path.segments(), &["tests", "test_nodes.py"]);
        assert_eq!(path.file_name(), "test_nodes.py");
        assert_eq!(path.file_stem(), "test_nodes");
        assert_eq!(path.extension(), Some("py"));
        assert!(path.is_under("tests"));
        assert!(path.is_python());
    }

    #[test]
    fn top_level_file_has_no_parent() {
        let path: RelativePath = "flow.py".parse().unwrap();
        assert!(path.parent().is_none());
        assert!(!path.is_under("flow.py"));
    }

    #[test]
    fn parent_of_nested_path() {
        let path: RelativePath = "docs/design.md".parse().unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "docs");
    }

    #[test]
    fn dotfile_has_no_extension() {
        let path: RelativePath = ".gitignore".parse().unwrap();
        assert_eq!(path.extension(), None);
        assert_eq!(path.file_stem(), ".gitignore");
    }

    #[test]
    fn join_appends_segment() {
        let dir: RelativePath = "tests".parse().unwrap();
        let file = dir.join("test_flow.py").unwrap();
        assert_eq!(file.to_string(), "tests/test_flow.py");
        assert!(dir.join("..").is_err());
    }

    #[test]
    fn rejects_absolute_paths() {
        let result: Result<RelativePath, _> = "/etc/passwd".parse();
        assert!(matches!(result, Err(PathError::Absolute(_))));
    }

    #[test]
    fn rejects_traversal() {
        let result: Result<RelativePath, _> = "docs/../../x".parse();
        assert!(matches!(result, Err(PathError::Traversal(_))));
        let result: Result<RelativePath, _> = "./x".parse();
        assert!(matches!(result, Err(PathError::Traversal(_))));
    }

    #[test]
    fn rejects_backslashes_and_drives() {
        assert!(matches!(
            "docs\\design.md".parse::<RelativePath>(),
            Err(PathError::InvalidSegment(_))
        ));
        assert!(matches!(
            "C:/design.md".parse::<RelativePath>(),
            Err(PathError::DrivePrefix(_))
        ));
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(matches!("".parse::<RelativePath>(), Err(PathError::Empty)));
        assert!(matches!(
            "docs//design.md".parse::<RelativePath>(),
            Err(PathError::EmptySegment)
        ));
        assert!(matches!(
            "docs/".parse::<RelativePath>(),
            Err(PathError::EmptySegment)
        ));
    }

    #[test]
    fn ordering_follows_segments() {
        let a: RelativePath = "docs/design.md".parse().unwrap();
        let b: RelativePath = "flow.py".parse().unwrap();
        assert!(a < b);
    }
}
