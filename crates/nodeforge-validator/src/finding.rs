//! Validation findings and the categorized result

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How much a finding matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The file set is not usable as-is
    Error,
    /// Quality concern; never blocks acceptance
    Warning,
    /// Informational summary
    Info,
}

impl Severity {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation about one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Relative path of the file
    pub file: String,
    /// 1-based line, when the finding points at one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Finding {
    /// Create a finding without a line
    pub fn new(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            message: message.into(),
        }
    }

    /// Attach a line
    #[inline]
    #[must_use]
    pub fn at(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}: {}", self.file, self.message),
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}

/// Categorized validation report
///
/// Non-empty `errors` means the file set is not usable as-is; warnings and
/// info never block acceptance. Each list is ordered by file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub info: Vec<Finding>,
}

impl ValidationResult {
    /// Record a finding
    pub fn push(&mut self, severity: Severity, finding: Finding) {
        match severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    /// Findings of one severity
    #[must_use]
    pub fn findings(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Error => &self.errors,
            Severity::Warning => &self.warnings,
            Severity::Info => &self.info,
        }
    }

    /// Whether no errors were found
    #[inline]
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Findings of one severity about one file
    #[must_use]
    pub fn for_file(&self, severity: Severity, file: &str) -> Vec<&Finding> {
        self.findings(severity).iter().filter(|f| f.file == file).collect()
    }

    /// Total number of findings
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.info.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable sort of every list by file path
    pub(crate) fn sort_by_file(&mut self) {
        for list in [&mut self.errors, &mut self.warnings, &mut self.info] {
            list.sort_by(|a, b| a.file.cmp(&b.file));
        }
    }
}
