//! Generator errors
//!
//! Two families, never mixed:
//! - input errors: the specification is unusable, nothing was generated
//! - invariant violations: the generator produced something it must not;
//!   a defect in this crate, never in the input

use nodeforge_deps::ResolveError;
use nodeforge_model::{FileSetError, SpecError};

/// Generation failure; no file set is returned alongside it
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Specification rejected before generation started
    #[error("invalid specification: {0}")]
    Input(#[from] SpecError),

    /// Dependency resolution or manifest rendering failed
    #[error("dependency resolution failed: {0}")]
    Dependencies(#[from] ResolveError),

    /// Generated output broke its own guarantees
    #[error("generator invariant violated: {0}")]
    Invariant(String),
}

impl GenerateError {
    /// Whether the error points at the input rather than the generator
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

impl From<FileSetError> for GenerateError {
    fn from(err: FileSetError) -> Self {
        Self::Invariant(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_set_errors_are_invariant_violations() {
        let err: GenerateError = FileSetError::DuplicatePath("nodes.py".into()).into();
        assert!(matches!(err, GenerateError::Invariant(ref m) if m.contains("nodes.py")));
        assert!(!err.is_input_error());
    }

    #[test]
    fn spec_errors_are_input_errors() {
        let err: GenerateError = SpecError::Missing { field: "nodes".into() }.into();
        assert!(err.is_input_error());
        assert_eq!(err.to_string(), "invalid specification: nodes: required field is missing");
    }
}
