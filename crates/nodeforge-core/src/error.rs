//! Pipeline errors

use nodeforge_classifier::ClassifierError;
use nodeforge_generator::GenerateError;
use nodeforge_model::KnowledgeError;

/// Failure of one pipeline run
///
/// Validation findings are never errors; they come back in
/// [`crate::ScaffoldOutcome::validation`].
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// Knowledge tables failed to load
    #[error("knowledge tables rejected: {0}")]
    Knowledge(#[from] KnowledgeError),

    /// Indicator table could not be turned into a classifier
    #[error("classifier setup failed: {0}")]
    Classifier(#[from] ClassifierError),

    /// Generation aborted; no files were produced
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl ScaffoldError {
    /// Whether the specification, not the tool, is at fault
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Generate(e) if e.is_input_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeforge_model::SpecError;

    #[test]
    fn only_spec_problems_are_input_errors() {
        let err: ScaffoldError = GenerateError::from(SpecError::Missing { field: "nodes".into() }).into();
        assert!(err.is_input_error());
        assert_eq!(err.to_string(), "invalid specification: nodes: required field is missing");

        let err: ScaffoldError = GenerateError::Invariant("missing core file flow.py".into()).into();
        assert!(!err.is_input_error());
    }
}
