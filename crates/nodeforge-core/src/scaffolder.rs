//! Generation pipeline
//!
//! classify → resolve → generate → validate, in that order, for one
//! specification at a time. Knowledge tables are loaded once by the caller
//! and shared read-only; a [`Scaffolder`] holds no mutable state, so batch
//! runs fan out over `rayon` without locking.

use crate::error::ScaffoldError;
use nodeforge_classifier::{PatternClassifier, PatternRecommendation};
use nodeforge_deps::{DependencyConfig, DependencyResolver};
use nodeforge_generator::{GeneratorConfig, ScaffoldGenerator};
use nodeforge_model::{GeneratedFileSet, KnowledgeBase, Pattern, WorkflowSpec};
use nodeforge_validator::{StructuralValidator, ValidationResult};
use rayon::prelude::*;
use std::sync::Arc;

/// Result of one successful pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldOutcome {
    /// Pattern the scaffold implements
    pub pattern: Pattern,
    /// Ranked recommendations
    pub recommendations: Vec<PatternRecommendation>,
    /// Resolved dependency configuration
    pub dependencies: DependencyConfig,
    /// Generated files, not yet written anywhere
    pub files: GeneratedFileSet,
    /// Findings over `files`
    pub validation: ValidationResult,
}

impl ScaffoldOutcome {
    /// True when validation reported no errors
    #[inline]
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.validation.is_usable()
    }

    /// Best recommendation, if any
    #[inline]
    #[must_use]
    pub fn top_recommendation(&self) -> Option<&PatternRecommendation> {
        self.recommendations.first()
    }
}

/// End-to-end pipeline over shared knowledge tables
#[derive(Debug, Clone)]
pub struct Scaffolder {
    knowledge: Arc<KnowledgeBase>,
    classifier: PatternClassifier,
    generator: ScaffoldGenerator,
    validator: StructuralValidator,
}

impl Scaffolder {
    /// Build every stage from the knowledge tables
    ///
    /// # Errors
    /// [`ScaffoldError::Classifier`] when an indicator keyword cannot be
    /// compiled
    pub fn new(knowledge: Arc<KnowledgeBase>, config: GeneratorConfig) -> Result<Self, ScaffoldError> {
        let classifier = PatternClassifier::new(knowledge.indicators())?;
        let resolver = DependencyResolver::from_knowledge(&knowledge);
        let generator = ScaffoldGenerator::new(classifier.clone(), resolver, config);
        let validator = StructuralValidator::new(Arc::clone(&knowledge));

        tracing::debug!(
            indicators = knowledge.indicators().version(),
            dependencies = knowledge.dependencies().version(),
            deny_list = knowledge.deny_list().version(),
            "scaffolder ready"
        );

        Ok(Self {
            knowledge,
            classifier,
            generator,
            validator,
        })
    }

    /// Build with the built-in tables and default configuration
    ///
    /// # Errors
    /// Propagates table loading and classifier failures
    pub fn with_builtin_tables() -> Result<Self, ScaffoldError> {
        let knowledge = KnowledgeBase::builtin()?;
        Self::new(Arc::new(knowledge), GeneratorConfig::default())
    }

    /// Shared knowledge tables
    #[inline]
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Generator configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        self.generator.config()
    }

    /// Rank patterns for a description without generating anything
    #[must_use]
    pub fn classify(&self, description: &str, declared: Option<Pattern>) -> Vec<PatternRecommendation> {
        self.classifier.classify(description, declared)
    }

    /// Validate an existing file set
    #[must_use]
    pub fn validate(&self, files: &GeneratedFileSet) -> ValidationResult {
        self.validator.validate(files)
    }

    /// Run the whole pipeline for one specification
    ///
    /// # Errors
    /// [`ScaffoldError::Generate`] when the specification is unusable or the
    /// generator breaks its own guarantees. Validation findings are returned
    /// in the outcome, never as errors.
    #[tracing::instrument(skip(self, spec), fields(spec = %spec.name))]
    pub fn scaffold(&self, spec: &WorkflowSpec) -> Result<ScaffoldOutcome, ScaffoldError> {
        let generation = self.generator.generate_detailed(spec)?;
        let validation = self.validator.validate(&generation.files);

        if validation.is_usable() {
            tracing::info!(
                pattern = %generation.pattern,
                warnings = validation.warnings.len(),
                "scaffold ready"
            );
        } else {
            tracing::warn!(
                pattern = %generation.pattern,
                errors = validation.errors.len(),
                "scaffold generated with validation errors"
            );
        }

        Ok(ScaffoldOutcome {
            pattern: generation.pattern,
            recommendations: generation.recommendations,
            dependencies: generation.dependencies,
            files: generation.files,
            validation,
        })
    }

    /// Run independent specifications in parallel
    ///
    /// One result per input, in input order; a failing specification does
    /// not affect the others.
    #[tracing::instrument(skip_all, fields(specs = specs.len()))]
    pub fn scaffold_batch(&self, specs: &[WorkflowSpec]) -> Vec<Result<ScaffoldOutcome, ScaffoldError>> {
        specs.par_iter().map(|spec| self.scaffold(spec)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeforge_test_utils::{builtin_knowledge, order_flow_spec};

    #[test]
    fn builtin_tables_build() {
        let scaffolder = Scaffolder::with_builtin_tables().unwrap();
        assert_eq!(scaffolder.config(), &GeneratorConfig::default());
        assert!(!scaffolder.knowledge().deny_list().entries().is_empty());
    }

    #[test]
    fn classify_matches_the_outcome() {
        let scaffolder = Scaffolder::new(builtin_knowledge(), GeneratorConfig::default()).unwrap();
        let spec = order_flow_spec();
        let outcome = scaffolder.scaffold(&spec).unwrap();
        assert_eq!(scaffolder.classify(&spec.description, None), outcome.recommendations);
        assert_eq!(outcome.top_recommendation().map(|r| r.pattern), Some(outcome.pattern));
    }

    #[test]
    fn revalidating_gives_the_same_findings() {
        let scaffolder = Scaffolder::new(builtin_knowledge(), GeneratorConfig::default()).unwrap();
        let outcome = scaffolder.scaffold(&order_flow_spec()).unwrap();
        assert_eq!(scaffolder.validate(&outcome.files), outcome.validation);
    }
}
