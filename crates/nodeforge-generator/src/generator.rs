//! Scaffold generation
//!
//! All-or-nothing: the spec is checked, a [`Blueprint`] is planned, every
//! template is rendered into a fresh file set, and the set is checked
//! against the minimum core before it is handed out. Any failure returns
//! an error and drops whatever was built so far.

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::plan::Blueprint;
use crate::templates::{api, design, entry, flow, models, nodes, test_modules, utils};
use nodeforge_classifier::{PatternClassifier, PatternRecommendation};
use nodeforge_deps::{DependencyConfig, DependencyResolver, ProjectMeta};
use nodeforge_model::{GeneratedFileSet, Pattern, WorkflowSpec};
use std::collections::BTreeSet;

/// Files every generation emits
pub const CORE_FILES: [&str; 13] = [
    "docs/design.md",
    "models.py",
    "nodes.py",
    "flow.py",
    "utils.py",
    "main.py",
    "tests/test_models.py",
    "tests/test_nodes.py",
    "tests/test_flow.py",
    "tests/test_utils.py",
    "tests/test_main.py",
    "requirements.txt",
    "pyproject.toml",
];

/// Files added when the spec declares endpoints
pub const API_FILES: [&str; 2] = ["api.py", "tests/test_api.py"];

/// Everything one generation produced
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Pattern the files were generated for
    pub pattern: Pattern,
    /// Ranked recommendations (a single entry when the pattern was pinned)
    pub recommendations: Vec<PatternRecommendation>,
    /// Resolved dependencies, HTTP set included when applicable
    pub dependencies: DependencyConfig,
    /// Generated files
    pub files: GeneratedFileSet,
}

/// Specification to file-set generator
#[derive(Debug, Clone)]
pub struct ScaffoldGenerator {
    classifier: PatternClassifier,
    resolver: DependencyResolver,
    config: GeneratorConfig,
}

impl ScaffoldGenerator {
    /// Create a generator
    #[inline]
    #[must_use]
    pub fn new(classifier: PatternClassifier, resolver: DependencyResolver, config: GeneratorConfig) -> Self {
        Self {
            classifier,
            resolver,
            config,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the file set for a spec
    ///
    /// # Errors
    /// [`GenerateError::Input`] for unusable specs; other variants signal
    /// generator defects
    pub fn generate(&self, spec: &WorkflowSpec) -> Result<GeneratedFileSet, GenerateError> {
        self.generate_detailed(spec).map(|generation| generation.files)
    }

    /// Generate, keeping classification and dependency results
    ///
    /// # Errors
    /// Same as [`ScaffoldGenerator::generate`]
    #[tracing::instrument(skip(self, spec), fields(spec = %spec.name))]
    pub fn generate_detailed(&self, spec: &WorkflowSpec) -> Result<Generation, GenerateError> {
        spec.check_invariants()?;

        let recommendations = self.classifier.classify(&spec.description, spec.pattern);
        let pattern = spec
            .pattern
            .or_else(|| recommendations.first().map(|r| r.pattern))
            .unwrap_or(Pattern::Workflow);

        let mut dependencies = self.resolver.resolve(&BTreeSet::from([pattern]))?;
        if !spec.api_endpoints.is_empty() {
            dependencies = self.resolver.with_http(&dependencies);
        }

        let blueprint = Blueprint::build(spec, &self.config, &recommendations, &dependencies)?;
        let files = self.render(&blueprint)?;
        check_core(&files, blueprint.has_api())?;

        tracing::info!(
            %pattern,
            files = files.len(),
            shapes = blueprint.shapes.len(),
            bytes = files.total_bytes(),
            fingerprint = %files.fingerprint().short(),
            "scaffold generated"
        );

        Ok(Generation {
            pattern,
            recommendations,
            dependencies,
            files,
        })
    }

    fn render(&self, bp: &Blueprint<'_>) -> Result<GeneratedFileSet, GenerateError> {
        let mut files = GeneratedFileSet::new();

        files.insert_str("docs/design.md", design::render(bp))?;
        files.insert_str("models.py", models::render(bp))?;
        files.insert_str("nodes.py", nodes::render(bp))?;
        files.insert_str("flow.py", flow::render(bp))?;
        files.insert_str("utils.py", utils::render(bp))?;
        files.insert_str("main.py", entry::render(bp))?;

        files.insert_str("tests/test_models.py", test_modules::models(bp))?;
        files.insert_str("tests/test_nodes.py", test_modules::nodes(bp))?;
        files.insert_str("tests/test_flow.py", test_modules::flow(bp))?;
        files.insert_str("tests/test_utils.py", test_modules::utils(bp))?;
        files.insert_str("tests/test_main.py", test_modules::main(bp))?;

        if bp.has_api() {
            files.insert_str("api.py", api::render(bp))?;
            files.insert_str("tests/test_api.py", test_modules::api(bp))?;
        }

        let meta = ProjectMeta::new(bp.project.kebab.clone(), project_description(bp))
            .with_version(self.config.project_version.clone())
            .with_requires_python(self.config.python_requires.clone());
        files.insert_str("requirements.txt", bp.dependencies.to_requirements())?;
        files.insert_str("pyproject.toml", bp.dependencies.to_pyproject(&meta)?)?;

        Ok(files)
    }
}

fn project_description(bp: &Blueprint<'_>) -> String {
    let folded = crate::python::comment_text(&bp.spec.description);
    if folded.is_empty() {
        format!("{} application", bp.project.title)
    } else {
        folded
    }
}

/// Minimum-core check over a finished file set
///
/// # Errors
/// Returns [`GenerateError::Invariant`] naming the first missing file
pub fn check_core(files: &GeneratedFileSet, with_api: bool) -> Result<(), GenerateError> {
    let required = CORE_FILES
        .iter()
        .chain(if with_api { API_FILES.iter() } else { [].iter() });
    for path in required {
        if !files.contains(path) {
            return Err(GenerateError::Invariant(format!("missing core file {path}")));
        }
    }

    for (path, _) in files {
        if path.is_python() && path.segments().len() == 1 {
            let test = format!("tests/test_{}.py", path.file_stem());
            if !files.contains(&test) {
                return Err(GenerateError::Invariant(format!("{path} has no test module {test}")));
            }
        }
    }
    Ok(())
}
