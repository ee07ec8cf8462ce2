//! Structural validator

use crate::design::{self, DesignOutline};
use crate::finding::{Finding, Severity, ValidationResult};
use crate::flow::{self, FLOW_MODULE};
use crate::imports;
use crate::lifecycle;
use crate::manifest;
use crate::placeholders;
use crate::source::{ClassOutline, Outline, PythonSource};
use nodeforge_model::{GeneratedFileSet, KnowledgeBase};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Path of the design document
pub const DESIGN_DOCUMENT: &str = "docs/design.md";

/// Read-only checks over a generated file set
///
/// Never mutates its input and never fails: every problem, including
/// unparseable files, is a finding in the returned [`ValidationResult`].
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    knowledge: Arc<KnowledgeBase>,
}

impl StructuralValidator {
    /// Create a validator over shared knowledge tables
    #[inline]
    #[must_use]
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    /// Knowledge tables the deny-list comes from
    #[inline]
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Validate every file of the set
    #[tracing::instrument(skip_all, fields(files = files.len()))]
    pub fn validate(&self, files: &GeneratedFileSet) -> ValidationResult {
        let mut result = ValidationResult::default();
        let mut outlines: BTreeMap<String, Outline> = BTreeMap::new();
        let mut design: Option<DesignOutline> = None;
        let mut complete = true;

        for (path, content) in files {
            let file = path.to_string();
            if path.is_python() {
                match PythonSource::parse(content) {
                    Ok(source) => {
                        let outline = source.outline();
                        let classes = lifecycle::check(&file, &outline, &mut result);
                        imports::check(&file, &outline, self.knowledge.deny_list(), &mut result);
                        placeholders::check(path, &outline, &mut result);
                        result.push(
                            Severity::Info,
                            Finding::new(
                                &file,
                                format!(
                                    "{classes} lifecycle classes checked, {} imports, {} not-implemented markers",
                                    outline.imports.len(),
                                    outline.markers
                                ),
                            ),
                        );
                        outlines.insert(file, outline);
                    }
                    Err(e) => {
                        complete = false;
                        let finding = Finding::new(&file, format!("malformed source: {e}"));
                        result.push(
                            Severity::Error,
                            match e.line() {
                                Some(line) => finding.at(line),
                                None => finding,
                            },
                        );
                    }
                }
                continue;
            }

            match file.as_str() {
                "pyproject.toml" => manifest::check_pyproject(&file, content, &mut result),
                "requirements.txt" => manifest::check_requirements(&file, content, &mut result),
                DESIGN_DOCUMENT => design = Some(design::check(&file, content, &mut result)),
                _ => result.push(Severity::Info, Finding::new(&file, "not a source file; skipped")),
            }
        }

        check_flow(files, &outlines, design.as_ref(), complete, &mut result);

        result.sort_by_file();
        tracing::info!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            info = result.info.len(),
            "validation finished"
        );
        result
    }
}

fn check_flow(
    files: &GeneratedFileSet,
    outlines: &BTreeMap<String, Outline>,
    design: Option<&DesignOutline>,
    complete: bool,
    result: &mut ValidationResult,
) {
    let Some(wiring) = outlines.get(FLOW_MODULE).map(|o| &o.wiring) else {
        if !files.contains(FLOW_MODULE) {
            result.push(
                Severity::Warning,
                Finding::new(FLOW_MODULE, "no flow module in the file set; flow checks skipped"),
            );
        }
        return;
    };

    let classes: HashMap<&str, &ClassOutline> = outlines
        .values()
        .flat_map(|o| o.classes.iter())
        .filter(|c| lifecycle::lifecycle_base(c).is_some())
        .map(|c| (c.name.as_str(), c))
        .collect();

    let summary = flow::check(FLOW_MODULE, wiring, &classes, complete, result);
    result.push(
        Severity::Info,
        Finding::new(
            FLOW_MODULE,
            format!(
                "{} nodes, {} transitions, {} reachable from start",
                summary.nodes, summary.transitions, summary.reachable
            ),
        ),
    );

    if let Some(design) = design.filter(|d| !d.diagrams.is_empty()) {
        for instance in &wiring.instances {
            if !design.shows(&instance.class) && !design.shows(&instance.var) {
                result.push(
                    Severity::Warning,
                    Finding::new(
                        DESIGN_DOCUMENT,
                        format!("diagram does not show node {} from {FLOW_MODULE}", instance.class),
                    ),
                );
            }
        }
    }
}
