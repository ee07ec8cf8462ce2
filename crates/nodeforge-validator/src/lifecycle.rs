//! Lifecycle stage checks for node classes

use crate::finding::{Finding, Severity, ValidationResult};
use crate::source::{ClassOutline, Outline};

/// Stage-name flavour of a lifecycle base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageFlavour {
    /// `prep` / `exec` / `post`
    Sync,
    /// `prep_async` / `exec_async` / `post_async`, declared `async def`
    Async,
}

impl StageFlavour {
    /// Required stage names, in lifecycle order
    #[inline]
    #[must_use]
    pub fn stages(&self) -> [&'static str; 3] {
        match self {
            StageFlavour::Sync => ["prep", "exec", "post"],
            StageFlavour::Async => ["prep_async", "exec_async", "post_async"],
        }
    }
}

/// Recognised framework base classes
pub const LIFECYCLE_BASES: [(&str, StageFlavour); 5] = [
    ("Node", StageFlavour::Sync),
    ("BatchNode", StageFlavour::Sync),
    ("AsyncNode", StageFlavour::Async),
    ("AsyncBatchNode", StageFlavour::Async),
    ("AsyncParallelBatchNode", StageFlavour::Async),
];

/// Flavour of a base class name, if it is a lifecycle base
#[must_use]
pub fn base_flavour(base: &str) -> Option<StageFlavour> {
    LIFECYCLE_BASES
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, flavour)| *flavour)
}

/// First lifecycle base of a class
pub(crate) fn lifecycle_base(class: &ClassOutline) -> Option<(&str, StageFlavour)> {
    class
        .bases
        .iter()
        .find_map(|base| base_flavour(base).map(|flavour| (base.as_str(), flavour)))
}

/// Check every lifecycle class of one module; returns how many were checked
pub(crate) fn check(file: &str, outline: &Outline, result: &mut ValidationResult) -> usize {
    let mut checked = 0;
    for class in &outline.classes {
        let Some((base, flavour)) = lifecycle_base(class) else {
            continue;
        };
        checked += 1;

        for stage in flavour.stages() {
            let Some(method) = class.method(stage) else {
                result.push(
                    Severity::Error,
                    Finding::new(file, format!("class {} ({base}) is missing lifecycle stage {stage}", class.name))
                        .at(class.line),
                );
                continue;
            };

            let wants_async = flavour == StageFlavour::Async;
            if method.is_async != wants_async {
                let expected = if wants_async { "async def" } else { "def" };
                result.push(
                    Severity::Error,
                    Finding::new(file, format!("{}.{stage} must be declared with `{expected}` for {base}", class.name))
                        .at(method.line),
                );
            }
            if !method.has_guidance {
                result.push(
                    Severity::Warning,
                    Finding::new(file, format!("{}.{stage} has no guidance docstring or comment", class.name))
                        .at(method.line),
                );
            }
            if !method.has_marker {
                result.push(
                    Severity::Warning,
                    Finding::new(file, format!("{}.{stage} has no \"not implemented\" marker", class.name))
                        .at(method.line),
                );
            }
        }
    }
    checked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PythonSource;

    fn run(source: &str) -> ValidationResult {
        let outline = PythonSource::parse(source).unwrap().outline();
        let mut result = ValidationResult::default();
        check("nodes.py", &outline, &mut result);
        result
    }

    #[test]
    fn missing_async_stage_is_an_error() {
        let result = run(r#"
class Fetch(AsyncNode):
    async def prep_async(self, shared):
        """Read."""
        raise NotImplementedError("prep")

    async def exec(self, prep_res):
        """Wrong name."""
        raise NotImplementedError("exec")

    async def post_async(self, shared, prep_res, exec_res):
        """Write."""
        raise NotImplementedError("post")
"#);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("missing lifecycle stage exec_async"));
        assert_eq!(result.errors[0].line, Some(2));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn sync_stage_declared_async_is_an_error() {
        let result = run(r#"
class Load(pocketflow.Node):
    def prep(self, shared):
        """Read."""
        raise NotImplementedError("prep")

    async def exec(self, prep_res):
        """Compute."""
        raise NotImplementedError("exec")

    def post(self, shared, prep_res, exec_res):
        """Write."""
        raise NotImplementedError("post")
"#);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("Load.exec must be declared with `def`"));
    }

    #[test]
    fn bare_stages_are_warned_about() {
        let result = run(r"
class Load(BatchNode):
    def prep(self, shared):
        return []

    def exec(self, item):
        return item

    def post(self, shared, prep_res, exec_res):
        return None
");
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 6);
    }

    #[test]
    fn other_classes_are_ignored() {
        let result = run("class Helper(object):\n    pass\n");
        assert!(result.is_empty());
    }
}
