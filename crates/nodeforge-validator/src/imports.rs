//! Import hygiene against the vendor SDK deny-list

use crate::finding::{Finding, Severity, ValidationResult};
use crate::source::Outline;
use nodeforge_model::DenyList;

/// Report every import of a denied module
///
/// Matching is on the imported module name only, so a string or a
/// variable that happens to mention a vendor is never flagged.
pub(crate) fn check(file: &str, outline: &Outline, deny: &DenyList, result: &mut ValidationResult) {
    for import in &outline.imports {
        if let Some(entry) = deny.find(&import.module) {
            tracing::debug!(file, module = %import.module, "denied import");
            result.push(
                Severity::Error,
                Finding::new(
                    file,
                    format!(
                        "imports denied module '{}' ({}); generated scaffolds must not depend on vendor SDKs",
                        import.module, entry.category
                    ),
                )
                .at(import.line),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PythonSource;

    fn run(source: &str) -> ValidationResult {
        let outline = PythonSource::parse(source).unwrap().outline();
        let mut result = ValidationResult::default();
        check("utils.py", &outline, &DenyList::builtin().unwrap(), &mut result);
        result
    }

    #[test]
    fn flags_plain_and_from_imports() {
        let result = run("import os\nimport boto3\nfrom google.cloud import storage\n");
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].line, Some(2));
        assert!(result.errors[0].message.contains("'boto3'"));
        assert!(result.errors[1].message.contains("'google.cloud.storage'"));
    }

    #[test]
    fn importing_a_denied_package_from_its_parent_is_flagged() {
        let result = run("from google import cloud
from google import protobuf
from boto3 import *
");
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].line, Some(1));
        assert!(result.errors[0].message.contains("'google.cloud'"));
        assert_eq!(result.errors[1].line, Some(3));
        assert!(result.errors[1].message.contains("'boto3'"));
    }

    #[test]
    fn prefix_must_end_at_a_segment() {
        let result = run("import dockerfile_parse\nimport google.protobuf\nimport docker.types\n");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("'docker.types'"));
    }

    #[test]
    fn mentions_outside_imports_are_fine() {
        let result = run("NOTE = \"do not use boto3 here\"\nboto3 = None\n");
        assert!(result.is_empty());
    }
}
