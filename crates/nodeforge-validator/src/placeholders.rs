//! Placeholder quality heuristics
//!
//! All findings here are warnings.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::source::Outline;
use nodeforge_model::RelativePath;
use once_cell::sync::Lazy;
use regex::Regex;

static GENERIC_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^#+\s*(?:(?:todo|fixme|xxx)\b[\s:.!-]*$|(?:todo|fixme|xxx)\s*:?\s*(?:implement(?:\s+(?:this|me|here))?|add\s+code(?:\s+here)?)\W*$|implement\s+(?:this|me|here)\W*$|your\s+code\s+here\W*$|add\s+(?:your\s+)?code\s+here\W*$|placeholder\W*$)",
    )
    .expect("generic comment pattern is valid")
});

/// Modules whose bodies are placeholders and must carry a marker
const PLACEHOLDER_MODULES: [&str; 4] = ["nodes.py", "utils.py", "main.py", "api.py"];

/// Whether a module should contain at least one "not implemented" marker
#[must_use]
pub fn expects_marker(path: &RelativePath) -> bool {
    match path.segments() {
        [single] => PLACEHOLDER_MODULES.contains(&single.as_str()),
        [dir, file] => dir == "tests" && file.starts_with("test_") && path.is_python(),
        _ => false,
    }
}

/// Whether a comment is a generic, non-descriptive placeholder
#[must_use]
pub fn is_generic_comment(comment: &str) -> bool {
    GENERIC_COMMENT.is_match(comment.trim())
}

pub(crate) fn check(path: &RelativePath, outline: &Outline, result: &mut ValidationResult) {
    let file = path.to_string();
    if expects_marker(path) && outline.markers == 0 {
        result.push(
            Severity::Warning,
            Finding::new(
                &file,
                "no \"not implemented\" marker; placeholder bodies should raise NotImplementedError or skip with a reason",
            ),
        );
    }

    for (line, comment) in &outline.comments {
        if is_generic_comment(comment) {
            result.push(
                Severity::Warning,
                Finding::new(
                    &file,
                    format!("generic placeholder comment `{}`; say what has to be implemented", comment.trim()),
                )
                .at(*line),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_comments() {
        for comment in ["# TODO", "# todo: implement", "# FIXME!", "# your code here", "# Implement this", "# placeholder"] {
            assert!(is_generic_comment(comment), "{comment}");
        }
        for comment in [
            "# TODO: query the order index with the embedding",
            "# read the request from shared state",
            "# implement retries with backoff for the search call",
        ] {
            assert!(!is_generic_comment(comment), "{comment}");
        }
    }

    #[test]
    fn marker_expectations() {
        let expects = |p: &str| expects_marker(&p.parse().unwrap());
        assert!(expects("nodes.py"));
        assert!(expects("tests/test_flow.py"));
        assert!(!expects("models.py"));
        assert!(!expects("flow.py"));
        assert!(!expects("tests/conftest.py"));
        assert!(!expects("pkg/nodes.py"));
    }
}
