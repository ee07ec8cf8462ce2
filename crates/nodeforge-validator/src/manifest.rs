//! Packaging manifest checks

use crate::finding::{Finding, Severity, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

static REQUIREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?(?:\[[A-Za-z0-9._,\s-]+\])?\s*(?:(?:===|==|!=|<=|>=|~=|<|>)\s*[A-Za-z0-9.*+!_-]+(?:\s*,\s*(?:===|==|!=|<=|>=|~=|<|>)\s*[A-Za-z0-9.*+!_-]+)*)?\s*(?:;.+)?$",
    )
    .expect("requirement pattern is valid")
});

/// Whether one `requirements.txt` line is a requirement specifier
#[must_use]
pub fn is_requirement(line: &str) -> bool {
    REQUIREMENT.is_match(line.trim())
}

/// `pyproject.toml`: must be TOML with a named `[project]`
pub(crate) fn check_pyproject(file: &str, text: &str, result: &mut ValidationResult) {
    let document: toml::Table = match toml::from_str(text) {
        Ok(document) => document,
        Err(e) => {
            let finding = Finding::new(file, format!("invalid TOML: {}", e.message()));
            let finding = match e.span() {
                Some(span) => finding.at(line_at(text, span.start)),
                None => finding,
            };
            result.push(Severity::Error, finding);
            return;
        }
    };

    let project = document.get("project").and_then(toml::Value::as_table);
    let Some(project) = project else {
        result.push(Severity::Error, Finding::new(file, "missing [project] table"));
        return;
    };
    if project.get("name").and_then(toml::Value::as_str).is_none() {
        result.push(Severity::Error, Finding::new(file, "[project] has no name"));
    }

    let dependencies = project
        .get("dependencies")
        .and_then(toml::Value::as_array)
        .map_or(&[][..], Vec::as_slice);
    for dependency in dependencies {
        match dependency.as_str() {
            Some(spec) if is_requirement(spec) => {}
            _ => result.push(
                Severity::Error,
                Finding::new(file, format!("dependency {dependency} is not a requirement specifier")),
            ),
        }
    }
    result.push(
        Severity::Info,
        Finding::new(file, format!("{} runtime dependencies declared", dependencies.len())),
    );
}

/// `requirements.txt`: every non-comment line a requirement specifier
pub(crate) fn check_requirements(file: &str, text: &str, result: &mut ValidationResult) {
    let mut count = 0;
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split_once(" #").map_or(raw, |(before, _)| before).trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if is_requirement(line) {
            count += 1;
        } else {
            result.push(
                Severity::Error,
                Finding::new(file, format!("'{line}' is not a requirement specifier")).at(index + 1),
            );
        }
    }
    result.push(Severity::Info, Finding::new(file, format!("{count} requirements listed")));
}

fn line_at(text: &str, offset: usize) -> usize {
    text.get(..offset).map_or(1, |before| before.matches('\n').count() + 1)
}
