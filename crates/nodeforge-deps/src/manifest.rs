//! Packaging manifest rendering
//!
//! `requirements.txt` is written by hand (one requirement per line);
//! `pyproject.toml` goes through the `toml` serializer so quoting is never
//! our problem.

use crate::config::DependencyConfig;
use crate::error::ResolveError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Project metadata for `pyproject.toml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    /// Distribution name (kebab-case)
    pub name: String,
    /// Project version
    pub version: String,
    /// One-line description
    pub description: String,
    /// `requires-python` specifier
    pub requires_python: String,
}

impl ProjectMeta {
    /// Create metadata with default version and interpreter range
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.1.0".to_string(),
            description: description.into(),
            requires_python: ">=3.9".to_string(),
        }
    }

    /// Set version
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set `requires-python`
    #[inline]
    #[must_use]
    pub fn with_requires_python(mut self, spec: impl Into<String>) -> Self {
        self.requires_python = spec.into();
        self
    }
}

#[derive(Serialize)]
struct PyProject<'a> {
    project: Project<'a>,
    tool: Tool,
}

#[derive(Serialize)]
struct Project<'a> {
    name: &'a str,
    version: &'a str,
    description: &'a str,
    #[serde(rename = "requires-python")]
    requires_python: &'a str,
    dependencies: Vec<String>,
    #[serde(rename = "optional-dependencies")]
    optional_dependencies: BTreeMap<&'static str, Vec<String>>,
}

#[derive(Serialize)]
struct Tool {
    pytest: Pytest,
}

#[derive(Serialize)]
struct Pytest {
    ini_options: IniOptions,
}

#[derive(Serialize)]
struct IniOptions {
    pythonpath: Vec<&'static str>,
    testpaths: Vec<&'static str>,
    asyncio_mode: &'static str,
}

impl DependencyConfig {
    /// Render runtime dependencies as `requirements.txt`
    #[must_use]
    pub fn to_requirements(&self) -> String {
        let mut out = String::from(
            "# Runtime dependencies, sorted by name.\n\
             # Optional extras and development tools live in pyproject.toml.\n",
        );
        for dep in &self.runtime {
            let _ = writeln!(out, "{}", dep.requirement());
        }
        out
    }

    /// Render `pyproject.toml`
    ///
    /// # Errors
    /// Returns [`ResolveError::Render`] if serialization fails
    pub fn to_pyproject(&self, meta: &ProjectMeta) -> Result<String, ResolveError> {
        let mut optional_dependencies = BTreeMap::new();
        if !self.optional.is_empty() {
            optional_dependencies.insert("extras", self.optional.iter().map(|d| d.requirement()).collect());
        }
        if !self.dev.is_empty() {
            optional_dependencies.insert("dev", self.dev.iter().map(|d| d.requirement()).collect());
        }

        let document = PyProject {
            project: Project {
                name: &meta.name,
                version: &meta.version,
                description: &meta.description,
                requires_python: &meta.requires_python,
                dependencies: self.runtime.iter().map(|d| d.requirement()).collect(),
                optional_dependencies,
            },
            tool: Tool {
                pytest: Pytest {
                    ini_options: IniOptions {
                        pythonpath: vec!["."],
                        testpaths: vec!["tests"],
                        asyncio_mode: "auto",
                    },
                },
            },
        };

        Ok(toml::to_string(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeforge_model::{DependencySet, DependencySpec, Pattern};
    use pretty_assertions::assert_eq;

    fn sample() -> DependencyConfig {
        DependencyConfig::for_pattern(
            Pattern::Rag,
            &DependencySet {
                runtime: vec![
                    DependencySpec::new("pydantic", ">=2.0"),
                    DependencySpec::new("numpy", ">=1.24"),
                ],
                optional: vec![DependencySpec::new("faiss-cpu", ">=1.7.4")],
                dev: vec![DependencySpec::new("pytest", ">=7.4")],
            },
        )
    }

    #[test]
    fn requirements_are_sorted_after_header() {
        let text = sample().to_requirements();
        let lines: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(lines, vec!["numpy>=1.24", "pydantic>=2.0"]);
        assert!(text.starts_with("# Runtime dependencies"));
    }

    #[test]
    fn pyproject_round_trips_through_toml() {
        let meta = ProjectMeta::new("order-flow", "Say \"hi\"\nto orders").with_version("0.2.0");
        let text = sample().to_pyproject(&meta).unwrap();
        let parsed: toml::Value = toml::from_str(&text).unwrap();

        let project = &parsed["project"];
        assert_eq!(project["name"].as_str(), Some("order-flow"));
        assert_eq!(project["version"].as_str(), Some("0.2.0"));
        assert_eq!(project["description"].as_str(), Some("Say \"hi\"\nto orders"));
        assert_eq!(project["requires-python"].as_str(), Some(">=3.9"));
        assert_eq!(
            project["dependencies"].as_array().unwrap().len(),
            2
        );
        assert_eq!(
            project["optional-dependencies"]["extras"][0].as_str(),
            Some("faiss-cpu>=1.7.4")
        );
        assert_eq!(
            parsed["tool"]["pytest"]["ini_options"]["asyncio_mode"].as_str(),
            Some("auto")
        );
    }

    #[test]
    fn empty_groups_are_omitted() {
        let config = DependencyConfig::for_pattern(
            Pattern::Workflow,
            &DependencySet {
                runtime: vec![DependencySpec::new("pocketflow", ">=0.0.1")],
                ..DependencySet::default()
            },
        );
        let parsed: toml::Value = toml::from_str(&config.to_pyproject(&ProjectMeta::new("x", "")).unwrap()).unwrap();
        let groups = parsed["project"]
            .get("optional-dependencies")
            .and_then(toml::Value::as_table);
        assert!(groups.map_or(true, |table| table.is_empty()));
    }
}
