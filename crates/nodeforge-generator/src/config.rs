//! Generator configuration

use serde::{Deserialize, Serialize};

/// Knobs that shape generated packaging and imports
///
/// Loadable from TOML; absent keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// `requires-python` of the generated project
    pub python_requires: String,
    /// Version written to `pyproject.toml`
    pub project_version: String,
    /// Python package the lifecycle bases are imported from
    pub framework_package: String,
}

impl GeneratorConfig {
    /// Create config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With `requires-python`
    #[inline]
    #[must_use]
    pub fn with_python_requires(mut self, spec: impl Into<String>) -> Self {
        self.python_requires = spec.into();
        self
    }

    /// With project version
    #[inline]
    #[must_use]
    pub fn with_project_version(mut self, version: impl Into<String>) -> Self {
        self.project_version = version.into();
        self
    }

    /// With framework package
    #[inline]
    #[must_use]
    pub fn with_framework_package(mut self, package: impl Into<String>) -> Self {
        self.framework_package = package.into();
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            python_requires: ">=3.9".to_string(),
            project_version: "0.1.0".to_string(),
            framework_package: "pocketflow".to_string(),
        }
    }
}
