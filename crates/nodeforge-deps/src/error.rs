//! Resolver errors

use nodeforge_model::Pattern;

/// Failure resolving or rendering dependencies
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Pattern name outside the closed enumeration
    #[error("unknown pattern '{0}' in dependency request")]
    UnknownPattern(String),

    /// Dependency table has no entry for a known pattern
    #[error("dependency table has no entry for {0}")]
    MissingTable(Pattern),

    /// Manifest could not be serialized
    #[error("failed to render pyproject.toml: {0}")]
    Render(#[from] toml::ser::Error),
}
