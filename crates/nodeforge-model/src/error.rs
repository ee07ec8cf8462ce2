//! Error types for the model crate
//!
//! - [`SpecError`]: malformed or schema-violating specifications
//! - [`KnowledgeError`]: malformed knowledge tables

/// Input error in a workflow specification
///
/// Every variant except [`SpecError::Syntax`] names the offending field
/// using a path such as `nodes[2].type`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// Document could not be parsed at all
    #[error("malformed specification document: {0}")]
    Syntax(String),

    /// Required field absent or blank
    #[error("{field}: required field is missing")]
    Missing { field: String },

    /// Field present but unusable
    #[error("{field}: invalid value '{value}': {reason}")]
    Invalid {
        field: String,
        value: String,
        reason: String,
    },

    /// Name repeated where names must be unique
    #[error("{field}: duplicate name '{value}'")]
    Duplicate { field: String, value: String },
}

impl SpecError {
    /// Create an invalid-value error
    pub fn invalid(field: impl Into<String>, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Field path the error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Syntax(_) => None,
            Self::Missing { field } | Self::Invalid { field, .. } | Self::Duplicate { field, .. } => {
                Some(field.as_str())
            }
        }
    }
}

/// Configuration error in a knowledge table
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// Table text is not valid YAML or has the wrong shape
    #[error("{table}: malformed table: {source}")]
    Malformed {
        table: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    /// Pattern name not in the closed enumeration
    #[error("{table}: unknown pattern '{value}'")]
    UnknownPattern { table: &'static str, value: String },

    /// Indicator weight zero, negative, or not finite
    #[error("indicators: weight {weight} for {pattern} must be a positive finite number")]
    InvalidWeight { pattern: String, weight: f64 },

    /// Indicator without keywords or with a blank keyword
    #[error("indicators: entry for {pattern} has an empty keyword")]
    EmptyKeyword { pattern: String },

    /// Same keyword listed under two patterns
    #[error("indicators: keyword '{keyword}' is claimed by both {first} and {second}")]
    AmbiguousKeyword {
        keyword: String,
        first: String,
        second: String,
    },

    /// A pattern has no dependency entry
    #[error("dependencies: no entry for pattern {0}")]
    MissingPattern(String),

    /// Dependency entry without a name or constraint
    #[error("dependencies: {pattern}: entry '{name}' is incomplete")]
    IncompleteDependency { pattern: String, name: String },

    /// Deny-list entry that is not a dotted module name
    #[error("deny_list: '{0}' is not a dotted module name")]
    InvalidModule(String),
}
