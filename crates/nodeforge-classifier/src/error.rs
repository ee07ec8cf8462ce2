//! Classifier errors

/// Failure building a classifier from an indicator table
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// A keyword could not be compiled into a matcher
    #[error("indicator keyword '{keyword}' for {pattern} is unusable: {source}")]
    Keyword {
        pattern: String,
        keyword: String,
        #[source]
        source: regex::Error,
    },
}
