//! Nodeforge Classifier
//!
//! Recommends an architecture pattern for a free-text description by
//! accumulating weighted keyword hits from an [`IndicatorTable`].
//!
//! The table is passed in explicitly; there is no global registry.
//!
//! # Example
//!
//! ```rust,ignore
//! use nodeforge_classifier::PatternClassifier;
//! use nodeforge_model::IndicatorTable;
//!
//! let classifier = PatternClassifier::new(&IndicatorTable::builtin()?)?;
//! let ranked = classifier.classify("retrieve similar past orders", None);
//! println!("{} ({:.2})", ranked[0].pattern, ranked[0].confidence);
//! ```
//!
//! [`IndicatorTable`]: nodeforge_model::IndicatorTable

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod classifier;
mod error;
mod matcher;

pub use classifier::{
    PatternClassifier, PatternRecommendation, DECLARED_RATIONALE, FALLBACK_RATIONALE,
};
pub use error::ClassifierError;
pub use matcher::KeywordMatcher;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
