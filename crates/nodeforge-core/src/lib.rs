//! Nodeforge Core - the scaffolding pipeline
//!
//! Ties the four stages together: the pattern classifier ranks patterns,
//! the dependency resolver picks packages, the generator renders the file
//! set and the structural validator checks it. The pipeline never touches
//! the filesystem; writing the files is the caller's job.
//!
//! # Example
//!
//! ```rust,ignore
//! use nodeforge_core::Scaffolder;
//! use nodeforge_model::WorkflowSpec;
//!
//! let scaffolder = Scaffolder::with_builtin_tables()?;
//! let spec = WorkflowSpec::from_yaml_str(&std::fs::read_to_string("spec.yaml")?)?;
//! let outcome = scaffolder.scaffold(&spec)?;
//! assert!(outcome.is_usable());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod scaffolder;

pub use error::ScaffoldError;
pub use scaffolder::{ScaffoldOutcome, Scaffolder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
