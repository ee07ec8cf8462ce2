//! Structural validator for generated scaffolds
//!
//! Parses every Python module of a
//! [`GeneratedFileSet`](nodeforge_model::GeneratedFileSet) with
//! tree-sitter and reports, without ever failing:
//!
//! - malformed sources (other files are still checked)
//! - lifecycle classes missing a stage for their base
//! - imports of deny-listed vendor SDKs
//! - weak placeholders: no marker, generic comments, unguided stages
//! - dangling action labels, unreachable nodes and a missing start node
//! - unparseable manifests and a design document without a diagram

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod design;
mod finding;
mod flow;
mod imports;
mod lifecycle;
mod manifest;
mod placeholders;
mod source;
mod validator;

pub use finding::{Finding, Severity, ValidationResult};
pub use flow::FLOW_MODULE;
pub use lifecycle::{base_flavour, StageFlavour, LIFECYCLE_BASES};
pub use manifest::is_requirement;
pub use placeholders::{expects_marker, is_generic_comment};
pub use source::SourceError;
pub use validator::{StructuralValidator, DESIGN_DOCUMENT};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
