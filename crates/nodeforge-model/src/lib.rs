//! Nodeforge Model
//!
//! Shared data model for the scaffold pipeline.
//!
//! # Core Concepts
//!
//! - [`WorkflowSpec`]: validated input specification (nodes, utilities, endpoints)
//! - [`Pattern`] / [`NodeType`]: closed enumerations of architecture and node variant
//! - [`KnowledgeBase`]: indicator, dependency and deny-list tables
//! - [`GeneratedFileSet`]: path-ordered mapping of relative path to content
//! - [`ContentHash`]: 32-byte Blake3 fingerprint of generated output
//!
//! # Example
//!
//! ```rust,ignore
//! use nodeforge_model::{WorkflowSpec, KnowledgeBase};
//!
//! let spec = WorkflowSpec::from_yaml_str(text)?;
//! let knowledge = KnowledgeBase::builtin()?;
//! println!("{} nodes", spec.nodes.len());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod error;
mod file_set;
mod hash;
mod knowledge;
mod path;
mod pattern;
mod spec;

// Re-exports
pub use error::{KnowledgeError, SpecError};
pub use file_set::{FileSetError, GeneratedFileSet};
pub use hash::{ContentHash, ContentHasher, HashError};
pub use knowledge::{
    DeniedModule, DenyList, DependencySet, DependencySpec, DependencyTable, IndicatorTable,
    KnowledgeBase, PatternIndicator,
};
pub use path::{PathError, RelativePath};
pub use pattern::{NodeType, Pattern, UnknownVariant};
pub use spec::{
    EndpointSpec, HttpMethod, NodeSpec, RawEndpointSpec, RawNodeSpec, RawWorkflowSpec, ShapeRef,
    UtilitySpec, WorkflowSpec,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
