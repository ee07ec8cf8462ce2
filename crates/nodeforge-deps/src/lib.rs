//! Nodeforge Deps
//!
//! Maps architecture patterns to runtime, optional and development
//! dependencies, merges multi-pattern requests, and renders the packaging
//! manifests of a generated project.
//!
//! # Merge rule
//!
//! Same-name entries collapse to one; the lexicographically greater
//! constraint survives and the decision is kept as a [`ResolutionNote`].
//! A name that is a runtime dependency anywhere is a runtime dependency
//! only.
//!
//! # Example
//!
//! ```rust,ignore
//! use nodeforge_deps::{DependencyResolver, ProjectMeta};
//!
//! let resolver = DependencyResolver::new(DependencyTable::builtin()?);
//! let config = resolver.resolve_names(&["RAG", "AGENT"])?;
//! let requirements = config.to_requirements();
//! let pyproject = config.to_pyproject(&ProjectMeta::new("order-flow", "..."))?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod manifest;
mod resolver;

pub use config::{DependencyCategory, DependencyConfig, ResolutionNote};
pub use error::ResolveError;
pub use manifest::ProjectMeta;
pub use resolver::DependencyResolver;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
