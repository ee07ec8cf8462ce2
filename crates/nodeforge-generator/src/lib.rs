//! Scaffold generator
//!
//! Turns a [`WorkflowSpec`](nodeforge_model::WorkflowSpec) into a complete
//! Python project for the `pocketflow` graph-of-nodes framework: data
//! models, node classes, flow wiring, utilities, an optional HTTP layer,
//! tests, a design document and manifests. Output is a pure function of
//! the spec, the knowledge tables and the [`GeneratorConfig`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod generator;
pub mod graph;
pub mod heuristics;
pub mod naming;
mod plan;
pub mod profile;
mod python;
mod templates;

pub use config::GeneratorConfig;
pub use error::GenerateError;
pub use generator::{check_core, Generation, ScaffoldGenerator, API_FILES, CORE_FILES};
pub use graph::{Edge, EdgeOrigin, FlowGraph, DEFAULT_LABEL, RETRY_LABEL};
pub use heuristics::{guidance_for, NodeGuidance, NodeRole};
pub use profile::{profile, PatternProfile, UtilityStub};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
