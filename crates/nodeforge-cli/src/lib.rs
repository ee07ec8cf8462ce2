//! Nodeforge CLI
//!
//! `generate` writes a scaffold for a specification document, `classify`
//! ranks patterns, `validate` checks a project tree on disk. Exit status is
//! 0 on success, 1 when validation reported errors and 2 when the command
//! could not run.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod args;
mod commands;
mod files;

pub use args::{Cli, Command};
pub use commands::{run, Status};
pub use files::{read_file_set, write_file_set};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
