//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scaffold graph-of-nodes LLM applications from a workflow specification
#[derive(Debug, Parser)]
#[command(name = "nodeforge", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding indicators.yaml, dependencies.yaml and/or
    /// deny_list.yaml; each file present replaces the built-in table
    #[arg(long, global = true, value_name = "DIR")]
    pub tables: Option<PathBuf>,

    /// Generator configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a project from a specification and validate it
    Generate {
        /// Specification document (.yaml, .yml or .json)
        spec: PathBuf,

        /// Directory the project is written to
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Overwrite files that already exist
        #[arg(long)]
        force: bool,
    },

    /// Rank architecture patterns for a specification or a description
    Classify {
        /// Specification document; its pinned pattern is honoured
        #[arg(required_unless_present = "description")]
        spec: Option<PathBuf>,

        /// Free-text requirements instead of a document
        #[arg(short, long, conflicts_with = "spec")]
        description: Option<String>,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a generated project directory
    Validate {
        /// Project root
        dir: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}
