//! Architecture patterns and node variants
//!
//! Both are closed enumerations. Parsing is lenient about case and
//! separators so that hand-written specification documents round-trip.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Architectural shape of a generated application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pattern {
    /// Fixed sequence of steps
    Workflow,
    /// Single call out to an external tool or API
    Tool,
    /// Decision loop choosing its next action
    Agent,
    /// Retrieval-augmented generation
    Rag,
    /// Split, process in batch, combine
    #[serde(rename = "MAPREDUCE")]
    MapReduce,
    /// Several cooperating agents
    MultiAgent,
    /// Extraction into a typed schema
    StructuredOutput,
}

impl Pattern {
    /// Every pattern, in declaration order
    pub const ALL: [Pattern; 7] = [
        Pattern::Workflow,
        Pattern::Tool,
        Pattern::Agent,
        Pattern::Rag,
        Pattern::MapReduce,
        Pattern::MultiAgent,
        Pattern::StructuredOutput,
    ];

    /// Canonical upper-case name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Workflow => "WORKFLOW",
            Pattern::Tool => "TOOL",
            Pattern::Agent => "AGENT",
            Pattern::Rag => "RAG",
            Pattern::MapReduce => "MAPREDUCE",
            Pattern::MultiAgent => "MULTI_AGENT",
            Pattern::StructuredOutput => "STRUCTURED_OUTPUT",
        }
    }

    /// Human-readable title for documents
    #[inline]
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Pattern::Workflow => "Workflow",
            Pattern::Tool => "Tool",
            Pattern::Agent => "Agent",
            Pattern::Rag => "Retrieval-Augmented Generation",
            Pattern::MapReduce => "Map-Reduce",
            Pattern::MultiAgent => "Multi-Agent",
            Pattern::StructuredOutput => "Structured Output",
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pattern {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "workflow" => Ok(Pattern::Workflow),
            "tool" => Ok(Pattern::Tool),
            "agent" => Ok(Pattern::Agent),
            "rag" => Ok(Pattern::Rag),
            "mapreduce" => Ok(Pattern::MapReduce),
            "multiagent" => Ok(Pattern::MultiAgent),
            "structuredoutput" => Ok(Pattern::StructuredOutput),
            _ => Err(UnknownVariant {
                kind: "pattern",
                value: s.to_string(),
            }),
        }
    }
}

/// Execution variant of a node
///
/// Selects the lifecycle base class and the stage-name flavour of the
/// generated skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// `Node` with `prep` / `exec` / `post`
    Sync,
    /// `AsyncNode` with `prep_async` / `exec_async` / `post_async`
    Async,
    /// `AsyncBatchNode`, items processed one after another
    Batch,
    /// `AsyncParallelBatchNode`, items processed concurrently
    ParallelBatch,
}

impl NodeType {
    /// Every variant, in declaration order
    pub const ALL: [NodeType; 4] = [
        NodeType::Sync,
        NodeType::Async,
        NodeType::Batch,
        NodeType::ParallelBatch,
    ];

    /// Canonical snake-case name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Sync => "sync",
            NodeType::Async => "async",
            NodeType::Batch => "batch",
            NodeType::ParallelBatch => "parallel_batch",
        }
    }

    /// Framework base class for this variant
    #[inline]
    #[must_use]
    pub fn base_class(&self) -> &'static str {
        match self {
            NodeType::Sync => "Node",
            NodeType::Async => "AsyncNode",
            NodeType::Batch => "AsyncBatchNode",
            NodeType::ParallelBatch => "AsyncParallelBatchNode",
        }
    }

    /// Whether stages are coroutines with `_async` names
    #[inline]
    #[must_use]
    pub fn is_async(&self) -> bool {
        !matches!(self, NodeType::Sync)
    }

    /// Whether `prep` yields an iterable processed item by item
    #[inline]
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, NodeType::Batch | NodeType::ParallelBatch)
    }

    /// The three stage names, in lifecycle order
    #[inline]
    #[must_use]
    pub fn stage_names(&self) -> [&'static str; 3] {
        if self.is_async() {
            ["prep_async", "exec_async", "post_async"]
        } else {
            ["prep", "exec", "post"]
        }
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "sync" | "synchronous" | "node" => Ok(NodeType::Sync),
            "async" | "asynchronous" | "asyncnode" => Ok(NodeType::Async),
            "batch" | "asyncbatch" | "asyncbatchnode" | "batchnode" => Ok(NodeType::Batch),
            "parallelbatch" | "asyncparallelbatch" | "asyncparallelbatchnode" => {
                Ok(NodeType::ParallelBatch)
            }
            _ => Err(UnknownVariant {
                kind: "node type",
                value: s.to_string(),
            }),
        }
    }
}

/// Lower-case with `_`, `-` and spaces removed
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A name that matches no variant of a closed enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    /// Which enumeration was parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}
