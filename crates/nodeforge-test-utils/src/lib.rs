//! Testing utilities for the nodeforge workspace
//!
//! Shared fixture specifications and knowledge tables.

#![allow(missing_docs)]

use nodeforge_model::{
    EndpointSpec, GeneratedFileSet, HttpMethod, KnowledgeBase, NodeSpec, NodeType, Pattern,
    UtilitySpec, WorkflowSpec,
};
use std::sync::Arc;

/// The retrieval scenario: pattern left to the classifier, two sync nodes
pub fn order_flow_spec() -> WorkflowSpec {
    WorkflowSpec::new("OrderFlow", "retrieve similar past orders and summarize them")
        .with_node(NodeSpec::new("Retrieve", NodeType::Sync, ""))
        .with_node(NodeSpec::new("Summarize", NodeType::Sync, ""))
}

/// Same scenario as a YAML document
pub const ORDER_FLOW_YAML: &str = r"
name: OrderFlow
description: retrieve similar past orders and summarize them
nodes:
  - name: Retrieve
    type: synchronous
  - name: Summarize
    type: synchronous
";

/// Agent loop with described transitions and async nodes
pub fn review_loop_spec() -> WorkflowSpec {
    WorkflowSpec::new("Review Loop", "An agent drafts a reply and decides whether to revise it")
        .with_pattern(Pattern::Agent)
        .with_node(NodeSpec::new("Draft Reply", NodeType::Async, "Write a first reply to the ticket"))
        .with_node(NodeSpec::new(
            "Review",
            NodeType::Sync,
            "Judge the draft. On rejected go to DraftReply; on approved -> Publish",
        ))
        .with_node(NodeSpec::new("Publish", NodeType::Async, "Send the approved reply"))
}

/// Spec with utilities and HTTP endpoints
pub fn api_spec() -> WorkflowSpec {
    WorkflowSpec::new("order-api", "Answer questions about orders with a tool call")
        .with_pattern(Pattern::Tool)
        .with_node(NodeSpec::new("Lookup Order", NodeType::Async, "Fetch the order record"))
        .with_node(NodeSpec::new("Answer", NodeType::Sync, "Compose the answer \"politely\""))
        .with_utility(UtilitySpec::new(
            "fetch order",
            "Load one order from the order service",
            "OrderQuery",
            "order record with line items",
        ))
        .with_endpoint(
            EndpointSpec::new(HttpMethod::Post, "/orders/{order_id}/questions")
                .with_request("OrderQuery")
                .with_response("answer text")
                .with_description("Answer a question about one order"),
        )
        .with_endpoint(EndpointSpec::new(HttpMethod::Get, "/health"))
}

/// Map-reduce spec with both batch variants
pub fn batch_spec() -> WorkflowSpec {
    WorkflowSpec::new("DocDigest", "split documents into chunks, map each chunk and reduce to a summary")
        .with_node(NodeSpec::new("Split", NodeType::Sync, "Split the document into chunks"))
        .with_node(NodeSpec::new("Map Chunks", NodeType::ParallelBatch, "Summarize each chunk"))
        .with_node(NodeSpec::new("Reduce", NodeType::Batch, "Combine the chunk summaries"))
}

/// Every fixture spec
pub fn all_fixture_specs() -> Vec<WorkflowSpec> {
    vec![order_flow_spec(), review_loop_spec(), api_spec(), batch_spec()]
}

/// Built-in knowledge tables, shared
pub fn builtin_knowledge() -> Arc<KnowledgeBase> {
    Arc::new(KnowledgeBase::builtin().unwrap())
}

/// File set from `(path, content)` pairs
pub fn file_set(files: &[(&str, &str)]) -> GeneratedFileSet {
    let mut set = GeneratedFileSet::new();
    for (path, content) in files {
        set.insert_str(path, *content).unwrap();
    }
    set
}
