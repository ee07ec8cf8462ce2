//! `nodes.py`

use super::module_header;
use crate::plan::{Blueprint, PlannedNode};
use crate::python::{docstring, not_implemented, string_tuple, wrap};
use nodeforge_model::NodeType;
use std::fmt::Write as _;

pub(crate) fn render(bp: &Blueprint<'_>) -> String {
    let mut out = module_header(
        bp,
        "Node implementations",
        &[
            "Every stage below is a placeholder. prep reads shared state and nothing else; exec works on prep_res alone; post writes shared state and returns the next action label, one of the labels in ACTIONS.",
        ],
    );

    let bases: Vec<&str> = NodeType::ALL
        .iter()
        .filter(|t| bp.nodes.iter().any(|n| n.spec.node_type == **t))
        .map(NodeType::base_class)
        .collect();
    let _ = writeln!(out, "\nfrom {} import {}", bp.config.framework_package, bases.join(", "));

    for node in &bp.nodes {
        render_node(bp, node, &mut out);
    }
    out
}

fn render_node(bp: &Blueprint<'_>, node: &PlannedNode<'_>, out: &mut String) {
    let class = &node.idents.class;
    let node_type = node.spec.node_type;
    let _ = write!(out, "\n\nclass {class}({}):\n", node_type.base_class());

    let mut lines = Vec::new();
    if node.spec.description.trim().is_empty() {
        lines.push(format!("{class} node."));
    } else {
        lines.extend(wrap(node.spec.description.trim(), 68));
    }
    lines.push(String::new());
    lines.extend(wrap(
        &format!("Role: {}. {}", node.guidance.role, node.guidance.summary),
        68,
    ));
    lines.extend(wrap(&transitions(bp, node), 68));
    if let Some(suggested) = node.guidance.suggestion_for(node_type) {
        lines.extend(wrap(
            &format!(
                "This role often fits the {suggested} variant ({}); the declared {node_type} variant was kept.",
                suggested.base_class()
            ),
            68,
        ));
    }
    out.push_str(&docstring("    ", &lines));

    let _ = write!(out, "\n    ACTIONS = {}\n", string_tuple(&node.actions));

    let [prep, exec, post] = node_type.stage_names();
    let (def, async_note) = if node_type.is_async() {
        ("async def", " Await utilities here.")
    } else {
        ("def", "")
    };

    let _ = write!(out, "\n    {def} {prep}(self, shared):\n");
    out.push_str(&stage_doc(
        "Read from shared state only.",
        &format!("{}{}", prep_guidance(node), async_note),
    ));
    out.push_str(&not_implemented("        ", &format!("{class}.{prep}: {}", prep_guidance(node))));

    let exec_param = if node_type.is_batch() { "item" } else { "prep_res" };
    let _ = write!(out, "\n    {def} {exec}(self, {exec_param}):\n");
    out.push_str(&stage_doc(
        &format!("Compute from {exec_param} only; shared state is not available here."),
        &format!("{}{}", exec_guidance(node), async_note),
    ));
    out.push_str(&not_implemented("        ", &format!("{class}.{exec}: {}", exec_guidance(node))));

    let _ = write!(out, "\n    {def} {post}(self, shared, prep_res, exec_res):\n");
    out.push_str(&stage_doc(
        "Write results to shared state and return the next action label.",
        &format!("{} {}", node.guidance.post, return_hint(node)),
    ));
    out.push_str(&not_implemented(
        "        ",
        &format!("{class}.{post}: {} {}", node.guidance.post, return_hint(node)),
    ));
}

fn stage_doc(summary: &str, guidance: &str) -> String {
    let mut lines = vec![summary.to_string(), String::new()];
    lines.extend(wrap(guidance, 64));
    docstring("        ", &lines)
}

fn prep_guidance(node: &PlannedNode<'_>) -> String {
    if node.spec.node_type.is_batch() {
        format!("{} Return an iterable; each element is passed to exec on its own.", node.guidance.prep)
    } else {
        node.guidance.prep.to_string()
    }
}

fn exec_guidance(node: &PlannedNode<'_>) -> String {
    match node.spec.node_type {
        NodeType::Batch => format!("{} Items are processed one after another.", node.guidance.exec),
        NodeType::ParallelBatch => format!(
            "{} Items are processed concurrently, so they must not depend on each other.",
            node.guidance.exec
        ),
        NodeType::Sync | NodeType::Async => node.guidance.exec.to_string(),
    }
}

fn return_hint(node: &PlannedNode<'_>) -> String {
    match node.actions.as_slice() {
        [] => "Return None to end the flow.".to_string(),
        actions => format!(
            "Return one of: {}.",
            actions.iter().map(|a| format!("\"{a}\"")).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn transitions(bp: &Blueprint<'_>, node: &PlannedNode<'_>) -> String {
    let Some(index) = bp.nodes.iter().position(|n| n.idents.class == node.idents.class) else {
        return String::new();
    };
    let outgoing = bp.graph.outgoing(index);
    if outgoing.is_empty() {
        return "Transitions: none; this node ends the flow.".to_string();
    }
    let parts: Vec<String> = outgoing
        .iter()
        .map(|e| format!("\"{}\" -> {}", e.label, bp.nodes[e.to].idents.class))
        .collect();
    format!("Transitions: {}.", parts.join(", "))
}
