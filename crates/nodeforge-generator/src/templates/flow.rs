//! `flow.py`

use super::module_header;
use crate::plan::Blueprint;
use crate::python::{docstring, string_literal};
use std::fmt::Write as _;

pub(crate) fn render(bp: &Blueprint<'_>) -> String {
    let mut out = module_header(
        bp,
        "Flow assembly",
        &["Wires the nodes of nodes.py into the graph drawn in docs/design.md. Every transition uses an action label declared in the source node's ACTIONS."],
    );

    let _ = writeln!(out, "\nfrom {} import {}\n", bp.config.framework_package, bp.flow_class());
    let classes: Vec<&str> = bp.nodes.iter().map(|n| n.idents.class.as_str()).collect();
    let _ = writeln!(out, "from nodes import {}", classes.join(", "));

    let _ = write!(out, "\n\ndef create_flow():\n");
    out.push_str(&docstring(
        "    ",
        &[format!("Build the {} flow graph.", bp.project.title)],
    ));
    out.push('\n');
    for node in &bp.nodes {
        let _ = writeln!(out, "    {} = {}()", node.idents.var, node.idents.class);
    }

    let edges = bp.graph.edges();
    if !edges.is_empty() {
        out.push('\n');
    }
    for edge in edges {
        let from = &bp.nodes[edge.from].idents.var;
        let to = &bp.nodes[edge.to].idents.var;
        if edge.is_default() {
            let _ = writeln!(out, "    {from} >> {to}");
        } else {
            let _ = writeln!(out, "    {from} - {} >> {to}", string_literal(&edge.label));
        }
    }

    let _ = write!(
        out,
        "\n    return {}(start={})\n",
        bp.flow_class(),
        bp.start().idents.var
    );
    out
}
