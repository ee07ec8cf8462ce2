//! `docs/design.md`

use crate::graph::EdgeOrigin;
use crate::plan::Blueprint;
use std::fmt::Write as _;

pub(crate) fn render(bp: &Blueprint<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} design\n", bp.project.title);

    out.push_str("## Requirements\n\n");
    if bp.spec.description.trim().is_empty() {
        out.push_str("No description was given. Write the problem statement here first.\n\n");
    } else {
        let _ = writeln!(out, "{}\n", bp.spec.description.trim());
    }

    render_pattern(bp, &mut out);
    render_flow(bp, &mut out);
    render_nodes(bp, &mut out);
    render_state(bp, &mut out);
    render_utilities(bp, &mut out);
    if bp.has_api() {
        render_api(bp, &mut out);
    }
    render_dependencies(bp, &mut out);
    render_checklist(bp, &mut out);
    out
}

fn render_pattern(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## Pattern\n\n");
    match bp.confidence() {
        None => {
            let _ = writeln!(out, "**{}** ({}), explicitly declared.\n", bp.pattern, bp.pattern.title());
        }
        Some(confidence) => {
            let _ = writeln!(
                out,
                "**{}** ({}), classified from the requirements with confidence {:.2}.\n",
                bp.pattern,
                bp.pattern.title(),
                confidence
            );
            if let Some(top) = bp.recommendations.first() {
                let _ = writeln!(out, "Rationale: {}\n", top.rationale);
            }
            let others: Vec<String> = bp
                .recommendations
                .iter()
                .filter(|r| r.pattern != bp.pattern)
                .map(|r| format!("- {} ({:.2})", r.pattern, r.confidence))
                .collect();
            if !others.is_empty() {
                let _ = writeln!(out, "Other candidates:\n\n{}\n", others.join("\n"));
            }
        }
    }
    let _ = writeln!(out, "{}\n", bp.profile.narrative);
}

fn render_flow(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## Flow\n\n");
    let _ = writeln!(
        out,
        "The flow starts at **{}** and runs as `{}`. Labelled arrows are action labels returned by the source node's post stage; unlabelled arrows are the `default` action.\n",
        bp.start().idents.class,
        bp.flow_class()
    );

    out.push_str("```mermaid\nflowchart TD\n");
    for node in &bp.nodes {
        let _ = writeln!(
            out,
            "    {}[\"{}<br/>{}\"]",
            node.idents.var, node.idents.class, node.spec.node_type
        );
    }
    for edge in bp.graph.edges() {
        let from = &bp.nodes[edge.from].idents.var;
        let to = &bp.nodes[edge.to].idents.var;
        if edge.is_default() {
            let _ = writeln!(out, "    {from} --> {to}");
        } else {
            let _ = writeln!(out, "    {from} -->|{}| {to}", edge.label);
        }
    }
    out.push_str("```\n\n");

    let described: Vec<String> = bp
        .graph
        .edges()
        .into_iter()
        .filter(|e| e.origin == EdgeOrigin::Described)
        .map(|e| {
            format!(
                "- {} returns `{}` to go to {}",
                bp.nodes[e.from].idents.class, e.label, bp.nodes[e.to].idents.class
            )
        })
        .collect();
    if !described.is_empty() {
        let _ = writeln!(out, "Transitions taken from node descriptions:\n\n{}\n", described.join("\n"));
    }

    let unreachable: Vec<&str> = bp
        .graph
        .unreachable()
        .into_iter()
        .map(|i| bp.nodes[i].idents.class.as_str())
        .collect();
    if !unreachable.is_empty() {
        let _ = writeln!(
            out,
            "Not reachable from the start node: {}. Add a transition into each of them.\n",
            unreachable.join(", ")
        );
    }
}

fn render_nodes(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## Nodes\n\n");
    for node in &bp.nodes {
        let _ = writeln!(out, "### {}\n", node.idents.class);
        let _ = writeln!(
            out,
            "- Type: {} (`{}`)",
            node.spec.node_type,
            node.spec.node_type.base_class()
        );
        let _ = writeln!(out, "- Role: {}. {}", node.guidance.role, node.guidance.summary);
        if !node.spec.description.trim().is_empty() {
            let _ = writeln!(out, "- Purpose: {}", node.spec.description.trim());
        }
        if let Some(suggested) = node.guidance.suggestion_for(node.spec.node_type) {
            let _ = writeln!(
                out,
                "- Consider the `{suggested}` variant (`{}`) for this role; the declared type was kept.",
                suggested.base_class()
            );
        }
        let actions = if node.actions.is_empty() {
            "none (the flow ends here)".to_string()
        } else {
            node.actions.iter().map(|a| format!("`{a}`")).collect::<Vec<_>>().join(", ")
        };
        let _ = writeln!(out, "- Actions: {actions}");
        let [prep, exec, post] = node.spec.node_type.stage_names();
        let _ = writeln!(out, "- `{prep}`: {}", node.guidance.prep);
        let _ = writeln!(out, "- `{exec}`: {}", node.guidance.exec);
        let _ = writeln!(out, "- `{post}`: {}\n", node.guidance.post);
    }
}

fn render_state(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## Shared state\n\n");
    out.push_str("Only post stages write shared state; only prep stages read it.\n\n");
    out.push_str("| Key | Written by |\n|---|---|\n");
    out.push_str("| `request` | caller, before the flow runs |\n");
    for node in &bp.nodes {
        let _ = writeln!(out, "| `{}_result` | {} |", node.idents.snake, node.idents.class);
    }
    out.push('\n');
}

fn render_utilities(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## Utilities\n\n");
    for utility in &bp.utilities {
        let origin = if utility.declared { "declared" } else { "pattern default" };
        let _ = writeln!(
            out,
            "- `{}({}) -> {}`: {} ({origin})",
            utility.function, utility.params, utility.returns, utility.doc
        );
    }
    out.push('\n');
}

fn render_api(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## HTTP API\n\n");
    for endpoint in &bp.endpoints {
        let request = endpoint.request.as_deref().unwrap_or("none");
        let _ = writeln!(
            out,
            "- `{} {}`: request `{request}`, response `{}`",
            endpoint.spec.method, endpoint.idents.route, endpoint.response
        );
    }
    out.push('\n');
}

fn render_dependencies(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## Dependencies\n\n");
    let list = |deps: &[nodeforge_model::DependencySpec]| -> String {
        if deps.is_empty() {
            "none".to_string()
        } else {
            deps.iter().map(|d| format!("`{}`", d.requirement())).collect::<Vec<_>>().join(", ")
        }
    };
    let _ = writeln!(out, "- Runtime: {}", list(&bp.dependencies.runtime));
    let _ = writeln!(out, "- Optional: {}", list(&bp.dependencies.optional));
    let _ = writeln!(out, "- Development: {}", list(&bp.dependencies.dev));
    for note in &bp.dependencies.notes {
        let _ = writeln!(out, "- Note: {note}");
    }
    out.push('\n');
}

fn render_checklist(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("## Implementation checklist\n\n");
    for item in bp.profile.checklist {
        let _ = writeln!(out, "- [ ] {item}");
    }
    out.push_str("- [ ] Describe the fields of every model in `models.py`.\n");
    out.push_str("- [ ] Fill in each utility in `utils.py`; every external call belongs there.\n");
    out.push_str("- [ ] Fill in the three stages of every node in `nodes.py`.\n");
    out.push_str("- [ ] Replace each skipped test with real assertions.\n");
}
