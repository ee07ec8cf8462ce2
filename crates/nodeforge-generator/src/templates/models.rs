//! `models.py`

use super::module_header;
use crate::plan::{Blueprint, Shape};
use crate::python::{docstring, string_literal, wrap};
use std::fmt::Write as _;

pub(crate) fn render(bp: &Blueprint<'_>) -> String {
    let mut out = module_header(
        bp,
        "Data models",
        &[
            "SharedState is the contract between nodes. The other models are the data shapes referenced by utilities and endpoints.",
        ],
    );
    out.push_str("\nfrom typing import Any, Optional\n\n");
    out.push_str("from pydantic import BaseModel, ConfigDict, Field\n");

    render_state(bp, &mut out);
    for shape in bp.shapes.iter() {
        render_shape(shape, &mut out);
    }
    out
}

fn render_state(bp: &Blueprint<'_>, out: &mut String) {
    out.push_str("\n\nclass SharedState(BaseModel):\n");
    out.push_str(&docstring(
        "    ",
        &[
            "State passed between nodes.".to_string(),
            String::new(),
            "Post stages write it; prep stages only read it.".to_string(),
        ],
    ));
    out.push_str("\n    model_config = ConfigDict(extra=\"allow\")\n\n");
    out.push_str("    request: str = Field(default=\"\", description=\"Input that started the flow.\")\n");
    for node in &bp.nodes {
        let _ = writeln!(
            out,
            "    {}_result: Optional[Any] = Field(default=None, description={})",
            node.idents.snake,
            string_literal(&format!("Result stored by {}.", node.idents.class))
        );
    }
}

fn render_shape(shape: &Shape, out: &mut String) {
    let _ = write!(out, "\n\nclass {}(BaseModel):\n", shape.name);

    let mut lines = Vec::new();
    match shape.descriptions.as_slice() {
        [] => lines.push(format!("Data shape {}.", shape.name)),
        descriptions => {
            for description in descriptions {
                lines.extend(wrap(description, 68));
            }
        }
    }
    lines.push(String::new());
    lines.extend(wrap(&format!("Used by: {}.", shape.used_by.join(", ")), 68));
    lines.push("Declare the fields of this shape; extra keys are accepted until then.".to_string());

    out.push_str(&docstring("    ", &lines));
    out.push_str("\n    model_config = ConfigDict(extra=\"allow\")\n");
}
