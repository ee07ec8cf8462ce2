//! `utils.py`

use super::module_header;
use crate::plan::Blueprint;
use crate::python::{docstring, not_implemented, wrap};
use std::fmt::Write as _;

pub(crate) fn render(bp: &Blueprint<'_>) -> String {
    let mut out = module_header(
        bp,
        "Utility functions",
        &["Each function is the single boundary to one external capability such as a model, an index or a service. Nodes call these; they never reach the outside world directly."],
    );

    out.push_str("\nfrom typing import Any, Dict, List\n");

    let mut shapes: Vec<&str> = Vec::new();
    for utility in &bp.utilities {
        for shape in &utility.shapes {
            if !shapes.contains(&shape.as_str()) {
                shapes.push(shape);
            }
        }
    }
    if !shapes.is_empty() {
        let _ = writeln!(out, "\nfrom models import {}", shapes.join(", "));
    }

    for utility in &bp.utilities {
        let _ = write!(
            out,
            "\n\ndef {}({}) -> {}:\n",
            utility.function, utility.params, utility.returns
        );
        out.push_str(&docstring("    ", &wrap(&utility.doc, 68)));
        out.push_str(&not_implemented("    ", &utility.guidance));
    }
    out
}
