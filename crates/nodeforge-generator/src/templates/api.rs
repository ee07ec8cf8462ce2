//! `api.py`

use super::module_header;
use crate::plan::Blueprint;
use crate::python::{docstring, not_implemented, string_literal, wrap};
use std::fmt::Write as _;

pub(crate) fn render(bp: &Blueprint<'_>) -> String {
    let mut out = module_header(bp, "HTTP integration", &["Run with: uvicorn api:app --reload"]);

    out.push_str("\nfrom fastapi import FastAPI\n");

    let mut shapes: Vec<&str> = Vec::new();
    for endpoint in &bp.endpoints {
        for shape in endpoint.request.iter().chain(std::iter::once(&endpoint.response)) {
            if !shapes.contains(&shape.as_str()) {
                shapes.push(shape);
            }
        }
    }
    let _ = writeln!(out, "\nfrom models import {}", shapes.join(", "));

    let _ = writeln!(out, "\napp = FastAPI(title={})", string_literal(&bp.project.title));

    for endpoint in &bp.endpoints {
        let mut params: Vec<String> = endpoint.idents.params.iter().map(|p| format!("{p}: str")).collect();
        if let Some(request) = &endpoint.request {
            params.push(format!("payload: {request}"));
        }

        let _ = write!(
            out,
            "\n\n@app.{}({}, response_model={})\nasync def {}({}) -> {}:\n",
            endpoint.spec.method.as_lower(),
            string_literal(&endpoint.idents.route),
            endpoint.response,
            endpoint.idents.function,
            params.join(", "),
            endpoint.response
        );

        let summary = if endpoint.spec.description.trim().is_empty() {
            format!("Handle {} {}.", endpoint.spec.method, endpoint.idents.route)
        } else {
            endpoint.spec.description.trim().to_string()
        };
        out.push_str(&docstring("    ", &wrap(&summary, 68)));
        out.push_str(&not_implemented(
            "    ",
            &format!(
                "{}: build the shared state from the request, run create_flow() and map the stored results to {}",
                endpoint.idents.function, endpoint.response
            ),
        ));
    }
    out
}
