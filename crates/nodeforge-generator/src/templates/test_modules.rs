//! `tests/test_*.py`
//!
//! One test module per code module. Test bodies skip with a "not
//! implemented" reason that says what the real assertion should check.

use crate::plan::Blueprint;
use crate::python::{docstring, skip_not_implemented};
use heck::ToSnakeCase;
use std::fmt::Write as _;

struct TestCase {
    name: String,
    doc: String,
    guidance: String,
}

impl TestCase {
    fn new(name: impl Into<String>, doc: impl Into<String>, guidance: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            guidance: guidance.into(),
        }
    }
}

fn module(bp: &Blueprint<'_>, under_test: &str, imports: &[String], cases: &[TestCase]) -> String {
    let mut out = docstring("", &[format!("Tests for {under_test}.py of {}.", bp.project.title)]);
    out.push_str("\nimport pytest\n");
    if !imports.is_empty() {
        out.push('\n');
        for line in imports {
            let _ = writeln!(out, "{line}");
        }
    }
    for case in cases {
        let _ = write!(out, "\n\ndef test_{}():\n", case.name);
        out.push_str(&docstring("    ", &[case.doc.clone()]));
        out.push_str(&skip_not_implemented("    ", &case.guidance));
    }
    out
}

pub(crate) fn models(bp: &Blueprint<'_>) -> String {
    let mut names = vec!["SharedState".to_string()];
    let mut cases = vec![TestCase::new(
        "shared_state_defaults",
        "SharedState builds with no arguments.",
        "assert SharedState() has an empty request and no node results",
    )];
    for shape in bp.shapes.iter() {
        names.push(shape.name.clone());
        cases.push(TestCase::new(
            format!("{}_fields", shape.name.to_snake_case()),
            format!("{} validates its declared fields.", shape.name),
            format!("build a valid and an invalid {} and assert validation", shape.name),
        ));
    }
    module(bp, "models", &[format!("from models import {}", names.join(", "))], &cases)
}

pub(crate) fn nodes(bp: &Blueprint<'_>) -> String {
    let classes: Vec<&str> = bp.nodes.iter().map(|n| n.idents.class.as_str()).collect();
    let mut cases = Vec::new();
    for node in &bp.nodes {
        let class = &node.idents.class;
        let snake = &node.idents.snake;
        let [prep, exec, post] = node.spec.node_type.stage_names();
        cases.push(TestCase::new(
            format!("{snake}_prep_reads_shared_state"),
            format!("{class}.{prep} only reads shared state."),
            format!("call {class}().{prep} with a sample shared dict and assert it is left unchanged"),
        ));
        cases.push(TestCase::new(
            format!("{snake}_exec_uses_prep_result"),
            format!("{class}.{exec} computes from its argument alone."),
            format!("call {class}().{exec} with a sample prep result and assert the output"),
        ));
        let outcome = if node.actions.is_empty() {
            "returns None".to_string()
        } else {
            format!("returns a label from {class}.ACTIONS")
        };
        cases.push(TestCase::new(
            format!("{snake}_post_routes"),
            format!("{class}.{post} stores its result and {outcome}."),
            format!("call {class}().{post} and assert shared[\"{snake}_result\"] is set and it {outcome}"),
        ));
    }
    module(bp, "nodes", &[format!("from nodes import {}", classes.join(", "))], &cases)
}

pub(crate) fn flow(bp: &Blueprint<'_>) -> String {
    let start = &bp.start().idents;
    let cases = vec![
        TestCase::new(
            format!("flow_starts_at_{}", start.snake),
            format!("The flow starts at {}.", start.class),
            format!("assert isinstance(create_flow().start_node, {})", start.class),
        ),
        TestCase::new(
            "flow_runs_end_to_end",
            "The flow runs on a sample request.",
            "run create_flow() on a sample shared state with stubbed utilities and assert every node stored its result",
        ),
    ];
    module(
        bp,
        "flow",
        &[
            "from flow import create_flow".to_string(),
            format!("from nodes import {}", start.class),
        ],
        &cases,
    )
}

pub(crate) fn utils(bp: &Blueprint<'_>) -> String {
    let functions: Vec<&str> = bp.utilities.iter().map(|u| u.function.as_str()).collect();
    let cases: Vec<TestCase> = bp
        .utilities
        .iter()
        .map(|u| {
            TestCase::new(
                u.function.clone(),
                format!("{} honours its contract.", u.function),
                format!("call {} with a representative input and assert the shape of the result", u.function),
            )
        })
        .collect();
    module(bp, "utils", &[format!("from utils import {}", functions.join(", "))], &cases)
}

pub(crate) fn main(bp: &Blueprint<'_>) -> String {
    let cases = vec![TestCase::new(
        "main_runs_flow",
        "main runs the flow once.",
        "patch create_flow with a stub flow and assert main runs it exactly once",
    )];
    module(bp, "main", &["from main import main".to_string()], &cases)
}

pub(crate) fn api(bp: &Blueprint<'_>) -> String {
    let cases: Vec<TestCase> = bp
        .endpoints
        .iter()
        .map(|e| {
            TestCase::new(
                e.idents.function.clone(),
                format!("{} {} answers with {}.", e.spec.method, e.idents.route, e.response),
                format!(
                    "call {} {} through TestClient(app) and assert the response matches {}",
                    e.spec.method, e.idents.route, e.response
                ),
            )
        })
        .collect();
    module(
        bp,
        "api",
        &[
            "from fastapi.testclient import TestClient".to_string(),
            String::new(),
            "from api import app".to_string(),
        ],
        &cases,
    )
}
