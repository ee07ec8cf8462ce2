//! End-to-end pipeline tests over the fixture specifications

use nodeforge_core::{ScaffoldError, ScaffoldOutcome, Scaffolder};
use nodeforge_generator::{GeneratorConfig, CORE_FILES};
use nodeforge_model::{
    EndpointSpec, GeneratedFileSet, HttpMethod, NodeSpec, NodeType, Pattern, UtilitySpec, WorkflowSpec,
};
use nodeforge_test_utils::{all_fixture_specs, builtin_knowledge, order_flow_spec, ORDER_FLOW_YAML};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scaffolder() -> Scaffolder {
    Scaffolder::new(builtin_knowledge(), GeneratorConfig::default()).unwrap()
}

/// Copy of `files` with one file's content rewritten
fn edited(files: &GeneratedFileSet, path: &str, edit: impl Fn(&str) -> String) -> GeneratedFileSet {
    let mut out = GeneratedFileSet::new();
    for (file, content) in files {
        let name = file.to_string();
        let content = if name == path { edit(content) } else { content.to_string() };
        out.insert_str(&name, content).unwrap();
    }
    out
}

fn order_flow() -> ScaffoldOutcome {
    scaffolder().scaffold(&order_flow_spec()).unwrap()
}

#[test]
fn order_flow_scenario() {
    let spec = WorkflowSpec::from_yaml_str(ORDER_FLOW_YAML).unwrap();
    let outcome = scaffolder().scaffold(&spec).unwrap();

    let top = outcome.top_recommendation().unwrap();
    assert_eq!(top.pattern, Pattern::Rag);
    assert!(top.confidence > 0.5);
    assert_eq!(outcome.pattern, Pattern::Rag);

    let mut expected: Vec<String> = CORE_FILES.iter().map(ToString::to_string).collect();
    expected.sort();
    assert_eq!(outcome.files.paths(), expected);

    let errors: Vec<String> = outcome.validation.errors.iter().map(ToString::to_string).collect();
    assert_eq!(errors, Vec::<String>::new());
    assert!(outcome.is_usable());
}

#[test]
fn every_fixture_scaffolds_without_validation_errors() {
    for spec in all_fixture_specs() {
        let outcome = scaffolder().scaffold(&spec).unwrap();
        let errors: Vec<String> = outcome.validation.errors.iter().map(ToString::to_string).collect();
        assert_eq!(errors, Vec::<String>::new(), "{}", spec.name);
        assert!(
            !outcome.validation.info.is_empty(),
            "{} should carry summary findings",
            spec.name
        );
    }
}

#[test]
fn generated_code_has_no_placeholder_warnings() {
    for spec in all_fixture_specs() {
        let outcome = scaffolder().scaffold(&spec).unwrap();
        let weak: Vec<String> = outcome
            .validation
            .warnings
            .iter()
            .filter(|w| w.message.contains("marker") || w.message.contains("placeholder"))
            .map(ToString::to_string)
            .collect();
        assert_eq!(weak, Vec::<String>::new(), "{}", spec.name);
    }
}

#[test]
fn injected_vendor_import_is_reported() {
    let outcome = order_flow();
    let files = edited(&outcome.files, "utils.py", |text| format!("import stripe\n{text}"));

    let result = scaffolder().validate(&files);
    assert!(!result.is_usable());
    assert!(result
        .errors
        .iter()
        .any(|e| e.file == "utils.py" && e.line == Some(1) && e.message.contains("'stripe'")));
}

#[test]
fn injected_dangling_label_is_reported() {
    let outcome = order_flow();
    let files = edited(&outcome.files, "flow.py", |text| {
        text.replace(
            "    retrieve_node >> summarize_node\n",
            "    retrieve_node >> summarize_node\n    summarize_node - \"retry\" >> retrieve_node\n",
        )
    });

    let result = scaffolder().validate(&files);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].file, "flow.py");
    assert!(result.errors[0].message.starts_with("dangling action label \"retry\""));
}

#[test]
fn dropped_transition_leaves_an_unreachable_node() {
    let outcome = order_flow();
    let files = edited(&outcome.files, "flow.py", |text| {
        text.replace("    retrieve_node >> summarize_node\n", "")
    });

    let result = scaffolder().validate(&files);
    let errors: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        errors,
        ["node 'summarize_node' (Summarize) is unreachable from start node 'retrieve_node'"]
    );
}

#[test]
fn node_class_left_out_of_the_flow_is_an_error() {
    let outcome = order_flow();
    let files = edited(&outcome.files, "flow.py", |text| {
        text.replace("    summarize_node = Summarize()\n", "")
            .replace("    retrieve_node >> summarize_node\n", "")
    });

    let result = scaffolder().validate(&files);
    let errors: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        errors,
        ["flow.py: node class Summarize is never instantiated, so it is unreachable from start node 'retrieve_node'"]
    );
}

#[test]
fn invalid_spec_fails_before_generation() {
    let err = scaffolder()
        .scaffold(&WorkflowSpec::new("Empty", "nothing to do"))
        .unwrap_err();
    assert!(err.is_input_error());
    assert!(matches!(err, ScaffoldError::Generate(_)));
}

#[test]
fn batch_preserves_input_order() {
    let mut specs = all_fixture_specs();
    specs.insert(1, WorkflowSpec::new("Empty", "nothing to do"));

    let results = scaffolder().scaffold_batch(&specs);
    assert_eq!(results.len(), specs.len());
    assert!(results[1].as_ref().is_err_and(ScaffoldError::is_input_error));

    for (spec, result) in specs.iter().zip(&results) {
        if spec.nodes.is_empty() {
            continue;
        }
        let sequential = scaffolder().scaffold(spec).unwrap();
        assert_eq!(result.as_ref().unwrap(), &sequential, "{}", spec.name);
    }
}

/// Any name the spec accepts
fn spec_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,10}"
}

/// Empty, a shape name or a free-text contract
fn contract() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Z][A-Za-z0-9]{0,8}",
        "[a-z][a-z ]{0,20}",
    ]
}

fn route() -> impl Strategy<Value = String> {
    let segment = prop_oneof!["[a-z][a-z0-9_-]{0,6}", "\\{[A-Za-z][A-Za-z0-9_-]{0,6}\\}"];
    prop::collection::vec(segment, 0..4).prop_map(|segments| format!("/{}", segments.join("/")))
}

fn method() -> impl Strategy<Value = HttpMethod> {
    prop_oneof![
        Just(HttpMethod::Get),
        Just(HttpMethod::Post),
        Just(HttpMethod::Put),
        Just(HttpMethod::Patch),
        Just(HttpMethod::Delete),
    ]
}

/// Schema-valid specs with adversarial names, contracts and routes
///
/// Index suffixes keep node and utility identifiers distinct.
fn workflow_spec() -> impl Strategy<Value = WorkflowSpec> {
    let nodes = prop::collection::vec((spec_name(), prop::sample::select(NodeType::ALL.to_vec())), 1..5);
    let utilities = prop::collection::vec((spec_name(), contract(), contract()), 0..3);
    let endpoints = prop::collection::vec((method(), route(), contract(), contract()), 0..3);
    (spec_name(), "[a-z ]{0,40}", nodes, utilities, endpoints).prop_map(
        |(name, description, nodes, utilities, endpoints)| {
            let mut spec = WorkflowSpec::new(name, description);
            for (i, (name, node_type)) in nodes.into_iter().enumerate() {
                spec = spec.with_node(NodeSpec::new(format!("{name} n{i}"), node_type, ""));
            }
            for (i, (name, input, output)) in utilities.into_iter().enumerate() {
                spec = spec.with_utility(UtilitySpec::new(format!("{name} u{i}"), "", input, output));
            }
            for (method, path, request, response) in endpoints {
                let mut endpoint = EndpointSpec::new(method, path);
                if !request.is_empty() {
                    endpoint = endpoint.with_request(request);
                }
                if !response.is_empty() {
                    endpoint = endpoint.with_response(response);
                }
                spec = spec.with_endpoint(endpoint);
            }
            spec
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn accepted_specs_always_validate_cleanly(spec in workflow_spec()) {
        prop_assert!(spec.check_invariants().is_ok(), "{:?}", spec.check_invariants());
        match scaffolder().scaffold(&spec) {
            Ok(outcome) => {
                let errors: Vec<String> = outcome.validation.errors.iter().map(ToString::to_string).collect();
                prop_assert!(errors.is_empty(), "{errors:#?}");
            }
            // reserved shape names and colliding handlers are rejected up front
            Err(err) => prop_assert!(err.is_input_error(), "{err}"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn repeated_runs_are_byte_identical(description in "[a-z ]{0,80}") {
        let spec = WorkflowSpec { description, ..order_flow_spec() };
        let first = scaffolder().scaffold(&spec).unwrap();
        let second = scaffolder().scaffold(&spec).unwrap();
        prop_assert_eq!(first.files.fingerprint(), second.files.fingerprint());
        prop_assert!(first.validation.errors.is_empty());
    }
}
