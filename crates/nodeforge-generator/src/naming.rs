//! Identifier derivation
//!
//! Spec names are free-form (`Retrieve docs`, `retrieve-docs`); emitted
//! Python needs classes, variables and functions. Two names mapping to the
//! same identifier are an input error.

use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};
use nodeforge_model::{EndpointSpec, SpecError, WorkflowSpec};
use std::collections::HashMap;

/// Names emitted modules already bind at top level
const RESERVED_CLASSES: &[&str] = &[
    "Any",
    "AsyncBatchNode",
    "AsyncFlow",
    "AsyncNode",
    "AsyncParallelBatchNode",
    "BaseModel",
    "BatchNode",
    "ConfigDict",
    "Dict",
    "False",
    "FastAPI",
    "Field",
    "Flow",
    "List",
    "Node",
    "None",
    "Optional",
    "SharedState",
    "True",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Top-level function names of the emitted modules
const RESERVED_FUNCTIONS: &[&str] = &["app", "create_flow", "main", "pytest"];

/// Identifiers derived for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdents {
    /// Class name in `nodes.py`
    pub class: String,
    /// Instance variable in `flow.py`
    pub var: String,
    /// snake_case stem for tests and state keys
    pub snake: String,
}

/// Identifiers derived for the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdents {
    /// Name as written in the spec
    pub title: String,
    /// UpperCamelCase
    pub class: String,
    /// snake_case
    pub snake: String,
    /// kebab-case, used as distribution name
    pub kebab: String,
}

/// Identifiers derived for one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointIdents {
    /// Handler function name
    pub function: String,
    /// UpperCamelCase stem for derived shapes
    pub class: String,
    /// Route with parameter names normalized to snake_case
    pub route: String,
    /// Path parameters, in route order
    pub params: Vec<String>,
}

/// Class name for a spec name
#[must_use]
pub fn class_name(name: &str) -> String {
    let class = name.to_upper_camel_case();
    if RESERVED_CLASSES.contains(&class.as_str()) {
        format!("{class}Step")
    } else {
        class
    }
}

/// Function name for a spec name
#[must_use]
pub fn function_name(name: &str) -> String {
    let snake = name.to_snake_case();
    if PYTHON_KEYWORDS.contains(&snake.as_str()) || RESERVED_FUNCTIONS.contains(&snake.as_str()) {
        format!("{snake}_fn")
    } else {
        snake
    }
}

/// Project identifiers
#[must_use]
pub fn project(spec: &WorkflowSpec) -> ProjectIdents {
    ProjectIdents {
        title: spec.name.clone(),
        class: spec.name.to_upper_camel_case(),
        snake: spec.name.to_snake_case(),
        kebab: spec.name.to_kebab_case(),
    }
}

/// Node identifiers, in node order
///
/// # Errors
/// Returns [`SpecError::Duplicate`] if two node names collapse into one class
pub fn nodes(spec: &WorkflowSpec) -> Result<Vec<NodeIdents>, SpecError> {
    let mut taken: HashMap<String, usize> = HashMap::new();
    let mut idents = Vec::with_capacity(spec.nodes.len());
    for (i, node) in spec.nodes.iter().enumerate() {
        let class = class_name(&node.name);
        if let Some(first) = taken.insert(class.clone(), i) {
            return Err(SpecError::Duplicate {
                field: format!("nodes[{i}].name"),
                value: format!("{} (same identifier as nodes[{first}] '{}')", node.name, spec.nodes[first].name),
            });
        }
        let snake = node.name.to_snake_case();
        idents.push(NodeIdents {
            var: format!("{snake}_node"),
            class,
            snake,
        });
    }
    Ok(idents)
}

/// Utility function names, in utility order
///
/// # Errors
/// Returns [`SpecError::Duplicate`] if two utility names collapse into one
/// function
pub fn utilities(spec: &WorkflowSpec) -> Result<Vec<String>, SpecError> {
    let mut taken: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(spec.utilities.len());
    for (i, utility) in spec.utilities.iter().enumerate() {
        let function = function_name(&utility.name);
        if let Some(first) = taken.insert(function.clone(), i) {
            return Err(SpecError::Duplicate {
                field: format!("utilities[{i}].name"),
                value: format!(
                    "{} (same identifier as utilities[{first}] '{}')",
                    utility.name, spec.utilities[first].name
                ),
            });
        }
        names.push(function);
    }
    Ok(names)
}

/// Endpoint identifiers, in endpoint order
///
/// # Errors
/// Returns [`SpecError::Duplicate`] if two endpoints share method and route
pub fn endpoints(spec: &WorkflowSpec) -> Result<Vec<EndpointIdents>, SpecError> {
    let mut taken: HashMap<String, usize> = HashMap::new();
    let mut idents = Vec::with_capacity(spec.api_endpoints.len());
    for (i, endpoint) in spec.api_endpoints.iter().enumerate() {
        let ident = endpoint_idents(endpoint);
        if let Some(first) = taken.insert(ident.function.clone(), i) {
            return Err(SpecError::Duplicate {
                field: format!("api_endpoints[{i}].path"),
                value: format!(
                    "{} {} (same handler as api_endpoints[{first}])",
                    endpoint.method, endpoint.path
                ),
            });
        }
        idents.push(ident);
    }
    Ok(idents)
}

fn endpoint_idents(endpoint: &EndpointSpec) -> EndpointIdents {
    let mut words = vec![endpoint.method.as_lower().to_string()];
    let mut params = Vec::new();
    let mut route_segments = Vec::new();

    for segment in endpoint.path.split('/').filter(|s| !s.is_empty()) {
        if let Some(param) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            let param = path_param(param, &params);
            words.push(format!("by_{param}"));
            route_segments.push(format!("{{{param}}}"));
            params.push(param);
        } else {
            words.push(segment.to_snake_case());
            route_segments.push(segment.to_string());
        }
    }
    if words.len() == 1 {
        words.push("root".to_string());
    }

    let stem = words.join("_");
    EndpointIdents {
        function: stem.to_snake_case(),
        class: stem.to_upper_camel_case(),
        route: format!("/{}", route_segments.join("/")),
        params,
    }
}

/// Handler argument for a route parameter, distinct from the ones before it
fn path_param(raw: &str, taken: &[String]) -> String {
    let base = function_name(raw);
    let base = if base == "payload" { format!("{base}_id") } else { base };
    let mut param = base.clone();
    let mut n = 2;
    while taken.contains(&param) {
        param = format!("{base}_{n}");
        n += 1;
    }
    param
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeforge_model::{HttpMethod, NodeSpec, NodeType, UtilitySpec};
    use pretty_assertions::assert_eq;

    fn spec_with_nodes(names: &[&str]) -> WorkflowSpec {
        names.iter().fold(WorkflowSpec::new("Order Flow", ""), |spec, name| {
            spec.with_node(NodeSpec::new(*name, NodeType::Sync, ""))
        })
    }

    #[test]
    fn node_identifiers() {
        let idents = nodes(&spec_with_nodes(&["Retrieve docs", "summarize"])).unwrap();
        assert_eq!(
            idents[0],
            NodeIdents {
                class: "RetrieveDocs".into(),
                var: "retrieve_docs_node".into(),
                snake: "retrieve_docs".into(),
            }
        );
        assert_eq!(idents[1].class, "Summarize");
    }

    #[test]
    fn reserved_class_names_get_suffix() {
        assert_eq!(class_name("flow"), "FlowStep");
        assert_eq!(class_name("none"), "NoneStep");
        assert_eq!(class_name("shared state"), "SharedStateStep");
        assert_eq!(class_name("Router"), "Router");
    }

    #[test]
    fn keywords_get_suffix() {
        assert_eq!(function_name("import"), "import_fn");
        assert_eq!(function_name("Main"), "main_fn");
        assert_eq!(function_name("Call LLM"), "call_llm");
    }

    #[test]
    fn colliding_node_names_are_rejected() {
        let err = nodes(&spec_with_nodes(&["Retrieve Docs", "retrieve_docs"])).unwrap_err();
        assert!(matches!(err, SpecError::Duplicate { ref field, .. } if field == "nodes[1].name"));
    }

    #[test]
    fn colliding_utility_names_are_rejected() {
        let spec = WorkflowSpec::new("x", "")
            .with_utility(UtilitySpec::new("call-llm", "", "", ""))
            .with_utility(UtilitySpec::new("call_llm", "", "", ""));
        let err = utilities(&spec).unwrap_err();
        assert_eq!(err.field(), Some("utilities[1].name"));
    }

    #[test]
    fn project_identifiers() {
        let p = project(&WorkflowSpec::new("OrderFlow", ""));
        assert_eq!(p.class, "OrderFlow");
        assert_eq!(p.snake, "order_flow");
        assert_eq!(p.kebab, "order-flow");
    }

    #[test]
    fn endpoint_identifiers() {
        let spec = WorkflowSpec::new("x", "")
            .with_endpoint(EndpointSpec::new(HttpMethod::Get, "/orders/{order-id}/summary"))
            .with_endpoint(EndpointSpec::new(HttpMethod::Post, "/"));
        let idents = endpoints(&spec).unwrap();
        assert_eq!(idents[0].function, "get_orders_by_order_id_summary");
        assert_eq!(idents[0].class, "GetOrdersByOrderIdSummary");
        assert_eq!(idents[0].route, "/orders/{order_id}/summary");
        assert_eq!(idents[0].params, vec!["order_id"]);
        assert_eq!(idents[1].function, "post_root");
        assert_eq!(idents[1].route, "/");
    }

    #[test]
    fn colliding_route_parameters_get_distinct_arguments() {
        let spec = WorkflowSpec::new("x", "")
            .with_endpoint(EndpointSpec::new(HttpMethod::Put, "/{orderId}/{order_id}/{payload}/{class}"));
        let idents = endpoints(&spec).unwrap();
        assert_eq!(idents[0].params, vec!["order_id", "order_id_2", "payload_id", "class_fn"]);
        assert_eq!(idents[0].route, "/{order_id}/{order_id_2}/{payload_id}/{class_fn}");
    }

    #[test]
    fn duplicate_routes_are_rejected() {
        let spec = WorkflowSpec::new("x", "")
            .with_endpoint(EndpointSpec::new(HttpMethod::Get, "/orders"))
            .with_endpoint(EndpointSpec::new(HttpMethod::Get, "/orders/"));
        assert!(endpoints(&spec).is_err());
    }
}
