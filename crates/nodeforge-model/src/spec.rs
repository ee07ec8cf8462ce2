//! Workflow specification
//!
//! [`WorkflowSpec`] is the value object every pipeline stage reads. It is
//! built once per request, either directly or from a loosely typed
//! [`RawWorkflowSpec`] document, and never mutated afterwards.

use crate::error::SpecError;
use crate::pattern::{NodeType, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One unit of processing in the generated application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique name within the spec
    pub name: String,
    /// Execution variant
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// What the node is for; read by the guidance heuristics
    pub description: String,
}

impl NodeSpec {
    /// Create a node spec
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, node_type: NodeType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type,
            description: description.into(),
        }
    }
}

/// Helper function the generated nodes call into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilitySpec {
    /// Unique name within the spec
    pub name: String,
    /// What the utility does
    #[serde(default)]
    pub description: String,
    /// Input contract: a shape name or a free-text description
    #[serde(default)]
    pub input: String,
    /// Output contract: a shape name or a free-text description
    #[serde(default)]
    pub output: String,
}

impl UtilitySpec {
    /// Create a utility spec with free-text contracts
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input: input.into(),
            output: output.into(),
        }
    }
}

/// HTTP verb of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Lower-case verb, as used by route decorators
    #[inline]
    #[must_use]
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// Whether requests of this verb carry a body
    #[inline]
    #[must_use]
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_lower().to_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(format!("unsupported HTTP method '{s}'")),
        }
    }
}

/// HTTP endpoint exposed by the generated application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Route path, starting with `/`
    pub path: String,
    /// HTTP verb
    pub method: HttpMethod,
    /// Request body shape reference
    #[serde(default)]
    pub request: Option<String>,
    /// Response body shape reference
    #[serde(default)]
    pub response: Option<String>,
    /// What the endpoint does
    #[serde(default)]
    pub description: String,
}

impl EndpointSpec {
    /// Create an endpoint without explicit shapes
    #[inline]
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            request: None,
            response: None,
            description: String::new(),
        }
    }

    /// With request shape reference
    #[inline]
    #[must_use]
    pub fn with_request(mut self, shape: impl Into<String>) -> Self {
        self.request = Some(shape.into());
        self
    }

    /// With response shape reference
    #[inline]
    #[must_use]
    pub fn with_response(mut self, shape: impl Into<String>) -> Self {
        self.response = Some(shape.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Reference to a data shape
///
/// A bare `UpperCamelCase` identifier names a shape shared by every
/// reference using that name; anything else is a contract description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeRef {
    /// Explicit shape name
    Named(String),
    /// Free-text contract; the caller derives a name
    Described(String),
}

impl ShapeRef {
    /// Classify a contract string
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        let named = chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_alphanumeric());
        if named {
            ShapeRef::Named(trimmed.to_string())
        } else {
            ShapeRef::Described(trimmed.to_string())
        }
    }
}

/// Structured description of one application to scaffold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSpec {
    /// Identifier used to derive project, file and class names
    pub name: String,
    /// Pinned pattern; classified from `description` when absent
    #[serde(default)]
    pub pattern: Option<Pattern>,
    /// Free-text requirements
    #[serde(default)]
    pub description: String,
    /// Processing nodes; order seeds the default flow edges
    pub nodes: Vec<NodeSpec>,
    /// Helper functions
    #[serde(default)]
    pub utilities: Vec<UtilitySpec>,
    /// HTTP endpoints
    #[serde(default)]
    pub api_endpoints: Vec<EndpointSpec>,
}

impl WorkflowSpec {
    /// Start a spec with no nodes
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: None,
            description: description.into(),
            nodes: Vec::new(),
            utilities: Vec::new(),
            api_endpoints: Vec::new(),
        }
    }

    /// With pinned pattern
    #[inline]
    #[must_use]
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Append a node
    #[inline]
    #[must_use]
    pub fn with_node(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append a utility
    #[inline]
    #[must_use]
    pub fn with_utility(mut self, utility: UtilitySpec) -> Self {
        self.utilities.push(utility);
        self
    }

    /// Append an endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: EndpointSpec) -> Self {
        self.api_endpoints.push(endpoint);
        self
    }

    /// Parse a YAML document
    ///
    /// # Errors
    /// Returns [`SpecError::Syntax`] for malformed YAML and a
    /// field-identifying error for schema violations
    pub fn from_yaml_str(text: &str) -> Result<Self, SpecError> {
        let raw: RawWorkflowSpec =
            serde_yaml::from_str(text).map_err(|e| SpecError::Syntax(e.to_string()))?;
        Self::try_from(raw)
    }

    /// Parse a JSON document
    ///
    /// # Errors
    /// Returns [`SpecError::Syntax`] for malformed JSON and a
    /// field-identifying error for schema violations
    pub fn from_json_str(text: &str) -> Result<Self, SpecError> {
        let raw: RawWorkflowSpec =
            serde_json::from_str(text).map_err(|e| SpecError::Syntax(e.to_string()))?;
        Self::try_from(raw)
    }

    /// Check the structural invariants of the spec
    ///
    /// Names must be well formed, nodes non-empty, and node and utility
    /// names unique. Endpoint paths must be absolute routes.
    ///
    /// # Errors
    /// Returns the first violation with the offending field and value
    pub fn check_invariants(&self) -> Result<(), SpecError> {
        check_name("name", &self.name)?;

        if self.nodes.is_empty() {
            return Err(SpecError::Missing {
                field: "nodes".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let field = format!("nodes[{i}].name");
            check_name(&field, &node.name)?;
            if !seen.insert(node.name.as_str()) {
                return Err(SpecError::Duplicate {
                    field,
                    value: node.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for (i, utility) in self.utilities.iter().enumerate() {
            let field = format!("utilities[{i}].name");
            check_name(&field, &utility.name)?;
            if !seen.insert(utility.name.as_str()) {
                return Err(SpecError::Duplicate {
                    field,
                    value: utility.name.clone(),
                });
            }
        }

        for (i, endpoint) in self.api_endpoints.iter().enumerate() {
            check_route(&format!("api_endpoints[{i}].path"), &endpoint.path)?;
        }

        Ok(())
    }
}

/// Loosely typed specification document
///
/// Mirrors the on-disk YAML/JSON shape with every enumeration kept as
/// text, so conversion can report exactly which field is wrong.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWorkflowSpec {
    /// Spec name
    #[serde(default)]
    pub name: Option<String>,
    /// Pattern name
    #[serde(default)]
    pub pattern: Option<String>,
    /// Requirements text
    #[serde(default)]
    pub description: String,
    /// Nodes
    #[serde(default)]
    pub nodes: Vec<RawNodeSpec>,
    /// Utilities
    #[serde(default)]
    pub utilities: Vec<UtilitySpec>,
    /// Endpoints
    #[serde(default, alias = "endpoints")]
    pub api_endpoints: Vec<RawEndpointSpec>,
}

/// Loosely typed node entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawNodeSpec {
    /// Node name
    #[serde(default)]
    pub name: Option<String>,
    /// Node type name; `sync` when omitted
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    /// Node description
    #[serde(default)]
    pub description: String,
}

/// Loosely typed endpoint entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEndpointSpec {
    /// Route path
    #[serde(default)]
    pub path: Option<String>,
    /// HTTP verb
    #[serde(default)]
    pub method: Option<String>,
    /// Request shape
    #[serde(default)]
    pub request: Option<String>,
    /// Response shape
    #[serde(default)]
    pub response: Option<String>,
    /// Description
    #[serde(default)]
    pub description: String,
}

impl TryFrom<RawWorkflowSpec> for WorkflowSpec {
    type Error = SpecError;

    fn try_from(raw: RawWorkflowSpec) -> Result<Self, Self::Error> {
        let name = required("name", raw.name)?;

        let pattern = raw
            .pattern
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                p.parse::<Pattern>()
                    .map_err(|e| SpecError::invalid("pattern", &p, e.to_string()))
            })
            .transpose()?;

        let nodes = raw
            .nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| -> Result<NodeSpec, SpecError> {
                let name = required(&format!("nodes[{i}].name"), node.name)?;
                let node_type = match node.node_type {
                    Some(t) => t
                        .parse::<NodeType>()
                        .map_err(|e| SpecError::invalid(format!("nodes[{i}].type"), &t, e.to_string()))?,
                    None => NodeType::Sync,
                };
                Ok(NodeSpec {
                    name,
                    node_type,
                    description: node.description,
                })
            })
            .collect::<Result<Vec<_>, SpecError>>()?;

        let api_endpoints = raw
            .api_endpoints
            .into_iter()
            .enumerate()
            .map(|(i, endpoint)| -> Result<EndpointSpec, SpecError> {
                let path = required(&format!("api_endpoints[{i}].path"), endpoint.path)?;
                let method_text = required(&format!("api_endpoints[{i}].method"), endpoint.method)?;
                let method = method_text
                    .parse::<HttpMethod>()
                    .map_err(|e| SpecError::invalid(format!("api_endpoints[{i}].method"), &method_text, e))?;
                Ok(EndpointSpec {
                    path,
                    method,
                    request: endpoint.request.filter(|s| !s.trim().is_empty()),
                    response: endpoint.response.filter(|s| !s.trim().is_empty()),
                    description: endpoint.description,
                })
            })
            .collect::<Result<Vec<_>, SpecError>>()?;

        let spec = WorkflowSpec {
            name,
            pattern,
            description: raw.description,
            nodes,
            utilities: raw.utilities,
            api_endpoints,
        };
        spec.check_invariants()?;
        Ok(spec)
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, SpecError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(SpecError::Missing {
            field: field.to_string(),
        }),
    }
}

/// Names start with an ASCII letter and contain letters, digits, spaces,
/// `-` or `_`
fn check_name(field: &str, value: &str) -> Result<(), SpecError> {
    let mut chars = value.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(SpecError::invalid(
            field,
            value,
            "must start with a letter and contain only letters, digits, spaces, '-' or '_'",
        ))
    }
}

fn check_route(field: &str, value: &str) -> Result<(), SpecError> {
    let Some(rest) = value.strip_prefix('/') else {
        return Err(SpecError::invalid(field, value, "must start with '/'"));
    };
    for segment in rest.split('/') {
        if let Some(param) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            let mut chars = param.chars();
            let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
            if !valid {
                return Err(SpecError::invalid(
                    field,
                    value,
                    format!("parameter '{{{param}}}' must start with a letter and contain only letters, digits, '-' or '_'"),
                ));
            }
        } else if !segment.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')) {
            return Err(SpecError::invalid(
                field,
                value,
                format!("segment '{segment}' may contain only letters, digits, '-' or '_', or be a whole '{{param}}'"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_FLOW: &str = r#"
name: OrderFlow
description: retrieve similar past orders and summarize them
nodes:
  - name: Retrieve
    type: synchronous
  - name: Summarize
    type: sync
"#;

    #[test]
    fn yaml_document_converts() {
        let spec = WorkflowSpec::from_yaml_str(ORDER_FLOW).unwrap();
        assert_eq!(spec.name, "OrderFlow");
        assert_eq!(spec.pattern, None);
        assert_eq!(spec.nodes.len(), 2);
        assert_eq!(spec.nodes[0].node_type, NodeType::Sync);
        assert!(spec.api_endpoints.is_empty());
    }

    #[test]
    fn json_document_converts() {
        let spec = WorkflowSpec::from_json_str(
            r#"{"name": "Qa", "pattern": "rag", "nodes": [{"name": "Answer", "type": "async"}]}"#,
        )
        .unwrap();
        assert_eq!(spec.pattern, Some(Pattern::Rag));
        assert_eq!(spec.nodes[0].node_type, NodeType::Async);
    }

    #[test]
    fn unknown_node_type_names_the_field() {
        let err = WorkflowSpec::from_yaml_str(
            "name: X\nnodes:\n  - name: A\n  - name: B\n    type: streaming\n",
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("nodes[1].type"));
        assert!(err.to_string().contains("streaming"));
    }

    #[test]
    fn unknown_pattern_names_the_field() {
        let err = WorkflowSpec::from_yaml_str("name: X\npattern: blockchain\nnodes:\n  - name: A\n")
            .unwrap_err();
        assert_eq!(err.field(), Some("pattern"));
    }

    #[test]
    fn missing_name_is_reported() {
        let err = WorkflowSpec::from_yaml_str("nodes:\n  - name: A\n").unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn unknown_fields_are_syntax_errors() {
        let err = WorkflowSpec::from_yaml_str("name: X\nnodez: []\n").unwrap_err();
        assert!(matches!(err, SpecError::Syntax(_)));
    }

    #[test]
    fn duplicate_node_names_are_rejected() {
        let spec = WorkflowSpec::new("X", "")
            .with_node(NodeSpec::new("A", NodeType::Sync, ""))
            .with_node(NodeSpec::new("A", NodeType::Async, ""));
        let err = spec.check_invariants().unwrap_err();
        assert_eq!(
            err,
            SpecError::Duplicate {
                field: "nodes[1].name".to_string(),
                value: "A".to_string()
            }
        );
    }

    #[test]
    fn duplicate_utility_names_are_rejected() {
        let spec = WorkflowSpec::new("X", "")
            .with_node(NodeSpec::new("A", NodeType::Sync, ""))
            .with_utility(UtilitySpec::new("embed", "", "", ""))
            .with_utility(UtilitySpec::new("embed", "", "", ""));
        assert_eq!(spec.check_invariants().unwrap_err().field(), Some("utilities[1].name"));
    }

    #[test]
    fn empty_node_list_is_rejected() {
        let err = WorkflowSpec::new("X", "").check_invariants().unwrap_err();
        assert_eq!(err.field(), Some("nodes"));
    }

    #[test]
    fn malformed_names_are_rejected() {
        let spec = WorkflowSpec::new("9lives", "").with_node(NodeSpec::new("A", NodeType::Sync, ""));
        assert_eq!(spec.check_invariants().unwrap_err().field(), Some("name"));

        let spec = WorkflowSpec::new("X", "").with_node(NodeSpec::new("a.b", NodeType::Sync, ""));
        assert_eq!(spec.check_invariants().unwrap_err().field(), Some("nodes[0].name"));
    }

    #[test]
    fn endpoint_route_must_be_absolute() {
        let spec = WorkflowSpec::new("X", "")
            .with_node(NodeSpec::new("A", NodeType::Sync, ""))
            .with_endpoint(EndpointSpec::new(HttpMethod::Get, "orders"));
        assert_eq!(spec.check_invariants().unwrap_err().field(), Some("api_endpoints[0].path"));
    }

    #[test]
    fn endpoint_route_parameters_must_be_identifiers() {
        for path in ["/orders/{}", "/orders/{1st}", "/orders/{id", "/orders/id}", "/orders/x{id}", "/{a}{b}"] {
            let spec = WorkflowSpec::new("X", "")
                .with_node(NodeSpec::new("A", NodeType::Sync, ""))
                .with_endpoint(EndpointSpec::new(HttpMethod::Get, "/health"))
                .with_endpoint(EndpointSpec::new(HttpMethod::Get, path));
            let err = spec.check_invariants().unwrap_err();
            assert_eq!(err.field(), Some("api_endpoints[1].path"), "{path}");
        }

        let spec = WorkflowSpec::new("X", "")
            .with_node(NodeSpec::new("A", NodeType::Sync, ""))
            .with_endpoint(EndpointSpec::new(HttpMethod::Get, "/orders/{order-id}/items/{item_2}"));
        assert!(spec.check_invariants().is_ok());
    }

    #[test]
    fn endpoint_method_is_parsed() {
        let spec = WorkflowSpec::from_yaml_str(
            "name: X\nnodes:\n  - name: A\napi_endpoints:\n  - path: /run\n    method: post\n    response: RunResult\n",
        )
        .unwrap();
        assert_eq!(spec.api_endpoints[0].method, HttpMethod::Post);
        assert_eq!(spec.api_endpoints[0].response.as_deref(), Some("RunResult"));

        let err = WorkflowSpec::from_yaml_str(
            "name: X\nnodes:\n  - name: A\napi_endpoints:\n  - path: /run\n    method: fetch\n",
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("api_endpoints[0].method"));
    }

    #[test]
    fn shape_ref_classification() {
        assert_eq!(ShapeRef::parse("OrderQuery"), ShapeRef::Named("OrderQuery".to_string()));
        assert_eq!(
            ShapeRef::parse("a list of orders"),
            ShapeRef::Described("a list of orders".to_string())
        );
        assert_eq!(ShapeRef::parse("order_query"), ShapeRef::Described("order_query".to_string()));
        assert_eq!(ShapeRef::parse(""), ShapeRef::Described(String::new()));
    }
}
