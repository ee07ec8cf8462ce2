//! Generation plan
//!
//! Everything the templates need, derived once from the spec: identifiers,
//! guidance, flow edges, utilities, endpoints and data shapes. Templates
//! only format a [`Blueprint`]; they make no decisions of their own.

use crate::config::GeneratorConfig;
use crate::graph::FlowGraph;
use crate::heuristics::{guidance_for, NodeGuidance};
use crate::naming::{self, EndpointIdents, NodeIdents, ProjectIdents};
use crate::profile::{profile, PatternProfile};
use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use nodeforge_classifier::PatternRecommendation;
use nodeforge_deps::DependencyConfig;
use nodeforge_model::{EndpointSpec, NodeSpec, Pattern, ShapeRef, SpecError, WorkflowSpec};

/// Class names no data shape may take
const RESERVED_SHAPES: &[&str] = &[
    "SharedState", "BaseModel", "ConfigDict", "Field", "FastAPI", "Any", "Optional", "Dict", "List",
];

/// Capitalized Python keywords, which are never valid class names
const KEYWORD_SHAPES: &[&str] = &["None", "True", "False"];

/// One data model in `models.py`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Shape {
    pub(crate) name: String,
    /// Contract descriptions, one per distinct wording
    pub(crate) descriptions: Vec<String>,
    /// Who references the shape, e.g. `utils.fetch_orders (input)`
    pub(crate) used_by: Vec<String>,
}

/// Distinct shapes in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ShapeCatalog {
    shapes: IndexMap<String, Shape>,
}

impl ShapeCatalog {
    /// Register a reference and return the shape name it resolves to
    fn reference(
        &mut self,
        field: &str,
        contract: &str,
        derived: String,
        user: String,
    ) -> Result<String, SpecError> {
        let (name, description) = match ShapeRef::parse(contract) {
            ShapeRef::Named(name) => (name, String::new()),
            ShapeRef::Described(text) => (derived, text),
        };
        if KEYWORD_SHAPES.contains(&name.as_str()) {
            return Err(SpecError::invalid(field, contract, "shape name is a Python keyword"));
        }
        if RESERVED_SHAPES.contains(&name.as_str()) {
            return Err(SpecError::invalid(field, contract, "shape name is reserved by the generated models"));
        }

        let shape = self.shapes.entry(name.clone()).or_insert_with(|| Shape {
            name: name.clone(),
            descriptions: Vec::new(),
            used_by: Vec::new(),
        });
        if !description.is_empty() && !shape.descriptions.contains(&description) {
            shape.descriptions.push(description);
        }
        shape.used_by.push(user);
        Ok(name)
    }

    /// Shapes in first-seen order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Node with everything the templates need
#[derive(Debug, Clone)]
pub(crate) struct PlannedNode<'a> {
    pub(crate) spec: &'a NodeSpec,
    pub(crate) idents: NodeIdents,
    pub(crate) guidance: NodeGuidance,
    pub(crate) actions: Vec<String>,
}

/// Function emitted into `utils.py`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedUtility {
    pub(crate) function: String,
    pub(crate) params: String,
    pub(crate) returns: String,
    pub(crate) doc: String,
    pub(crate) guidance: String,
    /// Shapes the signature mentions
    pub(crate) shapes: Vec<String>,
    /// Declared in the spec rather than a pattern default
    pub(crate) declared: bool,
}

/// Handler emitted into `api.py`
#[derive(Debug, Clone)]
pub(crate) struct PlannedEndpoint<'a> {
    pub(crate) spec: &'a EndpointSpec,
    pub(crate) idents: EndpointIdents,
    pub(crate) request: Option<String>,
    pub(crate) response: String,
}

/// Complete plan of one generation
#[derive(Debug, Clone)]
pub(crate) struct Blueprint<'a> {
    pub(crate) spec: &'a WorkflowSpec,
    pub(crate) config: &'a GeneratorConfig,
    pub(crate) project: ProjectIdents,
    pub(crate) pattern: Pattern,
    pub(crate) recommendations: &'a [PatternRecommendation],
    pub(crate) profile: &'static PatternProfile,
    pub(crate) nodes: Vec<PlannedNode<'a>>,
    pub(crate) graph: FlowGraph,
    pub(crate) utilities: Vec<PlannedUtility>,
    pub(crate) endpoints: Vec<PlannedEndpoint<'a>>,
    pub(crate) shapes: ShapeCatalog,
    pub(crate) dependencies: &'a DependencyConfig,
}

impl<'a> Blueprint<'a> {
    /// Derive the plan
    ///
    /// # Errors
    /// Returns a field-identifying [`SpecError`] for identifier collisions
    /// and reserved shape names
    pub(crate) fn build(
        spec: &'a WorkflowSpec,
        config: &'a GeneratorConfig,
        recommendations: &'a [PatternRecommendation],
        dependencies: &'a DependencyConfig,
    ) -> Result<Self, SpecError> {
        let pattern = spec
            .pattern
            .or_else(|| recommendations.first().map(|r| r.pattern))
            .unwrap_or(Pattern::Workflow);
        let profile = profile(pattern);

        let node_idents = naming::nodes(spec)?;
        let classes: Vec<String> = node_idents.iter().map(|i| i.class.clone()).collect();
        let graph = FlowGraph::derive(&spec.nodes, &classes);

        for index in graph.unreachable() {
            tracing::warn!(node = %spec.nodes[index].name, "node is not reachable from the start node");
        }

        let nodes = spec
            .nodes
            .iter()
            .zip(node_idents)
            .enumerate()
            .map(|(i, (node, idents))| PlannedNode {
                spec: node,
                idents,
                guidance: guidance_for(node),
                actions: graph.actions(i),
            })
            .collect();

        let mut shapes = ShapeCatalog::default();
        let utilities = plan_utilities(spec, profile, &mut shapes)?;
        let endpoints = plan_endpoints(spec, &mut shapes)?;

        Ok(Self {
            spec,
            config,
            project: naming::project(spec),
            pattern,
            recommendations,
            profile,
            nodes,
            graph,
            utilities,
            endpoints,
            shapes,
            dependencies,
        })
    }

    /// Whether any node runs asynchronously
    pub(crate) fn is_async(&self) -> bool {
        self.nodes.iter().any(|n| n.spec.node_type.is_async())
    }

    /// Whether `api.py` is emitted
    pub(crate) fn has_api(&self) -> bool {
        !self.endpoints.is_empty()
    }

    /// Flow class used in `flow.py`
    pub(crate) fn flow_class(&self) -> &'static str {
        if self.is_async() {
            "AsyncFlow"
        } else {
            "Flow"
        }
    }

    /// Start node
    pub(crate) fn start(&self) -> &PlannedNode<'a> {
        &self.nodes[0]
    }

    /// Classification confidence of the chosen pattern, if classified
    pub(crate) fn confidence(&self) -> Option<f64> {
        if self.spec.pattern.is_some() {
            return None;
        }
        self.recommendations
            .iter()
            .find(|r| r.pattern == self.pattern)
            .map(|r| r.confidence)
    }
}

fn plan_utilities(
    spec: &WorkflowSpec,
    profile: &PatternProfile,
    shapes: &mut ShapeCatalog,
) -> Result<Vec<PlannedUtility>, SpecError> {
    let functions = naming::utilities(spec)?;
    let mut planned = Vec::new();

    for stub in profile.utilities {
        if functions.iter().any(|f| f == stub.name) {
            continue;
        }
        planned.push(PlannedUtility {
            function: stub.name.to_string(),
            params: stub.params.to_string(),
            returns: stub.returns.to_string(),
            doc: stub.doc.to_string(),
            guidance: stub.guidance.to_string(),
            shapes: Vec::new(),
            declared: false,
        });
    }

    for (i, (utility, function)) in spec.utilities.iter().zip(functions).enumerate() {
        let stem = utility.name.to_upper_camel_case();
        let mut used = Vec::new();

        let params = if utility.input.trim().is_empty() {
            String::new()
        } else {
            let shape = shapes.reference(
                &format!("utilities[{i}].input"),
                &utility.input,
                format!("{stem}Input"),
                format!("utils.{function} (input)"),
            )?;
            used.push(shape.clone());
            format!("payload: {shape}")
        };

        let returns = if utility.output.trim().is_empty() {
            "Any".to_string()
        } else {
            let shape = shapes.reference(
                &format!("utilities[{i}].output"),
                &utility.output,
                format!("{stem}Output"),
                format!("utils.{function} (output)"),
            )?;
            if !used.contains(&shape) {
                used.push(shape.clone());
            }
            shape
        };

        let doc = if utility.description.trim().is_empty() {
            format!("Utility {}.", utility.name)
        } else {
            utility.description.trim().to_string()
        };

        planned.push(PlannedUtility {
            guidance: format!("{function}: {doc}"),
            function,
            params,
            returns,
            doc,
            shapes: used,
            declared: true,
        });
    }

    Ok(planned)
}

fn plan_endpoints<'a>(
    spec: &'a WorkflowSpec,
    shapes: &mut ShapeCatalog,
) -> Result<Vec<PlannedEndpoint<'a>>, SpecError> {
    let idents = naming::endpoints(spec)?;
    let mut planned = Vec::with_capacity(idents.len());

    for (i, (endpoint, idents)) in spec.api_endpoints.iter().zip(idents).enumerate() {
        let user = |part: &str| format!("api.{} ({part})", idents.function);

        let request = match &endpoint.request {
            Some(contract) => Some(shapes.reference(
                &format!("api_endpoints[{i}].request"),
                contract,
                format!("{}Request", idents.class),
                user("request"),
            )?),
            None if endpoint.method.has_body() => Some(shapes.reference(
                &format!("api_endpoints[{i}].request"),
                "request body",
                format!("{}Request", idents.class),
                user("request"),
            )?),
            None => None,
        };

        let response = shapes.reference(
            &format!("api_endpoints[{i}].response"),
            endpoint.response.as_deref().unwrap_or("response body"),
            format!("{}Response", idents.class),
            user("response"),
        )?;

        planned.push(PlannedEndpoint {
            spec: endpoint,
            idents,
            request,
            response,
        });
    }

    Ok(planned)
}
