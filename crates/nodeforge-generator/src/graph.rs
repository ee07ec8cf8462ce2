//! Flow graph derivation
//!
//! Edges come from two places: phrases in node descriptions
//! (`on approved go to Publish`, `loop back to Draft`) and node order
//! (`node[i] >> node[i + 1]` under the `default` label). An explicit
//! `default` edge replaces the ordered one; the last node gets no ordered
//! edge.

use nodeforge_model::NodeSpec;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, VecDeque};

/// Label of the ordered edge
pub const DEFAULT_LABEL: &str = "default";

/// Label of `loop back to` edges
pub const RETRY_LABEL: &str = "retry";

static ROUTE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bon\s+["']?([a-z][a-z0-9_-]*)["']?\s*,?\s*(?:go\s+to|goto|->|route\s+to|return\s+to|continue\s+to)\s+([a-z][a-z0-9_-]*)"#,
    )
    .expect("route phrase pattern is valid")
});

static LOOP_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bloop\s+back\s+to\s+([a-z][a-z0-9_-]*)").expect("loop phrase pattern is valid")
});

/// Where an edge came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Node order
    Ordered,
    /// Phrase in the source node's description
    Described,
}

/// One labelled transition between nodes, by node index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Source node index
    pub from: usize,
    /// Target node index
    pub to: usize,
    /// Action label
    pub label: String,
    /// Provenance
    pub origin: EdgeOrigin,
}

impl Edge {
    /// Whether this is the unlabelled `>>` transition
    #[inline]
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.label == DEFAULT_LABEL
    }
}

/// Directed, labelled node graph; start is always node 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowGraph {
    node_count: usize,
    edges: Vec<Edge>,
}

impl FlowGraph {
    /// Derive the graph of a node list
    ///
    /// `class_names` are the derived class names, matched alongside the raw
    /// node names when resolving phrase targets. Unknown targets are
    /// dropped with a debug log; a second edge with an already used label
    /// on the same node is dropped too.
    #[must_use]
    pub fn derive(nodes: &[NodeSpec], class_names: &[String]) -> Self {
        let lookup = |target: &str| -> Option<usize> {
            let target = target.to_lowercase();
            nodes.iter().zip(class_names).position(|(node, class)| {
                node.name.to_lowercase() == target
                    || class.to_lowercase() == target
                    || node.name.to_lowercase().replace([' ', '-'], "_") == target
            })
        };

        let mut edges: Vec<Edge> = Vec::new();
        for (from, node) in nodes.iter().enumerate() {
            let mut described: Vec<(String, &str)> = Vec::new();
            for caps in ROUTE_PHRASE.captures_iter(&node.description) {
                described.push((caps[1].to_lowercase(), caps.get(2).map_or("", |m| m.as_str())));
            }
            for caps in LOOP_PHRASE.captures_iter(&node.description) {
                described.push((RETRY_LABEL.to_string(), caps.get(1).map_or("", |m| m.as_str())));
            }

            for (label, target) in described {
                let Some(to) = lookup(target) else {
                    tracing::debug!(node = %node.name, target, "transition target is not a node; ignored");
                    continue;
                };
                if edges.iter().any(|e| e.from == from && e.label == label) {
                    tracing::debug!(node = %node.name, %label, "label already routed; later phrase ignored");
                    continue;
                }
                edges.push(Edge {
                    from,
                    to,
                    label,
                    origin: EdgeOrigin::Described,
                });
            }

            let has_default = edges.iter().any(|e| e.from == from && e.is_default());
            if !has_default && from + 1 < nodes.len() {
                edges.push(Edge {
                    from,
                    to: from + 1,
                    label: DEFAULT_LABEL.to_string(),
                    origin: EdgeOrigin::Ordered,
                });
            }
        }

        Self {
            node_count: nodes.len(),
            edges,
        }
    }

    /// All edges, grouped by source node
    #[must_use]
    pub fn edges(&self) -> Vec<&Edge> {
        let mut sorted: Vec<&Edge> = self.edges.iter().collect();
        sorted.sort_by_key(|e| (e.from, !e.is_default()));
        sorted
    }

    /// Outgoing edges of one node, `default` first
    #[must_use]
    pub fn outgoing(&self, node: usize) -> Vec<&Edge> {
        self.edges().into_iter().filter(|e| e.from == node).collect()
    }

    /// Action labels one node can return
    #[must_use]
    pub fn actions(&self, node: usize) -> Vec<String> {
        self.outgoing(node).into_iter().map(|e| e.label.clone()).collect()
    }

    /// Edges pointing at one node
    #[must_use]
    pub fn incoming(&self, node: usize) -> Vec<&Edge> {
        self.edges().into_iter().filter(|e| e.to == node).collect()
    }

    /// Nodes not reachable from node 0
    #[must_use]
    pub fn unreachable(&self) -> Vec<usize> {
        if self.node_count == 0 {
            return Vec::new();
        }
        let mut seen = BTreeSet::from([0]);
        let mut queue = VecDeque::from([0]);
        while let Some(current) = queue.pop_front() {
            for edge in self.edges.iter().filter(|e| e.from == current) {
                if seen.insert(edge.to) {
                    queue.push_back(edge.to);
                }
            }
        }
        (0..self.node_count).filter(|i| !seen.contains(i)).collect()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeforge_model::NodeType;
    use pretty_assertions::assert_eq;

    fn graph(nodes: &[(&str, &str)]) -> FlowGraph {
        let specs: Vec<NodeSpec> = nodes
            .iter()
            .map(|(n, d)| NodeSpec::new(*n, NodeType::Sync, *d))
            .collect();
        let classes: Vec<String> = specs.iter().map(|n| crate::naming::class_name(&n.name)).collect();
        FlowGraph::derive(&specs, &classes)
    }

    fn triples(g: &FlowGraph) -> Vec<(usize, usize, String)> {
        g.edges().into_iter().map(|e| (e.from, e.to, e.label.clone())).collect()
    }

    #[test]
    fn ordered_chain() {
        let g = graph(&[("A", ""), ("B", ""), ("C", "")]);
        assert_eq!(
            triples(&g),
            vec![(0, 1, "default".into()), (1, 2, "default".into())]
        );
        assert!(g.actions(2).is_empty());
        assert!(g.unreachable().is_empty());
    }

    #[test]
    fn described_edges_are_added() {
        let g = graph(&[
            ("Draft", ""),
            ("Review", "Judge the draft. On rejected go to Draft; on approved -> Publish."),
            ("Publish", ""),
        ]);
        assert_eq!(g.actions(1), vec!["default", "rejected", "approved"]);
        assert_eq!(
            triples(&g),
            vec![
                (0, 1, "default".into()),
                (1, 2, "default".into()),
                (1, 0, "rejected".into()),
                (1, 2, "approved".into()),
            ]
        );
    }

    #[test]
    fn loop_back_uses_retry_label() {
        let g = graph(&[("Fetch", ""), ("Check", "If incomplete, loop back to fetch")]);
        assert_eq!(g.actions(1), vec!["retry"]);
        assert_eq!(g.incoming(0).len(), 1);
    }

    #[test]
    fn explicit_default_replaces_ordered_edge() {
        let g = graph(&[("A", "on default go to C"), ("B", ""), ("C", "")]);
        assert_eq!(g.outgoing(0).len(), 1);
        assert_eq!(g.outgoing(0)[0].to, 2);
        assert_eq!(g.unreachable(), vec![1]);
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let g = graph(&[("A", "on error go to Nowhere"), ("B", "")]);
        assert_eq!(g.actions(0), vec!["default"]);
    }

    #[test]
    fn multi_word_names_match_snake_targets() {
        let g = graph(&[("Load Docs", ""), ("Answer", "on missing route to load_docs")]);
        assert_eq!(g.outgoing(1)[0].to, 0);
        let g = graph(&[("Load Docs", ""), ("Answer", "on missing route to LoadDocs")]);
        assert_eq!(g.outgoing(1)[0].to, 0);
    }

    #[test]
    fn repeated_label_keeps_first_target() {
        let g = graph(&[("A", "on x go to B, on x go to C"), ("B", ""), ("C", "")]);
        let x: Vec<usize> = g.outgoing(0).iter().filter(|e| e.label == "x").map(|e| e.to).collect();
        assert_eq!(x, vec![1]);
    }
}
