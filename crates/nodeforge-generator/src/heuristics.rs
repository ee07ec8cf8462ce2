//! Per-node guidance selection
//!
//! A fixed decision table matched against the node's name and description.
//! The first rule with a keyword hit wins. Rules only pick guidance text
//! and an optional suggested variant; the declared node type is never
//! changed.

use heck::ToSnakeCase;
use nodeforge_classifier::KeywordMatcher;
use nodeforge_model::{NodeSpec, NodeType};
use once_cell::sync::Lazy;
use std::fmt::{self, Display, Formatter};

/// Role a node plays, as inferred from its wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Chooses between transitions
    Decision,
    /// Looks data up
    Retrieval,
    /// Processes a collection item by item
    Iteration,
    /// Combines earlier results
    Aggregation,
    /// Produces text with a language model
    Generation,
    /// Nothing more specific matched
    General,
}

impl NodeRole {
    /// Lower-case name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Decision => "decision",
            NodeRole::Retrieval => "retrieval",
            NodeRole::Iteration => "iteration",
            NodeRole::Aggregation => "aggregation",
            NodeRole::Generation => "generation",
            NodeRole::General => "general",
        }
    }
}

impl Display for NodeRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guidance chosen for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeGuidance {
    /// Inferred role
    pub role: NodeRole,
    /// Keyword that selected the rule, if any
    pub matched: Option<String>,
    /// One-line role summary
    pub summary: &'static str,
    /// Guidance for the pre-stage
    pub prep: &'static str,
    /// Guidance for the compute stage
    pub exec: &'static str,
    /// Guidance for the post-stage
    pub post: &'static str,
    /// Variant that usually fits this role
    pub suggested: Option<NodeType>,
}

impl NodeGuidance {
    /// Suggested variant, only when it differs from `declared`
    #[must_use]
    pub fn suggestion_for(&self, declared: NodeType) -> Option<NodeType> {
        self.suggested.filter(|s| *s != declared)
    }
}

struct Rule {
    role: NodeRole,
    keywords: &'static [&'static str],
    summary: &'static str,
    prep: &'static str,
    exec: &'static str,
    post: &'static str,
    suggested: Option<NodeType>,
}

const RULES: &[Rule] = &[
    Rule {
        role: NodeRole::Decision,
        keywords: &[
            "decide", "decision", "route", "router", "classify", "choose", "branch", "judge",
            "evaluate", "check", "validate", "review", "approve", "triage",
        ],
        summary: "Chooses which transition the flow takes next.",
        prep: "Read the item under evaluation and the context needed to judge it from shared state.",
        exec: "Decide which transition applies using only prep_res. Return the chosen action label together with the reasoning behind it.",
        post: "Record the decision in shared state and return one of the labels declared in ACTIONS.",
        suggested: None,
    },
    Rule {
        role: NodeRole::Retrieval,
        keywords: &[
            "retrieve", "retrieval", "search", "lookup", "look up", "fetch", "query", "find",
            "load", "read", "embed", "embedding", "index",
        ],
        summary: "Looks up data the rest of the flow works from.",
        prep: "Read the query or lookup key from shared state.",
        exec: "Fetch the matching records through a utility such as a search or index lookup. Return them ranked, without touching shared state.",
        post: "Store the retrieved records in shared state for the next node.",
        suggested: Some(NodeType::Async),
    },
    Rule {
        role: NodeRole::Iteration,
        keywords: &[
            "each", "every", "batch", "items", "chunk", "chunks", "split", "map", "iterate",
            "files", "records", "pages",
        ],
        summary: "Processes a collection one item at a time.",
        prep: "Return the collection of items to process, read from shared state.",
        exec: "Process a single item. Keep it independent of the other items so the batch can run in any order.",
        post: "Collect the per-item results into shared state.",
        suggested: Some(NodeType::Batch),
    },
    Rule {
        role: NodeRole::Aggregation,
        keywords: &[
            "summarize", "summarise", "summary", "aggregate", "combine", "merge", "reduce",
            "collect", "consolidate", "rank",
        ],
        summary: "Combines results produced earlier in the flow.",
        prep: "Gather the partial results produced by earlier nodes from shared state.",
        exec: "Combine the partial results into one consolidated output, for example a summary or a ranking.",
        post: "Write the consolidated output to shared state.",
        suggested: None,
    },
    Rule {
        role: NodeRole::Generation,
        keywords: &[
            "generate", "write", "draft", "answer", "respond", "reply", "compose", "translate",
            "explain", "extract", "format",
        ],
        summary: "Produces new content with the language model.",
        prep: "Collect the inputs the prompt needs from shared state.",
        exec: "Build the prompt, call the language model utility and check the reply before returning it.",
        post: "Save the generated content in shared state.",
        suggested: None,
    },
];

const GENERAL: Rule = Rule {
    role: NodeRole::General,
    keywords: &[],
    summary: "Performs one step of the flow.",
    prep: "Read the inputs this step needs from shared state.",
    exec: "Turn prep_res into this step's result. Shared state is off limits here.",
    post: "Write the result to shared state and return the next action label.",
    suggested: None,
};

static MATCHERS: Lazy<Vec<Vec<KeywordMatcher>>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| {
            rule.keywords
                .iter()
                .map(|k| KeywordMatcher::new(k).expect("built-in heuristic keywords compile"))
                .collect()
        })
        .collect()
});

/// Pick guidance for a node
#[must_use]
pub fn guidance_for(node: &NodeSpec) -> NodeGuidance {
    let text = format!("{} {}", node.name.to_snake_case().replace('_', " "), node.description);
    for (rule, matchers) in RULES.iter().zip(MATCHERS.iter()) {
        if let Some(hit) = matchers.iter().find(|m| m.is_match(&text)) {
            return build(rule, Some(hit.keyword().to_string()));
        }
    }
    build(&GENERAL, None)
}

fn build(rule: &Rule, matched: Option<String>) -> NodeGuidance {
    NodeGuidance {
        role: rule.role,
        matched,
        summary: rule.summary,
        prep: rule.prep,
        exec: rule.exec,
        post: rule.post,
        suggested: rule.suggested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, description: &str) -> NodeRole {
        guidance_for(&NodeSpec::new(name, NodeType::Sync, description)).role
    }

    #[test]
    fn roles_from_names() {
        assert_eq!(role("Retrieve", ""), NodeRole::Retrieval);
        assert_eq!(role("Summarize", ""), NodeRole::Aggregation);
        assert_eq!(role("ChunkDocuments", ""), NodeRole::Iteration);
        assert_eq!(role("DraftReply", ""), NodeRole::Generation);
        assert_eq!(role("Start", ""), NodeRole::General);
    }

    #[test]
    fn decision_rule_wins_over_later_rules() {
        assert_eq!(role("Review", "search the answer and judge it"), NodeRole::Decision);
    }

    #[test]
    fn description_is_consulted() {
        assert_eq!(role("Step2", "look up the customer record"), NodeRole::Retrieval);
    }

    #[test]
    fn declared_type_is_kept_and_suggestion_filtered() {
        let node = NodeSpec::new("Retrieve", NodeType::Async, "");
        let g = guidance_for(&node);
        assert_eq!(g.suggestion_for(NodeType::Async), None);
        assert_eq!(g.suggestion_for(NodeType::Sync), Some(NodeType::Async));
        assert_eq!(node.node_type, NodeType::Async);
    }

    #[test]
    fn matched_keyword_is_reported() {
        let g = guidance_for(&NodeSpec::new("Triage", NodeType::Sync, ""));
        assert_eq!(g.matched.as_deref(), Some("triage"));
    }
}
