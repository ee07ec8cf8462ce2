//! Flow graph checks
//!
//! Cross-checks the wiring of the flow module against the `ACTIONS`
//! declared by node classes anywhere in the file set, then walks the
//! graph from the start node.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::source::{ClassOutline, FlowWiring};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Conventional location of the flow module
pub const FLOW_MODULE: &str = "flow.py";

/// Counts reported in the flow summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlowSummary {
    pub(crate) nodes: usize,
    pub(crate) transitions: usize,
    pub(crate) reachable: usize,
}

/// Check the wiring of `file`
///
/// `classes` maps class names to their outlines across the file set. With
/// `complete` false some module failed to parse, so classes the wiring
/// refers to may simply be missing from the map; those edges are skipped
/// instead of reported.
pub(crate) fn check(
    file: &str,
    wiring: &FlowWiring,
    classes: &HashMap<&str, &ClassOutline>,
    complete: bool,
    result: &mut ValidationResult,
) -> FlowSummary {
    let mut error = |line: Option<usize>, message: String| {
        let finding = Finding::new(file, message);
        let finding = match line {
            Some(line) => finding.at(line),
            None => finding,
        };
        result.push(Severity::Error, finding);
    };

    for transition in &wiring.transitions {
        for var in [&transition.from, &transition.to] {
            if wiring.instance(var).is_none() {
                error(
                    Some(transition.line),
                    format!("transition uses '{var}', which is never instantiated from a node class"),
                );
            }
        }

        let Some(instance) = wiring.instance(&transition.from) else {
            continue;
        };
        match classes.get(instance.class.as_str()) {
            None if complete => error(
                Some(instance.line),
                format!("class {} of '{}' is not defined in the file set", instance.class, instance.var),
            ),
            None => {}
            Some(class) => match &class.actions {
                None => error(
                    Some(transition.line),
                    format!(
                        "dangling action label \"{}\": {} declares no ACTIONS",
                        transition.label, class.name
                    ),
                ),
                Some(actions) if !actions.contains(&transition.label) => error(
                    Some(transition.line),
                    format!(
                        "dangling action label \"{}\": {}.ACTIONS declares ({})",
                        transition.label,
                        class.name,
                        actions.iter().map(|a| format!("\"{a}\"")).collect::<Vec<_>>().join(", ")
                    ),
                ),
                Some(_) => {}
            },
        }
    }

    let Some((start, start_line)) = &wiring.start else {
        error(None, "no Flow(start=...) or AsyncFlow(start=...) is built".to_string());
        return FlowSummary {
            nodes: wiring.instances.len(),
            transitions: wiring.transitions.len(),
            reachable: 0,
        };
    };
    if wiring.instance(start).is_none() {
        error(
            Some(*start_line),
            format!("start node '{start}' is never instantiated from a node class"),
        );
    }

    let mut seen = BTreeSet::from([start.as_str()]);
    let mut queue = VecDeque::from([start.as_str()]);
    while let Some(current) = queue.pop_front() {
        for transition in wiring.transitions.iter().filter(|t| t.from == current) {
            if seen.insert(transition.to.as_str()) {
                queue.push_back(transition.to.as_str());
            }
        }
    }
    for instance in &wiring.instances {
        if !seen.contains(instance.var.as_str()) {
            error(
                Some(instance.line),
                format!(
                    "node '{}' ({}) is unreachable from start node '{start}'",
                    instance.var, instance.class
                ),
            );
        }
    }

    let mut never_instantiated: Vec<&str> = classes
        .keys()
        .copied()
        .filter(|class| !wiring.instances.iter().any(|i| i.class == *class))
        .collect();
    never_instantiated.sort_unstable();
    for class in never_instantiated {
        error(
            None,
            format!("node class {class} is never instantiated, so it is unreachable from start node '{start}'"),
        );
    }

    unused_actions(file, wiring, classes, result);

    FlowSummary {
        nodes: wiring.instances.len(),
        transitions: wiring.transitions.len(),
        reachable: wiring.instances.iter().filter(|i| seen.contains(i.var.as_str())).count(),
    }
}

/// Labels a class declares that the flow never routes
fn unused_actions(
    file: &str,
    wiring: &FlowWiring,
    classes: &HashMap<&str, &ClassOutline>,
    result: &mut ValidationResult,
) {
    for instance in &wiring.instances {
        let Some(actions) = classes.get(instance.class.as_str()).and_then(|c| c.actions.as_ref()) else {
            continue;
        };
        for label in actions {
            let routed = wiring
                .transitions
                .iter()
                .any(|t| t.from == instance.var && &t.label == label);
            if !routed {
                result.push(
                    Severity::Warning,
                    Finding::new(
                        file,
                        format!(
                            "{}.ACTIONS declares \"{label}\" but '{}' never routes it",
                            instance.class, instance.var
                        ),
                    )
                    .at(instance.line),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PythonSource;
    use pretty_assertions::assert_eq;

    const NODES: &str = r#"
class Draft(Node):
    ACTIONS = ("default",)

class Review(Node):
    ACTIONS = ("default", "rejected")

class Publish(Node):
    ACTIONS = ()
"#;

    fn run(flow: &str) -> (ValidationResult, FlowSummary) {
        let nodes = PythonSource::parse(NODES).unwrap().outline();
        let classes: HashMap<&str, &ClassOutline> =
            nodes.classes.iter().map(|c| (c.name.as_str(), c)).collect();
        let wiring = PythonSource::parse(flow).unwrap().outline().wiring;
        let mut result = ValidationResult::default();
        let summary = check(FLOW_MODULE, &wiring, &classes, true, &mut result);
        (result, summary)
    }

    fn messages(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.message.as_str()).collect()
    }

    #[test]
    fn well_wired_flow_is_clean() {
        let (result, summary) = run(r#"
def create_flow():
    draft = Draft()
    review = Review()
    publish = Publish()
    draft >> review
    review >> publish
    review - "rejected" >> draft
    return Flow(start=draft)
"#);
        assert_eq!(messages(&result.errors), Vec::<&str>::new());
        assert!(result.warnings.is_empty());
        assert_eq!(
            summary,
            FlowSummary {
                nodes: 3,
                transitions: 3,
                reachable: 3
            }
        );
    }

    #[test]
    fn dangling_label_is_an_error() {
        let (result, _) = run(r#"
draft = Draft()
review = Review()
publish = Publish()
draft >> review
review >> publish
review - "approved" >> publish
flow = Flow(start=draft)
"#);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.starts_with("dangling action label \"approved\""));
        assert_eq!(result.errors[0].line, Some(7));
    }

    #[test]
    fn unreachable_node_is_an_error() {
        let (result, summary) = run(r"
draft = Draft()
review = Review()
publish = Publish()
draft >> publish
flow = Flow(start=draft)
");
        assert_eq!(
            messages(&result.errors),
            ["node 'review' (Review) is unreachable from start node 'draft'"]
        );
        assert_eq!(summary.reachable, 2);

        let (result, summary) = run(r"
draft = Draft()
publish = Publish()
draft >> publish
flow = Flow(start=draft)
");
        assert_eq!(
            messages(&result.errors),
            ["node class Review is never instantiated, so it is unreachable from start node 'draft'"]
        );
        assert_eq!(result.errors[0].line, None);
        assert_eq!(summary.reachable, 2);
    }

    #[test]
    fn missing_start_and_unknown_variables() {
        let (result, _) = run("draft = Draft()\ndraft >> ghost\n");
        let errors = messages(&result.errors);
        assert!(errors.iter().any(|m| m.contains("'ghost', which is never instantiated")));
        assert!(errors.iter().any(|m| m.starts_with("no Flow(start=...)")));
    }

    #[test]
    fn unrouted_actions_are_warned_about() {
        let (result, _) = run(r"
draft = Draft()
review = Review()
publish = Publish()
draft >> review
review >> publish
flow = Flow(start=draft)
");
        assert!(result.errors.is_empty());
        assert_eq!(
            messages(&result.warnings),
            ["Review.ACTIONS declares \"rejected\" but 'review' never routes it"]
        );
    }
}
