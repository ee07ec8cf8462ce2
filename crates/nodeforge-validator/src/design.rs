//! Design document checks

use crate::finding::{Finding, Severity, ValidationResult};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};

/// What the checks need from the design document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DesignOutline {
    pub(crate) title: Option<String>,
    /// Bodies of `mermaid` fenced blocks
    pub(crate) diagrams: Vec<String>,
}

impl DesignOutline {
    pub(crate) fn parse(text: &str) -> Self {
        let mut outline = Self::default();
        let mut in_title = false;
        let mut diagram: Option<String> = None;

        for event in Parser::new(text) {
            match event {
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H1,
                    ..
                }) if outline.title.is_none() => {
                    in_title = true;
                    outline.title = Some(String::new());
                }
                Event::End(TagEnd::Heading(_)) => in_title = false,
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang)))
                    if lang.split_whitespace().next() == Some("mermaid") =>
                {
                    diagram = Some(String::new());
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(body) = diagram.take() {
                        outline.diagrams.push(body);
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(body) = diagram.as_mut() {
                        body.push_str(&text);
                    } else if in_title {
                        if let Some(title) = outline.title.as_mut() {
                            title.push_str(&text);
                        }
                    }
                }
                _ => {}
            }
        }
        outline
    }

    /// Whether some diagram mentions `name` as a whole word
    pub(crate) fn shows(&self, name: &str) -> bool {
        self.diagrams.iter().any(|diagram| {
            diagram
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .any(|word| word == name)
        })
    }
}

/// Document-level checks; returns the outline for cross-checks
pub(crate) fn check(file: &str, text: &str, result: &mut ValidationResult) -> DesignOutline {
    let outline = DesignOutline::parse(text);
    if outline.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        result.push(Severity::Warning, Finding::new(file, "no top-level title"));
    }
    if outline.diagrams.is_empty() {
        result.push(
            Severity::Warning,
            Finding::new(file, "no mermaid diagram of the node transitions"),
        );
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Orders design\n\n## Flow\n\n```mermaid\nflowchart TD\n    load_node[\"Load\"] --> save_node\n```\n";

    #[test]
    fn finds_title_and_diagram() {
        let outline = DesignOutline::parse(DOC);
        assert_eq!(outline.title.as_deref(), Some("Orders design"));
        assert_eq!(outline.diagrams.len(), 1);
        assert!(outline.shows("Load"));
        assert!(outline.shows("save_node"));
        assert!(!outline.shows("Save"));
    }

    #[test]
    fn missing_diagram_is_a_warning() {
        let mut result = ValidationResult::default();
        check("docs/design.md", "# Orders\n\n```python\nx = 1\n```\n", &mut result);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("mermaid"));
    }

    #[test]
    fn untitled_document_is_a_warning() {
        let mut result = ValidationResult::default();
        check("docs/design.md", "## Flow\n\n```mermaid\nflowchart TD\n```\n", &mut result);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].message, "no top-level title");
    }
}
