//! Python source parsing
//!
//! Parses a module with tree-sitter and reduces the tree to an owned
//! [`Outline`]: the classes, stages, imports, comments and placeholder
//! markers the checks look at, plus the transitions of a flow module.
//! Checks never touch the syntax tree directly.

use tree_sitter::{Node, Parser, Tree};

/// Why a module could not be outlined
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Grammar could not be loaded into the parser
    #[error("python grammar unavailable: {0}")]
    Grammar(String),

    /// Parser gave up without a tree
    #[error("parser produced no syntax tree")]
    NoTree,

    /// Source contains a syntax error
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl SourceError {
    /// Line the error points at, if any
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } => Some(*line),
            Self::Grammar(_) | Self::NoTree => None,
        }
    }
}

/// Parsed Python module
pub(crate) struct PythonSource<'a> {
    text: &'a str,
    tree: Tree,
}

/// Method defined directly in a class body
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MethodOutline {
    pub(crate) name: String,
    pub(crate) line: usize,
    pub(crate) is_async: bool,
    /// Body opens with a docstring or contains a comment
    pub(crate) has_guidance: bool,
    /// Body contains a "not implemented" marker
    pub(crate) has_marker: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassOutline {
    pub(crate) name: String,
    pub(crate) line: usize,
    /// Base names, last dotted segment only
    pub(crate) bases: Vec<String>,
    pub(crate) methods: Vec<MethodOutline>,
    /// String labels of an `ACTIONS = (...)` class attribute
    pub(crate) actions: Option<Vec<String>>,
}

impl ClassOutline {
    pub(crate) fn method(&self, name: &str) -> Option<&MethodOutline> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportOutline {
    /// Absolute dotted module name
    pub(crate) module: String,
    pub(crate) line: usize,
}

/// `var = Class()` in a flow module
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Instance {
    pub(crate) var: String,
    pub(crate) class: String,
    pub(crate) line: usize,
}

/// `from - "label" >> to` (or `from >> to` for `default`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) from: String,
    pub(crate) label: String,
    pub(crate) to: String,
    pub(crate) line: usize,
}

/// Flow wiring found in a module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlowWiring {
    pub(crate) instances: Vec<Instance>,
    pub(crate) transitions: Vec<Transition>,
    /// Start variable and line of the `Flow(start=...)` call
    pub(crate) start: Option<(String, usize)>,
}

impl FlowWiring {
    pub(crate) fn instance(&self, var: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.var == var)
    }
}

/// Everything the checks need from one module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Outline {
    pub(crate) classes: Vec<ClassOutline>,
    pub(crate) imports: Vec<ImportOutline>,
    /// `(line, text)` of every comment, `#` included
    pub(crate) comments: Vec<(usize, String)>,
    pub(crate) markers: usize,
    pub(crate) wiring: FlowWiring,
}

/// Flow classes whose instances are not nodes
pub(crate) const FLOW_CLASSES: [&str; 2] = ["Flow", "AsyncFlow"];

/// Default transition label
pub(crate) const DEFAULT_ACTION: &str = "default";

impl<'a> PythonSource<'a> {
    /// Parse a module
    ///
    /// # Errors
    /// [`SourceError::Malformed`] with the first offending line when the
    /// tree contains an error or missing node
    pub(crate) fn parse(text: &'a str) -> Result<Self, SourceError> {
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| SourceError::Grammar(e.to_string()))?;

        let tree = parser.parse(text, None).ok_or(SourceError::NoTree)?;
        let source = Self { text, tree };

        let root = source.tree.root_node();
        if root.has_error() {
            let (line, message) = source.first_error(root).unwrap_or((1, "syntax error".to_string()));
            return Err(SourceError::Malformed { line, message });
        }
        Ok(source)
    }

    fn text_of(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }

    fn first_error(&self, node: Node<'_>) -> Option<(usize, String)> {
        if node.is_missing() {
            return Some((line_of(node), format!("missing `{}`", node.kind())));
        }
        if node.is_error() {
            let snippet: String = self.text_of(node).lines().next().unwrap_or("").chars().take(24).collect();
            return Some((line_of(node), format!("unexpected `{}`", snippet.trim())));
        }
        children(node)
            .into_iter()
            .filter(|c| c.has_error() || c.is_missing())
            .find_map(|c| self.first_error(c))
    }

    /// Reduce the module to its outline
    pub(crate) fn outline(&self) -> Outline {
        let mut outline = Outline::default();
        self.visit(self.tree.root_node(), &mut outline);
        outline
    }

    fn visit(&self, node: Node<'_>, outline: &mut Outline) {
        match node.kind() {
            "class_definition" => {
                if let Some(class) = self.class_outline(node) {
                    outline.classes.push(class);
                }
            }
            "import_statement" => {
                for name in named_children(node) {
                    let dotted = match name.kind() {
                        "aliased_import" => name.child_by_field_name("name"),
                        "dotted_name" => Some(name),
                        _ => None,
                    };
                    if let Some(dotted) = dotted {
                        outline.imports.push(ImportOutline {
                            module: self.dotted(dotted),
                            line: line_of(node),
                        });
                    }
                }
            }
            "import_from_statement" => {
                if let Some(module) = node.child_by_field_name("module_name") {
                    if module.kind() == "dotted_name" {
                        self.from_imports(node, &self.dotted(module), &mut outline.imports);
                    }
                }
            }
            "comment" => outline.comments.push((line_of(node), self.text_of(node).to_string())),
            "raise_statement" | "call" if self.is_marker(node) => outline.markers += 1,
            "assignment" => self.record_instance(node, &mut outline.wiring),
            "expression_statement" => {
                if let Some(expr) = named_children(node).into_iter().next() {
                    if is_operator(expr, ">>") {
                        self.transition_chain(expr, &mut outline.wiring.transitions);
                    }
                }
            }
            _ => {}
        }
        if node.kind() == "call" {
            self.record_start(node, &mut outline.wiring);
        }
        for child in children(node) {
            self.visit(child, outline);
        }
    }

    fn dotted(&self, node: Node<'_>) -> String {
        self.text_of(node).split_whitespace().collect()
    }

    /// `from a import b, c as d` records `a.b` and `a.c`; a wildcard records `a`
    fn from_imports(&self, node: Node<'_>, module: &str, imports: &mut Vec<ImportOutline>) {
        let line = line_of(node);
        let mut cursor = node.walk();
        let names: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .filter_map(|name| match name.kind() {
                "aliased_import" => name.child_by_field_name("name"),
                "dotted_name" => Some(name),
                _ => None,
            })
            .map(|name| format!("{module}.{}", self.dotted(name)))
            .collect();
        if names.is_empty() {
            imports.push(ImportOutline { module: module.to_string(), line });
        } else {
            imports.extend(names.into_iter().map(|module| ImportOutline { module, line }));
        }
    }

    fn class_outline(&self, node: Node<'_>) -> Option<ClassOutline> {
        let name = self.text_of(node.child_by_field_name("name")?).to_string();
        let bases = node
            .child_by_field_name("superclasses")
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .filter(|b| matches!(b.kind(), "identifier" | "attribute"))
                    .map(|b| {
                        let text = self.dotted(b);
                        text.rsplit('.').next().unwrap_or_default().to_string()
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut methods = Vec::new();
        let mut actions = None;
        if let Some(body) = node.child_by_field_name("body") {
            for statement in named_children(body) {
                let definition = if statement.kind() == "decorated_definition" {
                    statement.child_by_field_name("definition")
                } else {
                    Some(statement)
                };
                match definition {
                    Some(def) if def.kind() == "function_definition" => {
                        if let Some(method) = self.method_outline(def) {
                            methods.push(method);
                        }
                    }
                    Some(def) if def.kind() == "expression_statement" => {
                        if let Some(labels) = self.actions_attribute(def) {
                            actions = Some(labels);
                        }
                    }
                    _ => {}
                }
            }
        }

        Some(ClassOutline {
            name,
            line: line_of(node),
            bases,
            methods,
            actions,
        })
    }

    fn method_outline(&self, node: Node<'_>) -> Option<MethodOutline> {
        let name = self.text_of(node.child_by_field_name("name")?).to_string();
        let is_async = children(node).iter().any(|c| c.kind() == "async");
        let body = node.child_by_field_name("body");

        let docstring = body
            .and_then(|b| named_children(b).into_iter().next())
            .filter(|first| first.kind() == "expression_statement")
            .and_then(|first| named_children(first).into_iter().next())
            .is_some_and(|expr| expr.kind() == "string");
        let has_guidance = docstring || self.any_descendant(node, &|n| n.kind() == "comment");
        let has_marker = body.is_some_and(|b| self.any_descendant(b, &|n| self.is_marker(n)));

        Some(MethodOutline {
            name,
            line: line_of(node),
            is_async,
            has_guidance,
            has_marker,
        })
    }

    fn any_descendant(&self, node: Node<'_>, predicate: &dyn Fn(Node<'_>) -> bool) -> bool {
        predicate(node) || children(node).into_iter().any(|c| self.any_descendant(c, predicate))
    }

    /// `raise NotImplementedError(...)` or `pytest.skip("not implemented...")`
    fn is_marker(&self, node: Node<'_>) -> bool {
        match node.kind() {
            "raise_statement" => named_children(node).into_iter().next().is_some_and(|raised| {
                let callee = if raised.kind() == "call" {
                    raised.child_by_field_name("function")
                } else {
                    Some(raised)
                };
                callee.is_some_and(|c| self.dotted(c) == "NotImplementedError")
            }),
            "call" => {
                let Some(function) = node.child_by_field_name("function") else {
                    return false;
                };
                if self.dotted(function) != "pytest.skip" {
                    return false;
                }
                node.child_by_field_name("arguments")
                    .and_then(|args| named_children(args).into_iter().next())
                    .filter(|arg| arg.kind() == "string")
                    .is_some_and(|arg| {
                        string_value(self.text_of(arg))
                            .to_lowercase()
                            .starts_with("not implemented")
                    })
            }
            _ => false,
        }
    }

    fn actions_attribute(&self, statement: Node<'_>) -> Option<Vec<String>> {
        let assignment = named_children(statement)
            .into_iter()
            .find(|n| n.kind() == "assignment")?;
        let left = assignment.child_by_field_name("left")?;
        if self.text_of(left) != "ACTIONS" {
            return None;
        }
        let right = assignment.child_by_field_name("right")?;
        let labels = match right.kind() {
            "string" => vec![string_value(self.text_of(right))],
            _ => named_children(right)
                .into_iter()
                .filter(|item| item.kind() == "string")
                .map(|item| string_value(self.text_of(item)))
                .collect(),
        };
        Some(labels)
    }

    fn record_instance(&self, node: Node<'_>, wiring: &mut FlowWiring) {
        let (Some(left), Some(right)) = (node.child_by_field_name("left"), node.child_by_field_name("right"))
        else {
            return;
        };
        if left.kind() != "identifier" || right.kind() != "call" {
            return;
        }
        let Some(function) = right.child_by_field_name("function") else {
            return;
        };
        if !matches!(function.kind(), "identifier" | "attribute") {
            return;
        }
        let class = self.dotted(function).rsplit('.').next().unwrap_or_default().to_string();
        if class.chars().next().is_some_and(char::is_uppercase) && !FLOW_CLASSES.contains(&class.as_str()) {
            wiring.instances.push(Instance {
                var: self.text_of(left).to_string(),
                class,
                line: line_of(node),
            });
        }
    }

    fn record_start(&self, call: Node<'_>, wiring: &mut FlowWiring) {
        let Some(function) = call.child_by_field_name("function") else {
            return;
        };
        let name = self.dotted(function);
        if !FLOW_CLASSES.contains(&name.rsplit('.').next().unwrap_or_default()) {
            return;
        }
        let Some(args) = call.child_by_field_name("arguments") else {
            return;
        };
        let args = named_children(args);
        let keyword = args.iter().find_map(|arg| {
            if arg.kind() != "keyword_argument" {
                return None;
            }
            let name = arg.child_by_field_name("name")?;
            (self.text_of(name) == "start").then(|| arg.child_by_field_name("value")).flatten()
        });
        let value = keyword.or_else(|| args.first().copied().filter(|a| a.kind() == "identifier"));
        if let Some(value) = value.filter(|v| v.kind() == "identifier") {
            wiring.start = Some((self.text_of(value).to_string(), line_of(call)));
        }
    }

    /// Record the transitions of a `>>` expression; returns the variable
    /// the expression evaluates to
    fn transition_chain(&self, node: Node<'_>, out: &mut Vec<Transition>) -> Option<String> {
        if node.kind() == "identifier" {
            return Some(self.text_of(node).to_string());
        }
        if !is_operator(node, ">>") {
            return None;
        }
        let left = node.child_by_field_name("left")?;
        let right = node.child_by_field_name("right")?;

        let (source, label) = if is_operator(left, "-") {
            let labelled = left.child_by_field_name("right")?;
            if labelled.kind() != "string" {
                return None;
            }
            let source = self.transition_chain(left.child_by_field_name("left")?, out)?;
            (source, string_value(self.text_of(labelled)))
        } else {
            (self.transition_chain(left, out)?, DEFAULT_ACTION.to_string())
        };

        if right.kind() != "identifier" {
            return None;
        }
        let target = self.text_of(right).to_string();
        out.push(Transition {
            from: source,
            label,
            to: target.clone(),
            line: line_of(node),
        });
        Some(target)
    }
}

fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

fn children(node: Node<'_>) -> Vec<Node<'_>> {
    node.children(&mut node.walk()).collect()
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    node.named_children(&mut node.walk()).collect()
}

fn is_operator(node: Node<'_>, operator: &str) -> bool {
    node.kind() == "binary_operator"
        && node
            .child_by_field_name("operator")
            .is_some_and(|op| op.kind() == operator)
}

/// Value of a simple string literal: prefix and quotes stripped
pub(crate) fn string_value(literal: &str) -> String {
    let body = literal.trim_start_matches(|c: char| "rRbBuUfF".contains(c));
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body.strip_prefix(quote).and_then(|b| b.strip_suffix(quote)) {
            return inner.to_string();
        }
    }
    body.to_string()
}
