//! Python source text helpers
//!
//! Every piece of user text that lands in emitted Python goes through one
//! of these functions, so descriptions containing quotes, backslashes or
//! newlines never break the syntax of the output.

use std::fmt::Write as _;

/// Double-quoted string literal
pub(crate) fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c) & 0xff);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape text for the inside of a `"""` docstring
fn docstring_body(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => {}
            '\t' => out.push_str("    "),
            c if c.is_control() && c != '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Docstring at `indent`, one line or multi-line
///
/// `lines` are paragraphs; blank entries become blank lines. The result
/// ends with a newline.
pub(crate) fn docstring(indent: &str, lines: &[String]) -> String {
    let mut body = Vec::new();
    for line in lines {
        let escaped = docstring_body(line.trim_end());
        if escaped.trim().is_empty() {
            body.push(String::new());
        } else {
            body.extend(escaped.lines().map(str::to_string));
        }
    }
    let body = trim_blank_edges(body);

    match body.as_slice() {
        [] => format!("{indent}\"\"\"\"\"\"\n"),
        [single] => format!("{indent}\"\"\"{single}\"\"\"\n"),
        [first, rest @ ..] => {
            let mut out = format!("{indent}\"\"\"{first}\n");
            for line in rest {
                if line.trim().is_empty() {
                    out.push('\n');
                } else {
                    let _ = writeln!(out, "{indent}{}", line.trim_end());
                }
            }
            let _ = writeln!(out, "{indent}\"\"\"");
            out
        }
    }
}

fn trim_blank_edges(mut lines: Vec<String>) -> Vec<String> {
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Single-line `#` comment text: newlines folded into spaces
pub(crate) fn comment_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy word wrap at `width` columns
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `raise NotImplementedError("...")` at `indent`
pub(crate) fn not_implemented(indent: &str, guidance: &str) -> String {
    format!(
        "{indent}raise NotImplementedError({})\n",
        string_literal(&comment_text(guidance))
    )
}

/// `pytest.skip("not implemented: ...")` at `indent`
pub(crate) fn skip_not_implemented(indent: &str, guidance: &str) -> String {
    format!(
        "{indent}pytest.skip({})\n",
        string_literal(&format!("not implemented: {}", comment_text(guidance)))
    )
}

/// Tuple literal of string literals; `()` when empty
pub(crate) fn string_tuple(items: &[String]) -> String {
    match items {
        [] => "()".to_string(),
        [single] => format!("({},)", string_literal(single)),
        many => format!(
            "({})",
            many.iter().map(|s| string_literal(s)).collect::<Vec<_>>().join(", ")
        ),
    }
}
