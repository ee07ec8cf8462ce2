//! File templates
//!
//! One module per emitted file family. Each template renders a
//! [`Blueprint`](crate::plan::Blueprint) into file content; none of them
//! reads anything else.

pub(crate) mod api;
pub(crate) mod design;
pub(crate) mod entry;
pub(crate) mod flow;
pub(crate) mod models;
pub(crate) mod nodes;
pub(crate) mod test_modules;
pub(crate) mod utils;

use crate::plan::Blueprint;

/// Module docstring opening every emitted Python file
pub(crate) fn module_header(bp: &Blueprint<'_>, summary: &str, detail: &[&str]) -> String {
    let mut lines = vec![format!("{summary} for {}.", bp.project.title)];
    if !detail.is_empty() {
        lines.push(String::new());
        for paragraph in detail {
            lines.extend(crate::python::wrap(paragraph, 72));
        }
    }
    crate::python::docstring("", &lines)
}
