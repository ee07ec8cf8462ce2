//! `main.py`

use super::module_header;
use crate::plan::Blueprint;
use crate::python::{docstring, not_implemented};

pub(crate) fn render(bp: &Blueprint<'_>) -> String {
    let mut out = module_header(bp, "Entry point", &["Run with: python main.py"]);

    let run = if bp.is_async() {
        out.push_str("\nimport asyncio\n");
        "asyncio.run(flow.run_async(shared))"
    } else {
        "flow.run(shared)"
    };

    out.push_str("\nfrom flow import create_flow\n");
    out.push_str("from models import SharedState\n");

    out.push_str("\n\ndef main():\n");
    out.push_str(&docstring("    ", &["Run the flow once and report the result.".to_string()]));
    out.push_str("    flow = create_flow()\n");
    out.push_str("    shared = SharedState().model_dump()\n");
    out.push_str(&not_implemented(
        "    ",
        &format!(
            "main: fill shared[\"request\"] from real input, call {run}, then print the results stored by the nodes"
        ),
    ));
    out.push_str("\n\nif __name__ == \"__main__\":\n    main()\n");
    out
}
