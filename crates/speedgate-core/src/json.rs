use speedgate_types::{JsonReport, RenderInput};

/// Machine-readable report, pretty-printed.
pub fn render_json(input: &RenderInput) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport::from(input))
}
