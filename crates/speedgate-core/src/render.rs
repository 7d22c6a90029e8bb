use std::sync::LazyLock;

use regex::Regex;
use speedgate_types::{LabeledRecord, RenderInput};

// OSC 8 hyperlink wrappers occupy no columns on screen.
static OSC8: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\u{1b}\\]8;;[^\u{7}]*\u{7}").expect("osc8 regex should compile")
});

const EMPTY_SECTION: &str = "(none)";

/// Plain-text report for terminals.
pub fn render_cli(input: &RenderInput) -> String {
    let mut lines: Vec<String> = Vec::new();

    push_section(&mut lines, "Summary", &input.overview);
    lines.push(String::new());
    push_section(&mut lines, "Field Data", &input.field_data);
    lines.push(String::new());
    push_section(&mut lines, "Lab Data", &input.lab_data);
    lines.push(String::new());
    push_section(&mut lines, "Opportunities", &input.opportunities);
    lines.push(String::new());
    lines.push(format!("Threshold: {}", input.threshold));

    lines.join("\n")
}

fn push_section(lines: &mut Vec<String>, title: &str, records: &[LabeledRecord]) {
    lines.push(title.to_string());

    if records.is_empty() {
        lines.push(EMPTY_SECTION.to_string());
        return;
    }

    let width = records
        .iter()
        .map(|r| visible_width(&r.label))
        .max()
        .unwrap_or(0);

    for r in records {
        let padding = " ".repeat(width - visible_width(&r.label));
        lines.push(format!("{}{padding}  {}", r.label, r.value));
    }
}

fn visible_width(label: &str) -> usize {
    OSC8.replace_all(label, "").chars().count()
}
