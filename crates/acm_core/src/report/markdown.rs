//! Markdown rendering for on-screen preview.

use super::{ReportDocument, NO_ENTRIES_MARKER};
use std::fmt::Write;

/// Renders the report as GitHub-flavored Markdown.
pub fn render_markdown(doc: &ReportDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", doc.title);
    let _ = writeln!(out, "_{}_\n", doc.subtitle);

    for line in &doc.metadata {
        let _ = writeln!(out, "- **{}:** {}", line.label, inline(&line.value));
    }
    out.push('\n');

    for section in &doc.sections {
        let _ = writeln!(out, "## {}\n", section.heading);
        let _ = writeln!(out, "| {} |", section.columns.join(" | "));
        let _ = writeln!(
            out,
            "|{}",
            section.columns.iter().map(|_| " --- |").collect::<String>()
        );
        if section.is_empty() {
            // Keep the table shape so column count stays stable.
            let mut marker_row = vec![format!("_{NO_ENTRIES_MARKER}_")];
            marker_row.resize(section.columns.len(), String::new());
            let _ = writeln!(out, "| {} |", marker_row.join(" | "));
        } else {
            for row in &section.rows {
                let rendered = row.iter().map(|cell| inline(cell)).collect::<Vec<_>>();
                let _ = writeln!(out, "| {} |", rendered.join(" | "));
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "---\n\n{}", doc.footer);
    out
}

fn inline(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}
