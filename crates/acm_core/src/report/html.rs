//! Standalone HTML rendering for printing.

use super::{ReportDocument, NO_ENTRIES_MARKER};
use std::fmt::Write;

const PRINT_STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:0 auto;padding:2rem;color:#0f172a}\
header{text-align:center;border-bottom:2px solid #1e293b;margin-bottom:2rem}\
dl{display:grid;grid-template-columns:max-content 1fr;gap:.25rem 1rem;border:1px solid #cbd5e1;padding:1rem}\
dt{font-weight:600;color:#64748b}\
section{break-inside:avoid;margin-bottom:2.5rem}\
table{width:100%;border-collapse:collapse}\
th,td{border:1px solid #cbd5e1;padding:.5rem 1rem;text-align:left;white-space:pre-wrap}\
th{background:#f1f5f9}\
td.empty{text-align:center;font-style:italic;color:#64748b}\
footer{text-align:center;font-size:.75rem;color:#94a3b8;border-top:1px solid #e2e8f0;padding-top:1rem}";

/// Renders the report as a self-contained HTML page.
///
/// All document text is escaped; the output contains no scripts.
pub fn render_html(doc: &ReportDocument) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(doc.title));
    let _ = writeln!(out, "<style>{PRINT_STYLE}</style>");
    out.push_str("</head>\n<body>\n");

    let _ = writeln!(
        out,
        "<header><h1>{}</h1><p>{}</p></header>",
        escape(doc.title),
        escape(doc.subtitle)
    );

    out.push_str("<dl>\n");
    for line in &doc.metadata {
        let _ = writeln!(
            out,
            "<dt>{}:</dt><dd>{}</dd>",
            escape(line.label),
            escape(&line.value)
        );
    }
    out.push_str("</dl>\n");

    for section in &doc.sections {
        let _ = writeln!(out, "<section>\n<h2>{}</h2>", escape(section.heading));
        out.push_str("<table>\n<thead><tr>");
        for column in section.columns {
            let _ = write!(out, "<th>{}</th>", escape(column));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        if section.is_empty() {
            let _ = writeln!(
                out,
                "<tr><td class=\"empty\" colspan=\"{}\">{}</td></tr>",
                section.columns.len(),
                NO_ENTRIES_MARKER
            );
        } else {
            for row in &section.rows {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", escape(cell));
                }
                out.push_str("</tr>\n");
            }
        }
        out.push_str("</tbody>\n</table>\n</section>\n");
    }

    let _ = writeln!(out, "<footer>{}</footer>", escape(doc.footer));
    out.push_str("</body>\n</html>\n");
    out
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }
}
