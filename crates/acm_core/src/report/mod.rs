//! Printable report projection.
//!
//! # Responsibility
//! - Project `AppState` into a fixed document: metadata block, then the
//!   Technical, Shared and CMMC Model tables in that order.
//! - Render the document as Markdown (preview) or standalone HTML (print).
//!
//! # Invariants
//! - Projection and rendering are pure; equal state renders equal output.
//! - Table columns are fixed per matrix, independent of editor schemas.
//! - Empty tables carry `NO_ENTRIES_MARKER` instead of rows.

mod html;
mod markdown;

use crate::model::metadata::ReportMetadata;
use crate::model::state::AppState;

pub use html::render_html;
pub use markdown::render_markdown;

pub const REPORT_TITLE: &str = "Access Control Matrix Report";
pub const REPORT_SUBTITLE: &str = "CMMC Level 2 Audit Documentation";
pub const REPORT_FOOTER: &str =
    "Generated by CMMC Access Control Matrix Builder - Instructional Tool";
pub const NO_ENTRIES_MARKER: &str = "No entries recorded.";
/// Shown for blank metadata values.
pub const MISSING_VALUE: &str = "N/A";

/// One labelled metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLine {
    pub label: &'static str,
    pub value: String,
}

/// One report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub heading: &'static str,
    pub columns: &'static [&'static str],
    /// Cell text per row; each row has `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl ReportSection {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Complete report document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub metadata: Vec<MetadataLine>,
    pub sections: Vec<ReportSection>,
    pub footer: &'static str,
}

impl ReportDocument {
    /// Projects state into the report. Total over every state.
    pub fn from_state(state: &AppState) -> Self {
        Self {
            title: REPORT_TITLE,
            subtitle: REPORT_SUBTITLE,
            metadata: metadata_lines(&state.metadata),
            sections: vec![
                ReportSection {
                    heading: "1. Technical Access Control Matrix",
                    columns: &["Subjects", "Objects/Resources", "Permissions"],
                    rows: state
                        .tech_entries
                        .iter()
                        .map(|e| cells(&[&e.subject, &e.object, &e.permission]))
                        .collect(),
                },
                ReportSection {
                    heading: "2. Shared/Customer Responsibility Matrix",
                    columns: &[
                        "Subjects",
                        "Objects/Resources",
                        "Permissions",
                        "Share Partner",
                    ],
                    rows: state
                        .shared_entries
                        .iter()
                        .map(|e| cells(&[&e.subject, &e.object, &e.permission, &e.partner]))
                        .collect(),
                },
                ReportSection {
                    heading: "3. CMMC Model Matrix",
                    columns: &[
                        "Subject ID",
                        "Object/Resource",
                        "Permission Level",
                        "Justification",
                        "Evidence Link",
                    ],
                    rows: state
                        .cmmc_entries
                        .iter()
                        .map(|e| {
                            cells(&[
                                &e.subject_id,
                                &e.object,
                                &e.permission,
                                &e.justification,
                                &e.evidence_link,
                            ])
                        })
                        .collect(),
                },
            ],
            footer: REPORT_FOOTER,
        }
    }
}

fn cells(values: &[&String]) -> Vec<String> {
    values.iter().map(|value| (*value).clone()).collect()
}

fn metadata_lines(metadata: &ReportMetadata) -> Vec<MetadataLine> {
    [
        ("Organization", &metadata.organization_name),
        ("Completed By", &metadata.author),
        ("Facilities", &metadata.facilities),
        ("Date Completed", &metadata.date_completed),
        ("Next Review", &metadata.next_review_date),
    ]
    .into_iter()
    .map(|(label, value)| MetadataLine {
        label,
        value: if value.is_empty() {
            MISSING_VALUE.to_string()
        } else {
            value.clone()
        },
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{ReportDocument, MISSING_VALUE};
    use crate::model::state::AppState;

    #[test]
    fn empty_state_projects_blank_metadata_and_empty_sections() {
        let doc = ReportDocument::from_state(&AppState::default());
        assert_eq!(doc.metadata.len(), 5);
        assert!(doc.metadata.iter().all(|line| line.value == MISSING_VALUE));
        assert_eq!(doc.sections.len(), 3);
        assert!(doc.sections.iter().all(|section| section.is_empty()));
    }

    #[test]
    fn only_empty_metadata_renders_as_missing() {
        let mut state = AppState::default();
        state.metadata.author = "   ".to_string();
        let doc = ReportDocument::from_state(&state);
        assert_eq!(doc.metadata[0].value, MISSING_VALUE);
        assert_eq!(doc.metadata[1].label, "Completed By");
        assert_eq!(doc.metadata[1].value, "   ");
    }
}
