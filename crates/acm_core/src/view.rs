//! Navigable views of the builder.
//!
//! Any view can be opened at any time; nothing gates the report on data.

use crate::model::metadata::CONFIGURATION_NOTE;
use crate::model::record::MatrixKind;
use crate::schema::schema_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Configuration,
    Matrix(MatrixKind),
    Report,
}

impl View {
    /// All views in navigation order.
    pub const ALL: [View; 5] = [
        View::Configuration,
        View::Matrix(MatrixKind::Technical),
        View::Matrix(MatrixKind::Shared),
        View::Matrix(MatrixKind::CmmcModel),
        View::Report,
    ];

    /// Stable id used by hosts for routing.
    pub fn id(self) -> &'static str {
        match self {
            Self::Configuration => "intro",
            Self::Matrix(kind) => kind.as_str(),
            Self::Report => "report",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Configuration => "1. Report Configuration",
            Self::Matrix(MatrixKind::Technical) => "2. Technical ACM",
            Self::Matrix(MatrixKind::Shared) => "3. Shared / CRM",
            Self::Matrix(MatrixKind::CmmcModel) => "4. CMMC Model Matrix",
            Self::Report => "View Full Report",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Configuration => "Org details & facilities",
            Self::Matrix(MatrixKind::Technical) => "Internal Systems & Roles",
            Self::Matrix(MatrixKind::Shared) => "Cloud & External Partners",
            Self::Matrix(MatrixKind::CmmcModel) => "Evidence & Justification",
            Self::Report => "Preview before printing",
        }
    }

    /// Guidance block shown on the view, if any.
    pub fn note(self) -> Option<&'static str> {
        match self {
            Self::Configuration => Some(CONFIGURATION_NOTE),
            Self::Matrix(kind) => schema_for(kind).educational_note,
            Self::Report => None,
        }
    }
}

/// Parses a view from its routing id.
pub fn parse_view(value: &str) -> Option<View> {
    let value = value.trim();
    View::ALL.into_iter().find(|view| view.id() == value)
}
