//! Declarative column schemas for the matrix editor.
//!
//! # Responsibility
//! - Describe each matrix's columns: key, label, placeholder, input mode.
//! - Provide the three built-in schemas consumed by editor hosts.
//!
//! # Invariants
//! - Column order is display order in both table and form.
//! - Column keys match the `MatrixEntry::FIELD_KEYS` of the schema's kind.

use crate::model::record::MatrixKind;

/// How one column is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Unbounded text entry.
    FreeText,
    /// Pick one of the listed choices.
    Choice(&'static [&'static str]),
}

/// One column of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub input: InputMode,
}

impl ColumnDescriptor {
    const fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            placeholder: Some(placeholder),
            input: InputMode::FreeText,
        }
    }
}

/// Full editor description of one matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixSchema {
    pub kind: MatrixKind,
    pub title: &'static str,
    pub description: &'static str,
    /// Compliance guidance shown above the table.
    pub educational_note: Option<&'static str>,
    pub columns: &'static [ColumnDescriptor],
}

impl MatrixSchema {
    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.key == key)
    }

    /// Column keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.key)
    }
}

pub static TECHNICAL_SCHEMA: MatrixSchema = MatrixSchema {
    kind: MatrixKind::Technical,
    title: "Technical Access Control Matrix",
    description: "Map subjects to objects and define precise permission levels.",
    educational_note: Some(
        "Subjects must align with organizational roles (AC.L2-3.1.4). Objects must include all systems processing CUI.",
    ),
    columns: &[
        ColumnDescriptor::text("subject", "Subject", "e.g., Network Admin Group"),
        ColumnDescriptor::text("object", "Object/Resource", "e.g., File Server Volume X"),
        ColumnDescriptor::text("permission", "Permissions", "e.g., Read, Write, Execute"),
    ],
};

pub static SHARED_SCHEMA: MatrixSchema = MatrixSchema {
    kind: MatrixKind::Shared,
    title: "Shared / Customer Responsibility Matrix",
    description: "Document access controls managed by external partners or cloud providers.",
    educational_note: Some(
        "Clearly define the Share Partner to delineate responsibility boundaries for CMMC assessment.",
    ),
    columns: &[
        ColumnDescriptor::text("subject", "Subject", "e.g., MSP Admin"),
        ColumnDescriptor::text("object", "Object/Resource", "e.g., Hosted Exchange Server"),
        ColumnDescriptor::text("permission", "Permissions", "e.g., Full Control"),
        ColumnDescriptor::text("partner", "Share Partner", "e.g., AWS, Microsoft 365"),
    ],
};

pub static CMMC_MODEL_SCHEMA: MatrixSchema = MatrixSchema {
    kind: MatrixKind::CmmcModel,
    title: "CMMC Model Matrix",
    description: "Provide detailed justification and evidence links for compliance verification.",
    educational_note: Some(
        "The 'Justification' column validates Least Privilege (AC.L2-3.1.5). 'Evidence Link' is critical for C3PAO audits.",
    ),
    columns: &[
        ColumnDescriptor::text("subjectId", "Subject ID", "e.g., Role-DBA-01"),
        ColumnDescriptor::text("object", "Object/Resource", "e.g., CUI Repository A"),
        ColumnDescriptor::text("permission", "Permission Level", "e.g., Read-Only"),
        ColumnDescriptor::text(
            "justification",
            "Justification / Business Need",
            "Required for monthly auditing task...",
        ),
        ColumnDescriptor::text(
            "evidenceLink",
            "Supporting Evidence Link",
            "e.g., Policy-AC-01.pdf, Section 4",
        ),
    ],
};

/// Returns the built-in schema for one matrix.
pub fn schema_for(kind: MatrixKind) -> &'static MatrixSchema {
    match kind {
        MatrixKind::Technical => &TECHNICAL_SCHEMA,
        MatrixKind::Shared => &SHARED_SCHEMA,
        MatrixKind::CmmcModel => &CMMC_MODEL_SCHEMA,
    }
}
