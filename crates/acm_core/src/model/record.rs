//! Matrix record variants and their generic projection.
//!
//! # Responsibility
//! - Define the Technical, Shared and CMMC Model record shapes.
//! - Convert between variant records and the string-keyed `RecordFields`
//!   map that the generic editor operates on.
//!
//! # Invariants
//! - `id` is assigned once by the shell and never rewritten by an edit.
//! - Unknown keys in `RecordFields` are ignored; missing keys become `""`.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::state::AppState;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one matrix record.
pub type RecordId = Uuid;

/// Generic string-keyed record contents, keyed by schema column key.
pub type RecordFields = BTreeMap<String, String>;

/// The three matrix collections held by `AppState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatrixKind {
    /// Internal systems and roles.
    Technical,
    /// Cloud and external partner responsibilities.
    Shared,
    /// Evidence and justification per access grant.
    CmmcModel,
}

impl MatrixKind {
    /// All matrices in navigation/report order.
    pub const ALL: [MatrixKind; 3] = [
        MatrixKind::Technical,
        MatrixKind::Shared,
        MatrixKind::CmmcModel,
    ];

    /// Stable short id used by CLI/FFI callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "tech",
            Self::Shared => "shared",
            Self::CmmcModel => "cmmc",
        }
    }
}

impl Display for MatrixKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a matrix kind from its short id.
pub fn parse_matrix_kind(value: &str) -> Option<MatrixKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tech" | "technical" => Some(MatrixKind::Technical),
        "shared" => Some(MatrixKind::Shared),
        "cmmc" | "cmmc_model" | "cmmc-model" => Some(MatrixKind::CmmcModel),
        _ => None,
    }
}

/// Generic row handed to the editor: identifier plus string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub id: RecordId,
    pub fields: RecordFields,
}

impl MatrixRow {
    /// Returns one field value, or `""` when the key is unknown.
    pub fn value(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Boundary between generic `RecordFields` and one concrete record variant.
///
/// Implemented by each variant so the shell can apply intents with one set of
/// generic helpers instead of three hand-written copies.
pub trait MatrixEntry: Clone + PartialEq + Serialize + DeserializeOwned {
    /// Collection this variant lives in.
    const KIND: MatrixKind;
    /// Column keys of this variant in canonical order.
    const FIELD_KEYS: &'static [&'static str];

    fn id(&self) -> RecordId;
    /// Builds a record from generic fields under the given identifier.
    fn from_fields(id: RecordId, fields: &RecordFields) -> Self;
    fn to_fields(&self) -> RecordFields;

    fn collection(state: &AppState) -> &Vec<Self>;
    fn collection_mut(state: &mut AppState) -> &mut Vec<Self>;

    /// Generic projection used by the editor.
    fn to_row(&self) -> MatrixRow {
        MatrixRow {
            id: self.id(),
            fields: self.to_fields(),
        }
    }
}

fn take(fields: &RecordFields, key: &str) -> String {
    fields.get(key).cloned().unwrap_or_default()
}

fn pairs(values: &[(&str, &str)]) -> RecordFields {
    values
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// Technical access control matrix row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalEntry {
    pub id: RecordId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub permission: String,
}

impl MatrixEntry for TechnicalEntry {
    const KIND: MatrixKind = MatrixKind::Technical;
    const FIELD_KEYS: &'static [&'static str] = &["subject", "object", "permission"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_fields(id: RecordId, fields: &RecordFields) -> Self {
        Self {
            id,
            subject: take(fields, "subject"),
            object: take(fields, "object"),
            permission: take(fields, "permission"),
        }
    }

    fn to_fields(&self) -> RecordFields {
        pairs(&[
            ("subject", self.subject.as_str()),
            ("object", self.object.as_str()),
            ("permission", self.permission.as_str()),
        ])
    }

    fn collection(state: &AppState) -> &Vec<Self> {
        &state.tech_entries
    }

    fn collection_mut(state: &mut AppState) -> &mut Vec<Self> {
        &mut state.tech_entries
    }
}

/// Shared / customer responsibility matrix row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedEntry {
    pub id: RecordId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub permission: String,
    /// Provider or partner holding responsibility, e.g. a cloud vendor.
    #[serde(default)]
    pub partner: String,
}

impl MatrixEntry for SharedEntry {
    const KIND: MatrixKind = MatrixKind::Shared;
    const FIELD_KEYS: &'static [&'static str] = &["subject", "object", "permission", "partner"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_fields(id: RecordId, fields: &RecordFields) -> Self {
        Self {
            id,
            subject: take(fields, "subject"),
            object: take(fields, "object"),
            permission: take(fields, "permission"),
            partner: take(fields, "partner"),
        }
    }

    fn to_fields(&self) -> RecordFields {
        pairs(&[
            ("subject", self.subject.as_str()),
            ("object", self.object.as_str()),
            ("permission", self.permission.as_str()),
            ("partner", self.partner.as_str()),
        ])
    }

    fn collection(state: &AppState) -> &Vec<Self> {
        &state.shared_entries
    }

    fn collection_mut(state: &mut AppState) -> &mut Vec<Self> {
        &mut state.shared_entries
    }
}

/// CMMC model matrix row with justification and evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmmcModelEntry {
    pub id: RecordId,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub evidence_link: String,
}

impl MatrixEntry for CmmcModelEntry {
    const KIND: MatrixKind = MatrixKind::CmmcModel;
    const FIELD_KEYS: &'static [&'static str] = &[
        "subjectId",
        "object",
        "permission",
        "justification",
        "evidenceLink",
    ];

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_fields(id: RecordId, fields: &RecordFields) -> Self {
        Self {
            id,
            subject_id: take(fields, "subjectId"),
            object: take(fields, "object"),
            permission: take(fields, "permission"),
            justification: take(fields, "justification"),
            evidence_link: take(fields, "evidenceLink"),
        }
    }

    fn to_fields(&self) -> RecordFields {
        pairs(&[
            ("subjectId", self.subject_id.as_str()),
            ("object", self.object.as_str()),
            ("permission", self.permission.as_str()),
            ("justification", self.justification.as_str()),
            ("evidenceLink", self.evidence_link.as_str()),
        ])
    }

    fn collection(state: &AppState) -> &Vec<Self> {
        &state.cmmc_entries
    }

    fn collection_mut(state: &mut AppState) -> &mut Vec<Self> {
        &mut state.cmmc_entries
    }
}
