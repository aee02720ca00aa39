//! Aggregate application state and its JSON blob codec.
//!
//! # Responsibility
//! - Hold metadata plus the three ordered matrix collections.
//! - Serialize/deserialize the whole aggregate as one blob.
//!
//! # Invariants
//! - Collection order is insertion order and is the display order.
//! - Absent top-level keys in a blob decode to their empty defaults.
//! - The persisted blob and the export file use the same encoding.

use crate::model::metadata::ReportMetadata;
use crate::model::record::{
    CmmcModelEntry, MatrixEntry, MatrixKind, MatrixRow, SharedEntry, TechnicalEntry,
};
use serde::{Deserialize, Serialize};

/// Complete persisted/exported unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub metadata: ReportMetadata,
    pub tech_entries: Vec<TechnicalEntry>,
    pub shared_entries: Vec<SharedEntry>,
    pub cmmc_entries: Vec<CmmcModelEntry>,
}

impl AppState {
    /// Generic projection of one collection, in stored order.
    pub fn rows(&self, kind: MatrixKind) -> Vec<MatrixRow> {
        match kind {
            MatrixKind::Technical => project(&self.tech_entries),
            MatrixKind::Shared => project(&self.shared_entries),
            MatrixKind::CmmcModel => project(&self.cmmc_entries),
        }
    }

    /// Number of records held by one collection.
    pub fn len(&self, kind: MatrixKind) -> usize {
        match kind {
            MatrixKind::Technical => self.tech_entries.len(),
            MatrixKind::Shared => self.shared_entries.len(),
            MatrixKind::CmmcModel => self.cmmc_entries.len(),
        }
    }

    /// Whether all three collections are empty.
    pub fn is_empty(&self) -> bool {
        MatrixKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// Encodes the whole state as a pretty-printed JSON blob.
    pub fn to_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Decodes a blob produced by `to_blob` (or by an older export).
    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        serde_json::from_str(blob)
    }
}

fn project<T: MatrixEntry>(entries: &[T]) -> Vec<MatrixRow> {
    entries.iter().map(T::to_row).collect()
}
