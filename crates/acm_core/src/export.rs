//! Dated JSON export of the whole state.
//!
//! # Responsibility
//! - Name export files by the current UTC date.
//! - Produce exactly the bytes the shell persists, so an export can be
//!   loaded back as a stored blob.

use crate::model::state::AppState;
use chrono::{NaiveDate, Utc};
use log::info;
use std::path::{Path, PathBuf};

const EXPORT_FILE_PREFIX: &str = "cmmc-acm-report-";

/// One export file ready to be written or handed to a host download API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

impl ExportFile {
    /// Encodes `state` with the persisted blob encoding.
    pub fn from_state(state: &AppState, date: NaiveDate) -> serde_json::Result<Self> {
        Ok(Self {
            file_name: export_file_name(date),
            contents: state.to_blob()?,
        })
    }

    /// Writes the file into `dir`, replacing an existing export of the same day.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.contents.as_bytes())?;
        info!(
            "event=state_export module=export status=ok bytes={} file={}",
            self.contents.len(),
            self.file_name
        );
        Ok(path)
    }
}

/// `cmmc-acm-report-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

/// Current date in UTC, used for export naming.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, ExportFile};
    use crate::model::state::AppState;
    use chrono::NaiveDate;

    #[test]
    fn file_name_is_zero_padded_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "cmmc-acm-report-2025-03-07.json");
    }

    #[test]
    fn contents_match_persisted_blob() {
        let mut state = AppState::default();
        state.metadata.organization_name = "Acme".to_string();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let export = ExportFile::from_state(&state, date).unwrap();
        assert_eq!(export.contents, state.to_blob().unwrap());
        assert_eq!(AppState::from_blob(&export.contents).unwrap(), state);
    }

    #[test]
    fn write_to_dir_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let export = ExportFile::from_state(&AppState::default(), date).unwrap();

        let path = export.write_to_dir(dir.path().join("out")).unwrap();
        assert!(path.ends_with("cmmc-acm-report-2025-12-31.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), export.contents);
    }
}
