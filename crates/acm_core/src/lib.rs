//! Core domain logic for ACM Builder.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod editor;
pub mod export;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod schema;
pub mod service;
pub mod view;

pub use config::AppConfig;
pub use editor::{
    EditorForm, EditorMode, EditorTable, EditorTableBody, EditorTableRow, FormField,
    MatrixEditor, MatrixIntent,
};
pub use export::{export_file_name, today_utc, ExportFile};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::metadata::{
    parse_metadata_field, MetadataField, MetadataInput, ReportMetadata, CONFIGURATION_NOTE,
};
pub use model::record::{
    parse_matrix_kind, CmmcModelEntry, MatrixEntry, MatrixKind, MatrixRow, RecordFields,
    RecordId, SharedEntry, TechnicalEntry,
};
pub use model::state::AppState;
pub use report::{render_html, render_markdown, ReportDocument, ReportSection};
pub use repo::blob_repo::{BlobRepository, RepoError, RepoResult, SqliteBlobRepository};
pub use schema::{schema_for, ColumnDescriptor, InputMode, MatrixSchema};
pub use service::app_shell::{AppShell, ShellError, ShellResult, STORAGE_KEY};
pub use view::{parse_view, View};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
