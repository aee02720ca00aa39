//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose configuration, matrix editing, report and export use-cases to
//!   the UI host via FRB.
//! - Keep error semantics simple: envelopes carry `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call reopens storage under one process-wide lock, so each call
//!   observes the latest state.
//! - Matrix ids are `tech|shared|cmmc`; metadata keys are wire names.
//!
//! # See also
//! - docs/architecture/logging.md

use acm_core::db::open_db;
use acm_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_matrix_kind,
    parse_metadata_field, ping as ping_inner, render_html, render_markdown, schema_for,
    today_utc, AppConfig, AppShell, InputMode, MatrixKind, MetadataField, RecordFields,
    RecordId, ShellResult, SqliteBlobRepository, View, CONFIGURATION_NOTE,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static CONFIG: OnceLock<AppConfig> = OnceLock::new();
// Serializes load-modify-store of the shared blob.
static SHELL_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewItem {
    pub id: String,
    pub label: String,
    pub description: String,
    /// Guidance block shown on the view.
    pub note: Option<String>,
}

/// One key/value pair, used for metadata and record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub key: String,
    pub value: String,
}

/// Labelled metadata field for the configuration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataItem {
    pub key: String,
    pub label: String,
    pub placeholder: Option<String>,
    /// `text` or `date`.
    pub input: String,
    pub value: String,
}

/// Column description for building the editor table and form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnItem {
    pub key: String,
    pub label: String,
    pub placeholder: Option<String>,
    /// Empty for free-text columns.
    pub choices: Vec<String>,
}

/// Schema envelope for one matrix view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixSchemaResponse {
    pub ok: bool,
    pub title: String,
    pub description: String,
    pub educational_note: Option<String>,
    pub columns: Vec<ColumnItem>,
    pub message: String,
}

/// One matrix row; `values` align with the schema columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRowItem {
    pub id: String,
    pub values: Vec<String>,
}

/// Row list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRowsResponse {
    pub ok: bool,
    pub items: Vec<MatrixRowItem>,
    pub message: String,
}

/// Metadata envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataResponse {
    pub ok: bool,
    pub items: Vec<MetadataItem>,
    /// Guidance shown below the configuration form.
    pub note: String,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created record id for add calls.
    pub record_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Option<RecordId>) -> Self {
        Self {
            ok: true,
            record_id: record_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Rendered report / export envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentResponse {
    pub ok: bool,
    /// File name for downloads, empty for previews.
    pub file_name: String,
    pub content: String,
    pub message: String,
}

impl DocumentResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            file_name: String::new(),
            content: String::new(),
            message: message.into(),
        }
    }
}

/// Lists the five navigable views.
#[flutter_rust_bridge::frb(sync)]
pub fn app_views() -> Vec<ViewItem> {
    View::ALL
        .into_iter()
        .map(|view| ViewItem {
            id: view.id().to_string(),
            label: view.label().to_string(),
            description: view.description().to_string(),
            note: view.note().map(str::to_string),
        })
        .collect()
}

/// Reads the metadata block for the configuration view.
#[flutter_rust_bridge::frb(sync)]
pub fn metadata_get() -> MetadataResponse {
    match with_shell(|shell| Ok(shell.state().metadata.clone())) {
        Ok(metadata) => MetadataResponse {
            ok: true,
            items: MetadataField::ALL
                .into_iter()
                .map(|field| MetadataItem {
                    key: field.wire_name().to_string(),
                    label: field.label().to_string(),
                    placeholder: field.placeholder().map(str::to_string),
                    input: field.input().as_str().to_string(),
                    value: metadata.get(field).to_string(),
                })
                .collect(),
            note: CONFIGURATION_NOTE.to_string(),
            message: String::new(),
        },
        Err(err) => MetadataResponse {
            ok: false,
            items: Vec::new(),
            note: String::new(),
            message: format!("metadata_get failed: {err}"),
        },
    }
}

/// Replaces one metadata field.
#[flutter_rust_bridge::frb(sync)]
pub fn metadata_set(key: String, value: String) -> ActionResponse {
    let Some(field) = parse_metadata_field(&key) else {
        return ActionResponse::failure(format!("metadata_set failed: unknown field `{key}`"));
    };
    match with_shell(|shell| shell.set_metadata_field(field, value)) {
        Ok(()) => ActionResponse::success("Metadata saved.", None),
        Err(err) => ActionResponse::failure(format!("metadata_set failed: {err}")),
    }
}

/// Describes one matrix's columns.
#[flutter_rust_bridge::frb(sync)]
pub fn matrix_schema(matrix: String) -> MatrixSchemaResponse {
    let Some(kind) = parse_matrix_kind(&matrix) else {
        return MatrixSchemaResponse {
            ok: false,
            title: String::new(),
            description: String::new(),
            educational_note: None,
            columns: Vec::new(),
            message: format!("matrix_schema failed: unknown matrix `{matrix}`"),
        };
    };
    let schema = schema_for(kind);
    MatrixSchemaResponse {
        ok: true,
        title: schema.title.to_string(),
        description: schema.description.to_string(),
        educational_note: schema.educational_note.map(str::to_string),
        columns: schema
            .columns
            .iter()
            .map(|column| ColumnItem {
                key: column.key.to_string(),
                label: column.label.to_string(),
                placeholder: column.placeholder.map(str::to_string),
                choices: match column.input {
                    InputMode::FreeText => Vec::new(),
                    InputMode::Choice(choices) => {
                        choices.iter().map(|choice| choice.to_string()).collect()
                    }
                },
            })
            .collect(),
        message: String::new(),
    }
}

/// Lists one matrix's rows in stored order.
#[flutter_rust_bridge::frb(sync)]
pub fn matrix_rows(matrix: String) -> MatrixRowsResponse {
    let failure = |message: String| MatrixRowsResponse {
        ok: false,
        items: Vec::new(),
        message,
    };
    let Some(kind) = parse_matrix_kind(&matrix) else {
        return failure(format!("matrix_rows failed: unknown matrix `{matrix}`"));
    };
    let schema = schema_for(kind);
    match with_shell(|shell| Ok(shell.rows(kind))) {
        Ok(rows) => {
            let message = if rows.is_empty() {
                "No entries found.".to_string()
            } else {
                format!("{} entr(ies).", rows.len())
            };
            MatrixRowsResponse {
                ok: true,
                items: rows
                    .iter()
                    .map(|row| MatrixRowItem {
                        id: row.id.to_string(),
                        values: schema.keys().map(|key| row.value(key).to_string()).collect(),
                    })
                    .collect(),
                message,
            }
        }
        Err(err) => failure(format!("matrix_rows failed: {err}")),
    }
}

/// Appends a record built from `fields`; returns the generated id.
#[flutter_rust_bridge::frb(sync)]
pub fn matrix_add(matrix: String, fields: Vec<FieldValue>) -> ActionResponse {
    let Some(kind) = parse_matrix_kind(&matrix) else {
        return ActionResponse::failure(format!("matrix_add failed: unknown matrix `{matrix}`"));
    };
    let fields = to_record_fields(fields);
    match with_shell(|shell| shell.add(kind, &fields)) {
        Ok(id) => ActionResponse::success("Entry added.", Some(id)),
        Err(err) => ActionResponse::failure(format!("matrix_add failed: {err}")),
    }
}

/// Replaces every field of record `id` with `fields`.
///
/// An id that no longer exists succeeds without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn matrix_edit(matrix: String, id: String, fields: Vec<FieldValue>) -> ActionResponse {
    let (kind, id) = match parse_target(&matrix, &id) {
        Ok(target) => target,
        Err(message) => return ActionResponse::failure(format!("matrix_edit failed: {message}")),
    };
    let fields = to_record_fields(fields);
    match with_shell(|shell| shell.edit(kind, id, &fields)) {
        Ok(()) => ActionResponse::success("Entry saved.", None),
        Err(err) => ActionResponse::failure(format!("matrix_edit failed: {err}")),
    }
}

/// Removes record `id` immediately.
#[flutter_rust_bridge::frb(sync)]
pub fn matrix_delete(matrix: String, id: String) -> ActionResponse {
    let (kind, id) = match parse_target(&matrix, &id) {
        Ok(target) => target,
        Err(message) => {
            return ActionResponse::failure(format!("matrix_delete failed: {message}"))
        }
    };
    match with_shell(|shell| shell.delete(kind, id)) {
        Ok(()) => ActionResponse::success("Entry deleted.", None),
        Err(err) => ActionResponse::failure(format!("matrix_delete failed: {err}")),
    }
}

/// Renders the report; `format` is `markdown` (default) or `html`.
#[flutter_rust_bridge::frb(sync)]
pub fn report_render(format: Option<String>) -> DocumentResponse {
    let as_html = match format.as_deref().map(str::trim) {
        None | Some("") | Some("markdown") | Some("md") => false,
        Some("html") => true,
        Some(other) => {
            return DocumentResponse::failure(format!(
                "report_render failed: unsupported format `{other}`"
            ))
        }
    };
    match with_shell(|shell| Ok(shell.render_report())) {
        Ok(doc) => DocumentResponse {
            ok: true,
            file_name: String::new(),
            content: if as_html {
                render_html(&doc)
            } else {
                render_markdown(&doc)
            },
            message: String::new(),
        },
        Err(err) => DocumentResponse::failure(format!("report_render failed: {err}")),
    }
}

/// Builds today's JSON export for a host download.
#[flutter_rust_bridge::frb(sync)]
pub fn export_state() -> DocumentResponse {
    match with_shell(|shell| shell.export(today_utc())) {
        Ok(export) => DocumentResponse {
            ok: true,
            file_name: export.file_name,
            content: export.contents,
            message: "Export ready.".to_string(),
        },
        Err(err) => DocumentResponse::failure(format!("export_state failed: {err}")),
    }
}

fn resolve_config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::from_env)
}

fn resolve_db_path() -> PathBuf {
    resolve_config().db_path.clone()
}

fn with_shell<T>(
    f: impl FnOnce(&mut AppShell<SqliteBlobRepository<'_>>) -> ShellResult<T>,
) -> Result<T, String> {
    let _guard = SHELL_LOCK
        .lock()
        .map_err(|_| "storage lock poisoned".to_string())?;
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("storage open failed: {err}"))?;
    let repo = SqliteBlobRepository::try_new(&conn)
        .map_err(|err| format!("storage init failed: {err}"))?;
    let mut shell = AppShell::open(repo).map_err(|err| {
        warn!("event=ffi_shell_open module=ffi status=error error={}", err);
        format!("state load failed: {err}")
    })?;
    f(&mut shell).map_err(|err| err.to_string())
}

fn parse_target(matrix: &str, id: &str) -> Result<(MatrixKind, RecordId), String> {
    let kind = parse_matrix_kind(matrix).ok_or_else(|| format!("unknown matrix `{matrix}`"))?;
    let id = RecordId::parse_str(id.trim()).map_err(|_| format!("invalid record id `{id}`"))?;
    Ok((kind, id))
}

fn to_record_fields(fields: Vec<FieldValue>) -> RecordFields {
    fields
        .into_iter()
        .map(|field| (field.key, field.value))
        .collect()
}
