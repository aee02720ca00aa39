//! Application shell: the single authority over `AppState`.
//!
//! # Responsibility
//! - Load the persisted state blob once at startup.
//! - Apply add/edit/delete/metadata intents as whole-state replacements.
//! - Persist the full state after every mutation.
//!
//! # Invariants
//! - Only this type mutates canonical state; hosts hold read-only views.
//! - A mutation is visible in memory only after its blob write succeeded.
//! - Record identifiers are generated here and never change afterwards.
//! - Edit/delete of an unknown identifier leaves state unchanged but still
//!   rewrites the current blob.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::editor::MatrixIntent;
use crate::export::ExportFile;
use crate::model::metadata::MetadataField;
use crate::model::record::{
    CmmcModelEntry, MatrixEntry, MatrixKind, MatrixRow, RecordFields, RecordId, SharedEntry,
    TechnicalEntry,
};
use crate::model::state::AppState;
use crate::report::ReportDocument;
use crate::repo::blob_repo::{BlobRepository, RepoError};
use chrono::NaiveDate;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Fixed key under which the whole state blob is stored.
pub const STORAGE_KEY: &str = "cmmc-acm-data";

pub type ShellResult<T> = Result<T, ShellError>;

/// Failures surfaced by the shell. All come from host facilities.
#[derive(Debug)]
pub enum ShellError {
    Repo(RepoError),
    /// State blob could not be encoded or decoded.
    Codec(serde_json::Error),
    Io(std::io::Error),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "state blob codec failed: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RepoError> for ShellError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// State owner over a blob repository.
pub struct AppShell<R: BlobRepository> {
    repo: R,
    state: AppState,
}

impl<R: BlobRepository> AppShell<R> {
    /// Loads state from `repo`; a missing blob yields the empty state.
    ///
    /// # Errors
    /// - Storage read failures.
    /// - A stored blob that is not a valid state document.
    pub fn open(repo: R) -> ShellResult<Self> {
        let state = match repo.get_blob(STORAGE_KEY)? {
            Some(blob) => AppState::from_blob(&blob).map_err(|err| {
                error!(
                    "event=state_load module=shell status=error error_code=blob_decode_failed error={}",
                    err
                );
                ShellError::from(err)
            })?,
            None => AppState::default(),
        };
        info!(
            "event=state_load module=shell status=ok tech={} shared={} cmmc={}",
            state.tech_entries.len(),
            state.shared_entries.len(),
            state.cmmc_entries.len()
        );
        Ok(Self { repo, state })
    }

    /// Read-only view of canonical state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Generic rows of one collection, in stored order.
    pub fn rows(&self, kind: MatrixKind) -> Vec<MatrixRow> {
        self.state.rows(kind)
    }

    /// Appends a record with a fresh identifier and returns that identifier.
    pub fn add(&mut self, kind: MatrixKind, fields: &RecordFields) -> ShellResult<RecordId> {
        let id = Uuid::new_v4();
        let next = match kind {
            MatrixKind::Technical => with_added::<TechnicalEntry>(&self.state, id, fields),
            MatrixKind::Shared => with_added::<SharedEntry>(&self.state, id, fields),
            MatrixKind::CmmcModel => with_added::<CmmcModelEntry>(&self.state, id, fields),
        };
        self.commit(next, "matrix_add", kind)?;
        Ok(id)
    }

    /// Replaces every field of the record with `id`.
    ///
    /// The stored identifier is kept; position in the collection is kept.
    pub fn edit(
        &mut self,
        kind: MatrixKind,
        id: RecordId,
        fields: &RecordFields,
    ) -> ShellResult<()> {
        let next = match kind {
            MatrixKind::Technical => with_edited::<TechnicalEntry>(&self.state, id, fields),
            MatrixKind::Shared => with_edited::<SharedEntry>(&self.state, id, fields),
            MatrixKind::CmmcModel => with_edited::<CmmcModelEntry>(&self.state, id, fields),
        };
        match next {
            Some(next) => self.commit(next, "matrix_edit", kind),
            None => {
                log_noop("matrix_edit", kind);
                self.persist(&self.state)
            }
        }
    }

    /// Removes the record with `id`.
    pub fn delete(&mut self, kind: MatrixKind, id: RecordId) -> ShellResult<()> {
        let next = match kind {
            MatrixKind::Technical => with_deleted::<TechnicalEntry>(&self.state, id),
            MatrixKind::Shared => with_deleted::<SharedEntry>(&self.state, id),
            MatrixKind::CmmcModel => with_deleted::<CmmcModelEntry>(&self.state, id),
        };
        match next {
            Some(next) => self.commit(next, "matrix_delete", kind),
            None => {
                log_noop("matrix_delete", kind);
                self.persist(&self.state)
            }
        }
    }

    /// Replaces one metadata field, leaving the others unchanged.
    pub fn set_metadata_field(
        &mut self,
        field: MetadataField,
        value: impl Into<String>,
    ) -> ShellResult<()> {
        let next = AppState {
            metadata: self.state.metadata.with_field(field, value),
            ..self.state.clone()
        };
        self.persist(&next)?;
        self.state = next;
        info!(
            "event=metadata_set module=shell status=ok field={}",
            field.wire_name()
        );
        Ok(())
    }

    /// Applies an editor intent to the named collection.
    ///
    /// Returns the generated identifier for add intents.
    pub fn apply(
        &mut self,
        kind: MatrixKind,
        intent: MatrixIntent,
    ) -> ShellResult<Option<RecordId>> {
        match intent {
            MatrixIntent::Add { fields } => self.add(kind, &fields).map(Some),
            MatrixIntent::Edit { id, fields } => self.edit(kind, id, &fields).map(|()| None),
            MatrixIntent::Delete { id } => self.delete(kind, id).map(|()| None),
        }
    }

    /// Projects current state into the printable report.
    pub fn render_report(&self) -> ReportDocument {
        ReportDocument::from_state(&self.state)
    }

    /// Builds the dated export file for current state.
    pub fn export(&self, date: NaiveDate) -> ShellResult<ExportFile> {
        Ok(ExportFile::from_state(&self.state, date)?)
    }

    fn commit(
        &mut self,
        next: AppState,
        event: &'static str,
        kind: MatrixKind,
    ) -> ShellResult<()> {
        self.persist(&next)?;
        self.state = next;
        info!(
            "event={} module=shell status=ok matrix={} len={}",
            event,
            kind,
            self.state.len(kind)
        );
        Ok(())
    }

    fn persist(&self, next: &AppState) -> ShellResult<()> {
        let blob = next.to_blob()?;
        if let Err(err) = self.repo.put_blob(STORAGE_KEY, &blob) {
            error!(
                "event=state_persist module=shell status=error error_code=blob_write_failed error={}",
                err
            );
            return Err(err.into());
        }
        debug!(
            "event=state_persist module=shell status=ok bytes={}",
            blob.len()
        );
        Ok(())
    }
}

fn log_noop(event: &'static str, kind: MatrixKind) {
    debug!(
        "event={} module=shell status=noop matrix={} reason=id_not_found",
        event, kind
    );
}

fn with_added<T: MatrixEntry>(state: &AppState, id: RecordId, fields: &RecordFields) -> AppState {
    let mut next = state.clone();
    T::collection_mut(&mut next).push(T::from_fields(id, fields));
    next
}

fn with_edited<T: MatrixEntry>(
    state: &AppState,
    id: RecordId,
    fields: &RecordFields,
) -> Option<AppState> {
    let index = T::collection(state).iter().position(|entry| entry.id() == id)?;
    let mut next = state.clone();
    T::collection_mut(&mut next)[index] = T::from_fields(id, fields);
    Some(next)
}

fn with_deleted<T: MatrixEntry>(state: &AppState, id: RecordId) -> Option<AppState> {
    if !T::collection(state).iter().any(|entry| entry.id() == id) {
        return None;
    }
    let mut next = state.clone();
    T::collection_mut(&mut next).retain(|entry| entry.id() != id);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::{AppShell, ShellError, STORAGE_KEY};
    use crate::db::DbError;
    use crate::model::metadata::MetadataField;
    use crate::model::record::{MatrixKind, RecordFields};
    use crate::repo::blob_repo::{BlobRepository, RepoError, RepoResult};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryRepo {
        blobs: RefCell<HashMap<String, String>>,
        writes: RefCell<usize>,
        fail_writes: bool,
    }

    impl BlobRepository for MemoryRepo {
        fn get_blob(&self, key: &str) -> RepoResult<Option<String>> {
            Ok(self.blobs.borrow().get(key).cloned())
        }

        fn put_blob(&self, key: &str, value: &str) -> RepoResult<()> {
            if self.fail_writes {
                return Err(RepoError::Db(DbError::Io(std::io::Error::other(
                    "quota exceeded",
                ))));
            }
            *self.writes.borrow_mut() += 1;
            self.blobs
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn fields(subject: &str) -> RecordFields {
        RecordFields::from([("subject".to_string(), subject.to_string())])
    }

    #[test]
    fn every_mutation_writes_whole_blob() {
        let repo = MemoryRepo::default();
        let mut shell = AppShell::open(&repo).unwrap();

        let id = shell.add(MatrixKind::Technical, &fields("a")).unwrap();
        shell.edit(MatrixKind::Technical, id, &fields("b")).unwrap();
        shell
            .set_metadata_field(MetadataField::Author, "Jane")
            .unwrap();
        shell.delete(MatrixKind::Technical, id).unwrap();

        assert_eq!(*repo.writes.borrow(), 4);
        let stored = repo.get_blob(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(stored, shell.state().to_blob().unwrap());
    }

    #[test]
    fn unknown_id_leaves_state_unchanged_but_rewrites_blob() {
        let repo = MemoryRepo::default();
        let mut shell = AppShell::open(&repo).unwrap();
        shell.add(MatrixKind::Shared, &fields("a")).unwrap();
        let before = shell.state().clone();

        let missing = uuid::Uuid::new_v4();
        shell.edit(MatrixKind::Shared, missing, &fields("z")).unwrap();
        shell.delete(MatrixKind::Shared, missing).unwrap();

        assert_eq!(shell.state(), &before);
        assert_eq!(*repo.writes.borrow(), 3);
        let stored = repo.get_blob(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(stored, before.to_blob().unwrap());
    }

    #[test]
    fn failed_write_leaves_state_unchanged() {
        let repo = MemoryRepo {
            fail_writes: true,
            ..MemoryRepo::default()
        };
        let mut shell = AppShell::open(&repo).unwrap();

        let err = shell.add(MatrixKind::CmmcModel, &fields("a")).unwrap_err();
        assert!(matches!(err, ShellError::Repo(_)));
        assert_eq!(shell.state().len(MatrixKind::CmmcModel), 0);
    }

    #[test]
    fn corrupt_blob_fails_open() {
        let repo = MemoryRepo::default();
        repo.put_blob(STORAGE_KEY, "{not json").unwrap();
        let err = AppShell::open(&repo).err().unwrap();
        assert!(matches!(err, ShellError::Codec(_)));
    }
}
