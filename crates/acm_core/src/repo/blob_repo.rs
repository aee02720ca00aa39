//! Key-value blob repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide put/get of one serialized blob per fixed key.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `put_blob` fully replaces any previous value for the key.
//! - Repositories are only constructed over migrated connections.
//!
//! # See also
//! - docs/architecture/storage.md

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for blob persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was not migrated to the schema this binary expects.
    SchemaNotReady { found: u32, expected: u32 },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::SchemaNotReady { found, expected } => write!(
                f,
                "storage schema version {found} does not match expected {expected}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::SchemaNotReady { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for whole-blob storage.
pub trait BlobRepository {
    /// Returns the stored blob, or `None` when the key was never written.
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>>;
    /// Writes the blob, replacing any previous value.
    fn put_blob(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed blob repository over the `kv_store` table.
pub struct SqliteBlobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let found = current_user_version(conn)?;
        let expected = latest_version();
        if found != expected {
            return Err(RepoError::SchemaNotReady { found, expected });
        }
        Ok(Self { conn })
    }
}

impl BlobRepository for SqliteBlobRepository<'_> {
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

impl<R: BlobRepository + ?Sized> BlobRepository for &R {
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_blob(key)
    }

    fn put_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).put_blob(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobRepository, RepoError, SqliteBlobRepository};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn missing_key_reads_as_none() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteBlobRepository::try_new(&conn).unwrap();
        assert_eq!(repo.get_blob("absent").unwrap(), None);
    }

    #[test]
    fn put_replaces_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteBlobRepository::try_new(&conn).unwrap();

        repo.put_blob("k", "first").unwrap();
        repo.put_blob("k", "second").unwrap();

        assert_eq!(repo.get_blob("k").unwrap().as_deref(), Some("second"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteBlobRepository::try_new(&conn).err().unwrap();
        assert!(matches!(
            err,
            RepoError::SchemaNotReady { found: 0, .. }
        ));
    }
}
