//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the application shell persists through.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs surface storage failures; nothing is swallowed.
//!
//! # See also
//! - docs/architecture/storage.md

pub mod blob_repo;
