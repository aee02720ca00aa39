//! Canonical data model for the access control report.
//!
//! # Responsibility
//! - Define the metadata block, the three matrix record variants and the
//!   aggregate `AppState` that is persisted and exported as one unit.
//! - Provide the generic string-keyed record shape the editor works on.
//!
//! # Invariants
//! - Every record carries a generated `RecordId` that never changes.
//! - Field values are unconstrained strings; nothing here validates content.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod metadata;
pub mod record;
pub mod state;
