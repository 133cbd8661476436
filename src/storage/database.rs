// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Embedded note database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: email → serialized StoredUser
//! - `notes`: classroom_id → serialized StoredNote
//! - `note_owner_index`: composite key (owner_email|classroom_id) → ()
//!
//! The owner index is the secondary lookup behind the "my classes" listing.
//! It is maintained inside the same write transaction as the primary record,
//! so the two can never diverge.

use std::path::Path;

use redb::{ReadableDatabase, TableDefinition};

/// Primary table: email → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Primary table: classroom_id → serialized StoredNote (JSON bytes).
pub(crate) const NOTES: TableDefinition<&str, &[u8]> = TableDefinition::new("notes");

/// Index: composite key (owner_email|classroom_id) → ().
pub(crate) const NOTE_OWNER_INDEX: TableDefinition<&[u8], ()> =
    TableDefinition::new("note_owner_index");

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Build a composite key for the note_owner_index table.
///
/// Format: `owner_email | b'|' | classroom_id`. Signup rejects `|` in email
/// addresses, and the listing re-checks the stored owner, so a prefix scan on
/// `owner_email|` cannot be steered into another owner's keys.
pub(crate) fn make_owner_key(owner_email: &str, classroom_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner_email.len() + 1 + classroom_id.len());
    key.extend_from_slice(owner_email.as_bytes());
    key.push(b'|');
    key.extend_from_slice(classroom_id.as_bytes());
    key
}

/// Build a prefix key for range scanning all notes of one owner.
pub(crate) fn make_owner_prefix(owner_email: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(owner_email.len() + 1);
    prefix.extend_from_slice(owner_email.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Handle to the embedded note database.
///
/// Opened once at process start and shared behind an `Arc`. redb serializes
/// write transactions internally; the application adds no locking of its own.
pub struct Database {
    pub(crate) inner: redb::Database,
}

impl Database {
    /// Open (or create) the database at the given path.
    ///
    /// All tables are created up front so later read transactions never hit
    /// a missing-table error.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let inner = redb::Database::create(path)?;
        let db = Self { inner };
        db.ensure_tables()?;
        Ok(db)
    }

    /// Open a throwaway in-memory database.
    ///
    /// Used by tests; nothing is written to disk.
    pub fn in_memory() -> StoreResult<Self> {
        let inner =
            redb::Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let db = Self { inner };
        db.ensure_tables()?;
        Ok(db)
    }

    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.inner.begin_write()?;
        {
            txn.open_table(USERS)?;
            txn.open_table(NOTES)?;
            txn.open_table(NOTE_OWNER_INDEX)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Cheap connectivity probe for the health endpoint.
    pub fn check(&self) -> StoreResult<()> {
        self.inner.begin_read()?;
        Ok(())
    }
}
