// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! # Storage Module
//!
//! Persistence for notes and user accounts, backed by an embedded redb
//! database plus a short-lived read cache.
//!
//! ## Layout
//!
//! ```text
//! $DATA_DIR/notes.redb
//!   users             # email → StoredUser (JSON)
//!   notes             # classroom_id → StoredNote (JSON)
//!   note_owner_index  # owner_email|classroom_id → ()
//! ```
//!
//! Records are whole-document upserts; there are no partial updates at the
//! store level. Writes to the same classroom id serialize in redb's write
//! transaction, last write wins.

pub mod database;
pub mod read_cache;
pub mod repository;

pub use database::{Database, StoreError, StoreResult};
pub use read_cache::{ReadCache, READ_BUCKET_SECS};
pub use repository::{NoteRepository, StoredNote, StoredUser, UserRepository};
