// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Typed repositories over the embedded database.

pub mod notes;
pub mod users;

pub use notes::{NoteRepository, StoredNote};
pub use users::{StoredUser, UserRepository};
