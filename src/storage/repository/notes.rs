// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Note repository.
//!
//! One record per classroom id. The owner index is written in the same
//! transaction as the note itself, so the "my classes" listing can never see
//! a note the primary table does not have.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    make_owner_key, make_owner_prefix, Database, StoreResult, NOTES, NOTE_OWNER_INDEX,
};
use redb::{ReadableDatabase, ReadableTable};

/// Note stored in the `notes` table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredNote {
    /// Classroom id, the unique identity.
    pub classroom_id: String,
    /// Owner's email, or the shared-editor sentinel. Fixed at creation.
    pub owner_email: String,
    /// Note text. Last write wins.
    pub content: String,
    /// Human-readable class name.
    pub class_name: String,
    /// Editor language tag, when the client sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// When the note was last saved.
    pub last_updated: DateTime<Utc>,
}

/// Repository for note operations.
pub struct NoteRepository<'a> {
    db: &'a Database,
}

impl<'a> NoteRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get a note by classroom id. Returns `None` when no note exists yet.
    pub fn get(&self, classroom_id: &str) -> StoreResult<Option<StoredNote>> {
        let txn = self.db.inner.begin_read()?;
        let table = txn.open_table(NOTES)?;
        match table.get(classroom_id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes.value())?)),
            None => Ok(None),
        }
    }

    /// Upsert a note, keeping the owner index in sync.
    ///
    /// A stale index entry is only possible when the recorded owner changes,
    /// which happens once: a shared-editor note being replaced wholesale.
    pub fn put(&self, note: &StoredNote) -> StoreResult<()> {
        let txn = self.db.inner.begin_write()?;
        {
            let mut notes = txn.open_table(NOTES)?;
            let mut index = txn.open_table(NOTE_OWNER_INDEX)?;

            if let Some(existing) = notes.get(note.classroom_id.as_str())? {
                let existing: StoredNote = serde_json::from_slice(existing.value())?;
                if existing.owner_email != note.owner_email {
                    index.remove(
                        make_owner_key(&existing.owner_email, &existing.classroom_id).as_slice(),
                    )?;
                }
            }

            let bytes = serde_json::to_vec(note)?;
            notes.insert(note.classroom_id.as_str(), bytes.as_slice())?;
            index.insert(
                make_owner_key(&note.owner_email, &note.classroom_id).as_slice(),
                (),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Delete a note and its index entry. No-op when the note is absent.
    pub fn delete(&self, classroom_id: &str) -> StoreResult<()> {
        let txn = self.db.inner.begin_write()?;
        {
            let mut notes = txn.open_table(NOTES)?;
            let mut index = txn.open_table(NOTE_OWNER_INDEX)?;

            // Copy the removed bytes out; the guard borrows the table.
            let removed = notes.remove(classroom_id)?.map(|g| g.value().to_vec());
            if let Some(bytes) = removed {
                let existing: StoredNote = serde_json::from_slice(&bytes)?;
                index.remove(
                    make_owner_key(&existing.owner_email, &existing.classroom_id).as_slice(),
                )?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// List notes owned by one user, newest first, skipping empty content.
    pub fn list_by_owner(&self, owner_email: &str) -> StoreResult<Vec<StoredNote>> {
        let txn = self.db.inner.begin_read()?;
        let notes = txn.open_table(NOTES)?;
        let index = txn.open_table(NOTE_OWNER_INDEX)?;

        let prefix = make_owner_prefix(owner_email);
        let mut result = Vec::new();
        for entry in index.range(prefix.as_slice()..)? {
            let (key_guard, _) = entry?;
            let key = key_guard.value();
            if !key.starts_with(&prefix) {
                break;
            }
            let classroom_id = &key[prefix.len()..];
            let classroom_id = std::str::from_utf8(classroom_id).unwrap_or_default();
            if let Some(bytes) = notes.get(classroom_id)? {
                let note: StoredNote = serde_json::from_slice(bytes.value())?;
                // Cross-check the stored owner: a crafted owner string could
                // otherwise steer its index keys into this prefix range.
                if note.owner_email == owner_email && !note.content.is_empty() {
                    result.push(note);
                }
            }
        }

        result.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_note(classroom_id: &str, owner: &str, content: &str) -> StoredNote {
        StoredNote {
            classroom_id: classroom_id.to_string(),
            owner_email: owner.to_string(),
            content: content.to_string(),
            class_name: format!("Class {classroom_id}"),
            language: None,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn put_and_get_note() {
        let db = Database::in_memory().unwrap();
        let repo = NoteRepository::new(&db);

        repo.put(&test_note("c-1", "a@x.com", "hi")).unwrap();

        let loaded = repo.get("c-1").unwrap().unwrap();
        assert_eq!(loaded.content, "hi");
        assert_eq!(loaded.owner_email, "a@x.com");
    }

    #[test]
    fn put_overwrites_previous_content() {
        let db = Database::in_memory().unwrap();
        let repo = NoteRepository::new(&db);

        repo.put(&test_note("c-1", "a@x.com", "first")).unwrap();
        repo.put(&test_note("c-1", "a@x.com", "second")).unwrap();

        assert_eq!(repo.get("c-1").unwrap().unwrap().content, "second");
        assert_eq!(repo.list_by_owner("a@x.com").unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_note_and_index() {
        let db = Database::in_memory().unwrap();
        let repo = NoteRepository::new(&db);

        repo.put(&test_note("c-1", "a@x.com", "hi")).unwrap();
        repo.delete("c-1").unwrap();

        assert!(repo.get("c-1").unwrap().is_none());
        assert!(repo.list_by_owner("a@x.com").unwrap().is_empty());
    }

    #[test]
    fn delete_of_absent_note_is_noop() {
        let db = Database::in_memory().unwrap();
        let repo = NoteRepository::new(&db);
        assert!(repo.delete("c-404").is_ok());
    }

    #[test]
    fn list_by_owner_filters_and_sorts() {
        let db = Database::in_memory().unwrap();
        let repo = NoteRepository::new(&db);

        let now = Utc::now();
        let mut old = test_note("c-1", "a@x.com", "old");
        old.last_updated = now - Duration::hours(2);
        let mut new = test_note("c-2", "a@x.com", "new");
        new.last_updated = now;
        let empty = test_note("c-3", "a@x.com", "");
        let other = test_note("c-4", "b@x.com", "not mine");

        repo.put(&old).unwrap();
        repo.put(&new).unwrap();
        repo.put(&empty).unwrap();
        repo.put(&other).unwrap();

        let listed = repo.list_by_owner("a@x.com").unwrap();
        let ids: Vec<&str> = listed.iter().map(|n| n.classroom_id.as_str()).collect();
        assert_eq!(ids, vec!["c-2", "c-1"]);
    }

    #[test]
    fn list_by_owner_ignores_crafted_owner_keys() {
        let db = Database::in_memory().unwrap();
        let repo = NoteRepository::new(&db);

        repo.put(&test_note("c-1", "a@x.com", "mine")).unwrap();
        // An owner string containing the separator produces index keys that
        // land inside the victim's prefix range.
        repo.put(&test_note("spam", "a@x.com|evil", "injected")).unwrap();
        repo.put(&test_note("evil|spam", "a@x.com|evil", "injected")).unwrap();

        let listed = repo.list_by_owner("a@x.com").unwrap();
        assert!(listed.iter().all(|n| n.owner_email == "a@x.com"));
        let ids: Vec<&str> = listed.iter().map(|n| n.classroom_id.as_str()).collect();
        assert_eq!(ids, vec!["c-1"]);
    }

    #[test]
    fn owner_change_replaces_index_entry() {
        let db = Database::in_memory().unwrap();
        let repo = NoteRepository::new(&db);

        repo.put(&test_note("c-1", "shared_editor", "draft")).unwrap();
        repo.put(&test_note("c-1", "a@x.com", "claimed")).unwrap();

        assert!(repo.list_by_owner("shared_editor").unwrap().is_empty());
        assert_eq!(repo.list_by_owner("a@x.com").unwrap().len(), 1);
    }
}
