// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! LRU cache for note reads.
//!
//! Viewers poll the read endpoint, so lookups are coalesced into one backing
//! read per classroom per 2-second bucket. Staleness of up to one bucket is
//! acceptable for viewers; writes purge the classroom's entry so the writer's
//! own next read is fresh.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use lru::LruCache;

use super::repository::notes::StoredNote;

/// Width of one read bucket, in seconds.
pub const READ_BUCKET_SECS: u64 = 2;

/// Default number of classrooms to cache.
pub const DEFAULT_CAPACITY: usize = 128;

/// Cached entry: the fetched record (or its absence) + the bucket it was
/// fetched in. A `Some(None)` hit means "looked up, no note exists".
struct CacheEntry {
    note: Option<StoredNote>,
    bucket: u64,
}

/// In-process LRU cache for hot classroom reads.
pub struct ReadCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
}

impl ReadCache {
    /// Create a new cache holding at most `capacity` classrooms.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
        }
    }

    /// The bucket the wall clock currently falls in.
    pub fn current_bucket() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            / READ_BUCKET_SECS
    }

    /// Get the cached lookup result for a classroom.
    ///
    /// Returns `None` when nothing is cached or the entry belongs to an
    /// older bucket. The inner `Option` distinguishes a cached note from a
    /// cached miss.
    pub fn get(&self, classroom_id: &str, bucket: u64) -> Option<Option<StoredNote>> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(classroom_id) {
            if entry.bucket == bucket {
                return Some(entry.note.clone());
            }
            // Stale bucket, drop it
            cache.pop(classroom_id);
        }
        None
    }

    /// Store a lookup result for a classroom.
    pub fn put(&self, classroom_id: &str, bucket: u64, note: Option<StoredNote>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(classroom_id.to_string(), CacheEntry { note, bucket });
        }
    }

    /// Look at the cached entry regardless of bucket. Test-only.
    #[cfg(test)]
    pub(crate) fn peek(&self, classroom_id: &str) -> Option<Option<StoredNote>> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(classroom_id).map(|entry| entry.note.clone())
    }

    /// Purge the cached entry for a classroom.
    ///
    /// Called on every mutation so a write followed by a read returns the
    /// written content regardless of bucket boundaries.
    pub fn invalidate(&self, classroom_id: &str) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.pop(classroom_id);
        }
    }
}

impl Default for ReadCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
