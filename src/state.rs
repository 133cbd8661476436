// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Shared application state.
//!
//! Constructed once at process start and handed to every request handler.
//! There is no ambient global state; the database handle, read cache,
//! session signer and notifier all live here.

use std::sync::Arc;

use crate::auth::SessionSigner;
use crate::notify::Notifier;
use crate::storage::{Database, ReadCache};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub cache: Arc<ReadCache>,
    pub sessions: SessionSigner,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(db: Database, sessions: SessionSigner, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db: Arc::new(db),
            cache: Arc::new(ReadCache::default()),
            sessions,
            notifier,
        }
    }

    /// State over an in-memory database with log-only mail delivery.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(
            Database::in_memory().expect("in-memory database"),
            SessionSigner::new(b"test-secret".to_vec()),
            Arc::new(crate::notify::LogNotifier),
        )
    }
}
