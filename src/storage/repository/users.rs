// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! User repository.
//!
//! One record per email address, holding the password hash and the email
//! verification state. `verified` flips to true exactly once; the one-time
//! code fields are overwritten on signup, verify and resend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::database::{Database, StoreError, StoreResult, USERS};
use redb::{ReadableDatabase, ReadableTable};

/// User account stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Email address, the unique identity.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Argon2id PHC-format password hash.
    pub password_hash: String,
    /// Whether the email address has been verified.
    pub verified: bool,
    /// Current one-time verification code.
    pub otp: String,
    /// When the one-time code stops being accepted.
    pub otp_expiry: DateTime<Utc>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get a user by email. Returns `None` when no account exists.
    pub fn get(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        let txn = self.db.inner.begin_read()?;
        let table = txn.open_table(USERS)?;
        match table.get(email)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes.value())?)),
            None => Ok(None),
        }
    }

    /// Create a new account. Fails if the email is already registered.
    pub fn create(&self, user: &StoredUser) -> StoreResult<()> {
        let txn = self.db.inner.begin_write()?;
        {
            let mut table = txn.open_table(USERS)?;
            if table.get(user.email.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("user {}", user.email)));
            }
            let bytes = serde_json::to_vec(user)?;
            table.insert(user.email.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Mark a user as verified. One-way transition.
    pub fn mark_verified(&self, email: &str) -> StoreResult<()> {
        self.update(email, |user| user.verified = true)
    }

    /// Overwrite the stored one-time code and its expiry.
    ///
    /// Verification state is left untouched.
    pub fn set_otp(&self, email: &str, otp: &str, expiry: DateTime<Utc>) -> StoreResult<()> {
        self.update(email, |user| {
            user.otp = otp.to_string();
            user.otp_expiry = expiry;
        })
    }

    fn update(&self, email: &str, mutate: impl FnOnce(&mut StoredUser)) -> StoreResult<()> {
        let txn = self.db.inner.begin_write()?;
        {
            let mut table = txn.open_table(USERS)?;
            let mut user: StoredUser = match table.get(email)? {
                Some(bytes) => serde_json::from_slice(bytes.value())?,
                None => return Err(StoreError::NotFound(format!("user {email}"))),
            };
            mutate(&mut user);
            let bytes = serde_json::to_vec(&user)?;
            table.insert(email, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}
