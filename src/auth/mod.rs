// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! # Authentication Module
//!
//! Session and credential handling for the LiveNotes API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with email + password
//! 2. Server verifies the Argon2id hash and that the email is verified
//! 3. Server sets a signed session cookie (HMAC-SHA256, 24h validity)
//! 4. Every subsequent request presents the cookie; verification failure or
//!    expiry resolves to anonymous, never to an error
//!
//! Anonymous callers still reach share-link routes; everything else rejects
//! them with 401.

pub mod extractor;
pub mod password;
pub mod session;

pub use extractor::{Auth, MaybeAuth};
pub use password::{hash_password, verify_password};
pub use session::{SessionSigner, SessionUser, SESSION_COOKIE, SESSION_TTL_HOURS};
