// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! LiveNotes - Collaborative Classroom Notes Service
//!
//! Authenticated teachers keep per-classroom notes and can broadcast a note
//! through a share link, read-only or editable by anyone holding the link.
//! Accounts are email-verified with one-time codes; sessions are stateless
//! signed cookies.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Sessions, extractors and password hashing
//! - `policy` - Access-control decisions for note reads and writes
//! - `storage` - Embedded note/user database (redb) and the read cache
//! - `notify` - Verification email delivery

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod policy;
pub mod state;
pub mod storage;
