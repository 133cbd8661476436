// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// -----------------------------------------------------------------------------
// Notes
// -----------------------------------------------------------------------------

/// A note as returned by the read endpoint.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct NoteResponse {
    /// Note text; empty when no note has been saved yet.
    pub content: String,
    /// Display name, falling back to the derived default.
    pub class_name: String,
    /// When the note was last saved; absent for the empty placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Whether the caller sees a read-only view.
    pub view_only: bool,
    /// Whether the caller may edit.
    pub allow_edit: bool,
}

/// Body for saving a note.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveNoteRequest {
    #[serde(default)]
    pub content: String,
    /// Omitted to keep the existing display name.
    pub class_name: Option<String>,
    /// Omitted to keep the existing language tag.
    pub language: Option<String>,
}

/// Body for renaming a class.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameClassRequest {
    pub class_name: String,
}

// -----------------------------------------------------------------------------
// Accounts
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login; the session rides in the `Set-Cookie` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    /// Where the client should navigate next.
    pub redirect: String,
}

/// Current session identity.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// -----------------------------------------------------------------------------
// Shared
// -----------------------------------------------------------------------------

/// Generic success acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
