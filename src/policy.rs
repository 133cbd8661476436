// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Access-control policy for classroom notes.
//!
//! Two access modes exist per note:
//!
//! - **owner-gated**: the default. Reads and writes require a session whose
//!   email matches the note's recorded owner.
//! - **link-gated**: requests carrying `?view=true` bypass ownership for
//!   reads; `?view=true&edit=true` additionally allows anonymous writes.
//!
//! This lets a teacher keep private per-class notes and broadcast one note as
//! a public live feed, optionally editable by anyone holding the link,
//! without a separate ACL subsystem. Anonymous shared edits never reassign
//! ownership: an existing real owner is always preserved.

use serde::Deserialize;
use utoipa::IntoParams;

/// Recorded owner of a note first written through an edit-enabled share link.
pub const SHARED_EDITOR: &str = "shared_editor";

/// Share-link query flags (`?view=true&edit=true`).
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct ShareFlags {
    /// Read through a share link, bypassing ownership checks.
    #[serde(default)]
    pub view: bool,
    /// Share link allows editing.
    #[serde(default)]
    pub edit: bool,
}

impl ShareFlags {
    /// A write performed through an edit-enabled share link.
    pub fn is_shared_edit(&self) -> bool {
        self.view && self.edit
    }
}

/// Why an operation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// No authenticated caller where one is required.
    Unauthenticated,
    /// Authenticated caller is not the note's owner.
    Forbidden,
}

/// Granted read access and the visibility flags to report back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadGrant {
    /// The response's `view_only` flag.
    pub view_only: bool,
    /// The response's `allow_edit` flag.
    pub allow_edit: bool,
}

/// Decide whether a read may proceed.
///
/// `caller` is the authenticated email, if any; `owner` is the recorded
/// owner of the note, if one exists.
pub fn authorize_read(
    flags: ShareFlags,
    caller: Option<&str>,
    owner: Option<&str>,
) -> Result<ReadGrant, PolicyError> {
    if flags.view {
        // Public read through a share link. No identity needed; the link
        // itself is the capability.
        return Ok(ReadGrant {
            view_only: !flags.edit,
            allow_edit: flags.edit,
        });
    }

    let caller = caller.ok_or(PolicyError::Unauthenticated)?;

    if let Some(owner) = owner {
        if owner != caller {
            return Err(PolicyError::Forbidden);
        }
    }

    Ok(ReadGrant {
        view_only: false,
        allow_edit: true,
    })
}

/// Decide whether a write may proceed, and as whom.
///
/// Returns the owner email to record on the persisted note. An existing
/// owner is always carried forward on shared edits, so a note's owner never
/// changes once set to a real user.
pub fn authorize_write(
    flags: ShareFlags,
    caller: Option<&str>,
    existing_owner: Option<&str>,
) -> Result<String, PolicyError> {
    let shared_edit = flags.is_shared_edit();

    if !shared_edit && caller.is_none() {
        return Err(PolicyError::Unauthenticated);
    }

    let writer = caller.unwrap_or(SHARED_EDITOR);

    if let Some(owner) = existing_owner {
        if !shared_edit && owner != writer {
            return Err(PolicyError::Forbidden);
        }
        if shared_edit {
            // Anonymous edits never reassign ownership.
            return Ok(owner.to_string());
        }
    }

    Ok(writer.to_string())
}

/// Default display name for a classroom with no saved note.
///
/// `"Class " + suffix`, where the suffix is everything after the first `-`
/// in the classroom id (or the whole id when there is none).
pub fn default_class_name(classroom_id: &str) -> String {
    let suffix = classroom_id
        .split_once('-')
        .map(|(_, rest)| rest)
        .unwrap_or(classroom_id);
    format!("Class {suffix}")
}
