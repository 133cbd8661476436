// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Note read/write endpoints.
//!
//! Reads go through the bucketed read cache; writes fetch the existing
//! record directly and purge the classroom's cache entry after persisting,
//! so the writer's own next read is fresh.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use crate::{
    auth::MaybeAuth,
    error::ApiError,
    models::{NoteResponse, SaveNoteRequest, SuccessResponse},
    policy::{self, ShareFlags},
    state::AppState,
    storage::{NoteRepository, ReadCache, StoredNote},
};

#[utoipa::path(
    get,
    path = "/api/notes/{classroom_id}",
    params(
        ("classroom_id" = String, Path, description = "Classroom identifier"),
        ShareFlags
    ),
    tag = "Notes",
    responses(
        (status = 200, description = "Note content and visibility flags", body = NoteResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the note's owner")
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Query(flags): Query<ShareFlags>,
    MaybeAuth(caller): MaybeAuth,
) -> Result<Json<NoteResponse>, ApiError> {
    let bucket = ReadCache::current_bucket();
    let note = match state.cache.get(&classroom_id, bucket) {
        Some(cached) => cached,
        None => {
            let fetched = NoteRepository::new(&state.db).get(&classroom_id)?;
            state.cache.put(&classroom_id, bucket, fetched.clone());
            fetched
        }
    };

    let caller = caller.as_ref().map(|u| u.email.as_str());
    let owner = note.as_ref().map(|n| n.owner_email.as_str());
    let grant = policy::authorize_read(flags, caller, owner)?;

    let response = match note {
        Some(note) => NoteResponse {
            content: note.content,
            class_name: note.class_name,
            last_updated: Some(note.last_updated),
            view_only: grant.view_only,
            allow_edit: grant.allow_edit,
        },
        // No note yet for this classroom: an empty placeholder, not a 404.
        None => NoteResponse {
            content: String::new(),
            class_name: policy::default_class_name(&classroom_id),
            last_updated: None,
            view_only: grant.view_only,
            allow_edit: grant.allow_edit,
        },
    };

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/notes/{classroom_id}",
    params(
        ("classroom_id" = String, Path, description = "Classroom identifier"),
        ShareFlags
    ),
    request_body = SaveNoteRequest,
    tag = "Notes",
    responses(
        (status = 200, description = "Note saved", body = SuccessResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the note's owner")
    )
)]
pub async fn save_note(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Query(flags): Query<ShareFlags>,
    MaybeAuth(caller): MaybeAuth,
    Json(request): Json<SaveNoteRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let repo = NoteRepository::new(&state.db);
    let existing = repo.get(&classroom_id)?;

    let caller = caller.as_ref().map(|u| u.email.as_str());
    let existing_owner = existing.as_ref().map(|n| n.owner_email.as_str());
    let owner_email = policy::authorize_write(flags, caller, existing_owner)?;

    let class_name = request
        .class_name
        .filter(|name| !name.is_empty())
        .or_else(|| existing.as_ref().map(|n| n.class_name.clone()))
        .unwrap_or_else(|| policy::default_class_name(&classroom_id));
    let language = request
        .language
        .or_else(|| existing.and_then(|n| n.language));

    let note = StoredNote {
        classroom_id,
        owner_email,
        content: request.content,
        class_name,
        language,
        last_updated: Utc::now(),
    };
    repo.put(&note)?;

    state.cache.invalidate(&note.classroom_id);

    Ok(Json(SuccessResponse::ok()))
}
