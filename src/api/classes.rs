// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Class management endpoints: list, rename, delete.
//!
//! All three require an authenticated owner; share-link flags play no role
//! here.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{RenameClassRequest, SuccessResponse},
    state::AppState,
    storage::{NoteRepository, StoredNote},
};

#[utoipa::path(
    get,
    path = "/api/classes",
    tag = "Classes",
    responses(
        (status = 200, description = "Caller's classes, newest first", body = [StoredNote]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_classes(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<Vec<StoredNote>>, ApiError> {
    let classes = NoteRepository::new(&state.db).list_by_owner(&user.email)?;
    tracing::debug!(user = %user.email, count = classes.len(), "listed classes");
    Ok(Json(classes))
}

#[utoipa::path(
    put,
    path = "/api/classes/{classroom_id}",
    params(("classroom_id" = String, Path, description = "Classroom identifier")),
    request_body = RenameClassRequest,
    tag = "Classes",
    responses(
        (status = 200, description = "Class renamed", body = SuccessResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the note's owner"),
        (status = 404, description = "No such class")
    )
)]
pub async fn rename_class(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Auth(user): Auth,
    Json(request): Json<RenameClassRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if request.class_name.is_empty() {
        return Err(ApiError::BadRequest("Class name is required".to_string()));
    }

    let repo = NoteRepository::new(&state.db);
    let mut note = repo
        .get(&classroom_id)?
        .ok_or_else(|| ApiError::NotFound("Class".to_string()))?;

    if note.owner_email != user.email {
        return Err(ApiError::Forbidden);
    }

    note.class_name = request.class_name;
    repo.put(&note)?;
    state.cache.invalidate(&classroom_id);

    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{classroom_id}",
    params(("classroom_id" = String, Path, description = "Classroom identifier")),
    tag = "Classes",
    responses(
        (status = 200, description = "Class deleted (or already absent)", body = SuccessResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the note's owner")
    )
)]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
    Auth(user): Auth,
) -> Result<Json<SuccessResponse>, ApiError> {
    let repo = NoteRepository::new(&state.db);

    // Ownership check first; deleting an absent class is a quiet success.
    if let Some(note) = repo.get(&classroom_id)? {
        if note.owner_email != user.email {
            return Err(ApiError::Forbidden);
        }
    }

    repo.delete(&classroom_id)?;
    state.cache.invalidate(&classroom_id);

    Ok(Json(SuccessResponse::ok()))
}
