// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        LoginRequest, LoginResponse, NoteResponse, RenameClassRequest, ResendOtpRequest,
        SaveNoteRequest, SessionResponse, SignupRequest, SuccessResponse, VerifyRequest,
    },
    state::AppState,
    storage::StoredNote,
};

use health::{HealthChecks, HealthResponse, ReadyResponse};

pub mod accounts;
pub mod classes;
pub mod health;
pub mod notes;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/notes/{classroom_id}",
            get(notes::get_note).post(notes::save_note),
        )
        .route("/classes", get(classes::list_classes))
        .route(
            "/classes/{classroom_id}",
            delete(classes::delete_class).put(classes::rename_class),
        )
        .route("/signup", post(accounts::signup))
        .route("/verify", post(accounts::verify))
        .route("/resend-otp", post(accounts::resend_otp))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/check-session", get(accounts::check_session));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        notes::get_note,
        notes::save_note,
        classes::list_classes,
        classes::rename_class,
        classes::delete_class,
        accounts::signup,
        accounts::verify,
        accounts::resend_otp,
        accounts::login,
        accounts::logout,
        accounts::check_session,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            NoteResponse,
            SaveNoteRequest,
            RenameClassRequest,
            StoredNote,
            SignupRequest,
            VerifyRequest,
            ResendOtpRequest,
            LoginRequest,
            LoginResponse,
            SessionResponse,
            SuccessResponse,
            ReadyResponse,
            HealthChecks,
            HealthResponse
        )
    ),
    tags(
        (name = "Notes", description = "Classroom note reads and writes"),
        (name = "Classes", description = "Class listing and management"),
        (name = "Accounts", description = "Signup, verification and sessions"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::for_tests());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
