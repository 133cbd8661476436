// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! API error taxonomy.
//!
//! Every handler returns a tagged outcome; there is no catch-all error path.
//! Ownership and authentication failures carry a specific status with a
//! generic message. Backing-store and notification failures surface as a
//! generic server error with the detail logged, never sent to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No valid session where one is required.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Valid session, wrong owner.
    #[error("Unauthorized access")]
    Forbidden,

    /// Referenced classroom or user is absent.
    #[error("{0} not found")]
    NotFound(String),

    /// Verification code submitted after its expiry.
    #[error("Verification code has expired")]
    CodeExpired,

    /// Verification code does not match the stored one.
    #[error("Invalid verification code")]
    CodeMismatch,

    /// Login failure. One message for user-not-found, not-verified and
    /// wrong-password, so responses cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signup with an email that already has an account.
    #[error("Email already registered")]
    AlreadyRegistered,

    /// Malformed or incomplete request.
    #[error("{0}")]
    BadRequest(String),

    /// Backing store unreachable or erroring.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Verification email could not be delivered.
    #[error("Failed to send verification email")]
    Notification,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Hash(#[from] crate::auth::password::PasswordHashError),
}

impl From<crate::policy::PolicyError> for ApiError {
    fn from(err: crate::policy::PolicyError) -> Self {
        match err {
            crate::policy::PolicyError::Unauthenticated => ApiError::Unauthenticated,
            crate::policy::PolicyError::Forbidden => ApiError::Forbidden,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: String,
}

impl ApiError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "not_authenticated",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::CodeExpired => "code_expired",
            ApiError::CodeMismatch => "code_mismatch",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::AlreadyRegistered => "already_registered",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Store(_) | ApiError::Hash(_) => "internal_error",
            ApiError::Notification => "notification_error",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::CodeExpired
            | ApiError::CodeMismatch
            | ApiError::AlreadyRegistered
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Hash(_) | ApiError::Notification => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Store errors keep their detail in the logs only.
        let message = match &self {
            ApiError::Store(e) => {
                tracing::error!(error = %e, "storage error while handling request");
                "Internal server error".to_string()
            }
            ApiError::Hash(e) => {
                tracing::error!(error = %e, "password hashing error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorBody {
            error: message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn unauthenticated_returns_401() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "not_authenticated");
    }

    #[tokio::test]
    async fn forbidden_returns_403() {
        let response = ApiError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn store_error_hides_detail() {
        let err = ApiError::Store(StoreError::NotFound("note n-1".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["error_code"], "internal_error");
    }

    #[test]
    fn login_failures_share_one_message() {
        // Same body for every credential failure, so the API cannot be used
        // to probe which accounts exist.
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
