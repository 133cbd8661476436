// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Axum extractors for session identity.
//!
//! Use `Auth` in handlers that require a logged-in caller:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user.email is the authenticated caller
//! }
//! ```
//!
//! Use `MaybeAuth` on routes where share-link flags may stand in for a
//! session; the access policy then decides per request.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

use super::session::{SessionUser, SESSION_COOKIE};
use crate::{error::ApiError, state::AppState};

/// Extractor requiring an authenticated caller. Rejects with 401.
pub struct Auth(pub SessionUser);

/// Extractor resolving the caller to an identity or anonymous.
///
/// A missing, forged or expired session cookie degrades to anonymous rather
/// than failing; the read/write policy is responsible for rejecting
/// anonymous callers where it must.
pub struct MaybeAuth(pub Option<SessionUser>);

impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let user = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| state.sessions.verify(cookie.value()));
        Ok(MaybeAuth(user))
    }
}

impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuth(user) = MaybeAuth::from_request_parts(parts, state)
            .await
            .unwrap_or(MaybeAuth(None));
        user.map(Auth).ok_or(ApiError::Unauthenticated)
    }
}
