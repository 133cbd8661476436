// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Account endpoints: signup, email verification, login, session check.
//!
//! Signup creates an unverified account and mails a 6-digit one-time code
//! valid for 10 minutes. Login requires a verified account; every credential
//! failure gets the same `invalid_credentials` response, with the actual
//! cause only in the logs.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use rand::Rng;

use crate::{
    auth::{self, MaybeAuth, SESSION_COOKIE, SESSION_TTL_HOURS},
    error::ApiError,
    models::{
        LoginRequest, LoginResponse, ResendOtpRequest, SessionResponse, SignupRequest,
        SuccessResponse, VerifyRequest,
    },
    state::AppState,
    storage::{StoredUser, UserRepository},
};

/// One-time code validity window, in minutes.
const OTP_TTL_MINUTES: i64 = 10;

fn generate_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32))
}

fn verification_email(otp: &str) -> String {
    format!(
        "Welcome to LiveNotes!\n\n\
         Your verification code is: {otp}\n\n\
         This code will expire in {OTP_TTL_MINUTES} minutes.\n\n\
         If you didn't request this code, please ignore this email.\n"
    )
}

async fn send_code(state: &AppState, email: &str, otp: &str) -> Result<(), ApiError> {
    state
        .notifier
        .send(email, "Verify Your LiveNotes Account", &verification_email(otp))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, email, "failed to send verification email");
            ApiError::Notification
        })
}

#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "Account created, code sent", body = SuccessResponse),
        (status = 400, description = "Missing fields or email already registered"),
        (status = 500, description = "Verification email could not be sent")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }
    // The owner index joins owner and classroom with '|'; never let it into
    // an account's email.
    if request.email.contains('|') {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }

    let repo = UserRepository::new(&state.db);
    if repo.get(&request.email)?.is_some() {
        return Err(ApiError::AlreadyRegistered);
    }

    let otp = generate_otp();
    let user = StoredUser {
        email: request.email.clone(),
        name: request.name,
        password_hash: auth::hash_password(&request.password)?,
        verified: false,
        otp: otp.clone(),
        otp_expiry: Utc::now() + Duration::minutes(OTP_TTL_MINUTES),
        created_at: Utc::now(),
    };
    repo.create(&user)?;
    tracing::info!(email = %request.email, "account created, awaiting verification");

    send_code(&state, &request.email, &otp).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "Email verified", body = SuccessResponse),
        (status = 400, description = "Code expired or mismatched"),
        (status = 404, description = "No such user")
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if request.email.is_empty() || request.otp.is_empty() {
        return Err(ApiError::BadRequest("Email and OTP are required".to_string()));
    }

    let repo = UserRepository::new(&state.db);
    let user = repo
        .get(&request.email)?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

    // Expiry first: a correct code past its window is still rejected.
    if Utc::now() > user.otp_expiry {
        return Err(ApiError::CodeExpired);
    }
    if user.otp != request.otp {
        return Err(ApiError::CodeMismatch);
    }

    repo.mark_verified(&request.email)?;
    tracing::info!(email = %request.email, "email verified");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/resend-otp",
    request_body = ResendOtpRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "New code sent", body = SuccessResponse),
        (status = 404, description = "No such user"),
        (status = 500, description = "Verification email could not be sent")
    )
)]
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if request.email.is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    let repo = UserRepository::new(&state.db);
    if repo.get(&request.email)?.is_none() {
        return Err(ApiError::NotFound("User".to_string()));
    }

    let otp = generate_otp();
    repo.set_otp(
        &request.email,
        &otp,
        Utc::now() + Duration::minutes(OTP_TTL_MINUTES),
    )?;

    send_code(&state, &request.email, &otp).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "Session issued via Set-Cookie", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let user = UserRepository::new(&state.db).get(&request.email)?;

    // One response for every failure mode; the cause stays in the logs.
    let Some(user) = user else {
        tracing::warn!(email = %request.email, "login failed: user not found");
        return Err(ApiError::InvalidCredentials);
    };
    if !user.verified {
        tracing::warn!(email = %request.email, "login failed: email not verified");
        return Err(ApiError::InvalidCredentials);
    }
    if !auth::verify_password(&request.password, &user.password_hash) {
        tracing::warn!(email = %request.email, "login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.sessions.issue(&user.email);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(SESSION_TTL_HOURS))
        .build();

    tracing::info!(email = %user.email, "login successful");
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            redirect: "/editor".to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Accounts",
    responses((status = 200, description = "Session cleared", body = SuccessResponse))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(SuccessResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/check-session",
    tag = "Accounts",
    responses(
        (status = 200, description = "Authenticated", body = SessionResponse),
        (status = 401, description = "Anonymous", body = SessionResponse)
    )
)]
pub async fn check_session(MaybeAuth(user): MaybeAuth) -> (StatusCode, Json<SessionResponse>) {
    match user {
        Some(user) => (
            StatusCode::OK,
            Json(SessionResponse {
                authenticated: true,
                user: Some(user.email),
                timestamp: Utc::now(),
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(SessionResponse {
                authenticated: false,
                user: None,
                timestamp: Utc::now(),
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::Notifier;
    use crate::storage::Database;
    use std::sync::Arc;

    fn state_with_recorder() -> (AppState, Arc<RecordingNotifier>) {
        let recorder = Arc::new(RecordingNotifier::default());
        let state = AppState::new(
            Database::in_memory().unwrap(),
            crate::auth::SessionSigner::new(b"test-secret".to_vec()),
            recorder.clone() as Arc<dyn Notifier>,
        );
        (state, recorder)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Teacher".to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
        }
    }

    fn sent_otp(recorder: &RecordingNotifier) -> String {
        let sent = recorder.sent.lock().unwrap();
        let (_, _, body) = sent.last().expect("an email was sent");
        body.split("code is: ")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .expect("body contains a code")
            .to_string()
    }

    #[tokio::test]
    async fn signup_creates_unverified_user_and_sends_code() {
        let (state, recorder) = state_with_recorder();

        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();

        let user = UserRepository::new(&state.db)
            .get("a@x.com")
            .unwrap()
            .unwrap();
        assert!(!user.verified);
        assert_eq!(user.otp.len(), 6);

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@x.com");
        assert!(sent[0].2.contains(&user.otp));
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let (state, _) = state_with_recorder();
        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();

        let err = signup(State(state), Json(signup_request("a@x.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn signup_rejects_missing_fields() {
        let (state, _) = state_with_recorder();
        let err = signup(
            State(state),
            Json(SignupRequest {
                name: String::new(),
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn signup_rejects_email_with_separator() {
        let (state, recorder) = state_with_recorder();
        let err = signup(State(state), Json(signup_request("a@x.com|evil")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(recorder.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn signup_surfaces_notification_failure() {
        let (state, recorder) = state_with_recorder();
        recorder
            .fail
            .store(true, std::sync::atomic::Ordering::Relaxed);

        let err = signup(State(state), Json(signup_request("a@x.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Notification));
    }

    #[tokio::test]
    async fn verify_with_correct_code_flips_verified() {
        let (state, recorder) = state_with_recorder();
        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();

        verify(
            State(state.clone()),
            Json(VerifyRequest {
                email: "a@x.com".to_string(),
                otp: sent_otp(&recorder),
            }),
        )
        .await
        .unwrap();

        assert!(
            UserRepository::new(&state.db)
                .get("a@x.com")
                .unwrap()
                .unwrap()
                .verified
        );
    }

    #[tokio::test]
    async fn verify_with_wrong_code_fails_and_state_unchanged() {
        let (state, recorder) = state_with_recorder();
        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();

        let wrong = if sent_otp(&recorder) == "000000" {
            "000001"
        } else {
            "000000"
        };
        let err = verify(
            State(state.clone()),
            Json(VerifyRequest {
                email: "a@x.com".to_string(),
                otp: wrong.to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::CodeMismatch));
        assert!(
            !UserRepository::new(&state.db)
                .get("a@x.com")
                .unwrap()
                .unwrap()
                .verified
        );
    }

    #[tokio::test]
    async fn verify_after_expiry_fails_even_with_matching_code() {
        let (state, recorder) = state_with_recorder();
        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();

        let otp = sent_otp(&recorder);
        // Force the code into the past.
        UserRepository::new(&state.db)
            .set_otp("a@x.com", &otp, Utc::now() - Duration::minutes(1))
            .unwrap();

        let err = verify(
            State(state),
            Json(VerifyRequest {
                email: "a@x.com".to_string(),
                otp,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::CodeExpired));
    }

    #[tokio::test]
    async fn resend_overwrites_code_without_touching_verification() {
        let (state, recorder) = state_with_recorder();
        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();

        resend_otp(
            State(state.clone()),
            Json(ResendOtpRequest {
                email: "a@x.com".to_string(),
            }),
        )
        .await
        .unwrap();

        let user = UserRepository::new(&state.db)
            .get("a@x.com")
            .unwrap()
            .unwrap();
        assert_eq!(user.otp, sent_otp(&recorder));
        assert!(!user.verified);
        assert_eq!(recorder.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn login_flow_after_verification() {
        let (state, recorder) = state_with_recorder();
        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();

        // Unverified login fails with the generic response.
        let err = login(
            State(state.clone()),
            CookieJar::new(),
            Json(LoginRequest {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));

        verify(
            State(state.clone()),
            Json(VerifyRequest {
                email: "a@x.com".to_string(),
                otp: sent_otp(&recorder),
            }),
        )
        .await
        .unwrap();

        let (jar, Json(response)) = login(
            State(state.clone()),
            CookieJar::new(),
            Json(LoginRequest {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(response.redirect, "/editor");

        let cookie = jar.get(SESSION_COOKIE).expect("session cookie set");
        let session = state.sessions.verify(cookie.value()).unwrap();
        assert_eq!(session.email, "a@x.com");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (state, recorder) = state_with_recorder();
        signup(State(state.clone()), Json(signup_request("a@x.com")))
            .await
            .unwrap();
        verify(
            State(state.clone()),
            Json(VerifyRequest {
                email: "a@x.com".to_string(),
                otp: sent_otp(&recorder),
            }),
        )
        .await
        .unwrap();

        // Unknown user and wrong password produce the same error.
        let unknown = login(
            State(state.clone()),
            CookieJar::new(),
            Json(LoginRequest {
                email: "ghost@x.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .unwrap_err();
        let wrong_pw = login(
            State(state),
            CookieJar::new(),
            Json(LoginRequest {
                email: "a@x.com".to_string(),
                password: "nope".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(unknown, ApiError::InvalidCredentials));
        assert!(matches!(wrong_pw, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn check_session_reports_identity() {
        use crate::auth::SessionUser;

        let (status, Json(response)) = check_session(MaybeAuth(Some(SessionUser {
            email: "a@x.com".to_string(),
        })))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(response.authenticated);
        assert_eq!(response.user.as_deref(), Some("a@x.com"));

        let (status, Json(response)) = check_session(MaybeAuth(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!response.authenticated);
        assert!(response.user.is_none());
    }

    #[tokio::test]
    async fn logout_clears_the_cookie() {
        let (jar, Json(response)) = logout(CookieJar::new()).await;
        assert!(response.success);

        // The removal cookie is present with an empty value.
        let removal = jar.get(SESSION_COOKIE);
        assert!(removal.is_none() || removal.unwrap().value().is_empty());
    }
}
