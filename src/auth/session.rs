// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! Stateless signed session tokens.
//!
//! A session is an HMAC-SHA256-signed assertion "this caller is user U",
//! held client-side in a cookie. There is no server-side session table; the
//! cookie is the store of record. Tokens are valid for 24 hours from
//! issuance and slide only on explicit re-login, not on activity.
//!
//! Token format: `base64url(claims JSON) . base64url(HMAC-SHA256 tag)`.
//!
//! Verification failure of any kind (bad signature, expiry, garbage input)
//! yields anonymous, never an error. Routes that require identity reject
//! anonymous callers themselves.

use std::sync::Arc;

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "livenotes_session";

/// Session validity window, in hours.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Claims carried inside a session token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Email of the authenticated user.
    email: String,
    /// Always true for issued tokens; kept explicit in the payload so a
    /// token can never be mistaken for an anonymous assertion.
    authenticated: bool,
    /// Expiry, Unix seconds.
    exp: i64,
}

/// Identity resolved from a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
}

/// Issues and verifies signed session tokens with a fixed server secret.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Arc<Vec<u8>>,
}

impl SessionSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
        }
    }

    /// Issue a token asserting `email`, valid for 24 hours from now.
    pub fn issue(&self, email: &str) -> String {
        self.issue_at(email, Utc::now())
    }

    fn issue_at(&self, email: &str, now: DateTime<Utc>) -> String {
        let claims = SessionClaims {
            email: email.to_string(),
            authenticated: true,
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };
        // Serializing a struct of plain fields cannot fail.
        let payload = Base64UrlUnpadded::encode_string(
            &serde_json::to_vec(&claims).unwrap_or_default(),
        );
        let tag = self.sign(payload.as_bytes());
        format!("{payload}.{tag}")
    }

    /// Verify a token, resolving it to an identity.
    ///
    /// Returns `None` for any malformed, forged or expired token.
    pub fn verify(&self, token: &str) -> Option<SessionUser> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionUser> {
        let (payload, tag) = token.split_once('.')?;

        let tag_bytes = Base64UrlUnpadded::decode_vec(tag).ok()?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag_bytes).ok()?;

        let claims_bytes = Base64UrlUnpadded::decode_vec(payload).ok()?;
        let claims: SessionClaims = serde_json::from_slice(&claims_bytes).ok()?;

        if !claims.authenticated || claims.exp <= now.timestamp() {
            return None;
        }

        Some(SessionUser {
            email: claims.email,
        })
    }

    fn sign(&self, payload: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(payload);
        Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes())
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length")
    }
}
