// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! HTTP mail-relay client.
//!
//! Posts messages as JSON to an external relay that owns the actual SMTP
//! delivery, timeouts and retries. The payload is
//! `{"from", "to", "subject", "body"}` with an optional bearer token.

use std::time::Duration;

use serde::Serialize;

use super::{Notifier, NotifyError};

const RELAY_TIMEOUT_SECS: u64 = 15;

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Notifier backed by an HTTP mail relay.
pub struct MailRelay {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    from: String,
}

impl MailRelay {
    /// Create a relay client.
    ///
    /// - `url`: relay endpoint accepting POSTed JSON messages
    /// - `token`: optional bearer token for the relay
    /// - `from`: sender address stamped on every message
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        from: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        // Bound every relay call so a hung relay cannot stall signup.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RELAY_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            token,
            from: from.into(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for MailRelay {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = RelayMessage {
            from: &self.from,
            to,
            subject,
            body,
        };

        let mut request = self.client.post(&self.url).json(&message);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), to, "mail relay rejected message");
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }

        tracing::debug!(to, subject, "verification email handed to relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_client_builds_with_timeout() {
        let relay = MailRelay::new("http://relay.local/send", None, "no-reply@livenotes.local");
        assert!(relay.is_ok());
    }

    #[test]
    fn relay_message_serializes_expected_shape() {
        let message = RelayMessage {
            from: "no-reply@livenotes.local",
            to: "a@x.com",
            subject: "Verify Your LiveNotes Account",
            body: "code: 123456",
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["from"], "no-reply@livenotes.local");
        assert_eq!(json["to"], "a@x.com");
        assert_eq!(json["subject"], "Verify Your LiveNotes Account");
        assert_eq!(json["body"], "code: 123456");
    }
}
