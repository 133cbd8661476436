// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! # Notification Module
//!
//! Delivery of one-time verification codes to email addresses.
//!
//! The core only sees the [`Notifier`] trait. Two implementations exist:
//!
//! - [`relay::MailRelay`] posts to an HTTP mail-relay endpoint
//!   (`MAIL_RELAY_URL`), which is what production runs against
//! - [`LogNotifier`] writes the message to the log; used when no relay is
//!   configured and in tests
//!
//! Send failure is a recoverable error surfaced to the caller. The core
//! never retries; retry, if any, belongs to the relay.

pub mod relay;

pub use relay::MailRelay;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail relay rejected the message (status {0})")]
    Rejected(u16),
}

/// Delivers a message to an email address.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Log-only delivery for development and tests.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(to, subject, body, "mail relay not configured, logging message instead");
        Ok(())
    }
}
