// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding the note database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SESSION_SECRET` | HMAC key for session cookies | Required for production |
//! | `MAIL_RELAY_URL` | HTTP mail relay endpoint | Log-only delivery when unset |
//! | `MAIL_RELAY_TOKEN` | Bearer token for the mail relay | Optional |
//! | `MAIL_FROM` | Sender address on verification emails | `no-reply@livenotes.local` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the data directory path.
///
/// The note database (`notes.redb`) lives here. The directory is created on
/// startup if it does not exist.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the session signing secret.
///
/// Sessions are signed client-side cookies; there is no server-side session
/// table. Rotating this secret invalidates every outstanding session.
pub const SESSION_SECRET_ENV: &str = "SESSION_SECRET";

/// Environment variable name for the HTTP mail relay endpoint.
///
/// When unset, verification emails are written to the log instead of being
/// delivered. Intended for local development only.
pub const MAIL_RELAY_URL_ENV: &str = "MAIL_RELAY_URL";

/// Environment variable name for the mail relay bearer token.
pub const MAIL_RELAY_TOKEN_ENV: &str = "MAIL_RELAY_TOKEN";

/// Environment variable name for the sender address on outgoing mail.
pub const MAIL_FROM_ENV: &str = "MAIL_FROM";

/// Default sender address when `MAIL_FROM` is unset.
pub const DEFAULT_MAIL_FROM: &str = "no-reply@livenotes.local";

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "notes.redb";
