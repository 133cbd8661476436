// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LiveNotes Contributors

use std::{env, net::SocketAddr, path::Path, sync::Arc};

use livenotes_server::{
    api::router,
    auth::SessionSigner,
    config::{
        DATA_DIR_ENV, DB_FILE_NAME, DEFAULT_MAIL_FROM, MAIL_FROM_ENV, MAIL_RELAY_TOKEN_ENV,
        MAIL_RELAY_URL_ENV, SESSION_SECRET_ENV,
    },
    notify::{LogNotifier, MailRelay, Notifier},
    state::AppState,
    storage::Database,
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Open the note database
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "./data".to_string());
    std::fs::create_dir_all(&data_dir).expect("Failed to create data directory");
    let db = Database::open(Path::new(&data_dir).join(DB_FILE_NAME))
        .expect("Failed to open note database");

    // Session signing secret. Rotating it invalidates all sessions.
    let secret = env::var(SESSION_SECRET_ENV).unwrap_or_else(|_| {
        tracing::warn!("SESSION_SECRET not set, using development secret");
        "livenotes-development-secret".to_string()
    });
    let sessions = SessionSigner::new(secret.into_bytes());

    // Mail delivery: HTTP relay when configured, log-only otherwise.
    let notifier: Arc<dyn Notifier> = match env::var(MAIL_RELAY_URL_ENV) {
        Ok(url) => {
            let from = env::var(MAIL_FROM_ENV).unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string());
            Arc::new(
                MailRelay::new(url, env::var(MAIL_RELAY_TOKEN_ENV).ok(), from)
                    .expect("Failed to build mail relay client"),
            )
        }
        Err(_) => {
            tracing::warn!("MAIL_RELAY_URL not set, verification emails go to the log");
            Arc::new(LogNotifier)
        }
    };

    let state = AppState::new(db, sessions, notifier);
    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, "LiveNotes server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}
