// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, process, sync::Arc};

use keyward::{
    api::router,
    config::{AuthSettings, ServerSettings, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    identity::{CredentialStore, InMemoryCredentialStore, NewIdentity},
    state::AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Configuration problems are fatal here, never at request time.
    let (auth_settings, server_settings) = match (AuthSettings::from_env(), ServerSettings::from_env()) {
        (Ok(auth), Ok(server)) => (auth, server),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "invalid configuration");
            process::exit(1);
        }
    };

    tracing::info!(settings = ?auth_settings, "authentication configured");

    let credentials = Arc::new(InMemoryCredentialStore::new());

    if let Some((email, password)) = server_settings.seed_admin.clone() {
        let seeded = credentials.register(NewIdentity {
            email,
            password,
            display_name: "Administrator".to_string(),
            role: Some("admin".to_string()),
        });
        if let Err(e) = seeded {
            tracing::error!(error = %e, "failed to seed admin identity");
            process::exit(1);
        }
    }

    let state = AppState::new(&auth_settings, credentials);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(server_settings.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(addr = %server_settings.bind_addr, "keyward listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
