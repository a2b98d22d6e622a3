// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DevConnect API Server
//!
//! Backend for the DevConnect developer-profile app: JWT-authenticated
//! profile management over Firestore and a GitHub repository proxy.

use devconnect::{config::Config, db::FirestoreDb, services::GithubClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting DevConnect API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize GitHub client
    let github_credentials = config
        .github_client_id
        .clone()
        .zip(config.github_client_secret.clone());
    if github_credentials.is_none() {
        tracing::warn!("GitHub credentials not configured; repo lookups run unauthenticated");
    }
    let github = GithubClient::new(github_credentials).expect("Failed to build GitHub client");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        github,
    });

    // Build router
    let app = devconnect::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("devconnect=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
