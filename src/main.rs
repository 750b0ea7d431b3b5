// SPDX-License-Identifier: MIT

//! Jelloverse API Server
//!
//! Serves the shared jam calendar, user profiles, and the gamification
//! points ledger backing the Jelloverse web app.

use jelloverse_api::{
    config::Config,
    db::FirestoreDb,
    services::{ClassifierClient, PointsLedger, StorageClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Jelloverse API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    let ledger = PointsLedger::new(db.clone());

    let classifier = ClassifierClient::new(config.openai_api_key.clone());
    tracing::info!("Image classifier client initialized");

    let storage = StorageClient::new(
        config.storage_url.clone(),
        config.storage_bucket.clone(),
        config.storage_api_key.clone(),
    );
    tracing::info!(bucket = %config.storage_bucket, "Object storage client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        ledger,
        classifier,
        storage,
    });

    // Build router
    let app = jelloverse_api::routes::create_router(state);

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
                .add_directive("jelloverse_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
