// API Server Binary Entry Point
//
// Purpose: Start the Axum API server with the ONNX classifiers and the SQLite catalog
// Usage: cargo run --features api --bin api_server

use crop_disease_advisor::{create_router, AdvisorConfig, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_disease_advisor=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration: optional JSON file (ADVISOR_CONFIG), otherwise environment variables
    let config = match std::env::var("ADVISOR_CONFIG") {
        Ok(path) => AdvisorConfig::load(&PathBuf::from(path))?,
        Err(_) => AdvisorConfig::from_env(),
    };

    tracing::info!("Configuration:");
    tracing::info!("  LEAF_MODEL_PATH: {:?} (exists: {})", config.leaf_model_path, config.leaf_model_path.exists());
    tracing::info!("  DISEASE_MODEL_PATH: {:?} (exists: {})", config.disease_model_path, config.disease_model_path.exists());
    tracing::info!("  CLASS_NAMES_PATH: {:?}", config.class_names_path);
    tracing::info!("  TREATMENT_DB_PATH: {:?} (exists: {})", config.catalog_path, config.catalog_path.exists());
    tracing::info!("  IMAGE_SIZE: {}", config.image_size);
    tracing::info!("  MAX_UPLOAD: {:.1}MB", config.max_upload_mb());
    tracing::info!("  PORT: {}", config.port);

    let port = config.port;

    // Initialize application state (loads class names and models)
    tracing::info!("Initializing application state...");
    let state = AppState::new(config);
    if state.api_ready() {
        tracing::info!("Application state initialized successfully");
    } else {
        tracing::warn!("Application state initialized without all models; classification returns 503");
    }

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
