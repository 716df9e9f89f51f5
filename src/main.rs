//! Main entry point for the floor plan rendering service

use floorplan_render::{
    api,
    backend::{GeminiBackend, GenerationBackend},
    client::{GenerationClient, UpscaleClient},
    config::Settings,
    download::ExportStore,
    health::HttpProbe,
    workflow::WorkflowController,
    AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if settings.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    info!("Starting floor plan rendering service");

    // The credential is required; refuse to start without it
    let api_key = settings.require_api_key()?;

    info!(
        "Loaded configuration: server={}:{}, model={}",
        settings.server.host, settings.server.port, settings.gemini.model
    );

    let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiBackend::new(&settings.gemini, api_key)?);
    let probe = Arc::new(HttpProbe::new(&settings.connectivity)?);

    let controller = Arc::new(WorkflowController::new(
        GenerationClient::new(backend.clone()),
        UpscaleClient::new(backend),
        probe,
        settings.upload.advisory_max_bytes,
    ));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create application state
    let app_state = Arc::new(AppState {
        export_store: ExportStore::new(&settings.storage.export_dir),
        settings: Arc::new(settings),
        controller,
    });

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
