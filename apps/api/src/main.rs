mod config;
mod config_store;
mod errors;
mod export;
mod generation;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::export::{cleaner, DocumentExporter, ExportSettings};
use crate::generation::Resolvers;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Process settings first; the document configuration path comes from here
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={level},tower_http={level}",
                env!("CARGO_CRATE_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Genie API v{}", env!("CARGO_PKG_VERSION"));

    let store = ConfigStore::load(&config.config_path, &config.env_path).with_context(|| {
        format!("Failed to load configuration from {}", config.config_path.display())
    })?;

    let llm = LlmClient::from_config(&store)?;
    let resolvers = Resolvers::from_config(&store, &llm)?;

    let exporter = match ExportSettings::from_store(&store) {
        Ok(settings) => {
            let report = cleaner::cleanup(&settings.path).await;
            info!(
                "Export directory {} swept ({} removed, {} failed)",
                settings.path.display(),
                report.removed.len(),
                report.failed.len()
            );
            let exporter = DocumentExporter::with_pandoc(settings);
            info!("Document export enabled into {}", exporter.directory().display());
            Some(Arc::new(exporter))
        }
        Err(AppError::ExportNotConfigured) => {
            warn!("No export.path configured; document export disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let state = AppState {
        resolvers: Arc::new(resolvers),
        exporter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a web frontend is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
