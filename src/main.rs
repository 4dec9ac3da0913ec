// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::entry_repository::EntryRepository;
use crate::application::entry_service::{EntryService, SystemClock};
use crate::application::progress_service::ProgressService;
use crate::infrastructure::config::{load_app_config, StorageBackend};
use crate::infrastructure::json_file_repository::JsonFileRepository;
use crate::infrastructure::memory_repository::MemoryRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn EntryRepository> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory entry store; entries are lost on shutdown");
            Arc::new(MemoryRepository::new())
        }
        StorageBackend::File => {
            let repo = JsonFileRepository::new(config.storage.path.clone());
            tracing::info!("Storing entries in {}", repo.path().display());
            Arc::new(repo)
        }
    };

    // Create services (application layer)
    let entry_service = EntryService::new(repository.clone(), Arc::new(SystemClock));
    let progress_service = ProgressService::new(repository, config.chart.clone());

    let state = Arc::new(AppState {
        entry_service,
        progress_service,
    });

    // Build router (presentation layer)
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting fitness-tracker service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
