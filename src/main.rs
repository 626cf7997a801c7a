use std::sync::Arc;

use initiative_tracker::config::AppConfig;
use initiative_tracker::core::logging;
use initiative_tracker::core::storage::JsonFileStore;
use initiative_tracker::core::tracker::InitiativeTracker;
use initiative_tracker::server::{AppState, TrackerServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_source) = AppConfig::load();

    // Initialize logging
    let _log_guard = logging::init(&config.log_dir());
    log::info!("{} v{} starting", initiative_tracker::NAME, initiative_tracker::VERSION);
    config_source.log();

    let data_dir = config.data_dir();
    let store = JsonFileStore::open(&data_dir)?;
    log::info!("Saved rosters and encounters live in {}", data_dir.display());

    let tracker = Arc::new(InitiativeTracker::new(config.combat, Arc::new(store)));
    let state = AppState::new(tracker, config.server.view_refresh_secs);

    let mut server = TrackerServer::new(config.server.socket_addr(), state);
    server.start().await?;

    if config.server.open_browser {
        if let Some(url) = server.url() {
            if let Err(e) = open::that(&url) {
                log::warn!("Failed to open browser at {}: {}", url, e);
            }
        }
    }

    tokio::signal::ctrl_c().await?;
    log::info!("Interrupt received");
    server.stop().await;

    Ok(())
}
