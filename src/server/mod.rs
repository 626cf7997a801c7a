//! Tracker HTTP Service
//!
//! JSON API consumed by the operator page and the spectator overlay.
//!
//! ## Endpoints
//! - `GET /` - Service name, version and the main endpoints
//! - `GET /health` - Health check
//! - `GET /api/state` - Operator snapshot
//! - `GET /api/view` - Spectator snapshot with its poll interval
//! - `/api/participants/...`, `/api/turn/next`, `/api/round`, resets - combat commands
//! - `/api/players/...`, `/api/encounters/...` - persistence
//!
//! Every command endpoint answers with the state after the command ran.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ServerError};

use crate::core::tracker::InitiativeTracker;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<InitiativeTracker>,
    /// Poll interval advertised to the spectator overlay, in seconds.
    pub view_refresh_secs: u64,
}

impl AppState {
    pub fn new(tracker: Arc<InitiativeTracker>, view_refresh_secs: u64) -> Self {
        Self {
            tracker,
            view_refresh_secs,
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/api/state", get(handlers::get_state))
        .route("/api/view", get(handlers::get_view))
        .route("/api/participants", post(handlers::add_participant))
        .route(
            "/api/participants/:index",
            delete(handlers::remove_participant),
        )
        .route(
            "/api/participants/:index/wounds",
            post(handlers::add_wound).delete(handlers::remove_wound),
        )
        .route(
            "/api/participants/:index/initiative",
            put(handlers::set_initiative),
        )
        .route("/api/initiatives", put(handlers::set_initiatives))
        .route("/api/turn/next", post(handlers::next_turn))
        .route("/api/round", post(handlers::new_round))
        .route("/api/combat/reset", post(handlers::reset_combat))
        .route("/api/reset", post(handlers::reset_all))
        .route("/api/players/save", post(handlers::save_players))
        .route("/api/players/load", post(handlers::load_players))
        .route(
            "/api/encounters",
            get(handlers::list_encounters).post(handlers::save_encounter),
        )
        .route("/api/encounters/:id/load", post(handlers::load_encounter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

// ============================================================================
// Tracker Server
// ============================================================================

pub struct TrackerServer {
    addr: SocketAddr,
    state: AppState,
    local_addr: Option<SocketAddr>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TrackerServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            state,
            local_addr: None,
            shutdown_tx: None,
            handle: None,
        }
    }

    /// Bind and start serving in the background. Returns the bound address
    /// (useful when the configured port is 0).
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.shutdown_tx.is_some() {
            return Err(ServerError::AlreadyRunning);
        }

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: self.addr,
            source,
        })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = router(self.state.clone());

        // HTTP is intentional for localhost - no TLS needed for local connections
        log::info!("Initiative tracker listening on http://{}", local_addr);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                    log::info!("Initiative tracker shutting down");
                })
                .await
            {
                log::error!("Server error: {}", e);
            }
        });

        self.local_addr = Some(local_addr);
        self.shutdown_tx = Some(shutdown_tx);
        self.handle = Some(handle);
        Ok(local_addr)
    }

    /// Stop serving and wait for in-flight requests to finish.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
            log::info!("Initiative tracker stopped");
        }
        self.local_addr = None;
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Operator page URL, once started.
    pub fn url(&self) -> Option<String> {
        self.local_addr.map(|addr| format!("http://{}", addr))
    }
}

// ============================================================================
// Tests
// ============================================================================
