//! qsync-qm library interface
//!
//! Exposes the service internals for integration testing.

pub mod api;
pub mod error;
pub mod repository;
pub mod services;
pub mod session;
pub mod sync;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::repository::QuoteRepository;
use crate::session::SessionTracker;
use crate::sync::SyncService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Quote collection over the persistent store
    pub repo: Arc<QuoteRepository>,
    /// Ephemeral view tracking
    pub session: Arc<SessionTracker>,
    /// Sync orchestrator
    pub sync: Arc<SyncService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        repo: Arc<QuoteRepository>,
        session: Arc<SessionTracker>,
        sync: Arc<SyncService>,
    ) -> Self {
        Self {
            repo,
            session,
            sync,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::quote_routes())
        .merge(api::sync_routes())
        .merge(api::session_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
