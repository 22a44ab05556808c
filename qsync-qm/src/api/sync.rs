//! Sync API handlers
//!
//! POST /sync triggers a cycle; a trigger while a cycle is in flight returns
//! 409 Conflict (the request is dropped, matching the orchestrator guard).

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::sync::{SyncError, SyncReport, SyncStatus};
use crate::AppState;

/// POST /sync
pub async fn trigger_sync(State(state): State<AppState>) -> ApiResult<Json<SyncReport>> {
    match state.sync.sync_once().await {
        Ok(report) => Ok(Json(report)),
        Err(SyncError::AlreadyRunning) => {
            Err(ApiError::Conflict("Sync already running".to_string()))
        }
        Err(e) => {
            tracing::warn!("Manual sync failed: {}", e);
            Err(ApiError::Internal(format!("Sync failed: {}", e)))
        }
    }
}

/// GET /sync/status
pub async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.sync.status().await)
}

/// Build sync routes
pub fn sync_routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(trigger_sync))
        .route("/sync/status", get(sync_status))
}
