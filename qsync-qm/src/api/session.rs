//! Session info endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use qsync_common::Quote;

use crate::AppState;

/// GET /session response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub view_count: u64,
    pub last_viewed: Option<Quote>,
}

/// GET /session
pub async fn session_info(State(state): State<AppState>) -> Json<SessionResponse> {
    let info = state.session.info().await;
    Json(SessionResponse {
        view_count: info.view_count,
        last_viewed: info.last_viewed,
    })
}

/// Build session routes
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/session", get(session_info))
}
