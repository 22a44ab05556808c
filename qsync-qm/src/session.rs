//! Ephemeral session tracking
//!
//! Tracks the last viewed quote and a view counter in a session-scoped store.
//! The state lives only for the process lifetime and is dropped wholesale on
//! clear.

use std::sync::Arc;
use tracing::warn;

use qsync_common::store::keys;
use qsync_common::{Quote, StateStore};

/// Session view state snapshot
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    pub view_count: u64,
    pub last_viewed: Option<Quote>,
}

/// Session-scoped view tracker over an ephemeral store
pub struct SessionTracker {
    store: Arc<dyn StateStore>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Record a quote view: store it as last viewed and bump the counter.
    /// Store failures are logged and swallowed; view tracking is best-effort.
    pub async fn record_view(&self, quote: &Quote) {
        match serde_json::to_string(quote) {
            Ok(serialized) => {
                if let Err(e) = self.store.set(keys::LAST_VIEWED, &serialized).await {
                    warn!("Session store error: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to serialize last viewed quote: {}", e);
                return;
            }
        }

        let count = self.view_count().await + 1;
        if let Err(e) = self.store.set(keys::VIEW_COUNT, &count.to_string()).await {
            warn!("Session store error: {}", e);
        }
    }

    pub async fn view_count(&self) -> u64 {
        match self.store.get(keys::VIEW_COUNT).await {
            Ok(Some(value)) => value.trim().parse::<u64>().unwrap_or(0),
            _ => 0,
        }
    }

    pub async fn last_viewed(&self) -> Option<Quote> {
        match self.store.get(keys::LAST_VIEWED).await {
            Ok(Some(serialized)) => serde_json::from_str(&serialized).ok(),
            _ => None,
        }
    }

    pub async fn info(&self) -> SessionInfo {
        SessionInfo {
            view_count: self.view_count().await,
            last_viewed: self.last_viewed().await,
        }
    }

    /// Drop all session state
    pub async fn clear(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("Failed to clear session store: {}", e);
        }
    }
}
