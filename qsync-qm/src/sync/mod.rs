//! Sync orchestration
//!
//! Two-state machine: Idle and Syncing. A trigger (manual or timer tick)
//! while a sync is in flight is dropped, not queued. Each cycle fully
//! resolves the fetch and decode before touching local state, so a failed
//! cycle leaves the collection untouched; the next periodic tick is the only
//! retry.
//!
//! Conflict policy per cycle:
//! - conflicts detected: remote-wins merge over the whole collections
//! - no conflicts: only new remote entries are appended (set difference)
//! The asymmetry between those two paths is inherited behavior and is kept.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use qsync_common::{time, Quote};

use crate::repository::QuoteRepository;
use crate::services::conflict_detector::{ConflictDetector, QuoteConflict};
use crate::services::quote_mapper::map_remote_posts;
use crate::services::quote_merger::{merge_remote_wins, new_remote_quotes};
use crate::services::remote_client::{QuoteFetcher, RemoteError};

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Sync trigger errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// Trigger arrived while a sync was in flight; the request was dropped
    #[error("Sync already running")]
    AlreadyRunning,

    /// Fetch or decode failed; local state is untouched
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result of one completed sync cycle
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Valid remote quotes after mapping
    pub fetched: usize,
    /// Quotes added to the local collection
    pub added: usize,
    /// Category conflicts detected against local state
    pub conflicts: usize,
    /// The conflicting local/remote pairs, each resolved remote-wins
    pub conflict_pairs: Vec<QuoteConflict>,
    /// Whether the remote-wins merge path ran (vs. append-only)
    pub merged: bool,
    /// Whether the resulting collection reached the persistent store
    pub persisted: bool,
    pub completed_at: DateTime<Utc>,
}

/// Snapshot for the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub state: SyncState,
    pub last_sync_millis: Option<i64>,
    pub last_report: Option<SyncReport>,
}

/// Sync orchestrator: fetch, map, detect conflicts, merge, persist
pub struct SyncService {
    repo: Arc<QuoteRepository>,
    fetcher: Arc<dyn QuoteFetcher>,
    detector: ConflictDetector,
    syncing: AtomicBool,
    last_report: tokio::sync::RwLock<Option<SyncReport>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Resets the in-flight flag when a cycle ends, success or failure
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncService {
    pub fn new(repo: Arc<QuoteRepository>, fetcher: Arc<dyn QuoteFetcher>) -> Self {
        Self {
            repo,
            fetcher,
            detector: ConflictDetector::new(),
            syncing: AtomicBool::new(false),
            last_report: tokio::sync::RwLock::new(None),
            timer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SyncState {
        if self.syncing.load(Ordering::SeqCst) {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    /// Run one sync cycle. Returns `SyncError::AlreadyRunning` when a cycle
    /// is in flight (the trigger is dropped, not queued).
    pub async fn sync_once(&self) -> Result<SyncReport, SyncError> {
        if self.syncing.swap(true, Ordering::SeqCst) {
            debug!("Sync trigger dropped: already running");
            return Err(SyncError::AlreadyRunning);
        }
        let _in_flight = InFlight(&self.syncing);

        let posts = self.fetcher.fetch().await?;
        let remote = map_remote_posts(&posts);
        let report = self.apply_remote(remote).await;

        *self.last_report.write().await = Some(report.clone());
        Ok(report)
    }

    /// Apply an already-fetched remote collection to local state. Only called
    /// from `sync_once`, under the in-flight guard.
    async fn apply_remote(&self, remote: Vec<Quote>) -> SyncReport {
        let local = self.repo.quotes().await;
        let conflicts = self.detector.detect(&local, &remote);

        let (added, merged, persisted) = if !conflicts.is_empty() {
            for conflict in &conflicts {
                debug!(
                    text = %conflict.local.text,
                    local_category = %conflict.local.category,
                    remote_category = %conflict.remote.category,
                    "Resolving category conflict: remote wins"
                );
            }
            let merged_quotes = merge_remote_wins(&local, &remote);
            let added = merged_quotes.len().saturating_sub(local.len());
            let persisted = self.repo.replace_collection(merged_quotes).await;
            (added, true, persisted)
        } else {
            let fresh = new_remote_quotes(&local, &remote);
            let added = fresh.len();
            let persisted = self.repo.append_quotes(fresh).await;
            (added, false, persisted)
        };

        self.repo.set_last_sync_millis(time::now_millis()).await;

        info!(
            fetched = remote.len(),
            added,
            conflicts = conflicts.len(),
            merged,
            "Sync cycle completed"
        );

        SyncReport {
            fetched: remote.len(),
            added,
            conflicts: conflicts.len(),
            conflict_pairs: conflicts,
            merged,
            persisted,
            completed_at: time::now(),
        }
    }

    pub async fn status(&self) -> SyncStatus {
        SyncStatus {
            state: self.state(),
            last_sync_millis: self.repo.last_sync_millis().await,
            last_report: self.last_report.read().await.clone(),
        }
    }

    /// Start the periodic sync task. A previously installed timer is aborted
    /// before the new one is spawned.
    pub fn start_auto_sync(self: &Arc<Self>, interval: Duration) {
        let mut timer = self.timer.lock().expect("sync timer lock poisoned");
        if let Some(handle) = timer.take() {
            handle.abort();
        }

        let service = Arc::clone(self);
        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // tokio fires the first tick immediately; the schedule starts one
            // interval from now
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match service.sync_once().await {
                    Ok(report) => {
                        debug!(added = report.added, "Periodic sync tick completed");
                    }
                    Err(SyncError::AlreadyRunning) => {}
                    Err(e) => {
                        warn!("Periodic sync failed: {}", e);
                    }
                }
            }
        }));

        info!(interval_seconds = interval.as_secs(), "Auto-sync started");
    }

    /// Stop the periodic sync task, if running
    pub fn stop_auto_sync(&self) {
        let mut timer = self.timer.lock().expect("sync timer lock poisoned");
        if let Some(handle) = timer.take() {
            handle.abort();
            info!("Auto-sync stopped");
        }
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}
