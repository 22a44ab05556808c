//! Quote collection repository
//!
//! Owns the in-memory quote collection and writes it wholesale to the
//! injected [`StateStore`] on every mutation. The in-memory collection stays
//! authoritative for the session when persistence fails; callers get a
//! `persisted` flag and the failure is logged, never propagated as a crash.

use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use qsync_common::quote::default_quotes;
use qsync_common::store::keys;
use qsync_common::{Error, Quote, Result, StateStore};

use crate::services::import_export::{ImportMode, ParsedImport};
use crate::services::quote_merger::new_remote_quotes;

/// Filter value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Outcome of an add operation
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub quote: Quote,
    pub persisted: bool,
}

/// Outcome of an import operation
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Records actually added or (for replace mode) kept
    pub imported: usize,
    /// Valid records skipped as duplicates (merge mode only)
    pub skipped_duplicates: usize,
    /// Records discarded during validation
    pub skipped_invalid: usize,
    /// Collection size after the import
    pub total: usize,
    pub persisted: bool,
}

/// In-memory collection plus persistent store handle
pub struct QuoteRepository {
    store: Arc<dyn StateStore>,
    quotes: RwLock<Vec<Quote>>,
    filter: RwLock<String>,
}

impl QuoteRepository {
    /// Load the collection from the store, falling back to the built-in
    /// default set when nothing is persisted or the persisted copy is
    /// malformed. The last selected filter is restored when it still names an
    /// existing category.
    pub async fn load(store: Arc<dyn StateStore>) -> Self {
        let quotes = match store.get(keys::QUOTES).await {
            Ok(Some(serialized)) => match serde_json::from_str::<Vec<Quote>>(&serialized) {
                Ok(quotes) => quotes,
                Err(e) => {
                    warn!("Malformed persisted quotes ({}), using defaults", e);
                    default_quotes()
                }
            },
            Ok(None) => {
                // First run: persist the defaults
                let defaults = default_quotes();
                if let Ok(serialized) = serde_json::to_string(&defaults) {
                    if let Err(e) = store.set(keys::QUOTES, &serialized).await {
                        warn!("Failed to persist default quotes: {}", e);
                    }
                }
                defaults
            }
            Err(e) => {
                warn!("Failed to load quotes ({}), using defaults", e);
                default_quotes()
            }
        };

        let filter = match store.get(keys::LAST_FILTER).await {
            Ok(Some(saved)) if saved != ALL_CATEGORIES => {
                if quotes.iter().any(|q| q.category == saved) {
                    saved
                } else {
                    ALL_CATEGORIES.to_string()
                }
            }
            Ok(_) => ALL_CATEGORIES.to_string(),
            Err(e) => {
                warn!("Failed to load filter preference: {}", e);
                ALL_CATEGORIES.to_string()
            }
        };

        Self {
            store,
            quotes: RwLock::new(quotes),
            filter: RwLock::new(filter),
        }
    }

    /// Snapshot of the full collection
    pub async fn quotes(&self) -> Vec<Quote> {
        self.quotes.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.quotes.read().await.len()
    }

    /// Sorted, deduplicated category list
    pub async fn categories(&self) -> Vec<String> {
        let quotes = self.quotes.read().await;
        let mut categories: Vec<String> = quotes.iter().map(|q| q.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Currently selected filter category (`all` = no filter)
    pub async fn filter(&self) -> String {
        self.filter.read().await.clone()
    }

    /// Select a filter category and persist the preference (best-effort)
    pub async fn set_filter(&self, category: &str) -> Result<()> {
        let category = category.trim();
        if category.is_empty() {
            return Err(Error::InvalidInput("Filter category is empty".to_string()));
        }

        *self.filter.write().await = category.to_string();

        if let Err(e) = self.store.set(keys::LAST_FILTER, category).await {
            warn!("Failed to save filter preference: {}", e);
        }
        Ok(())
    }

    /// Quotes matching the selected filter
    pub async fn filtered_quotes(&self) -> Vec<Quote> {
        let filter = self.filter.read().await.clone();
        let quotes = self.quotes.read().await;
        if filter == ALL_CATEGORIES {
            quotes.clone()
        } else {
            quotes
                .iter()
                .filter(|q| q.category == filter)
                .cloned()
                .collect()
        }
    }

    /// Uniform random quote from the filtered collection; None when the
    /// filtered set is empty
    pub async fn random_quote(&self) -> Option<Quote> {
        self.random_quote_in(None).await
    }

    /// Random quote constrained to a one-off category instead of the
    /// persisted filter (`all` or None = persisted filter behavior)
    pub async fn random_quote_in(&self, category: Option<&str>) -> Option<Quote> {
        let pool = match category {
            Some(cat) if cat == ALL_CATEGORIES => self.quotes().await,
            Some(cat) => {
                let quotes = self.quotes.read().await;
                quotes
                    .iter()
                    .filter(|q| q.category == cat)
                    .cloned()
                    .collect()
            }
            None => self.filtered_quotes().await,
        };
        let mut rng = rand::thread_rng();
        pool.choose(&mut rng).cloned()
    }

    /// Add a new quote; rejects blank fields and case-insensitive duplicate
    /// text
    pub async fn add(&self, text: &str, category: &str) -> Result<AddOutcome> {
        let quote = Quote::new(text.trim(), category.trim());
        if !quote.is_valid() {
            return Err(Error::InvalidInput(
                "Both quote text and category are required".to_string(),
            ));
        }

        {
            let mut quotes = self.quotes.write().await;
            let key = quote.normalized_key();
            if quotes.iter().any(|q| q.normalized_key() == key) {
                return Err(Error::InvalidInput(
                    "This quote already exists".to_string(),
                ));
            }
            quotes.push(quote.clone());
        }

        let persisted = self.persist().await;
        Ok(AddOutcome { quote, persisted })
    }

    /// Apply a validated import in the given mode
    pub async fn import(&self, parsed: ParsedImport, mode: ImportMode) -> ImportOutcome {
        let valid = parsed.quotes.len();
        let (imported, skipped_duplicates, total) = {
            let mut quotes = self.quotes.write().await;
            match mode {
                ImportMode::Replace => {
                    *quotes = parsed.quotes;
                    (quotes.len(), 0, quotes.len())
                }
                ImportMode::Merge => {
                    let fresh = new_remote_quotes(&quotes, &parsed.quotes);
                    let added = fresh.len();
                    quotes.extend(fresh);
                    (added, valid - added, quotes.len())
                }
            }
        };

        let persisted = self.persist().await;
        ImportOutcome {
            imported,
            skipped_duplicates,
            skipped_invalid: parsed.skipped_invalid,
            total,
            persisted,
        }
    }

    /// Replace the whole collection (sync merge path)
    pub async fn replace_collection(&self, quotes: Vec<Quote>) -> bool {
        *self.quotes.write().await = quotes;
        self.persist().await
    }

    /// Append quotes to the collection (sync append path)
    pub async fn append_quotes(&self, fresh: Vec<Quote>) -> bool {
        if fresh.is_empty() {
            return true;
        }
        self.quotes.write().await.extend(fresh);
        self.persist().await
    }

    /// Reset to the built-in defaults: drop persisted state, restore the
    /// default collection and clear the filter
    pub async fn clear(&self) -> bool {
        if let Err(e) = self.store.remove(keys::QUOTES).await {
            warn!("Failed to remove persisted quotes: {}", e);
        }
        if let Err(e) = self.store.remove(keys::LAST_SYNC).await {
            warn!("Failed to remove last sync timestamp: {}", e);
        }

        *self.quotes.write().await = default_quotes();
        *self.filter.write().await = ALL_CATEGORIES.to_string();
        if let Err(e) = self.store.set(keys::LAST_FILTER, ALL_CATEGORIES).await {
            warn!("Failed to reset filter preference: {}", e);
        }

        self.persist().await
    }

    /// Last successful sync timestamp (unix ms), if any
    pub async fn last_sync_millis(&self) -> Option<i64> {
        match self.store.get(keys::LAST_SYNC).await {
            Ok(Some(value)) => value.trim().parse::<i64>().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to load last sync timestamp: {}", e);
                None
            }
        }
    }

    /// Record a successful sync (best-effort)
    pub async fn set_last_sync_millis(&self, millis: i64) {
        if let Err(e) = self.store.set(keys::LAST_SYNC, &millis.to_string()).await {
            warn!("Failed to save last sync timestamp: {}", e);
        }
    }

    /// Serialize the collection to the store; on failure the in-memory copy
    /// stays ahead of the persisted one until the next successful save
    async fn persist(&self) -> bool {
        let serialized = {
            let quotes = self.quotes.read().await;
            match serde_json::to_string(&*quotes) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to serialize quotes: {}", e);
                    return false;
                }
            }
        };

        match self.store.set(keys::QUOTES, &serialized).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save quotes: {}", e);
                false
            }
        }
    }
}
