//! Conflict detection between local and remote quote collections
//!
//! A conflict is a local/remote pair with equal normalized (lower-cased) text
//! but differing category. Pure aggregation logic, no side effects.

use serde::Serialize;
use std::collections::HashMap;

use qsync_common::Quote;

/// A local/remote pair disagreeing on category for the same text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteConflict {
    pub local: Quote,
    pub remote: Quote,
}

/// Conflict detector over quote collections
#[derive(Debug, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect category conflicts between the local and remote collections
    ///
    /// Builds a normalized-text lookup over the local collection, then emits
    /// one conflict pair for each remote quote whose text matches a local
    /// quote while its category differs. Result may be empty.
    pub fn detect(&self, local: &[Quote], remote: &[Quote]) -> Vec<QuoteConflict> {
        let by_key: HashMap<String, &Quote> = local
            .iter()
            .map(|q| (q.normalized_key(), q))
            .collect();

        let conflicts: Vec<QuoteConflict> = remote
            .iter()
            .filter_map(|remote_quote| {
                let local_quote = by_key.get(&remote_quote.normalized_key())?;
                if local_quote.category != remote_quote.category {
                    Some(QuoteConflict {
                        local: (*local_quote).clone(),
                        remote: remote_quote.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();

        if !conflicts.is_empty() {
            tracing::info!(
                conflicts = conflicts.len(),
                "Detected category conflicts against remote collection"
            );
        }

        conflicts
    }
}
