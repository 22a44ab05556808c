//! Quote collection merging ("remote wins")
//!
//! Merge strategy: union keyed by normalized text, seeded with local entries
//! in order; remote entries overwrite an overlapping key in place and append
//! otherwise. Local-only entries are preserved. The operation is a
//! deterministic key-overwrite, hence idempotent.

use std::collections::{HashMap, HashSet};

use qsync_common::Quote;

/// Merge local and remote collections with the remote-wins policy
///
/// Output order: local entries first (in local order), then remote-only
/// entries (in remote order). An overlapping key keeps its local position but
/// carries the remote value.
pub fn merge_remote_wins(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    let mut merged: Vec<Quote> = Vec::with_capacity(local.len() + remote.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    // Local entries seed the map, remote entries follow; a repeated key
    // overwrites in place, matching map-insertion semantics
    for quote in local.iter().chain(remote.iter()) {
        let key = quote.normalized_key();
        match index.get(&key) {
            Some(&i) => merged[i] = quote.clone(),
            None => {
                index.insert(key, merged.len());
                merged.push(quote.clone());
            }
        }
    }

    merged
}

/// Remote entries whose normalized text does not occur locally, in remote
/// order (the no-conflict append path)
pub fn new_remote_quotes(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    let mut seen: HashSet<String> = local.iter().map(|q| q.normalized_key()).collect();

    remote
        .iter()
        .filter(|q| seen.insert(q.normalized_key()))
        .cloned()
        .collect()
}
