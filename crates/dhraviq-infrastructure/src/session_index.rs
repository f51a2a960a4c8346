//! In-memory ordering of sessions by last access.

use std::collections::{BTreeSet, HashMap};

/// Ordered view of `(last_accessed, id)` for every stored session.
///
/// Kept in step with the session collection by the store, so the most recent
/// session and the sessions older than a cutoff are found without a scan.
#[derive(Debug, Default)]
pub struct SessionIndex {
    by_access: BTreeSet<(i64, String)>,
    by_id: HashMap<String, i64>,
}

impl SessionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Inserts or moves `id` to `last_accessed`.
    pub fn upsert(&mut self, id: &str, last_accessed: i64) {
        if let Some(previous) = self.by_id.insert(id.to_string(), last_accessed) {
            self.by_access.remove(&(previous, id.to_string()));
        }
        self.by_access.insert((last_accessed, id.to_string()));
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.by_id.remove(id) {
            Some(previous) => {
                self.by_access.remove(&(previous, id.to_string()));
                true
            }
            None => false,
        }
    }

    /// Id with the greatest `last_accessed`; ties go to the greatest id.
    pub fn latest(&self) -> Option<&str> {
        self.by_access.iter().next_back().map(|(_, id)| id.as_str())
    }

    /// Ids whose `last_accessed` is strictly below `cutoff`, oldest first.
    pub fn older_than(&self, cutoff: i64) -> Vec<String> {
        self.by_access
            .range(..(cutoff, String::new()))
            .map(|(_, id)| id.clone())
            .collect()
    }
}
