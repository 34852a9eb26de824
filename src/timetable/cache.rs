use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::timetable::types::{ExtractOptions, Extraction};
use crate::utils::hash_utils;

// Shared cache for callers that want memoization across the whole process
static SHARED_CACHE: Lazy<Arc<ParseCache>> = Lazy::new(|| Arc::new(ParseCache::new()));

/// Memo of successful extractions keyed by a hash of options and input text.
///
/// Entries are never evicted. Extraction is a pure function of its input,
/// so a hit always equals a fresh parse.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: Mutex<HashMap<String, Arc<Extraction>>>,
}

impl ParseCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache instance
    pub fn shared() -> Arc<ParseCache> {
        Arc::clone(&SHARED_CACHE)
    }

    /// Cache key for the given options and text
    pub fn key(options: &ExtractOptions, text: &str) -> String {
        let fingerprint = options.fingerprint();
        hash_utils::hash_parts(&[fingerprint.as_str(), text])
    }

    /// Look up a previous extraction
    pub fn get(&self, key: &str) -> Option<Arc<Extraction>> {
        let entries = self.entries.lock().ok()?;
        let hit = entries.get(key).cloned();
        trace!("Cache {} for {}", if hit.is_some() { "hit" } else { "miss" }, key);
        hit
    }

    /// Store an extraction, returning the shared handle
    pub fn insert(&self, key: String, extraction: Extraction) -> Arc<Extraction> {
        let extraction = Arc::new(extraction);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, Arc::clone(&extraction));
            debug!("Cached extraction ({} entries)", entries.len());
        }
        extraction
    }

    /// Number of cached extractions
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached extraction
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
