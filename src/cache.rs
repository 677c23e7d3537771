use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Bounded memo keyed by normalized query text.
///
/// Entries are evicted oldest-inserted first. Reads use `peek`, so a hit
/// never refreshes an entry's position.
pub struct SuggestionCache<V> {
    entries: LruCache<String, V>,
    generation: Option<u64>,
    hits: u64,
    misses: u64,
}

impl<V> SuggestionCache<V> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            generation: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<&V> {
        match self.entries.peek(key) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, key: String, value: V) {
        let inserted = key.clone();
        if let Some((evicted, _)) = self.entries.push(key, value) {
            if evicted != inserted {
                debug!("suggestion cache evicted {:?}", evicted);
            }
        }
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Drops every entry if they were computed against another vocabulary generation.
    pub fn sync_generation(&mut self, generation: u64) {
        if self.generation != Some(generation) {
            if !self.entries.is_empty() {
                debug!("vocabulary changed, dropping {} cached results", self.entries.len());
            }
            self.entries.clear();
            self.generation = Some(generation);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
