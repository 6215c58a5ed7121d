//! Cache module for CMS responses
//!
//! Successful responses from the content API are kept for a fixed
//! revalidation window, keyed by request URL. Once an entry is older than
//! the window it is treated as missing and the next caller refetches it.
//! Expired entries are purged on every insert and the number of live
//! entries is capped, so distinct URLs cannot grow the cache without bound.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Most entries a cache holds at once
pub const MAX_ENTRIES: usize = 1024;

/// A cached value and the moment it was stored
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// Time-bounded cache keyed by request URL
#[derive(Debug)]
pub struct ResponseCache<T> {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> ResponseCache<T> {
    /// Create a cache whose entries expire after `ttl` (zero disables caching)
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_ENTRIES)
    }

    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Whether this cache stores anything at all
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Look up a fresh entry
    pub fn get(&self, key: &str) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }

        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                tracing::debug!("Cache expired: {}", key);
                None
            }
            None => None,
        }
    }

    /// Store a value under `key`
    ///
    /// Expired entries are dropped first. When the cache is still full, the
    /// oldest entry makes room.
    pub fn insert(&self, key: impl Into<String>, value: T) {
        if !self.is_enabled() {
            return;
        }

        let key = key.into();
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);

            if entries.len() >= self.capacity && !entries.contains_key(&key) {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.stored_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    tracing::debug!("Cache full, evicting {}", oldest);
                    entries.remove(&oldest);
                }
            }

            entries.insert(
                key,
                CacheEntry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
