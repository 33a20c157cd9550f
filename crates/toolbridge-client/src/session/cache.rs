//! Shared protocol-session cache.
//!
//! Maps a cache key (see [`derive_cache_key`](super::derive_cache_key)) to the
//! session id a server issued for it. Entries live for [`SESSION_TTL`] and
//! expire lazily: an expired entry is removed by the `get` that finds it.
//! There is no sweeper task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::clock::{Clock, SystemClock};

/// How long a cached session id stays valid.
pub const SESSION_TTL: Duration = Duration::from_secs(1800);

static GLOBAL: LazyLock<Arc<SessionCache>> = LazyLock::new(|| Arc::new(SessionCache::new()));

/// A cached session id and when it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSession {
    /// Server-issued session id
    pub session_id: String,
    /// Instant the entry was written
    pub created_at: Instant,
}

impl CachedSession {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCacheStats {
    /// Lookups that returned a live session
    pub hits: u64,
    /// Lookups that returned nothing (including expired entries)
    pub misses: u64,
    /// Entries dropped because they outlived the TTL
    pub expirations: u64,
    /// Entries removed by [`SessionCache::invalidate`]
    pub invalidations: u64,
    /// Current entry count
    pub current_entries: usize,
}

/// Thread-safe session cache with expiry on read.
#[derive(Debug)]
pub struct SessionCache {
    entries: RwLock<HashMap<String, CachedSession>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    invalidations: AtomicU64,
}

impl SessionCache {
    /// Create an empty cache on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            ttl: SESSION_TTL,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Override the entry lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The process-wide cache shared by every client that is not given its own.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live session id, removing the entry if it has expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.entries.write();

        if let Some(entry) = entries.get(key) {
            if entry.is_expired(now, self.ttl) {
                entries.remove(key);
                self.expirations.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }

            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(entry.session_id.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a session id stamped with the current time, replacing any prior entry.
    pub fn put(&self, key: impl Into<String>, session_id: impl Into<String>) {
        let entry = CachedSession {
            session_id: session_id.into(),
            created_at: self.clock.now(),
        };
        self.entries.write().insert(key.into(), entry);
    }

    /// Remove an entry unconditionally. Returns whether one was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.write().remove(key).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> SessionCacheStats {
        SessionCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            current_entries: self.entries.read().len(),
        }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new()
    }
}
