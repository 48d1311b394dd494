//! Time-bounded cache of certificate keys, keyed by certificate URL.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::certificate::CertificateKey;

type Entries = Mutex<HashMap<String, CachedKey>>;

struct CachedKey {
    key: Arc<CertificateKey>,
    expires_at: Instant,
    reaper: Option<AbortHandle>,
}

impl Drop for CachedKey {
    fn drop(&mut self) {
        if let Some(reaper) = self.reaper.take() {
            reaper.abort();
        }
    }
}

/// Shared certificate key cache. Clones share the same entries.
///
/// Each entry gets a reaper task that evicts it at expiry. Reapers are
/// aborted when their entry is replaced or removed, and when the last clone
/// of the cache is dropped. Lookups never return an expired entry, even if
/// its reaper has not run yet.
#[derive(Clone, Default)]
pub struct CertificateCache {
    entries: Arc<Entries>,
}

impl CertificateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached key for `url`, if present and not expired.
    pub fn lookup(&self, url: &str) -> Option<Arc<CertificateKey>> {
        let mut entries = self.entries.lock();
        let entry = entries.get(url)?;
        if entry.expires_at > Instant::now() {
            return Some(Arc::clone(&entry.key));
        }

        tracing::debug!(%url, "certificate cache entry expired");
        entries.remove(url);
        None
    }

    /// Cache `key` for `url` for `ttl`, replacing any previous entry.
    pub fn insert(&self, url: &str, key: Arc<CertificateKey>, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            tracing::debug!(%url, ttl_secs = ttl.as_secs(), "certificate TTL out of range, not caching");
            return;
        };
        let reaper = tokio::runtime::Handle::try_current().ok().map(|handle| {
            let task = handle.spawn(reap(
                Arc::downgrade(&self.entries),
                url.to_string(),
                expires_at,
            ));
            task.abort_handle()
        });

        tracing::debug!(%url, ttl_secs = ttl.as_secs(), "caching certificate key");
        self.entries.lock().insert(
            url.to_string(),
            CachedKey {
                key,
                expires_at,
                reaper,
            },
        );
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn reaper(&self, url: &str) -> Option<AbortHandle> {
        self.entries.lock().get(url)?.reaper.clone()
    }
}

async fn reap(entries: Weak<Entries>, url: String, expires_at: Instant) {
    tokio::time::sleep_until(expires_at).await;

    let Some(entries) = entries.upgrade() else {
        return;
    };
    let mut entries = entries.lock();
    // A newer insert for the same URL owns its own reaper.
    if entries.get(&url).is_some_and(|e| e.expires_at == expires_at) {
        tracing::debug!(%url, "evicting expired certificate key");
        if let Some(mut entry) = entries.remove(&url) {
            entry.reaper = None;
        }
    }
}
