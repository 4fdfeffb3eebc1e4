use crate::live::traits::LiveSource;
use crate::model::{Listing, ScraperError};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry {
    listings: Vec<Listing>,
    fetched_at: DateTime<Utc>,
}

/// Memoises non-empty live results per query for a fixed time-to-live.
pub struct CachedLiveSource<S> {
    inner: S,
    ttl: TimeDelta,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<S: LiveSource> CachedLiveSource<S> {
    pub fn new(inner: S, ttl_seconds: u64) -> Self {
        Self {
            inner,
            ttl: ttl_from_seconds(ttl_seconds),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn key(query: &str, max_per_platform: usize) -> String {
        format!("{}|{}", query.trim().to_lowercase(), max_per_platform)
    }

    pub async fn cached_queries(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Oversized TTLs saturate instead of overflowing.
fn ttl_from_seconds(seconds: u64) -> TimeDelta {
    i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

#[async_trait::async_trait]
impl<S: LiveSource> LiveSource for CachedLiveSource<S> {
    async fn search_all(&self, query: &str, max_per_platform: usize) -> Result<Vec<Listing>, ScraperError> {
        let key = Self::key(query, max_per_platform);
        let now = Utc::now();

        {
            let mut entries = self.entries.lock().await;
            if let Some(entry) = entries.get(&key) {
                if now - entry.fetched_at < self.ttl {
                    debug!("Live cache hit for '{}'", query);
                    return Ok(entry.listings.clone());
                }
                entries.remove(&key);
            }
        }

        let listings = self.inner.search_all(query, max_per_platform).await?;
        if !listings.is_empty() {
            let mut entries = self.entries.lock().await;
            entries.retain(|_, entry| now - entry.fetched_at < self.ttl);
            entries.insert(
                key,
                CacheEntry {
                    listings: listings.clone(),
                    fetched_at: now,
                },
            );
        }
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLive {
        calls: AtomicUsize,
        listings: Vec<Listing>,
    }

    #[async_trait::async_trait]
    impl LiveSource for CountingLive {
        async fn search_all(&self, _query: &str, _max: usize) -> Result<Vec<Listing>, ScraperError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.listings.clone())
        }
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let inner = CountingLive {
            calls: AtomicUsize::new(0),
            listings: vec![Listing::new("Sony WH-1000XM5", 29990.0, "Amazon")],
        };
        let cached = CachedLiveSource::new(inner, 3600);

        let first = cached.search_all("Sony headphones", 10).await.unwrap();
        let second = cached.search_all("  sony HEADPHONES ", 10).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.cached_queries().await, 1);
    }

    #[tokio::test]
    async fn expired_entries_are_pruned_on_insert() {
        let cached = CachedLiveSource::new(
            CountingLive {
                calls: AtomicUsize::new(0),
                listings: vec![Listing::new("Amul Milk 1L", 54.0, "Amazon")],
            },
            60,
        );
        cached.entries.lock().await.insert(
            "bread|10".into(),
            CacheEntry {
                listings: vec![Listing::new("Bread", 40.0, "Amazon")],
                fetched_at: Utc::now() - TimeDelta::hours(2),
            },
        );

        cached.search_all("milk", 10).await.unwrap();

        let entries = cached.entries.lock().await;
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("milk|10"));
    }

    #[tokio::test]
    async fn huge_ttl_saturates() {
        assert_eq!(ttl_from_seconds(u64::MAX), TimeDelta::MAX);
        assert_eq!(ttl_from_seconds(90), TimeDelta::seconds(90));

        let cached = CachedLiveSource::new(
            CountingLive {
                calls: AtomicUsize::new(0),
                listings: vec![Listing::new("Bread", 40.0, "Amazon")],
            },
            u64::MAX,
        );
        cached.search_all("bread", 10).await.unwrap();
        cached.search_all("bread", 10).await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_results_and_zero_ttl_are_not_reused() {
        let empty = CachedLiveSource::new(
            CountingLive {
                calls: AtomicUsize::new(0),
                listings: Vec::new(),
            },
            3600,
        );
        empty.search_all("bread", 10).await.unwrap();
        empty.search_all("bread", 10).await.unwrap();
        assert_eq!(empty.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(empty.cached_queries().await, 0);

        let no_ttl = CachedLiveSource::new(
            CountingLive {
                calls: AtomicUsize::new(0),
                listings: vec![Listing::new("Bread", 40.0, "Amazon")],
            },
            0,
        );
        no_ttl.search_all("bread", 10).await.unwrap();
        no_ttl.search_all("bread", 10).await.unwrap();
        assert_eq!(no_ttl.inner.calls.load(Ordering::SeqCst), 2);
    }
}
