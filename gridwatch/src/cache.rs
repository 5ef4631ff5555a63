//! Short-lived memoization of the current snapshot reference.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::trace;

use crate::schedule::{GroupSnapshot, ScheduleStore};

/// Ceiling on the cache window, regardless of refresh interval.
pub const MAX_TTL_SECS: u64 = 60;

struct CacheEntry {
    snapshot: Arc<GroupSnapshot>,
    cached_at: Instant,
}

/// Bounds repeated snapshot lookups within one refresh cycle.
///
/// Fact derivation touches the snapshot many times per render; this cache
/// hands back the same `Arc` for the duration of the TTL window instead of
/// re-reading the store each time. The TTL is `min(60s, refresh_interval
/// / 2)`, so a cached value can never outlive half a refresh cycle.
///
/// An empty store is never cached: a freshly loaded snapshot becomes
/// visible on the next `get` even without an `invalidate` call.
pub struct SnapshotCache {
    store: Arc<ScheduleStore>,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl SnapshotCache {
    /// Creates a cache over `store`, deriving the TTL from the refresh
    /// interval.
    pub fn new(store: Arc<ScheduleStore>, refresh_interval: Duration) -> Self {
        let ttl = (refresh_interval / 2).min(Duration::from_secs(MAX_TTL_SECS));
        Self {
            store,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// The derived cache window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached snapshot, re-read from the store when the window has
    /// elapsed. `None` when no snapshot is loaded at all.
    pub fn get(&self) -> Option<Arc<GroupSnapshot>> {
        let mut guard = self.entry.lock().unwrap();

        if let Some(entry) = guard.as_ref() {
            if entry.cached_at.elapsed() < self.ttl {
                trace!("Snapshot cache hit");
                return Some(Arc::clone(&entry.snapshot));
            }
        }

        match self.store.snapshot() {
            Some(snapshot) => {
                trace!("Snapshot cache refreshed from store");
                *guard = Some(CacheEntry {
                    snapshot: Arc::clone(&snapshot),
                    cached_at: Instant::now(),
                });
                Some(snapshot)
            }
            None => {
                *guard = None;
                None
            }
        }
    }

    /// Forces the next `get` to re-read the store.
    pub fn invalidate(&self) {
        *self.entry.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DaySchedule, DayStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn snapshot(day: u32) -> GroupSnapshot {
        GroupSnapshot::new(
            vec![DaySchedule::new(
                NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
                Some(DayStatus::ScheduleApplies),
                vec![],
            )],
            Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn ttl_is_half_the_interval_capped_at_a_minute() {
        let store = Arc::new(ScheduleStore::new());
        let cache = SnapshotCache::new(Arc::clone(&store), Duration::from_secs(40));
        assert_eq!(cache.ttl(), Duration::from_secs(20));

        let cache = SnapshotCache::new(store, Duration::from_secs(900));
        assert_eq!(cache.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn hits_within_ttl_return_the_same_arc() {
        let store = Arc::new(ScheduleStore::new());
        store.load(snapshot(5));
        let cache = SnapshotCache::new(Arc::clone(&store), Duration::from_secs(900));

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn store_is_reread_after_ttl_elapses() {
        let store = Arc::new(ScheduleStore::new());
        store.load(snapshot(5));
        // 20ms interval → 10ms TTL
        let cache = SnapshotCache::new(Arc::clone(&store), Duration::from_millis(20));

        let first = cache.get().unwrap();
        store.load(snapshot(6));

        // Still within the window: the stale reference is served
        let cached = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        std::thread::sleep(Duration::from_millis(15));
        let fresh = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &fresh));
        assert_eq!(
            fresh.updated_on(),
            Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn invalidate_forces_recompute() {
        let store = Arc::new(ScheduleStore::new());
        store.load(snapshot(5));
        let cache = SnapshotCache::new(Arc::clone(&store), Duration::from_secs(900));

        let first = cache.get().unwrap();
        store.load(snapshot(6));
        cache.invalidate();

        let fresh = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &fresh));
    }

    #[test]
    fn empty_store_is_not_cached() {
        let store = Arc::new(ScheduleStore::new());
        let cache = SnapshotCache::new(Arc::clone(&store), Duration::from_secs(900));

        assert!(cache.get().is_none());

        // A load becomes visible without an invalidate
        store.load(snapshot(5));
        assert!(cache.get().is_some());
    }
}
