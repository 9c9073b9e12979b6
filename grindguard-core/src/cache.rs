//! TTL cache envelope over the injected store. Used for the enrichment
//! metadata, which is refreshed at most once per week.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::Store;

pub const METADATA_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    /// Unix seconds at write time.
    timestamp: i64,
}

/// Read a cached value. Expired or unreadable entries are cleared and yield
/// `None`.
pub fn cache_get<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
    now: DateTime<Utc>,
    ttl: Duration,
) -> Option<T> {
    let json = store.get(key).ok().flatten()?;
    let entry: CacheEntry<T> = match serde_json::from_str(&json) {
        Ok(e) => e,
        Err(_) => {
            let _ = store.remove(key);
            return None;
        }
    };
    if now.timestamp() - entry.timestamp > ttl.num_seconds() {
        let _ = store.remove(key);
        return None;
    }
    Some(entry.data)
}

/// Write a value with the current timestamp. Storage failures are swallowed;
/// a missed cache write only costs a re-fetch.
pub fn cache_put<T: Serialize>(store: &dyn Store, key: &str, data: &T, now: DateTime<Utc>) {
    let entry = CacheEntry {
        data,
        timestamp: now.timestamp(),
    };
    if let Ok(json) = serde_json::to_string(&entry) {
        let _ = store.set(key, &json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn round_trips_within_ttl() {
        let store = MemoryStore::new();
        cache_put(&store, "k", &vec![1u32, 2, 3], now());

        let got: Option<Vec<u32>> = cache_get(&store, "k", now() + Duration::days(6), Duration::days(7));
        assert_eq!(got, Some(vec![1, 2, 3]));
    }

    #[test]
    fn expires_after_ttl_and_clears_the_key() {
        let store = MemoryStore::new();
        cache_put(&store, "k", &"stale".to_string(), now());

        let got: Option<String> = cache_get(&store, "k", now() + Duration::days(8), Duration::days(7));
        assert_eq!(got, None);
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn corrupt_entry_clears_and_misses() {
        let store = MemoryStore::new();
        store.set("k", "not an envelope").unwrap();
        let got: Option<String> = cache_get(&store, "k", now(), Duration::days(7));
        assert_eq!(got, None);
        assert_eq!(store.get("k").unwrap(), None);
    }
}
