//! Injected key-value storage capability.
//!
//! The attendance engine, manual toggles, pressure notifier, and caches all
//! persist through this trait instead of touching ambient storage, so every
//! engine is testable against `MemoryStore`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::slug::normalize_slug;

/// Well-known store keys.
pub mod keys {
    pub const ATTENDANCE_LOG: &str = "attendance_log";
    pub const MANUAL_SOLVED: &str = "manual_solved";
    pub const DEADLINE_TIME: &str = "deadline_time";
    pub const LAST_NOTIFICATION_DATE: &str = "last_notification_date";
    pub const METADATA_CACHE: &str = "metadata_cache";
    pub const SOLVED_SNAPSHOT: &str = "solved_snapshot";
    pub const CALENDAR_SNAPSHOT: &str = "calendar_snapshot";
}

/// Minimal get/set/remove by string key. Values are serialized JSON strings;
/// callers own the encoding.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read the manually-toggled solved set: normalized slug mapped to the Unix
/// seconds of the toggle. Storage trouble degrades to empty.
pub fn manual_solved(store: &dyn Store) -> BTreeMap<String, i64> {
    match store.get(keys::MANUAL_SOLVED) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
        _ => BTreeMap::new(),
    }
}

/// Flip a slug in the manual-solved set: add when absent (stamped with the
/// toggle instant, so the solve counts as attendance that day), remove when
/// present (the explicit untoggle path). Returns the updated set.
pub fn toggle_manual(store: &dyn Store, slug: &str, now: DateTime<Utc>) -> BTreeMap<String, i64> {
    let slug = normalize_slug(slug);
    let mut current = manual_solved(store);
    if current.remove(&slug).is_none() {
        current.insert(slug, now.timestamp());
    }
    if let Ok(json) = serde_json::to_string(&current) {
        let _ = store.set(keys::MANUAL_SOLVED, &json);
    }
    current
}
