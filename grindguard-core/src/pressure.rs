//! Pressure notifier policy: at most one nag per calendar day, and only once
//! the configured deadline has passed without a solve.
//!
//! Delivery is the caller's job; this module only decides whether a message
//! fires and records that it did.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::attendance::TodayStatus;
use crate::rng::SeededRng;
use crate::store::{keys, Store};

pub const DEFAULT_DEADLINE: &str = "20:00";

const PRESSURE_MESSAGES: &[&str] = &[
    "You are disappointing your future self.",
    "Another day, another excuse? Grind now.",
    "Mediocrity is a choice you are making right now.",
    "Your competition is coding. You are not.",
    "Do you want to stay average forever?",
    "Comfort is the enemy of growth. Get up.",
    "Zero progress today. Zero respect earned.",
    "Tick tock. Your dreams are fading.",
];

/// Configured "HH:MM" deadline, defaulting to 20:00 local.
pub fn deadline(store: &dyn Store) -> String {
    match store.get(keys::DEADLINE_TIME) {
        Ok(Some(t)) if !t.trim().is_empty() => t,
        _ => DEFAULT_DEADLINE.to_string(),
    }
}

pub fn set_deadline(store: &dyn Store, time: &str) -> anyhow::Result<()> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| anyhow::anyhow!("deadline must be HH:MM, got '{time}'"))?;
    store.set(keys::DEADLINE_TIME, time)
}

/// Decide whether a pressure message fires right now. Fires at most once per
/// calendar day, only when today is still absent and the deadline is past.
/// Records the send before returning the message.
pub fn check_pressure(
    store: &dyn Store,
    today_status: TodayStatus,
    now_local: NaiveDateTime,
) -> Option<String> {
    if today_status == TodayStatus::Present {
        return None;
    }

    let today = now_local.date().format("%Y-%m-%d").to_string();
    if let Ok(Some(last_sent)) = store.get(keys::LAST_NOTIFICATION_DATE) {
        if last_sent == today {
            return None;
        }
    }

    let deadline_str = deadline(store);
    let deadline_time = NaiveTime::parse_from_str(&deadline_str, "%H:%M")
        .unwrap_or_else(|_| NaiveTime::from_hms_opt(20, 0, 0).unwrap());
    let now_time = now_local.time();
    let past_deadline = now_time.hour() > deadline_time.hour()
        || (now_time.hour() == deadline_time.hour()
            && now_time.minute() >= deadline_time.minute());
    if !past_deadline {
        return None;
    }

    // Day-seeded pick keeps repeated checks the same day consistent (only the
    // first one fires anyway).
    let mut rng = SeededRng::new(&format!("{today}:pressure"));
    let msg = PRESSURE_MESSAGES[rng.pick_index(PRESSURE_MESSAGES.len())];

    let _ = store.set(keys::LAST_NOTIFICATION_DATE, &today);
    Some(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn present_day_never_fires() {
        let store = MemoryStore::new();
        assert_eq!(check_pressure(&store, TodayStatus::Present, at(23, 0)), None);
    }

    #[test]
    fn before_deadline_never_fires() {
        let store = MemoryStore::new();
        assert_eq!(check_pressure(&store, TodayStatus::Absent, at(19, 59)), None);
    }

    #[test]
    fn fires_once_past_deadline() {
        let store = MemoryStore::new();
        let first = check_pressure(&store, TodayStatus::Absent, at(20, 0));
        assert!(first.is_some());

        // Re-checks the same day are no-ops, no matter how often they run.
        for m in [1, 15, 59] {
            assert_eq!(check_pressure(&store, TodayStatus::Absent, at(20, m)), None);
        }
    }

    #[test]
    fn fires_again_on_a_new_day() {
        let store = MemoryStore::new();
        assert!(check_pressure(&store, TodayStatus::Absent, at(21, 0)).is_some());

        let next_day = NaiveDate::from_ymd_opt(2026, 1, 19)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        assert!(check_pressure(&store, TodayStatus::Absent, next_day).is_some());
    }

    #[test]
    fn custom_deadline_is_respected() {
        let store = MemoryStore::new();
        set_deadline(&store, "08:30").unwrap();
        assert_eq!(check_pressure(&store, TodayStatus::Absent, at(8, 29)), None);
        assert!(check_pressure(&store, TodayStatus::Absent, at(8, 30)).is_some());
    }

    #[test]
    fn bad_deadline_input_is_rejected() {
        let store = MemoryStore::new();
        assert!(set_deadline(&store, "25:99").is_err());
        assert!(set_deadline(&store, "soon").is_err());
        assert_eq!(deadline(&store), DEFAULT_DEADLINE);
    }
}
