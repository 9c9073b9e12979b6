//! Attendance engine: reconcile solved events + the remote submission
//! calendar into a single day-level history, then derive streaks.
//!
//! Source-of-truth arbitration: when the remote calendar is present and
//! non-empty it is authoritative — the stored history is replaced by
//! union(calendar days, event days), purging any previously-corrupted local
//! log. Without a calendar the merge is strictly additive; a reconcile never
//! shrinks the stored history in that path.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::problem::SolvedEvent;
use crate::store::{keys, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodayStatus {
    Present,
    Absent,
}

/// Derived streak stats. `history` and `recent_activity` carry the raw
/// day-strings for heatmap-style consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub today_status: TodayStatus,
    pub last_practiced: Option<NaiveDate>,
    /// Trailing 30 day-strings, ascending.
    pub recent_activity: Vec<String>,
    /// Full sorted history, ascending.
    pub history: Vec<String>,
}

fn day_string(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Load the persisted history. Read failures and corrupt payloads degrade to
/// an empty history rather than aborting the reconcile.
pub fn load_history(store: &dyn Store) -> BTreeSet<String> {
    match store.get(keys::ATTENDANCE_LOG) {
        Ok(Some(json)) => serde_json::from_str::<Vec<String>>(&json)
            .map(|v| v.into_iter().collect())
            .unwrap_or_default(),
        _ => BTreeSet::new(),
    }
}

fn save_history(store: &dyn Store, history: &BTreeSet<String>) {
    let days: Vec<&String> = history.iter().collect();
    if let Ok(json) = serde_json::to_string(&days) {
        // Write failures degrade to an unsaved-but-correct computation.
        let _ = store.set(keys::ATTENDANCE_LOG, &json);
    }
}

/// Day strings derived from solved events, UTC. Events without a resolvable
/// instant are skipped.
fn event_days(events: &[SolvedEvent]) -> BTreeSet<String> {
    events
        .iter()
        .filter_map(|e| e.time.as_ref())
        .map(|t| day_string(t.day_utc()))
        .collect()
}

/// Day strings from the remote submission calendar. Keys are Unix seconds as
/// strings; unparseable keys are skipped.
fn calendar_days(calendar: &BTreeMap<String, u64>) -> BTreeSet<String> {
    calendar
        .keys()
        .filter_map(|k| k.trim().parse::<i64>().ok())
        .filter_map(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| day_string(dt.date_naive()))
        .collect()
}

/// Reconcile local history with fresh solved events and (when available) the
/// authoritative remote calendar, persist the result, and derive streaks.
pub fn reconcile_attendance(
    store: &dyn Store,
    events: &[SolvedEvent],
    remote_calendar: Option<&BTreeMap<String, u64>>,
    now: DateTime<Utc>,
    tz: Tz,
) -> AttendanceStats {
    let mut history = load_history(store);
    let solved_days = event_days(events);

    let remote_days = remote_calendar
        .filter(|c| !c.is_empty())
        .map(calendar_days)
        .unwrap_or_default();

    if !remote_days.is_empty() {
        // Remote calendar wins. Replace the stored log outright, merged with
        // this session's solves so a just-finished problem counts before the
        // next remote refresh catches up.
        let mut clean: BTreeSet<String> = remote_days;
        clean.extend(solved_days);
        save_history(store, &clean);
        history = clean;
    } else {
        // Offline / calendar unavailable: additive merge only.
        let before = history.len();
        history.extend(solved_days);
        if history.len() != before {
            save_history(store, &history);
        }
    }

    derive_stats(&history, now, tz)
}

/// Streak math over a reconciled history. Split out so stats can be derived
/// from a snapshot without another store round-trip.
pub fn derive_stats(history: &BTreeSet<String>, now: DateTime<Utc>, tz: Tz) -> AttendanceStats {
    let today_local = now.with_timezone(&tz).date_naive();
    let today_utc = now.date_naive();

    // Generous two-timezone check: a solve logged under either notion of
    // "today" keeps the day present.
    let present = history.contains(&day_string(today_local)) || history.contains(&day_string(today_utc));
    let today_status = if present {
        TodayStatus::Present
    } else {
        TodayStatus::Absent
    };

    // Current streak: anchor at today (local); fall back to yesterday; then
    // walk backward one day at a time until the first gap.
    let mut current_streak = 0u32;
    let mut cursor = today_local;
    if history.contains(&day_string(cursor)) {
        current_streak = 1;
    } else if let Some(yesterday) = cursor.pred_opt() {
        if history.contains(&day_string(yesterday)) {
            current_streak = 1;
            cursor = yesterday;
        }
    }
    if current_streak > 0 {
        while let Some(prev) = cursor.pred_opt() {
            if !history.contains(&day_string(prev)) {
                break;
            }
            current_streak += 1;
            cursor = prev;
        }
    }

    // Longest streak: single pass over the sorted history.
    let days: Vec<NaiveDate> = history
        .iter()
        .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .collect();
    let mut longest_streak = 0u32;
    let mut run = 0u32;
    for (i, day) in days.iter().enumerate() {
        if i > 0 && (*day - days[i - 1]).num_days() == 1 {
            run += 1;
        } else {
            run = 1;
        }
        longest_streak = longest_streak.max(run);
    }
    // The current run may span "today" which the sorted scan already covers,
    // but a fresh walk can still exceed it when local/UTC days disagree.
    longest_streak = longest_streak.max(current_streak);

    let last_practiced = days.last().copied();
    let history_vec: Vec<String> = history.iter().cloned().collect();
    let recent_start = history_vec.len().saturating_sub(30);

    AttendanceStats {
        current_streak,
        longest_streak,
        today_status,
        last_practiced,
        recent_activity: history_vec[recent_start..].to_vec(),
        history: history_vec,
    }
}
