//! grindguard-core: engines for the coding-practice tracker.
//!
//! Merges the curated problem sheet with the user's solved history (remote
//! fetches + manual toggles) into progress stats, a reconciled attendance
//! streak, and a deterministic-per-day recommended mission. All engines are
//! pure functions of their inputs plus the injected [`Store`]; only the
//! attendance engine and the pressure notifier write to it.

pub mod attendance;
pub mod cache;
pub mod error;
pub mod mission;
pub mod pressure;
pub mod problem;
pub mod progress;
pub mod rng;
pub mod slug;
pub mod store;

pub use attendance::{derive_stats, load_history, reconcile_attendance, AttendanceStats, TodayStatus};
pub use cache::{cache_get, cache_put, METADATA_TTL_DAYS};
pub use error::{AppError, ErrorKind};
pub use mission::{daily_mission, DailyMission, MissionType};
pub use pressure::{check_pressure, deadline, set_deadline, DEFAULT_DEADLINE};
pub use problem::{Difficulty, EventTime, Problem, ProblemMeta, SolvedEvent, SolvedSource};
pub use progress::{compute_progress, MatchedProblem, ProgressStats, TopicCount};
pub use rng::SeededRng;
pub use slug::{normalize_problem_name, normalize_slug};
pub use store::{manual_solved, toggle_manual, MemoryStore, Store};
