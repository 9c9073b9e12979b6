use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use grindguard_core::store::keys;
use grindguard_core::{
    check_pressure, compute_progress, daily_mission, manual_solved, reconcile_attendance,
    toggle_manual, AttendanceStats, EventTime, MissionType, Problem, SolvedEvent, SolvedSource,
    Store, TodayStatus,
};
use grindguard_ingest::{apply_metadata, parse_metadata_file, parse_sheet_file};

mod config;
mod judge;
mod state;

use config::{load_config, save_config, Config};
use judge::JudgeClient;
use state::FileStore;

#[derive(Parser, Debug)]
#[command(name = "grindguard", version, about = "Coding-practice tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch solved history + submission calendar, reconcile, print a summary
    Sync {
        /// Judge username (defaults to config)
        #[arg(long)]
        username: Option<String>,

        /// Curated sheet CSV (defaults to config)
        #[arg(long)]
        sheet: Option<PathBuf>,

        /// Enrichment metadata CSV (optional)
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Progress + streaks from the stored snapshot (offline)
    Status {
        #[arg(long)]
        sheet: Option<PathBuf>,
    },

    /// Print today's recommended mission
    Mission {
        #[arg(long)]
        sheet: Option<PathBuf>,
    },

    /// Toggle a problem's manual solved state (slug or URL)
    Toggle { slug: String },

    /// Set the pressure-reminder deadline (HH:MM, local)
    Deadline { time: String },

    /// Run the pressure check; prints the reminder when it fires
    Remind,

    /// Wipe attendance history, manual toggles, and snapshots
    Wipe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    let store = FileStore::open()?;

    match cli.command {
        Command::Sync {
            username,
            sheet,
            metadata,
        } => {
            sync(&store, &cfg, username, sheet, metadata).await?;
        }

        Command::Status { sheet } => {
            let problems = load_sheet(&cfg, sheet)?;
            let events = merged_events(&store);
            let calendar = stored_calendar(&store);
            let attendance =
                reconcile_attendance(&store, &events, calendar.as_ref(), Utc::now(), cfg.tz());
            print_summary(&problems, &events, &attendance);
        }

        Command::Mission { sheet } => {
            let problems = load_sheet(&cfg, sheet)?;
            let events = merged_events(&store);
            match daily_mission(&problems, &events, Utc::now(), cfg.tz()) {
                Some(mission) => {
                    let label = match mission.mission_type {
                        MissionType::Weakness => "WEAKNESS",
                        MissionType::Review => "REVIEW",
                        MissionType::Challenge => "CHALLENGE",
                    };
                    println!("[{label}] {}", mission.title);
                    println!("{}\n", mission.description);
                    for p in &mission.problems {
                        println!("  - {} ({:?})  {}", p.name, p.difficulty, p.link);
                    }
                }
                None => println!("Nothing to recommend today. Sheet complete, backlog fresh."),
            }
        }

        Command::Toggle { slug } => {
            let updated = toggle_manual(&store, &slug, Utc::now());
            let slugs: Vec<&str> = updated.keys().map(String::as_str).collect();
            println!("Manual solved set ({}): {}", slugs.len(), slugs.join(", "));
        }

        Command::Deadline { time } => {
            grindguard_core::set_deadline(&store, &time)?;
            println!("Pressure deadline set to {time}");
        }

        Command::Remind => {
            let events = merged_events(&store);
            let calendar = stored_calendar(&store);
            let attendance =
                reconcile_attendance(&store, &events, calendar.as_ref(), Utc::now(), cfg.tz());
            let now_local = Utc::now().with_timezone(&cfg.tz()).naive_local();
            match check_pressure(&store, attendance.today_status, now_local) {
                Some(msg) => println!("GrindGuard Alert: {msg}"),
                None => println!("No reminder due."),
            }
        }

        Command::Wipe => {
            for key in [
                keys::ATTENDANCE_LOG,
                keys::MANUAL_SOLVED,
                keys::SOLVED_SNAPSHOT,
                keys::CALENDAR_SNAPSHOT,
                keys::LAST_NOTIFICATION_DATE,
                keys::METADATA_CACHE,
            ] {
                store.remove(key)?;
            }
            println!("Wiped local data.");
        }
    }

    Ok(())
}

async fn sync(
    store: &FileStore,
    cfg: &Config,
    username: Option<String>,
    sheet: Option<PathBuf>,
    metadata: Option<PathBuf>,
) -> Result<()> {
    let username = match username.or_else(|| cfg.judge.username.clone()) {
        Some(u) => u,
        None => bail!("no username: pass --username or set judge.username in config.toml"),
    };

    // Remember the username for next time.
    if cfg.judge.username.as_deref() != Some(username.as_str()) {
        let mut updated = cfg.clone();
        updated.judge.username = Some(username.clone());
        save_config(&updated)?;
    }

    let mut problems = load_sheet(cfg, sheet)?;
    if let Some(meta_path) = metadata.or_else(|| cfg.metadata.as_ref().map(PathBuf::from)) {
        let meta = load_metadata(store, &meta_path)?;
        apply_metadata(&mut problems, &meta);
    }

    let client = JudgeClient::new(cfg.judge.base_url.clone());

    println!("Fetching solved problems for {username}...");
    let fetched = match client.fetch_solved(&username).await {
        Ok(events) => {
            save_snapshot(store, keys::SOLVED_SNAPSHOT, &events);
            Some(events)
        }
        Err(e) => {
            // Stale-but-available beats empty: keep the previous snapshot.
            eprintln!("{}", judge::classify(&e).user_message());
            None
        }
    };

    let calendar = match client.fetch_profile(&username).await {
        Ok(profile) => {
            save_snapshot(store, keys::CALENDAR_SNAPSHOT, &profile.submission_calendar);
            Some(profile.submission_calendar)
        }
        Err(e) => {
            eprintln!("{}", judge::classify(&e).user_message());
            None
        }
    };

    if fetched.is_none() && calendar.is_none() {
        bail!("sync failed: no endpoint reachable; previous snapshot retained");
    }

    let events = merged_events(store);
    let attendance = reconcile_attendance(store, &events, calendar.as_ref(), Utc::now(), cfg.tz());
    print_summary(&problems, &events, &attendance);
    Ok(())
}

fn load_sheet(cfg: &Config, arg: Option<PathBuf>) -> Result<Vec<Problem>> {
    let path = match arg.or_else(|| cfg.sheet.as_ref().map(PathBuf::from)) {
        Some(p) => p,
        None => bail!("no sheet: pass --sheet <csv> or set sheet in config.toml"),
    };
    if !path.exists() {
        bail!("sheet not found: {}", path.display());
    }
    parse_sheet_file(&path)
}

/// Enrichment metadata with the 7-day cache in front of the CSV parse.
fn load_metadata(
    store: &FileStore,
    path: &PathBuf,
) -> Result<std::collections::HashMap<String, grindguard_core::ProblemMeta>> {
    let now = Utc::now();
    let ttl = chrono::Duration::days(grindguard_core::METADATA_TTL_DAYS);
    if let Some(cached) = grindguard_core::cache_get(store, keys::METADATA_CACHE, now, ttl) {
        return Ok(cached);
    }
    let meta = parse_metadata_file(path)?;
    grindguard_core::cache_put(store, keys::METADATA_CACHE, &meta, now);
    Ok(meta)
}

/// Stored remote snapshot plus manual toggles, deduplicated by slug. Manual
/// entries carry their toggle instant, so a problem toggled solved today
/// marks today present and ages into review like any other solve.
fn merged_events(store: &dyn Store) -> Vec<SolvedEvent> {
    let mut events: Vec<SolvedEvent> = load_snapshot(store, keys::SOLVED_SNAPSHOT);
    let known: std::collections::HashSet<String> =
        events.iter().map(|e| e.normalized_slug()).collect();
    for (slug, toggled_at) in manual_solved(store) {
        if !known.contains(&slug) {
            events.push(
                SolvedEvent::new(&slug, &slug, SolvedSource::Manual, "")
                    .at(EventTime::UnixSeconds(toggled_at)),
            );
        }
    }
    events
}

/// Last synced submission calendar, so the offline commands reconcile against
/// the same authority as `sync`. Empty or missing reads as no calendar.
fn stored_calendar(store: &dyn Store) -> Option<std::collections::BTreeMap<String, u64>> {
    let cal: std::collections::BTreeMap<String, u64> =
        load_snapshot(store, keys::CALENDAR_SNAPSHOT);
    if cal.is_empty() {
        None
    } else {
        Some(cal)
    }
}

fn save_snapshot<T: serde::Serialize>(store: &dyn Store, key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        let _ = store.set(key, &json);
    }
}

fn load_snapshot<T: serde::de::DeserializeOwned + Default>(store: &dyn Store, key: &str) -> T {
    match store.get(key) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
        _ => T::default(),
    }
}

fn print_summary(problems: &[Problem], events: &[SolvedEvent], attendance: &AttendanceStats) {
    let (stats, _) = compute_progress(problems, events);
    println!(
        "Progress: {}/{} solved ({}%)",
        stats.completed_problems, stats.total_problems, stats.completion_percentage
    );

    let mut weakest: Vec<(&String, f64)> = stats
        .topic_breakdown
        .iter()
        .filter(|(_, c)| c.completed < c.total)
        .map(|(topic, c)| (topic, f64::from(c.completed) / f64::from(c.total)))
        .collect();
    weakest.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    if let Some((topic, ratio)) = weakest.first() {
        println!("Weakest topic: {topic} ({:.0}% done)", ratio * 100.0);
    }

    let today = match attendance.today_status {
        TodayStatus::Present => "present",
        TodayStatus::Absent => "absent",
    };
    println!(
        "Streak: {} current / {} longest, today {}",
        attendance.current_streak, attendance.longest_streak, today
    );
    if let Some(last) = attendance.last_practiced {
        println!("Last practiced: {last}");
    }
}
