//! Daily mission recommendation: topic-weighted, spaced-repetition-aware,
//! deterministic per calendar day.
//!
//! Every random draw is seeded by the local date string plus a purpose
//! discriminator, so the mission is stable across repeated calls on the same
//! day, varies day to day, and the topic draw never correlates with the
//! problem shuffle.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::problem::{Difficulty, Problem, SolvedEvent};
use crate::rng::SeededRng;

/// A solved problem older than this is eligible for review.
const STALE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionType {
    Weakness,
    Review,
    Challenge,
}

/// The daily recommended set, at most two problems. Completion is the
/// caller's to derive (problems' slugs vs. the solved set); the engine never
/// tracks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMission {
    pub mission_type: MissionType,
    pub title: String,
    pub description: String,
    pub topic: Option<String>,
    pub problems: Vec<Problem>,
}

struct TopicStats {
    total: u32,
    solved: u32,
}

/// Compute today's mission, or `None` when there is nothing left to
/// recommend (empty sheet, or everything solved with no stale backlog).
pub fn daily_mission(
    problems: &[Problem],
    solved: &[SolvedEvent],
    now: DateTime<Utc>,
    tz: Tz,
) -> Option<DailyMission> {
    if problems.is_empty() {
        return None;
    }

    let solved_slugs: HashSet<String> = solved.iter().map(|e| e.normalized_slug()).collect();
    // Timestamp lookup keyed by normalized slug; last write wins on dupes.
    let event_by_slug: HashMap<String, &SolvedEvent> = solved
        .iter()
        .map(|e| (e.normalized_slug(), e))
        .collect();

    let mut by_topic: BTreeMap<&str, Vec<&Problem>> = BTreeMap::new();
    let mut stats: BTreeMap<&str, TopicStats> = BTreeMap::new();
    for p in problems {
        let topic = p.topic.as_str();
        by_topic.entry(topic).or_default().push(p);
        let s = stats.entry(topic).or_insert(TopicStats { total: 0, solved: 0 });
        s.total += 1;
        if solved_slugs.contains(&p.slug()) {
            s.solved += 1;
        }
    }

    // Stale backlog: solved more than 30 days ago, by resolvable instant.
    let stale_cutoff = now - Duration::days(STALE_AFTER_DAYS);
    let stale: Vec<&Problem> = problems
        .iter()
        .filter(|p| {
            let slug = p.slug();
            solved_slugs.contains(&slug)
                && event_by_slug
                    .get(&slug)
                    .and_then(|e| e.time.as_ref())
                    .is_some_and(|t| t.instant() < stale_cutoff)
        })
        .collect();

    let incomplete: Vec<&str> = stats
        .iter()
        .filter(|(_, s)| s.solved < s.total)
        .map(|(topic, _)| *topic)
        .collect();

    // Seed format mirrors a JS Date#toDateString, e.g. "Fri Jan 18 2026".
    let seed = now.with_timezone(&tz).format("%a %b %d %Y").to_string();

    let review_coin = SeededRng::new(&format!("{seed}:mission-type")).next_f64();
    let maintenance = incomplete.is_empty();

    if (stale.len() >= 2 && review_coin > 0.5) || (maintenance && !stale.is_empty()) {
        return Some(review_mission(&seed, stale));
    }
    if maintenance {
        return None;
    }

    weakness_mission(&seed, &stats, &by_topic, &solved_slugs, incomplete)
}

fn review_mission(seed: &str, mut stale: Vec<&Problem>) -> DailyMission {
    SeededRng::new(&format!("{seed}:review-shuffle")).shuffle(&mut stale);
    let problems: Vec<Problem> = stale.into_iter().take(2).cloned().collect();
    DailyMission {
        mission_type: MissionType::Review,
        title: "Review Day".to_string(),
        description: "These solves are over a month old. Prove you still own them.".to_string(),
        topic: None,
        problems,
    }
}

fn weakness_mission(
    seed: &str,
    stats: &BTreeMap<&str, TopicStats>,
    by_topic: &BTreeMap<&str, Vec<&Problem>>,
    solved_slugs: &HashSet<String>,
    mut incomplete: Vec<&str>,
) -> Option<DailyMission> {
    // Weakest first: ascending solved/total, topic name as the deterministic
    // tie-break.
    incomplete.sort_by(|a, b| {
        let ra = ratio(&stats[a]);
        let rb = ratio(&stats[b]);
        ra.partial_cmp(&rb).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(b))
    });

    let weakest = &incomplete[..incomplete.len().min(3)];
    let pick = SeededRng::new(&format!("{seed}:topic-pick")).pick_index(weakest.len());
    let topic = weakest[pick];

    let unsolved: Vec<&Problem> = by_topic[topic]
        .iter()
        .filter(|p| !solved_slugs.contains(&p.slug()))
        .copied()
        .collect();

    // Shuffle within difficulty tiers so the picks rotate daily without the
    // tier preference changing.
    let mut rng = SeededRng::new(&format!("{seed}:{topic}"));
    let mut easy: Vec<&Problem> = unsolved
        .iter()
        .filter(|p| matches!(p.difficulty, Difficulty::Easy | Difficulty::Unknown))
        .copied()
        .collect();
    let mut medium: Vec<&Problem> = unsolved
        .iter()
        .filter(|p| p.difficulty == Difficulty::Medium)
        .copied()
        .collect();
    let mut hard: Vec<&Problem> = unsolved
        .iter()
        .filter(|p| p.difficulty == Difficulty::Hard)
        .copied()
        .collect();
    rng.shuffle(&mut easy);
    rng.shuffle(&mut medium);
    rng.shuffle(&mut hard);

    // Preference chain: Easy+Medium, two Mediums, Medium+Hard, then any two.
    let mut picked: Vec<&Problem> = Vec::with_capacity(2);
    if !easy.is_empty() && !medium.is_empty() {
        picked.push(easy[0]);
        picked.push(medium[0]);
    } else if medium.len() >= 2 {
        picked.push(medium[0]);
        picked.push(medium[1]);
    } else if !medium.is_empty() && !hard.is_empty() {
        picked.push(medium[0]);
        picked.push(hard[0]);
    } else {
        for p in easy.iter().chain(&medium).chain(&hard).copied().take(2) {
            picked.push(p);
        }
    }

    Some(DailyMission {
        mission_type: MissionType::Weakness,
        title: format!("Target: {topic}"),
        description: format!(
            "{} is your weakest topic right now. Close the gap.",
            topic
        ),
        topic: Some(topic.to_string()),
        problems: picked.into_iter().cloned().collect(),
    })
}

fn ratio(s: &TopicStats) -> f64 {
    if s.total == 0 {
        1.0
    } else {
        f64::from(s.solved) / f64::from(s.total)
    }
}
