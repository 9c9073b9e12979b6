//! Progress calculator: aggregate and per-topic completion statistics.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::problem::{Problem, SolvedEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub total: u32,
    pub completed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_problems: u32,
    pub completed_problems: u32,
    pub remaining_problems: u32,
    /// Rounded percent, 0-100. Zero when the sheet is empty.
    pub completion_percentage: u32,
    pub topic_breakdown: BTreeMap<String, TopicCount>,
}

/// A sheet problem paired with its solved flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedProblem {
    pub problem: Problem,
    pub is_solved: bool,
}

/// Pure function of (sheet, solved events). Safe on empty inputs; blank
/// topics accumulate under "Unknown".
pub fn compute_progress(
    problems: &[Problem],
    solved: &[SolvedEvent],
) -> (ProgressStats, Vec<MatchedProblem>) {
    let solved_slugs: HashSet<String> = solved.iter().map(|e| e.normalized_slug()).collect();

    let matched: Vec<MatchedProblem> = problems
        .iter()
        .map(|p| MatchedProblem {
            is_solved: solved_slugs.contains(&p.slug()),
            problem: p.clone(),
        })
        .collect();

    let total = matched.len() as u32;
    let completed = matched.iter().filter(|m| m.is_solved).count() as u32;

    let mut topic_breakdown: BTreeMap<String, TopicCount> = BTreeMap::new();
    for m in &matched {
        let topic = if m.problem.topic.trim().is_empty() {
            "Unknown"
        } else {
            m.problem.topic.as_str()
        };
        let entry = topic_breakdown.entry(topic.to_string()).or_default();
        entry.total += 1;
        if m.is_solved {
            entry.completed += 1;
        }
    }

    let completion_percentage = if total > 0 {
        ((f64::from(completed) / f64::from(total)) * 100.0).round() as u32
    } else {
        0
    };

    let stats = ProgressStats {
        total_problems: total,
        completed_problems: completed,
        remaining_problems: total - completed,
        completion_percentage,
        topic_breakdown,
    };

    (stats, matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Difficulty, SolvedSource};

    fn sheet() -> Vec<Problem> {
        vec![
            Problem::new(
                "Two Sum",
                "https://leetcode.com/problems/two-sum",
                "Arrays",
                Difficulty::Easy,
            ),
            Problem::new(
                "3Sum",
                "https://leetcode.com/problems/3sum",
                "Arrays",
                Difficulty::Medium,
            ),
            Problem::new(
                "LRU Cache",
                "https://leetcode.com/problems/lru-cache",
                "Design",
                Difficulty::Medium,
            ),
        ]
    }

    fn solved(slugs: &[&str]) -> Vec<SolvedEvent> {
        slugs
            .iter()
            .map(|s| SolvedEvent::new(*s, *s, SolvedSource::Manual, ""))
            .collect()
    }

    #[test]
    fn empty_inputs_are_safe() {
        let (stats, matched) = compute_progress(&[], &[]);
        assert_eq!(stats.total_problems, 0);
        assert_eq!(stats.completion_percentage, 0);
        assert!(matched.is_empty());
    }

    #[test]
    fn nothing_solved() {
        let (stats, matched) = compute_progress(&sheet(), &[]);
        assert_eq!(stats.completed_problems, 0);
        assert_eq!(stats.remaining_problems, 3);
        assert_eq!(stats.completion_percentage, 0);
        assert!(matched.iter().all(|m| !m.is_solved));
    }

    #[test]
    fn case_insensitive_matching_and_rounding() {
        let (stats, matched) = compute_progress(&sheet(), &solved(&["Two-Sum"]));
        assert_eq!(stats.completed_problems, 1);
        // 1/3 rounds to 33.
        assert_eq!(stats.completion_percentage, 33);
        assert!(matched[0].is_solved);
        assert!(!matched[1].is_solved);
    }

    #[test]
    fn topic_breakdown_accumulates() {
        let (stats, _) = compute_progress(&sheet(), &solved(&["two-sum", "lru-cache"]));
        let arrays = stats.topic_breakdown.get("Arrays").unwrap();
        assert_eq!((arrays.total, arrays.completed), (2, 1));
        let design = stats.topic_breakdown.get("Design").unwrap();
        assert_eq!((design.total, design.completed), (1, 1));
    }

    #[test]
    fn blank_topic_defaults_to_unknown() {
        let problems = vec![Problem::new(
            "Mystery",
            "https://leetcode.com/problems/mystery",
            "  ",
            Difficulty::Unknown,
        )];
        let (stats, _) = compute_progress(&problems, &[]);
        assert!(stats.topic_breakdown.contains_key("Unknown"));
    }

    #[test]
    fn completed_never_exceeds_total() {
        // Duplicate solves of the same slug count once.
        let (stats, _) = compute_progress(&sheet(), &solved(&["two-sum", "TWO-SUM", "two-sum"]));
        assert_eq!(stats.completed_problems, 1);
        assert!(stats.completed_problems <= stats.total_problems);
        assert!(stats.completion_percentage <= 100);
    }
}
