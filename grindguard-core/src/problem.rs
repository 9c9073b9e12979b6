//! Problem + solved-event model shared by every engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::slug::normalize_slug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    /// Lenient parse of sheet labels ("Easy", "1.Easy", "Medium/Hard" picks
    /// the first match). Anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let l = label.to_lowercase();
        if l.contains("easy") {
            Difficulty::Easy
        } else if l.contains("medium") {
            Difficulty::Medium
        } else if l.contains("hard") {
            Difficulty::Hard
        } else {
            Difficulty::Unknown
        }
    }
}

/// Enrichment metadata attached to a problem when the metadata sheet knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemMeta {
    /// Percent, 0-100.
    pub acceptance_rate: f64,
    pub frequency: f64,
    pub companies: Vec<String>,
    pub is_premium: bool,
}

/// A curated-sheet problem. Identity for all matching is the normalized slug
/// of `link`, case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    /// Canonical judge URL.
    pub link: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub meta: Option<ProblemMeta>,
}

impl Problem {
    pub fn new(
        name: impl Into<String>,
        link: impl Into<String>,
        topic: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            topic: topic.into(),
            difficulty,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ProblemMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Comparison key for solved-set matching.
    pub fn slug(&self) -> String {
        normalize_slug(&self.link)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolvedSource {
    /// Synthesized from a recent-accepted-submissions entry.
    RemoteSubmission,
    /// From the full solved-list endpoint (no real timestamp upstream).
    RemoteAggregate,
    /// Toggled by hand in the local store.
    Manual,
}

/// A solve timestamp, resolved once at ingestion instead of re-detecting the
/// wire format at every use site. Upstream sends either Unix-seconds-as-string
/// or an ISO-8601 string, ambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    UnixSeconds(i64),
    Iso(DateTime<Utc>),
}

impl EventTime {
    /// Detect and parse a raw timestamp string. All-digits means Unix
    /// seconds; otherwise try ISO-8601. Unparseable input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let t = raw.trim();
        if t.is_empty() {
            return None;
        }
        if t.bytes().all(|b| b.is_ascii_digit()) {
            let secs: i64 = t.parse().ok()?;
            // Reject values chrono cannot represent.
            DateTime::from_timestamp(secs, 0)?;
            return Some(EventTime::UnixSeconds(secs));
        }
        DateTime::parse_from_rfc3339(t)
            .map(|dt| EventTime::Iso(dt.with_timezone(&Utc)))
            .ok()
    }

    pub fn instant(&self) -> DateTime<Utc> {
        match *self {
            // Validated at parse time; epoch fallback for hand-built values.
            EventTime::UnixSeconds(secs) => {
                DateTime::from_timestamp(secs, 0).unwrap_or_else(|| DateTime::UNIX_EPOCH)
            }
            EventTime::Iso(dt) => dt,
        }
    }

    /// Calendar day of the solve, in UTC.
    pub fn day_utc(&self) -> NaiveDate {
        self.instant().date_naive()
    }
}

/// A single "this slug was solved" fact. Presence is what attendance and
/// progress care about; the instant feeds staleness and day derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedEvent {
    pub slug: String,
    pub title: String,
    pub source: SolvedSource,
    pub time: Option<EventTime>,
}

impl SolvedEvent {
    /// Build an event from wire data, resolving the ambiguous timestamp once.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        source: SolvedSource,
        raw_timestamp: &str,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            source,
            time: EventTime::parse(raw_timestamp),
        }
    }

    pub fn at(mut self, time: EventTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Normalized comparison key. Events may arrive with raw slugs.
    pub fn normalized_slug(&self) -> String {
        normalize_slug(&self.slug)
    }
}
