//! Judge API client: solved-problem list and submission calendar, with a
//! bounded exponential-backoff retry policy. The core engines only ever see
//! the snapshot this module produces.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use grindguard_core::{AppError, ErrorKind, SolvedEvent, SolvedSource};

pub const DEFAULT_BASE_URL: &str = "https://alfa-leetcode-api.onrender.com";

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default, rename = "totalSolved")]
    total_solved: u32,
    #[serde(default, rename = "submissionCalendar")]
    submission_calendar: BTreeMap<String, u64>,
}

#[derive(Debug, Deserialize)]
struct SolvedListResponse {
    #[serde(default, rename = "solvedProblem")]
    solved_problem: Vec<SolvedListEntry>,
}

#[derive(Debug, Deserialize)]
struct SolvedListEntry {
    #[serde(default, rename = "questionTitle")]
    title: String,
    #[serde(rename = "questionTitleSlug")]
    slug: String,
}

#[derive(Debug, Deserialize)]
struct RecentAcResponse {
    #[serde(default)]
    submission: Vec<RecentAcEntry>,
}

#[derive(Debug, Deserialize)]
struct RecentAcEntry {
    #[serde(default)]
    title: String,
    #[serde(rename = "titleSlug")]
    slug: String,
    /// Unix seconds as a string.
    #[serde(default)]
    timestamp: String,
}

/// User profile summary: total solved plus the submission calendar keyed by
/// Unix-seconds day buckets.
#[derive(Debug, Clone)]
pub struct Profile {
    pub total_solved: u32,
    pub submission_calendar: BTreeMap<String, u64>,
}

pub struct JudgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl JudgeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: String) -> Result<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        resp.json::<T>().await.with_context(|| format!("decode {url}"))
    }

    /// Profile + submission calendar (the authoritative attendance source).
    pub async fn fetch_profile(&self, username: &str) -> Result<Profile> {
        let resp: ProfileResponse = fetch_with_retry(|| {
            self.get_json::<ProfileResponse>(format!("userProfile/{username}"))
        })
        .await?;
        Ok(Profile {
            total_solved: resp.total_solved,
            submission_calendar: resp.submission_calendar,
        })
    }

    /// Merged solved list from the two upstream endpoints, deduplicated by
    /// slug. Full-list entries carry no upstream timestamp, so they are
    /// stamped with the fetch instant; recent-AC entries carry real
    /// Unix-second instants and win the dedup so staleness and attendance
    /// get accurate days where the upstream provides them.
    pub async fn fetch_solved(&self, username: &str) -> Result<Vec<SolvedEvent>> {
        let mut by_slug: BTreeMap<String, SolvedEvent> = BTreeMap::new();
        let fetched_at = Utc::now().timestamp().to_string();

        // Full solved list. Tolerated failure: the recent-AC endpoint can
        // still tell us something.
        let full = fetch_with_retry(|| {
            self.get_json::<SolvedListResponse>(format!("{username}/solved"))
        })
        .await;
        let mut full_ok = false;
        if let Ok(list) = full {
            full_ok = true;
            for entry in list.solved_problem {
                let event = SolvedEvent::new(
                    &entry.slug,
                    &entry.title,
                    SolvedSource::RemoteAggregate,
                    &fetched_at,
                );
                by_slug.insert(event.normalized_slug(), event);
            }
        }

        let recent = fetch_with_retry(|| {
            self.get_json::<RecentAcResponse>(format!("{username}/acSubmission"))
        })
        .await;
        match recent {
            Ok(list) => {
                for entry in list.submission {
                    let event = SolvedEvent::new(
                        &entry.slug,
                        &entry.title,
                        SolvedSource::RemoteSubmission,
                        &entry.timestamp,
                    );
                    by_slug.insert(event.normalized_slug(), event);
                }
            }
            Err(e) if !full_ok => return Err(e),
            Err(_) => {}
        }

        Ok(by_slug.into_values().collect())
    }
}

/// Retry an async operation with exponential backoff between attempts before
/// giving up. The core never retries; this is the only retry site.
pub async fn fetch_with_retry<T, F, Fut>(mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..MAX_RETRIES {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                last_err = Some(e);
                if attempt + 1 < MAX_RETRIES {
                    let delay = BASE_DELAY_MS * 2u64.pow(attempt);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("retries exhausted")))
}

/// Map an exhausted fetch error onto the user-facing taxonomy.
pub fn classify(err: &anyhow::Error) -> AppError {
    if let Some(re) = err.downcast_ref::<reqwest::Error>() {
        if re.is_connect() || re.is_timeout() {
            return AppError::new(ErrorKind::Network, re.to_string()).retryable();
        }
        if let Some(status) = re.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return AppError::new(ErrorKind::Auth, re.to_string());
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return AppError::new(ErrorKind::Auth, re.to_string())
                    .with_action("Check that the judge username exists.");
            }
            return AppError::new(ErrorKind::ApiFailure, re.to_string()).retryable();
        }
        if re.is_decode() {
            return AppError::new(ErrorKind::Parse, re.to_string());
        }
        return AppError::new(ErrorKind::Network, re.to_string()).retryable();
    }
    AppError::new(ErrorKind::Unknown, format!("{err:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn retry_returns_first_success() {
        let mut calls = 0u32;
        let result: Result<u32> = fetch_with_retry(|| {
            calls += 1;
            let attempt = calls;
            async move {
                if attempt < 2 {
                    anyhow::bail!("transient");
                }
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_gives_up_after_max_attempts() {
        let mut calls = 0u32;
        let result: Result<u32> = fetch_with_retry(|| {
            calls += 1;
            async { anyhow::bail!("down") }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, MAX_RETRIES);
    }

    #[test]
    fn unknown_errors_classify_as_unknown() {
        let err = anyhow::anyhow!("weird");
        assert_eq!(classify(&err).kind, ErrorKind::Unknown);
    }

    #[test]
    fn profile_response_parses_calendar() {
        let json = r#"{
            "totalSolved": 42,
            "submissionCalendar": {"1706659200": 3, "1706745600": 1}
        }"#;
        let resp: ProfileResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.total_solved, 42);
        assert_eq!(resp.submission_calendar.len(), 2);
    }

    #[test]
    fn recent_ac_entry_carries_unix_timestamp() {
        let json = r#"{"submission": [
            {"title": "Two Sum", "titleSlug": "two-sum", "timestamp": "1706659200"}
        ]}"#;
        let resp: RecentAcResponse = serde_json::from_str(json).unwrap();
        let e = SolvedEvent::new(
            &resp.submission[0].slug,
            &resp.submission[0].title,
            SolvedSource::RemoteSubmission,
            &resp.submission[0].timestamp,
        );
        assert!(e.time.is_some());
    }
}
