//! Data types for the matching core.
//!
//! One canonical schema for both sides of a comparison, replacing the ad-hoc
//! record shapes the upstream fetchers produce. Adapters in the application
//! layer map each external source into these types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::adjudicator::AdjudicatorConfidence;

/// A video of a committee proceeding, typically a completed livestream.
///
/// Immutable once created; providers may resolve `date` after the fact
/// (exact stream date when obtainable, approximate otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Opaque external identifier (e.g., a YouTube video ID).
    pub video_id: String,
    /// Free text, human-authored, inconsistently formatted.
    pub title: String,
    /// Best-effort calendar date of the proceeding.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Canonical external link.
    pub url: String,
}

/// An official committee meeting tracked by Congress.gov.
///
/// Append-only reference data, deduplicated by `event_id` when merging
/// fetch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongressEvent {
    /// Event identifier, unique within a congress.
    pub event_id: String,
    /// Two-year legislative session number (e.g., 118).
    pub congress: u16,
    /// "House" or "Senate" when known.
    #[serde(default)]
    pub chamber: Option<String>,
    /// Official event title (possibly empty).
    pub title: String,
    /// Meeting date; generally exact.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Committee attribution.
    pub committee_name: String,
    /// Committee system code (e.g., "hsif00") when known.
    #[serde(default)]
    pub committee_code: Option<String>,
    /// Category such as "Hearing" or "Markup"; free text in source data.
    pub event_type: String,
    /// Meeting status such as "Scheduled" or "Postponed".
    pub status: String,
}

impl CongressEvent {
    /// Congress.gov event page URL for this record.
    #[must_use]
    pub fn congress_url(&self) -> String {
        let chamber = self
            .chamber
            .as_deref()
            .unwrap_or("House")
            .to_ascii_lowercase();
        format!(
            "https://www.congress.gov/event/{}th-congress/{}-event/{}",
            self.congress, chamber, self.event_id
        )
    }
}

/// How a match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Accepted directly on score.
    Algorithmic,
    /// Accepted by the external adjudicator.
    Adjudicated,
}

/// An accepted pairing of one video with one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub video_id: String,
    pub video_title: String,
    pub video_url: String,
    pub video_date: Option<NaiveDate>,
    pub event_id: String,
    pub event_title: String,
    pub event_date: Option<NaiveDate>,
    pub event_url: String,
    pub committee: String,
    /// Composite score. Unbounded range by design: date penalties can push
    /// it negative and the components are not normalized to sum to one.
    pub score: f64,
    /// Contributing factors in the order the checks ran. Audit output only.
    pub reasons: Vec<String>,
    pub method: MatchMethod,
    /// Adjudicator self-reported confidence, when `method` is `Adjudicated`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjudicator_confidence: Option<AdjudicatorConfidence>,
    /// Adjudicator reasoning, persisted for audit. Never feeds back into
    /// the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjudicator_reasoning: Option<String>,
}

/// A video for which no candidate cleared the decision policy.
///
/// The best-scoring candidate is retained for diagnostics; attempts are
/// never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedVideo {
    pub video_id: String,
    pub video_title: String,
    pub video_date: Option<NaiveDate>,
    pub best_score: f64,
    #[serde(default)]
    pub best_match_title: Option<String>,
}

/// Run-level totals for a [`MatchReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub total_videos: usize,
    pub total_events: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub algorithmic_matches: usize,
    pub adjudicated_matches: usize,
    /// Percentage of videos matched, formatted to one decimal ("61.3%").
    pub match_rate: String,
    pub generated_at: DateTime<Utc>,
}

/// The single structured document a matching run emits.
///
/// Invariant: `matches.len() + unmatched.len() == metadata.total_videos` —
/// exactly one entry per input video, in input order within each list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub metadata: ReportMetadata,
    pub matches: Vec<MatchResult>,
    pub unmatched: Vec<UnmatchedVideo>,
}
