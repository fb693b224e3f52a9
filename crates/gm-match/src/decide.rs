//! Threshold decision policy.
//!
//! A pure function of the scored candidates: accept the best outright,
//! refer an ambiguous band to the adjudicator, or record the video as
//! unmatched with diagnostics. Retry and backoff live with the fetchers,
//! never here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::score::{pick_best, ScoredCandidate};
use crate::types::{CongressEvent, VideoRecord};

/// Decision thresholds.
///
/// The defaults come from the most recent tuning pass, but were never
/// calibrated against a labeled validation set — treat them as starting
/// points, not settled values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// Accept at or above this score.
    pub high_threshold: f64,
    /// Refer to adjudication at or above this score (below `high_threshold`).
    pub low_threshold: f64,
    /// Minimum title similarity for the same-day disambiguation pass.
    pub same_day_floor: f64,
    /// Maximum candidates referred to the adjudicator.
    pub refer_limit: usize,
    /// Referred candidates must be dated within this many days of the
    /// video. Waived when the video has no date.
    pub refer_window_days: i64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            high_threshold: 0.7,
            low_threshold: 0.4,
            same_day_floor: 0.4,
            refer_limit: 10,
            refer_window_days: 7,
        }
    }
}

/// Outcome of the decision policy for one video.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// High confidence: accept the candidate as-is.
    Accept { candidate: ScoredCandidate },
    /// Ambiguous band: refer `candidates` (never empty) to the adjudicator.
    Refer {
        candidates: Vec<ScoredCandidate>,
        best: ScoredCandidate,
    },
    /// Low confidence, or nothing to score. `best` is kept for diagnostics.
    Unmatched { best: Option<ScoredCandidate> },
}

/// Apply the threshold policy to candidates already scored and sorted
/// best-first.
///
/// Boundary behavior is inclusive on both thresholds: a score exactly at
/// `high_threshold` is accepted, and a score exactly at `low_threshold` is
/// referred, never silently rejected.
#[must_use]
pub fn decide(
    video: &VideoRecord,
    events: &[CongressEvent],
    scored: &[ScoredCandidate],
    policy: &DecisionPolicy,
) -> Decision {
    let Some(best) = pick_best(video, events, scored, policy.same_day_floor) else {
        return Decision::Unmatched { best: None };
    };

    if best.breakdown.score >= policy.high_threshold {
        return Decision::Accept { candidate: best };
    }

    if best.breakdown.score >= policy.low_threshold {
        let candidates: Vec<ScoredCandidate> = scored
            .iter()
            .take(policy.refer_limit)
            .filter(|c| {
                within_refer_window(
                    video.date,
                    events[c.event_index].date,
                    policy.refer_window_days,
                )
            })
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Decision::Unmatched { best: Some(best) };
        }
        return Decision::Refer { candidates, best };
    }

    Decision::Unmatched { best: Some(best) }
}

fn within_refer_window(
    video_date: Option<NaiveDate>,
    event_date: Option<NaiveDate>,
    days: i64,
) -> bool {
    match (video_date, event_date) {
        (Some(v), Some(e)) => v.signed_duration_since(e).num_days().abs() <= days,
        // Undated videos reached the ambiguous band on title alone; the
        // date tolerance is waived for them.
        (None, _) => true,
        // Undated events cannot be confirmed close; keep them out.
        (Some(_), None) => false,
    }
}
