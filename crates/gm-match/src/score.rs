//! Composite match scoring.
//!
//! A candidate's score combines date proximity, normalized-title similarity,
//! and procedural-keyword overlap. Weights are configuration; the defaults
//! are the canonical values (date 0.40, title 0.45, keyword 0.15). Distant
//! dates are an active penalty rather than a missing bonus: a candidate more
//! than a week away is being disqualified, not merely unhelped.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::types::{CongressEvent, VideoRecord};

/// Keywords that carry event-type signal in both sources.
const PROCEDURAL_KEYWORDS: [&str; 4] = ["markup", "hearing", "meeting", "oversight"];

/// Weights and cut-offs for the composite score.
///
/// Tunable, but the relative ordering intent must be preserved: exact date >
/// near > within a week > penalized, and title similarity is the dominant
/// component for same-day disambiguation. Calibrate against labeled data
/// before changing the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Credit for an exact date match.
    pub date_exact: f64,
    /// Credit within `near_days` of the event.
    pub date_near: f64,
    /// Credit within `week_days` of the event.
    pub date_week: f64,
    /// Penalty (negative) beyond `week_days`.
    pub date_penalty: f64,
    /// Upper bound of the near window, in days.
    pub near_days: i64,
    /// Upper bound of the partial-credit window, in days.
    pub week_days: i64,
    /// Multiplier for the title similarity ratio.
    pub title: f64,
    /// Credit for a procedural-keyword match.
    pub keyword: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            date_exact: 0.40,
            date_near: 0.25,
            date_week: 0.10,
            date_penalty: -0.50,
            near_days: 2,
            week_days: 7,
            title: 0.45,
            keyword: 0.15,
        }
    }
}

/// Score and audit trail for one video/event comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub score: f64,
    /// Raw title similarity ratio in [0, 1], before weighting.
    pub title_similarity: f64,
    /// Contributing factors in check order.
    pub reasons: Vec<String>,
}

/// A scored candidate, by index into the caller's event slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub event_index: usize,
    pub breakdown: ScoreBreakdown,
}

/// Character-level similarity of two normalized titles, in [0, 1].
#[must_use]
pub fn title_similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&normalize(a), &normalize(b))
}

/// Score one candidate event against a video.
///
/// Deterministic: identical inputs yield an identical score and reason list.
/// Missing dates are a scoring condition (no credit, no penalty, explicit
/// reason), never an error.
#[must_use]
pub fn score(video: &VideoRecord, event: &CongressEvent, weights: &ScoreWeights) -> ScoreBreakdown {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    match (video.date, event.date) {
        (Some(video_date), Some(event_date)) => {
            let days = video_date.signed_duration_since(event_date).num_days().abs();
            if days == 0 {
                score += weights.date_exact;
                reasons.push(format!("Exact date match: {video_date}"));
            } else if days <= weights.near_days {
                score += weights.date_near;
                reasons.push(format!(
                    "Date within {} days: {video_date} vs {event_date}",
                    weights.near_days
                ));
            } else if days <= weights.week_days {
                score += weights.date_week;
                reasons.push(format!("Date within a week: {days} days apart"));
            } else {
                score += weights.date_penalty;
                reasons.push(format!("Date mismatch: {days} days apart"));
            }
        }
        _ => reasons.push("Missing date information".to_string()),
    }

    let similarity = title_similarity(&video.title, &event.title);
    score += similarity * weights.title;
    if similarity > 0.8 {
        reasons.push(format!("High title similarity: {similarity:.2}"));
    } else if similarity > 0.6 {
        reasons.push(format!("Moderate title similarity: {similarity:.2}"));
    } else if similarity > 0.4 {
        reasons.push(format!("Low title similarity: {similarity:.2}"));
    }

    let video_title = video.title.to_lowercase();
    let event_text = format!("{} {}", event.event_type, event.title).to_lowercase();
    if let Some(keyword) = PROCEDURAL_KEYWORDS
        .iter()
        .find(|k| video_title.contains(*k) && event_text.contains(*k))
    {
        score += weights.keyword;
        reasons.push(format!("Event type match: {keyword}"));
    }

    ScoreBreakdown {
        score,
        title_similarity: similarity,
        reasons,
    }
}

/// Score the given candidate events, sorted best-first.
///
/// Ties keep event order, so repeated runs over identical inputs produce
/// identical rankings.
#[must_use]
pub fn score_candidates(
    video: &VideoRecord,
    events: &[CongressEvent],
    candidate_indexes: &[usize],
    weights: &ScoreWeights,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidate_indexes
        .iter()
        .map(|&event_index| ScoredCandidate {
            event_index,
            breakdown: score(video, &events[event_index], weights),
        })
        .collect();
    scored.sort_by(|a, b| b.breakdown.score.total_cmp(&a.breakdown.score));
    scored
}

/// Pick the best candidate, applying the same-day disambiguation pass.
///
/// When the top-ranked candidate sits on the video's own date, several
/// events often share that date (a markup and a hearing the same morning).
/// Those are re-ranked by title similarity alone, and the best-titled one
/// wins if its similarity clears `same_day_floor`.
#[must_use]
pub fn pick_best(
    video: &VideoRecord,
    events: &[CongressEvent],
    scored: &[ScoredCandidate],
    same_day_floor: f64,
) -> Option<ScoredCandidate> {
    let best = scored.first()?.clone();

    let Some(video_date) = video.date else {
        return Some(best);
    };
    if events[best.event_index].date != Some(video_date) {
        return Some(best);
    }

    let best_titled = scored
        .iter()
        .filter(|c| events[c.event_index].date == Some(video_date))
        .max_by(|a, b| {
            a.breakdown
                .title_similarity
                .total_cmp(&b.breakdown.title_similarity)
        })?;
    if best_titled.breakdown.title_similarity > same_day_floor {
        Some(best_titled.clone())
    } else {
        Some(best)
    }
}
