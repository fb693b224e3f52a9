//! The matching engine: selection, scoring, decision, and report assembly.

use chrono::Utc;

use crate::adjudicator::{Adjudicator, AdjudicatorDecision};
use crate::decide::{decide, Decision, DecisionPolicy};
use crate::score::{score_candidates, ScoreWeights, ScoredCandidate};
use crate::select::EventIndex;
use crate::types::{
    CongressEvent, MatchMethod, MatchReport, MatchResult, ReportMetadata, UnmatchedVideo,
    VideoRecord,
};

/// Matches videos against events and emits a [`MatchReport`].
///
/// The engine guarantees exactly one report entry per input video, in input
/// order within the matched and unmatched lists, and never fails for
/// data-quality problems (missing dates, empty titles, empty event sets).
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    weights: ScoreWeights,
    policy: DecisionPolicy,
}

impl Matcher {
    #[must_use]
    pub const fn new(weights: ScoreWeights, policy: DecisionPolicy) -> Self {
        Self { weights, policy }
    }

    /// Run one matching pass.
    ///
    /// `adjudicator` handles the ambiguous band; pass `None` to run purely
    /// algorithmically (ambiguous videos are then recorded unmatched with
    /// diagnostics). Partial or incremental event sets are fine — the engine
    /// places no completeness requirement on its inputs.
    pub async fn run(
        &self,
        videos: &[VideoRecord],
        events: &[CongressEvent],
        adjudicator: Option<&dyn Adjudicator>,
    ) -> MatchReport {
        let index = EventIndex::build(events);
        let full_set: Vec<usize> = (0..events.len()).collect();

        let mut matches = Vec::new();
        let mut unmatched = Vec::new();
        let mut adjudicated_matches = 0_usize;

        for (position, video) in videos.iter().enumerate() {
            if (position + 1) % 50 == 0 {
                tracing::info!(progress = position + 1, total = videos.len(), "matching videos");
            }

            let candidates = index.candidates(video.date).unwrap_or_else(|| {
                tracing::debug!(
                    video_id = %video.video_id,
                    "no events in date window, scoring full set"
                );
                full_set.clone()
            });
            let scored = score_candidates(video, events, &candidates, &self.weights);

            match decide(video, events, &scored, &self.policy) {
                Decision::Accept { candidate } => {
                    tracing::debug!(
                        video_id = %video.video_id,
                        event_id = %events[candidate.event_index].event_id,
                        score = candidate.breakdown.score,
                        "accepted algorithmically"
                    );
                    matches.push(build_match(
                        video,
                        events,
                        &candidate,
                        MatchMethod::Algorithmic,
                        None,
                    ));
                }
                Decision::Refer { candidates, best } => {
                    match adjudicate_referral(video, events, &candidates, adjudicator).await {
                        Some((candidate, decision)) => {
                            adjudicated_matches += 1;
                            tracing::debug!(
                                video_id = %video.video_id,
                                event_id = %events[candidate.event_index].event_id,
                                confidence = ?decision.confidence,
                                "accepted by adjudicator"
                            );
                            matches.push(build_match(
                                video,
                                events,
                                &candidate,
                                MatchMethod::Adjudicated,
                                Some(decision),
                            ));
                        }
                        None => unmatched.push(build_unmatched(video, events, Some(&best))),
                    }
                }
                Decision::Unmatched { best } => {
                    unmatched.push(build_unmatched(video, events, best.as_ref()));
                }
            }
        }

        let metadata = ReportMetadata {
            total_videos: videos.len(),
            total_events: events.len(),
            matched: matches.len(),
            unmatched: unmatched.len(),
            algorithmic_matches: matches.len() - adjudicated_matches,
            adjudicated_matches,
            match_rate: match_rate(matches.len(), videos.len()),
            generated_at: Utc::now(),
        };
        tracing::info!(
            matched = metadata.matched,
            unmatched = metadata.unmatched,
            adjudicated = metadata.adjudicated_matches,
            rate = %metadata.match_rate,
            "matching complete"
        );

        MatchReport {
            metadata,
            matches,
            unmatched,
        }
    }
}

/// Refer `candidates` to the adjudicator and validate its answer.
///
/// Returns the accepted candidate only when the adjudicator positively
/// identifies one of the referred events. Anything else — no adjudicator
/// configured, no decision obtained, a declined identification, or an
/// event ID that was never referred — yields `None`.
async fn adjudicate_referral(
    video: &VideoRecord,
    events: &[CongressEvent],
    candidates: &[ScoredCandidate],
    adjudicator: Option<&dyn Adjudicator>,
) -> Option<(ScoredCandidate, AdjudicatorDecision)> {
    let adjudicator = adjudicator?;

    let referred: Vec<CongressEvent> = candidates
        .iter()
        .map(|c| events[c.event_index].clone())
        .collect();
    let decision = adjudicator.adjudicate(video, &referred).await?;
    let event_id = decision.event_id.clone()?;

    let candidate = candidates
        .iter()
        .find(|c| events[c.event_index].event_id == event_id)?
        .clone();
    Some((candidate, decision))
}

fn build_match(
    video: &VideoRecord,
    events: &[CongressEvent],
    candidate: &ScoredCandidate,
    method: MatchMethod,
    decision: Option<AdjudicatorDecision>,
) -> MatchResult {
    let event = &events[candidate.event_index];
    let (confidence, reasoning) = match decision {
        Some(d) => (Some(d.confidence), Some(d.reasoning)),
        None => (None, None),
    };
    MatchResult {
        video_id: video.video_id.clone(),
        video_title: video.title.clone(),
        video_url: video.url.clone(),
        video_date: video.date,
        event_id: event.event_id.clone(),
        event_title: event.title.clone(),
        event_date: event.date,
        event_url: event.congress_url(),
        committee: event.committee_name.clone(),
        score: candidate.breakdown.score,
        reasons: candidate.breakdown.reasons.clone(),
        method,
        adjudicator_confidence: confidence,
        adjudicator_reasoning: reasoning,
    }
}

fn build_unmatched(
    video: &VideoRecord,
    events: &[CongressEvent],
    best: Option<&ScoredCandidate>,
) -> UnmatchedVideo {
    UnmatchedVideo {
        video_id: video.video_id.clone(),
        video_title: video.title.clone(),
        video_date: video.date,
        best_score: best.map_or(0.0, |b| b.breakdown.score),
        best_match_title: best.map(|b| events[b.event_index].title.clone()),
    }
}

fn match_rate(matched: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = matched as f64 / total as f64 * 100.0;
    format!("{rate:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_rate_formats_one_decimal() {
        assert_eq!(match_rate(0, 0), "0.0%");
        assert_eq!(match_rate(1, 3), "33.3%");
        assert_eq!(match_rate(2, 2), "100.0%");
    }
}
