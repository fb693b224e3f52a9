//! External adjudication of ambiguous matches.
//!
//! The decision policy refers borderline candidates to an [`Adjudicator`]
//! for a final identification. The trait abstraction keeps the engine
//! testable without any live external dependency; the production
//! implementation (a language-model completion service) lives in the
//! `gm-llm` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{CongressEvent, VideoRecord};

/// Self-reported confidence of an adjudication decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjudicatorConfidence {
    High,
    Medium,
    Low,
}

/// A structured adjudication decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicatorDecision {
    /// Event identifier of the matching record, or `None` for "no good
    /// match among the candidates".
    pub event_id: Option<String>,
    pub confidence: AdjudicatorConfidence,
    /// Brief explanation, persisted with the match for audit.
    pub reasoning: String,
}

/// Decides which candidate event, if any, a video shows.
///
/// Implementations must treat transport and parsing failures as "no
/// decision" (`None`), never as a panic or a propagated error: adjudication
/// being unavailable is a recoverable condition and the affected video is
/// simply recorded unmatched.
#[async_trait]
pub trait Adjudicator: Send + Sync {
    /// Pick the matching candidate for `video`, or decline.
    ///
    /// Callers never invoke this with an empty candidate list.
    async fn adjudicate(
        &self,
        video: &VideoRecord,
        candidates: &[CongressEvent],
    ) -> Option<AdjudicatorDecision>;
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub mod mock {
    //! Deterministic stub for unit testing.

    use super::{Adjudicator, AdjudicatorDecision, CongressEvent, VideoRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted `Adjudicator` for tests.
    ///
    /// Queue decisions with [`MockAdjudicator::push_decision`]; each call
    /// consumes one queued entry, and an empty queue yields `None` ("no
    /// decision"). Calls are recorded for verification.
    pub struct MockAdjudicator {
        decisions: Mutex<Vec<Option<AdjudicatorDecision>>>,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl MockAdjudicator {
        pub fn new() -> Self {
            Self {
                decisions: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Queue the result for the next `adjudicate` call.
        pub fn push_decision(&self, decision: Option<AdjudicatorDecision>) {
            self.decisions.lock().unwrap().push(decision);
        }

        /// Video and candidate event IDs for each call made so far.
        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Default for MockAdjudicator {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Adjudicator for MockAdjudicator {
        async fn adjudicate(
            &self,
            video: &VideoRecord,
            candidates: &[CongressEvent],
        ) -> Option<AdjudicatorDecision> {
            self.calls.lock().unwrap().push((
                video.video_id.clone(),
                candidates.iter().map(|c| c.event_id.clone()).collect(),
            ));

            let mut decisions = self.decisions.lock().unwrap();
            if decisions.is_empty() {
                None
            } else {
                decisions.remove(0)
            }
        }
    }
}
