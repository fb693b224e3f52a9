#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

//! Record-matching core for committee proceeding videos.
//!
//! Pairs a video (title + approximate date) with at most one official
//! Congress.gov committee-meeting record and assigns a confidence score.
//! The matching pipeline is: candidate selection by date window, composite
//! scoring (date proximity, normalized-title similarity, procedural-keyword
//! overlap), a threshold decision policy, and optional referral of ambiguous
//! cases to an [`adjudicator::Adjudicator`].
//!
//! The core never fails for data-quality problems: every input video produces
//! exactly one output entry, matched or unmatched-with-diagnostics.

pub mod adjudicator;
pub mod decide;
pub mod engine;
pub mod normalize;
pub mod score;
pub mod select;
pub mod types;

pub use adjudicator::{Adjudicator, AdjudicatorConfidence, AdjudicatorDecision};
pub use decide::{decide, Decision, DecisionPolicy};
pub use engine::Matcher;
pub use score::{score, ScoreBreakdown, ScoreWeights, ScoredCandidate};
pub use types::{
    CongressEvent, MatchMethod, MatchReport, MatchResult, ReportMetadata, UnmatchedVideo,
    VideoRecord,
};
