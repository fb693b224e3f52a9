//! End-to-end matching scenarios through the engine.

use chrono::NaiveDate;
use gm_match::adjudicator::mock::MockAdjudicator;
use gm_match::{
    AdjudicatorConfidence, AdjudicatorDecision, CongressEvent, MatchMethod, Matcher, VideoRecord,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn video(id: &str, title: &str, d: Option<&str>) -> VideoRecord {
    VideoRecord {
        video_id: id.into(),
        title: title.into(),
        date: d.map(date),
        url: format!("https://www.youtube.com/watch?v={id}"),
    }
}

fn event(id: &str, title: &str, event_type: &str, d: Option<&str>) -> CongressEvent {
    CongressEvent {
        event_id: id.into(),
        congress: 118,
        chamber: Some("House".into()),
        title: title.into(),
        date: d.map(date),
        committee_name: "House Energy and Commerce".into(),
        committee_code: Some("hsif00".into()),
        event_type: event_type.into(),
        status: "Scheduled".into(),
    }
}

/// Same committee, same day, formulaic titles: accepted without adjudication.
#[tokio::test]
async fn same_day_markup_is_matched_algorithmically() {
    let videos = [video(
        "v1",
        "Full Committee Markup of H.R. 1234",
        Some("2024-03-05"),
    )];
    let events = [event("e1", "Markup", "Markup", Some("2024-03-05"))];

    let report = Matcher::default().run(&videos, &events, None).await;

    assert_eq!(report.matches.len(), 1);
    assert!(report.unmatched.is_empty());
    let m = &report.matches[0];
    assert_eq!(m.event_id, "e1");
    assert_eq!(m.method, MatchMethod::Algorithmic);
    assert!(m.score >= 0.7, "score was {}", m.score);
    assert!(m.reasons.iter().any(|r| r.starts_with("Exact date match")));
    assert_eq!(
        m.event_url,
        "https://www.congress.gov/event/118th-congress/house-event/e1"
    );
}

/// Date plus title drives the ranking, not date alone: a two-day-old event
/// with the right title beats a one-day-old event with an unrelated title.
#[tokio::test]
async fn title_similarity_outranks_closer_date() {
    let videos = [video("v1", "Oversight Hearing on XYZ", Some("2024-06-01"))];
    let events = [
        event("similar", "XYZ Oversight", "Hearing", Some("2024-05-30")),
        event("closer", "Unrelated Markup", "Markup", Some("2024-06-02")),
    ];

    // The winner lands in the ambiguous band, so run with an adjudicator
    // and verify both events were in the referral window.
    let adjudicator = MockAdjudicator::new();
    adjudicator.push_decision(Some(AdjudicatorDecision {
        event_id: Some("similar".into()),
        confidence: AdjudicatorConfidence::High,
        reasoning: "Same subject, official date two days before the stream.".into(),
    }));

    let report = Matcher::default()
        .run(&videos, &events, Some(&adjudicator))
        .await;

    let calls = adjudicator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, vec!["similar".to_string(), "closer".to_string()]);

    assert_eq!(report.matches.len(), 1);
    let m = &report.matches[0];
    assert_eq!(m.event_id, "similar");
    assert_eq!(m.method, MatchMethod::Adjudicated);
    assert_eq!(m.adjudicator_confidence, Some(AdjudicatorConfidence::High));
    assert!(m.adjudicator_reasoning.is_some());
}

/// An undated video falls back to full-set scoring; a weak title-only score
/// stays below the referral band, so the adjudicator is never consulted.
#[tokio::test]
async fn undated_video_falls_back_to_full_set() {
    let videos = [video("v1", "FTC Privacy Hearing", None)];
    let events = [event(
        "e1",
        "Federal Trade Commission: Strengthening Protections for Privacy",
        "Hearing",
        Some("2024-04-17"),
    )];

    let adjudicator = MockAdjudicator::new();
    let report = Matcher::default()
        .run(&videos, &events, Some(&adjudicator))
        .await;

    assert!(adjudicator.calls().is_empty());
    assert_eq!(report.unmatched.len(), 1);
    let u = &report.unmatched[0];
    assert!(u.best_score > 0.0);
    assert_eq!(
        u.best_match_title.as_deref(),
        Some("Federal Trade Commission: Strengthening Protections for Privacy")
    );
}

/// Nothing near in date, nothing similar in title: still one diagnostic
/// entry, never a silent drop.
#[tokio::test]
async fn hopeless_video_keeps_diagnostics() {
    let videos = [video("v1", "Annual Holiday Greeting", Some("2024-12-20"))];
    let events = [
        event("e1", "Spectrum Auctions", "Hearing", Some("2024-03-05")),
        event("e2", "Pipeline Safety", "Hearing", Some("2024-04-11")),
    ];

    let report = Matcher::default().run(&videos, &events, None).await;

    assert!(report.matches.is_empty());
    assert_eq!(report.unmatched.len(), 1);
    let u = &report.unmatched[0];
    assert!(u.best_match_title.is_some());
    // Distant dates are penalized, so the diagnostic score goes negative.
    assert!(u.best_score < 0.0);
}

/// An adjudicator that fails to decide leaves the video unmatched with
/// diagnostics; the run itself is unaffected.
#[tokio::test]
async fn adjudicator_failure_is_recoverable() {
    let videos = [video("v1", "Oversight Hearing on XYZ", Some("2024-06-01"))];
    let events = [event("e1", "XYZ Oversight", "Hearing", Some("2024-05-30"))];

    let adjudicator = MockAdjudicator::new();
    adjudicator.push_decision(None);

    let report = Matcher::default()
        .run(&videos, &events, Some(&adjudicator))
        .await;

    assert_eq!(adjudicator.calls().len(), 1);
    assert!(report.matches.is_empty());
    assert_eq!(report.unmatched.len(), 1);
    assert!(report.unmatched[0].best_score > 0.0);
}

/// An adjudicator naming an event that was never referred is treated as
/// declining.
#[tokio::test]
async fn adjudicator_cannot_pick_unreferred_events() {
    let videos = [video("v1", "Oversight Hearing on XYZ", Some("2024-06-01"))];
    let events = [event("e1", "XYZ Oversight", "Hearing", Some("2024-05-30"))];

    let adjudicator = MockAdjudicator::new();
    adjudicator.push_decision(Some(AdjudicatorDecision {
        event_id: Some("never-referred".into()),
        confidence: AdjudicatorConfidence::High,
        reasoning: "Hallucinated identifier.".into(),
    }));

    let report = Matcher::default()
        .run(&videos, &events, Some(&adjudicator))
        .await;

    assert!(report.matches.is_empty());
    assert_eq!(report.unmatched.len(), 1);
}

/// One output entry per input video, with input order preserved.
#[tokio::test]
async fn every_video_gets_exactly_one_entry() {
    let videos = [
        video("match-1", "Full Committee Markup of H.R. 1234", Some("2024-03-05")),
        video("miss-1", "Annual Holiday Greeting", Some("2024-12-20")),
        video("match-2", "Markup of H.R. 99", Some("2024-04-11")),
        video("miss-2", "Channel Trailer", None),
    ];
    let events = [
        event("e1", "Markup", "Markup", Some("2024-03-05")),
        event("e2", "Markup of H.R. 99", "Markup", Some("2024-04-11")),
    ];

    let report = Matcher::default().run(&videos, &events, None).await;

    assert_eq!(
        report.matches.len() + report.unmatched.len(),
        videos.len(),
        "exactly one entry per video"
    );
    assert_eq!(report.metadata.total_videos, videos.len());
    assert_eq!(report.metadata.matched, report.matches.len());
    assert_eq!(report.metadata.unmatched, report.unmatched.len());

    let matched_ids: Vec<&str> = report.matches.iter().map(|m| m.video_id.as_str()).collect();
    let unmatched_ids: Vec<&str> = report
        .unmatched
        .iter()
        .map(|u| u.video_id.as_str())
        .collect();
    assert_eq!(matched_ids, vec!["match-1", "match-2"]);
    assert_eq!(unmatched_ids, vec!["miss-1", "miss-2"]);
}

/// The report round-trips through serde unchanged.
#[tokio::test]
async fn report_serializes_round_trip() {
    let videos = [video("v1", "Full Committee Markup of H.R. 1234", Some("2024-03-05"))];
    let events = [event("e1", "Markup", "Markup", Some("2024-03-05"))];

    let report = Matcher::default().run(&videos, &events, None).await;
    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: gm_match::MatchReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
