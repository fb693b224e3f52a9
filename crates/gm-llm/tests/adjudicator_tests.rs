//! HTTP-level tests for the LLM adjudicator using stubbed responses.

use chrono::NaiveDate;
use gm_llm::LlmAdjudicator;
use gm_match::{Adjudicator, AdjudicatorConfidence, CongressEvent, VideoRecord};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn video() -> VideoRecord {
    VideoRecord {
        video_id: "abc123".into(),
        title: "Oversight Hearing on XYZ".into(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1),
        url: "https://www.youtube.com/watch?v=abc123".into(),
    }
}

fn candidate(id: &str) -> CongressEvent {
    CongressEvent {
        event_id: id.into(),
        congress: 118,
        chamber: Some("House".into()),
        title: "XYZ Oversight".into(),
        date: NaiveDate::from_ymd_opt(2024, 5, 30),
        committee_name: "House Energy and Commerce".into(),
        committee_code: None,
        event_type: "Hearing".into(),
        status: "Scheduled".into(),
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

#[tokio::test]
async fn returns_decision_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"temperature": 0.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"congress_event_id": "115538", "confidence": "high", "reasoning": "Same subject, two days apart."}"#,
        )))
        .mount(&server)
        .await;

    let adjudicator = LlmAdjudicator::new(server.uri(), "test-key", "test-model").unwrap();

    let decision = adjudicator
        .adjudicate(&video(), &[candidate("115538")])
        .await
        .expect("should decide");

    assert_eq!(decision.event_id.as_deref(), Some("115538"));
    assert_eq!(decision.confidence, AdjudicatorConfidence::High);
}

#[tokio::test]
async fn server_error_yields_no_decision() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let adjudicator = LlmAdjudicator::new(server.uri(), "test-key", "test-model").unwrap();

    let decision = adjudicator.adjudicate(&video(), &[candidate("115538")]).await;
    assert!(decision.is_none());
}

#[tokio::test]
async fn unparseable_content_yields_no_decision() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("I think event 115538 is the match.")),
        )
        .mount(&server)
        .await;

    let adjudicator = LlmAdjudicator::new(server.uri(), "test-key", "test-model").unwrap();

    let decision = adjudicator.adjudicate(&video(), &[candidate("115538")]).await;
    assert!(decision.is_none());
}

#[tokio::test]
async fn empty_candidate_list_skips_the_request() {
    // No mock mounted: a request would make the test fail loudly.
    let server = MockServer::start().await;

    let adjudicator = LlmAdjudicator::new(server.uri(), "test-key", "test-model").unwrap();

    let decision = adjudicator.adjudicate(&video(), &[]).await;
    assert!(decision.is_none());

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn timeout_yields_no_decision() {
    use std::time::Duration;

    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(
                    r#"{"congress_event_id": "115538", "confidence": "high", "reasoning": "ok"}"#,
                ))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let adjudicator = LlmAdjudicator::with_client(client, server.uri(), "test-key", "test-model");

    let decision = adjudicator.adjudicate(&video(), &[candidate("115538")]).await;
    assert!(decision.is_none());
}
