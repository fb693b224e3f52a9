#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

//! Language-model adjudication of ambiguous matches.
//!
//! Sends one video and its candidate events to an OpenAI-compatible
//! chat-completions endpoint and parses a structured JSON decision. Any
//! transport or parsing failure is reported as "no decision" — adjudication
//! is an optional assist, never a hard dependency of a matching run.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use gm_match::{
    Adjudicator, AdjudicatorConfidence, AdjudicatorDecision, CongressEvent, VideoRecord,
};
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You match YouTube videos of congressional committee proceedings \
with official Congress.gov events. Be precise and only match if you are confident they refer \
to the same event.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Adjudicator`] backed by a chat-completions endpoint.
pub struct LlmAdjudicator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmAdjudicator {
    /// Create an adjudicator with the default request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url, api_key, model))
    }

    /// Create an adjudicator with a custom `reqwest::Client` (for testing or
    /// custom timeouts).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn request_decision(
        &self,
        video: &VideoRecord,
        candidates: &[CongressEvent],
    ) -> Result<AdjudicatorDecision> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: build_prompt(video, candidates),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("completion API returned {status}: {body}"));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("malformed completion response")?;
        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| anyhow!("completion response had no choices"))?;
        parse_decision(content)
    }
}

#[async_trait]
impl Adjudicator for LlmAdjudicator {
    async fn adjudicate(
        &self,
        video: &VideoRecord,
        candidates: &[CongressEvent],
    ) -> Option<AdjudicatorDecision> {
        if candidates.is_empty() {
            tracing::warn!(video_id = %video.video_id, "adjudication requested with no candidates");
            return None;
        }

        match self.request_decision(video, candidates).await {
            Ok(decision) => {
                tracing::debug!(
                    video_id = %video.video_id,
                    event_id = ?decision.event_id,
                    confidence = ?decision.confidence,
                    "adjudication decision received"
                );
                Some(decision)
            }
            Err(error) => {
                tracing::warn!(
                    video_id = %video.video_id,
                    error = %error,
                    "adjudication failed, treating as no decision"
                );
                None
            }
        }
    }
}

/// Build the user prompt: the video on top, numbered candidates below.
fn build_prompt(video: &VideoRecord, candidates: &[CongressEvent]) -> String {
    let mut candidates_text = String::new();
    for (i, event) in candidates.iter().enumerate() {
        candidates_text.push_str(&format!(
            "\n{}. Congress Event ID: {}\n   Date: {}\n   Title: {}\n   Type: {}\n   Committee: {}\n",
            i + 1,
            event.event_id,
            event
                .date
                .map_or_else(|| "Unknown".to_string(), |d| d.to_string()),
            event.title,
            event.event_type,
            event.committee_name,
        ));
    }

    format!(
        "You are matching YouTube videos of congressional committee events with official \
Congress records.\n\n\
YouTube Video:\n\
- Date: {}\n\
- Title: {}\n\n\
Potential Congress Matches:\n{}\n\
Which Congress event (if any) matches this YouTube video? Consider:\n\
1. Dates should be the same or very close (within a few days)\n\
2. Titles should refer to the same event (even if worded differently)\n\
3. \"Full Committee Markup\" on YouTube likely matches any \"Markup\" event on the same day\n\
4. Sometimes YouTube titles are more descriptive than Congress titles\n\n\
Respond with a JSON object: {{\"congress_event_id\": \"<event id, or null if none match>\", \
\"confidence\": \"high|medium|low\", \"reasoning\": \"<brief explanation>\"}}",
        video
            .date
            .map_or_else(|| "Unknown".to_string(), |d| d.to_string()),
        video.title,
        candidates_text,
    )
}

/// Parse the model's JSON content into a decision.
///
/// Lenient where models commonly deviate (confidence casing, the literal
/// string "null" for a missing ID), strict everywhere else.
fn parse_decision(content: &str) -> Result<AdjudicatorDecision> {
    let raw: RawDecision =
        serde_json::from_str(content).context("completion content was not the expected JSON")?;

    let confidence = match raw.confidence.to_lowercase().as_str() {
        "high" => AdjudicatorConfidence::High,
        "medium" => AdjudicatorConfidence::Medium,
        "low" => AdjudicatorConfidence::Low,
        other => return Err(anyhow!("unrecognized confidence level: {other}")),
    };

    let event_id = raw
        .congress_event_id
        .filter(|id| !id.is_empty() && id != "null");

    Ok(AdjudicatorDecision {
        event_id,
        confidence,
        reasoning: raw.reasoning,
    })
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct RawDecision {
    #[serde(default)]
    congress_event_id: Option<String>,
    confidence: String,
    reasoning: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

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

    #[test]
    fn prompt_numbers_candidates_and_includes_fields() {
        let prompt = build_prompt(&video(), &[candidate("115538"), candidate("115539")]);
        assert!(prompt.contains("- Date: 2024-06-01"));
        assert!(prompt.contains("- Title: Oversight Hearing on XYZ"));
        assert!(prompt.contains("1. Congress Event ID: 115538"));
        assert!(prompt.contains("2. Congress Event ID: 115539"));
        assert!(prompt.contains("Committee: House Energy and Commerce"));
    }

    #[test]
    fn prompt_handles_missing_video_date() {
        let mut v = video();
        v.date = None;
        let prompt = build_prompt(&v, &[candidate("115538")]);
        assert!(prompt.contains("- Date: Unknown"));
    }

    #[test]
    fn parses_positive_decision() {
        let decision = parse_decision(
            r#"{"congress_event_id": "115538", "confidence": "high", "reasoning": "Same date and subject."}"#,
        )
        .unwrap();
        assert_eq!(decision.event_id.as_deref(), Some("115538"));
        assert_eq!(decision.confidence, AdjudicatorConfidence::High);
        assert_eq!(decision.reasoning, "Same date and subject.");
    }

    #[test]
    fn parses_declined_decision() {
        let decision = parse_decision(
            r#"{"congress_event_id": null, "confidence": "low", "reasoning": "No candidate fits."}"#,
        )
        .unwrap();
        assert!(decision.event_id.is_none());
    }

    #[test]
    fn treats_null_string_as_declined() {
        let decision = parse_decision(
            r#"{"congress_event_id": "null", "confidence": "medium", "reasoning": "None match."}"#,
        )
        .unwrap();
        assert!(decision.event_id.is_none());
    }

    #[test]
    fn confidence_casing_is_lenient() {
        let decision = parse_decision(
            r#"{"congress_event_id": "115538", "confidence": "Medium", "reasoning": "Close dates."}"#,
        )
        .unwrap();
        assert_eq!(decision.confidence, AdjudicatorConfidence::Medium);
    }

    #[test]
    fn rejects_unknown_confidence() {
        assert!(parse_decision(
            r#"{"congress_event_id": "115538", "confidence": "certain", "reasoning": "..."}"#,
        )
        .is_err());
    }

    #[test]
    fn rejects_non_json_content() {
        assert!(parse_decision("The best match is event 115538.").is_err());
    }
}
