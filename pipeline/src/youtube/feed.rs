//! Channel feed fetching — no API key required.
//!
//! YouTube publishes an Atom feed of recent uploads per channel. The entry
//! fields we need are flat tagged values, extracted with regular
//! expressions rather than a full XML parse. Feeds carry no live-broadcast
//! metadata, so a keyword heuristic labels which videos look like committee
//! proceedings.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::dates::date_from_timestamp;
use super::YouTubeError;

/// Title/description keywords that suggest a committee proceeding.
const LIVESTREAM_KEYWORDS: [&str; 14] = [
    "hearing",
    "meeting",
    "briefing",
    "markup",
    "committee",
    "subcommittee",
    "live",
    "stream",
    "session",
    "conference",
    "testimony",
    "witnesses",
    "oversight",
    "investigation",
];

#[allow(clippy::unwrap_used)]
static ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry>(.*?)</entry>").unwrap());
#[allow(clippy::unwrap_used)]
static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<yt:videoId>([A-Za-z0-9_-]+)</yt:videoId>").unwrap());
#[allow(clippy::unwrap_used)]
static TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<title>([^<]*)</title>").unwrap());
#[allow(clippy::unwrap_used)]
static PUBLISHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<published>([^<]+)</published>").unwrap());
#[allow(clippy::unwrap_used)]
static MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\b")
        .unwrap()
});

/// One entry extracted from a channel feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub video_id: String,
    pub title: String,
    pub published: Option<NaiveDate>,
}

impl FeedEntry {
    /// Canonical watch URL for this entry.
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Heuristic label for how likely a video is a proceeding livestream,
/// used when authoritative live-broadcast metadata is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LivestreamConfidence {
    High,
    Medium,
}

/// Label a title: `None` means "does not look like a proceeding".
///
/// A procedural keyword makes a video a candidate; committee livestream
/// titles usually lead with the meeting date, so a month name upgrades the
/// label to high.
#[must_use]
pub fn livestream_confidence(title: &str) -> Option<LivestreamConfidence> {
    let lower = title.to_lowercase();
    if !LIVESTREAM_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }
    if MONTH_NAME.is_match(&lower) {
        Some(LivestreamConfidence::High)
    } else {
        Some(LivestreamConfidence::Medium)
    }
}

/// Extract entries from a feed document.
///
/// Entries missing a video ID or title are skipped; a malformed document
/// simply yields fewer entries.
#[must_use]
pub fn parse_feed(xml: &str) -> Vec<FeedEntry> {
    ENTRY
        .captures_iter(xml)
        .filter_map(|entry| {
            let body = &entry[1];
            let video_id = VIDEO_ID.captures(body)?[1].to_string();
            let title = unescape_xml(&TITLE.captures(body)?[1]);
            let published = PUBLISHED
                .captures(body)
                .and_then(|c| date_from_timestamp(&c[1]));
            Some(FeedEntry {
                video_id,
                title,
                published,
            })
        })
        .collect()
}

/// Undo the escaping YouTube applies to title text.
fn unescape_xml(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
}

/// Fetches channel feeds over HTTP.
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a feed client against the given base URL (the production
    /// value is `https://www.youtube.com/feeds/videos.xml`).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch and parse the feed for one channel.
    ///
    /// # Errors
    /// Returns an error when the request fails or the server responds with
    /// a non-success status.
    pub async fn fetch(&self, channel_id: &str) -> Result<Vec<FeedEntry>, YouTubeError> {
        let url = format!(
            "{}?channel_id={}",
            self.base_url,
            urlencoding::encode(channel_id)
        );
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(YouTubeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(parse_feed(&body))
    }
}
