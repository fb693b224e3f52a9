//! Data types for YouTube Data API responses.

use chrono::NaiveDate;
use gm_match::VideoRecord;
use serde::{Deserialize, Serialize};

use super::dates::date_from_timestamp;

/// Response page from the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Response envelope from the videos endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

/// One item from the videos endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: Snippet,
    #[serde(default)]
    pub live_streaming_details: Option<LiveStreamingDetails>,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    #[serde(default)]
    pub actual_start_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub view_count: Option<String>,
}

impl VideoItem {
    /// The proceeding date: actual stream start when the video was a live
    /// broadcast, publish date otherwise. Streams are usually published the
    /// day they run, but re-uploads can drift, so the stream time wins.
    #[must_use]
    pub fn best_date(&self) -> Option<NaiveDate> {
        self.live_streaming_details
            .as_ref()
            .and_then(|d| d.actual_start_time.as_deref())
            .and_then(date_from_timestamp)
            .or_else(|| {
                self.snippet
                    .published_at
                    .as_deref()
                    .and_then(date_from_timestamp)
            })
    }

    /// Convert into the canonical video record.
    #[must_use]
    pub fn into_record(self) -> VideoRecord {
        let date = self.best_date();
        let url = format!("https://www.youtube.com/watch?v={}", self.id);
        VideoRecord {
            video_id: self.id,
            title: self.snippet.title,
            date,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(published: Option<&str>, stream_start: Option<&str>) -> VideoItem {
        VideoItem {
            id: "abc123".into(),
            snippet: Snippet {
                title: "Oversight Hearing".into(),
                published_at: published.map(String::from),
                channel_id: None,
            },
            live_streaming_details: stream_start.map(|t| LiveStreamingDetails {
                actual_start_time: Some(t.into()),
            }),
            content_details: None,
            statistics: None,
        }
    }

    #[test]
    fn stream_start_beats_publish_date() {
        let video = item(
            Some("2024-03-07T09:00:00Z"),
            Some("2024-03-05T14:00:00Z"),
        );
        assert_eq!(video.best_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn publish_date_is_the_fallback() {
        let video = item(Some("2024-03-07T09:00:00Z"), None);
        assert_eq!(video.best_date(), NaiveDate::from_ymd_opt(2024, 3, 7));
    }

    #[test]
    fn record_conversion_builds_url() {
        let record = item(Some("2024-03-07T09:00:00Z"), None).into_record();
        assert_eq!(record.video_id, "abc123");
        assert_eq!(record.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 7));
    }
}
