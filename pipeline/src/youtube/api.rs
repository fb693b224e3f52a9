//! YouTube Data API client.
//!
//! Used when an API key is configured: the search endpoint lists completed
//! live broadcasts per channel, and the videos endpoint hydrates titles,
//! stream times, and durations. Without a key the pipeline falls back to
//! channel feeds (see [`super::feed`]).

use async_trait::async_trait;

use super::types::{SearchPage, VideoItem, VideoListResponse};
use super::YouTubeError;

/// Maximum IDs accepted per videos-endpoint call.
pub const VIDEOS_BATCH_SIZE: usize = 50;

/// Trait for YouTube Data API operations.
#[async_trait]
pub trait YouTubeApiClient: Send + Sync {
    /// One page of completed live broadcasts for a channel, newest first.
    async fn completed_livestreams(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, YouTubeError>;

    /// Full details for up to [`VIDEOS_BATCH_SIZE`] videos.
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoItem>, YouTubeError>;
}

/// HTTP-based implementation of [`YouTubeApiClient`].
pub struct HttpYouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpYouTubeClient {
    /// Create a new client with the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client with a custom `reqwest::Client` (for testing with
    /// custom config).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, YouTubeError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(YouTubeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl YouTubeApiClient for HttpYouTubeClient {
    async fn completed_livestreams(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, YouTubeError> {
        let url = format!("{}/search", self.base_url);
        let mut query = vec![
            ("part", "id".to_string()),
            ("channelId", channel_id.to_string()),
            ("type", "video".to_string()),
            ("eventType", "completed".to_string()),
            ("order", "date".to_string()),
            ("maxResults", "50".to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoItem>, YouTubeError> {
        let url = format!("{}/videos", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                (
                    "part",
                    "snippet,liveStreamingDetails,contentDetails,statistics".to_string(),
                ),
                ("id", video_ids.join(",")),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let response = Self::check(response).await?;
        let list: VideoListResponse = response.json().await?;
        Ok(list.items)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::must_use_candidate)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{SearchPage, VideoItem, YouTubeApiClient, YouTubeError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock implementation of [`YouTubeApiClient`] for unit tests.
    pub struct MockYouTubeClient {
        pages: Mutex<HashMap<String, Vec<SearchPage>>>,
        details: Mutex<Vec<VideoItem>>,
    }

    impl MockYouTubeClient {
        pub fn new() -> Self {
            Self {
                pages: Mutex::new(HashMap::new()),
                details: Mutex::new(Vec::new()),
            }
        }

        /// Queue a search page for `channel_id`; pages are served in order.
        pub fn push_page(&self, channel_id: &str, page: SearchPage) {
            self.pages
                .lock()
                .unwrap()
                .entry(channel_id.to_string())
                .or_default()
                .push(page);
        }

        /// Register a video item served by `video_details`.
        pub fn push_video(&self, item: VideoItem) {
            self.details.lock().unwrap().push(item);
        }
    }

    impl Default for MockYouTubeClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl YouTubeApiClient for MockYouTubeClient {
        async fn completed_livestreams(
            &self,
            channel_id: &str,
            _page_token: Option<&str>,
        ) -> Result<SearchPage, YouTubeError> {
            let mut pages = self.pages.lock().unwrap();
            let queue = pages.entry(channel_id.to_string()).or_default();
            if queue.is_empty() {
                Ok(SearchPage {
                    items: vec![],
                    next_page_token: None,
                })
            } else {
                Ok(queue.remove(0))
            }
        }

        async fn video_details(
            &self,
            video_ids: &[String],
        ) -> Result<Vec<VideoItem>, YouTubeError> {
            let details = self.details.lock().unwrap();
            Ok(details
                .iter()
                .filter(|item| video_ids.contains(&item.id))
                .cloned()
                .collect())
        }
    }
}
