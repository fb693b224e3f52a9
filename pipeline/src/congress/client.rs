//! Congress.gov API client for committee-meeting data.
//!
//! Trait-based HTTP client in the same shape as the other external clients:
//! the trait enables mocking in unit tests and HTTP-level stubbing in
//! integration tests, `HttpCongressClient` does the real calls.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{CommitteeMeeting, MeetingDetailResponse, MeetingPage};

/// Page size for the committee-meeting list endpoint.
pub const LIST_PAGE_SIZE: u32 = 250;

/// Errors that can occur when calling the Congress API.
#[derive(Debug, Error)]
pub enum CongressApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Meeting not found
    #[error("Meeting not found: {0}")]
    NotFound(String),

    /// Request was rate limited (HTTP 429); retry after a pause
    #[error("rate limited by the API")]
    RateLimited,

    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
}

/// Trait for Congress API operations.
#[async_trait]
pub trait CongressApiClient: Send + Sync {
    /// One page of the committee-meeting list for a congress and chamber.
    async fn list_meetings(
        &self,
        congress: u16,
        chamber: &str,
        offset: u32,
    ) -> Result<MeetingPage, CongressApiError>;

    /// Full detail for one committee meeting.
    async fn meeting_detail(
        &self,
        congress: u16,
        chamber: &str,
        event_id: &str,
    ) -> Result<CommitteeMeeting, CongressApiError>;
}

/// HTTP-based implementation of [`CongressApiClient`].
pub struct HttpCongressClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCongressClient {
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

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CongressApiError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CongressApiError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CongressApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CongressApiClient for HttpCongressClient {
    async fn list_meetings(
        &self,
        congress: u16,
        chamber: &str,
        offset: u32,
    ) -> Result<MeetingPage, CongressApiError> {
        let url = format!(
            "{}/committee-meeting/{}/{}",
            self.base_url,
            congress,
            chamber.to_ascii_lowercase()
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.clone()),
                ("format", "json".to_string()),
                ("limit", LIST_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn meeting_detail(
        &self,
        congress: u16,
        chamber: &str,
        event_id: &str,
    ) -> Result<CommitteeMeeting, CongressApiError> {
        let url = format!(
            "{}/committee-meeting/{}/{}/{}",
            self.base_url,
            congress,
            chamber.to_ascii_lowercase(),
            event_id
        );

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("format", "json")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CongressApiError::NotFound(event_id.to_string()));
        }

        let response = Self::check(response).await?;
        let detail: MeetingDetailResponse = response.json().await?;
        Ok(detail.committee_meeting)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{CommitteeMeeting, CongressApiClient, CongressApiError, MeetingPage};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock implementation of [`CongressApiClient`] for unit tests.
    ///
    /// Queue list pages per congress/chamber and register detail records by
    /// event ID; unknown IDs return `NotFound`.
    pub struct MockCongressClient {
        pages: Mutex<HashMap<(u16, String), Vec<MeetingPage>>>,
        details: Mutex<HashMap<String, Vec<Result<CommitteeMeeting, CongressApiError>>>>,
        detail_calls: Mutex<Vec<String>>,
    }

    impl MockCongressClient {
        pub fn new() -> Self {
            Self {
                pages: Mutex::new(HashMap::new()),
                details: Mutex::new(HashMap::new()),
                detail_calls: Mutex::new(Vec::new()),
            }
        }

        /// Queue a list page for `congress`/`chamber`; pages are served in
        /// the order queued.
        pub fn push_page(&self, congress: u16, chamber: &str, page: MeetingPage) {
            self.pages
                .lock()
                .unwrap()
                .entry((congress, chamber.to_string()))
                .or_default()
                .push(page);
        }

        /// Queue the next result for detail fetches of `event_id`.
        pub fn push_detail(&self, event_id: &str, result: Result<CommitteeMeeting, CongressApiError>) {
            self.details
                .lock()
                .unwrap()
                .entry(event_id.to_string())
                .or_default()
                .push(result);
        }

        /// Event IDs passed to `meeting_detail`, in call order.
        pub fn detail_calls(&self) -> Vec<String> {
            self.detail_calls.lock().unwrap().clone()
        }
    }

    impl Default for MockCongressClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CongressApiClient for MockCongressClient {
        async fn list_meetings(
            &self,
            congress: u16,
            chamber: &str,
            _offset: u32,
        ) -> Result<MeetingPage, CongressApiError> {
            let mut pages = self.pages.lock().unwrap();
            let queue = pages.entry((congress, chamber.to_string())).or_default();
            if queue.is_empty() {
                Ok(MeetingPage {
                    meetings: vec![],
                    pagination: None,
                })
            } else {
                Ok(queue.remove(0))
            }
        }

        async fn meeting_detail(
            &self,
            _congress: u16,
            _chamber: &str,
            event_id: &str,
        ) -> Result<CommitteeMeeting, CongressApiError> {
            self.detail_calls.lock().unwrap().push(event_id.to_string());

            let mut details = self.details.lock().unwrap();
            let queue = details.entry(event_id.to_string()).or_default();
            if queue.is_empty() {
                Err(CongressApiError::NotFound(event_id.to_string()))
            } else {
                queue.remove(0)
            }
        }
    }
}
