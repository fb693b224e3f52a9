//! YouTube video fetching: channel feeds and the Data API.

pub mod api;
pub mod dates;
pub mod feed;
pub mod types;

pub use api::{HttpYouTubeClient, YouTubeApiClient};
pub use feed::FeedClient;

use thiserror::Error;

/// Errors from the YouTube fetchers.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
}
