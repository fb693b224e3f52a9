//! Congress.gov committee-meeting fetching.

pub mod client;
pub mod collect;
pub mod types;

pub use client::{CongressApiClient, CongressApiError, HttpCongressClient};
pub use collect::EventCollector;
