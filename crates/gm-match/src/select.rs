//! Candidate selection by date window.
//!
//! Scoring every video against every event is wasteful: the official date
//! and the publish date almost always sit within a few days of each other.
//! A date index is built once per run, and each video only scores the events
//! in a small window around its own date. Undated videos, or windows that
//! come up empty, fall back to the full event set — costly but
//! correctness-preserving.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::types::CongressEvent;

/// Days before the video date included in the window. The official date
/// usually precedes or equals the publish date.
pub const WINDOW_BEFORE_DAYS: i64 = 3;

/// Days after the video date included in the window. The official date
/// rarely follows the publish date by more than a day.
pub const WINDOW_AFTER_DAYS: i64 = 1;

/// Events indexed by date, by position in the source slice.
#[derive(Debug)]
pub struct EventIndex {
    by_date: HashMap<NaiveDate, Vec<usize>>,
}

impl EventIndex {
    /// Build the index once per matching run.
    #[must_use]
    pub fn build(events: &[CongressEvent]) -> Self {
        let mut by_date: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
        for (index, event) in events.iter().enumerate() {
            if let Some(date) = event.date {
                by_date.entry(date).or_default().push(index);
            }
        }
        Self { by_date }
    }

    /// Candidate event indexes for a video date: events dated within
    /// `[date - WINDOW_BEFORE_DAYS, date + WINDOW_AFTER_DAYS]`, in source
    /// order.
    ///
    /// Returns `None` when the video has no date or the window holds no
    /// events; callers fall back to scoring the full set.
    #[must_use]
    pub fn candidates(&self, video_date: Option<NaiveDate>) -> Option<Vec<usize>> {
        let video_date = video_date?;
        let mut indexes = Vec::new();
        for offset in -WINDOW_BEFORE_DAYS..=WINDOW_AFTER_DAYS {
            let day = video_date + Duration::days(offset);
            if let Some(found) = self.by_date.get(&day) {
                indexes.extend_from_slice(found);
            }
        }
        if indexes.is_empty() {
            return None;
        }
        indexes.sort_unstable();
        Some(indexes)
    }
}
