//! Committee-meeting collection: paging, filtering, and checkpointing.
//!
//! Walks the committee-meeting list for each configured congress and
//! chamber, fetches per-event detail, and keeps the streamable subset:
//! hearings and markups that were not postponed or cancelled. Detail
//! fetches are checkpointed so an interrupted run resumes where it left
//! off instead of re-fetching thousands of records.

use std::collections::HashSet;
use std::time::Duration;

use gm_match::CongressEvent;

use super::client::{CongressApiClient, CongressApiError};
use super::types::{CommitteeMeeting, CommitteeRef};
use crate::config::{CongressConfig, FetchConfig};
use crate::progress::{ProgressState, ProgressStore};

/// Meeting types worth matching against videos.
const STREAMABLE_TYPES: [&str; 2] = ["Hearing", "Markup"];

/// Statuses that mean the meeting never happened.
const DEAD_STATUSES: [&str; 3] = ["Postponed", "Cancelled", "Canceled"];

/// Collects and filters committee-meeting events.
pub struct EventCollector<'a> {
    client: &'a dyn CongressApiClient,
    store: &'a dyn ProgressStore,
    congress: &'a CongressConfig,
    fetch: &'a FetchConfig,
}

impl<'a> EventCollector<'a> {
    pub fn new(
        client: &'a dyn CongressApiClient,
        store: &'a dyn ProgressStore,
        congress: &'a CongressConfig,
        fetch: &'a FetchConfig,
    ) -> Self {
        Self {
            client,
            store,
            congress,
            fetch,
        }
    }

    /// Fetch all configured congresses and chambers.
    ///
    /// Returns the deduplicated event set, sorted newest-first. Individual
    /// fetch failures reduce the dataset and are logged; they never abort
    /// the run.
    ///
    /// # Errors
    /// Returns an error only when the checkpoint store fails.
    pub async fn collect(&self) -> anyhow::Result<Vec<CongressEvent>> {
        let mut state = self.store.load()?.unwrap_or_default();
        if !state.processed_ids.is_empty() {
            tracing::info!(
                processed = state.processed_ids.len(),
                events = state.events.len(),
                "resuming from checkpoint"
            );
        }

        for &congress in &self.congress.congresses {
            if state.completed_congresses.contains(&congress) {
                tracing::info!(congress, "already processed, skipping");
                continue;
            }

            for chamber in &self.congress.chambers {
                self.collect_chamber(congress, chamber, &mut state).await?;
            }

            state.completed_congresses.push(congress);
            self.store.save(&state)?;
        }

        let mut events = dedupe_events(state.events.clone());
        sort_events_newest_first(&mut events);
        tracing::info!(total = events.len(), "event collection complete");
        Ok(events)
    }

    async fn collect_chamber(
        &self,
        congress: u16,
        chamber: &str,
        state: &mut ProgressState,
    ) -> anyhow::Result<()> {
        tracing::info!(congress, chamber, "listing committee meetings");
        let refs = self.list_all_meetings(congress, chamber).await;

        let to_process: Vec<_> = refs
            .into_iter()
            .filter(|id| !state.processed_ids.contains(id))
            .collect();
        tracing::info!(congress, chamber, remaining = to_process.len(), "fetching details");

        let mut kept = 0_usize;
        let mut errors = 0_usize;
        for (position, event_id) in to_process.iter().enumerate() {
            match self.detail_with_retry(congress, chamber, event_id).await {
                Ok(meeting) => {
                    if let Some(committee) = self.keep_meeting(&meeting) {
                        state.events.push(meeting.into_event(&committee, congress));
                        kept += 1;
                    }
                    state.processed_ids.insert(event_id.clone());
                }
                Err(CongressApiError::NotFound(_)) => {
                    // Definitive answer; no point refetching on resume.
                    state.processed_ids.insert(event_id.clone());
                }
                Err(error) => {
                    errors += 1;
                    tracing::warn!(event_id = %event_id, error = %error, "detail fetch failed, skipping");
                }
            }

            if (position + 1) % self.fetch.checkpoint_every == 0 {
                self.store.save(state)?;
                tracing::debug!(processed = position + 1, "checkpoint saved");
            }
            self.throttle().await;
        }

        tracing::info!(congress, chamber, kept, errors, "chamber complete");
        self.store.save(state)?;
        Ok(())
    }

    /// Page through the full meeting list for one congress and chamber.
    /// Failures end the listing early with whatever was gathered.
    async fn list_all_meetings(&self, congress: u16, chamber: &str) -> Vec<String> {
        let mut ids = Vec::new();
        let mut offset = 0_u32;
        let mut retries = 0_u32;

        loop {
            match self.client.list_meetings(congress, chamber, offset).await {
                Ok(page) => {
                    retries = 0;
                    #[allow(clippy::cast_possible_truncation)]
                    let fetched = page.meetings.len() as u32;
                    ids.extend(page.meetings.into_iter().map(|m| m.event_id));
                    let has_next = page
                        .pagination
                        .as_ref()
                        .and_then(|p| p.next.as_ref())
                        .is_some();
                    if fetched == 0 || !has_next {
                        break;
                    }
                    offset += fetched;
                }
                Err(CongressApiError::RateLimited) if retries < self.fetch.max_retries => {
                    retries += 1;
                    tracing::warn!(congress, chamber, retries, "rate limited while listing, pausing");
                    tokio::time::sleep(Duration::from_secs(self.fetch.retry_wait_secs)).await;
                }
                Err(error) => {
                    tracing::warn!(
                        congress,
                        chamber,
                        error = %error,
                        gathered = ids.len(),
                        "listing failed, continuing with partial list"
                    );
                    break;
                }
            }
            self.throttle().await;
        }

        ids
    }

    async fn detail_with_retry(
        &self,
        congress: u16,
        chamber: &str,
        event_id: &str,
    ) -> Result<CommitteeMeeting, CongressApiError> {
        let mut attempts = 0_u32;
        loop {
            match self.client.meeting_detail(congress, chamber, event_id).await {
                Err(CongressApiError::RateLimited) if attempts < self.fetch.max_retries => {
                    attempts += 1;
                    tracing::warn!(event_id, attempts, "rate limited, pausing before retry");
                    tokio::time::sleep(Duration::from_secs(self.fetch.retry_wait_secs)).await;
                }
                other => return other,
            }
        }
    }

    fn keep_meeting(&self, meeting: &CommitteeMeeting) -> Option<CommitteeRef> {
        keep_meeting(meeting, &self.congress.committee_filter)
    }

    async fn throttle(&self) {
        if self.fetch.throttle_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.fetch.throttle_ms)).await;
        }
    }
}

/// Decide whether a meeting is worth keeping, and under which committee.
///
/// Kept meetings are hearings or markups, not postponed or cancelled, not
/// business meetings, from a committee matching every filter word (any
/// committee when the filter is empty).
fn keep_meeting(meeting: &CommitteeMeeting, committee_filter: &[String]) -> Option<CommitteeRef> {
    let committee = matching_committee(meeting, committee_filter)?;

    let meeting_type = meeting.meeting_type.as_deref().unwrap_or_default();
    if !STREAMABLE_TYPES.contains(&meeting_type) {
        return None;
    }

    let status = meeting.meeting_status.as_deref().unwrap_or_default();
    if DEAD_STATUSES.contains(&status) {
        return None;
    }

    let title = meeting.title.as_deref().unwrap_or_default().to_lowercase();
    if title.contains("business meeting") {
        return None;
    }

    Some(committee)
}

fn matching_committee(
    meeting: &CommitteeMeeting,
    committee_filter: &[String],
) -> Option<CommitteeRef> {
    if committee_filter.is_empty() {
        return Some(meeting.committees.first().cloned().unwrap_or(CommitteeRef {
            name: String::new(),
            system_code: None,
        }));
    }
    meeting
        .committees
        .iter()
        .find(|c| {
            let name = c.name.to_lowercase();
            committee_filter
                .iter()
                .all(|word| name.contains(&word.to_lowercase()))
        })
        .cloned()
}

/// Drop repeated event IDs, keeping the first occurrence.
fn dedupe_events(events: Vec<CongressEvent>) -> Vec<CongressEvent> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|e| seen.insert(e.event_id.clone()))
        .collect()
}

/// Newest first; undated events sink to the end.
fn sort_events_newest_first(events: &mut [CongressEvent]) {
    events.sort_by(|a, b| b.date.cmp(&a.date));
}
