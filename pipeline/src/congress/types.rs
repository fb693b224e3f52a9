//! Data types for Congress.gov API responses.

use chrono::NaiveDate;
use gm_match::CongressEvent;
use serde::{Deserialize, Serialize};

/// One entry in the committee-meeting list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRef {
    /// Event identifier (e.g., "115538").
    pub event_id: String,
    pub congress: u16,
    pub chamber: String,
    /// Detail URL as returned by the API.
    #[serde(default)]
    pub url: Option<String>,
}

/// Response page from the committee-meeting list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingPage {
    #[serde(rename = "committeeMeetings", default)]
    pub meetings: Vec<MeetingRef>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
}

/// Response envelope from the committee-meeting detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingDetailResponse {
    #[serde(rename = "committeeMeeting")]
    pub committee_meeting: CommitteeMeeting,
}

/// Detailed committee-meeting record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeMeeting {
    pub event_id: String,
    #[serde(default)]
    pub congress: Option<u16>,
    #[serde(default)]
    pub chamber: Option<String>,
    /// Timestamp string such as "2024-03-05T14:00:00Z".
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub meeting_type: Option<String>,
    #[serde(default)]
    pub meeting_status: Option<String>,
    #[serde(default)]
    pub committees: Vec<CommitteeRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub system_code: Option<String>,
}

impl CommitteeMeeting {
    /// Calendar date of the meeting, when the timestamp parses.
    #[must_use]
    pub fn event_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
    }

    /// Convert into the canonical event record, attributed to `committee`.
    ///
    /// `fallback_congress` covers detail responses that omit the congress
    /// number (the caller knows which session it asked for).
    #[must_use]
    pub fn into_event(self, committee: &CommitteeRef, fallback_congress: u16) -> CongressEvent {
        let date = self.event_date();
        CongressEvent {
            event_id: self.event_id,
            congress: self.congress.unwrap_or(fallback_congress),
            chamber: self.chamber,
            title: self.title.unwrap_or_default(),
            date,
            committee_name: committee.name.clone(),
            committee_code: committee.system_code.clone(),
            event_type: self.meeting_type.unwrap_or_default(),
            status: self.meeting_status.unwrap_or_default(),
        }
    }
}
