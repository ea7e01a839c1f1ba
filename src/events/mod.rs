pub mod google;

pub use google::GoogleApi;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Failures of the event-listing call. Callers decide whether these are
/// fatal; the schedule command logs them once and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("calendar request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("calendar API error {code}: {message}")]
    Api { code: u16, message: String },
}

/// Event start or end, as the API sends it: a full timestamp for timed
/// events, a bare date for all-day events. Neither being present is a
/// malformed response and surfaces when formatting.
#[derive(Debug, Clone, Deserialize)]
pub struct EventTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<DateTime<FixedOffset>>,
    pub date: Option<NaiveDate>,
}

impl EventTime {
    /// 12-hour wall-clock label, in the offset the API supplied. All-day
    /// dates read as midnight.
    pub fn clock_label(&self) -> anyhow::Result<String> {
        if let Some(dt) = self.date_time {
            return Ok(dt.format("%I:%M %p").to_string());
        }
        if let Some(d) = self.date {
            let midnight = d.and_time(NaiveTime::MIN);
            return Ok(midnight.format("%I:%M %p").to_string());
        }
        Err(anyhow::anyhow!("event time has neither dateTime nor date"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attendee {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub entry_point_type: String,
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub summary: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub conference_data: Option<ConferenceData>,
}

impl Event {
    /// First joinable video link in the conference data, if any.
    pub fn video_link(&self) -> Option<&str> {
        self.conference_data.as_ref().and_then(|conf| {
            conf.entry_points
                .iter()
                .find(|entry| entry.entry_point_type == "video")
                .map(|entry| entry.uri.as_str())
        })
    }
}

#[async_trait]
pub trait EventSource {
    async fn list_events(
        &self,
        token: &str,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<Event>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_timed_event() {
        let raw = r#"{
            "id": "abc123",
            "summary": "Standup",
            "start": { "dateTime": "2023-03-01T09:30:00-05:00" },
            "end": { "dateTime": "2023-03-01T09:45:00-05:00" },
            "attendees": [
                { "email": "a@example.com", "responseStatus": "accepted" },
                { "email": "b@example.com" }
            ],
            "location": "Room 4",
            "conferenceData": {
                "entryPoints": [
                    { "entryPointType": "phone", "uri": "tel:+1-555-0100" },
                    { "entryPointType": "video", "uri": "https://meet.example.com/abc" },
                    { "entryPointType": "video", "uri": "https://meet.example.com/second" }
                ]
            }
        }"#;

        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.summary.as_deref(), Some("Standup"));
        assert_eq!(event.start.clock_label().unwrap(), "09:30 AM");
        assert_eq!(event.end.clock_label().unwrap(), "09:45 AM");
        assert_eq!(event.attendees.len(), 2);
        assert_eq!(event.attendees[1].email, "b@example.com");
        // first video entry wins, later ones are ignored
        assert_eq!(event.video_link(), Some("https://meet.example.com/abc"));
    }

    #[test]
    fn deserializes_all_day_event() {
        let raw = r#"{
            "id": "allday",
            "summary": "Conference",
            "start": { "date": "2023-03-01" },
            "end": { "date": "2023-03-02" }
        }"#;

        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.start.clock_label().unwrap(), "12:00 AM");
        assert!(event.attendees.is_empty());
        assert!(event.video_link().is_none());
    }

    #[test]
    fn empty_event_time_is_an_error() {
        let time = EventTime {
            date_time: None,
            date: None,
        };
        assert!(time.clock_label().is_err());
    }

    #[test]
    fn video_link_skips_other_entry_point_types() {
        let raw = r#"{
            "id": "novideo",
            "summary": "Call",
            "start": { "dateTime": "2023-03-01T10:00:00Z" },
            "end": { "dateTime": "2023-03-01T11:00:00Z" },
            "conferenceData": {
                "entryPoints": [
                    { "entryPointType": "phone", "uri": "tel:+1-555-0100" },
                    { "entryPointType": "sip", "uri": "sip:123@example.com" }
                ]
            }
        }"#;

        let event: Event = serde_json::from_str(raw).unwrap();
        assert!(event.video_link().is_none());
    }
}
