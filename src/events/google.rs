use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use super::{Event, EventSource, FetchError};

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars";

#[derive(Deserialize)]
struct GoogleResponse<T> {
    items: Option<Vec<T>>,
    error: Option<GoogleError>,
}

#[derive(Deserialize)]
struct GoogleError {
    code: u16,
    message: String,
}

pub struct GoogleApi {
    client: reqwest::Client,
}

impl GoogleApi {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EventSource for GoogleApi {
    async fn list_events(
        &self,
        token: &str,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<Event>, FetchError> {
        let url = format!("{EVENTS_URL}/{calendar_id}/events");

        let resp: GoogleResponse<Event> = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("timeMin", start_time.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("timeMax", end_time.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("singleEvents", "true".to_owned()),
                ("orderBy", "startTime".to_owned()),
            ])
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = resp.error {
            return Err(FetchError::Api {
                code: err.code,
                message: err.message,
            });
        }

        // orderBy=startTime means the items arrive chronologically; keep
        // the source order rather than re-sorting.
        Ok(resp.items.unwrap_or_default())
    }
}
