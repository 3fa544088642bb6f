//! Google Calendar provider implementation

use async_trait::async_trait;
use bookline_core::EventDraft;
use bookline_domain::{BooklineError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{CalendarProviderApi, FetchEventsResponse, RawCalendarEvent};
use crate::errors::InfraError;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar provider
pub struct GoogleCalendarProvider {
    http: Client,
    base_url: String,
}

impl GoogleCalendarProvider {
    pub fn new() -> Self {
        Self { http: Client::new(), base_url: GOOGLE_CALENDAR_API_BASE.to_string() }
    }

    /// Point the provider at a different API base (test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { http: Client::new(), base_url: base_url.into() }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.base_url, calendar_id)
    }
}

impl Default for GoogleCalendarProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarProviderApi for GoogleCalendarProvider {
    async fn fetch_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        query_params: &[(&str, String)],
    ) -> Result<FetchEventsResponse> {
        let response = self
            .http
            .get(self.events_url(calendar_id))
            .bearer_auth(access_token)
            .query(query_params)
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text =
                response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(BooklineError::Network(format!(
                "Google API error ({}): {}",
                status, error_text
            )));
        }

        let google_response: GoogleEventsResponse =
            response.json().await.map_err(InfraError::from)?;

        let events = google_response
            .items
            .into_iter()
            .map(|GoogleCalendarEvent { id, summary, status, start, end }| {
                let is_all_day = start.date.is_some();
                RawCalendarEvent {
                    id,
                    summary: summary.filter(|s| !s.trim().is_empty()),
                    start: start.date_time.or(start.date).unwrap_or_default(),
                    end: end.date_time.or(end.date).unwrap_or_default(),
                    is_all_day,
                    status,
                }
            })
            .collect();

        Ok(FetchEventsResponse { events, next_page_token: google_response.next_page_token })
    }

    async fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<String> {
        let body = GoogleEventInsert {
            summary: draft.summary.clone(),
            description: draft.description.clone(),
            start: GoogleEventTime { date_time: draft.start.to_rfc3339() },
            end: GoogleEventTime { date_time: draft.end.to_rfc3339() },
            attendees: draft
                .attendee_email
                .iter()
                .map(|email| GoogleAttendee { email: email.clone() })
                .collect(),
        };

        let response = self
            .http
            .post(self.events_url(calendar_id))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text =
                response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(BooklineError::Network(format!(
                "Google API error ({}): {}",
                status, error_text
            )));
        }

        let created: GoogleCreatedEvent = response.json().await.map_err(InfraError::from)?;
        Ok(created.id)
    }

    async fn delete_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<()> {
        let url = format!("{}/{}", self.events_url(calendar_id), event_id);
        let response =
            self.http.delete(url).bearer_auth(access_token).send().await.map_err(InfraError::from)?;

        // 404/410 mean the event is already gone, which is the desired state.
        if response.status().is_success()
            || response.status() == StatusCode::NOT_FOUND
            || response.status() == StatusCode::GONE
        {
            return Ok(());
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
        Err(BooklineError::Network(format!("Google API error ({}): {}", status, error_text)))
    }
}

#[derive(Debug, Deserialize)]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarEvent {
    id: String,
    summary: Option<String>,
    status: Option<String>,
    // Cancelled occurrences can arrive without time fields.
    #[serde(default)]
    start: EventDateTime,
    #[serde(default)]
    end: EventDateTime,
}

#[derive(Debug, Default, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Serialize)]
struct GoogleEventInsert {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start: GoogleEventTime,
    end: GoogleEventTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<GoogleAttendee>,
}

#[derive(Debug, Serialize)]
struct GoogleEventTime {
    #[serde(rename = "dateTime")]
    date_time: String,
}

#[derive(Debug, Serialize)]
struct GoogleAttendee {
    email: String,
}

#[derive(Debug, Deserialize)]
struct GoogleCreatedEvent {
    id: String,
}
