//! Calendar provider trait and factory

use async_trait::async_trait;
use bookline_core::EventDraft;
use bookline_domain::{BooklineError, Result};
use serde::{Deserialize, Serialize};

/// Raw calendar event from the provider API (before parsing)
///
/// `start`/`end` are the provider's strings: RFC 3339 date-times for timed
/// events or bare `YYYY-MM-DD` dates for all-day events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: String,
    pub end: String,
    pub is_all_day: bool,
    pub status: Option<String>,
}

/// Response from a provider fetch_events page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchEventsResponse {
    pub events: Vec<RawCalendarEvent>,
    pub next_page_token: Option<String>,
}

/// Raw calendar API operations implemented per provider
#[async_trait]
pub trait CalendarProviderApi: Send + Sync {
    /// Fetch one page of events.
    async fn fetch_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        query_params: &[(&str, String)],
    ) -> Result<FetchEventsResponse>;

    /// Create an event and return the provider's event identifier.
    async fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        draft: &EventDraft,
    ) -> Result<String>;

    /// Delete an event. Deleting an event that is already gone is not an
    /// error.
    async fn delete_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<()>;
}

/// Create a calendar provider instance by name
pub fn create_provider(provider: &str) -> Result<Box<dyn CalendarProviderApi>> {
    match provider {
        "google" => Ok(Box::new(super::google::GoogleCalendarProvider::new())),
        other => Err(BooklineError::InvalidInput(format!("unknown provider: {}", other))),
    }
}
