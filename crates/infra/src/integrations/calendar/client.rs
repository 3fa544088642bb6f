//! Calendar client implementing the core calendar ports
//!
//! Wraps a raw provider API with token provisioning, pagination, and
//! conversion of provider payloads into domain events.

use std::sync::Arc;

use async_trait::async_trait;
use bookline_core::{CalendarEventSource, CalendarEventWriter, EventDraft};
use bookline_domain::constants::EVENT_FETCH_ORDER;
use bookline_domain::{BooklineError, CalendarEvent, EventStatus, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use super::auth::AccessTokenProvider;
use super::providers::{CalendarProviderApi, RawCalendarEvent};

type QueryParam = (&'static str, String);

/// Calendar API client with token management
pub struct CalendarClient {
    provider: Arc<dyn CalendarProviderApi>,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl CalendarClient {
    pub fn new(
        provider: Arc<dyn CalendarProviderApi>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self { provider, tokens }
    }

    fn base_query(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Vec<QueryParam> {
        vec![
            ("singleEvents", "true".to_string()),
            ("orderBy", EVENT_FETCH_ORDER.to_string()),
            ("timeMin", time_min.to_rfc3339()),
            ("timeMax", time_max.to_rfc3339()),
            ("timeZone", "UTC".to_string()),
            (
                "fields",
                "items(id,summary,status,start,end),nextPageToken".to_string(),
            ),
        ]
    }
}

#[async_trait]
impl CalendarEventSource for CalendarClient {
    async fn fetch_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let access_token = self.tokens.access_token(calendar_id).await?;

        debug!(calendar_id, %time_min, %time_max, "fetching events from calendar API");

        let query = Self::base_query(time_min, time_max);
        let mut raw_events = Vec::new();
        let mut page_token: Option<String> = None;

        // Follow pagination until the provider stops returning a cursor.
        loop {
            let mut paged = query.clone();
            if let Some(ref token) = page_token {
                paged.push(("pageToken", token.clone()));
            }

            let response =
                self.provider.fetch_events(&access_token, calendar_id, &paged).await?;
            raw_events.extend(response.events);
            page_token = response.next_page_token;

            if page_token.is_none() {
                break;
            }
        }

        let mut events: Vec<CalendarEvent> =
            raw_events.into_iter().filter_map(convert_raw_event).collect();
        events.sort_by_key(|event| event.start);
        Ok(events)
    }
}

#[async_trait]
impl CalendarEventWriter for CalendarClient {
    async fn create_event(&self, calendar_id: &str, draft: &EventDraft) -> Result<String> {
        let access_token = self.tokens.access_token(calendar_id).await?;
        self.provider.create_event(&access_token, calendar_id, draft).await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let access_token = self.tokens.access_token(calendar_id).await?;
        self.provider.delete_event(&access_token, calendar_id, event_id).await
    }
}

/// Convert a raw provider event into the domain shape.
///
/// Events with unparseable timestamps are dropped with a warning rather than
/// failing the whole fetch; one malformed payload must not block
/// availability for the day.
fn convert_raw_event(raw: RawCalendarEvent) -> Option<CalendarEvent> {
    let parsed = if raw.is_all_day {
        parse_all_day_timestamp(&raw.start)
            .and_then(|start| parse_all_day_timestamp(&raw.end).map(|end| (start, end)))
    } else {
        parse_event_timestamp(&raw.start)
            .and_then(|start| parse_event_timestamp(&raw.end).map(|end| (start, end)))
    };

    match parsed {
        Ok((start, end)) => Some(CalendarEvent {
            id: raw.id,
            summary: raw.summary,
            start,
            end,
            status: parse_status(raw.status.as_deref()),
            is_all_day: raw.is_all_day,
        }),
        Err(error) => {
            warn!(event_id = %raw.id, error = %error, "skipping event with invalid timestamps");
            None
        }
    }
}

fn parse_status(raw: Option<&str>) -> EventStatus {
    match raw {
        Some("cancelled") => EventStatus::Cancelled,
        Some("tentative") => EventStatus::Tentative,
        _ => EventStatus::Confirmed,
    }
}

/// All-day events carry a bare civil date; resolve it to UTC midnight.
fn parse_all_day_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        BooklineError::InvalidInput(format!("invalid all-day date '{}': {}", value, e))
    })?;

    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        BooklineError::InvalidInput(format!("invalid all-day date '{}'", value))
    })?;

    Ok(midnight.and_utc())
}

/// Timed events are RFC 3339; a missing offset is treated as UTC.
fn parse_event_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    let has_explicit_timezone = trimmed.ends_with('Z')
        || trimmed
            .rfind('T')
            .is_some_and(|idx| trimmed[idx + 1..].chars().any(|c| matches!(c, '+' | '-')));

    let candidate = if has_explicit_timezone { trimmed.to_string() } else { format!("{trimmed}Z") };

    DateTime::parse_from_rfc3339(&candidate)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BooklineError::InvalidInput(format!("invalid timestamp '{}': {}", value, e)))
}
