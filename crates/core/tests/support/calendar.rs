use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bookline_core::{CalendarEventSource, CalendarEventWriter, Clock, EventDraft};
use bookline_domain::{BooklineError, CalendarEvent, EventStatus, Result};
use chrono::{DateTime, Utc};

/// In-memory mock for the calendar ports.
///
/// Events written through `CalendarEventWriter` become visible to subsequent
/// fetches, so booking flows observe their own writes the way they would
/// against the real provider.
#[derive(Default, Clone)]
pub struct MockCalendar {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    created: Arc<Mutex<Vec<(String, EventDraft)>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    fail_fetch: Arc<AtomicBool>,
    fail_create: Arc<AtomicBool>,
    next_id: Arc<AtomicU32>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.add_event(start, end, EventStatus::Confirmed);
        self
    }

    pub fn with_cancelled_event(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.add_event(start, end, EventStatus::Cancelled);
        self
    }

    pub fn add_event(&self, start: DateTime<Utc>, end: DateTime<Utc>, status: EventStatus) {
        let mut events = self.events.lock().unwrap();
        let id = format!("seed-{}", events.len() + 1);
        events.push(CalendarEvent {
            id,
            summary: Some("Existing booking".to_string()),
            start,
            end,
            status,
            is_all_day: false,
        });
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<(String, EventDraft)> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarEventSource for MockCalendar {
    async fn fetch_events(
        &self,
        _calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(BooklineError::Network("calendar API unavailable".to_string()));
        }
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.start < time_max && event.end > time_min)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CalendarEventWriter for MockCalendar {
    async fn create_event(&self, calendar_id: &str, draft: &EventDraft) -> Result<String> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(BooklineError::Network("calendar API unavailable".to_string()));
        }
        let id = format!("evt-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.created.lock().unwrap().push((calendar_id.to_string(), draft.clone()));
        self.events.lock().unwrap().push(CalendarEvent {
            id: id.clone(),
            summary: Some(draft.summary.clone()),
            start: draft.start,
            end: draft.end,
            status: EventStatus::Confirmed,
            is_all_day: false,
        });
        Ok(id)
    }

    async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(event_id.to_string());
        self.events.lock().unwrap().retain(|event| event.id != event_id);
        Ok(())
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
