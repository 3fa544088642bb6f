//! Scheduling port interfaces

use async_trait::async_trait;
use bookline_domain::{CalendarEvent, Result};
use chrono::{DateTime, Utc};

/// Read-side access to an agent's external calendar.
///
/// Implementations must return events overlapping `[time_min, time_max]` in
/// ascending start order, with recurring series expanded into single events.
/// Cancelled events are returned as-is; the engine filters them.
#[async_trait]
pub trait CalendarEventSource: Send + Sync {
    async fn fetch_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;
}

/// Wall-clock source
///
/// Injected so notice/advance policy boundaries are deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
