//! Booking port interfaces

use async_trait::async_trait;
use bookline_domain::{AgentCalendarConfig, Appointment, Result};
use chrono::{DateTime, Utc};

/// Persistence for booked appointments.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> Result<()>;

    /// Earliest appointment for an attendee that is still upcoming and still
    /// on the books (scheduled or rescheduled). Email matching is
    /// case-insensitive.
    async fn find_upcoming_by_email(
        &self,
        agent_id: &str,
        attendee_email: &str,
        after: DateTime<Utc>,
    ) -> Result<Option<Appointment>>;

    async fn update(&self, appointment: &Appointment) -> Result<()>;
}

/// Event to be written to the external calendar when a booking lands.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendee_email: Option<String>,
}

/// Write-side access to an agent's external calendar.
#[async_trait]
pub trait CalendarEventWriter: Send + Sync {
    /// Create an event and return the provider's event identifier.
    async fn create_event(&self, calendar_id: &str, draft: &EventDraft) -> Result<String>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()>;
}

/// Lookup of per-agent calendar configuration.
///
/// `Ok(None)` means the agent has no calendar configured; callers render a
/// "calendar not configured" reply rather than treating it as an error.
#[async_trait]
pub trait AgentCalendarRepository: Send + Sync {
    async fn find_by_agent(&self, agent_id: &str) -> Result<Option<AgentCalendarConfig>>;
}
