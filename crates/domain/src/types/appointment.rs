//! Persisted appointment records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BooklineError;

/// Lifecycle status of a booked appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Rescheduled,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    /// Stable string form used for database storage.
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BooklineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "rescheduled" => Ok(AppointmentStatus::Rescheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "no_show" => Ok(AppointmentStatus::NoShow),
            other => {
                Err(BooklineError::InvalidInput(format!("unknown appointment status: {}", other)))
            }
        }
    }
}

/// Booked appointment, linked to the originating conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub agent_id: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// External calendar event backing this appointment, when one was created.
    pub calendar_event_id: Option<String>,
    pub conversation_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Create a freshly scheduled appointment with a new v7 identifier.
    pub fn scheduled(
        agent_id: impl Into<String>,
        attendee_name: impl Into<String>,
        attendee_email: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            agent_id: agent_id.into(),
            attendee_name: attendee_name.into(),
            attendee_email: attendee_email.into(),
            start,
            end,
            status: AppointmentStatus::Scheduled,
            calendar_event_id: None,
            conversation_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}
