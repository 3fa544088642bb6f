//! Calendar scheduling types
//!
//! Agent-facing calendar configuration plus the transient slot and schedule
//! values produced by the availability engine. Slots are absolute instants so
//! they compare directly against provider event boundaries regardless of the
//! agent timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{BooklineError, Result};

/// Day-of-week entry for an agent's preferred-days allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// Full English name, as spoken to callers.
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = BooklineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(DayOfWeek::Sunday),
            "monday" | "mon" => Ok(DayOfWeek::Monday),
            "tuesday" | "tue" => Ok(DayOfWeek::Tuesday),
            "wednesday" | "wed" => Ok(DayOfWeek::Wednesday),
            "thursday" | "thu" => Ok(DayOfWeek::Thursday),
            "friday" | "fri" => Ok(DayOfWeek::Friday),
            "saturday" | "sat" => Ok(DayOfWeek::Saturday),
            other => Err(BooklineError::InvalidInput(format!("unknown weekday: {}", other))),
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

/// Civil time-of-day (`HH:MM`), independent of date and timezone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };
    /// Last minute of a civil day, used for day-window upper bounds.
    pub const DAY_END: TimeOfDay = TimeOfDay { hour: 23, minute: 59 };

    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(BooklineError::InvalidInput(format!(
                "time of day out of range: {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    pub fn minutes_from_midnight(self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn as_naive_time(self) -> NaiveTime {
        // Validated on construction, so this cannot fail.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = BooklineError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (hour, minute) = trimmed.split_once(':').ok_or_else(|| {
            BooklineError::InvalidInput(format!("time must be formatted as HH:MM, got '{}'", s))
        })?;

        let hour: u32 = hour.parse().map_err(|_| {
            BooklineError::InvalidInput(format!("time must be formatted as HH:MM, got '{}'", s))
        })?;
        let minute: u32 = minute.parse().map_err(|_| {
            BooklineError::InvalidInput(format!("time must be formatted as HH:MM, got '{}'", s))
        })?;

        TimeOfDay::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = BooklineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Per-agent calendar configuration
///
/// Owned by the agent configuration UI; read-only to the scheduling engine.
/// All slot generation and policy windows are evaluated in `timezone`, never
/// in server-local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCalendarConfig {
    pub agent_id: String,
    pub calendar_id: String,
    /// IANA timezone name (e.g. `America/New_York`)
    pub timezone: String,
    pub slot_duration_minutes: u32,
    pub buffer_between_slots_minutes: u32,
    pub preferred_days: Vec<DayOfWeek>,
    pub preferred_hours_start: TimeOfDay,
    pub preferred_hours_end: TimeOfDay,
    /// Minimum lead time before a slot may be booked. Zero still excludes
    /// slots that have already started.
    pub min_notice_hours: u32,
    /// Latest bookable civil day, counted from today in the agent timezone.
    pub max_advance_days: i64,
}

impl AgentCalendarConfig {
    pub fn is_preferred_day(&self, weekday: Weekday) -> bool {
        self.preferred_days.contains(&DayOfWeek::from(weekday))
    }

    /// Candidate slot cadence: duration plus the configured buffer.
    pub fn slot_step_minutes(&self) -> u32 {
        self.slot_duration_minutes + self.buffer_between_slots_minutes
    }

    /// Sanity-check the stored configuration before using it for scheduling.
    pub fn validate(&self) -> Result<()> {
        if self.slot_duration_minutes == 0 {
            return Err(BooklineError::Config(format!(
                "agent {}: slot duration must be greater than zero",
                self.agent_id
            )));
        }
        if self.preferred_hours_start >= self.preferred_hours_end {
            return Err(BooklineError::Config(format!(
                "agent {}: preferred hours start {} is not before end {}",
                self.agent_id, self.preferred_hours_start, self.preferred_hours_end
            )));
        }
        if self.max_advance_days < 0 {
            return Err(BooklineError::Config(format!(
                "agent {}: max advance days must not be negative",
                self.agent_id
            )));
        }
        Ok(())
    }
}

/// Provider event status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl EventStatus {
    pub fn is_cancelled(self) -> bool {
        matches!(self, EventStatus::Cancelled)
    }
}

/// Calendar event as reported by the external provider
///
/// Read-only; fetched per request with no local cache, so staleness equals one
/// network round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: EventStatus,
    pub is_all_day: bool,
}

impl CalendarEvent {
    /// Half-open interval intersection: touching boundaries do not conflict.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// Fixed-duration candidate appointment window
///
/// Transient value, always recomputed from live calendar state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

/// One civil day of generated slots for an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub timezone: String,
    pub slots: Vec<TimeSlot>,
    /// Populated only when `date` falls on one of the agent's preferred days.
    pub preferred_slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn available(&self) -> Vec<TimeSlot> {
        self.slots.iter().copied().filter(|s| s.available).collect()
    }

    pub fn available_preferred(&self) -> Vec<TimeSlot> {
        self.preferred_slots.iter().copied().filter(|s| s.available).collect()
    }
}

/// Validator verdict for one requested slot
///
/// Policy rejections are first-class values, not errors: `reason` carries a
/// user-readable explanation and `alternative_slots` the ranked suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCheck {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_slot: Option<TimeSlot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_slots: Vec<TimeSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SlotCheck {
    pub fn accepted(slot: TimeSlot) -> Self {
        Self { available: true, requested_slot: Some(slot), alternative_slots: vec![], reason: None }
    }

    pub fn rejected(
        slot: Option<TimeSlot>,
        reason: impl Into<String>,
        alternatives: Vec<TimeSlot>,
    ) -> Self {
        Self {
            available: false,
            requested_slot: slot,
            alternative_slots: alternatives,
            reason: Some(reason.into()),
        }
    }
}
