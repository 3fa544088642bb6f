//! Shared test doubles and fixtures for the core integration tests.
#![allow(dead_code)]

pub mod calendar;
pub mod repositories;

use bookline_domain::{AgentCalendarConfig, DayOfWeek};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::New_York;

/// Baseline agent configuration used across the suites: New York timezone,
/// weekdays, 9-to-5 window, 30-minute slots with no buffer, no notice, 30
/// days of advance booking. Tests tweak individual fields.
pub fn test_config() -> AgentCalendarConfig {
    AgentCalendarConfig {
        agent_id: "agent-1".to_string(),
        calendar_id: "primary".to_string(),
        timezone: "America/New_York".to_string(),
        slot_duration_minutes: 30,
        buffer_between_slots_minutes: 0,
        preferred_days: vec![
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
        ],
        preferred_hours_start: "09:00".parse().unwrap(),
        preferred_hours_end: "17:00".parse().unwrap(),
        min_notice_hours: 0,
        max_advance_days: 30,
    }
}

/// Absolute instant for a New York civil time.
pub fn ny(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    New_York
        .with_ymd_and_hms(y, m, d, hour, minute, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}
