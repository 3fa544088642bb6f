//! Integration tests for the slot validator (`AvailabilityService::check_slot`)
//!
//! The validator runs an ordered policy gate; these tests cover each gate,
//! the alternatives attached to rejections, and freshness between calls.

mod support;

use std::sync::Arc;

use bookline_core::AvailabilityService;
use bookline_domain::{EventStatus, TimeOfDay};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::America::New_York;
use support::calendar::{FixedClock, MockCalendar};
use support::{ny, test_config};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tod(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn service_at(calendar: &MockCalendar, now: DateTime<Utc>) -> AvailabilityService {
    AvailabilityService::new(Arc::new(calendar.clone()), Arc::new(FixedClock(now)))
}

fn service(calendar: &MockCalendar) -> AvailabilityService {
    service_at(calendar, Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
}

#[tokio::test]
async fn accepts_an_open_slot() {
    let config = test_config();
    let calendar = MockCalendar::new();

    let check =
        service(&calendar).check_slot(&config, date(2026, 3, 2), tod("10:00")).await.unwrap();

    assert!(check.available);
    assert!(check.reason.is_none());
    assert!(check.alternative_slots.is_empty());
    let slot = check.requested_slot.unwrap();
    assert_eq!(slot.start, ny(2026, 3, 2, 10, 0));
    assert_eq!(slot.end, ny(2026, 3, 2, 10, 30));
}

#[tokio::test]
async fn booked_time_is_rejected_with_alternatives() {
    let config = test_config();
    let calendar =
        MockCalendar::new().with_event(ny(2026, 3, 2, 10, 0), ny(2026, 3, 2, 10, 30));

    let check =
        service(&calendar).check_slot(&config, date(2026, 3, 2), tod("10:00")).await.unwrap();

    assert!(!check.available);
    assert!(check.reason.as_deref().unwrap().contains("already booked"));
    assert!(!check.alternative_slots.is_empty());
    assert!(check.alternative_slots.len() <= 5);
    for slot in &check.alternative_slots {
        assert!(slot.available);
        assert_ne!(slot.start, ny(2026, 3, 2, 10, 0), "the booked slot must not be suggested");
    }
}

#[tokio::test]
async fn min_notice_rejection_names_the_lead_time() {
    let mut config = test_config();
    config.min_notice_hours = 24;

    // 20:00 UTC on March 1st: the requested 10:00 slot is ~19 hours out.
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap();
    let calendar = MockCalendar::new();

    let check = service_at(&calendar, now)
        .check_slot(&config, date(2026, 3, 2), tod("10:00"))
        .await
        .unwrap();

    assert!(!check.available);
    assert!(check.reason.as_deref().unwrap().contains("24 hours in advance"));
    assert!(!check.alternative_slots.is_empty());
    let boundary = now + Duration::hours(24);
    for slot in &check.alternative_slots {
        assert!(slot.start >= boundary, "suggested slot inside the notice window: {:?}", slot);
    }
}

#[tokio::test]
async fn min_notice_of_zero_skips_the_gate() {
    let config = test_config();
    let calendar = MockCalendar::new();

    // Ten minutes before the slot, same day.
    let check = service_at(&calendar, ny(2026, 3, 2, 9, 50))
        .check_slot(&config, date(2026, 3, 2), tod("10:00"))
        .await
        .unwrap();

    assert!(check.available);
}

#[tokio::test]
async fn max_advance_rejection_has_no_alternatives() {
    let config = test_config();
    let calendar = MockCalendar::new();

    // Clock is 2026-03-01; day 31 of a 30-day window.
    let check =
        service(&calendar).check_slot(&config, date(2026, 4, 1), tod("10:00")).await.unwrap();

    assert!(!check.available);
    assert!(check.reason.as_deref().unwrap().contains("30 days in advance"));
    assert!(check.alternative_slots.is_empty());
}

#[tokio::test]
async fn past_requests_are_rejected_without_alternatives() {
    let config = test_config();
    let calendar = MockCalendar::new();

    let check = service_at(&calendar, ny(2026, 3, 2, 12, 0))
        .check_slot(&config, date(2026, 3, 1), tod("10:00"))
        .await
        .unwrap();

    assert!(!check.available);
    assert!(check.reason.as_deref().unwrap().contains("already passed"));
    assert!(check.alternative_slots.is_empty());
}

#[tokio::test]
async fn requests_within_the_past_tolerance_are_not_flagged_as_past() {
    let config = test_config();
    let calendar = MockCalendar::new();

    // Thirty minutes after the requested start: inside the one-hour
    // tolerance, and the zero-notice config leaves nothing else to reject.
    let check = service_at(&calendar, ny(2026, 3, 2, 10, 30))
        .check_slot(&config, date(2026, 3, 2), tod("10:00"))
        .await
        .unwrap();

    assert!(check.available);
}

#[tokio::test]
async fn non_preferred_day_only_suggests_preferred_slots() {
    let config = test_config();
    let calendar = MockCalendar::new();

    // 2026-03-07 is a Saturday; the allowlist is Monday through Friday.
    let check =
        service(&calendar).check_slot(&config, date(2026, 3, 7), tod("10:00")).await.unwrap();

    assert!(!check.available);
    let reason = check.reason.as_deref().unwrap();
    assert!(reason.contains("Saturday"));
    assert!(reason.contains("Monday"));
    for slot in &check.alternative_slots {
        let weekday = slot.start.with_timezone(&New_York).weekday();
        assert!(
            config.is_preferred_day(weekday),
            "non-preferred-day slot suggested: {:?}",
            slot
        );
    }
}

#[tokio::test]
async fn outside_hours_rejection_suggests_preferred_slots() {
    let config = test_config();
    let calendar = MockCalendar::new();

    let check =
        service(&calendar).check_slot(&config, date(2026, 3, 2), tod("18:00")).await.unwrap();

    assert!(!check.available);
    assert!(check.reason.as_deref().unwrap().contains("between 9:00 AM and 5:00 PM"));
    assert!(!check.alternative_slots.is_empty());
    assert!(check.alternative_slots.len() <= 5);
    assert!(check.alternative_slots.iter().all(|slot| slot.available));
}

#[tokio::test]
async fn slot_ending_past_the_window_close_is_rejected() {
    let config = test_config();
    let calendar = MockCalendar::new();

    // 16:45 starts inside the window but a 30-minute slot ends at 17:15.
    let check =
        service(&calendar).check_slot(&config, date(2026, 3, 2), tod("16:45")).await.unwrap();

    assert!(!check.available);
    assert!(check.reason.as_deref().unwrap().contains("between 9:00 AM and 5:00 PM"));
}

#[tokio::test]
async fn validator_is_idempotent_without_calendar_mutation() {
    let config = test_config();
    let calendar =
        MockCalendar::new().with_event(ny(2026, 3, 2, 10, 0), ny(2026, 3, 2, 10, 30));
    let service = service(&calendar);

    let first = service.check_slot(&config, date(2026, 3, 2), tod("10:00")).await.unwrap();
    let second = service.check_slot(&config, date(2026, 3, 2), tod("10:00")).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn validator_sees_fresh_calendar_state_between_calls() {
    let config = test_config();
    let calendar = MockCalendar::new();
    let service = service(&calendar);

    let before = service.check_slot(&config, date(2026, 3, 2), tod("10:00")).await.unwrap();
    assert!(before.available);

    calendar.add_event(ny(2026, 3, 2, 10, 0), ny(2026, 3, 2, 10, 30), EventStatus::Confirmed);

    let after = service.check_slot(&config, date(2026, 3, 2), tod("10:00")).await.unwrap();
    assert!(!after.available, "a booking landing between calls must be observed");
}

#[tokio::test]
async fn provider_failure_fails_open_for_validation() {
    let config = test_config();
    let calendar =
        MockCalendar::new().with_event(ny(2026, 3, 2, 10, 0), ny(2026, 3, 2, 10, 30));
    calendar.set_fail_fetch(true);

    let check =
        service(&calendar).check_slot(&config, date(2026, 3, 2), tod("10:00")).await.unwrap();

    // The conflicting event is unreachable, so the request is accepted.
    assert!(check.available);
}
