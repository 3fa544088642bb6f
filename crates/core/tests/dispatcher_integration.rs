//! End-to-end dispatcher tests over in-memory ports
//!
//! Exercises the full flow a voice platform webhook triggers: payload parse,
//! config lookup, availability checks, booking writes, and the speakable
//! reply.

mod support;

use std::sync::Arc;

use bookline_core::{AvailabilityService, BookingService, ToolDispatcher};
use bookline_domain::{AppointmentStatus, ToolCallPayload};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use support::calendar::{FixedClock, MockCalendar};
use support::repositories::{InMemoryAppointmentRepository, StaticAgentCalendarRepository};
use support::{ny, test_config};

struct Harness {
    dispatcher: ToolDispatcher,
    calendar: MockCalendar,
    appointments: InMemoryAppointmentRepository,
}

fn harness(calendar: MockCalendar) -> Harness {
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()));
    let appointments = InMemoryAppointmentRepository::new();

    let availability =
        Arc::new(AvailabilityService::new(Arc::new(calendar.clone()), clock.clone()));
    let booking = Arc::new(BookingService::new(
        availability.clone(),
        Arc::new(appointments.clone()),
        Arc::new(calendar.clone()),
        clock,
    ));
    let agents = Arc::new(StaticAgentCalendarRepository::with_config(test_config()));

    Harness {
        dispatcher: ToolDispatcher::new(agents, availability, booking),
        calendar,
        appointments,
    }
}

fn payload(name: &str, arguments: Value) -> ToolCallPayload {
    ToolCallPayload { name: name.to_string(), arguments }
}

fn book_payload() -> ToolCallPayload {
    payload(
        "book_appointment",
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "date": "2026-03-02",
            "time": "10:00",
        }),
    )
}

#[tokio::test]
async fn books_an_open_slot_and_confirms_in_spoken_form() {
    let h = harness(MockCalendar::new());

    let reply = h.dispatcher.dispatch("agent-1", &book_payload()).await;

    assert!(reply.success, "unexpected failure: {:?}", reply.error);
    assert!(reply
        .message
        .as_deref()
        .unwrap()
        .contains("Monday, March 2, 2026 at 10:00 AM"));

    let rows = h.appointments.all();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, AppointmentStatus::Scheduled);
    assert_eq!(rows[0].start, ny(2026, 3, 2, 10, 0));
    assert!(rows[0].calendar_event_id.is_some());
    assert_eq!(h.calendar.created().len(), 1);
}

#[tokio::test]
async fn conflicting_booking_is_refused_with_bulleted_alternatives() {
    let calendar =
        MockCalendar::new().with_event(ny(2026, 3, 2, 10, 0), ny(2026, 3, 2, 10, 30));
    let h = harness(calendar);

    let reply = h.dispatcher.dispatch("agent-1", &book_payload()).await;

    assert!(!reply.success);
    let error = reply.error.as_deref().unwrap();
    assert!(error.contains("already booked"));
    assert!(error.contains("\n- "), "alternatives should be a bulleted list: {}", error);
    assert!(h.appointments.all().is_empty());
}

#[tokio::test]
async fn double_booking_the_same_slot_is_refused() {
    let h = harness(MockCalendar::new());

    let first = h.dispatcher.dispatch("agent-1", &book_payload()).await;
    assert!(first.success);

    // The second caller asks for the same slot; the event written by the
    // first booking is now live calendar state.
    let second = h.dispatcher.dispatch("agent-1", &book_payload()).await;
    assert!(!second.success);
    assert!(second.error.as_deref().unwrap().contains("already booked"));
    assert_eq!(h.appointments.all().len(), 1);
}

#[tokio::test]
async fn cancelling_without_a_booking_is_not_found() {
    let h = harness(MockCalendar::new());

    let reply = h
        .dispatcher
        .dispatch("agent-1", &payload("cancel_appointment", json!({"email": "ada@example.com"})))
        .await;

    assert!(!reply.success);
    assert!(reply.not_found, "not-found must be distinguishable from generic failure");
    assert!(reply.error.as_deref().unwrap().contains("ada@example.com"));
}

#[tokio::test]
async fn cancelling_a_booking_removes_the_calendar_event() {
    let h = harness(MockCalendar::new());
    h.dispatcher.dispatch("agent-1", &book_payload()).await;

    let reply = h
        .dispatcher
        .dispatch("agent-1", &payload("cancel_appointment", json!({"email": "Ada@Example.com"})))
        .await;

    assert!(reply.success, "unexpected failure: {:?}", reply.error);
    assert!(reply.message.as_deref().unwrap().contains("has been cancelled"));

    let rows = h.appointments.all();
    assert_eq!(rows[0].status, AppointmentStatus::Cancelled);
    assert_eq!(h.calendar.deleted().len(), 1);
}

#[tokio::test]
async fn rescheduling_moves_the_appointment() {
    let h = harness(MockCalendar::new());
    h.dispatcher.dispatch("agent-1", &book_payload()).await;

    let reply = h
        .dispatcher
        .dispatch(
            "agent-1",
            &payload(
                "reschedule_appointment",
                json!({
                    "email": "ada@example.com",
                    "new_date": "2026-03-03",
                    "new_time": "14:00",
                }),
            ),
        )
        .await;

    assert!(reply.success, "unexpected failure: {:?}", reply.error);
    assert!(reply.message.as_deref().unwrap().contains("Tuesday, March 3, 2026 at 2:00 PM"));

    let rows = h.appointments.all();
    assert_eq!(rows[0].status, AppointmentStatus::Rescheduled);
    assert_eq!(rows[0].start, ny(2026, 3, 3, 14, 0));
}

#[tokio::test]
async fn rescheduling_an_unknown_attendee_is_not_found() {
    let h = harness(MockCalendar::new());

    let reply = h
        .dispatcher
        .dispatch(
            "agent-1",
            &payload(
                "reschedule_appointment",
                json!({"email": "ghost@example.com", "new_date": "2026-03-03", "new_time": "14:00"}),
            ),
        )
        .await;

    assert!(!reply.success);
    assert!(reply.not_found);
}

#[tokio::test]
async fn unknown_tools_are_rejected_by_name() {
    let h = harness(MockCalendar::new());

    let reply = h.dispatcher.dispatch("agent-1", &payload("end_call", json!({}))).await;

    assert!(!reply.success);
    assert_eq!(reply.error.as_deref().unwrap(), "Unknown calendar tool: end_call");
}

#[tokio::test]
async fn missing_arguments_produce_a_speakable_error() {
    let h = harness(MockCalendar::new());

    let reply = h
        .dispatcher
        .dispatch(
            "agent-1",
            &payload("book_appointment", json!({"name": "Ada", "date": "2026-03-02"})),
        )
        .await;

    assert!(!reply.success);
    assert!(reply.error.as_deref().unwrap().contains("requires a 'email' argument"));
}

#[tokio::test]
async fn unconfigured_agents_get_an_apology() {
    let h = harness(MockCalendar::new());

    let reply = h.dispatcher.dispatch("agent-unknown", &book_payload()).await;

    assert!(!reply.success);
    assert!(reply.error.as_deref().unwrap().contains("does not have a calendar configured"));
}

#[tokio::test]
async fn check_availability_with_a_time_narrates_the_verdict() {
    let h = harness(MockCalendar::new());

    let open = h
        .dispatcher
        .dispatch(
            "agent-1",
            &payload("check_availability", json!({"date": "2026-03-02", "time": "10:00"})),
        )
        .await;
    assert!(open.success);
    assert!(open.message.as_deref().unwrap().contains("is available"));

    h.calendar.add_event(
        ny(2026, 3, 2, 10, 0),
        ny(2026, 3, 2, 10, 30),
        bookline_domain::EventStatus::Confirmed,
    );

    let taken = h
        .dispatcher
        .dispatch(
            "agent-1",
            &payload("check_availability", json!({"date": "2026-03-02", "time": "10:00"})),
        )
        .await;
    assert!(taken.success);
    assert!(taken.message.as_deref().unwrap().contains("already booked"));
}

#[tokio::test]
async fn check_availability_date_only_lists_open_times() {
    let h = harness(MockCalendar::new());

    let reply = h
        .dispatcher
        .dispatch("agent-1", &payload("check_availability", json!({"date": "2026-03-02"})))
        .await;

    assert!(reply.success);
    let message = reply.message.as_deref().unwrap();
    assert!(message.contains("Here's what's open on Monday, March 2, 2026"));
    assert!(message.contains("- 9:00 AM"));
    // Narration is capped at ten slots even though sixteen are open.
    assert_eq!(message.matches("\n- ").count(), 10);
}

#[tokio::test]
async fn check_availability_on_a_full_day_names_the_preferred_days() {
    let calendar =
        MockCalendar::new().with_event(ny(2026, 3, 2, 9, 0), ny(2026, 3, 2, 17, 0));
    let h = harness(calendar);

    let reply = h
        .dispatcher
        .dispatch("agent-1", &payload("check_availability", json!({"date": "2026-03-02"})))
        .await;

    assert!(reply.success);
    let message = reply.message.as_deref().unwrap();
    assert!(message.contains("no open slots"));
    assert!(message.contains("Monday"));
    assert!(message.contains("Friday"));
}
