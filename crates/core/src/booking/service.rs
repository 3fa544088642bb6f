//! Booking service - appointment lifecycle over the availability engine

use std::sync::Arc;

use bookline_domain::{
    AgentCalendarConfig, Appointment, AppointmentStatus, Result, SlotCheck, TimeOfDay,
};
use chrono::NaiveDate;
use tracing::{info, warn};

use super::ports::{AppointmentRepository, CalendarEventWriter, EventDraft};
use crate::scheduling::ports::Clock;
use crate::scheduling::AvailabilityService;

/// Input for a new booking, already validated at the tool boundary.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub attendee_name: String,
    pub attendee_email: String,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub notes: Option<String>,
    pub conversation_id: Option<String>,
}

/// Result of a booking attempt.
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    Booked(Appointment),
    Unavailable(SlotCheck),
}

/// Result of a cancellation attempt. Not-found is a distinct outcome so the
/// caller can ask a clarifying question instead of apologising.
#[derive(Debug, Clone)]
pub enum CancelOutcome {
    Cancelled(Appointment),
    NotFound,
}

/// Result of a reschedule attempt.
#[derive(Debug, Clone)]
pub enum RescheduleOutcome {
    Rescheduled(Appointment),
    Unavailable(SlotCheck),
    NotFound,
}

/// Appointment lifecycle orchestration
pub struct BookingService {
    availability: Arc<AvailabilityService>,
    appointments: Arc<dyn AppointmentRepository>,
    calendar: Arc<dyn CalendarEventWriter>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        availability: Arc<AvailabilityService>,
        appointments: Arc<dyn AppointmentRepository>,
        calendar: Arc<dyn CalendarEventWriter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { availability, appointments, calendar, clock }
    }

    /// Book an appointment.
    ///
    /// Re-validates against the live calendar immediately before writing. A
    /// competing booking can still land between the check and the event
    /// write; that window is accepted rather than closed with a reservation
    /// lock, since the external calendar remains the authority either way.
    pub async fn book(
        &self,
        config: &AgentCalendarConfig,
        request: &BookingRequest,
    ) -> Result<BookingOutcome> {
        let check = self.availability.check_slot(config, request.date, request.time).await?;
        if !check.available {
            return Ok(BookingOutcome::Unavailable(check));
        }
        let Some(slot) = check.requested_slot else {
            return Ok(BookingOutcome::Unavailable(check));
        };

        let now = self.clock.now();
        let mut appointment = Appointment::scheduled(
            &config.agent_id,
            &request.attendee_name,
            &request.attendee_email,
            slot.start,
            slot.end,
            now,
        );
        appointment.notes = request.notes.clone();
        appointment.conversation_id = request.conversation_id.clone();

        let draft = EventDraft {
            summary: format!("Appointment: {}", request.attendee_name),
            description: request.notes.clone(),
            start: slot.start,
            end: slot.end,
            attendee_email: Some(request.attendee_email.clone()),
        };
        let event_id = self.calendar.create_event(&config.calendar_id, &draft).await?;
        appointment.calendar_event_id = Some(event_id.clone());

        if let Err(error) = self.appointments.insert(&appointment).await {
            // Don't leave an orphaned event behind a failed insert.
            if let Err(cleanup) =
                self.calendar.delete_event(&config.calendar_id, &event_id).await
            {
                warn!(
                    agent_id = %config.agent_id,
                    event_id,
                    error = %cleanup,
                    "failed to roll back calendar event after insert failure"
                );
            }
            return Err(error);
        }

        info!(
            agent_id = %config.agent_id,
            appointment_id = %appointment.id,
            start = %appointment.start,
            "appointment booked"
        );
        Ok(BookingOutcome::Booked(appointment))
    }

    /// Cancel the attendee's next upcoming appointment.
    pub async fn cancel(
        &self,
        config: &AgentCalendarConfig,
        attendee_email: &str,
    ) -> Result<CancelOutcome> {
        let now = self.clock.now();
        let Some(mut appointment) = self
            .appointments
            .find_upcoming_by_email(&config.agent_id, attendee_email, now)
            .await?
        else {
            return Ok(CancelOutcome::NotFound);
        };

        appointment.status = AppointmentStatus::Cancelled;
        appointment.updated_at = now;
        self.appointments.update(&appointment).await?;

        if let Some(event_id) = appointment.calendar_event_id.clone() {
            // Best effort: the appointment record is already cancelled, and a
            // leftover event only blocks a slot until cleaned up manually.
            if let Err(error) = self.calendar.delete_event(&config.calendar_id, &event_id).await
            {
                warn!(
                    agent_id = %config.agent_id,
                    event_id,
                    error = %error,
                    "failed to delete calendar event for cancelled appointment"
                );
            }
        }

        info!(
            agent_id = %config.agent_id,
            appointment_id = %appointment.id,
            "appointment cancelled"
        );
        Ok(CancelOutcome::Cancelled(appointment))
    }

    /// Move the attendee's next upcoming appointment to a new slot.
    pub async fn reschedule(
        &self,
        config: &AgentCalendarConfig,
        attendee_email: &str,
        new_date: NaiveDate,
        new_time: TimeOfDay,
    ) -> Result<RescheduleOutcome> {
        let now = self.clock.now();
        let Some(mut appointment) = self
            .appointments
            .find_upcoming_by_email(&config.agent_id, attendee_email, now)
            .await?
        else {
            return Ok(RescheduleOutcome::NotFound);
        };

        let check = self.availability.check_slot(config, new_date, new_time).await?;
        if !check.available {
            return Ok(RescheduleOutcome::Unavailable(check));
        }
        let Some(slot) = check.requested_slot else {
            return Ok(RescheduleOutcome::Unavailable(check));
        };

        if let Some(event_id) = appointment.calendar_event_id.clone() {
            if let Err(error) = self.calendar.delete_event(&config.calendar_id, &event_id).await
            {
                warn!(
                    agent_id = %config.agent_id,
                    event_id,
                    error = %error,
                    "failed to delete old calendar event during reschedule"
                );
            }
        }

        let draft = EventDraft {
            summary: format!("Appointment: {}", appointment.attendee_name),
            description: appointment.notes.clone(),
            start: slot.start,
            end: slot.end,
            attendee_email: Some(appointment.attendee_email.clone()),
        };
        let event_id = self.calendar.create_event(&config.calendar_id, &draft).await?;

        appointment.start = slot.start;
        appointment.end = slot.end;
        appointment.status = AppointmentStatus::Rescheduled;
        appointment.calendar_event_id = Some(event_id);
        appointment.updated_at = now;
        self.appointments.update(&appointment).await?;

        info!(
            agent_id = %config.agent_id,
            appointment_id = %appointment.id,
            start = %appointment.start,
            "appointment rescheduled"
        );
        Ok(RescheduleOutcome::Rescheduled(appointment))
    }
}
