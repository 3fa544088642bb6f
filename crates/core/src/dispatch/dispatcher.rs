//! Tool-call dispatcher - the voice platform boundary
//!
//! Every inbound invocation is handled independently: parse the untrusted
//! arguments, load the agent's calendar configuration, run the scheduling or
//! booking flow, and render a speakable reply. No exception escapes this
//! boundary; the voice platform always receives `{success, message | error}`.

use std::sync::Arc;

use bookline_domain::constants::MAX_NARRATED_SLOTS;
use bookline_domain::utils::speech::{spoken_date, spoken_day_list};
use bookline_domain::{
    AgentCalendarConfig, BooklineError, Result, TimeOfDay, ToolCall, ToolCallPayload, ToolReply,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{error, info};

use super::narration::{rejection_message, spoken_instant, spoken_instant_time};
use crate::booking::ports::AgentCalendarRepository;
use crate::booking::{
    BookingOutcome, BookingRequest, BookingService, CancelOutcome, RescheduleOutcome,
};
use crate::scheduling::timezone::resolve_timezone;
use crate::scheduling::AvailabilityService;

/// Voice tool-call dispatcher
pub struct ToolDispatcher {
    agents: Arc<dyn AgentCalendarRepository>,
    availability: Arc<AvailabilityService>,
    booking: Arc<BookingService>,
}

impl ToolDispatcher {
    pub fn new(
        agents: Arc<dyn AgentCalendarRepository>,
        availability: Arc<AvailabilityService>,
        booking: Arc<BookingService>,
    ) -> Self {
        Self { agents, availability, booking }
    }

    /// Handle one tool call, never propagating an error.
    pub async fn dispatch(&self, agent_id: &str, payload: &ToolCallPayload) -> ToolReply {
        info!(agent_id, tool = %payload.name, "dispatching calendar tool call");
        match self.try_dispatch(agent_id, payload).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(agent_id, tool = %payload.name, error = %err, "tool call failed");
                ToolReply::failed(speakable_error(&err))
            }
        }
    }

    async fn try_dispatch(&self, agent_id: &str, payload: &ToolCallPayload) -> Result<ToolReply> {
        let call = ToolCall::parse(payload)?;

        let Some(config) = self.agents.find_by_agent(agent_id).await? else {
            return Ok(ToolReply::failed(
                "I'm sorry, this assistant does not have a calendar configured yet.",
            ));
        };
        let tz = resolve_timezone(&config.timezone)?;

        match call {
            ToolCall::BookAppointment {
                attendee_name,
                attendee_email,
                date,
                time,
                notes,
                conversation_id,
            } => {
                let request = BookingRequest {
                    attendee_name,
                    attendee_email,
                    date,
                    time,
                    notes,
                    conversation_id,
                };
                self.handle_book(&config, tz, request).await
            }
            ToolCall::CancelAppointment { attendee_email } => {
                self.handle_cancel(&config, tz, &attendee_email).await
            }
            ToolCall::RescheduleAppointment { attendee_email, new_date, new_time } => {
                self.handle_reschedule(&config, tz, &attendee_email, new_date, new_time).await
            }
            ToolCall::CheckAvailability { date, time } => {
                self.handle_check_availability(&config, tz, date, time).await
            }
        }
    }

    async fn handle_book(
        &self,
        config: &AgentCalendarConfig,
        tz: Tz,
        request: BookingRequest,
    ) -> Result<ToolReply> {
        match self.booking.book(config, &request).await? {
            BookingOutcome::Booked(appointment) => Ok(ToolReply::ok(format!(
                "You're all set, {}. I've booked your appointment for {}.",
                appointment.attendee_name,
                spoken_instant(appointment.start, tz)
            ))),
            BookingOutcome::Unavailable(check) => {
                Ok(ToolReply::failed(rejection_message(&check, tz)))
            }
        }
    }

    async fn handle_cancel(
        &self,
        config: &AgentCalendarConfig,
        tz: Tz,
        attendee_email: &str,
    ) -> Result<ToolReply> {
        match self.booking.cancel(config, attendee_email).await? {
            CancelOutcome::Cancelled(appointment) => Ok(ToolReply::ok(format!(
                "Your appointment on {} has been cancelled.",
                spoken_instant(appointment.start, tz)
            ))),
            CancelOutcome::NotFound => Ok(ToolReply::not_found(format!(
                "I couldn't find an upcoming appointment for {}. Could you confirm the email \
                 address the booking was made under?",
                attendee_email
            ))),
        }
    }

    async fn handle_reschedule(
        &self,
        config: &AgentCalendarConfig,
        tz: Tz,
        attendee_email: &str,
        new_date: NaiveDate,
        new_time: TimeOfDay,
    ) -> Result<ToolReply> {
        match self.booking.reschedule(config, attendee_email, new_date, new_time).await? {
            RescheduleOutcome::Rescheduled(appointment) => Ok(ToolReply::ok(format!(
                "Done. I've moved your appointment to {}.",
                spoken_instant(appointment.start, tz)
            ))),
            RescheduleOutcome::Unavailable(check) => {
                Ok(ToolReply::failed(rejection_message(&check, tz)))
            }
            RescheduleOutcome::NotFound => Ok(ToolReply::not_found(format!(
                "I couldn't find an upcoming appointment for {}. Could you confirm the email \
                 address the booking was made under?",
                attendee_email
            ))),
        }
    }

    async fn handle_check_availability(
        &self,
        config: &AgentCalendarConfig,
        tz: Tz,
        date: NaiveDate,
        time: Option<TimeOfDay>,
    ) -> Result<ToolReply> {
        if let Some(time) = time {
            let check = self.availability.check_slot(config, date, time).await?;
            return Ok(if check.available {
                let slot = check.requested_slot.map(|slot| spoken_instant(slot.start, tz));
                ToolReply::ok(match slot {
                    Some(when) => format!("Yes, {} is available.", when),
                    None => "Yes, that time is available.".to_string(),
                })
            } else {
                ToolReply::ok(rejection_message(&check, tz))
            });
        }

        let schedule = self.availability.day_schedule(config, date).await?;
        let open = schedule.available();
        if open.is_empty() {
            return Ok(ToolReply::ok(format!(
                "There are no open slots on {}. We take appointments on {}.",
                spoken_date(date),
                spoken_day_list(&config.preferred_days)
            )));
        }

        let times = open
            .iter()
            .take(MAX_NARRATED_SLOTS)
            .map(|slot| format!("- {}", spoken_instant_time(slot.start, tz)))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolReply::ok(format!("Here's what's open on {}:\n{}", spoken_date(date), times)))
    }
}

/// Map an internal error to something safe to read aloud.
fn speakable_error(error: &BooklineError) -> String {
    match error {
        BooklineError::InvalidInput(message) => message.clone(),
        BooklineError::Config(_) => {
            "I'm sorry, this assistant's calendar isn't set up correctly.".to_string()
        }
        _ => "I'm sorry, something went wrong while accessing the calendar. Please try again in \
              a moment."
            .to_string(),
    }
}
