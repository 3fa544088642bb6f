//! Tool-call boundary types
//!
//! The voice platform delivers free-form `{name, arguments}` payloads. Nothing
//! in them is trusted: every recognised tool parses its own fields explicitly
//! and fails with a descriptive error instead of assuming shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{BooklineError, Result};
use crate::types::calendar::TimeOfDay;
use crate::utils::transcript::{extract_booking_details, TranscriptBookingDetails};

/// Raw tool invocation as delivered by the voice platform webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallPayload {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Parsed, validated tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    BookAppointment {
        attendee_name: String,
        attendee_email: String,
        date: NaiveDate,
        time: TimeOfDay,
        notes: Option<String>,
        conversation_id: Option<String>,
    },
    CancelAppointment {
        attendee_email: String,
    },
    RescheduleAppointment {
        attendee_email: String,
        new_date: NaiveDate,
        new_time: TimeOfDay,
    },
    CheckAvailability {
        date: NaiveDate,
        time: Option<TimeOfDay>,
    },
}

impl ToolCall {
    /// Parse and validate an inbound payload.
    ///
    /// Recognises exactly four tool names; anything else is rejected with
    /// `Unknown calendar tool: <name>`.
    pub fn parse(payload: &ToolCallPayload) -> Result<Self> {
        let args = &payload.arguments;
        match payload.name.as_str() {
            "book_appointment" => {
                // Voice platforms sometimes omit fields the caller already
                // said out loud; fall back to transcript extraction before
                // rejecting.
                let fallback = optional_str(args, "transcript")
                    .map(|t| extract_booking_details(&t))
                    .unwrap_or_else(TranscriptBookingDetails::default);

                let attendee_name = match require_str(args, "name", &payload.name) {
                    Ok(name) => name,
                    Err(e) => fallback.attendee_name.clone().ok_or(e)?,
                };
                let attendee_email = match require_str(args, "email", &payload.name) {
                    Ok(email) => email,
                    Err(e) => fallback.attendee_email.clone().ok_or(e)?,
                };

                Ok(ToolCall::BookAppointment {
                    attendee_name,
                    attendee_email,
                    date: parse_date(&require_str(args, "date", &payload.name)?)?,
                    time: parse_time(&require_str(args, "time", &payload.name)?)?,
                    notes: optional_str(args, "notes"),
                    conversation_id: optional_str(args, "conversation_id"),
                })
            }
            "cancel_appointment" => Ok(ToolCall::CancelAppointment {
                attendee_email: require_str(args, "email", &payload.name)?,
            }),
            "reschedule_appointment" => Ok(ToolCall::RescheduleAppointment {
                attendee_email: require_str(args, "email", &payload.name)?,
                new_date: parse_date(&require_str(args, "new_date", &payload.name)?)?,
                new_time: parse_time(&require_str(args, "new_time", &payload.name)?)?,
            }),
            "check_availability" => Ok(ToolCall::CheckAvailability {
                date: parse_date(&require_str(args, "date", &payload.name)?)?,
                time: match optional_str(args, "time") {
                    Some(raw) => Some(parse_time(&raw)?),
                    None => None,
                },
            }),
            other => {
                Err(BooklineError::InvalidInput(format!("Unknown calendar tool: {}", other)))
            }
        }
    }
}

fn require_str(args: &Value, key: &str, tool: &str) -> Result<String> {
    match args.get(key).and_then(Value::as_str).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(BooklineError::InvalidInput(format!("{} requires a '{}' argument", tool, key))),
    }
}

fn optional_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        BooklineError::InvalidInput(format!("date must be formatted as YYYY-MM-DD, got '{}'", raw))
    })
}

fn parse_time(raw: &str) -> Result<TimeOfDay> {
    raw.parse()
}

/// Dispatcher reply rendered back to the voice platform
///
/// Always a speakable string; `not_found` lets the voice AI ask a clarifying
/// question instead of apologising for a generic failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_found: bool,
}

impl ToolReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), error: None, not_found: false }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, message: None, error: Some(error.into()), not_found: false }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self { success: false, message: None, error: Some(error.into()), not_found: true }
    }
}
