//! Natural-language rendering of scheduling results
//!
//! Everything rendered here goes straight to text-to-speech. Dates and times
//! are always spoken in the agent's timezone, never the server's.

use bookline_domain::utils::speech::{spoken_date, spoken_time};
use bookline_domain::{SlotCheck, TimeSlot};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// "Monday, March 2, 2026 at 10:00 AM" in the agent timezone.
pub fn spoken_instant(instant: DateTime<Utc>, tz: Tz) -> String {
    let local = instant.with_timezone(&tz);
    format!("{} at {}", spoken_date(local.date_naive()), spoken_time(local.time()))
}

/// Time-of-day only ("10:00 AM") in the agent timezone.
pub fn spoken_instant_time(instant: DateTime<Utc>, tz: Tz) -> String {
    spoken_time(instant.with_timezone(&tz).time())
}

/// Bulleted list of slot suggestions, one per line.
pub fn slot_bullets(slots: &[TimeSlot], tz: Tz) -> String {
    slots
        .iter()
        .map(|slot| format!("- {}", spoken_instant(slot.start, tz)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full rejection narration: the reason, then alternatives when there are
/// any.
pub fn rejection_message(check: &SlotCheck, tz: Tz) -> String {
    let mut message =
        check.reason.clone().unwrap_or_else(|| "That time is not available.".to_string());
    if !check.alternative_slots.is_empty() {
        message.push_str("\nHere are some times that are available:\n");
        message.push_str(&slot_bullets(&check.alternative_slots, tz));
    }
    message
}
