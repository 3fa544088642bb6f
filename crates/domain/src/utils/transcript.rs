//! Booking-detail extraction from call transcripts.
//!
//! Voice platforms occasionally deliver tool calls with missing arguments
//! even though the caller already said the information out loud. These
//! heuristics scan the raw transcript for an attendee name, email address,
//! phone number, and date/time hints, with a confidence score reflecting how
//! many fields were recovered.
//!
//! The extraction is intentionally conservative: a field is either matched by
//! a narrow pattern or left as `None`. Nothing here is authoritative — the
//! dispatcher only uses these values to prefill arguments the caller must
//! still confirm.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    CONFIDENCE_DATE, CONFIDENCE_EMAIL, CONFIDENCE_NAME, CONFIDENCE_PHONE, CONFIDENCE_TIME,
};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[ .-]?)?\(?\d{3}\)?[ .-]?\d{3}[ .-]?\d{4}").unwrap()
});

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:my name is|this is|i am|i'm)\s+([A-Za-z][A-Za-z'-]*(?:\s+[A-Za-z][A-Za-z'-]*){0,2})").unwrap()
});

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap()
});

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?\b").unwrap()
});

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:next|this)?\s*(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap()
});

static CLOCK_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(a\.?m\.?|p\.?m\.?)\b").unwrap()
});

static TWENTY_FOUR_HOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap()
});

/// Words that follow a name cue but never belong to the name itself.
const NAME_STOP_WORDS: &[&str] =
    &["and", "calling", "speaking", "here", "again", "i", "i'm", "im", "a", "an", "the"];

/// Fields recovered from a transcript, each independently optional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranscriptBookingDetails {
    pub attendee_name: Option<String>,
    pub attendee_email: Option<String>,
    pub phone: Option<String>,
    /// Date hint in whatever form the caller used (`2026-03-02`, `March 2`,
    /// `Tuesday`). Not normalised; callers must confirm.
    pub date_hint: Option<String>,
    /// Time hint normalised to `HH:MM` 24-hour form when possible.
    pub time_hint: Option<String>,
    pub confidence: f32, // 0.0-1.0
}

/// Extract booking details from a raw call transcript.
pub fn extract_booking_details(transcript: &str) -> TranscriptBookingDetails {
    let attendee_email = EMAIL_RE.find(transcript).map(|m| m.as_str().to_string());
    let attendee_name = extract_name(transcript);
    let phone = PHONE_RE.find(transcript).map(|m| normalize_phone(m.as_str()));
    let date_hint = extract_date_hint(transcript);
    let time_hint = extract_time_hint(transcript);

    let mut confidence = 0.0;
    if attendee_email.is_some() {
        confidence += CONFIDENCE_EMAIL;
    }
    if attendee_name.is_some() {
        confidence += CONFIDENCE_NAME;
    }
    if date_hint.is_some() {
        confidence += CONFIDENCE_DATE;
    }
    if time_hint.is_some() {
        confidence += CONFIDENCE_TIME;
    }
    if phone.is_some() {
        confidence += CONFIDENCE_PHONE;
    }

    TranscriptBookingDetails {
        attendee_name,
        attendee_email,
        phone,
        date_hint,
        time_hint,
        confidence: confidence.min(1.0),
    }
}

fn extract_name(transcript: &str) -> Option<String> {
    let captures = NAME_RE.captures(transcript)?;
    let raw = captures.get(1)?.as_str();

    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|word| {
            !NAME_STOP_WORDS.contains(&word.to_ascii_lowercase().trim_matches('.'))
        })
        .collect();

    if words.is_empty() {
        return None;
    }

    Some(words.join(" ").trim_end_matches(['.', ',']).to_string())
}

fn extract_date_hint(transcript: &str) -> Option<String> {
    if let Some(m) = ISO_DATE_RE.captures(transcript) {
        return Some(m[1].to_string());
    }
    if let Some(m) = MONTH_DAY_RE.captures(transcript) {
        return Some(format!("{} {}", capitalize(&m[1]), &m[2]));
    }
    WEEKDAY_RE.captures(transcript).map(|m| capitalize(&m[1]))
}

fn extract_time_hint(transcript: &str) -> Option<String> {
    if let Some(m) = CLOCK_TIME_RE.captures(transcript) {
        let hour: u32 = m[1].parse().ok()?;
        if hour == 0 || hour > 12 {
            return None;
        }
        let minute: u32 = m.get(2).map_or(Some(0), |v| v.as_str().parse().ok())?;
        let is_pm = m[3].to_ascii_lowercase().starts_with('p');
        let hour24 = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        return Some(format!("{:02}:{:02}", hour24, minute));
    }

    TWENTY_FOUR_HOUR_RE
        .captures(transcript)
        .map(|m| format!("{:02}:{}", m[1].parse::<u32>().unwrap_or(0), &m[2]))
}

fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
