//! Spoken-form formatting for voice replies
//!
//! The exact phrasing here is a compatibility surface: voice AI prompts
//! phrase-match on these renderings, so dates are always
//! `"<Weekday>, <Month> <Day>, <Year>"` and times `"<h>:<mm> <AM|PM>"`.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::types::calendar::DayOfWeek;

/// Format a civil date the way it is read to a caller.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
///
/// use bookline_domain::utils::speech::spoken_date;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// assert_eq!(spoken_date(date), "Monday, March 2, 2026");
/// ```
pub fn spoken_date(date: NaiveDate) -> String {
    format!("{}, {} {}, {}", date.format("%A"), date.format("%B"), date.day(), date.year())
}

/// Format a civil time-of-day in 12-hour clock form.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
///
/// use bookline_domain::utils::speech::spoken_time;
///
/// assert_eq!(spoken_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()), "9:00 AM");
/// assert_eq!(spoken_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap()), "2:30 PM");
/// ```
pub fn spoken_time(time: NaiveTime) -> String {
    let (hour, suffix) = match time.hour() {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    format!("{}:{:02} {}", hour, time.minute(), suffix)
}

/// Join weekday names into a spoken list ("Monday, Tuesday, and Friday").
pub fn spoken_day_list(days: &[DayOfWeek]) -> String {
    match days {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => {
            let head = init.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ");
            format!("{}, and {}", head, last)
        }
    }
}
