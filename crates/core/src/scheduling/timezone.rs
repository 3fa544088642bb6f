//! Timezone-aware instant construction
//!
//! Converts civil `(date, time-of-day, IANA timezone)` tuples into absolute
//! instants. All policy windows in the engine are civil quantities in the
//! agent timezone, so correctness across DST transitions lives here and
//! nowhere else.

use bookline_domain::{BooklineError, Result, TimeOfDay};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolve an IANA timezone name.
///
/// Unknown names surface as a configuration error; there is no fallback to
/// server-local time or UTC.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| BooklineError::Config(format!("invalid IANA timezone: {}", name)))
}

/// Convert a civil date and time-of-day in `tz` into an absolute instant.
///
/// Skipped civil times (spring-forward gap) resolve to the first valid
/// instant at or after the requested wall time; ambiguous times (fall-back)
/// resolve to the earlier offset.
pub fn civil_datetime(date: NaiveDate, time: TimeOfDay, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(time.as_naive_time());
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Inside a DST gap. Real-world gaps are at most a few hours, so a
            // bounded forward probe always lands on a valid wall time.
            let mut probe = naive;
            for _ in 0..16 {
                probe += Duration::minutes(15);
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(dt) => return dt.with_timezone(&Utc),
                    LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
                    LocalResult::None => continue,
                }
            }
            Utc.from_utc_datetime(&naive)
        }
    }
}

/// Start and end instants of a civil day: 00:00 and 23:59 in `tz`.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (civil_datetime(date, TimeOfDay::MIDNIGHT, tz), civil_datetime(date, TimeOfDay::DAY_END, tz))
}
