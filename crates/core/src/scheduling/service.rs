//! Availability service - slot generation, validation, and scanning
//!
//! Everything here recomputes from the live calendar on every call. There is
//! deliberately no caching or memoization between calls: the external
//! calendar is the single source of truth, and a cached event list would
//! reintroduce the stale-conflict risk the fail-open policy already accepts.

use std::collections::BTreeMap;
use std::sync::Arc;

use bookline_domain::constants::{MAX_ALTERNATIVE_SLOTS, PAST_TOLERANCE_MINUTES};
use bookline_domain::utils::speech::{spoken_day_list, spoken_time};
use bookline_domain::{
    AgentCalendarConfig, CalendarEvent, DayOfWeek, DaySchedule, Result, SlotCheck, TimeOfDay,
    TimeSlot,
};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ports::{CalendarEventSource, Clock};
use super::timezone::{civil_datetime, day_bounds, resolve_timezone};

/// Which slot pool alternative suggestions are drawn from.
enum AlternativePool {
    /// Any available slot of the day.
    Any,
    /// Available slots on a preferred day only.
    Preferred,
}

/// First open slot found by a forward scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAvailableSlot {
    pub date: NaiveDate,
    pub slot: TimeSlot,
}

/// Calendar availability engine
///
/// Generates candidate slots for a civil day, validates individual booking
/// requests against the full policy gate, and scans date ranges.
pub struct AvailabilityService {
    events: Arc<dyn CalendarEventSource>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(events: Arc<dyn CalendarEventSource>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }

    /// Enumerate candidate slots for one civil day.
    ///
    /// Walks the preferred-hours window in steps of slot duration plus
    /// buffer, drops the partial trailing slot, and flags each candidate
    /// against existing events, the minimum-notice boundary, and the
    /// max-advance window. `preferred_slots` mirrors `slots` only when the
    /// day is on the agent's preferred-days allowlist.
    pub async fn day_schedule(
        &self,
        config: &AgentCalendarConfig,
        date: NaiveDate,
    ) -> Result<DaySchedule> {
        config.validate()?;
        let tz = resolve_timezone(&config.timezone)?;
        let now = self.clock.now();

        let (day_start, day_end) = day_bounds(date, tz);
        let events = self.events_for_window(&config.calendar_id, day_start, day_end).await;

        let slots = self.enumerate_slots(config, date, tz, now, &events);
        let is_preferred_day = config.is_preferred_day(date.weekday());
        let preferred_slots = if is_preferred_day { slots.clone() } else { Vec::new() };

        debug!(
            agent_id = %config.agent_id,
            date = %date,
            slot_count = slots.len(),
            is_preferred_day,
            event_count = events.len(),
            "generated day schedule"
        );

        Ok(DaySchedule { date, timezone: config.timezone.clone(), slots, preferred_slots })
    }

    /// Validate one requested slot against the full policy gate.
    ///
    /// Checks run in order; the first failure wins and returns a
    /// user-readable reason plus alternative suggestions where they help.
    pub async fn check_slot(
        &self,
        config: &AgentCalendarConfig,
        date: NaiveDate,
        time: TimeOfDay,
    ) -> Result<SlotCheck> {
        config.validate()?;
        let tz = resolve_timezone(&config.timezone)?;
        let now = self.clock.now();

        let start = civil_datetime(date, time, tz);
        let end = start + Duration::minutes(config.slot_duration_minutes as i64);
        let requested = TimeSlot { start, end, available: false };

        // 1. Past request. Nothing useful to suggest for a date mistake, so
        //    no alternatives. One hour of tolerance absorbs clock skew and
        //    "right now" phrasing.
        if start < now - Duration::minutes(PAST_TOLERANCE_MINUTES) {
            return Ok(SlotCheck::rejected(
                Some(requested),
                "That date and time has already passed.",
                vec![],
            ));
        }

        // 2. Minimum notice, skipped entirely when configured to zero.
        if config.min_notice_hours > 0 {
            let boundary = now + Duration::hours(config.min_notice_hours as i64);
            if start < boundary {
                let alternatives =
                    self.alternative_slots(config, date, AlternativePool::Any).await?;
                return Ok(SlotCheck::rejected(
                    Some(requested),
                    format!(
                        "Appointments must be booked at least {} hours in advance.",
                        config.min_notice_hours
                    ),
                    alternatives,
                ));
            }
        }

        // 3. Max advance, counted in calendar days in the agent timezone.
        if !within_max_advance(config, date, tz, now) {
            return Ok(SlotCheck::rejected(
                Some(requested),
                format!(
                    "Appointments can only be booked up to {} days in advance.",
                    config.max_advance_days
                ),
                vec![],
            ));
        }

        // 4. Day-of-week allowlist.
        if !config.is_preferred_day(date.weekday()) {
            let alternatives =
                self.alternative_slots(config, date, AlternativePool::Preferred).await?;
            return Ok(SlotCheck::rejected(
                Some(requested),
                format!(
                    "We do not take appointments on {}s. We are open on {}.",
                    DayOfWeek::from(date.weekday()),
                    spoken_day_list(&config.preferred_days)
                ),
                alternatives,
            ));
        }

        // 5. Hour window: both slot boundaries must fall inside it.
        let window_start = civil_datetime(date, config.preferred_hours_start, tz);
        let window_end = civil_datetime(date, config.preferred_hours_end, tz);
        if start < window_start || end > window_end {
            let alternatives =
                self.alternative_slots(config, date, AlternativePool::Preferred).await?;
            return Ok(SlotCheck::rejected(
                Some(requested),
                format!(
                    "Appointments are available between {} and {}.",
                    spoken_time(config.preferred_hours_start.as_naive_time()),
                    spoken_time(config.preferred_hours_end.as_naive_time())
                ),
                alternatives,
            ));
        }

        // 6. Conflict against live, non-cancelled events.
        let (day_start, day_end) = day_bounds(date, tz);
        let events = self.events_for_window(&config.calendar_id, day_start, day_end).await;
        if events.iter().any(|event| event.overlaps(start, end)) {
            let alternatives = self.alternative_slots(config, date, AlternativePool::Any).await?;
            return Ok(SlotCheck::rejected(
                Some(requested),
                "That time is already booked.",
                alternatives,
            ));
        }

        Ok(SlotCheck::accepted(TimeSlot { start, end, available: true }))
    }

    /// Build a week-at-a-glance style map over consecutive civil days.
    ///
    /// Non-preferred days are skipped, the scan stops at the max-advance
    /// boundary, and only days with at least one open slot are included. The
    /// ISO date keys keep the map chronologically ordered.
    pub async fn day_schedules(
        &self,
        config: &AgentCalendarConfig,
        start_date: NaiveDate,
        num_days: u32,
    ) -> Result<BTreeMap<String, DaySchedule>> {
        config.validate()?;
        let tz = resolve_timezone(&config.timezone)?;
        let now = self.clock.now();

        let mut schedules = BTreeMap::new();
        for offset in 0..num_days {
            let date = start_date + Days::new(offset as u64);
            if !within_max_advance(config, date, tz, now) {
                break;
            }
            if !config.is_preferred_day(date.weekday()) {
                continue;
            }
            let schedule = self.day_schedule(config, date).await?;
            if schedule.slots.iter().any(|slot| slot.available) {
                schedules.insert(date.to_string(), schedule);
            }
        }
        Ok(schedules)
    }

    /// Scan forward for the first open slot: lowest date, then earliest time.
    pub async fn find_next_available(
        &self,
        config: &AgentCalendarConfig,
        from: Option<NaiveDate>,
    ) -> Result<Option<NextAvailableSlot>> {
        config.validate()?;
        let tz = resolve_timezone(&config.timezone)?;
        let now = self.clock.now();
        let start_date = from.unwrap_or_else(|| now.with_timezone(&tz).date_naive());

        for offset in 0..=config.max_advance_days.max(0) as u64 {
            let date = start_date + Days::new(offset);
            if !within_max_advance(config, date, tz, now) {
                break;
            }
            if !config.is_preferred_day(date.weekday()) {
                continue;
            }
            let schedule = self.day_schedule(config, date).await?;
            if let Some(slot) = schedule.slots.iter().find(|slot| slot.available) {
                return Ok(Some(NextAvailableSlot { date, slot: *slot }));
            }
        }
        Ok(None)
    }

    /// Fetch events for a window, dropping cancelled entries.
    ///
    /// Fail-open: a provider failure degrades to an empty event list so slot
    /// generation proceeds optimistically instead of blocking a live call.
    /// The cost is a rare double-booking window while the provider is down.
    async fn events_for_window(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        match self.events.fetch_events(calendar_id, time_min, time_max).await {
            Ok(events) => {
                events.into_iter().filter(|event| !event.status.is_cancelled()).collect()
            }
            Err(error) => {
                warn!(
                    calendar_id,
                    error = %error,
                    "calendar fetch failed; generating availability against an empty event list"
                );
                Vec::new()
            }
        }
    }

    fn enumerate_slots(
        &self,
        config: &AgentCalendarConfig,
        date: NaiveDate,
        tz: Tz,
        now: DateTime<Utc>,
        events: &[CalendarEvent],
    ) -> Vec<TimeSlot> {
        let window_start = civil_datetime(date, config.preferred_hours_start, tz);
        let window_end = civil_datetime(date, config.preferred_hours_end, tz);
        let duration = Duration::minutes(config.slot_duration_minutes as i64);
        let step = Duration::minutes(config.slot_step_minutes() as i64);

        // With zero notice this still excludes slots that already started.
        let notice_boundary = now + Duration::hours(config.min_notice_hours as i64);
        let within_advance = within_max_advance(config, date, tz, now);

        let mut slots = Vec::new();
        let mut cursor = window_start;
        loop {
            let end = cursor + duration;
            if end > window_end {
                break;
            }
            let conflicts = events.iter().any(|event| event.overlaps(cursor, end));
            let available = !conflicts && cursor >= notice_boundary && within_advance;
            slots.push(TimeSlot { start: cursor, end, available });
            cursor += step;
        }
        slots
    }

    async fn alternative_slots(
        &self,
        config: &AgentCalendarConfig,
        date: NaiveDate,
        pool: AlternativePool,
    ) -> Result<Vec<TimeSlot>> {
        // Re-generates from the live calendar on purpose; see module docs.
        let schedule = self.day_schedule(config, date).await?;
        let slots = match pool {
            AlternativePool::Any => schedule.available(),
            AlternativePool::Preferred => schedule.available_preferred(),
        };
        Ok(slots.into_iter().take(MAX_ALTERNATIVE_SLOTS).collect())
    }
}

/// Day-level max-advance gate, evaluated on civil dates in the agent
/// timezone.
fn within_max_advance(
    config: &AgentCalendarConfig,
    date: NaiveDate,
    tz: Tz,
    now: DateTime<Utc>,
) -> bool {
    let today = now.with_timezone(&tz).date_naive();
    date <= today + Days::new(config.max_advance_days.max(0) as u64)
}
