//! SQLite-backed implementation of the AgentCalendarRepository port.
//!
//! The same table also stores the Google credential associated with each
//! agent calendar; the credential never crosses into the core crate.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bookline_core::AgentCalendarRepository;
use bookline_domain::{AgentCalendarConfig, DayOfWeek, Result, TimeOfDay};
use chrono::Utc;
use rusqlite::{Row, ToSql};
use tracing::debug;

use super::manager::DbManager;
use crate::errors::InfraError;
use crate::integrations::calendar::auth::{CalendarCredential, CredentialStore};

/// SQLite implementation of AgentCalendarRepository
pub struct SqliteAgentCalendarRepository {
    db: Arc<DbManager>,
}

impl SqliteAgentCalendarRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or replace the calendar configuration (and credential) for an
    /// agent. Used by the configuration surface, not by the engine.
    pub fn upsert(
        &self,
        config: &AgentCalendarConfig,
        credential: Option<&CalendarCredential>,
    ) -> Result<()> {
        let conn = self.db.connection()?;
        let now = Utc::now().timestamp();

        let preferred_days = config
            .preferred_days
            .iter()
            .map(|day| day.as_str())
            .collect::<Vec<_>>()
            .join(",");

        conn.execute(
            "INSERT INTO agent_calendars (
                agent_id, calendar_id, timezone, slot_duration_minutes,
                buffer_between_slots_minutes, preferred_days,
                preferred_hours_start, preferred_hours_end,
                min_notice_hours, max_advance_days,
                account_email, refresh_token, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
            ON CONFLICT(agent_id) DO UPDATE SET
                calendar_id = excluded.calendar_id,
                timezone = excluded.timezone,
                slot_duration_minutes = excluded.slot_duration_minutes,
                buffer_between_slots_minutes = excluded.buffer_between_slots_minutes,
                preferred_days = excluded.preferred_days,
                preferred_hours_start = excluded.preferred_hours_start,
                preferred_hours_end = excluded.preferred_hours_end,
                min_notice_hours = excluded.min_notice_hours,
                max_advance_days = excluded.max_advance_days,
                account_email = excluded.account_email,
                refresh_token = excluded.refresh_token,
                updated_at = excluded.updated_at",
            [
                &config.agent_id as &dyn ToSql,
                &config.calendar_id,
                &config.timezone,
                &config.slot_duration_minutes,
                &config.buffer_between_slots_minutes,
                &preferred_days,
                &config.preferred_hours_start.to_string(),
                &config.preferred_hours_end.to_string(),
                &config.min_notice_hours,
                &config.max_advance_days,
                &credential.and_then(|c| c.account_email.clone()),
                &credential.map(|c| c.refresh_token.clone()),
                &now,
            ]
            .as_ref(),
        )
        .map_err(InfraError::from)?;

        debug!(agent_id = %config.agent_id, "agent calendar configuration stored");
        Ok(())
    }
}

#[async_trait]
impl AgentCalendarRepository for SqliteAgentCalendarRepository {
    async fn find_by_agent(&self, agent_id: &str) -> Result<Option<AgentCalendarConfig>> {
        let conn = self.db.connection()?;

        let result = conn.query_row(
            "SELECT agent_id, calendar_id, timezone, slot_duration_minutes,
                    buffer_between_slots_minutes, preferred_days,
                    preferred_hours_start, preferred_hours_end,
                    min_notice_hours, max_advance_days
             FROM agent_calendars
             WHERE agent_id = ?1",
            [&agent_id as &dyn ToSql].as_ref(),
            read_config_row,
        );

        match result {
            Ok(raw) => Ok(Some(raw.into_config()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}

#[async_trait]
impl CredentialStore for SqliteAgentCalendarRepository {
    async fn credential_for_calendar(
        &self,
        calendar_id: &str,
    ) -> Result<Option<CalendarCredential>> {
        let conn = self.db.connection()?;

        let result = conn.query_row(
            "SELECT account_email, refresh_token
             FROM agent_calendars
             WHERE calendar_id = ?1 AND refresh_token IS NOT NULL
             LIMIT 1",
            [&calendar_id as &dyn ToSql].as_ref(),
            |row| {
                Ok(CalendarCredential {
                    account_email: row.get(0)?,
                    refresh_token: row.get(1)?,
                })
            },
        );

        match result {
            Ok(credential) => Ok(Some(credential)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}

/// Raw configuration row; parsing of days and times happens afterwards.
struct ConfigRow {
    agent_id: String,
    calendar_id: String,
    timezone: String,
    slot_duration_minutes: u32,
    buffer_between_slots_minutes: u32,
    preferred_days: String,
    preferred_hours_start: String,
    preferred_hours_end: String,
    min_notice_hours: u32,
    max_advance_days: i64,
}

impl ConfigRow {
    fn into_config(self) -> Result<AgentCalendarConfig> {
        let preferred_days = self
            .preferred_days
            .split(',')
            .filter(|s| !s.is_empty())
            .map(DayOfWeek::from_str)
            .collect::<Result<Vec<_>>>()?;

        Ok(AgentCalendarConfig {
            agent_id: self.agent_id,
            calendar_id: self.calendar_id,
            timezone: self.timezone,
            slot_duration_minutes: self.slot_duration_minutes,
            buffer_between_slots_minutes: self.buffer_between_slots_minutes,
            preferred_days,
            preferred_hours_start: TimeOfDay::from_str(&self.preferred_hours_start)?,
            preferred_hours_end: TimeOfDay::from_str(&self.preferred_hours_end)?,
            min_notice_hours: self.min_notice_hours,
            max_advance_days: self.max_advance_days,
        })
    }
}

fn read_config_row(row: &Row<'_>) -> rusqlite::Result<ConfigRow> {
    Ok(ConfigRow {
        agent_id: row.get(0)?,
        calendar_id: row.get(1)?,
        timezone: row.get(2)?,
        slot_duration_minutes: row.get(3)?,
        buffer_between_slots_minutes: row.get(4)?,
        preferred_days: row.get(5)?,
        preferred_hours_start: row.get(6)?,
        preferred_hours_end: row.get(7)?,
        min_notice_hours: row.get(8)?,
        max_advance_days: row.get(9)?,
    })
}
