//! SQLite-backed implementation of the AppointmentRepository port.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bookline_core::AppointmentRepository;
use bookline_domain::{Appointment, AppointmentStatus, BooklineError, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Row, ToSql};
use tracing::debug;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite implementation of AppointmentRepository
pub struct SqliteAppointmentRepository {
    db: Arc<DbManager>,
}

impl SqliteAppointmentRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<()> {
        let conn = self.db.connection()?;

        conn.execute(
            "INSERT INTO appointments (
                id, agent_id, attendee_name, attendee_email, start_ts, end_ts,
                status, calendar_event_id, conversation_id, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            [
                &appointment.id as &dyn ToSql,
                &appointment.agent_id,
                &appointment.attendee_name,
                &appointment.attendee_email,
                &appointment.start.timestamp(),
                &appointment.end.timestamp(),
                &appointment.status.as_str(),
                &appointment.calendar_event_id,
                &appointment.conversation_id,
                &appointment.notes,
                &appointment.created_at.timestamp(),
                &appointment.updated_at.timestamp(),
            ]
            .as_ref(),
        )
        .map_err(InfraError::from)?;

        debug!(appointment_id = %appointment.id, "appointment inserted");
        Ok(())
    }

    async fn find_upcoming_by_email(
        &self,
        agent_id: &str,
        attendee_email: &str,
        after: DateTime<Utc>,
    ) -> Result<Option<Appointment>> {
        let conn = self.db.connection()?;

        let result = conn.query_row(
            "SELECT id, agent_id, attendee_name, attendee_email, start_ts, end_ts,
                    status, calendar_event_id, conversation_id, notes,
                    created_at, updated_at
             FROM appointments
             WHERE agent_id = ?1
               AND lower(attendee_email) = lower(?2)
               AND status IN ('scheduled', 'rescheduled')
               AND start_ts >= ?3
             ORDER BY start_ts ASC
             LIMIT 1",
            [&agent_id as &dyn ToSql, &attendee_email, &after.timestamp()].as_ref(),
            read_row,
        );

        match result {
            Ok(raw) => Ok(Some(raw.into_appointment()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn update(&self, appointment: &Appointment) -> Result<()> {
        let conn = self.db.connection()?;

        let changed = conn
            .execute(
                "UPDATE appointments
                 SET attendee_name = ?1, attendee_email = ?2, start_ts = ?3, end_ts = ?4,
                     status = ?5, calendar_event_id = ?6, notes = ?7, updated_at = ?8
                 WHERE id = ?9",
                [
                    &appointment.attendee_name as &dyn ToSql,
                    &appointment.attendee_email,
                    &appointment.start.timestamp(),
                    &appointment.end.timestamp(),
                    &appointment.status.as_str(),
                    &appointment.calendar_event_id,
                    &appointment.notes,
                    &appointment.updated_at.timestamp(),
                    &appointment.id,
                ]
                .as_ref(),
            )
            .map_err(InfraError::from)?;

        if changed == 0 {
            return Err(BooklineError::NotFound(format!(
                "appointment not found: {}",
                appointment.id
            )));
        }
        Ok(())
    }
}

/// Raw appointment row, read with rusqlite errors only; domain conversion
/// (status parsing, epoch decoding) happens afterwards.
struct AppointmentRow {
    id: String,
    agent_id: String,
    attendee_name: String,
    attendee_email: String,
    start_ts: i64,
    end_ts: i64,
    status: String,
    calendar_event_id: Option<String>,
    conversation_id: Option<String>,
    notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl AppointmentRow {
    fn into_appointment(self) -> Result<Appointment> {
        Ok(Appointment {
            id: self.id,
            agent_id: self.agent_id,
            attendee_name: self.attendee_name,
            attendee_email: self.attendee_email,
            start: epoch_to_utc(self.start_ts)?,
            end: epoch_to_utc(self.end_ts)?,
            status: AppointmentStatus::from_str(&self.status)?,
            calendar_event_id: self.calendar_event_id,
            conversation_id: self.conversation_id,
            notes: self.notes,
            created_at: epoch_to_utc(self.created_at)?,
            updated_at: epoch_to_utc(self.updated_at)?,
        })
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        agent_id: row.get(1)?,
        attendee_name: row.get(2)?,
        attendee_email: row.get(3)?,
        start_ts: row.get(4)?,
        end_ts: row.get(5)?,
        status: row.get(6)?,
        calendar_event_id: row.get(7)?,
        conversation_id: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn epoch_to_utc(ts: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| BooklineError::Database(format!("invalid stored timestamp: {}", ts)))
}
