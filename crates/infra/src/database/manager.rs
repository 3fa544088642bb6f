//! Database manager - connection pool and schema bootstrap

use bookline_domain::{DatabaseConfig, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    agent_id TEXT NOT NULL,
    attendee_name TEXT NOT NULL,
    attendee_email TEXT NOT NULL,
    start_ts INTEGER NOT NULL,
    end_ts INTEGER NOT NULL,
    status TEXT NOT NULL,
    calendar_event_id TEXT,
    conversation_id TEXT,
    notes TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_appointments_agent_email
    ON appointments(agent_id, attendee_email, start_ts);

CREATE TABLE IF NOT EXISTS agent_calendars (
    agent_id TEXT PRIMARY KEY,
    calendar_id TEXT NOT NULL,
    timezone TEXT NOT NULL,
    slot_duration_minutes INTEGER NOT NULL,
    buffer_between_slots_minutes INTEGER NOT NULL,
    preferred_days TEXT NOT NULL,
    preferred_hours_start TEXT NOT NULL,
    preferred_hours_end TEXT NOT NULL,
    min_notice_hours INTEGER NOT NULL,
    max_advance_days INTEGER NOT NULL,
    account_email TEXT,
    refresh_token TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
";

/// Connection pool wrapper owning schema setup
pub struct DbManager {
    pool: Pool<SqliteConnectionManager>,
}

impl DbManager {
    /// Open (or create) the database at the configured path and run schema
    /// bootstrap.
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let manager = SqliteConnectionManager::file(&config.path);
        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .build(manager)
            .map_err(InfraError::from)?;

        let db = Self { pool };
        db.run_migrations()?;
        info!(path = %config.path, pool_size = config.pool_size, "database ready");
        Ok(db)
    }

    /// Borrow a pooled connection.
    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get().map_err(InfraError::from)?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA).map_err(InfraError::from)?;
        Ok(())
    }
}
