use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bookline_core::{AgentCalendarRepository, AppointmentRepository};
use bookline_domain::{
    AgentCalendarConfig, Appointment, AppointmentStatus, BooklineError, Result,
};
use chrono::{DateTime, Utc};

/// In-memory mock for `AppointmentRepository`.
#[derive(Default, Clone)]
pub struct InMemoryAppointmentRepository {
    rows: Arc<Mutex<Vec<Appointment>>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Appointment> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<()> {
        self.rows.lock().unwrap().push(appointment.clone());
        Ok(())
    }

    async fn find_upcoming_by_email(
        &self,
        agent_id: &str,
        attendee_email: &str,
        after: DateTime<Utc>,
    ) -> Result<Option<Appointment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| {
                row.agent_id == agent_id
                    && row.attendee_email.eq_ignore_ascii_case(attendee_email)
                    && matches!(
                        row.status,
                        AppointmentStatus::Scheduled | AppointmentStatus::Rescheduled
                    )
                    && row.start >= after
            })
            .min_by_key(|row| row.start)
            .cloned())
    }

    async fn update(&self, appointment: &Appointment) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|row| row.id == appointment.id) {
            Some(row) => {
                *row = appointment.clone();
                Ok(())
            }
            None => Err(BooklineError::NotFound(format!(
                "appointment not found: {}",
                appointment.id
            ))),
        }
    }
}

/// Fixed-map mock for `AgentCalendarRepository`.
#[derive(Default, Clone)]
pub struct StaticAgentCalendarRepository {
    configs: Arc<Mutex<HashMap<String, AgentCalendarConfig>>>,
}

impl StaticAgentCalendarRepository {
    pub fn with_config(config: AgentCalendarConfig) -> Self {
        let repo = Self::default();
        repo.configs.lock().unwrap().insert(config.agent_id.clone(), config);
        repo
    }
}

#[async_trait]
impl AgentCalendarRepository for StaticAgentCalendarRepository {
    async fn find_by_agent(&self, agent_id: &str) -> Result<Option<AgentCalendarConfig>> {
        Ok(self.configs.lock().unwrap().get(agent_id).cloned())
    }
}
