//! Application context - dependency injection container

use std::sync::Arc;

use bookline_core::{AvailabilityService, BookingService, SystemClock, ToolDispatcher};
use bookline_domain::{Config, Result};
use bookline_infra::{
    create_provider, CalendarClient, DbManager, RefreshingAccessTokenProvider,
    SqliteAgentCalendarRepository, SqliteAppointmentRepository,
};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub dispatcher: Arc<ToolDispatcher>,
}

impl AppContext {
    /// Wire the production adapters into the core services.
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let db = Arc::new(DbManager::new(&config.database)?);

        let agents = Arc::new(SqliteAgentCalendarRepository::new(db.clone()));
        let appointments = Arc::new(SqliteAppointmentRepository::new(db.clone()));

        let provider: Arc<_> = create_provider("google")?.into();
        let tokens = Arc::new(RefreshingAccessTokenProvider::new(
            config.google.clone(),
            agents.clone(),
        ));
        let calendar = Arc::new(CalendarClient::new(provider, tokens));

        let clock = Arc::new(SystemClock);
        let availability =
            Arc::new(AvailabilityService::new(calendar.clone(), clock.clone()));
        let booking = Arc::new(BookingService::new(
            availability.clone(),
            appointments,
            calendar,
            clock,
        ));
        let dispatcher = Arc::new(ToolDispatcher::new(agents, availability, booking));

        info!("application context initialised");
        Ok(Arc::new(Self { config, db, dispatcher }))
    }
}
