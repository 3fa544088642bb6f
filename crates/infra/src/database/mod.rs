//! SQLite persistence layer

pub mod agent_calendar_repository;
pub mod appointment_repository;
pub mod manager;

pub use agent_calendar_repository::SqliteAgentCalendarRepository;
pub use appointment_repository::SqliteAppointmentRepository;
pub use manager::DbManager;
