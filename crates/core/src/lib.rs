//! # Bookline Core
//!
//! Pure scheduling logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Timezone-aware slot generation and validation
//! - Booking orchestration over repository ports
//! - The voice tool-call dispatcher
//!
//! ## Architecture Principles
//! - Only depends on `bookline-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod booking;
pub mod dispatch;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use booking::ports::{
    AgentCalendarRepository, AppointmentRepository, CalendarEventWriter, EventDraft,
};
pub use booking::{
    BookingOutcome, BookingRequest, BookingService, CancelOutcome, RescheduleOutcome,
};
pub use dispatch::ToolDispatcher;
pub use scheduling::ports::{CalendarEventSource, Clock, SystemClock};
pub use scheduling::{AvailabilityService, NextAvailableSlot};
