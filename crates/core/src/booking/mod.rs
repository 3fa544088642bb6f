//! Booking orchestration
//!
//! Creates, cancels, and reschedules appointments over repository ports,
//! re-validating availability against the live calendar before every write.

pub mod ports;
pub mod service;

pub use service::{
    BookingOutcome, BookingRequest, BookingService, CancelOutcome, RescheduleOutcome,
};
