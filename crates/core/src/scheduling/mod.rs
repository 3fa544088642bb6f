//! Calendar availability engine
//!
//! Slot generation and validation against the live state of an external
//! calendar, evaluated in the agent's configured timezone.

pub mod ports;
pub mod service;
pub mod timezone;

pub use service::{AvailabilityService, NextAvailableSlot};
