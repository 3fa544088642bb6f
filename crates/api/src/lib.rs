//! # Bookline App
//!
//! Composition root: wires the SQLite repositories and the Google Calendar
//! client into the core scheduling services and exposes the webhook command
//! handlers.

pub mod commands;
pub mod context;
pub mod utils;

pub use context::AppContext;
