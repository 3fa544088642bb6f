//! Calendar provider abstraction
//!
//! Defines the raw-API trait implemented per provider. Google Calendar is the
//! only provider currently wired in.

pub mod google;
pub mod traits;

pub use google::GoogleCalendarProvider;
pub use traits::{create_provider, CalendarProviderApi, FetchEventsResponse, RawCalendarEvent};
