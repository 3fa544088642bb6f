//! External service integrations

pub mod calendar;

pub use calendar::{
    create_provider, AccessTokenProvider, CalendarClient, CalendarCredential,
    CalendarProviderApi, CredentialStore, GoogleCalendarProvider,
    RefreshingAccessTokenProvider, StaticAccessTokenProvider,
};
