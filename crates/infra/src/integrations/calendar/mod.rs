//! Calendar provider integration
//!
//! HTTP adapters for the external calendar APIs plus access-token
//! provisioning. The core crate only sees the `CalendarEventSource` and
//! `CalendarEventWriter` ports implemented by [`CalendarClient`].

pub mod auth;
pub mod client;
pub mod providers;

pub use auth::{
    AccessTokenProvider, CalendarCredential, CredentialStore, RefreshingAccessTokenProvider,
    StaticAccessTokenProvider,
};
pub use client::CalendarClient;
pub use providers::{create_provider, CalendarProviderApi, GoogleCalendarProvider};
