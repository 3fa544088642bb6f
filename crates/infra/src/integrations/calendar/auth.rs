//! Access-token provisioning for calendar API requests
//!
//! The engine never manages OAuth lifecycle; it asks a provider for a valid
//! bearer token and lets the implementation decide how to produce one. The
//! production implementation exchanges a stored refresh token at the Google
//! token endpoint and caches the result until shortly before expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bookline_domain::{BooklineError, GoogleApiConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::InfraError;

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Refresh slightly before the provider-reported expiry.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// Google credential stored alongside an agent calendar configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCredential {
    pub account_email: Option<String>,
    pub refresh_token: String,
}

/// Lookup of the stored credential for a calendar.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn credential_for_calendar(
        &self,
        calendar_id: &str,
    ) -> Result<Option<CalendarCredential>>;
}

/// Supplies a valid bearer token for calendar API requests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self, calendar_id: &str) -> Result<String>;
}

/// Fixed token, for tests and single-tenant development setups.
pub struct StaticAccessTokenProvider {
    token: String,
}

impl StaticAccessTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticAccessTokenProvider {
    async fn access_token(&self, _calendar_id: &str) -> Result<String> {
        Ok(self.token.clone())
    }
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Refresh-token exchange against the Google OAuth token endpoint, with a
/// per-calendar in-memory cache.
pub struct RefreshingAccessTokenProvider {
    google: GoogleApiConfig,
    store: Arc<dyn CredentialStore>,
    http: Client,
    token_endpoint: String,
    cache: Mutex<HashMap<String, CachedToken>>,
}

impl RefreshingAccessTokenProvider {
    pub fn new(google: GoogleApiConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            google,
            store,
            http: Client::new(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Point the exchange at a different endpoint (test servers).
    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    fn cached(&self, calendar_id: &str) -> Option<String> {
        let cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache
            .get(calendar_id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.token.clone())
    }

    fn store_token(&self, calendar_id: &str, token: String, expires_in: i64) {
        let ttl = Duration::from_secs((expires_in.max(0) as u64).saturating_sub(EXPIRY_MARGIN_SECS));
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(
            calendar_id.to_string(),
            CachedToken { token, expires_at: Instant::now() + ttl },
        );
    }

    async fn exchange(&self, refresh_token: &str) -> Result<(String, i64)> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&[
                ("client_id", self.google.client_id.as_str()),
                ("client_secret", self.google.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(BooklineError::Auth(format!(
                "token refresh failed ({}): {}",
                status, body
            )));
        }

        let refreshed: TokenRefreshResponse =
            response.json().await.map_err(InfraError::from)?;
        Ok((refreshed.access_token, refreshed.expires_in))
    }
}

#[async_trait]
impl AccessTokenProvider for RefreshingAccessTokenProvider {
    async fn access_token(&self, calendar_id: &str) -> Result<String> {
        if let Some(token) = self.cached(calendar_id) {
            return Ok(token);
        }

        let Some(credential) = self.store.credential_for_calendar(calendar_id).await? else {
            return Err(BooklineError::Auth(format!(
                "no Google credential stored for calendar {}",
                calendar_id
            )));
        };

        debug!(calendar_id, "refreshing calendar access token");
        let (token, expires_in) = self.exchange(&credential.refresh_token).await?;
        self.store_token(calendar_id, token.clone(), expires_in);
        Ok(token)
    }
}

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    expires_in: i64,
}
