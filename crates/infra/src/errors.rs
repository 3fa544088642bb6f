//! Conversions from external infrastructure errors into domain errors.

use bookline_domain::BooklineError;
use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BooklineError);

impl From<InfraError> for BooklineError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BooklineError> for InfraError {
    fn from(value: BooklineError) -> Self {
        InfraError(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;

        let mapped = match value {
            SqlError::QueryReturnedNoRows => {
                BooklineError::NotFound("query returned no rows".into())
            }
            SqlError::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => BooklineError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        BooklineError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => {
                        BooklineError::Database(format!("constraint violation: {}", message))
                    }
                    _ => BooklineError::Database(message),
                }
            }
            other => BooklineError::Database(other.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(BooklineError::Database(format!("connection pool error: {}", value)))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let mapped = if value.is_timeout() {
            BooklineError::Network("request timed out".into())
        } else if value.is_connect() {
            BooklineError::Network(format!("connection failed: {}", value))
        } else {
            BooklineError::Network(value.to_string())
        };
        InfraError(mapped)
    }
}
