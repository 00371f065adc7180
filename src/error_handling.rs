use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Invalid run settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    ZeroValue(&'static str),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid endpoint URL '{0}': {1}")]
    InvalidEndpoint(String, url::ParseError),
}

/// A failed attempt at fetching one page from the query service.
///
/// Every variant is treated as transient by the harvester: the page is retried
/// until the attempt ceiling is reached.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}")]
    Endpoint { status: StatusCode },

    /// The request never produced a complete response (timeout, connect, body read).
    #[error("transport error: {0}")]
    Transport(#[from] ReqwestError),

    /// The body was not a valid SPARQL JSON result (usually truncated).
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl FetchError {
    /// Classifies the failure for statistics.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::Endpoint { status } if *status == StatusCode::TOO_MANY_REQUESTS => {
                ErrorType::EndpointRateLimited
            }
            FetchError::Endpoint { status } if status.is_server_error() => {
                ErrorType::EndpointInternalError
            }
            FetchError::Endpoint { .. } => ErrorType::EndpointRejectedQuery,
            FetchError::Transport(e) if e.is_timeout() => ErrorType::TransportTimeout,
            FetchError::Transport(e) if e.is_connect() => ErrorType::TransportConnect,
            FetchError::Transport(_) => ErrorType::TransportOther,
            FetchError::Malformed(_) => ErrorType::MalformedResponse,
        }
    }
}

/// Kinds of page failure tracked during a harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    EndpointInternalError,
    EndpointRateLimited,
    EndpointRejectedQuery,
    TransportTimeout,
    TransportConnect,
    TransportOther,
    MalformedResponse,
    OffsetAbandoned,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::EndpointInternalError => "Endpoint internal error",
            ErrorType::EndpointRateLimited => "Endpoint rate limited",
            ErrorType::EndpointRejectedQuery => "Endpoint rejected query",
            ErrorType::TransportTimeout => "Request timeout",
            ErrorType::TransportConnect => "Connection error",
            ErrorType::TransportOther => "Other transport error",
            ErrorType::MalformedResponse => "Malformed response",
            ErrorType::OffsetAbandoned => "Offset abandoned",
        }
    }
}

/// Error statistics tracker.
///
/// All error types are initialized to zero on creation.
#[derive(Debug)]
pub struct ErrorStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl Default for ErrorStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ErrorStats { errors }
    }

    pub fn increment(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        ErrorType::iter().map(|e| self.get_count(e)).sum()
    }

    /// Non-zero counters in declaration order.
    pub fn non_zero(&self) -> Vec<(ErrorType, usize)> {
        ErrorType::iter()
            .map(|e| (e, self.get_count(e)))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}
