//! Error types for appointbook.
//!
//! Booking and cancellation rejections live in [`crate::rules::Rejection`];
//! this module wraps them together with everything else that can go wrong
//! (configuration, terminal I/O, rendering) into one crate-wide error.

use thiserror::Error;

use crate::appointment::AppointmentId;
use crate::rules::Rejection;

/// The main error type for appointbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Domain Errors ===
    /// A booking or cancellation was refused by the rule-set.
    #[error("{0}")]
    Rejected(#[from] Rejection),

    /// No confirmed appointment carries the given identifier.
    #[error("no confirmed appointment with id {0}")]
    AppointmentNotFound(AppointmentId),

    /// An appointment identifier could not be parsed.
    #[error("invalid appointment id '{input}'")]
    InvalidAppointmentId {
        /// The text that failed to parse.
        input: String,
    },

    /// A date or time typed by the user could not be parsed.
    #[error("invalid {field} '{input}', expected {expected}")]
    InvalidInput {
        /// Which field was being parsed.
        field: &'static str,
        /// The text that failed to parse.
        input: String,
        /// Human-readable description of the expected format.
        expected: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Terminal or file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for appointbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an input parsing error.
    #[must_use]
    pub fn invalid_input(
        field: &'static str,
        input: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidInput {
            field,
            input: input.into(),
            expected,
        }
    }

    /// The rule-set rejection behind this error, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(rejection) => Some(*rejection),
            _ => None,
        }
    }
}
