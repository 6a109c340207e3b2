//! Consent Service error types

use thiserror::Error;

/// Errors from the Consent Service
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service processed the request and rejected it
    #[error("{message}")]
    Service { message: String },

    /// The service could not be reached at all
    #[error("Consent service unreachable: {source}")]
    Connection {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No record with the given id
    #[error("Consent not found: {id}")]
    NotFound { id: String },
}

impl ApiError {
    /// Shorthand for a service-side rejection
    pub fn service(message: impl Into<String>) -> Self {
        ApiError::Service {
            message: message.into(),
        }
    }

    /// Shorthand for an unreachable-service failure
    pub fn connection(message: impl Into<String>) -> Self {
        let message: String = message.into();
        ApiError::Connection {
            source: message.into(),
        }
    }
}
