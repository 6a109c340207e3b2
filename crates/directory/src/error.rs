//! Directory error types

use thiserror::Error;

/// Errors from the records directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Patient not found: {id}")]
    NotFound { id: String },

    #[error("{message}")]
    Service { message: String },

    #[error("Directory unreachable: {source}")]
    Connection {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DirectoryError {
    pub fn service(message: impl Into<String>) -> Self {
        DirectoryError::Service {
            message: message.into(),
        }
    }
}
