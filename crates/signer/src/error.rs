//! Signer error types

use thiserror::Error;

/// Errors from the wallet signing capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The user declined the signing request
    #[error("Signing request rejected by user")]
    Rejected,

    /// The wallet disconnected while a request was in flight
    #[error("Wallet disconnected")]
    Disconnected,

    /// Key material could not be loaded or parsed
    #[error("Invalid wallet key: {reason}")]
    InvalidKey { reason: String },

    /// A signature did not verify against the given message and account
    #[error("Signature verification failed: {0}")]
    VerificationFailed(String),
}
