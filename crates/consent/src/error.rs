//! Workflow error taxonomy
//!
//! Every exit path of the authorization workflow is a distinct variant so
//! callers can tell a precondition failure from a signing rejection from a
//! backend verdict.

use crate::anchor::AnchorError;
use medledger_api::ApiError;
use medledger_core::PurposeError;
use medledger_signer::SignerError;
use thiserror::Error;

/// Errors from the consent workflow
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// No wallet is connected; nothing was signed or sent
    #[error("No wallet connected - connect a wallet to manage consents")]
    NotConnected,

    /// The patient id was empty; nothing was signed or sent
    #[error("Patient ID is required")]
    EmptyPatientId,

    /// The purpose was empty or outside the enumerated set
    #[error(transparent)]
    Purpose(#[from] PurposeError),

    /// The user rejected the signing request or the wallet failed
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    /// The backend explicitly judged the signature invalid
    #[error("Signature verification failed on backend - consent was not created")]
    VerificationRejected,

    /// Activation requested for a consent not in the displayed list
    #[error("Consent not found: {0}")]
    UnknownConsent(String),

    /// Activation requested for a consent that is not pending
    #[error("Consent {id} is not pending (status: {status})")]
    NotPending { id: String, status: String },

    /// The transaction anchor could not supply a hash
    #[error(transparent)]
    Anchor(#[from] AnchorError),

    /// A Consent Service call failed
    #[error("{0}")]
    Service(#[from] ApiError),
}
