//! Consent Service operations and request/response types

use crate::error::ApiError;
use async_trait::async_trait;
use medledger_core::{Consent, ConsentPurpose, ConsentStatus, TxHash};
use serde::{Deserialize, Serialize};

/// Verdict returned by the verify-signature operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
}

/// Payload for create-consent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsent {
    pub patient_id: String,
    pub purpose: ConsentPurpose,
    pub wallet_address: String,
    pub signature: String,
}

/// Patch for update-consent: the status transition and, when activating,
/// the externally-recorded transaction hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentPatch {
    pub status: ConsentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_tx_hash: Option<TxHash>,
}

/// The Consent Service as seen by the dashboard
///
/// Implementations can be:
/// - InMemoryConsentService: reference backend for tests and development
/// - A remote HTTP client in a deployed dashboard
#[async_trait]
pub trait ConsentService: Send + Sync {
    /// Verify a signature against the canonical message and account.
    ///
    /// `Ok(None)` means the service produced no verdict; callers treat
    /// that the same as a positive verdict.
    async fn verify_signature(
        &self,
        message: &str,
        signature: &str,
        account: &str,
    ) -> Result<Option<VerifyOutcome>, ApiError>;

    /// Create a consent; the service assigns id, creation time, and the
    /// initial `pending` status
    async fn create_consent(&self, consent: NewConsent) -> Result<Consent, ApiError>;

    /// Apply a status transition to an existing consent
    async fn update_consent(&self, id: &str, patch: ConsentPatch) -> Result<Consent, ApiError>;

    /// List consents, optionally constrained by patient and status.
    ///
    /// The response shape is deliberately loose (bare array or wrapper
    /// object); use [`crate::normalize_consent_list`] to obtain records.
    async fn list_consents(
        &self,
        patient_id: Option<&str>,
        status: Option<&ConsentStatus>,
    ) -> Result<serde_json::Value, ApiError>;
}
