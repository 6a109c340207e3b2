//! Canonical consent message construction
//!
//! The message is what the wallet actually signs. It is never stored
//! verbatim, so it must be byte-for-byte reconstructible from the consent's
//! own purpose and patient id for verification and audit.

use crate::purpose::ConsentPurpose;

/// Build the canonical consent message for a purpose/patient pair.
///
/// Format: `I consent to: {purpose} for patient: {patientId}`
pub fn consent_message(purpose: &ConsentPurpose, patient_id: &str) -> String {
    format!("I consent to: {} for patient: {}", purpose, patient_id)
}
