//! MedLedger Consent Service boundary
//!
//! The Consent Service is the remote store behind the dashboard. It exposes
//! four operations: verify-signature, create-consent, update-consent, and
//! list-consents. `InMemoryConsentService` is the reference implementation
//! used by tests and the development backend; list responses come back as
//! loosely-typed JSON and are shaped by [`normalize_consent_list`].

mod error;
mod memory;
mod normalize;
mod types;

pub use error::ApiError;
pub use memory::{InMemoryConsentService, VerifyBehavior};
pub use normalize::normalize_consent_list;
pub use types::{ConsentPatch, ConsentService, NewConsent, VerifyOutcome};
