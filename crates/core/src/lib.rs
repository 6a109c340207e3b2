//! MedLedger Core - Domain types
//!
//! This crate contains the fundamental types used across MedLedger:
//! - `Consent`: A patient-scoped authorization signed by a wallet account
//! - `ConsentPurpose`: The fixed set of purposes a consent can cover
//! - `ConsentStatus` / `StatusFilter`: Lifecycle states and list filtering
//! - `TxHash`: Validated on-chain transaction identifier

pub mod consent;
pub mod message;
pub mod purpose;

pub use consent::{Consent, ConsentStatus, StatusFilter, TxHash, TxHashError};
pub use message::consent_message;
pub use purpose::{ConsentPurpose, PurposeError};
