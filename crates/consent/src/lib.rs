//! # MedLedger Consent Workflow
//!
//! The consent authorization workflow: turning a purpose/patient pair into
//! a signed, backend-verified consent record and mediating its lifecycle.
//!
//! ## Flow
//! - `authorize`: message → sign → verify (best-effort) → create → refresh
//! - `activate`: pending → active with an externally-supplied tx hash
//! - `refresh`: replace the local list wholesale under the active filter
//!
//! ## Failure policy
//! - Preconditions are checked before any side effect
//! - An explicit negative verification verdict aborts creation
//! - A failed verification *call* is logged and does not abort
//! - Service failures surface the underlying message; a failed list fetch
//!   empties the local list

mod anchor;
mod error;
mod state;
mod workflow;

pub use anchor::{AnchorError, DigestAnchor, FixedAnchor, TransactionAnchor};
pub use error::WorkflowError;
pub use state::ListState;
pub use workflow::ConsentWorkflow;
