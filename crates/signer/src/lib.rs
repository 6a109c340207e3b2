//! MedLedger Wallet Signer
//!
//! The wallet is an external, user-interactive capability: given a
//! human-readable message it produces a signature tied to the connected
//! account. `LocalWallet` is the Ed25519 reference implementation;
//! `MockSigner` supports rejection scenarios in tests.

mod error;
mod mock;
mod wallet;

pub use error::SignerError;
pub use mock::MockSigner;
pub use wallet::{verify_message, LocalWallet, WalletSigner};
