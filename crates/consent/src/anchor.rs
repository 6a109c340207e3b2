//! Transaction anchoring seam
//!
//! Activating a consent records a blockchain transaction hash. Submitting
//! that transaction is outside this system, so the hash is an injected
//! dependency: tests use [`FixedAnchor`], the development CLI uses
//! [`DigestAnchor`] as a stand-in for the real submission step.

use async_trait::async_trait;
use medledger_core::{Consent, TxHash, TxHashError};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from the anchoring step
#[derive(Error, Debug)]
pub enum AnchorError {
    /// The submission step reported a failure
    #[error("Transaction submission failed: {0}")]
    Submission(String),

    /// The supplied identifier was not a valid transaction hash
    #[error(transparent)]
    InvalidHash(#[from] TxHashError),
}

/// Source of the transaction hash recorded at activation
#[async_trait]
pub trait TransactionAnchor: Send + Sync {
    /// Obtain the hash of the on-chain event anchoring this consent
    async fn record_activation(&self, consent: &Consent) -> Result<TxHash, AnchorError>;
}

/// Anchor returning a preset hash (for tests)
pub struct FixedAnchor {
    hash: TxHash,
}

impl FixedAnchor {
    pub fn new(hash: TxHash) -> Self {
        Self { hash }
    }
}

#[async_trait]
impl TransactionAnchor for FixedAnchor {
    async fn record_activation(&self, _consent: &Consent) -> Result<TxHash, AnchorError> {
        Ok(self.hash.clone())
    }
}

/// Development anchor deriving the identifier from the consent content
///
/// Stand-in for the external blockchain-submission step: deterministic for
/// a given consent, never random. Not a real on-chain transaction.
pub struct DigestAnchor;

#[async_trait]
impl TransactionAnchor for DigestAnchor {
    async fn record_activation(&self, consent: &Consent) -> Result<TxHash, AnchorError> {
        let mut hasher = Sha256::new();
        hasher.update(consent.id.as_bytes());
        hasher.update(consent.wallet_address.as_bytes());
        hasher.update(consent.signature.as_bytes());

        let hash = TxHash::new(format!("0x{}", hex::encode(hasher.finalize())))?;
        Ok(hash)
    }
}
