//! Mock signer for testing
//!
//! Produces deterministic signature text and can be switched into a
//! rejecting mode to exercise cancelled-signing paths.

use crate::error::SignerError;
use crate::wallet::WalletSigner;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock wallet signer for tests
pub struct MockSigner {
    address: String,
    reject: AtomicBool,
    calls: AtomicUsize,
}

impl MockSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            reject: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// A signer that rejects every request (user cancelled)
    pub fn rejecting(address: impl Into<String>) -> Self {
        let signer = Self::new(address);
        signer.reject.store(true, Ordering::SeqCst);
        signer
    }

    /// Switch rejection on or off
    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Number of signing requests received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletSigner for MockSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.reject.load(Ordering::SeqCst) {
            return Err(SignerError::Rejected);
        }

        Ok(format!("mock-sig({}@{})", message, self.address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signer_is_deterministic() {
        let signer = MockSigner::new("0xabc");

        let a = signer.sign_message("hello").await.unwrap();
        let b = signer.sign_message("hello").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(signer.calls(), 2);
    }

    #[tokio::test]
    async fn test_rejecting_signer() {
        let signer = MockSigner::rejecting("0xabc");

        let result = signer.sign_message("hello").await;
        assert_eq!(result, Err(SignerError::Rejected));
        assert_eq!(signer.calls(), 1);
    }
}
