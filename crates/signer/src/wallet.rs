//! Wallet signing over consent messages
//!
//! Accounts are identified by `0x` + hex-encoded Ed25519 public key;
//! signatures are hex-encoded over the raw message bytes.

use crate::error::SignerError;
use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, Verifier, VerifyingKey};

/// Interface to a connected wallet
///
/// Signing is user-interactive: a call may suspend indefinitely awaiting
/// approval and may fail if the user rejects or the wallet disconnects.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The connected account identifier
    fn address(&self) -> &str;

    /// Sign a human-readable message, returning the hex-encoded signature
    async fn sign_message(&self, message: &str) -> Result<String, SignerError>;
}

/// Local Ed25519 wallet
pub struct LocalWallet {
    signing_key: SigningKey,
    address: String,
}

impl LocalWallet {
    /// Create from a 32-byte seed (hex-encoded, e.g. from an env var)
    pub fn from_hex(hex_seed: &str) -> Result<Self, SignerError> {
        let bytes = hex::decode(hex_seed.trim()).map_err(|e| SignerError::InvalidKey {
            reason: format!("Invalid key hex: {}", e),
        })?;

        let seed: [u8; 32] = bytes.try_into().map_err(|_| SignerError::InvalidKey {
            reason: "Key must be 32 bytes".to_string(),
        })?;

        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    /// Generate a new random wallet
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_signing_key(SigningKey::generate(&mut rng))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = format!("0x{}", hex::encode(signing_key.verifying_key().to_bytes()));
        Self {
            signing_key,
            address,
        }
    }

    /// Export the seed as hex (for storage)
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// The public key as hex, without the address prefix
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }
}

#[async_trait]
impl WalletSigner for LocalWallet {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        let signature = self.signing_key.sign(message.as_bytes());
        Ok(hex::encode(signature.to_bytes()))
    }
}

/// Verify a hex-encoded signature over a message against an account address
pub fn verify_message(address: &str, message: &str, signature_hex: &str) -> Result<(), SignerError> {
    let pk_hex = address.strip_prefix("0x").unwrap_or(address);

    let pk_bytes = hex::decode(pk_hex).map_err(|e| SignerError::InvalidKey {
        reason: format!("Invalid account hex: {}", e),
    })?;

    let pk_array: [u8; 32] = pk_bytes.try_into().map_err(|_| SignerError::InvalidKey {
        reason: "Account public key must be 32 bytes".to_string(),
    })?;

    let sig_bytes = hex::decode(signature_hex).map_err(|e| {
        SignerError::VerificationFailed(format!("Invalid signature hex: {}", e))
    })?;

    let sig_array: [u8; 64] = sig_bytes.try_into().map_err(|_| {
        SignerError::VerificationFailed("Signature must be 64 bytes".to_string())
    })?;

    let verifying_key = VerifyingKey::from_bytes(&pk_array).map_err(|e| {
        SignerError::InvalidKey {
            reason: format!("Invalid public key: {}", e),
        }
    })?;

    let signature = Signature::from_bytes(&sig_array);

    verifying_key
        .verify(message.as_bytes(), &signature)
        .map_err(|e| SignerError::VerificationFailed(format!("Signature from {} failed: {}", address, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_and_verify() {
        let wallet = LocalWallet::generate();
        let message = "I consent to: Insurance Provider Access for patient: patient-001";

        let signature = wallet.sign_message(message).await.unwrap();

        assert!(verify_message(wallet.address(), message, &signature).is_ok());
    }

    #[tokio::test]
    async fn test_tampered_message_fails_verification() {
        let wallet = LocalWallet::generate();
        let signature = wallet.sign_message("original message").await.unwrap();

        let result = verify_message(wallet.address(), "tampered message", &signature);
        assert!(matches!(result, Err(SignerError::VerificationFailed(_))));
    }

    #[tokio::test]
    async fn test_wrong_account_fails_verification() {
        let wallet = LocalWallet::generate();
        let other = LocalWallet::generate();
        let signature = wallet.sign_message("message").await.unwrap();

        let result = verify_message(other.address(), "message", &signature);
        assert!(matches!(result, Err(SignerError::VerificationFailed(_))));
    }

    #[test]
    fn test_seed_roundtrip() {
        let wallet = LocalWallet::generate();
        let seed = wallet.seed_hex();

        let restored = LocalWallet::from_hex(&seed).unwrap();
        assert_eq!(wallet.address(), restored.address());
        assert_eq!(wallet.public_key_hex(), restored.public_key_hex());
    }

    #[test]
    fn test_from_hex_rejects_bad_seed() {
        assert!(matches!(
            LocalWallet::from_hex("not hex"),
            Err(SignerError::InvalidKey { .. })
        ));
        assert!(matches!(
            LocalWallet::from_hex("abcd"),
            Err(SignerError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_address_is_prefixed_pubkey() {
        let wallet = LocalWallet::generate();
        assert_eq!(
            wallet.address(),
            format!("0x{}", wallet.public_key_hex())
        );
    }
}
