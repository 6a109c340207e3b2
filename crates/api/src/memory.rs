//! In-memory Consent Service
//!
//! Reference backend for tests and the development CLI. Stores consents
//! behind an `RwLock`, assigns server-side fields on creation, and offers
//! failure-injection switches so callers can exercise every outcome of the
//! workflow.

use crate::error::ApiError;
use crate::types::{ConsentPatch, ConsentService, NewConsent, VerifyOutcome};
use async_trait::async_trait;
use chrono::Utc;
use medledger_core::{Consent, ConsentStatus};
use medledger_signer::verify_message;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

/// How verify-signature answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyBehavior {
    /// Actually check the Ed25519 signature against message and account
    Ed25519,
    /// Always answer with the given verdict
    Verdict(bool),
    /// Answer without a verdict
    NoVerdict,
    /// Fail the call itself
    Unreachable,
}

/// In-memory Consent Service
pub struct InMemoryConsentService {
    consents: RwLock<Vec<Consent>>,
    verify_behavior: RwLock<VerifyBehavior>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    fail_list: AtomicBool,
    fail_next_list: AtomicBool,
    wrap_list_response: AtomicBool,
    verify_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryConsentService {
    pub fn new() -> Self {
        Self {
            consents: RwLock::new(Vec::new()),
            verify_behavior: RwLock::new(VerifyBehavior::Ed25519),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            fail_next_list: AtomicBool::new(false),
            wrap_list_response: AtomicBool::new(false),
            verify_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Create a service preloaded with existing consents
    pub fn with_consents(consents: Vec<Consent>) -> Self {
        let service = Self::new();
        *service.consents.write().unwrap() = consents;
        service
    }

    /// Change how verify-signature answers
    pub fn set_verify_behavior(&self, behavior: VerifyBehavior) {
        *self.verify_behavior.write().unwrap() = behavior;
    }

    /// Fail every create-consent call until cleared
    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Fail every update-consent call until cleared
    pub fn set_fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    /// Fail every list-consents call until cleared
    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Fail only the next list-consents call
    pub fn fail_next_list(&self) {
        self.fail_next_list.store(true, Ordering::SeqCst);
    }

    /// Answer list-consents with `{"consents": [...]}` instead of a bare array
    pub fn set_wrapped_responses(&self, wrapped: bool) {
        self.wrap_list_response.store(wrapped, Ordering::SeqCst);
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Copy of everything currently stored (newest first)
    pub fn snapshot(&self) -> Vec<Consent> {
        let mut consents = self.consents.read().unwrap().clone();
        consents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        consents
    }

    fn next_id() -> String {
        format!(
            "CNS-{}",
            uuid::Uuid::new_v4().to_string()[..8].to_uppercase()
        )
    }
}

impl Default for InMemoryConsentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsentService for InMemoryConsentService {
    async fn verify_signature(
        &self,
        message: &str,
        signature: &str,
        account: &str,
    ) -> Result<Option<VerifyOutcome>, ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        let behavior = *self.verify_behavior.read().unwrap();
        match behavior {
            VerifyBehavior::Ed25519 => {
                let is_valid = verify_message(account, message, signature).is_ok();
                Ok(Some(VerifyOutcome { is_valid }))
            }
            VerifyBehavior::Verdict(is_valid) => Ok(Some(VerifyOutcome { is_valid })),
            VerifyBehavior::NoVerdict => Ok(None),
            VerifyBehavior::Unreachable => {
                Err(ApiError::connection("verification endpoint timed out"))
            }
        }
    }

    async fn create_consent(&self, consent: NewConsent) -> Result<Consent, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ApiError::service("consent store rejected the request"));
        }

        if consent.patient_id.trim().is_empty() {
            return Err(ApiError::service("patientId is required"));
        }
        if consent.signature.is_empty() {
            return Err(ApiError::service("signature is required"));
        }

        let record = Consent {
            id: Self::next_id(),
            patient_id: consent.patient_id,
            purpose: consent.purpose,
            wallet_address: consent.wallet_address,
            signature: consent.signature,
            status: ConsentStatus::Pending,
            blockchain_tx_hash: None,
            created_at: Utc::now(),
        };

        self.consents.write().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_consent(&self, id: &str, patch: ConsentPatch) -> Result<Consent, ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ApiError::service("consent store rejected the update"));
        }

        let mut consents = self.consents.write().unwrap();
        let consent = consents
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })?;

        if let Some(hash) = patch.blockchain_tx_hash {
            // A recorded transaction hash is immutable
            match &consent.blockchain_tx_hash {
                Some(existing) if *existing != hash => {
                    return Err(ApiError::service(format!(
                        "transaction hash already recorded for {}",
                        id
                    )));
                }
                _ => consent.blockchain_tx_hash = Some(hash),
            }
        }

        consent.status = patch.status;
        Ok(consent.clone())
    }

    async fn list_consents(
        &self,
        patient_id: Option<&str>,
        status: Option<&ConsentStatus>,
    ) -> Result<serde_json::Value, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_next_list.swap(false, Ordering::SeqCst)
            || self.fail_list.load(Ordering::SeqCst)
        {
            return Err(ApiError::connection("consent service timed out"));
        }

        let mut consents: Vec<Consent> = self
            .consents
            .read()
            .unwrap()
            .iter()
            .filter(|c| patient_id.map_or(true, |p| c.patient_id == p))
            .filter(|c| status.map_or(true, |s| c.status == *s))
            .cloned()
            .collect();

        consents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let payload = serde_json::to_value(&consents)
            .map_err(|e| ApiError::service(format!("failed to encode consents: {}", e)))?;

        if self.wrap_list_response.load(Ordering::SeqCst) {
            Ok(json!({ "consents": payload }))
        } else {
            Ok(payload)
        }
    }
}
