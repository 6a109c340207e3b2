//! Consent authorization workflow
//!
//! One ordered async operation per user action; every exit path is a
//! distinct [`WorkflowError`] variant. The local list is replaced wholesale
//! after successful mutations, never patched in place.

use crate::anchor::TransactionAnchor;
use crate::error::WorkflowError;
use crate::state::ListState;
use medledger_api::{normalize_consent_list, ConsentPatch, ConsentService, NewConsent};
use medledger_core::{consent_message, Consent, ConsentPurpose, ConsentStatus, StatusFilter};
use medledger_signer::WalletSigner;
use std::sync::Arc;

/// Coordinates the wallet signer, the Consent Service, and the local
/// consent list
pub struct ConsentWorkflow {
    service: Arc<dyn ConsentService>,
    anchor: Arc<dyn TransactionAnchor>,
    signer: Option<Arc<dyn WalletSigner>>,
    filter: StatusFilter,
    state: ListState,
}

impl ConsentWorkflow {
    /// Create a workflow with no connected wallet
    pub fn new(service: Arc<dyn ConsentService>, anchor: Arc<dyn TransactionAnchor>) -> Self {
        Self {
            service,
            anchor,
            signer: None,
            filter: StatusFilter::All,
            state: ListState::Idle,
        }
    }

    /// Builder-style wallet attachment
    pub fn with_signer(mut self, signer: Arc<dyn WalletSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn connect_wallet(&mut self, signer: Arc<dyn WalletSigner>) {
        self.signer = Some(signer);
    }

    pub fn disconnect_wallet(&mut self) {
        self.signer = None;
    }

    pub fn is_connected(&self) -> bool {
        self.signer.is_some()
    }

    /// The connected account identifier, if any
    pub fn wallet_address(&self) -> Option<&str> {
        self.signer.as_deref().map(|s| s.address())
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Change the status filter; takes effect at the next [`refresh`]
    ///
    /// [`refresh`]: ConsentWorkflow::refresh
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// The consents currently displayed
    pub fn consents(&self) -> &[Consent] {
        self.state.consents()
    }

    /// Replace the local list from the service under the active filter.
    ///
    /// On failure the local list is cleared and the error surfaced.
    pub async fn refresh(&mut self) -> Result<(), WorkflowError> {
        self.state = ListState::Loading;

        let status = self.filter.status_param();
        match self.service.list_consents(None, status.as_ref()).await {
            Ok(value) => {
                self.state = ListState::Loaded(normalize_consent_list(&value));
                Ok(())
            }
            Err(err) => {
                self.state = ListState::Failed(err.to_string());
                Err(WorkflowError::Service(err))
            }
        }
    }

    /// Authorize a new consent: build the canonical message, sign it with
    /// the connected wallet, verify best-effort, create, refresh.
    ///
    /// Preconditions (checked before any signing or network call): a
    /// connected wallet, a non-empty patient id, a purpose from the
    /// enumerated set.
    pub async fn authorize(
        &mut self,
        patient_id: &str,
        purpose: &str,
    ) -> Result<Consent, WorkflowError> {
        let signer = self.signer.clone().ok_or(WorkflowError::NotConnected)?;

        let patient_id = patient_id.trim();
        if patient_id.is_empty() {
            return Err(WorkflowError::EmptyPatientId);
        }
        let purpose = ConsentPurpose::parse(purpose)?;

        let message = consent_message(&purpose, patient_id);

        let signature = signer.sign_message(&message).await?;

        match self
            .service
            .verify_signature(&message, &signature, signer.address())
            .await
        {
            Ok(Some(outcome)) if !outcome.is_valid => {
                return Err(WorkflowError::VerificationRejected);
            }
            Ok(_) => {}
            Err(err) => {
                // A failed verification call is not evidence of an invalid
                // signature; creation proceeds
                tracing::warn!(error = %err, "signature verification request failed");
            }
        }

        let created = self
            .service
            .create_consent(NewConsent {
                patient_id: patient_id.to_string(),
                purpose,
                wallet_address: signer.address().to_string(),
                signature,
            })
            .await?;

        tracing::info!(id = %created.id, patient = %created.patient_id, "consent created");

        if let Err(err) = self.refresh().await {
            tracing::warn!(
                error = %err,
                id = %created.id,
                "list refresh after creation failed; keeping created consent visible locally"
            );
            self.insert_local(created.clone());
        }

        Ok(created)
    }

    /// Transition a pending consent to active, recording the transaction
    /// hash supplied by the anchor.
    ///
    /// Only reachable for a consent currently displayed as `pending`; any
    /// other status is rejected without a service call.
    pub async fn activate(&mut self, consent_id: &str) -> Result<Consent, WorkflowError> {
        let consent = self
            .state
            .consents()
            .iter()
            .find(|c| c.id == consent_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownConsent(consent_id.to_string()))?;

        if !consent.status.is_pending() {
            return Err(WorkflowError::NotPending {
                id: consent.id,
                status: consent.status.to_string(),
            });
        }

        let hash = self.anchor.record_activation(&consent).await?;

        let updated = self
            .service
            .update_consent(
                &consent.id,
                ConsentPatch {
                    status: ConsentStatus::Active,
                    blockchain_tx_hash: Some(hash),
                },
            )
            .await?;

        tracing::info!(id = %updated.id, "consent activated");

        if let Err(err) = self.refresh().await {
            tracing::warn!(
                error = %err,
                id = %updated.id,
                "list refresh after activation failed; updating consent locally"
            );
            self.replace_local(updated.clone());
        }

        Ok(updated)
    }

    /// Place a service-returned record into the local list when it
    /// satisfies the active filter (fallback for a failed refresh)
    fn insert_local(&mut self, consent: Consent) {
        if !self.filter.matches(&consent.status) {
            return;
        }
        match &mut self.state {
            ListState::Loaded(consents) => consents.insert(0, consent),
            _ => self.state = ListState::Loaded(vec![consent]),
        }
    }

    fn replace_local(&mut self, consent: Consent) {
        if let ListState::Loaded(consents) = &mut self.state {
            consents.retain(|c| c.id != consent.id);
        }
        self.insert_local(consent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::FixedAnchor;
    use medledger_api::{InMemoryConsentService, VerifyBehavior};
    use medledger_core::TxHash;
    use medledger_signer::MockSigner;

    const PATIENT: &str = "patient-001";
    const PURPOSE: &str = "Research Study Participation";

    fn test_hash() -> TxHash {
        TxHash::new(format!("0x{}", "ab".repeat(32))).unwrap()
    }

    fn setup() -> (Arc<InMemoryConsentService>, Arc<MockSigner>, ConsentWorkflow) {
        let service = Arc::new(InMemoryConsentService::new());
        service.set_verify_behavior(VerifyBehavior::NoVerdict);

        let signer = Arc::new(MockSigner::new("0xwallet"));

        let workflow = ConsentWorkflow::new(service.clone(), Arc::new(FixedAnchor::new(test_hash())))
            .with_signer(signer.clone());

        (service, signer, workflow)
    }

    #[tokio::test]
    async fn test_authorize_happy_path() {
        let (service, signer, mut workflow) = setup();
        service.set_verify_behavior(VerifyBehavior::Verdict(true));

        let consent = workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        assert_eq!(consent.status, ConsentStatus::Pending);
        assert!(consent.blockchain_tx_hash.is_none());
        assert_eq!(consent.patient_id, PATIENT);
        assert_eq!(consent.wallet_address, "0xwallet");
        assert_eq!(signer.calls(), 1);
        assert_eq!(service.verify_calls(), 1);
        assert_eq!(service.create_calls(), 1);

        // The created consent shows up under the pending filter
        workflow.set_filter(StatusFilter::Pending);
        workflow.refresh().await.unwrap();
        assert_eq!(workflow.consents().len(), 1);
        assert_eq!(workflow.consents()[0].id, consent.id);
    }

    #[tokio::test]
    async fn test_signature_covers_canonical_message() {
        let (_, _, mut workflow) = setup();

        let consent = workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        // MockSigner embeds the signed message, so the stored signature
        // pins the exact canonical form
        assert_eq!(
            consent.signature,
            format!(
                "mock-sig(I consent to: {} for patient: {}@0xwallet)",
                PURPOSE, PATIENT
            )
        );
    }

    #[tokio::test]
    async fn test_negative_verdict_blocks_creation() {
        let (service, _, mut workflow) = setup();
        workflow.authorize(PATIENT, PURPOSE).await.unwrap();
        let before = workflow.consents().to_vec();
        assert_eq!(before.len(), 1);

        service.set_verify_behavior(VerifyBehavior::Verdict(false));

        let result = workflow.authorize(PATIENT, PURPOSE).await;

        assert!(matches!(result, Err(WorkflowError::VerificationRejected)));
        assert_eq!(service.create_calls(), 1);
        assert_eq!(workflow.consents(), before.as_slice());
    }

    #[tokio::test]
    async fn test_verify_call_failure_is_nonfatal() {
        let (service, _, mut workflow) = setup();
        service.set_verify_behavior(VerifyBehavior::Unreachable);

        let consent = workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        // Creation went through exactly once, with the original signature
        assert_eq!(service.verify_calls(), 1);
        assert_eq!(service.create_calls(), 1);
        assert_eq!(
            consent.signature,
            format!(
                "mock-sig(I consent to: {} for patient: {}@0xwallet)",
                PURPOSE, PATIENT
            )
        );
    }

    #[tokio::test]
    async fn test_no_wallet_short_circuits() {
        let service = Arc::new(InMemoryConsentService::new());
        let mut workflow =
            ConsentWorkflow::new(service.clone(), Arc::new(FixedAnchor::new(test_hash())));

        let result = workflow.authorize(PATIENT, PURPOSE).await;

        assert!(matches!(result, Err(WorkflowError::NotConnected)));
        assert_eq!(service.verify_calls(), 0);
        assert_eq!(service.create_calls(), 0);
        assert_eq!(service.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_patient_id_rejected_before_signing() {
        let (service, signer, mut workflow) = setup();

        let result = workflow.authorize("   ", PURPOSE).await;

        assert!(matches!(result, Err(WorkflowError::EmptyPatientId)));
        assert_eq!(signer.calls(), 0);
        assert_eq!(service.verify_calls(), 0);
        assert_eq!(service.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_free_text_purpose_rejected_before_signing() {
        let (service, signer, mut workflow) = setup();

        let result = workflow.authorize(PATIENT, "Marketing Blast").await;
        assert!(matches!(result, Err(WorkflowError::Purpose(_))));

        let result = workflow.authorize(PATIENT, "").await;
        assert!(matches!(result, Err(WorkflowError::Purpose(_))));

        assert_eq!(signer.calls(), 0);
        assert_eq!(service.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_signing_aborts_with_no_state_change() {
        let service = Arc::new(InMemoryConsentService::new());
        service.set_verify_behavior(VerifyBehavior::NoVerdict);
        let mut workflow =
            ConsentWorkflow::new(service.clone(), Arc::new(FixedAnchor::new(test_hash())))
                .with_signer(Arc::new(MockSigner::rejecting("0xwallet")));
        workflow.refresh().await.unwrap();

        let result = workflow.authorize(PATIENT, PURPOSE).await;

        assert!(matches!(
            result,
            Err(WorkflowError::Signing(medledger_signer::SignerError::Rejected))
        ));
        assert_eq!(service.verify_calls(), 0);
        assert_eq!(service.create_calls(), 0);
        assert!(workflow.consents().is_empty());
        assert!(workflow.state().is_loaded());
    }

    #[tokio::test]
    async fn test_create_failure_surfaces_message() {
        let (service, _, mut workflow) = setup();
        service.set_fail_create(true);

        let err = workflow.authorize(PATIENT, PURPOSE).await.unwrap_err();

        assert!(err.to_string().contains("consent store rejected the request"));
        assert!(workflow.consents().is_empty());
    }

    #[tokio::test]
    async fn test_activate_end_to_end() {
        let (_, _, mut workflow) = setup();
        let created = workflow.authorize(PATIENT, "Insurance Provider Access").await.unwrap();

        let updated = workflow.activate(&created.id).await.unwrap();

        assert_eq!(updated.status, ConsentStatus::Active);
        assert_eq!(updated.blockchain_tx_hash, Some(test_hash()));

        workflow.set_filter(StatusFilter::Active);
        workflow.refresh().await.unwrap();
        assert_eq!(workflow.consents().len(), 1);
        assert!(workflow.consents()[0].blockchain_tx_hash.is_some());

        workflow.set_filter(StatusFilter::Pending);
        workflow.refresh().await.unwrap();
        assert!(workflow.consents().is_empty());
    }

    #[tokio::test]
    async fn test_activate_only_reachable_from_pending() {
        let (service, _, mut workflow) = setup();
        let created = workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        workflow.activate(&created.id).await.unwrap();
        assert_eq!(service.update_calls(), 1);

        let result = workflow.activate(&created.id).await;
        assert!(matches!(result, Err(WorkflowError::NotPending { .. })));
        // No second service call was made
        assert_eq!(service.update_calls(), 1);
    }

    #[tokio::test]
    async fn test_activate_unknown_consent() {
        let (service, _, mut workflow) = setup();
        workflow.refresh().await.unwrap();

        let result = workflow.activate("CNS-MISSING").await;

        assert!(matches!(result, Err(WorkflowError::UnknownConsent(_))));
        assert_eq!(service.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_failure_leaves_displayed_status() {
        let (service, _, mut workflow) = setup();
        let created = workflow.authorize(PATIENT, PURPOSE).await.unwrap();
        service.set_fail_update(true);

        let result = workflow.activate(&created.id).await;

        assert!(matches!(result, Err(WorkflowError::Service(_))));
        assert_eq!(workflow.consents()[0].status, ConsentStatus::Pending);
        assert!(workflow.consents()[0].blockchain_tx_hash.is_none());
    }

    #[tokio::test]
    async fn test_list_failure_clears_local_list() {
        let (service, _, mut workflow) = setup();
        workflow.authorize(PATIENT, PURPOSE).await.unwrap();
        assert_eq!(workflow.consents().len(), 1);

        service.set_fail_list(true);
        let result = workflow.refresh().await;

        assert!(matches!(result, Err(WorkflowError::Service(_))));
        assert!(workflow.consents().is_empty());
        assert!(workflow.state().error().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let (_, _, mut workflow) = setup();
        workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        workflow.refresh().await.unwrap();
        let first = workflow.consents().to_vec();
        workflow.refresh().await.unwrap();

        assert_eq!(first, workflow.consents());
    }

    #[tokio::test]
    async fn test_double_submission_creates_two_records() {
        let (service, _, mut workflow) = setup();

        let a = workflow.authorize(PATIENT, PURPOSE).await.unwrap();
        let b = workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(service.create_calls(), 2);
        assert_eq!(workflow.consents().len(), 2);
    }

    #[tokio::test]
    async fn test_created_consent_visible_when_refresh_fails() {
        let (service, _, mut workflow) = setup();
        service.fail_next_list();

        let created = workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        // The refresh after creation failed, but the record is not hidden
        assert_eq!(workflow.consents().len(), 1);
        assert_eq!(workflow.consents()[0].id, created.id);
    }

    #[tokio::test]
    async fn test_filter_all_shows_every_status() {
        let (_, _, mut workflow) = setup();
        let first = workflow.authorize(PATIENT, PURPOSE).await.unwrap();
        workflow.authorize(PATIENT, PURPOSE).await.unwrap();
        workflow.activate(&first.id).await.unwrap();

        workflow.set_filter(StatusFilter::All);
        workflow.refresh().await.unwrap();
        assert_eq!(workflow.consents().len(), 2);

        workflow.set_filter(StatusFilter::Pending);
        workflow.refresh().await.unwrap();
        assert_eq!(workflow.consents().len(), 1);

        workflow.set_filter(StatusFilter::Active);
        workflow.refresh().await.unwrap();
        assert_eq!(workflow.consents().len(), 1);
        assert_eq!(workflow.consents()[0].id, first.id);
    }

    #[tokio::test]
    async fn test_wrapped_responses_normalize_identically() {
        let (service, _, mut workflow) = setup();
        workflow.authorize(PATIENT, PURPOSE).await.unwrap();

        workflow.refresh().await.unwrap();
        let bare = workflow.consents().to_vec();

        service.set_wrapped_responses(true);
        workflow.refresh().await.unwrap();

        assert_eq!(bare, workflow.consents());
    }

    #[tokio::test]
    async fn test_wallet_connection_accessors() {
        let service = Arc::new(InMemoryConsentService::new());
        let mut workflow =
            ConsentWorkflow::new(service, Arc::new(FixedAnchor::new(test_hash())));

        assert!(!workflow.is_connected());
        assert_eq!(workflow.wallet_address(), None);

        workflow.connect_wallet(Arc::new(MockSigner::new("0xwallet")));
        assert!(workflow.is_connected());
        assert_eq!(workflow.wallet_address(), Some("0xwallet"));

        workflow.disconnect_wallet();
        assert!(!workflow.is_connected());
    }
}
