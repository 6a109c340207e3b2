//! Application context - wires everything together

use crate::state::PlatformState;
use medledger_api::InMemoryConsentService;
use medledger_consent::{ConsentWorkflow, DigestAnchor};
use medledger_directory::InMemoryDirectory;
use medledger_signer::LocalWallet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Wires the consent workflow and the records directory over the platform
/// snapshot in the data directory
pub struct AppContext {
    pub service: Arc<InMemoryConsentService>,
    pub directory: Arc<InMemoryDirectory>,
    pub workflow: ConsentWorkflow,
    state: PlatformState,
    state_path: PathBuf,
}

impl AppContext {
    /// Create a context over `data_dir`, seeding a demo snapshot if none
    /// exists yet
    pub fn new(data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;
        let state_path = data_dir.join("platform.json");

        let state = if state_path.exists() {
            PlatformState::load(&state_path)?
        } else {
            let state = PlatformState::demo();
            state.save(&state_path)?;
            state
        };

        let service = Arc::new(InMemoryConsentService::with_consents(state.consents.clone()));

        let directory = Arc::new(InMemoryDirectory::with_data(
            state.patients.clone(),
            state.records.clone(),
            state.transactions.clone(),
        ));
        directory.set_stats(state.stats());

        let mut workflow = ConsentWorkflow::new(service.clone(), Arc::new(DigestAnchor));

        // Wallet connection comes from the environment; without it the
        // workflow stays read-only
        if let Ok(key) = std::env::var("MEDLEDGER_WALLET_KEY") {
            match LocalWallet::from_hex(&key) {
                Ok(wallet) => workflow.connect_wallet(Arc::new(wallet)),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring invalid MEDLEDGER_WALLET_KEY")
                }
            }
        }

        Ok(Self {
            service,
            directory,
            workflow,
            state,
            state_path,
        })
    }

    /// Persist the snapshot, folding in consents mutated through the
    /// workflow
    pub fn save(&self) -> anyhow::Result<()> {
        let mut state = self.state.clone();
        state.consents = self.service.snapshot();
        state.save(&self.state_path)
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_seeds_demo_data() {
        use medledger_directory::RecordsDirectory;

        let dir = tempfile::tempdir().unwrap();

        let ctx = AppContext::new(dir.path()).unwrap();

        assert!(ctx.state_path().exists());
        let page = ctx.directory.list_patients(1, 10, "").await.unwrap();
        assert_eq!(page.patients.len(), 3);
    }

    #[tokio::test]
    async fn test_consents_survive_reload() {
        use medledger_api::{ConsentService, NewConsent};
        use medledger_core::ConsentPurpose;

        let dir = tempfile::tempdir().unwrap();

        {
            let ctx = AppContext::new(dir.path()).unwrap();
            ctx.service
                .create_consent(NewConsent {
                    patient_id: "patient-001".to_string(),
                    purpose: ConsentPurpose::ResearchStudyParticipation,
                    wallet_address: "0xabc".to_string(),
                    signature: "sig".to_string(),
                })
                .await
                .unwrap();
            ctx.save().unwrap();
        }

        let ctx = AppContext::new(dir.path()).unwrap();
        assert_eq!(ctx.service.snapshot().len(), 1);
    }
}
