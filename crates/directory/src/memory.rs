//! In-memory records directory
//!
//! Reference implementation for tests and the development CLI.

use crate::error::DirectoryError;
use crate::types::{
    ChainTransaction, MedicalRecord, Page, Patient, PatientPage, PlatformStats, RecordsDirectory,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// In-memory records directory
pub struct InMemoryDirectory {
    patients: RwLock<Vec<Patient>>,
    records: RwLock<HashMap<String, Vec<MedicalRecord>>>,
    transactions: RwLock<Vec<ChainTransaction>>,
    stats: RwLock<PlatformStats>,
    wrap_responses: AtomicBool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            patients: RwLock::new(Vec::new()),
            records: RwLock::new(HashMap::new()),
            transactions: RwLock::new(Vec::new()),
            stats: RwLock::new(PlatformStats::default()),
            wrap_responses: AtomicBool::new(false),
        }
    }

    /// Create a directory preloaded with platform data
    pub fn with_data(
        patients: Vec<Patient>,
        records: HashMap<String, Vec<MedicalRecord>>,
        transactions: Vec<ChainTransaction>,
    ) -> Self {
        let directory = Self::new();
        *directory.patients.write().unwrap() = patients;
        *directory.records.write().unwrap() = records;
        *directory.transactions.write().unwrap() = transactions;
        directory
    }

    pub fn set_stats(&self, stats: PlatformStats) {
        *self.stats.write().unwrap() = stats;
    }

    /// Answer record/transaction queries with wrapper objects instead of
    /// bare arrays
    pub fn set_wrapped_responses(&self, wrapped: bool) {
        self.wrap_responses.store(wrapped, Ordering::SeqCst);
    }

    fn wrap(&self, key: &str, payload: Value) -> Value {
        if self.wrap_responses.load(Ordering::SeqCst) {
            json!({ key: payload })
        } else {
            payload
        }
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordsDirectory for InMemoryDirectory {
    async fn list_patients(
        &self,
        page: u32,
        per_page: u32,
        search: &str,
    ) -> Result<PatientPage, DirectoryError> {
        let per_page = per_page.max(1);
        let needle = search.trim().to_lowercase();

        let filtered: Vec<Patient> = self
            .patients
            .read()
            .unwrap()
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.patient_id.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        let total = filtered.len() as u64;
        let total_pages = (total as u32).div_ceil(per_page);
        let page = page.clamp(1, total_pages.max(1));

        let start = ((page - 1) * per_page) as usize;
        let patients: Vec<Patient> = filtered
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Ok(PatientPage {
            patients,
            pagination: Page {
                page,
                total_pages,
                total,
            },
        })
    }

    async fn patient(&self, id: &str) -> Result<Patient, DirectoryError> {
        self.patients
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == id || p.patient_id == id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound { id: id.to_string() })
    }

    async fn patient_records(&self, patient_id: &str) -> Result<Value, DirectoryError> {
        let records = self
            .records
            .read()
            .unwrap()
            .get(patient_id)
            .cloned()
            .unwrap_or_default();

        let payload = serde_json::to_value(&records)
            .map_err(|e| DirectoryError::service(format!("failed to encode records: {}", e)))?;
        Ok(self.wrap("records", payload))
    }

    async fn transactions(
        &self,
        account: Option<&str>,
        limit: usize,
    ) -> Result<Value, DirectoryError> {
        let mut transactions: Vec<ChainTransaction> = self
            .transactions
            .read()
            .unwrap()
            .iter()
            .filter(|tx| {
                account.map_or(true, |a| {
                    tx.from.as_deref() == Some(a) || tx.to.as_deref() == Some(a)
                })
            })
            .cloned()
            .collect();

        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        transactions.truncate(limit);

        let payload = serde_json::to_value(&transactions).map_err(|e| {
            DirectoryError::service(format!("failed to encode transactions: {}", e))
        })?;
        Ok(self.wrap("transactions", payload))
    }

    async fn stats(&self) -> Result<PlatformStats, DirectoryError> {
        Ok(*self.stats.read().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{normalize_records, normalize_transactions, RecordKind, TxKind, TxStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_patient(n: u32) -> Patient {
        Patient {
            id: format!("id-{}", n),
            patient_id: format!("patient-{:03}", n),
            name: format!("Patient Number{}", n),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: "other".to_string(),
            email: format!("p{}@example.org", n),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            wallet_address: format!("0xwallet{}", n),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, n).unwrap(),
        }
    }

    fn make_tx(n: u32, from: &str) -> ChainTransaction {
        ChainTransaction {
            id: format!("tx-{}", n),
            kind: TxKind::ConsentApproval,
            status: TxStatus::Confirmed,
            from: Some(from.to_string()),
            to: Some("0xplatform".to_string()),
            amount: None,
            currency: None,
            tx_hash: Some(format!("0xhash{}", n)),
            timestamp: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, n).unwrap()),
        }
    }

    fn directory_with_patients(count: u32) -> InMemoryDirectory {
        InMemoryDirectory::with_data(
            (1..=count).map(make_patient).collect(),
            HashMap::new(),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_pagination() {
        let directory = directory_with_patients(25);

        let page1 = directory.list_patients(1, 10, "").await.unwrap();
        assert_eq!(page1.patients.len(), 10);
        assert_eq!(page1.pagination.total, 25);
        assert_eq!(page1.pagination.total_pages, 3);

        let page3 = directory.list_patients(3, 10, "").await.unwrap();
        assert_eq!(page3.patients.len(), 5);

        // Out-of-range pages clamp instead of failing
        let clamped = directory.list_patients(99, 10, "").await.unwrap();
        assert_eq!(clamped.pagination.page, 3);
        let low = directory.list_patients(0, 10, "").await.unwrap();
        assert_eq!(low.pagination.page, 1);
    }

    #[tokio::test]
    async fn test_search_matches_name_and_patient_id() {
        let directory = directory_with_patients(12);

        let by_id = directory.list_patients(1, 10, "patient-007").await.unwrap();
        assert_eq!(by_id.patients.len(), 1);
        assert_eq!(by_id.patients[0].patient_id, "patient-007");

        let by_name = directory.list_patients(1, 10, "number1").await.unwrap();
        // Number1, Number10, Number11, Number12
        assert_eq!(by_name.patients.len(), 4);

        let none = directory.list_patients(1, 10, "zzz").await.unwrap();
        assert!(none.patients.is_empty());
        assert_eq!(none.pagination.total_pages, 0);
    }

    #[tokio::test]
    async fn test_patient_lookup_by_either_id() {
        let directory = directory_with_patients(3);

        assert_eq!(directory.patient("id-2").await.unwrap().patient_id, "patient-002");
        assert_eq!(directory.patient("patient-002").await.unwrap().id, "id-2");
        assert!(matches!(
            directory.patient("missing").await,
            Err(DirectoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_records_normalize_in_both_shapes() {
        let mut records = HashMap::new();
        records.insert(
            "patient-001".to_string(),
            vec![MedicalRecord {
                id: "rec-1".to_string(),
                title: "Blood panel".to_string(),
                kind: RecordKind::Lab,
                status: Some("verified".to_string()),
                description: None,
                date: None,
                doctor: Some("Dr. Grey".to_string()),
                hospital: None,
                blockchain_hash: None,
            }],
        );
        let directory = InMemoryDirectory::with_data(Vec::new(), records, Vec::new());

        let bare = directory.patient_records("patient-001").await.unwrap();
        directory.set_wrapped_responses(true);
        let wrapped = directory.patient_records("patient-001").await.unwrap();

        assert!(bare.is_array());
        assert!(wrapped.is_object());
        assert_eq!(normalize_records(&bare), normalize_records(&wrapped));
        assert_eq!(normalize_records(&bare).len(), 1);

        // Unknown patient yields an empty list, not an error
        let empty = directory.patient_records("missing").await.unwrap();
        assert!(normalize_records(&empty).is_empty());
    }

    #[tokio::test]
    async fn test_transactions_filter_and_limit() {
        let transactions = (1..=8)
            .map(|n| make_tx(n, if n % 2 == 0 { "0xeven" } else { "0xodd" }))
            .collect();
        let directory = InMemoryDirectory::with_data(Vec::new(), HashMap::new(), transactions);

        let all = directory.transactions(None, 20).await.unwrap();
        let all = normalize_transactions(&all);
        assert_eq!(all.len(), 8);
        // Newest first
        assert_eq!(all[0].id, "tx-8");

        let even = directory.transactions(Some("0xeven"), 20).await.unwrap();
        assert_eq!(normalize_transactions(&even).len(), 4);

        let limited = directory.transactions(None, 3).await.unwrap();
        assert_eq!(normalize_transactions(&limited).len(), 3);
    }

    #[tokio::test]
    async fn test_stats_roundtrip() {
        let directory = InMemoryDirectory::new();
        directory.set_stats(PlatformStats {
            total_patients: 3,
            total_consents: 2,
            pending_consents: 1,
            ..Default::default()
        });

        let stats = directory.stats().await.unwrap();
        assert_eq!(stats.total_patients, 3);
        assert_eq!(stats.pending_consents, 1);
        assert_eq!(stats.total_records, 0);
    }
}
