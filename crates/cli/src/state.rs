//! Platform state snapshot
//!
//! The development backend: one JSON file holding everything the in-memory
//! services serve. A deployed dashboard would talk to the remote platform
//! instead.

use anyhow::Context;
use chrono::{NaiveDate, TimeZone, Utc};
use medledger_core::Consent;
use medledger_directory::{
    ChainTransaction, MedicalRecord, Patient, PlatformStats, RecordKind, TxKind, TxStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Everything the platform knows, as stored under the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformState {
    pub patients: Vec<Patient>,
    pub records: HashMap<String, Vec<MedicalRecord>>,
    pub transactions: Vec<ChainTransaction>,
    pub consents: Vec<Consent>,
}

impl PlatformState {
    /// Load a snapshot from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Write the snapshot to disk
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Counters for the statistics tiles
    pub fn stats(&self) -> PlatformStats {
        PlatformStats {
            total_patients: self.patients.len() as u64,
            total_records: self.records.values().map(|r| r.len() as u64).sum(),
            total_consents: self.consents.len() as u64,
            active_consents: self.consents.iter().filter(|c| c.status.is_active()).count() as u64,
            pending_consents: self.consents.iter().filter(|c| c.status.is_pending()).count()
                as u64,
            total_transactions: self.transactions.len() as u64,
        }
    }

    /// Seed data for a fresh data directory
    pub fn demo() -> Self {
        let patients = vec![
            Patient {
                id: "id-001".to_string(),
                patient_id: "patient-001".to_string(),
                name: "Alice Morgan".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1987, 4, 12).unwrap(),
                gender: "female".to_string(),
                email: "alice.morgan@example.org".to_string(),
                phone: "555-0101".to_string(),
                address: "12 Harbor Lane".to_string(),
                wallet_address: "0x4a1f2b3c4d5e6f708192a3b4c5d6e7f801234567".to_string(),
                created_at: Utc.with_ymd_and_hms(2025, 11, 3, 9, 15, 0).unwrap(),
            },
            Patient {
                id: "id-002".to_string(),
                patient_id: "patient-002".to_string(),
                name: "Ben Okafor".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1992, 9, 30).unwrap(),
                gender: "male".to_string(),
                email: "ben.okafor@example.org".to_string(),
                phone: "555-0102".to_string(),
                address: "48 Birch Street".to_string(),
                wallet_address: "0x9e8d7c6b5a49382716053f2e1d0c9b8a76543210".to_string(),
                created_at: Utc.with_ymd_and_hms(2025, 12, 18, 14, 40, 0).unwrap(),
            },
            Patient {
                id: "id-003".to_string(),
                patient_id: "patient-003".to_string(),
                name: "Carla Reyes".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1975, 1, 22).unwrap(),
                gender: "female".to_string(),
                email: "carla.reyes@example.org".to_string(),
                phone: "555-0103".to_string(),
                address: "7 Quarry Road".to_string(),
                wallet_address: "0x1b2c3d4e5f60718293a4b5c6d7e8f90123456789".to_string(),
                created_at: Utc.with_ymd_and_hms(2026, 1, 9, 11, 5, 0).unwrap(),
            },
        ];

        let mut records = HashMap::new();
        records.insert(
            "patient-001".to_string(),
            vec![
                MedicalRecord {
                    id: "rec-101".to_string(),
                    title: "Annual physical".to_string(),
                    kind: RecordKind::Diagnostic,
                    status: Some("verified".to_string()),
                    description: Some("Routine annual examination, no findings".to_string()),
                    date: NaiveDate::from_ymd_opt(2026, 2, 14),
                    doctor: Some("Dr. Patel".to_string()),
                    hospital: Some("Harborview Clinic".to_string()),
                    blockchain_hash: Some("0x77aa".to_string()),
                },
                MedicalRecord {
                    id: "rec-102".to_string(),
                    title: "Lipid panel".to_string(),
                    kind: RecordKind::Lab,
                    status: Some("pending".to_string()),
                    description: None,
                    date: NaiveDate::from_ymd_opt(2026, 3, 2),
                    doctor: Some("Dr. Patel".to_string()),
                    hospital: None,
                    blockchain_hash: None,
                },
            ],
        );
        records.insert(
            "patient-002".to_string(),
            vec![MedicalRecord {
                id: "rec-201".to_string(),
                title: "Physiotherapy plan".to_string(),
                kind: RecordKind::Treatment,
                status: Some("completed".to_string()),
                description: Some("Six-week program after knee surgery".to_string()),
                date: NaiveDate::from_ymd_opt(2026, 1, 20),
                doctor: Some("Dr. Lindqvist".to_string()),
                hospital: Some("Northside Hospital".to_string()),
                blockchain_hash: None,
            }],
        );

        let transactions = vec![
            ChainTransaction {
                id: "tx-9001".to_string(),
                kind: TxKind::ConsentApproval,
                status: TxStatus::Confirmed,
                from: Some("0x4a1f2b3c4d5e6f708192a3b4c5d6e7f801234567".to_string()),
                to: Some("0x000000000000000000000000000000000000c0de".to_string()),
                amount: None,
                currency: None,
                tx_hash: Some(format!("0x{}", "1f".repeat(32))),
                timestamp: Some(Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap()),
            },
            ChainTransaction {
                id: "tx-9002".to_string(),
                kind: TxKind::DataAccess,
                status: TxStatus::Pending,
                from: Some("0x9e8d7c6b5a49382716053f2e1d0c9b8a76543210".to_string()),
                to: Some("0x000000000000000000000000000000000000c0de".to_string()),
                amount: None,
                currency: None,
                tx_hash: Some(format!("0x{}", "2e".repeat(32))),
                timestamp: Some(Utc.with_ymd_and_hms(2026, 2, 5, 16, 45, 0).unwrap()),
            },
        ];

        Self {
            patients,
            records,
            transactions,
            consents: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_stats() {
        let state = PlatformState::demo();
        let stats = state.stats();

        assert_eq!(stats.total_patients, 3);
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.total_consents, 0);
        assert_eq!(stats.total_transactions, 2);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platform.json");

        let state = PlatformState::demo();
        state.save(&path).unwrap();

        let loaded = PlatformState::load(&path).unwrap();
        assert_eq!(loaded.patients.len(), state.patients.len());
        assert_eq!(loaded.transactions.len(), state.transactions.len());
        assert_eq!(loaded.stats(), state.stats());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PlatformState::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_empty_object_parses_with_defaults() {
        let state: PlatformState = serde_json::from_str("{}").unwrap();
        assert!(state.patients.is_empty());
        assert!(state.consents.is_empty());
    }
}
