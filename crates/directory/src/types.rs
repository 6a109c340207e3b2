//! Display-plane entities and the directory contract

use crate::error::DirectoryError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A patient as listed by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
}

/// Kind of a medical record
///
/// Open enumeration: the platform sends free-form type strings and the
/// dashboard recognizes a few of them specially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordKind {
    Diagnostic,
    Treatment,
    Lab,
    Other(String),
}

impl From<String> for RecordKind {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("diagnostic") {
            RecordKind::Diagnostic
        } else if lower.contains("treatment") {
            RecordKind::Treatment
        } else if lower.contains("lab") {
            RecordKind::Lab
        } else {
            RecordKind::Other(s)
        }
    }
}

impl From<RecordKind> for String {
    fn from(k: RecordKind) -> Self {
        k.to_string()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Diagnostic => write!(f, "Diagnostic"),
            RecordKind::Treatment => write!(f, "Treatment"),
            RecordKind::Lab => write!(f, "Lab"),
            RecordKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A medical record attached to a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(rename = "type", alias = "recordType")]
    pub kind: RecordKind,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "recordDate")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub hospital: Option<String>,
    #[serde(default)]
    pub blockchain_hash: Option<String>,
}

/// Kind of a recorded blockchain transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxKind {
    ConsentApproval,
    DataAccess,
    Other(String),
}

impl From<String> for TxKind {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("consent") {
            TxKind::ConsentApproval
        } else if lower.contains("data") {
            TxKind::DataAccess
        } else {
            TxKind::Other(s)
        }
    }
}

impl From<TxKind> for String {
    fn from(k: TxKind) -> Self {
        match k {
            TxKind::ConsentApproval => "consent_approval".to_string(),
            TxKind::DataAccess => "data_access".to_string(),
            TxKind::Other(s) => s,
        }
    }
}

/// Confirmation status of a recorded transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxStatus {
    Confirmed,
    Pending,
    Other(String),
}

impl From<String> for TxStatus {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("confirm") {
            TxStatus::Confirmed
        } else if lower.contains("pending") {
            TxStatus::Pending
        } else {
            TxStatus::Other(s)
        }
    }
}

impl From<TxStatus> for String {
    fn from(s: TxStatus) -> Self {
        match s {
            TxStatus::Confirmed => "confirmed".to_string(),
            TxStatus::Pending => "pending".to_string(),
            TxStatus::Other(s) => s,
        }
    }
}

/// A blockchain transaction recorded for the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub status: TxStatus,
    #[serde(default, alias = "fromAddress")]
    pub from: Option<String>,
    #[serde(default, alias = "toAddress")]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "tokenSymbol")]
    pub currency: Option<String>,
    #[serde(default, alias = "blockchainTxHash")]
    pub tx_hash: Option<String>,
    #[serde(default, alias = "createdAt", alias = "blockchainTimestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Platform-wide counters for the statistics tiles
///
/// Every field defaults to zero so a backend that omits a counter still
/// renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformStats {
    pub total_patients: u64,
    pub total_records: u64,
    pub total_consents: u64,
    pub active_consents: u64,
    pub pending_consents: u64,
    pub total_transactions: u64,
}

/// Pagination metadata for the patient listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

/// One page of the patient listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientPage {
    pub patients: Vec<Patient>,
    pub pagination: Page,
}

/// The records directory as seen by the dashboard
#[async_trait]
pub trait RecordsDirectory: Send + Sync {
    /// Page through patients; `search` matches name or patient id,
    /// case-insensitively. Pages are 1-based.
    async fn list_patients(
        &self,
        page: u32,
        per_page: u32,
        search: &str,
    ) -> Result<PatientPage, DirectoryError>;

    /// Fetch one patient by id
    async fn patient(&self, id: &str) -> Result<Patient, DirectoryError>;

    /// Medical records for a patient; loose shape, see [`normalize_records`]
    async fn patient_records(&self, patient_id: &str) -> Result<Value, DirectoryError>;

    /// Recorded transactions, newest first, optionally filtered by wallet
    /// address; loose shape, see [`normalize_transactions`]
    async fn transactions(
        &self,
        account: Option<&str>,
        limit: usize,
    ) -> Result<Value, DirectoryError>;

    /// Platform-wide counters
    async fn stats(&self) -> Result<PlatformStats, DirectoryError>;
}

fn normalize_list<T: DeserializeOwned>(value: &Value, wrapper_key: &str) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get(wrapper_key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(error = %err, key = wrapper_key, "skipping malformed list element");
                None
            }
        })
        .collect()
}

/// Normalize a records response (bare array or `{"records": [...]}`)
pub fn normalize_records(value: &Value) -> Vec<MedicalRecord> {
    normalize_list(value, "records")
}

/// Normalize a transactions response (bare array or `{"transactions": [...]}`)
pub fn normalize_transactions(value: &Value) -> Vec<ChainTransaction> {
    normalize_list(value, "transactions")
}

/// Shorten a wallet address for display: `0x12345678...abcdef`
pub fn short_address(address: &str) -> String {
    if address.len() <= 16 {
        return address.to_string();
    }
    format!("{}...{}", &address[..8], &address[address.len() - 6..])
}
