//! Consent records and their lifecycle states

use crate::purpose::ConsentPurpose;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Status of a consent record
///
/// The workflow only ever produces `Pending` (on creation) and `Active`
/// (after a recorded transition); other values may arrive from the service
/// and are preserved as `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConsentStatus {
    /// Signed and stored, awaiting on-chain anchoring
    Pending,
    /// Anchored with a recorded transaction hash
    Active,
    /// Any status this client does not generate
    Other(String),
}

impl ConsentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConsentStatus::Pending => "pending",
            ConsentStatus::Active => "active",
            ConsentStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConsentStatus::Pending)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ConsentStatus::Active)
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ConsentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => ConsentStatus::Pending,
            "active" => ConsentStatus::Active,
            _ => ConsentStatus::Other(s),
        }
    }
}

impl From<ConsentStatus> for String {
    fn from(s: ConsentStatus) -> Self {
        s.as_str().to_string()
    }
}

/// Status filter applied to the displayed consent list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Pending,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Pending => "pending",
        }
    }

    /// The status constraint sent to the service; `All` means none
    pub fn status_param(&self) -> Option<ConsentStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(ConsentStatus::Active),
            StatusFilter::Pending => Some(ConsentStatus::Pending),
        }
    }

    /// Whether a consent with the given status satisfies this filter
    pub fn matches(&self, status: &ConsentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status.is_active(),
            StatusFilter::Pending => status.is_pending(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "pending" => Ok(StatusFilter::Pending),
            other => Err(format!("unknown status filter: {}", other)),
        }
    }
}

/// Errors that can occur when validating a transaction hash
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxHashError {
    #[error("Transaction hash cannot be empty")]
    Empty,

    #[error("Transaction hash must be 0x-prefixed: {0}")]
    MissingPrefix(String),

    #[error("Transaction hash must be 64 hex characters, got {0}")]
    BadLength(usize),

    #[error("Transaction hash contains non-hex characters: {0}")]
    NotHex(String),
}

/// On-chain transaction identifier: `0x` followed by 64 hex characters
///
/// Supplied by the external blockchain-submission step; this client records
/// it but never invents one inside the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    pub fn new(s: impl Into<String>) -> Result<Self, TxHashError> {
        let s = s.into();
        if s.is_empty() {
            return Err(TxHashError::Empty);
        }
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| TxHashError::MissingPrefix(s.clone()))?;
        if hex_part.len() != 64 {
            return Err(TxHashError::BadLength(hex_part.len()));
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TxHashError::NotHex(s.clone()));
        }
        Ok(TxHash(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TxHash {
    type Error = TxHashError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TxHash::new(s)
    }
}

impl From<TxHash> for String {
    fn from(h: TxHash) -> Self {
        h.0
    }
}

/// A consent record as stored by the Consent Service
///
/// `id`, `created_at`, and the initial `status` are assigned server-side;
/// `signature` is produced once over the canonical consent message and
/// never regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    pub id: String,
    pub patient_id: String,
    pub purpose: ConsentPurpose,
    pub wallet_address: String,
    pub signature: String,
    pub status: ConsentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_tx_hash: Option<TxHash>,
    pub created_at: DateTime<Utc>,
}
