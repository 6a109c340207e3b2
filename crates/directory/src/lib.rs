//! MedLedger Directory - the read-only display plane
//!
//! Patients, medical records, transaction history, and platform statistics
//! behind a conventional paged-list/detail-fetch contract. Everything here
//! is fetch-and-render data; the consent workflow lives in
//! `medledger-consent`.

mod error;
mod memory;
mod types;

pub use error::DirectoryError;
pub use memory::InMemoryDirectory;
pub use types::{
    normalize_records, normalize_transactions, short_address, ChainTransaction, MedicalRecord,
    Page, Patient, PatientPage, PlatformStats, RecordKind, RecordsDirectory, TxKind, TxStatus,
};
