//! CLI commands

use crate::context::AppContext;
use medledger_consent::WorkflowError;
use medledger_core::StatusFilter;
use medledger_directory::{
    normalize_records, normalize_transactions, short_address, RecordsDirectory,
};
use std::path::Path;

const PAGE_SIZE: u32 = 10;

/// List patients (paged, optionally filtered by a search term)
pub async fn patients(ctx: &AppContext, page: u32, search: &str) -> anyhow::Result<()> {
    let result = ctx.directory.list_patients(page, PAGE_SIZE, search).await?;

    if result.patients.is_empty() {
        println!("No patients found.");
        return Ok(());
    }

    for patient in &result.patients {
        println!(
            "{}  {} ({})",
            patient.patient_id, patient.name, patient.gender
        );
        println!(
            "            DOB {}  ·  {}  ·  {}",
            patient.date_of_birth,
            patient.email,
            short_address(&patient.wallet_address)
        );
    }

    println!(
        "\nPage {} of {} · {} patients",
        result.pagination.page, result.pagination.total_pages, result.pagination.total
    );
    Ok(())
}

/// Show one patient with their medical records
pub async fn patient(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let patient = ctx.directory.patient(id).await?;
    let records = ctx.directory.patient_records(&patient.patient_id).await?;
    let records = normalize_records(&records);

    println!("{} ({})", patient.name, patient.patient_id);
    println!("  DOB:     {}", patient.date_of_birth);
    println!("  Gender:  {}", patient.gender);
    println!("  Email:   {}", patient.email);
    println!("  Phone:   {}", patient.phone);
    println!("  Address: {}", patient.address);
    println!("  Wallet:  {}", patient.wallet_address);

    println!("\nMedical records ({})", records.len());
    for record in &records {
        let status = record.status.as_deref().unwrap_or("-");
        println!("  [{}] {} ({})", record.kind, record.title, status);
        if let Some(description) = &record.description {
            println!("      {}", description);
        }
        if let Some(date) = record.date {
            println!("      Date: {}", date);
        }
        if let Some(doctor) = &record.doctor {
            println!("      Doctor: {}", doctor);
        }
        if let Some(hash) = &record.blockchain_hash {
            println!("      Hash: {}", hash);
        }
    }
    Ok(())
}

/// Show recorded transactions, newest first
pub async fn transactions(
    ctx: &AppContext,
    account: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    if let Some(account) = account {
        println!("Filtering for: {}", short_address(account));
    }

    let transactions = ctx.directory.transactions(account, limit).await?;
    let transactions = normalize_transactions(&transactions);

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    for tx in &transactions {
        println!("{}  {:?} ({:?})", tx.id, tx.kind, tx.status);
        if let (Some(from), Some(to)) = (&tx.from, &tx.to) {
            println!("      {} -> {}", short_address(from), short_address(to));
        }
        if let Some(amount) = tx.amount {
            println!("      Amount: {} {}", amount, tx.currency.as_deref().unwrap_or(""));
        }
        if let Some(hash) = &tx.tx_hash {
            println!("      Tx hash: {}", hash);
        }
        if let Some(timestamp) = tx.timestamp {
            println!("      {}", timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }
    Ok(())
}

/// Show the platform statistics tiles
pub async fn stats(ctx: &AppContext) -> anyhow::Result<()> {
    let stats = ctx.directory.stats().await?;

    println!("Platform statistics");
    println!("  Total patients:     {}", stats.total_patients);
    println!("  Total records:      {}", stats.total_records);
    println!("  Total consents:     {}", stats.total_consents);
    println!("  Active consents:    {}", stats.active_consents);
    println!("  Pending consents:   {}", stats.pending_consents);
    println!("  Total transactions: {}", stats.total_transactions);
    Ok(())
}

/// List consents under a status filter
pub async fn consents(ctx: &mut AppContext, filter: StatusFilter) -> anyhow::Result<()> {
    ctx.workflow.set_filter(filter);
    ctx.workflow.refresh().await?;

    let consents = ctx.workflow.consents();
    if consents.is_empty() {
        println!("No consents found for the selected filter.");
        return Ok(());
    }

    for consent in consents {
        println!("{}  {} [{}]", consent.id, consent.purpose, consent.status);
        println!("      Patient: {}", consent.patient_id);
        println!("      Wallet:  {}", short_address(&consent.wallet_address));
        println!(
            "      Created: {}",
            consent.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if let Some(hash) = &consent.blockchain_tx_hash {
            println!("      Tx hash: {}", hash);
        }
        if consent.status.is_pending() {
            println!("      (pending - run consent-activate {})", consent.id);
        }
    }
    Ok(())
}

/// Sign and create a new consent
pub async fn consent_create(
    ctx: &mut AppContext,
    patient_id: &str,
    purpose: &str,
) -> anyhow::Result<()> {
    match ctx.workflow.authorize(patient_id, purpose).await {
        Ok(consent) => {
            println!("✅ Consent created: {}", consent.id);
            println!("   Purpose: {}", consent.purpose);
            println!("   Status:  {}", consent.status);
            ctx.save()?;
            Ok(())
        }
        Err(WorkflowError::NotConnected) => {
            println!("❌ Connect a wallet first: set MEDLEDGER_WALLET_KEY (see keygen)");
            Ok(())
        }
        Err(err) => {
            println!("❌ Failed to create consent: {}", err);
            Err(err.into())
        }
    }
}

/// Activate a pending consent, recording its transaction hash
pub async fn consent_activate(ctx: &mut AppContext, id: &str) -> anyhow::Result<()> {
    ctx.workflow.set_filter(StatusFilter::All);
    ctx.workflow.refresh().await?;

    match ctx.workflow.activate(id).await {
        Ok(consent) => {
            println!("✅ Consent {} is now {}", consent.id, consent.status);
            if let Some(hash) = &consent.blockchain_tx_hash {
                println!("   Tx hash: {}", hash);
            }
            ctx.save()?;
            Ok(())
        }
        Err(err) => {
            println!("❌ Failed to activate consent: {}", err);
            Err(err.into())
        }
    }
}

/// Generate a new wallet key
pub fn keygen(output: &Path) -> anyhow::Result<()> {
    use medledger_signer::{LocalWallet, WalletSigner};

    let wallet = LocalWallet::generate();
    let seed = wallet.seed_hex();

    std::fs::write(output, &seed)?;
    println!("✅ Generated wallet key");
    println!("   Private key saved to: {}", output.display());
    println!("   Address: {}", wallet.address());
    println!();
    println!("To use: export MEDLEDGER_WALLET_KEY={}", seed);
    Ok(())
}
