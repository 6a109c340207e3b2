//! MedLedger CLI - Main entry point

use clap::{Parser, Subcommand};
use medledger_cli::{commands, AppContext};
use medledger_core::StatusFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medledger")]
#[command(about = "MedLedger - healthcare records dashboard", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients
    Patients {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// Search term (matches name or patient id)
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Show one patient and their medical records
    Patient {
        /// Patient id
        id: String,
    },

    /// Show recorded blockchain transactions
    Transactions {
        /// Only transactions involving this wallet address
        #[arg(long)]
        account: Option<String>,
        /// Maximum number of transactions to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show platform statistics
    Stats,

    /// List consents
    Consents {
        /// Status filter: all, active, or pending
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },

    /// Sign and create a new consent
    ConsentCreate {
        /// Patient the consent concerns
        patient_id: String,
        /// Consent purpose (must be one of the platform purposes)
        purpose: String,
    },

    /// Mark a pending consent as active
    ConsentActivate {
        /// Consent id
        id: String,
    },

    /// Generate a new wallet key
    Keygen {
        /// Output file path
        #[arg(long, default_value = "wallet.key")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Create application context
    let mut ctx = AppContext::new(&cli.data)?;

    match cli.command {
        Commands::Patients { page, search } => {
            commands::patients(&ctx, page, &search).await?;
        }

        Commands::Patient { id } => {
            commands::patient(&ctx, &id).await?;
        }

        Commands::Transactions { account, limit } => {
            commands::transactions(&ctx, account.as_deref(), limit).await?;
        }

        Commands::Stats => {
            commands::stats(&ctx).await?;
        }

        Commands::Consents { status } => {
            commands::consents(&mut ctx, status).await?;
        }

        Commands::ConsentCreate {
            patient_id,
            purpose,
        } => {
            commands::consent_create(&mut ctx, &patient_id, &purpose).await?;
        }

        Commands::ConsentActivate { id } => {
            commands::consent_activate(&mut ctx, &id).await?;
        }

        Commands::Keygen { output } => {
            commands::keygen(&output)?;
        }
    }

    Ok(())
}
