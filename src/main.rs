//! Certificate issuer CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI (clap) ──▶ config (TOML + defaults) ──▶ LocalWallet (key from env, alloy RPC)
//!                                                   │
//!                     ┌─────────────────────────────┤
//!                     ▼                             ▼
//!              SessionManager               CertificateIssuer
//!       (connect, switch/add network)   (pre-flight, estimate, send,
//!                                         certificate ID extraction)
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::B256;
use clap::{Parser, Subcommand};
use serde_json::json;

use certificate_issuer::certificate::{CertificateRegistry, Field, IssuerForm, SubmissionResult};
use certificate_issuer::config::{load_or_default, IssuerConfig};
use certificate_issuer::observability::logging::init_logging;
use certificate_issuer::wallet::{ConnectOutcome, SessionManager};
use certificate_issuer::LocalWallet;

#[derive(Parser)]
#[command(name = "certificate-issuer")]
#[command(about = "Issue and verify on-chain certificates", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the target network and contract
    Network,
    /// Connect the wallet and switch it to the target network
    Connect,
    /// Issue a certificate
    Issue {
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        event: String,
        /// Content hash of the certificate document
        #[arg(long)]
        hash: String,
    },
    /// Fetch a certificate record
    Get { certificate_id: B256 },
    /// Check whether a certificate is valid
    Verify { certificate_id: B256 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    tracing::debug!(
        chain_id = config.network.chain_id,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Network => {
            print_json(&json!({
                "network": config.network,
                "hex_chain_id": config.network.hex_chain_id(),
                "contract": config.contract.address,
            }))?;
        }
        Commands::Connect => {
            let wallet = Arc::new(LocalWallet::from_config(&config)?);
            let mut session = SessionManager::new(wallet, config.network.clone());
            let outcome = session.connect().await?;
            print_json(&json!({
                "outcome": outcome,
                "session": session.session(),
            }))?;
        }
        Commands::Issue {
            recipient,
            event,
            hash,
        } => issue(&config, recipient, event, hash).await?,
        Commands::Get { certificate_id } => {
            let registry = registry(&config)?;
            let record = registry.get_certificate(certificate_id).await?;
            print_json(&record)?;
        }
        Commands::Verify { certificate_id } => {
            let registry = registry(&config)?;
            let valid = registry.verify_certificate(certificate_id).await?;
            print_json(&json!({
                "certificate_id": certificate_id,
                "valid": valid,
            }))?;
        }
    }

    Ok(())
}

async fn issue(
    config: &IssuerConfig,
    recipient: String,
    event: String,
    hash: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = Arc::new(LocalWallet::from_config(config)?);
    let mut form = IssuerForm::new(wallet, config);

    form.restore().await;
    if !form.wallet().is_ready() {
        if let ConnectOutcome::Declined { notice } = form.connect().await? {
            return Err(notice.into());
        }
    }

    form.set_field(Field::RecipientName, recipient);
    form.set_field(Field::EventName, event);
    form.set_field(Field::ContentHash, hash);

    let result = form.submit().await?;
    let explorer_url = match &result {
        SubmissionResult::Confirmed(confirmed) => config
            .network
            .explorer_tx_url(&confirmed.transaction_hash.to_string()),
        _ => None,
    };

    print_json(&json!({
        "message": result.headline(),
        "result": result,
        "explorer_url": explorer_url,
    }))?;

    if let SubmissionResult::Failed(failure) = result {
        return Err(failure.message().into());
    }
    Ok(())
}

fn registry(
    config: &IssuerConfig,
) -> Result<CertificateRegistry<LocalWallet>, Box<dyn std::error::Error>> {
    let wallet = Arc::new(LocalWallet::from_config(config)?);
    Ok(CertificateRegistry::new(wallet, config.contract.address))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
