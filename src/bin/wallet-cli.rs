use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;

use stellar_wallet_bridge::blockchain::HorizonClient;
use stellar_wallet_bridge::config::loader::load_config;
use stellar_wallet_bridge::observability::logging;
use stellar_wallet_bridge::payments::{Asset, DonationRecord, DonationRecorder, HttpDonationRecorder};
use stellar_wallet_bridge::WalletCoreConfig;

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Operator CLI for Horizon submission and donation records", long_about = None)]
struct Cli {
    /// TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured primary Horizon URL
    #[arg(long)]
    horizon: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check Horizon reachability and network passphrase
    Status,
    /// Submit an already-signed envelope, optionally recording it as a donation
    Submit {
        #[arg(long)]
        envelope: String,
        #[arg(long, requires_all = ["donor", "amount"])]
        project_id: Option<String>,
        #[arg(long)]
        donor: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long, default_value = "XLM")]
        asset: Asset,
    },
    /// Post a donation record for a transaction that already settled
    Record {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        donor: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "XLM")]
        asset: Asset,
        #[arg(long)]
        tx_hash: String,
        /// Defaults to the configured network
        #[arg(long)]
        network: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WalletCoreConfig::default(),
    };
    if let Some(horizon) = cli.horizon {
        config.network.horizon_url = horizon;
    }
    logging::init(&config.observability);

    tracing::debug!(
        horizon_url = %config.network.horizon_url,
        network = %config.network.default_network,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Status => {
            let client = HorizonClient::new(&config.network)?;
            let healthy = client.is_healthy().await;
            let network = match client.verify_network().await {
                Ok(()) => json!("ok"),
                Err(e) => json!(e.to_string()),
            };
            print_json(&json!({
                "horizon": config.network.horizon_url,
                "healthy": healthy,
                "network": config.network.default_network,
                "networkCheck": network,
            }))?;
        }
        Commands::Submit {
            envelope,
            project_id,
            donor,
            amount,
            asset,
        } => {
            let client = HorizonClient::new(&config.network)?;
            let response = client.submit_transaction(&envelope).await?;

            let mut recorded = None;
            if let (Some(project_id), Some(donor), Some(amount)) = (project_id, donor, amount) {
                if !response.success {
                    tracing::warn!(hash = %response.hash, "Transaction not successful, skipping donation record");
                } else if config.donations.enabled {
                    let record = DonationRecord {
                        project_id,
                        donor_wallet: donor,
                        amount,
                        asset,
                        tx_hash: response.hash.clone(),
                        network: config.network.default_network.clone(),
                    };
                    let recorder = HttpDonationRecorder::new(&config.donations)?;
                    recorded = Some(match recorder.record(&record).await {
                        Ok(()) => true,
                        Err(e) => {
                            eprintln!("Warning: payment settled but donation record failed: {}", e);
                            false
                        }
                    });
                }
            }

            print_json(&json!({
                "success": response.success,
                "hash": response.hash,
                "ledger": response.ledger,
                "recorded": recorded,
            }))?;
        }
        Commands::Record {
            project_id,
            donor,
            amount,
            asset,
            tx_hash,
            network,
        } => {
            let record = DonationRecord {
                project_id,
                donor_wallet: donor,
                amount,
                asset,
                tx_hash,
                network: network.unwrap_or_else(|| config.network.default_network.clone()),
            };
            let recorder = HttpDonationRecorder::new(&config.donations)?;
            recorder.record(&record).await?;
            print_json(&json!({ "recorded": true, "endpoint": recorder.endpoint().as_str() }))?;
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
