// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notary_client::ChainConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
use commands::{connect, contract_deposit, hash_deposit, related_deposit};

#[derive(Parser)]
#[command(name = "notary")]
#[command(about = "Ledger evidence client - connect, deposit, query, verify", long_about = None)]
struct Cli {
    /// Chain configuration file (JSON). Defaults apply when omitted.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the ledger node and print the latest block header
    Connect,
    /// Hash a file, deposit the evidence envelope, re-fetch and verify it
    HashDeposit {
        /// File to fingerprint and anchor on the ledger
        #[arg(long, short)]
        file: PathBuf,
    },
    /// Deposit four correlated records under one key, then list them back
    RelatedDeposit {
        /// Correlation key; freshly derived from the clock when omitted
        #[arg(long)]
        key: Option<u64>,
    },
    /// Deploy the deposit contract and run the call/query round trip
    ContractDeposit {
        /// WASM contract bytecode file
        #[arg(long, short = 'b')]
        contract: PathBuf,

        /// Message to deposit through the contract
        #[arg(long, default_value = "Hello world!")]
        message: String,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "notary=info,notary_client=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ChainConfig::from_file(path)?,
        None => ChainConfig::default(),
    };
    tracing::debug!(endpoint = %config.endpoint(), "configuration loaded");

    match cli.command {
        Commands::Connect => connect::run(&config).await,
        Commands::HashDeposit { file } => hash_deposit::run(&config, &file).await,
        Commands::RelatedDeposit { key } => related_deposit::run(&config, key).await,
        Commands::ContractDeposit { contract, message } => {
            contract_deposit::run(&config, &contract, &message).await
        }
    }
}
