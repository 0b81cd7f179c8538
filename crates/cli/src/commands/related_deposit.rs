//! Correlated evidence: four shipment stages recorded under one key, then
//! listed back as a group. The count query and the page fetch are two
//! round trips; with a concurrent writer the page can lag the count.

use chrono::Utc;
use notary_client::rpc::LedgerRpc;
use notary_client::{ChainConfig, Session};

const STAGES: [&str; 4] = ["order placed", "out of warehouse", "arrived", "receipt confirmed"];

pub async fn run(config: &ChainConfig, key: Option<u64>) -> anyhow::Result<()> {
    let key = key.unwrap_or_else(|| Utc::now().timestamp_millis() as u64);

    println!("Step 1, connecting to {}...", config.endpoint());
    let mut session = Session::connect(config).await?;

    let result = deposit_and_list(&session, key).await;

    println!("Step 4, disconnecting...");
    session.disconnect();
    result
}

async fn deposit_and_list(session: &Session<impl LedgerRpc>, key: u64) -> anyhow::Result<()> {
    println!("Step 2, depositing {} records under key {key}...", STAGES.len());
    for stage in STAGES {
        let outcome = session.deposit_correlated(stage.as_bytes(), key).await?;
        println!("  {stage}: {}", outcome.tx_id);
    }

    println!("Step 3, listing records for key {key}...");
    let payloads = session.fetch_correlated(session.identity(), key).await?;
    println!("found {} records:", payloads.len());
    for payload in &payloads {
        println!("  {}", String::from_utf8_lossy(payload));
    }
    Ok(())
}
