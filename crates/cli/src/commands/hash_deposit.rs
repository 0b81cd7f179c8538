//! File hash evidence: fingerprint a file, anchor the envelope on the
//! ledger, then re-fetch and verify the stored hash against the file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use notary_client::rpc::LedgerRpc;
use notary_client::{ChainConfig, FileEvidenceEnvelope, Session};

pub async fn run(config: &ChainConfig, file: &Path) -> anyhow::Result<()> {
    let content = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    println!("Step 1, connecting to {}...", config.endpoint());
    let mut session = Session::connect(config).await?;

    let result = deposit_and_verify(&session, &file_name, &content).await;

    println!("Step 4, disconnecting...");
    session.disconnect();
    result
}

async fn deposit_and_verify(
    session: &Session<impl LedgerRpc>,
    file_name: &str,
    content: &[u8],
) -> anyhow::Result<()> {
    println!("Step 2, depositing the file fingerprint...");
    let hash = session.algorithm().digest(content);
    let envelope = FileEvidenceEnvelope::new(file_name, &hash);
    let outcome = session.deposit_plain(&envelope.to_bytes()?).await?;
    println!("transaction id: {}", outcome.tx_id);

    println!("Step 3, verifying against the chain...");
    let stored = session.get_by_tx_id(&outcome.tx_id).await?;
    let recorded = FileEvidenceEnvelope::from_bytes(&stored)?;
    if recorded.matches(content, session.algorithm()) {
        println!("result: verification consistent");
    } else {
        println!("result: verification MISMATCH");
    }
    Ok(())
}
