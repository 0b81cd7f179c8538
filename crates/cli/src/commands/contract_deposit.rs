//! Contract evidence: deploy the WASM deposit contract, store a message
//! through it, then read the count and the message back with local calls.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use notary_client::rpc::LedgerRpc;
use notary_client::wasm::{WasmOutput, WasmParams};
use notary_client::{CallKind, ChainConfig, Session};

pub async fn run(config: &ChainConfig, contract: &Path, message: &str) -> anyhow::Result<()> {
    let bytecode =
        fs::read(contract).with_context(|| format!("reading {}", contract.display()))?;

    println!("Step 1, connecting to {}...", config.endpoint());
    let mut session = Session::connect(config).await?;

    let result = deploy_and_query(&session, bytecode, message).await;

    println!("Step 5, disconnecting...");
    session.disconnect();
    result
}

async fn deploy_and_query(
    session: &Session<impl LedgerRpc>,
    bytecode: Vec<u8>,
    message: &str,
) -> anyhow::Result<()> {
    // Fresh contract name per run so repeated demos never collide.
    let name = format!("wasm-contract-{}", Utc::now().timestamp_millis());

    println!("Step 2, deploying contract {name}...");
    let (handle, deploy) = session
        .deploy_contract(&name, bytecode, WasmParams::constructor())
        .await?;
    println!("contract address: {}", handle.identity);
    println!("deploy tx: {}", deploy.tx_id);
    session
        .call_contract(&handle, WasmParams::new("Init"), CallKind::Commit)
        .await?;

    println!("Step 3, depositing message...");
    let deposit = session
        .call_contract(&handle, WasmParams::new("Deposit").push_string(message), CallKind::Commit)
        .await?;
    println!("deposit tx: {}", deposit.tx_id);

    let count = session
        .call_contract(&handle, WasmParams::new("GetCount"), CallKind::Local)
        .await?;
    let count = WasmOutput::new(count.receipt.output).take_u64()?;
    println!("total deposit count: {count}");

    println!("Step 4, querying the message back...");
    let queried = session
        .call_contract(
            &handle,
            WasmParams::new("QueryMessage").push_bytes(deposit.tx_id.as_bytes()),
            CallKind::Local,
        )
        .await?;
    let stored = WasmOutput::new(queried.receipt.output).take_string()?;
    if stored == message {
        println!("message on chain: {stored}, verification consistent");
    } else {
        println!("message on chain: {stored}, verification MISMATCH");
    }
    Ok(())
}
