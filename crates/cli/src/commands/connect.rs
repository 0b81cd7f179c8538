//! Connection smoke test: connect, query the latest block header, disconnect.

use notary_client::{ChainConfig, Session};

pub async fn run(config: &ChainConfig) -> anyhow::Result<()> {
    println!("Step 1, connecting to {}...", config.endpoint());
    let mut session = Session::connect(config).await?;

    println!("Step 2, querying the latest block header...");
    let header = session.last_block_header().await?;
    println!(
        "latest block: height={} hash={} timestamp={}",
        header.height, header.hash, header.timestamp
    );

    println!("Step 3, disconnecting...");
    session.disconnect();
    Ok(())
}
