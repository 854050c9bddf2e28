use anyhow::Result;
use tracing::{error, info};
use univ3_indexer::config::Config;
use univ3_indexer::progress::ProgressState;
use univ3_indexer::rpc::RpcClient;
use univ3_indexer::scanner::Scanner;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    info!("Starting Uniswap V3 pool event indexer");

    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("Pool address: {:?}", config.pool_address);
    info!(
        "RPC URLs: {} endpoint(s) configured",
        config.json_rpc_urls.len()
    );

    let client = RpcClient::new(&config.json_rpc_urls)?;
    info!("RPC client connected");

    let initial = ProgressState::load_or_init(
        &config.progress_path(),
        config.pool_address,
        config.deployment_block,
    )?;

    let mut scanner = Scanner::new(client, &config)?;

    match scanner.run(initial).await {
        Ok(final_state) => {
            info!(
                "Backfill finished at block {}",
                final_state.last_completed_block
            );
            Ok(())
        }
        Err(e) => {
            error!("Backfill error: {}", e);
            Err(e)
        }
    }
}
