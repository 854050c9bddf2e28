use crate::events::{PoolEvent, decode_pool_event};
use crate::rpc::PoolLogSource;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// A range this narrow cannot be shrunk further; a failure on it is a real
/// fault (connectivity, bad endpoint), not a size limit.
pub const MIN_RANGE_WIDTH: u64 = 2;

const BISECT_BACKOFF: Duration = Duration::from_millis(250);

/// Fetch and decode all state-changing pool events in
/// `[from_block, desired_to_block]`.
///
/// When the endpoint rejects the query, the upper bound is halved and the
/// query retried after a short pause, until it either succeeds or the range
/// cannot shrink below `MIN_RANGE_WIDTH`. The returned block number is the
/// upper bound actually served, which may be below `desired_to_block`; the
/// caller must resume from it, not from the bound it asked for.
pub async fn fetch_range<S: PoolLogSource>(
    source: &S,
    pool: Address,
    from_block: u64,
    desired_to_block: u64,
) -> Result<(Vec<PoolEvent>, u64)> {
    let mut to_block = desired_to_block;

    loop {
        match source.get_pool_logs(pool, from_block, to_block).await {
            Ok(logs) => {
                debug!(
                    "Received {} logs for blocks {} to {}",
                    logs.len(),
                    from_block,
                    to_block
                );
                let mut events = Vec::with_capacity(logs.len());
                for log in &logs {
                    match decode_pool_event(log) {
                        Ok(Some(event)) => events.push(event),
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Failed to decode pool event log: {}", e);
                        }
                    }
                }
                return Ok((events, to_block));
            }
            Err(e) => {
                if to_block - from_block <= MIN_RANGE_WIDTH {
                    return Err(e).with_context(|| {
                        format!(
                            "getLogs failed for blocks {}-{} at minimum range width",
                            from_block, to_block
                        )
                    });
                }

                let reduced_to_block = from_block + (to_block - from_block) / 2;
                warn!(
                    "getLogs failed for blocks {}-{} ({}), bisecting to {}-{}",
                    from_block, to_block, e, from_block, reduced_to_block
                );

                sleep(BISECT_BACKOFF).await;
                to_block = reduced_to_block;
            }
        }
    }
}
