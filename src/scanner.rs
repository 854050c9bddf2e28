use crate::config::Config;
use crate::fetcher::fetch_range;
use crate::progress::ProgressState;
use crate::rpc::PoolLogSource;
use crate::store::EventStore;
use alloy_primitives::Address;
use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::info;

const RATE_LIMIT_DELAY_MS: u64 = 200; // 200ms between requests = 5 requests per second

/// Result of one backfill chunk. `Done` means the chunk ended exactly at the
/// chain head sampled for it; the backfill is a finite job, so catching up
/// terminates the run rather than switching to a follow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    Continue(ProgressState),
    Done(ProgressState),
}

pub struct Scanner<S: PoolLogSource> {
    source: S,
    store: EventStore,
    pool: Address,
    chunk_size: u64,
    progress_path: PathBuf,
}

impl<S: PoolLogSource> Scanner<S> {
    pub fn new(source: S, config: &Config) -> Result<Self> {
        let store = EventStore::open(&config.events_csv_path())?;
        Ok(Scanner {
            source,
            store,
            pool: config.pool_address,
            chunk_size: config.chunk_size,
            progress_path: config.progress_path(),
        })
    }

    /// Process one chunk: fetch `[cursor + 1, min(head, cursor + chunk_size)]`,
    /// append the events, persist the advanced cursor. The fetcher may serve
    /// less than the requested range; whatever bound it reports is what the
    /// cursor advances to.
    pub async fn run_chunk(&mut self, state: ProgressState) -> Result<ChunkOutcome> {
        let latest_block = self.source.get_latest_block().await?;

        if state.last_completed_block >= latest_block {
            return Ok(ChunkOutcome::Done(state));
        }

        let from_block = state.last_completed_block + 1;
        let target_block = latest_block.min(state.last_completed_block + self.chunk_size);

        let (events, actual_to_block) =
            fetch_range(&self.source, self.pool, from_block, target_block).await?;

        let written = self.store.append(&events)?;

        let state = state.advance(actual_to_block);
        state.save(&self.progress_path)?;

        info!(
            "Fetched {} events from block {} to {} ({} written)",
            events.len(),
            from_block,
            actual_to_block,
            written
        );

        if actual_to_block == latest_block {
            Ok(ChunkOutcome::Done(state))
        } else {
            Ok(ChunkOutcome::Continue(state))
        }
    }

    /// Drive chunks until the chain head is reached. Returns the final
    /// cursor; fatal fetch or write errors propagate and abort the backfill.
    pub async fn run(&mut self, initial: ProgressState) -> Result<ProgressState> {
        info!(
            "Starting backfill from block {}",
            initial.last_completed_block
        );

        let mut state = initial;
        loop {
            let loop_start = Instant::now();

            match self.run_chunk(state).await? {
                ChunkOutcome::Done(final_state) => {
                    info!(
                        "Caught up to chain head at block {}. Backfill complete.",
                        final_state.last_completed_block
                    );
                    return Ok(final_state);
                }
                ChunkOutcome::Continue(next_state) => state = next_state,
            }

            // Smart rate limiting: ensure minimum time between loop iterations
            let loop_duration = loop_start.elapsed();
            let target_duration = Duration::from_millis(RATE_LIMIT_DELAY_MS);
            if loop_duration < target_duration {
                sleep(target_duration - loop_duration).await;
            }
        }
    }
}
