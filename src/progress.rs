use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Backfill cursor for one pool. `last_completed_block` is the `to_block` of
/// the most recent successfully persisted chunk; it never regresses, and the
/// next chunk always starts at `last_completed_block + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub pool: Address,
    pub last_completed_block: u64,
}

impl ProgressState {
    pub fn new(pool: Address, deployment_block: u64) -> Self {
        ProgressState {
            pool,
            last_completed_block: deployment_block,
        }
    }

    /// Load the cursor from disk, or start from the deployment block when no
    /// cursor file exists yet. A cursor written for a different pool is
    /// refused rather than silently mixing event logs.
    pub fn load_or_init(path: &Path, pool: Address, deployment_block: u64) -> Result<Self> {
        if !path.exists() {
            info!(
                "No progress file at {}, starting from deployment block {}",
                path.display(),
                deployment_block
            );
            return Ok(ProgressState::new(pool, deployment_block));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read progress file {}", path.display()))?;
        let state: ProgressState = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse progress file {}", path.display()))?;

        if state.pool != pool {
            anyhow::bail!(
                "Progress file {} tracks pool {:?}, not {:?}",
                path.display(),
                state.pool,
                pool
            );
        }

        info!(
            "Resuming from block {} (progress file {})",
            state.last_completed_block,
            path.display()
        );
        Ok(state)
    }

    /// Persist the cursor. Written to a sibling temp file and renamed so a
    /// crash mid-write cannot leave a truncated cursor behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let contents = serde_json::to_string(self).context("Failed to serialize progress state")?;
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write progress file {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace progress file {}", path.display()))?;
        Ok(())
    }

    /// The cursor after a chunk ending at `to_block` has been persisted.
    pub fn advance(self, to_block: u64) -> Self {
        debug_assert!(to_block >= self.last_completed_block);
        ProgressState {
            pool: self.pool,
            last_completed_block: to_block,
        }
    }
}
