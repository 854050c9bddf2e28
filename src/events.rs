use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;
use alloy_primitives::{B256, I256, U256};
use anyhow::{Context, Result};

sol! {
    event Mint(address sender, address indexed owner, int24 indexed tickLower, int24 indexed tickUpper, uint128 amount, uint256 amount0, uint256 amount1);
    event Burn(address indexed owner, int24 indexed tickLower, int24 indexed tickUpper, uint128 amount, uint256 amount0, uint256 amount1);
    event Swap(address indexed sender, address indexed recipient, int256 amount0, int256 amount1, uint160 sqrtPriceX96, uint128 liquidity, int24 tick);
}

/// The topic0 hashes of the three state-changing pool events. Logs are
/// filtered to these at the RPC layer, so the pool's other events
/// (Initialize, Collect, Flash, ...) are never fetched in the first place.
pub fn state_changing_topics() -> Vec<B256> {
    vec![
        Mint::SIGNATURE_HASH,
        Burn::SIGNATURE_HASH,
        Swap::SIGNATURE_HASH,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Mint,
    Burn,
    Swap,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Mint => "Mint",
            EventKind::Burn => "Burn",
            EventKind::Swap => "Swap",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Mint" => Ok(EventKind::Mint),
            "Burn" => Ok(EventKind::Burn),
            "Swap" => Ok(EventKind::Swap),
            other => anyhow::bail!("Unknown event kind: {}", other),
        }
    }
}

/// A decoded state-changing pool event. Each variant carries exactly the
/// fields its on-chain counterpart emits; Swap has no liquidity delta or
/// tick bounds, so it declares none.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolEvent {
    Mint {
        block_number: u64,
        amount: u128,
        tick_lower: i32,
        tick_upper: i32,
        amount0: U256,
        amount1: U256,
    },
    Burn {
        block_number: u64,
        amount: u128,
        tick_lower: i32,
        tick_upper: i32,
        amount0: U256,
        amount1: U256,
    },
    Swap {
        block_number: u64,
        amount0: I256,
        amount1: I256,
    },
}

impl PoolEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PoolEvent::Mint { .. } => EventKind::Mint,
            PoolEvent::Burn { .. } => EventKind::Burn,
            PoolEvent::Swap { .. } => EventKind::Swap,
        }
    }

    pub fn block_number(&self) -> u64 {
        match self {
            PoolEvent::Mint { block_number, .. }
            | PoolEvent::Burn { block_number, .. }
            | PoolEvent::Swap { block_number, .. } => *block_number,
        }
    }
}

/// Decode a raw log into a typed pool event. Returns `None` for logs whose
/// topic0 is not one of the three state-changing events.
pub fn decode_pool_event(log: &Log) -> Result<Option<PoolEvent>> {
    let Some(&topic0) = log.topics().first() else {
        return Ok(None);
    };

    let block_number = log
        .block_number
        .context("Log is missing its block number")?;
    let log_data = log.data();

    if topic0 == Mint::SIGNATURE_HASH {
        let decoded = Mint::decode_raw_log(log.topics(), &log_data.data)?;
        Ok(Some(PoolEvent::Mint {
            block_number,
            amount: decoded.amount,
            tick_lower: decoded.tickLower.as_i32(),
            tick_upper: decoded.tickUpper.as_i32(),
            amount0: decoded.amount0,
            amount1: decoded.amount1,
        }))
    } else if topic0 == Burn::SIGNATURE_HASH {
        let decoded = Burn::decode_raw_log(log.topics(), &log_data.data)?;
        Ok(Some(PoolEvent::Burn {
            block_number,
            amount: decoded.amount,
            tick_lower: decoded.tickLower.as_i32(),
            tick_upper: decoded.tickUpper.as_i32(),
            amount0: decoded.amount0,
            amount1: decoded.amount1,
        }))
    } else if topic0 == Swap::SIGNATURE_HASH {
        let decoded = Swap::decode_raw_log(log.topics(), &log_data.data)?;
        Ok(Some(PoolEvent::Swap {
            block_number,
            amount0: decoded.amount0,
            amount1: decoded.amount1,
        }))
    } else {
        Ok(None)
    }
}
