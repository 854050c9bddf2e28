//! Test doubles shared by the fetcher and scanner tests.

use crate::events::{Burn, Mint, Swap};
use crate::rpc::PoolLogSource;
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use alloy_primitives::aliases::{I24, U160};
use alloy_primitives::{Address, I256, U256};
use anyhow::Result;
use std::sync::Mutex;

/// An in-memory chain that rejects getLogs queries wider than a configured
/// limit, mimicking the size-capped public endpoints the bisection logic
/// exists for. Logs are real ABI-encoded pool events so decoding is covered
/// by the same tests.
pub struct SimulatedChain {
    head: u64,
    max_range: u64,
    logs: Mutex<Vec<Log>>,
    queries: Mutex<Vec<(u64, u64)>>,
}

impl SimulatedChain {
    pub fn new(head: u64) -> Self {
        SimulatedChain {
            head,
            max_range: u64::MAX,
            logs: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Reject any query spanning more than `max_range` blocks.
    pub fn with_max_range(mut self, max_range: u64) -> Self {
        self.max_range = max_range;
        self
    }

    /// Every `(from, to)` pair getLogs was called with, in order.
    pub fn log_queries(&self) -> Vec<(u64, u64)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn push_mint(
        &self,
        block_number: u64,
        amount: u128,
        tick_lower: i32,
        tick_upper: i32,
        amount0: u64,
        amount1: u64,
    ) {
        let event = Mint {
            sender: Address::ZERO,
            owner: Address::ZERO,
            tickLower: I24::try_from(tick_lower).unwrap(),
            tickUpper: I24::try_from(tick_upper).unwrap(),
            amount,
            amount0: U256::from(amount0),
            amount1: U256::from(amount1),
        };
        self.push_log(block_number, event.encode_log_data());
    }

    pub fn push_burn(
        &self,
        block_number: u64,
        amount: u128,
        tick_lower: i32,
        tick_upper: i32,
        amount0: u64,
        amount1: u64,
    ) {
        let event = Burn {
            owner: Address::ZERO,
            tickLower: I24::try_from(tick_lower).unwrap(),
            tickUpper: I24::try_from(tick_upper).unwrap(),
            amount,
            amount0: U256::from(amount0),
            amount1: U256::from(amount1),
        };
        self.push_log(block_number, event.encode_log_data());
    }

    pub fn push_swap(&self, block_number: u64, amount0: i64, amount1: i64) {
        let event = Swap {
            sender: Address::ZERO,
            recipient: Address::ZERO,
            amount0: I256::try_from(amount0).unwrap(),
            amount1: I256::try_from(amount1).unwrap(),
            sqrtPriceX96: U160::ZERO,
            liquidity: 0,
            tick: I24::ZERO,
        };
        self.push_log(block_number, event.encode_log_data());
    }

    fn push_log(&self, block_number: u64, data: alloy_primitives::LogData) {
        let log = Log {
            inner: alloy_primitives::Log {
                address: Address::ZERO,
                data,
            },
            block_number: Some(block_number),
            ..Default::default()
        };
        self.logs.lock().unwrap().push(log);
    }
}

impl PoolLogSource for SimulatedChain {
    async fn get_latest_block(&self) -> Result<u64> {
        Ok(self.head)
    }

    async fn get_pool_logs(
        &self,
        _pool: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>> {
        self.queries.lock().unwrap().push((from_block, to_block));

        if to_block - from_block > self.max_range {
            anyhow::bail!("query returned more than 10000 results");
        }

        let logs = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|log| {
                let block = log.block_number.unwrap();
                block >= from_block && block <= to_block
            })
            .cloned()
            .collect();
        Ok(logs)
    }
}
