use crate::events::PoolEvent;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// One flat row of the event log:
/// `kind,block_number,amount,tick_lower,tick_upper,amount0,amount1`.
///
/// `amount` is the signed liquidity delta: positive for Mint, negated for
/// Burn, zero for Swap. Fields an event kind does not emit are written as
/// zero, uniformly (amount0/amount1 are kept as strings since uint256 token
/// amounts can overflow any machine integer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: String,
    pub block_number: u64,
    pub amount: i128,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0: String,
    pub amount1: String,
}

impl EventRecord {
    pub fn from_event(event: &PoolEvent) -> Result<Self> {
        let kind = event.kind().to_string();
        let block_number = event.block_number();

        let record = match event {
            PoolEvent::Mint {
                amount,
                tick_lower,
                tick_upper,
                amount0,
                amount1,
                ..
            } => EventRecord {
                kind,
                block_number,
                amount: signed_liquidity(*amount, false)?,
                tick_lower: *tick_lower,
                tick_upper: *tick_upper,
                amount0: amount0.to_string(),
                amount1: amount1.to_string(),
            },
            PoolEvent::Burn {
                amount,
                tick_lower,
                tick_upper,
                amount0,
                amount1,
                ..
            } => EventRecord {
                kind,
                block_number,
                amount: signed_liquidity(*amount, true)?,
                tick_lower: *tick_lower,
                tick_upper: *tick_upper,
                amount0: amount0.to_string(),
                amount1: amount1.to_string(),
            },
            PoolEvent::Swap {
                amount0, amount1, ..
            } => EventRecord {
                kind,
                block_number,
                amount: 0,
                tick_lower: 0,
                tick_upper: 0,
                amount0: amount0.to_string(),
                amount1: amount1.to_string(),
            },
        };
        Ok(record)
    }
}

fn signed_liquidity(amount: u128, negate: bool) -> Result<i128> {
    let amount = i128::try_from(amount).context("Liquidity amount overflows i128")?;
    Ok(if negate { -amount } else { amount })
}

/// Append-only CSV log of decoded pool events. No header row; restarts
/// extend the existing file.
pub struct EventStore {
    writer: csv::Writer<std::fs::File>,
}

impl EventStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open event log {}", path.display()))?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        Ok(EventStore { writer })
    }

    /// Append one record per event, preserving input order. Flushes once at
    /// the end of the batch; there is no atomicity across the batch beyond
    /// what the OS gives line-sized appends.
    pub fn append(&mut self, events: &[PoolEvent]) -> Result<usize> {
        for event in events {
            let record = EventRecord::from_event(event)?;
            self.writer
                .serialize(&record)
                .context("Failed to append event record")?;
        }
        self.writer.flush().context("Failed to flush event log")?;
        Ok(events.len())
    }

    /// Read the whole event log back. Used by the offline converter.
    pub fn read_all(path: &Path) -> Result<Vec<EventRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open event log {}", path.display()))?;

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: EventRecord = result.context("Failed to parse event record")?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{I256, U256};
    use std::path::PathBuf;

    fn temp_csv(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("univ3-store-{}-{}.csv", label, nanos))
    }

    fn swap(block_number: u64, amount0: i64, amount1: i64) -> PoolEvent {
        PoolEvent::Swap {
            block_number,
            amount0: I256::try_from(amount0).unwrap(),
            amount1: I256::try_from(amount1).unwrap(),
        }
    }

    #[test]
    fn test_burn_amount_is_negated() {
        let event = PoolEvent::Burn {
            block_number: 101,
            amount: 30,
            tick_lower: 0,
            tick_upper: 0,
            amount0: U256::ZERO,
            amount1: U256::ZERO,
        };
        let record = EventRecord::from_event(&event).unwrap();
        assert_eq!(record.amount, -30);
    }

    #[test]
    fn test_swap_defaults_absent_fields_to_zero() {
        let record = EventRecord::from_event(&swap(100, 500, -250)).unwrap();
        assert_eq!(record.kind, "Swap");
        assert_eq!(record.amount, 0);
        assert_eq!(record.tick_lower, 0);
        assert_eq!(record.tick_upper, 0);
        assert_eq!(record.amount0, "500");
        assert_eq!(record.amount1, "-250");
    }

    #[test]
    fn test_append_writes_one_ordered_line_per_event() {
        let path = temp_csv("append");
        let events = vec![
            swap(100, 500, 0),
            PoolEvent::Burn {
                block_number: 101,
                amount: 30,
                tick_lower: 0,
                tick_upper: 0,
                amount0: U256::ZERO,
                amount1: U256::ZERO,
            },
        ];

        let mut store = EventStore::open(&path).unwrap();
        let written = store.append(&events).unwrap();
        assert_eq!(written, 2);
        drop(store);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["Swap,100,0,0,0,500,0", "Burn,101,-30,0,0,0,0"]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_reopen_appends_instead_of_truncating() {
        let path = temp_csv("reopen");

        let mut store = EventStore::open(&path).unwrap();
        store.append(&[swap(100, 1, 2)]).unwrap();
        drop(store);

        let mut store = EventStore::open(&path).unwrap();
        store.append(&[swap(200, 3, 4)]).unwrap();
        drop(store);

        let records = EventStore::read_all(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].block_number, 100);
        assert_eq!(records[1].block_number, 200);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_all_round_trips_records() {
        let path = temp_csv("roundtrip");
        let events = vec![
            PoolEvent::Mint {
                block_number: 50,
                amount: 1_000,
                tick_lower: -887_220,
                tick_upper: 887_220,
                amount0: U256::from(123u64),
                amount1: U256::from(456u64),
            },
            swap(51, -9, 9),
        ];

        let mut store = EventStore::open(&path).unwrap();
        store.append(&events).unwrap();
        drop(store);

        let records = EventStore::read_all(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, "Mint");
        assert_eq!(records[0].amount, 1_000);
        assert_eq!(records[0].tick_lower, -887_220);
        assert_eq!(records[0].amount1, "456");
        assert_eq!(records[1].kind, "Swap");

        std::fs::remove_file(&path).ok();
    }
}
