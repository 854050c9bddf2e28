use crate::events::EventKind;
use crate::store::{EventRecord, EventStore};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One normalized event in the JSON output. Field names are camelCase in the
/// document; all numerics are JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub amount: f64,
    pub amount0: f64,
    pub amount1: f64,
    pub block_number: u64,
    pub event_type: u8,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl NormalizedEvent {
    fn from_record(record: &EventRecord) -> Result<Self> {
        let kind: EventKind = record.kind.parse()?;
        Ok(NormalizedEvent {
            amount: record.amount as f64,
            amount0: parse_amount(&record.amount0, "amount0")?,
            amount1: parse_amount(&record.amount1, "amount1")?,
            block_number: record.block_number,
            event_type: event_type_code(kind),
            tick_lower: record.tick_lower,
            tick_upper: record.tick_upper,
        })
    }
}

fn parse_amount(value: &str, field: &str) -> Result<f64> {
    value
        .parse()
        .with_context(|| format!("Invalid {} value: {:?}", field, value))
}

/// Swap is 1, liquidity events (Mint and Burn) are 0. The code space does
/// not distinguish add from remove; the sign of `amount` does.
fn event_type_code(kind: EventKind) -> u8 {
    match kind {
        EventKind::Swap => 1,
        EventKind::Mint | EventKind::Burn => 0,
    }
}

/// Re-read the whole flat event log and overwrite the JSON output with a
/// single array document. Not incremental.
pub fn convert(csv_path: &Path, json_path: &Path) -> Result<usize> {
    let records = EventStore::read_all(csv_path)?;

    let normalized: Vec<NormalizedEvent> = records
        .iter()
        .map(NormalizedEvent::from_record)
        .collect::<Result<_>>()?;

    let document = serde_json::to_string(&normalized).context("Failed to serialize events")?;
    std::fs::write(json_path, document)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    info!(
        "Converted {} records from {} to {}",
        normalized.len(),
        csv_path.display(),
        json_path.display()
    );
    Ok(normalized.len())
}
