//! Decoding of the `eth_getBlockByNumber` result and rendering of the block report.

use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const HEX_PREFIX: &str = "0x";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const REPORT_HEADER: &str = "===== LATEST ETHEREUM BLOCK =====";
const REPORT_FOOTER: &str = "=================================";

#[derive(Error, Debug)]
pub enum MalformedBlockRecord {
    #[error("{0}")]
    Shape(#[from] serde_json::Error),

    #[error("field `{field}` is not a 0x-prefixed hex quantity: {value:?}")]
    InvalidHex { field: &'static str, value: String },

    #[error("timestamp {0} is outside the representable calendar range")]
    TimestampOutOfRange(u64),
}

/// The block payload as the node sends it. Quantities are still hex strings.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub number: String,
    pub hash: String,
    pub timestamp: String,
    pub gas_used: String,
    pub gas_limit: String,
    pub miner: String,
    pub parent_hash: String,
    pub transactions: Vec<Value>,
}

/// A block with every quantity decoded, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub number: u64,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_count: usize,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub miner: String,
    pub parent_hash: String,
}

impl BlockRecord {
    pub fn from_value(value: &Value) -> Result<Self, MalformedBlockRecord> {
        Ok(Self::deserialize(value)?)
    }
}

impl TryFrom<BlockRecord> for Block {
    type Error = MalformedBlockRecord;

    fn try_from(record: BlockRecord) -> Result<Self, Self::Error> {
        let number = parse_quantity("number", &record.number)?;
        let seconds = parse_quantity("timestamp", &record.timestamp)?;
        let gas_used = parse_quantity("gasUsed", &record.gas_used)?;
        let gas_limit = parse_quantity("gasLimit", &record.gas_limit)?;
        let timestamp = unix_to_utc(seconds)?;
        debug!("decoded block {number} with {} transactions", record.transactions.len());

        Ok(Self {
            number,
            hash: record.hash,
            timestamp,
            transaction_count: record.transactions.len(),
            gas_used,
            gas_limit,
            miner: record.miner,
            parent_hash: record.parent_hash,
        })
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{REPORT_HEADER}")?;
        writeln!(f, "Block Number: {}", self.number)?;
        writeln!(f, "Block Hash: {}", self.hash)?;
        writeln!(f, "Timestamp: {}", self.timestamp.format(TIMESTAMP_FORMAT))?;
        writeln!(f, "Transactions: {}", self.transaction_count)?;
        writeln!(f, "Gas Used: {}", group_thousands(self.gas_used))?;
        writeln!(f, "Gas Limit: {}", group_thousands(self.gas_limit))?;
        writeln!(f, "Miner/Validator: {}", self.miner)?;
        writeln!(f, "Parent Hash: {}", self.parent_hash)?;
        writeln!(f, "{REPORT_FOOTER}")?;
        writeln!(f)
    }
}

/// Renders the full report for a raw `result` payload. Nothing is produced
/// unless every field decodes.
pub fn format_block_report(record: &Value) -> Result<String, MalformedBlockRecord> {
    let block = Block::try_from(BlockRecord::from_value(record)?)?;
    Ok(block.to_string())
}

/// Parses a `0x`-prefixed hex quantity. Signs, whitespace and a bare `0x` are rejected.
pub fn parse_quantity(field: &'static str, value: &str) -> Result<u64, MalformedBlockRecord> {
    let invalid = || MalformedBlockRecord::InvalidHex {
        field,
        value: value.to_owned(),
    };
    let digits = value.strip_prefix(HEX_PREFIX).ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u64::from_str_radix(digits, 16).map_err(|_| invalid())
}

pub fn unix_to_utc(seconds: u64) -> Result<DateTime<Utc>, MalformedBlockRecord> {
    i64::try_from(seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(MalformedBlockRecord::TimestampOutOfRange(seconds))
}

/// `1234567` -> `"1,234,567"`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
