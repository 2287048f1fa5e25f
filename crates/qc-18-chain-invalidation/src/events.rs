//! Invalidation events
//!
//! Emitted (via logging and the fork-warning evaluator) whenever a block is
//! found invalid.

use crate::domain::{log2_work, BlockIndexEntry};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use shared_types::{hash_hex, Hash, U256};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Significant digits of `log2_work` in log lines.
const LOG2_WORK_DIGITS: usize = 8;

/// Identity and weight of one block, as logged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainTipSummary {
    pub hash: Hash,
    pub height: u64,
    pub chain_work: U256,
    pub timestamp: u64,
}

impl ChainTipSummary {
    pub fn log2_work(&self) -> f64 {
        log2_work(&self.chain_work)
    }

    /// Block time as `%Y-%m-%d %H:%M:%S` (UTC).
    pub fn date(&self) -> String {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

impl From<&BlockIndexEntry> for ChainTipSummary {
    fn from(entry: &BlockIndexEntry) -> Self {
        Self {
            hash: *entry.hash(),
            height: entry.height(),
            chain_work: entry.chain_work(),
            timestamp: entry.timestamp(),
        }
    }
}

impl fmt::Display for ChainTipSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  height={}  log2_work={}  date={}",
            hash_hex(&self.hash),
            self.height,
            format_significant(self.log2_work(), LOG2_WORK_DIGITS),
            self.date()
        )
    }
}

/// Format `value` with `digits` significant digits, trailing zeros removed.
/// Very large or small magnitudes switch to exponent notation (`1.5e+08`).
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.max(1);
    let exponent = value.abs().log10().floor() as i32;

    if exponent < -4 || exponent >= digits as i32 {
        let formatted = format!("{:.*e}", digits - 1, value);
        let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs());
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// A block was found invalid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvalidChainFoundEvent {
    /// The newly invalidated block.
    pub invalid: ChainTipSummary,
    /// Active tip after any rollback, `None` if the chain is empty.
    pub best: Option<ChainTipSummary>,
}

/// What the fork-warning evaluator gets to look at.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForkWarningContext {
    /// Highest-work block ever found invalid.
    pub best_invalid: Option<ChainTipSummary>,
    /// Current active tip.
    pub active_tip: Option<ChainTipSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = ChainTipSummary {
            hash: [0; 32],
            height: 3,
            chain_work: U256::from(8u64),
            timestamp: 0,
        };
        let line = summary.to_string();
        assert!(line.contains("height=3"));
        assert!(line.contains("log2_work=3  "));
        assert!(line.contains("date=1970-01-01 00:00:00"));
    }

    #[test]
    fn test_log2_work_uses_significant_digits() {
        let summary = ChainTipSummary {
            hash: [0; 32],
            height: 1,
            chain_work: U256::from(3u64),
            timestamp: 0,
        };
        assert!(summary.to_string().contains("log2_work=1.5849625  "));

        assert_eq!(format_significant(87.123456789, 8), "87.123457");
        assert_eq!(format_significant(123_456_789.0, 8), "1.2345679e+08");
        assert_eq!(format_significant(0.000_012_5, 8), "1.25e-05");
        assert_eq!(format_significant(0.0, 8), "0");
    }

    #[test]
    fn test_event_serializes() {
        let event = InvalidChainFoundEvent {
            invalid: ChainTipSummary {
                hash: [1; 32],
                height: 2,
                chain_work: U256::from(3u64),
                timestamp: 1_700_000_000,
            },
            best: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"height\":2"));
    }
}
