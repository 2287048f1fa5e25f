//! # Invalidation Configuration
//!
//! All values have defaults suitable for mainnet. `from_env` applies
//! `QC_*` overrides:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `QC_FORK_WARNING` | `fork_warning.enabled` | `true` |
//! | `QC_FORK_WARNING_MARGIN_BLOCKS` | `fork_warning.margin_blocks` | `6` |
//! | `QC_BAN_SCORE` | `peer_scoring.ban_threshold` | `100` |

use std::str::FromStr;
use tracing::warn;

/// Complete invalidation configuration.
#[derive(Debug, Clone, Default)]
pub struct InvalidationConfig {
    /// Fork-warning policy.
    pub fork_warning: ForkWarningConfig,
    /// Peer misbehavior policy.
    pub peer_scoring: PeerScoringConfig,
}

impl InvalidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("QC_FORK_WARNING") {
            match interpret_bool(&value) {
                Some(enabled) => config.fork_warning.enabled = enabled,
                None => warn!("QC_FORK_WARNING must be empty or an integer, got {:?}", value),
            }
        }
        if let Some(margin) = parse_env("QC_FORK_WARNING_MARGIN_BLOCKS") {
            config.fork_warning.margin_blocks = margin;
        }
        if let Some(threshold) = parse_env("QC_BAN_SCORE") {
            config.peer_scoring.ban_threshold = threshold;
        }

        config
    }

    pub fn with_fork_warning(mut self, fork_warning: ForkWarningConfig) -> Self {
        self.fork_warning = fork_warning;
        self
    }

    pub fn with_peer_scoring(mut self, peer_scoring: PeerScoringConfig) -> Self {
        self.peer_scoring = peer_scoring;
        self
    }
}

/// Fork-warning policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkWarningConfig {
    /// Evaluate fork warnings at all.
    pub enabled: bool,
    /// An invalid chain must beat the active tip by this many blocks' worth
    /// of average work before an alert is raised.
    pub margin_blocks: u64,
}

impl Default for ForkWarningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            margin_blocks: 6,
        }
    }
}

impl ForkWarningConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_margin_blocks(mut self, margin_blocks: u64) -> Self {
        self.margin_blocks = margin_blocks;
        self
    }
}

/// Peer misbehavior policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerScoringConfig {
    /// Misbehavior score at which a peer is banned.
    pub ban_threshold: u32,
}

impl Default for PeerScoringConfig {
    fn default() -> Self {
        Self { ban_threshold: 100 }
    }
}

/// Boolean setting: empty means set, otherwise any non-zero integer.
pub fn interpret_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() {
        return Some(true);
    }
    value.parse::<i64>().ok().map(|n| n != 0)
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", key, value);
            None
        }
    }
}
