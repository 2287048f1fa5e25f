use crate::config::ForkWarningConfig;
use crate::events::ForkWarningContext;
use crate::ports::ForkWarningEvaluator;
use shared_types::{hash_hex, U256};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Fork-warning evaluator that reports through the log.
///
/// Raises a sticky "large-work invalid chain" alert when the most-work
/// invalid block is more than `margin_blocks` blocks of average work ahead
/// of the active tip. That usually means the node is on a minority fork
/// or is missing a consensus upgrade.
#[derive(Debug, Default)]
pub struct LoggingForkWarning {
    alert: AtomicBool,
}

impl LoggingForkWarning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alert_active(&self) -> bool {
        self.alert.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        if self.alert.swap(false, Ordering::SeqCst) {
            info!("Fork warning cleared: no invalid chain with significantly more work");
        }
    }
}

impl ForkWarningEvaluator for LoggingForkWarning {
    fn check_fork_warning(
        &self,
        config: &ForkWarningConfig,
        context: &ForkWarningContext,
        is_initial_sync: bool,
    ) {
        // No fork alerts during initial sync.
        if !config.enabled || is_initial_sync {
            return;
        }

        let (Some(invalid), Some(tip)) = (&context.best_invalid, &context.active_tip) else {
            self.clear();
            return;
        };

        let average_block_work = tip.chain_work / U256::from(tip.height.saturating_add(1));
        let margin = average_block_work.saturating_mul(U256::from(config.margin_blocks));

        if invalid.chain_work > tip.chain_work.saturating_add(margin) {
            if !self.alert.swap(true, Ordering::SeqCst) {
                warn!(
                    "Warning: found invalid chain at least ~{} blocks longer than our best chain \
                     (invalid tip {} at height {}, our tip at height {}). \
                     Chain state database corruption likely.",
                    config.margin_blocks,
                    hash_hex(&invalid.hash),
                    invalid.height,
                    tip.height
                );
            }
        } else {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChainTipSummary;

    fn summary(tag: u8, height: u64, work: u64) -> ChainTipSummary {
        ChainTipSummary {
            hash: [tag; 32],
            height,
            chain_work: U256::from(work),
            timestamp: 0,
        }
    }

    fn context(invalid_work: u64) -> ForkWarningContext {
        // Tip at height 9 with work 100 → 10 work per block on average
        ForkWarningContext {
            best_invalid: Some(summary(1, 20, invalid_work)),
            active_tip: Some(summary(2, 9, 100)),
        }
    }

    #[test]
    fn test_alert_raised_and_cleared() {
        let evaluator = LoggingForkWarning::new();
        let config = ForkWarningConfig::default();

        evaluator.check_fork_warning(&config, &context(161), false);
        assert!(evaluator.is_alert_active());

        evaluator.check_fork_warning(&config, &context(160), false);
        assert!(!evaluator.is_alert_active());
    }

    #[test]
    fn test_initial_sync_is_ignored() {
        let evaluator = LoggingForkWarning::new();
        evaluator.check_fork_warning(&ForkWarningConfig::default(), &context(1_000), true);
        assert!(!evaluator.is_alert_active());
    }

    #[test]
    fn test_disabled_is_ignored() {
        let evaluator = LoggingForkWarning::new();
        let config = ForkWarningConfig::default().with_enabled(false);
        evaluator.check_fork_warning(&config, &context(1_000), false);
        assert!(!evaluator.is_alert_active());
    }
}
