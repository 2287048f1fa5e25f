use crate::domain::{ActiveChain, BlockMap};
use crate::ports::ChainTipManager;
use shared_types::short_hash;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Chain tip manager with no dependent state to undo.
///
/// Pops the active tip and nothing else, for header-only nodes and tests.
#[derive(Debug, Default)]
pub struct InMemoryChainTipManager {
    disconnects: AtomicU64,
}

impl InMemoryChainTipManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful disconnects so far.
    pub fn disconnect_count(&self) -> u64 {
        self.disconnects.load(Ordering::SeqCst)
    }
}

impl ChainTipManager for InMemoryChainTipManager {
    fn disconnect_tip(&self, chain: &mut ActiveChain, blocks: &BlockMap) -> Result<(), String> {
        let tip = chain.tip().copied().ok_or("active chain is empty")?;
        if !blocks.contains(&tip) {
            return Err(format!("tip {} missing from block map", short_hash(&tip)));
        }
        chain.pop_tip();
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        debug!("Disconnected tip {}", short_hash(&tip));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlockIndexEntry;
    use shared_types::U256;

    #[test]
    fn test_disconnect_pops_tip() {
        let genesis = BlockIndexEntry::new([1; 32], 0, None, U256::one(), 0);
        let mut blocks = BlockMap::new();
        blocks.insert(genesis.clone()).unwrap();
        let mut chain = ActiveChain::new();
        chain.push(&genesis).unwrap();

        let manager = InMemoryChainTipManager::new();
        manager.disconnect_tip(&mut chain, &blocks).unwrap();

        assert!(chain.is_empty());
        assert_eq!(manager.disconnect_count(), 1);
    }

    #[test]
    fn test_disconnect_on_empty_chain_fails_without_change() {
        let manager = InMemoryChainTipManager::new();
        let mut chain = ActiveChain::new();

        assert!(manager.disconnect_tip(&mut chain, &BlockMap::new()).is_err());
        assert_eq!(manager.disconnect_count(), 0);
    }
}
