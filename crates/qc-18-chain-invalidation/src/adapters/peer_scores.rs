use crate::config::PeerScoringConfig;
use crate::ports::PeerMisbehaviorSink;
use parking_lot::Mutex;
use shared_types::PeerId;
use std::collections::HashMap;
use tracing::{info, warn};

/// Accumulated misbehavior of one peer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerScore {
    pub score: u32,
    pub banned: bool,
}

/// Misbehavior score book.
///
/// Scores only grow. A peer is banned once its score reaches the configured
/// threshold; disconnecting it is up to the peer manager polling
/// [`PeerScoreBook::is_banned`].
#[derive(Debug)]
pub struct PeerScoreBook {
    config: PeerScoringConfig,
    scores: Mutex<HashMap<PeerId, PeerScore>>,
}

impl PeerScoreBook {
    pub fn new(config: PeerScoringConfig) -> Self {
        Self {
            config,
            scores: Mutex::new(HashMap::new()),
        }
    }

    pub fn score(&self, peer: &PeerId) -> u32 {
        self.scores.lock().get(peer).map_or(0, |s| s.score)
    }

    pub fn is_banned(&self, peer: &PeerId) -> bool {
        self.scores.lock().get(peer).is_some_and(|s| s.banned)
    }

    pub fn peer(&self, peer: &PeerId) -> Option<PeerScore> {
        self.scores.lock().get(peer).copied()
    }
}

impl Default for PeerScoreBook {
    fn default() -> Self {
        Self::new(PeerScoringConfig::default())
    }
}

impl PeerMisbehaviorSink for PeerScoreBook {
    fn penalize(&self, peer: &PeerId, score: u32, reason: &str) {
        if score == 0 {
            return;
        }

        let mut scores = self.scores.lock();
        let entry = scores.entry(peer.clone()).or_default();
        let before = entry.score;
        entry.score = entry.score.saturating_add(score);

        if !entry.banned && entry.score >= self.config.ban_threshold {
            entry.banned = true;
            warn!(
                "Misbehaving: peer={} ({} -> {}) reason=\"{}\" BAN THRESHOLD EXCEEDED",
                peer, before, entry.score, reason
            );
        } else {
            info!(
                "Misbehaving: peer={} ({} -> {}) reason=\"{}\"",
                peer, before, entry.score, reason
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(tag: u8) -> PeerId {
        PeerId::new([tag; 32])
    }

    #[test]
    fn test_scores_accumulate_until_ban() {
        let book = PeerScoreBook::new(PeerScoringConfig { ban_threshold: 50 });

        book.penalize(&peer(1), 20, "test");
        book.penalize(&peer(1), 20, "test");
        assert_eq!(book.score(&peer(1)), 40);
        assert!(!book.is_banned(&peer(1)));

        book.penalize(&peer(1), 10, "test");
        assert!(book.is_banned(&peer(1)));
        assert_eq!(book.score(&peer(2)), 0);
    }

    #[test]
    fn test_zero_score_is_ignored() {
        let book = PeerScoreBook::default();
        book.penalize(&peer(1), 0, "test");
        assert_eq!(book.peer(&peer(1)), None);
    }
}
