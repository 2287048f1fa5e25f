//! Validation outcome for a single block check

use serde::{Deserialize, Serialize};

/// Overall result of a check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMode {
    #[default]
    Valid,
    /// The data violates consensus rules.
    Invalid,
    /// The check could not be run (e.g. a local I/O failure).
    Error,
}

/// Outcome descriptor for one block check.
///
/// `corruption_possible` means the failure might be caused by a local fault
/// rather than by the sender, so the block must not be condemned for good.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationState {
    mode: ValidationMode,
    dos_score: u32,
    reject_reason: String,
    corruption_possible: bool,
}

impl ValidationState {
    pub fn valid() -> Self {
        Self::default()
    }

    /// The block broke a rule; `dos_score` is the penalty for its sender.
    pub fn invalid(dos_score: u32, reason: impl Into<String>) -> Self {
        Self {
            mode: ValidationMode::Invalid,
            dos_score,
            reject_reason: reason.into(),
            corruption_possible: false,
        }
    }

    /// The check itself failed to run.
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            mode: ValidationMode::Error,
            dos_score: 0,
            reject_reason: reason.into(),
            corruption_possible: false,
        }
    }

    /// Mark the failure as possibly caused by local corruption.
    pub fn with_corruption_possible(mut self) -> Self {
        self.corruption_possible = true;
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn is_valid(&self) -> bool {
        self.mode == ValidationMode::Valid
    }

    pub fn is_invalid(&self) -> bool {
        self.mode == ValidationMode::Invalid
    }

    pub fn is_error(&self) -> bool {
        self.mode == ValidationMode::Error
    }

    /// DoS score if the result is invalid.
    pub fn invalid_dos(&self) -> Option<u32> {
        self.is_invalid().then_some(self.dos_score)
    }

    pub fn dos_score(&self) -> u32 {
        self.dos_score
    }

    pub fn reject_reason(&self) -> &str {
        &self.reject_reason
    }

    pub fn corruption_possible(&self) -> bool {
        self.corruption_possible
    }
}
