//! Score accrual

use serde::{Deserialize, Serialize};

use crate::consts::SCORE_INCREMENT;

/// Running score. Only ever goes up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    score: u64,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Credit one score tick, returning the new total
    pub fn award(&mut self) -> u64 {
        self.score = self.score.saturating_add(SCORE_INCREMENT);
        self.score
    }
}
