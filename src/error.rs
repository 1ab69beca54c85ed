//! Error types
//!
//! Gameplay ordering mistakes (double start, jumping mid-air, ticks after the
//! run ended) are no-ops and never show up here. These cover malformed host
//! input and bad configuration only.

use thiserror::Error;

/// Rejected host input to the simulation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown tick tag {0}")]
    UnknownTickTag(u8),
    #[error("no live obstacle with id {0}")]
    UnknownObstacle(u32),
}

/// Settings that could not be loaded or do not make a playable game
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("field width {field} cannot hold an obstacle {obstacle} wide")]
    FieldTooNarrow { field: f32, obstacle: f32 },
}
