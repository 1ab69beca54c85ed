//! Cone Hop - drive down the road, jump the cones
//!
//! Core modules:
//! - `sim`: Deterministic game logic (clock, entities, collisions, session state)
//! - `platform`: Key bindings and frame timing for the host
//! - `renderer`: Read-only consumers of simulation snapshots
//! - `settings`: Tunables and key bindings, persisted as JSON

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use settings::Settings;

/// Game configuration constants
///
/// All times are abstract clock units (milliseconds in the browser host).
pub mod consts {
    /// Score accrual interval
    pub const SCORE_INTERVAL: u64 = 1000;
    /// Obstacle spawn interval
    pub const SPAWN_INTERVAL: u64 = 3000;
    /// Per-obstacle advance interval
    pub const OBSTACLE_STEP_INTERVAL: u64 = 50;
    /// Jump duration before the player lands again
    pub const JUMP_DURATION: u64 = 600;
    /// Held-key movement interval
    pub const MOVE_INTERVAL: u64 = 100;

    /// Points per score tick
    pub const SCORE_INCREMENT: u64 = 10;

    /// Play field width (obstacles are retired past this)
    pub const FIELD_WIDTH: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    /// Horizontal distance per movement step
    pub const PLAYER_SPEED: f32 = 10.0;

    /// Jump displacement
    pub const JUMP_HEIGHT: f32 = 150.0;
    pub const JUMP_DISTANCE: f32 = 30.0;

    /// Cone dimensions
    pub const OBSTACLE_WIDTH: f32 = 20.0;
    pub const OBSTACLE_HEIGHT: f32 = 40.0;
    /// Distance a cone travels per advance tick
    pub const OBSTACLE_STEP: f32 = 10.0;
}
