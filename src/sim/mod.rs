//! Deterministic game logic
//!
//! All gameplay lives here. This module must stay pure and deterministic:
//! - Discrete clock only, driven by the host
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies (settings are plain data)

pub mod clock;
pub mod geometry;
pub mod score;
pub mod session;
pub mod spawn;
pub mod state;

pub use clock::{Scheduler, TickKind, TimerHandle};
pub use geometry::{Rect, rects_overlap};
pub use score::ScoreKeeper;
pub use session::GameSession;
pub use spawn::{Advance, SpawnController};
pub use state::{GameEvent, GameStatus, Intent, Obstacle, ObstacleView, Player, Snapshot};
