//! Platform abstraction layer
//!
//! Keeps browser details out of the simulation:
//! - Input: physical keys to intents
//! - Time: frame timestamps to clock units

pub mod input;
pub mod time;

pub use input::{KeyBindings, KeyPhase};
pub use time::FrameClock;
