//! Key bindings
//!
//! The simulation only understands intents. This maps `KeyboardEvent.key`
//! strings (or any host key names) onto them.

use serde::{Deserialize, Serialize};

use crate::sim::Intent;

/// Whether a key went down or came up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Key names bound to each intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_right: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_right: vec!["ArrowRight".to_string()],
            jump: vec![" ".to_string(), "ArrowUp".to_string()],
        }
    }
}

impl KeyBindings {
    /// Translate a key event. Unbound keys and jump key releases yield nothing.
    pub fn intent_for(&self, key: &str, phase: KeyPhase) -> Option<Intent> {
        if self.move_right.iter().any(|k| k == key) {
            return Some(match phase {
                KeyPhase::Down => Intent::MoveStart,
                KeyPhase::Up => Intent::MoveStop,
            });
        }
        if phase == KeyPhase::Down && self.jump.iter().any(|k| k == key) {
            return Some(Intent::Jump);
        }
        None
    }
}
