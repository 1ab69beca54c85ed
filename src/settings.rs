//! Game settings and tuning
//!
//! Read as JSON from LocalStorage on the web; from a file natively.
//! Every section uses `#[serde(default)]` so partial documents are accepted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::platform::KeyBindings;

/// Timer intervals, in clock units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub score_interval: u64,
    pub spawn_interval: u64,
    pub obstacle_step_interval: u64,
    pub jump_duration: u64,
    pub move_interval: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            score_interval: SCORE_INTERVAL,
            spawn_interval: SPAWN_INTERVAL,
            obstacle_step_interval: OBSTACLE_STEP_INTERVAL,
            jump_duration: JUMP_DURATION,
            move_interval: MOVE_INTERVAL,
        }
    }
}

/// Field and entity dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub field_width: f32,
    pub player_start_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_step: f32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            player_start_x: PLAYER_START_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_step: OBSTACLE_STEP,
        }
    }
}

/// Jump displacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    pub height: f32,
    pub distance: f32,
    /// Keep the forward hop after landing (classic behavior).
    /// When false the landing undoes the `distance` shift.
    pub drift: bool,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            height: JUMP_HEIGHT,
            distance: JUMP_DISTANCE,
            drift: true,
        }
    }
}

/// All game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: Timing,
    pub geometry: Geometry,
    pub jump: JumpTuning,
    pub bindings: KeyBindings,
}

impl Settings {
    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that would stall the clock or never spawn a cone
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        for (name, value) in [
            ("timing.score_interval", t.score_interval),
            ("timing.spawn_interval", t.spawn_interval),
            ("timing.obstacle_step_interval", t.obstacle_step_interval),
            ("timing.jump_duration", t.jump_duration),
            ("timing.move_interval", t.move_interval),
        ] {
            if value == 0 {
                return Err(ConfigError::NotPositive(name));
            }
        }

        let g = &self.geometry;
        for (name, value) in [
            ("geometry.player_width", g.player_width),
            ("geometry.player_height", g.player_height),
            ("geometry.obstacle_width", g.obstacle_width),
            ("geometry.obstacle_height", g.obstacle_height),
            ("geometry.obstacle_step", g.obstacle_step),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive(name));
            }
        }
        if !(g.field_width > g.obstacle_width) {
            return Err(ConfigError::FieldTooNarrow {
                field: g.field_width,
                obstacle: g.obstacle_width,
            });
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cone_hop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
