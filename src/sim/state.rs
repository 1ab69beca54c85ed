//! Entity model
//!
//! Plain positioned rectangles plus the events and snapshot handed to the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::TimerHandle;
use super::geometry::Rect;
use crate::settings::Geometry;

/// Session lifecycle. Transitions only go forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the start button
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended (terminal)
    GameOver,
}

/// Abstract player input, decoupled from physical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Start held horizontal movement
    MoveStart,
    /// Stop held horizontal movement
    MoveStop,
    /// Jump (edge-triggered)
    Jump,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// x = left edge, y = height above the ground
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal distance per movement step
    pub speed: f32,
    pub jumping: bool,
}

impl Player {
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            pos: Vec2::new(geometry.player_start_x, 0.0),
            size: Vec2::new(geometry.player_width, geometry.player_height),
            speed: geometry.player_speed,
            jumping: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_ground(self.pos, self.size)
    }
}

/// A cone travelling from the right edge of the field toward the left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Distance of the cone's right edge from the field's right edge
    pub right_offset: f32,
    pub size: Vec2,
    pub alive: bool,
    /// This cone's advance timer
    #[serde(skip)]
    pub timer: Option<TimerHandle>,
}

impl Obstacle {
    pub fn new(id: u32, size: Vec2) -> Self {
        Self {
            id,
            right_offset: 0.0,
            size,
            alive: true,
            timer: None,
        }
    }

    /// Left edge in field coordinates
    pub fn left(&self, field_width: f32) -> f32 {
        field_width - self.right_offset - self.size.x
    }

    pub fn bounds(&self, field_width: f32) -> Rect {
        Rect::from_ground(Vec2::new(self.left(field_width), 0.0), self.size)
    }

    /// Whether the cone has travelled past the far (left) boundary
    pub fn past_boundary(&self, field_width: f32) -> bool {
        self.right_offset > field_width
    }
}

/// Something the host may want to react to (sound, HUD, alert)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    ScoreChanged { score: u64 },
    ObstacleSpawned { id: u32 },
    ObstacleRetired { id: u32 },
    Jumped,
    Landed,
    GameOver { final_score: u64 },
}

/// Read-only view of one obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub right_offset: f32,
    pub bounds: Rect,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub score: u64,
    pub time: u64,
    pub field_width: f32,
    pub player_pos: Vec2,
    pub player_bounds: Rect,
    pub jumping: bool,
    /// Sorted by id
    pub obstacles: Vec<ObstacleView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order() {
        assert!(GameStatus::NotStarted < GameStatus::Running);
        assert!(GameStatus::Running < GameStatus::GameOver);
    }

    #[test]
    fn test_obstacle_edges() {
        let mut cone = Obstacle::new(1, Vec2::new(20.0, 40.0));
        assert_eq!(cone.left(800.0), 780.0);
        assert!(!cone.past_boundary(800.0));

        cone.right_offset = 800.0;
        assert_eq!(cone.left(800.0), -20.0);
        assert!(!cone.past_boundary(800.0));

        cone.right_offset = 810.0;
        assert!(cone.past_boundary(800.0));
    }

    #[test]
    fn test_player_bounds() {
        let player = Player::new(&Geometry::default());
        let b = player.bounds();
        assert_eq!(b.left, 50.0);
        assert_eq!(b.right, 110.0);
        assert_eq!(b.bottom, 0.0);
        assert!(!player.jumping);
    }
}
