//! Obstacle spawning, advancing and retirement
//!
//! Each cone owns a repeating advance timer. Retiring a cone cancels that
//! timer and drops the cone from the live list in the same step.

use glam::Vec2;

use super::clock::{Scheduler, TickKind};
use super::geometry::{Rect, rects_overlap};
use super::state::Obstacle;
use crate::settings::{Geometry, Timing};

/// Result of advancing one cone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// No live cone with that id (already retired)
    Missing,
    /// Moved one step and still on the field
    Moved,
    /// Moved past the far boundary and was removed
    Retired,
}

/// Owns the live cones (sorted by id)
#[derive(Debug, Clone)]
pub struct SpawnController {
    obstacles: Vec<Obstacle>,
    next_id: u32,
    field_width: f32,
    size: Vec2,
    step: f32,
    step_interval: u64,
}

impl SpawnController {
    pub fn new(geometry: &Geometry, timing: &Timing) -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
            field_width: geometry.field_width,
            size: Vec2::new(geometry.obstacle_width, geometry.obstacle_height),
            step: geometry.obstacle_step,
            step_interval: timing.obstacle_step_interval,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn field_width(&self) -> f32 {
        self.field_width
    }

    /// Place a new cone at the trailing edge and start its advance timer
    pub fn spawn(&mut self, clock: &mut Scheduler) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let mut cone = Obstacle::new(id, self.size);
        cone.timer = Some(clock.schedule_every(self.step_interval, TickKind::AdvanceObstacle(id)));
        self.obstacles.push(cone);

        log::debug!("Spawned cone {} ({} live)", id, self.obstacles.len());
        id
    }

    /// Move cone `id` one step, retiring it once it leaves the field
    pub fn advance(&mut self, id: u32, clock: &mut Scheduler) -> Advance {
        let field_width = self.field_width;
        let Some(cone) = self.obstacles.iter_mut().find(|o| o.id == id && o.alive) else {
            return Advance::Missing;
        };

        cone.right_offset += self.step;
        if cone.past_boundary(field_width) {
            self.retire(id, clock);
            Advance::Retired
        } else {
            Advance::Moved
        }
    }

    /// Remove a cone and cancel its timer. Returns it if it was live.
    pub fn retire(&mut self, id: u32, clock: &mut Scheduler) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        let mut cone = self.obstacles.remove(index);
        cone.alive = false;
        if let Some(timer) = cone.timer.take() {
            clock.cancel(timer);
        }
        log::debug!("Retired cone {}", id);
        Some(cone)
    }

    /// First live cone overlapping `rect`, by id
    pub fn first_overlapping(&self, rect: Rect) -> Option<u32> {
        self.obstacles
            .iter()
            .filter(|o| o.alive)
            .find(|o| rects_overlap(rect, o.bounds(self.field_width)))
            .map(|o| o.id)
    }

    /// Forget every advance timer (the clock has already been cleared)
    pub fn freeze(&mut self) {
        for cone in &mut self.obstacles {
            cone.timer = None;
        }
    }
}
