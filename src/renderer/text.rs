//! One-lane text renderer
//!
//! Two rows of cells: the air above the road and the road itself.
//! `C` is the car, `A` a cone.

use super::Renderer;
use crate::sim::{GameStatus, Rect, Snapshot};

const ROAD: char = '_';
const AIR: char = ' ';
const CAR: char = 'C';
const CONE: char = 'A';

#[derive(Debug, Clone)]
pub struct TextRenderer {
    /// Field units per character cell
    cell: f32,
    frame: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(20.0)
    }
}

impl TextRenderer {
    pub fn new(cell: f32) -> Self {
        Self {
            cell: cell.max(1.0),
            frame: String::new(),
        }
    }

    /// Last drawn frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Render a snapshot to a status line plus two rows
    pub fn render(&self, snapshot: &Snapshot) -> String {
        let cols = (snapshot.field_width / self.cell).ceil().max(1.0) as usize;
        let mut air = vec![AIR; cols];
        let mut road = vec![ROAD; cols];

        for cone in &snapshot.obstacles {
            self.paint(&mut road, cone.bounds, CONE);
        }
        let car_row = if snapshot.jumping { &mut air } else { &mut road };
        self.paint(car_row, snapshot.player_bounds, CAR);

        let status = match snapshot.status {
            GameStatus::NotStarted => "READY",
            GameStatus::Running => "RUNNING",
            GameStatus::GameOver => "GAME OVER",
        };

        format!(
            "t={} score={} {}\n{}\n{}",
            snapshot.time,
            snapshot.score,
            status,
            air.iter().collect::<String>(),
            road.iter().collect::<String>()
        )
    }

    fn paint(&self, row: &mut [char], bounds: Rect, glyph: char) {
        let cols = row.len() as i64;
        let start = ((bounds.left / self.cell).floor() as i64).clamp(0, cols);
        let end = ((bounds.right / self.cell).ceil() as i64).clamp(0, cols);
        for cell in &mut row[start as usize..end as usize] {
            *cell = glyph;
        }
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        self.frame = self.render(snapshot);
    }
}
