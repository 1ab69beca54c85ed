//! Presentation layer
//!
//! Renderers and notifiers only read from the simulation: they get a
//! `Snapshot` each frame and the final score once. Nothing here writes back.

pub mod text;

pub use text::TextRenderer;

use crate::sim::{GameEvent, GameSession, Snapshot};

/// Draws one frame
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot);
}

/// Receives the terminal game-over notification
pub trait Notifier {
    fn game_over(&mut self, final_score: u64);
}

/// Notifier that only logs
#[derive(Debug, Default)]
pub struct LogNotifier {
    pub final_score: Option<u64>,
}

impl Notifier for LogNotifier {
    fn game_over(&mut self, final_score: u64) {
        log::info!("The game is over. Final score: {}", final_score);
        self.final_score = Some(final_score);
    }
}

/// Flush queued events to the notifier and draw the current frame
///
/// Returns the events that were drained so the host can react to the rest.
pub fn present(
    session: &mut GameSession,
    renderer: &mut impl Renderer,
    notifier: &mut impl Notifier,
) -> Vec<GameEvent> {
    let events = session.drain_events();
    for event in &events {
        if let GameEvent::GameOver { final_score } = event {
            notifier.game_over(*final_score);
        }
    }
    renderer.draw(&session.snapshot());
    events
}
