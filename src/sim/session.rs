//! Game session state machine
//!
//! `GameSession` owns the player, the cones, the score and the clock. All
//! mutation happens through intents (`on_move_start`, `on_jump`, ...) and timer
//! ticks (`on_tick`), one at a time. Renderers only ever see a `Snapshot`.
//!
//! Lifecycle: `NotStarted -> Running -> GameOver`. Game over is terminal and
//! cancels every outstanding timer; a new run needs a new session.

use super::clock::{Scheduler, TickKind, TimerHandle};
use super::score::ScoreKeeper;
use super::spawn::{Advance, SpawnController};
use super::state::{GameEvent, GameStatus, Intent, Obstacle, ObstacleView, Player, Snapshot};
use crate::error::SimError;
use crate::settings::Settings;

/// Handles for timers that intents can cancel.
/// Score and spawn timers run until `end` clears the clock.
#[derive(Debug, Clone, Default)]
struct SessionTimers {
    movement: Option<TimerHandle>,
    landing: Option<TimerHandle>,
}

/// One play-through
#[derive(Debug, Clone)]
pub struct GameSession {
    settings: Settings,
    status: GameStatus,
    score: ScoreKeeper,
    player: Player,
    spawner: SpawnController,
    clock: Scheduler,
    timers: SessionTimers,
    /// Pending events for the host (drained each frame)
    events: Vec<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl GameSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            player: Player::new(&settings.geometry),
            spawner: SpawnController::new(&settings.geometry, &settings.timing),
            settings,
            status: GameStatus::NotStarted,
            score: ScoreKeeper::new(),
            clock: Scheduler::new(),
            timers: SessionTimers::default(),
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.spawner.obstacles()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current clock time
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Whether held movement is active
    pub fn is_moving(&self) -> bool {
        self.timers.movement.is_some()
    }

    /// Number of outstanding timers
    pub fn pending_timers(&self) -> usize {
        self.clock.pending()
    }

    /// Begin the run: start score accrual and cone spawning
    pub fn start(&mut self) {
        if self.status != GameStatus::NotStarted {
            log::debug!("start() ignored in {:?}", self.status);
            return;
        }

        let timing = &self.settings.timing;
        self.clock.schedule_every(timing.score_interval, TickKind::Score);
        self.clock
            .schedule_every(timing.spawn_interval, TickKind::SpawnObstacle);
        self.status = GameStatus::Running;
        self.events.push(GameEvent::Started);
        log::info!("Run started at t={}", self.clock.now());
    }

    /// Route a bound input to its handler
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::MoveStart => self.on_move_start(),
            Intent::MoveStop => self.on_move_stop(),
            Intent::Jump => self.on_jump(),
        }
    }

    /// Start held movement. Repeats are ignored while already moving.
    pub fn on_move_start(&mut self) {
        if !self.is_running() || self.timers.movement.is_some() {
            return;
        }
        self.timers.movement = Some(
            self.clock
                .schedule_every(self.settings.timing.move_interval, TickKind::MovePlayer),
        );
    }

    pub fn on_move_stop(&mut self) {
        if let Some(timer) = self.timers.movement.take() {
            self.clock.cancel(timer);
        }
    }

    /// Jump, unless already in the air
    pub fn on_jump(&mut self) {
        if !self.is_running() || self.player.jumping {
            return;
        }

        let jump = &self.settings.jump;
        self.player.jumping = true;
        self.player.pos.y += jump.height;
        self.player.pos.x += jump.distance;
        self.timers.landing = Some(
            self.clock
                .schedule_once(self.settings.timing.jump_duration, TickKind::JumpReversal),
        );
        self.events.push(GameEvent::Jumped);
        log::debug!("Jump at t={} x={}", self.clock.now(), self.player.pos.x);
    }

    /// Handle a timer tick. Ticks outside `Running` are ignored.
    pub fn on_tick(&mut self, kind: TickKind) {
        if !self.is_running() {
            log::trace!("{:?} ignored in {:?}", kind, self.status);
            return;
        }
        log::trace!("t={} {:?}", self.clock.now(), kind);

        match kind {
            TickKind::Score => {
                let score = self.score.award();
                self.events.push(GameEvent::ScoreChanged { score });
            }
            TickKind::SpawnObstacle => {
                let id = self.spawner.spawn(&mut self.clock);
                self.events.push(GameEvent::ObstacleSpawned { id });
            }
            TickKind::AdvanceObstacle(id) => match self.spawner.advance(id, &mut self.clock) {
                Advance::Moved => {
                    self.check_collisions();
                }
                Advance::Retired => self.events.push(GameEvent::ObstacleRetired { id }),
                Advance::Missing => {}
            },
            TickKind::JumpReversal => self.land(),
            TickKind::MovePlayer => {
                self.player.pos.x += self.player.speed;
                self.check_collisions();
            }
        }
    }

    /// Handle a tick delivered by an external clock as a raw tag
    ///
    /// Unknown tags, and advance ticks for cones that are gone, are rejected
    /// without touching the session.
    pub fn on_raw_tick(&mut self, tag: u8, obstacle_id: u32) -> Result<(), SimError> {
        let kind = TickKind::from_tag(tag, obstacle_id)?;
        if let TickKind::AdvanceObstacle(id) = kind {
            if self.is_running() && self.spawner.get(id).is_none() {
                return Err(SimError::UnknownObstacle(id));
            }
        }
        self.on_tick(kind);
        Ok(())
    }

    /// Test the player against every live cone; end the run on a grounded hit.
    ///
    /// Returns true if this call ended the run.
    pub fn check_collisions(&mut self) -> bool {
        if !self.is_running() || self.player.jumping {
            return false;
        }

        match self.spawner.first_overlapping(self.player.bounds()) {
            Some(id) => {
                log::info!("Hit cone {} at t={}", id, self.clock.now());
                self.spawner.retire(id, &mut self.clock);
                self.end();
                true
            }
            None => false,
        }
    }

    /// End the run. Cancels all timers and queues the game-over notification.
    pub fn end(&mut self) {
        if !self.is_running() {
            return;
        }

        self.status = GameStatus::GameOver;
        self.clock.cancel_all();
        self.spawner.freeze();
        self.timers = SessionTimers::default();

        let final_score = self.score.score();
        self.events.push(GameEvent::GameOver { final_score });
        log::info!("Game over at t={} with score {}", self.clock.now(), final_score);
    }

    /// Run the clock forward by `dt` units, firing every timer that comes due
    pub fn advance(&mut self, dt: u64) {
        let target = self.clock.now().saturating_add(dt);
        while self.is_running() {
            let Some(kind) = self.clock.pop_due(target) else {
                break;
            };
            self.on_tick(kind);
        }
        self.clock.settle(target);
    }

    /// Read-only copy of everything a renderer draws
    pub fn snapshot(&self) -> Snapshot {
        let field_width = self.spawner.field_width();
        Snapshot {
            status: self.status,
            score: self.score.score(),
            time: self.clock.now(),
            field_width,
            player_pos: self.player.pos,
            player_bounds: self.player.bounds(),
            jumping: self.player.jumping,
            obstacles: self
                .spawner
                .obstacles()
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    right_offset: o.right_offset,
                    bounds: o.bounds(field_width),
                })
                .collect(),
        }
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn land(&mut self) {
        if let Some(timer) = self.timers.landing.take() {
            self.clock.cancel(timer);
        }
        if !self.player.jumping {
            return;
        }

        let jump = &self.settings.jump;
        self.player.pos.y -= jump.height;
        if !jump.drift {
            self.player.pos.x -= jump.distance;
        }
        self.player.jumping = false;
        self.events.push(GameEvent::Landed);
        self.check_collisions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Field so narrow that a fresh cone sits on the player's starting spot
    fn cramped_settings() -> Settings {
        let mut settings = Settings::default();
        settings.geometry.field_width = 120.0;
        settings.timing.spawn_interval = 100;
        settings
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut session = GameSession::default();
        assert_eq!(session.status(), GameStatus::NotStarted);

        session.start();
        assert_eq!(session.status(), GameStatus::Running);
        let timers = session.pending_timers();

        session.start();
        assert_eq!(session.status(), GameStatus::Running);
        assert_eq!(session.pending_timers(), timers);
        assert_eq!(
            session
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::Started)
                .count(),
            1
        );
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let mut session = GameSession::default();
        session.on_jump();
        session.on_move_start();
        session.on_tick(TickKind::Score);
        session.on_tick(TickKind::SpawnObstacle);
        session.advance(10_000);

        assert_eq!(session.status(), GameStatus::NotStarted);
        assert_eq!(session.score(), 0);
        assert!(session.obstacles().is_empty());
        assert!(!session.player().jumping);
        assert_eq!(session.player().pos.x, 50.0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_first_spawn_after_three_seconds() {
        let mut session = GameSession::default();
        session.start();

        session.advance(2999);
        assert!(session.obstacles().is_empty());
        session.advance(1);
        assert_eq!(session.obstacles().len(), 1);
        assert_eq!(session.obstacles()[0].right_offset, 0.0);
    }

    #[test]
    fn test_score_after_one_second() {
        let mut session = GameSession::default();
        session.start();
        session.advance(999);
        assert_eq!(session.score(), 0);
        session.advance(1);
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn test_score_tick_adds_ten() {
        let mut session = GameSession::default();
        session.start();
        session.on_tick(TickKind::Score);
        session.on_tick(TickKind::Score);
        assert_eq!(session.score(), 20);
        assert_eq!(
            session.drain_events().last(),
            Some(&GameEvent::ScoreChanged { score: 20 })
        );
    }

    #[test]
    fn test_one_obstacle_per_spawn_tick() {
        let mut session = GameSession::default();
        session.on_tick(TickKind::SpawnObstacle);
        assert_eq!(session.obstacles().len(), 0);

        session.start();
        session.on_tick(TickKind::SpawnObstacle);
        assert_eq!(session.obstacles().len(), 1);
        session.on_tick(TickKind::SpawnObstacle);
        assert_eq!(session.obstacles().len(), 2);

        session.end();
        session.on_tick(TickKind::SpawnObstacle);
        assert_eq!(session.obstacles().len(), 2);
    }

    #[test]
    fn test_jump_duration_ignores_repeat_jumps() {
        let mut session = GameSession::default();
        session.start();

        session.on_jump();
        assert!(session.player().jumping);
        assert_eq!(session.player().pos.y, 150.0);
        assert_eq!(session.player().pos.x, 80.0);

        session.advance(300);
        session.on_jump();
        assert_eq!(session.player().pos.y, 150.0);
        assert_eq!(session.player().pos.x, 80.0);

        session.advance(299);
        assert!(session.player().jumping);
        session.advance(1);
        assert!(!session.player().jumping);
        assert_eq!(session.player().pos.y, 0.0);
        assert_eq!(session.now(), 600);
    }

    #[test]
    fn test_jump_drift_is_kept_by_default() {
        let mut session = GameSession::default();
        session.start();
        for _ in 0..3 {
            session.on_jump();
            session.advance(600);
        }
        // Each landing keeps the forward hop
        assert_eq!(session.player().pos.x, 50.0 + 3.0 * 30.0);
        assert_eq!(session.player().pos.y, 0.0);
    }

    #[test]
    fn test_jump_without_drift_returns_to_start() {
        let mut settings = Settings::default();
        settings.jump.drift = false;
        let mut session = GameSession::new(settings);
        session.start();

        session.on_jump();
        assert_eq!(session.player().pos.x, 80.0);
        session.advance(600);
        assert_eq!(session.player().pos.x, 50.0);
    }

    #[test]
    fn test_held_movement() {
        let mut session = GameSession::default();
        session.start();

        session.on_move_start();
        session.on_move_start();
        session.advance(350);
        // One movement timer despite the repeated press: 3 steps of 10
        assert_eq!(session.player().pos.x, 80.0);

        session.on_move_stop();
        assert!(!session.is_moving());
        session.advance(1000);
        assert_eq!(session.player().pos.x, 80.0);
    }

    #[test]
    fn test_apply_intents() {
        let mut session = GameSession::default();
        session.start();
        session.apply(Intent::Jump);
        assert!(session.player().jumping);
        session.apply(Intent::MoveStart);
        session.advance(100);
        assert_eq!(session.player().pos.x, 90.0);
        session.apply(Intent::MoveStop);
        session.advance(100);
        assert_eq!(session.player().pos.x, 90.0);
    }

    #[test]
    fn test_jumping_over_a_cone() {
        let mut session = GameSession::new(cramped_settings());
        session.start();
        session.on_jump();

        // Cone spawns where the car stood before jumping
        session.advance(100);
        assert_eq!(session.obstacles().len(), 1);
        let start_bounds = Player::new(&session.settings().geometry).bounds();
        let cone = session.obstacles()[0].bounds(120.0);
        assert!(crate::sim::rects_overlap(start_bounds, cone));

        session.advance(499);
        assert!(session.player().jumping);
        assert_eq!(session.status(), GameStatus::Running);
    }

    #[test]
    fn test_landing_on_a_cone() {
        let mut session = GameSession::new(cramped_settings());
        session.start();
        session.on_jump();

        // Cones keep rolling in under the airborne car
        session.advance(599);
        assert_eq!(session.status(), GameStatus::Running);
        assert!(session.player().jumping);

        let landing_spot = crate::sim::Rect::from_ground(
            glam::Vec2::new(session.player().pos.x, 0.0),
            session.player().size,
        );
        let under: Vec<u32> = session
            .obstacles()
            .iter()
            .filter(|o| crate::sim::rects_overlap(landing_spot, o.bounds(120.0)))
            .map(|o| o.id)
            .collect();
        assert!(!under.is_empty());
        let live_before = session.obstacles().len();

        // The landing tick is the first thing due at t=600 and finds a cone
        session.advance(1);
        assert_eq!(session.now(), 600);
        assert_eq!(session.status(), GameStatus::GameOver);
        assert!(!session.player().jumping);
        assert_eq!(session.obstacles().len(), live_before - 1);
        assert!(session.obstacles().iter().all(|o| o.id != under[0]));
        assert_eq!(session.pending_timers(), 0);

        let events = session.drain_events();
        let landed = events.iter().position(|e| *e == GameEvent::Landed);
        let over = events
            .iter()
            .position(|e| matches!(e, GameEvent::GameOver { .. }));
        assert!(landed.is_some() && landed < over);
    }

    #[test]
    fn test_grounded_hit_ends_run() {
        let mut session = GameSession::new(cramped_settings());
        session.start();
        session.advance(100);
        assert_eq!(session.obstacles().len(), 1);

        // First advance step checks collisions
        session.advance(50);
        assert_eq!(session.status(), GameStatus::GameOver);
        assert!(session.obstacles().is_empty());
        assert_eq!(session.pending_timers(), 0);
        assert_eq!(
            session.drain_events().last(),
            Some(&GameEvent::GameOver { final_score: 0 })
        );
    }

    #[test]
    fn test_driving_into_a_cone() {
        let mut session = GameSession::default();
        session.start();
        session.advance(3000);
        assert_eq!(session.obstacles().len(), 1);

        // Hold right until the car meets the approaching cone
        session.on_move_start();
        session.advance(5000);
        assert_eq!(session.status(), GameStatus::GameOver);
        // Earlier than a parked car would have been hit
        assert!(session.score() < 60);
    }

    #[test]
    fn test_collision_run_ends_and_score_freezes() {
        let mut session = GameSession::default();
        session.start();
        session.advance(20_000);

        assert_eq!(session.status(), GameStatus::GameOver);
        // First cone spawns at 3000 and reaches the car after 67 steps
        assert_eq!(session.now(), 20_000);
        assert_eq!(session.score(), 60);
        assert_eq!(session.pending_timers(), 0);

        // The cone spawned at 6000 stays frozen where it was
        assert_eq!(session.obstacles().len(), 1);
        let frozen = session.obstacles()[0].right_offset;
        assert!(session.obstacles()[0].timer.is_none());

        session.on_tick(TickKind::Score);
        session.advance(5000);
        assert_eq!(session.score(), 60);
        assert_eq!(session.obstacles()[0].right_offset, frozen);

        let events = session.drain_events();
        assert_eq!(
            events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
            1
        );
        assert_eq!(events.last(), Some(&GameEvent::GameOver { final_score: 60 }));
    }

    #[test]
    fn test_game_over_is_absorbing() {
        let mut session = GameSession::default();
        session.start();
        session.advance(2000);
        session.end();
        assert_eq!(session.status(), GameStatus::GameOver);

        session.start();
        session.on_jump();
        session.on_move_start();
        session.on_tick(TickKind::Score);
        session.end();

        assert_eq!(session.status(), GameStatus::GameOver);
        assert_eq!(session.score(), 20);
        assert!(!session.player().jumping);
        assert_eq!(session.pending_timers(), 0);
    }

    #[test]
    fn test_end_cancels_obstacle_timers() {
        let mut session = GameSession::default();
        session.start();
        session.on_move_start();
        session.on_jump();
        session.on_tick(TickKind::SpawnObstacle);
        session.on_tick(TickKind::SpawnObstacle);
        assert!(session.pending_timers() >= 6);

        session.end();
        assert_eq!(session.pending_timers(), 0);
    }

    #[test]
    fn test_end_before_start_is_noop() {
        let mut session = GameSession::default();
        session.end();
        assert_eq!(session.status(), GameStatus::NotStarted);
    }

    #[test]
    fn test_obstacle_retired_once() {
        let mut session = GameSession::default();
        session.start();
        session.on_tick(TickKind::SpawnObstacle);
        let id = session.obstacles()[0].id;

        // Car parked beyond the field, cone driven off by direct ticks
        session.player.pos.x = 2000.0;
        for _ in 0..81 {
            session.on_tick(TickKind::AdvanceObstacle(id));
        }
        assert!(session.obstacles().is_empty());
        assert_eq!(session.status(), GameStatus::Running);

        // Late ticks for the same cone do nothing
        session.on_tick(TickKind::AdvanceObstacle(id));
        assert_eq!(session.on_raw_tick(2, id), Err(SimError::UnknownObstacle(id)));
        assert_eq!(session.status(), GameStatus::Running);

        let retired = session
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::ObstacleRetired { id })
            .count();
        assert_eq!(retired, 1);
    }

    #[test]
    fn test_raw_ticks() {
        let mut session = GameSession::default();
        session.start();
        assert_eq!(session.on_raw_tick(0, 0), Ok(()));
        assert_eq!(session.score(), 10);
        assert_eq!(session.on_raw_tick(99, 0), Err(SimError::UnknownTickTag(99)));
        assert_eq!(session.score(), 10);
        assert_eq!(session.on_raw_tick(1, 0), Ok(()));
        assert_eq!(session.obstacles().len(), 1);
    }

    #[test]
    fn test_snapshot() {
        let mut session = GameSession::default();
        session.start();
        session.advance(3050);
        session.on_jump();

        let snap = session.snapshot();
        assert_eq!(snap.status, GameStatus::Running);
        assert_eq!(snap.score, 30);
        assert_eq!(snap.time, 3050);
        assert!(snap.jumping);
        assert_eq!(snap.player_pos.y, 150.0);
        assert_eq!(snap.obstacles.len(), 1);
        assert_eq!(snap.obstacles[0].right_offset, 10.0);
        assert_eq!(snap.obstacles[0].bounds.left, 770.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Intent(Intent),
        Tick(TickKind),
        Advance(u64),
        End,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Start),
            Just(Op::Intent(Intent::MoveStart)),
            Just(Op::Intent(Intent::MoveStop)),
            Just(Op::Intent(Intent::Jump)),
            Just(Op::Tick(TickKind::Score)),
            Just(Op::Tick(TickKind::SpawnObstacle)),
            Just(Op::Tick(TickKind::JumpReversal)),
            Just(Op::End),
            (0u64..4000).prop_map(Op::Advance),
        ]
    }

    proptest! {
        #[test]
        fn status_and_score_only_move_forward(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut session = GameSession::default();
            let mut status = session.status();
            let mut score = session.score();

            for op in ops {
                let was_running = session.is_running();
                match op {
                    Op::Start => session.start(),
                    Op::Intent(intent) => session.apply(intent),
                    Op::Tick(kind) => session.on_tick(kind),
                    Op::Advance(dt) => session.advance(dt),
                    Op::End => session.end(),
                }

                prop_assert!(session.status() >= status);
                prop_assert!(session.score() >= score);
                prop_assert_eq!(session.score() % 10, 0);
                if !was_running {
                    prop_assert_eq!(session.score(), score);
                }
                if status == GameStatus::GameOver {
                    prop_assert_eq!(session.pending_timers(), 0);
                }
                prop_assert!(session.obstacles().iter().all(|o| o.alive));

                status = session.status();
                score = session.score();
            }
        }
    }
}
