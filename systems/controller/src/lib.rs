#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game controller that owns a running snake game.
//!
//! The controller routes direction input into the world, lets the scheduler
//! decide when the world ticks, keeps the score, and produces render
//! snapshots for adapters. Everything runs on the caller's thread; adapters
//! feed elapsed time through [`Game::advance`] or fire frames directly with
//! [`Game::on_frame`].

use std::time::Duration;

use glam::Vec2;
use snake_core::{
    AppleSlot, CellCoord, Command, Direction, DirectionRejection, Event, GameOptions,
    GridGeometry, Outcome, Viewport,
};
use snake_system_motion::{interpolate, pulse_phase, Palette, SnakeFrame};
use snake_system_scheduler::{FrameAction, FrameClock, Phase, Scheduler};
use snake_world::{self as world, query, World};
use tracing::{debug, info};

/// Persistent record of the best score.
pub trait HighScoreStore {
    /// Best score recorded so far.
    fn high_score(&self) -> u32;

    /// Records a new best score.
    fn save_high_score(&mut self, score: u32);
}

/// Receives notifications about a running game.
pub trait GameListener {
    /// The game needs to be drawn again.
    fn redraw(&mut self) {}

    /// The score changed.
    fn score_changed(&mut self, _score: u32) {}

    /// The game ended.
    fn game_over(&mut self, _summary: GameSummary) {}
}

impl GameListener for () {}

/// High score kept in memory for the lifetime of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryHighScore {
    best: u32,
}

impl MemoryHighScore {
    /// Creates a store seeded with an existing best score.
    #[must_use]
    pub const fn new(best: u32) -> Self {
        Self { best }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn save_high_score(&mut self, score: u32) {
        self.best = score;
    }
}

/// Final tally reported when a game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    /// Whether the game was won or lost.
    pub outcome: Outcome,
    /// Apples eaten during the game.
    pub score: u32,
    /// Best score after this game was recorded.
    pub high_score: u32,
    /// Whether this game set the best score.
    pub new_high_score: bool,
}

/// Apple placement for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppleSprite {
    /// Slot the apple was seeded into.
    pub slot: AppleSlot,
    /// Cell the apple occupies.
    pub cell: CellCoord,
    /// Cell centre in pixels.
    pub center: Vec2,
    /// Pulse phase in `0.0..1.0`.
    pub pulse: f32,
}

/// Everything an adapter needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    /// Grid layout of the game.
    pub geometry: GridGeometry,
    /// Interpolated snake.
    pub snake: SnakeFrame,
    /// Live apples in slot order.
    pub apples: Vec<AppleSprite>,
    /// Apples eaten so far.
    pub score: u32,
    /// Best score recorded so far.
    pub high_score: u32,
    /// Terminal result, once the game ended.
    pub outcome: Option<Outcome>,
    /// Fraction of the current move the frame was interpolated at.
    pub fraction: f32,
}

/// A snake game together with its timers and collaborators.
#[derive(Debug)]
pub struct Game<S, L = ()> {
    world: World,
    options: GameOptions,
    viewport: Viewport,
    palette: Palette,
    scheduler: Scheduler,
    clock: FrameClock,
    score: u32,
    outcome: Option<Outcome>,
    turned_this_tick: bool,
    paused: bool,
    store: S,
    listener: L,
}

impl<S, L> Game<S, L>
where
    S: HighScoreStore,
    L: GameListener,
{
    /// Lays out a fresh game; apple relocation is driven by `seed`.
    pub fn new(
        options: GameOptions,
        viewport: Viewport,
        seed: u64,
        store: S,
        listener: L,
    ) -> Self {
        let scheduler = Scheduler::new(options.speed.move_time());
        let clock = FrameClock::new(scheduler.cadence().frame_interval());
        let mut game = Self {
            world: World::with_seed(seed),
            options,
            viewport,
            palette: Palette::default(),
            scheduler,
            clock,
            score: 0,
            outcome: None,
            turned_this_tick: false,
            paused: false,
            store,
            listener,
        };
        game.new_game(options, viewport);
        game
    }

    /// Replaces the ribbon colours.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Abandons the current game and lays out a new one.
    pub fn new_game(&mut self, options: GameOptions, viewport: Viewport) {
        let geometry = snake_system_geometry::layout(viewport, options.map_size);
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::NewGame {
                geometry,
                apples: options.apples,
            },
            &mut events,
        );

        self.options = options;
        self.viewport = viewport;
        self.scheduler = Scheduler::new(options.speed.move_time());
        self.clock = FrameClock::new(self.scheduler.cadence().frame_interval());
        self.score = 0;
        self.outcome = None;
        self.turned_this_tick = false;
        self.paused = false;

        info!(
            ?options,
            unit = geometry.unit(),
            cells = geometry.playable_count(),
            high_score = self.store.high_score(),
            "game ready"
        );
        self.listener.score_changed(self.score);
        self.listener.redraw();
    }

    /// Starts over with the options and viewport of the current game.
    pub fn restart(&mut self) {
        self.new_game(self.options, self.viewport);
    }

    /// Handles a direction request from the player.
    ///
    /// The first request that is not a reversal starts an idle game. Once
    /// running, at most one change is accepted per tick.
    pub fn on_direction_input(&mut self, direction: Direction) -> bool {
        if self.outcome.is_some() || self.paused {
            return false;
        }

        match self.scheduler.phase() {
            // Any heading except a reversal starts the game, and a
            // perpendicular one turns the head on the first move.
            Phase::Idle => {
                let current = query::direction(&self.world);
                if direction == current.opposite() {
                    debug!(?direction, "reversal cannot start the game");
                    return false;
                }
                let _ = self.request_turn(direction);
                let _ = self.scheduler.start();
                self.clock.reset();
                info!(?direction, "game started");
                true
            }
            Phase::Forward { .. } => {
                if self.turned_this_tick {
                    debug!(
                        ?direction,
                        reason = ?DirectionRejection::AlreadyTurned,
                        "direction rejected"
                    );
                    return false;
                }
                self.request_turn(direction)
            }
            Phase::Recoil { .. } | Phase::Stopped => false,
        }
    }

    fn request_turn(&mut self, direction: Direction) -> bool {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::ChangeDirection {
                direction,
                requested_at: self.scheduler.fraction(),
            },
            &mut events,
        );
        let accepted = events
            .iter()
            .any(|event| matches!(event, Event::DirectionChanged { .. }));
        self.turned_this_tick |= accepted;
        accepted
    }

    /// Feeds elapsed wall-clock time and fires every frame that became due.
    ///
    /// Returns the number of frames fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.paused || !self.scheduler.is_running() {
            self.clock.reset();
            return 0;
        }
        let frames = self.clock.advance(dt);
        for _ in 0..frames {
            self.on_frame();
        }
        frames
    }

    /// Fires a single frame of the running timer.
    pub fn on_frame(&mut self) {
        match self.scheduler.on_frame() {
            FrameAction::Idle => {}
            FrameAction::Redraw => self.listener.redraw(),
            FrameAction::Tick => {
                self.tick();
                self.listener.redraw();
            }
        }
    }

    fn tick(&mut self) {
        self.turned_this_tick = false;
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);

        for event in events {
            match event {
                Event::AppleEaten { slot, cell } => {
                    self.score += 1;
                    debug!(?slot, ?cell, score = self.score, "apple eaten");
                    self.listener.score_changed(self.score);
                }
                Event::GameOver { outcome } => self.on_game_over(outcome),
                _ => {}
            }
        }
    }

    /// Ends the game, records the high score and plays the closing animation.
    ///
    /// A loss plays the fatal move backwards; a win stops every timer.
    pub fn on_game_over(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);

        let previous_best = self.store.high_score();
        let new_high_score = self.score > previous_best;
        if new_high_score {
            self.store.save_high_score(self.score);
        }

        match outcome {
            Outcome::Lost => self.scheduler.recoil(),
            Outcome::Won => self.scheduler.stop(),
        }

        let summary = GameSummary {
            outcome,
            score: self.score,
            high_score: self.store.high_score(),
            new_high_score,
        };
        info!(%outcome, score = self.score, new_high_score, "game over");
        self.listener.game_over(summary);
    }

    /// Suspends the timers of a running game.
    pub fn pause(&mut self) {
        if self.scheduler.is_running() && !self.paused {
            debug!("paused");
            self.paused = true;
        }
    }

    /// Resumes timers suspended by [`Game::pause`].
    pub fn resume(&mut self) {
        if self.paused {
            debug!("resumed");
            self.paused = false;
            self.clock.reset();
        }
    }

    /// Captures everything needed to draw the game at `fraction` of a move.
    #[must_use]
    pub fn render_snapshot(&self, fraction: f32) -> RenderSnapshot {
        let geometry = query::geometry(&self.world);
        let unit = geometry.unit() as f32;
        let tick_index = query::tick_index(&self.world);
        let apples = query::apple_view(&self.world)
            .iter()
            .map(|apple| AppleSprite {
                slot: apple.slot,
                cell: apple.cell,
                center: Vec2::new(
                    (apple.cell.column() as f32 + 0.5) * unit,
                    (apple.cell.row() as f32 + 0.5) * unit,
                ),
                pulse: pulse_phase(apple.pulse_epoch, tick_index, fraction),
            })
            .collect();

        RenderSnapshot {
            geometry,
            snake: interpolate(&query::snake(&self.world), fraction, unit, &self.palette),
            apples,
            score: self.score,
            high_score: self.store.high_score(),
            outcome: self.outcome,
            fraction,
        }
    }

    /// Fraction of the current move the scheduler is at.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.scheduler.fraction()
    }

    /// Apples eaten in the current game.
    #[must_use]
    pub fn current_score(&self) -> u32 {
        self.score
    }

    /// Best score recorded so far.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.store.high_score()
    }

    /// Reports whether the current game has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Terminal result of the current game, if it ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Reports whether the timers are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Scheduling state of the current game.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Options the current game was laid out with.
    #[must_use]
    pub fn options(&self) -> GameOptions {
        self.options
    }

    /// Frames in a single move; every last one ticks the world.
    #[must_use]
    pub fn frames_per_move(&self) -> u32 {
        self.scheduler.cadence().frames_per_move()
    }

    /// Wall-clock time between two frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.clock.interval()
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the listener.
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Read-only access to the high score store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_core::{AppleCount, MapSize, Speed};

    fn game() -> Game<MemoryHighScore> {
        Game::new(
            GameOptions {
                map_size: MapSize::Normal,
                speed: Speed::Normal,
                apples: AppleCount::One,
            },
            Viewport::new(1000, 2000),
            42,
            MemoryHighScore::default(),
            (),
        )
    }

    fn run_ticks(game: &mut Game<MemoryHighScore>, ticks: u32) {
        let frames = game.scheduler.cadence().frames_per_move();
        for _ in 0..ticks * frames {
            game.on_frame();
        }
    }

    #[test]
    fn reversal_does_not_start_the_game() {
        let mut game = game();

        assert!(!game.on_direction_input(Direction::Left));
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.on_direction_input(Direction::Right));
        assert_eq!(game.phase(), Phase::Forward { frame: 0 });
    }

    #[test]
    fn starting_with_a_turn_rotates_the_head() {
        let mut game = game();

        assert!(game.on_direction_input(Direction::Up));
        assert_eq!(query::direction(game.world()), Direction::Up);
        assert!(!game.on_direction_input(Direction::Left));

        run_ticks(&mut game, 1);
        assert!(game.on_direction_input(Direction::Left));
    }

    #[test]
    fn first_valid_request_per_tick_wins() {
        let mut game = game();
        assert!(game.on_direction_input(Direction::Right));
        game.on_frame();

        assert!(!game.on_direction_input(Direction::Left));
        assert!(game.on_direction_input(Direction::Down));
        assert!(!game.on_direction_input(Direction::Up));
        assert!(!game.on_direction_input(Direction::Right));
        assert_eq!(query::direction(game.world()), Direction::Down);
    }

    #[test]
    fn requests_remember_when_they_arrived() {
        let mut game = game();
        assert!(game.on_direction_input(Direction::Right));
        game.on_frame();
        game.on_frame();

        assert!(game.on_direction_input(Direction::Up));
        let turn = query::snake(game.world())
            .head_turn
            .expect("accepted turn rotates the head");
        assert!((turn.angle(0.4) - 90.0).abs() < 1e-4);
        assert!((turn.angle(0.7) - 45.0).abs() < 1e-4);
    }

    #[test]
    fn eating_scores_a_point() {
        let mut game = game();
        assert!(game.on_direction_input(Direction::Right));

        run_ticks(&mut game, 1);
        assert_eq!(game.current_score(), 0);
        run_ticks(&mut game, 1);
        assert_eq!(game.current_score(), 1);
        assert_eq!(query::snake_length(game.world()), 5);
    }

    #[test]
    fn elapsed_time_is_paced_into_frames() {
        let mut game = game();
        assert_eq!(game.advance(Duration::from_millis(500)), 0);
        assert!(game.on_direction_input(Direction::Right));

        assert_eq!(game.frame_interval(), Duration::from_millis(36));
        assert_eq!(game.advance(Duration::from_millis(180)), 5);
        assert_eq!(query::tick_index(game.world()), 1);

        game.pause();
        assert_eq!(game.advance(Duration::from_millis(720)), 0);
        assert_eq!(query::tick_index(game.world()), 1);
        assert!(!game.on_direction_input(Direction::Up));

        game.resume();
        assert_eq!(game.advance(Duration::from_millis(36)), 1);
    }

    #[test]
    fn restart_keeps_options_and_clears_score() {
        let mut game = game();
        assert!(game.on_direction_input(Direction::Right));
        run_ticks(&mut game, 2);
        assert_eq!(game.current_score(), 1);

        game.restart();

        assert_eq!(game.current_score(), 0);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(query::tick_index(game.world()), 0);
        assert_eq!(game.options().apples, AppleCount::One);
    }

    #[test]
    fn snapshot_places_apples_on_cell_centres() {
        let game = game();
        let snapshot = game.render_snapshot(0.0);

        assert_eq!(snapshot.geometry.unit(), 83);
        assert_eq!(snapshot.apples.len(), 1);
        let apple = snapshot.apples[0];
        assert_eq!(apple.cell, CellCoord::new(7, 12));
        assert_eq!(apple.center, Vec2::new(7.5 * 83.0, 12.5 * 83.0));
        assert_eq!(apple.pulse, 0.0);
        assert_eq!(snapshot.outcome, None);
    }
}
