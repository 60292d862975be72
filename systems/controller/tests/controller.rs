use std::time::Duration;

use snake_core::{AppleCount, Direction, GameOptions, MapSize, Outcome, Speed, Viewport};
use snake_system_controller::{Game, GameListener, GameSummary, HighScoreStore, MemoryHighScore};
use snake_system_motion::HeadMood;
use snake_system_scheduler::Phase;
use snake_world::query;

#[derive(Debug, Default)]
struct Recorder {
    redraws: usize,
    scores: Vec<u32>,
    summaries: Vec<GameSummary>,
}

impl GameListener for Recorder {
    fn redraw(&mut self) {
        self.redraws += 1;
    }

    fn score_changed(&mut self, score: u32) {
        self.scores.push(score);
    }

    fn game_over(&mut self, summary: GameSummary) {
        self.summaries.push(summary);
    }
}

fn options() -> GameOptions {
    GameOptions {
        map_size: MapSize::Normal,
        speed: Speed::Normal,
        apples: AppleCount::One,
    }
}

fn game(best: u32) -> Game<MemoryHighScore, Recorder> {
    Game::new(
        options(),
        Viewport::new(1000, 2000),
        7,
        MemoryHighScore::new(best),
        Recorder::default(),
    )
}

fn tick(game: &mut Game<MemoryHighScore, Recorder>) {
    let _ = game.advance(Duration::from_millis(180));
}

fn run_into_top_wall(game: &mut Game<MemoryHighScore, Recorder>) {
    assert!(game.on_direction_input(Direction::Right));
    tick(game);
    tick(game);
    assert!(game.on_direction_input(Direction::Up));
    for _ in 0..40 {
        if game.is_over() {
            break;
        }
        tick(game);
    }
    assert!(game.is_over(), "snake never reached the wall");
}

#[test]
fn losing_plays_the_recoil_then_stops() {
    let mut game = game(0);
    run_into_top_wall(&mut game);

    assert_eq!(game.outcome(), Some(Outcome::Lost));
    assert_eq!(game.phase(), Phase::Recoil { frame: 5 });
    assert_eq!(game.fraction(), 1.0);
    let frame = game.render_snapshot(game.fraction());
    assert_eq!(frame.snake.head.mood, HeadMood::KnockedOut);
    assert_eq!(frame.outcome, Some(Outcome::Lost));

    assert_eq!(game.advance(Duration::from_millis(180)), 5);
    assert_eq!(game.phase(), Phase::Stopped);
    assert_eq!(game.fraction(), 0.0);
    assert_eq!(game.advance(Duration::from_millis(1000)), 0);
}

#[test]
fn beating_the_best_score_is_saved_once() {
    let mut game = game(0);
    run_into_top_wall(&mut game);

    let score = game.current_score();
    assert!(score >= 1);
    assert_eq!(game.store().high_score(), score);

    let listener = game.listener();
    assert_eq!(listener.summaries.len(), 1);
    let summary = listener.summaries[0];
    assert_eq!(summary.outcome, Outcome::Lost);
    assert!(summary.new_high_score);
    assert_eq!(summary.high_score, score);
    assert_eq!(listener.scores.first(), Some(&0));
    assert_eq!(listener.scores.last(), Some(&score));

    game.on_game_over(Outcome::Won);
    assert_eq!(game.outcome(), Some(Outcome::Lost));
    assert_eq!(game.listener().summaries.len(), 1);
}

#[test]
fn lower_scores_leave_the_best_alone() {
    let mut game = game(1_000);
    run_into_top_wall(&mut game);

    assert_eq!(game.high_score(), 1_000);
    assert!(!game.listener().summaries[0].new_high_score);
}

#[test]
fn input_after_game_over_is_ignored_until_restart() {
    let mut game = game(0);
    run_into_top_wall(&mut game);
    let ticks = query::tick_index(game.world());

    assert!(!game.on_direction_input(Direction::Left));
    let _ = game.advance(Duration::from_secs(2));
    assert_eq!(query::tick_index(game.world()), ticks);

    game.restart();
    assert!(!game.is_over());
    assert_eq!(game.current_score(), 0);
    assert_eq!(game.high_score(), game.store().high_score());
    assert!(game.on_direction_input(Direction::Down));
    assert_eq!(game.phase(), Phase::Forward { frame: 0 });
}

#[test]
fn every_frame_requests_a_redraw() {
    let mut game = game(0);
    let before = game.listener().redraws;

    assert!(game.on_direction_input(Direction::Right));
    assert_eq!(game.advance(Duration::from_millis(360)), 10);

    assert_eq!(game.listener().redraws - before, 10);
    assert_eq!(query::tick_index(game.world()), 2);
}

#[test]
fn new_game_applies_new_options() {
    let mut game = game(0);
    game.new_game(
        GameOptions {
            map_size: MapSize::Large,
            speed: Speed::Fast,
            apples: AppleCount::Five,
        },
        Viewport::new(480, 800),
    );

    assert_eq!(game.frame_interval(), Duration::from_millis(35));
    assert_eq!(game.render_snapshot(0.0).apples.len(), 5);
    assert_eq!(game.options().speed, Speed::Fast);
}
