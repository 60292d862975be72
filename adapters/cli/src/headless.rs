//! Scripted sessions without a window, printed as ASCII boards.

use std::{fmt::Write as _, time::Duration};

use anyhow::{bail, Result};
use snake_core::{CellCoord, Direction, Outcome};
use snake_system_controller::{Game, GameListener, HighScoreStore};
use snake_system_scheduler::Phase;
use snake_world::query;
use tracing::debug;

use crate::pacing::Pacer;

/// Input for a single move of a scripted session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Let the snake keep its heading.
    Wait,
    /// Press a direction before the move plays.
    Press(Direction),
}

/// Parses a script such as `"R..U.L"`: one character per move, `.` waits.
///
/// Whitespace is ignored so long scripts can be wrapped.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Step>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(index, c)| match c {
            '.' => Ok(Step::Wait),
            _ => match c.to_string().parse::<Direction>() {
                Ok(direction) => Ok(Step::Press(direction)),
                Err(error) => bail!("script step {}: {error}", index + 1),
            },
        })
        .collect()
}

/// How frames are fired during a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pace {
    /// As fast as possible.
    Immediate,
    /// At the game's real frame rate.
    RealTime,
}

/// Result of a scripted session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Report {
    /// Moves that ticked the world.
    pub(crate) ticks: u64,
    /// Apples eaten.
    pub(crate) score: u32,
    /// Best score after the session.
    pub(crate) high_score: u32,
    /// Terminal result, if the game ended.
    pub(crate) outcome: Option<Outcome>,
    /// Final board.
    pub(crate) board: String,
}

impl Report {
    pub(crate) fn summary(&self) -> String {
        let outcome = self
            .outcome
            .map_or_else(|| "running".to_owned(), |outcome| outcome.to_string());
        format!(
            "ticks: {}  score: {}  best: {}  outcome: {outcome}",
            self.ticks, self.score, self.high_score
        )
    }
}

/// Plays `steps` followed by `extra_moves` waits, stopping early when the game ends.
pub(crate) fn run<S, L>(
    game: &mut Game<S, L>,
    steps: &[Step],
    extra_moves: usize,
    pace: Pace,
) -> Report
where
    S: HighScoreStore,
    L: GameListener,
{
    let mut pacer = match pace {
        Pace::Immediate => None,
        Pace::RealTime => Some(Pacer::start(game.frame_interval())),
    };
    let moves = steps
        .iter()
        .copied()
        .chain(std::iter::repeat(Step::Wait).take(extra_moves));

    for step in moves {
        if game.is_over() {
            break;
        }
        if let Step::Press(direction) = step {
            let accepted = game.on_direction_input(direction);
            debug!(?direction, accepted, "scripted input");
        }
        play_move(game, pacer.as_ref());
    }

    // Let a recoil finish so the board shows the snake where it stopped.
    while matches!(game.phase(), Phase::Recoil { .. }) {
        play_frames(game, pacer.as_ref(), 1);
    }
    if let Some(pacer) = pacer.as_mut() {
        pacer.stop();
    }

    Report {
        ticks: query::tick_index(game.world()),
        score: game.current_score(),
        high_score: game.high_score(),
        outcome: game.outcome(),
        board: render_board(game),
    }
}

fn play_move<S, L>(game: &mut Game<S, L>, pacer: Option<&Pacer>)
where
    S: HighScoreStore,
    L: GameListener,
{
    let frames = game.frames_per_move();
    play_frames(game, pacer, frames);
}

fn play_frames<S, L>(game: &mut Game<S, L>, pacer: Option<&Pacer>, frames: u32)
where
    S: HighScoreStore,
    L: GameListener,
{
    match pacer {
        None => {
            for _ in 0..frames {
                game.on_frame();
            }
        }
        Some(pacer) => {
            let mut fired = 0;
            while fired < frames
                && matches!(game.phase(), Phase::Forward { .. } | Phase::Recoil { .. })
            {
                match pacer.next_pulse(Duration::from_secs(1)) {
                    Some(elapsed) => fired += advance_capped(game, elapsed, frames - fired),
                    None => break,
                }
            }
        }
    }
}

/// Feeds `elapsed` to the game without firing more than `remaining` frames.
///
/// Time beyond the cap is dropped; the clock keeps its partial frame.
fn advance_capped<S, L>(game: &mut Game<S, L>, elapsed: Duration, remaining: u32) -> u32
where
    S: HighScoreStore,
    L: GameListener,
{
    let budget = game.frame_interval().saturating_mul(remaining);
    game.advance(elapsed.min(budget))
}

/// Draws the board: `#` border, `@` head, `o` body, `*` apples, `.` empty.
pub(crate) fn render_board<S, L>(game: &Game<S, L>) -> String
where
    S: HighScoreStore,
    L: GameListener,
{
    let world = game.world();
    let geometry = query::geometry(world);
    let head = query::head(world);
    let body = &query::body(world)[..query::snake_length(world)];
    let apples: Vec<CellCoord> = query::apple_view(world)
        .iter()
        .map(|apple| apple.cell)
        .collect();

    let mut board = String::new();
    for row in 0..geometry.rows() as i32 {
        for column in 0..geometry.columns() as i32 {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == head {
                '@'
            } else if body.contains(&cell) {
                'o'
            } else if apples.contains(&cell) {
                '*'
            } else if geometry.is_playable(cell) {
                '.'
            } else {
                '#'
            };
            board.push(glyph);
        }
        let _ = writeln!(board);
    }
    board
}
