#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the snake game.
//!
//! The world owns the snake body, the apples, the empty-cell mask and the
//! random source used for relocation. It is mutated exclusively through
//! [`apply`] and observed through the functions in [`query`].

mod apples;
mod occupancy;
mod snake;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_core::{
    AppleCount, Command, Direction, DirectionRejection, Event, GridGeometry, Outcome, Viewport,
};
use tracing::{debug, info};

use crate::{
    apples::{Apples, Relocation},
    occupancy::EmptyCells,
    snake::Snake,
};

const DEFAULT_SEED: u64 = 0x5eed_a991_e5c0_ffee;
const DEFAULT_VIEWPORT: Viewport = Viewport::new(480, 800);
const DEFAULT_UNIT: u32 = 40;

/// Represents the authoritative snake world state.
#[derive(Debug)]
pub struct World {
    geometry: GridGeometry,
    snake: Snake,
    apples: Apples,
    empty: EmptyCells,
    rng: ChaCha8Rng,
    outcome: Option<Outcome>,
    tick_index: u64,
}

impl World {
    /// Creates a world laid out on the default board with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a world on the default board whose apple placement is driven
    /// by the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let geometry = GridGeometry::new(DEFAULT_UNIT, DEFAULT_VIEWPORT);
        let mut world = Self {
            geometry,
            snake: Snake::spawn(&geometry),
            apples: Apples::seed(&geometry, AppleCount::default().amount()),
            empty: EmptyCells::new(geometry),
            rng: ChaCha8Rng::seed_from_u64(seed),
            outcome: None,
            tick_index: 0,
        };
        world.refresh_empty_cells();
        world
    }

    fn reset(&mut self, geometry: GridGeometry, apples: AppleCount) {
        self.geometry = geometry;
        self.snake = Snake::spawn(&geometry);
        self.apples = Apples::seed(&geometry, apples.amount());
        self.empty = EmptyCells::new(geometry);
        self.outcome = None;
        self.tick_index = 0;
        self.refresh_empty_cells();
    }

    fn refresh_empty_cells(&mut self) {
        let occupants = self
            .snake
            .occupied()
            .iter()
            .copied()
            .chain(self.apples.positions());
        self.empty.fill_with(occupants);
    }

    fn change_direction(
        &mut self,
        direction: Direction,
        requested_at: f32,
        out_events: &mut Vec<Event>,
    ) {
        if self.outcome.is_some() {
            out_events.push(Event::DirectionRejected {
                requested: direction,
                reason: DirectionRejection::GameOver,
            });
            return;
        }

        match self.snake.set_direction(direction, requested_at) {
            Ok(from) => {
                debug!(?from, to = ?direction, requested_at, "direction changed");
                out_events.push(Event::DirectionChanged {
                    from,
                    to: direction,
                });
            }
            Err(reason) => {
                debug!(requested = ?direction, ?reason, "direction rejected");
                out_events.push(Event::DirectionRejected {
                    requested: direction,
                    reason,
                });
            }
        }
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        self.tick_index = self.tick_index.saturating_add(1);

        let (from, to) = self.snake.advance();
        out_events.push(Event::SnakeAdvanced { from, to });

        if self.snake.collided(&self.geometry) {
            info!(
                head = ?to,
                length = self.snake.length(),
                tick = self.tick_index,
                "snake collided"
            );
            self.outcome = Some(Outcome::Lost);
            out_events.push(Event::GameOver {
                outcome: Outcome::Lost,
            });
            if let Some((from, to)) = self.snake.fail() {
                out_events.push(Event::DirectionChanged { from, to });
            }
            return;
        }

        self.snake.settle_direction();

        let mut grew = false;
        let mut won = false;
        if let Some(slot) = self.apples.slot_at(to) {
            out_events.push(Event::AppleEaten { slot, cell: to });
            self.refresh_empty_cells();
            match self
                .apples
                .relocate(to, &self.empty, &mut self.rng, self.tick_index)
            {
                Some(Relocation::Moved { slot, to }) => {
                    out_events.push(Event::AppleRelocated { slot, to });
                }
                Some(Relocation::Removed { slot, remaining }) => {
                    info!(?slot, remaining, "board full, apple removed");
                    out_events.push(Event::AppleRemoved { slot });
                    won = remaining == 0;
                }
                None => {}
            }
            self.snake.grow();
            grew = true;
            out_events.push(Event::SnakeGrew {
                length: self.snake.length(),
            });
        }

        self.snake.finish_step(grew);
        self.refresh_empty_cells();

        if won {
            info!(
                length = self.snake.length(),
                tick = self.tick_index,
                "board cleared"
            );
            self.outcome = Some(Outcome::Won);
            out_events.push(Event::GameOver {
                outcome: Outcome::Won,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame { geometry, apples } => {
            world.reset(geometry, apples);
            info!(
                unit = geometry.unit(),
                columns = geometry.playable_columns(),
                rows = geometry.playable_rows(),
                apples = world.apples.len(),
                "new game laid out"
            );
            out_events.push(Event::GameStarted {
                geometry,
                apples: world.apples.len(),
            });
        }
        Command::ChangeDirection {
            direction,
            requested_at,
        } => world.change_direction(direction, requested_at, out_events),
        Command::Tick => world.step(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use snake_core::{AppleView, CellCoord, Direction, GridGeometry, Outcome, SnakeSnapshot};

    /// Grid layout of the current game.
    #[must_use]
    pub fn geometry(world: &World) -> GridGeometry {
        world.geometry
    }

    /// Captures the render-facing description of the snake.
    #[must_use]
    pub fn snake(world: &World) -> SnakeSnapshot {
        world
            .snake
            .snapshot(matches!(world.outcome, Some(Outcome::Lost)))
    }

    /// Captures a read-only view of the live apples.
    #[must_use]
    pub fn apple_view(world: &World) -> AppleView {
        AppleView::from_snapshots(world.apples.snapshots())
    }

    /// Terminal result of the current game, if it ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Number of successful and fatal steps taken since the game started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Visible body segments, head first.
    #[must_use]
    pub fn body(world: &World) -> &[CellCoord] {
        world.snake.segments()
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(world: &World) -> CellCoord {
        world.snake.head()
    }

    /// Number of visible body segments.
    #[must_use]
    pub fn snake_length(world: &World) -> usize {
        world.snake.length()
    }

    /// Number of slots in the body buffer, ghosts included.
    #[must_use]
    pub fn buffer_len(world: &World) -> usize {
        world.snake.buffer_len()
    }

    /// Heading the snake takes on its next step.
    #[must_use]
    pub fn direction(world: &World) -> Direction {
        world.snake.direction()
    }

    /// Playable cells free of snake segments and apples, in row-major order.
    #[must_use]
    pub fn empty_cells(world: &World) -> Vec<CellCoord> {
        world.empty.iter().collect()
    }

    /// Number of playable cells free of snake segments and apples.
    #[must_use]
    pub fn empty_cell_count(world: &World) -> usize {
        world.empty.len()
    }

    /// Reports whether the cell is playable and free.
    #[must_use]
    pub fn is_empty_cell(world: &World, cell: CellCoord) -> bool {
        world.empty.contains(cell)
    }
}
