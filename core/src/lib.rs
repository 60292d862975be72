#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and the game controller
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what changed. Systems consume event streams and immutable
//! snapshots ([`SnakeSnapshot`], [`AppleView`]) and never mutate the world
//! directly.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the snake and the apples for a fresh game.
    NewGame {
        /// Grid layout resolved for the current viewport.
        geometry: GridGeometry,
        /// Number of apples placed on the board.
        apples: AppleCount,
    },
    /// Requests that the snake turn towards the provided direction.
    ///
    /// Each request is only checked against the current heading, so callers
    /// must accept at most one change per tick; two quick turns would
    /// otherwise reverse the snake into its own body.
    ChangeDirection {
        /// Heading the snake should adopt on its next step.
        direction: Direction,
        /// Fraction of the current tick that elapsed when the request arrived.
        requested_at: f32,
    },
    /// Advances the simulation by one discrete step.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new game was laid out.
    GameStarted {
        /// Grid layout used by the game.
        geometry: GridGeometry,
        /// Number of apples placed on the board.
        apples: usize,
    },
    /// Confirms that the snake accepted a new heading.
    DirectionChanged {
        /// Heading before the change.
        from: Direction,
        /// Heading after the change.
        to: Direction,
    },
    /// Reports that a direction change request was rejected.
    DirectionRejected {
        /// Heading that was requested.
        requested: Direction,
        /// Specific reason the request failed.
        reason: DirectionRejection,
    },
    /// Confirms that the snake head moved one cell.
    SnakeAdvanced {
        /// Cell the head occupied before the step.
        from: CellCoord,
        /// Cell the head occupies after the step.
        to: CellCoord,
    },
    /// Reports that the head landed on an apple.
    AppleEaten {
        /// Slot of the apple that was eaten.
        slot: AppleSlot,
        /// Cell where the apple was eaten.
        cell: CellCoord,
    },
    /// Confirms that an eaten apple moved to a new empty cell.
    AppleRelocated {
        /// Slot of the relocated apple.
        slot: AppleSlot,
        /// Cell the apple occupies after relocation.
        to: CellCoord,
    },
    /// Reports that an apple left play because no empty cell remained.
    AppleRemoved {
        /// Slot of the removed apple.
        slot: AppleSlot,
    },
    /// Confirms that the snake gained a segment.
    SnakeGrew {
        /// Visible length after growing.
        length: usize,
    },
    /// Announces that the game reached a terminal state.
    GameOver {
        /// Whether the game was won or lost.
        outcome: Outcome,
    },
}

/// Terminal result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every apple was eaten and the board is full.
    Won,
    /// The snake hit a wall or itself.
    Lost,
}

/// Reasons a direction change request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionRejection {
    /// The requested heading equals the current heading.
    Redundant,
    /// The requested heading would reverse the snake into itself.
    Reversal,
    /// The snake already turned during the current tick.
    AlreadyTurned,
    /// The game has already ended.
    GameOver,
}

/// Cardinal headings available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
}

impl Direction {
    /// Heading that points the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    /// Column and row offsets of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }

    /// Clockwise heading in degrees, where `Up` is zero.
    #[must_use]
    pub const fn heading_degrees(self) -> f32 {
        match self {
            Self::Left => 270.0,
            Self::Up => 0.0,
            Self::Right => 90.0,
            Self::Down => 180.0,
        }
    }

    /// Direction of travel between two cells that share a row or a column.
    ///
    /// Returns `None` when the cells are equal or not axis aligned.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_delta = to.column() - from.column();
        let row_delta = to.row() - from.row();

        match (column_delta.signum(), row_delta.signum()) {
            (1, 0) => Some(Self::Right),
            (-1, 0) => Some(Self::Left),
            (0, 1) => Some(Self::Down),
            (0, -1) => Some(Self::Up),
            _ => None,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that a head stepping into the border can be
/// represented before the collision is detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (column, row) = direction.delta();
        Self {
            column: self.column + column,
            row: self.row + row,
        }
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Pixel dimensions of the surface the board is laid out on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a viewport description from pixel dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the viewport in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the viewport in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Grid layout derived from a viewport and a unit size.
///
/// Column zero and the last whole column are border, as is the last whole
/// row. Everything else within the whole cells is playable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridGeometry {
    unit: u32,
    viewport: Viewport,
}

impl GridGeometry {
    /// Creates a grid layout. A zero unit size is raised to one pixel.
    #[must_use]
    pub const fn new(unit: u32, viewport: Viewport) -> Self {
        let unit = if unit == 0 { 1 } else { unit };
        Self { unit, viewport }
    }

    /// Edge length of a single cell in pixels.
    #[must_use]
    pub const fn unit(&self) -> u32 {
        self.unit
    }

    /// Viewport the grid was laid out for.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of whole columns, border included.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.viewport.width / self.unit
    }

    /// Number of whole rows, border included.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.viewport.height / self.unit
    }

    /// Number of columns the snake may occupy.
    #[must_use]
    pub const fn playable_columns(&self) -> u32 {
        self.columns().saturating_sub(2)
    }

    /// Number of rows the snake may occupy.
    #[must_use]
    pub const fn playable_rows(&self) -> u32 {
        self.rows().saturating_sub(1)
    }

    /// Total number of playable cells.
    #[must_use]
    pub const fn playable_count(&self) -> usize {
        self.playable_columns() as usize * self.playable_rows() as usize
    }

    /// Reports whether the cell lies inside the playable interior.
    #[must_use]
    pub fn is_playable(&self, cell: CellCoord) -> bool {
        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        column >= 1
            && column < i64::from(self.columns()) - 1
            && row >= 0
            && row < i64::from(self.rows()) - 1
    }

    /// Enumerates every playable cell in row-major order.
    pub fn playable_cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.playable_columns();
        let count = self.playable_count();
        (0..count).map(move |index| {
            let columns = columns as usize;
            CellCoord::new((index % columns) as i32 + 1, (index / columns) as i32)
        })
    }

    /// Index of a playable cell within [`GridGeometry::playable_cells`].
    #[must_use]
    pub fn playable_index(&self, cell: CellCoord) -> Option<usize> {
        if !self.is_playable(cell) {
            return None;
        }
        let column = usize::try_from(cell.column() - 1).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        Some(row * self.playable_columns() as usize + column)
    }

    /// Column a third of the way across the viewport.
    #[must_use]
    pub const fn third_column(&self) -> i32 {
        ((self.viewport.width / 3) / self.unit) as i32
    }

    /// Row halfway down the viewport.
    #[must_use]
    pub const fn middle_row(&self) -> i32 {
        ((self.viewport.height / 2) / self.unit) as i32
    }
}

/// Identifier of an apple slot, numbered from one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppleSlot(u8);

impl AppleSlot {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Opaque RGB colour used by the interpolated snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a colour from floating point channels, saturating to `0..=255`.
    #[must_use]
    pub fn from_channels(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red: red.clamp(0.0, 255.0) as u8,
            green: green.clamp(0.0, 255.0) as u8,
            blue: blue.clamp(0.0, 255.0) as u8,
        }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Quarter-turn sweep applied to the head sprite.
///
/// The sweep is a pure function of the tick fraction: progress runs from zero
/// at `start` to one at `end`. A recoil sweep uses `start > end` because the
/// recoil plays the tick backwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadTurn {
    from_degrees: f32,
    to_degrees: f32,
    start: f32,
    end: f32,
}

impl HeadTurn {
    /// Creates a sweep from one heading to another over `start..end`.
    ///
    /// The starting angle is unwrapped so the sweep never exceeds half a turn.
    #[must_use]
    pub fn between(from: Direction, to: Direction, start: f32, end: f32) -> Self {
        let to_degrees = to.heading_degrees();
        let mut from_degrees = from.heading_degrees();
        if to_degrees - from_degrees > 180.0 {
            from_degrees += 360.0;
        } else if from_degrees - to_degrees > 180.0 {
            from_degrees -= 360.0;
        }

        Self {
            from_degrees,
            to_degrees,
            start,
            end,
        }
    }

    /// Angle the sweep starts from, in degrees.
    #[must_use]
    pub const fn from_degrees(&self) -> f32 {
        self.from_degrees
    }

    /// Angle the sweep settles on, in degrees.
    #[must_use]
    pub const fn to_degrees(&self) -> f32 {
        self.to_degrees
    }

    /// Completed share of the sweep at the provided tick fraction.
    #[must_use]
    pub fn progress(&self, fraction: f32) -> f32 {
        let span = self.end - self.start;
        if span.abs() <= f32::EPSILON {
            return 1.0;
        }
        ((fraction - self.start) / span).clamp(0.0, 1.0)
    }

    /// Head angle at the provided tick fraction, in degrees.
    #[must_use]
    pub fn angle(&self, fraction: f32) -> f32 {
        self.from_degrees + (self.to_degrees - self.from_degrees) * self.progress(fraction)
    }
}

/// Immutable description of the snake used for rendering and queries.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakeSnapshot {
    /// Compressed path from the tail to the head.
    pub turn_points: Vec<CellCoord>,
    /// Cell the tail occupied before the last step.
    pub trailing: CellCoord,
    /// Number of visible body segments.
    pub length: usize,
    /// Heading the snake will take on its next step.
    pub direction: Direction,
    /// Whether the snake grew during the last step.
    pub grew: bool,
    /// Head rotation requested during the current tick, if any.
    pub head_turn: Option<HeadTurn>,
    /// Whether the snake collided and the game is lost.
    pub failed: bool,
}

/// Immutable representation of a single apple used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppleSnapshot {
    /// Slot the apple was seeded into.
    pub slot: AppleSlot,
    /// Cell currently occupied by the apple.
    pub cell: CellCoord,
    /// Tick at which the apple's pulse animation last restarted.
    pub pulse_epoch: u64,
}

/// Read-only snapshot describing every live apple.
#[derive(Clone, Debug, Default)]
pub struct AppleView {
    snapshots: Vec<AppleSnapshot>,
}

impl AppleView {
    /// Creates a new apple view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AppleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.slot);
        Self { snapshots }
    }

    /// Iterator over the captured apples in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &AppleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live apples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no apple remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Board density selected for a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapSize {
    /// Roughly 120 playable cells.
    Small,
    /// Roughly 252 playable cells.
    #[default]
    Normal,
    /// Roughly 350 playable cells.
    Large,
}

impl MapSize {
    /// Number of playable cells the layout search aims for.
    #[must_use]
    pub const fn target_cells(self) -> u32 {
        match self {
            Self::Small => 120,
            Self::Normal => 252,
            Self::Large => 350,
        }
    }
}

/// Pace at which the snake steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    /// One step every 220 milliseconds.
    Slow,
    /// One step every 180 milliseconds.
    #[default]
    Normal,
    /// One step every 140 milliseconds.
    Fast,
}

impl Speed {
    /// Duration of a single discrete step.
    #[must_use]
    pub const fn move_time(self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(220),
            Self::Normal => Duration::from_millis(180),
            Self::Fast => Duration::from_millis(140),
        }
    }
}

/// Number of apples in play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppleCount {
    /// A single apple.
    #[default]
    One,
    /// Three apples.
    Three,
    /// Five apples.
    Five,
}

impl AppleCount {
    /// Number of apples seeded at game start.
    #[must_use]
    pub const fn amount(self) -> usize {
        match self {
            Self::One => 1,
            Self::Three => 3,
            Self::Five => 5,
        }
    }
}

/// Option values chosen for a game, resolved into numbers at game start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Board density.
    pub map_size: MapSize,
    /// Step pace.
    pub speed: Speed,
    /// Number of apples.
    pub apples: AppleCount,
}

/// Error raised when a game option fails to parse from text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {option} `{value}` (expected one of: {expected})")]
pub struct ParseOptionError {
    option: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseOptionError {
    fn new(option: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            option,
            value: value.to_owned(),
            expected,
        }
    }
}

impl FromStr for MapSize {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "normal" => Ok(Self::Normal),
            "large" => Ok(Self::Large),
            _ => Err(ParseOptionError::new(
                "map size",
                value,
                "small, normal, large",
            )),
        }
    }
}

impl FromStr for Speed {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "slow" => Ok(Self::Slow),
            "normal" => Ok(Self::Normal),
            "fast" => Ok(Self::Fast),
            _ => Err(ParseOptionError::new("speed", value, "slow, normal, fast")),
        }
    }
}

impl FromStr for AppleCount {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "one" | "1" => Ok(Self::One),
            "three" | "3" => Ok(Self::Three),
            "five" | "5" => Ok(Self::Five),
            _ => Err(ParseOptionError::new("apple count", value, "one, three, five")),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Self::Left),
            "u" | "up" => Ok(Self::Up),
            "r" | "right" => Ok(Self::Right),
            "d" | "down" => Ok(Self::Down),
            _ => Err(ParseOptionError::new(
                "direction",
                value,
                "left, up, right, down",
            )),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Won => f.write_str("won"),
            Self::Lost => f.write_str("lost"),
        }
    }
}
