#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for snake adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use snake_core::{CellCoord, Direction, GridGeometry, Outcome, Rgb};
use snake_system_motion::SnakeFrame;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction key pressed on this frame, if any.
    pub direction: Option<Direction>,
    /// Whether the adapter detected a new game request on this frame.
    pub restart: bool,
    /// Whether the adapter detected a pause toggle on this frame.
    pub pause_toggle: bool,
}

/// Checkered board covering the whole viewport, border included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of columns, border included.
    pub columns: u32,
    /// Number of rows, border included.
    pub rows: u32,
    /// Edge length of a cell in pixels.
    pub cell_length: f32,
    /// Color of cells whose coordinates sum to an even number.
    pub light: Color,
    /// Color of the remaining cells.
    pub dark: Color,
}

impl BoardPresentation {
    /// Default color of even cells.
    pub const LIGHT: Color = Color::from_rgb_u8(245, 164, 98);
    /// Default color of odd cells.
    pub const DARK: Color = Color::from_rgb_u8(239, 87, 86);

    /// Describes the board for the provided grid layout.
    pub fn new(geometry: &GridGeometry) -> Result<Self, RenderingError> {
        if geometry.columns() == 0 || geometry.rows() == 0 {
            return Err(RenderingError::EmptyBoard {
                width: geometry.viewport().width(),
                height: geometry.viewport().height(),
                unit: geometry.unit(),
            });
        }
        Ok(Self {
            columns: geometry.columns(),
            rows: geometry.rows(),
            cell_length: geometry.unit() as f32,
            light: Self::LIGHT,
            dark: Self::DARK,
        })
    }

    /// Width of the board in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Height of the board in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Checker color of the provided cell.
    #[must_use]
    pub fn cell_color(&self, cell: CellCoord) -> Color {
        if (cell.column() + cell.row()).rem_euclid(2) == 0 {
            self.light
        } else {
            self.dark
        }
    }
}

/// Wall drawn over the outermost ring of cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallPresentation {
    /// Thickness of the wall in pixels.
    pub thickness: f32,
    /// Color of the wall.
    pub color: Color,
}

impl WallPresentation {
    /// Default wall color.
    pub const COLOR: Color = Color::from_rgb_u8(76, 8, 117);

    /// Creates a wall descriptor.
    #[must_use]
    pub const fn new(thickness: f32, color: Color) -> Self {
        Self { thickness, color }
    }

    /// Wall a quarter cell thick in the default color.
    #[must_use]
    pub fn for_cell_length(cell_length: f32) -> Self {
        Self::new(cell_length / 4.0, Self::COLOR)
    }
}

/// Apple drawn at the centre of its cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApplePresentation {
    /// Centre in pixels.
    pub center: Vec2,
    /// Resting radius in pixels.
    pub radius: f32,
    /// Pulse phase in `0.0..1.0`.
    pub pulse: f32,
    /// Fill color.
    pub color: Color,
}

impl ApplePresentation {
    /// Default apple color.
    pub const COLOR: Color = Color::from_rgb_u8(214, 40, 57);

    /// Creates an apple descriptor sized to the cell.
    #[must_use]
    pub fn new(center: Vec2, cell_length: f32, pulse: f32) -> Self {
        Self {
            center,
            radius: cell_length * 0.35,
            pulse,
            color: Self::COLOR,
        }
    }

    /// Radius after applying the pulse, swelling by up to a tenth.
    #[must_use]
    pub fn pulsed_radius(&self) -> f32 {
        let swell = (self.pulse * std::f32::consts::TAU).sin().max(0.0);
        self.radius * (1.0 + 0.1 * swell)
    }
}

/// Score line drawn above the board.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct HudPresentation {
    /// Apples eaten in the current game.
    pub score: u32,
    /// Best score recorded so far.
    pub high_score: u32,
    /// Terminal result, once the game ended.
    pub outcome: Option<Outcome>,
    /// Whether the game is paused.
    pub paused: bool,
}

impl HudPresentation {
    /// Banner describing the state of the game, if one should be shown.
    #[must_use]
    pub fn banner(&self) -> Option<String> {
        match self.outcome {
            Some(Outcome::Won) => Some(format!("You won with {} apples! Press R", self.score)),
            Some(Outcome::Lost) => Some(format!("Game over: {} apples. Press R", self.score)),
            None if self.paused => Some("Paused".to_owned()),
            None => None,
        }
    }
}

/// Scene description combining the board, wall and inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board that composes the play area.
    pub board: BoardPresentation,
    /// Wall drawn around the play area.
    pub wall: WallPresentation,
    /// Interpolated snake, absent until the first snapshot arrives.
    pub snake: Option<SnakeFrame>,
    /// Apples currently on the board.
    pub apples: Vec<ApplePresentation>,
    /// Score line.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        board: BoardPresentation,
        wall: WallPresentation,
        snake: Option<SnakeFrame>,
        apples: Vec<ApplePresentation>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            board,
            wall,
            snake,
            apples,
            hud,
        }
    }

    /// Empty scene for a grid layout.
    pub fn for_geometry(geometry: &GridGeometry) -> Result<Self, RenderingError> {
        let board = BoardPresentation::new(geometry)?;
        Ok(Self::new(
            board,
            WallPresentation::for_cell_length(board.cell_length),
            None,
            Vec::new(),
            HudPresentation::default(),
        ))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting snake scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The viewport does not fit a single whole cell.
    EmptyBoard {
        /// Viewport width in pixels.
        width: u32,
        /// Viewport height in pixels.
        height: u32,
        /// Cell edge length in pixels.
        unit: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBoard {
                width,
                height,
                unit,
            } => write!(
                f,
                "a {width}x{height} viewport holds no whole {unit} pixel cell"
            ),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_core::Viewport;

    fn geometry() -> GridGeometry {
        GridGeometry::new(40, Viewport::new(480, 800))
    }

    #[test]
    fn board_alternates_checker_colors() {
        let board = BoardPresentation::new(&geometry()).expect("valid geometry");

        assert_eq!(board.cell_color(CellCoord::new(0, 0)), BoardPresentation::LIGHT);
        assert_eq!(board.cell_color(CellCoord::new(1, 0)), BoardPresentation::DARK);
        assert_eq!(board.cell_color(CellCoord::new(3, 5)), BoardPresentation::LIGHT);
        assert_eq!(board.cell_color(CellCoord::new(-1, 0)), BoardPresentation::DARK);
    }

    #[test]
    fn board_covers_every_column_and_row() {
        let board = BoardPresentation::new(&geometry()).expect("valid geometry");

        assert_eq!(board.columns, 12);
        assert_eq!(board.rows, 20);
        assert_eq!(board.width(), 480.0);
        assert_eq!(board.height(), 800.0);
    }

    #[test]
    fn viewport_smaller_than_a_cell_is_rejected() {
        let error = BoardPresentation::new(&GridGeometry::new(40, Viewport::new(30, 300)))
            .expect_err("empty board must be rejected");

        assert_eq!(
            error,
            RenderingError::EmptyBoard {
                width: 30,
                height: 300,
                unit: 40,
            }
        );
    }

    #[test]
    fn wall_is_a_quarter_cell_thick() {
        let scene = Scene::for_geometry(&geometry()).expect("valid geometry");

        assert_eq!(scene.wall.thickness, 10.0);
        assert_eq!(scene.wall.color, WallPresentation::COLOR);
        assert!(scene.snake.is_none());
        assert!(scene.apples.is_empty());
    }

    #[test]
    fn palette_colors_convert_from_bytes() {
        let color = Color::from(Rgb::from_rgb(255, 0, 51));

        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn apple_pulse_only_swells() {
        let resting = ApplePresentation::new(Vec2::ZERO, 40.0, 0.0);
        let peak = ApplePresentation::new(Vec2::ZERO, 40.0, 0.25);
        let trough = ApplePresentation::new(Vec2::ZERO, 40.0, 0.75);

        assert!((resting.pulsed_radius() - 14.0).abs() < 1e-4);
        assert!((peak.pulsed_radius() - 15.4).abs() < 1e-4);
        assert!((trough.pulsed_radius() - 14.0).abs() < 1e-4);
    }

    #[test]
    fn banner_reflects_the_game_state() {
        let mut hud = HudPresentation::default();
        assert_eq!(hud.banner(), None);

        hud.paused = true;
        assert_eq!(hud.banner().as_deref(), Some("Paused"));

        hud.outcome = Some(Outcome::Lost);
        hud.score = 3;
        assert_eq!(hud.banner().as_deref(), Some("Game over: 3 apples. Press R"));
    }
}
