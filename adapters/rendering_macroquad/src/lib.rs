#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the snake game.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::shapes::{draw_circle, draw_line, draw_rectangle, draw_triangle};
use macroquad::text::draw_text;
use snake_core::{CellCoord, Direction, Rgb};
use snake_rendering::{
    ApplePresentation, BoardPresentation, Color, FrameInput, HudPresentation, Presentation,
    RenderingBackend, Scene, WallPresentation,
};
use snake_system_motion::{HeadMood, HeadPose, RibbonPiece, SnakeFrame, TailCap};
use std::{collections::VecDeque, time::Duration};

/// Height of the score strip above the board, in screen pixels.
const HUD_HEIGHT: f32 = 48.0;
/// Distance between two ribbon samples, as a share of the cell length.
const SAMPLE_SPACING: f32 = 0.2;

/// Snapshot of edge-triggered keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` starts a new game.
    restart: bool,
    /// `P` or `Space` toggles the pause.
    pause_toggle: bool,
    /// Arrow keys or WASD, first match wins.
    direction: Option<Direction>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let restart = is_key_pressed(KeyCode::R);
        let pause_toggle = is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Space);
        let direction = [
            (KeyCode::Left, Direction::Left),
            (KeyCode::A, Direction::Left),
            (KeyCode::Up, Direction::Up),
            (KeyCode::W, Direction::Up),
            (KeyCode::Right, Direction::Right),
            (KeyCode::D, Direction::Right),
            (KeyCode::Down, Direction::Down),
            (KeyCode::S, Direction::Down),
        ]
        .into_iter()
        .find(|(key, _)| is_key_pressed(*key))
        .map(|(_, direction)| direction);

        Self {
            quit_requested,
            restart,
            pause_toggle,
            direction,
        }
    }

    fn frame_input(self) -> FrameInput {
        FrameInput {
            direction: self.direction,
            restart: self.restart,
            pause_toggle: self.pause_toggle,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.board.width().round() as i32,
            window_height: (scene.board.height() + HUD_HEIGHT).round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, keyboard.frame_input(), &mut scene);

                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_board(&scene.board, &metrics);
                draw_wall(&scene.board, &scene.wall, &metrics);
                draw_apples(&scene.apples, &metrics);
                if let Some(snake) = &scene.snake {
                    draw_snake(snake, &metrics);
                }
                draw_hud(&scene.hud, &metrics);

                if let Some(FpsMetrics {
                    per_second,
                    trailing_ten_seconds,
                }) = fps_counter.record_frame(frame_dt)
                {
                    if show_fps {
                        println!("FPS: {per_second:.2} (10s avg: {trailing_ten_seconds:.2})");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps scene pixels onto the window, leaving room for the score strip.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.board.width();
        let world_height = scene.board.height();
        let available_height = (screen_height - HUD_HEIGHT).max(0.0);

        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            0.0
        } else {
            (screen_width / world_width).min(available_height / world_height)
        };

        Self {
            scale,
            offset_x: (screen_width - world_width * scale) / 2.0,
            offset_y: HUD_HEIGHT + (available_height - world_height * scale) / 2.0,
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }
}

fn draw_board(board: &BoardPresentation, metrics: &SceneMetrics) {
    let step = board.cell_length * metrics.scale;
    for row in 0..board.rows {
        for column in 0..board.columns {
            let cell = CellCoord::new(column as i32, row as i32);
            let origin = metrics.to_screen(Vec2::new(
                column as f32 * board.cell_length,
                row as f32 * board.cell_length,
            ));
            draw_rectangle(
                origin.x,
                origin.y,
                step,
                step,
                to_macroquad_color(board.cell_color(cell)),
            );
        }
    }
}

/// Wall bands along the left, right and bottom border cells.
fn wall_rectangles(board: &BoardPresentation, wall: &WallPresentation) -> [(Vec2, Vec2); 3] {
    let cell = board.cell_length;
    let playable_right = (board.columns.saturating_sub(1)) as f32 * cell;
    let playable_bottom = (board.rows.saturating_sub(1)) as f32 * cell;
    [
        (
            Vec2::new(cell - wall.thickness, 0.0),
            Vec2::new(wall.thickness, playable_bottom + wall.thickness),
        ),
        (
            Vec2::new(playable_right, 0.0),
            Vec2::new(wall.thickness, playable_bottom + wall.thickness),
        ),
        (
            Vec2::new(cell - wall.thickness, playable_bottom),
            Vec2::new(playable_right - cell + 2.0 * wall.thickness, wall.thickness),
        ),
    ]
}

fn draw_wall(board: &BoardPresentation, wall: &WallPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(wall.color);
    for (origin, size) in wall_rectangles(board, wall) {
        let origin = metrics.to_screen(origin);
        let size = size * metrics.scale;
        draw_rectangle(origin.x, origin.y, size.x, size.y, color);
    }
}

fn draw_apples(apples: &[ApplePresentation], metrics: &SceneMetrics) {
    for apple in apples {
        let center = metrics.to_screen(apple.center);
        let radius = apple.pulsed_radius() * metrics.scale;
        draw_circle(center.x, center.y, radius, to_macroquad_color(apple.color));
        draw_circle(
            center.x - radius * 0.35,
            center.y - radius * 0.35,
            radius * 0.25,
            to_macroquad_color(apple.color.lighten(0.6)),
        );
    }
}

/// Discs approximating the ribbon, ordered from the tail to the head.
fn ribbon_samples(pieces: &[RibbonPiece], spacing: f32) -> Vec<(Vec2, f32, Rgb)> {
    let spacing = spacing.max(f32::EPSILON);
    let mut samples = Vec::new();
    for piece in pieces {
        let steps = (piece.length() / spacing).ceil().max(1.0) as u32;
        let first = if samples.is_empty() { 0 } else { 1 };
        for step in first..=steps {
            let t = step as f32 / steps as f32;
            samples.push((piece.point_at(t), piece.width_at(t), piece.color_at(t)));
        }
    }
    samples
}

fn draw_snake(snake: &SnakeFrame, metrics: &SceneMetrics) {
    draw_tail(&snake.tail, metrics);

    let spacing = snake.head.size * SAMPLE_SPACING;
    let samples = ribbon_samples(&snake.pieces, spacing);
    for pair in samples.windows(2) {
        let (from, width, color) = pair[0];
        let (to, _, _) = pair[1];
        let from = metrics.to_screen(from);
        let to = metrics.to_screen(to);
        let width = width * metrics.scale;
        let color = to_macroquad_color(Color::from(color));
        draw_line(from.x, from.y, to.x, to.y, width, color);
        draw_circle(to.x, to.y, width / 2.0, color);
    }

    draw_head(&snake.head, metrics);
}

fn draw_tail(tail: &TailCap, metrics: &SceneMetrics) {
    let center = metrics.to_screen(tail.center);
    draw_circle(
        center.x,
        center.y,
        tail.radius * metrics.scale,
        to_macroquad_color(Color::from(tail.color)),
    );
}

/// Rotates an offset given for a head facing up by the pose angle.
fn rotate_clockwise(offset: Vec2, angle_degrees: f32) -> Vec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vec2::new(
        offset.x * cos - offset.y * sin,
        offset.x * sin + offset.y * cos,
    )
}

fn draw_head(head: &HeadPose, metrics: &SceneMetrics) {
    let size = head.size * metrics.scale;
    let center = metrics.to_screen(head.center);
    let at = |offset: Vec2| center + rotate_clockwise(offset * size, head.angle_degrees);
    let skin = to_macroquad_color(Color::from_rgb_u8(40, 40, 40));
    let white = to_macroquad_color(Color::from_rgb_u8(255, 255, 255));
    let black = to_macroquad_color(Color::from_rgb_u8(0, 0, 0));

    draw_circle(center.x, center.y, size * 0.45, skin);
    let snout = [
        at(Vec2::new(-0.3, -0.2)),
        at(Vec2::new(0.3, -0.2)),
        at(Vec2::new(0.0, -0.5)),
    ];
    draw_triangle(
        to_macroquad_vec(snout[0]),
        to_macroquad_vec(snout[1]),
        to_macroquad_vec(snout[2]),
        skin,
    );

    for side in [-1.0, 1.0] {
        let eye = at(Vec2::new(0.18 * side, -0.12));
        match head.mood {
            HeadMood::KnockedOut => {
                let arm = size * 0.08;
                draw_line(eye.x - arm, eye.y - arm, eye.x + arm, eye.y + arm, 2.0, white);
                draw_line(eye.x - arm, eye.y + arm, eye.x + arm, eye.y - arm, 2.0, white);
            }
            HeadMood::Normal | HeadMood::Eating => {
                draw_circle(eye.x, eye.y, size * 0.1, white);
                draw_circle(eye.x, eye.y, size * 0.05, black);
            }
        }
    }

    if head.mood == HeadMood::Eating {
        let mouth = at(Vec2::new(0.0, -0.38));
        draw_circle(mouth.x, mouth.y, size * 0.1, black);
    }
}

fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    let text_color = to_macroquad_color(Color::from_rgb_u8(255, 255, 255));
    let score = format!("Score: {}   Best: {}", hud.score, hud.high_score);
    let _ = draw_text(&score, metrics.offset_x + 12.0, HUD_HEIGHT * 0.65, 28.0, text_color);

    if let Some(banner) = hud.banner() {
        let screen_width = macroquad::window::screen_width();
        let x = (screen_width / 2.0 - banner.len() as f32 * 8.0).max(0.0);
        let y = metrics.offset_y + 60.0;
        let _ = draw_text(&banner, x, y, 32.0, text_color);
    }
}

fn to_macroquad_vec(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
