#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure motion interpolator that turns a discrete snake into a smooth ribbon.
//!
//! The interpolator is a function of an immutable [`SnakeSnapshot`] and the
//! fraction of the current tick that has elapsed. Positions along the body are
//! measured in cells from the centre of the trailing ghost cell; the ribbon
//! runs from `0.5 + f` (or a stationary `1.5` right after growing) up to
//! `length - 0.5 + f`. Because both ends sit on cell edges at whole ticks, the
//! frame at the end of one tick matches the frame at the start of the next.

mod path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use snake_core::{Rgb, SnakeSnapshot};

use crate::path::{heading_vector, LegShape, Path};

/// Number of ticks an apple takes to complete one pulse.
pub const PULSE_TICKS: u64 = 6;

/// Body length over which the colour gradient is spread at minimum.
const GRADIENT_CELLS: f32 = 40.0;
/// Body length beyond which the tail stops getting thinner.
const TAPER_CAP: usize = 60;

/// Colours blended from the tail to the head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Colour at the head end of the ribbon.
    pub head: Rgb,
    /// Colour the gradient approaches at the tail end.
    pub tail: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            head: Rgb::from_rgb(0, 0, 0),
            tail: Rgb::from_rgb(255, 255, 255),
        }
    }
}

/// Expression worn by the head sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeadMood {
    /// Regular travel.
    Normal,
    /// The snake swallowed an apple on the last step.
    Eating,
    /// The snake crashed and the game is lost.
    KnockedOut,
}

/// Placement of the head sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadPose {
    /// Sprite centre in pixels.
    pub center: Vec2,
    /// Clockwise rotation in degrees, where zero faces up.
    pub angle_degrees: f32,
    /// Expression to draw.
    pub mood: HeadMood,
    /// Edge length of the sprite in pixels.
    pub size: f32,
}

/// Round cap closing the tail end of the ribbon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TailCap {
    /// Cap centre in pixels.
    pub center: Vec2,
    /// Cap radius in pixels.
    pub radius: f32,
    /// Cap colour.
    pub color: Rgb,
}

/// Single drawable stretch of the ribbon.
///
/// Widths and colours are given at the tail-side and head-side ends and vary
/// linearly in between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RibbonPiece {
    /// Straight stretch between two points.
    Straight {
        /// Tail-side end of the centre-line.
        from: Vec2,
        /// Head-side end of the centre-line.
        to: Vec2,
        /// Ribbon width at both ends.
        widths: (f32, f32),
        /// Ribbon colour at both ends.
        colors: (Rgb, Rgb),
    },
    /// Circular stretch through a bend cell.
    Arc {
        /// Centre of the circle the centre-line follows.
        center: Vec2,
        /// Radius of the centre-line.
        radius: f32,
        /// Angle of the tail-side end in radians, in screen space.
        start_angle: f32,
        /// Signed angle covered towards the head-side end, in radians.
        sweep: f32,
        /// Ribbon width at both ends.
        widths: (f32, f32),
        /// Ribbon colour at both ends.
        colors: (Rgb, Rgb),
    },
}

impl RibbonPiece {
    /// Centre-line point at `t` in `0.0..=1.0` from the tail-side end.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        match *self {
            Self::Straight { from, to, .. } => from.lerp(to, t),
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
                ..
            } => {
                let angle = start_angle + sweep * t;
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            }
        }
    }

    /// Ribbon width at `t` in `0.0..=1.0` from the tail-side end.
    #[must_use]
    pub fn width_at(&self, t: f32) -> f32 {
        let (from, to) = self.widths();
        from + (to - from) * t
    }

    /// Ribbon colour at `t` in `0.0..=1.0` from the tail-side end.
    #[must_use]
    pub fn color_at(&self, t: f32) -> Rgb {
        let (from, to) = self.colors();
        let mix = |a: u8, b: u8| f32::from(a) + (f32::from(b) - f32::from(a)) * t;
        Rgb::from_channels(
            mix(from.red(), to.red()),
            mix(from.green(), to.green()),
            mix(from.blue(), to.blue()),
        )
    }

    /// Widths at the tail-side and head-side ends.
    #[must_use]
    pub fn widths(&self) -> (f32, f32) {
        match *self {
            Self::Straight { widths, .. } | Self::Arc { widths, .. } => widths,
        }
    }

    /// Colours at the tail-side and head-side ends.
    #[must_use]
    pub fn colors(&self) -> (Rgb, Rgb) {
        match *self {
            Self::Straight { colors, .. } | Self::Arc { colors, .. } => colors,
        }
    }

    /// Centre-line length in pixels.
    #[must_use]
    pub fn length(&self) -> f32 {
        match *self {
            Self::Straight { from, to, .. } => from.distance(to),
            Self::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }
}

/// Everything needed to draw the snake for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakeFrame {
    /// Ribbon stretches ordered from the tail to the head.
    pub pieces: Vec<RibbonPiece>,
    /// Head sprite placement.
    pub head: HeadPose,
    /// Cap at the tail end.
    pub tail: TailCap,
}

/// Interpolates the snake at `fraction` of the current tick.
///
/// `fraction` is clamped to `0.0..=1.0`; `unit` is the cell size in pixels.
#[must_use]
pub fn interpolate(
    snapshot: &SnakeSnapshot,
    fraction: f32,
    unit: f32,
    palette: &Palette,
) -> SnakeFrame {
    let fraction = fraction.clamp(0.0, 1.0);
    let head_s = snapshot.length as f32 - 0.5 + fraction;
    let tail_s = (if snapshot.grew { 1.5 } else { 0.5 + fraction }).min(head_s);
    let taper = Taper::new(snapshot.length, unit, tail_s, head_s);
    let shade = Shade::new(palette, tail_s, head_s);
    let mood = if snapshot.failed {
        HeadMood::KnockedOut
    } else if snapshot.grew {
        HeadMood::Eating
    } else {
        HeadMood::Normal
    };

    let exit = (!snapshot.failed).then_some(snapshot.direction);
    let Some(path) = Path::trace(snapshot.trailing, &snapshot.turn_points, exit, unit) else {
        let center = path::cell_center(
            snapshot
                .turn_points
                .last()
                .copied()
                .unwrap_or(snapshot.trailing),
            unit,
        );
        return SnakeFrame {
            pieces: Vec::new(),
            head: HeadPose {
                center,
                angle_degrees: snapshot.direction.heading_degrees(),
                mood,
                size: unit,
            },
            tail: TailCap {
                center,
                radius: taper.tail / 2.0,
                color: shade.at(tail_s),
            },
        };
    };

    let pieces = path
        .legs()
        .iter()
        .filter_map(|leg| {
            let from = leg.start.max(tail_s);
            let to = leg.end.min(head_s);
            if to - from <= 1e-4 {
                return None;
            }
            let widths = (taper.at(from), taper.at(to));
            let colors = (shade.at(from), shade.at(to));
            Some(match leg.shape {
                LegShape::Line { .. } => RibbonPiece::Straight {
                    from: leg.point_at(from, path.unit()),
                    to: leg.point_at(to, path.unit()),
                    widths,
                    colors,
                },
                LegShape::Corner {
                    center,
                    start_angle,
                    sweep,
                } => RibbonPiece::Arc {
                    center,
                    radius: path.unit() / 2.0,
                    start_angle: start_angle + sweep * (from - leg.start),
                    sweep: sweep * (to - from),
                    widths,
                    colors,
                },
            })
        })
        .collect();

    let travel = path.travel();
    let angle_degrees = snapshot
        .head_turn
        .map_or(travel.heading_degrees(), |turn| turn.angle(fraction));

    SnakeFrame {
        pieces,
        head: HeadPose {
            center: path.head() - heading_vector(travel) * (1.0 - fraction) * unit,
            angle_degrees,
            mood,
            size: unit,
        },
        tail: TailCap {
            center: path.point_at(tail_s),
            radius: taper.at(tail_s) / 2.0,
            color: shade.at(tail_s),
        },
    }
}

/// Phase of an apple's pulse in `0.0..1.0`.
#[must_use]
pub fn pulse_phase(pulse_epoch: u64, tick_index: u64, fraction: f32) -> f32 {
    let ticks = tick_index.saturating_sub(pulse_epoch) % PULSE_TICKS;
    ((ticks as f32 + fraction.clamp(0.0, 1.0)) / PULSE_TICKS as f32).fract()
}

/// Linear width profile from the tail to the head.
#[derive(Clone, Copy, Debug)]
struct Taper {
    head: f32,
    tail: f32,
    tail_s: f32,
    span: f32,
}

impl Taper {
    fn new(length: usize, unit: f32, tail_s: f32, head_s: f32) -> Self {
        let head = 3.0 * unit / 4.0;
        let tail = head - length.min(TAPER_CAP) as f32 * unit / 150.0;
        Self {
            head,
            tail,
            tail_s,
            span: head_s - tail_s,
        }
    }

    fn at(&self, s: f32) -> f32 {
        if self.span <= f32::EPSILON {
            return self.head;
        }
        let t = ((s - self.tail_s) / self.span).clamp(0.0, 1.0);
        self.tail + (self.head - self.tail) * t
    }
}

/// Colour ramp that saturates once the body is long enough.
#[derive(Clone, Copy, Debug)]
struct Shade {
    head: [f32; 3],
    change: [f32; 3],
    head_s: f32,
}

impl Shade {
    fn new(palette: &Palette, tail_s: f32, head_s: f32) -> Self {
        let channels = |rgb: Rgb| {
            [
                f32::from(rgb.red()),
                f32::from(rgb.green()),
                f32::from(rgb.blue()),
            ]
        };
        let head = channels(palette.head);
        let tail = channels(palette.tail);
        let visual_length = (head_s - tail_s + 1.0).max(GRADIENT_CELLS);
        let change = [
            (head[0] - tail[0]) / visual_length,
            (head[1] - tail[1]) / visual_length,
            (head[2] - tail[2]) / visual_length,
        ];
        Self {
            head,
            change,
            head_s,
        }
    }

    fn at(&self, s: f32) -> Rgb {
        let distance = (self.head_s - s).max(0.0);
        Rgb::from_channels(
            self.head[0] - self.change[0] * distance,
            self.head[1] - self.change[1] * distance,
            self.head[2] - self.change[2] * distance,
        )
    }
}
