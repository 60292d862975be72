#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid layout search that fits a unit size to a viewport.
//!
//! The search walks increasing column divisors until the implied number of
//! playable cells overshoots the requested density, then picks whichever of
//! the two neighbouring divisors lands closer. The arithmetic deliberately
//! runs in `f32` with the same truncation points as the shipped layouts so
//! that identical viewports always produce identical boards.

use snake_core::{GridGeometry, MapSize, Viewport};
use tracing::warn;

/// Smallest unit size the search may settle on, in pixels.
pub const MIN_UNIT_SIZE: u32 = 1;

/// Lays out a grid for the viewport that best matches the requested map size.
///
/// Viewports too small for the density fall back to [`MIN_UNIT_SIZE`].
#[must_use]
pub fn layout(viewport: Viewport, map_size: MapSize) -> GridGeometry {
    let target_cells = map_size.target_cells();
    let unit = fit_unit_size(viewport, target_cells).unwrap_or_else(|| {
        warn!(
            width = viewport.width(),
            height = viewport.height(),
            target_cells,
            "viewport too small for requested density, clamping unit size"
        );
        MIN_UNIT_SIZE
    });
    GridGeometry::new(unit, viewport)
}

/// Searches for the unit size whose playable cell count is closest to `target_cells`.
///
/// Returns `None` when every column divisor undershoots the target.
#[must_use]
pub fn fit_unit_size(viewport: Viewport, target_cells: u32) -> Option<u32> {
    let width = viewport.width() as f32;
    let height = viewport.height() as f32;
    let target = target_cells as f32;
    let max_divisor = viewport.width() as f32;

    let mut divisor = 2.0_f32;
    let mut unit;
    let mut rows;
    loop {
        divisor += 1.0;
        if divisor > max_divisor {
            return None;
        }

        unit = (width / divisor) as u32;
        rows = (height - unit as f32) / unit as f32;
        if rows * (divisor - 2.0) > target {
            break;
        }
    }

    let previous = width / (divisor - 1.0);
    let overshoot = (rows as i32) as f32 * (divisor - 2.0) - target;
    let undershoot = target - ((height - previous) as i32) as f32 / previous * (divisor - 3.0);
    if overshoot > undershoot {
        unit = previous as u32;
    }

    Some(unit.max(MIN_UNIT_SIZE))
}
