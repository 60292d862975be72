//! Centre-line of the snake in pixel space, parameterised by cells travelled.

use std::{f32::consts::FRAC_PI_2, iter};

use glam::Vec2;
use snake_core::{CellCoord, Direction};

const EPSILON: f32 = 1e-4;

/// Stretch of the centre-line covering `start..=end` along the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Leg {
    pub(crate) start: f32,
    pub(crate) end: f32,
    pub(crate) shape: LegShape,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum LegShape {
    /// Straight run; `origin` is the point at `start`.
    Line { origin: Vec2, heading: Vec2 },
    /// Quarter circle through a bend cell, one cell of path long.
    Corner {
        center: Vec2,
        start_angle: f32,
        sweep: f32,
    },
}

impl Leg {
    pub(crate) fn point_at(&self, s: f32, unit: f32) -> Vec2 {
        match self.shape {
            LegShape::Line { origin, heading } => origin + heading * (s - self.start) * unit,
            LegShape::Corner {
                center,
                start_angle,
                sweep,
            } => {
                let angle = start_angle + sweep * (s - self.start);
                center + Vec2::new(angle.cos(), angle.sin()) * unit * 0.5
            }
        }
    }
}

/// Legs from the trailing cell centre (`s = 0`) through every turn point.
#[derive(Clone, Debug)]
pub(crate) struct Path {
    legs: Vec<Leg>,
    head: Vec2,
    travel: Direction,
    unit: f32,
}

impl Path {
    /// Traces the path through `trailing` and `turn_points`.
    ///
    /// When `exit` names a heading perpendicular to the final run, the head
    /// cell is bent towards it so the ribbon already curves into the turn
    /// that the next step will take.
    pub(crate) fn trace(
        trailing: CellCoord,
        turn_points: &[CellCoord],
        exit: Option<Direction>,
        unit: f32,
    ) -> Option<Self> {
        let mut cells: Vec<CellCoord> = Vec::with_capacity(turn_points.len() + 1);
        for cell in iter::once(trailing).chain(turn_points.iter().copied()) {
            if cells.last() != Some(&cell) {
                cells.push(cell);
            }
        }
        if cells.len() < 2 {
            return None;
        }

        let headings = cells
            .windows(2)
            .map(|pair| Direction::between(pair[0], pair[1]))
            .collect::<Option<Vec<_>>>()?;
        let mut marks = Vec::with_capacity(cells.len());
        let mut travelled = 0.0_f32;
        marks.push(travelled);
        for pair in cells.windows(2) {
            travelled += pair[0].manhattan_distance(pair[1]) as f32;
            marks.push(travelled);
        }

        let mut legs = Vec::new();
        let mut start = 0.0;
        let mut origin = cell_center(cells[0], unit);
        for index in 1..cells.len() - 1 {
            let (incoming, outgoing) = (headings[index - 1], headings[index]);
            if !is_bend(incoming, outgoing) {
                continue;
            }
            let vertex = cell_center(cells[index], unit);
            push_line(&mut legs, start, marks[index] - 0.5, origin, incoming);
            legs.push(corner(marks[index], vertex, incoming, outgoing, unit));
            start = marks[index] + 0.5;
            origin = vertex + heading_vector(outgoing) * unit * 0.5;
        }

        let last = cells.len() - 1;
        let travel = headings[last - 1];
        let head = cell_center(cells[last], unit);
        match exit.filter(|exit| is_bend(travel, *exit)) {
            Some(exit) => {
                push_line(&mut legs, start, marks[last] - 0.5, origin, travel);
                legs.push(corner(marks[last], head, travel, exit, unit));
            }
            None => push_line(&mut legs, start, marks[last] + 0.5, origin, travel),
        }

        Some(Self {
            legs,
            head,
            travel,
            unit,
        })
    }

    pub(crate) fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub(crate) fn unit(&self) -> f32 {
        self.unit
    }

    /// Centre of the current head cell.
    pub(crate) fn head(&self) -> Vec2 {
        self.head
    }

    /// Heading of the run that ends in the head cell.
    pub(crate) fn travel(&self) -> Direction {
        self.travel
    }

    pub(crate) fn point_at(&self, s: f32) -> Vec2 {
        match self
            .legs
            .iter()
            .find(|leg| s <= leg.end)
            .or_else(|| self.legs.last())
        {
            Some(leg) => leg.point_at(s, self.unit),
            None => self.head,
        }
    }
}

pub(crate) fn cell_center(cell: CellCoord, unit: f32) -> Vec2 {
    Vec2::new(
        (cell.column() as f32 + 0.5) * unit,
        (cell.row() as f32 + 0.5) * unit,
    )
}

pub(crate) fn heading_vector(direction: Direction) -> Vec2 {
    let (column, row) = direction.delta();
    Vec2::new(column as f32, row as f32)
}

fn is_bend(incoming: Direction, outgoing: Direction) -> bool {
    incoming != outgoing && incoming != outgoing.opposite()
}

fn push_line(legs: &mut Vec<Leg>, start: f32, end: f32, origin: Vec2, heading: Direction) {
    if end - start <= EPSILON {
        return;
    }
    legs.push(Leg {
        start,
        end,
        shape: LegShape::Line {
            origin,
            heading: heading_vector(heading),
        },
    });
}

/// Arc centred on the inner corner of the bend cell, joining the midpoints of
/// the entry and exit edges.
fn corner(mark: f32, vertex: Vec2, incoming: Direction, outgoing: Direction, unit: f32) -> Leg {
    let entry = heading_vector(incoming);
    let exit = heading_vector(outgoing);
    let center = vertex + (exit - entry) * unit * 0.5;
    let from = -exit;

    Leg {
        start: mark - 0.5,
        end: mark + 0.5,
        shape: LegShape::Corner {
            center,
            start_angle: from.y.atan2(from.x),
            sweep: FRAC_PI_2 * from.perp_dot(entry).signum(),
        },
    }
}
