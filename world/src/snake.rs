//! Authoritative snake body state.

use snake_core::{CellCoord, Direction, DirectionRejection, GridGeometry, HeadTurn, SnakeSnapshot};

/// Number of visible segments a fresh snake starts with.
pub(crate) const INITIAL_LENGTH: usize = 4;

/// Trailing slots kept behind the tail for interpolation and growth.
pub(crate) const GHOST_SLOTS: usize = 2;

/// Discrete snake body stored as a shift buffer, head first.
#[derive(Clone, Debug)]
pub(crate) struct Snake {
    body: Vec<CellCoord>,
    length: usize,
    direction: Direction,
    previous_direction: Direction,
    head_turn: Option<HeadTurn>,
    turn_points: Vec<CellCoord>,
    trailing: CellCoord,
    grew: bool,
}

impl Snake {
    /// Lays out a fresh snake heading right from a third of the way across the board.
    pub(crate) fn spawn(geometry: &GridGeometry) -> Self {
        let head = CellCoord::new(geometry.third_column() + 1, geometry.middle_row());
        let body: Vec<CellCoord> = (0..INITIAL_LENGTH + GHOST_SLOTS)
            .map(|index| CellCoord::new(head.column() - index as i32, head.row()))
            .collect();

        let mut snake = Self {
            trailing: body[INITIAL_LENGTH],
            body,
            length: INITIAL_LENGTH,
            direction: Direction::Right,
            previous_direction: Direction::Right,
            head_turn: None,
            turn_points: Vec::new(),
            grew: true,
        };
        snake.compute_turn_points();
        snake
    }

    pub(crate) fn head(&self) -> CellCoord {
        self.body[0]
    }

    pub(crate) fn length(&self) -> usize {
        self.length
    }

    pub(crate) fn buffer_len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Visible body segments, head first.
    pub(crate) fn segments(&self) -> &[CellCoord] {
        &self.body[..self.length]
    }

    /// Cells that stay occupied after a step: the visible body plus the slot
    /// that turns into the tail if the snake grows on this step.
    pub(crate) fn occupied(&self) -> &[CellCoord] {
        &self.body[..=self.length]
    }

    /// Shifts every slot onto its predecessor and moves the head one cell.
    ///
    /// Returns the head cell before and after the step.
    pub(crate) fn advance(&mut self) -> (CellCoord, CellCoord) {
        let from = self.body[0];
        for index in (1..self.body.len()).rev() {
            self.body[index] = self.body[index - 1];
        }
        self.body[0] = from.step(self.direction);
        (from, self.body[0])
    }

    /// Reports whether the head hit the body or left the playable interior.
    pub(crate) fn collided(&self, geometry: &GridGeometry) -> bool {
        let head = self.head();
        self.body[1..self.length].contains(&head) || !geometry.is_playable(head)
    }

    /// Requests a new heading, sweeping the head over the rest of the tick.
    pub(crate) fn set_direction(
        &mut self,
        direction: Direction,
        requested_at: f32,
    ) -> Result<Direction, DirectionRejection> {
        if direction == self.direction {
            return Err(DirectionRejection::Redundant);
        }
        if direction == self.direction.opposite() {
            return Err(DirectionRejection::Reversal);
        }

        let from = self.direction;
        self.head_turn = Some(HeadTurn::between(
            from,
            direction,
            requested_at.clamp(0.0, 1.0),
            1.0,
        ));
        self.previous_direction = from;
        self.direction = direction;
        Ok(from)
    }

    /// Freezes the render state after a collision.
    ///
    /// When the fatal step followed a turn, the heading reverts to the one
    /// before the turn and the head sweeps back while the recoil plays.
    pub(crate) fn fail(&mut self) -> Option<(Direction, Direction)> {
        self.head_turn = None;
        if self.previous_direction == self.direction {
            return None;
        }

        let from = self.direction;
        let to = self.previous_direction;
        self.head_turn = Some(HeadTurn::between(from, to, 1.0, 0.0));
        self.direction = to;
        Some((from, to))
    }

    /// Marks the current heading as settled once a step succeeded.
    pub(crate) fn settle_direction(&mut self) {
        self.previous_direction = self.direction;
        self.head_turn = None;
    }

    /// Extends the buffer by one slot and the visible body by one segment.
    pub(crate) fn grow(&mut self) {
        let last = self.body[self.body.len() - 1];
        self.body.push(last);
        self.length += 1;
    }

    /// Publishes the result of a successful step to the render state.
    pub(crate) fn finish_step(&mut self, grew: bool) {
        self.grew = grew;
        self.compute_turn_points();
    }

    /// Rebuilds the compressed tail-to-head path from the body buffer.
    fn compute_turn_points(&mut self) {
        let tail = self.length - 1;
        self.turn_points.clear();
        self.turn_points.push(self.body[tail]);
        for index in (1..tail).rev() {
            let behind = self.body[index + 1];
            let ahead = self.body[index - 1];
            if behind.column() != ahead.column() && behind.row() != ahead.row() {
                self.turn_points.push(self.body[index]);
            }
        }
        self.turn_points.push(self.body[0]);
        self.trailing = self.body[self.length];
    }

    pub(crate) fn snapshot(&self, failed: bool) -> SnakeSnapshot {
        SnakeSnapshot {
            turn_points: self.turn_points.clone(),
            trailing: self.trailing,
            length: self.length,
            direction: self.direction,
            grew: self.grew,
            head_turn: self.head_turn,
            failed,
        }
    }
}
