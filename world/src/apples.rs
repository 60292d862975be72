//! Apple slots and their relocation rules.

use rand::Rng;
use snake_core::{AppleSlot, AppleSnapshot, CellCoord, GridGeometry};

use crate::occupancy::EmptyCells;

/// Largest number of apples a board can be seeded with.
pub(crate) const MAX_APPLES: usize = 5;

/// Seed offsets from the right edge and the middle row, in slot order.
const SEED_LAYOUT: [(i32, i32); MAX_APPLES] = [(5, 0), (3, 2), (3, -2), (7, 2), (7, -2)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Apple {
    slot: AppleSlot,
    cell: CellCoord,
    pulse_epoch: u64,
}

/// Result of handing an eaten cell to the apple set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Relocation {
    /// The apple jumped to a free cell.
    Moved {
        slot: AppleSlot,
        to: CellCoord,
    },
    /// No free cell remained so the apple left play.
    Removed {
        slot: AppleSlot,
        remaining: usize,
    },
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Apples {
    apples: Vec<Apple>,
}

impl Apples {
    /// Seeds `count` apples to the right of the snake, clamped to `1..=5`.
    pub(crate) fn seed(geometry: &GridGeometry, count: usize) -> Self {
        let right = geometry.columns() as i32;
        let middle = geometry.middle_row();
        let apples = SEED_LAYOUT
            .iter()
            .take(count.clamp(1, MAX_APPLES))
            .enumerate()
            .map(|(index, (left, down))| Apple {
                slot: AppleSlot::new(index as u8 + 1),
                cell: CellCoord::new(right - left, middle + down),
                pulse_epoch: 0,
            })
            .collect();
        Self { apples }
    }

    pub(crate) fn len(&self) -> usize {
        self.apples.len()
    }

    /// Current cell of every live apple in slot order.
    pub(crate) fn positions(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.apples.iter().map(|apple| apple.cell)
    }

    pub(crate) fn slot_at(&self, cell: CellCoord) -> Option<AppleSlot> {
        self.apples
            .iter()
            .find(|apple| apple.cell == cell)
            .map(|apple| apple.slot)
    }

    /// Moves the apple on `cell` to a random empty cell, or removes it when
    /// the board is full. A cell holding no apple leaves the set untouched.
    pub(crate) fn relocate<R: Rng>(
        &mut self,
        cell: CellCoord,
        empty: &EmptyCells,
        rng: &mut R,
        tick_index: u64,
    ) -> Option<Relocation> {
        let index = self.apples.iter().position(|apple| apple.cell == cell)?;

        match empty.choose(rng) {
            Some(to) => {
                let apple = &mut self.apples[index];
                apple.cell = to;
                apple.pulse_epoch = tick_index;
                Some(Relocation::Moved {
                    slot: apple.slot,
                    to,
                })
            }
            None => {
                let removed = self.apples.remove(index);
                Some(Relocation::Removed {
                    slot: removed.slot,
                    remaining: self.apples.len(),
                })
            }
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<AppleSnapshot> {
        self.apples
            .iter()
            .map(|apple| AppleSnapshot {
                slot: apple.slot,
                cell: apple.cell,
                pulse_epoch: apple.pulse_epoch,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use snake_core::Viewport;

    fn geometry() -> GridGeometry {
        GridGeometry::new(10, Viewport::new(200, 300))
    }

    #[test]
    fn seeds_follow_the_slot_layout() {
        let apples = Apples::seed(&geometry(), 5);
        let cells: Vec<_> = apples.positions().collect();

        assert_eq!(
            cells,
            vec![
                CellCoord::new(15, 15),
                CellCoord::new(17, 17),
                CellCoord::new(17, 13),
                CellCoord::new(13, 17),
                CellCoord::new(13, 13),
            ]
        );
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(Apples::seed(&geometry(), 0).len(), 1);
        assert_eq!(Apples::seed(&geometry(), 3).len(), 3);
        assert_eq!(Apples::seed(&geometry(), 9).len(), MAX_APPLES);
    }

    #[test]
    fn relocation_moves_to_an_empty_cell_and_restarts_pulse() {
        let geometry = geometry();
        let mut apples = Apples::seed(&geometry, 1);
        let mut empty = EmptyCells::new(geometry);
        empty.fill_with(apples.positions().collect::<Vec<_>>());
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let relocation = apples.relocate(CellCoord::new(15, 15), &empty, &mut rng, 9);

        let Some(Relocation::Moved { slot, to }) = relocation else {
            panic!("expected a move, got {relocation:?}");
        };
        assert_eq!(slot, AppleSlot::new(1));
        assert!(empty.contains(to));
        assert_eq!(apples.snapshots()[0].pulse_epoch, 9);
    }

    #[test]
    fn relocating_a_cell_without_apple_is_a_no_op() {
        let geometry = geometry();
        let mut apples = Apples::seed(&geometry, 1);
        let empty = EmptyCells::new(geometry);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        assert_eq!(
            apples.relocate(CellCoord::new(2, 2), &empty, &mut rng, 1),
            None
        );
        assert_eq!(apples.slot_at(CellCoord::new(15, 15)), Some(AppleSlot::new(1)));
    }

    #[test]
    fn full_board_removes_the_apple() {
        let geometry = geometry();
        let mut apples = Apples::seed(&geometry, 3);
        let mut empty = EmptyCells::new(geometry);
        empty.fill_with(geometry.playable_cells());
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        assert_eq!(
            apples.relocate(CellCoord::new(17, 17), &empty, &mut rng, 4),
            Some(Relocation::Removed {
                slot: AppleSlot::new(2),
                remaining: 2,
            })
        );
        assert_eq!(apples.len(), 2);
        assert_eq!(apples.slot_at(CellCoord::new(17, 17)), None);
    }

    #[test]
    fn relocated_apple_never_lands_on_another_apple() {
        // 8 by 6 interior, so 43 free cells once five apples are placed.
        let geometry = GridGeometry::new(10, Viewport::new(100, 70));
        let mut apples = Apples::seed(&geometry, 5);
        let mut empty = EmptyCells::new(geometry);
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        for round in 0..500 {
            let eaten = apples.positions().nth(round % MAX_APPLES).expect("five apples");
            let others: Vec<_> = apples.positions().filter(|&cell| cell != eaten).collect();
            empty.fill_with(apples.positions().collect::<Vec<_>>());

            let relocation = apples.relocate(eaten, &empty, &mut rng, round as u64);

            let Some(Relocation::Moved { to, .. }) = relocation else {
                panic!("expected a move, got {relocation:?}");
            };
            assert!(!others.contains(&to), "round {round}: {to:?} already holds an apple");
            assert_ne!(to, eaten);
            assert_eq!(apples.len(), MAX_APPLES);
        }
    }
}
