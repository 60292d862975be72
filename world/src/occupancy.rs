//! Dense occupancy mask over the playable interior.

use rand::Rng;
use snake_core::{CellCoord, GridGeometry};

/// Tracks which playable cells are free of snake segments and apples.
#[derive(Clone, Debug)]
pub(crate) struct EmptyCells {
    geometry: GridGeometry,
    occupied: Vec<bool>,
    free: usize,
}

impl EmptyCells {
    pub(crate) fn new(geometry: GridGeometry) -> Self {
        let capacity = geometry.playable_count();
        Self {
            geometry,
            occupied: vec![false; capacity],
            free: capacity,
        }
    }

    /// Recomputes the mask from scratch for the provided occupants.
    pub(crate) fn fill_with<I>(&mut self, occupants: I)
    where
        I: IntoIterator<Item = CellCoord>,
    {
        self.occupied.fill(false);
        self.free = self.occupied.len();
        for cell in occupants {
            if let Some(index) = self.geometry.playable_index(cell) {
                if let Some(slot) = self.occupied.get_mut(index) {
                    if !*slot {
                        *slot = true;
                        self.free -= 1;
                    }
                }
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.free
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.geometry
            .playable_index(cell)
            .and_then(|index| self.occupied.get(index))
            .map_or(false, |occupied| !occupied)
    }

    /// Free cells in row-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.geometry
            .playable_cells()
            .zip(self.occupied.iter())
            .filter_map(|(cell, occupied)| (!occupied).then_some(cell))
    }

    /// Picks a uniformly random free cell, or `None` when the board is full.
    pub(crate) fn choose<R: Rng>(&self, rng: &mut R) -> Option<CellCoord> {
        if self.free == 0 {
            return None;
        }
        let pick = rng.gen_range(0..self.free);
        self.iter().nth(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use snake_core::Viewport;

    fn geometry() -> GridGeometry {
        // 4 playable columns by 3 playable rows.
        GridGeometry::new(10, Viewport::new(60, 40))
    }

    #[test]
    fn empty_board_is_fully_free() {
        let cells = EmptyCells::new(geometry());

        assert_eq!(cells.len(), 12);
        assert_eq!(cells.iter().count(), 12);
        assert!(cells.contains(CellCoord::new(1, 0)));
        assert!(!cells.contains(CellCoord::new(0, 0)));
    }

    #[test]
    fn occupants_are_removed_once() {
        let mut cells = EmptyCells::new(geometry());
        cells.fill_with([
            CellCoord::new(1, 0),
            CellCoord::new(1, 0),
            CellCoord::new(4, 2),
            CellCoord::new(0, 0),
        ]);

        assert_eq!(cells.len(), 10);
        assert!(!cells.contains(CellCoord::new(1, 0)));
        assert!(!cells.contains(CellCoord::new(4, 2)));
        assert!(cells.contains(CellCoord::new(2, 0)));
    }

    #[test]
    fn refilling_forgets_previous_occupants() {
        let mut cells = EmptyCells::new(geometry());
        cells.fill_with([CellCoord::new(2, 1)]);
        cells.fill_with([CellCoord::new(3, 1)]);

        assert!(cells.contains(CellCoord::new(2, 1)));
        assert!(!cells.contains(CellCoord::new(3, 1)));
    }

    #[test]
    fn choice_only_lands_on_free_cells() {
        let geometry = geometry();
        let mut cells = EmptyCells::new(geometry);
        let occupied: Vec<_> = geometry.playable_cells().skip(1).collect();
        cells.fill_with(occupied);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..16 {
            assert_eq!(cells.choose(&mut rng), Some(CellCoord::new(1, 0)));
        }
    }

    #[test]
    fn full_board_has_nothing_to_choose() {
        let geometry = geometry();
        let mut cells = EmptyCells::new(geometry);
        cells.fill_with(geometry.playable_cells());
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(cells.len(), 0);
        assert_eq!(cells.choose(&mut rng), None);
    }
}
