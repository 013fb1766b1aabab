//! Sparse hash grid for radius queries over a tick's units

use ahash::AHashMap;
use crate::core::types::Vec2;

/// Sparse hash grid storing slot indices into a unit slice
#[derive(Debug, Clone)]
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<usize>>,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, slot: usize, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(slot);
    }

    /// Candidate slots in every cell overlapping the square around `center`.
    ///
    /// Callers still need an exact distance check.
    pub fn query_candidates(&self, center: Vec2, radius: f32) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_coord(center);
        let reach = (radius / self.cell_size).ceil().max(0.0) as i32;

        (-reach..=reach).flat_map(move |dx| {
            (-reach..=reach).flat_map(move |dy| {
                self.cells
                    .get(&(cx + dx, cy + dy))
                    .into_iter()
                    .flatten()
                    .copied()
            })
        })
    }

    /// Query slots within radius
    pub fn query_radius(&self, center: Vec2, radius: f32, positions: &[Vec2]) -> Vec<usize> {
        let radius_sq = radius * radius;
        self.query_candidates(center, radius)
            .filter(|&slot| {
                positions
                    .get(slot)
                    .map(|p| p.distance_squared(&center) < radius_sq)
                    .unwrap_or(false)
            })
            .collect()
    }
}
