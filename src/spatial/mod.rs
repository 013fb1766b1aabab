//! Spatial queries over snapshot units
//!
//! Nearest-unit, distance filters and centroids. Small sets are scanned
//! directly; `UnitIndex` buckets a larger set (the visible enemies) once per
//! tick so the many per-unit threat checks stay cheap.

pub mod sparse_hash;

use ordered_float::OrderedFloat;

use crate::core::types::Vec2;
use crate::snapshot::Unit;

pub use sparse_hash::SparseHashGrid;

const INDEX_CELL_SIZE: f32 = 8.0;

/// Geometric mean position, `None` for an empty set
pub fn centroid<'a, I>(units: I) -> Option<Vec2>
where
    I: IntoIterator<Item = &'a Unit>,
{
    let mut sum = Vec2::default();
    let mut n = 0usize;
    for u in units {
        sum = sum + u.position;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(sum * (1.0 / n as f32))
}

pub fn closest_to<'a, I>(units: I, pos: Vec2) -> Option<&'a Unit>
where
    I: IntoIterator<Item = &'a Unit>,
{
    units
        .into_iter()
        .min_by_key(|u| OrderedFloat(u.position.distance_squared(&pos)))
}

/// Units strictly closer than `radius` to `pos`
pub fn closer_than<'a, I>(units: I, radius: f32, pos: Vec2) -> Vec<&'a Unit>
where
    I: IntoIterator<Item = &'a Unit>,
{
    let radius_sq = radius * radius;
    units
        .into_iter()
        .filter(|u| u.position.distance_squared(&pos) < radius_sq)
        .collect()
}

/// Bucketed view of a unit slice for repeated radius queries
#[derive(Debug)]
pub struct UnitIndex<'a> {
    units: &'a [Unit],
    positions: Vec<Vec2>,
    grid: SparseHashGrid,
}

impl<'a> UnitIndex<'a> {
    pub fn new(units: &'a [Unit]) -> Self {
        let positions: Vec<Vec2> = units.iter().map(|u| u.position).collect();
        let mut grid = SparseHashGrid::new(INDEX_CELL_SIZE);
        for (slot, pos) in positions.iter().enumerate() {
            grid.insert(slot, *pos);
        }
        Self {
            units,
            positions,
            grid,
        }
    }

    pub fn closer_than(&self, radius: f32, pos: Vec2) -> Vec<&'a Unit> {
        let units = self.units;
        let mut slots = self.grid.query_radius(pos, radius, &self.positions);
        // Keep snapshot order so tie-breaks are stable
        slots.sort_unstable();
        slots.into_iter().map(|slot| &units[slot]).collect()
    }

    pub fn closest_within(&self, radius: f32, pos: Vec2) -> Option<&'a Unit> {
        closest_to(self.closer_than(radius, pos), pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitTypeId;

    fn unit(tag: u64, x: f32, y: f32) -> Unit {
        Unit::new(tag, UnitTypeId::Zergling, Vec2::new(x, y))
    }

    #[test]
    fn test_centroid() {
        let units = vec![unit(1, 0.0, 0.0), unit(2, 4.0, 0.0), unit(3, 2.0, 6.0)];
        let c = centroid(&units).unwrap();
        assert!((c.x - 2.0).abs() < 1e-5);
        assert!((c.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_centroid_empty() {
        let units: Vec<Unit> = vec![];
        assert!(centroid(&units).is_none());
    }

    #[test]
    fn test_closest_to_breaks_ties_by_order() {
        let units = vec![unit(1, 1.0, 0.0), unit(2, -1.0, 0.0)];
        assert_eq!(closest_to(&units, Vec2::default()).unwrap().tag.0, 1);
    }

    #[test]
    fn test_index_matches_linear_scan() {
        let units: Vec<Unit> = (0..50)
            .map(|i| unit(i, (i as f32 * 7.3) % 60.0, (i as f32 * 3.1) % 45.0))
            .collect();
        let index = UnitIndex::new(&units);
        let center = Vec2::new(20.0, 20.0);
        for radius in [3.0, 15.0, 20.0, 100.0] {
            let mut a: Vec<u64> = index.closer_than(radius, center).iter().map(|u| u.tag.0).collect();
            let mut b: Vec<u64> = closer_than(&units, radius, center).iter().map(|u| u.tag.0).collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b, "radius {radius}");
        }
    }

    #[test]
    fn test_closest_within_respects_radius() {
        let units = vec![unit(1, 10.0, 0.0)];
        let index = UnitIndex::new(&units);
        assert!(index.closest_within(5.0, Vec2::default()).is_none());
        assert_eq!(index.closest_within(15.0, Vec2::default()).unwrap().tag.0, 1);
    }
}
