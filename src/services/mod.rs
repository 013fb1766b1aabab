//! Capability interfaces to the tactics & economy services
//!
//! Terrain and creep knowledge belongs to the execution layer. The decision
//! engine only asks narrow questions through `MapServices`.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::spatial::SparseHashGrid;

/// Lookups the engine depends on but does not implement
pub trait MapServices {
    /// Closest creep-covered tile to `pos`, if any creep exists
    fn closest_creep_tile(&self, pos: Vec2) -> Option<Vec2>;

    /// A creep-edge position near `pos` where a tumor can extend creep
    fn nearby_creep_edge(&self, pos: Vec2) -> Option<Vec2>;

    /// Known enemy base or natural, `None` while unscouted
    fn enemy_expansion(&self) -> Option<Vec2>;
}

/// Test double returning fixed answers regardless of the query point
#[derive(Debug, Clone, Default)]
pub struct FixedServices {
    pub creep_tile: Option<Vec2>,
    pub creep_edge: Option<Vec2>,
    pub expansion: Option<Vec2>,
}

impl FixedServices {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_creep_tile(mut self, pos: Vec2) -> Self {
        self.creep_tile = Some(pos);
        self
    }

    pub fn with_creep_edge(mut self, pos: Vec2) -> Self {
        self.creep_edge = Some(pos);
        self
    }

    pub fn with_expansion(mut self, pos: Vec2) -> Self {
        self.expansion = Some(pos);
        self
    }
}

impl MapServices for FixedServices {
    fn closest_creep_tile(&self, _pos: Vec2) -> Option<Vec2> {
        self.creep_tile
    }

    fn nearby_creep_edge(&self, _pos: Vec2) -> Option<Vec2> {
        self.creep_edge
    }

    fn enemy_expansion(&self) -> Option<Vec2> {
        self.expansion
    }
}

const CREEP_CELL_SIZE: f32 = 4.0;

/// How far from the query point an edge tile is accepted
const EDGE_SEARCH_RADIUS: f32 = 12.0;

/// Creep knowledge as plain tile lists, as a host or scenario file supplies it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreepMap {
    /// Centres of creep-covered tiles
    pub tiles: Vec<Vec2>,
    /// Subset of `tiles` on the creep boundary
    #[serde(default)]
    pub edges: Vec<Vec2>,
    #[serde(default)]
    pub enemy_expansion: Option<Vec2>,
    #[serde(skip)]
    edge_grid: Option<SparseHashGrid>,
}

impl CreepMap {
    pub fn new(tiles: Vec<Vec2>, edges: Vec<Vec2>, enemy_expansion: Option<Vec2>) -> Self {
        let mut map = Self {
            tiles,
            edges,
            enemy_expansion,
            edge_grid: None,
        };
        map.rebuild_index();
        map
    }

    /// Bucket edge tiles for radius lookups; call after editing `edges`
    pub fn rebuild_index(&mut self) {
        let mut grid = SparseHashGrid::new(CREEP_CELL_SIZE);
        for (slot, pos) in self.edges.iter().enumerate() {
            grid.insert(slot, *pos);
        }
        self.edge_grid = Some(grid);
    }

    fn nearest(points: &[Vec2], pos: Vec2) -> Option<Vec2> {
        points
            .iter()
            .copied()
            .min_by_key(|p| ordered_float::OrderedFloat(p.distance_squared(&pos)))
    }
}

impl MapServices for CreepMap {
    fn closest_creep_tile(&self, pos: Vec2) -> Option<Vec2> {
        Self::nearest(&self.tiles, pos)
    }

    fn nearby_creep_edge(&self, pos: Vec2) -> Option<Vec2> {
        let candidates: Vec<Vec2> = match &self.edge_grid {
            Some(grid) => grid
                .query_radius(pos, EDGE_SEARCH_RADIUS, &self.edges)
                .into_iter()
                .map(|slot| self.edges[slot])
                .collect(),
            None => self
                .edges
                .iter()
                .copied()
                .filter(|p| p.distance(&pos) < EDGE_SEARCH_RADIUS)
                .collect(),
        };
        Self::nearest(&candidates, pos)
    }

    fn enemy_expansion(&self) -> Option<Vec2> {
        self.enemy_expansion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_services_ignore_query() {
        let s = FixedServices::none().with_creep_tile(Vec2::new(3.0, 4.0));
        assert_eq!(s.closest_creep_tile(Vec2::new(100.0, 100.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(s.nearby_creep_edge(Vec2::default()), None);
        assert_eq!(s.enemy_expansion(), None);
    }

    #[test]
    fn test_creep_map_closest_tile() {
        let map = CreepMap::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
            vec![],
            None,
        );
        assert_eq!(map.closest_creep_tile(Vec2::new(8.0, 1.0)), Some(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_creep_map_edge_outside_radius() {
        let map = CreepMap::new(vec![], vec![Vec2::new(50.0, 50.0)], None);
        assert_eq!(map.nearby_creep_edge(Vec2::new(0.0, 0.0)), None);
        assert_eq!(map.nearby_creep_edge(Vec2::new(45.0, 50.0)), Some(Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn test_deserialized_map_works_without_index() {
        let map: CreepMap =
            serde_json::from_str(r#"{"tiles": [], "edges": [{"x": 1.0, "y": 1.0}]}"#).unwrap();
        assert_eq!(map.nearby_creep_edge(Vec2::new(0.0, 0.0)), Some(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_empty_creep_map() {
        let map = CreepMap::default();
        assert_eq!(map.closest_creep_tile(Vec2::default()), None);
    }
}
