//! Uniform-grid spatial index for neighbourhood queries.
//!
//! Positions are hashed into cubic cells of a fixed size; a radius query
//! visits only the cells overlapping the query sphere and then checks
//! exact distances. Rebuilt from a position snapshot whenever the driver
//! considers positions stale enough to matter — for slow-moving crowds
//! once per influence interval is plenty.

use std::collections::HashMap;

use sentio_core::influence::SpatialIndex;
use sentio_core::types::{EntityId, Position};

/// A uniform grid over entity positions.
#[derive(Debug, Clone)]
pub struct UniformGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32, i32), Vec<(EntityId, Position)>>,
    by_id: HashMap<EntityId, Position>,
}

impl UniformGrid {
    /// Create an empty grid with the given cell edge length.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(0.001),
            cells: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Rebuild the grid from a position snapshot.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = (EntityId, Position)>) {
        self.cells.clear();
        self.by_id.clear();
        for (id, position) in positions {
            self.cells
                .entry(self.cell_of(&position))
                .or_default()
                .push((id, position));
            self.by_id.insert(id, position);
        }
    }

    fn cell_of(&self, position: &Position) -> (i32, i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        )
    }
}

impl SpatialIndex for UniformGrid {
    fn neighbors_within(&self, origin: EntityId, radius: f32) -> Vec<EntityId> {
        let Some(origin_pos) = self.by_id.get(&origin).copied() else {
            return Vec::new();
        };
        let reach = (radius / self.cell_size).ceil() as i32;
        let center = self.cell_of(&origin_pos);

        let mut result = Vec::new();
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let cell = (center.0 + dx, center.1 + dy, center.2 + dz);
                    let Some(entries) = self.cells.get(&cell) else {
                        continue;
                    };
                    for (id, position) in entries {
                        if *id != origin && origin_pos.distance(position) <= radius {
                            result.push(*id);
                        }
                    }
                }
            }
        }
        result
    }
}
