//! # World Streaming
//!
//! Decides which chunks should be loaded around the viewer. The controller
//! keeps the set of loaded chunk coordinates and, when the viewer enters a new
//! chunk, produces a [`StreamingPlan`]: the coordinates to load (the cube of
//! radius `render_distance` minus what is already loaded, nearest first) and the
//! coordinates to unload (everything loaded that fell out of the cube).
//!
//! The controller does not poll the viewer; it is told about chunk changes.

use std::collections::HashSet;

use crate::engine_state::voxels::coords::ChunkCoord;

/// Loads and unloads produced by one viewer chunk change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingPlan {
    /// Coordinates to load, nearest to the viewer first.
    pub to_load: Vec<ChunkCoord>,
    /// Loaded coordinates now beyond render distance.
    pub to_unload: Vec<ChunkCoord>,
}

#[derive(Debug, Clone)]
pub struct StreamingController {
    render_distance: i32,
    viewer: Option<ChunkCoord>,
    loaded: HashSet<ChunkCoord>,
}

impl StreamingController {
    pub fn new(render_distance: i32) -> Self {
        Self {
            render_distance,
            viewer: None,
            loaded: HashSet::new(),
        }
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    /// The viewer's current chunk, once one has been reported.
    pub fn viewer(&self) -> Option<ChunkCoord> {
        self.viewer
    }

    /// Records the viewer's new chunk and returns what must change.
    pub fn plan(&mut self, viewer: ChunkCoord) -> StreamingPlan {
        self.viewer = Some(viewer);

        let mut to_load: Vec<ChunkCoord> = viewer
            .cube(self.render_distance)
            .filter(|coord| !self.loaded.contains(coord))
            .collect();
        // Stable, so ties keep cube order and the plan is deterministic.
        to_load.sort_by_key(|coord| coord.chebyshev_distance(viewer));

        let mut to_unload: Vec<ChunkCoord> = self
            .loaded
            .iter()
            .copied()
            .filter(|coord| coord.chebyshev_distance(viewer) > self.render_distance)
            .collect();
        to_unload.sort();

        StreamingPlan { to_load, to_unload }
    }

    /// True if `coord` lies within render distance of the current viewer chunk.
    pub fn is_in_range(&self, coord: ChunkCoord) -> bool {
        self.viewer
            .is_some_and(|viewer| coord.chebyshev_distance(viewer) <= self.render_distance)
    }

    pub fn mark_loaded(&mut self, coord: ChunkCoord) -> bool {
        self.loaded.insert(coord)
    }

    pub fn mark_unloaded(&mut self, coord: ChunkCoord) -> bool {
        self.loaded.remove(&coord)
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded.contains(&coord)
    }

    pub fn loaded(&self) -> &HashSet<ChunkCoord> {
        &self.loaded
    }

    pub fn clear(&mut self) {
        self.viewer = None;
        self.loaded.clear();
    }
}
