//! Scene collaborator interface.
//!
//! The engine never talks to a renderer or physics engine directly. Each
//! generated chunk gets one scene object through [`ChunkScene::attach`]; the
//! apply step installs geometry on it and toggles it active as the chunk loads
//! and unloads. All calls happen on the thread that owns the engine.
//!
//! [`MemoryScene`] records everything it is told and backs the demo binary and
//! the tests.

use std::collections::HashMap;

use crate::engine_state::rendering::meshing::ChunkMesh;
use crate::engine_state::voxels::coords::ChunkCoord;

/// Opaque id of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneHandle(pub u64);

/// Receiver of chunk geometry and visibility.
pub trait ChunkScene {
    /// Creates the scene object of a newly generated chunk.
    fn attach(&mut self, coord: ChunkCoord) -> SceneHandle;

    /// Replaces the render and collision geometry of a scene object.
    fn install(&mut self, handle: SceneHandle, mesh: &ChunkMesh);

    /// Shows or hides a scene object.
    fn set_active(&mut self, handle: SceneHandle, active: bool);

    /// Drops every scene object.
    fn clear(&mut self);
}

/// What a [`MemoryScene`] knows about one object.
#[derive(Debug, Clone, Default)]
pub struct SceneObject {
    pub coord: ChunkCoord,
    pub active: bool,
    pub mesh: ChunkMesh,
    /// Number of times geometry was installed.
    pub installs: usize,
}

/// A scene that keeps its objects in memory.
#[derive(Debug, Default)]
pub struct MemoryScene {
    objects: HashMap<SceneHandle, SceneObject>,
    next_handle: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, handle: SceneHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    pub fn objects(&self) -> impl Iterator<Item = (&SceneHandle, &SceneObject)> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects currently shown.
    pub fn active_count(&self) -> usize {
        self.objects.values().filter(|object| object.active).count()
    }

    /// Render and collision face totals over the shown objects.
    pub fn active_face_counts(&self) -> (usize, usize) {
        self.objects
            .values()
            .filter(|object| object.active)
            .fold((0, 0), |(render, collision), object| {
                (
                    render + object.mesh.render.face_count(),
                    collision + object.mesh.collision.face_count(),
                )
            })
    }
}

impl ChunkScene for MemoryScene {
    fn attach(&mut self, coord: ChunkCoord) -> SceneHandle {
        self.next_handle += 1;
        let handle = SceneHandle(self.next_handle);
        self.objects.insert(
            handle,
            SceneObject {
                coord,
                ..SceneObject::default()
            },
        );
        handle
    }

    fn install(&mut self, handle: SceneHandle, mesh: &ChunkMesh) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.mesh = mesh.clone();
            object.installs += 1;
        }
    }

    fn set_active(&mut self, handle: SceneHandle, active: bool) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.active = active;
        }
    }

    fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_hands_out_distinct_handles() {
        let mut scene = MemoryScene::new();
        let a = scene.attach(ChunkCoord::new(0, 0, 0));
        let b = scene.attach(ChunkCoord::new(1, 0, 0));

        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.object(b).unwrap().coord, ChunkCoord::new(1, 0, 0));
        assert!(!scene.object(a).unwrap().active);
    }

    #[test]
    fn test_install_and_activate() {
        let mut scene = MemoryScene::new();
        let handle = scene.attach(ChunkCoord::new(0, 0, 0));

        scene.install(handle, &ChunkMesh::default());
        scene.set_active(handle, true);

        assert_eq!(scene.object(handle).unwrap().installs, 1);
        assert_eq!(scene.active_count(), 1);

        scene.clear();
        assert!(scene.is_empty());
    }
}
