//! # Coordinates
//!
//! Integer positions in the world. A [`VoxelCoord`] addresses one block, a
//! [`ChunkCoord`] addresses one chunk on the chunk grid. Converting between the
//! two always floors, so negative voxels land in negative chunks:
//!
//! ```
//! use voxel_world::engine_state::voxels::coords::{ChunkCoord, VoxelCoord};
//!
//! let voxel = VoxelCoord::new(-1, 15, 16);
//! assert_eq!(voxel.chunk(16), ChunkCoord::new(-1, 0, 1));
//! assert_eq!(ChunkCoord::new(-1, 0, 1).origin(16), VoxelCoord::new(-16, 0, 16));
//! ```

use std::fmt;
use std::ops::Add;

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::block::block_side::BlockSide;

/// Absolute position of a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Position of a chunk on the chunk grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the chunk containing this voxel.
    pub fn chunk(self, chunk_size: i32) -> ChunkCoord {
        ChunkCoord::of_voxel(self, chunk_size)
    }

    /// Returns the adjacent voxel on the given side.
    pub fn neighbor(self, side: BlockSide) -> VoxelCoord {
        self + side.offset()
    }

    /// Returns the voxel containing a world-space point.
    pub fn from_world_position(position: Vector3<f32>) -> Self {
        Self::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        )
    }
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Floor-divides a voxel position by the chunk edge length.
    pub fn of_voxel(voxel: VoxelCoord, chunk_size: i32) -> Self {
        Self::new(
            voxel.x.div_euclid(chunk_size),
            voxel.y.div_euclid(chunk_size),
            voxel.z.div_euclid(chunk_size),
        )
    }

    /// Voxel coordinate of this chunk's (0, 0, 0) corner.
    pub fn origin(self, chunk_size: i32) -> VoxelCoord {
        VoxelCoord::new(self.x * chunk_size, self.y * chunk_size, self.z * chunk_size)
    }

    /// Largest absolute per-axis difference. Render distance is a cube, so
    /// this is the distance used for range checks and apply priority.
    pub fn chebyshev_distance(self, other: ChunkCoord) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    /// Returns the chunk adjacent to this one on the given side.
    pub fn neighbor(self, side: BlockSide) -> ChunkCoord {
        let offset = side.offset();
        Self::new(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }

    /// The six face-adjacent chunks, in [`BlockSide::all`] order.
    pub fn neighbors(self) -> [ChunkCoord; 6] {
        BlockSide::all().map(|side| self.neighbor(side))
    }

    /// Every chunk within Chebyshev `radius` of this one, including itself.
    pub fn cube(self, radius: i32) -> impl Iterator<Item = ChunkCoord> {
        let range = -radius..=radius;
        range.clone().flat_map(move |dx| {
            let range = range.clone();
            range.clone().flat_map(move |dy| {
                range
                    .clone()
                    .map(move |dz| ChunkCoord::new(self.x + dx, self.y + dy, self.z + dz))
            })
        })
    }
}

impl Add<Vector3<i32>> for VoxelCoord {
    type Output = VoxelCoord;

    fn add(self, offset: Vector3<i32>) -> VoxelCoord {
        VoxelCoord::new(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }
}

impl From<Point3<i32>> for VoxelCoord {
    fn from(point: Point3<i32>) -> Self {
        Self::new(point.x, point.y, point.z)
    }
}

impl From<VoxelCoord> for Point3<i32> {
    fn from(voxel: VoxelCoord) -> Self {
        Point3::new(voxel.x, voxel.y, voxel.z)
    }
}

impl From<Point3<i32>> for ChunkCoord {
    fn from(point: Point3<i32>) -> Self {
        Self::new(point.x, point.y, point.z)
    }
}

impl From<ChunkCoord> for Point3<i32> {
    fn from(chunk: ChunkCoord) -> Self {
        Point3::new(chunk.x, chunk.y, chunk.z)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_origin_contains_voxel() {
        for &size in &[1, 4, 16] {
            for x in -40..40 {
                for &(y, z) in &[(0, 0), (-17, 33), (5, -1)] {
                    let voxel = VoxelCoord::new(x, y, z);
                    let origin = voxel.chunk(size).origin(size);

                    assert!(origin.x <= voxel.x && voxel.x < origin.x + size);
                    assert!(origin.y <= voxel.y && voxel.y < origin.y + size);
                    assert!(origin.z <= voxel.z && voxel.z < origin.z + size);
                }
            }
        }
    }

    #[test]
    fn test_negative_voxels_floor() {
        assert_eq!(VoxelCoord::new(-1, -16, -17).chunk(16), ChunkCoord::new(-1, -1, -2));
        assert_eq!(VoxelCoord::new(0, 15, 16).chunk(16), ChunkCoord::new(0, 0, 1));
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = ChunkCoord::new(0, 0, 0);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(2, -1, 1)), 2);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(-3, 3, 3)), 3);
        assert_eq!(a.chebyshev_distance(a), 0);
        assert_eq!(
            ChunkCoord::new(1, 5, 2).chebyshev_distance(ChunkCoord::new(4, 4, 4)),
            ChunkCoord::new(4, 4, 4).chebyshev_distance(ChunkCoord::new(1, 5, 2))
        );
    }

    #[test]
    fn test_cube_covers_radius() {
        let center = ChunkCoord::new(3, -2, 7);
        let cube: Vec<_> = center.cube(2).collect();

        assert_eq!(cube.len(), 125);
        assert!(cube.iter().all(|c| c.chebyshev_distance(center) <= 2));
        assert_eq!(center.cube(0).collect::<Vec<_>>(), vec![center]);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = ChunkCoord::new(0, 0, 0);
        for neighbor in center.neighbors() {
            assert_eq!(center.chebyshev_distance(neighbor), 1);
            let manhattan = neighbor.x.abs() + neighbor.y.abs() + neighbor.z.abs();
            assert_eq!(manhattan, 1);
        }
    }

    #[test]
    fn test_world_position_floors() {
        let voxel = VoxelCoord::from_world_position(Vector3::new(-0.5, 3.99, 16.0));
        assert_eq!(voxel, VoxelCoord::new(-1, 3, 16));
    }
}
