use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::AtlasCell},
    coords::VoxelCoord,
};

/// Fraction of an atlas cell left as a margin on every edge of a face's UVs.
pub const UV_INSET: f32 = 1.0 / 16.0;

/// Unit cube corner offsets for each side, in [`BlockSide::all`] order.
///
/// Corners are listed so that [`Face::indices`] winds both triangles
/// counter-clockwise when seen from outside the cube (right-handed axes).
const CORNERS: [[[f32; 3]; 4]; 6] = {
    const WDS: [f32; 3] = [0.0, 0.0, 0.0];
    const EDS: [f32; 3] = [1.0, 0.0, 0.0];
    const WUS: [f32; 3] = [0.0, 1.0, 0.0];
    const EUS: [f32; 3] = [1.0, 1.0, 0.0];
    const WDN: [f32; 3] = [0.0, 0.0, 1.0];
    const EDN: [f32; 3] = [1.0, 0.0, 1.0];
    const WUN: [f32; 3] = [0.0, 1.0, 1.0];
    const EUN: [f32; 3] = [1.0, 1.0, 1.0];
    [
        [EUN, WUN, EUS, WUS], // UP
        [EDS, WDS, EDN, WDN], // DOWN
        [EDN, WDN, EUN, WUN], // NORTH
        [EDS, EDN, EUS, EUN], // EAST
        [WDS, EDS, WUS, EUS], // SOUTH
        [WDN, WDS, WUN, WUS], // WEST
    ]
};

/// Two triangles over the four corners of a face, relative to its first vertex.
const QUAD_INDICES: [u32; 6] = [0, 3, 1, 0, 2, 3];

/// Represents a single quad face of a block, ready to be appended to a buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Absolute positions of the four corners
    pub corners: [[f32; 3]; 4],
    /// Atlas UVs of the four corners, in the same order
    pub uvs: [[f32; 2]; 4],
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face of the block at `position` on `block_side`.
    ///
    /// # Arguments
    /// * `position` - Absolute position of the block
    /// * `block_side` - Which side of the block this face represents
    /// * `cell` - Atlas cell drawn on the face
    /// * `atlas_size` - Atlas width and height, in cells
    pub fn new(
        position: VoxelCoord,
        block_side: BlockSide,
        cell: AtlasCell,
        atlas_size: (u32, u32),
    ) -> Self {
        let origin = [position.x as f32, position.y as f32, position.z as f32];
        let corners = CORNERS[block_side.index()]
            .map(|c| [origin[0] + c[0], origin[1] + c[1], origin[2] + c[2]]);

        Face {
            corners,
            uvs: Self::uvs(cell, atlas_size),
            block_side,
        }
    }

    /// UVs of an atlas cell, inset by [`UV_INSET`] of a cell on each edge.
    pub fn uvs(cell: AtlasCell, (atlas_width, atlas_height): (u32, u32)) -> [[f32; 2]; 4] {
        let step_x = 1.0 / atlas_width as f32;
        let step_y = 1.0 / atlas_height as f32;
        let inset_x = step_x * UV_INSET;
        let inset_y = step_y * UV_INSET;
        let start_x = cell.u as f32 * step_x;
        let start_y = cell.v as f32 * step_y;

        [
            [start_x + inset_x, start_y + inset_y],
            [start_x + step_x - inset_x, start_y + inset_y],
            [start_x + inset_x, start_y + step_y - inset_y],
            [start_x + step_x - inset_x, start_y + step_y - inset_y],
        ]
    }

    /// Triangle indices of a face whose first vertex sits at `base`.
    pub fn indices(base: u32) -> [u32; 6] {
        QUAD_INDICES.map(|i| base + i)
    }
}
