//! # Box Generator
//!
//! One axis-aligned box per grid cell. A box is the unit cube scaled
//! component-wise and then translated:
//!
//! ```text
//!        7 ──────── 6
//!       /|         /|        z
//!      4 ──────── 5 |        |  y
//!      | 3 ───────|─ 2       | /
//!      |/         |/         |/
//!      0 ──────── 1          └──── x
//! ```
//!
//! Faces are wound counter-clockwise seen from outside, so
//! `(v1 - v0) x (v2 - v0)` points away from the box for positive scale.

use crate::config::MeshConfig;
use crate::grid::{Grid, GridCell};
use crate::mesh::Triangle;

/// Corners of the unit cube.
pub const UNIT_CUBE_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Vertex indices of the 12 triangles, two per face, outward winding.
///
/// Order: bottom, -X, top, +X, +Y, -Y.
pub const BOX_FACES: [[usize; 3]; 12] = [
    [0, 3, 1],
    [1, 3, 2],
    [0, 4, 7],
    [0, 7, 3],
    [4, 5, 6],
    [4, 6, 7],
    [5, 1, 2],
    [5, 2, 6],
    [2, 3, 6],
    [3, 7, 6],
    [0, 1, 5],
    [0, 5, 4],
];

/// Triangles per box.
pub const TRIANGLES_PER_BOX: usize = BOX_FACES.len();

/// A unit cube transformed by a position offset and a scale.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxPrimitive {
    /// Minimum corner in mesh space.
    pub position: [f32; 3],
    /// Extent along each axis.
    pub scale: [f32; 3],
}

impl BoxPrimitive {
    /// Creates a box from position and scale.
    #[inline]
    #[must_use]
    pub const fn new(position: [f32; 3], scale: [f32; 3]) -> Self {
        Self { position, scale }
    }

    /// Box for grid cell `(row, column)` with the given amplitude.
    ///
    /// position = `(row * spacing, column * spacing, 0)`,
    /// scale = `(spacing, spacing, base_height + amplitude * height_gain)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn for_cell(row: usize, column: usize, amplitude: f32, config: &MeshConfig) -> Self {
        let spacing = config.unit_spacing;
        Self {
            position: [row as f32 * spacing, column as f32 * spacing, 0.0],
            scale: [spacing, spacing, config.box_height(amplitude)],
        }
    }

    /// Box for a [`GridCell`].
    #[inline]
    #[must_use]
    pub fn from_cell(cell: GridCell, config: &MeshConfig) -> Self {
        Self::for_cell(cell.row, cell.column, cell.amplitude, config)
    }

    /// Box height (Z scale).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.scale[2]
    }

    /// The 8 transformed corners, in [`UNIT_CUBE_VERTICES`] order.
    #[must_use]
    pub fn vertices(&self) -> [[f32; 3]; 8] {
        UNIT_CUBE_VERTICES.map(|v| {
            [
                v[0] * self.scale[0] + self.position[0],
                v[1] * self.scale[1] + self.position[1],
                v[2] * self.scale[2] + self.position[2],
            ]
        })
    }

    /// Face index triples. Identical for every box.
    #[inline]
    #[must_use]
    pub const fn faces() -> &'static [[usize; 3]; 12] {
        &BOX_FACES
    }

    /// The 12 triangles in [`BOX_FACES`] order.
    #[must_use]
    pub fn triangles(&self) -> [Triangle; TRIANGLES_PER_BOX] {
        let vertices = self.vertices();
        BOX_FACES.map(|[a, b, c]| Triangle::new(vertices[a], vertices[b], vertices[c]))
    }
}

/// One box per grid cell, row by row.
#[must_use]
pub fn boxes_from_grid(grid: &Grid, config: &MeshConfig) -> Vec<BoxPrimitive> {
    grid.cells()
        .map(|cell| BoxPrimitive::from_cell(cell, config))
        .collect()
}
