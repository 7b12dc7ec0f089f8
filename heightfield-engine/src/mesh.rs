//! Renderable triangle mesh built from a heightfield.

use crate::heightfield::Heightfield;
use crate::normals::{NormalEstimator, world_positions};
use bytemuck::{Pod, Zeroable};
use constants::render_settings::{ELEVATION_COLOUR_SCALE, INDICES_PER_CELL};
use glam::{Vec3, Vec4};
use rayon::prelude::*;

/// GPU vertex layout: position(3) + normal(3) + colour(4), tightly packed f32.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Placeholder greyscale ramp from raw elevation.
pub fn elevation_colour(elevation: f32) -> Vec4 {
    let grey = ELEVATION_COLOUR_SCALE * elevation;
    Vec4::new(grey, grey, grey, 1.0)
}

/// Static terrain geometry: one vertex per grid sample and two triangles per cell.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub width: usize,
    pub height: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex buffer for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index buffer for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn vertex(&self, i: usize, j: usize) -> Option<&Vertex> {
        if i >= self.width || j >= self.height {
            return None;
        }
        self.vertices.get(j * self.width + i)
    }
}

/// Builds the terrain mesh. Positions are computed first; normals need every position.
pub struct MeshBuilder<'a> {
    heightfield: &'a Heightfield,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(heightfield: &'a Heightfield) -> Self {
        Self { heightfield }
    }

    pub fn build(&self) -> Mesh {
        let hf = self.heightfield;
        let width = hf.width();
        let height = hf.height();

        let positions = world_positions(hf);

        let estimator = NormalEstimator::new(hf, &positions);
        let vertices: Vec<Vertex> = positions
            .par_chunks(width)
            .enumerate()
            .flat_map_iter(|(j, row)| {
                let estimator = &estimator;
                row.iter().enumerate().map(move |(i, &position)| {
                    Vertex::new(
                        position,
                        estimator.normal(i, j),
                        elevation_colour(hf.elevation(i, j)),
                    )
                })
            })
            .collect();

        let indices = triangulate(width, height);

        log::debug!(
            "Built terrain mesh: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );

        Mesh {
            width,
            height,
            vertices,
            indices,
        }
    }
}

/// Index list splitting each quad along its `(i+1, j)`-`(i, j+1)` diagonal.
///
/// The diagonal must match the triangles `BilinearSampler` interpolates over.
pub fn triangulate(width: usize, height: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(INDICES_PER_CELL * (width - 1) * (height - 1));
    let w = width as u32;

    for i in 0..w - 1 {
        for j in 0..height as u32 - 1 {
            // top triangle
            indices.push(w * j + i);
            indices.push(w * j + i + 1);
            indices.push(w * (j + 1) + i);

            // bottom triangle
            indices.push(w * (j + 1) + i);
            indices.push(w * j + i + 1);
            indices.push(w * (j + 1) + i + 1);
        }
    }
    indices
}
