//! Heightfield geometry and surface-distance engine.
//!
//! Turns raw 8-bit elevation grids into renderable meshes and answers
//! surface-following distance queries between grid points. Loading bytes
//! and GPU upload are left to the caller.

pub mod change;
pub mod config;
pub mod error;
pub mod heightfield;
pub mod mesh;
pub mod normals;
pub mod pair;
pub mod sampler;
pub mod surface_distance;

pub use change::{ChangeSummary, TerrainChange};
pub use config::TerrainConfig;
pub use error::{Endpoints, TerrainError, TerrainResult};
pub use heightfield::Heightfield;
pub use mesh::{Mesh, MeshBuilder, Vertex};
pub use normals::{NormalEstimator, compute_normals};
pub use pair::{PairedDistance, PairedMeshes, TerrainPair};
pub use sampler::BilinearSampler;
pub use surface_distance::{PathSegment, SurfaceDistance, SurfaceDistanceIntegrator, SurfacePath};

/// Load a heightfield from raw bytes.
pub fn load_heightfield(data: &[u8], config: &TerrainConfig) -> TerrainResult<Heightfield> {
    Heightfield::from_bytes(data, config)
}

/// Build the static terrain mesh.
pub fn build_mesh(heightfield: &Heightfield) -> Mesh {
    MeshBuilder::new(heightfield).build()
}

/// Surface distance between two grid points using step `dh`.
pub fn query_distance(
    heightfield: &Heightfield,
    config: &TerrainConfig,
    start: glam::Vec2,
    end: glam::Vec2,
    dh: f32,
) -> TerrainResult<SurfaceDistance> {
    SurfaceDistanceIntegrator::new(heightfield, config).distance(start, end, dh)
}
