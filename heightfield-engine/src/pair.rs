//! Pre/post event heightfields compared side by side.

use crate::change::TerrainChange;
use crate::config::TerrainConfig;
use crate::error::TerrainResult;
use crate::heightfield::Heightfield;
use crate::mesh::{Mesh, MeshBuilder};
use crate::surface_distance::{SurfaceDistance, SurfaceDistanceIntegrator};
use glam::Vec2;

/// Meshes for both surfaces of a terrain pair.
#[derive(Debug, Clone)]
pub struct PairedMeshes {
    pub pre: Mesh,
    pub post: Mesh,
}

/// Results of one query run against both surfaces.
/// Each side fails independently, so one bad surface does not hide the other.
#[derive(Debug, Clone)]
pub struct PairedDistance {
    pub pre: TerrainResult<SurfaceDistance>,
    pub post: TerrainResult<SurfaceDistance>,
}

/// Owns the pre-event and post-event heightfields of the same area.
#[derive(Debug, Clone)]
pub struct TerrainPair {
    config: TerrainConfig,
    pre: Heightfield,
    post: Heightfield,
}

impl TerrainPair {
    pub fn from_bytes(pre: &[u8], post: &[u8], config: &TerrainConfig) -> TerrainResult<Self> {
        Ok(Self {
            config: config.clone(),
            pre: Heightfield::from_bytes(pre, config)?,
            post: Heightfield::from_bytes(post, config)?,
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn pre(&self) -> &Heightfield {
        &self.pre
    }

    pub fn post(&self) -> &Heightfield {
        &self.post
    }

    pub fn build_meshes(&self) -> PairedMeshes {
        let (pre, post) = rayon::join(
            || MeshBuilder::new(&self.pre).build(),
            || MeshBuilder::new(&self.post).build(),
        );
        PairedMeshes { pre, post }
    }

    /// Runs the same query on both surfaces. `dh` defaults to the configured step.
    pub fn surface_distance(&self, start: Vec2, end: Vec2, dh: Option<f32>) -> PairedDistance {
        let dh = dh.unwrap_or(self.config.dh);
        let (pre, post) = rayon::join(
            || SurfaceDistanceIntegrator::new(&self.pre, &self.config).distance(start, end, dh),
            || SurfaceDistanceIntegrator::new(&self.post, &self.config).distance(start, end, dh),
        );
        PairedDistance { pre, post }
    }

    pub fn change(&self) -> TerrainResult<TerrainChange> {
        TerrainChange::between(&self.pre, &self.post)
    }
}
