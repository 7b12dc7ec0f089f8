/// Scene manifest describing the exported terrain buffers for the renderer.
use heightfield_engine::{ChangeSummary, TerrainConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Unified manifest linking both surfaces, the query and the change texture.
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Grid dimensions and scales every buffer was built with.
    pub config: TerrainConfig,
    pub pre: SurfaceInfo,
    pub post: SurfaceInfo,
    pub query: QueryInfo,
    pub change: ChangeInfo,
}

/// Buffers and query outcome for one surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct SurfaceInfo {
    /// Raw elevation file this surface was loaded from.
    pub source: String,
    /// Interleaved position(3) + normal(3) + colour(4) f32 vertices.
    pub vertices: String,
    /// u32 triangle list indices.
    pub indices: String,
    pub vertex_count: usize,
    pub index_count: usize,
    pub vertex_stride_bytes: usize,
    /// Line-list vertices of the surface path, absent when the query failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub path_segments: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_distance_m: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryInfo {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub dh: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeInfo {
    /// R32F texture of post - pre elevation in metres.
    pub texture: String,
    pub summary: ChangeSummary,
}

pub struct ManifestGenerator {
    output_dir: PathBuf,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Writes manifest.json to the output directory and returns its path.
    pub fn write(&self, manifest: &SceneManifest) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let manifest_path = self.output_dir.join("manifest.json");
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(&manifest_path, manifest_json)?;

        println!("Generated manifest: {}", manifest_path.display());
        self.print_summary(manifest);
        Ok(manifest_path)
    }

    fn print_summary(&self, manifest: &SceneManifest) {
        println!("Manifest Summary:");
        println!(
            "  Grid: {}x{} ({} m/pix, {} m/unit)",
            manifest.config.width,
            manifest.config.height,
            manifest.config.m_per_pix,
            manifest.config.m_per_height
        );
        for (label, surface) in [("Pre", &manifest.pre), ("Post", &manifest.post)] {
            println!(
                "  {} mesh: {} vertices, {} indices",
                label, surface.vertex_count, surface.index_count
            );
        }
        let summary = &manifest.change.summary;
        println!(
            "  Change: {} cells, {:.1} m to {:.1} m, net {:.0} m3",
            summary.changed_cells,
            summary.min_delta_m,
            summary.max_delta_m,
            summary.net_volume_m3()
        );
    }
}
