/// Pre/post heightfield converter driving mesh export, surface queries and change maps.
use crate::dds_writer::write_r32f_texture;
use crate::manifest::{ChangeInfo, ManifestGenerator, QueryInfo, SceneManifest, SurfaceInfo};
use glam::Vec2;
use heightfield_engine::{Mesh, SurfaceDistance, TerrainConfig, TerrainPair, TerrainResult, Vertex};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

const STAGES: u64 = 5;

/// Grid-space query run against both surfaces.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest {
    pub start: Vec2,
    pub end: Vec2,
    pub dh: f32,
}

/// Converts a pair of raw elevation files into renderer buffers plus a manifest.
pub struct HeightfieldConverter {
    /// Raw pre-event elevation file.
    pre_path: PathBuf,
    /// Raw post-event elevation file.
    post_path: PathBuf,
    /// Directory receiving pre/, post/, change.dds and manifest.json.
    output_dir: PathBuf,
    config: TerrainConfig,
}

impl HeightfieldConverter {
    /// Output defaults to the directory holding the pre-event file.
    pub fn new(
        pre_path: &Path,
        post_path: &Path,
        output_dir: Option<&Path>,
        config: TerrainConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        for path in [pre_path, post_path] {
            if !path.is_file() {
                return Err(format!("Elevation file does not exist: {}", path.display()).into());
            }
        }
        config.validate()?;

        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => pre_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };

        Ok(Self {
            pre_path: pre_path.to_path_buf(),
            post_path: post_path.to_path_buf(),
            output_dir,
            config,
        })
    }

    /// Runs the full pipeline and returns the manifest path.
    pub fn convert(&self, query: &QueryRequest) -> Result<PathBuf, Box<dyn std::error::Error>> {
        println!(
            "Converting {} and {} ({}x{} heightfields)...",
            self.pre_path.display(),
            self.post_path.display(),
            self.config.width,
            self.config.height
        );

        let pb = ProgressBar::new(STAGES);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} stages ({percent}%) {msg}")?
                .progress_chars("▉▊▋▌▍▎▏ "),
        );

        pb.set_message("Loading heightfields");
        let pre_bytes = fs::read(&self.pre_path)?;
        let post_bytes = fs::read(&self.post_path)?;
        let pair = TerrainPair::from_bytes(&pre_bytes, &post_bytes, &self.config)?;
        pb.inc(1);

        pb.set_message("Building meshes");
        let meshes = pair.build_meshes();
        pb.inc(1);

        pb.set_message("Integrating surface distance");
        let distances = pair.surface_distance(query.start, query.end, Some(query.dh));
        pb.inc(1);

        pb.set_message("Computing terrain change");
        let change = pair.change()?;
        pb.inc(1);

        pb.set_message("Writing buffers");
        fs::create_dir_all(&self.output_dir)?;
        let pre = self.write_surface("pre", &self.pre_path, &meshes.pre, &distances.pre)?;
        let post = self.write_surface("post", &self.post_path, &meshes.post, &distances.post)?;

        let change_path = self.output_dir.join("change.dds");
        write_r32f_texture(&change_path, change.width(), change.height(), change.deltas())?;
        pb.inc(1);
        pb.finish_with_message("Conversion complete");

        self.print_distances(query, &distances.pre, &distances.post);

        let manifest = SceneManifest {
            config: self.config.clone(),
            pre,
            post,
            query: QueryInfo {
                start: query.start.to_array(),
                end: query.end.to_array(),
                dh: query.dh,
            },
            change: ChangeInfo {
                texture: "change.dds".to_string(),
                summary: *change.summary(),
            },
        };
        ManifestGenerator::new(&self.output_dir).write(&manifest)
    }

    /// Writes mesh and path buffers for one surface into `<output>/<label>/`.
    fn write_surface(
        &self,
        label: &str,
        source: &Path,
        mesh: &Mesh,
        distance: &TerrainResult<SurfaceDistance>,
    ) -> Result<SurfaceInfo, Box<dyn std::error::Error>> {
        let surface_dir = self.output_dir.join(label);
        fs::create_dir_all(&surface_dir)?;

        fs::write(surface_dir.join("vertices.bin"), mesh.vertex_bytes())?;
        fs::write(surface_dir.join("indices.bin"), mesh.index_bytes())?;

        let mut info = SurfaceInfo {
            source: source.display().to_string(),
            vertices: format!("{}/vertices.bin", label),
            indices: format!("{}/indices.bin", label),
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
            vertex_stride_bytes: std::mem::size_of::<Vertex>(),
            path: None,
            path_segments: 0,
            surface_distance_m: None,
            query_error: None,
        };

        match distance {
            Ok(result) => {
                fs::write(surface_dir.join("path.bin"), result.path.vertex_bytes())?;
                info.path = Some(format!("{}/path.bin", label));
                info.path_segments = result.path.len();
                info.surface_distance_m = Some(result.distance);
            }
            Err(err) => {
                // A failed query leaves the rest of the export intact
                log::warn!("{} surface query failed: {}", label, err);
                info.query_error = Some(err.to_string());
            }
        }

        Ok(info)
    }

    fn print_distances(
        &self,
        query: &QueryRequest,
        pre: &TerrainResult<SurfaceDistance>,
        post: &TerrainResult<SurfaceDistance>,
    ) {
        println!(
            "Traversing from ({}, {}) to ({}, {})...",
            query.start.x, query.start.y, query.end.x, query.end.y
        );
        for (label, result) in [("Pre-Event", pre), ("Post-Event", post)] {
            match result {
                Ok(result) => println!(
                    "  Surface Distance {} is: {:.3} m ({} segments)",
                    label,
                    result.distance,
                    result.path.len()
                ),
                Err(err) => println!("  Surface Distance {} failed: {}", label, err),
            }
        }
    }
}
