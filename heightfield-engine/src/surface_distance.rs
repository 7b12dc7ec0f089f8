//! Surface-following distance between two grid points.
//!
//! The walk is a straight line in grid-parameter space, so the result
//! approximates the length of the terrain profile under that line, not a
//! shortest path over the surface.

use crate::config::TerrainConfig;
use crate::error::{Endpoints, TerrainError, TerrainResult};
use crate::heightfield::Heightfield;
use crate::mesh::Vertex;
use crate::sampler::BilinearSampler;
use bytemuck::{Pod, Zeroable};
use constants::render_settings::PATH_COLOUR;
use constants::terrain::DEGENERATE_QUERY_EPSILON;
use glam::{Vec2, Vec3, Vec4};

/// One line segment of a surface path.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PathSegment {
    pub start: Vertex,
    pub end: Vertex,
}

/// Line-list visualisation of a surface query, raised slightly above the terrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfacePath {
    segments: Vec<PathSegment>,
}

impl SurfacePath {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Flat vertex view for line-list rendering (two vertices per segment).
    pub fn vertices(&self) -> &[Vertex] {
        bytemuck::cast_slice(&self.segments)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.segments)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Outcome of a surface distance query.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDistance {
    /// Accumulated arc length in world units.
    pub distance: f32,
    pub path: SurfacePath,
    pub steps: usize,
    pub dh: f32,
}

impl SurfaceDistance {
    fn degenerate(dh: f32) -> Self {
        Self {
            distance: 0.0,
            path: SurfacePath::default(),
            steps: 0,
            dh,
        }
    }

    /// Start and end coincide; distance is zero and the path empty.
    pub fn is_degenerate(&self) -> bool {
        self.steps == 0
    }
}

/// Walks a heightfield between two grid points, integrating arc length.
///
/// Termination happens once the walk is within `2 * dh` of the target, so the
/// final partial step is not counted and the path stops short of the target.
pub struct SurfaceDistanceIntegrator<'a> {
    heightfield: &'a Heightfield,
    sampler: BilinearSampler<'a>,
    vertical_offset: f32,
    max_steps: usize,
}

impl<'a> SurfaceDistanceIntegrator<'a> {
    pub fn new(heightfield: &'a Heightfield, config: &TerrainConfig) -> Self {
        Self {
            heightfield,
            sampler: BilinearSampler::new(heightfield),
            vertical_offset: config.path_vertical_offset,
            max_steps: config.max_query_steps,
        }
    }

    /// Surface distance from `start` to `end` in grid coordinates with step `dh`.
    pub fn distance(&self, start: Vec2, end: Vec2, dh: f32) -> TerrainResult<SurfaceDistance> {
        if !(dh.is_finite() && dh > 0.0) {
            return Err(TerrainError::InvalidStep { dh });
        }
        self.check_endpoints(start, end)?;

        let delta = end - start;
        let mag = delta.length();
        if mag < DEGENERATE_QUERY_EPSILON {
            log::debug!("Degenerate surface query at {}", start);
            return Ok(SurfaceDistance::degenerate(dh));
        }

        let budget = step_budget(mag, dh);
        if budget > self.max_steps {
            log::warn!(
                "Rejecting surface query {} -> {}: {} steps exceeds limit {}",
                start,
                end,
                budget,
                self.max_steps
            );
            return Err(TerrainError::StepLimitExceeded {
                limit: self.max_steps,
            });
        }

        let step = delta * (dh / mag);
        let m_per_pix = self.heightfield.m_per_pix();
        let m_per_height = self.heightfield.m_per_height();
        let planar_sq = (step.x * m_per_pix).powi(2) + (step.y * m_per_pix).powi(2);

        let mut current = start;
        let mut z = self.sampler.sample(current.x, current.y)?;
        let mut sd = 0.0f64;
        let mut steps = 0usize;
        let mut path = SurfacePath::with_capacity(budget);

        while current.distance(end) > 2.0 * dh {
            if steps >= budget {
                return Err(TerrainError::StepLimitExceeded { limit: budget });
            }

            // Measured from the start so rounding does not accumulate along the walk
            let next = start + step * (steps + 1) as f32;
            let nz = self.sampler.sample(next.x, next.y)?;

            let rise = (nz - z) * m_per_height;
            sd += ((planar_sq + rise * rise) as f64).sqrt();

            path.segments.push(PathSegment {
                start: self.path_vertex(current, z),
                end: self.path_vertex(next, nz),
            });

            current = next;
            z = nz;
            steps += 1;
        }

        log::debug!(
            "Surface distance {} -> {}: {:.3} m over {} steps",
            start,
            end,
            sd,
            steps
        );

        Ok(SurfaceDistance {
            distance: sd as f32,
            path,
            steps,
            dh,
        })
    }

    /// Upper bound on `|d(a, b) - d(b, a)|` for a step of `dh`.
    ///
    /// Twice the longest step the walk can take on this heightfield.
    pub fn reversal_tolerance(&self, dh: f32) -> f32 {
        let hf = self.heightfield;
        2.0 * dh * (hf.m_per_pix() + hf.m_per_height() * hf.max_slope() as f32)
    }

    fn check_endpoints(&self, start: Vec2, end: Vec2) -> TerrainResult<()> {
        let width = self.heightfield.width();
        let height = self.heightfield.height();
        let inside = |p: Vec2| p.x >= 0.0 && p.x < width as f32 && p.y >= 0.0 && p.y < height as f32;

        let which = match (inside(start), inside(end)) {
            (true, true) => return Ok(()),
            (false, true) => Endpoints::Start,
            (true, false) => Endpoints::End,
            (false, false) => Endpoints::Both,
        };
        log::warn!("Surface query endpoint out of range: {} ({} -> {})", which, start, end);
        Err(TerrainError::EndpointOutOfRange {
            which,
            start,
            end,
            width,
            height,
        })
    }

    fn path_vertex(&self, point: Vec2, elevation: f32) -> Vertex {
        let position =
            self.heightfield.to_world(point.x, point.y, elevation) + Vec3::Y * self.vertical_offset;
        Vertex::new(position, Vec3::ZERO, Vec4::from_array(PATH_COLOUR))
    }
}

/// Most steps a walk of planar length `mag` can take with step `dh`.
fn step_budget(mag: f32, dh: f32) -> usize {
    let steps = (mag as f64 / dh as f64).ceil() + 2.0;
    if steps >= usize::MAX as f64 {
        usize::MAX
    } else {
        steps as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(width: usize, height: usize, elevation: u8) -> (Heightfield, TerrainConfig) {
        let config = TerrainConfig::with_size(width, height);
        let hf = Heightfield::from_bytes(&vec![elevation; width * height], &config).unwrap();
        (hf, config)
    }

    #[test]
    fn test_same_point_is_degenerate() {
        let (hf, config) = flat(16, 16, 7);
        let integrator = SurfaceDistanceIntegrator::new(&hf, &config);
        let result = integrator
            .distance(Vec2::new(3.0, 4.0), Vec2::new(3.0, 4.0), 0.1)
            .unwrap();
        assert_eq!(result.distance, 0.0);
        assert!(result.path.is_empty());
        assert!(result.is_degenerate());
    }

    #[test]
    fn test_degenerate_on_last_column() {
        // Degenerate queries finish before any sampling
        let (hf, config) = flat(16, 16, 7);
        let integrator = SurfaceDistanceIntegrator::new(&hf, &config);
        let p = Vec2::new(15.0, 15.0);
        assert_eq!(integrator.distance(p, p, 0.1).unwrap().distance, 0.0);
    }

    #[test]
    fn test_rejects_bad_step_first() {
        let (hf, config) = flat(16, 16, 7);
        let integrator = SurfaceDistanceIntegrator::new(&hf, &config);
        let far = Vec2::new(100.0, 100.0);
        assert_eq!(
            integrator.distance(Vec2::ZERO, far, 0.0),
            Err(TerrainError::InvalidStep { dh: 0.0 })
        );
        assert!(matches!(
            integrator.distance(Vec2::ZERO, Vec2::ONE, -1.0),
            Err(TerrainError::InvalidStep { .. })
        ));
    }

    #[test]
    fn test_endpoint_out_of_range_names_endpoint() {
        let (hf, config) = flat(16, 16, 7);
        let integrator = SurfaceDistanceIntegrator::new(&hf, &config);

        let err = integrator
            .distance(Vec2::new(1.0, 1.0), Vec2::new(16.0, 2.0), 0.1)
            .unwrap_err();
        assert!(matches!(
            err,
            TerrainError::EndpointOutOfRange {
                which: Endpoints::End,
                ..
            }
        ));

        let err = integrator
            .distance(Vec2::new(-1.0, 1.0), Vec2::new(2.0, 20.0), 0.1)
            .unwrap_err();
        assert!(matches!(
            err,
            TerrainError::EndpointOutOfRange {
                which: Endpoints::Both,
                ..
            }
        ));
    }

    #[test]
    fn test_start_on_last_row_is_out_of_domain() {
        let (hf, config) = flat(16, 16, 7);
        let integrator = SurfaceDistanceIntegrator::new(&hf, &config);
        let result = integrator.distance(Vec2::new(15.0, 3.0), Vec2::new(2.0, 3.0), 0.1);
        assert!(matches!(result, Err(TerrainError::OutOfDomain { .. })));
    }

    #[test]
    fn test_flat_distance_and_path() {
        let (hf, config) = flat(32, 32, 10);
        let integrator = SurfaceDistanceIntegrator::new(&hf, &config);
        let result = integrator
            .distance(Vec2::new(2.0, 5.0), Vec2::new(12.0, 5.0), 0.5)
            .unwrap();

        // 10 cells, stops once within 1.0 of the target: 18 steps of 0.5
        assert_eq!(result.steps, 18);
        assert!((result.distance - 18.0 * 0.5 * 30.0).abs() < 1e-2);
        assert_eq!(result.path.len(), 18);
        assert_eq!(result.path.vertices().len(), 36);

        let first = result.path.segments()[0];
        assert_eq!(first.start.position, [60.0, 111.0, 150.0]);
        assert_eq!(first.start.normal, [0.0; 3]);
        assert_eq!(first.start.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(first.end.position, [75.0, 111.0, 150.0]);

        // segments chain end to start
        for pair in result.path.segments().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_step_limit() {
        let config = TerrainConfig {
            max_query_steps: 100,
            ..TerrainConfig::with_size(64, 64)
        };
        let hf = Heightfield::from_bytes(&[0u8; 64 * 64], &config).unwrap();
        let integrator = SurfaceDistanceIntegrator::new(&hf, &config);
        let result = integrator.distance(Vec2::ZERO, Vec2::new(50.0, 0.0), 0.1);
        assert_eq!(result, Err(TerrainError::StepLimitExceeded { limit: 100 }));
        assert!(integrator.distance(Vec2::ZERO, Vec2::new(5.0, 0.0), 0.1).is_ok());
    }
}
