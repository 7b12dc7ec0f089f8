//! Per-vertex normals from central differences of world positions.

use crate::heightfield::Heightfield;
use glam::Vec3;
use rayon::prelude::*;

/// Estimates vertex normals from neighbouring world-space positions.
///
/// Neighbour indices are clamped at the grid border, which turns the central
/// difference into a one-sided difference on edge vertices.
pub struct NormalEstimator<'a> {
    heightfield: &'a Heightfield,
    positions: &'a [Vec3],
}

impl<'a> NormalEstimator<'a> {
    /// `positions` is the row-major world position of every grid vertex.
    pub fn new(heightfield: &'a Heightfield, positions: &'a [Vec3]) -> Self {
        debug_assert_eq!(positions.len(), heightfield.width() * heightfield.height());
        Self {
            heightfield,
            positions,
        }
    }

    /// Unit normal at `(i, j)`, or `Vec3::ZERO` when the two tangents are parallel.
    ///
    /// The zero vector only appears for a degenerate horizontal scale; it is
    /// returned as-is rather than replaced by an arbitrary direction.
    pub fn normal(&self, i: usize, j: usize) -> Vec3 {
        let width = self.heightfield.width();
        let height = self.heightfield.height();

        let i0 = i.saturating_sub(1);
        let i1 = (i + 1).min(width - 1);
        let j0 = j.saturating_sub(1);
        let j1 = (j + 1).min(height - 1);

        let dfdx = self.positions[width * j + i1] - self.positions[width * j + i0];
        let dfdy = self.positions[width * j1 + i] - self.positions[width * j0 + i];

        (-dfdx.cross(dfdy)).try_normalize().unwrap_or(Vec3::ZERO)
    }
}

/// World positions of every grid vertex, row-major.
pub fn world_positions(heightfield: &Heightfield) -> Vec<Vec3> {
    let width = heightfield.width();
    (0..width * heightfield.height())
        .into_par_iter()
        .map(|k| {
            let (i, j) = (k % width, k / width);
            heightfield.to_world(i as f32, j as f32, heightfield.elevation(i, j))
        })
        .collect()
}

/// Normal of every grid vertex, row-major.
pub fn compute_normals(heightfield: &Heightfield) -> Vec<Vec3> {
    let positions = world_positions(heightfield);
    let estimator = NormalEstimator::new(heightfield, &positions);
    let width = heightfield.width();
    (0..positions.len())
        .map(|k| estimator.normal(k % width, k / width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;

    #[test]
    fn test_flat_grid_points_up() {
        let hf = Heightfield::from_bytes(&[42u8; 16], &TerrainConfig::with_size(4, 4)).unwrap();
        for n in compute_normals(&hf) {
            assert!((n - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_slope_along_x() {
        // Elevation rises one unit per step in i: z = i
        let data: Vec<u8> = (0..4).flat_map(|_| 0u8..4).collect();
        let hf = Heightfield::from_bytes(&data, &TerrainConfig::with_size(4, 4)).unwrap();
        let normals = compute_normals(&hf);

        // Surface y = (11/30) x, normal leans against +x
        let expected = Vec3::new(-11.0, 30.0, 0.0).normalize();
        for n in &normals {
            assert!((*n - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_border_uses_one_sided_difference() {
        // Only the first column is raised; (0, 1) sees a one-sided step, (1, 1) a central one
        let mut data = vec![0u8; 9];
        for j in 0..3 {
            data[j * 3] = 3;
        }
        let hf = Heightfield::from_bytes(&data, &TerrainConfig::with_size(3, 3)).unwrap();
        let normals = compute_normals(&hf);

        // dfdx = (30, -33, 0) at the border, (60, -33, 0) in the interior
        let border = Vec3::new(33.0, 30.0, 0.0).normalize();
        let interior = Vec3::new(33.0, 60.0, 0.0).normalize();
        assert!((normals[3] - border).length() < 1e-5);
        assert!((normals[4] - interior).length() < 1e-5);
    }

    #[test]
    fn test_parallel_tangents_give_zero() {
        let hf = Heightfield::from_bytes(&[0u8; 4], &TerrainConfig::with_size(2, 2)).unwrap();

        let collapsed = vec![Vec3::ZERO; 4];
        let estimator = NormalEstimator::new(&hf, &collapsed);
        assert_eq!(estimator.normal(0, 0), Vec3::ZERO);
        assert_eq!(estimator.normal(1, 1), Vec3::ZERO);

        // Every vertex on one line: both tangents point along x
        let collinear: Vec<Vec3> = (0..4).map(|k| Vec3::new(k as f32, 0.0, 0.0)).collect();
        let estimator = NormalEstimator::new(&hf, &collinear);
        assert_eq!(estimator.normal(0, 0), Vec3::ZERO);
    }

    #[test]
    fn test_world_positions_row_major() {
        let data: Vec<u8> = (0..6).collect();
        let hf = Heightfield::from_bytes(&data, &TerrainConfig::with_size(3, 2)).unwrap();
        let positions = world_positions(&hf);
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[5], Vec3::new(60.0, 55.0, 30.0));
    }

    #[test]
    fn test_normals_are_unit_length() {
        let data: Vec<u8> = (0..64u32).map(|k| ((k * 37) % 255) as u8).collect();
        let hf = Heightfield::from_bytes(&data, &TerrainConfig::with_size(8, 8)).unwrap();
        for n in compute_normals(&hf) {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }
}
