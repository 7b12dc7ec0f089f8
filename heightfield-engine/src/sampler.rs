//! Piecewise-linear elevation sampling over the mesh triangulation.

use crate::error::{TerrainError, TerrainResult};
use crate::heightfield::Heightfield;

/// Samples elevation at continuous grid coordinates.
///
/// Each cell is split into the same two triangles the mesh uses, so the
/// sampled surface is exactly the rendered surface: the top-left triangle
/// `(i,j) (i+1,j) (i,j+1)` and the bottom-right triangle
/// `(i,j+1) (i+1,j) (i+1,j+1)`.
#[derive(Debug, Clone, Copy)]
pub struct BilinearSampler<'a> {
    heightfield: &'a Heightfield,
}

impl<'a> BilinearSampler<'a> {
    pub fn new(heightfield: &'a Heightfield) -> Self {
        Self { heightfield }
    }

    /// Interpolated elevation (in elevation units) at `(x, y)`.
    /// Valid for `0 <= x < width - 1` and `0 <= y < height - 1`.
    pub fn sample(&self, x: f32, y: f32) -> TerrainResult<f32> {
        let hf = self.heightfield;
        let max_x = (hf.width() - 1) as f32;
        let max_y = (hf.height() - 1) as f32;

        // Negated comparisons also reject NaN
        if !(x >= 0.0 && x < max_x && y >= 0.0 && y < max_y) {
            return Err(TerrainError::OutOfDomain {
                x,
                y,
                width: hf.width(),
                height: hf.height(),
            });
        }

        let ax = x.floor() as usize;
        let ay = y.floor() as usize;
        let bx = ax + 1;
        let by = ay + 1;

        // Corner heights clockwise around the cell
        let z0 = hf.elevation(ax, ay);
        let z1 = hf.elevation(bx, ay);
        let z2 = hf.elevation(bx, by);
        let z3 = hf.elevation(ax, by);

        let dx = x - ax as f32;
        let dy = y - ay as f32;

        if dx + dy < 1.0 {
            Ok(top_triangle(z0, z1, z3, dx, dy))
        } else {
            Ok(bottom_triangle(z1, z2, z3, dx, dy))
        }
    }
}

/// Plane through `z0 (0,0)`, `z1 (1,0)`, `z3 (0,1)`.
#[inline]
fn top_triangle(z0: f32, z1: f32, z3: f32, dx: f32, dy: f32) -> f32 {
    // interpolate along x on the top edge, then rise towards z3
    let xlerp = z0 * (1.0 - dx) + z1 * dx;
    xlerp + (z3 - z0) * dy
}

/// Plane through `z1 (1,0)`, `z2 (1,1)`, `z3 (0,1)`.
#[inline]
fn bottom_triangle(z1: f32, z2: f32, z3: f32, dx: f32, dy: f32) -> f32 {
    // interpolate along x on the bottom edge, then rise towards z1
    let xlerp = z3 * (1.0 - dx) + z2 * dx;
    xlerp + (z1 - z2) * (1.0 - dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;

    fn cell(z0: u8, z1: u8, z3: u8, z2: u8) -> Heightfield {
        // 3x3 grid so (0..2)x(0..2) is a valid domain; the first cell holds the corners
        let data = [z0, z1, 0, z3, z2, 0, 0, 0, 0];
        Heightfield::from_bytes(&data, &TerrainConfig::with_size(3, 3)).unwrap()
    }

    #[test]
    fn test_corners_are_exact() {
        let hf = cell(10, 20, 30, 40);
        let sampler = BilinearSampler::new(&hf);
        assert_eq!(sampler.sample(0.0, 0.0).unwrap(), 10.0);
        assert_eq!(sampler.sample(1.0, 0.0).unwrap(), 20.0);
        assert_eq!(sampler.sample(0.0, 1.0).unwrap(), 30.0);
        assert_eq!(sampler.sample(1.0, 1.0).unwrap(), 40.0);
    }

    #[test]
    fn test_triangles_are_planar() {
        let hf = cell(10, 20, 30, 40);
        let sampler = BilinearSampler::new(&hf);

        // z = 10 + 10 dx + 20 dy
        let top = sampler.sample(0.25, 0.5).unwrap();
        assert!((top - 22.5).abs() < 1e-5);

        // z = 30 + 10 dx - 20 (1 - dy)
        let bottom = sampler.sample(0.75, 0.75).unwrap();
        assert!((bottom - 32.5).abs() < 1e-5);
    }

    #[test]
    fn test_matches_edge_lerp() {
        let hf = cell(10, 20, 30, 40);
        let sampler = BilinearSampler::new(&hf);
        // Left edge (top triangle) and bottom edge (bottom triangle) are plain lerps
        assert!((sampler.sample(0.0, 0.4).unwrap() - 18.0).abs() < 1e-5);
        assert!((sampler.sample(0.3, 1.0).unwrap() - 33.0).abs() < 1e-5);
        // Right edge of the first cell through the bottom triangle
        assert!((sampler.sample(0.999_999, 0.5).unwrap() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_diagonal_continuity() {
        let (z0, z1, z2, z3) = (0.0, 200.0, 17.0, 90.0);
        for step in 0..=20 {
            let dx = step as f32 / 20.0;
            let dy = 1.0 - dx;
            let top = top_triangle(z0, z1, z3, dx, dy);
            let bottom = bottom_triangle(z1, z2, z3, dx, dy);
            assert!((top - bottom).abs() < 1e-3, "dx={dx}: {top} vs {bottom}");
        }
    }

    #[test]
    fn test_out_of_domain() {
        let hf = cell(0, 0, 0, 0);
        let sampler = BilinearSampler::new(&hf);
        assert!(matches!(
            sampler.sample(2.0, 0.5),
            Err(TerrainError::OutOfDomain { .. })
        ));
        assert!(sampler.sample(-0.01, 0.5).is_err());
        assert!(sampler.sample(0.5, 2.0).is_err());
        assert!(sampler.sample(f32::NAN, 0.5).is_err());
        assert!(sampler.sample(1.999, 1.999).is_ok());
    }
}
