//! Raw elevation grid with horizontal and vertical world scales.

use crate::config::TerrainConfig;
use crate::error::{TerrainError, TerrainResult};
use glam::Vec3;

/// Row-major grid of 8-bit elevation samples.
/// Index `(i, j)` lives at offset `j * width + i`.
#[derive(Debug, Clone)]
pub struct Heightfield {
    width: usize,
    height: usize,
    m_per_pix: f32,
    m_per_height: f32,
    samples: Vec<u8>,
}

impl Heightfield {
    /// Build a heightfield from a raw buffer of exactly `width * height` bytes.
    pub fn from_bytes(data: &[u8], config: &TerrainConfig) -> TerrainResult<Self> {
        config.validate()?;

        let expected = config.sample_count();
        if data.len() != expected {
            return Err(TerrainError::MalformedInput {
                expected,
                actual: data.len(),
            });
        }

        log::debug!(
            "Loaded {}x{} heightfield ({} m/pix, {} m/unit)",
            config.width,
            config.height,
            config.m_per_pix,
            config.m_per_height
        );

        Ok(Self {
            width: config.width,
            height: config.height,
            m_per_pix: config.m_per_pix,
            m_per_height: config.m_per_height,
            samples: data.to_vec(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn m_per_pix(&self) -> f32 {
        self.m_per_pix
    }

    pub fn m_per_height(&self) -> f32 {
        self.m_per_height
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Bounds-checked elevation at integer grid indices.
    pub fn sample(&self, i: usize, j: usize) -> TerrainResult<u8> {
        if i >= self.width || j >= self.height {
            return Err(TerrainError::IndexOutOfRange {
                i,
                j,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.samples[self.index(i, j)])
    }

    /// Linear offset of `(i, j)`. Callers guarantee the indices are in range.
    #[inline]
    pub(crate) fn index(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }

    /// Unchecked elevation lookup for in-range indices.
    #[inline]
    pub(crate) fn elevation(&self, i: usize, j: usize) -> f32 {
        self.samples[self.index(i, j)] as f32
    }

    /// World-space position of grid vertex `(i, j)`: x and z from the grid, y from elevation.
    pub fn world_position(&self, i: usize, j: usize) -> TerrainResult<Vec3> {
        let elevation = self.sample(i, j)?;
        Ok(self.to_world(i as f32, j as f32, elevation as f32))
    }

    /// Scale grid-parameter coordinates and an elevation value to world space.
    #[inline]
    pub fn to_world(&self, x: f32, y: f32, elevation: f32) -> Vec3 {
        Vec3::new(
            self.m_per_pix * x,
            self.m_per_height * elevation,
            self.m_per_pix * y,
        )
    }

    /// Largest elevation difference between horizontally or vertically adjacent samples.
    pub fn max_slope(&self) -> u8 {
        let mut max_step = 0u8;
        for j in 0..self.height {
            for i in 0..self.width {
                let here = self.samples[self.index(i, j)];
                if i + 1 < self.width {
                    max_step = max_step.max(here.abs_diff(self.samples[self.index(i + 1, j)]));
                }
                if j + 1 < self.height {
                    max_step = max_step.max(here.abs_diff(self.samples[self.index(i, j + 1)]));
                }
            }
        }
        max_step
    }

    /// True when both heightfields share dimensions and scales.
    pub fn is_compatible(&self, other: &Heightfield) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.m_per_pix == other.m_per_pix
            && self.m_per_height == other.m_per_height
    }

    /// Short human readable description of the grid shape and scales.
    pub fn describe(&self) -> String {
        format!(
            "{}x{} @ {} m/pix, {} m/unit",
            self.width, self.height, self.m_per_pix, self.m_per_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Heightfield {
        let data: Vec<u8> = (0..width * height).map(|k| (k % 251) as u8).collect();
        Heightfield::from_bytes(&data, &TerrainConfig::with_size(width, height)).unwrap()
    }

    #[test]
    fn test_row_major_indexing() {
        let hf = ramp(4, 3);
        assert_eq!(hf.sample(0, 0).unwrap(), 0);
        assert_eq!(hf.sample(3, 0).unwrap(), 3);
        assert_eq!(hf.sample(1, 2).unwrap(), 9);
    }

    #[test]
    fn test_sample_out_of_range() {
        let hf = ramp(4, 3);
        assert_eq!(
            hf.sample(4, 0),
            Err(TerrainError::IndexOutOfRange {
                i: 4,
                j: 0,
                width: 4,
                height: 3
            })
        );
        assert!(hf.sample(0, 3).is_err());
    }

    #[test]
    fn test_wrong_buffer_length() {
        let config = TerrainConfig::with_size(4, 4);
        let short = Heightfield::from_bytes(&[0u8; 15], &config);
        assert_eq!(
            short.unwrap_err(),
            TerrainError::MalformedInput {
                expected: 16,
                actual: 15
            }
        );
        assert!(Heightfield::from_bytes(&[0u8; 17], &config).is_err());
    }

    #[test]
    fn test_world_position_scales() {
        let config = TerrainConfig::with_size(3, 3);
        let mut data = vec![0u8; 9];
        data[5] = 10; // (2, 1)
        let hf = Heightfield::from_bytes(&data, &config).unwrap();
        let p = hf.world_position(2, 1).unwrap();
        assert_eq!(p, Vec3::new(60.0, 110.0, 30.0));
    }

    #[test]
    fn test_max_slope() {
        let config = TerrainConfig::with_size(3, 2);
        let hf = Heightfield::from_bytes(&[0, 5, 7, 1, 20, 7], &config).unwrap();
        assert_eq!(hf.max_slope(), 19);
    }
}
