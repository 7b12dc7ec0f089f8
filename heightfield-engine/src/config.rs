//! Terrain configuration shared by heightfield construction and surface queries.

use crate::error::{TerrainError, TerrainResult};
use constants::render_settings::PATH_VERTICAL_OFFSET;
use constants::terrain::{
    GRID_HEIGHT, GRID_WIDTH, MAX_QUERY_STEPS, METRES_PER_HEIGHT, METRES_PER_PIXEL,
    SURFACE_DISTANCE_STEP,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest grid whose vertices all fit a u32 index.
const MAX_GRID_SAMPLES: u64 = u32::MAX as u64 + 1;

/// Grid dimensions, world scales and query defaults.
/// Missing fields fall back to the workspace constants when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub height: usize,
    /// Horizontal metres per grid step.
    pub m_per_pix: f32,
    /// Vertical metres per elevation unit.
    pub m_per_height: f32,
    /// Default integration step for surface queries, in grid units.
    pub dh: f32,
    /// Lift applied to path vertices above the surface.
    pub path_vertical_offset: f32,
    pub max_query_steps: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            m_per_pix: METRES_PER_PIXEL,
            m_per_height: METRES_PER_HEIGHT,
            dh: SURFACE_DISTANCE_STEP,
            path_vertical_offset: PATH_VERTICAL_OFFSET,
            max_query_steps: MAX_QUERY_STEPS,
        }
    }
}

impl TerrainConfig {
    /// Config for a `width` x `height` grid with default scales.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Load a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let config: TerrainConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of samples a raw elevation buffer must hold.
    /// Saturates on overflow; `validate` rejects such grids.
    pub fn sample_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn validate(&self) -> TerrainResult<()> {
        if self.width < 2 || self.height < 2 {
            return Err(TerrainError::InvalidConfig(format!(
                "grid must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        // Mesh indices are u32, so every vertex must be addressable by one
        let samples = self.width.checked_mul(self.height);
        if samples.is_none_or(|n| n as u64 > MAX_GRID_SAMPLES) {
            return Err(TerrainError::InvalidConfig(format!(
                "grid {}x{} exceeds {} samples",
                self.width, self.height, MAX_GRID_SAMPLES
            )));
        }
        if !(self.m_per_pix.is_finite() && self.m_per_pix > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "m_per_pix must be positive, got {}",
                self.m_per_pix
            )));
        }
        if !(self.m_per_height.is_finite() && self.m_per_height >= 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "m_per_height must be non-negative, got {}",
                self.m_per_height
            )));
        }
        if !(self.dh.is_finite() && self.dh > 0.0) {
            return Err(TerrainError::InvalidStep { dh: self.dh });
        }
        if !self.path_vertical_offset.is_finite() {
            return Err(TerrainError::InvalidConfig(
                "path_vertical_offset must be finite".to_string(),
            ));
        }
        if self.max_query_steps == 0 {
            return Err(TerrainError::InvalidConfig(
                "max_query_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
