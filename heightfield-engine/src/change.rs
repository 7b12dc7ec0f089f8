//! Elevation change between a pre-event and post-event heightfield.

use crate::error::{TerrainError, TerrainResult};
use crate::heightfield::Heightfield;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Aggregate statistics of a terrain change, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub min_delta_m: f32,
    pub max_delta_m: f32,
    pub mean_delta_m: f32,
    pub changed_cells: usize,
    /// Volume lost where the surface dropped, m³.
    pub removed_volume_m3: f64,
    /// Volume gained where the surface rose, m³.
    pub added_volume_m3: f64,
}

impl ChangeSummary {
    pub fn net_volume_m3(&self) -> f64 {
        self.added_volume_m3 - self.removed_volume_m3
    }
}

/// Per-cell vertical change `post - pre` in metres, row-major.
#[derive(Debug, Clone)]
pub struct TerrainChange {
    width: usize,
    height: usize,
    deltas: Vec<f32>,
    summary: ChangeSummary,
}

impl TerrainChange {
    pub fn between(pre: &Heightfield, post: &Heightfield) -> TerrainResult<Self> {
        if !pre.is_compatible(post) {
            return Err(TerrainError::DimensionMismatch {
                pre: pre.describe(),
                post: post.describe(),
            });
        }

        let m_per_height = pre.m_per_height();
        let deltas: Vec<f32> = pre
            .samples()
            .par_iter()
            .zip(post.samples().par_iter())
            .map(|(&before, &after)| (after as f32 - before as f32) * m_per_height)
            .collect();

        let cell_area = (pre.m_per_pix() as f64).powi(2);
        let mut summary = ChangeSummary {
            min_delta_m: f32::INFINITY,
            max_delta_m: f32::NEG_INFINITY,
            ..ChangeSummary::default()
        };
        let mut total = 0.0f64;
        for &delta in &deltas {
            summary.min_delta_m = summary.min_delta_m.min(delta);
            summary.max_delta_m = summary.max_delta_m.max(delta);
            total += delta as f64;
            if delta > 0.0 {
                summary.changed_cells += 1;
                summary.added_volume_m3 += delta as f64 * cell_area;
            } else if delta < 0.0 {
                summary.changed_cells += 1;
                summary.removed_volume_m3 += -delta as f64 * cell_area;
            }
        }
        summary.mean_delta_m = (total / deltas.len() as f64) as f32;

        log::debug!(
            "Terrain change: {} cells changed, net {:.1} m3",
            summary.changed_cells,
            summary.net_volume_m3()
        );

        Ok(Self {
            width: pre.width(),
            height: pre.height(),
            deltas,
            summary,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn deltas(&self) -> &[f32] {
        &self.deltas
    }

    pub fn delta(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.width || j >= self.height {
            return None;
        }
        self.deltas.get(j * self.width + i).copied()
    }

    pub fn summary(&self) -> &ChangeSummary {
        &self.summary
    }
}
