//! Error taxonomy for heightfield construction, sampling and surface queries.

use glam::Vec2;
use std::fmt;

/// Result type for engine operations
pub type TerrainResult<T> = Result<T, TerrainError>;

/// Which endpoint(s) of a surface query fell outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoints {
    Start,
    End,
    Both,
}

impl fmt::Display for Endpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoints::Start => "start",
            Endpoints::End => "end",
            Endpoints::Both => "start and end",
        };
        f.write_str(name)
    }
}

/// Recoverable engine errors. None of these terminate the process.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    #[error("elevation buffer holds {actual} bytes, expected exactly {expected}")]
    MalformedInput { expected: usize, actual: usize },

    #[error("grid index ({i}, {j}) outside {width}x{height} heightfield")]
    IndexOutOfRange {
        i: usize,
        j: usize,
        width: usize,
        height: usize,
    },

    /// Continuous coordinates must satisfy `0 <= x < width - 1` and `0 <= y < height - 1`.
    #[error("sample point ({x}, {y}) outside interpolation domain of {width}x{height} heightfield")]
    OutOfDomain {
        x: f32,
        y: f32,
        width: usize,
        height: usize,
    },

    #[error("query {which} endpoint outside {width}x{height} grid (start {start}, end {end})")]
    EndpointOutOfRange {
        which: Endpoints,
        start: Vec2,
        end: Vec2,
        width: usize,
        height: usize,
    },

    #[error("integration step must be positive and finite, got {dh}")]
    InvalidStep { dh: f32 },

    #[error("surface query needs more than {limit} integration steps")]
    StepLimitExceeded { limit: usize },

    #[error("invalid terrain configuration: {0}")]
    InvalidConfig(String),

    #[error("heightfields differ: {pre} vs {post}")]
    DimensionMismatch { pre: String, post: String },
}
