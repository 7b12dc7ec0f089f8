/// Default heightfield grid width in samples
pub const GRID_WIDTH: usize = 512;

/// Default heightfield grid height in samples
pub const GRID_HEIGHT: usize = 512;

/// Horizontal world units (metres) per grid step
pub const METRES_PER_PIXEL: f32 = 30.0;

/// Vertical world units (metres) per elevation unit
pub const METRES_PER_HEIGHT: f32 = 11.0;

/// Default integration step in grid-parameter units
pub const SURFACE_DISTANCE_STEP: f32 = 0.1;

/// Planar query length below which a distance query is degenerate
pub const DEGENERATE_QUERY_EPSILON: f32 = 1e-4;

/// Upper bound on integration steps for a single query
pub const MAX_QUERY_STEPS: usize = 1_000_000;

/// Demo query start used by the pre/post comparison (grid coordinates)
pub const DEMO_QUERY_START: (u32, u32) = (100, 90);

/// Demo query end used by the pre/post comparison (grid coordinates)
pub const DEMO_QUERY_END: (u32, u32) = (400, 500);
