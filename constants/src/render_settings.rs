/// Greyscale factor applied to raw elevation for vertex colour
pub const ELEVATION_COLOUR_SCALE: f32 = 0.004;

/// Vertical lift applied to surface path vertices to avoid z-fighting with the mesh
pub const PATH_VERTICAL_OFFSET: f32 = 1.0;

/// Surface path line colour (opaque red)
pub const PATH_COLOUR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Floats per vertex: position(3) + normal(3) + colour(4)
pub const VERTEX_FLOAT_COUNT: usize = 10;

/// Indices emitted per grid cell (two triangles)
pub const INDICES_PER_CELL: usize = 6;
