/// Shared configuration constants for heightfield processing
pub mod render_settings;
pub mod terrain;
