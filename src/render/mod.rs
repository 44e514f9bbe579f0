//! Frame compositing.

/// Pixel-level compositing primitives.
pub mod composite;
/// Frame rendering, naming and persistence.
pub mod frame;
