use crate::foundation::error::{DriftError, DriftResult};

pub use kurbo::Vec2;

/// Absolute 0-based frame index in the generated sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// One-based number used in output file names.
    pub fn one_based(self) -> u64 {
        self.0 + 1
    }

    /// Timestamp of this frame: `index * (duration / total_frames)`.
    ///
    /// `total_frames` is floored at 1 so an empty sequence never divides by zero.
    pub fn timestamp_secs(self, duration_secs: f64, total_frames: u64) -> f64 {
        (self.0 as f64) * (duration_secs / (total_frames.max(1) as f64))
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> DriftResult<Self> {
        if width == 0 || height == 0 {
            return Err(DriftError::config(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Signed top-left pixel position of the source image on the canvas.
///
/// Positions may lie partly or fully outside the canvas; compositing clips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PastePosition {
    /// Horizontal position (pixels from the left edge).
    pub x: i64,
    /// Vertical position (pixels from the top edge).
    pub y: i64,
}

impl PastePosition {
    /// Create a position from raw coordinates.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Displace by a sub-pixel offset and snap to the nearest pixel (ties to even).
    pub fn displaced(self, offset: Vec2) -> Self {
        Self {
            x: ((self.x as f64) + offset.x).round_ties_even() as i64,
            y: ((self.y as f64) + offset.y).round_ties_even() as i64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
