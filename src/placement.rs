//! Base (undisplaced) placement of the source image.

use crate::config::BasePlacement;
use crate::foundation::core::{Canvas, PastePosition, Vec2};

/// Top-left position of an `image_w x image_h` image before any drift.
///
/// Centered placement uses floor division, so odd leftovers put the extra pixel on the
/// right/bottom. Explicit placement ignores the image size. Positions are never clamped
/// to the canvas.
pub fn compute_base_position(
    base: &BasePlacement,
    canvas: Canvas,
    image_w: u32,
    image_h: u32,
) -> PastePosition {
    match *base {
        BasePlacement::Centered { offset_x, offset_y } => PastePosition::new(
            (i64::from(canvas.width) - i64::from(image_w)).div_euclid(2) + offset_x,
            (i64::from(canvas.height) - i64::from(image_h)).div_euclid(2) + offset_y,
        ),
        BasePlacement::Explicit { x, y } => PastePosition::new(x, y),
    }
}

/// Final integer paste position for a drift `offset` around `base`.
pub fn paste_position(base: PastePosition, offset: Vec2) -> PastePosition {
    base.displaced(offset)
}

#[cfg(test)]
#[path = "../tests/unit/placement.rs"]
mod tests;
