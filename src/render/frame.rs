//! Per-frame rendering, naming and persistence.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;

use crate::assets::source::ScaledSource;
use crate::foundation::core::{Canvas, PastePosition};
use crate::foundation::error::{DriftError, DriftResult};
use crate::foundation::math::decimal_digits;
use crate::render::composite::{
    CHECKER_CELL, CHECKER_DARK, CHECKER_LIGHT, fill_checkerboard, paste_with_alpha,
};

/// Minimum number of digits in a frame number.
pub const MIN_PAD_WIDTH: usize = 4;

/// Zero-padding width for a sequence of `total` frames: `max(4, digits(total))`.
pub fn zero_pad_width(total: u64) -> usize {
    decimal_digits(total).max(MIN_PAD_WIDTH)
}

/// `<basename>_<one_based padded to pad>.png`.
pub fn frame_file_name(basename: &str, one_based: u64, pad: usize) -> String {
    format!("{basename}_{one_based:0pad$}.png")
}

/// printf-style input pattern matching [`frame_file_name`]: `<basename>_%0<pad>d.png`.
pub fn frame_pattern(basename: &str, pad: usize) -> String {
    format!("{basename}_%0{pad}d.png")
}

/// Fresh transparent canvas with `source` pasted at `paste`.
pub fn render_frame(source: &ScaledSource, canvas: Canvas, paste: PastePosition) -> RgbaImage {
    let mut frame = RgbaImage::new(canvas.width, canvas.height);
    paste_with_alpha(&mut frame, source.image(), paste);
    frame
}

/// Like [`render_frame`] but over a checkerboard so transparency is visible.
pub fn render_preview(source: &ScaledSource, canvas: Canvas, paste: PastePosition) -> RgbaImage {
    let mut frame = RgbaImage::new(canvas.width, canvas.height);
    fill_checkerboard(&mut frame, CHECKER_CELL, CHECKER_LIGHT, CHECKER_DARK);
    paste_with_alpha(&mut frame, source.image(), paste);
    frame
}

/// Write `img` as PNG to `path` through a temporary sibling file and a rename, so an
/// interrupted run never leaves a truncated frame under the final name.
pub fn save_png_atomic(img: &RgbaImage, path: &Path) -> DriftResult<()> {
    let tmp = temp_sibling(path);
    let written = img
        .save_with_format(&tmp, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", tmp.display()))
        .and_then(|()| {
            std::fs::rename(&tmp, path).with_context(|| {
                format!("rename '{}' to '{}'", tmp.display(), path.display())
            })
        });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(DriftError::generation(format!("{e:#}")));
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame.png".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
