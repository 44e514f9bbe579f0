use std::path::Path;

use image::RgbaImage;
use image::imageops::FilterType;

use crate::config::ScaleSpec;
use crate::foundation::error::{DriftError, DriftResult};

/// The input image after uniform scaling, in straight-alpha RGBA8.
///
/// Built once per run and shared read-only by every frame.
#[derive(Clone, Debug)]
pub struct ScaledSource {
    image: RgbaImage,
}

impl ScaledSource {
    /// Load `path` and scale it according to `scale`.
    ///
    /// A missing or undecodable file is a configuration error; it is reported before any
    /// output directory is touched.
    pub fn load(path: &Path, scale: ScaleSpec) -> DriftResult<Self> {
        if !path.is_file() {
            return Err(DriftError::config(format!(
                "INPUT_IMAGE not found: '{}'",
                path.display()
            )));
        }
        let decoded = image::open(path).map_err(|e| {
            DriftError::config(format!(
                "INPUT_IMAGE '{}' is not a readable image: {e}",
                path.display()
            ))
        })?;
        Self::from_image(decoded.to_rgba8(), scale)
    }

    /// Scale an already decoded image.
    pub fn from_image(original: RgbaImage, scale: ScaleSpec) -> DriftResult<Self> {
        let (w0, h0) = original.dimensions();
        let (w, h) = scaled_dimensions(w0, h0, scale)?;
        let image = if (w, h) == (w0, h0) {
            original
        } else {
            resample_rgba8(&original, w, h)
        };
        tracing::debug!(from_w = w0, from_h = h0, to_w = w, to_h = h, "scaled source image");
        Ok(Self { image })
    }

    /// Scaled width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Scaled height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the pixel buffer.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Output size for a `w0 x h0` image. Aspect ratio is preserved; both sides are at least 1.
pub fn scaled_dimensions(w0: u32, h0: u32, scale: ScaleSpec) -> DriftResult<(u32, u32)> {
    if w0 == 0 || h0 == 0 {
        return Err(DriftError::generation(format!(
            "source image is empty ({w0}x{h0})"
        )));
    }
    let (w, h) = match scale {
        ScaleSpec::TargetWidth(tw) => {
            let factor = f64::from(tw) / f64::from(w0);
            (f64::from(tw), (f64::from(h0) * factor).round())
        }
        ScaleSpec::Factor(s) => (
            (f64::from(w0) * s).round(),
            (f64::from(h0) * s).round(),
        ),
    };
    let to_px = |v: f64| -> DriftResult<u32> {
        if !v.is_finite() || v > f64::from(u32::MAX) {
            return Err(DriftError::generation(format!(
                "scaled source dimension out of range: {v}"
            )));
        }
        Ok((v as u32).max(1))
    };
    Ok((to_px(w)?, to_px(h)?))
}

/// Lanczos resample in premultiplied space so transparent pixels do not bleed color.
fn resample_rgba8(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut premul = src.clone();
    premultiply_rgba8_in_place(&mut premul);
    let mut out = image::imageops::resize(&premul, width, height, FilterType::Lanczos3);
    unpremultiply_rgba8_in_place(&mut out);
    out
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
