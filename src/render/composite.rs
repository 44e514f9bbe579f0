use image::RgbaImage;

use crate::foundation::core::PastePosition;
use crate::foundation::math::blend_channel;

/// Side length of a preview checkerboard cell, in pixels.
pub const CHECKER_CELL: u32 = 16;
/// Light checkerboard color.
pub const CHECKER_LIGHT: [u8; 4] = [220, 220, 220, 255];
/// Dark checkerboard color.
pub const CHECKER_DARK: [u8; 4] = [180, 180, 180, 255];

/// Paste `src` onto `dst` with `src`'s own alpha as the mask.
///
/// Every channel (alpha included) becomes `src*a + dst*(1-a)` with `a` the source alpha.
/// The part of `src` that falls outside `dst` is dropped; `at` may be anywhere.
pub fn paste_with_alpha(dst: &mut RgbaImage, src: &RgbaImage, at: PastePosition) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = at.x.max(0);
    let y0 = at.y.max(0);
    let x1 = at.x.saturating_add(sw).min(dw);
    let y1 = at.y.saturating_add(sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let span = (x1 - x0) as usize * 4;
    let dst_stride = dw as usize * 4;
    let src_stride = sw as usize * 4;
    let src_x0 = (x0 - at.x) as usize * 4;
    let dst_x0 = x0 as usize * 4;

    let src_raw = src.as_raw();
    let dst_raw: &mut [u8] = dst;
    for y in y0..y1 {
        let sy = (y - at.y) as usize;
        let s_off = sy * src_stride + src_x0;
        let d_off = y as usize * dst_stride + dst_x0;
        let s_row = &src_raw[s_off..s_off + span];
        let d_row = &mut dst_raw[d_off..d_off + span];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            match s[3] {
                0 => {}
                255 => d.copy_from_slice(s),
                a => {
                    for i in 0..4 {
                        d[i] = blend_channel(s[i], d[i], a);
                    }
                }
            }
        }
    }
}

/// Fill `dst` with a checkerboard of `cell`-pixel squares; `light` where the cell
/// coordinates sum to an even number.
pub fn fill_checkerboard(dst: &mut RgbaImage, cell: u32, light: [u8; 4], dark: [u8; 4]) {
    let cell = cell.max(1);
    for (x, y, px) in dst.enumerate_pixels_mut() {
        let even = ((x / cell) + (y / cell)).is_multiple_of(2);
        px.0 = if even { light } else { dark };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
