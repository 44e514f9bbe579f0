use image::Rgba;

use super::*;

fn transparent(w: u32, h: u32) -> RgbaImage {
    RgbaImage::new(w, h)
}

#[test]
fn opaque_paste_copies_pixels() {
    let mut dst = transparent(4, 4);
    let src = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
    paste_with_alpha(&mut dst, &src, PastePosition::new(1, 1));
    assert_eq!(dst.get_pixel(1, 1).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(2, 2).0, [255, 0, 0, 255]);
    assert_eq!(dst.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(dst.get_pixel(3, 3).0, [0, 0, 0, 0]);
}

#[test]
fn zero_alpha_leaves_destination() {
    let mut dst = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
    let src = RgbaImage::from_pixel(2, 2, Rgba([200, 200, 200, 0]));
    paste_with_alpha(&mut dst, &src, PastePosition::new(0, 0));
    assert_eq!(dst.get_pixel(0, 0).0, [1, 2, 3, 4]);
}

#[test]
fn partial_alpha_blends_every_channel() {
    let mut dst = transparent(1, 1);
    let src = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
    paste_with_alpha(&mut dst, &src, PastePosition::new(0, 0));
    assert_eq!(dst.get_pixel(0, 0).0, [128, 0, 0, 64]);

    let mut dst = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
    paste_with_alpha(&mut dst, &src, PastePosition::new(0, 0));
    assert_eq!(dst.get_pixel(0, 0).0, [128, 0, 127, 191]);
}

#[test]
fn negative_position_clips_top_left() {
    let mut dst = transparent(3, 3);
    let mut src = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
    src.put_pixel(1, 1, Rgba([9, 9, 9, 255]));
    paste_with_alpha(&mut dst, &src, PastePosition::new(-1, -1));
    assert_eq!(dst.get_pixel(0, 0).0, [9, 9, 9, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(dst.get_pixel(0, 1).0, [0, 0, 0, 0]);
}

#[test]
fn overflow_clips_bottom_right() {
    let mut dst = transparent(3, 3);
    let src = RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255]));
    paste_with_alpha(&mut dst, &src, PastePosition::new(2, 1));
    assert_eq!(dst.get_pixel(2, 1).0, [7, 7, 7, 255]);
    assert_eq!(dst.get_pixel(2, 2).0, [7, 7, 7, 255]);
    assert_eq!(dst.get_pixel(1, 1).0, [0, 0, 0, 0]);
    assert_eq!(dst.get_pixel(2, 0).0, [0, 0, 0, 0]);
}

#[test]
fn fully_off_canvas_is_noop() {
    let src = RgbaImage::from_pixel(2, 2, Rgba([7, 7, 7, 255]));
    for at in [
        PastePosition::new(3, 0),
        PastePosition::new(0, 3),
        PastePosition::new(-2, 0),
        PastePosition::new(0, -2),
        PastePosition::new(i64::MAX - 1, i64::MIN + 1),
    ] {
        let mut dst = transparent(3, 3);
        paste_with_alpha(&mut dst, &src, at);
        assert!(dst.pixels().all(|p| p.0 == [0, 0, 0, 0]), "{at:?}");
    }
}

#[test]
fn checkerboard_alternates_cells() {
    let mut dst = transparent(40, 20);
    fill_checkerboard(&mut dst, CHECKER_CELL, CHECKER_LIGHT, CHECKER_DARK);
    assert_eq!(dst.get_pixel(0, 0).0, CHECKER_LIGHT);
    assert_eq!(dst.get_pixel(15, 15).0, CHECKER_LIGHT);
    assert_eq!(dst.get_pixel(16, 0).0, CHECKER_DARK);
    assert_eq!(dst.get_pixel(0, 16).0, CHECKER_DARK);
    assert_eq!(dst.get_pixel(16, 16).0, CHECKER_LIGHT);
    assert_eq!(dst.get_pixel(39, 19).0, CHECKER_DARK);
}
