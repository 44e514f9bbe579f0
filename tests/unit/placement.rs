use super::*;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn centered_with_offset() {
    let base = BasePlacement::Centered {
        offset_x: 5,
        offset_y: -3,
    };
    let p = compute_base_position(&base, canvas(200, 100), 50, 20);
    assert_eq!(p, PastePosition::new(80, 47));
    assert_eq!(p.x, (200 - 50) / 2 + 5);
    assert_eq!(p.y, (100 - 20) / 2 - 3);
}

#[test]
fn centered_odd_difference_floors() {
    let base = BasePlacement::Centered {
        offset_x: 0,
        offset_y: 0,
    };
    let p = compute_base_position(&base, canvas(101, 64), 50, 31);
    assert_eq!(p, PastePosition::new(25, 16));
}

#[test]
fn centered_oversized_image_floors_toward_negative() {
    let base = BasePlacement::Centered {
        offset_x: 0,
        offset_y: 1,
    };
    // (10 - 13) // 2 == -2 with floor division.
    let p = compute_base_position(&base, canvas(10, 10), 13, 10);
    assert_eq!(p, PastePosition::new(-2, 1));
}

#[test]
fn explicit_ignores_image_size() {
    let base = BasePlacement::Explicit { x: 7, y: 9 };
    assert_eq!(
        compute_base_position(&base, canvas(200, 100), 10, 10),
        PastePosition::new(7, 9)
    );
    assert_eq!(
        compute_base_position(&base, canvas(1, 1), 5000, 5000),
        PastePosition::new(7, 9)
    );
}

#[test]
fn explicit_allows_off_canvas_coordinates() {
    let base = BasePlacement::Explicit { x: -500, y: 9000 };
    assert_eq!(
        compute_base_position(&base, canvas(100, 100), 10, 10),
        PastePosition::new(-500, 9000)
    );
}

#[test]
fn paste_position_rounds_drift() {
    let base = PastePosition::new(80, 47);
    assert_eq!(
        paste_position(base, Vec2::new(3.6, -2.2)),
        PastePosition::new(84, 45)
    );
}
