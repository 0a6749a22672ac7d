use super::*;

fn rect_path(s: &mut CpuSurface, x: f64, y: f64, w: f64, h: f64) {
    s.begin_path();
    s.move_to(x, y);
    s.line_to(x + w, y);
    s.line_to(x + w, y + h);
    s.line_to(x, y + h);
    s.close_path();
}

fn solid_image(w: u32, h: u32, px: [u8; 4]) -> ImageResource {
    ImageResource::from_bitmap(Bitmap::solid(w, h, px))
}

fn fill_span(s: &mut CpuSurface, x0: f64, x1: f64, px: [u8; 4]) {
    s.draw_image(&solid_image(1, 1, px), None, Rect::new(x0, 0.0, x1, 1.0));
}

fn assert_close(actual: Option<[u8; 4]>, expected: [u8; 4]) {
    let actual = actual.expect("pixel in bounds");
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.abs_diff(e) <= 1, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn fill_covers_interior_only() {
    let mut s = CpuSurface::new(10, 10);
    s.set_fill_style(Color::rgb(255, 0, 0));
    rect_path(&mut s, 2.0, 2.0, 4.0, 4.0);
    s.fill();
    assert_eq!(s.pixel(3, 3), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(7, 7), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));
}

#[test]
fn path_is_built_through_the_current_transform() {
    let mut s = CpuSurface::new(20, 20);
    s.save();
    s.translate(10.0, 0.0);
    s.scale(2.0, 2.0);
    rect_path(&mut s, 0.0, 0.0, 2.0, 2.0);
    s.restore();
    assert!(s.is_point_in_path(12.0, 3.0));
    assert!(!s.is_point_in_path(3.0, 3.0));
    s.fill();
    assert_eq!(s.pixel(11, 1).map(|p| p[3]), Some(255));
}

#[test]
fn stroke_paints_outline_not_interior() {
    let mut s = CpuSurface::new(20, 20);
    s.set_stroke_style(Color::WHITE);
    s.set_line_width(2.0);
    rect_path(&mut s, 4.0, 4.0, 10.0, 10.0);
    s.stroke();
    assert_eq!(s.pixel(4, 8), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(9, 9), Some([0, 0, 0, 0]));
}

#[test]
fn draw_image_scales_into_destination() {
    let mut s = CpuSurface::new(8, 8);
    s.draw_image(
        &solid_image(1, 1, [0, 0, 255, 255]),
        None,
        Rect::new(2.0, 2.0, 6.0, 6.0),
    );
    assert_eq!(s.pixel(2, 2), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(5, 5), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(6, 6), Some([0, 0, 0, 0]));
}

#[test]
fn draw_image_view_selects_source_region() {
    // Left half red, right half green.
    let data = [[255, 0, 0, 255], [0, 255, 0, 255]].concat();
    let img = ImageResource::from_bitmap(Bitmap::new(2, 1, data).unwrap());
    let mut s = CpuSurface::new(4, 4);
    let view = View {
        x: 1.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };
    s.draw_image(&img, Some(view), Rect::new(0.0, 0.0, 4.0, 4.0));
    assert_eq!(s.pixel(0, 0), Some([0, 255, 0, 255]));
}

#[test]
fn pending_image_draws_nothing() {
    let mut s = CpuSurface::new(4, 4);
    s.draw_image(
        &ImageResource::pending("later.png"),
        None,
        Rect::new(0.0, 0.0, 4.0, 4.0),
    );
    assert!(s.pixels().iter().all(|&b| b == 0));
}

#[test]
fn destination_in_clears_outside_the_source() {
    let mut s = CpuSurface::new(4, 1);
    s.draw_image(
        &solid_image(1, 1, [255, 0, 0, 255]),
        None,
        Rect::new(0.0, 0.0, 4.0, 1.0),
    );
    s.set_composite_operation(CompositeOperation::DestinationIn);
    s.draw_image(
        &solid_image(1, 1, [0, 0, 0, 255]),
        None,
        Rect::new(0.0, 0.0, 2.0, 1.0),
    );
    assert_eq!(s.pixel(1, 0), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(3, 0), Some([0, 0, 0, 0]));
}

#[test]
fn global_alpha_scales_source() {
    let mut s = CpuSurface::new(1, 1);
    s.set_global_alpha(0.5);
    s.draw_image(
        &solid_image(1, 1, [255, 255, 255, 255]),
        None,
        Rect::new(0.0, 0.0, 1.0, 1.0),
    );
    assert_close(s.pixel(0, 0), [128, 128, 128, 128]);
}

#[test]
fn out_of_range_alpha_is_ignored() {
    let mut s = CpuSurface::new(1, 1);
    s.set_global_alpha(2.0);
    s.set_fill_style(Color::WHITE);
    rect_path(&mut s, 0.0, 0.0, 1.0, 1.0);
    s.fill();
    assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[test]
fn clip_limits_later_draws_until_restore() {
    let mut s = CpuSurface::new(4, 1);
    s.save();
    rect_path(&mut s, 0.0, 0.0, 2.0, 1.0);
    s.clip();
    s.draw_image(
        &solid_image(1, 1, [0, 255, 0, 255]),
        None,
        Rect::new(0.0, 0.0, 4.0, 1.0),
    );
    s.restore();
    assert_eq!(s.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(3, 0), Some([0, 0, 0, 0]));

    s.draw_image(
        &solid_image(1, 1, [0, 255, 0, 255]),
        None,
        Rect::new(0.0, 0.0, 4.0, 1.0),
    );
    assert_eq!(s.pixel(3, 0), Some([0, 255, 0, 255]));
}

#[test]
fn shadow_is_offset_behind_the_shape() {
    let mut s = CpuSurface::new(10, 10);
    s.set_shadow(Some(Shadow {
        color: Color::BLACK,
        blur: 0.0,
        offset_x: 4.0,
        offset_y: 0.0,
    }));
    s.draw_image(
        &solid_image(1, 1, [255, 255, 255, 255]),
        None,
        Rect::new(0.0, 0.0, 3.0, 3.0),
    );
    assert_eq!(s.pixel(1, 1), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(5, 1), Some([0, 0, 0, 255]));
    assert_eq!(s.pixel(8, 1), Some([0, 0, 0, 0]));
}

#[test]
fn clear_ignores_transform_and_clip() {
    let mut s = CpuSurface::new(2, 2);
    s.draw_image(
        &solid_image(1, 1, [9, 9, 9, 255]),
        None,
        Rect::new(0.0, 0.0, 2.0, 2.0),
    );
    rect_path(&mut s, 0.0, 0.0, 1.0, 1.0);
    s.clip();
    s.translate(100.0, 100.0);
    s.clear();
    assert!(s.pixels().iter().all(|&b| b == 0));
}

#[test]
fn snapshot_matches_pixels() {
    let mut s = CpuSurface::new(3, 2).with_client_origin(Vector2::new(5.0, 6.0));
    s.draw_image(
        &solid_image(1, 1, [1, 2, 3, 255]),
        None,
        Rect::new(0.0, 0.0, 3.0, 2.0),
    );
    let snap = s.snapshot().unwrap();
    assert_eq!((snap.width, snap.height), (3, 2));
    assert_eq!(snap.rgba8_premul.as_slice(), s.pixels());
    assert_eq!(s.client_origin(), Vector2::new(5.0, 6.0));
}

#[test]
fn stroke_width_follows_user_space_scale() {
    let mut s = CpuSurface::new(40, 40);
    s.set_stroke_style(Color::WHITE);
    s.set_line_width(1.0);
    s.scale(4.0, 1.0);
    s.begin_path();
    s.move_to(2.0, 20.5);
    s.line_to(8.0, 20.5);
    s.stroke();

    // One device pixel tall, stretched to x 8..32.
    assert_eq!(s.pixel(20, 20).map(|p| p[3]), Some(255));
    assert_eq!(s.pixel(20, 19).map(|p| p[3]), Some(0));
    assert_eq!(s.pixel(20, 21).map(|p| p[3]), Some(0));
    assert_eq!(s.pixel(31, 20).map(|p| p[3]), Some(255));
    assert_eq!(s.pixel(7, 20).map(|p| p[3]), Some(0));
}

#[test]
fn destination_over_fills_only_transparent_pixels() {
    let mut s = CpuSurface::new(4, 1);
    fill_span(&mut s, 0.0, 2.0, [0, 0, 255, 255]);
    s.set_composite_operation(CompositeOperation::DestinationOver);
    fill_span(&mut s, 0.0, 4.0, [255, 0, 0, 255]);
    assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(3, 0), Some([255, 0, 0, 255]));
}

#[test]
fn copy_clears_everything_outside_the_source() {
    let mut s = CpuSurface::new(4, 1);
    fill_span(&mut s, 0.0, 4.0, [255, 0, 0, 255]);
    s.set_composite_operation(CompositeOperation::Copy);
    fill_span(&mut s, 0.0, 2.0, [0, 0, 255, 255]);
    assert_eq!(s.pixel(1, 0), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(3, 0), Some([0, 0, 0, 0]));
}

#[test]
fn xor_of_overlapping_opaque_pixels_is_clear() {
    let mut s = CpuSurface::new(4, 1);
    fill_span(&mut s, 0.0, 2.0, [0, 0, 255, 255]);
    s.set_composite_operation(CompositeOperation::Xor);
    fill_span(&mut s, 1.0, 3.0, [255, 0, 0, 255]);
    assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(1, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(2, 0), Some([255, 0, 0, 255]));
}

#[test]
fn multiply_darkens_and_white_is_neutral() {
    let mut s = CpuSurface::new(2, 1);
    fill_span(&mut s, 0.0, 1.0, [128, 128, 128, 255]);
    fill_span(&mut s, 1.0, 2.0, [255, 0, 0, 255]);
    s.set_composite_operation(CompositeOperation::Multiply);
    fill_span(&mut s, 0.0, 1.0, [255, 255, 255, 255]);
    fill_span(&mut s, 1.0, 2.0, [0, 0, 255, 255]);
    assert_close(s.pixel(0, 0), [128, 128, 128, 255]);
    assert_close(s.pixel(1, 0), [0, 0, 0, 255]);
}

#[test]
fn blurred_shadow_spreads_past_the_shape() {
    let mut s = CpuSurface::new(20, 20);
    s.set_shadow(Some(Shadow {
        color: Color::BLACK,
        blur: 4.0,
        offset_x: 0.0,
        offset_y: 0.0,
    }));
    s.draw_image(
        &solid_image(1, 1, [255, 255, 255, 255]),
        None,
        Rect::new(8.0, 8.0, 12.0, 12.0),
    );
    assert_eq!(s.pixel(10, 10), Some([255, 255, 255, 255]));
    let halo = s.pixel(6, 10).map(|p| p[3]).unwrap_or(0);
    assert!(halo > 0 && halo < 255, "{halo}");
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
}
