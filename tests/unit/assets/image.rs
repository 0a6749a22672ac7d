use super::*;

#[test]
fn bitmap_rejects_wrong_length() {
    let err = Bitmap::new(2, 2, vec![0; 15]).unwrap_err();
    assert!(err.to_string().contains("needs 16 bytes"));
}

#[test]
fn bitmap_pixel_bounds() {
    let b = Bitmap::solid(2, 1, [1, 2, 3, 4]);
    assert_eq!(b.pixel(1, 0), Some([1, 2, 3, 4]));
    assert_eq!(b.pixel(2, 0), None);
    assert_eq!(b.pixel(0, 1), None);
}

#[test]
fn clones_share_completion() {
    let a = ImageResource::pending("design.png");
    let b = a.clone();
    assert!(!b.is_complete());
    assert_eq!(b.natural_size(), None);

    a.complete(Bitmap::solid(4, 3, [0, 0, 0, 255]));
    assert!(b.is_complete());
    assert_eq!(b.natural_size(), Some((4, 3)));
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&ImageResource::pending("design.png")));
}

#[test]
fn set_src_resets_to_pending() {
    let img = ImageResource::from_bitmap(Bitmap::solid(1, 1, [0; 4]));
    assert_eq!(img.src(), None);
    img.set_src("other.png");
    assert_eq!(img.state(), LoadState::Pending);
    assert_eq!(img.src().as_deref(), Some("other.png"));
}

#[test]
fn failure_is_not_drawable() {
    let img = ImageResource::pending("missing.png");
    img.fail("gone");
    assert_eq!(img.state(), LoadState::Failed("gone".into()));
    assert!(img.bitmap().is_none());
}

#[test]
fn straight_alpha_roundtrip_for_opaque_pixels() {
    let b = Bitmap::new(1, 1, vec![10, 20, 30, 255]).unwrap();
    assert_eq!(b.to_straight_rgba8(), vec![10, 20, 30, 255]);
}
