use super::*;
use crate::{
    assets::image::Bitmap,
    editor::controller::NullController,
    math::vector2::Vector2,
    surface::recording::RecordingSurface,
};

fn editor() -> Editor {
    Editor::new(
        EditorConfig::default(),
        EditorSurfaces {
            edit: Box::new(RecordingSurface::new(400, 300)),
            result: Box::new(RecordingSurface::new(200, 200)),
            effect: Box::new(RecordingSurface::new(200, 200)),
        },
        Box::new(NullController::default()),
    )
    .unwrap()
}

fn solid(w: u32, h: u32) -> ImageResource {
    ImageResource::from_bitmap(Bitmap::solid(w, h, [0, 0, 255, 255]))
}

#[test]
fn fit_keeps_image_aspect() {
    let mut img = Img::new(solid(40, 20));
    fit_to(&mut img, 200.0, 0.5).unwrap();
    assert_eq!((img.size.x, img.size.y), (100.0, 50.0));
    assert_eq!((img.offset.x, img.offset.y), (-50.0, -25.0));

    let mut pending = Img::new(ImageResource::pending("later.png"));
    assert!(matches!(
        fit_to(&mut pending, 200.0, 0.5),
        Err(StampError::Asset(_))
    ));
}

#[test]
fn mirror_copies_identity_and_placement_only() {
    let mut img = Img::new(solid(4, 4)).with_size(8.0, 6.0).with_offset(-4.0, -3.0);
    img.layer_num = 7;
    img.global_alpha = Some(0.5);
    let source = Node::img(img)
        .with_position(1.0, 2.0)
        .with_rotation(0.25)
        .with_scale(2.0, 3.0)
        .with_index(4);

    let mirror = mirror_node(&source).unwrap();
    assert_eq!(mirror.uuid(), source.uuid());
    assert_eq!(mirror.position, source.position);
    assert_eq!(mirror.rotation, 0.25);
    assert_eq!(mirror.scale, source.scale);
    assert_eq!(mirror.index, 0);
    let m = mirror.as_img().unwrap();
    assert_eq!(m.size, Vector2::new(8.0, 6.0));
    assert_eq!(m.offset, Vector2::new(-4.0, -3.0));
    assert_eq!(m.global_alpha, None);
    assert!(m.image.ptr_eq(&source.as_img().unwrap().image));

    assert!(mirror_node(&Node::group()).is_none());
}

#[test]
fn sync_transform_skips_unknown_images() {
    let mut ed = editor();
    let stray = ed.graph_mut().insert_img(Img::default());
    let (layers, result_layers) = (ed.layers(), ed.result_layers());
    sync_transform(ed.graph_mut(), layers, result_layers, stray).unwrap();
    assert!(ed.graph().children(result_layers).is_empty());
}

#[test]
fn cursor_rules_follow_controller_state() {
    let mut ed = editor();
    ed.update_cursor(CursorUpdate::PointerMove);
    assert_eq!(ed.cursor(), Cursor::Default);
    ed.cursor = Cursor::Hidden;
    ed.update_cursor(CursorUpdate::Reset);
    assert_eq!(ed.cursor(), Cursor::Default);
}

#[test]
fn new_rejects_invalid_config() {
    let cfg = EditorConfig {
        layer_ratio: -1.0,
        ..EditorConfig::default()
    };
    let res = Editor::new(
        cfg,
        EditorSurfaces {
            edit: Box::new(RecordingSurface::new(1, 1)),
            result: Box::new(RecordingSurface::new(1, 1)),
            effect: Box::new(RecordingSurface::new(1, 1)),
        },
        Box::new(NullController::default()),
    );
    assert!(matches!(res, Err(StampError::Validation(_))));
}

#[test]
fn mount_fails_on_empty_edit_surface() {
    let mut ed = editor();
    let scene = ed.scene();
    ed.graph_mut()
        .set_surface(scene, Box::new(RecordingSurface::new(0, 10)))
        .unwrap();
    let loader = AssetLoader::new("does-not-exist");
    assert!(matches!(ed.mount(&loader), Err(StampError::Validation(_))));
}
