use std::f64::consts::FRAC_PI_2;

use super::*;
use crate::{
    assets::image::ImageResource,
    scene::camera::Camera,
    surface::recording::{RecordingSurface, SurfaceOp},
};

fn scene_with_camera(graph: &mut SceneGraph, camera: Camera) -> NodeId {
    let surface = Box::new(RecordingSurface::new(200, 100));
    graph.insert_scene(SceneData::new(surface).with_camera(camera))
}

#[test]
fn local_matrix_scales_then_rotates_then_translates() {
    let mut g = SceneGraph::new();
    let id = g.insert(
        Node::group()
            .with_scale(2.0, 2.0)
            .with_rotation(FRAC_PI_2)
            .with_position(10.0, 0.0),
    );
    let mut p = Vector2::new(1.0, 0.0);
    p.apply_matrix3(&g.matrix(id).unwrap());
    assert!(p.approx_eq(Vector2::new(10.0, 2.0), 1e-12), "{p:?}");
}

#[test]
fn world_matrix_is_parent_world_times_local() {
    let mut g = SceneGraph::new();
    let root = g.insert(Node::group().with_position(5.0, 5.0).with_scale(2.0, 2.0));
    let mid = g.insert(Node::group().with_rotation(0.3).with_position(1.0, 2.0));
    let leaf = g.insert_img(Img::default());
    g.node_mut(leaf).unwrap().position.set(3.0, -1.0);
    g.add(root, &[mid]).unwrap();
    g.add(mid, &[leaf]).unwrap();

    assert_eq!(g.world_matrix(root).unwrap(), g.matrix(root).unwrap());
    let expected = g.world_matrix(mid).unwrap() * g.matrix(leaf).unwrap();
    assert!(g.world_matrix(leaf).unwrap().approx_eq(&expected, 1e-12));
}

#[test]
fn world_scale_ignores_camera_zoom() {
    let mut g = SceneGraph::new();
    let scene = scene_with_camera(&mut g, Camera::new(0.0, 0.0, 4.0));
    let group = g.insert(Node::group().with_scale(2.0, 3.0));
    let img = g.insert(Node::img(Img::default()).with_scale(0.5, 0.5));
    g.add(scene, &[group]).unwrap();
    g.add(group, &[img]).unwrap();
    assert_eq!(g.world_scale(img).unwrap(), Vector2::new(1.0, 1.5));
}

#[test]
fn clip_world_matrix_applies_camera_inverse_or_identity() {
    let mut g = SceneGraph::new();
    let camera = Camera::new(10.0, 20.0, 2.0);
    let scene = scene_with_camera(&mut g, camera);
    let img = g.insert(Node::img(Img::default()).with_position(4.0, 4.0));
    assert_eq!(g.clip_world_matrix(img).unwrap(), Matrix3::IDENTITY);

    g.add(scene, &[img]).unwrap();
    let expected = camera.matrix_invert() * g.world_matrix(img).unwrap();
    assert!(g.clip_world_matrix(img).unwrap().approx_eq(&expected, 1e-12));
}

#[test]
fn get_scene_walks_up_and_includes_self() {
    let mut g = SceneGraph::new();
    let scene = scene_with_camera(&mut g, Camera::default());
    let group = g.insert_group();
    let img = g.insert_img(Img::default());
    g.add(scene, &[group]).unwrap();
    g.add(group, &[img]).unwrap();
    assert_eq!(g.get_scene(img), Some(scene));
    assert_eq!(g.get_scene(scene), Some(scene));

    let loose = g.insert_group();
    assert_eq!(g.get_scene(loose), None);
}

#[test]
fn remove_from_parent_is_noop_when_detached() {
    let mut g = SceneGraph::new();
    let group = g.insert_group();
    let img = g.insert_img(Img::default());
    g.remove_from_parent(img).unwrap();

    g.add(group, &[img]).unwrap();
    g.remove_from_parent(img).unwrap();
    assert_eq!(g.parent(img), None);
    assert!(g.children(group).is_empty());
}

#[test]
fn draw_skips_invisible_and_balances_save_restore() {
    let mut g = SceneGraph::new();
    let group = g.insert(Node::group().with_position(3.0, 4.0));
    let shown = g.insert_img(Img::new(ImageResource::pending("a.png")));
    let hidden = g.insert(Node::img(Img::default()).with_visible(false));
    g.add(group, &[shown, hidden]).unwrap();

    let mut surface = RecordingSurface::new(10, 10);
    g.draw(group, &mut surface).unwrap();
    assert_eq!(surface.draw_image_count(), 1);
    assert_eq!(surface.save_depth(), 0);
    assert_eq!(surface.ops()[1], SurfaceOp::Translate(3.0, 4.0));
}

#[test]
fn create_path_emits_closed_corners_through_projection() {
    let mut g = SceneGraph::new();
    let img = g.insert_img(Img::default().with_size(10.0, 4.0).with_offset(-5.0, -2.0));
    let mut surface = RecordingSurface::new(10, 10);
    g.create_path(img, &mut surface, Some(Matrix3::make_scale(2.0, 2.0)))
        .unwrap();
    assert_eq!(
        surface.ops(),
        &[
            SurfaceOp::MoveTo(-10.0, -4.0),
            SurfaceOp::LineTo(10.0, -4.0),
            SurfaceOp::LineTo(10.0, 4.0),
            SurfaceOp::LineTo(-10.0, 4.0),
            SurfaceOp::ClosePath,
        ]
    );

    let group = g.insert_group();
    surface.take_ops();
    g.create_path(group, &mut surface, None).unwrap();
    assert!(surface.ops().is_empty());
}

#[test]
fn discard_requires_detached_and_drops_subtree() {
    let mut g = SceneGraph::new();
    let outer = g.insert_group();
    let inner = g.insert_group();
    let leaf = g.insert_img(Img::default());
    g.add(outer, &[inner]).unwrap();
    g.add(inner, &[leaf]).unwrap();

    assert!(matches!(g.discard(inner), Err(StampError::Graph(_))));
    g.remove(outer, &[inner]).unwrap();
    g.discard(inner).unwrap();
    assert!(!g.contains(inner));
    assert!(!g.contains(leaf));
    assert!(g.contains(outer));
}

#[test]
fn unknown_ids_are_graph_errors() {
    let mut g = SceneGraph::new();
    let id = g.insert_group();
    g.remove_from_parent(id).unwrap();
    g.discard(id).unwrap();
    assert!(matches!(g.world_matrix(id), Err(StampError::Graph(_))));
    assert!(g.children(id).is_empty());
}
