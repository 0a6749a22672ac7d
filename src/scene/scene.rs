use std::fmt;

use crate::{
    assets::image::ImageResource,
    foundation::error::{StampError, StampResult},
    math::vector2::Vector2,
    scene::{camera::Camera, graph::SceneGraph, node::NodeId},
    surface::context::Surface,
};

/// Render-root state carried by a scene node.
pub struct SceneData {
    pub camera: Camera,
    /// Wipe the surface at the start of every render.
    pub auto_clear: bool,
    surface: Option<Box<dyn Surface>>,
    canvas_image: ImageResource,
}

impl fmt::Debug for SceneData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneData")
            .field("camera", &self.camera)
            .field("auto_clear", &self.auto_clear)
            .field(
                "surface",
                &self.surface.as_ref().map(|s| (s.width(), s.height())),
            )
            .field("canvas_image", &self.canvas_image)
            .finish()
    }
}

impl SceneData {
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self {
            camera: Camera::default(),
            auto_clear: true,
            surface: Some(surface),
            canvas_image: ImageResource::new(),
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_auto_clear(mut self, auto_clear: bool) -> Self {
        self.auto_clear = auto_clear;
        self
    }

    /// Image handle refreshed with the surface pixels after every render.
    pub fn canvas_image(&self) -> ImageResource {
        self.canvas_image.clone()
    }

    pub fn surface(&self) -> Option<&dyn Surface> {
        self.surface.as_deref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut (dyn Surface + 'static)> {
        self.surface.as_deref_mut()
    }

    /// Surface size as `(width, height)`, zero when the surface is checked out.
    pub fn size(&self) -> (u32, u32) {
        self.surface
            .as_ref()
            .map_or((0, 0), |s| (s.width(), s.height()))
    }
}

impl SceneGraph {
    /// Check the scene's surface out, run `f` with it, and put it back even on error.
    pub(crate) fn with_surface<T>(
        &mut self,
        scene: NodeId,
        f: impl FnOnce(&mut SceneGraph, &mut dyn Surface) -> StampResult<T>,
    ) -> StampResult<T> {
        let mut surface = self
            .scene_data_mut_or_err(scene)?
            .surface
            .take()
            .ok_or_else(|| StampError::render(format!("scene {scene:?} surface is in use")))?;
        let out = f(self, surface.as_mut());
        match self.scene_data_mut(scene) {
            Some(data) => data.surface = Some(surface),
            None => tracing::warn!(?scene, "scene dropped while its surface was checked out"),
        }
        out
    }

    fn scene_data_mut_or_err(&mut self, scene: NodeId) -> StampResult<&mut SceneData> {
        self.node_mut(scene)?
            .as_scene_mut()
            .ok_or_else(|| StampError::graph(format!("node {scene:?} is not a scene")))
    }

    fn scene_data_or_err(&self, scene: NodeId) -> StampResult<&SceneData> {
        self.node(scene)?
            .as_scene()
            .ok_or_else(|| StampError::graph(format!("node {scene:?} is not a scene")))
    }

    /// Replace the scene's drawing surface, returning the previous one.
    pub fn set_surface(
        &mut self,
        scene: NodeId,
        surface: Box<dyn Surface>,
    ) -> StampResult<Option<Box<dyn Surface>>> {
        Ok(self.scene_data_mut_or_err(scene)?.surface.replace(surface))
    }

    /// Draw the scene's direct children to its surface and publish the frame.
    ///
    /// The origin is moved to the surface centre; children with `enable_camera` are drawn
    /// under the camera's inverse transform.
    #[tracing::instrument(skip(self))]
    pub fn render(&mut self, scene: NodeId) -> StampResult<()> {
        let data = self.scene_data_or_err(scene)?;
        let camera = data.camera;
        let auto_clear = data.auto_clear;
        let canvas_image = data.canvas_image.clone();
        let children = self.children(scene).to_vec();

        self.with_surface(scene, |graph, surface| {
            surface.save();
            if auto_clear {
                surface.clear();
            }
            let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
            surface.translate(w / 2.0, h / 2.0);
            let mut drawn = Ok(());
            for &child in &children {
                let enable_camera = graph.get(child).is_some_and(|n| n.enable_camera);
                surface.save();
                if enable_camera {
                    camera.transform_invert(surface);
                }
                drawn = graph.draw(child, surface);
                surface.restore();
                if drawn.is_err() {
                    break;
                }
            }
            surface.restore();
            drawn?;

            if let Some(frame) = surface.snapshot() {
                canvas_image.complete(frame);
            }
            tracing::trace!(children = children.len(), "scene rendered");
            Ok(())
        })
    }

    /// Draw over the last frame in the scene's centred space, then republish the frame.
    pub fn overlay(
        &mut self,
        scene: NodeId,
        f: impl FnOnce(&SceneGraph, &mut dyn Surface) -> StampResult<()>,
    ) -> StampResult<()> {
        let canvas_image = self.scene_data_or_err(scene)?.canvas_image.clone();
        self.with_surface(scene, |graph, surface| {
            surface.save();
            let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
            surface.translate(w / 2.0, h / 2.0);
            let drawn = f(graph, surface);
            surface.restore();
            drawn?;
            if let Some(frame) = surface.snapshot() {
                canvas_image.complete(frame);
            }
            Ok(())
        })
    }

    /// Client (screen) coordinates to surface pixel coordinates.
    pub fn client_to_canvas(
        &self,
        scene: NodeId,
        client_x: f64,
        client_y: f64,
    ) -> StampResult<Vector2> {
        let data = self.scene_data_or_err(scene)?;
        let origin = data.surface().map_or(Vector2::ZERO, |s| s.client_origin());
        Ok(Vector2::new(client_x - origin.x, client_y - origin.y))
    }

    /// Surface pixel coordinates to the centred space world transforms use.
    pub fn canvas_to_clip(&self, scene: NodeId, canvas_pos: Vector2) -> StampResult<Vector2> {
        let (w, h) = self.scene_data_or_err(scene)?.size();
        let mut clip = Vector2::ZERO;
        clip.sub_vectors(
            canvas_pos,
            Vector2::new(f64::from(w) / 2.0, f64::from(h) / 2.0),
        );
        Ok(clip)
    }

    pub fn client_to_clip(
        &self,
        scene: NodeId,
        client_x: f64,
        client_y: f64,
    ) -> StampResult<Vector2> {
        let canvas = self.client_to_canvas(scene, client_x, client_y)?;
        self.canvas_to_clip(scene, canvas)
    }

    /// Hit-test a clip-space point against `obj`'s boundary under the scene camera.
    ///
    /// Leaves the boundary as the surface's current path.
    pub fn is_point_in_obj(
        &mut self,
        scene: NodeId,
        obj: NodeId,
        point: Vector2,
    ) -> StampResult<bool> {
        let projection = self.scene_data_or_err(scene)?.camera.matrix_invert();
        self.with_surface(scene, |graph, surface| {
            surface.begin_path();
            graph.create_path(obj, surface, Some(projection))?;
            Ok(surface.is_point_in_path(point.x, point.y))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scene.rs"]
mod tests;
