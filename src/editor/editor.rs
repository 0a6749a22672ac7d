use std::{cell::Cell, rc::Rc};

use uuid::Uuid;

use crate::{
    assets::{image::ImageResource, loader::AssetLoader},
    control::{
        mouse_shape::MouseShape,
        orbit::{OrbitController, OrbitEvent, OrbitEventKind, OrbitListener},
    },
    editor::{
        config::{EditorConfig, EffectSource},
        controller::{ControlEvent, ControlEventKind, ControlListener, LayerController},
        input::{BUTTON_AUXILIARY, BUTTON_PRIMARY, Cursor, KeyInput, PointerInput, WheelInput},
    },
    events::dispatcher::{EventDispatcher, listener},
    foundation::error::{StampError, StampResult},
    scene::{
        camera::Camera,
        graph::{GroupListener, SceneGraph},
        img::Img,
        node::{GroupChange, GroupEvent, GroupEventKind, Node, NodeId},
        scene::SceneData,
    },
    surface::context::Surface,
};

/// Drawing surfaces for the three editor scenes.
pub struct EditorSurfaces {
    pub edit: Box<dyn Surface>,
    pub result: Box<dyn Surface>,
    pub effect: Box<dyn Surface>,
}

/// Listener handles kept so teardown can unregister exactly what was registered.
struct SyncListeners {
    add: GroupListener,
    remove: GroupListener,
    transformed: ControlListener,
    orbit_change: OrbitListener,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CursorUpdate {
    PointerDown,
    PointerMove,
    Reset,
}

/// Layered design editor.
///
/// Owns three scenes: the edit scene, where `layers` are manipulated over the design
/// backdrop under an orbit camera; the result scene, which mirrors every layer into
/// `result_layers` at print scale; and the effect scene, which composites the result frame
/// onto the product photos.
pub struct Editor {
    config: EditorConfig,
    graph: SceneGraph,
    scene: NodeId,
    layers: NodeId,
    design: NodeId,
    result_scene: NodeId,
    result_layers: NodeId,
    effect_scene: NodeId,
    effect_imgs: Vec<NodeId>,
    orbit: OrbitController,
    orbit_changed: Rc<Cell<bool>>,
    controller: Box<dyn LayerController>,
    control_events: EventDispatcher<ControlEvent, SceneGraph>,
    mouse_shape: MouseShape,
    cursor: Cursor,
    design_size: f64,
    listeners: Option<SyncListeners>,
}

impl Editor {
    pub fn new(
        config: EditorConfig,
        surfaces: EditorSurfaces,
        controller: Box<dyn LayerController>,
    ) -> StampResult<Self> {
        config.validate()?;
        let mut graph = SceneGraph::new();

        let scene = graph.insert_scene(SceneData::new(surfaces.edit));
        let layers = graph.insert_group();
        let design = graph.insert(
            Node::img(Img::new(ImageResource::pending(config.design_src.as_str())))
                .with_index(config.design_index),
        );
        graph.add(scene, &[layers, design])?;

        let result_scene = graph.insert_scene(SceneData::new(surfaces.result));
        let result_layers = graph.insert_group();
        graph.add(result_scene, &[result_layers])?;

        let effect_scene = graph.insert_scene(SceneData::new(surfaces.effect));
        let result_frame = graph
            .scene_data(result_scene)
            .map(SceneData::canvas_image)
            .ok_or_else(|| StampError::graph("result scene vanished"))?;
        let effect_imgs: Vec<NodeId> = config
            .effect_layers
            .iter()
            .map(|layer| {
                let image = match &layer.source {
                    EffectSource::Result => result_frame.clone(),
                    EffectSource::Path(path) => ImageResource::pending(path.as_str()),
                };
                graph.insert(
                    Node::img(Img::new(image).with_composite(layer.composite))
                        .with_index(layer.index),
                )
            })
            .collect();
        graph.add(effect_scene, &effect_imgs)?;

        let mut editor = Self {
            orbit: OrbitController::new(config.orbit),
            orbit_changed: Rc::new(Cell::new(false)),
            mouse_shape: config.mouse_shape.clone(),
            config,
            graph,
            scene,
            layers,
            design,
            result_scene,
            result_layers,
            effect_scene,
            effect_imgs,
            controller,
            control_events: EventDispatcher::new(),
            cursor: Cursor::Default,
            design_size: 300.0,
            listeners: None,
        };
        editor.install_listeners()?;
        Ok(editor)
    }

    fn install_listeners(&mut self) -> StampResult<()> {
        let (layers, result_layers) = (self.layers, self.result_layers);

        let add = listener(move |graph: &mut SceneGraph, e: &GroupEvent| {
            let GroupChange::Add { obj } = e.change else {
                return Ok(());
            };
            let Some(mirror) = mirror_node(graph.node(obj)?) else {
                return Ok(());
            };
            let mirror = graph.insert(mirror);
            graph.add(result_layers, &[mirror])?;
            Ok(())
        });

        let remove = listener(move |graph: &mut SceneGraph, e: &GroupEvent| {
            let GroupChange::Remove { obj } = e.change else {
                return Ok(());
            };
            let uuid = graph.node(obj)?.uuid();
            if let Some(mirror) = graph.get_object_by_uuid(result_layers, uuid) {
                graph.remove(result_layers, &[mirror])?;
                graph.discard(mirror)?;
            }
            Ok(())
        });

        let transformed = listener(move |graph: &mut SceneGraph, e: &ControlEvent| {
            let ControlEvent::Transformed { img } = *e else {
                return Ok(());
            };
            sync_transform(graph, layers, result_layers, img)?;
            Ok(())
        });

        let changed = self.orbit_changed.clone();
        let orbit_change = listener(move |_: &mut (), _: &OrbitEvent| {
            changed.set(true);
            Ok(())
        });

        self.graph
            .add_event_listener(layers, GroupEventKind::Add, &add)?;
        self.graph
            .add_event_listener(layers, GroupEventKind::Remove, &remove)?;
        self.control_events
            .add_event_listener(ControlEventKind::Transformed, &transformed);
        self.orbit
            .add_event_listener(OrbitEventKind::Change, &orbit_change);
        self.listeners = Some(SyncListeners {
            add,
            remove,
            transformed,
            orbit_change,
        });
        Ok(())
    }

    /// Unregister the sync listeners and detach both layer groups from their scenes.
    pub fn teardown(&mut self) -> StampResult<()> {
        if let Some(l) = self.listeners.take() {
            self.graph
                .remove_event_listener(self.layers, GroupEventKind::Add, &l.add)?;
            self.graph
                .remove_event_listener(self.layers, GroupEventKind::Remove, &l.remove)?;
            self.control_events
                .remove_event_listener(ControlEventKind::Transformed, &l.transformed);
            self.orbit
                .remove_event_listener(OrbitEventKind::Change, &l.orbit_change);
        }
        self.graph.remove_from_parent(self.layers)?;
        self.graph.remove_from_parent(self.result_layers)?;
        tracing::debug!("editor torn down");
        Ok(())
    }

    /// Whether the sync listeners are still installed.
    pub fn is_active(&self) -> bool {
        self.listeners.is_some()
    }

    /// Size the design, result and effect images to the surfaces, load assets, and render.
    ///
    /// Every asset is attempted; the first load error is returned after rendering with
    /// whatever did load.
    #[tracing::instrument(skip(self, loader), fields(root = %loader.root().display()))]
    pub fn mount(&mut self, loader: &AssetLoader) -> StampResult<()> {
        let (dx, dy) = self.scene_size(self.scene)?;
        let design_size = f64::from(dx.min(dy)) * self.config.design_ratio;
        if design_size <= 0.0 {
            return Err(StampError::validation("edit surface must be non-empty"));
        }
        self.design_size = design_size;
        if let Some(design) = self.graph.img_mut(self.design) {
            design.size.set(design_size, design_size);
            design.offset.set(-design_size / 2.0, -design_size / 2.0);
        }

        let (fx, _) = self.scene_size(self.effect_scene)?;
        let fx = f64::from(fx);
        let result_layers = self.graph.node_mut(self.result_layers)?;
        result_layers.scale.set(fx / design_size, fx / design_size);
        result_layers
            .position
            .set(0.0, fx * self.config.result_offset_ratio);
        for &id in &self.effect_imgs {
            if let Some(img) = self.graph.img_mut(id) {
                img.size.set(fx, fx);
                img.offset.set(-fx / 2.0, -fx / 2.0);
            }
        }

        let mut images = Vec::with_capacity(self.effect_imgs.len() + 1);
        images.extend(self.graph.img(self.design).map(|img| img.image.clone()));
        images.extend(
            self.effect_imgs
                .iter()
                .filter_map(|&id| self.graph.img(id))
                .map(|img| img.image.clone()),
        );
        let loaded = loader.load_pending(&images);
        tracing::debug!(design_size, effect_width = fx, "editor mounted");
        self.render()?;
        loaded
    }

    /// Render the edit scene with its overlays, then the result scene, then the effect scene.
    #[tracing::instrument(skip(self))]
    pub fn render(&mut self) -> StampResult<()> {
        self.graph.render(self.scene)?;
        let anchor = self.controller.glyph_anchor(&self.graph);
        let (controller, mouse_shape) = (&self.controller, &self.mouse_shape);
        self.graph.overlay(self.scene, |graph, surface| {
            controller.draw(graph, surface)?;
            if let Some(a) = &anchor {
                mouse_shape.draw(surface, a.glyph, a.mouse, a.center, &a.vertices);
            }
            Ok(())
        })?;
        self.graph.render(self.result_scene)?;
        self.graph.render(self.effect_scene)
    }

    /// Build a new layer for `image` without adding it.
    ///
    /// The layer is numbered one past the highest existing layer and sized to the configured
    /// fraction of the design.
    pub fn create_layer(&mut self, image: ImageResource) -> StampResult<NodeId> {
        let layer_num = self
            .graph
            .children(self.layers)
            .iter()
            .filter_map(|&id| self.graph.img(id))
            .map(|img| img.layer_num)
            .max()
            .unwrap_or(0)
            + 1;
        let mut img = Img::new(image);
        img.layer_num = layer_num;
        fit_to(&mut img, self.design_size, self.config.layer_ratio)?;
        Ok(self
            .graph
            .insert(Node::img(img).with_name(format!("Layer {layer_num}"))))
    }

    /// Width becomes `design_size * ratio`; height keeps the image's aspect ratio.
    pub fn set_img_size(&mut self, img: NodeId, ratio: f64) -> StampResult<()> {
        let design_size = self.design_size;
        let target = self
            .graph
            .img_mut(img)
            .ok_or_else(|| StampError::graph(format!("node {img:?} is not an image")))?;
        fit_to(target, design_size, ratio)
    }

    /// Add `img` to the layers (mirroring it) and hand it to the controller.
    pub fn add_layer(&mut self, img: NodeId) -> StampResult<()> {
        self.graph.add(self.layers, &[img])?;
        self.controller.set_target(Some(img));
        Ok(())
    }

    /// Swap layer slots `a` and `b` in both the layers and their mirrors, then render.
    pub fn replace_layers(&mut self, a: usize, b: usize) -> StampResult<()> {
        self.graph.swap_children(self.layers, a, b)?;
        self.graph.swap_children(self.result_layers, a, b)?;
        self.render()
    }

    /// Point the controller at the layer with `uuid`. Returns whether one was found.
    pub fn control_layer_by_uuid(&mut self, uuid: Uuid) -> bool {
        match self.graph.get_object_by_uuid(self.layers, uuid) {
            Some(id) if self.graph.img(id).is_some() => {
                self.controller.set_target(Some(id));
                true
            }
            _ => false,
        }
    }

    pub fn pointer_down(&mut self, input: &PointerInput) -> StampResult<()> {
        match input.button {
            BUTTON_PRIMARY => {
                let clip = self
                    .graph
                    .client_to_clip(self.scene, input.client_x, input.client_y)?;
                let events = self
                    .controller
                    .pointer_down(&mut self.graph, self.layers, clip)?;
                self.apply_control_events(events)?;
                self.update_cursor(CursorUpdate::PointerDown);
            }
            BUTTON_AUXILIARY => {
                let camera = *edit_camera(&mut self.graph, self.scene)?;
                self.orbit
                    .pointer_down(&camera, input.client_x, input.client_y);
            }
            _ => {}
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, input: &PointerInput) -> StampResult<()> {
        let clip = self
            .graph
            .client_to_clip(self.scene, input.client_x, input.client_y)?;
        let events = self.controller.pointer_move(&mut self.graph, clip)?;
        self.apply_control_events(events)?;
        self.update_cursor(CursorUpdate::PointerMove);

        let camera = edit_camera(&mut self.graph, self.scene)?;
        self.orbit
            .pointer_move(camera, input.client_x, input.client_y)?;
        self.render_if_orbited()
    }

    pub fn pointer_up(&mut self, input: &PointerInput) -> StampResult<()> {
        match input.button {
            BUTTON_PRIMARY => {
                let events = self.controller.pointer_up(&mut self.graph)?;
                self.apply_control_events(events)?;
            }
            BUTTON_AUXILIARY => self.orbit.pointer_up(),
            _ => {}
        }
        Ok(())
    }

    pub fn key_down(&mut self, key: &KeyInput) -> StampResult<()> {
        let events = self.controller.key_down(&mut self.graph, key)?;
        self.apply_control_events(events)?;
        if key.is_commit_or_cancel() {
            self.update_cursor(CursorUpdate::Reset);
        }
        Ok(())
    }

    pub fn key_up(&mut self, key: &KeyInput) -> StampResult<()> {
        let events = self.controller.key_up(&mut self.graph, key)?;
        self.apply_control_events(events)
    }

    pub fn wheel(&mut self, input: &WheelInput) -> StampResult<()> {
        let camera = edit_camera(&mut self.graph, self.scene)?;
        self.orbit.do_scale(camera, input.delta_y)?;
        self.render_if_orbited()
    }

    /// The edit surface never shows a context menu; always `true` (suppress).
    pub fn context_menu(&self) -> bool {
        true
    }

    fn render_if_orbited(&mut self) -> StampResult<()> {
        if self.orbit_changed.replace(false) {
            self.render()?;
        }
        Ok(())
    }

    /// Run controller events through the control listeners, then redraw when asked to.
    fn apply_control_events(&mut self, events: Vec<ControlEvent>) -> StampResult<()> {
        let mut redraw = false;
        for mut event in events {
            self.control_events
                .dispatch_event(&mut self.graph, &mut event, ())?;
            match event {
                ControlEvent::Transformed { .. } => {}
                ControlEvent::Change => redraw = true,
                ControlEvent::Remove { img } => {
                    let was_layer = self.graph.parent(img) == Some(self.layers);
                    if was_layer {
                        self.graph.remove(self.layers, &[img])?;
                    }
                    if self.controller.target() == Some(img) {
                        self.controller.set_target(None);
                    }
                    if was_layer {
                        self.graph.discard(img)?;
                    }
                    redraw = true;
                }
            }
        }
        if redraw {
            self.render()?;
        }
        Ok(())
    }

    fn update_cursor(&mut self, update: CursorUpdate) {
        let mouse = self.controller.mouse_state().is_some();
        let control = self.controller.control_state().is_some();
        let hidden = match update {
            CursorUpdate::PointerDown => mouse,
            CursorUpdate::PointerMove => mouse || control,
            CursorUpdate::Reset => false,
        };
        self.cursor = if hidden {
            Cursor::Hidden
        } else {
            Cursor::Default
        };
    }

    fn scene_size(&self, scene: NodeId) -> StampResult<(u32, u32)> {
        self.graph
            .scene_data(scene)
            .map(SceneData::size)
            .ok_or_else(|| StampError::graph(format!("node {scene:?} is not a scene")))
    }

    pub fn add_control_listener(&mut self, kind: ControlEventKind, listener: &ControlListener) {
        self.control_events.add_event_listener(kind, listener);
    }

    pub fn remove_control_listener(&mut self, kind: ControlEventKind, listener: &ControlListener) {
        self.control_events.remove_event_listener(kind, listener);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn scene(&self) -> NodeId {
        self.scene
    }

    pub fn layers(&self) -> NodeId {
        self.layers
    }

    pub fn design(&self) -> NodeId {
        self.design
    }

    pub fn result_scene(&self) -> NodeId {
        self.result_scene
    }

    pub fn result_layers(&self) -> NodeId {
        self.result_layers
    }

    pub fn effect_scene(&self) -> NodeId {
        self.effect_scene
    }

    pub fn effect_images(&self) -> &[NodeId] {
        &self.effect_imgs
    }

    pub fn camera(&self) -> Option<Camera> {
        self.graph.scene_data(self.scene).map(|d| d.camera)
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    pub fn controller(&self) -> &dyn LayerController {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> &mut dyn LayerController {
        self.controller.as_mut()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn design_size(&self) -> f64 {
        self.design_size
    }
}

fn edit_camera(graph: &mut SceneGraph, scene: NodeId) -> StampResult<&mut Camera> {
    graph
        .scene_data_mut(scene)
        .map(|d| &mut d.camera)
        .ok_or_else(|| StampError::graph(format!("node {scene:?} is not a scene")))
}

fn fit_to(img: &mut Img, design_size: f64, ratio: f64) -> StampResult<()> {
    let (width, height) = img
        .image
        .natural_size()
        .filter(|&(w, h)| w > 0 && h > 0)
        .ok_or_else(|| StampError::asset("layer image has no size until it is loaded"))?;
    let w = design_size * ratio;
    let h = w * f64::from(height) / f64::from(width);
    img.size.set(w, h);
    img.offset.set(-w / 2.0, -h / 2.0);
    Ok(())
}

/// Result-scene copy of a layer: same uuid, image, transform and placement.
fn mirror_node(source: &Node) -> Option<Node> {
    let img = source.as_img()?;
    let mut mirror = Img::new(img.image.clone());
    mirror.offset = img.offset;
    mirror.size = img.size;
    Some(
        Node::img(mirror)
            .with_uuid(source.uuid())
            .with_position(source.position.x, source.position.y)
            .with_rotation(source.rotation)
            .with_scale(source.scale.x, source.scale.y),
    )
}

/// Copy `img`'s transform onto the mirror occupying the same slot in `result_layers`.
fn sync_transform(
    graph: &mut SceneGraph,
    layers: NodeId,
    result_layers: NodeId,
    img: NodeId,
) -> StampResult<()> {
    let Some(slot) = graph.children(layers).iter().position(|&c| c == img) else {
        tracing::warn!(?img, "transformed image is not a layer");
        return Ok(());
    };
    let Some(&mirror) = graph.children(result_layers).get(slot) else {
        tracing::warn!(?img, slot, "no mirror at layer slot");
        return Ok(());
    };

    let source = graph.node(img)?;
    let (uuid, position, rotation, scale) =
        (source.uuid(), source.position, source.rotation, source.scale);
    let offset = source.as_img().map(|i| i.offset);

    let target = graph.node_mut(mirror)?;
    if target.uuid() != uuid {
        tracing::warn!(%uuid, mirror = %target.uuid(), slot, "layer and mirror order diverged");
    }
    target.position = position;
    target.rotation = rotation;
    target.scale = scale;
    if let (Some(offset), Some(m)) = (offset, target.as_img_mut()) {
        m.offset = offset;
    }
    Ok(())
}
#[cfg(test)]
#[path = "../../tests/unit/editor/editor.rs"]
mod tests;
