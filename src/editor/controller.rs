use crate::{
    control::mouse_shape::CursorGlyph,
    editor::input::KeyInput,
    events::dispatcher::{Event, Listener},
    foundation::error::StampResult,
    math::vector2::Vector2,
    scene::{graph::SceneGraph, node::NodeId},
    surface::context::Surface,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlEventKind {
    Transformed,
    Change,
    Remove,
}

/// Something a [`LayerController`] did to the layers it manipulates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    /// `img`'s transform or offset changed.
    Transformed { img: NodeId },
    /// The edit view needs a redraw.
    Change,
    /// `img` was deleted from the layers.
    Remove { img: NodeId },
}

impl Event for ControlEvent {
    type Kind = ControlEventKind;
    type Target = ();

    fn kind(&self) -> ControlEventKind {
        match self {
            ControlEvent::Transformed { .. } => ControlEventKind::Transformed,
            ControlEvent::Change => ControlEventKind::Change,
            ControlEvent::Remove { .. } => ControlEventKind::Remove,
        }
    }

    // The controller is the only emitter, so there is no target to record.
    fn set_target(&mut self, _target: Option<()>) {}
}

pub type ControlListener = Listener<ControlEvent, SceneGraph>;

/// Where and how to draw the cursor glyph, in edit-scene clip space.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphAnchor {
    pub glyph: CursorGlyph,
    pub mouse: Vector2,
    /// Centre of the controlled image.
    pub center: Vector2,
    /// Boundary points of the controlled image, flat `[x0, y0, ...]`.
    pub vertices: Vec<f64>,
}

/// Interactive manipulator for the editable layers.
///
/// The editor forwards primary-button pointer input in clip coordinates and keyboard input,
/// then applies the returned events to keep the result scene in sync.
pub trait LayerController {
    fn pointer_down(
        &mut self,
        graph: &mut SceneGraph,
        layers: NodeId,
        clip_pos: Vector2,
    ) -> StampResult<Vec<ControlEvent>>;

    fn pointer_move(
        &mut self,
        graph: &mut SceneGraph,
        clip_pos: Vector2,
    ) -> StampResult<Vec<ControlEvent>>;

    fn pointer_up(&mut self, graph: &mut SceneGraph) -> StampResult<Vec<ControlEvent>>;

    fn key_down(
        &mut self,
        graph: &mut SceneGraph,
        key: &KeyInput,
    ) -> StampResult<Vec<ControlEvent>>;

    fn key_up(
        &mut self,
        graph: &mut SceneGraph,
        key: &KeyInput,
    ) -> StampResult<Vec<ControlEvent>>;

    fn set_target(&mut self, img: Option<NodeId>);

    fn target(&self) -> Option<NodeId>;

    /// Glyph for the current pointer hover, if any.
    fn mouse_state(&self) -> Option<CursorGlyph>;

    /// Glyph for the gesture in progress, if any.
    fn control_state(&self) -> Option<CursorGlyph>;

    fn glyph_anchor(&self, graph: &SceneGraph) -> Option<GlyphAnchor>;

    /// Draw handles over the edit scene, in its centred space.
    fn draw(&self, _graph: &SceneGraph, _surface: &mut dyn Surface) -> StampResult<()> {
        Ok(())
    }
}

/// A controller that ignores all input.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullController {
    target: Option<NodeId>,
}

impl LayerController for NullController {
    fn pointer_down(
        &mut self,
        _graph: &mut SceneGraph,
        _layers: NodeId,
        _clip_pos: Vector2,
    ) -> StampResult<Vec<ControlEvent>> {
        Ok(Vec::new())
    }

    fn pointer_move(
        &mut self,
        _graph: &mut SceneGraph,
        _clip_pos: Vector2,
    ) -> StampResult<Vec<ControlEvent>> {
        Ok(Vec::new())
    }

    fn pointer_up(&mut self, _graph: &mut SceneGraph) -> StampResult<Vec<ControlEvent>> {
        Ok(Vec::new())
    }

    fn key_down(
        &mut self,
        _graph: &mut SceneGraph,
        _key: &KeyInput,
    ) -> StampResult<Vec<ControlEvent>> {
        Ok(Vec::new())
    }

    fn key_up(
        &mut self,
        _graph: &mut SceneGraph,
        _key: &KeyInput,
    ) -> StampResult<Vec<ControlEvent>> {
        Ok(Vec::new())
    }

    fn set_target(&mut self, img: Option<NodeId>) {
        self.target = img;
    }

    fn target(&self) -> Option<NodeId> {
        self.target
    }

    fn mouse_state(&self) -> Option<CursorGlyph> {
        None
    }

    fn control_state(&self) -> Option<CursorGlyph> {
        None
    }

    fn glyph_anchor(&self, _graph: &SceneGraph) -> Option<GlyphAnchor> {
        None
    }
}
