use uuid::Uuid;

use crate::{
    events::dispatcher::{Event, EventDispatcher},
    math::vector2::Vector2,
    scene::{graph::SceneGraph, img::Img, scene::SceneData},
};

slotmap::new_key_type! {
    /// Handle of a node inside a [`SceneGraph`].
    pub struct NodeId;
}

/// Closed set of node variants, fixed at construction.
#[derive(Debug)]
pub enum NodeKind {
    Group,
    Scene(SceneData),
    Img(Img),
}

impl NodeKind {
    /// Groups and scenes own children.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::Scene(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupEventKind {
    Add,
    Remove,
    Removed,
}

/// What happened to a group's child list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupChange {
    /// `obj` was appended by `add`.
    Add { obj: NodeId },
    /// `obj` was spliced out by `remove`.
    Remove { obj: NodeId },
    /// `obj` was detached by `clear`.
    Removed { obj: NodeId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupEvent {
    pub change: GroupChange,
    /// The emitting group while the event is being delivered.
    pub target: Option<NodeId>,
}

impl GroupEvent {
    pub fn new(change: GroupChange) -> Self {
        Self {
            change,
            target: None,
        }
    }

    pub fn obj(&self) -> NodeId {
        match self.change {
            GroupChange::Add { obj }
            | GroupChange::Remove { obj }
            | GroupChange::Removed { obj } => obj,
        }
    }
}

impl Event for GroupEvent {
    type Kind = GroupEventKind;
    type Target = NodeId;

    fn kind(&self) -> GroupEventKind {
        match self.change {
            GroupChange::Add { .. } => GroupEventKind::Add,
            GroupChange::Remove { .. } => GroupEventKind::Remove,
            GroupChange::Removed { .. } => GroupEventKind::Removed,
        }
    }

    fn set_target(&mut self, target: Option<NodeId>) {
        self.target = target;
    }
}

/// Property matched by `get_object_by_property`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeProperty<'a> {
    Uuid(Uuid),
    Name(&'a str),
    Index(i32),
    Visible(bool),
}

/// A transformable scene-graph node.
///
/// Ownership lives in the parent's child list; `parent` is only a back-reference and is
/// maintained by the group operations on [`SceneGraph`].
#[derive(Debug)]
pub struct Node {
    pub position: Vector2,
    pub rotation: f64,
    pub scale: Vector2,
    pub visible: bool,
    /// Render order among siblings; not unique.
    pub index: i32,
    pub name: String,
    /// Whether the owning scene's camera applies. Only read for direct scene children.
    pub enable_camera: bool,
    uuid: Uuid,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) events: EventDispatcher<GroupEvent, SceneGraph>,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            position: Vector2::ZERO,
            rotation: 0.0,
            scale: Vector2::ONE,
            visible: true,
            index: 0,
            name: String::new(),
            enable_camera: true,
            uuid: Uuid::new_v4(),
            parent: None,
            children: Vec::new(),
            kind,
            events: EventDispatcher::new(),
        }
    }

    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    pub fn img(img: Img) -> Self {
        Self::with_kind(NodeKind::Img(img))
    }

    pub fn scene(data: SceneData) -> Self {
        Self::with_kind(NodeKind::Scene(data))
    }

    /// Replace the generated uuid. Only possible before the node enters a graph.
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position.set(x, y);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale.set(sx, sy);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_enable_camera(mut self, enable_camera: bool) -> Self {
        self.enable_camera = enable_camera;
        self
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    pub fn is_scene(&self) -> bool {
        matches!(self.kind, NodeKind::Scene(_))
    }

    pub fn as_img(&self) -> Option<&Img> {
        match &self.kind {
            NodeKind::Img(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_img_mut(&mut self) -> Option<&mut Img> {
        match &mut self.kind {
            NodeKind::Img(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_scene(&self) -> Option<&SceneData> {
        match &self.kind {
            NodeKind::Scene(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_scene_mut(&mut self) -> Option<&mut SceneData> {
        match &mut self.kind {
            NodeKind::Scene(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn matches(&self, property: NodeProperty<'_>) -> bool {
        match property {
            NodeProperty::Uuid(uuid) => self.uuid == uuid,
            NodeProperty::Name(name) => self.name == name,
            NodeProperty::Index(index) => self.index == index,
            NodeProperty::Visible(visible) => self.visible == visible,
        }
    }
}
