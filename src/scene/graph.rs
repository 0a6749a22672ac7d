use slotmap::SlotMap;

use crate::{
    events::dispatcher::{Listener, deliver},
    foundation::error::{StampError, StampResult},
    math::{matrix3::Matrix3, vector2::Vector2},
    scene::{
        img::Img,
        node::{GroupEvent, GroupEventKind, Node, NodeId, NodeKind},
        scene::SceneData,
    },
    surface::context::Surface,
};

/// Listener attached to a group node.
pub type GroupListener = Listener<GroupEvent, SceneGraph>;

/// Arena owning every node of one or more scene trees.
///
/// Nodes are addressed by [`NodeId`]. Detached nodes stay in the arena until
/// [`SceneGraph::discard`] drops them.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    pub fn insert_group(&mut self) -> NodeId {
        self.insert(Node::group())
    }

    pub fn insert_img(&mut self, img: Img) -> NodeId {
        self.insert(Node::img(img))
    }

    pub fn insert_scene(&mut self, data: SceneData) -> NodeId {
        self.insert(Node::scene(data))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: NodeId) -> StampResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| StampError::graph(format!("unknown node {id:?}")))
    }

    pub fn node_mut(&mut self, id: NodeId) -> StampResult<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| StampError::graph(format!("unknown node {id:?}")))
    }

    pub fn img(&self, id: NodeId) -> Option<&Img> {
        self.nodes.get(id).and_then(Node::as_img)
    }

    pub fn img_mut(&mut self, id: NodeId) -> Option<&mut Img> {
        self.nodes.get_mut(id).and_then(Node::as_img_mut)
    }

    pub fn scene_data(&self, id: NodeId) -> Option<&SceneData> {
        self.nodes.get(id).and_then(Node::as_scene)
    }

    pub fn scene_data_mut(&mut self, id: NodeId) -> Option<&mut SceneData> {
        self.nodes.get_mut(id).and_then(Node::as_scene_mut)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(Node::parent)
    }

    /// Child list of a group; empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(Node::children).unwrap_or_default()
    }

    /// Drop a detached node and everything below it.
    pub fn discard(&mut self, id: NodeId) -> StampResult<()> {
        if self.node(id)?.parent.is_some() {
            return Err(StampError::graph(
                "cannot discard a node that is still attached",
            ));
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// Local transform: scale, then rotate, then translate.
    pub fn matrix(&self, id: NodeId) -> StampResult<Matrix3> {
        let node = self.node(id)?;
        let Vector2 { x, y } = node.position;
        Ok(Matrix3::new()
            .scale(node.scale.x, node.scale.y)
            .rotate(node.rotation)
            .translate(x, y))
    }

    /// `parent.world_matrix * matrix`, or the local matrix for a root. Not cached.
    pub fn world_matrix(&self, id: NodeId) -> StampResult<Matrix3> {
        let mut m = self.matrix(id)?;
        let mut cursor = self.node(id)?.parent;
        while let Some(p) = cursor {
            m = self.matrix(p)? * m;
            cursor = self.node(p)?.parent;
        }
        Ok(m)
    }

    /// World matrix seen through the owning scene's camera; identity when detached from any
    /// scene.
    pub fn clip_world_matrix(&self, id: NodeId) -> StampResult<Matrix3> {
        match self.get_scene(id).and_then(|s| self.scene_data(s)) {
            Some(scene) => Ok(scene.camera.matrix_invert() * self.world_matrix(id)?),
            None => Ok(Matrix3::IDENTITY),
        }
    }

    /// Product of scales up the parent chain. Camera zoom is not included.
    pub fn world_scale(&self, id: NodeId) -> StampResult<Vector2> {
        let mut s = self.node(id)?.scale;
        let mut cursor = self.node(id)?.parent;
        while let Some(p) = cursor {
            let node = self.node(p)?;
            s.multiply(node.scale);
            cursor = node.parent;
        }
        Ok(s)
    }

    /// `world_matrix` followed by the image's own offset.
    pub fn world_offset_matrix(&self, id: NodeId) -> StampResult<Matrix3> {
        Ok(self.world_matrix(id)? * self.offset_matrix(id)?)
    }

    pub fn clip_world_offset_matrix(&self, id: NodeId) -> StampResult<Matrix3> {
        Ok(self.clip_world_matrix(id)? * self.offset_matrix(id)?)
    }

    fn offset_matrix(&self, id: NodeId) -> StampResult<Matrix3> {
        let img = self
            .img(id)
            .ok_or_else(|| StampError::graph(format!("node {id:?} is not an image")))?;
        Ok(Matrix3::make_translation(img.offset.x, img.offset.y))
    }

    /// Nearest scene at or above `id`.
    pub fn get_scene(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            let node = self.nodes.get(c)?;
            if node.is_scene() {
                return Some(c);
            }
            cursor = node.parent;
        }
        None
    }

    /// Detach from the current parent, if any.
    pub fn remove_from_parent(&mut self, id: NodeId) -> StampResult<()> {
        match self.node(id)?.parent {
            Some(parent) => self.remove(parent, &[id]),
            None => Ok(()),
        }
    }

    /// Draw a node and its subtree under its local transform. Invisible nodes draw nothing.
    pub fn draw(&self, id: NodeId, surface: &mut dyn Surface) -> StampResult<()> {
        let node = self.node(id)?;
        if !node.visible {
            return Ok(());
        }
        surface.save();
        surface.translate(node.position.x, node.position.y);
        surface.rotate(node.rotation);
        surface.scale(node.scale.x, node.scale.y);
        let drawn = match &node.kind {
            NodeKind::Group | NodeKind::Scene(_) => self.draw_children(&node.children, surface),
            NodeKind::Img(img) => {
                img.draw_shape(surface);
                Ok(())
            }
        };
        surface.restore();
        drawn
    }

    fn draw_children(&self, children: &[NodeId], surface: &mut dyn Surface) -> StampResult<()> {
        for &child in children {
            self.draw(child, surface)?;
        }
        Ok(())
    }

    /// Append the node's boundary path to the surface's current path.
    ///
    /// Images emit their four corners mapped by `projection * world_offset_matrix`, closed.
    /// Groups emit nothing.
    pub fn create_path(
        &self,
        id: NodeId,
        surface: &mut dyn Surface,
        projection: Option<Matrix3>,
    ) -> StampResult<()> {
        let Some(img) = self.img(id) else {
            self.node(id)?;
            return Ok(());
        };
        let world = self.world_offset_matrix(id)?;
        let matrix = projection.map_or(world, |p| p * world);
        let vertices = img.boundary_vertices();
        for (i, pair) in vertices.chunks_exact(2).enumerate() {
            let mut p = Vector2::new(pair[0], pair[1]);
            p.apply_matrix3(&matrix);
            if i == 0 {
                surface.move_to(p.x, p.y);
            } else {
                surface.line_to(p.x, p.y);
            }
        }
        surface.close_path();
        Ok(())
    }

    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        kind: GroupEventKind,
        listener: &GroupListener,
    ) -> StampResult<()> {
        self.node_mut(id)?.events.add_event_listener(kind, listener);
        Ok(())
    }

    pub fn remove_event_listener(
        &mut self,
        id: NodeId,
        kind: GroupEventKind,
        listener: &GroupListener,
    ) -> StampResult<()> {
        self.node_mut(id)?.events.remove_event_listener(kind, listener);
        Ok(())
    }

    pub fn has_event_listener(
        &self,
        id: NodeId,
        kind: GroupEventKind,
        listener: &GroupListener,
    ) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.events.has_event_listener(kind, listener))
    }

    /// Drop every listener attached to `id`.
    pub fn clear_event_listeners(&mut self, id: NodeId) -> StampResult<()> {
        self.node_mut(id)?.events.clear();
        Ok(())
    }

    /// Deliver a group event from `id` to a snapshot of its listeners.
    pub fn dispatch_event(&mut self, id: NodeId, mut event: GroupEvent) -> StampResult<()> {
        use crate::events::dispatcher::Event as _;

        let listeners = self.node(id)?.events.snapshot(event.kind());
        deliver(&listeners, self, &mut event, id).map_err(StampError::from)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
