use uuid::Uuid;

use crate::{
    foundation::error::{StampError, StampResult},
    scene::{
        graph::SceneGraph,
        node::{GroupChange, GroupEvent, Node, NodeId, NodeProperty},
    },
};

impl SceneGraph {
    fn expect_group(&self, group: NodeId) -> StampResult<&Node> {
        let node = self.node(group)?;
        if !node.is_group() {
            return Err(StampError::graph(format!("node {group:?} is not a group")));
        }
        Ok(node)
    }

    /// `true` when `candidate` is `id` or one of its ancestors.
    fn is_self_or_ancestor(&self, id: NodeId, candidate: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            if c == candidate {
                return true;
            }
            cursor = self.parent(c);
        }
        false
    }

    /// Append `objs` to `group`, each firing `add`, then re-sort the subtree.
    ///
    /// A node that already has a parent is detached from it first (firing that parent's
    /// `remove`). Adding the group to itself or to one of its descendants is logged and stops
    /// the batch; nodes before it stay added.
    pub fn add(&mut self, group: NodeId, objs: &[NodeId]) -> StampResult<()> {
        self.expect_group(group)?;
        for &obj in objs {
            self.node(obj)?;
            if self.is_self_or_ancestor(group, obj) {
                tracing::error!(?group, ?obj, "obj can't be added as a child of itself");
                return Ok(());
            }
            if let Some(previous) = self.node(obj)?.parent {
                self.remove(previous, &[obj])?;
            }
            self.node_mut(obj)?.parent = Some(group);
            self.node_mut(group)?.children.push(obj);
            self.dispatch_event(group, GroupEvent::new(GroupChange::Add { obj }))?;
        }
        self.sort(group)
    }

    /// Splice each present node out of `group`, firing `remove`. Absent nodes are skipped.
    pub fn remove(&mut self, group: NodeId, objs: &[NodeId]) -> StampResult<()> {
        self.expect_group(group)?;
        for &obj in objs {
            let children = &mut self.node_mut(group)?.children;
            let Some(pos) = children.iter().position(|&c| c == obj) else {
                continue;
            };
            children.remove(pos);
            if let Some(node) = self.get_mut(obj) {
                node.parent = None;
            }
            self.dispatch_event(group, GroupEvent::new(GroupChange::Remove { obj }))?;
        }
        Ok(())
    }

    /// Detach every child at once, then fire one `removed` per former child.
    pub fn clear(&mut self, group: NodeId) -> StampResult<()> {
        self.expect_group(group)?;
        let children = std::mem::take(&mut self.node_mut(group)?.children);
        for &obj in &children {
            if let Some(node) = self.get_mut(obj) {
                node.parent = None;
            }
        }
        for obj in children {
            self.dispatch_event(group, GroupEvent::new(GroupChange::Removed { obj }))?;
        }
        Ok(())
    }

    /// Stable ascending sort by `index`, recursing into child groups.
    pub fn sort(&mut self, group: NodeId) -> StampResult<()> {
        let mut children = std::mem::take(&mut self.expect_group_mut(group)?.children);
        children.sort_by_key(|&c| self.get(c).map_or(0, |n| n.index));
        let nested: Vec<NodeId> = children
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(Node::is_group))
            .collect();
        self.node_mut(group)?.children = children;
        for child in nested {
            self.sort(child)?;
        }
        Ok(())
    }

    fn expect_group_mut(&mut self, group: NodeId) -> StampResult<&mut Node> {
        self.expect_group(group)?;
        self.node_mut(group)
    }

    /// First direct child matching `property`.
    pub fn get_object_by_property(
        &self,
        group: NodeId,
        property: NodeProperty<'_>,
    ) -> Option<NodeId> {
        self.children(group)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.matches(property)))
    }

    pub fn get_object_by_name(&self, group: NodeId, name: &str) -> Option<NodeId> {
        self.get_object_by_property(group, NodeProperty::Name(name))
    }

    pub fn get_object_by_uuid(&self, group: NodeId, uuid: Uuid) -> Option<NodeId> {
        self.get_object_by_property(group, NodeProperty::Uuid(uuid))
    }

    /// Depth-first preorder over `root` and its whole subtree.
    pub fn traverse(&self, root: NodeId, f: &mut impl FnMut(NodeId, &Node)) {
        let Some(node) = self.get(root) else {
            return;
        };
        f(root, node);
        for &child in &node.children {
            self.traverse(child, f);
        }
    }

    /// Like [`SceneGraph::traverse`], skipping invisible nodes and their subtrees.
    ///
    /// An invisible child also ends the walk over its later siblings.
    pub fn traverse_visible(&self, root: NodeId, f: &mut impl FnMut(NodeId, &Node)) {
        let Some(node) = self.get(root) else {
            return;
        };
        if !node.visible {
            return;
        }
        f(root, node);
        for &child in &node.children {
            if !self.get(child).is_some_and(|c| c.visible) {
                return;
            }
            self.traverse_visible(child, f);
        }
    }

    /// Exchange two child slots of `group` without re-sorting.
    pub fn swap_children(&mut self, group: NodeId, a: usize, b: usize) -> StampResult<()> {
        let children = &mut self.expect_group_mut(group)?.children;
        if a >= children.len() || b >= children.len() {
            return Err(StampError::graph(format!(
                "swap_children({a}, {b}) out of range for {} children",
                children.len()
            )));
        }
        children.swap(a, b);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/group.rs"]
mod tests;
