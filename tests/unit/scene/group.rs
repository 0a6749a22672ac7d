use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    events::dispatcher::listener,
    scene::{graph::GroupListener, img::Img, node::GroupEventKind},
};

fn indexed(g: &mut SceneGraph, index: i32) -> NodeId {
    g.insert(Node::img(Img::default()).with_index(index))
}

fn indices(g: &SceneGraph, group: NodeId) -> Vec<i32> {
    g.children(group).iter().map(|&c| g.get(c).unwrap().index).collect()
}

fn recorder(log: &Rc<RefCell<Vec<GroupChange>>>) -> GroupListener {
    let log = log.clone();
    listener(move |_: &mut SceneGraph, e: &GroupEvent| {
        log.borrow_mut().push(e.change);
        Ok(())
    })
}

#[test]
fn add_sorts_by_index() {
    let mut g = SceneGraph::new();
    let group = g.insert_group();
    let nodes = [indexed(&mut g, 3), indexed(&mut g, 1), indexed(&mut g, 2)];
    g.add(group, &nodes).unwrap();
    assert_eq!(indices(&g, group), vec![1, 2, 3]);
    for n in nodes {
        assert_eq!(g.parent(n), Some(group));
    }
}

#[test]
fn sort_is_stable_and_recursive() {
    let mut g = SceneGraph::new();
    let root = g.insert_group();
    let nested = g.insert(Node::group().with_index(5));
    let a = indexed(&mut g, 1);
    let b = indexed(&mut g, 1);
    g.add(root, &[nested, a, b]).unwrap();
    assert_eq!(g.children(root), &[a, b, nested]);

    let inner = [indexed(&mut g, 9), indexed(&mut g, 0)];
    g.node_mut(nested).unwrap().children.extend(inner);
    for n in inner {
        g.node_mut(n).unwrap().parent = Some(nested);
    }
    g.sort(root).unwrap();
    assert_eq!(indices(&g, nested), vec![0, 9]);
}

#[test]
fn add_then_remove_keeps_sibling_order() {
    let mut g = SceneGraph::new();
    let group = g.insert_group();
    let nodes: Vec<_> = (0..4).map(|i| indexed(&mut g, i)).collect();
    g.add(group, &nodes).unwrap();

    g.remove(group, &[nodes[1]]).unwrap();
    assert_eq!(g.children(group), &[nodes[0], nodes[2], nodes[3]]);
    assert_eq!(g.parent(nodes[1]), None);
}

#[test]
fn add_reparents_and_fires_remove_on_old_parent() {
    let mut g = SceneGraph::new();
    let old = g.insert_group();
    let new = g.insert_group();
    let obj = indexed(&mut g, 0);
    g.add(old, &[obj]).unwrap();

    let old_log = Rc::new(RefCell::new(Vec::new()));
    let new_log = Rc::new(RefCell::new(Vec::new()));
    g.add_event_listener(old, GroupEventKind::Remove, &recorder(&old_log))
        .unwrap();
    g.add_event_listener(new, GroupEventKind::Add, &recorder(&new_log))
        .unwrap();

    g.add(new, &[obj]).unwrap();
    assert_eq!(*old_log.borrow(), vec![GroupChange::Remove { obj }]);
    assert_eq!(*new_log.borrow(), vec![GroupChange::Add { obj }]);
    assert!(g.children(old).is_empty());
    assert_eq!(g.parent(obj), Some(new));
}

#[test]
fn adding_self_or_ancestor_aborts_batch_without_error() {
    let mut g = SceneGraph::new();
    let outer = g.insert_group();
    let inner = g.insert_group();
    g.add(outer, &[inner]).unwrap();

    let before = indexed(&mut g, 0);
    let after = indexed(&mut g, 0);
    g.add(inner, &[before, outer, after]).unwrap();
    assert_eq!(g.children(inner), &[before]);
    assert_eq!(g.parent(after), None);
    assert_eq!(g.parent(outer), None);

    g.add(inner, &[inner]).unwrap();
    assert_eq!(g.parent(inner), Some(outer));
}

#[test]
fn clear_fires_removed_per_child() {
    let mut g = SceneGraph::new();
    let group = g.insert_group();
    let a = indexed(&mut g, 0);
    let b = indexed(&mut g, 1);
    g.add(group, &[a, b]).unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let l = recorder(&log);
    g.add_event_listener(group, GroupEventKind::Removed, &l)
        .unwrap();
    g.add_event_listener(group, GroupEventKind::Remove, &l)
        .unwrap();
    g.clear(group).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![GroupChange::Removed { obj: a }, GroupChange::Removed { obj: b }]
    );
    assert!(g.children(group).is_empty());
    assert_eq!(g.parent(a), None);
}

#[test]
fn listener_error_propagates_to_caller() {
    let mut g = SceneGraph::new();
    let group = g.insert_group();
    let obj = indexed(&mut g, 0);
    let failing: GroupListener =
        listener(|_: &mut SceneGraph, _: &GroupEvent| Err(anyhow::anyhow!("mirror failed")));
    g.add_event_listener(group, GroupEventKind::Add, &failing)
        .unwrap();
    let err = g.add(group, &[obj]).unwrap_err();
    assert!(err.to_string().contains("mirror failed"));
}

#[test]
fn listener_may_mutate_the_graph() {
    let mut g = SceneGraph::new();
    let source = g.insert_group();
    let mirror = g.insert_group();
    let l: GroupListener = listener(move |graph: &mut SceneGraph, e: &GroupEvent| {
        let copy = graph.insert(Node::group().with_uuid(graph.node(e.obj())?.uuid()));
        graph.add(mirror, &[copy])?;
        Ok(())
    });
    g.add_event_listener(source, GroupEventKind::Add, &l).unwrap();

    let obj = indexed(&mut g, 0);
    g.add(source, &[obj]).unwrap();
    let uuid = g.node(obj).unwrap().uuid();
    assert!(g.get_object_by_uuid(mirror, uuid).is_some());
}

#[test]
fn lookup_scans_direct_children_only() {
    let mut g = SceneGraph::new();
    let root = g.insert_group();
    let nested = g.insert_group();
    let deep = g.insert(Node::img(Img::default()).with_name("deep"));
    let top = g.insert(Node::img(Img::default()).with_name("top").with_index(1));
    g.add(nested, &[deep]).unwrap();
    g.add(root, &[nested, top]).unwrap();

    assert_eq!(g.get_object_by_name(root, "top"), Some(top));
    assert_eq!(g.get_object_by_name(root, "deep"), None);
    assert_eq!(
        g.get_object_by_property(root, NodeProperty::Index(1)),
        Some(top)
    );
    let uuid = g.node(deep).unwrap().uuid();
    assert_eq!(g.get_object_by_uuid(nested, uuid), Some(deep));
}

#[test]
fn traverse_is_preorder() {
    let mut g = SceneGraph::new();
    let root = g.insert_group();
    let child = g.insert_group();
    let a = indexed(&mut g, 0);
    let b = indexed(&mut g, 1);
    g.add(child, &[a]).unwrap();
    g.add(root, &[child, b]).unwrap();
    g.node_mut(child).unwrap().index = 0;

    let mut seen = Vec::new();
    g.traverse(root, &mut |id, _| seen.push(id));
    assert_eq!(seen, vec![root, child, a, b]);
}

#[test]
fn traverse_visible_stops_at_first_invisible_sibling() {
    let mut g = SceneGraph::new();
    let root = g.insert_group();
    let first = indexed(&mut g, 0);
    let hidden = g.insert(Node::img(Img::default()).with_index(1).with_visible(false));
    let last = indexed(&mut g, 2);
    g.add(root, &[first, hidden, last]).unwrap();

    let mut seen = Vec::new();
    g.traverse_visible(root, &mut |id, _| seen.push(id));
    assert_eq!(seen, vec![root, first]);

    g.node_mut(root).unwrap().visible = false;
    seen.clear();
    g.traverse_visible(root, &mut |id, _| seen.push(id));
    assert!(seen.is_empty());
}

#[test]
fn swap_children_exchanges_slots_without_sorting() {
    let mut g = SceneGraph::new();
    let group = g.insert_group();
    let a = indexed(&mut g, 0);
    let b = indexed(&mut g, 1);
    g.add(group, &[a, b]).unwrap();
    g.swap_children(group, 0, 1).unwrap();
    assert_eq!(g.children(group), &[b, a]);
    assert!(g.swap_children(group, 0, 2).is_err());
}

#[test]
fn group_ops_on_leaf_are_graph_errors() {
    let mut g = SceneGraph::new();
    let leaf = indexed(&mut g, 0);
    let other = indexed(&mut g, 0);
    assert!(matches!(g.add(leaf, &[other]), Err(StampError::Graph(_))));
    assert!(matches!(g.clear(leaf), Err(StampError::Graph(_))));
}
