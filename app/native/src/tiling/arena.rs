//! Node storage for one workspace.
//!
//! Every workspace owns a `NodeArena`. Nodes refer to each other (parent,
//! children) by `NodeId` only; the arena is the single owner of node data.
//! Ids come from a per-arena counter and are never handed out twice, so a
//! stale id is detected by a failed lookup rather than by dereferencing freed
//! memory.

use std::collections::BTreeMap;

use super::geometry::Rect;
use super::node::{Node, NodeId, NodeKind, WorkspaceId};

// ============================================================================
// Detached Node
// ============================================================================

/// Ownership token for a node that currently has no parent.
///
/// Removal operations hand one out; insertion operations consume one. A token
/// that is neither re-inserted nor passed to `Workspace::destroy` leaks its
/// subtree inside the arena until the workspace is dropped.
#[must_use = "a detached node must be re-inserted or destroyed"]
#[derive(Debug, PartialEq, Eq)]
pub struct DetachedNode(NodeId);

impl DetachedNode {
    pub(crate) const fn new(id: NodeId) -> Self { Self(id) }

    /// The id of the detached subtree root.
    #[must_use]
    pub const fn id(&self) -> NodeId { self.0 }

    /// Consume the token, yielding the id.
    pub(crate) const fn into_id(self) -> NodeId { self.0 }
}

// ============================================================================
// Arena
// ============================================================================

/// Id-indexed node storage with a private id counter.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
}

impl NodeArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Allocate a detached node and return its fresh id.
    pub fn alloc(&mut self, workspace: WorkspaceId, geometry: Rect, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node {
            id,
            geometry,
            floating: false,
            workspace,
            parent: None,
            kind,
        });
        id
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> { self.nodes.get(&id) }

    /// Look up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> { self.nodes.get_mut(&id) }

    /// Whether the id still resolves.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool { self.nodes.contains_key(&id) }

    /// Remove a single node, returning its data.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> { self.nodes.remove(&id) }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Whether no nodes are allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Iterate over all live nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> { self.nodes.values() }

    /// Collect the ids of `root` and all its descendants, parents first.
    #[must_use]
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else { continue };
            out.push(id);
            if let Some(split) = node.as_split() {
                stack.extend(split.child_ids().rev());
            }
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::geometry::Point;
    use crate::tiling::node::{SplitNode, SplitType, ViewNode, WindowId};

    fn view_kind(window: u32) -> NodeKind {
        NodeKind::View(ViewNode::new(WindowId(window), "view", Rect::zero()))
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Point::default(), Rect::zero(), view_kind(1));
        let b = arena.alloc(Point::default(), Rect::zero(), view_kind(2));
        assert_ne!(a, b);

        assert!(arena.remove(b).is_some());
        let c = arena.alloc(Point::default(), Rect::zero(), view_kind(3));
        assert_ne!(c, b);
        assert!(!arena.contains(b));
        assert!(arena.contains(c));
    }

    #[test]
    fn test_arenas_count_independently() {
        let mut first = NodeArena::new();
        let mut second = NodeArena::new();
        let a = first.alloc(Point::default(), Rect::zero(), view_kind(1));
        let b = second.alloc(Point::new(1, 0), Rect::zero(), view_kind(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_new_nodes_are_detached() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(Point::default(), Rect::zero(), view_kind(1));
        let node = arena.get(id).unwrap();
        assert!(node.parent().is_none());
        assert!(!node.is_floating());
    }

    #[test]
    fn test_subtree_lists_parents_first() {
        let mut arena = NodeArena::new();
        let root = arena.alloc(
            Point::default(),
            Rect::zero(),
            NodeKind::Split(SplitNode::new(SplitType::HSplit)),
        );
        let a = arena.alloc(Point::default(), Rect::zero(), view_kind(1));
        let b = arena.alloc(Point::default(), Rect::zero(), view_kind(2));
        let split = arena.get_mut(root).unwrap().as_split_mut().unwrap();
        split.children.push(crate::tiling::node::SplitChild::new(a, 0.5));
        split.children.push(crate::tiling::node::SplitChild::new(b, 0.5));

        assert_eq!(arena.subtree(root), vec![root, a, b]);
        assert_eq!(arena.subtree(NodeId(99)), Vec::<NodeId>::new());
    }
}
