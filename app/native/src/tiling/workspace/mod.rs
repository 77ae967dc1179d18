//! A single workspace: one tiled tree plus a set of floating nodes.
//!
//! The workspace owns a `NodeArena` holding every node it manages. The tiled
//! tree hangs off `tiled_root`, a split container that always exists and fills
//! the workarea. Floating nodes are direct children of the workspace, kept in
//! stacking order.
//!
//! # Submodules
//!
//! - `parent` - Container capability: insert/remove/swap, upgrade/downgrade
//! - `navigation` - Directional adjacency and movement
//! - `resize` - Edge-driven resizing, both one-shot and continuous
//!
//! # Active Tracking
//!
//! The workspace remembers the active node, the last active tiled node and
//! the last active floating index. `node_removed` repairs all three after a
//! subtree leaves the tree.

mod navigation;
mod parent;
mod resize;

pub use resize::resize_rect;

use serde::Serialize;
use smallvec::SmallVec;

use super::arena::{DetachedNode, NodeArena};
use super::geometry::{Point, Rect};
use super::node::{
    Node, NodeId, NodeKind, ParentLookup, ParentRef, SplitNode, SplitType, ViewNode, WindowId,
    WorkspaceId,
};
use super::split::layout_children;

/// A geometry change to push to the host for one window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WindowUpdate {
    /// The window to reconfigure.
    pub window: WindowId,
    /// Its new outer geometry.
    pub geometry: Rect,
    /// Whether the window is part of the tiled tree.
    pub tiled: bool,
}

/// A workspace managing a tiled tree and floating nodes.
#[derive(Debug)]
pub struct Workspace {
    id: WorkspaceId,
    workarea: Rect,
    arena: NodeArena,
    tiled_root: NodeId,
    floating: Vec<NodeId>,
    active_node: Option<NodeId>,
    active_tiled: Option<NodeId>,
    active_floating: usize,
}

impl Workspace {
    /// Create a workspace with an empty tiled root filling `workarea`.
    #[must_use]
    pub fn new(id: WorkspaceId, workarea: Rect) -> Self {
        let mut arena = NodeArena::new();
        let tiled_root = arena.alloc(
            id,
            workarea,
            NodeKind::Split(SplitNode::new(SplitType::default())),
        );
        if let Some(root) = arena.get_mut(tiled_root) {
            root.parent = Some(ParentRef::Workspace);
        }

        Self {
            id,
            workarea,
            arena,
            tiled_root,
            floating: Vec::new(),
            active_node: None,
            active_tiled: None,
            active_floating: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Grid coordinate of this workspace.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId { self.id }

    /// Output area minus reserved panels.
    #[must_use]
    pub const fn workarea(&self) -> Rect { self.workarea }

    /// The split container filling the workarea.
    #[must_use]
    pub const fn tiled_root(&self) -> NodeId { self.tiled_root }

    /// Floating nodes in stacking order.
    #[must_use]
    pub fn floating_nodes(&self) -> &[NodeId] { &self.floating }

    /// Read access to the node storage.
    #[must_use]
    pub const fn arena(&self) -> &NodeArena { &self.arena }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> { self.arena.get(id) }

    /// Whether `id` still refers to a live node of this workspace.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool { self.arena.contains(id) }

    /// Current parent of a node.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<ParentRef> { self.arena.get(id)?.parent }

    /// Outer geometry of a node.
    #[must_use]
    pub fn geometry(&self, id: NodeId) -> Option<Rect> { self.arena.get(id).map(Node::geometry) }

    /// Whether the node itself is floating.
    #[must_use]
    pub fn is_floating(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(Node::is_floating)
    }

    /// Whether the node hangs off this workspace through its parent chain.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            match self.parent_of(current) {
                Some(ParentRef::Workspace) => return true,
                Some(ParentRef::Split(parent)) => current = parent,
                None => return false,
            }
        }
    }

    /// Node wrapping `window`, if this workspace manages it.
    #[must_use]
    pub fn find_view(&self, window: WindowId) -> Option<NodeId> {
        self.arena.iter().find(|n| n.window() == Some(window)).map(Node::id)
    }

    /// Windows currently in the tree, sorted by id.
    #[must_use]
    pub fn windows(&self) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = self
            .arena
            .iter()
            .filter(|n| self.is_attached(n.id))
            .filter_map(Node::window)
            .collect();
        windows.sort_unstable();
        windows
    }

    /// Window under `point`: topmost floating window first, then tiled.
    ///
    /// Inside a tabbed or stacked split the active child wins, since every
    /// child shares the split's rectangle.
    #[must_use]
    pub fn window_at(&self, point: Point) -> Option<WindowId> {
        self.floating
            .iter()
            .rev()
            .find_map(|&root| self.window_in_subtree(root, point))
            .or_else(|| self.window_in_subtree(self.tiled_root, point))
    }

    fn window_in_subtree(&self, id: NodeId, point: Point) -> Option<WindowId> {
        let node = self.arena.get(id).filter(|n| n.geometry.contains(point))?;
        let Some(split) = node.as_split() else {
            return node.window();
        };
        if split.split_type.is_overlapping() {
            let active = split.children.get(split.active_child)?;
            return self.window_in_subtree(active.node, point);
        }
        split.child_ids().find_map(|child| self.window_in_subtree(child, point))
    }

    /// Whether neither the tiled tree nor the floating set holds anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floating.is_empty()
            && self.arena.get(self.tiled_root).and_then(Node::as_split).is_none_or(SplitNode::is_empty)
    }

    // ========================================================================
    // Creation / Destruction
    // ========================================================================

    /// Allocate a detached view for `window`.
    pub fn create_view(
        &mut self,
        window: WindowId,
        title: impl Into<String>,
        geometry: Rect,
    ) -> DetachedNode {
        let id = self.arena.alloc(
            self.id,
            geometry,
            NodeKind::View(ViewNode::new(window, title, geometry)),
        );
        tracing::debug!(workspace = %self.id, node = %id, window = %window, "tiling: created view");
        DetachedNode::new(id)
    }

    /// Allocate a detached, empty split container.
    pub(crate) fn create_split(&mut self, geometry: Rect, split_type: SplitType) -> DetachedNode {
        DetachedNode::new(self.arena.alloc(
            self.id,
            geometry,
            NodeKind::Split(SplitNode::new(split_type)),
        ))
    }

    /// Free a detached subtree.
    pub fn destroy(&mut self, node: DetachedNode) {
        let id = node.into_id();
        for victim in self.arena.subtree(id) {
            self.arena.remove(victim);
        }
        self.node_removed(id);
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Set a node's outer geometry.
    ///
    /// A split re-runs the layout of its children; the change never bubbles
    /// up. A floating view also records the rectangle as its floating
    /// geometry.
    pub fn set_geometry(&mut self, id: NodeId, rect: Rect) -> bool {
        let Some(node) = self.arena.get_mut(id) else {
            return false;
        };
        node.geometry = rect;
        let floating = node.floating;

        let children: SmallVec<[(NodeId, Rect); 4]> = match &mut node.kind {
            NodeKind::View(view) => {
                if floating {
                    view.floating_geometry = rect;
                }
                return true;
            }
            NodeKind::Split(split) => split
                .child_ids()
                .zip(layout_children(rect, split.split_type, &split.children))
                .collect(),
        };

        for (child, child_rect) in children {
            self.set_geometry(child, child_rect);
        }
        true
    }

    /// Re-apply a node's current geometry, refreshing its children.
    pub fn refresh_geometry(&mut self, id: NodeId) -> bool {
        self.geometry(id).is_some_and(|rect| self.set_geometry(id, rect))
    }

    /// Set the floating flag of a node (not of its children).
    pub fn set_floating(&mut self, id: NodeId, floating: bool) {
        if let Some(node) = self.arena.get_mut(id) {
            node.floating = floating;
        }
    }

    /// Record a window's floating geometry without moving it.
    pub fn set_floating_geometry(&mut self, id: NodeId, rect: Rect) -> bool {
        match self.arena.get_mut(id).and_then(Node::as_view_mut) {
            Some(view) => {
                view.floating_geometry = rect;
                true
            }
            None => false,
        }
    }

    /// Set the workarea and relayout.
    ///
    /// The tiled root is resized to fill it. Floating nodes are kept inside:
    /// their size only shrinks if larger than the workarea, then the position
    /// is clamped. Nothing is rescaled.
    pub fn set_workarea(&mut self, workarea: Rect) {
        tracing::debug!(workspace = %self.id, workarea = %workarea, "tiling: workarea changed");
        self.workarea = workarea;
        self.set_geometry(self.tiled_root, workarea);

        for id in self.floating.clone() {
            if let Some(current) = self.geometry(id) {
                let clamped = current.clamped_within(&workarea);
                if clamped != current {
                    self.set_geometry(id, clamped);
                }
            }
        }
    }

    // ========================================================================
    // Floating
    // ========================================================================

    /// Add a node to the floating set.
    ///
    /// A view is placed at its last floating geometry; a split keeps its
    /// current geometry.
    pub fn insert_floating_node(&mut self, node: DetachedNode) {
        let id = node.into_id();
        let Some(entry) = self.arena.get_mut(id) else {
            return;
        };
        entry.parent = Some(ParentRef::Workspace);
        entry.floating = true;
        let rect = entry.as_view().map_or(entry.geometry, |v| v.floating_geometry);

        self.floating.push(id);
        self.set_geometry(id, rect);
        tracing::debug!(workspace = %self.id, node = %id, geometry = %rect, "tiling: inserted floating node");
    }

    /// Remove a node from the floating set.
    pub fn remove_floating_node(&mut self, id: NodeId) -> Option<DetachedNode> {
        let index = self.floating.iter().position(|&f| f == id)?;
        self.floating.remove(index);
        if index < self.active_floating {
            self.active_floating -= 1;
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = None;
        }
        self.node_removed(id);
        Some(DetachedNode::new(id))
    }

    /// Replace a floating node with another, in the same stacking slot.
    ///
    /// The incoming node keeps its own geometry. On failure the incoming node
    /// is handed back.
    pub fn swap_floating_node(
        &mut self,
        id: NodeId,
        other: DetachedNode,
    ) -> Result<DetachedNode, DetachedNode> {
        let Some(index) = self.floating.iter().position(|&f| f == id) else {
            return Err(other);
        };
        if !self.arena.contains(other.id()) {
            return Err(other);
        }
        let other = other.into_id();

        self.floating[index] = other;
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = None;
        }
        if let Some(node) = self.arena.get_mut(other) {
            node.parent = Some(ParentRef::Workspace);
            node.floating = true;
        }
        self.refresh_geometry(other);
        Ok(DetachedNode::new(id))
    }

    /// Last active floating node.
    #[must_use]
    pub fn active_floating_node(&self) -> Option<NodeId> {
        self.floating.get(self.active_floating).copied()
    }

    // ========================================================================
    // Tiled
    // ========================================================================

    /// Insert a node into the tiled tree next to the active tiled node.
    ///
    /// If the active tiled node is a split, the node goes at its back. If it
    /// is a view with a split preference, it is upgraded first and the node
    /// goes after it inside the new split. Otherwise the node goes right after
    /// it in its parent. Without an active tiled node, the node goes at the
    /// back of the root.
    pub fn insert_tiled_node(&mut self, node: DetachedNode) {
        let id = node.id();
        let anchor = self.active_tiled.filter(|&a| {
            a != id && self.is_attached(a) && self.find_floating_parent(a).is_none()
        });

        let (split, after) = match anchor.map(|a| (a, self.get_or_upgrade_to_parent_node(a))) {
            Some((active, ParentLookup::Parent(split))) if split == active => {
                (split, None)
            }
            Some((active, ParentLookup::Parent(split))) => (split, Some(active)),
            Some((_, ParentLookup::NotParent(active))) => match self.parent_of(active) {
                Some(ParentRef::Split(parent)) => (parent, Some(active)),
                _ => (self.tiled_root, None),
            },
            None => (self.tiled_root, None),
        };

        let index = after
            .and_then(|a| self.split(split).and_then(|s| s.index_of(a)))
            .map_or_else(|| self.split(split).map_or(0, SplitNode::len), |i| i + 1);

        self.attach_at(split, index, node.into_id());
        tracing::debug!(workspace = %self.id, node = %id, parent = %split, "tiling: inserted tiled node");
    }

    /// Remove a node from its split container, collapsing emptied containers.
    pub fn remove_tiled_node(&mut self, id: NodeId) -> Option<DetachedNode> {
        match self.parent_of(id)? {
            ParentRef::Split(parent) => self.remove_child(parent, id),
            ParentRef::Workspace => None,
        }
    }

    /// Replace the tiled root with another split.
    ///
    /// The incoming split is resized to the workarea. On failure (not a split)
    /// the incoming node is handed back.
    pub fn swap_tiled_root(&mut self, other: DetachedNode) -> Result<DetachedNode, DetachedNode> {
        if !self.arena.get(other.id()).is_some_and(Node::is_split) {
            return Err(other);
        }
        let other = other.into_id();
        let old = self.tiled_root;

        if let Some(node) = self.arena.get_mut(old) {
            node.parent = None;
        }
        if let Some(node) = self.arena.get_mut(other) {
            node.parent = Some(ParentRef::Workspace);
            node.floating = false;
        }
        self.tiled_root = other;
        self.set_geometry(other, self.workarea);
        Ok(DetachedNode::new(old))
    }

    /// Last active tiled node.
    #[must_use]
    pub const fn active_tiled_node(&self) -> Option<NodeId> { self.active_tiled }

    // ========================================================================
    // Both
    // ========================================================================

    /// Remove any non-root node from wherever it lives in this workspace.
    pub fn remove_node(&mut self, id: NodeId) -> Option<DetachedNode> {
        match self.parent_of(id)? {
            ParentRef::Split(_) => self.remove_tiled_node(id),
            ParentRef::Workspace => self.remove_floating_node(id),
        }
    }

    /// Move a node between the tiled tree and the floating set.
    ///
    /// Tiled to floating appends the node to the floating set at its last
    /// floating geometry. Floating to tiled inserts it next to the active
    /// tiled node. The node becomes active either way.
    pub fn toggle_tile_node(&mut self, id: NodeId) -> bool {
        if id == self.tiled_root {
            return false;
        }

        if self.floating.contains(&id) {
            let Some(node) = self.remove_floating_node(id) else {
                return false;
            };
            self.insert_tiled_node(node);
        } else {
            let Some(node) = self.remove_tiled_node(id) else {
                return false;
            };
            self.insert_floating_node(node);
        }

        tracing::debug!(workspace = %self.id, node = %id, floating = self.is_floating(id), "tiling: toggled tile");
        self.set_active(id);
        true
    }

    /// Repair active tracking after `id` left the tree.
    pub fn node_removed(&mut self, id: NodeId) {
        if self
            .active_tiled
            .is_some_and(|a| !self.is_attached(a) || self.find_floating_parent(a).is_some())
        {
            self.active_tiled = self
                .split(self.tiled_root)
                .filter(|root| !root.is_empty())
                .map(|_| self.last_active_descendant(self.tiled_root));
        }

        self.active_floating = self.active_floating.min(self.floating.len().saturating_sub(1));

        if self.active_node.is_some_and(|a| !self.is_attached(a)) {
            self.active_node = self
                .active_tiled
                .or_else(|| self.active_floating_node().map(|f| self.last_active_descendant(f)));
        }

        tracing::trace!(workspace = %self.id, node = %id, "tiling: node removed");
    }

    // ========================================================================
    // Active Tracking
    // ========================================================================

    /// Make `id` the active node, bubbling the active child up to the
    /// workspace.
    pub fn set_active(&mut self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        self.active_node = Some(id);
        if self.find_floating_parent(id).is_none() {
            self.active_tiled = Some(id);
        }
        self.set_active_child(id);
        true
    }

    /// Currently active node.
    #[must_use]
    pub const fn active_node(&self) -> Option<NodeId> { self.active_node }

    /// Window of the active node, if it is a view.
    #[must_use]
    pub fn active_window(&self) -> Option<WindowId> {
        self.active_node.and_then(|id| self.arena.get(id)).and_then(Node::window)
    }

    /// The deepest last active node of the workspace.
    #[must_use]
    pub fn get_last_active_node(&self) -> Option<NodeId> {
        if let Some(active) = self.active_node.filter(|&a| self.is_attached(a)) {
            return Some(self.last_active_descendant(active));
        }
        if self.split(self.tiled_root).is_some_and(|root| !root.is_empty()) {
            return Some(self.last_active_descendant(self.tiled_root));
        }
        self.active_floating_node().map(|f| self.last_active_descendant(f))
    }

    // ========================================================================
    // Host Updates
    // ========================================================================

    /// Geometry changes since the last call, in window order.
    ///
    /// `tiled` is true when no ancestor (or the view itself) is floating.
    pub fn take_window_updates(&mut self) -> Vec<WindowUpdate> {
        let mut views: Vec<(WindowId, NodeId)> = self
            .arena
            .iter()
            .filter_map(|n| n.window().map(|w| (w, n.id)))
            .filter(|&(_, id)| self.is_attached(id))
            .collect();
        views.sort_unstable();

        let mut updates = Vec::new();
        for (window, id) in views {
            let tiled = self.find_floating_parent(id).is_none();
            let Some(node) = self.arena.get_mut(id) else { continue };
            let geometry = node.geometry;
            let Some(view) = node.as_view_mut() else { continue };
            if view.applied != Some((geometry, tiled)) {
                view.applied = Some((geometry, tiled));
                updates.push(WindowUpdate {
                    window,
                    geometry,
                    tiled,
                });
            }
        }
        updates
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Container payload of `id`.
    pub(crate) fn split(&self, id: NodeId) -> Option<&SplitNode> {
        self.arena.get(id).and_then(Node::as_split)
    }

    fn split_mut(&mut self, id: NodeId) -> Option<&mut SplitNode> {
        self.arena.get_mut(id).and_then(Node::as_split_mut)
    }

    /// Follow active children down from `id` to the deepest node.
    pub(crate) fn last_active_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(split) = self.split(current) {
            match split.children.get(split.active_child) {
                Some(child) => current = child.node,
                None => break,
            }
        }
        current
    }
}

// ============================================================================
// Tests
// ============================================================================
