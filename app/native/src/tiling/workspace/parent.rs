//! Container capability of the layout tree.
//!
//! Everything that edits a split's child list lives here: insertion at a
//! position, raw removal, swapping, collapsing emptied containers, and the
//! upgrade/downgrade conversions between a view and a one-child split.

use super::Workspace;
use crate::tiling::arena::DetachedNode;
use crate::tiling::node::{Node, NodeId, NodeKind, ParentLookup, ParentRef, SplitType};

impl Workspace {
    // ========================================================================
    // Raw Attach / Detach
    // ========================================================================

    /// Link `id` into `split` at `index` and relayout the split.
    pub(crate) fn attach_at(&mut self, split: NodeId, index: usize, id: NodeId) -> bool {
        if split == id || !self.arena.contains(id) {
            return false;
        }
        let Some(container) = self.split_mut(split) else {
            return false;
        };
        container.insert_entry(index, id);

        if let Some(node) = self.arena.get_mut(id) {
            node.parent = Some(ParentRef::Split(split));
            node.floating = false;
        }
        self.refresh_geometry(split);
        true
    }

    /// Unlink the child at `index` from `split` without collapsing anything.
    pub(crate) fn detach_at(&mut self, split: NodeId, index: usize) -> Option<NodeId> {
        let removed = self.split_mut(split)?.remove_entry(index)?;
        if let Some(node) = self.arena.get_mut(removed.node) {
            node.parent = None;
        }
        self.refresh_geometry(split);
        Some(removed.node)
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert a node as a direct child of `split` at `index`.
    ///
    /// The node is handed back if `split` is not a live container.
    pub fn insert_child_at(
        &mut self,
        split: NodeId,
        index: usize,
        node: DetachedNode,
    ) -> Result<(), DetachedNode> {
        if self.attach_at(split, index, node.id()) {
            let _ = node.into_id();
            Ok(())
        } else {
            Err(node)
        }
    }

    /// Insert a node at the front of `split`.
    pub fn insert_child_front(&mut self, split: NodeId, node: DetachedNode) -> Result<(), DetachedNode> {
        self.insert_child_at(split, 0, node)
    }

    /// Insert a node at the back of `split`.
    pub fn insert_child_back(&mut self, split: NodeId, node: DetachedNode) -> Result<(), DetachedNode> {
        let len = self.split(split).map_or(0, |s| s.len());
        self.insert_child_at(split, len, node)
    }

    /// Insert a node just before the direct child `of`.
    pub fn insert_child_front_of(
        &mut self,
        split: NodeId,
        of: NodeId,
        node: DetachedNode,
    ) -> Result<(), DetachedNode> {
        match self.split(split).and_then(|s| s.index_of(of)) {
            Some(index) => self.insert_child_at(split, index, node),
            None => Err(node),
        }
    }

    /// Insert a node just after the direct child `of`.
    pub fn insert_child_back_of(
        &mut self,
        split: NodeId,
        of: NodeId,
        node: DetachedNode,
    ) -> Result<(), DetachedNode> {
        match self.split(split).and_then(|s| s.index_of(of)) {
            Some(index) => self.insert_child_at(split, index + 1, node),
            None => Err(node),
        }
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove the child at `index` without applying the collapse rule.
    ///
    /// The caller is responsible for collapsing `split` if it is left empty
    /// and for calling `node_removed`.
    pub fn remove_child_at(&mut self, split: NodeId, index: usize) -> Option<DetachedNode> {
        self.detach_at(split, index).map(DetachedNode::new)
    }

    /// Remove a direct child of `split`, collapsing emptied containers.
    pub fn remove_child(&mut self, split: NodeId, id: NodeId) -> Option<DetachedNode> {
        let index = self.split(split)?.index_of(id)?;
        let removed = self.detach_at(split, index)?;
        self.collapse_if_empty(split);
        self.node_removed(removed);
        tracing::debug!(workspace = %self.id, node = %removed, parent = %split, "tiling: removed child");
        Some(DetachedNode::new(removed))
    }

    /// Destroy `split` if it has no children, then walk up.
    ///
    /// The tiled root is never collapsed.
    pub(crate) fn collapse_if_empty(&mut self, split: NodeId) {
        let mut current = split;
        loop {
            if current == self.tiled_root || !self.split(current).is_some_and(|s| s.is_empty()) {
                return;
            }

            let parent = self.parent_of(current);
            match parent {
                Some(ParentRef::Split(grandparent)) => {
                    if let Some(index) = self.split(grandparent).and_then(|s| s.index_of(current)) {
                        let _ = self.detach_at(grandparent, index);
                    }
                    tracing::trace!(node = %current, "tiling: collapsed empty split");
                    self.destroy(DetachedNode::new(current));
                    current = grandparent;
                }
                Some(ParentRef::Workspace) => {
                    if let Some(detached) = self.remove_floating_node(current) {
                        tracing::trace!(node = %current, "tiling: collapsed empty floating split");
                        self.destroy(detached);
                    }
                    return;
                }
                None => return,
            }
        }
    }

    // ========================================================================
    // Swap
    // ========================================================================

    /// Put `other` in the slot `id` occupies and hand `id` back detached.
    ///
    /// Works wherever `id` lives: in a split, in the floating set, or as the
    /// tiled root (which only accepts a split). On failure `other` is handed
    /// back.
    pub fn swap_child(&mut self, id: NodeId, other: DetachedNode) -> Result<DetachedNode, DetachedNode> {
        if !self.arena.contains(other.id()) || other.id() == id {
            return Err(other);
        }
        match self.parent_of(id) {
            Some(ParentRef::Split(split)) => {
                let Some(index) = self.split(split).and_then(|s| s.index_of(id)) else {
                    return Err(other);
                };
                let other = other.into_id();
                if let Some(entry) = self.split_mut(split).and_then(|s| s.children.get_mut(index)) {
                    entry.node = other;
                }
                if let Some(node) = self.arena.get_mut(id) {
                    node.parent = None;
                }
                if let Some(node) = self.arena.get_mut(other) {
                    node.parent = Some(ParentRef::Split(split));
                    node.floating = false;
                }
                self.refresh_geometry(split);
                Ok(DetachedNode::new(id))
            }
            Some(ParentRef::Workspace) if id == self.tiled_root => self.swap_tiled_root(other),
            Some(ParentRef::Workspace) => self.swap_floating_node(id, other),
            None => Err(other),
        }
    }

    // ========================================================================
    // Active Child
    // ========================================================================

    /// Record `id` as the active child of its parent, bubbling up to the
    /// workspace.
    pub fn set_active_child(&mut self, id: NodeId) {
        let mut current = id;
        loop {
            match self.parent_of(current) {
                Some(ParentRef::Split(split)) => {
                    if let Some(container) = self.split_mut(split) {
                        if let Some(index) = container.index_of(current) {
                            container.active_child = index;
                        }
                    }
                    current = split;
                }
                Some(ParentRef::Workspace) => {
                    if let Some(index) = self.floating.iter().position(|&f| f == current) {
                        self.active_floating = index;
                    }
                    return;
                }
                None => return,
            }
        }
    }

    // ========================================================================
    // Split Mode
    // ========================================================================

    /// Flip a split between vertical and horizontal and relayout.
    ///
    /// `Tabbed` becomes `VSplit` and `Stacked` becomes `HSplit`.
    pub fn toggle_split_direction(&mut self, split: NodeId) -> bool {
        let Some(container) = self.split_mut(split) else {
            return false;
        };
        container.split_type = container.split_type.toggled();
        let split_type = container.split_type;
        self.refresh_geometry(split);
        tracing::debug!(node = %split, split_type = %split_type, "tiling: toggled split direction");
        true
    }

    /// Change the layout mode of a split and relayout.
    pub fn set_split_type(&mut self, split: NodeId, split_type: SplitType) -> bool {
        let Some(container) = self.split_mut(split) else {
            return false;
        };
        container.split_type = split_type;
        self.refresh_geometry(split);
        true
    }

    /// Remember the split mode a view should be wrapped in once something
    /// is inserted next to it.
    pub fn set_preferred_split(&mut self, view: NodeId, split_type: SplitType) -> bool {
        match self.arena.get_mut(view).and_then(Node::as_view_mut) {
            Some(v) => {
                v.preferred_split = Some(split_type);
                tracing::debug!(node = %view, split_type = %split_type, "tiling: split preference set");
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Upgrade / Downgrade
    // ========================================================================

    /// Wrap a view into a new one-child split if it has a split preference.
    ///
    /// The split takes the view's geometry, slot and floating state. The
    /// preference is cleared.
    ///
    /// # Returns
    ///
    /// The new split, or `None` if the view has no preference.
    pub fn try_upgrade(&mut self, view: NodeId) -> Option<NodeId> {
        let node = self.arena.get(view)?;
        let preferred = node.as_view()?.preferred_split?;
        let geometry = node.geometry;
        node.parent?;

        let split = self.create_split(geometry, preferred);
        let split_id = split.id();
        let detached = match self.swap_child(view, split) {
            Ok(detached) => detached,
            Err(split) => {
                self.destroy(split);
                return None;
            }
        };

        let _ = self.attach_at(split_id, 0, detached.into_id());
        if let Some(v) = self.arena.get_mut(view).and_then(Node::as_view_mut) {
            v.preferred_split = None;
        }
        tracing::debug!(view = %view, split = %split_id, split_type = %preferred, "tiling: upgraded view");
        Some(split_id)
    }

    /// Replace a one-child split with its only child.
    ///
    /// A view child remembers the split mode as its preference so it can be
    /// upgraded back later. The tiled root only downgrades into a split child.
    ///
    /// # Returns
    ///
    /// The child now occupying the slot, or `None` if not applicable.
    pub fn try_downgrade(&mut self, split: NodeId) -> Option<NodeId> {
        let container = self.split(split)?;
        if container.len() != 1 {
            return None;
        }
        let split_type = container.split_type;
        let child = container.children[0].node;
        let child_is_split = self.arena.get(child).is_some_and(Node::is_split);

        if split == self.tiled_root && !child_is_split {
            return None;
        }

        let detached = self.remove_child_at(split, 0)?;
        let old = match self.swap_child(split, detached) {
            Ok(old) => old,
            Err(detached) => {
                let _ = self.attach_at(split, 0, detached.into_id());
                return None;
            }
        };
        self.destroy(old);

        if let Some(NodeKind::View(view)) = self.arena.get_mut(child).map(|n| &mut n.kind) {
            view.preferred_split = Some(split_type);
        }
        tracing::debug!(split = %split, child = %child, "tiling: downgraded split");
        Some(child)
    }

    /// Return the node itself if it is a split, try to upgrade it if it is a
    /// view, or report that it is not a parent.
    pub fn get_or_upgrade_to_parent_node(&mut self, id: NodeId) -> ParentLookup {
        if self.arena.get(id).is_some_and(Node::is_split) {
            return ParentLookup::Parent(id);
        }
        self.try_upgrade(id).map_or(ParentLookup::NotParent(id), ParentLookup::Parent)
    }

    // ========================================================================
    // Ancestor Queries
    // ========================================================================

    /// The node itself if floating, else its nearest floating ancestor.
    #[must_use]
    pub fn find_floating_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = self.arena.get(current)?;
            if node.floating {
                return Some(current);
            }
            match node.parent? {
                ParentRef::Split(parent) => current = parent,
                ParentRef::Workspace => return None,
            }
        }
    }

    /// Nearest ancestor split whose axis is horizontal (or vertical).
    #[must_use]
    pub fn find_parent_split(&self, id: NodeId, horizontal: bool) -> Option<NodeId> {
        self.find_parent_split_with_branch(id, horizontal).map(|(split, _)| split)
    }

    /// Like `find_parent_split`, also returning the child of that split on
    /// the path down to `id`.
    pub(crate) fn find_parent_split_with_branch(
        &self,
        id: NodeId,
        horizontal: bool,
    ) -> Option<(NodeId, NodeId)> {
        let mut branch = id;
        loop {
            let ParentRef::Split(parent) = self.parent_of(branch)? else {
                return None;
            };
            if self.split(parent)?.split_type.is_horizontal() == horizontal {
                return Some((parent, branch));
            }
            branch = parent;
        }
    }

    /// Topmost split of the tree containing `id`: the tiled root or a
    /// floating split.
    pub(crate) fn top_split(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        let mut top = None;
        loop {
            if self.arena.get(current)?.is_split() {
                top = Some(current);
            }
            match self.parent_of(current)? {
                ParentRef::Split(parent) => current = parent,
                ParentRef::Workspace => return top,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::tests::{children_of, float, tile, workspace};
    use super::*;
    use crate::tiling::geometry::Rect;
    use crate::tiling::node::WindowId;

    fn prefer(ws: &mut Workspace, id: NodeId, split_type: SplitType) {
        ws.arena.get_mut(id).unwrap().as_view_mut().unwrap().preferred_split = Some(split_type);
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    #[test]
    fn test_insert_positions() {
        let mut ws = workspace();
        let root = ws.tiled_root();
        let a = tile(&mut ws, 1);

        let b = ws.create_view(WindowId(2), "b", Rect::zero());
        let b_id = b.id();
        ws.insert_child_front(root, b).unwrap();
        assert_eq!(children_of(&ws, root), vec![b_id, a]);

        let c = ws.create_view(WindowId(3), "c", Rect::zero());
        let c_id = c.id();
        ws.insert_child_front_of(root, a, c).unwrap();
        assert_eq!(children_of(&ws, root), vec![b_id, c_id, a]);

        let d = ws.create_view(WindowId(4), "d", Rect::zero());
        let d_id = d.id();
        ws.insert_child_back_of(root, b_id, d).unwrap();
        assert_eq!(children_of(&ws, root), vec![b_id, d_id, c_id, a]);

        for id in [a, b_id, c_id, d_id] {
            assert_eq!(ws.parent_of(id), Some(ParentRef::Split(root)));
        }
    }

    #[test]
    fn test_insert_into_leaf_hands_node_back() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        let b = ws.create_view(WindowId(2), "b", Rect::zero());
        let b = ws.insert_child_back(a, b).unwrap_err();
        let b = ws.insert_child_back_of(ws.tiled_root(), NodeId(999), b).unwrap_err();
        ws.destroy(b);
    }

    #[test]
    fn test_remove_child_at_does_not_collapse() {
        let mut ws = workspace();
        let _a = tile(&mut ws, 1);
        let b = tile(&mut ws, 2);
        prefer(&mut ws, b, SplitType::HSplit);
        let split = ws.try_upgrade(b).unwrap();

        let detached = ws.remove_child_at(split, 0).unwrap();
        assert!(ws.contains(split));
        assert!(ws.split(split).unwrap().is_empty());

        ws.collapse_if_empty(split);
        assert!(!ws.contains(split));
        ws.destroy(detached);
    }

    // ========================================================================
    // Swap
    // ========================================================================

    #[test]
    fn test_swap_child_in_split() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        let b = tile(&mut ws, 2);
        let c = ws.create_view(WindowId(3), "c", Rect::zero());
        let c_id = c.id();

        let old = ws.swap_child(a, c).unwrap();
        assert_eq!(old.id(), a);
        assert_eq!(children_of(&ws, ws.tiled_root()), vec![c_id, b]);
        assert_eq!(ws.geometry(c_id), Some(Rect::new(0, 0, 1000, 400)));
        assert!(ws.parent_of(a).is_none());
        ws.destroy(old);
    }

    #[test]
    fn test_swap_child_detached_target_hands_back() {
        let mut ws = workspace();
        let lone = ws.create_view(WindowId(1), "a", Rect::zero());
        let other = ws.create_view(WindowId(2), "b", Rect::zero());
        let other = ws.swap_child(lone.id(), other).unwrap_err();
        ws.destroy(other);
        ws.destroy(lone);
    }

    // ========================================================================
    // Upgrade / Downgrade
    // ========================================================================

    #[test]
    fn test_upgrade_requires_preference() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        assert!(ws.try_upgrade(a).is_none());
        assert_eq!(ws.get_or_upgrade_to_parent_node(a), ParentLookup::NotParent(a));
        let root = ws.tiled_root();
        assert_eq!(ws.get_or_upgrade_to_parent_node(root), ParentLookup::Parent(root));
    }

    #[test]
    fn test_upgrade_then_downgrade_round_trip() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        let b = tile(&mut ws, 2);
        let before = ws.geometry(b);
        prefer(&mut ws, b, SplitType::HSplit);

        let split = ws.try_upgrade(b).unwrap();
        assert_eq!(children_of(&ws, ws.tiled_root()), vec![a, split]);
        assert_eq!(children_of(&ws, split), vec![b]);
        assert_eq!(ws.geometry(split), before);
        assert_eq!(ws.geometry(b), before);
        assert!(ws.node(b).unwrap().as_view().unwrap().preferred_split.is_none());

        assert_eq!(ws.try_downgrade(split), Some(b));
        assert!(!ws.contains(split));
        assert_eq!(children_of(&ws, ws.tiled_root()), vec![a, b]);
        assert_eq!(
            ws.node(b).unwrap().as_view().unwrap().preferred_split,
            Some(SplitType::HSplit)
        );
    }

    #[test]
    fn test_upgrade_floating_view_keeps_floating_slot() {
        let mut ws = workspace();
        let f = float(&mut ws, 1, Rect::new(10, 10, 200, 100));
        prefer(&mut ws, f, SplitType::VSplit);

        let split = ws.try_upgrade(f).unwrap();
        assert_eq!(ws.floating_nodes(), &[split]);
        assert!(ws.is_floating(split));
        assert!(!ws.is_floating(f));
        assert_eq!(ws.find_floating_parent(f), Some(split));
        assert_eq!(ws.geometry(f), Some(Rect::new(10, 10, 200, 100)));
    }

    #[test]
    fn test_downgrade_rejects_multiple_children() {
        let mut ws = workspace();
        let _a = tile(&mut ws, 1);
        let _b = tile(&mut ws, 2);
        assert!(ws.try_downgrade(ws.tiled_root()).is_none());
    }

    #[test]
    fn test_root_downgrades_only_into_split() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        assert!(ws.try_downgrade(ws.tiled_root()).is_none());

        prefer(&mut ws, a, SplitType::HSplit);
        let inner = ws.try_upgrade(a).unwrap();
        let old_root = ws.tiled_root();
        assert_eq!(ws.try_downgrade(old_root), Some(inner));
        assert_eq!(ws.tiled_root(), inner);
        assert!(!ws.contains(old_root));
        assert_eq!(ws.parent_of(inner), Some(ParentRef::Workspace));
        assert_eq!(ws.geometry(a), Some(ws.workarea()));
    }

    // ========================================================================
    // Ancestor Queries
    // ========================================================================

    #[test]
    fn test_find_parent_split_matches_axis() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        prefer(&mut ws, a, SplitType::HSplit);
        let inner = ws.try_upgrade(a).unwrap();

        assert_eq!(ws.find_parent_split(a, true), Some(inner));
        assert_eq!(ws.find_parent_split(a, false), Some(ws.tiled_root()));
        assert_eq!(ws.find_parent_split(ws.tiled_root(), false), None);
    }

    #[test]
    fn test_find_floating_parent() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        let f = float(&mut ws, 2, Rect::new(0, 0, 50, 50));
        assert_eq!(ws.find_floating_parent(a), None);
        assert_eq!(ws.find_floating_parent(f), Some(f));
    }

    #[test]
    fn test_toggle_split_direction_relayouts() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        let b = tile(&mut ws, 2);
        assert!(ws.toggle_split_direction(ws.tiled_root()));
        assert_eq!(ws.geometry(a), Some(Rect::new(0, 0, 500, 800)));
        assert_eq!(ws.geometry(b), Some(Rect::new(500, 0, 500, 800)));
        assert!(!ws.toggle_split_direction(a));
    }
}
