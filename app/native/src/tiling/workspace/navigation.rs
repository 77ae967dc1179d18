//! Directional adjacency and movement.
//!
//! Adjacency only walks up the tree: a split whose axis matches the
//! direction answers with the sibling at index +/-1, otherwise the question
//! bubbles to the grandparent. The caller descends into a returned split if
//! it needs a view.

use super::Workspace;
use crate::tiling::node::{Direction, Node, NodeId, ParentRef};

impl Workspace {
    // ========================================================================
    // Adjacency
    // ========================================================================

    /// The node directly adjacent to `id` in `dir`.
    ///
    /// For a floating node this is the nearest other floating node whose
    /// centre lies in `dir`. The tiled root has no neighbours.
    #[must_use]
    pub fn get_adjacent(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        match self.parent_of(id)? {
            ParentRef::Split(parent) => {
                let split = self.split(parent)?;
                if split.split_type.matches(dir) {
                    let index = split.index_of(id)?;
                    let target = if dir.is_backward() { index.checked_sub(1) } else { Some(index + 1) };
                    if let Some(sibling) = target.and_then(|t| split.children.get(t)) {
                        return Some(sibling.node);
                    }
                }
                self.get_adjacent(parent, dir)
            }
            ParentRef::Workspace if id == self.tiled_root => None,
            ParentRef::Workspace => self.floating_adjacent(id, dir),
        }
    }

    fn floating_adjacent(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        let origin = self.geometry(id)?.center();
        self.floating
            .iter()
            .filter(|&&f| f != id)
            .filter_map(|&f| self.geometry(f).map(|g| (f, g.center())))
            .filter(|(_, c)| match dir {
                Direction::Left => c.x < origin.x,
                Direction::Right => c.x > origin.x,
                Direction::Up => c.y < origin.y,
                Direction::Down => c.y > origin.y,
            })
            .min_by_key(|(_, c)| {
                let dx = i64::from(c.x - origin.x);
                let dy = i64::from(c.y - origin.y);
                dx * dx + dy * dy
            })
            .map(|(f, _)| f)
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Move a tiled node one step in `dir`.
    ///
    /// If the adjacent sibling is a split the node enters it at the near
    /// edge; a leaf sibling swaps places with it. At the edge of its
    /// container the node is moved outside.
    ///
    /// # Returns
    ///
    /// `true` if the tree changed.
    pub fn move_child(&mut self, id: NodeId, dir: Direction) -> bool {
        let Some(ParentRef::Split(parent)) = self.parent_of(id) else {
            return false;
        };
        let Some(split) = self.split(parent) else {
            return false;
        };
        let Some(index) = split.index_of(id) else {
            return false;
        };

        if split.split_type.matches(dir) {
            let target = if dir.is_backward() { index.checked_sub(1) } else { Some(index + 1) };
            if let Some((target, sibling)) = target.and_then(|t| split.children.get(t).map(|c| (t, c.node))) {
                if self.arena.get(sibling).is_some_and(Node::is_split) {
                    let entry = if dir.is_backward() {
                        self.split(sibling).map_or(0, |s| s.len())
                    } else {
                        0
                    };
                    let _ = self.detach_at(parent, index);
                    self.attach_at(sibling, entry, id);
                    tracing::debug!(node = %id, into = %sibling, direction = %dir, "tiling: moved into split");
                } else {
                    self.swap_siblings(parent, index, target);
                    tracing::debug!(node = %id, with = %sibling, direction = %dir, "tiling: swapped siblings");
                }
                return true;
            }
        }

        self.move_child_outside(parent, id, dir)
    }

    /// Move a direct child of `parent` out of it in `dir`.
    ///
    /// The node lands beside the branch it came from in the nearest ancestor
    /// whose axis matches `dir`. Without such an ancestor it goes to the
    /// front or back of the top split, unless it is already a direct child
    /// of it.
    fn move_child_outside(&mut self, parent: NodeId, id: NodeId, dir: Direction) -> bool {
        let Some(index) = self.split(parent).and_then(|s| s.index_of(id)) else {
            return false;
        };

        if let Some((ancestor, branch)) = self.find_parent_split_with_branch(parent, dir.is_horizontal()) {
            let Some(slot) = self.split(ancestor).and_then(|s| s.index_of(branch)) else {
                return false;
            };
            let slot = if dir.is_backward() { slot } else { slot + 1 };
            let _ = self.detach_at(parent, index);
            self.attach_at(ancestor, slot, id);
            self.collapse_if_empty(parent);
            tracing::debug!(node = %id, into = %ancestor, direction = %dir, "tiling: moved outside");
            return true;
        }

        let Some(top) = self.top_split(id) else {
            return false;
        };
        if top == parent {
            return false;
        }

        let _ = self.detach_at(parent, index);
        let slot = if dir.is_backward() { 0 } else { self.split(top).map_or(0, |s| s.len()) };
        self.attach_at(top, slot, id);
        self.collapse_if_empty(parent);
        tracing::debug!(node = %id, into = %top, direction = %dir, "tiling: moved to top split edge");
        true
    }

    /// Translate a floating node by `step` pixels in `dir`.
    pub fn move_floating(&mut self, id: NodeId, dir: Direction, step: i32) -> bool {
        if !self.floating.contains(&id) {
            return false;
        }
        let Some(geometry) = self.geometry(id) else {
            return false;
        };
        let (dx, dy) = dir.offset(step);
        self.set_geometry(id, geometry.translated(dx, dy))
    }

    fn swap_siblings(&mut self, parent: NodeId, a: usize, b: usize) {
        if let Some(split) = self.split_mut(parent) {
            split.children.swap(a, b);
            if split.active_child == a {
                split.active_child = b;
            } else if split.active_child == b {
                split.active_child = a;
            }
        }
        self.refresh_geometry(parent);
    }
}

// ============================================================================
// Tests
// ============================================================================
