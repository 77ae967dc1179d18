//! Edge-driven resizing.
//!
//! A resize names the target dimensions and the set of edges allowed to
//! move. An axis only changes when exactly one of its two edges moves; the
//! opposite edge stays put. Floating nodes change their own rectangle. Tiled
//! nodes route the change through their parent split: along the split axis
//! the neighbour on the moving side gives up (or takes) the space, otherwise
//! the split itself is resized.
//!
//! During an interactive grab the split keeps the pinned pixel sizes in
//! `preferred_size`; `end_resize` folds them back into ratios.

use super::Workspace;
use crate::tiling::geometry::{Dimensions, Edges, Rect};
use crate::tiling::node::{Node, NodeId, ParentRef};
use crate::tiling::split::{axis_span, clamp_size};

impl Workspace {
    /// Resize a node by moving `edges`, committing immediately.
    ///
    /// # Arguments
    ///
    /// * `id` - Node to resize
    /// * `dims` - Requested dimensions; clamped to the minimum view size
    /// * `edges` - Edges allowed to move
    ///
    /// # Returns
    ///
    /// `true` if any geometry changed.
    pub fn try_resize(&mut self, id: NodeId, dims: Dimensions, edges: Edges) -> bool {
        let changed = self.resize_node(id, dims, edges);
        self.end_resize(id);
        changed
    }

    /// Resize a node as one sample of a continuous resize.
    ///
    /// Sizes stay pinned in the parent splits until `end_resize`.
    pub fn resize_continuous(&mut self, id: NodeId, dims: Dimensions, edges: Edges) -> bool {
        self.resize_node(id, dims, edges)
    }

    /// Finish a resize: fold pinned sizes into ratios along the ancestor
    /// chain and clear the view's resizing edges.
    pub fn end_resize(&mut self, id: NodeId) {
        if let Some(view) = self.arena.get_mut(id).and_then(Node::as_view_mut) {
            view.resizing_edges = None;
        }

        let mut current = id;
        while let Some(ParentRef::Split(parent)) = self.parent_of(current) {
            let span = self
                .arena
                .get(parent)
                .and_then(|n| n.as_split().map(|s| axis_span(&n.geometry, s.split_type)))
                .unwrap_or(0);
            if let Some(split) = self.split_mut(parent) {
                split.fold_preferred_sizes(span);
            }
            current = parent;
        }
    }

    /// Fold the pinned sizes of every split in the workspace into ratios.
    ///
    /// Covers splits the resized node has since left, which the ancestor
    /// walk of `end_resize` no longer reaches.
    pub fn fold_pinned_sizes(&mut self) {
        let pinned: Vec<(NodeId, i32)> = self
            .arena
            .iter()
            .filter_map(|n| {
                let split = n.as_split()?;
                split
                    .children
                    .iter()
                    .any(|c| c.preferred_size.is_some())
                    .then(|| (n.id, axis_span(&n.geometry, split.split_type)))
            })
            .collect();
        for (id, span) in pinned {
            if let Some(split) = self.split_mut(id) {
                split.fold_preferred_sizes(span);
            }
        }
    }

    /// Mark the edges moving during an interactive resize of a view.
    pub(crate) fn set_resizing_edges(&mut self, id: NodeId, edges: Option<Edges>) {
        if let Some(view) = self.arena.get_mut(id).and_then(Node::as_view_mut) {
            view.resizing_edges = edges;
        }
    }

    fn resize_node(&mut self, id: NodeId, dims: Dimensions, edges: Edges) -> bool {
        if !edges.moves_width() && !edges.moves_height() {
            return false;
        }
        let Some(geometry) = self.geometry(id) else {
            return false;
        };
        let dims = Dimensions::new(clamp_size(dims.width), clamp_size(dims.height));

        match self.parent_of(id) {
            Some(ParentRef::Workspace) if id == self.tiled_root => false,
            Some(ParentRef::Workspace) | None => {
                let resized = resize_rect(geometry, dims, edges);
                resized != geometry && self.set_geometry(id, resized)
            }
            Some(ParentRef::Split(parent)) => self.resize_in_split(parent, id, geometry, dims, edges),
        }
    }

    fn resize_in_split(
        &mut self,
        parent: NodeId,
        id: NodeId,
        geometry: Rect,
        dims: Dimensions,
        edges: Edges,
    ) -> bool {
        let Some(parent_geometry) = self.geometry(parent) else {
            return false;
        };
        let Some(split) = self.split(parent) else {
            return false;
        };

        let split_type = split.split_type;

        // Every child of an overlapping split shares the split's rectangle.
        if split_type.is_overlapping() {
            return self.resize_node(parent, dims, edges);
        }

        let horizontal = split_type.is_horizontal();
        let (moves_along, moves_cross) = if horizontal {
            (edges.moves_width(), edges.moves_height())
        } else {
            (edges.moves_height(), edges.moves_width())
        };
        let (along_edges, cross_edges) = if horizontal {
            (edges.horizontal(), edges.vertical())
        } else {
            (edges.vertical(), edges.horizontal())
        };
        let (current, requested) = if horizontal {
            (geometry.width, dims.width)
        } else {
            (geometry.height, dims.height)
        };

        let mut parent_dims = parent_geometry.dimensions();
        let mut parent_edges = Edges::empty();
        let mut changed = false;

        if moves_along && requested != current {
            let Some(index) = split.index_of(id) else {
                return false;
            };
            let leading = along_edges.intersects(Edges::LEFT | Edges::TOP);
            let neighbour = if leading { index.checked_sub(1) } else { Some(index + 1) }
                .filter(|&n| n < split.len());

            if let Some(neighbour_index) = neighbour {
                let neighbour = split.children[neighbour_index].node;
                let neighbour_span = self.geometry(neighbour).map_or(0, |g| axis_span(&g, split_type));
                let floor = clamp_size(0).min(neighbour_span);
                let neighbour_new = (neighbour_span - (requested - current)).max(floor);
                let own_new = current + (neighbour_span - neighbour_new);

                if let Some(split) = self.split_mut(parent) {
                    split.children[index].preferred_size = Some(own_new);
                    split.children[neighbour_index].preferred_size = Some(neighbour_new);
                }
                self.refresh_geometry(parent);
                changed = own_new != current;
            } else {
                let span = axis_span(&parent_geometry, split_type);
                if horizontal {
                    parent_dims.width = span + (requested - current);
                } else {
                    parent_dims.height = span + (requested - current);
                }
                parent_edges |= along_edges;
            }
        }

        if moves_cross {
            if horizontal {
                parent_dims.height = dims.height;
            } else {
                parent_dims.width = dims.width;
            }
            parent_edges |= cross_edges;
        }

        if !parent_edges.is_empty() {
            changed |= self.resize_node(parent, parent_dims, parent_edges);
        }
        changed
    }
}

/// Apply `dims` to `rect` by moving only the edges in `edges`.
///
/// An axis whose two edges are both (or neither) moving keeps its size.
#[must_use]
pub fn resize_rect(rect: Rect, dims: Dimensions, edges: Edges) -> Rect {
    let mut out = rect;
    if edges.moves_width() {
        out.width = dims.width;
        if edges.contains(Edges::LEFT) {
            out.x = rect.right() - dims.width;
        }
    }
    if edges.moves_height() {
        out.height = dims.height;
        if edges.contains(Edges::TOP) {
            out.y = rect.bottom() - dims.height;
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
