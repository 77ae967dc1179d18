//! The grid of workspaces on one output.
//!
//! Workspaces are stored column-major and addressed `[x][y]` by their grid
//! coordinate. Growing the grid adds empty workspaces. Shrinking it moves the
//! windows of every removed cell into the nearest remaining cell (the
//! coordinate clamped into range); each window keeps its floating state and
//! floating geometry, while the removed tree shape is discarded.

use serde::Serialize;

use super::geometry::{Dimensions, Point, Rect};
use super::node::{NodeId, WindowId, WorkspaceId};
use super::workspace::Workspace;

/// A window relocated by a grid shrink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WindowMigration {
    /// The relocated window.
    pub window: WindowId,
    /// Removed cell it came from.
    pub from: WorkspaceId,
    /// Cell it now lives in.
    pub to: WorkspaceId,
    /// Whether it landed in the floating set.
    pub floating: bool,
}

/// Everything needed to rebuild a view in another workspace.
struct Evicted {
    window: WindowId,
    title: String,
    floating: bool,
    floating_geometry: Rect,
    from: WorkspaceId,
}

/// Workspaces of one output, indexed `[x][y]`.
#[derive(Debug)]
pub struct WorkspaceGrid {
    output: String,
    dims: Dimensions,
    workspaces: Vec<Vec<Workspace>>,
}

impl WorkspaceGrid {
    /// Create a grid of empty workspaces.
    ///
    /// Dimensions below one are raised to one so there is always a current
    /// workspace.
    #[must_use]
    pub fn new(dims: Dimensions, workarea: Rect, output: impl Into<String>) -> Self {
        let mut grid = Self {
            output: output.into(),
            dims: Dimensions::new(0, 0),
            workspaces: Vec::new(),
        };
        let _ = grid.update_dims(dims, workarea);
        grid
    }

    /// Output name this grid belongs to.
    #[must_use]
    pub fn output(&self) -> &str { &self.output }

    /// Current grid dimensions.
    #[must_use]
    pub const fn dims(&self) -> Dimensions { self.dims }

    /// Whether `coord` lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, coord: WorkspaceId) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.dims.width && coord.y < self.dims.height
    }

    /// Clamp a coordinate into the grid.
    #[must_use]
    pub fn clamp(&self, coord: WorkspaceId) -> WorkspaceId {
        Point::new(
            coord.x.clamp(0, self.dims.width - 1),
            coord.y.clamp(0, self.dims.height - 1),
        )
    }

    /// Workspace at `coord`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, coord: WorkspaceId) -> Option<&Workspace> {
        let (x, y) = (usize::try_from(coord.x).ok()?, usize::try_from(coord.y).ok()?);
        self.workspaces.get(x)?.get(y)
    }

    /// Mutable workspace at `coord`, or `None` out of bounds.
    pub fn get_mut(&mut self, coord: WorkspaceId) -> Option<&mut Workspace> {
        let (x, y) = (usize::try_from(coord.x).ok()?, usize::try_from(coord.y).ok()?);
        self.workspaces.get_mut(x)?.get_mut(y)
    }

    /// Iterate over all workspaces, column by column.
    pub fn iter(&self) -> impl Iterator<Item = &Workspace> { self.workspaces.iter().flatten() }

    /// Iterate mutably over all workspaces, column by column.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Workspace> {
        self.workspaces.iter_mut().flatten()
    }

    /// Locate the workspace and node managing `window`.
    #[must_use]
    pub fn find_window(&self, window: WindowId) -> Option<(WorkspaceId, NodeId)> {
        self.iter().find_map(|ws| ws.find_view(window).map(|node| (ws.id(), node)))
    }

    /// Resize the grid.
    ///
    /// # Arguments
    ///
    /// * `dims` - New dimensions; raised to at least 1x1
    /// * `workarea` - Workarea for newly created workspaces
    ///
    /// # Returns
    ///
    /// The windows moved out of removed cells, in tree order per cell.
    pub fn update_dims(&mut self, dims: Dimensions, workarea: Rect) -> Vec<WindowMigration> {
        let dims = Dimensions::new(dims.width.max(1), dims.height.max(1));
        let (width, height) = (to_index(dims.width), to_index(dims.height));

        let mut evicted = Vec::new();
        if self.workspaces.len() > width {
            for column in self.workspaces.drain(width..) {
                evicted.extend(column.iter().flat_map(evict));
            }
        }
        for column in &mut self.workspaces {
            if column.len() > height {
                for ws in column.drain(height..) {
                    evicted.extend(evict(&ws));
                }
            }
        }

        for x in 0..width {
            if self.workspaces.len() <= x {
                self.workspaces.push(Vec::with_capacity(height));
            }
            let column = &mut self.workspaces[x];
            for y in column.len()..height {
                column.push(Workspace::new(Point::new(to_coord(x), to_coord(y)), workarea));
            }
        }

        if dims != self.dims {
            tracing::debug!(output = %self.output, width = dims.width, height = dims.height, evicted = evicted.len(), "tiling: grid resized");
        }
        self.dims = dims;

        evicted
            .into_iter()
            .filter_map(|e| self.rehome(e))
            .collect()
    }

    fn rehome(&mut self, evicted: Evicted) -> Option<WindowMigration> {
        let to = self.clamp(evicted.from);
        let ws = self.get_mut(to)?;
        let node = ws.create_view(evicted.window, evicted.title, evicted.floating_geometry);
        if evicted.floating {
            ws.insert_floating_node(node);
        } else {
            ws.insert_tiled_node(node);
        }
        tracing::info!(window = %evicted.window, from = %evicted.from, to = %to, "tiling: migrated window");
        Some(WindowMigration {
            window: evicted.window,
            from: evicted.from,
            to,
            floating: evicted.floating,
        })
    }
}

/// Views of a workspace in tree order: tiled tree first, then floating.
fn evict(ws: &Workspace) -> Vec<Evicted> {
    let roots = std::iter::once(ws.tiled_root()).chain(ws.floating_nodes().iter().copied());
    roots
        .flat_map(|root| ws.arena().subtree(root))
        .filter_map(|id| {
            let node = ws.node(id)?;
            let view = node.as_view()?;
            Some(Evicted {
                window: view.window,
                title: view.title.clone(),
                floating: ws.find_floating_parent(id).is_some(),
                floating_geometry: view.floating_geometry,
                from: ws.id(),
            })
        })
        .collect()
}

#[allow(clippy::cast_sign_loss)] // Dimensions are raised to at least one first
const fn to_index(v: i32) -> usize { v as usize }

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)] // Grid sizes are tiny
const fn to_coord(v: usize) -> i32 { v as i32 }

// ============================================================================
// Tests
// ============================================================================
