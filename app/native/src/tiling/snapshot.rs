//! Serializable copies of the layout tree for diagnostics.
//!
//! Snapshots are plain owned data: they hold no ids into a live arena and
//! can be printed, diffed or written out as JSON.

use serde::Serialize;

use super::geometry::{Dimensions, Rect};
use super::grid::WorkspaceGrid;
use super::node::{NodeId, NodeKind, SplitType, WindowId, WorkspaceId};
use super::workspace::Workspace;

/// One node and its subtree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeSnapshot {
    View {
        id: NodeId,
        window: WindowId,
        title: String,
        geometry: Rect,
        floating: bool,
        active: bool,
    },
    Split {
        id: NodeId,
        split_type: SplitType,
        geometry: Rect,
        floating: bool,
        active: bool,
        ratios: Vec<f64>,
        children: Vec<NodeSnapshot>,
    },
}

impl NodeSnapshot {
    /// Copy the subtree rooted at `id`.
    #[must_use]
    pub fn capture(ws: &Workspace, id: NodeId) -> Option<Self> {
        let node = ws.node(id)?;
        let active = ws.active_node() == Some(id);
        Some(match node.kind() {
            NodeKind::View(view) => Self::View {
                id,
                window: view.window,
                title: view.title.clone(),
                geometry: node.geometry(),
                floating: node.is_floating(),
                active,
            },
            NodeKind::Split(split) => Self::Split {
                id,
                split_type: split.split_type,
                geometry: node.geometry(),
                floating: node.is_floating(),
                active,
                ratios: split.children.iter().map(|c| c.ratio).collect(),
                children: split.child_ids().filter_map(|child| Self::capture(ws, child)).collect(),
            },
        })
    }

    /// Geometry of this node.
    #[must_use]
    pub const fn geometry(&self) -> Rect {
        match self {
            Self::View { geometry, .. } | Self::Split { geometry, .. } => *geometry,
        }
    }

    /// Children of a split; empty for a view.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::View { .. } => &[],
            Self::Split { children, .. } => children,
        }
    }

    /// One-line description, e.g. `hsplit split-node-0 1000x800+0+0`.
    #[must_use]
    pub fn label(&self) -> String {
        let (text, floating, active) = match self {
            Self::View { id, window, title, geometry, floating, active } => {
                (format!("window {window} \"{title}\" view-{id} {geometry}"), *floating, *active)
            }
            Self::Split { id, split_type, geometry, floating, active, .. } => {
                (format!("{split_type} split-{id} {geometry}"), *floating, *active)
            }
        };
        let mut label = text;
        if floating {
            label.push_str(" [floating]");
        }
        if active {
            label.push_str(" [active]");
        }
        label
    }

    /// Windows in this subtree, in tree order.
    #[must_use]
    pub fn windows(&self) -> Vec<WindowId> {
        match self {
            Self::View { window, .. } => vec![*window],
            Self::Split { children, .. } => children.iter().flat_map(Self::windows).collect(),
        }
    }
}

/// A workspace: the tiled tree plus every floating subtree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkspaceSnapshot {
    pub id: WorkspaceId,
    pub workarea: Rect,
    pub active_window: Option<WindowId>,
    pub tiled: Option<NodeSnapshot>,
    pub floating: Vec<NodeSnapshot>,
}

impl WorkspaceSnapshot {
    /// Copy a workspace.
    #[must_use]
    pub fn capture(ws: &Workspace) -> Self {
        Self {
            id: ws.id(),
            workarea: ws.workarea(),
            active_window: ws.active_window(),
            tiled: NodeSnapshot::capture(ws, ws.tiled_root()),
            floating: ws
                .floating_nodes()
                .iter()
                .filter_map(|&id| NodeSnapshot::capture(ws, id))
                .collect(),
        }
    }

    /// Whether the workspace manages no window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floating.is_empty() && self.tiled.as_ref().is_none_or(|t| t.children().is_empty())
    }
}

/// The whole grid of one output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub output: String,
    pub dims: Dimensions,
    pub current: WorkspaceId,
    pub workspaces: Vec<WorkspaceSnapshot>,
}

impl GridSnapshot {
    /// Copy a grid.
    #[must_use]
    pub fn capture(grid: &WorkspaceGrid, current: WorkspaceId) -> Self {
        Self {
            output: grid.output().to_string(),
            dims: grid.dims(),
            current,
            workspaces: grid.iter().map(WorkspaceSnapshot::capture).collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
