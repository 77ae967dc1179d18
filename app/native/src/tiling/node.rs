//! Node types for the layout tree.
//!
//! A node is either a leaf wrapping one managed window (`ViewNode`) or an
//! internal container (`SplitNode`). Both share the `Node` envelope carrying
//! identity, geometry, the floating flag and the non-owning back-references
//! (owning workspace, parent). Back-references are ids resolved through the
//! workspace arena, never pointers.
//!
//! Container-only operations match on `NodeKind` at the call site and treat a
//! leaf as "not a container" instead of downcasting.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::geometry::{Edges, Point, Rect};

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a node inside one workspace arena.
///
/// Ids come from a counter owned by the arena and are never reused, so a
/// lookup through a stale id simply misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "node-{}", self.0) }
}

/// Host-assigned identifier of a managed window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A workspace is addressed by its cell in the output's workspace grid.
pub type WorkspaceId = Point;

// ============================================================================
// Split Type / Direction
// ============================================================================

/// How a container partitions or overlays its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SplitType {
    /// Children stacked top to bottom; height is partitioned.
    #[default]
    #[serde(rename = "vsplit")]
    VSplit,
    /// Children side by side left to right; width is partitioned.
    #[serde(rename = "hsplit")]
    HSplit,
    /// Children overlap; navigated left/right like a horizontal split.
    Tabbed,
    /// Children overlap; navigated up/down like a vertical split.
    Stacked,
}

impl SplitType {
    /// Returns the split type name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VSplit => "vsplit",
            Self::HSplit => "hsplit",
            Self::Tabbed => "tabbed",
            Self::Stacked => "stacked",
        }
    }

    /// Whether children are navigated along the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool { matches!(self, Self::HSplit | Self::Tabbed) }

    /// Whether this mode overlays children instead of partitioning space.
    #[must_use]
    pub const fn is_overlapping(self) -> bool { matches!(self, Self::Tabbed | Self::Stacked) }

    /// Whether travelling in `dir` moves between this container's children.
    #[must_use]
    pub const fn matches(self, dir: Direction) -> bool { self.is_horizontal() == dir.is_horizontal() }

    /// The split type on the other axis.
    ///
    /// Overlapping modes become the partitioning mode of the opposite axis.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::VSplit | Self::Stacked => Self::HSplit,
            Self::HSplit | Self::Tabbed => Self::VSplit,
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A cardinal direction for focus and movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in binding order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Whether this direction lies on the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool { matches!(self, Self::Left | Self::Right) }

    /// Whether travelling this way decreases the child index.
    #[must_use]
    pub const fn is_backward(self) -> bool { matches!(self, Self::Left | Self::Up) }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Unit offset in pixels along this direction, scaled by `step`.
    #[must_use]
    pub const fn offset(self, step: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -step),
            Self::Down => (0, step),
            Self::Left => (-step, 0),
            Self::Right => (step, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// Parent Reference
// ============================================================================

/// Non-owning reference to whatever currently owns a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Owned directly by the workspace (tiled root or floating node).
    Workspace,
    /// Owned by a split container.
    Split(NodeId),
}

/// Outcome of asking a node for a parent capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentLookup {
    /// The node is (or was upgraded into) a container.
    Parent(NodeId),
    /// The node is a leaf with no pending split preference.
    NotParent(NodeId),
}

// ============================================================================
// Leaf / Container Payloads
// ============================================================================

/// A leaf wrapping one managed window.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    /// The wrapped window.
    pub window: WindowId,

    /// Window title, for logging and snapshots.
    pub title: String,

    /// Last geometry the node had while floating.
    ///
    /// Cached so that tiling and untiling round-trips the user's placement.
    pub floating_geometry: Rect,

    /// Edges moving during an in-progress resize grab.
    pub resizing_edges: Option<Edges>,

    /// Split mode to create when this leaf is upgraded to a container.
    pub preferred_split: Option<SplitType>,

    /// Last `(geometry, tiled)` pair pushed to the host.
    pub(crate) applied: Option<(Rect, bool)>,
}

impl ViewNode {
    /// Create a view payload for a window placed at `geometry`.
    #[must_use]
    pub fn new(window: WindowId, title: impl Into<String>, geometry: Rect) -> Self {
        Self {
            window,
            title: title.into(),
            floating_geometry: geometry,
            resizing_edges: None,
            preferred_split: None,
            applied: None,
        }
    }
}

/// One entry in a container's ordered child list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitChild {
    /// The owned child.
    pub node: NodeId,

    /// Share of the container span, in `(0, 1]`. Ratios across all children
    /// sum to one.
    pub ratio: f64,

    /// Absolute span pinned during a continuous resize.
    ///
    /// Folded back into `ratio` when the resize ends.
    pub preferred_size: Option<i32>,
}

impl SplitChild {
    /// Create a child entry with the given ratio.
    #[must_use]
    pub const fn new(node: NodeId, ratio: f64) -> Self {
        Self {
            node,
            ratio,
            preferred_size: None,
        }
    }
}

/// Inline child capacity; most containers hold a handful of children.
pub const SPLIT_CHILDREN_INLINE_CAP: usize = 4;

/// Child list storage.
pub type SplitChildren = SmallVec<[SplitChild; SPLIT_CHILDREN_INLINE_CAP]>;

/// An internal container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitNode {
    /// How this container lays out its children.
    pub split_type: SplitType,

    /// Index of the last focused direct child.
    pub active_child: usize,

    /// The direct children, in layout order.
    pub children: SplitChildren,
}

impl SplitNode {
    /// Create an empty container with the given mode.
    #[must_use]
    pub const fn new(split_type: SplitType) -> Self {
        Self {
            split_type,
            active_child: 0,
            children: SmallVec::new_const(),
        }
    }

    /// Position of a direct child.
    #[must_use]
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.children.iter().position(|c| c.node == node)
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize { self.children.len() }

    /// Whether this container has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.children.is_empty() }

    /// Ids of the direct children, in order.
    pub fn child_ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.iter().map(|c| c.node)
    }
}

/// Leaf or container payload.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    View(ViewNode),
    Split(SplitNode),
}

// ============================================================================
// Node
// ============================================================================

/// A node in a workspace arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) geometry: Rect,
    pub(crate) floating: bool,
    pub(crate) workspace: WorkspaceId,
    pub(crate) parent: Option<ParentRef>,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// This node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId { self.id }

    /// Outer geometry.
    #[must_use]
    pub const fn geometry(&self) -> Rect { self.geometry }

    /// Whether this node itself is floating.
    ///
    /// For a container, only the container is floating; its children are not
    /// independently considered floating.
    #[must_use]
    pub const fn is_floating(&self) -> bool { self.floating }

    /// Workspace managing this node.
    #[must_use]
    pub const fn workspace(&self) -> WorkspaceId { self.workspace }

    /// Current owner, or `None` while detached.
    #[must_use]
    pub const fn parent(&self) -> Option<ParentRef> { self.parent }

    /// Leaf or container payload.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind { &self.kind }

    /// The leaf payload, if this is a view.
    #[must_use]
    pub const fn as_view(&self) -> Option<&ViewNode> {
        match &self.kind {
            NodeKind::View(view) => Some(view),
            NodeKind::Split(_) => None,
        }
    }

    /// The container payload, if this is a split.
    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitNode> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::View(_) => None,
        }
    }

    pub(crate) const fn as_view_mut(&mut self) -> Option<&mut ViewNode> {
        match &mut self.kind {
            NodeKind::View(view) => Some(view),
            NodeKind::Split(_) => None,
        }
    }

    pub(crate) const fn as_split_mut(&mut self) -> Option<&mut SplitNode> {
        match &mut self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::View(_) => None,
        }
    }

    /// Whether this is a container.
    #[must_use]
    pub const fn is_split(&self) -> bool { matches!(self.kind, NodeKind::Split(_)) }

    /// Window wrapped by this node, if it is a view.
    #[must_use]
    pub fn window(&self) -> Option<WindowId> { self.as_view().map(|v| v.window) }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::View(_) => write!(f, "view-node-{}", self.id.0),
            NodeKind::Split(_) => write!(f, "split-node-{}", self.id.0),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
