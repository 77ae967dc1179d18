//! Interactive move and resize grabs.
//!
//! A grab moves through `Idle -> Activating -> Active -> Idle`. While
//! activating, the host is asked for exclusive input; a refusal drops back
//! to `Idle` without touching the tree. An active grab holds a `GrabLease`
//! whose drop releases the host grab, so every exit path (button release,
//! target destroyed, shutdown) gives input back.
//!
//! The grab stores the target's workspace and node id, never a reference.
//! Each event re-validates the id against the workspace before use.

use std::rc::Rc;

use super::constants::grab::{PRIMARY_TOUCH_ID, RESIZE_MARGIN};
use super::geometry::{Dimensions, Edges, Point, Rect};
use super::host::Host;
use super::node::{NodeId, WorkspaceId};
use super::workspace::Workspace;

/// What an active grab does with pointer motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrabKind {
    /// Translate the target.
    Move,
    /// Move the target's edges nearest the pointer.
    Resize,
}

/// Lifecycle phase of the grab controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrabPhase {
    #[default]
    Idle,
    Activating,
    Active,
}

// ============================================================================
// Lease
// ============================================================================

/// Ownership of the host's exclusive input grab.
///
/// Dropping the lease releases the grab.
#[derive(Debug)]
pub struct GrabLease<H: Host> {
    host: Rc<H>,
}

impl<H: Host> GrabLease<H> {
    /// Ask the host for exclusive input.
    ///
    /// # Returns
    ///
    /// The lease, or `None` if the host refused.
    #[must_use]
    pub fn acquire(host: &Rc<H>) -> Option<Self> {
        host.activate_input_grab().then(|| Self { host: Rc::clone(host) })
    }
}

impl<H: Host> Drop for GrabLease<H> {
    fn drop(&mut self) {
        self.host.deactivate_input_grab();
        tracing::debug!("tiling: input grab released");
    }
}

// ============================================================================
// Active Grab
// ============================================================================

#[derive(Debug)]
struct ActiveGrab<H: Host> {
    kind: GrabKind,
    workspace: WorkspaceId,
    target: NodeId,
    original: Rect,
    pointer_start: Point,
    button: u32,
    edges: Edges,
    _lease: GrabLease<H>,
}

/// Drives at most one interactive grab at a time.
#[derive(Debug)]
pub struct GrabController<H: Host> {
    phase: GrabPhase,
    active: Option<ActiveGrab<H>>,
}

impl<H: Host> Default for GrabController<H> {
    fn default() -> Self { Self { phase: GrabPhase::Idle, active: None } }
}

impl<H: Host> GrabController<H> {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GrabPhase { self.phase }

    /// Whether a grab is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool { matches!(self.phase, GrabPhase::Active) }

    /// Kind of the active grab.
    #[must_use]
    pub fn kind(&self) -> Option<GrabKind> { self.active.as_ref().map(|g| g.kind) }

    /// Node being dragged.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> { self.active.as_ref().map(|g| g.target) }

    /// Workspace of the node being dragged.
    #[must_use]
    pub fn workspace(&self) -> Option<WorkspaceId> { self.active.as_ref().map(|g| g.workspace) }

    /// Edges moving during the active resize grab.
    #[must_use]
    pub fn edges(&self) -> Option<Edges> {
        self.active.as_ref().filter(|g| g.kind == GrabKind::Resize).map(|g| g.edges)
    }

    /// Start a grab on `target`.
    ///
    /// # Arguments
    ///
    /// * `host` - Host to take the input grab from
    /// * `ws` - Workspace owning `target`
    /// * `kind` - Move or resize
    /// * `target` - Node to drag
    /// * `pointer` - Pointer position at activation
    /// * `button` - Button whose release ends the grab
    ///
    /// # Returns
    ///
    /// `true` if the grab is now active. A grab already in progress, a stale
    /// target or a host refusal all return `false` with no side effects.
    pub fn begin(
        &mut self,
        host: &Rc<H>,
        ws: &mut Workspace,
        kind: GrabKind,
        target: NodeId,
        pointer: Point,
        button: u32,
    ) -> bool {
        if self.phase != GrabPhase::Idle {
            tracing::debug!(node = %target, "tiling: grab already in progress");
            return false;
        }
        let Some(original) = ws.geometry(target).filter(|_| ws.is_attached(target)) else {
            return false;
        };

        self.phase = GrabPhase::Activating;
        let Some(lease) = GrabLease::acquire(host) else {
            tracing::debug!(node = %target, "tiling: input grab denied");
            self.phase = GrabPhase::Idle;
            return false;
        };

        let edges = match kind {
            GrabKind::Move => Edges::empty(),
            GrabKind::Resize => {
                let edges = resize_edges(original, pointer);
                host.set_resize_cursor(edges);
                ws.set_resizing_edges(target, Some(edges));
                edges
            }
        };

        tracing::debug!(workspace = %ws.id(), node = %target, ?kind, ?edges, "tiling: grab started");
        self.active = Some(ActiveGrab {
            kind,
            workspace: ws.id(),
            target,
            original,
            pointer_start: pointer,
            button,
            edges,
            _lease: lease,
        });
        self.phase = GrabPhase::Active;
        true
    }

    /// Feed a pointer position to the active grab.
    ///
    /// `ws` must be the grab's workspace. If the target no longer exists
    /// the grab is abandoned.
    ///
    /// # Returns
    ///
    /// `true` if the target's geometry changed.
    pub fn pointer_motion(&mut self, ws: &mut Workspace, position: Point) -> bool {
        let Some(grab) = &self.active else {
            return false;
        };
        if grab.workspace != ws.id() || !ws.contains(grab.target) {
            tracing::debug!(node = %grab.target, "tiling: grab target gone, abandoning");
            if grab.kind == GrabKind::Resize && grab.workspace == ws.id() {
                ws.fold_pinned_sizes();
            }
            self.release();
            return false;
        }

        let dx = position.x - grab.pointer_start.x;
        let dy = position.y - grab.pointer_start.y;
        match grab.kind {
            GrabKind::Move => {
                if !ws.is_floating(grab.target) {
                    tracing::debug!(node = %grab.target, "tiling: move target was tiled, abandoning");
                    self.release();
                    return false;
                }
                ws.set_geometry(grab.target, grab.original.translated(dx, dy))
            }
            GrabKind::Resize => {
                if dx == 0 && dy == 0 {
                    return false;
                }
                let width = if grab.edges.contains(Edges::LEFT) {
                    grab.original.width - dx
                } else {
                    grab.original.width + dx
                };
                let height = if grab.edges.contains(Edges::TOP) {
                    grab.original.height - dy
                } else {
                    grab.original.height + dy
                };
                ws.resize_continuous(grab.target, Dimensions::new(width, height), grab.edges)
            }
        }
    }

    /// Feed a touch position; only the primary touch point drives grabs.
    pub fn touch_motion(&mut self, ws: &mut Workspace, id: i32, position: Point) -> bool {
        id == PRIMARY_TOUCH_ID && self.pointer_motion(ws, position)
    }

    /// Feed a button event.
    ///
    /// Releasing the button that started the grab ends it.
    ///
    /// # Returns
    ///
    /// `true` if the grab ended.
    pub fn button(&mut self, ws: Option<&mut Workspace>, button: u32, pressed: bool) -> bool {
        let ends = !pressed && self.active.as_ref().is_some_and(|g| g.button == button);
        if ends {
            self.end(ws);
        }
        ends
    }

    /// End the active grab, committing any resize.
    pub fn end(&mut self, ws: Option<&mut Workspace>) {
        let Some(grab) = &self.active else {
            return;
        };
        if grab.kind == GrabKind::Resize
            && let Some(ws) = ws.filter(|ws| ws.id() == grab.workspace)
        {
            if ws.contains(grab.target) {
                ws.end_resize(grab.target);
            }
            ws.fold_pinned_sizes();
        }
        tracing::debug!(node = %grab.target, "tiling: grab ended");
        self.release();
    }

    /// Whether the active grab drags `node` of `workspace`.
    #[must_use]
    pub fn targets(&self, workspace: WorkspaceId, node: NodeId) -> bool {
        self.active.as_ref().is_some_and(|g| g.workspace == workspace && g.target == node)
    }

    /// Abandon the grab if it targets a node that is being destroyed.
    pub fn invalidate_node(&mut self, workspace: WorkspaceId, node: NodeId) {
        if self.targets(workspace, node) {
            tracing::debug!(node = %node, "tiling: grab target destroyed");
            self.release();
        }
    }

    /// Release any grab during teardown.
    pub fn shutdown(&mut self, ws: Option<&mut Workspace>) { self.end(ws); }

    fn release(&mut self) {
        self.active = None;
        self.phase = GrabPhase::Idle;
    }
}

// ============================================================================
// Edge Selection
// ============================================================================

/// Edges a resize grab at `p` moves.
///
/// An edge is picked when `p` lies within `RESIZE_MARGIN` of the size from
/// it. If no edge is that close, the nearer half on each axis is used.
///
/// # Returns
///
/// The edge mask, or an empty mask if `p` is outside `geometry`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)] // Window sizes fit f32 exactly
pub fn resize_edges(geometry: Rect, p: Point) -> Edges {
    if !geometry.contains(p) {
        tracing::error!(geometry = %geometry, point = %p, "tiling: point not in geometry, cannot pick resize edges");
        return Edges::empty();
    }

    let horizontal_margin = (geometry.width as f32 * RESIZE_MARGIN) as i32;
    let vertical_margin = (geometry.height as f32 * RESIZE_MARGIN) as i32;

    let mut edges = Edges::empty();
    if p.x - geometry.x < horizontal_margin {
        edges |= Edges::LEFT;
    } else if geometry.right() - p.x < horizontal_margin {
        edges |= Edges::RIGHT;
    }
    if p.y - geometry.y < vertical_margin {
        edges |= Edges::TOP;
    } else if geometry.bottom() - p.y < vertical_margin {
        edges |= Edges::BOTTOM;
    }

    if edges.is_empty() {
        edges |= if p.x - geometry.x < geometry.width / 2 { Edges::LEFT } else { Edges::RIGHT };
        edges |= if p.y - geometry.y < geometry.height / 2 { Edges::TOP } else { Edges::BOTTOM };
    }
    edges
}

// ============================================================================
// Tests
// ============================================================================
