//! Error types for the tiling layout tree.
//!
//! Tree operations themselves never fail: an inapplicable operation (no
//! adjacent node, nothing to downgrade, grab denied) is reported through an
//! empty `Option` or a `false` return. `TilingError` is used by the outer
//! surfaces (manager lookups, action parsing, script replay) where a caller
//! genuinely asked for something that does not exist.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::tiling::error::{TilingError, TilingResult};
//!
//! fn node_of(manager: &TilingManager<H>, window: WindowId) -> TilingResult<NodeLocation> {
//!     manager.locate(window).ok_or(TilingError::WindowNotFound(window))
//! }
//! ```

use thiserror::Error;

use super::geometry::Point;
use super::node::{NodeId, WindowId};

/// Result type alias for tiling operations.
pub type TilingResult<T> = Result<T, TilingError>;

/// Errors that can occur on the outer tiling surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilingError {
    /// No workspace exists at the given grid coordinate.
    #[error("Workspace {0} not found")]
    WorkspaceNotFound(Point),

    /// The window is not managed by any workspace.
    #[error("Window {0} not found")]
    WindowNotFound(WindowId),

    /// A node id no longer resolves in its arena.
    #[error("Node {0} is stale")]
    StaleNode(NodeId),

    /// A container-only operation was applied to a leaf.
    #[error("Node {0} is not a container")]
    NotAContainer(NodeId),

    /// An action name did not match any bindable action.
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    /// The host refused exclusive input ownership for a grab.
    #[error("Input grab denied by host")]
    GrabDenied,
}

impl TilingError {
    /// Returns `true` if this error indicates a resource was not found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WorkspaceNotFound(_) | Self::WindowNotFound(_) | Self::StaleNode(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
