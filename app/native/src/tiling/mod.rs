//! Tiling layout model.
//!
//! An in-memory, single-threaded model of a tiling window manager: windows
//! live in nested split containers (vertical, horizontal, tabbed or stacked),
//! each workspace keeps an independent set of floating windows, and every
//! output has a grid of workspaces.
//!
//! # Layers
//!
//! - `node`, `arena`, `split` - The tree and its layout math
//! - `workspace` - Tree editing, adjacency, movement and resizing
//! - `grid` - Workspaces of one output and grid resizing
//! - `grab` - Interactive move/resize state machine
//! - `host`, `actions`, `manager` - Boundary to the compositor
//!
//! # Usage
//!
//! ```rust,ignore
//! let host = Rc::new(MemoryHost::new());
//! let mut manager = TilingManager::from_config(host, get_config());
//! manager.setup();
//! manager.handle_event(&HostEvent::ViewAttached { .. });
//! ```

pub mod actions;
pub mod arena;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod grab;
pub mod grid;
pub mod host;
pub mod manager;
pub mod node;
pub mod snapshot;
pub mod split;
pub mod workspace;

// Re-export commonly used types
pub use actions::Action;
pub use arena::{DetachedNode, NodeArena};
pub use error::{TilingError, TilingResult};
pub use geometry::{Dimensions, Edges, Point, Rect};
pub use grab::{GrabController, GrabKind, GrabPhase};
pub use grid::{WindowMigration, WorkspaceGrid};
pub use host::{EventDispatch, EventKind, Host, HostEvent, MemoryHost};
pub use manager::{ManagerSettings, NodeLocation, TilingManager};
pub use node::{
    Direction, Node, NodeId, NodeKind, ParentLookup, ParentRef, SplitType, WindowId, WorkspaceId,
};
pub use snapshot::{GridSnapshot, NodeSnapshot, WorkspaceSnapshot};
pub use workspace::{WindowUpdate, Workspace};
