//! Boundary between the layout model and the compositor hosting it.
//!
//! The model never talks to a display server directly. It consumes a `Host`
//! for the few things it needs (cursor, input grab, bindings, window
//! configuration) and receives `HostEvent`s that the manager routes through
//! an `EventDispatch` table.
//!
//! Host methods take `&self`: handles are shared through `Rc` and keep any
//! mutable state behind interior mutability, matching the single-threaded
//! model.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::actions::Action;
use super::geometry::{Dimensions, Edges, Point, Rect};
use super::manager::TilingManager;
use super::node::{WindowId, WorkspaceId};

// ============================================================================
// Host Trait
// ============================================================================

/// Services the embedding compositor provides.
pub trait Host {
    /// Current pointer position in output coordinates.
    fn cursor_position(&self) -> Point;

    /// Window under the pointer, if any.
    fn cursor_focus_window(&self) -> Option<WindowId>;

    /// Ask for exclusive pointer/touch input. Returns `false` if refused.
    fn activate_input_grab(&self) -> bool;

    /// Give exclusive input back.
    fn deactivate_input_grab(&self);

    /// Show the resize cursor matching the moving edges.
    fn set_resize_cursor(&self, edges: Edges);

    /// Bind `trigger` (a key or button combination) to `action`.
    fn register_binding(&self, action: Action, trigger: &str);

    /// Remove the binding of `action`.
    fn unregister_binding(&self, action: Action);

    /// Give keyboard focus to a window.
    fn focus_window(&self, window: WindowId);

    /// Move/resize a window and set whether it is drawn as tiled.
    fn configure_window(&self, window: WindowId, geometry: Rect, tiled: bool);
}

// ============================================================================
// Host Events
// ============================================================================

const fn default_true() -> bool { true }

/// Something that happened in the compositor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostEvent {
    /// A new window appeared.
    ViewAttached {
        window: WindowId,
        #[serde(default)]
        title: String,
        geometry: Rect,
        /// Workspace the window opened on; the current one if omitted.
        #[serde(default)]
        workspace: Option<WorkspaceId>,
        /// Only toplevel windows are managed.
        #[serde(default = "default_true")]
        toplevel: bool,
        /// Whether the window enters the tiled tree or the floating set.
        #[serde(default = "default_true")]
        tiled: bool,
    },
    /// A window became visible with the given geometry.
    ViewMapped {
        window: WindowId,
        geometry: Rect,
        /// Whether the client is in a fully tiled state.
        #[serde(default)]
        tiled: bool,
    },
    /// A window received focus.
    ViewFocused { window: WindowId },
    /// A window went away.
    ViewUnmapped { window: WindowId },
    /// The usable output area changed.
    WorkareaChanged { workarea: Rect },
    /// The workspace grid was resized.
    GridChanged { dims: Dimensions },
    /// A pointer button changed state.
    PointerButton { button: u32, pressed: bool },
    /// The pointer moved.
    PointerMotion { position: Point },
    /// A touch point moved.
    TouchMotion { id: i32, position: Point },
    /// A registered binding fired.
    Binding { action: Action },
}

/// Payload-free discriminant of `HostEvent`, used as the dispatch key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    ViewAttached,
    ViewMapped,
    ViewFocused,
    ViewUnmapped,
    WorkareaChanged,
    GridChanged,
    PointerButton,
    PointerMotion,
    TouchMotion,
    Binding,
}

impl HostEvent {
    /// The dispatch key of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ViewAttached { .. } => EventKind::ViewAttached,
            Self::ViewMapped { .. } => EventKind::ViewMapped,
            Self::ViewFocused { .. } => EventKind::ViewFocused,
            Self::ViewUnmapped { .. } => EventKind::ViewUnmapped,
            Self::WorkareaChanged { .. } => EventKind::WorkareaChanged,
            Self::GridChanged { .. } => EventKind::GridChanged,
            Self::PointerButton { .. } => EventKind::PointerButton,
            Self::PointerMotion { .. } => EventKind::PointerMotion,
            Self::TouchMotion { .. } => EventKind::TouchMotion,
            Self::Binding { .. } => EventKind::Binding,
        }
    }
}

// ============================================================================
// Event Dispatch
// ============================================================================

/// Handler invoked for one event kind.
pub type EventHandler<H> = fn(&mut TilingManager<H>, &HostEvent);

/// Table mapping event kinds to handlers.
///
/// Filled when the manager is set up and emptied on shutdown, so events
/// arriving outside that window are ignored.
pub struct EventDispatch<H: Host> {
    handlers: HashMap<EventKind, EventHandler<H>>,
}

impl<H: Host> EventDispatch<H> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self { Self { handlers: HashMap::new() } }

    /// Register (or replace) the handler for `kind`.
    pub fn register(&mut self, kind: EventKind, handler: EventHandler<H>) {
        self.handlers.insert(kind, handler);
    }

    /// Handler registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: EventKind) -> Option<EventHandler<H>> { self.handlers.get(&kind).copied() }

    /// Drop every handler.
    pub fn clear(&mut self) { self.handlers.clear(); }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize { self.handlers.len() }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.handlers.is_empty() }
}

impl<H: Host> Default for EventDispatch<H> {
    fn default() -> Self { Self::new() }
}

impl<H: Host> fmt::Debug for EventDispatch<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("EventDispatch").field("kinds", &kinds).finish()
    }
}

// ============================================================================
// In-Memory Host
// ============================================================================

/// A host with no display server behind it.
///
/// Records every request so that scripted replays and tests can inspect
/// what the model asked for. Cursor state and grab policy are set by the
/// driver.
#[derive(Debug)]
pub struct MemoryHost {
    cursor: Cell<Point>,
    cursor_focus: Cell<Option<WindowId>>,
    grant_grabs: Cell<bool>,
    grab_active: Cell<bool>,
    resize_cursor: Cell<Option<Edges>>,
    focused: Cell<Option<WindowId>>,
    bindings: RefCell<BTreeMap<Action, String>>,
    windows: RefCell<BTreeMap<WindowId, (Rect, bool)>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            cursor: Cell::new(Point::default()),
            cursor_focus: Cell::new(None),
            grant_grabs: Cell::new(true),
            grab_active: Cell::new(false),
            resize_cursor: Cell::new(None),
            focused: Cell::new(None),
            bindings: RefCell::new(BTreeMap::new()),
            windows: RefCell::new(BTreeMap::new()),
        }
    }
}

impl MemoryHost {
    /// Create a host that grants input grabs.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Move the simulated pointer.
    pub fn set_cursor(&self, position: Point) { self.cursor.set(position); }

    /// Set the window reported under the pointer.
    pub fn set_cursor_focus(&self, window: Option<WindowId>) { self.cursor_focus.set(window); }

    /// Choose whether future grab requests succeed.
    pub fn set_grant_grabs(&self, grant: bool) { self.grant_grabs.set(grant); }

    /// Whether an input grab is currently held.
    #[must_use]
    pub fn grab_active(&self) -> bool { self.grab_active.get() }

    /// Edge mask of the last resize cursor request.
    #[must_use]
    pub fn resize_cursor(&self) -> Option<Edges> { self.resize_cursor.get() }

    /// Window that last received focus.
    #[must_use]
    pub fn focused(&self) -> Option<WindowId> { self.focused.get() }

    /// Registered bindings by action.
    #[must_use]
    pub fn bindings(&self) -> BTreeMap<Action, String> { self.bindings.borrow().clone() }

    /// Last configuration pushed for `window`.
    #[must_use]
    pub fn window(&self, window: WindowId) -> Option<(Rect, bool)> {
        self.windows.borrow().get(&window).copied()
    }

    /// Last configuration of every window, by id.
    #[must_use]
    pub fn windows(&self) -> BTreeMap<WindowId, (Rect, bool)> { self.windows.borrow().clone() }
}

impl Host for MemoryHost {
    fn cursor_position(&self) -> Point { self.cursor.get() }

    fn cursor_focus_window(&self) -> Option<WindowId> { self.cursor_focus.get() }

    fn activate_input_grab(&self) -> bool {
        if !self.grant_grabs.get() || self.grab_active.get() {
            return false;
        }
        self.grab_active.set(true);
        true
    }

    fn deactivate_input_grab(&self) {
        self.grab_active.set(false);
        self.resize_cursor.set(None);
    }

    fn set_resize_cursor(&self, edges: Edges) { self.resize_cursor.set(Some(edges)); }

    fn register_binding(&self, action: Action, trigger: &str) {
        self.bindings.borrow_mut().insert(action, trigger.to_string());
    }

    fn unregister_binding(&self, action: Action) { self.bindings.borrow_mut().remove(&action); }

    fn focus_window(&self, window: WindowId) { self.focused.set(Some(window)); }

    fn configure_window(&self, window: WindowId, geometry: Rect, tiled: bool) {
        tracing::trace!(window = %window, geometry = %geometry, tiled, "tiling: configure window");
        self.windows.borrow_mut().insert(window, (geometry, tiled));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parses_with_defaults() {
        let event: HostEvent = serde_json::from_str(
            r#"{"event": "view-attached", "window": 3, "geometry": {"x": 0, "y": 0, "width": 10, "height": 10}}"#,
        )
        .unwrap();
        assert_eq!(event, HostEvent::ViewAttached {
            window: WindowId(3),
            title: String::new(),
            geometry: Rect::new(0, 0, 10, 10),
            workspace: None,
            toplevel: true,
            tiled: true,
        });
        assert_eq!(event.kind(), EventKind::ViewAttached);
    }

    #[test]
    fn test_binding_event_uses_action_name() {
        let event: HostEvent =
            serde_json::from_str(r#"{"event": "binding", "action": "focus-left"}"#).unwrap();
        assert_eq!(event, HostEvent::Binding { action: Action::FocusLeft });
    }

    #[test]
    fn test_memory_host_grab_is_exclusive() {
        let host = MemoryHost::new();
        assert!(host.activate_input_grab());
        assert!(!host.activate_input_grab());
        host.deactivate_input_grab();
        host.set_grant_grabs(false);
        assert!(!host.activate_input_grab());
        assert!(!host.grab_active());
    }

    #[test]
    fn test_memory_host_records_requests() {
        let host = MemoryHost::new();
        host.register_binding(Action::FocusLeft, "<super> KEY_H");
        host.configure_window(WindowId(1), Rect::new(0, 0, 5, 5), true);
        host.focus_window(WindowId(1));
        assert_eq!(host.bindings().get(&Action::FocusLeft).map(String::as_str), Some("<super> KEY_H"));
        assert_eq!(host.window(WindowId(1)), Some((Rect::new(0, 0, 5, 5), true)));
        assert_eq!(host.focused(), Some(WindowId(1)));

        host.unregister_binding(Action::FocusLeft);
        assert!(host.bindings().is_empty());
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(serde_json::from_str::<HostEvent>(r#"{"event": "teleport"}"#).is_err());
    }
}
