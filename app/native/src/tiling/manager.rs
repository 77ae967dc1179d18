//! Glue between host events, bindable actions, the workspace grid and the
//! grab controller.
//!
//! The manager owns the grid and the host handle. `setup` fills the event
//! dispatch table and registers every binding; `shutdown` releases any grab,
//! unregisters the bindings and empties the table. After every handled event
//! or action the geometry changes of all workspaces are pushed to the host.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::actions::Action;
use super::error::{TilingError, TilingResult};
use super::grab::{GrabController, GrabKind};
use super::grid::WorkspaceGrid;
use super::host::{EventDispatch, EventKind, Host, HostEvent};
use super::node::{NodeId, WindowId, WorkspaceId};
use super::workspace::Workspace;
use crate::config::TrellisConfig;

// ============================================================================
// Settings
// ============================================================================

/// Runtime knobs of the manager, usually taken from the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagerSettings {
    /// Pixels a floating node travels per `move-*` action.
    pub move_step: i32,
    /// Whether a newly attached window becomes active and focused.
    pub new_windows_take_focus: bool,
    /// Button whose release ends a move grab.
    pub move_button: u32,
    /// Button whose release ends a resize grab.
    pub resize_button: u32,
    /// Trigger overrides by action.
    pub bindings: BTreeMap<Action, String>,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            move_step: super::constants::floating::DEFAULT_MOVE_STEP,
            new_windows_take_focus: true,
            move_button: 272,
            resize_button: 273,
            bindings: BTreeMap::new(),
        }
    }
}

impl ManagerSettings {
    /// Build settings from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &TrellisConfig) -> Self {
        Self {
            move_step: config.tiling.floating_move_step,
            new_windows_take_focus: config.tiling.new_windows_take_focus,
            move_button: config.tiling.move_button,
            resize_button: config.tiling.resize_button,
            bindings: config.bindings.0.clone(),
        }
    }

    /// Trigger bound to `action`, falling back to its default.
    #[must_use]
    pub fn trigger(&self, action: Action) -> &str {
        self.bindings.get(&action).map_or_else(|| action.default_trigger(), String::as_str)
    }
}

/// Where a window lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeLocation {
    pub workspace: WorkspaceId,
    pub node: NodeId,
}

// ============================================================================
// Tiling Manager
// ============================================================================

/// Event-driven front of the layout model for one output.
#[derive(Debug)]
pub struct TilingManager<H: Host> {
    host: Rc<H>,
    grid: WorkspaceGrid,
    current: WorkspaceId,
    grab: GrabController<H>,
    settings: ManagerSettings,
    dispatch: EventDispatch<H>,
}

impl<H: Host> TilingManager<H> {
    /// Create a manager over an existing grid. Call `setup` before feeding
    /// events.
    #[must_use]
    pub fn new(host: Rc<H>, grid: WorkspaceGrid, settings: ManagerSettings) -> Self {
        Self {
            host,
            grid,
            current: WorkspaceId::default(),
            grab: GrabController::new(),
            settings,
            dispatch: EventDispatch::new(),
        }
    }

    /// Create a manager whose grid and settings come from the configuration.
    #[must_use]
    pub fn from_config(host: Rc<H>, config: &TrellisConfig) -> Self {
        let grid = WorkspaceGrid::new(
            config.tiling.default_grid.dims(),
            config.tiling.effective_workarea(),
            config.tiling.output.clone(),
        );
        Self::new(host, grid, ManagerSettings::from_config(config))
    }

    /// Register event handlers and bindings.
    pub fn setup(&mut self) {
        self.dispatch.register(EventKind::ViewAttached, Self::on_view_attached);
        self.dispatch.register(EventKind::ViewMapped, Self::on_view_mapped);
        self.dispatch.register(EventKind::ViewFocused, Self::on_view_focused);
        self.dispatch.register(EventKind::ViewUnmapped, Self::on_view_unmapped);
        self.dispatch.register(EventKind::WorkareaChanged, Self::on_workarea_changed);
        self.dispatch.register(EventKind::GridChanged, Self::on_grid_changed);
        self.dispatch.register(EventKind::PointerButton, Self::on_pointer_button);
        self.dispatch.register(EventKind::PointerMotion, Self::on_pointer_motion);
        self.dispatch.register(EventKind::TouchMotion, Self::on_touch_motion);
        self.dispatch.register(EventKind::Binding, Self::on_binding);

        for action in Action::ALL {
            self.host.register_binding(action, self.settings.trigger(action));
        }
        tracing::info!(output = %self.grid.output(), handlers = self.dispatch.len(), "tiling: manager set up");
    }

    /// Release the grab, unregister bindings and stop handling events.
    pub fn shutdown(&mut self) {
        let ws = self.grab.workspace().and_then(|c| self.grid.get_mut(c));
        self.grab.shutdown(ws);
        for action in Action::ALL {
            self.host.unregister_binding(action);
        }
        self.dispatch.clear();
        tracing::info!(output = %self.grid.output(), "tiling: manager shut down");
    }

    /// Route one host event to its handler and push resulting geometry.
    ///
    /// # Returns
    ///
    /// `false` if no handler is registered for the event (before `setup` or
    /// after `shutdown`).
    pub fn handle_event(&mut self, event: &HostEvent) -> bool {
        let Some(handler) = self.dispatch.get(event.kind()) else {
            tracing::trace!(kind = ?event.kind(), "tiling: event ignored, no handler");
            return false;
        };
        handler(self, event);
        self.flush_updates();
        true
    }

    /// Run an action on the current workspace.
    ///
    /// Button actions start a grab on the window under the pointer.
    ///
    /// # Returns
    ///
    /// `true` if the action changed anything.
    pub fn run_action(&mut self, action: Action) -> bool {
        let changed = match action {
            Action::MoveActivate => self.begin_grab(GrabKind::Move, self.settings.move_button),
            Action::ResizeActivate => self.begin_grab(GrabKind::Resize, self.settings.resize_button),
            _ => {
                let step = self.settings.move_step;
                let Some(ws) = self.grid.get_mut(self.current) else {
                    return false;
                };
                let changed = action.apply(ws, step);
                if changed && let Some(window) = ws.active_window() {
                    self.host.focus_window(window);
                }
                changed
            }
        };
        tracing::debug!(action = %action, changed, "tiling: ran action");
        self.flush_updates();
        changed
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Host handle.
    #[must_use]
    pub const fn host(&self) -> &Rc<H> { &self.host }

    /// Workspace grid.
    #[must_use]
    pub const fn grid(&self) -> &WorkspaceGrid { &self.grid }

    /// Grab controller.
    #[must_use]
    pub const fn grab(&self) -> &GrabController<H> { &self.grab }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &ManagerSettings { &self.settings }

    /// Coordinate of the current workspace.
    #[must_use]
    pub const fn current(&self) -> WorkspaceId { self.current }

    /// The current workspace.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceNotFound` if the current coordinate is out of the
    /// grid.
    pub fn current_workspace(&self) -> TilingResult<&Workspace> {
        self.grid.get(self.current).ok_or(TilingError::WorkspaceNotFound(self.current))
    }

    /// Switch the current workspace.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceNotFound` if `coord` is outside the grid.
    pub fn set_current_workspace(&mut self, coord: WorkspaceId) -> TilingResult<()> {
        if !self.grid.in_bounds(coord) {
            return Err(TilingError::WorkspaceNotFound(coord));
        }
        self.current = coord;
        Ok(())
    }

    /// Find the workspace and node of a managed window.
    ///
    /// # Errors
    ///
    /// Returns `WindowNotFound` if no workspace manages `window`.
    pub fn locate(&self, window: WindowId) -> TilingResult<NodeLocation> {
        self.grid
            .find_window(window)
            .map(|(workspace, node)| NodeLocation { workspace, node })
            .ok_or(TilingError::WindowNotFound(window))
    }

    /// Push pending geometry changes of every workspace to the host.
    pub fn flush_updates(&mut self) {
        for ws in self.grid.iter_mut() {
            for update in ws.take_window_updates() {
                self.host.configure_window(update.window, update.geometry, update.tiled);
            }
        }
    }

    // ========================================================================
    // Grabs
    // ========================================================================

    fn begin_grab(&mut self, kind: GrabKind, button: u32) -> bool {
        let Some(window) = self.host.cursor_focus_window() else {
            return false;
        };
        let Ok(location) = self.locate(window) else {
            return false;
        };
        let Some(ws) = self.grid.get_mut(location.workspace) else {
            return false;
        };
        let target = match kind {
            GrabKind::Move => ws.find_floating_parent(location.node),
            GrabKind::Resize => ws.find_floating_parent(location.node).or(Some(location.node)),
        };
        let Some(target) = target else {
            tracing::debug!(window = %window, "tiling: move grab needs a floating window");
            return false;
        };
        let pointer = self.host.cursor_position();
        self.grab.begin(&self.host, ws, kind, target, pointer, button)
    }

    // ========================================================================
    // Event Handlers
    // ========================================================================

    fn on_view_attached(&mut self, event: &HostEvent) {
        let HostEvent::ViewAttached { window, title, geometry, workspace, toplevel, tiled } = event else {
            return;
        };
        if !toplevel {
            tracing::trace!(window = %window, "tiling: ignoring non-toplevel view");
            return;
        }
        if self.grid.find_window(*window).is_some() {
            tracing::warn!(window = %window, "tiling: view already attached");
            return;
        }

        let coord = workspace.filter(|&c| self.grid.in_bounds(c)).unwrap_or(self.current);
        let take_focus = self.settings.new_windows_take_focus && coord == self.current;
        let Some(ws) = self.grid.get_mut(coord) else {
            return;
        };

        let node = ws.create_view(*window, title.clone(), *geometry);
        let id = node.id();
        if *tiled {
            ws.insert_tiled_node(node);
        } else {
            ws.insert_floating_node(node);
        }
        tracing::debug!(workspace = %coord, window = %window, title = %title, tiled, "tiling: attached view");

        if take_focus && ws.set_active(id) {
            self.host.focus_window(*window);
        }
    }

    fn on_view_mapped(&mut self, event: &HostEvent) {
        let HostEvent::ViewMapped { window, geometry, tiled } = event else {
            return;
        };
        let Ok(location) = self.locate(*window) else {
            return;
        };
        if !tiled && let Some(ws) = self.grid.get_mut(location.workspace) {
            ws.set_floating_geometry(location.node, *geometry);
        }
    }

    fn on_view_focused(&mut self, event: &HostEvent) {
        let HostEvent::ViewFocused { window } = event else {
            return;
        };
        let Ok(location) = self.locate(*window) else {
            return;
        };
        if let Some(ws) = self.grid.get_mut(location.workspace) {
            ws.set_active(location.node);
        }
        self.current = location.workspace;
    }

    fn on_view_unmapped(&mut self, event: &HostEvent) {
        let HostEvent::ViewUnmapped { window } = event else {
            return;
        };
        let Ok(location) = self.locate(*window) else {
            return;
        };
        let Some(ws) = self.grid.get_mut(location.workspace) else {
            return;
        };

        let floating = ws.find_floating_parent(location.node);
        let dragged = self.grab.targets(location.workspace, location.node)
            || floating.is_some_and(|f| self.grab.targets(location.workspace, f));
        if dragged {
            self.grab.end(Some(&mut *ws));
        }

        if let Some(node) = ws.remove_node(location.node) {
            ws.destroy(node);
        }
        self.grab.invalidate_node(location.workspace, location.node);
        tracing::debug!(workspace = %location.workspace, window = %window, "tiling: unmapped view");

        if location.workspace == self.current
            && let Some(next) = ws.get_last_active_node()
        {
            ws.set_active(next);
            if let Some(next_window) = ws.active_window() {
                self.host.focus_window(next_window);
            }
        }
    }

    fn on_workarea_changed(&mut self, event: &HostEvent) {
        let HostEvent::WorkareaChanged { workarea } = event else {
            return;
        };
        for ws in self.grid.iter_mut() {
            ws.set_workarea(*workarea);
        }
    }

    fn on_grid_changed(&mut self, event: &HostEvent) {
        let HostEvent::GridChanged { dims } = event else {
            return;
        };
        let workarea = self.grid.get(self.current).map(Workspace::workarea).unwrap_or_default();
        let migrations = self.grid.update_dims(*dims, workarea);
        self.current = self.grid.clamp(self.current);

        if self.grab.workspace().is_some_and(|c| !self.grid.in_bounds(c)) {
            self.grab.end(None);
        }
        if !migrations.is_empty() {
            tracing::info!(count = migrations.len(), "tiling: windows migrated after grid shrink");
        }
    }

    fn on_pointer_button(&mut self, event: &HostEvent) {
        let HostEvent::PointerButton { button, pressed } = event else {
            return;
        };
        let ws = self.grab.workspace().and_then(|c| self.grid.get_mut(c));
        self.grab.button(ws, *button, *pressed);
    }

    fn on_pointer_motion(&mut self, event: &HostEvent) {
        let HostEvent::PointerMotion { position } = event else {
            return;
        };
        let Some(coord) = self.grab.workspace() else {
            return;
        };
        match self.grid.get_mut(coord) {
            Some(ws) => {
                self.grab.pointer_motion(ws, *position);
            }
            None => self.grab.end(None),
        }
    }

    fn on_touch_motion(&mut self, event: &HostEvent) {
        let HostEvent::TouchMotion { id, position } = event else {
            return;
        };
        let Some(coord) = self.grab.workspace() else {
            return;
        };
        match self.grid.get_mut(coord) {
            Some(ws) => {
                self.grab.touch_motion(ws, *id, *position);
            }
            None => self.grab.end(None),
        }
    }

    fn on_binding(&mut self, event: &HostEvent) {
        if let HostEvent::Binding { action } = event {
            self.run_action(*action);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
