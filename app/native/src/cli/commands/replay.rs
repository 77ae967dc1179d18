//! Replay CLI command.
//!
//! Feeds a scripted sequence of host events through a `TilingManager`
//! backed by an in-memory host and prints the resulting layout.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Args;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::types::OutputFormat;
use crate::cli::output::{format_bool, print_highlighted_json, render_grid, truncate};
use crate::config::{self, TrellisConfig};
use crate::error::TrellisError;
use crate::tiling::host::{HostEvent, MemoryHost};
use crate::tiling::manager::TilingManager;
use crate::tiling::node::WindowId;
use crate::tiling::snapshot::{GridSnapshot, NodeSnapshot};

/// Arguments for `trellis replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSONC file holding an array of host events.
    ///
    /// Each event is an object tagged by `"event"`, e.g.
    /// `{ "event": "view-attached", "window": 1, "geometry": { ... } }`.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Output format for the resulting layout.
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Also print workspaces that hold no window.
    #[arg(long, short)]
    pub all: bool,
}

/// Result of replaying a script.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Events a handler accepted.
    pub handled: usize,
    /// Window the host was last asked to focus.
    pub focused: Option<WindowId>,
    /// Layout after the last event.
    pub grid: GridSnapshot,
}

/// Execute `trellis replay`.
///
/// # Errors
///
/// Returns an error if the script cannot be read or parsed.
pub fn execute(args: &ReplayArgs) -> Result<(), TrellisError> {
    let events = load_script(&args.script)?;
    let report = replay(&events, config::get_config());

    match args.format {
        OutputFormat::Json => print_highlighted_json(&serde_json::to_value(&report)?),
        OutputFormat::Tree => print!("{}", render_grid(&report.grid, args.all)),
        OutputFormat::Table => print_table(&report),
    }
    Ok(())
}

/// Parse a JSONC event script.
///
/// # Errors
///
/// Returns `TrellisError::ScriptError` if the file is unreadable or is not
/// an array of host events.
pub fn load_script(path: &Path) -> Result<Vec<HostEvent>, TrellisError> {
    let file = fs::File::open(path)
        .map_err(|e| TrellisError::ScriptError(format!("{}: {e}", path.display())))?;
    let reader = json_comments::StripComments::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| TrellisError::ScriptError(format!("{}: {e}", path.display())))
}

/// Run `events` through a fresh manager and capture the outcome.
///
/// Pointer and touch motion also move the simulated cursor, and the window
/// under it becomes the host's cursor focus.
#[must_use]
pub fn replay(events: &[HostEvent], config: &TrellisConfig) -> ReplayReport {
    let host = Rc::new(MemoryHost::new());
    let mut manager = TilingManager::from_config(Rc::clone(&host), config);
    manager.setup();

    let mut handled = 0;
    for event in events {
        if let HostEvent::PointerMotion { position } | HostEvent::TouchMotion { position, .. } = event {
            host.set_cursor(*position);
            let under = manager.current_workspace().ok().and_then(|ws| ws.window_at(*position));
            host.set_cursor_focus(under);
        }
        if manager.handle_event(event) {
            handled += 1;
        }
    }

    manager.shutdown();
    tracing::debug!(events = events.len(), handled, "replay finished");

    ReplayReport {
        handled,
        focused: host.focused(),
        grid: GridSnapshot::capture(manager.grid(), manager.current()),
    }
}

// ============================================================================
// Table Output
// ============================================================================

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "Window")]
    window: u32,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Workspace")]
    workspace: String,
    #[tabled(rename = "Geometry")]
    geometry: String,
    #[tabled(rename = "Floating")]
    floating: String,
    #[tabled(rename = "Active")]
    active: String,
}

fn window_rows(grid: &GridSnapshot) -> Vec<WindowRow> {
    fn collect(node: &NodeSnapshot, workspace: &str, floating: bool, rows: &mut Vec<WindowRow>) {
        match node {
            NodeSnapshot::View { window, title, geometry, active, .. } => rows.push(WindowRow {
                window: window.0,
                title: truncate(title, 32),
                workspace: workspace.to_string(),
                geometry: geometry.to_string(),
                floating: format_bool(floating),
                active: format_bool(*active),
            }),
            NodeSnapshot::Split { children, .. } => {
                for child in children {
                    collect(child, workspace, floating, rows);
                }
            }
        }
    }

    let mut rows = Vec::new();
    for ws in &grid.workspaces {
        let name = format!("{},{}", ws.id.x, ws.id.y);
        if let Some(tiled) = &ws.tiled {
            collect(tiled, &name, false, &mut rows);
        }
        for node in &ws.floating {
            collect(node, &name, true, &mut rows);
        }
    }
    rows
}

fn print_table(report: &ReplayReport) {
    let rows = window_rows(&report.grid);
    if rows.is_empty() {
        println!("No windows.");
        return;
    }
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::tiling::actions::Action;
    use crate::tiling::geometry::{Point, Rect};

    const LEFT_BUTTON: u32 = 272;

    fn attach(window: u32, tiled: bool) -> HostEvent {
        HostEvent::ViewAttached {
            window: WindowId(window),
            title: format!("w{window}"),
            geometry: Rect::new(100, 100, 200, 150),
            workspace: None,
            toplevel: true,
            tiled,
        }
    }

    fn config() -> TrellisConfig {
        let mut config = TrellisConfig::default();
        config.tiling.default_grid.columns = 2;
        config.tiling.default_grid.rows = 1;
        config.tiling.workarea = Rect::new(0, 0, 1000, 800);
        config
    }

    // ========================================================================
    // Replay
    // ========================================================================

    #[test]
    fn test_replay_tiles_attached_windows() {
        let report = replay(&[attach(1, true), attach(2, true)], &config());
        assert_eq!(report.handled, 2);
        assert_eq!(report.focused, Some(WindowId(2)));

        let current = &report.grid.workspaces[0];
        let tiled = current.tiled.as_ref().unwrap();
        assert_eq!(tiled.windows(), vec![WindowId(1), WindowId(2)]);
        assert_eq!(tiled.children()[0].geometry(), Rect::new(0, 0, 1000, 400));
    }

    #[test]
    fn test_replay_drags_floating_window() {
        let events = [
            attach(1, false),
            HostEvent::PointerMotion { position: Point::new(150, 150) },
            HostEvent::Binding { action: Action::MoveActivate },
            HostEvent::PointerMotion { position: Point::new(170, 190) },
            HostEvent::PointerButton { button: LEFT_BUTTON, pressed: false },
        ];
        let report = replay(&events, &config());
        assert_eq!(report.handled, events.len());

        let floating = &report.grid.workspaces[0].floating;
        assert_eq!(floating.len(), 1);
        assert_eq!(floating[0].geometry(), Rect::new(120, 140, 200, 150));
    }

    #[test]
    fn test_window_rows_mark_floating() {
        let report = replay(&[attach(1, true), attach(2, false)], &config());
        let rows = window_rows(&report.grid);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].window, 1);
        assert_eq!(rows[0].workspace, "0,0");
        assert!(rows[1].floating.contains('✓'));
    }

    // ========================================================================
    // Scripts
    // ========================================================================

    #[test]
    fn test_load_script_accepts_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                // open a terminal
                {{ "event": "view-attached", "window": 1, "geometry": {{ "x": 0, "y": 0, "width": 10, "height": 10 }} }},
                {{ "event": "binding", "action": "toggle-tile" }}
            ]"#
        )
        .unwrap();

        let events = load_script(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], HostEvent::Binding { action: Action::ToggleTile });
    }

    #[test]
    fn test_load_script_reports_bad_events() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{ "event": "explode" }}]"#).unwrap();
        let err = load_script(file.path()).unwrap_err();
        assert!(matches!(err, TrellisError::ScriptError(_)));
    }

    #[test]
    fn test_load_script_missing_file() {
        let err = load_script(Path::new("/nonexistent/trellis/script.jsonc")).unwrap_err();
        assert!(err.to_string().contains("script.jsonc"));
    }
}
