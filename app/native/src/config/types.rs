//! Configuration types for Trellis.
//!
//! The file is JSONC: `//` and `/* */` comments are stripped before the
//! JSON is parsed. Every field has a default, so an empty object is a valid
//! configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tiling::actions::Action;
use crate::tiling::constants::floating::DEFAULT_MOVE_STEP;
use crate::tiling::geometry::{Dimensions, Rect};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TrellisConfig {
    /// Triggers for bindable actions. Actions not listed use their default trigger.
    pub bindings: BindingsConfig,

    /// Layout and interaction settings.
    pub tiling: TilingConfig,
}

/// Trigger overrides, keyed by action name.
///
/// ```jsonc
/// "bindings": { "focus-left": "<super> KEY_LEFT" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct BindingsConfig(pub BTreeMap<Action, String>);

impl BindingsConfig {
    /// Trigger for `action`: the configured one, or the built-in default.
    #[must_use]
    pub fn trigger(&self, action: Action) -> &str {
        self.0.get(&action).map_or_else(|| action.default_trigger(), String::as_str)
    }

    /// Whether `action` has a configured override.
    #[must_use]
    pub fn is_overridden(&self, action: Action) -> bool { self.0.contains_key(&action) }
}

/// Layout and interaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TilingConfig {
    /// Name of the output the grid is created for.
    pub output: String,

    /// Pixels a floating window moves per `move-*` action.
    pub floating_move_step: i32,

    /// Size of the workspace grid.
    pub default_grid: GridConfig,

    /// Output area before panel reservations are removed.
    pub workarea: Rect,

    /// Space reserved by panels on each edge.
    pub reserved: ReservedConfig,

    /// Whether a newly attached window receives focus.
    pub new_windows_take_focus: bool,

    /// Pointer button code that ends a move grab.
    pub move_button: u32,

    /// Pointer button code that ends a resize grab.
    pub resize_button: u32,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            output: "default".to_string(),
            floating_move_step: DEFAULT_MOVE_STEP,
            default_grid: GridConfig::default(),
            workarea: Rect::new(0, 0, 1920, 1080),
            reserved: ReservedConfig::default(),
            new_windows_take_focus: true,
            move_button: 272,
            resize_button: 273,
        }
    }
}

impl TilingConfig {
    /// Workarea with the panel reservations removed.
    #[must_use]
    pub fn effective_workarea(&self) -> Rect {
        let r = &self.reserved;
        self.workarea.inset(r.top, r.right, r.bottom, r.left)
    }
}

/// Number of workspace columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GridConfig {
    pub columns: i32,
    pub rows: i32,
}

impl Default for GridConfig {
    fn default() -> Self { Self { columns: 3, rows: 3 } }
}

impl GridConfig {
    /// Grid size, never smaller than 1x1.
    #[must_use]
    pub fn dims(&self) -> Dimensions { Dimensions::new(self.columns.max(1), self.rows.max(1)) }
}

/// Pixels reserved on each output edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReservedConfig {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error("no configuration file found in any of the expected locations")]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Application directory name under the config roots.
const APP_DIR: &str = "trellis";

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Legacy configuration file names in home directory.
const LEGACY_CONFIG_FILE_NAMES: &[&str] = &[".trellis.jsonc", ".trellis.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/trellis/config.jsonc` or `config.json`, if set
/// 2. `~/.config/trellis/config.jsonc` or `config.json`
/// 3. `dirs::config_dir()/trellis/`, when it differs from the above
/// 4. `~/.trellis.jsonc` or `~/.trellis.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    fn push_dir(dir: &Path, paths: &mut Vec<PathBuf>) {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME may already be ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        push_dir(&PathBuf::from(xdg_config).join(APP_DIR), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(&home.join(".config").join(APP_DIR), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(&config_dir.join(APP_DIR), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(TrellisConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .ok_or(ConfigError::NotFound)
        .and_then(|path| load_config_from_path(&path))
}

/// Loads the configuration from an explicit path.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if `path` does not exist, and the I/O or
/// parse error otherwise.
pub fn load_config_from_path(path: &Path) -> Result<(TrellisConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: TrellisConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // ========================================================================
    // Defaults
    // ========================================================================

    #[test]
    fn test_default_config() {
        let config = TrellisConfig::default();
        assert!(config.bindings.0.is_empty());
        assert_eq!(config.tiling.floating_move_step, 5);
        assert_eq!(config.tiling.default_grid.dims(), Dimensions::new(3, 3));
        assert!(config.tiling.new_windows_take_focus);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: TrellisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TrellisConfig::default());
    }

    #[test]
    fn test_grid_dims_never_zero() {
        let grid = GridConfig { columns: 0, rows: -2 };
        assert_eq!(grid.dims(), Dimensions::new(1, 1));
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    #[test]
    fn test_parses_camel_case_fields() {
        let json = r#"{
            "tiling": {
                "floatingMoveStep": 12,
                "defaultGrid": { "columns": 2, "rows": 1 },
                "reserved": { "top": 30 },
                "newWindowsTakeFocus": false
            }
        }"#;
        let config: TrellisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tiling.floating_move_step, 12);
        assert_eq!(config.tiling.default_grid.dims(), Dimensions::new(2, 1));
        assert!(!config.tiling.new_windows_take_focus);
        assert_eq!(config.tiling.effective_workarea(), Rect::new(0, 30, 1920, 1050));
    }

    #[test]
    fn test_bindings_override_default_trigger() {
        let json = r#"{ "bindings": { "focus-left": "<super> KEY_A" } }"#;
        let config: TrellisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.bindings.trigger(Action::FocusLeft), "<super> KEY_A");
        assert!(config.bindings.is_overridden(Action::FocusLeft));
        assert_eq!(config.bindings.trigger(Action::FocusRight), Action::FocusRight.default_trigger());
    }

    #[test]
    fn test_unknown_binding_is_rejected() {
        let json = r#"{ "bindings": { "do-a-barrel-roll": "<super> KEY_B" } }"#;
        assert!(serde_json::from_str::<TrellisConfig>(json).is_err());
    }

    // ========================================================================
    // Loading
    // ========================================================================

    #[test]
    fn test_load_config_from_path_strips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // move faster
                "tiling": {{ "floatingMoveStep": 8 /* px */ }}
            }}"#
        )
        .unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.tiling.floating_move_step, 8);
        assert_eq!(path, file.path());
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join("missing.jsonc"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_config_from_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("trellis")));
    }
}
