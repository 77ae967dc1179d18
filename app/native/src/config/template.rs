//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// Trellis Configuration File
// ===========================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
//
// Schema: run `trellis schema` to print the JSON Schema for this file.

{
  // ============================================================================
  // Bindings
  // ============================================================================
  // Trigger strings per action. Unlisted actions keep their default trigger.
  // Run `trellis actions` to list every action with its current trigger.
  // "bindings": {
  //   "toggle-split-direction": "<super> KEY_E",
  //   "focus-left": "<super> KEY_H",
  //   "move-left": "<super> <shift> KEY_H",
  //   "toggle-tile": "<super> <shift> KEY_SPACE",
  //   "move-activate": "<super> BTN_LEFT",
  //   "resize-activate": "<super> BTN_RIGHT"
  // },

  // ============================================================================
  // Tiling
  // ============================================================================
  // "tiling": {
  //   // Output the workspace grid belongs to
  //   "output": "default",
  //
  //   // Pixels a floating window moves per move-* action
  //   "floatingMoveStep": 5,
  //
  //   // Workspace grid size
  //   "defaultGrid": { "columns": 3, "rows": 3 },
  //
  //   // Output area, before panel reservations
  //   "workarea": { "x": 0, "y": 0, "width": 1920, "height": 1080 },
  //
  //   // Pixels reserved by panels on each edge
  //   "reserved": { "top": 0, "right": 0, "bottom": 0, "left": 0 },
  //
  //   // Focus windows as soon as they are attached
  //   "newWindowsTakeFocus": true,
  //
  //   // Pointer buttons that end a move or resize grab (evdev codes)
  //   "moveButton": 272,
  //   "resizeButton": 273
  // }
}
"##
    .to_string()
}

/// Creates a configuration file at the specified path with the template content.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrellisConfig;

    #[test]
    fn test_generate_config_template_is_valid_jsonc() {
        let template = generate_config_template();
        let reader = json_comments::StripComments::new(template.as_bytes());
        let config: TrellisConfig = serde_json::from_reader(reader).unwrap();
        assert_eq!(config, TrellisConfig::default());
    }

    #[test]
    fn test_generate_config_template_contains_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("bindings"));
        assert!(template.contains("tiling"));
        assert!(template.contains("floatingMoveStep"));
        assert!(template.contains("reserved"));
    }

    #[test]
    fn test_create_config_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");
        create_config_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), generate_config_template());
    }
}
