//! JSON Schema for the configuration file and host event scripts.

use crate::config::TrellisConfig;
use crate::tiling::host::HostEvent;

/// Base URL the published schemas live under.
const SCHEMA_BASE: &str = "https://raw.githubusercontent.com/trellis-wm/trellis/main";

/// Generates a JSON Schema for the Trellis configuration.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    with_id(schemars::schema_for!(TrellisConfig), "trellis.schema.json")
}

/// Generates a JSON Schema for a replay script: an array of host events.
#[must_use]
pub fn generate_events_schema() -> schemars::Schema {
    with_id(schemars::schema_for!(Vec<HostEvent>), "trellis-events.schema.json")
}

fn with_id(mut schema: schemars::Schema, file: &str) -> schemars::Schema {
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(format!("{SCHEMA_BASE}/{file}")));
    }
    schema
}

/// Pretty-printed configuration schema.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

/// Pretty-printed replay script schema.
#[must_use]
pub fn print_events_schema() -> String {
    serde_json::to_string_pretty(&generate_events_schema()).unwrap_or_default()
}
