//! Actions CLI command.
//!
//! Lists every bindable action with the trigger it is registered under.

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::output::print_highlighted_json;
use crate::config::{self, BindingsConfig};
use crate::error::TrellisError;
use crate::tiling::actions::Action;

/// Arguments for `trellis actions`.
#[derive(Args, Debug)]
pub struct ActionsArgs {
    /// Output as JSON.
    #[arg(long, short)]
    pub json: bool,
}

/// One action and its effective trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct ActionBinding {
    #[tabled(rename = "Action")]
    pub action: Action,
    #[tabled(rename = "Trigger")]
    pub trigger: String,
    #[tabled(rename = "Input")]
    pub input: &'static str,
    #[tabled(rename = "Configured")]
    pub configured: bool,
}

/// Effective bindings for every action, in declaration order.
#[must_use]
pub fn action_bindings(bindings: &BindingsConfig) -> Vec<ActionBinding> {
    Action::ALL
        .into_iter()
        .map(|action| ActionBinding {
            action,
            trigger: bindings.trigger(action).to_string(),
            input: if action.is_button() { "button" } else { "key" },
            configured: bindings.is_overridden(action),
        })
        .collect()
}

/// Execute `trellis actions`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(args: &ActionsArgs) -> Result<(), TrellisError> {
    let rows = action_bindings(&config::get_config().bindings);

    if args.json {
        print_highlighted_json(&serde_json::to_value(&rows)?);
        return Ok(());
    }

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    let overridden = rows.iter().filter(|r| r.configured).count();
    println!("{}", format!("{overridden} of {} triggers configured", rows.len()).dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_action_bindings_cover_every_action() {
        let rows = action_bindings(&BindingsConfig::default());
        assert_eq!(rows.len(), Action::ALL.len());
        assert!(rows.iter().all(|r| !r.configured));
        assert_eq!(rows.iter().filter(|r| r.input == "button").count(), 2);
    }

    #[test]
    fn test_action_bindings_use_overrides() {
        let bindings = BindingsConfig(BTreeMap::from([(Action::ToggleTile, "<alt> KEY_T".to_string())]));
        let rows = action_bindings(&bindings);
        let row = rows.iter().find(|r| r.action == Action::ToggleTile).unwrap();
        assert_eq!(row.trigger, "<alt> KEY_T");
        assert!(row.configured);
    }
}
