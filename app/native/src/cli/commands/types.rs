//! Shared types for CLI commands.

use clap::ValueEnum;

/// How a layout tree is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree per workspace.
    #[default]
    Tree,
    /// One row per window.
    Table,
    /// Full snapshot as JSON.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parses_case_insensitively() {
        assert_eq!(OutputFormat::from_str("table", true).unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str("JSON", true).unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("yaml", true).is_err());
    }

    #[test]
    fn test_output_format_default_is_tree() {
        assert_eq!(OutputFormat::default(), OutputFormat::Tree);
    }
}
