//! CLI output formatting utilities.
//!
//! - JSON syntax highlighting
//! - Indented layout trees
//! - Small cell formatters for tables

use std::fmt::Write as _;

use colored::Colorize;

use crate::tiling::snapshot::{GridSnapshot, NodeSnapshot, WorkspaceSnapshot};

/// Prints JSON with syntax highlighting.
///
/// Keys are cyan, strings green, numbers yellow and literals magenta.
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json));
}

/// Colors a pretty-printed JSON document.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut token = String::new();
    let mut in_string = false;
    let mut escape_next = false;
    let mut is_key = false;
    let mut after_colon = false;

    for ch in json.chars() {
        if in_string {
            token.push(ch);
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                let colored = if is_key { token.cyan() } else { token.green() };
                let _ = write!(out, "{colored}");
                token.clear();
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                flush_scalar(&mut out, &mut token, after_colon);
                token.push(ch);
                in_string = true;
                is_key = !after_colon;
                after_colon = false;
            }
            ':' => {
                flush_scalar(&mut out, &mut token, false);
                out.push(':');
                after_colon = true;
            }
            ',' | '{' | '}' | '[' | ']' => {
                flush_scalar(&mut out, &mut token, after_colon);
                out.push(ch);
                after_colon = false;
            }
            _ => token.push(ch),
        }
    }
    flush_scalar(&mut out, &mut token, after_colon);
    out
}

/// Writes a pending number or literal token, colored if it is a value.
fn flush_scalar(out: &mut String, token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }
    let value = token.trim();
    if !is_value || value.is_empty() {
        out.push_str(token);
    } else {
        let start = token.len() - token.trim_start().len();
        let end = start + value.len();
        let colored = if matches!(value, "true" | "false" | "null") {
            value.magenta()
        } else if value.parse::<f64>().is_ok() {
            value.yellow()
        } else {
            value.normal()
        };
        let _ = write!(out, "{}{colored}{}", &token[..start], &token[end..]);
    }
    token.clear();
}

// ============================================================================
// Layout Trees
// ============================================================================

/// Renders every workspace of a grid as an indented tree.
///
/// Empty workspaces are skipped unless `include_empty` is set; the current
/// workspace is always shown.
#[must_use]
pub fn render_grid(grid: &GridSnapshot, include_empty: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({}x{})",
        "output".bold(),
        grid.output,
        grid.dims.width,
        grid.dims.height
    );
    for ws in &grid.workspaces {
        let current = ws.id == grid.current;
        if current || include_empty || !ws.is_empty() {
            render_workspace(&mut out, ws, current);
        }
    }
    out
}

fn render_workspace(out: &mut String, ws: &WorkspaceSnapshot, current: bool) {
    let mut header = format!("workspace ({}, {}) {}", ws.id.x, ws.id.y, ws.workarea);
    if current {
        header.push_str(" [current]");
    }
    let _ = writeln!(out, "{}", header.bold());

    let mut roots: Vec<&NodeSnapshot> = ws.tiled.iter().collect();
    roots.extend(&ws.floating);
    let count = roots.len();
    for (i, node) in roots.into_iter().enumerate() {
        render_node(out, node, "", i + 1 == count);
    }
}

fn render_node(out: &mut String, node: &NodeSnapshot, prefix: &str, last: bool) {
    let branch = if last { "└─ " } else { "├─ " };
    let label = match node {
        NodeSnapshot::View { active: true, .. } => node.label().yellow().bold(),
        NodeSnapshot::View { .. } => node.label().green(),
        NodeSnapshot::Split { .. } => node.label().cyan(),
    };
    let _ = writeln!(out, "{prefix}{branch}{label}");

    let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        render_node(out, child, &child_prefix, i + 1 == children.len());
    }
}

// ============================================================================
// Cells
// ============================================================================

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// Counts characters, not bytes, so multi-byte text is never split.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let cut = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
        format!("{}…", &s[..cut])
    }
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
