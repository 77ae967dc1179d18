//! Trellis - a tiling layout tree with directional navigation and
//! interactive move/resize.
//!
//! The library holds the layout model (`tiling`), its configuration and the
//! CLI that replays host event scripts against it.

pub mod cli;
pub mod config;
pub mod error;
pub mod schema;
pub mod tiling;
