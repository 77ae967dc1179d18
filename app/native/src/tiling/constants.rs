//! Internal constants for layout tuning.
//!
//! # Organization
//!
//! Constants are grouped by functionality:
//! - `size` - Size floors applied by resizing and layout
//! - `grab` - Interactive move/resize gesture parameters
//! - `floating` - Keyboard-driven floating window movement

/// Size floors.
pub mod size {
    /// Minimum width or height any node can be resized to (pixels).
    ///
    /// Resize requests below this are clamped, never rejected.
    pub const MIN_VIEW_SIZE: i32 = 20;
}

/// Interactive grab parameters.
pub mod grab {
    /// Fraction of a node's width/height, measured inward from each edge,
    /// inside which a resize grab picks that edge as moving.
    pub const RESIZE_MARGIN: f32 = 0.35;

    /// Touch point id that drives grabs; other fingers are ignored.
    pub const PRIMARY_TOUCH_ID: i32 = 1;
}

/// Floating window movement.
pub mod floating {
    /// Distance a floating node travels per `move-*` action (pixels).
    pub const DEFAULT_MOVE_STEP: i32 = 5;
}
