//! Bindable actions.
//!
//! Every action has a stable kebab-case name used in the configuration file
//! and in replay scripts, plus a default trigger. Keyboard actions operate on
//! the active node of a workspace through `Action::apply`; the two button
//! actions start a grab and are handled by the manager.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::TilingError;
use super::node::{Direction, Node, NodeId, ParentRef, SplitType};
use super::workspace::Workspace;

/// A user command that can be bound to a key or button.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ToggleSplitDirection,
    SetWantVsplit,
    SetWantHsplit,
    FocusLeft,
    FocusRight,
    FocusUp,
    FocusDown,
    ToggleFocusTile,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    ToggleTile,
    MoveActivate,
    ResizeActivate,
}

impl Action {
    /// Every action, in documentation order.
    pub const ALL: [Self; 15] = [
        Self::ToggleSplitDirection,
        Self::SetWantVsplit,
        Self::SetWantHsplit,
        Self::FocusLeft,
        Self::FocusRight,
        Self::FocusUp,
        Self::FocusDown,
        Self::ToggleFocusTile,
        Self::MoveLeft,
        Self::MoveRight,
        Self::MoveUp,
        Self::MoveDown,
        Self::ToggleTile,
        Self::MoveActivate,
        Self::ResizeActivate,
    ];

    /// Configuration name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToggleSplitDirection => "toggle-split-direction",
            Self::SetWantVsplit => "set-want-vsplit",
            Self::SetWantHsplit => "set-want-hsplit",
            Self::FocusLeft => "focus-left",
            Self::FocusRight => "focus-right",
            Self::FocusUp => "focus-up",
            Self::FocusDown => "focus-down",
            Self::ToggleFocusTile => "toggle-focus-tile",
            Self::MoveLeft => "move-left",
            Self::MoveRight => "move-right",
            Self::MoveUp => "move-up",
            Self::MoveDown => "move-down",
            Self::ToggleTile => "toggle-tile",
            Self::MoveActivate => "move-activate",
            Self::ResizeActivate => "resize-activate",
        }
    }

    /// Trigger used when the configuration does not bind the action.
    #[must_use]
    pub const fn default_trigger(self) -> &'static str {
        match self {
            Self::ToggleSplitDirection => "<super> KEY_E",
            Self::SetWantVsplit => "<super> KEY_V",
            Self::SetWantHsplit => "<super> KEY_B",
            Self::FocusLeft => "<super> KEY_H",
            Self::FocusRight => "<super> KEY_L",
            Self::FocusUp => "<super> KEY_K",
            Self::FocusDown => "<super> KEY_J",
            Self::ToggleFocusTile => "<super> KEY_SPACE",
            Self::MoveLeft => "<super> <shift> KEY_H",
            Self::MoveRight => "<super> <shift> KEY_L",
            Self::MoveUp => "<super> <shift> KEY_K",
            Self::MoveDown => "<super> <shift> KEY_J",
            Self::ToggleTile => "<super> <shift> KEY_SPACE",
            Self::MoveActivate => "<super> BTN_LEFT",
            Self::ResizeActivate => "<super> BTN_RIGHT",
        }
    }

    /// Whether the action is bound to a pointer button and starts a grab.
    #[must_use]
    pub const fn is_button(self) -> bool { matches!(self, Self::MoveActivate | Self::ResizeActivate) }

    /// Direction of a focus or move action.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::FocusLeft | Self::MoveLeft => Some(Direction::Left),
            Self::FocusRight | Self::MoveRight => Some(Direction::Right),
            Self::FocusUp | Self::MoveUp => Some(Direction::Up),
            Self::FocusDown | Self::MoveDown => Some(Direction::Down),
            _ => None,
        }
    }

    /// Run a keyboard action against the active node of `ws`.
    ///
    /// # Arguments
    ///
    /// * `ws` - Workspace to act on
    /// * `move_step` - Pixels a floating node travels per move action
    ///
    /// # Returns
    ///
    /// `true` if the workspace changed. Button actions always return `false`.
    pub fn apply(self, ws: &mut Workspace, move_step: i32) -> bool {
        match self {
            Self::ToggleSplitDirection => {
                container_of_active(ws).is_some_and(|split| ws.toggle_split_direction(split))
            }
            Self::SetWantVsplit => want_split(ws, SplitType::VSplit),
            Self::SetWantHsplit => want_split(ws, SplitType::HSplit),
            Self::FocusLeft | Self::FocusRight | Self::FocusUp | Self::FocusDown => {
                self.direction().is_some_and(|dir| focus_direction(ws, dir))
            }
            Self::ToggleFocusTile => toggle_focus_tile(ws),
            Self::MoveLeft | Self::MoveRight | Self::MoveUp | Self::MoveDown => {
                self.direction().is_some_and(|dir| move_direction(ws, dir, move_step))
            }
            Self::ToggleTile => ws.active_node().is_some_and(|id| ws.toggle_tile_node(id)),
            Self::MoveActivate | Self::ResizeActivate => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Action {
    type Err = TilingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| TilingError::UnknownAction(s.to_string()))
    }
}

// ============================================================================
// Action Implementations
// ============================================================================

/// The active node if it is a split, otherwise its parent split.
fn container_of_active(ws: &Workspace) -> Option<NodeId> {
    let active = ws.active_node()?;
    if ws.node(active)?.is_split() {
        return Some(active);
    }
    match ws.parent_of(active)? {
        ParentRef::Split(parent) => Some(parent),
        ParentRef::Workspace => None,
    }
}

fn want_split(ws: &mut Workspace, split_type: SplitType) -> bool {
    let Some(active) = ws.active_node() else {
        return false;
    };
    if ws.node(active).is_some_and(Node::is_split) {
        ws.set_split_type(active, split_type)
    } else {
        ws.set_preferred_split(active, split_type)
    }
}

fn focus_direction(ws: &mut Workspace, dir: Direction) -> bool {
    let Some(active) = ws.active_node() else {
        return false;
    };
    let Some(adjacent) = ws.get_adjacent(active, dir) else {
        return false;
    };
    let target = ws.last_active_descendant(adjacent);
    tracing::debug!(workspace = %ws.id(), from = %active, to = %target, direction = %dir, "tiling: focus moved");
    ws.set_active(target)
}

fn move_direction(ws: &mut Workspace, dir: Direction, step: i32) -> bool {
    let Some(active) = ws.active_node() else {
        return false;
    };
    if let Some(floating) = ws.find_floating_parent(active) {
        return ws.move_floating(floating, dir, step);
    }
    let moved = ws.move_child(active, dir);
    if moved {
        ws.set_active(active);
    }
    moved
}

fn toggle_focus_tile(ws: &mut Workspace) -> bool {
    let Some(active) = ws.active_node() else {
        return false;
    };
    let other = if ws.find_floating_parent(active).is_some() {
        ws.active_tiled_node()
    } else {
        ws.active_floating_node()
    };
    let Some(other) = other.filter(|&o| ws.is_attached(o)) else {
        return false;
    };
    let target = ws.last_active_descendant(other);
    ws.set_active(target)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::geometry::Rect;
    use crate::tiling::workspace::tests::{children_of, float, tile, workspace};

    const STEP: i32 = 5;

    // ========================================================================
    // Names
    // ========================================================================

    #[test]
    fn test_names_round_trip_through_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_unknown_name_is_error() {
        assert_eq!(
            "teleport".parse::<Action>(),
            Err(TilingError::UnknownAction("teleport".to_string()))
        );
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        let json = serde_json::to_string(&Action::SetWantVsplit).unwrap();
        assert_eq!(json, "\"set-want-vsplit\"");
    }

    #[test]
    fn test_button_actions() {
        assert!(Action::MoveActivate.is_button());
        assert!(Action::ResizeActivate.is_button());
        assert!(!Action::ToggleTile.is_button());
        assert_eq!(Action::ResizeActivate.default_trigger(), "<super> BTN_RIGHT");
    }

    // ========================================================================
    // Apply
    // ========================================================================

    #[test]
    fn test_focus_moves_to_adjacent_view() {
        let mut ws = workspace();
        ws.set_split_type(ws.tiled_root(), SplitType::HSplit);
        let a = tile(&mut ws, 1);
        let b = tile(&mut ws, 2);

        assert!(Action::FocusLeft.apply(&mut ws, STEP));
        assert_eq!(ws.active_node(), Some(a));
        assert!(!Action::FocusLeft.apply(&mut ws, STEP));
        assert!(Action::FocusRight.apply(&mut ws, STEP));
        assert_eq!(ws.active_node(), Some(b));
    }

    #[test]
    fn test_focus_descends_into_last_active() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        ws.set_preferred_split(a, SplitType::HSplit);
        let b = tile(&mut ws, 2);
        ws.set_active(ws.tiled_root());
        let c = tile(&mut ws, 3);
        assert_eq!(ws.active_node(), Some(c));

        assert!(Action::FocusUp.apply(&mut ws, STEP));
        assert_eq!(ws.active_node(), Some(b));
    }

    #[test]
    fn test_move_swaps_active_view() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        let b = tile(&mut ws, 2);

        assert!(Action::MoveUp.apply(&mut ws, STEP));
        assert_eq!(children_of(&ws, ws.tiled_root()), vec![b, a]);
        assert_eq!(ws.active_node(), Some(b));
    }

    #[test]
    fn test_move_floating_uses_step() {
        let mut ws = workspace();
        let f = float(&mut ws, 1, Rect::new(100, 100, 50, 50));
        ws.set_active(f);

        assert!(Action::MoveDown.apply(&mut ws, STEP));
        assert_eq!(ws.geometry(f), Some(Rect::new(100, 105, 50, 50)));
        assert!(Action::MoveRight.apply(&mut ws, 20));
        assert_eq!(ws.geometry(f), Some(Rect::new(120, 105, 50, 50)));
    }

    #[test]
    fn test_toggle_split_direction_on_parent() {
        let mut ws = workspace();
        let _a = tile(&mut ws, 1);
        assert!(Action::ToggleSplitDirection.apply(&mut ws, STEP));
        assert_eq!(ws.split(ws.tiled_root()).unwrap().split_type, SplitType::HSplit);
    }

    #[test]
    fn test_set_want_on_view_and_split() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        assert!(Action::SetWantHsplit.apply(&mut ws, STEP));
        assert_eq!(ws.node(a).unwrap().as_view().unwrap().preferred_split, Some(SplitType::HSplit));

        ws.set_active(ws.tiled_root());
        assert!(Action::SetWantHsplit.apply(&mut ws, STEP));
        assert_eq!(ws.split(ws.tiled_root()).unwrap().split_type, SplitType::HSplit);
    }

    #[test]
    fn test_toggle_tile_and_focus_tile() {
        let mut ws = workspace();
        let a = tile(&mut ws, 1);
        let b = tile(&mut ws, 2);

        assert!(Action::ToggleTile.apply(&mut ws, STEP));
        assert!(ws.is_floating(b));
        assert_eq!(ws.active_node(), Some(b));

        assert!(Action::ToggleFocusTile.apply(&mut ws, STEP));
        assert_eq!(ws.active_node(), Some(a));
        assert!(Action::ToggleFocusTile.apply(&mut ws, STEP));
        assert_eq!(ws.active_node(), Some(b));
    }

    #[test]
    fn test_actions_on_empty_workspace_do_nothing() {
        let mut ws = workspace();
        for action in Action::ALL {
            assert!(!action.apply(&mut ws, STEP), "{action} changed an empty workspace");
        }
    }
}
