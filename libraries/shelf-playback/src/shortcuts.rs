//! Global keyboard shortcuts

use crate::action::Action;
use crate::types::PlayerState;

/// Bound key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Space
    TogglePlay,
    /// Right arrow
    Next,
    /// Left arrow
    Previous,
    /// `m`
    ToggleMute,
    /// `s`
    CycleMode,
}

impl Shortcut {
    /// Look up a key by its DOM-style name (`" "`, `"ArrowRight"`, `"m"`, ...)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Space" | "space" => Some(Self::TogglePlay),
            "ArrowRight" | "right" => Some(Self::Next),
            "ArrowLeft" | "left" => Some(Self::Previous),
            "m" | "M" => Some(Self::ToggleMute),
            "s" | "S" => Some(Self::CycleMode),
            _ => None,
        }
    }

    /// Action for this shortcut given the current state
    pub fn action(self, state: &PlayerState) -> Action {
        match self {
            Self::TogglePlay => Action::TogglePlay,
            Self::Next => Action::NextSong,
            Self::Previous => Action::PrevSong,
            Self::ToggleMute => Action::ToggleMute,
            Self::CycleMode => Action::SetMode(state.mode().cycle_next()),
        }
    }
}
