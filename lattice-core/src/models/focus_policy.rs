use serde::{Deserialize, Serialize};

/// How the pointer moves focus around.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    /// Focus follows the pointer when it enters a window.
    #[default]
    Default,
    /// Like `Default`, and switching workspace focuses the window under the pointer.
    Follow,
    /// Only clicks move focus.
    Manual,
}

impl FocusMode {
    #[must_use]
    pub const fn follows_pointer(self) -> bool {
        matches!(self, Self::Default | Self::Follow)
    }
}

/// Which window takes over focus when the focused one goes away.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FocusClosePolicy {
    First,
    Last,
    #[default]
    Next,
    Previous,
    /// The most recently focused window that is not related to the one removed.
    Prior,
}

/// What happens to maximized and fullscreen windows when an unrelated window gets focus.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnfocusPolicy {
    #[default]
    None,
    /// Drop back to the normal (tiled or floating) state.
    Restore,
    Iconify,
    /// Drop the maximized/fullscreen state and float.
    Float,
    /// Push to the bottom of its layer.
    Lower,
    /// Push to the bottom of its layer without marking the workspace for a restack.
    QuickLower,
}
