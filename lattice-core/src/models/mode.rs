use super::{ScreenIndex, WindowFlags, WindowId, Xyhw};
use crate::utils::modmask_lookup::Button;
use bitflags::bitflags;

bitflags! {
    /// Edges that follow the pointer while resizing.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct ResizeEdges: u8 {
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

impl ResizeEdges {
    /// Picks the edges nearest to the pointer: the quadrant of `g` the point falls in.
    #[must_use]
    pub fn from_quadrant(g: &Xyhw, x: i32, y: i32) -> Self {
        let (cx, cy) = g.center();
        let mut edges = Self::empty();
        edges |= if x < cx { Self::LEFT } else { Self::RIGHT };
        edges |= if y < cy { Self::TOP } else { Self::BOTTOM };
        edges
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManipulationKind {
    Move,
    Resize(ResizeEdges),
}

/// What ends the manipulation when released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Button(Button),
    Key(String),
    /// Started by a `_NET_WM_MOVERESIZE` request; any button release ends it.
    Client,
}

/// An interactive move or resize in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manipulation {
    pub window: WindowId,
    pub kind: ManipulationKind,
    pub trigger: Trigger,
    /// Pointer position when the manipulation started.
    pub origin: (i32, i32),
    /// Window geometry when the manipulation started.
    pub start: Xyhw,
    /// Window flags when the manipulation started, restored on cancel.
    pub start_flags: WindowFlags,
    /// Timestamp of the last motion that was applied.
    pub last_update: u64,
}

/// The window search prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub screen: ScreenIndex,
    /// Label shown on each candidate window.
    pub labels: Vec<(String, WindowId)>,
    pub typed: String,
}

/// The modal state of the dispatcher.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Waiting for the display server to grab the pointer and keyboard.
    Grabbing(Manipulation),
    /// Motion events update the target window.
    Tracking(Manipulation),
    Searching(SearchState),
}

impl Mode {
    #[must_use]
    pub const fn manipulation(&self) -> Option<&Manipulation> {
        match self {
            Self::Grabbing(m) | Self::Tracking(m) => Some(m),
            Self::Normal | Self::Searching(_) => None,
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<WindowId> {
        self.manipulation().map(|m| m.window)
    }

    #[must_use]
    pub fn is_normal(&self) -> bool {
        *self == Self::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_picks_nearest_edges() {
        let g = Xyhw::new(0, 0, 100, 100);
        assert_eq!(
            ResizeEdges::from_quadrant(&g, 10, 90),
            ResizeEdges::LEFT | ResizeEdges::BOTTOM
        );
        assert_eq!(
            ResizeEdges::from_quadrant(&g, 80, 5),
            ResizeEdges::RIGHT | ResizeEdges::TOP
        );
    }
}
