//! Window Information
use super::{
    Quirks, ScreenIndex, SizeHints, Strut, WindowHandle, WindowId, WindowState, WindowType,
    WorkspaceIndex, Xyhw,
};
use crate::layouts::FloatGeometry;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per window state flags, mirrored to `_NET_WM_STATE` where one exists.
    #[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct WindowFlags: u16 {
        const FULLSCREEN = 1;
        const MAXIMIZED_VERT = 1 << 1;
        const MAXIMIZED_HORZ = 1 << 2;
        const ABOVE = 1 << 3;
        const BELOW = 1 << 4;
        /// Iconified.
        const HIDDEN = 1 << 5;
        const DEMANDS_ATTENTION = 1 << 6;
        /// Position chosen by the user (or the client), never auto centered.
        const MANUAL = 1 << 7;
        /// Floated by the user.
        const FLOATING = 1 << 8;
        /// Pushed into the below layer by the unfocus policy, until it gets focus again.
        const LOWERED = 1 << 9;

        const MAXIMIZED = Self::MAXIMIZED_VERT.bits() | Self::MAXIMIZED_HORZ.bits();
    }
}

impl WindowFlags {
    /// The flag a `_NET_WM_STATE` atom maps to, if the window manager tracks it.
    #[must_use]
    pub const fn from_state(state: WindowState) -> Option<Self> {
        Some(match state {
            WindowState::Fullscreen => Self::FULLSCREEN,
            WindowState::MaximizedVert => Self::MAXIMIZED_VERT,
            WindowState::MaximizedHorz => Self::MAXIMIZED_HORZ,
            WindowState::Maximized => Self::MAXIMIZED,
            WindowState::Above => Self::ABOVE,
            WindowState::Below => Self::BELOW,
            WindowState::Hidden => Self::HIDDEN,
            WindowState::DemandsAttention => Self::DEMANDS_ATTENTION,
            WindowState::Modal
            | WindowState::Sticky
            | WindowState::Shaded
            | WindowState::SkipTaskbar
            | WindowState::SkipPager => return None,
        })
    }

    /// The `_NET_WM_STATE` list describing these flags.
    #[must_use]
    pub fn as_states(self) -> Vec<WindowState> {
        let mut states = vec![];
        let pairs = [
            (Self::FULLSCREEN, WindowState::Fullscreen),
            (Self::MAXIMIZED_VERT, WindowState::MaximizedVert),
            (Self::MAXIMIZED_HORZ, WindowState::MaximizedHorz),
            (Self::ABOVE, WindowState::Above),
            (Self::BELOW.union(Self::LOWERED), WindowState::Below),
            (Self::HIDDEN, WindowState::Hidden),
            (Self::DEMANDS_ATTENTION, WindowState::DemandsAttention),
        ];
        for (flag, state) in pairs {
            if self.intersects(flag) {
                states.push(state);
            }
        }
        states
    }
}

/// Everything the display server reports about a window it wants managed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub name: Option<String>,
    pub class: Option<String>,
    pub instance: Option<String>,
    pub r#type: WindowType,
    pub pid: Option<u32>,
    pub geometry: Xyhw,
    pub border: i32,
    pub hints: SizeHints,
    pub transient_for: Option<WindowHandle>,
    /// Supports `WM_TAKE_FOCUS`.
    pub takes_focus: bool,
    /// Supports `WM_DELETE_WINDOW`.
    pub can_delete: bool,
    /// The `WM_HINTS` input field.
    pub accepts_input: bool,
    pub urgent: bool,
    pub states: Vec<WindowState>,
    pub strut: Option<Strut>,
    /// Workspace remembered in the window's private property, e.g. across a restart.
    pub stored_workspace: Option<WorkspaceIndex>,
}

impl Default for WindowInfo {
    fn default() -> Self {
        Self {
            handle: WindowHandle::default(),
            name: None,
            class: None,
            instance: None,
            r#type: WindowType::Normal,
            pid: None,
            geometry: Xyhw::new(0, 0, 100, 100),
            border: 1,
            hints: SizeHints::default(),
            transient_for: None,
            takes_focus: false,
            can_delete: true,
            accepts_input: true,
            urgent: false,
            states: vec![],
            strut: None,
            stored_workspace: None,
        }
    }
}

/// A managed window.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Window {
    pub id: WindowId,
    pub handle: WindowHandle,
    pub name: Option<String>,
    pub class: Option<String>,
    pub instance: Option<String>,
    pub r#type: WindowType,
    pub pid: Option<u32>,
    /// Current outer geometry (border included).
    pub g: Xyhw,
    /// Geometry last requested by the client.
    pub requested: Xyhw,
    pub border: i32,
    pub hints: SizeHints,
    pub takes_focus: bool,
    pub can_delete: bool,
    pub accepts_input: bool,
    pub flags: WindowFlags,
    pub quirks: Quirks,
    /// Direct `WM_TRANSIENT_FOR` target, if it is managed.
    pub parent: Option<WindowId>,
    /// Unresolved `WM_TRANSIENT_FOR`, kept so the parent can be linked once it is managed.
    pub transient_for: Option<WindowHandle>,
    /// Root of the transient chain. Equal to `id` for windows without a parent.
    pub main: WindowId,
    /// The transient descendant that last had focus; focus meant for this window goes there.
    pub focus_redirect: Option<WindowId>,
    pub workspace: Option<WorkspaceIndex>,
    screen: ScreenIndex,
    pub float_geom: Option<FloatGeometry>,
    pub strut: Option<Strut>,
    pub mapped: bool,
}

impl Window {
    #[must_use]
    pub fn new(id: WindowId, info: WindowInfo, screen: ScreenIndex) -> Self {
        let mut flags = WindowFlags::empty();
        for state in &info.states {
            if let Some(flag) = WindowFlags::from_state(*state) {
                flags |= flag;
            }
        }
        if info.urgent {
            flags |= WindowFlags::DEMANDS_ATTENTION;
        }
        Self {
            id,
            handle: info.handle,
            name: info.name,
            class: info.class,
            instance: info.instance,
            r#type: info.r#type,
            pid: info.pid,
            g: info.geometry,
            requested: info.geometry,
            border: info.border,
            hints: info.hints,
            takes_focus: info.takes_focus,
            can_delete: info.can_delete,
            accepts_input: info.accepts_input,
            flags,
            quirks: Quirks::empty(),
            parent: None,
            transient_for: info.transient_for,
            main: id,
            focus_redirect: None,
            workspace: None,
            screen,
            float_geom: None,
            strut: info.strut,
            mapped: false,
        }
    }

    /// The screen never changes once a window is managed.
    #[must_use]
    pub const fn screen(&self) -> ScreenIndex {
        self.screen
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.parent.is_some() || self.transient_for.is_some()
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.flags.contains(WindowFlags::FULLSCREEN)
    }

    /// Maximized in either direction.
    #[must_use]
    pub fn is_maximized(&self) -> bool {
        self.flags.intersects(WindowFlags::MAXIMIZED)
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(WindowFlags::HIDDEN)
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        self.flags.contains(WindowFlags::FLOATING) || self.always_floats()
    }

    /// Floats whatever the user asks: transients, `FLOAT` quirked and dialog-like windows.
    #[must_use]
    pub fn always_floats(&self) -> bool {
        self.quirks.contains(Quirks::FLOAT)
            || self.is_transient()
            || matches!(
                self.r#type,
                WindowType::Dialog | WindowType::Splash | WindowType::Utility | WindowType::Menu
            )
    }

    /// Takes part in the tiling pass.
    #[must_use]
    pub fn is_tiled(&self) -> bool {
        !self.is_floating()
            && !self.is_hidden()
            && !self.is_fullscreen()
            && !self.is_maximized()
            && !self.r#type.is_screen_sticky()
    }

    #[must_use]
    pub fn can_focus(&self) -> bool {
        !self.is_hidden()
            && self.r#type != WindowType::Dock
            && self.r#type != WindowType::Desktop
            && (self.accepts_input || self.takes_focus)
    }

    /// Can be reached by cycling focus.
    #[must_use]
    pub fn in_focus_cycle(&self) -> bool {
        self.can_focus() && !self.quirks.contains(Quirks::NOFOCUSCYCLE)
    }

    /// Border width to draw right now.
    #[must_use]
    pub fn effective_border(&self) -> i32 {
        if self.is_fullscreen()
            || (self.is_floating() && self.quirks.contains(Quirks::MINIMALBORDER))
        {
            0
        } else {
            self.border
        }
    }

    /// Client size of the current geometry.
    #[must_use]
    pub fn inner_size(&self) -> (i32, i32) {
        let border = self.effective_border();
        (
            (self.g.w() - 2 * border).max(1),
            (self.g.h() - 2 * border).max(1),
        )
    }

    #[must_use]
    pub fn class_or_empty(&self) -> &str {
        self.class.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn window(info: WindowInfo) -> Window {
        let mut map: SlotMap<WindowId, ()> = SlotMap::with_key();
        Window::new(map.insert(()), info, 0)
    }

    #[test]
    fn initial_states_become_flags() {
        let w = window(WindowInfo {
            states: vec![WindowState::Fullscreen, WindowState::Sticky],
            urgent: true,
            ..WindowInfo::default()
        });
        assert!(w.is_fullscreen());
        assert!(w.flags.contains(WindowFlags::DEMANDS_ATTENTION));
        assert_eq!(
            w.flags.as_states(),
            vec![WindowState::Fullscreen, WindowState::DemandsAttention]
        );
    }

    #[test]
    fn dialogs_float_and_normal_windows_tile() {
        let dialog = window(WindowInfo {
            r#type: WindowType::Dialog,
            ..WindowInfo::default()
        });
        let normal = window(WindowInfo::default());
        assert!(dialog.is_floating());
        assert!(!dialog.is_tiled());
        assert!(normal.is_tiled());
    }

    #[test]
    fn main_of_new_window_is_itself() {
        let w = window(WindowInfo::default());
        assert_eq!(w.main, w.id);
    }

    #[test]
    fn fullscreen_windows_have_no_border() {
        let mut w = window(WindowInfo {
            border: 2,
            geometry: Xyhw::new(0, 0, 100, 100),
            ..WindowInfo::default()
        });
        assert_eq!(w.inner_size(), (96, 96));
        w.flags |= WindowFlags::FULLSCREEN;
        assert_eq!(w.effective_border(), 0);
    }
}
