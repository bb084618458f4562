use crate::models::{
    RegionId, ResizeEdges, Rotation, ScreenIndex, WindowChange, WindowHandle, WindowInfo,
    WindowState, WorkspaceIndex, Xyhw, XyhwChange,
};
use crate::utils::modmask_lookup::{Button, ModMask};
use crate::Command;

/// The `action` field of `_NET_WM_STATE` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Remove,
    Add,
    Toggle,
}

impl StateAction {
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Remove),
            1 => Some(Self::Add),
            2 => Some(Self::Toggle),
            _ => None,
        }
    }

    /// The new value of a flag that is currently `current`.
    #[must_use]
    pub const fn apply(self, current: bool) -> bool {
        match self {
            Self::Remove => false,
            Self::Add => true,
            Self::Toggle => !current,
        }
    }
}

/// The `direction` field of `_NET_WM_MOVERESIZE` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResizeDirection {
    SizeTopLeft,
    SizeTop,
    SizeTopRight,
    SizeRight,
    SizeBottomRight,
    SizeBottom,
    SizeBottomLeft,
    SizeLeft,
    Move,
    SizeKeyboard,
    MoveKeyboard,
    Cancel,
}

impl MoveResizeDirection {
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        Some(match raw {
            0 => Self::SizeTopLeft,
            1 => Self::SizeTop,
            2 => Self::SizeTopRight,
            3 => Self::SizeRight,
            4 => Self::SizeBottomRight,
            5 => Self::SizeBottom,
            6 => Self::SizeBottomLeft,
            7 => Self::SizeLeft,
            8 => Self::Move,
            9 => Self::SizeKeyboard,
            10 => Self::MoveKeyboard,
            11 => Self::Cancel,
            _ => return None,
        })
    }

    /// Edges that follow the pointer, `None` for moves, keyboard sizing and cancel.
    #[must_use]
    pub fn edges(self) -> Option<ResizeEdges> {
        Some(match self {
            Self::SizeTopLeft => ResizeEdges::TOP | ResizeEdges::LEFT,
            Self::SizeTop => ResizeEdges::TOP,
            Self::SizeTopRight => ResizeEdges::TOP | ResizeEdges::RIGHT,
            Self::SizeRight => ResizeEdges::RIGHT,
            Self::SizeBottomRight => ResizeEdges::BOTTOM | ResizeEdges::RIGHT,
            Self::SizeBottom => ResizeEdges::BOTTOM,
            Self::SizeBottomLeft => ResizeEdges::BOTTOM | ResizeEdges::LEFT,
            Self::SizeLeft => ResizeEdges::LEFT,
            Self::Move | Self::SizeKeyboard | Self::MoveKeyboard | Self::Cancel => return None,
        })
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone)]
pub enum DisplayEvent {
    /// A root window was found.
    ScreenCreate(WindowHandle, Xyhw),
    /// The physical outputs of a screen changed.
    OutputsChanged(ScreenIndex, Vec<(Xyhw, Rotation)>),
    RegionWindowsCreated {
        region: RegionId,
        sink: WindowHandle,
        bar: Option<WindowHandle>,
    },
    /// A window asks to be managed; the pointer was at (x, y).
    WindowCreate(WindowInfo, i32, i32),
    WindowDestroy(WindowHandle),
    WindowChange(WindowChange),
    ConfigureRequest(WindowHandle, XyhwChange),
    StateRequest(WindowHandle, WindowState, StateAction),
    /// `_NET_ACTIVE_WINDOW` from a client.
    ActivateRequest(WindowHandle),
    /// `_NET_CLOSE_WINDOW` from a client.
    CloseRequest(WindowHandle),
    MoveResizeRequest(WindowHandle, MoveResizeDirection),
    /// `_NET_CURRENT_DESKTOP` from a client.
    DesktopRequest(WorkspaceIndex),
    /// `_NET_WM_DESKTOP` from a client.
    WindowDesktopRequest(WindowHandle, WorkspaceIndex),
    KeyPress(ModMask, String, u64),
    KeyRelease(String, u64),
    MouseCombo(ModMask, Button, WindowHandle, i32, i32),
    ButtonRelease(Button, i32, i32, u64),
    Motion(i32, i32, u64),
    EnterWindow(WindowHandle, i32, i32),
    GrabAcquired(WindowHandle),
    GrabFailed(WindowHandle),
    SendCommand(Command),
}

impl DisplayEvent {
    #[must_use]
    pub const fn is_button(&self) -> bool {
        matches!(self, Self::MouseCombo(..) | Self::ButtonRelease(..))
    }
}
