use crate::models::dto::BarStatus;
use crate::models::{RegionId, Window, WindowHandle, WindowState, WorkspaceIndex, Xyhw};
use crate::utils::modmask_lookup::Button;
use serde::{Deserialize, Serialize};

/// What an interactive grab is for; decides the cursor shown while it lasts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrabKind {
    Move,
    Resize,
    Search,
}

/// These are responses from the Window manager.
/// The display server should act on these actions.
#[allow(clippy::large_enum_variant)]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum DisplayAction {
    /// A window is now managed: select its events and grab the bindings on it.
    AddedWindow(WindowHandle),

    /// Tell the DS we no longer care about the this window and other cleanup.
    DestroyedWindow(WindowHandle),

    /// Nicely ask a window if it would please close at its convenience.
    /// With `true` the client is disconnected instead.
    KillWindow(WindowHandle, bool),

    /// Give a window the input focus and mark it active.
    WindowTakeFocus {
        window: Window,
        previous: Option<WindowHandle>,
    },

    /// Focus the root window, optionally repainting the border of the window losing focus.
    Unfocus(Option<WindowHandle>),

    /// Ask for an `EnterWindow` event for whatever is under the pointer.
    FocusWindowUnderCursor,

    /// Mirror the window's state flags to `_NET_WM_STATE`.
    SetState(WindowHandle, Vec<WindowState>),

    /// Store the workspace of a window in `_NET_WM_DESKTOP` and the private workspace property.
    SetWindowWorkspace(WindowHandle, Option<WorkspaceIndex>),

    SetCurrentDesktop(WorkspaceIndex),
    SetDesktopNames(Vec<String>),
    SetNumberOfDesktops(usize),
    SetClientList(Vec<WindowHandle>),

    /// The full order of a screen, bottom to top. Each entry goes directly above the previous one.
    RestackChain(Vec<WindowHandle>),

    /// Grab pointer and keyboard for a move, resize or search. The server answers with
    /// `GrabAcquired` or `GrabFailed`.
    BeginGrab(WindowHandle, GrabKind),

    /// Release the grab and throw away queued button events.
    EndGrab,

    ShowSearchLabels(Vec<(WindowHandle, String)>),
    HideSearchLabels,

    /// Create the input sink (and the bar, when given a geometry) of a region.
    /// Answered by `RegionWindowsCreated`.
    CreateRegionWindows {
        region: RegionId,
        g: Xyhw,
        bar: Option<Xyhw>,
    },
    DestroyRegionWindows {
        sink: Option<WindowHandle>,
        bar: Option<WindowHandle>,
    },
    /// Move and resize the region windows after a topology change.
    ConfigureRegionWindows {
        sink: Option<WindowHandle>,
        g: Xyhw,
        bar: Option<(WindowHandle, Xyhw)>,
    },

    UpdateBar(WindowHandle, BarStatus),
    ShowBar(WindowHandle, bool),

    /// Tell a client its geometry without changing it.
    SendConfigureNotify(WindowHandle, Xyhw, i32),

    ReplayClick(WindowHandle, Button),

    /// Move the pointer to a point.
    WarpPointer(i32, i32),
}
