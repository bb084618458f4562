use crate::layouts::Layout;
use crate::models::WorkspaceIndex;
use serde::{Deserialize, Serialize};

/// Direction of a keyboard move or resize step.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub enum Command {
    FocusNext,
    FocusPrev,
    FocusMain,
    FocusUrgent,
    SwapMain,
    SwapNext,
    SwapPrev,
    SwitchWorkspace(WorkspaceIndex),
    MoveToWorkspace(WorkspaceIndex),
    WorkspaceNext,
    WorkspacePrev,
    /// Back to the workspace the focused region showed before.
    WorkspacePrior,
    FocusRegionNext,
    FocusRegionPrev,
    CycleLayout,
    SetLayout(Layout),
    RestoreLayout,
    MasterGrow,
    MasterShrink,
    MasterAdd,
    MasterDel,
    StackInc,
    StackDec,
    FlipLayout,
    ResetLayout,
    ToggleFloat,
    ToggleMaximize,
    ToggleFullscreen,
    Iconify,
    Uniconify,
    RaiseToggle,
    /// Move the focused window with the pointer while the key is held.
    Move,
    /// Resize the focused window with the pointer while the key is held.
    Resize,
    MoveStep(Direction),
    ResizeStep(Direction),
    SearchWindow,
    /// Ask the focused window to close.
    CloseWindow,
    /// Disconnect the focused window's client.
    KillWindow,
    Execute(String),
    BarToggle,
    DumpState,
    Restart,
    Quit,
}
