use serde::{Deserialize, Serialize};

/*  TOML has no good way to spell an enum with a payload inline, so a binding names one of these
 *  and carries its argument in a separate `value` string. `Keybind::to_core` turns the pair
 *  into a `lattice_core::Command`.
 */

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseCommand {
    FocusNext,
    FocusPrev,
    FocusMain,
    FocusUrgent,
    SwapMain,
    SwapNext,
    SwapPrev,
    /// value: workspace number, starting at 1
    SwitchWorkspace,
    /// value: workspace number, starting at 1
    MoveToWorkspace,
    WorkspaceNext,
    WorkspacePrev,
    WorkspacePrior,
    FocusRegionNext,
    FocusRegionPrev,
    CycleLayout,
    /// value: `vertical`, `horizontal`, `max` or `floating`
    SetLayout,
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
    Move,
    Resize,
    /// value: `up`, `down`, `left` or `right`
    MoveStep,
    /// value: `up`, `down`, `left` or `right`
    ResizeStep,
    SearchWindow,
    CloseWindow,
    KillWindow,
    /// value: the shell command line
    Execute,
    BarToggle,
    DumpState,
    Restart,
    Quit,
}
