use super::{default_terminal, BaseCommand, Config, Keybind, QuirkConfig};
use lattice_core::layouts::{Layout, LayoutTuning};
use lattice_core::models::{BarPosition, FocusClosePolicy, FocusMode, UnfocusPolicy};

const WORKSPACES_NUM: usize = 10;

impl Default for Config {
    fn default() -> Self {
        Self {
            modkey: "Mod4".to_owned(),
            mousekey: Some("modkey".into()),
            workspace_limit: WORKSPACES_NUM,
            workspace_names: vec![],
            layout: Layout::Vertical,
            border_width: 1,
            focused_border_color: "#ff0000".to_owned(),
            default_border_color: "#888888".to_owned(),
            urgent_border_color: "#ffff00".to_owned(),
            region_padding: 0,
            bar_enabled: true,
            bar_height: 16,
            bar_position: BarPosition::Top,
            bar_font: "fixed".to_owned(),
            bar_color: "#000000".to_owned(),
            bar_font_color: "#a0a0a0".to_owned(),
            bar_delay: 1000,
            focus_mode: FocusMode::Default,
            focus_close: FocusClosePolicy::Previous,
            focus_close_wrap: true,
            focus_default_last: false,
            unfocus_policy: UnfocusPolicy::None,
            focus_history_len: 16,
            max_updates_per_sec: 60,
            boundary_width: 50,
            dialog_ratio: 0.6,
            step_size: 10,
            cycle_skip_empty: false,
            cancel_key: "Escape".to_owned(),
            log_level: "info".to_owned(),
            tuning: LayoutTuning::default(),
            quirk: default_quirks(),
            keybind: default_keybinds(),
            quirk_rules: vec![],
            keybinds: vec![],
            mousemask: lattice_core::ModMask::empty(),
            exceptions: vec![],
        }
    }
}

fn default_quirks() -> Vec<QuirkConfig> {
    vec![
        QuirkConfig::new("MPlayer", "xv", &["FLOAT", "FULLSCREEN", "FOCUSPREV"]),
        QuirkConfig::new("OpenOffice.org 3.2", "VCLSalFrame", &["FLOAT"]),
        QuirkConfig::new("Firefox-bin", "firefox-bin", &["TRANSSZ"]),
        QuirkConfig::new("Firefox", "Dialog", &["FLOAT"]),
        QuirkConfig::new("Gimp", "gimp", &["FLOAT", "ANYWHERE"]),
        QuirkConfig::new("xine", "Xine Window", &["FLOAT", "ANYWHERE"]),
        QuirkConfig::new("pcb", "pcb", &["FLOAT"]),
    ]
}

// One binding per line reads better than a table builder would.
#[allow(clippy::too_many_lines)]
fn default_keybinds() -> Vec<Keybind> {
    let m = &["modkey"][..];
    let ms = &["modkey", "Shift"][..];
    let mut keybinds = vec![
        Keybind::new(ms, "Return", BaseCommand::Execute, default_terminal()),
        Keybind::new(m, "p", BaseCommand::Execute, "dmenu_run"),
        Keybind::new(m, "j", BaseCommand::FocusNext, ""),
        Keybind::new(m, "Tab", BaseCommand::FocusNext, ""),
        Keybind::new(m, "k", BaseCommand::FocusPrev, ""),
        Keybind::new(ms, "Tab", BaseCommand::FocusPrev, ""),
        Keybind::new(m, "m", BaseCommand::FocusMain, ""),
        Keybind::new(m, "u", BaseCommand::FocusUrgent, ""),
        Keybind::new(m, "Return", BaseCommand::SwapMain, ""),
        Keybind::new(ms, "j", BaseCommand::SwapNext, ""),
        Keybind::new(ms, "k", BaseCommand::SwapPrev, ""),
        Keybind::new(m, "Right", BaseCommand::WorkspaceNext, ""),
        Keybind::new(m, "Left", BaseCommand::WorkspacePrev, ""),
        Keybind::new(m, "a", BaseCommand::WorkspacePrior, ""),
        Keybind::new(ms, "Right", BaseCommand::FocusRegionNext, ""),
        Keybind::new(ms, "Left", BaseCommand::FocusRegionPrev, ""),
        Keybind::new(m, "space", BaseCommand::CycleLayout, ""),
        Keybind::new(ms, "space", BaseCommand::ResetLayout, ""),
        Keybind::new(ms, "backslash", BaseCommand::FlipLayout, ""),
        Keybind::new(m, "h", BaseCommand::MasterShrink, ""),
        Keybind::new(m, "l", BaseCommand::MasterGrow, ""),
        Keybind::new(m, "comma", BaseCommand::MasterAdd, ""),
        Keybind::new(m, "period", BaseCommand::MasterDel, ""),
        Keybind::new(ms, "comma", BaseCommand::StackInc, ""),
        Keybind::new(ms, "period", BaseCommand::StackDec, ""),
        Keybind::new(m, "t", BaseCommand::ToggleFloat, ""),
        Keybind::new(m, "e", BaseCommand::ToggleMaximize, ""),
        Keybind::new(ms, "e", BaseCommand::ToggleFullscreen, ""),
        Keybind::new(m, "w", BaseCommand::Iconify, ""),
        Keybind::new(ms, "w", BaseCommand::Uniconify, ""),
        Keybind::new(m, "r", BaseCommand::RaiseToggle, ""),
        Keybind::new(m, "bracketleft", BaseCommand::MoveStep, "left"),
        Keybind::new(m, "bracketright", BaseCommand::MoveStep, "right"),
        Keybind::new(ms, "bracketleft", BaseCommand::MoveStep, "up"),
        Keybind::new(ms, "bracketright", BaseCommand::MoveStep, "down"),
        Keybind::new(m, "minus", BaseCommand::ResizeStep, "left"),
        Keybind::new(m, "equal", BaseCommand::ResizeStep, "right"),
        Keybind::new(ms, "minus", BaseCommand::ResizeStep, "up"),
        Keybind::new(ms, "equal", BaseCommand::ResizeStep, "down"),
        Keybind::new(m, "f", BaseCommand::SearchWindow, ""),
        Keybind::new(ms, "c", BaseCommand::CloseWindow, ""),
        Keybind::new(ms, "x", BaseCommand::KillWindow, ""),
        Keybind::new(m, "b", BaseCommand::BarToggle, ""),
        Keybind::new(ms, "d", BaseCommand::DumpState, ""),
        Keybind::new(m, "q", BaseCommand::Restart, ""),
        Keybind::new(ms, "q", BaseCommand::Quit, ""),
    ];

    // Mod + 1..0 => switch to workspace, Mod + Shift + 1..0 => move the focused window there
    for number in 1..=WORKSPACES_NUM {
        let key = (number % 10).to_string();
        let value = number.to_string();
        keybinds.push(Keybind::new(m, &key, BaseCommand::SwitchWorkspace, &value));
        keybinds.push(Keybind::new(ms, &key, BaseCommand::MoveToWorkspace, &value));
    }
    keybinds
}
