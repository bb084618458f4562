#![allow(clippy::wildcard_imports)]

use super::*;
use crate::display_servers::DisplayServer;
use crate::errors::Result;
use crate::event_loop::ExitReason;
use crate::layouts::{Layout, LayoutTuning};
use crate::models::dto::ManagerState;
use crate::models::{ManipulationKind, ResizeEdges, Trigger, Workspace};
use crate::utils::child_process::exec_shell;
use crate::utils::modmask_lookup::ModMask;
use crate::StateAction;
use std::path::PathBuf;

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Processes a command and invokes the associated function.
    pub fn command_handler(&mut self, command: &Command) -> bool {
        process_internal(self, command, None)
    }

    /// Runs the command bound to a key, if any.
    pub(crate) fn keybind_handler(&mut self, modmask: ModMask, key: &str) -> bool {
        let Some(command) = self.state.config.keybind(&modmask.clean(), key).cloned() else {
            return false;
        };
        tracing::trace!("{modmask:?}+{key} -> {command:?}");
        process_internal(self, &command, Some(key))
    }
}

/// `key` is the key that triggered the command; a keyboard move or resize ends when it is
/// released.
fn process_internal<C: Config, SERVER: DisplayServer>(
    manager: &mut Manager<C, SERVER>,
    command: &Command,
    key: Option<&str>,
) -> bool {
    let state = &mut manager.state;
    match command {
        Command::FocusNext => state.focus_cycle(1),
        Command::FocusPrev => state.focus_cycle(-1),
        Command::FocusMain => state.focus_main(),
        Command::FocusUrgent => state.focus_urgent(),
        Command::SwapMain => state.swap_main(),
        Command::SwapNext => state.swap_neighbour(1),
        Command::SwapPrev => state.swap_neighbour(-1),

        Command::SwitchWorkspace(ws) => state.desktop_request(*ws),
        Command::MoveToWorkspace(ws) => state
            .focused_window()
            .is_some_and(|id| state.move_window_to_workspace(id, *ws)),
        Command::WorkspaceNext => state.cycle_workspace(1),
        Command::WorkspacePrev => state.cycle_workspace(-1),
        Command::WorkspacePrior => state.workspace_prior(),
        Command::FocusRegionNext => state.focus_region_cycle(1),
        Command::FocusRegionPrev => state.focus_region_cycle(-1),

        Command::CycleLayout => with_workspace(state, |ws| {
            let next = ws.layout.next();
            ws.set_layout(next)
        }),
        Command::SetLayout(layout) => with_workspace(state, |ws| ws.set_layout(*layout)),
        Command::RestoreLayout => with_workspace(state, Workspace::restore_layout),
        Command::MasterGrow => tune(state, |t| t.grow_master(1)),
        Command::MasterShrink => tune(state, |t| t.grow_master(-1)),
        Command::MasterAdd => tune(state, |t| t.add_master(1)),
        Command::MasterDel => tune(state, |t| t.add_master(-1)),
        Command::StackInc => tune(state, |t| t.add_stack(1)),
        Command::StackDec => tune(state, |t| t.add_stack(-1)),
        Command::FlipLayout => tune(state, |t| t.flip = !t.flip),
        Command::ResetLayout => {
            let tuning = state.config.default_tuning();
            tune(state, |t| *t = tuning)
        }

        Command::ToggleFloat => toggle_flag(state, WindowFlags::FLOATING),
        Command::ToggleMaximize => toggle_flag(state, WindowFlags::MAXIMIZED),
        Command::ToggleFullscreen => toggle_flag(state, WindowFlags::FULLSCREEN),
        Command::Iconify => state.focused_window().is_some_and(|id| state.iconify(id)),
        Command::Uniconify => state.uniconify_last(),
        Command::RaiseToggle => state
            .focused_window()
            .is_some_and(|id| state.raise_toggle(id)),

        Command::Move => begin_from_command(state, None, key),
        Command::Resize => {
            let Some(g) = state
                .focused_window()
                .and_then(|id| state.windows.get(id))
                .map(|w| w.g)
            else {
                return false;
            };
            let (x, y) = state.pointer;
            begin_from_command(state, Some(ResizeEdges::from_quadrant(&g, x, y)), key)
        }
        Command::MoveStep(direction) => state.step_focused(*direction, false),
        Command::ResizeStep(direction) => state.step_focused(*direction, true),
        Command::SearchWindow => state.begin_search(),

        Command::CloseWindow => state
            .focused_window()
            .is_some_and(|id| state.close_window(id, false)),
        Command::KillWindow => state
            .focused_window()
            .is_some_and(|id| state.close_window(id, true)),

        Command::Execute(shell_command) => execute(manager, shell_command),
        Command::BarToggle => state.bar_toggle(),
        Command::DumpState => {
            match dump_state(state) {
                Ok(path) => tracing::info!("State written to {}", path.display()),
                Err(err) => tracing::error!("Could not dump state: {err}"),
            }
            false
        }
        Command::Restart => {
            manager.exit = Some(ExitReason::Restart);
            false
        }
        Command::Quit => {
            manager.exit = Some(ExitReason::Quit);
            false
        }
    }
}

fn with_workspace<C: Config>(state: &mut State<C>, f: impl FnOnce(&mut Workspace) -> bool) -> bool {
    let Some((screen, ws)) = state.focused_workspace() else {
        return false;
    };
    let Some(workspace) = state.workspace_mut(screen, ws) else {
        return false;
    };
    let changed = f(workspace);
    if changed {
        workspace.restack_needed = true;
    }
    changed
}

fn tune<C: Config>(state: &mut State<C>, f: impl FnOnce(&mut LayoutTuning)) -> bool {
    with_workspace(state, |ws| {
        if ws.layout == Layout::Floating {
            return false;
        }
        let before = *ws.tuning();
        f(ws.tuning_mut());
        before != *ws.tuning()
    })
}

fn toggle_flag<C: Config>(state: &mut State<C>, flag: WindowFlags) -> bool {
    state
        .focused_window()
        .is_some_and(|id| state.set_flag(id, flag, StateAction::Toggle))
}

fn begin_from_command<C: Config>(
    state: &mut State<C>,
    edges: Option<ResizeEdges>,
    key: Option<&str>,
) -> bool {
    let Some(id) = state.focused_window() else {
        return false;
    };
    let kind = edges.map_or(ManipulationKind::Move, ManipulationKind::Resize);
    let trigger = key.map_or(Trigger::Client, |k| Trigger::Key(k.to_owned()));
    let (x, y) = state.pointer;
    state.begin_manipulation(id, kind, trigger, x, y)
}

fn execute<C: Config, SERVER: DisplayServer>(
    manager: &mut Manager<C, SERVER>,
    shell_command: &str,
) -> bool {
    let Some(pid) = exec_shell(shell_command, &mut manager.children) else {
        return false;
    };
    if let Some((_, ws)) = manager.state.focused_workspace() {
        manager.state.pid_workspaces.insert(pid, ws);
    }
    false
}

fn dump_state<C: Config>(state: &State<C>) -> Result<PathBuf> {
    let path = xdg::BaseDirectories::with_prefix("lattice")?.place_runtime_file("state.json")?;
    let json = serde_json::to_string_pretty(&ManagerState::from(state))?;
    std::fs::write(&path, json)?;
    Ok(path)
}
