#![allow(clippy::wildcard_imports)]

use super::*;
use crate::models::WindowState;
use crate::StateAction;

impl<C: Config> State<C> {
    /// `_NET_WM_STATE` change asked by a client (or by a command).
    pub fn state_request(&mut self, handle: WindowHandle, state: WindowState, action: StateAction) -> bool {
        let Some(id) = self.windows.lookup(handle) else {
            return false;
        };
        let Some(flag) = WindowFlags::from_state(state) else {
            tracing::trace!("ignoring unsupported state {state:?}");
            return false;
        };
        if flag == WindowFlags::HIDDEN {
            let hide = action.apply(self.windows.get(id).is_some_and(Window::is_hidden));
            return if hide { self.iconify(id) } else { self.uniconify(id) };
        }
        self.set_flag(id, flag, action)
    }

    /// Sets, clears or toggles a state flag and mirrors the result to the display server.
    pub fn set_flag(&mut self, id: WindowId, flag: WindowFlags, action: StateAction) -> bool {
        let Some(window) = self.windows.get_mut(id) else {
            return false;
        };
        if flag == WindowFlags::FLOATING && window.always_floats() {
            return false;
        }
        // A window lowered on unfocus reports itself as below.
        let current = if flag == WindowFlags::BELOW {
            window.flags.intersects(WindowFlags::BELOW | WindowFlags::LOWERED)
        } else {
            window.flags.contains(flag)
        };
        let wanted = action.apply(current);
        if wanted == current {
            return false;
        }
        window.flags.set(flag, wanted);
        if flag == WindowFlags::BELOW && !wanted {
            window.flags.remove(WindowFlags::LOWERED);
        }
        let handle = window.handle;
        let states = window.flags.as_states();
        let screen = window.screen();
        let ws = window.workspace;
        self.actions.push_back(DisplayAction::SetState(handle, states));
        if let Some(workspace) = ws.and_then(|ws| self.workspace_mut(screen, ws)) {
            workspace.restack_needed = true;
        }
        if wanted && flag.intersects(WindowFlags::FULLSCREEN | WindowFlags::MAXIMIZED) {
            self.raise_window(id);
        }
        true
    }

    /// Hides a window. Focus moves on if it had it.
    pub fn iconify(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        if window.is_hidden() {
            return false;
        }
        let screen = window.screen();
        let was_focused = self.focused_window() == Some(id);
        let replacement = if was_focused {
            self.replacement_on_removal(id)
        } else {
            None
        };
        self.set_flag(id, WindowFlags::HIDDEN, StateAction::Add);
        if was_focused {
            if let Some(s) = self.screens.get_mut(screen) {
                s.focus = None;
            }
            let focused = replacement.is_some_and(|r| self.focus_window(r));
            if !focused {
                self.unfocus(screen);
            }
        }
        true
    }

    pub fn uniconify(&mut self, id: WindowId) -> bool {
        if !self.set_flag(id, WindowFlags::HIDDEN, StateAction::Remove) {
            return false;
        }
        if self.is_window_visible(id) {
            self.focus_window(id);
        }
        true
    }

    /// Brings back the last hidden window of the focused workspace.
    pub fn uniconify_last(&mut self) -> bool {
        let Some((screen, ws)) = self.focused_workspace() else {
            return false;
        };
        let hidden = self.workspace(screen, ws).and_then(|w| {
            w.windows
                .iter()
                .rev()
                .copied()
                .find(|id| self.windows.get(*id).is_some_and(Window::is_hidden))
        });
        hidden.is_some_and(|id| self.uniconify(id))
    }

    /// `_NET_ACTIVE_WINDOW`: windows on the focused workspace, and windows allowed to
    /// steal focus, get it. Everyone else is marked as demanding attention.
    pub fn activate_request(&mut self, handle: WindowHandle) -> bool {
        let Some(id) = self.windows.lookup(handle) else {
            return false;
        };
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let obey = window.quirks.contains(Quirks::OBEYAPPFOCUSREQ);
        let ws = window.workspace;
        let hidden = window.is_hidden();
        let current = self.focused_workspace().map(|(_, ws)| ws);
        if ws.is_none() || !(obey || ws == current) {
            return self.set_flag(id, WindowFlags::DEMANDS_ATTENTION, StateAction::Add);
        }
        let mut changed = hidden && self.set_flag(id, WindowFlags::HIDDEN, StateAction::Remove);
        if let (Some(ws), Some(region)) = (ws, self.focused_region) {
            if !self.is_window_visible(id) {
                changed |= self.switch(region, ws);
            }
        }
        self.focus_window(id) || changed
    }

    /// Asks a window to close, or disconnects its client when `force` is set.
    pub fn close_window(&mut self, id: WindowId, force: bool) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        self.actions
            .push_back(DisplayAction::KillWindow(window.handle, force));
        true
    }

    /// `_NET_CURRENT_DESKTOP` from a pager.
    pub fn desktop_request(&mut self, ws: WorkspaceIndex) -> bool {
        match self.focused_region {
            Some(region) => self.switch(region, ws),
            None => false,
        }
    }

    /// `_NET_WM_DESKTOP` from a client or pager.
    pub fn window_desktop_request(&mut self, handle: WindowHandle, ws: WorkspaceIndex) -> bool {
        match self.windows.lookup(handle) {
            Some(id) => self.move_window_to_workspace(id, ws),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::{QuirkMode, QuirkRule, TypeMask, WindowInfo};

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 1000);

    #[test]
    fn fullscreen_request_toggles_and_mirrors_state() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = manager.manage_test_window(1);
        assert!(manager
            .state
            .state_request(WindowHandle(1), WindowState::Fullscreen, StateAction::Toggle));
        assert!(manager.state.windows.get(id).unwrap().is_fullscreen());
        assert!(manager.state.actions.iter().any(|a| matches!(
            a,
            DisplayAction::SetState(WindowHandle(1), states) if states == &vec![WindowState::Fullscreen]
        )));
        assert!(!manager
            .state
            .state_request(WindowHandle(1), WindowState::Fullscreen, StateAction::Add));
        assert!(manager
            .state
            .state_request(WindowHandle(1), WindowState::Fullscreen, StateAction::Remove));
        assert!(!manager.state.windows.get(id).unwrap().is_fullscreen());
    }

    #[test]
    fn float_toggle_on_a_transient_changes_nothing() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let main = manager.manage_test_window(1);
        let dialog = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(2),
                    transient_for: Some(WindowHandle(1)),
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap();
        manager.state.actions.clear();
        assert!(!manager.state.set_flag(dialog, WindowFlags::FLOATING, StateAction::Toggle));
        assert!(manager.state.actions.is_empty());
        assert!(manager.state.set_flag(main, WindowFlags::FLOATING, StateAction::Toggle));
        assert!(manager.state.windows.get(main).unwrap().is_floating());
    }

    #[test]
    fn removing_below_also_lifts_an_unfocus_lower() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = manager.manage_test_window(1);
        manager.state.windows.get_mut(id).unwrap().flags |= WindowFlags::LOWERED;
        assert!(manager
            .state
            .state_request(WindowHandle(1), WindowState::Below, StateAction::Remove));
        assert!(!manager
            .state
            .windows
            .get(id)
            .unwrap()
            .flags
            .intersects(WindowFlags::BELOW | WindowFlags::LOWERED));
    }

    #[test]
    fn hiding_the_focused_window_moves_focus() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        assert_eq!(manager.state.focused_window(), Some(b));
        assert!(manager
            .state
            .state_request(WindowHandle(2), WindowState::Hidden, StateAction::Add));
        assert_eq!(manager.state.focused_window(), Some(a));
        assert!(manager.state.uniconify_last());
        assert!(!manager.state.windows.get(b).unwrap().is_hidden());
        assert_eq!(manager.state.focused_window(), Some(b));
    }

    #[test]
    fn activation_from_another_workspace_only_marks_urgency() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.move_window_to_workspace(b, 1);
        manager.state.focus_window(a);
        assert!(manager.state.activate_request(WindowHandle(2)));
        assert_eq!(manager.state.focused_window(), Some(a));
        assert!(manager
            .state
            .windows
            .get(b)
            .unwrap()
            .flags
            .contains(WindowFlags::DEMANDS_ATTENTION));
        assert!(manager.state.focus_urgent());
        assert_eq!(manager.state.focused_window(), Some(b));
    }

    #[test]
    fn obeyappfocusreq_switches_to_the_window() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                quirks: vec![QuirkRule::new(
                    "chat",
                    ".*",
                    ".*",
                    TypeMask::all(),
                    Quirks::OBEYAPPFOCUSREQ,
                    QuirkMode::Add,
                    Some(2),
                )
                .unwrap()],
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        manager.manage_test_window(1);
        let chat = manager
            .state
            .manage(
                crate::models::WindowInfo {
                    handle: WindowHandle(2),
                    class: Some("chat".to_owned()),
                    ..Default::default()
                },
                0,
                0,
            )
            .unwrap();
        assert!(manager.state.activate_request(WindowHandle(2)));
        assert_eq!(manager.state.focused_workspace().map(|(_, ws)| ws), Some(2));
        assert_eq!(manager.state.focused_window(), Some(chat));
    }

    #[test]
    fn close_request_asks_politely() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = manager.manage_test_window(1);
        assert!(manager.state.close_window(id, false));
        assert!(matches!(
            manager.state.actions.back(),
            Some(DisplayAction::KillWindow(WindowHandle(1), false))
        ));
    }
}
