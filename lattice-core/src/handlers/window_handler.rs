#![allow(clippy::wildcard_imports)]

use super::*;
use crate::models::{classify, WindowInfo, XyhwChange};

impl<C: Config> State<C> {
    /// Starts managing a window, returning its handle. A window that is already managed
    /// keeps its record and handle. `(x, y)` is where the pointer was when it mapped.
    pub fn manage(&mut self, info: WindowInfo, x: i32, y: i32) -> Option<WindowId> {
        let screen = self.screen_at(x, y)?;
        let stored = info.stored_workspace;
        let (id, created) = self.windows.insert(info, screen);
        if !created {
            return Some(id);
        }
        self.windows.relink();

        let border = self.config.window_border(self.windows.get(id)?.r#type);
        let window = self.windows.get_mut(id)?;
        let (quirks, forced_ws) = classify(
            self.config.quirk_rules(),
            window.class_or_empty(),
            window.instance.as_deref().unwrap_or_default(),
            window.name.as_deref().unwrap_or_default(),
            window.r#type,
        );
        window.quirks = quirks;
        window.border = border;
        for (quirk, flag) in [
            (Quirks::FULLSCREEN, WindowFlags::FULLSCREEN),
            (Quirks::MAXIMIZE, WindowFlags::MAXIMIZED),
            (Quirks::ICONIFY, WindowFlags::HIDDEN),
            (Quirks::BELOW, WindowFlags::BELOW),
            (Quirks::ABOVE, WindowFlags::ABOVE),
        ] {
            if quirks.contains(quirk) {
                window.flags |= flag;
            }
        }
        let handle = window.handle;
        let flags = window.flags;
        let sticky = window.r#type.is_screen_sticky();
        tracing::debug!(
            "managing {:?} class={:?} quirks={:?}",
            handle,
            window.class,
            quirks
        );

        self.actions.push_back(DisplayAction::AddedWindow(handle));
        if !flags.is_empty() {
            self.actions
                .push_back(DisplayAction::SetState(handle, flags.as_states()));
        }

        if sticky {
            if let Some(s) = self.screens.get_mut(screen) {
                s.sticky.push(id);
            }
            self.update_usable_areas(screen);
            self.push_client_list();
            return Some(id);
        }

        let ws = self.target_workspace(id, screen, stored, forced_ws, x, y);
        if let Some(workspace) = self.ensure_workspace(screen, ws) {
            workspace.windows.push(id);
            workspace.restack_needed = true;
        }
        if let Some(window) = self.windows.get_mut(id) {
            window.workspace = Some(ws);
        }
        self.actions
            .push_back(DisplayAction::SetWindowWorkspace(handle, Some(ws)));
        self.push_client_list();
        self.raise_window(id);

        if self.focus_on_map(id) {
            self.focus_window(id);
        }
        Some(id)
    }

    /// Picks the workspace of a new window. The first rule that applies wins: the
    /// workspace its process was spawned from, the workspace stored on the window, the
    /// workspace forced by a quirk, the workspace of its main window, the workspace under
    /// the pointer, the focused workspace.
    fn target_workspace(
        &self,
        id: WindowId,
        screen: ScreenIndex,
        stored: Option<WorkspaceIndex>,
        forced: Option<WorkspaceIndex>,
        x: i32,
        y: i32,
    ) -> WorkspaceIndex {
        let limit = self
            .screens
            .get(screen)
            .map_or(0, crate::models::Screen::workspace_limit);
        let Some(window) = self.windows.get(id) else {
            return 0;
        };
        let ignore_spawn = window.quirks.contains(Quirks::IGNORESPAWNWS);
        let ignore_pid = ignore_spawn || window.quirks.contains(Quirks::IGNOREPID);

        let by_pid = window
            .pid
            .filter(|_| !ignore_pid)
            .and_then(|pid| self.pid_workspaces.get(&pid).copied());
        let by_stored = stored.filter(|_| !ignore_spawn);
        let by_main = (window.main != id)
            .then(|| self.windows.get(window.main))
            .flatten()
            .filter(|main| main.screen() == screen)
            .and_then(|main| main.workspace);
        let by_pointer = self
            .region_at(x, y)
            .and_then(|r| self.regions.get(r))
            .filter(|r| r.screen == screen)
            .and_then(|r| r.workspace);
        let focused = self
            .focused_workspace()
            .filter(|(s, _)| *s == screen)
            .map(|(_, ws)| ws);

        [by_pid, by_stored, forced, by_main, by_pointer, focused]
            .into_iter()
            .flatten()
            .find(|ws| *ws < limit)
            .unwrap_or(0)
    }

    fn focus_on_map(&self, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        if window.quirks.contains(Quirks::NOFOCUSONMAP) || !window.can_focus() {
            return false;
        }
        if window.quirks.contains(Quirks::FOCUSONMAP_SINGLE) {
            let class = window.class_or_empty();
            if self
                .windows
                .iter()
                .any(|w| w.id != id && w.class_or_empty() == class)
            {
                return false;
            }
        }
        self.is_window_visible(id)
    }

    fn push_client_list(&mut self) {
        let clients = self.windows.iter().map(|w| w.handle).collect();
        self.actions.push_back(DisplayAction::SetClientList(clients));
    }

    /// Stops managing a window. Every reference to it is dropped before the record is freed,
    /// and focus moves on if it had it.
    pub fn unmanage(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let screen = window.screen();
        let handle = window.handle;
        let had_strut = window.strut.is_some();
        let was_focused = self.screens.get(screen).and_then(|s| s.focus) == Some(id);
        let replacement = if was_focused {
            self.replacement_on_removal(id)
        } else {
            None
        };

        if self.mode.target() == Some(id) {
            tracing::debug!("target of the manipulation went away");
            self.mode = Mode::Normal;
            self.actions.push_back(DisplayAction::EndGrab);
        }
        if let Mode::Searching(search) = &mut self.mode {
            search.labels.retain(|(_, w)| *w != id);
        }

        for s in &mut self.screens {
            s.forget(id);
            for ws in s.workspaces_mut() {
                if ws.contains(id) || ws.focus_raise == Some(id) {
                    ws.forget(id);
                }
            }
        }
        self.windows.forget(id);
        self.windows.remove(id);

        if had_strut {
            self.update_usable_areas(screen);
        }
        if was_focused {
            let focused = replacement.is_some_and(|r| self.focus_window(r));
            if !focused {
                self.unfocus(screen);
            }
        }
        self.actions.push_back(DisplayAction::DestroyedWindow(handle));
        self.push_client_list();
        true
    }

    /// Applies property changes reported by the display server.
    pub fn window_changed(&mut self, change: WindowChange) -> bool {
        let Some(id) = self.windows.lookup(change.handle) else {
            return false;
        };
        let relink = change.transient.is_some();
        let strut = change.strut.is_some();
        let Some(window) = self.windows.get_mut(id) else {
            return false;
        };
        let screen = window.screen();
        let changed = change.update(window);
        if !changed {
            return false;
        }
        if relink {
            self.windows.relink();
        }
        if strut {
            self.update_usable_areas(screen);
        }
        true
    }

    /// A client asked for a new geometry. Floating windows get it; everyone else is told
    /// where they actually are.
    pub fn configure_request(&mut self, handle: WindowHandle, change: XyhwChange) -> bool {
        let Some(id) = self.windows.lookup(handle) else {
            return false;
        };
        let is_target = self.mode.target() == Some(id);
        let Some(window) = self.windows.get_mut(id) else {
            return false;
        };
        let free = window.r#type.is_screen_sticky()
            || (window.is_floating()
                && !window.is_fullscreen()
                && !window.is_maximized()
                && !is_target);
        if free {
            let mut g = window.g;
            change.update(&mut g);
            window.requested = g;
            window.g = g;
            window.float_geom = None;
            if change.moves() {
                window.flags |= WindowFlags::MANUAL;
            }
            return true;
        }
        change.update(&mut window.requested);
        let (g, border) = (window.g, window.effective_border());
        self.actions
            .push_back(DisplayAction::SendConfigureNotify(handle, g, border));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::{QuirkMode, QuirkRule, TypeMask, WindowType};

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 1000);

    fn assert_no_references(state: &State<TestConfig>, id: WindowId) {
        assert!(state.windows.get(id).is_none());
        for s in &state.screens {
            assert_ne!(s.focus, Some(id));
            assert!(!s.focus_history.contains(&id));
            assert!(!s.priority.contains(&id));
            assert!(!s.sticky.contains(&id));
            for ws in s.workspaces() {
                assert!(!ws.windows.contains(&id));
                assert_ne!(ws.focus, Some(id));
                assert_ne!(ws.focus_prev, Some(id));
                assert_ne!(ws.focus_raise, Some(id));
            }
        }
        for w in state.windows.iter() {
            assert_ne!(w.parent, Some(id));
            assert_ne!(w.main, id);
            assert_ne!(w.focus_redirect, Some(id));
        }
        assert_ne!(state.mode.target(), Some(id));
    }

    fn info(handle: u64) -> WindowInfo {
        WindowInfo {
            handle: WindowHandle(handle),
            ..WindowInfo::default()
        }
    }

    #[test]
    fn manage_is_idempotent() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let a = manager.manage_test_window(1);
        let again = manager.manage_test_window(1);
        assert_eq!(a, again);
        assert_eq!(manager.state.workspace(0, 0).unwrap().windows, vec![a]);
    }

    #[test]
    fn unmanage_leaves_no_references() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let parent = manager.manage_test_window(1);
        let other = manager.manage_test_window(2);
        let dialog = manager
            .state
            .manage(
                WindowInfo {
                    transient_for: Some(WindowHandle(1)),
                    ..info(3)
                },
                0,
                0,
            )
            .unwrap();
        manager.state.focus_window(other);
        manager.state.focus_window(dialog);
        manager.state.raise_toggle(dialog);
        manager.run_pending();

        assert!(manager.state.unmanage(parent));
        assert_no_references(&manager.state, parent);
        assert!(manager.state.unmanage(dialog));
        assert_no_references(&manager.state, dialog);
        assert_eq!(manager.state.focused_window(), Some(other));
        assert!(!manager.state.unmanage(dialog));
    }

    #[test]
    fn stale_handle_is_not_resurrected_by_a_new_window() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let old = manager.manage_test_window(1);
        manager.state.unmanage(old);
        let new = manager.manage_test_window(1);
        assert_ne!(old, new);
        assert!(!manager.state.focus_window(old));
    }

    #[test]
    fn spawn_pid_beats_stored_workspace_and_quirks() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                quirks: vec![QuirkRule::new(
                    ".*",
                    ".*",
                    ".*",
                    TypeMask::all(),
                    Quirks::empty(),
                    QuirkMode::Add,
                    Some(5),
                )
                .unwrap()],
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        manager.state.pid_workspaces.insert(42, 3);
        let spawned = manager
            .state
            .manage(
                WindowInfo {
                    pid: Some(42),
                    stored_workspace: Some(4),
                    ..info(1)
                },
                0,
                0,
            )
            .unwrap();
        let stored = manager
            .state
            .manage(
                WindowInfo {
                    stored_workspace: Some(4),
                    ..info(2)
                },
                0,
                0,
            )
            .unwrap();
        let forced = manager.manage_test_window(3);
        let ws = |id| manager.state.windows.get(id).unwrap().workspace;
        assert_eq!(ws(spawned), Some(3));
        assert_eq!(ws(stored), Some(4));
        assert_eq!(ws(forced), Some(5));
    }

    #[test]
    fn ignorespawnws_skips_pid_and_stored_workspace() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                quirks: vec![QuirkRule::new(
                    "term",
                    ".*",
                    ".*",
                    TypeMask::all(),
                    Quirks::IGNORESPAWNWS,
                    QuirkMode::Add,
                    None,
                )
                .unwrap()],
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        manager.state.pid_workspaces.insert(7, 2);
        let id = manager
            .state
            .manage(
                WindowInfo {
                    class: Some("term".to_owned()),
                    pid: Some(7),
                    stored_workspace: Some(4),
                    ..info(1)
                },
                10,
                10,
            )
            .unwrap();
        assert_eq!(manager.state.windows.get(id).unwrap().workspace, Some(0));
    }

    #[test]
    fn nofocusonmap_keeps_focus_where_it_was() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                quirks: vec![QuirkRule::new(
                    "popup",
                    ".*",
                    ".*",
                    TypeMask::all(),
                    Quirks::NOFOCUSONMAP,
                    QuirkMode::Add,
                    None,
                )
                .unwrap()],
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        let a = manager.manage_test_window(1);
        manager.state.manage(
            WindowInfo {
                class: Some("popup".to_owned()),
                ..info(2)
            },
            0,
            0,
        );
        assert_eq!(manager.state.focused_window(), Some(a));
    }

    #[test]
    fn docks_are_sticky_and_never_focused() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let a = manager.manage_test_window(1);
        let dock = manager
            .state
            .manage(
                WindowInfo {
                    r#type: WindowType::Dock,
                    ..info(2)
                },
                0,
                0,
            )
            .unwrap();
        assert_eq!(manager.state.screens[0].sticky, vec![dock]);
        assert_eq!(manager.state.windows.get(dock).unwrap().workspace, None);
        assert_eq!(manager.state.focused_window(), Some(a));
        assert!(manager.state.unmanage(dock));
        assert_no_references(&manager.state, dock);
    }

    #[test]
    fn tiled_windows_only_get_a_configure_notify() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = manager.manage_test_window(1);
        manager.run_pending();
        let before = manager.state.windows.get(id).unwrap().g;
        let change = XyhwChange {
            x: Some(5),
            ..XyhwChange::default()
        };
        assert!(!manager.state.configure_request(WindowHandle(1), change));
        assert_eq!(manager.state.windows.get(id).unwrap().g, before);
        assert!(manager
            .state
            .actions
            .iter()
            .any(|a| matches!(a, DisplayAction::SendConfigureNotify(WindowHandle(1), g, _) if *g == before)));
    }

    #[test]
    fn moving_a_floating_window_marks_it_manual() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = manager
            .state
            .manage(
                WindowInfo {
                    r#type: WindowType::Dialog,
                    ..info(1)
                },
                0,
                0,
            )
            .unwrap();
        let change = XyhwChange {
            x: Some(30),
            y: Some(40),
            ..XyhwChange::default()
        };
        assert!(manager.state.configure_request(WindowHandle(1), change));
        manager.run_pending();
        let window = manager.state.windows.get(id).unwrap();
        assert!(window.flags.contains(WindowFlags::MANUAL));
        assert_eq!((window.g.x(), window.g.y()), (30, 40));
    }

    #[test]
    fn new_transient_link_is_resolved_on_change() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let parent = manager.manage_test_window(1);
        let child = manager.manage_test_window(2);
        let mut change = WindowChange::new(WindowHandle(2));
        change.transient = Some(Some(WindowHandle(1)));
        assert!(manager.state.window_changed(change));
        assert_eq!(manager.state.windows.get(child).unwrap().main, parent);
    }
}
