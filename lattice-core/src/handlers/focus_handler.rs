#![allow(clippy::wildcard_imports)]

use super::*;
use crate::models::{FocusClosePolicy, UnfocusPolicy};

impl<C: Config> State<C> {
    /// The window that should receive input meant for `id`: follows `focus_redirect` links
    /// down the transient chain. The walk is bounded by the number of managed windows.
    #[must_use]
    pub fn resolve_redirect(&self, id: WindowId) -> Option<WindowId> {
        let mut current = self.windows.get(id)?.id;
        for _ in 0..self.windows.len() {
            let next = self
                .windows
                .get(current)
                .and_then(|w| w.focus_redirect)
                .and_then(|next| self.windows.get(next));
            match next {
                Some(next)
                    if next.id != current
                        && next.can_focus()
                        && self.windows.related(current, next.id) =>
                {
                    current = next.id;
                }
                _ => break,
            }
        }
        Some(current)
    }

    /// Picks the window that takes over focus when `id` is removed from its workspace.
    /// Must be called while `id` is still a member, since the choice depends on its position.
    #[must_use]
    pub fn replacement_on_removal(&self, id: WindowId) -> Option<WindowId> {
        let window = self.windows.get(id)?;
        let screen = self.screens.get(window.screen())?;
        let ws = screen.workspace(window.workspace?)?;
        let candidate = |w: &WindowId| {
            *w != id
                && self
                    .windows
                    .get(*w)
                    .is_some_and(|w| w.in_focus_cycle() && !w.is_hidden())
        };

        if let Some(parent) = window.parent.filter(|p| candidate(p) && ws.contains(*p)) {
            return Some(parent);
        }

        let policy = if window.quirks.contains(Quirks::FOCUSPREV) {
            FocusClosePolicy::Prior
        } else {
            self.config.focus_close()
        };
        let wrap = self.config.focus_close_wrap();

        let pos = ws.windows.iter().position(|w| *w == id).unwrap_or(ws.windows.len());
        let before: Vec<WindowId> = ws.windows[..pos].iter().copied().filter(candidate).collect();
        let after: Vec<WindowId> = ws
            .windows
            .iter()
            .skip(pos + 1)
            .copied()
            .filter(candidate)
            .collect();

        let next = || {
            after
                .first()
                .or(if wrap { before.first() } else { before.last() })
                .copied()
        };
        let previous = || {
            before
                .last()
                .or(if wrap { after.last() } else { after.first() })
                .copied()
        };

        match policy {
            FocusClosePolicy::First => before.first().or(after.first()).copied(),
            FocusClosePolicy::Last => after.last().or(before.last()).copied(),
            FocusClosePolicy::Next => next(),
            FocusClosePolicy::Previous => previous(),
            FocusClosePolicy::Prior => screen
                .focus_history
                .iter()
                .copied()
                .find(|w| candidate(w) && ws.contains(*w) && !self.windows.related(id, *w))
                .or_else(next),
        }
    }

    /// Applies the unfocus policy to every maximized or fullscreen window of the workspace
    /// that is not related to `exempt`. Returns true if any window changed.
    pub fn apply_unfocus_side_effects(
        &mut self,
        screen: ScreenIndex,
        ws: WorkspaceIndex,
        exempt: WindowId,
    ) -> bool {
        let policy = self.config.unfocus_policy();
        if policy == UnfocusPolicy::None {
            return false;
        }
        let Some(members) = self.workspace(screen, ws).map(|ws| ws.windows.clone()) else {
            return false;
        };
        let affected: Vec<WindowId> = members
            .into_iter()
            .filter(|id| *id != exempt && !self.windows.related(*id, exempt))
            .filter(|id| {
                self.windows
                    .get(*id)
                    .is_some_and(|w| w.is_fullscreen() || w.is_maximized())
            })
            .collect();

        let mut restack = false;
        for id in &affected {
            match policy {
                UnfocusPolicy::None => {}
                UnfocusPolicy::Restore | UnfocusPolicy::Float | UnfocusPolicy::Iconify => {
                    let Some(window) = self.windows.get_mut(*id) else {
                        continue;
                    };
                    window.flags.remove(WindowFlags::FULLSCREEN | WindowFlags::MAXIMIZED);
                    match policy {
                        UnfocusPolicy::Float => window.flags.insert(WindowFlags::FLOATING),
                        UnfocusPolicy::Iconify => window.flags.insert(WindowFlags::HIDDEN),
                        _ => {}
                    }
                    let states = window.flags.as_states();
                    let handle = window.handle;
                    self.actions
                        .push_back(DisplayAction::SetState(handle, states));
                    restack = true;
                }
                UnfocusPolicy::Lower | UnfocusPolicy::QuickLower => {
                    let Some(window) = self.windows.get_mut(*id) else {
                        continue;
                    };
                    if !window.flags.contains(WindowFlags::LOWERED) {
                        window.flags.insert(WindowFlags::LOWERED);
                        let states = window.flags.as_states();
                        let handle = window.handle;
                        self.actions
                            .push_back(DisplayAction::SetState(handle, states));
                    }
                    self.lower_window(*id);
                    // A quick lower leaves the restack to the next change of the order.
                    restack |= policy == UnfocusPolicy::Lower;
                }
            }
        }
        if restack {
            if let Some(ws) = self.workspace_mut(screen, ws) {
                ws.restack_needed = true;
            }
        }
        !affected.is_empty()
    }

    /// Focuses a window, or the transient it redirects to. The window must be on a visible
    /// workspace. Returns false if nothing changed.
    pub fn focus_window(&mut self, id: WindowId) -> bool {
        let Some(target) = self.resolve_redirect(id) else {
            return false;
        };
        let Some(window) = self.windows.get(target) else {
            return false;
        };
        if !window.can_focus() {
            return false;
        }
        let screen = window.screen();
        let Some(ws) = window.workspace else {
            return false;
        };
        let Some(region) = self.workspace(screen, ws).and_then(|w| w.region) else {
            return false;
        };
        let previous = self
            .screens
            .get(screen)
            .and_then(|s| s.focus)
            .filter(|p| self.windows.contains(*p));
        if previous == Some(target) && self.focused_region == Some(region) {
            return false;
        }

        // Every ancestor hands its focus down the chain to `target`.
        let mut child = target;
        for ancestor in self.windows.ancestors(target) {
            if let Some(a) = self.windows.get_mut(ancestor) {
                a.focus_redirect = Some(child);
            }
            child = ancestor;
        }

        if let Some(workspace) = self.workspace_mut(screen, ws) {
            if workspace.focus != Some(target) {
                workspace.focus_prev = workspace.focus;
                workspace.focus = Some(target);
            }
        }
        let limit = self.config.focus_history_len();
        if let Some(s) = self.screens.get_mut(screen) {
            s.focus = Some(target);
            s.push_focus_history(target, limit);
        }
        let region_changed = self.focused_region != Some(region);
        self.focused_region = Some(region);

        if let Some(window) = self.windows.get_mut(target) {
            let cleared = WindowFlags::DEMANDS_ATTENTION | WindowFlags::LOWERED;
            if window.flags.intersects(cleared) {
                window.flags.remove(cleared);
                let states = window.flags.as_states();
                self.actions
                    .push_back(DisplayAction::SetState(window.handle, states));
            }
        }

        self.raise_window(target);
        self.apply_unfocus_side_effects(screen, ws, target);

        let previous = previous.and_then(|p| self.windows.get(p)).map(|p| p.handle);
        if let Some(window) = self.windows.get(target) {
            tracing::debug!("focusing {:?} ({:?})", window.handle, window.name);
            self.actions.push_back(DisplayAction::WindowTakeFocus {
                window: window.clone(),
                previous,
            });
        }
        if region_changed {
            self.actions.push_back(DisplayAction::SetCurrentDesktop(ws));
        }
        true
    }

    /// Drops the focus of a screen and focuses its root.
    pub fn unfocus(&mut self, screen: ScreenIndex) {
        let previous = self.screens.get_mut(screen).and_then(|s| s.focus.take());
        let handle = previous.and_then(|p| self.windows.get(p)).map(|w| w.handle);
        self.actions.push_back(DisplayAction::Unfocus(handle));
    }

    /// The window a workspace should focus when it is shown: its last focus, else the
    /// first or last window depending on the configuration.
    #[must_use]
    pub fn default_focus(&self, screen: ScreenIndex, ws: WorkspaceIndex) -> Option<WindowId> {
        let workspace = self.workspace(screen, ws)?;
        let focusable = |id: &WindowId| self.windows.get(*id).is_some_and(Window::in_focus_cycle);
        if let Some(focus) = workspace.focus.filter(focusable) {
            return Some(focus);
        }
        if self.config.focus_default_last() {
            workspace.windows.iter().rev().copied().find(focusable)
        } else {
            workspace.windows.iter().copied().find(focusable)
        }
    }

    /// Makes a region the focused one and focuses its workspace's default window.
    pub fn focus_region(&mut self, region: RegionId) -> bool {
        let Some(r) = self.regions.get(region) else {
            return false;
        };
        let screen = r.screen;
        let ws = r.workspace;
        let changed = self.focused_region != Some(region);
        self.focused_region = Some(region);
        if let Some(ws) = ws {
            if changed {
                self.actions.push_back(DisplayAction::SetCurrentDesktop(ws));
            }
            if self.config.focus_mode() == crate::models::FocusMode::Follow {
                self.actions.push_back(DisplayAction::FocusWindowUnderCursor);
                return true;
            }
            if let Some(id) = self.default_focus(screen, ws) {
                return self.focus_window(id) || changed;
            }
        }
        self.unfocus(screen);
        true
    }

    /// Focus the next (`delta` 1) or previous (`delta` -1) window of the focused workspace.
    pub fn focus_cycle(&mut self, delta: isize) -> bool {
        let Some((screen, ws)) = self.focused_workspace() else {
            return false;
        };
        let Some(workspace) = self.workspace(screen, ws) else {
            return false;
        };
        let cycle: Vec<WindowId> = workspace
            .windows
            .iter()
            .copied()
            .filter(|id| {
                self.windows
                    .get(*id)
                    .is_some_and(|w| w.in_focus_cycle() && w.main == w.id)
            })
            .collect();
        if cycle.is_empty() {
            return false;
        }
        let current = self
            .focused_window()
            .and_then(|f| self.windows.get(f))
            .map(|w| w.main);
        let next = match current.and_then(|c| cycle.iter().position(|w| *w == c)) {
            Some(pos) => wrap_index(pos, delta, cycle.len()),
            None => 0,
        };
        self.focus_window(cycle[next])
    }

    /// Focus the first window of the focused workspace.
    pub fn focus_main(&mut self) -> bool {
        let Some((screen, ws)) = self.focused_workspace() else {
            return false;
        };
        let main = self.workspace(screen, ws).and_then(|w| {
            w.windows
                .iter()
                .copied()
                .find(|id| self.windows.get(*id).is_some_and(Window::in_focus_cycle))
        });
        main.is_some_and(|id| self.focus_window(id))
    }

    /// Focus the next window asking for attention, switching workspace if needed.
    pub fn focus_urgent(&mut self) -> bool {
        let Some(screen) = self.focused_screen() else {
            return false;
        };
        let current = self.focused_window();
        let urgent = self
            .windows
            .iter()
            .filter(|w| w.screen() == screen && Some(w.id) != current)
            .filter(|w| w.flags.contains(WindowFlags::DEMANDS_ATTENTION) && w.can_focus())
            .find_map(|w| Some((w.id, w.workspace?)));
        let Some((id, ws)) = urgent else {
            return false;
        };
        let mut switched = false;
        if !self.is_window_visible(id) {
            let Some(region) = self.focused_region else {
                return false;
            };
            switched = self.switch(region, ws);
        }
        self.focus_window(id) || switched
    }

    /// Moves the focused window to the front of its workspace. If it already is there,
    /// it trades places with the second window.
    pub fn swap_main(&mut self) -> bool {
        let Some(focused) = self.focused_window() else {
            return false;
        };
        let Some((screen, ws)) = self.focused_workspace() else {
            return false;
        };
        let Some(workspace) = self.workspace_mut(screen, ws) else {
            return false;
        };
        let Some(pos) = workspace.windows.iter().position(|w| *w == focused) else {
            return false;
        };
        if pos == 0 {
            if workspace.windows.len() < 2 {
                return false;
            }
            workspace.windows.swap(0, 1);
        } else {
            let window = workspace.windows.remove(pos);
            workspace.windows.insert(0, window);
        }
        workspace.restack_needed = true;
        true
    }

    /// Swaps the focused window with its neighbour in tiling order.
    pub fn swap_neighbour(&mut self, delta: isize) -> bool {
        let Some(focused) = self.focused_window() else {
            return false;
        };
        let Some((screen, ws)) = self.focused_workspace() else {
            return false;
        };
        let Some(workspace) = self.workspace_mut(screen, ws) else {
            return false;
        };
        let len = workspace.windows.len();
        let Some(pos) = workspace.windows.iter().position(|w| *w == focused) else {
            return false;
        };
        if len < 2 {
            return false;
        }
        workspace.windows.swap(pos, wrap_index(pos, delta, len));
        workspace.restack_needed = true;
        true
    }

    /// The pointer entered a window or a region sink.
    pub fn enter_window(&mut self, handle: WindowHandle, x: i32, y: i32) -> bool {
        self.pointer = (x, y);
        if !self.mode.is_normal() || !self.config.focus_mode().follows_pointer() {
            return false;
        }
        if let Some(id) = self.windows.lookup(handle) {
            return self.focus_window(id);
        }
        let sink = self
            .regions
            .iter()
            .find(|(_, r)| r.sink == Some(handle))
            .map(|(id, _)| id);
        match sink {
            Some(region) if self.focused_region != Some(region) => self.focus_region(region),
            _ => false,
        }
    }

    /// The pointer moved over the root window.
    pub fn pointer_moved(&mut self, x: i32, y: i32) -> bool {
        self.pointer = (x, y);
        if !self.config.focus_mode().follows_pointer() {
            return false;
        }
        match self.region_at(x, y) {
            Some(region) if self.focused_region != Some(region) => self.focus_region(region),
            _ => false,
        }
    }
}

pub(crate) fn wrap_index(pos: usize, delta: isize, len: usize) -> usize {
    let len = len as isize;
    (((pos as isize + delta) % len + len) % len) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::{FocusMode, WindowInfo, WindowState};
    use crate::stacking::{Layer, Stackable};
    use crate::{DisplayEvent, Manager};

    fn manager(policy: FocusClosePolicy, wrap: bool) -> Manager<TestConfig, crate::display_servers::MockDisplayServer> {
        Manager::new_test_with_config(
            TestConfig {
                focus_close: policy,
                focus_close_wrap: wrap,
                ..TestConfig::default()
            },
            vec![Xyhw::new(0, 0, 1000, 1000)],
        )
    }

    #[test]
    fn destroying_focused_window_focuses_its_sibling() {
        let mut manager = manager(FocusClosePolicy::Next, true);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.focus_window(b);
        manager.feed(DisplayEvent::WindowDestroy(WindowHandle(2)));
        assert_eq!(manager.state.focused_window(), Some(a));
        assert!(!manager.state.screens[0].focus_history.contains(&b));
    }

    #[test]
    fn next_policy_without_wrap_falls_back_to_previous_neighbour() {
        let mut manager = manager(FocusClosePolicy::Next, false);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        let c = manager.manage_test_window(3);
        assert_eq!(manager.state.replacement_on_removal(b), Some(c));
        assert_eq!(manager.state.replacement_on_removal(c), Some(b));
        assert_eq!(manager.state.replacement_on_removal(a), Some(b));
    }

    #[test]
    fn wrap_lets_next_jump_to_the_first_window() {
        let mut manager = manager(FocusClosePolicy::Next, true);
        let a = manager.manage_test_window(1);
        manager.manage_test_window(2);
        let c = manager.manage_test_window(3);
        assert_eq!(manager.state.replacement_on_removal(c), Some(a));
    }

    #[test]
    fn first_last_and_previous_policies() {
        let mut manager = manager(FocusClosePolicy::First, true);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        let c = manager.manage_test_window(3);
        assert_eq!(manager.state.replacement_on_removal(a), Some(b));
        manager.state.config.focus_close = FocusClosePolicy::Last;
        assert_eq!(manager.state.replacement_on_removal(c), Some(b));
        manager.state.config.focus_close = FocusClosePolicy::Previous;
        assert_eq!(manager.state.replacement_on_removal(a), Some(c));
    }

    #[test]
    fn prior_policy_uses_focus_history() {
        let mut manager = manager(FocusClosePolicy::Prior, true);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        let c = manager.manage_test_window(3);
        manager.state.focus_window(a);
        manager.state.focus_window(c);
        manager.state.focus_window(b);
        assert_eq!(manager.state.replacement_on_removal(b), Some(c));
    }

    #[test]
    fn transient_gives_focus_back_to_its_parent() {
        let mut manager = manager(FocusClosePolicy::Next, true);
        let parent = manager.manage_test_window(1);
        manager.manage_test_window(2);
        let dialog = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(3),
                    transient_for: Some(WindowHandle(1)),
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap();
        assert_eq!(manager.state.replacement_on_removal(dialog), Some(parent));
    }

    #[test]
    fn focusing_a_parent_redirects_to_its_transient() {
        let mut manager = manager(FocusClosePolicy::Next, true);
        let parent = manager.manage_test_window(1);
        let other = manager.manage_test_window(2);
        let dialog = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(3),
                    transient_for: Some(WindowHandle(1)),
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap();
        manager.state.focus_window(dialog);
        manager.state.focus_window(other);
        assert_eq!(manager.state.resolve_redirect(parent), Some(dialog));
        manager.state.focus_window(parent);
        assert_eq!(manager.state.focused_window(), Some(dialog));
    }

    #[test]
    fn redirect_walk_terminates_on_a_cycle() {
        let mut manager = manager(FocusClosePolicy::Next, true);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.windows.get_mut(a).unwrap().focus_redirect = Some(b);
        manager.state.windows.get_mut(b).unwrap().focus_redirect = Some(a);
        assert!(manager.state.resolve_redirect(a).is_some());
    }

    #[test]
    fn unfocus_policy_restores_unrelated_fullscreen_windows() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                unfocus_policy: UnfocusPolicy::Restore,
                ..TestConfig::default()
            },
            vec![Xyhw::new(0, 0, 1000, 1000)],
        );
        let full = manager.manage_test_window(1);
        let other = manager.manage_test_window(2);
        manager.state.windows.get_mut(full).unwrap().flags |= WindowFlags::FULLSCREEN;
        manager.state.focus_window(full);
        manager.state.focus_window(other);
        assert!(!manager.state.windows.get(full).unwrap().is_fullscreen());
    }

    #[test]
    fn iconify_policy_hides_maximized_windows() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                unfocus_policy: UnfocusPolicy::Iconify,
                ..TestConfig::default()
            },
            vec![Xyhw::new(0, 0, 1000, 1000)],
        );
        let max = manager.manage_test_window(1);
        let other = manager.manage_test_window(2);
        manager.state.windows.get_mut(max).unwrap().flags |= WindowFlags::MAXIMIZED;
        manager.state.focus_window(max);
        manager.state.focus_window(other);
        assert!(manager.state.windows.get(max).unwrap().is_hidden());
    }

    fn unfocus_manager(policy: UnfocusPolicy) -> (Manager<TestConfig, crate::display_servers::MockDisplayServer>, WindowId, WindowId) {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                unfocus_policy: policy,
                ..TestConfig::default()
            },
            vec![Xyhw::new(0, 0, 1000, 1000)],
        );
        let full = manager.manage_test_window(1);
        let other = manager.manage_test_window(2);
        manager.state.windows.get_mut(full).unwrap().flags |= WindowFlags::FULLSCREEN;
        manager.state.focus_window(full);
        manager.state.arrange_all();
        manager.state.restack_all();
        manager.state.focus_window(other);
        manager.state.arrange_all();
        (manager, full, other)
    }

    fn window_order(manager: &Manager<TestConfig, crate::display_servers::MockDisplayServer>) -> Vec<WindowId> {
        manager
            .state
            .layers(0)
            .into_iter()
            .filter_map(|s| match s {
                Stackable::Window(id, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn float_policy_keeps_the_window_above_the_tiles() {
        let (manager, full, other) = unfocus_manager(UnfocusPolicy::Float);
        let window = manager.state.windows.get(full).unwrap();
        assert!(!window.is_fullscreen());
        assert!(window.is_floating());
        assert_eq!(manager.state.layer_of(full), Some(Layer::AboveFloating));
        assert_eq!(window_order(&manager), vec![other, full]);
    }

    #[test]
    fn lower_policy_puts_the_window_under_the_focused_one() {
        let (mut manager, full, other) = unfocus_manager(UnfocusPolicy::Lower);
        assert!(manager.state.windows.get(full).unwrap().is_fullscreen());
        assert_eq!(manager.state.layer_of(full), Some(Layer::Below));
        assert_eq!(window_order(&manager), vec![full, other]);
        assert!(manager.state.actions.iter().any(|a| matches!(
            a,
            DisplayAction::SetState(WindowHandle(1), states) if states.contains(&WindowState::Below)
        )));
        let (screen, ws) = manager.state.focused_workspace().unwrap();
        assert!(manager.state.workspace(screen, ws).unwrap().restack_needed);

        // Getting focus back lifts it out of the below layer.
        manager.state.focus_window(full);
        assert_eq!(manager.state.layer_of(full), Some(Layer::Fullscreen));
        assert_eq!(window_order(&manager).last(), Some(&full));
    }

    #[test]
    fn quick_lower_policy_lowers_without_forcing_a_restack() {
        let (mut manager, full, other) = unfocus_manager(UnfocusPolicy::QuickLower);
        assert_eq!(manager.state.layer_of(full), Some(Layer::Below));
        assert_eq!(window_order(&manager), vec![full, other]);
        let (screen, ws) = manager.state.focused_workspace().unwrap();
        assert!(!manager.state.workspace(screen, ws).unwrap().restack_needed);
        // The order still changed, so the next restack goes out.
        assert!(manager.state.restack(0));
    }

    #[test]
    fn focus_cycle_wraps() {
        let mut manager = manager(FocusClosePolicy::Next, true);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.focus_window(b);
        assert!(manager.state.focus_cycle(1));
        assert_eq!(manager.state.focused_window(), Some(a));
        assert!(manager.state.focus_cycle(-1));
        assert_eq!(manager.state.focused_window(), Some(b));
    }

    #[test]
    fn pointer_focus_only_in_follow_modes() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                focus_mode: FocusMode::Default,
                ..TestConfig::default()
            },
            vec![Xyhw::new(0, 0, 1000, 1000)],
        );
        let a = manager.manage_test_window(1);
        manager.manage_test_window(2);
        assert!(manager.state.enter_window(WindowHandle(1), 5, 5));
        assert_eq!(manager.state.focused_window(), Some(a));
        manager.state.config.focus_mode = FocusMode::Manual;
        assert!(!manager.state.enter_window(WindowHandle(2), 5, 5));
        assert_eq!(manager.state.focused_window(), Some(a));
    }

    #[test]
    fn swap_main_moves_focused_window_to_front() {
        let mut manager = manager(FocusClosePolicy::Next, true);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.focus_window(b);
        assert!(manager.state.swap_main());
        let (screen, ws) = manager.state.focused_workspace().unwrap();
        assert_eq!(manager.state.workspace(screen, ws).unwrap().windows, vec![b, a]);
    }

    #[test]
    fn wrap_index_handles_negative_steps() {
        assert_eq!(wrap_index(0, -1, 3), 2);
        assert_eq!(wrap_index(2, 1, 3), 0);
    }
}
