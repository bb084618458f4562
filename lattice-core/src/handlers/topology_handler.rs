#![allow(clippy::wildcard_imports)]

use super::*;
use crate::errors::{LatticeError, Result};
use crate::handlers::focus_handler::wrap_index;
use crate::models::{Region, Rotation, Screen, Strut};

impl<C: Config> State<C> {
    /// Registers a root window. Until the display server reports its outputs, the whole
    /// root is one region.
    ///
    /// # Errors
    ///
    /// Fails if the screen cannot get a workspace for its first region.
    pub fn screen_create(&mut self, root: WindowHandle, g: Xyhw) -> Result<()> {
        if self.screen_by_root(root).is_some() {
            return Ok(());
        }
        let idx = self.screens.len();
        let mut screen = Screen::new(idx, root, g, self.config.workspace_limit());
        screen.max_updates_per_sec = self.config.max_updates_per_sec();
        self.screens.push(screen);
        tracing::info!("managing screen {idx} ({g:?})");
        self.reconcile_outputs(idx, vec![(g, Rotation::Normal)])?;
        self.update_desktop_hints();
        Ok(())
    }

    /// Rebuilds the regions of a screen from its physical outputs.
    ///
    /// Every current region is retired into the pool first. Each output then takes the
    /// pooled region that fits it best (same rectangle, then same size, then the same size
    /// rotated), or a fresh one. A reused region gets its previous workspace back if that
    /// workspace is still free.
    ///
    /// # Errors
    ///
    /// Fails when there are more outputs than workspaces.
    pub fn reconcile_outputs(
        &mut self,
        screen: ScreenIndex,
        outputs: Vec<(Xyhw, Rotation)>,
    ) -> Result<()> {
        let Some(s) = self.screens.get_mut(screen) else {
            return Ok(());
        };
        let retired = std::mem::take(&mut s.regions);
        for region in retired {
            self.retire_region(screen, region);
        }

        let mut placed: Vec<(RegionId, bool)> = vec![];
        for (g, rotation) in outputs {
            if g.w() <= 0 || g.h() <= 0 {
                tracing::debug!("skipping empty output {g:?}");
                continue;
            }
            match self.take_pooled_region(screen, &g) {
                Some(id) => {
                    if let Some(region) = self.regions.get_mut(id) {
                        region.g = g;
                        region.rotation = rotation;
                    }
                    placed.push((id, true));
                }
                None => {
                    let id = self
                        .regions
                        .insert_with_key(|id| Region::new(id, screen, g, rotation));
                    placed.push((id, false));
                }
            }
        }

        // Reused regions claim their old workspace before fresh ones take what is left.
        let mut order: Vec<RegionId> = placed.iter().filter(|(_, r)| *r).map(|(id, _)| *id).collect();
        order.extend(placed.iter().filter(|(_, r)| !*r).map(|(id, _)| *id));
        for id in order {
            let prior = self.regions.get(id).and_then(|r| r.prior_workspace);
            let ws = prior
                .filter(|ws| !self.is_workspace_bound(screen, *ws))
                .or_else(|| self.first_unbound_workspace(screen))
                .ok_or(LatticeError::WorkspaceExhausted { screen })?;
            self.ensure_workspace(screen, ws);
            self.bind(id, ws);
        }

        if let Some(s) = self.screens.get_mut(screen) {
            s.regions = placed.iter().map(|(id, _)| *id).collect();
        }
        self.release_pool(screen);
        self.update_usable_areas(screen);

        for (id, _) in &placed {
            let Some(region) = self.regions.get(*id) else {
                continue;
            };
            let action = match region.sink {
                Some(sink) => DisplayAction::ConfigureRegionWindows {
                    sink: Some(sink),
                    g: region.g,
                    bar: region.bar.zip(region.bar_geometry),
                },
                None => DisplayAction::CreateRegionWindows {
                    region: *id,
                    g: region.g,
                    bar: region.bar_geometry,
                },
            };
            self.actions.push_back(action);
        }
        tracing::debug!("screen {screen} now has {} regions", placed.len());

        self.repair_focus_after_topology(screen);
        Ok(())
    }

    fn retire_region(&mut self, screen: ScreenIndex, id: RegionId) {
        let Some(region) = self.regions.get_mut(id) else {
            return;
        };
        let ws = region.workspace.take();
        if ws.is_some() {
            region.prior_workspace = ws;
        }
        if let Some(workspace) = ws.and_then(|ws| self.workspace_mut(screen, ws)) {
            workspace.region = None;
            workspace.restack_needed = true;
        }
        if let Some(s) = self.screens.get_mut(screen) {
            s.pool.push(id);
        }
    }

    fn take_pooled_region(&mut self, screen: ScreenIndex, g: &Xyhw) -> Option<RegionId> {
        let pool = &self.screens.get(screen)?.pool;
        let rect = |id: &RegionId| self.regions.get(*id).map(|r| r.g);
        let pos = pool
            .iter()
            .position(|id| rect(id) == Some(*g))
            .or_else(|| {
                pool.iter()
                    .position(|id| rect(id).is_some_and(|r| r.same_size(g)))
            })
            .or_else(|| {
                pool.iter()
                    .position(|id| rect(id).is_some_and(|r| r.transposed().same_size(g)))
            })?;
        self.screens.get_mut(screen).map(|s| s.pool.remove(pos))
    }

    /// Pooled regions keep their identity for a later reuse, but not their windows.
    fn release_pool(&mut self, screen: ScreenIndex) {
        let Some(pool) = self.screens.get(screen).map(|s| s.pool.clone()) else {
            return;
        };
        for id in pool {
            let Some(region) = self.regions.get_mut(id) else {
                continue;
            };
            let sink = region.sink.take();
            let bar = region.bar.take();
            region.bar_geometry = None;
            if sink.is_some() || bar.is_some() {
                self.actions
                    .push_back(DisplayAction::DestroyRegionWindows { sink, bar });
            }
        }
    }

    fn repair_focus_after_topology(&mut self, screen: ScreenIndex) {
        let live = self.focused_region.is_some_and(|r| {
            self.screens
                .iter()
                .any(|s| s.regions.contains(&r))
        });
        if !live {
            let (x, y) = self.pointer;
            let region = self
                .region_at(x, y)
                .filter(|r| self.regions.get(*r).is_some_and(|r| r.screen == screen))
                .or_else(|| self.screens.get(screen)?.regions.first().copied());
            self.focused_region = None;
            if let Some(region) = region {
                self.focus_region(region);
            }
            return;
        }
        let stale = self
            .screens
            .get(screen)
            .and_then(|s| s.focus)
            .is_some_and(|f| !self.is_window_visible(f));
        if stale {
            self.unfocus(screen);
            if let Some(region) = self.focused_region {
                self.focus_region(region);
            }
        }
    }

    fn is_workspace_bound(&self, screen: ScreenIndex, ws: WorkspaceIndex) -> bool {
        self.workspace(screen, ws).is_some_and(|w| w.region.is_some())
    }

    fn first_unbound_workspace(&self, screen: ScreenIndex) -> Option<WorkspaceIndex> {
        let limit = self.screens.get(screen)?.workspace_limit();
        (0..limit).find(|ws| !self.is_workspace_bound(screen, *ws))
    }

    /// Links a region and a workspace, first breaking any binding either side had.
    pub fn bind(&mut self, region: RegionId, ws: WorkspaceIndex) {
        let Some(r) = self.regions.get_mut(region) else {
            return;
        };
        let screen = r.screen;
        let old_ws = r.workspace.replace(ws);
        if let Some(old) = old_ws.filter(|old| *old != ws) {
            if let Some(workspace) = self.workspace_mut(screen, old) {
                workspace.region = None;
                workspace.restack_needed = true;
            }
        }
        let Some(workspace) = self.ensure_workspace(screen, ws) else {
            if let Some(r) = self.regions.get_mut(region) {
                r.workspace = None;
            }
            return;
        };
        let old_region = workspace.region.replace(region);
        workspace.restack_needed = true;
        if let Some(other) = old_region.filter(|o| *o != region) {
            if let Some(other) = self.regions.get_mut(other) {
                other.workspace = None;
            }
        }
    }

    /// Shows `ws` in `region`. A workspace already visible in another region trades places
    /// with the one `region` was showing.
    pub fn switch(&mut self, region: RegionId, ws: WorkspaceIndex) -> bool {
        let Some(r) = self.regions.get(region) else {
            return false;
        };
        let screen = r.screen;
        let current = r.workspace;
        if current == Some(ws) {
            return false;
        }
        if self.ensure_workspace(screen, ws).is_none() {
            tracing::debug!("workspace {ws} is out of range");
            return false;
        }
        let other = self
            .workspace(screen, ws)
            .and_then(|w| w.region)
            .filter(|o| *o != region);

        self.bind(region, ws);
        if let Some(other) = other {
            match current {
                Some(current) => self.bind(other, current),
                None => {
                    if let Some(o) = self.regions.get_mut(other) {
                        o.workspace = None;
                    }
                }
            }
        }
        if let Some(r) = self.regions.get_mut(region) {
            r.prior_workspace = current;
        }

        let screen_focus_lost = self
            .screens
            .get(screen)
            .and_then(|s| s.focus)
            .is_some_and(|f| !self.is_window_visible(f));
        if screen_focus_lost {
            self.unfocus(screen);
        }
        let had_focus = self.focused_region == Some(region);
        if had_focus || other.is_some_and(|o| self.focused_region == Some(o)) {
            self.focused_region = None;
            self.focus_region(region);
        }
        self.actions.push_back(DisplayAction::SetCurrentDesktop(ws));
        true
    }

    /// Sends a window, with its transients, to another workspace of its screen.
    pub fn move_window_to_workspace(&mut self, id: WindowId, ws: WorkspaceIndex) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let main = window.main;
        let screen = window.screen();
        let Some(from) = window.workspace else {
            return false;
        };
        if from == ws || self.ensure_workspace(screen, ws).is_none() {
            return false;
        }

        let was_focused = self
            .focused_window()
            .is_some_and(|f| self.windows.related(f, main));
        let replacement = if was_focused {
            self.replacement_on_removal(main)
                .filter(|r| !self.windows.related(*r, main))
        } else {
            None
        };

        let mut group = vec![main];
        group.extend(self.windows.transients_of(main));
        for member in group {
            let Some(window) = self.windows.get_mut(member) else {
                continue;
            };
            if window.workspace != Some(from) {
                continue;
            }
            window.workspace = Some(ws);
            let handle = window.handle;
            if let Some(old) = self.workspace_mut(screen, from) {
                old.forget(member);
            }
            if let Some(new) = self.workspace_mut(screen, ws) {
                new.windows.push(member);
                new.restack_needed = true;
            }
            self.actions
                .push_back(DisplayAction::SetWindowWorkspace(handle, Some(ws)));
        }

        if was_focused && !self.is_window_visible(main) {
            match replacement {
                Some(replacement) => {
                    self.focus_window(replacement);
                }
                None => self.unfocus(screen),
            }
        }
        true
    }

    /// Shows the next (`delta` 1) or previous (`delta` -1) workspace in the focused region.
    /// Workspaces visible elsewhere are skipped, and so are empty ones when configured.
    pub fn cycle_workspace(&mut self, delta: isize) -> bool {
        let Some(region) = self.focused_region else {
            return false;
        };
        let Some((screen, current)) = self.focused_workspace() else {
            return false;
        };
        let Some(limit) = self.screens.get(screen).map(Screen::workspace_limit) else {
            return false;
        };
        let skip_empty = self.config.cycle_skip_empty();
        let mut candidate = current;
        for _ in 1..limit {
            candidate = wrap_index(candidate, delta, limit);
            let workspace = self.workspace(screen, candidate);
            if workspace.is_some_and(|w| w.region.is_some_and(|r| r != region)) {
                continue;
            }
            if skip_empty && workspace.map_or(true, |w| w.windows.is_empty()) {
                continue;
            }
            return self.switch(region, candidate);
        }
        false
    }

    /// Goes back to the workspace the focused region showed before.
    pub fn workspace_prior(&mut self) -> bool {
        let Some(region) = self.focused_region else {
            return false;
        };
        match self.regions.get(region).and_then(|r| r.prior_workspace) {
            Some(prior) => self.switch(region, prior),
            None => false,
        }
    }

    /// Focuses the next or previous region of the focused screen and moves the pointer there.
    pub fn focus_region_cycle(&mut self, delta: isize) -> bool {
        let Some(screen) = self.focused_screen() else {
            return false;
        };
        let Some(regions) = self.screens.get(screen).map(|s| s.regions.clone()) else {
            return false;
        };
        if regions.len() < 2 {
            return false;
        }
        let pos = self
            .focused_region
            .and_then(|f| regions.iter().position(|r| *r == f))
            .unwrap_or(0);
        let next = regions[wrap_index(pos, delta, regions.len())];
        let Some((x, y)) = self.regions.get(next).map(|r| r.g.center()) else {
            return false;
        };
        self.actions.push_back(DisplayAction::WarpPointer(x, y));
        self.pointer = (x, y);
        self.focus_region(next)
    }

    /// Recomputes the usable area of every region of a screen from the dock struts, the bar
    /// and the padding.
    pub fn update_usable_areas(&mut self, screen: ScreenIndex) {
        let Some(s) = self.screens.get(screen) else {
            return;
        };
        let root = s.g;
        let struts: Vec<Strut> = s
            .sticky
            .iter()
            .filter_map(|id| self.windows.get(*id))
            .filter_map(|w| w.strut)
            .filter(|strut| !strut.is_empty())
            .collect();
        let regions = s.regions.clone();
        let bar = (self.config.bar_enabled() && self.config.bar_height() > 0)
            .then(|| (self.config.bar_height(), self.config.bar_position()));
        let bar_visible = self.bar_visible;
        let padding = self.config.region_padding();

        for id in regions {
            let Some(region) = self.regions.get_mut(id) else {
                continue;
            };
            let before = (region.usable, region.bar_geometry);
            region.update_usable(bar, bar_visible, padding, |g| {
                struts.iter().fold(g, |area, strut| strut.trim(area, &root))
            });
            if before == (region.usable, region.bar_geometry) {
                continue;
            }
            let ws = region.workspace;
            if region.sink.is_some() {
                let action = DisplayAction::ConfigureRegionWindows {
                    sink: region.sink,
                    g: region.g,
                    bar: region.bar.zip(region.bar_geometry),
                };
                self.actions.push_back(action);
            }
            if let Some(workspace) = ws.and_then(|ws| self.workspace_mut(screen, ws)) {
                workspace.restack_needed = true;
            }
        }
    }

    /// The display server created the input sink and bar of a region.
    pub fn region_windows_created(
        &mut self,
        region: RegionId,
        sink: WindowHandle,
        bar: Option<WindowHandle>,
    ) -> bool {
        let live = self
            .regions
            .get(region)
            .is_some_and(|r| self.screens.get(r.screen).is_some_and(|s| s.regions.contains(&region)));
        if !live {
            // Retired before the display server answered.
            self.actions.push_back(DisplayAction::DestroyRegionWindows {
                sink: Some(sink),
                bar,
            });
            return false;
        }
        let bar_visible = self.bar_visible;
        if let Some(r) = self.regions.get_mut(region) {
            r.sink = Some(sink);
            r.bar = bar;
            if let Some(bar) = bar {
                self.actions.push_back(DisplayAction::ShowBar(bar, bar_visible));
            }
            if let Some(ws) = r.workspace {
                let screen = r.screen;
                if let Some(workspace) = self.workspace_mut(screen, ws) {
                    workspace.restack_needed = true;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::WindowInfo;

    fn outputs(rects: &[Xyhw]) -> DisplayEvent {
        DisplayEvent::OutputsChanged(0, rects.iter().map(|g| (*g, Rotation::Normal)).collect())
    }

    fn assert_bijective(state: &State<TestConfig>) {
        for region in &state.screens[0].regions {
            let ws = state.regions[*region].workspace.unwrap();
            assert_eq!(state.workspace(0, ws).unwrap().region, Some(*region));
        }
        for ws in state.screens[0].workspaces() {
            if let Some(region) = ws.region {
                assert_eq!(state.regions[region].workspace, Some(ws.idx));
                assert!(state.screens[0].regions.contains(&region));
            }
        }
    }

    const LEFT: Xyhw = Xyhw::new(0, 0, 1000, 800);
    const RIGHT: Xyhw = Xyhw::new(1000, 0, 1000, 800);

    #[test]
    fn binding_stays_bijective_across_reconfiguration() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT, RIGHT]);
        assert_bijective(&manager.state);
        manager.feed(outputs(&[LEFT]));
        assert_bijective(&manager.state);
        manager.feed(outputs(&[LEFT, RIGHT]));
        assert_bijective(&manager.state);
        assert_eq!(manager.state.screens[0].regions.len(), 2);
    }

    #[test]
    fn removing_an_output_unbinds_its_workspace_and_unmaps_windows() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT, RIGHT]);
        let id = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(7),
                    ..WindowInfo::default()
                },
                1500,
                100,
            )
            .unwrap();
        manager.run_pending();
        let ws = manager.state.windows.get(id).unwrap().workspace.unwrap();
        assert!(manager.state.windows.get(id).unwrap().mapped);

        manager.feed(outputs(&[LEFT]));

        assert_eq!(manager.state.workspace(0, ws).unwrap().region, None);
        assert_eq!(manager.state.workspace(0, ws).unwrap().windows, vec![id]);
        assert!(!manager.state.windows.get(id).unwrap().mapped);
        assert_eq!(manager.state.windows.get(id).unwrap().workspace, Some(ws));
    }

    #[test]
    fn regions_are_reused_by_geometry() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT, RIGHT]);
        let before = manager.state.screens[0].regions.clone();
        let right_ws = manager.state.regions[before[1]].workspace;

        manager.feed(outputs(&[RIGHT, LEFT]));
        let after = &manager.state.screens[0].regions;
        assert_eq!(after[0], before[1]);
        assert_eq!(after[1], before[0]);
        assert_eq!(manager.state.regions[after[0]].workspace, right_ws);
    }

    #[test]
    fn rotated_output_reuses_the_transposed_region() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT]);
        let region = manager.state.screens[0].regions[0];
        let ws = manager.state.regions[region].workspace;
        manager.events.push_back(DisplayEvent::OutputsChanged(
            0,
            vec![(Xyhw::new(0, 0, 800, 1000), Rotation::Left)],
        ));
        manager.run_pending();
        assert_eq!(manager.state.screens[0].regions, vec![region]);
        assert_eq!(manager.state.regions[region].workspace, ws);
        assert_eq!(manager.state.regions[region].rotation, Rotation::Left);
    }

    #[test]
    fn more_outputs_than_workspaces_is_fatal() {
        let mut manager = Manager::new_test(TestConfig {
            workspace_limit: 1,
            ..TestConfig::default()
        });
        manager
            .state
            .screen_create(WindowHandle(1), Xyhw::new(0, 0, 2000, 800))
            .unwrap();
        let result = manager.state.reconcile_outputs(
            0,
            vec![(LEFT, Rotation::Normal), (RIGHT, Rotation::Normal)],
        );
        assert!(matches!(
            result,
            Err(LatticeError::WorkspaceExhausted { screen: 0 })
        ));
    }

    #[test]
    fn switching_to_a_visible_workspace_swaps_regions() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT, RIGHT]);
        let regions = manager.state.screens[0].regions.clone();
        let left_ws = manager.state.regions[regions[0]].workspace.unwrap();
        let right_ws = manager.state.regions[regions[1]].workspace.unwrap();

        assert!(manager.state.switch(regions[0], right_ws));
        assert_eq!(manager.state.regions[regions[0]].workspace, Some(right_ws));
        assert_eq!(manager.state.regions[regions[1]].workspace, Some(left_ws));
        assert_eq!(manager.state.regions[regions[0]].prior_workspace, Some(left_ws));
        assert_bijective(&manager.state);
    }

    #[test]
    fn cycling_skips_workspaces_shown_elsewhere() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT, RIGHT]);
        let region = manager.state.screens[0].regions[0];
        manager.state.focus_region(region);
        assert_eq!(manager.state.regions[region].workspace, Some(0));
        assert!(manager.state.cycle_workspace(1));
        assert_eq!(manager.state.regions[region].workspace, Some(2));
        assert!(manager.state.cycle_workspace(-1));
        assert_eq!(manager.state.regions[region].workspace, Some(0));
        assert!(manager.state.workspace_prior());
        assert_eq!(manager.state.regions[region].workspace, Some(2));
    }

    #[test]
    fn moving_a_window_takes_its_transients_along() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT]);
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
        assert!(manager.state.move_window_to_workspace(main, 4));
        assert_eq!(manager.state.windows.get(dialog).unwrap().workspace, Some(4));
        assert_eq!(manager.state.workspace(0, 4).unwrap().windows, vec![main, dialog]);
        assert!(manager.state.workspace(0, 0).unwrap().windows.is_empty());
        assert_eq!(manager.state.focused_window(), None);
    }

    #[test]
    fn dock_struts_shrink_the_usable_area() {
        let mut manager = Manager::new_test_with_outputs(vec![LEFT]);
        manager.state.manage(
            WindowInfo {
                handle: WindowHandle(3),
                r#type: crate::models::WindowType::Dock,
                strut: Some(Strut::full_edges(0, 0, 30, 0, &LEFT)),
                ..WindowInfo::default()
            },
            0,
            0,
        );
        let region = manager.state.screens[0].regions[0];
        assert_eq!(manager.state.regions[region].usable, Xyhw::new(0, 30, 1000, 770));
    }
}
