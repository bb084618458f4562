#![allow(clippy::wildcard_imports)]

use super::*;
use crate::models::dto::BarStatus;

impl<C: Config> State<C> {
    /// What the bar of `region` should show right now.
    pub fn bar_status(&self, region: RegionId) -> Option<BarStatus> {
        let region = self.regions.get(region)?;
        let ws = region.workspace?;
        let workspace = self.workspace(region.screen, ws)?;
        let focus = self
            .screens
            .get(region.screen)?
            .focus
            .filter(|id| workspace.contains(*id));
        let urgent = self.screens[region.screen]
            .workspaces()
            .filter(|other| other.idx != ws)
            .filter(|other| {
                other.windows.iter().any(|id| {
                    self.windows
                        .get(*id)
                        .is_some_and(|w| w.flags.contains(WindowFlags::DEMANDS_ATTENTION))
                })
            })
            .map(|other| other.display_name())
            .collect();
        Some(BarStatus {
            workspace: ws,
            workspace_name: workspace.display_name(),
            layout: workspace.layout.symbol().to_owned(),
            windows: workspace.windows.len(),
            title: focus
                .and_then(|id| self.windows.get(id))
                .and_then(|w| w.name.clone()),
            urgent,
            exceptions: self.startup_exceptions.clone(),
        })
    }

    /// Queues a redraw of every bar.
    pub fn update_bars(&mut self) {
        if !self.bar_visible {
            return;
        }
        let bars: Vec<(WindowHandle, RegionId)> = self
            .screens
            .iter()
            .flat_map(|s| s.regions.iter())
            .filter_map(|id| Some((self.regions.get(*id)?.bar?, *id)))
            .collect();
        for (bar, region) in bars {
            if let Some(status) = self.bar_status(region) {
                self.actions.push_back(DisplayAction::UpdateBar(bar, status));
            }
        }
    }

    /// Shows or hides the bars of every region; the usable areas follow.
    pub fn bar_toggle(&mut self) -> bool {
        if !self.config.bar_enabled() {
            return false;
        }
        self.bar_visible = !self.bar_visible;
        let visible = self.bar_visible;
        let bars: Vec<WindowHandle> = self
            .regions
            .values()
            .filter_map(|r| r.bar)
            .collect();
        for bar in bars {
            self.actions.push_back(DisplayAction::ShowBar(bar, visible));
        }
        for screen in 0..self.screens.len() {
            self.update_usable_areas(screen);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 800);

    fn with_bar() -> Manager<TestConfig, crate::display_servers::MockDisplayServer> {
        Manager::new_test_with_config(
            TestConfig {
                bar_height: 20,
                ..TestConfig::default()
            },
            vec![SCREEN],
        )
    }

    #[test]
    fn status_reports_focus_and_urgency_elsewhere() {
        let mut manager = with_bar();
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.windows.get_mut(a).unwrap().name = Some("editor".to_owned());
        manager.state.move_window_to_workspace(b, 2);
        manager.state.focus_window(a);
        manager
            .state
            .set_flag(b, WindowFlags::DEMANDS_ATTENTION, crate::StateAction::Add);

        let region = manager.state.focused_region.unwrap();
        let status = manager.state.bar_status(region).unwrap();
        assert_eq!(status.workspace, 0);
        assert_eq!(status.windows, 1);
        assert_eq!(status.title.as_deref(), Some("editor"));
        assert_eq!(status.urgent, vec!["3".to_owned()]);
    }

    #[test]
    fn toggling_the_bar_gives_its_space_back() {
        let mut manager = with_bar();
        let region = manager.state.focused_region.unwrap();
        assert_eq!(manager.state.regions[region].usable, Xyhw::new(0, 20, 1000, 780));
        assert!(manager.state.bar_toggle());
        assert_eq!(manager.state.regions[region].usable, SCREEN);
        assert_eq!(
            manager.state.regions[region].bar_geometry,
            Some(Xyhw::new(0, 0, 1000, 20))
        );
        assert!(manager.state.bar_toggle());
        assert_eq!(manager.state.regions[region].usable, Xyhw::new(0, 20, 1000, 780));
    }

    #[test]
    fn refresh_redraws_every_bar() {
        let mut manager = with_bar();
        manager.manage_test_window(1);
        manager.run_pending();
        assert!(manager
            .display_server
            .executed
            .iter()
            .any(|a| matches!(a, DisplayAction::UpdateBar(_, status) if status.windows == 1)));
    }

    #[test]
    fn startup_exceptions_reach_the_bar() {
        let mut manager = with_bar();
        manager.add_startup_exceptions(["bad keybind".to_owned()]);
        let region = manager.state.focused_region.unwrap();
        let status = manager.state.bar_status(region).unwrap();
        assert_eq!(status.exceptions, vec!["bad keybind".to_owned()]);
    }
}
