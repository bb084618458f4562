//! The model every handler mutates.
use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::models::{
    Mode, Region, RegionId, Screen, ScreenIndex, WindowHandle, WindowId, Workspace,
    WorkspaceIndex,
};
use crate::registry::WindowRegistry;
use slotmap::SlotMap;
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub struct State<C> {
    pub config: C,
    pub screens: Vec<Screen>,
    /// Every region, live or pooled.
    pub regions: SlotMap<RegionId, Region>,
    pub windows: WindowRegistry,
    pub mode: Mode,
    pub actions: VecDeque<DisplayAction>,
    /// Workspace each spawned process was started from.
    pub pid_workspaces: HashMap<u32, WorkspaceIndex>,
    /// Problems found while loading the configuration, shown on the bar.
    pub startup_exceptions: Vec<String>,
    pub focused_region: Option<RegionId>,
    /// Last pointer position reported by the display server.
    pub pointer: (i32, i32),
    pub bar_visible: bool,
}

impl<C: Config> State<C> {
    pub(crate) fn new(config: C) -> Self {
        let bar_visible = config.bar_enabled();
        Self {
            config,
            screens: Default::default(),
            regions: SlotMap::with_key(),
            windows: WindowRegistry::new(),
            mode: Mode::default(),
            actions: Default::default(),
            pid_workspaces: Default::default(),
            startup_exceptions: Default::default(),
            focused_region: None,
            pointer: (0, 0),
            bar_visible,
        }
    }

    /// The screen owning the focused region.
    #[must_use]
    pub fn focused_screen(&self) -> Option<ScreenIndex> {
        self.focused_region
            .and_then(|r| self.regions.get(r))
            .map(|r| r.screen)
            .or_else(|| (!self.screens.is_empty()).then_some(0))
    }

    /// The workspace shown by the focused region.
    #[must_use]
    pub fn focused_workspace(&self) -> Option<(ScreenIndex, WorkspaceIndex)> {
        let region = self.regions.get(self.focused_region?)?;
        Some((region.screen, region.workspace?))
    }

    #[must_use]
    pub fn focused_window(&self) -> Option<WindowId> {
        let screen = self.screens.get(self.focused_screen()?)?;
        screen.focus.filter(|id| self.windows.contains(*id))
    }

    #[must_use]
    pub fn workspace(&self, screen: ScreenIndex, ws: WorkspaceIndex) -> Option<&Workspace> {
        self.screens.get(screen)?.workspace(ws)
    }

    pub fn workspace_mut(&mut self, screen: ScreenIndex, ws: WorkspaceIndex) -> Option<&mut Workspace> {
        self.screens.get_mut(screen)?.workspace_mut(ws)
    }

    /// Returns the workspace, creating it on first reference.
    pub fn ensure_workspace(
        &mut self,
        screen: ScreenIndex,
        ws: WorkspaceIndex,
    ) -> Option<&mut Workspace> {
        let name = self.config.workspace_name(ws);
        let layout = self.config.default_layout();
        let tuning = self.config.default_tuning();
        self.screens
            .get_mut(screen)?
            .workspace_or_create(ws, |idx| Workspace::new(idx, name, layout, tuning))
    }

    /// The live region containing a point.
    #[must_use]
    pub fn region_at(&self, x: i32, y: i32) -> Option<RegionId> {
        self.screens
            .iter()
            .flat_map(|s| s.regions.iter())
            .copied()
            .find(|r| self.regions.get(*r).is_some_and(|r| r.g.contains_point(x, y)))
    }

    #[must_use]
    pub fn screen_at(&self, x: i32, y: i32) -> Option<ScreenIndex> {
        self.screens
            .iter()
            .position(|s| s.g.contains_point(x, y))
            .or_else(|| (!self.screens.is_empty()).then_some(0))
    }

    #[must_use]
    pub fn screen_by_root(&self, root: WindowHandle) -> Option<ScreenIndex> {
        self.screens.iter().position(|s| s.root == root)
    }

    /// The region showing the workspace of a window.
    #[must_use]
    pub fn window_region(&self, id: WindowId) -> Option<RegionId> {
        let window = self.windows.get(id)?;
        self.workspace(window.screen(), window.workspace?)?.region
    }

    /// True if the window belongs to a workspace that is on screen.
    #[must_use]
    pub fn is_window_visible(&self, id: WindowId) -> bool {
        self.window_region(id).is_some()
    }

    /// Queues the EWMH desktop properties and the client list.
    pub fn update_desktop_hints(&mut self) {
        let limit = self.config.workspace_limit();
        let names = (0..limit)
            .map(|idx| {
                self.config
                    .workspace_name(idx)
                    .unwrap_or_else(|| (idx + 1).to_string())
            })
            .collect();
        self.actions
            .push_back(DisplayAction::SetNumberOfDesktops(limit));
        self.actions.push_back(DisplayAction::SetDesktopNames(names));
        if let Some((_, ws)) = self.focused_workspace() {
            self.actions.push_back(DisplayAction::SetCurrentDesktop(ws));
        }
        let clients = self.windows.iter().map(|w| w.handle).collect();
        self.actions.push_back(DisplayAction::SetClientList(clients));
    }
}
