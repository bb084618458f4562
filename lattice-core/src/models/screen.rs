use super::{RegionId, ScreenIndex, WindowHandle, WindowId, Workspace, WorkspaceIndex, Xyhw};
use crate::stacking::Stackable;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One per X screen (root window).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Screen {
    pub idx: ScreenIndex,
    pub root: WindowHandle,
    /// Geometry of the root window.
    pub g: Xyhw,
    /// Live regions, in output order.
    pub regions: Vec<RegionId>,
    /// Retired regions waiting to be recycled.
    pub pool: Vec<RegionId>,
    workspaces: Vec<Option<Workspace>>,
    pub focus: Option<WindowId>,
    /// Most recently focused first.
    pub focus_history: VecDeque<WindowId>,
    /// Most recently raised first. Orders every layer but the tiled one.
    pub priority: Vec<WindowId>,
    /// Bottom to top order last pushed to the display server.
    pub stack: Vec<Stackable>,
    /// Docks, desktops and other windows that do not belong to a workspace.
    pub sticky: Vec<WindowId>,
    pub max_updates_per_sec: u32,
}

impl Screen {
    #[must_use]
    pub fn new(idx: ScreenIndex, root: WindowHandle, g: Xyhw, workspace_limit: usize) -> Self {
        Self {
            idx,
            root,
            g,
            regions: vec![],
            pool: vec![],
            workspaces: (0..workspace_limit).map(|_| None).collect(),
            focus: None,
            focus_history: VecDeque::new(),
            priority: vec![],
            stack: vec![],
            sticky: vec![],
            max_updates_per_sec: 0,
        }
    }

    #[must_use]
    pub fn workspace_limit(&self) -> usize {
        self.workspaces.len()
    }

    #[must_use]
    pub fn workspace(&self, idx: WorkspaceIndex) -> Option<&Workspace> {
        self.workspaces.get(idx)?.as_ref()
    }

    pub fn workspace_mut(&mut self, idx: WorkspaceIndex) -> Option<&mut Workspace> {
        self.workspaces.get_mut(idx)?.as_mut()
    }

    /// Returns the workspace, creating it with `create` on first reference.
    /// `None` if `idx` is beyond the workspace limit.
    pub fn workspace_or_create(
        &mut self,
        idx: WorkspaceIndex,
        create: impl FnOnce(WorkspaceIndex) -> Workspace,
    ) -> Option<&mut Workspace> {
        let slot = self.workspaces.get_mut(idx)?;
        Some(slot.get_or_insert_with(|| create(idx)))
    }

    /// Workspaces created so far, in index order.
    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.workspaces.iter().flatten()
    }

    pub fn workspaces_mut(&mut self) -> impl Iterator<Item = &mut Workspace> {
        self.workspaces.iter_mut().flatten()
    }

    /// Adds `id` to the front of the recency list, bounded by `limit` entries.
    pub fn push_focus_history(&mut self, id: WindowId, limit: usize) {
        self.focus_history.retain(|w| *w != id);
        self.focus_history.push_front(id);
        self.focus_history.truncate(limit.max(1));
    }

    /// Drops every reference to `id` held directly by the screen.
    pub fn forget(&mut self, id: WindowId) {
        if self.focus == Some(id) {
            self.focus = None;
        }
        self.focus_history.retain(|w| *w != id);
        self.priority.retain(|w| *w != id);
        self.sticky.retain(|w| *w != id);
        self.stack
            .retain(|s| !matches!(s, Stackable::Window(w, _) if *w == id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::{Layout, LayoutTuning};

    #[test]
    fn workspaces_are_created_lazily_up_to_the_limit() {
        let mut screen = Screen::new(0, WindowHandle(1), Xyhw::new(0, 0, 10, 10), 3);
        assert!(screen.workspace(2).is_none());
        let create = |idx| Workspace::new(idx, None, Layout::Vertical, LayoutTuning::default());
        assert!(screen.workspace_or_create(2, create).is_some());
        assert!(screen.workspace(2).is_some());
        assert!(screen.workspace_or_create(3, create).is_none());
        assert_eq!(screen.workspaces().count(), 1);
    }
}
