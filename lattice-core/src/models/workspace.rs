use super::{RegionId, WindowId, WorkspaceIndex};
use crate::layouts::{Layout, LayoutTuning};
use serde::{Deserialize, Serialize};

/// A virtual desktop.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Workspace {
    pub idx: WorkspaceIndex,
    pub name: Option<String>,
    /// Member windows in tiling order.
    pub windows: Vec<WindowId>,
    pub layout: Layout,
    pub prev_layout: Layout,
    tunings: [LayoutTuning; Layout::COUNT],
    /// The region showing this workspace. Kept in sync with `Region::workspace`.
    pub region: Option<RegionId>,
    pub focus: Option<WindowId>,
    pub focus_prev: Option<WindowId>,
    /// Window temporarily put into the forced-raised layer.
    pub focus_raise: Option<WindowId>,
    pub restack_needed: bool,
}

impl Workspace {
    #[must_use]
    pub fn new(idx: WorkspaceIndex, name: Option<String>, layout: Layout, tuning: LayoutTuning) -> Self {
        Self {
            idx,
            name,
            windows: vec![],
            layout,
            prev_layout: layout,
            tunings: [tuning; Layout::COUNT],
            region: None,
            focus: None,
            focus_prev: None,
            focus_raise: None,
            restack_needed: true,
        }
    }

    #[must_use]
    pub const fn tuning(&self) -> &LayoutTuning {
        &self.tunings[self.layout as usize]
    }

    pub fn tuning_mut(&mut self) -> &mut LayoutTuning {
        &mut self.tunings[self.layout as usize]
    }

    /// Switches layout, remembering the current one so it can be restored.
    pub fn set_layout(&mut self, layout: Layout) -> bool {
        if self.layout == layout {
            return false;
        }
        self.prev_layout = self.layout;
        self.layout = layout;
        self.restack_needed = true;
        true
    }

    pub fn restore_layout(&mut self) -> bool {
        let prev = self.prev_layout;
        self.set_layout(prev)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.region.is_some()
    }

    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains(&id)
    }

    /// Drops `id` from the member list and every focus field.
    pub fn forget(&mut self, id: WindowId) {
        self.windows.retain(|w| *w != id);
        if self.focus == Some(id) {
            self.focus = None;
        }
        if self.focus_prev == Some(id) {
            self.focus_prev = None;
        }
        if self.focus_raise == Some(id) {
            self.focus_raise = None;
        }
        self.restack_needed = true;
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| (self.idx + 1).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_switch_remembers_previous_and_keeps_tunings_apart() {
        let mut ws = Workspace::new(0, None, Layout::Vertical, LayoutTuning::default());
        ws.tuning_mut().master_count = 3;
        assert!(ws.set_layout(Layout::Horizontal));
        assert_eq!(ws.tuning().master_count, 1);
        assert!(ws.restore_layout());
        assert_eq!(ws.layout, Layout::Vertical);
        assert_eq!(ws.tuning().master_count, 3);
    }

    #[test]
    fn display_name_defaults_to_one_based_index() {
        let ws = Workspace::new(4, None, Layout::Vertical, LayoutTuning::default());
        assert_eq!(ws.display_name(), "5");
    }
}
