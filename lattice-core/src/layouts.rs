//! Tiling and floating geometry.
mod floating;
mod master_stack;
mod max_stack;

use crate::config::Config;
use crate::models::{
    Quirks, RegionId, ScreenIndex, Window, WindowFlags, WindowId, WorkspaceIndex, Xyhw,
};
use crate::state::State;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use floating::{contain, softness_for, FloatGeometry, Gravity};

/// Smallest step of the master/stack split.
pub const RATIO_UNITS: u8 = 32;

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Master column with stack columns beside it.
    #[default]
    Vertical,
    /// Master row with stack rows below it.
    Horizontal,
    /// The focused tiled window fills the region.
    MaxStack,
    /// Every window keeps its own geometry.
    Floating,
}

impl Layout {
    pub const COUNT: usize = 4;

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::MaxStack,
            Self::MaxStack => Self::Floating,
            Self::Floating => Self::Vertical,
        }
    }

    /// Short marker for the bar.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Vertical => "[|]",
            Self::Horizontal => "[-]",
            Self::MaxStack => "[ ]",
            Self::Floating => "[~]",
        }
    }
}

#[derive(Debug, Error)]
#[error("Could not parse layout: {0}")]
pub struct ParseLayoutError(String);

impl FromStr for Layout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            "max" | "maxstack" | "max_stack" => Ok(Self::MaxStack),
            "floating" => Ok(Self::Floating),
            _ => Err(ParseLayoutError(s.to_string())),
        }
    }
}

/// Per-layout tuning of the master/stack split.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutTuning {
    pub master_count: usize,
    /// Share of the master area in 1/32 units.
    pub master_ratio: u8,
    pub stack_count: usize,
    /// Put the master area on the trailing edge.
    pub flip: bool,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            master_count: 1,
            master_ratio: RATIO_UNITS / 2,
            stack_count: 1,
            flip: false,
        }
    }
}

impl LayoutTuning {
    pub fn grow_master(&mut self, steps: i8) {
        let ratio = i16::from(self.master_ratio) + i16::from(steps);
        self.master_ratio = ratio.clamp(1, i16::from(RATIO_UNITS) - 1) as u8;
    }

    pub fn add_master(&mut self, delta: isize) {
        self.master_count = self.master_count.saturating_add_signed(delta);
    }

    pub fn add_stack(&mut self, delta: isize) {
        self.stack_count = self.stack_count.saturating_add_signed(delta).max(1);
    }
}

impl<C: Config> State<C> {
    /// Recomputes the geometry and visibility of every window of every workspace.
    pub fn arrange_all(&mut self) {
        for screen in 0..self.screens.len() {
            let indices: Vec<WorkspaceIndex> =
                self.screens[screen].workspaces().map(|ws| ws.idx).collect();
            for ws in indices {
                self.arrange_workspace(screen, ws);
            }
            self.arrange_sticky(screen);
        }
    }

    /// Runs the layout of one workspace. Calling it twice without a model change in between
    /// gives the same geometry both times.
    pub fn arrange_workspace(&mut self, screen: ScreenIndex, ws: WorkspaceIndex) {
        let Some(workspace) = self.screens.get(screen).and_then(|s| s.workspace(ws)) else {
            return;
        };
        let members = workspace.windows.clone();
        let layout = workspace.layout;
        let tuning = *workspace.tuning();

        let Some(region) = workspace.region.and_then(|r| self.regions.get(r)) else {
            for id in members {
                if let Some(window) = self.windows.get_mut(id) {
                    window.mapped = false;
                }
            }
            return;
        };
        let region_id = region.id;
        let area = region.usable;
        let full = region.g;

        // The window being moved or resized keeps the geometry the pointer gives it.
        let target = self.mode.target().filter(|t| members.contains(t));
        if let Some(window) = target.and_then(|t| self.windows.get_mut(t)) {
            window.mapped = true;
        }
        let members: Vec<WindowId> = members.into_iter().filter(|id| Some(*id) != target).collect();

        let tiled: Vec<WindowId> = if layout == Layout::Floating {
            vec![]
        } else {
            members
                .iter()
                .copied()
                .filter(|id| self.windows.get(*id).is_some_and(Window::is_tiled))
                .collect()
        };

        {
            let mut tiles: Vec<Window> = tiled
                .iter()
                .filter_map(|id| self.windows.get(*id).cloned())
                .collect();
            let mut refs: Vec<&mut Window> = tiles.iter_mut().collect();
            match layout {
                Layout::Vertical => master_stack::update(area, &tuning, false, &mut refs),
                Layout::Horizontal => master_stack::update(area, &tuning, true, &mut refs),
                Layout::MaxStack => max_stack::update(area, &mut refs),
                Layout::Floating => {}
            }
            for tile in tiles {
                if let Some(window) = self.windows.get_mut(tile.id) {
                    window.g = tile.g;
                    window.mapped = true;
                }
            }
        }

        for id in members.iter().filter(|id| !tiled.contains(id)) {
            let Some(window) = self.windows.get(*id) else {
                continue;
            };
            if window.is_hidden() {
                if let Some(window) = self.windows.get_mut(*id) {
                    window.mapped = false;
                }
                continue;
            }
            let g = if window.is_fullscreen() {
                full
            } else if window.is_maximized() {
                maximized(window.flags, window.g, area)
            } else {
                self.place_floating(*id, region_id, area, full)
            };
            if let Some(window) = self.windows.get_mut(*id) {
                window.g = g;
                window.mapped = true;
            }
        }
    }

    fn arrange_sticky(&mut self, screen: ScreenIndex) {
        let sticky = self.screens[screen].sticky.clone();
        for id in sticky {
            if let Some(window) = self.windows.get_mut(id) {
                window.g = window.requested;
                window.mapped = true;
            }
        }
    }

    /// Geometry of a floating window: the stored float geometry if there is one, else its
    /// requested size, centered unless it was positioned by hand.
    fn place_floating(&mut self, id: WindowId, region: RegionId, area: Xyhw, full: Xyhw) -> Xyhw {
        let dialog_ratio = self.config.dialog_ratio();
        let boundary_width = self.config.boundary_width();
        let parent_area = self
            .windows
            .get(id)
            .and_then(|w| w.parent)
            .and_then(|p| self.windows.get(p))
            .and_then(|p| p.workspace.map(|ws| (p.screen(), ws)))
            .and_then(|(screen, ws)| self.screens.get(screen)?.workspace(ws)?.region)
            .and_then(|r| self.regions.get(r))
            .map_or(area, |r| r.usable);

        let Some(window) = self.windows.get_mut(id) else {
            return area;
        };
        let g = if let Some(stored) = window.float_geom {
            stored.load(&full)
        } else {
            let mut g = window.requested;
            if window.is_transient() && window.quirks.contains(Quirks::TRANSSZ) {
                g.set_w((parent_area.w() as f32 * dialog_ratio) as i32);
                g.set_h((parent_area.h() as f32 * dialog_ratio) as i32);
            }
            let anywhere = window.quirks.contains(Quirks::ANYWHERE);
            if !window.flags.contains(WindowFlags::MANUAL) && !anywhere {
                g.center_relative(area, 0);
            }
            let g = contain(g, &area, 0, true);
            window.float_geom = Some(FloatGeometry::store(region, &full, &g));
            g
        };
        let softness = softness_for(&g, boundary_width);
        contain(g, &full, softness, false)
    }
}

fn maximized(flags: WindowFlags, current: Xyhw, area: Xyhw) -> Xyhw {
    let mut g = current;
    if flags.contains(WindowFlags::MAXIMIZED_HORZ) {
        g.set_x(area.x());
        g.set_w(area.w());
    }
    if flags.contains(WindowFlags::MAXIMIZED_VERT) {
        g.set_y(area.y());
        g.set_h(area.h());
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WindowHandle, WindowInfo};
    use crate::Manager;

    #[test]
    fn tuning_ratio_is_clamped() {
        let mut tuning = LayoutTuning::default();
        tuning.grow_master(40);
        assert_eq!(tuning.master_ratio, 31);
        tuning.grow_master(-100);
        assert_eq!(tuning.master_ratio, 1);
    }

    #[test]
    fn stack_count_never_drops_below_one() {
        let mut tuning = LayoutTuning::default();
        tuning.add_stack(-5);
        assert_eq!(tuning.stack_count, 1);
        tuning.add_master(-5);
        assert_eq!(tuning.master_count, 0);
    }

    #[test]
    fn layouts_parse_by_name() {
        assert_eq!("Horizontal".parse::<Layout>().unwrap(), Layout::Horizontal);
        assert_eq!("max".parse::<Layout>().unwrap(), Layout::MaxStack);
        assert!("spiral".parse::<Layout>().is_err());
    }

    #[test]
    fn arranging_twice_gives_identical_geometry() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1920, 1080)]);
        for handle in 1..=5 {
            manager.manage_test_window(handle);
        }
        manager.state.manage(
            WindowInfo {
                handle: WindowHandle(10),
                transient_for: Some(WindowHandle(1)),
                geometry: Xyhw::new(0, 0, 300, 200),
                ..WindowInfo::default()
            },
            0,
            0,
        );
        manager.state.arrange_all();
        let first: Vec<Xyhw> = manager.state.windows.iter().map(|w| w.g).collect();
        manager.state.arrange_all();
        let second: Vec<Xyhw> = manager.state.windows.iter().map(|w| w.g).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn fullscreen_window_covers_the_whole_region() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1920, 1080)]);
        let id = manager.manage_test_window(1);
        manager.state.windows.get_mut(id).unwrap().flags |= WindowFlags::FULLSCREEN;
        manager.state.arrange_all();
        assert_eq!(
            manager.state.windows.get(id).unwrap().g,
            Xyhw::new(0, 0, 1920, 1080)
        );
    }

    #[test]
    fn centered_dialog_lands_in_the_middle_of_the_usable_area() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1000, 1000)]);
        manager.manage_test_window(1);
        let dialog = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(2),
                    transient_for: Some(WindowHandle(1)),
                    geometry: Xyhw::new(0, 0, 200, 100),
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap();
        manager.state.arrange_all();
        assert_eq!(
            manager.state.windows.get(dialog).unwrap().g,
            Xyhw::new(400, 450, 200, 100)
        );
    }

    #[test]
    fn windows_of_hidden_workspaces_are_unmapped() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1000, 1000)]);
        let id = manager.manage_test_window(1);
        manager.state.move_window_to_workspace(id, 3);
        manager.state.arrange_all();
        assert!(!manager.state.windows.get(id).unwrap().mapped);
    }
}
