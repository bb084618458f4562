//! Global z-order of everything on a screen.
use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::models::{RegionId, ScreenIndex, Window, WindowFlags, WindowHandle, WindowId, WindowType};
use crate::state::State;
use serde::{Deserialize, Serialize};

/// Stacking layers, bottom to top.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    RegionSink,
    Desktop,
    Below,
    Tiled,
    Dock,
    StatusBar,
    AboveFloating,
    Maximized,
    Fullscreen,
    ForcedRaised,
}

/// Anything that takes part in the stacking order of a screen.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stackable {
    Window(WindowId, Layer),
    Bar(RegionId, WindowHandle),
    RegionSink(RegionId, WindowHandle),
}

impl Stackable {
    #[must_use]
    pub const fn layer(&self) -> Layer {
        match self {
            Self::Window(_, layer) => *layer,
            Self::Bar(..) => Layer::StatusBar,
            Self::RegionSink(..) => Layer::RegionSink,
        }
    }
}

/// The layer of a window judged on its own, ignoring its transient chain.
fn own_layer(window: &Window, raised: bool) -> Layer {
    match window.r#type {
        WindowType::Desktop => return Layer::Desktop,
        WindowType::Dock => return Layer::Dock,
        _ => {}
    }
    if raised {
        Layer::ForcedRaised
    } else if window.flags.contains(WindowFlags::LOWERED) {
        Layer::Below
    } else if window.is_fullscreen() {
        Layer::Fullscreen
    } else if window.is_maximized() {
        Layer::Maximized
    } else if window.flags.contains(WindowFlags::ABOVE) {
        Layer::AboveFloating
    } else if window.flags.contains(WindowFlags::BELOW) {
        Layer::Below
    } else if window.is_floating() {
        Layer::AboveFloating
    } else {
        Layer::Tiled
    }
}

impl<C: Config> State<C> {
    /// The layer of a window. Never lower than the layer of its main window.
    #[must_use]
    pub fn layer_of(&self, id: WindowId) -> Option<Layer> {
        let window = self.windows.get(id)?;
        let own = own_layer(window, self.is_force_raised(window));
        if window.main == id {
            return Some(own);
        }
        let main = self
            .windows
            .get(window.main)
            .map_or(own, |main| own_layer(main, self.is_force_raised(main)));
        Some(own.max(main))
    }

    fn is_force_raised(&self, window: &Window) -> bool {
        window
            .workspace
            .and_then(|ws| self.screens.get(window.screen())?.workspace(ws))
            .is_some_and(|ws| ws.focus_raise == Some(window.id))
    }

    /// Everything visible on `screen`, bottom to top.
    #[must_use]
    pub fn layers(&self, screen: ScreenIndex) -> Vec<Stackable> {
        let Some(s) = self.screens.get(screen) else {
            return vec![];
        };

        // (item, layer, rank): higher ranks sit higher within a layer.
        let mut items: Vec<(Stackable, Layer, usize)> = vec![];

        for region in s.regions.iter().filter_map(|r| self.regions.get(*r)) {
            if let Some(sink) = region.sink {
                items.push((Stackable::RegionSink(region.id, sink), Layer::RegionSink, 0));
            }
            if let (Some(bar), true) = (region.bar, self.bar_visible) {
                items.push((Stackable::Bar(region.id, bar), Layer::StatusBar, 0));
            }
        }

        let visible = s
            .workspaces()
            .filter(|ws| ws.is_visible())
            .flat_map(|ws| ws.windows.iter().copied());
        for id in visible.chain(s.sticky.iter().copied()) {
            let Some(window) = self.windows.get(id) else {
                continue;
            };
            if !window.mapped {
                continue;
            }
            let Some(layer) = self.layer_of(id) else {
                continue;
            };
            let order = if layer == Layer::Tiled {
                s.focus_history.iter().position(|w| *w == id)
            } else {
                s.priority.iter().position(|w| *w == id)
            };
            // Front of the list is the top, entries missing from it go to the bottom.
            let len = s.focus_history.len().max(s.priority.len());
            let rank = order.map_or(0, |pos| len - pos);
            items.push((Stackable::Window(id, layer), layer, rank));
        }

        items.sort_by_key(|(_, layer, rank)| (*layer, *rank));
        items.into_iter().map(|(item, _, _)| item).collect()
    }

    fn stackable_handle(&self, item: &Stackable) -> Option<WindowHandle> {
        match item {
            Stackable::Window(id, _) => self.windows.get(*id).map(|w| w.handle),
            Stackable::Bar(_, handle) | Stackable::RegionSink(_, handle) => Some(*handle),
        }
    }

    /// Recomputes the order of `screen` and sends it to the display server if it changed.
    /// Returns true if a restack was queued.
    pub fn restack(&mut self, screen: ScreenIndex) -> bool {
        let order = self.layers(screen);
        let Some(s) = self.screens.get_mut(screen) else {
            return false;
        };
        let forced = s.workspaces().any(|ws| ws.restack_needed);
        if s.stack == order && !forced {
            return false;
        }
        s.stack.clone_from(&order);
        for ws in s.workspaces_mut() {
            ws.restack_needed = false;
        }
        let chain: Vec<WindowHandle> = order
            .iter()
            .filter_map(|item| self.stackable_handle(item))
            .collect();
        tracing::trace!("restacking screen {screen}: {} entries", chain.len());
        self.actions.push_back(DisplayAction::RestackChain(chain));
        true
    }

    pub fn restack_all(&mut self) {
        for screen in 0..self.screens.len() {
            self.restack(screen);
        }
    }

    /// Moves a window and its transients to the top of the priority list.
    pub fn raise_window(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let screen = window.screen();
        let main = window.main;
        // The window itself first, then the other transients, then the main window.
        let mut raised = vec![id];
        raised.extend(self.windows.transients_of(main).into_iter().filter(|t| *t != id));
        if main != id {
            raised.push(main);
        }
        let Some(s) = self.screens.get_mut(screen) else {
            return false;
        };
        s.priority.retain(|w| !raised.contains(w));
        s.priority.splice(0..0, raised);
        true
    }

    /// Puts the window into the forced-raised layer of its workspace, or takes it out.
    pub fn raise_toggle(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        let screen = window.screen();
        let Some(ws) = window
            .workspace
            .and_then(|ws| self.screens.get_mut(screen)?.workspace_mut(ws))
        else {
            return false;
        };
        ws.focus_raise = if ws.focus_raise == Some(id) {
            None
        } else {
            Some(id)
        };
        ws.restack_needed = true;
        true
    }

    /// Moves a window to the bottom of the priority list.
    pub fn lower_window(&mut self, id: WindowId) -> bool {
        let Some(screen) = self.windows.get(id).map(Window::screen) else {
            return false;
        };
        let Some(s) = self.screens.get_mut(screen) else {
            return false;
        };
        s.priority.retain(|w| *w != id);
        s.priority.push(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WindowInfo, Xyhw};
    use crate::{DisplayAction, Manager};

    fn window_order(manager: &Manager<crate::config::TestConfig, crate::display_servers::MockDisplayServer>) -> Vec<WindowId> {
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
    fn layers_are_ordered_bottom_to_top() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1000, 1000)]);
        let tiled = manager.manage_test_window(1);
        let full = manager.manage_test_window(2);
        let floating = manager.manage_test_window(3);
        manager.state.windows.get_mut(full).unwrap().flags |= WindowFlags::FULLSCREEN;
        manager.state.windows.get_mut(floating).unwrap().flags |= WindowFlags::FLOATING;
        manager.state.arrange_all();

        let layers: Vec<Layer> = manager.state.layers(0).iter().map(Stackable::layer).collect();
        let mut sorted = layers.clone();
        sorted.sort();
        assert_eq!(layers, sorted);
        assert_eq!(window_order(&manager), vec![tiled, floating, full]);
    }

    #[test]
    fn transient_is_never_below_its_main_window() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1000, 1000)]);
        let main = manager.manage_test_window(1);
        let dialog = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(2),
                    transient_for: Some(WindowHandle(1)),
                    states: vec![crate::models::WindowState::Below],
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap();
        manager.state.windows.get_mut(main).unwrap().flags |= WindowFlags::FULLSCREEN;
        for w in manager.state.windows.iter() {
            let own = manager.state.layer_of(w.id).unwrap();
            let main_layer = manager.state.layer_of(w.main).unwrap();
            assert!(own >= main_layer);
        }
        assert_eq!(manager.state.layer_of(dialog), Some(Layer::Fullscreen));
    }

    #[test]
    fn tiled_windows_follow_focus_recency() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1000, 1000)]);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.focus_window(a);
        manager.state.arrange_all();
        assert_eq!(window_order(&manager), vec![b, a]);
        manager.state.focus_window(b);
        assert_eq!(window_order(&manager), vec![a, b]);
    }

    #[test]
    fn restack_is_only_sent_when_the_order_changes() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1000, 1000)]);
        manager.manage_test_window(1);
        manager.manage_test_window(2);
        manager.state.arrange_all();
        manager.state.actions.clear();
        assert!(manager.state.restack(0));
        // The region sink sits under both windows.
        let Some(DisplayAction::RestackChain(chain)) = manager.state.actions.back() else {
            panic!("expected a restack");
        };
        assert_eq!(chain.len(), 3);
        assert!(chain.contains(&WindowHandle(1)) && chain.contains(&WindowHandle(2)));
        assert!(!matches!(chain.first(), Some(WindowHandle(1 | 2))));
        assert!(!manager.state.restack(0));
    }

    #[test]
    fn raise_toggle_puts_window_on_top() {
        let mut manager = Manager::new_test_with_outputs(vec![Xyhw::new(0, 0, 1000, 1000)]);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.windows.get_mut(b).unwrap().flags |= WindowFlags::FULLSCREEN;
        manager.state.arrange_all();
        assert!(manager.state.raise_toggle(a));
        assert_eq!(manager.state.layer_of(a), Some(Layer::ForcedRaised));
        assert_eq!(window_order(&manager).last(), Some(&a));
        assert!(manager.state.raise_toggle(a));
        assert_eq!(manager.state.layer_of(a), Some(Layer::Tiled));
    }
}
