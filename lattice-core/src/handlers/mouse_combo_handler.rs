#![allow(clippy::wildcard_imports)]

use super::*;
use crate::display_servers::DisplayServer;
use crate::utils::modmask_lookup::{Button, ModMask};

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// A button press on a client window or on a region's input sink.
    ///
    /// `mousekey` + button 1 moves the window, `mousekey` + button 3 resizes it. Any other
    /// click focuses what was clicked and is replayed to the client.
    pub fn mouse_combo_handler(
        &mut self,
        modmask: ModMask,
        button: Button,
        handle: WindowHandle,
        x: i32,
        y: i32,
    ) -> bool {
        self.state.pointer = (x, y);
        let id = self.state.windows.lookup(handle);
        let mousekey = self.state.config.mousekey();
        let modmask = modmask.clean();
        let is_mouse_key = modmask == mousekey || modmask == (mousekey | ModMask::Shift);

        if let Some(id) = id {
            if is_mouse_key && (button == Button::Button1 || button == Button::Button3) {
                return self.begin_mouse_manipulation(id, button, x, y);
            }
        }

        let changed = match id {
            Some(id) => self.state.focus_window(id),
            None => {
                let region = self
                    .state
                    .regions
                    .iter()
                    .find(|(_, r)| r.sink == Some(handle))
                    .map(|(region, _)| region);
                region.is_some_and(|region| self.state.focus_region(region))
            }
        };
        self.state
            .actions
            .push_back(DisplayAction::ReplayClick(handle, button));
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 1000);

    #[test]
    fn plain_click_focuses_and_replays() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let a = manager.manage_test_window(1);
        manager.manage_test_window(2);
        manager.run_pending();
        assert!(manager.mouse_combo_handler(ModMask::empty(), Button::Button1, WindowHandle(1), 5, 5));
        assert_eq!(manager.state.focused_window(), Some(a));
        assert!(matches!(
            manager.state.actions.back(),
            Some(DisplayAction::ReplayClick(WindowHandle(1), b)) if *b == Button::Button1
        ));
    }

    #[test]
    fn mousekey_with_button_three_resizes() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        manager.manage_test_window(1);
        manager.run_pending();
        manager.feed(DisplayEvent::MouseCombo(
            ModMask::Mod4 | ModMask::Mod2,
            Button::Button3,
            WindowHandle(1),
            10,
            10,
        ));
        let manipulation = manager.state.mode.manipulation().unwrap();
        assert!(matches!(
            manipulation.kind,
            crate::models::ManipulationKind::Resize(_)
        ));
        assert!(matches!(manager.state.mode, Mode::Tracking(_)));
    }

    #[test]
    fn click_on_empty_region_focuses_it() {
        let left = Xyhw::new(0, 0, 500, 1000);
        let right = Xyhw::new(500, 0, 500, 1000);
        let mut manager = Manager::new_test_with_outputs(vec![left, right]);
        let region = *manager.state.screens[0]
            .regions
            .iter()
            .find(|r| manager.state.focused_region != Some(**r))
            .unwrap();
        let sink = manager.state.regions[region].sink.unwrap();
        let (x, y) = manager.state.regions[region].g.center();
        manager.mouse_combo_handler(ModMask::empty(), Button::Button1, sink, x, y);
        assert_eq!(manager.state.focused_region, Some(region));
    }
}
