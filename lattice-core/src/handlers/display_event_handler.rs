#![allow(clippy::wildcard_imports)]

use super::*;
use crate::display_servers::DisplayServer;
use crate::errors::Result;
use crate::event_loop::ExitReason;

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Process a single event and apply its changes to the manager.
    /// Returns true if changes need to be rendered.
    pub fn display_event_handler(&mut self, event: DisplayEvent) -> bool {
        if let Some(handled) = self.manipulation_event(&event) {
            return handled;
        }
        if matches!(self.state.mode, Mode::Searching(_)) {
            match &event {
                DisplayEvent::KeyPress(_, key, _) => return self.state.search_key(key),
                DisplayEvent::MouseCombo(..)
                | DisplayEvent::ButtonRelease(..)
                | DisplayEvent::KeyRelease(..) => return false,
                _ => {}
            }
        }

        let state = &mut self.state;
        match event {
            DisplayEvent::ScreenCreate(root, g) => {
                let result = state.screen_create(root, g);
                self.fatal_on_error(result)
            }
            DisplayEvent::OutputsChanged(screen, outputs) => {
                let result = state.reconcile_outputs(screen, outputs);
                self.fatal_on_error(result)
            }
            DisplayEvent::RegionWindowsCreated { region, sink, bar } => {
                state.region_windows_created(region, sink, bar)
            }

            DisplayEvent::WindowCreate(info, x, y) => state.manage(info, x, y).is_some(),
            DisplayEvent::WindowDestroy(handle) => state
                .windows
                .lookup(handle)
                .is_some_and(|id| state.unmanage(id)),
            DisplayEvent::WindowChange(change) => state.window_changed(change),
            DisplayEvent::ConfigureRequest(handle, change) => {
                state.configure_request(handle, change)
            }

            DisplayEvent::StateRequest(handle, window_state, action) => {
                state.state_request(handle, window_state, action)
            }
            DisplayEvent::ActivateRequest(handle) => state.activate_request(handle),
            DisplayEvent::CloseRequest(handle) => state
                .windows
                .lookup(handle)
                .is_some_and(|id| state.close_window(id, false)),
            DisplayEvent::MoveResizeRequest(handle, direction) => {
                self.move_resize_request(handle, direction)
            }
            DisplayEvent::DesktopRequest(ws) => state.desktop_request(ws),
            DisplayEvent::WindowDesktopRequest(handle, ws) => {
                state.window_desktop_request(handle, ws)
            }

            DisplayEvent::KeyPress(modmask, key, _) => self.keybind_handler(modmask, &key),
            DisplayEvent::MouseCombo(modmask, button, handle, x, y) => {
                self.mouse_combo_handler(modmask, button, handle, x, y)
            }
            // Releases only matter while a move or resize is running.
            DisplayEvent::KeyRelease(..) | DisplayEvent::ButtonRelease(..) => false,
            DisplayEvent::Motion(x, y, _) => state.pointer_moved(x, y),
            DisplayEvent::EnterWindow(handle, x, y) => state.enter_window(handle, x, y),

            DisplayEvent::GrabAcquired(handle) => state.grab_acquired(handle),
            DisplayEvent::GrabFailed(handle) => state.grab_failed(handle),

            DisplayEvent::SendCommand(command) => self.command_handler(&command),
        }
    }

    fn fatal_on_error(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("{err}");
                self.exit = Some(ExitReason::Fatal(err.to_string()));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::{Rotation, WindowInfo};
    use crate::utils::modmask_lookup::ModMask;

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 1000);

    #[test]
    fn too_many_outputs_is_fatal() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                workspace_limit: 1,
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        manager.feed(DisplayEvent::OutputsChanged(
            0,
            vec![
                (Xyhw::new(0, 0, 500, 1000), Rotation::Normal),
                (Xyhw::new(500, 0, 500, 1000), Rotation::Normal),
            ],
        ));
        assert!(matches!(manager.exit, Some(ExitReason::Fatal(_))));
    }

    #[test]
    fn created_and_destroyed_windows_round_trip_through_the_queue() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        manager.feed(DisplayEvent::WindowCreate(
            WindowInfo {
                handle: WindowHandle(7),
                ..WindowInfo::default()
            },
            0,
            0,
        ));
        let id = manager.state.windows.lookup(WindowHandle(7)).unwrap();
        assert!(manager.state.windows.get(id).unwrap().mapped);
        manager.feed(DisplayEvent::WindowDestroy(WindowHandle(7)));
        assert!(manager.state.windows.is_empty());
        assert!(manager
            .display_server
            .executed
            .iter()
            .any(|a| matches!(a, DisplayAction::DestroyedWindow(WindowHandle(7)))));
    }

    #[test]
    fn keys_during_search_never_reach_bindings() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                keybinds: vec![crate::config::Keybind {
                    modmask: ModMask::empty(),
                    key: "x".to_owned(),
                    command: Command::Quit,
                }],
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        manager.manage_test_window(1);
        manager.manage_test_window(2);
        manager.feed(DisplayEvent::SendCommand(Command::SearchWindow));
        manager.feed(DisplayEvent::KeyPress(ModMask::empty(), "x".to_owned(), 0));
        assert!(manager.exit.is_none());
        assert!(matches!(manager.state.mode, Mode::Searching(_)));
    }

    #[test]
    fn unknown_handles_are_ignored() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        assert!(!manager.display_event_handler(DisplayEvent::WindowDestroy(WindowHandle(99))));
        assert!(!manager.display_event_handler(DisplayEvent::ActivateRequest(WindowHandle(99))));
        assert!(!manager.display_event_handler(DisplayEvent::CloseRequest(WindowHandle(99))));
    }
}
