#![allow(clippy::wildcard_imports)]

use super::*;
use crate::command::Direction;
use crate::display_servers::DisplayServer;
use crate::layouts::{self, FloatGeometry};
use crate::models::{Manipulation, ManipulationKind, ResizeEdges, Trigger};
use crate::utils::modmask_lookup::Button;
use crate::{GrabKind, MoveResizeDirection};

impl<C: Config> State<C> {
    /// Starts an interactive move or resize of a window. A tiled window is floated for the
    /// duration; cancelling puts it back.
    pub fn begin_manipulation(
        &mut self,
        id: WindowId,
        kind: ManipulationKind,
        trigger: Trigger,
        x: i32,
        y: i32,
    ) -> bool {
        if !self.mode.is_normal() {
            return false;
        }
        let Some(window) = self.windows.get(id) else {
            return false;
        };
        if window.is_fullscreen() || window.workspace.is_none() || !self.is_window_visible(id) {
            tracing::debug!("refusing to manipulate {:?}", window.handle);
            return false;
        }
        let handle = window.handle;
        let start = window.g;
        let start_flags = window.flags;
        let grab = match kind {
            ManipulationKind::Move => GrabKind::Move,
            ManipulationKind::Resize(_) => GrabKind::Resize,
        };
        if let Some(window) = self.windows.get_mut(id) {
            window.flags.remove(WindowFlags::MAXIMIZED);
            if !window.is_floating() {
                window.flags.insert(WindowFlags::FLOATING);
            }
        }
        self.mode = Mode::Grabbing(Manipulation {
            window: id,
            kind,
            trigger,
            origin: (x, y),
            start,
            start_flags,
            last_update: 0,
        });
        self.actions.push_back(DisplayAction::BeginGrab(handle, grab));
        self.focus_window(id);
        self.raise_window(id);
        self.mark_restack(id);
        true
    }

    /// The display server holds the grab; pointer motion now drives the window.
    pub fn grab_acquired(&mut self, handle: WindowHandle) -> bool {
        let Mode::Grabbing(m) = &self.mode else {
            return false;
        };
        if self.windows.get(m.window).map(|w| w.handle) != Some(handle) {
            return false;
        }
        self.mode = match std::mem::take(&mut self.mode) {
            Mode::Grabbing(m) => Mode::Tracking(m),
            other => other,
        };
        true
    }

    pub fn grab_failed(&mut self, handle: WindowHandle) -> bool {
        tracing::warn!("could not grab pointer and keyboard for {handle:?}");
        match &self.mode {
            Mode::Grabbing(_) | Mode::Tracking(_) => self.finish_manipulation(false),
            Mode::Searching(_) => self.end_search(None),
            Mode::Normal => false,
        }
    }

    /// Applies a pointer position to the manipulated window. Updates closer together than
    /// the per-screen rate allows are dropped unless `force` is set.
    pub fn manipulation_motion(&mut self, x: i32, y: i32, time: u64, force: bool) -> bool {
        self.pointer = (x, y);
        let Mode::Tracking(m) = &self.mode else {
            return false;
        };
        let Some(window) = self.windows.get(m.window) else {
            return false;
        };
        let rate = self
            .screens
            .get(window.screen())
            .map_or(0, |s| s.max_updates_per_sec);
        if !force && rate > 0 && time.saturating_sub(m.last_update) < 1000 / u64::from(rate) {
            return false;
        }
        let (dx, dy) = (x - m.origin.0, y - m.origin.1);
        let g = match &m.kind {
            ManipulationKind::Move => {
                let moved = Xyhw::new(m.start.x() + dx, m.start.y() + dy, m.start.w(), m.start.h());
                let (cx, cy) = moved.center();
                let boundary = self
                    .region_at(cx, cy)
                    .or_else(|| self.window_region(m.window))
                    .and_then(|r| self.regions.get(r))
                    .map(|r| r.g);
                match boundary {
                    Some(boundary) => {
                        let softness = layouts::softness_for(&moved, self.config.boundary_width());
                        layouts::contain(moved, &boundary, softness, false)
                    }
                    None => moved,
                }
            }
            ManipulationKind::Resize(edges) => resized(window, &m.start, *edges, dx, dy),
        };
        let id = m.window;
        if let Some(window) = self.windows.get_mut(id) {
            window.g = g;
        }
        if let Mode::Tracking(m) = &mut self.mode {
            m.last_update = time;
        }
        true
    }

    /// Leaves the manipulation. With `persist` the final geometry is kept and stored
    /// relative to the region the window ended up in; otherwise the window gets back its
    /// geometry and state from before the manipulation.
    pub fn finish_manipulation(&mut self, persist: bool) -> bool {
        let m = match std::mem::take(&mut self.mode) {
            Mode::Grabbing(m) | Mode::Tracking(m) => m,
            other => {
                self.mode = other;
                return false;
            }
        };
        self.actions.push_back(DisplayAction::EndGrab);
        let id = m.window;
        if !self.windows.contains(id) {
            return true;
        }
        if !persist {
            if let Some(window) = self.windows.get_mut(id) {
                window.g = m.start;
                window.flags = m.start_flags;
            }
            self.mark_restack(id);
            return true;
        }

        let (cx, cy) = self.windows.get(id).map_or((0, 0), |w| w.g.center());
        let screen = self.windows.get(id).map(Window::screen);
        let target = self
            .region_at(cx, cy)
            .filter(|r| self.regions.get(*r).map(|r| r.screen) == screen);
        if let Some(region) = target {
            let ws = self.regions.get(region).and_then(|r| r.workspace);
            let current = self.windows.get(id).and_then(|w| w.workspace);
            if let Some(ws) = ws.filter(|ws| Some(*ws) != current) {
                self.move_window_to_workspace(id, ws);
            }
        }
        let region = target.or_else(|| self.window_region(id));
        let boundary = region.and_then(|r| self.regions.get(r)).map(|r| r.g);
        let boundary_width = self.config.boundary_width();
        if let Some(window) = self.windows.get_mut(id) {
            window.flags.insert(WindowFlags::MANUAL);
            if let (Some(region), Some(boundary)) = (region, boundary) {
                let softness = layouts::softness_for(&window.g, boundary_width);
                window.g = layouts::contain(window.g, &boundary, softness, false);
                window.float_geom = Some(FloatGeometry::store(region, &boundary, &window.g));
            }
            window.requested = window.g;
        }
        self.focus_window(id);
        self.mark_restack(id);
        true
    }

    /// Cancels the modal mode if the window it works on is gone, hidden, off screen or no
    /// longer related to the focused window. Runs after every dispatched event.
    pub fn revalidate_mode(&mut self) -> bool {
        match &self.mode {
            Mode::Normal => false,
            Mode::Grabbing(m) | Mode::Tracking(m) => {
                let id = m.window;
                let valid = self.windows.get(id).is_some_and(|w| {
                    !w.is_hidden() && !w.is_fullscreen() && self.is_window_visible(id)
                }) && self
                    .focused_window()
                    .map_or(true, |f| self.windows.related(f, id));
                if valid {
                    return false;
                }
                tracing::debug!("manipulated window is no longer valid");
                self.finish_manipulation(false)
            }
            Mode::Searching(search) => {
                if search.labels.is_empty() {
                    return self.end_search(None);
                }
                false
            }
        }
    }

    /// One keyboard step of `MoveStep`/`ResizeStep` on the focused window. Tiled windows
    /// are floated first.
    pub fn step_focused(&mut self, direction: Direction, resize: bool) -> bool {
        let Some(id) = self.focused_window() else {
            return false;
        };
        let Some(region) = self.window_region(id) else {
            return false;
        };
        let Some(boundary) = self.regions.get(region).map(|r| r.g) else {
            return false;
        };
        let step = self.config.step_size();
        let boundary_width = self.config.boundary_width();
        let Some(window) = self.windows.get_mut(id) else {
            return false;
        };
        if window.is_fullscreen() {
            return false;
        }
        window.flags.remove(WindowFlags::MAXIMIZED);
        window.flags.insert(WindowFlags::FLOATING | WindowFlags::MANUAL);
        let (dx, dy) = match direction {
            Direction::Left => (-step, 0),
            Direction::Right => (step, 0),
            Direction::Up => (0, -step),
            Direction::Down => (0, step),
        };
        let g = if resize {
            resized(window, &window.g, ResizeEdges::RIGHT | ResizeEdges::BOTTOM, dx, dy)
        } else {
            let moved = Xyhw::new(window.g.x() + dx, window.g.y() + dy, window.g.w(), window.g.h());
            layouts::contain(moved, &boundary, layouts::softness_for(&moved, boundary_width), false)
        };
        window.g = g;
        window.requested = g;
        window.float_geom = Some(FloatGeometry::store(region, &boundary, &g));
        self.mark_restack(id);
        true
    }

    fn mark_restack(&mut self, id: WindowId) {
        let Some(window) = self.windows.get(id) else {
            return;
        };
        let screen = window.screen();
        if let Some(ws) = window.workspace.and_then(|ws| self.screens.get_mut(screen)?.workspace_mut(ws)) {
            ws.restack_needed = true;
        }
    }
}

/// `start` with the given edges dragged by (dx, dy), kept within the size hints. The
/// opposite edges stay where they are.
fn resized(window: &Window, start: &Xyhw, edges: ResizeEdges, dx: i32, dy: i32) -> Xyhw {
    let border = window.effective_border();
    let mut w = start.w();
    let mut h = start.h();
    if edges.contains(ResizeEdges::LEFT) {
        w -= dx;
    } else if edges.contains(ResizeEdges::RIGHT) {
        w += dx;
    }
    if edges.contains(ResizeEdges::TOP) {
        h -= dy;
    } else if edges.contains(ResizeEdges::BOTTOM) {
        h += dy;
    }
    let (inner_w, inner_h) = window.hints.clamp(w - 2 * border, h - 2 * border);
    let w = inner_w + 2 * border;
    let h = inner_h + 2 * border;
    let x = if edges.contains(ResizeEdges::LEFT) {
        start.max_x() - w
    } else {
        start.x()
    };
    let y = if edges.contains(ResizeEdges::TOP) {
        start.max_y() - h
    } else {
        start.y()
    };
    Xyhw::new(x, y, w, h)
}

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Routes input while a move or resize is running. Returns `None` when the event is not
    /// part of the manipulation and should go through normal handling.
    pub(crate) fn manipulation_event(&mut self, event: &DisplayEvent) -> Option<bool> {
        let trigger = self.state.mode.manipulation()?.trigger.clone();
        let handled = match event {
            DisplayEvent::Motion(x, y, time) => self.state.manipulation_motion(*x, *y, *time, false),
            DisplayEvent::ButtonRelease(button, x, y, time) => {
                let ends = match &trigger {
                    Trigger::Button(b) => b == button,
                    Trigger::Client => true,
                    Trigger::Key(_) => false,
                };
                if !ends {
                    return Some(false);
                }
                self.state.manipulation_motion(*x, *y, *time, true);
                self.state.finish_manipulation(true)
            }
            DisplayEvent::KeyRelease(key, time) => {
                if !matches!(&trigger, Trigger::Key(k) if k == key) {
                    return Some(false);
                }
                if self.is_auto_repeat(key, *time) {
                    return Some(false);
                }
                let (x, y) = self.state.pointer;
                self.state.manipulation_motion(x, y, *time, true);
                self.state.finish_manipulation(true)
            }
            DisplayEvent::KeyPress(_, key, _) => {
                if key == self.state.config.cancel_key() {
                    self.state.finish_manipulation(false)
                } else {
                    false
                }
            }
            // The pointer is grabbed; clicks belong to the manipulation.
            DisplayEvent::MouseCombo(..) => false,
            DisplayEvent::MoveResizeRequest(handle, MoveResizeDirection::Cancel) => {
                let target = self.state.mode.target().and_then(|t| self.state.windows.get(t));
                if target.map(|w| w.handle) != Some(*handle) {
                    return Some(false);
                }
                self.state.finish_manipulation(false)
            }
            _ => return None,
        };
        Some(handled)
    }

    /// A key release followed by a press of the same key with the same timestamp is the
    /// keyboard repeating, not the user letting go. Both events are dropped.
    fn is_auto_repeat(&mut self, key: &str, time: u64) -> bool {
        let Some(next) = self.events.pop_front() else {
            return false;
        };
        if matches!(&next, DisplayEvent::KeyPress(_, k, t) if k == key && *t == time) {
            return true;
        }
        self.events.push_front(next);
        false
    }

    /// `_NET_WM_MOVERESIZE` from a client, used by client side decorations.
    pub(crate) fn move_resize_request(
        &mut self,
        handle: WindowHandle,
        direction: MoveResizeDirection,
    ) -> bool {
        let Some(id) = self.state.windows.lookup(handle) else {
            return false;
        };
        let kind = match direction {
            MoveResizeDirection::Cancel => return false,
            MoveResizeDirection::Move | MoveResizeDirection::MoveKeyboard => ManipulationKind::Move,
            MoveResizeDirection::SizeKeyboard => {
                ManipulationKind::Resize(ResizeEdges::RIGHT | ResizeEdges::BOTTOM)
            }
            other => ManipulationKind::Resize(other.edges().unwrap_or_default()),
        };
        let (x, y) = self.state.pointer;
        self.state.begin_manipulation(id, kind, Trigger::Client, x, y)
    }

    /// Starts a pointer driven move (button 1) or resize (button 3) from a mouse binding.
    pub(crate) fn begin_mouse_manipulation(
        &mut self,
        id: WindowId,
        button: Button,
        x: i32,
        y: i32,
    ) -> bool {
        let Some(g) = self.state.windows.get(id).map(|w| w.g) else {
            return false;
        };
        let kind = if button == Button::Button3 {
            ManipulationKind::Resize(ResizeEdges::from_quadrant(&g, x, y))
        } else {
            ManipulationKind::Move
        };
        self.state
            .begin_manipulation(id, kind, Trigger::Button(button), x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::models::{SizeHints, WindowInfo, WindowType};
    use crate::utils::modmask_lookup::ModMask;

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 1000);

    fn floating(manager: &mut Manager<TestConfig, crate::display_servers::MockDisplayServer>, handle: u64) -> WindowId {
        let id = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(handle),
                    r#type: WindowType::Dialog,
                    geometry: Xyhw::new(100, 100, 200, 200),
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap();
        manager.run_pending();
        id
    }

    fn drag(handle: u64, x: i32, y: i32) -> DisplayEvent {
        DisplayEvent::MouseCombo(ModMask::Mod4, Button::Button1, WindowHandle(handle), x, y)
    }

    #[test]
    fn dragging_moves_and_persists_the_window() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = floating(&mut manager, 1);
        let start = manager.state.windows.get(id).unwrap().g;

        manager.feed(drag(1, 500, 500));
        assert!(matches!(manager.state.mode, Mode::Tracking(_)));
        manager.feed(DisplayEvent::Motion(550, 520, 10));
        manager.feed(DisplayEvent::ButtonRelease(Button::Button1, 560, 530, 20));

        assert!(manager.state.mode.is_normal());
        let window = manager.state.windows.get(id).unwrap();
        assert_eq!((window.g.x(), window.g.y()), (start.x() + 60, start.y() + 30));
        assert!(window.flags.contains(WindowFlags::MANUAL));
        let stored = window.float_geom.unwrap();
        assert_eq!(stored.load(&SCREEN), window.g);
        assert!(manager
            .display_server
            .executed
            .iter()
            .any(|a| matches!(a, DisplayAction::EndGrab)));
    }

    #[test]
    fn destroying_the_target_mid_drag_ends_without_persisting() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = floating(&mut manager, 1);
        manager.feed(drag(1, 500, 500));
        manager.feed(DisplayEvent::Motion(600, 600, 10));
        manager.feed(DisplayEvent::WindowDestroy(WindowHandle(1)));
        assert!(manager.state.mode.is_normal());
        assert!(manager.state.windows.get(id).is_none());
        manager.feed(DisplayEvent::Motion(700, 700, 20));
        manager.feed(DisplayEvent::ButtonRelease(Button::Button1, 700, 700, 30));
        assert!(manager.state.mode.is_normal());
    }

    #[test]
    fn cancel_key_restores_a_tiled_window() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                boundary_width: 50,
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        let id = manager.manage_test_window(1);
        manager.run_pending();
        let start = manager.state.windows.get(id).unwrap().g;

        manager.feed(drag(1, 10, 10));
        manager.feed(DisplayEvent::Motion(300, 300, 10));
        assert_ne!(manager.state.windows.get(id).unwrap().g, start);
        manager.feed(DisplayEvent::KeyPress(ModMask::empty(), "Escape".to_owned(), 11));

        let window = manager.state.windows.get(id).unwrap();
        assert!(manager.state.mode.is_normal());
        assert!(window.is_tiled());
        assert_eq!(window.g, start);
        assert!(window.float_geom.is_none());
    }

    #[test]
    fn motion_is_rate_limited() {
        let mut manager = Manager::new_test_with_config(
            TestConfig {
                max_updates_per_sec: 10,
                ..TestConfig::default()
            },
            vec![SCREEN],
        );
        let id = floating(&mut manager, 1);
        manager.feed(drag(1, 500, 500));
        manager.feed(DisplayEvent::Motion(510, 500, 1000));
        let first = manager.state.windows.get(id).unwrap().g;
        manager.feed(DisplayEvent::Motion(560, 500, 1050));
        assert_eq!(manager.state.windows.get(id).unwrap().g, first);
        manager.feed(DisplayEvent::Motion(560, 500, 1100));
        assert_eq!(manager.state.windows.get(id).unwrap().g.x(), first.x() + 50);
    }

    #[test]
    fn refused_grab_cancels() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        manager.display_server.refuse_grabs = true;
        let id = floating(&mut manager, 1);
        let start = manager.state.windows.get(id).unwrap().g;
        manager.feed(drag(1, 500, 500));
        assert!(manager.state.mode.is_normal());
        assert_eq!(manager.state.windows.get(id).unwrap().g, start);
    }

    #[test]
    fn key_auto_repeat_does_not_end_the_move() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = floating(&mut manager, 1);
        let (x, y) = manager.state.pointer;
        manager.state.begin_manipulation(
            id,
            ManipulationKind::Move,
            Trigger::Key("m".to_owned()),
            x,
            y,
        );
        manager.run_pending();
        manager.events.push_back(DisplayEvent::KeyRelease("m".to_owned(), 5));
        manager.events.push_back(DisplayEvent::KeyPress(ModMask::Mod4, "m".to_owned(), 5));
        manager.run_pending();
        assert!(matches!(manager.state.mode, Mode::Tracking(_)));
        manager.feed(DisplayEvent::KeyRelease("m".to_owned(), 9));
        assert!(manager.state.mode.is_normal());
    }

    #[test]
    fn stray_buttons_are_drained_on_exit() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        floating(&mut manager, 1);
        manager.feed(drag(1, 500, 500));
        manager.events.push_back(DisplayEvent::ButtonRelease(Button::Button1, 500, 500, 5));
        manager.events.push_back(drag(1, 500, 500));
        manager.events.push_back(DisplayEvent::ButtonRelease(Button::Button1, 500, 500, 6));
        manager.run_pending();
        assert!(manager.state.mode.is_normal());
        assert!(manager.events.is_empty());
    }

    #[test]
    fn resize_respects_minimum_size() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = manager
            .state
            .manage(
                WindowInfo {
                    handle: WindowHandle(1),
                    r#type: WindowType::Dialog,
                    geometry: Xyhw::new(100, 100, 200, 200),
                    border: 0,
                    hints: SizeHints {
                        min_w: 150,
                        min_h: 150,
                        ..SizeHints::default()
                    },
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap();
        manager.run_pending();
        let start = manager.state.windows.get(id).unwrap().g;
        let (mx, my) = (start.max_x() - 1, start.max_y() - 1);
        manager.feed(DisplayEvent::MouseCombo(
            ModMask::Mod4,
            Button::Button3,
            WindowHandle(1),
            mx,
            my,
        ));
        manager.feed(DisplayEvent::Motion(mx - 150, my - 150, 10));
        let g = manager.state.windows.get(id).unwrap().g;
        assert_eq!((g.x(), g.y(), g.w(), g.h()), (start.x(), start.y(), 150, 150));
    }

    #[test]
    fn keyboard_steps_float_the_focused_window() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let id = manager.manage_test_window(1);
        manager.run_pending();
        let before = manager.state.windows.get(id).unwrap().g;
        assert!(manager.state.step_focused(Direction::Right, true));
        let window = manager.state.windows.get(id).unwrap();
        assert!(window.is_floating());
        assert_eq!(window.g.w(), before.w() + 10);
    }
}
