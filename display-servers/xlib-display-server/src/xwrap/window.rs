//! Xlib calls related to a window.
use super::{
    on_error_from_xlib, on_error_from_xlib_dummy, ICONIC_STATE, NORMAL_STATE, ROOT_EVENT_MASK,
    WITHDRAWN_STATE,
};
use crate::XWrap;
use lattice_core::models::{WindowFlags, WindowHandle, WindowType, Xyhw};
use lattice_core::{DisplayEvent, Window};
use std::os::raw::{c_long, c_ulong};
use x11_dl::xlib;

impl XWrap {
    /// Reads a window that asked to be mapped. Windows we already manage, and windows that
    /// must not be managed, give `None`.
    #[must_use]
    pub fn setup_window(&self, window: xlib::Window) -> Option<DisplayEvent> {
        if self.managed_windows.contains(&window) || self.labels.contains_key(&window) {
            return None;
        }
        let info = self.get_window_info(window)?;
        let (x, y) = self.get_cursor_point();
        Some(DisplayEvent::WindowCreate(info, x, y))
    }

    /// Sets up a window that we now manage. Mapping is left to the next update.
    pub fn setup_managed_window(&mut self, h: WindowHandle) {
        let handle = h.0;
        if self.managed_windows.contains(&handle) {
            return;
        }
        self.subscribe_to_window_events(handle);
        self.managed_windows.push(handle);

        // Make sure there is at least an empty list of _NET_WM_STATE.
        let states = self.get_window_states_atoms(handle);
        self.set_window_states_atoms(handle, &states);
        if self.get_wm_state(handle).is_none() {
            self.set_wm_states(handle, &[WITHDRAWN_STATE]);
        }

        let r#type = self.get_window_type(handle);
        if !r#type.is_screen_sticky() {
            self.set_window_border_color(handle, self.colors.normal);
            self.grab_mouse_clicks(handle, false);
        }
    }

    /// Teardown a window we stopped managing. Safe to call twice and on windows that are gone.
    // `XGrabServer`: https://tronche.com/gui/x/xlib/window-and-session-manager/XGrabServer.html
    // `XUngrabServer`: https://tronche.com/gui/x/xlib/window-and-session-manager/XUngrabServer.html
    pub fn teardown_managed_window(&mut self, h: WindowHandle) {
        let handle = h.0;
        self.managed_windows.retain(|x| *x != handle);
        if self.focused_window == handle {
            self.focused_window = self.root;
        }
        unsafe {
            (self.xlib.XGrabServer)(self.display);
            (self.xlib.XSetErrorHandler)(Some(on_error_from_xlib_dummy));
            self.ungrab_buttons(handle);
            self.set_wm_states(handle, &[WITHDRAWN_STATE]);
            self.sync();
            (self.xlib.XSetErrorHandler)(Some(on_error_from_xlib));
            (self.xlib.XUngrabServer)(self.display);
        }
    }

    /// Updates a window.
    pub fn update_window(&self, window: &Window) {
        let handle = window.handle.0;
        if window.mapped {
            let (width, height) = window.inner_size();
            let changes = xlib::XWindowChanges {
                x: window.g.x(),
                y: window.g.y(),
                width,
                height,
                border_width: window.effective_border(),
                sibling: 0,    // Not unlocked.
                stack_mode: 0, // Not unlocked.
            };
            let unlock =
                xlib::CWX | xlib::CWY | xlib::CWWidth | xlib::CWHeight | xlib::CWBorderWidth;
            self.set_window_config(handle, changes, u32::from(unlock));
            self.configure_window(handle, window.g, window.effective_border());
            self.set_window_border_color(handle, self.border_color(window));
        }
        let state = self.get_wm_state(handle).unwrap_or(WITHDRAWN_STATE);
        // Only change when needed. This prevents task bar icons flashing.
        if window.mapped && state != NORMAL_STATE {
            self.toggle_window_visibility(handle, true);
        } else if !window.mapped && state == NORMAL_STATE {
            self.toggle_window_visibility(handle, false);
        }
    }

    fn border_color(&self, window: &Window) -> c_ulong {
        if window.handle.0 == self.focused_window {
            self.colors.focused
        } else if window.flags.contains(WindowFlags::DEMANDS_ATTENTION) {
            self.colors.urgent
        } else {
            self.colors.normal
        }
    }

    /// Maps and unmaps a window depending on it is visible.
    // `XMapWindow`: https://tronche.com/gui/x/xlib/window/XMapWindow.html
    // `XUnmapWindow`: https://tronche.com/gui/x/xlib/window/XUnmapWindow.html
    pub fn toggle_window_visibility(&self, window: xlib::Window, visible: bool) {
        // We don't want to receive this map or unmap event.
        let mask_off = ROOT_EVENT_MASK & !(xlib::SubstructureNotifyMask);
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.event_mask = mask_off;
        self.change_window_attributes(self.root, xlib::CWEventMask, attrs);
        if visible {
            self.set_wm_states(window, &[NORMAL_STATE]);
            unsafe { (self.xlib.XMapWindow)(self.display, window) };
        } else {
            unsafe { (self.xlib.XUnmapWindow)(self.display, window) };
            self.set_wm_states(window, &[ICONIC_STATE]);
        }
        attrs.event_mask = ROOT_EVENT_MASK;
        self.change_window_attributes(self.root, xlib::CWEventMask, attrs);
    }

    /// Makes a window take focus.
    pub fn window_take_focus(&mut self, window: &Window, previous: Option<WindowHandle>) {
        let handle = window.handle.0;
        if let Some(previous) = previous.filter(|p| p.0 != handle) {
            self.set_window_border_color(previous.0, self.colors.normal);
            // Clicking the previously focused window focuses it again.
            if self.managed_windows.contains(&previous.0) {
                self.grab_mouse_clicks(previous.0, false);
            }
        }
        self.focused_window = handle;
        self.grab_mouse_clicks(handle, true);
        self.set_window_urgency(handle, false);
        self.set_window_border_color(handle, self.colors.focused);
        self.focus(handle, window.accepts_input, window.takes_focus);
    }

    /// Focuses a window.
    // `XSetInputFocus`: https://tronche.com/gui/x/xlib/input/XSetInputFocus.html
    pub fn focus(&self, window: xlib::Window, accepts_input: bool, takes_focus: bool) {
        if accepts_input {
            unsafe {
                (self.xlib.XSetInputFocus)(
                    self.display,
                    window,
                    xlib::RevertToPointerRoot,
                    xlib::CurrentTime,
                );
            }
        }
        // Mark this window as the `_NET_ACTIVE_WINDOW`
        self.replace_property_long(
            self.root,
            self.atoms.NetActiveWindow,
            xlib::XA_WINDOW,
            &[window as c_long],
        );
        if takes_focus {
            // Tell the window to take focus
            self.send_xevent_atom(window, self.atoms.WMTakeFocus);
        }
    }

    /// Gives the focus back to the root window.
    // `XSetInputFocus`: https://tronche.com/gui/x/xlib/input/XSetInputFocus.html
    pub fn unfocus(&mut self, handle: Option<WindowHandle>) {
        if let Some(WindowHandle(handle)) = handle {
            self.set_window_border_color(handle, self.colors.normal);
            if self.managed_windows.contains(&handle) {
                self.grab_mouse_clicks(handle, false);
            }
        }
        self.focused_window = self.root;
        unsafe {
            (self.xlib.XSetInputFocus)(
                self.display,
                self.root,
                xlib::RevertToPointerRoot,
                xlib::CurrentTime,
            );
        }
        self.replace_property_long(self.root, self.atoms.NetActiveWindow, xlib::XA_WINDOW, &[0]);
    }

    /// Puts the focus back on the focused window when a client grabbed it.
    pub fn refocus(&self, window: xlib::Window) {
        if self.focused_window == self.root || window == self.focused_window {
            return;
        }
        let (accepts_input, _) = self.get_input_and_urgency(self.focused_window);
        if accepts_input {
            self.focus(self.focused_window, true, false);
        }
    }

    /// Send a synthetic `XConfigureEvent` telling a client where it is. `g` includes the
    /// border.
    pub fn configure_window(&self, handle: xlib::Window, g: Xyhw, border: i32) {
        let mut configure_event: xlib::XConfigureEvent = unsafe { std::mem::zeroed() };
        configure_event.type_ = xlib::ConfigureNotify;
        configure_event.display = self.display;
        configure_event.event = handle;
        configure_event.window = handle;
        configure_event.x = g.x();
        configure_event.y = g.y();
        configure_event.width = (g.w() - 2 * border).max(1);
        configure_event.height = (g.h() - 2 * border).max(1);
        configure_event.border_width = border;
        configure_event.above = 0;
        configure_event.override_redirect = 0;
        self.send_xevent(
            handle,
            0,
            xlib::StructureNotifyMask,
            &mut configure_event.into(),
        );
    }

    /// Change a windows attributes.
    // `XChangeWindowAttributes`: https://tronche.com/gui/x/xlib/window/XChangeWindowAttributes.html
    pub fn change_window_attributes(
        &self,
        window: xlib::Window,
        mask: c_ulong,
        mut attrs: xlib::XSetWindowAttributes,
    ) {
        unsafe {
            (self.xlib.XChangeWindowAttributes)(self.display, window, mask, &mut attrs);
        }
    }

    /// Stacks the windows bottom to top, each directly above the one before it.
    pub fn restack_chain(&self, handles: &[WindowHandle]) {
        for pair in handles.windows(2) {
            let changes = xlib::XWindowChanges {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
                border_width: 0,
                sibling: pair[0].0,
                stack_mode: xlib::Above,
            };
            let unlock = xlib::CWSibling | xlib::CWStackMode;
            self.set_window_config(pair[1].0, changes, u32::from(unlock));
        }
    }

    /// Closes a window: politely through `WM_DELETE_WINDOW` when the client speaks it,
    /// otherwise (or when `force` is set) by disconnecting the client.
    // `XGrabServer`: https://tronche.com/gui/x/xlib/window-and-session-manager/XGrabServer.html
    // `XSetCloseDownMode`: https://tronche.com/gui/x/xlib/display/XSetCloseDownMode.html
    // `XKillClient`: https://tronche.com/gui/x/xlib/window-and-session-manager/XKillClient.html
    // `XUngrabServer`: https://tronche.com/gui/x/xlib/window-and-session-manager/XUngrabServer.html
    pub fn kill_window(&self, h: WindowHandle, force: bool) {
        let handle = h.0;
        if !force && self.send_xevent_atom(handle, self.atoms.WMDelete) {
            return;
        }
        unsafe {
            (self.xlib.XGrabServer)(self.display);
            (self.xlib.XSetErrorHandler)(Some(on_error_from_xlib_dummy));
            (self.xlib.XSetCloseDownMode)(self.display, xlib::DestroyAll);
            (self.xlib.XKillClient)(self.display, handle);
            self.sync();
            (self.xlib.XSetErrorHandler)(Some(on_error_from_xlib));
            (self.xlib.XUngrabServer)(self.display);
        }
    }

    /// Forgets a window that was unmapped or destroyed. Returns whether it was managed.
    pub fn force_unmapped(&mut self, window: xlib::Window) -> bool {
        let managed = self.managed_windows.contains(&window);
        if managed {
            self.managed_windows.retain(|x| *x != window);
        }
        managed
    }

    /// Subscribe to an event of a window.
    // `XSelectInput`: https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
    pub fn subscribe_to_event(&self, window: xlib::Window, mask: c_long) {
        unsafe { (self.xlib.XSelectInput)(self.display, window, mask) };
    }

    /// Subscribe to the wanted events of a window.
    pub fn subscribe_to_window_events(&self, window: xlib::Window) {
        let mask = xlib::EnterWindowMask | xlib::FocusChangeMask | xlib::PropertyChangeMask;
        self.subscribe_to_event(window, mask);
    }

    /// The border a window has on screen right now, used to turn client sizes into
    /// outer sizes.
    #[must_use]
    pub fn current_border(&self, window: xlib::Window) -> i32 {
        self.get_window_attrs(window)
            .map(|attrs| attrs.border_width)
            .unwrap_or_else(|_| self.border_for(WindowType::Normal))
    }
}
