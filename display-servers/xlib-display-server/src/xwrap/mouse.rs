//! Xlib calls related to a mouse.
use super::{with_lock_variants, BUTTONMASK, MOUSEMASK};
use crate::XWrap;
use lattice_core::models::WindowHandle;
use lattice_core::{Button, DisplayEvent, GrabKind};
use std::os::raw::{c_int, c_uint, c_ulong};
use x11_dl::xlib;

impl XWrap {
    /// Grabs the mouse clicks of a window. Unfocused windows also grab plain clicks so that
    /// clicking them focuses them.
    pub fn grab_mouse_clicks(&self, handle: xlib::Window, is_focused: bool) {
        self.ungrab_buttons(handle);
        if !is_focused {
            for button in [xlib::Button1, xlib::Button2, xlib::Button3] {
                unsafe {
                    (self.xlib.XGrabButton)(
                        self.display,
                        button,
                        xlib::AnyModifier,
                        handle,
                        0,
                        BUTTONMASK as u32,
                        xlib::GrabModeAsync,
                        xlib::GrabModeAsync,
                        0,
                        0,
                    );
                }
            }
        }
        let mask = u32::from(self.mouse_key_mask.bits());
        // A bare mousekey would swallow every click on the focused window.
        if mask == 0 {
            return;
        }
        for button in [xlib::Button1, xlib::Button3] {
            self.grab_buttons(handle, button, mask);
            self.grab_buttons(handle, button, mask | xlib::ShiftMask);
        }
    }

    /// Grabs the button with the modifier for a window.
    // `XGrabButton`: https://tronche.com/gui/x/xlib/input/XGrabButton.html
    pub fn grab_buttons(&self, window: xlib::Window, button: u32, modifiers: u32) {
        for m in with_lock_variants(modifiers) {
            unsafe {
                (self.xlib.XGrabButton)(
                    self.display,
                    button,
                    m,
                    window,
                    0,
                    BUTTONMASK as u32,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                    0,
                    0,
                );
            }
        }
    }

    /// Cleans all currently grabbed buttons of a window.
    // `XUngrabButton`: https://tronche.com/gui/x/xlib/input/XUngrabButton.html
    pub fn ungrab_buttons(&self, handle: xlib::Window) {
        unsafe {
            (self.xlib.XUngrabButton)(
                self.display,
                xlib::AnyButton as u32,
                xlib::AnyModifier,
                handle,
            );
        }
    }

    /// Grabs pointer and keyboard for an interactive move, resize or search.
    /// Both grabs succeed or neither is kept.
    // `XGrabPointer`: https://tronche.com/gui/x/xlib/input/XGrabPointer.html
    // `XGrabKeyboard`: https://tronche.com/gui/x/xlib/input/XGrabKeyboard.html
    pub fn begin_grab(&self, handle: WindowHandle, kind: GrabKind) -> DisplayEvent {
        let cursor = self.cursors.for_grab(kind);
        let pointer = unsafe {
            (self.xlib.XGrabPointer)(
                self.display,
                self.root,
                0,
                MOUSEMASK as u32,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                0,
                cursor,
                xlib::CurrentTime,
            )
        };
        let keyboard = unsafe {
            (self.xlib.XGrabKeyboard)(
                self.display,
                self.root,
                xlib::True,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                xlib::CurrentTime,
            )
        };
        if pointer == xlib::GrabSuccess && keyboard == xlib::GrabSuccess {
            return DisplayEvent::GrabAcquired(handle);
        }
        tracing::debug!("grab for {:?} failed: pointer {pointer}, keyboard {keyboard}", kind);
        self.end_grab();
        DisplayEvent::GrabFailed(handle)
    }

    /// Releases pointer and keyboard and drops the button events still queued.
    // `XUngrabPointer`: https://tronche.com/gui/x/xlib/input/XUngrabPointer.html
    // `XCheckMaskEvent`: https://tronche.com/gui/x/xlib/event-handling/manipulating-event-queue/XCheckMaskEvent.html
    pub fn end_grab(&self) {
        unsafe {
            (self.xlib.XUngrabPointer)(self.display, xlib::CurrentTime);
            (self.xlib.XUngrabKeyboard)(self.display, xlib::CurrentTime);
        }
        self.sync();
        let mut event: xlib::XEvent = unsafe { std::mem::zeroed() };
        while unsafe { (self.xlib.XCheckMaskEvent)(self.display, BUTTONMASK, &mut event) } != 0 {}
    }

    /// Move the cursor to a point.
    // `XWarpPointer`: https://tronche.com/gui/x/xlib/input/XWarpPointer.html
    pub fn move_cursor_to_point(&self, point: (i32, i32)) {
        if point.0 >= 0 && point.1 >= 0 {
            let none: c_int = 0;
            unsafe {
                (self.xlib.XWarpPointer)(
                    self.display,
                    none as c_ulong,
                    self.root,
                    none,
                    none,
                    none as u32,
                    none as u32,
                    point.0,
                    point.1,
                );
            }
        }
    }

    /// Replay a click on a window. The click is only replayed while the pointer is still
    /// over `window`, which also skips clicks after focus moved by a key binding.
    // `XQueryPointer`: https://tronche.com/gui/x/xlib/window-information/XQueryPointer.html
    pub fn replay_click(&self, window: xlib::Window, button: Button) {
        if !self.managed_windows.contains(&window) {
            return;
        }
        let mut over_window = false;
        unsafe {
            let mut event: xlib::XButtonEvent = std::mem::zeroed();
            event.button = button_number(button);
            event.same_screen = xlib::True;
            event.subwindow = self.get_default_root();

            while event.subwindow != 0 {
                event.window = event.subwindow;
                over_window |= event.window == window;
                (self.xlib.XQueryPointer)(
                    self.display,
                    event.window,
                    &mut event.root,
                    &mut event.subwindow,
                    &mut event.x_root,
                    &mut event.y_root,
                    &mut event.x,
                    &mut event.y,
                    &mut event.state,
                );
            }

            if over_window {
                event.type_ = xlib::ButtonPress;
                self.send_xevent(event.window, 0, xlib::ButtonPressMask, &mut event.into());

                event.type_ = xlib::ButtonRelease;
                self.send_xevent(event.window, 0, xlib::ButtonReleaseMask, &mut event.into());
            }
        }
    }
}

/// The core protocol number (1 based) of a button.
#[must_use]
pub fn button_number(button: Button) -> c_uint {
    if button.is_empty() {
        return 0;
    }
    button.bits().trailing_zeros() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_numbers_match_the_core_protocol() {
        assert_eq!(button_number(Button::Button1), 1);
        assert_eq!(button_number(Button::Button3), 3);
        assert_eq!(button_number(Button::Button5), 5);
        assert_eq!(button_number(Button::empty()), 0);
        for n in 1..=5 {
            assert_eq!(button_number(Button::from_number(n)), n);
        }
    }
}
