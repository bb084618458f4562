use super::{event_translate_client_message, event_translate_property_notify, DisplayEvent, XWrap};
use lattice_core::models::{WindowHandle, XyhwChange};
use lattice_core::utils::modmask_lookup::{Button, ModMask};
use std::os::raw::{c_uint, c_ulong};
use x11_dl::xlib;

pub struct XEvent<'a>(pub &'a mut XWrap, pub xlib::XEvent);

impl<'a> From<XEvent<'a>> for Vec<DisplayEvent> {
    fn from(x_event: XEvent) -> Self {
        let raw_event = x_event.1;

        let event_type = raw_event.get_type();
        if x_event.0.is_screen_change(event_type) {
            return from_screen_change(x_event).into_iter().collect();
        }

        let event = match event_type {
            // New window is mapped.
            xlib::MapRequest => from_map_request(x_event),
            // Window is unmapped.
            xlib::UnmapNotify => from_unmap_event(x_event),
            // Window is destroyed.
            xlib::DestroyNotify => from_destroy_notify(x_event),
            // Window is taking focus.
            xlib::FocusIn => from_focus_in(x_event),
            // Window client message.
            xlib::ClientMessage => return from_client_message(x_event),
            // Window property notify.
            xlib::PropertyNotify => from_property_notify(&x_event),
            // Window configure request.
            xlib::ConfigureRequest => from_configure_request(x_event),
            // Root window size changed.
            xlib::ConfigureNotify => from_configure_notify(&x_event),
            // Mouse entered notify.
            xlib::EnterNotify => from_enter_notify(&x_event),
            // Mouse motion notify.
            xlib::MotionNotify => Some(from_motion_notify(raw_event)),
            // Mouse button pressed.
            xlib::ButtonPress => Some(from_button_press(raw_event)),
            // Mouse button released.
            xlib::ButtonRelease => Some(from_button_release(raw_event)),
            xlib::KeyPress => from_key_press(&x_event),
            xlib::KeyRelease => from_key_release(&x_event),
            // Keyboard layout changed.
            xlib::MappingNotify => {
                x_event.0.refresh_keyboard_mapping(xlib::XMappingEvent::from(raw_event));
                None
            }
            xlib::Expose => {
                let event = xlib::XExposeEvent::from(raw_event);
                if event.count == 0 {
                    x_event.0.draw_label(event.window);
                }
                None
            }
            _other => None,
        };
        event.into_iter().collect()
    }
}

fn from_map_request(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let event = xlib::XMapRequestEvent::from(x_event.1);
    xw.setup_window(event.window)
}

fn from_unmap_event(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let event = xlib::XUnmapEvent::from(x_event.1);
    if !xw.managed_windows.contains(&event.window) {
        return None;
    }
    if event.send_event == xlib::False {
        xw.force_unmapped(event.window);
        return Some(DisplayEvent::WindowDestroy(WindowHandle(event.window)));
    }
    // Set WM_STATE to withdrawn state.
    xw.set_wm_states(event.window, &[super::xwrap::WITHDRAWN_STATE]);
    None
}

fn from_destroy_notify(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let event = xlib::XDestroyWindowEvent::from(x_event.1);
    if xw.force_unmapped(event.window) {
        return Some(DisplayEvent::WindowDestroy(WindowHandle(event.window)));
    }
    None
}

fn from_focus_in(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let event = xlib::XFocusChangeEvent::from(x_event.1);
    // Check that if a window is taking focus, that it should be.
    if xw.managed_windows.contains(&xw.focused_window) {
        xw.refocus(event.window);
    }
    None
}

fn from_client_message(x_event: XEvent) -> Vec<DisplayEvent> {
    let event = xlib::XClientMessageEvent::from(x_event.1);
    event_translate_client_message::from_event(x_event.0, event)
}

fn from_property_notify(x_event: &XEvent) -> Option<DisplayEvent> {
    let event = xlib::XPropertyEvent::from(x_event.1);
    event_translate_property_notify::from_event(x_event.0, event)
}

fn from_configure_request(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let event = xlib::XConfigureRequestEvent::from(x_event.1);
    // Windows we don't manage get what they ask for.
    if !xw.managed_windows.contains(&event.window) {
        let window_changes = xlib::XWindowChanges {
            x: event.x,
            y: event.y,
            width: event.width,
            height: event.height,
            border_width: event.border_width,
            sibling: event.above,
            stack_mode: event.detail,
        };
        xw.set_window_config(event.window, window_changes, event.value_mask as u32);
        return None;
    }
    let border = xw.current_border(event.window);
    let change = configure_change(&event, border);
    Some(DisplayEvent::ConfigureRequest(WindowHandle(event.window), change))
}

/// The fields of a configure request, with the client size turned into an outer size.
fn configure_change(event: &xlib::XConfigureRequestEvent, border: i32) -> XyhwChange {
    let mask = event.value_mask;
    let has = |bit: u16| mask & c_ulong::from(bit) != 0;
    XyhwChange {
        x: has(xlib::CWX).then_some(event.x),
        y: has(xlib::CWY).then_some(event.y),
        w: has(xlib::CWWidth).then_some(event.width + 2 * border),
        h: has(xlib::CWHeight).then_some(event.height + 2 * border),
    }
}

fn from_configure_notify(x_event: &XEvent) -> Option<DisplayEvent> {
    let xw = &*x_event.0;
    let event = xlib::XConfigureEvent::from(x_event.1);
    // Without xrandr this is the only hint that the outputs changed.
    if event.window != xw.get_default_root() || xw.randr_event_base.is_some() {
        return None;
    }
    Some(DisplayEvent::OutputsChanged(0, xw.get_outputs()))
}

// `XRRUpdateConfiguration`: https://www.x.org/releases/current/doc/man/man3/Xrandr.3.xhtml
fn from_screen_change(x_event: XEvent) -> Option<DisplayEvent> {
    let xw = x_event.0;
    let mut raw_event = x_event.1;
    xw.update_randr_configuration(&mut raw_event);
    Some(DisplayEvent::OutputsChanged(0, xw.get_outputs()))
}

fn from_enter_notify(x_event: &XEvent) -> Option<DisplayEvent> {
    let event = xlib::XCrossingEvent::from(x_event.1);
    if event.mode != xlib::NotifyNormal || event.detail == xlib::NotifyInferior {
        return None;
    }
    Some(DisplayEvent::EnterWindow(
        WindowHandle(event.window),
        event.x_root,
        event.y_root,
    ))
}

fn from_motion_notify(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XMotionEvent::from(raw_event);
    DisplayEvent::Motion(event.x_root, event.y_root, event.time as u64)
}

fn from_button_press(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XButtonPressedEvent::from(raw_event);
    DisplayEvent::MouseCombo(
        clean_mask(event.state),
        Button::from_number(event.button),
        WindowHandle(event.window),
        event.x_root,
        event.y_root,
    )
}

fn from_button_release(raw_event: xlib::XEvent) -> DisplayEvent {
    let event = xlib::XButtonReleasedEvent::from(raw_event);
    DisplayEvent::ButtonRelease(
        Button::from_number(event.button),
        event.x_root,
        event.y_root,
        event.time as u64,
    )
}

fn from_key_press(x_event: &XEvent) -> Option<DisplayEvent> {
    let mut event = xlib::XKeyEvent::from(x_event.1);
    let name = x_event.0.keysym_name(&mut event)?;
    Some(DisplayEvent::KeyPress(
        clean_mask(event.state),
        name,
        event.time as u64,
    ))
}

fn from_key_release(x_event: &XEvent) -> Option<DisplayEvent> {
    let mut event = xlib::XKeyEvent::from(x_event.1);
    let name = x_event.0.keysym_name(&mut event)?;
    Some(DisplayEvent::KeyRelease(name, event.time as u64))
}

/// Keeps the modifier bits of an event state and drops the lock modifiers.
#[must_use]
pub fn clean_mask(state: c_uint) -> ModMask {
    ModMask::from_bits_truncate((state & 0xFF) as u16).clean()
}
