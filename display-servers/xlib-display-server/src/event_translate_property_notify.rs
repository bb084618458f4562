use super::{DisplayEvent, XWrap};
use lattice_core::models::{WindowChange, WindowHandle};

use x11_dl::xlib;

pub fn from_event(xw: &XWrap, event: xlib::XPropertyEvent) -> Option<DisplayEvent> {
    if event.window == xw.get_default_root() || !xw.managed_windows.contains(&event.window) {
        return None;
    }

    if tracing::enabled!(tracing::Level::TRACE) {
        let event_name = xw.get_xatom_name(event.atom).unwrap_or_default();
        tracing::trace!("PropertyNotify: {} : {:?}", event_name, &event);
    }

    let deleted = event.state == xlib::PropertyDelete;
    let handle = WindowHandle(event.window);
    let mut change = WindowChange::new(handle);

    match event.atom {
        xlib::XA_WM_TRANSIENT_FOR => {
            let trans = if deleted {
                None
            } else {
                xw.get_transient_for(event.window)
            };
            change.transient = Some(trans.map(WindowHandle));
        }
        xlib::XA_WM_NORMAL_HINTS => change.hints = Some(xw.get_size_hints(event.window)),
        xlib::XA_WM_HINTS => build_change_hints(xw, event.window, &mut change),
        xlib::XA_WM_NAME => change.name = Some(xw.get_window_name(event.window)),
        atom if atom == xw.atoms.NetWMName => {
            change.name = Some(xw.get_window_name(event.window));
        }
        atom if atom == xw.atoms.NetWMStrut || atom == xw.atoms.NetWMStrutPartial => {
            change.strut = Some(xw.get_window_strut(event.window));
        }
        atom if atom == xw.atoms.NetWMWindowType => {
            change.r#type = Some(xw.get_window_type(event.window));
        }
        _ => return None,
    }
    Some(DisplayEvent::WindowChange(change))
}

fn build_change_hints(xw: &XWrap, window: xlib::Window, change: &mut WindowChange) {
    let (accepts_input, urgent) = xw.get_input_and_urgency(window);
    change.accepts_input = Some(accepts_input);
    // The focused window never stays urgent, its hint gets cleared on focus.
    change.urgent = Some(urgent && window != xw.focused_window);
}
