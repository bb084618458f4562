// allow casting types
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod event_translate;
mod event_translate_client_message;
mod event_translate_property_notify;
mod xatom;
mod xcursor;
mod xwrap;

pub use xwrap::XWrap;

use self::xwrap::ICONIC_STATE;
use event_translate::XEvent;
use futures::prelude::*;
use lattice_core::config::Config;
use lattice_core::models::{WindowHandle, Xyhw};
use lattice_core::{DisplayAction, DisplayEvent, DisplayServer, Window};
use std::ffi::CString;
use std::pin::Pin;

use x11_dl::xlib;

pub struct XlibDisplayServer {
    xw: XWrap,
    root: xlib::Window,
    initial_events: Vec<DisplayEvent>,
}

impl DisplayServer for XlibDisplayServer {
    fn new(config: &impl Config) -> Self {
        let mut wrap = XWrap::new();

        wrap.init(config); // setup events masks

        let root = wrap.get_default_root();
        let instance = Self {
            xw: wrap,
            root,
            initial_events: Vec::new(),
        };
        let initial_events = instance.initial_events();

        Self {
            initial_events,
            ..instance
        }
    }

    fn update_windows(&self, windows: Vec<&Window>) {
        for window in &windows {
            self.xw.update_window(window);
        }
    }

    fn get_next_events(&mut self) -> Vec<DisplayEvent> {
        let mut events = std::mem::take(&mut self.initial_events);

        let events_in_queue = self.xw.queue_len();
        for _ in 0..events_in_queue {
            let xlib_event = self.xw.get_next_event();
            let translated: Vec<DisplayEvent> = XEvent(&mut self.xw, xlib_event).into();
            for e in translated {
                tracing::trace!("DisplayEvent: {:?}", e);
                events.push(e);
            }
        }

        events
    }

    fn execute_action(&mut self, act: DisplayAction) -> Option<DisplayEvent> {
        tracing::trace!("DisplayAction: {:?}", act);
        let xw = &mut self.xw;
        let event: Option<DisplayEvent> = match act {
            DisplayAction::AddedWindow(h) => from_added_window(xw, h),
            DisplayAction::DestroyedWindow(h) => from_destroyed_window(xw, h),
            DisplayAction::KillWindow(h, force) => from_kill_window(xw, h, force),
            DisplayAction::WindowTakeFocus { window, previous } => {
                from_window_take_focus(xw, &window, previous)
            }
            DisplayAction::Unfocus(h) => from_unfocus(xw, h),
            DisplayAction::FocusWindowUnderCursor => from_focus_window_under_cursor(xw),
            DisplayAction::SetState(h, states) => {
                xw.set_window_states(h.0, &states);
                None
            }
            DisplayAction::SetWindowWorkspace(h, ws) => {
                xw.set_window_workspace(h.0, ws);
                None
            }
            DisplayAction::SetCurrentDesktop(index) => {
                xw.set_current_desktop(index);
                None
            }
            DisplayAction::SetDesktopNames(names) => {
                xw.set_desktop_names(&names);
                None
            }
            DisplayAction::SetNumberOfDesktops(count) => {
                xw.set_number_of_desktops(count);
                None
            }
            DisplayAction::SetClientList(handles) => {
                xw.set_client_list(&handles);
                None
            }
            DisplayAction::RestackChain(handles) => {
                xw.restack_chain(&handles);
                None
            }
            DisplayAction::BeginGrab(h, kind) => Some(xw.begin_grab(h, kind)),
            DisplayAction::EndGrab => {
                xw.end_grab();
                None
            }
            DisplayAction::ShowSearchLabels(labels) => {
                xw.show_search_labels(labels);
                None
            }
            DisplayAction::HideSearchLabels => {
                xw.hide_search_labels();
                None
            }
            DisplayAction::CreateRegionWindows { region, g, bar } => {
                Some(xw.create_region_windows(region, g, bar))
            }
            DisplayAction::DestroyRegionWindows { sink, bar } => {
                xw.destroy_region_windows(sink, bar);
                None
            }
            DisplayAction::ConfigureRegionWindows { sink, g, bar } => {
                xw.configure_region_windows(sink, g, bar);
                None
            }
            DisplayAction::UpdateBar(h, status) => {
                xw.update_bar(h, status.to_string());
                None
            }
            DisplayAction::ShowBar(h, visible) => {
                xw.show_bar(h, visible);
                None
            }
            DisplayAction::SendConfigureNotify(h, g, border) => {
                from_send_configure_notify(xw, h, g, border)
            }
            DisplayAction::ReplayClick(h, button) => {
                xw.replay_click(h.0, button);
                None
            }
            DisplayAction::WarpPointer(x, y) => {
                xw.move_cursor_to_point((x, y));
                None
            }
        };
        if event.is_some() {
            tracing::trace!("DisplayEvent: {:?}", event);
        }
        event
    }

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()>>> {
        // Events Xlib already read off the socket never wake the poll thread.
        if self.xw.queued_already() > 0 {
            return Box::pin(future::ready(()));
        }
        let task_notify = self.xw.task_notify.clone();
        Box::pin(async move {
            task_notify.notified().await;
        })
    }

    fn flush(&self) {
        self.xw.flush();
    }
}

impl XlibDisplayServer {
    /// Return a vec of events for setting up state of WM.
    fn initial_events(&self) -> Vec<DisplayEvent> {
        let root_geometry = self.xw.get_root_geometry();
        let mut events = vec![
            DisplayEvent::ScreenCreate(WindowHandle(self.root), root_geometry),
            DisplayEvent::OutputsChanged(0, self.xw.get_outputs()),
        ];

        // Tell manager about existing windows.
        events.append(&mut self.find_all_windows());

        events
    }

    fn find_all_windows(&self) -> Vec<DisplayEvent> {
        let mut all: Vec<DisplayEvent> = Vec::new();
        match self.xw.get_all_windows() {
            Ok(handles) => handles.into_iter().for_each(|handle| {
                let Ok(attrs) = self.xw.get_window_attrs(handle) else {
                    return;
                };
                let state = self.xw.get_wm_state(handle);
                if attrs.map_state == xlib::IsViewable || state == Some(ICONIC_STATE) {
                    if let Some(event) = self.xw.setup_window(handle) {
                        all.push(event);
                    }
                }
            }),
            Err(err) => {
                tracing::error!("could not list the existing windows: {:?}", err);
            }
        }
        all
    }
}

/// Whether `name` is a keysym Xlib knows, such as `Return` or `F1`.
#[must_use]
pub fn is_valid_keysym(name: &str) -> bool {
    let Ok(xlib) = xlib::Xlib::open() else {
        return false;
    };
    let Ok(cname) = CString::new(name) else {
        return false;
    };
    unsafe { (xlib.XStringToKeysym)(cname.as_ptr()) != 0 }
}

// Display actions.
fn from_added_window(xw: &mut XWrap, handle: WindowHandle) -> Option<DisplayEvent> {
    xw.setup_managed_window(handle);
    None
}

fn from_destroyed_window(xw: &mut XWrap, handle: WindowHandle) -> Option<DisplayEvent> {
    xw.teardown_managed_window(handle);
    None
}

fn from_kill_window(xw: &mut XWrap, handle: WindowHandle, force: bool) -> Option<DisplayEvent> {
    xw.kill_window(handle, force);
    None
}

fn from_window_take_focus(
    xw: &mut XWrap,
    window: &Window,
    previous: Option<WindowHandle>,
) -> Option<DisplayEvent> {
    xw.window_take_focus(window, previous);
    None
}

fn from_unfocus(xw: &mut XWrap, handle: Option<WindowHandle>) -> Option<DisplayEvent> {
    xw.unfocus(handle);
    None
}

fn from_focus_window_under_cursor(xw: &mut XWrap) -> Option<DisplayEvent> {
    let (mut window, x, y) = xw.get_pointer().ok()?;
    if window == 0 {
        window = xw.get_default_root();
    }
    Some(DisplayEvent::EnterWindow(WindowHandle(window), x, y))
}

fn from_send_configure_notify(
    xw: &mut XWrap,
    handle: WindowHandle,
    g: Xyhw,
    border: i32,
) -> Option<DisplayEvent> {
    xw.configure_window(handle.0, g, border);
    None
}
