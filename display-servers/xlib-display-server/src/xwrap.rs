//! A wrapper around calls to xlib and X related functions.
// We allow this _ because if we don't we'll receive an error that it isn't read on _task_guard.
#![allow(clippy::used_underscore_binding)]
// We allow this so that extern "C" functions are not flagged as confusing. The current placement
// allows for easy reading.
#![allow(clippy::items_after_statements)]
// We allow this because _y_ and _x_ are intentionally similar. Changing it makes the code noisy.
#![allow(clippy::similar_names)]
use super::xatom::XAtom;
use super::xcursor::XCursor;
use lattice_core::config::{Config, Keybind};
use lattice_core::models::WindowType;
use lattice_core::utils::modmask_lookup::ModMask;
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_long, c_uint, c_ulong};
use std::ptr;
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};
use tokio::time::Duration;

use x11_dl::xlib;
use x11_dl::xrandr::Xrandr;

mod getters;
mod mouse;
mod region;
mod setters;
mod window;

pub use region::Label;

type WindowStateConst = c_long;
pub const WITHDRAWN_STATE: WindowStateConst = 0;
pub const NORMAL_STATE: WindowStateConst = 1;
pub const ICONIC_STATE: WindowStateConst = 2;
const MAX_PROPERTY_VALUE_LEN: c_long = 4096;

pub const ROOT_EVENT_MASK: c_long = xlib::SubstructureRedirectMask
    | xlib::SubstructureNotifyMask
    | xlib::ButtonPressMask
    | xlib::PointerMotionMask
    | xlib::StructureNotifyMask;

const BUTTONMASK: c_long = xlib::ButtonPressMask | xlib::ButtonReleaseMask | xlib::ButtonMotionMask;
const MOUSEMASK: c_long = BUTTONMASK | xlib::PointerMotionMask;

// From X11/extensions/randr.h.
const RR_SCREEN_CHANGE_NOTIFY: c_int = 0;
const RR_SCREEN_CHANGE_NOTIFY_MASK: c_int = 1;
// `XEventsQueued` mode that only counts events already read.
const QUEUED_ALREADY: c_int = 0;

const X_CONFIGUREWINDOW: u8 = 12;
const X_GRABBUTTON: u8 = 28;
const X_GRABKEY: u8 = 33;
const X_SETINPUTFOCUS: u8 = 42;
const X_COPYAREA: u8 = 62;
const X_POLYSEGMENT: u8 = 66;
const X_POLYFILLRECTANGLE: u8 = 70;
const X_POLYTEXT8: u8 = 74;

// This is allowed for now as const extern fns
// are not yet stable (1.56.0, 16 Sept 2021)
// see issue #64926 <https://github.com/rust-lang/rust/issues/64926> for more information.
#[allow(clippy::missing_const_for_fn)]
pub extern "C" fn on_error_from_xlib(_: *mut xlib::Display, er: *mut xlib::XErrorEvent) -> c_int {
    let err = unsafe { *er };
    let ec = err.error_code;
    let rc = err.request_code;
    let ba = ec == xlib::BadAccess;
    let bd = ec == xlib::BadDrawable;
    let bm = ec == xlib::BadMatch;

    // Windows vanish between our requests all the time.
    if ec == xlib::BadWindow
        || (rc == X_CONFIGUREWINDOW && bm)
        || (rc == X_GRABBUTTON && ba)
        || (rc == X_GRABKEY && ba)
        || (rc == X_SETINPUTFOCUS && bm)
        || (rc == X_COPYAREA && bd)
        || (rc == X_POLYSEGMENT && bd)
        || (rc == X_POLYFILLRECTANGLE && bd)
        || (rc == X_POLYTEXT8 && bd)
    {
        return 0;
    }
    tracing::warn!(
        "X error: request {} failed with error code {}",
        rc,
        ec
    );
    0
}

pub extern "C" fn on_error_from_xlib_dummy(
    _: *mut xlib::Display,
    _: *mut xlib::XErrorEvent,
) -> c_int {
    1
}

/// Pixel values of the configured colors.
#[derive(Debug, Default, Clone, Copy)]
pub struct Colors {
    normal: c_ulong,
    focused: c_ulong,
    urgent: c_ulong,
    bar: c_ulong,
    bar_font: c_ulong,
}

#[derive(Debug, Clone)]
pub enum XlibError {
    FailedStatus,
    RootWindowNotFound,
    InvalidXAtom,
}

/// Contains Xserver information and origins.
pub struct XWrap {
    xlib: xlib::Xlib,
    xrandr: Option<Xrandr>,
    display: *mut xlib::Display,
    root: xlib::Window,
    pub atoms: XAtom,
    cursors: XCursor,
    colors: Colors,
    font: *mut xlib::XFontStruct,
    gc: xlib::GC,
    /// Child of root carrying `_NET_SUPPORTING_WM_CHECK`.
    check_window: xlib::Window,
    border_width: i32,
    pub randr_event_base: Option<c_int>,
    pub managed_windows: Vec<xlib::Window>,
    pub focused_window: xlib::Window,
    pub mouse_key_mask: ModMask,
    keybinds: Vec<Keybind>,
    /// Bars and search labels, redrawn on expose.
    pub labels: HashMap<xlib::Window, Label>,
    search_labels: Vec<xlib::Window>,
    _task_guard: oneshot::Receiver<()>,
    pub task_notify: Arc<Notify>,
}

impl XWrap {
    /// Connects to the X server named by `DISPLAY`. Exits the process if that is not
    /// possible or if another window manager is running.
    // `XOpenDisplay`: https://tronche.com/gui/x/xlib/display/opening.html
    // `XConnectionNumber`: https://tronche.com/gui/x/xlib/display/display-macros.html#ConnectionNumber
    // `XDefaultRootWindow`: https://tronche.com/gui/x/xlib/display/display-macros.html#DefaultRootWindow
    // `XSetErrorHandler`: https://tronche.com/gui/x/xlib/event-handling/protocol-errors/XSetErrorHandler.html
    // `XSelectInput`: https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
    #[must_use]
    pub fn new() -> Self {
        const SERVER: mio::Token = mio::Token(0);
        let xlib = match xlib::Xlib::open() {
            Ok(xlib) => xlib,
            Err(err) => fail(&format!("couldn't load Xlib: {err}")),
        };
        let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };
        if display.is_null() {
            fail("couldn't connect to the X server, is DISPLAY set?");
        }

        let fd = unsafe { (xlib.XConnectionNumber)(display) };

        let (guard, _task_guard) = oneshot::channel();
        let notify = Arc::new(Notify::new());
        let task_notify = notify.clone();

        let mut poll = match mio::Poll::new() {
            Ok(poll) => poll,
            Err(err) => fail(&format!("unable to boot mio: {err}")),
        };
        let mut events = mio::Events::with_capacity(1);
        if let Err(err) = poll.registry().register(
            &mut mio::unix::SourceFd(&fd),
            SERVER,
            mio::Interest::READABLE,
        ) {
            fail(&format!("unable to watch the X connection: {err}"));
        }
        let timeout = Duration::from_millis(100);
        tokio::task::spawn_blocking(move || loop {
            if guard.is_closed() {
                return;
            }

            if let Err(err) = poll.poll(&mut events, Some(timeout)) {
                tracing::warn!("Xlib socket poll failed with {:?}", err);
                continue;
            }

            events
                .iter()
                .filter(|event| SERVER == event.token())
                .for_each(|_| notify.notify_one());
        });

        let atoms = XAtom::new(&xlib, display);
        let cursors = XCursor::new(&xlib, display);
        let root = unsafe { (xlib.XDefaultRootWindow)(display) };
        let xrandr = Xrandr::open()
            .map_err(|err| tracing::debug!("xrandr is not available: {err}"))
            .ok();

        let xw = Self {
            xlib,
            xrandr,
            display,
            root,
            atoms,
            cursors,
            colors: Colors::default(),
            font: ptr::null_mut(),
            gc: ptr::null_mut(),
            check_window: 0,
            border_width: 0,
            randr_event_base: None,
            managed_windows: vec![],
            focused_window: root,
            mouse_key_mask: ModMask::empty(),
            keybinds: vec![],
            labels: HashMap::new(),
            search_labels: vec![],
            _task_guard,
            task_notify,
        };

        // Check that another WM is not running.
        extern "C" fn startup_check_for_other_wm(
            _: *mut xlib::Display,
            _: *mut xlib::XErrorEvent,
        ) -> c_int {
            eprintln!("ERROR: another window manager is already running");
            ::std::process::exit(-1);
        }
        unsafe {
            (xw.xlib.XSetErrorHandler)(Some(startup_check_for_other_wm));
            (xw.xlib.XSelectInput)(xw.display, root, xlib::SubstructureRedirectMask);
        };
        xw.sync();

        unsafe { (xw.xlib.XSetErrorHandler)(Some(on_error_from_xlib)) };
        xw.sync();
        xw
    }

    /// Initialize the xwrapper.
    // `XChangeWindowAttributes`: https://tronche.com/gui/x/xlib/window/XChangeWindowAttributes.html
    // `XDeleteProperty`: https://tronche.com/gui/x/xlib/window-information/XDeleteProperty.html
    pub fn init(&mut self, config: &impl Config) {
        self.mouse_key_mask = config.mousekey();
        self.border_width = config.border_width();
        self.keybinds = config.keybinds().to_vec();
        self.load_colors(config);
        self.load_font(&config.bar_font());

        let root = self.root;
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.cursor = self.cursors.normal;
        attrs.event_mask = ROOT_EVENT_MASK;
        self.change_window_attributes(root, xlib::CWEventMask | xlib::CWCursor, attrs);
        self.subscribe_to_event(root, ROOT_EVENT_MASK);
        self.select_screen_changes();
        self.grab_keys();

        // EWMH compliance.
        let supported: Vec<c_long> = self
            .atoms
            .net_supported()
            .iter()
            .map(|&atom| atom as c_long)
            .collect();
        self.replace_property_long(root, self.atoms.NetSupported, xlib::XA_ATOM, &supported);
        unsafe {
            // Cleanup the client list.
            (self.xlib.XDeleteProperty)(self.display, root, self.atoms.NetClientList);
        }
        self.init_supporting_wm_check();
        // A single viewport at the origin.
        self.replace_property_long(
            root,
            self.atoms.NetDesktopViewport,
            xlib::XA_CARDINAL,
            &[0, 0],
        );

        self.sync();
    }

    /// Creates the `_NET_SUPPORTING_WM_CHECK` window and names the window manager on it.
    // `XCreateSimpleWindow`: https://tronche.com/gui/x/xlib/window/XCreateWindow.html
    fn init_supporting_wm_check(&mut self) {
        let check = unsafe {
            (self.xlib.XCreateSimpleWindow)(self.display, self.root, -1, -1, 1, 1, 0, 0, 0)
        };
        self.check_window = check;
        let data = [check as c_long];
        for window in [self.root, check] {
            self.replace_property_long(
                window,
                self.atoms.NetSupportingWmCheck,
                xlib::XA_WINDOW,
                &data,
            );
            self.set_property_string(window, self.atoms.NetWMName, "lattice", self.atoms.UTF8String);
        }
        self.set_property_string(check, self.atoms.WMClass, "lattice", xlib::XA_STRING);
    }

    /// Asks for `RRScreenChangeNotify` on the root window, if xrandr is around.
    // `XRRQueryExtension`: https://www.x.org/releases/current/doc/man/man3/Xrandr.3.xhtml
    fn select_screen_changes(&mut self) {
        let Some(xrandr) = &self.xrandr else {
            return;
        };
        let mut event_base: c_int = 0;
        let mut error_base: c_int = 0;
        let present =
            unsafe { (xrandr.XRRQueryExtension)(self.display, &mut event_base, &mut error_base) };
        if present == 0 {
            tracing::debug!("the X server has no RandR extension");
            return;
        }
        unsafe { (xrandr.XRRSelectInput)(self.display, self.root, RR_SCREEN_CHANGE_NOTIFY_MASK) };
        self.randr_event_base = Some(event_base);
    }

    /// Whether an event of this type is a RandR screen change.
    #[must_use]
    pub fn is_screen_change(&self, event_type: c_int) -> bool {
        self.randr_event_base
            .is_some_and(|base| event_type == base + RR_SCREEN_CHANGE_NOTIFY)
    }

    /// Lets Xlib pick up the new screen size.
    // `XRRUpdateConfiguration`: https://www.x.org/releases/current/doc/man/man3/Xrandr.3.xhtml
    pub fn update_randr_configuration(&self, event: &mut xlib::XEvent) {
        if let Some(xrandr) = &self.xrandr {
            unsafe { (xrandr.XRRUpdateConfiguration)(event) };
        }
    }

    /// Grabs every key binding on the root window. Bindings whose key has no keycode on
    /// this keyboard are skipped.
    // `XGrabKey`: https://tronche.com/gui/x/xlib/input/XGrabKey.html
    // `XUngrabKey`: https://tronche.com/gui/x/xlib/input/XUngrabKey.html
    pub fn grab_keys(&self) {
        unsafe {
            (self.xlib.XUngrabKey)(self.display, xlib::AnyKey, xlib::AnyModifier, self.root);
        }
        for keybind in &self.keybinds {
            let Some(code) = self.keycode(&keybind.key) else {
                tracing::warn!("no keycode for key `{}`, binding skipped", keybind.key);
                continue;
            };
            for modifiers in with_lock_variants(u32::from(keybind.modmask.bits())) {
                unsafe {
                    (self.xlib.XGrabKey)(
                        self.display,
                        c_int::from(code),
                        modifiers,
                        self.root,
                        xlib::True,
                        xlib::GrabModeAsync,
                        xlib::GrabModeAsync,
                    );
                }
            }
        }
    }

    /// Refreshes the keyboard mapping and regrabs the bindings after a keymap change.
    // `XRefreshKeyboardMapping`: https://tronche.com/gui/x/xlib/utilities/keyboard/XRefreshKeyboardMapping.html
    pub fn refresh_keyboard_mapping(&self, mut event: xlib::XMappingEvent) {
        unsafe { (self.xlib.XRefreshKeyboardMapping)(&mut event) };
        if event.request == xlib::MappingKeyboard {
            self.grab_keys();
        }
    }

    /// The name of the unshifted keysym of a key event, such as `Return` or `a`.
    // `XLookupKeysym`: https://tronche.com/gui/x/xlib/utilities/keyboard/XLookupKeysym.html
    // `XKeysymToString`: https://tronche.com/gui/x/xlib/utilities/keyboard/XKeysymToString.html
    pub(crate) fn keysym_name(&self, event: &mut xlib::XKeyEvent) -> Option<String> {
        let keysym = unsafe { (self.xlib.XLookupKeysym)(event, 0) };
        if keysym == 0 {
            return None;
        }
        let raw = unsafe { (self.xlib.XKeysymToString)(keysym) };
        if raw.is_null() {
            return None;
        }
        // Static storage owned by Xlib.
        Some(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
    }

    /// The keycode producing the keysym called `name` on this keyboard.
    // `XStringToKeysym`: https://tronche.com/gui/x/xlib/utilities/keyboard/XStringToKeysym.html
    // `XKeysymToKeycode`: https://tronche.com/gui/x/xlib/utilities/keyboard/XKeysymToKeycode.html
    fn keycode(&self, name: &str) -> Option<xlib::KeyCode> {
        let cname = CString::new(name).ok()?;
        let keysym = unsafe { (self.xlib.XStringToKeysym)(cname.as_ptr()) };
        if keysym == 0 {
            return None;
        }
        let code = unsafe { (self.xlib.XKeysymToKeycode)(self.display, keysym) };
        (code != 0).then_some(code)
    }

    /// Send a xevent atom for a window to X.
    // `XSendEvent`: https://tronche.com/gui/x/xlib/event-handling/XSendEvent.html
    fn send_xevent_atom(&self, window: xlib::Window, atom: xlib::Atom) -> bool {
        if self.can_send_xevent_atom(window, atom) {
            let mut msg: xlib::XClientMessageEvent = unsafe { std::mem::zeroed() };
            msg.type_ = xlib::ClientMessage;
            msg.window = window;
            msg.message_type = self.atoms.WMProtocols;
            msg.format = 32;
            msg.data.set_long(0, atom as c_long);
            msg.data.set_long(1, xlib::CurrentTime as c_long);
            let mut ev: xlib::XEvent = msg.into();
            self.send_xevent(window, 0, xlib::NoEventMask, &mut ev);
            return true;
        }
        false
    }

    /// Send a xevent for a window to X.
    // `XSendEvent`: https://tronche.com/gui/x/xlib/event-handling/XSendEvent.html
    pub fn send_xevent(
        &self,
        window: xlib::Window,
        propogate: i32,
        mask: c_long,
        event: &mut xlib::XEvent,
    ) {
        unsafe { (self.xlib.XSendEvent)(self.display, window, propogate, mask, event) };
    }

    /// Returns whether a window can recieve a xevent atom.
    fn can_send_xevent_atom(&self, window: xlib::Window, atom: xlib::Atom) -> bool {
        self.get_wm_protocols(window).contains(&atom)
    }

    /// Load the colors of our theme.
    pub fn load_colors(&mut self, config: &impl Config) {
        self.colors = Colors {
            normal: self.get_color(config.default_border_color()),
            focused: self.get_color(config.focused_border_color()),
            urgent: self.get_color(config.urgent_border_color()),
            bar: self.get_color(config.bar_color()),
            bar_font: self.get_color(config.bar_font_color()),
        };
    }

    /// Loads the bar font and the graphics context bars and labels are drawn with.
    /// Falls back to the server's `fixed` font.
    // `XLoadQueryFont`: https://tronche.com/gui/x/xlib/graphics/font-metrics/XLoadQueryFont.html
    // `XCreateGC`: https://tronche.com/gui/x/xlib/GC/XCreateGC.html
    fn load_font(&mut self, name: &str) {
        let load = |name: &str| -> *mut xlib::XFontStruct {
            match CString::new(name) {
                Ok(cname) => unsafe { (self.xlib.XLoadQueryFont)(self.display, cname.as_ptr()) },
                Err(_) => ptr::null_mut(),
            }
        };
        let mut font = load(name);
        if font.is_null() {
            tracing::warn!("could not load font `{name}`, falling back to `fixed`");
            font = load("fixed");
        }
        self.font = font;
        unsafe {
            self.gc = (self.xlib.XCreateGC)(self.display, self.root, 0, ptr::null_mut());
            if !font.is_null() {
                (self.xlib.XSetFont)(self.display, self.gc, (*font).fid);
            }
        }
    }

    /// The border a window of this type gets when it is managed.
    pub(crate) fn border_for(&self, r#type: WindowType) -> i32 {
        if r#type.is_screen_sticky() || r#type == WindowType::Splash {
            0
        } else {
            self.border_width
        }
    }

    /// Flush and sync the xserver.
    // `XSync`: https://tronche.com/gui/x/xlib/event-handling/XSync.html
    pub fn sync(&self) {
        unsafe { (self.xlib.XSync)(self.display, xlib::False) };
    }

    /// Flush the xserver.
    // `XFlush`: https://tronche.com/gui/x/xlib/event-handling/XFlush.html
    pub fn flush(&self) {
        unsafe { (self.xlib.XFlush)(self.display) };
    }

    /// Returns how many events are waiting.
    // `XPending`: https://tronche.com/gui/x/xlib/event-handling/XPending.html
    #[must_use]
    pub fn queue_len(&self) -> i32 {
        unsafe { (self.xlib.XPending)(self.display) }
    }

    /// Returns how many events Xlib already read off the socket.
    // `XEventsQueued`: https://tronche.com/gui/x/xlib/event-handling/XEventsQueued.html
    #[must_use]
    pub fn queued_already(&self) -> i32 {
        unsafe { (self.xlib.XEventsQueued)(self.display, QUEUED_ALREADY) }
    }
}

impl Drop for XWrap {
    // `XCloseDisplay`: https://tronche.com/gui/x/xlib/display/XCloseDisplay.html
    fn drop(&mut self) {
        let windows: Vec<xlib::Window> = self.labels.keys().copied().collect();
        unsafe {
            for window in windows {
                (self.xlib.XDestroyWindow)(self.display, window);
            }
            if self.check_window != 0 {
                (self.xlib.XDestroyWindow)(self.display, self.check_window);
            }
            (self.xlib.XUngrabKey)(self.display, xlib::AnyKey, xlib::AnyModifier, self.root);
            if !self.font.is_null() {
                (self.xlib.XFreeFont)(self.display, self.font);
            }
            if !self.gc.is_null() {
                (self.xlib.XFreeGC)(self.display, self.gc);
            }
            self.cursors.free(&self.xlib, self.display);
            (self.xlib.XSetInputFocus)(
                self.display,
                xlib::PointerRoot as c_ulong,
                xlib::RevertToPointerRoot,
                xlib::CurrentTime,
            );
            (self.xlib.XDeleteProperty)(self.display, self.root, self.atoms.NetActiveWindow);
            (self.xlib.XCloseDisplay)(self.display);
        }
    }
}

/// `modifiers` with and without the lock modifiers (caps lock and num lock), which never
/// take part in a binding.
pub(crate) fn with_lock_variants(modifiers: c_uint) -> [c_uint; 4] {
    [
        modifiers,
        modifiers | xlib::Mod2Mask,
        modifiers | xlib::LockMask,
        modifiers | xlib::Mod2Mask | xlib::LockMask,
    ]
}

/// Reads a C string returned by Xlib and frees it.
pub(crate) fn take_xlib_string(xlib: &xlib::Xlib, raw: *mut c_char) -> Option<String> {
    if raw.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
    unsafe { (xlib.XFree)(raw.cast()) };
    Some(text)
}

fn fail(reason: &str) -> ! {
    tracing::error!("{reason}");
    eprintln!("ERROR: {reason}");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_variants_cover_caps_and_num_lock() {
        let variants = with_lock_variants(xlib::Mod4Mask);
        assert!(variants.contains(&xlib::Mod4Mask));
        assert!(variants.contains(&(xlib::Mod4Mask | xlib::Mod2Mask | xlib::LockMask)));
        assert!(variants.iter().all(|m| m & xlib::Mod4Mask != 0));
    }
}
