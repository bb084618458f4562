//! `XWrap` getters.
use super::{take_xlib_string, XlibError, MAX_PROPERTY_VALUE_LEN};
use crate::XWrap;
use lattice_core::models::{
    Rotation, SizeHints, Strut, WindowHandle, WindowInfo, WindowState, WindowType, Xyhw,
};
use std::ffi::CString;
use std::os::raw::{c_int, c_long, c_uchar, c_uint, c_ulong};
use std::slice;
use x11_dl::xlib;

// Rotation bits of a CRTC, from X11/extensions/randr.h.
const RR_ROTATE_0: u16 = 1;
const RR_ROTATE_90: u16 = 2;
const RR_ROTATE_180: u16 = 4;
const RR_ROTATE_270: u16 = 8;

impl XWrap {
    // Public functions.

    /// Returns the children of the root window, bottom to top.
    /// # Errors
    ///
    /// Will error if the tree of the root cannot be queried.
    // `XQueryTree`: https://tronche.com/gui/x/xlib/window-information/XQueryTree.html
    pub fn get_all_windows(&self) -> Result<Vec<xlib::Window>, XlibError> {
        unsafe {
            let mut root_return: xlib::Window = 0;
            let mut parent_return: xlib::Window = 0;
            let mut array: *mut xlib::Window = std::ptr::null_mut();
            let mut length: c_uint = 0;
            let status: xlib::Status = (self.xlib.XQueryTree)(
                self.display,
                self.root,
                &mut root_return,
                &mut parent_return,
                &mut array,
                &mut length,
            );
            if status == 0 {
                return Err(XlibError::FailedStatus);
            }
            if array.is_null() {
                return Ok(vec![]);
            }
            let windows = slice::from_raw_parts(array, length as usize).to_vec();
            (self.xlib.XFree)(array.cast());
            Ok(windows)
        }
    }

    /// Returns the pixel value of a named color. Unknown names give black.
    // `XDefaultScreen`: https://tronche.com/gui/x/xlib/display/display-macros.html#DefaultScreen
    // `XDefaultColormap`: https://tronche.com/gui/x/xlib/display/display-macros.html#DefaultColormap
    // `XAllocNamedColor`: https://tronche.com/gui/x/xlib/color/XAllocNamedColor.html
    #[must_use]
    pub fn get_color(&self, color: String) -> c_ulong {
        let Ok(name) = CString::new(color.clone()) else {
            return 0;
        };
        unsafe {
            let screen = (self.xlib.XDefaultScreen)(self.display);
            let cmap: xlib::Colormap = (self.xlib.XDefaultColormap)(self.display, screen);
            let mut xcolor: xlib::XColor = std::mem::zeroed();
            let mut exact: xlib::XColor = std::mem::zeroed();
            let status = (self.xlib.XAllocNamedColor)(
                self.display,
                cmap,
                name.as_ptr(),
                &mut xcolor,
                &mut exact,
            );
            if status == 0 {
                tracing::warn!("unknown color `{color}`");
            }
            xcolor.pixel
        }
    }

    /// Returns the pointer position in root coordinates and the child of root below it.
    /// # Errors
    ///
    /// Will error if the pointer is on another screen.
    // `XQueryPointer`: https://tronche.com/gui/x/xlib/window-information/XQueryPointer.html
    pub fn get_pointer(&self) -> Result<(xlib::Window, i32, i32), XlibError> {
        let mut root_return: xlib::Window = 0;
        let mut child_return: xlib::Window = 0;
        let mut root_x_return: c_int = 0;
        let mut root_y_return: c_int = 0;
        let mut win_x_return: c_int = 0;
        let mut win_y_return: c_int = 0;
        let mut mask_return: c_uint = 0;
        let success = unsafe {
            (self.xlib.XQueryPointer)(
                self.display,
                self.root,
                &mut root_return,
                &mut child_return,
                &mut root_x_return,
                &mut root_y_return,
                &mut win_x_return,
                &mut win_y_return,
                &mut mask_return,
            )
        };
        if success == 0 {
            return Err(XlibError::RootWindowNotFound);
        }
        Ok((child_return, root_x_return, root_y_return))
    }

    /// Returns the current position of the cursor.
    #[must_use]
    pub fn get_cursor_point(&self) -> (i32, i32) {
        self.get_pointer()
            .map(|(_, x, y)| (x, y))
            .unwrap_or_default()
    }

    /// Returns the default root.
    #[must_use]
    pub const fn get_default_root(&self) -> xlib::Window {
        self.root
    }

    /// Returns the geometry of the root window.
    #[must_use]
    pub fn get_root_geometry(&self) -> Xyhw {
        self.get_window_attrs(self.root)
            .map(|attrs| Xyhw::new(attrs.x, attrs.y, attrs.width, attrs.height))
            .unwrap_or_default()
    }

    /// Returns the `WM_NORMAL_HINTS` of a window.
    #[must_use]
    pub fn get_size_hints(&self, window: xlib::Window) -> SizeHints {
        self.get_hint_sizing(window)
            .map(|size| size_hints_from(&size))
            .unwrap_or_default()
    }

    /// Returns the next `Xevent` of the xserver.
    // `XNextEvent`: https://tronche.com/gui/x/xlib/event-handling/manipulating-event-queue/XNextEvent.html
    #[must_use]
    pub fn get_next_event(&self) -> xlib::XEvent {
        unsafe {
            let mut event: xlib::XEvent = std::mem::zeroed();
            (self.xlib.XNextEvent)(self.display, &mut event);
            event
        }
    }

    /// Returns the physical outputs with their rotation. Uses xrandr when the server has it,
    /// then Xinerama, then the root window itself.
    #[must_use]
    pub fn get_outputs(&self) -> Vec<(Xyhw, Rotation)> {
        let outputs = self.get_randr_outputs();
        if !outputs.is_empty() {
            return outputs;
        }
        let outputs = self.get_xinerama_outputs();
        if !outputs.is_empty() {
            return outputs;
        }
        vec![(self.get_root_geometry(), Rotation::Normal)]
    }

    /// Returns the transient parent of a window.
    // `XGetTransientForHint`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetTransientForHint.html
    #[must_use]
    pub fn get_transient_for(&self, window: xlib::Window) -> Option<xlib::Window> {
        unsafe {
            let mut transient: xlib::Window = 0;
            let status: c_int =
                (self.xlib.XGetTransientForHint)(self.display, window, &mut transient);
            if status > 0 && transient != 0 {
                Some(transient)
            } else {
                None
            }
        }
    }

    /// Returns the attributes of a window.
    /// # Errors
    ///
    /// Will error if window status is 0 (no attributes).
    // `XGetWindowAttributes`: https://tronche.com/gui/x/xlib/window-information/XGetWindowAttributes.html
    pub fn get_window_attrs(
        &self,
        window: xlib::Window,
    ) -> Result<xlib::XWindowAttributes, XlibError> {
        let mut attrs: xlib::XWindowAttributes = unsafe { std::mem::zeroed() };
        let status = unsafe { (self.xlib.XGetWindowAttributes)(self.display, window, &mut attrs) };
        if status == 0 {
            return Err(XlibError::FailedStatus);
        }
        Ok(attrs)
    }

    /// Returns the instance and class of `WM_CLASS`.
    // `XGetClassHint`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetClassHint.html
    #[must_use]
    pub fn get_window_class(&self, window: xlib::Window) -> (Option<String>, Option<String>) {
        unsafe {
            let mut class_return: xlib::XClassHint = std::mem::zeroed();
            let status = (self.xlib.XGetClassHint)(self.display, window, &mut class_return);
            if status == 0 {
                return (None, None);
            }
            (
                take_xlib_string(&self.xlib, class_return.res_name),
                take_xlib_string(&self.xlib, class_return.res_class),
            )
        }
    }

    /// Gathers what the window manager needs to manage `window`. Returns `None` for windows
    /// that are gone or must not be managed.
    #[must_use]
    pub fn get_window_info(&self, window: xlib::Window) -> Option<WindowInfo> {
        let attrs = self.get_window_attrs(window).ok()?;
        if attrs.override_redirect != 0 || window == self.check_window {
            return None;
        }
        let r#type = self.get_window_type(window);
        let border = self.border_for(r#type);
        let (instance, class) = self.get_window_class(window);
        let protocols = self.get_wm_protocols(window);
        let (accepts_input, urgent) = self.get_input_and_urgency(window);
        Some(WindowInfo {
            handle: WindowHandle(window),
            name: self.get_window_name(window),
            class,
            instance,
            r#type,
            pid: self.get_window_pid(window),
            geometry: Xyhw::new(
                attrs.x,
                attrs.y,
                attrs.width + 2 * border,
                attrs.height + 2 * border,
            ),
            border,
            hints: self.get_size_hints(window),
            transient_for: self.get_transient_for(window).map(WindowHandle),
            takes_focus: protocols.contains(&self.atoms.WMTakeFocus),
            can_delete: protocols.contains(&self.atoms.WMDelete),
            accepts_input,
            urgent,
            states: self.get_window_states(window),
            strut: self.get_window_strut(window),
            stored_workspace: self.get_stored_workspace(window),
        })
    }

    /// Returns whether the window wants input focus and whether it is urgent, from `WM_HINTS`.
    /// Windows without hints take input.
    #[must_use]
    pub fn get_input_and_urgency(&self, window: xlib::Window) -> (bool, bool) {
        match self.get_wmhints(window) {
            Some(hints) => (
                hints.flags & xlib::InputHint == 0 || hints.input != 0,
                hints.flags & xlib::XUrgencyHint != 0,
            ),
            None => (true, false),
        }
    }

    /// Returns a windows name, preferring `_NET_WM_NAME`.
    #[must_use]
    pub fn get_window_name(&self, window: xlib::Window) -> Option<String> {
        self.get_text_prop(window, self.atoms.NetWMName)
            .or_else(|_| self.get_text_prop(window, xlib::XA_WM_NAME))
            .ok()
    }

    /// Returns a windows `_NET_WM_PID`.
    #[must_use]
    pub fn get_window_pid(&self, window: xlib::Window) -> Option<u32> {
        let values = self.get_property_longs(window, self.atoms.NetWMPid, xlib::XA_CARDINAL)?;
        values.first().and_then(|&pid| u32::try_from(pid).ok())
    }

    /// Returns the workspace we stored on a window before a restart.
    #[must_use]
    pub fn get_stored_workspace(&self, window: xlib::Window) -> Option<usize> {
        let values =
            self.get_property_longs(window, self.atoms.LatticeWorkspace, xlib::XA_CARDINAL)?;
        values.first().and_then(|&ws| usize::try_from(ws).ok())
    }

    /// Returns the states of a window.
    #[must_use]
    pub fn get_window_states(&self, window: xlib::Window) -> Vec<WindowState> {
        let atoms = self.get_window_states_atoms(window);

        // Both maximized atoms together make `WindowState::Maximized`.
        let maximized = atoms.contains(&self.atoms.NetWMStateMaximizedVert)
            && atoms.contains(&self.atoms.NetWMStateMaximizedHorz);

        let mut states: Vec<WindowState> = atoms
            .iter()
            .filter_map(|&atom| self.window_state_from_atom(atom))
            .filter(|state| {
                !maximized
                    || !matches!(state, WindowState::MaximizedVert | WindowState::MaximizedHorz)
            })
            .collect();

        if maximized {
            states.push(WindowState::Maximized);
        }
        states
    }

    /// Returns the atom states of a window.
    #[must_use]
    pub fn get_window_states_atoms(&self, window: xlib::Window) -> Vec<xlib::Atom> {
        self.get_property_longs(window, self.atoms.NetWMState, xlib::XA_ATOM)
            .map(|values| values.into_iter().map(|v| v as xlib::Atom).collect())
            .unwrap_or_default()
    }

    /// Maps a `_NET_WM_STATE_*` atom.
    #[must_use]
    pub fn window_state_from_atom(&self, atom: xlib::Atom) -> Option<WindowState> {
        let a = &self.atoms;
        let pairs = [
            (a.NetWMStateModal, WindowState::Modal),
            (a.NetWMStateSticky, WindowState::Sticky),
            (a.NetWMStateMaximizedVert, WindowState::MaximizedVert),
            (a.NetWMStateMaximizedHorz, WindowState::MaximizedHorz),
            (a.NetWMStateShaded, WindowState::Shaded),
            (a.NetWMStateSkipTaskbar, WindowState::SkipTaskbar),
            (a.NetWMStateSkipPager, WindowState::SkipPager),
            (a.NetWMStateHidden, WindowState::Hidden),
            (a.NetWMStateFullscreen, WindowState::Fullscreen),
            (a.NetWMStateAbove, WindowState::Above),
            (a.NetWMStateBelow, WindowState::Below),
            (a.NetWMStateDemandsAttention, WindowState::DemandsAttention),
        ];
        pairs
            .iter()
            .find(|(candidate, _)| *candidate == atom)
            .map(|(_, state)| *state)
    }

    /// Returns the space a window reserves, preferring `_NET_WM_STRUT_PARTIAL`.
    #[must_use]
    pub fn get_window_strut(&self, window: xlib::Window) -> Option<Strut> {
        if let Some(values) =
            self.get_property_longs(window, self.atoms.NetWMStrutPartial, xlib::XA_CARDINAL)
        {
            if values.len() == 12 {
                let values: Vec<i64> = values.into_iter().map(i64::from).collect();
                let strut = Strut::from(&values[..]);
                tracing::trace!("STRUT:[{:?}] {:?}", window, strut);
                return Some(strut);
            }
        }
        let values = self.get_property_longs(window, self.atoms.NetWMStrut, xlib::XA_CARDINAL)?;
        if values.len() < 4 {
            return None;
        }
        let edge = |i: usize| i32::try_from(values[i]).unwrap_or_default();
        let strut = Strut::full_edges(edge(0), edge(1), edge(2), edge(3), &self.get_root_geometry());
        tracing::trace!("STRUT:[{:?}] {:?}", window, strut);
        Some(strut)
    }

    /// Returns the type of a window.
    #[must_use]
    pub fn get_window_type(&self, window: xlib::Window) -> WindowType {
        let atom = self
            .get_property_longs(window, self.atoms.NetWMWindowType, xlib::XA_ATOM)
            .and_then(|values| values.first().map(|&v| v as xlib::Atom));
        match atom {
            x if x == Some(self.atoms.NetWMWindowTypeDesktop) => WindowType::Desktop,
            x if x == Some(self.atoms.NetWMWindowTypeDock) => WindowType::Dock,
            x if x == Some(self.atoms.NetWMWindowTypeToolbar) => WindowType::Toolbar,
            x if x == Some(self.atoms.NetWMWindowTypeMenu) => WindowType::Menu,
            x if x == Some(self.atoms.NetWMWindowTypeUtility) => WindowType::Utility,
            x if x == Some(self.atoms.NetWMWindowTypeSplash) => WindowType::Splash,
            x if x == Some(self.atoms.NetWMWindowTypeDialog) => WindowType::Dialog,
            _ => WindowType::Normal,
        }
    }

    /// Returns the `WM_HINTS` of a window.
    // `XGetWMHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMHints.html
    #[must_use]
    pub fn get_wmhints(&self, window: xlib::Window) -> Option<xlib::XWMHints> {
        unsafe {
            let hints_ptr: *mut xlib::XWMHints = (self.xlib.XGetWMHints)(self.display, window);
            if hints_ptr.is_null() {
                return None;
            }
            let hints: xlib::XWMHints = *hints_ptr;
            (self.xlib.XFree)(hints_ptr.cast());
            Some(hints)
        }
    }

    /// Returns the `WM_PROTOCOLS` of a window.
    // `XGetWMProtocols`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMProtocols.html
    #[must_use]
    pub fn get_wm_protocols(&self, window: xlib::Window) -> Vec<xlib::Atom> {
        unsafe {
            let mut array: *mut xlib::Atom = std::ptr::null_mut();
            let mut length: c_int = 0;
            let status =
                (self.xlib.XGetWMProtocols)(self.display, window, &mut array, &mut length);
            if status == 0 || array.is_null() {
                return vec![];
            }
            let protocols = slice::from_raw_parts(array, length as usize).to_vec();
            (self.xlib.XFree)(array.cast());
            protocols
        }
    }

    /// Returns the `WM_STATE` of a window.
    #[must_use]
    pub fn get_wm_state(&self, window: xlib::Window) -> Option<c_long> {
        self.get_property_longs(window, self.atoms.WMState, self.atoms.WMState)?
            .first()
            .copied()
    }

    /// Returns the name of a `XAtom`.
    /// # Errors
    ///
    /// Errors if `XAtom` is not valid.
    // `XGetAtomName`: https://tronche.com/gui/x/xlib/window-information/XGetAtomName.html
    pub fn get_xatom_name(&self, atom: xlib::Atom) -> Result<String, XlibError> {
        let raw = unsafe { (self.xlib.XGetAtomName)(self.display, atom) };
        take_xlib_string(&self.xlib, raw).ok_or(XlibError::InvalidXAtom)
    }

    // Internal functions.

    /// Returns the `WM_SIZE_HINTS`/`WM_NORMAL_HINTS` of a window.
    // `XGetWMNormalHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetWMNormalHints.html
    fn get_hint_sizing(&self, window: xlib::Window) -> Option<xlib::XSizeHints> {
        let mut xsize: xlib::XSizeHints = unsafe { std::mem::zeroed() };
        let mut msize: c_long = xlib::PSize;
        let status =
            unsafe { (self.xlib.XGetWMNormalHints)(self.display, window, &mut xsize, &mut msize) };
        match status {
            0 => None,
            _ => Some(xsize),
        }
    }

    /// Returns a 32 bit property of a window, copied out of the reply.
    // `XGetWindowProperty`: https://tronche.com/gui/x/xlib/window-information/XGetWindowProperty.html
    fn get_property_longs(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        r#type: xlib::Atom,
    ) -> Option<Vec<c_long>> {
        let mut format_return: i32 = 0;
        let mut nitems_return: c_ulong = 0;
        let mut type_return: xlib::Atom = 0;
        let mut bytes_after_return: c_ulong = 0;
        let mut prop_return: *mut c_uchar = std::ptr::null_mut();
        unsafe {
            let status = (self.xlib.XGetWindowProperty)(
                self.display,
                window,
                property,
                0,
                MAX_PROPERTY_VALUE_LEN / 4,
                xlib::False,
                r#type,
                &mut type_return,
                &mut format_return,
                &mut nitems_return,
                &mut bytes_after_return,
                &mut prop_return,
            );
            if status != i32::from(xlib::Success) || prop_return.is_null() {
                return None;
            }
            // Format 32 properties come back as longs.
            let values = if format_return == 32 {
                #[allow(clippy::cast_ptr_alignment)]
                let ptr = prop_return.cast::<c_long>();
                Some(slice::from_raw_parts(ptr, nitems_return as usize).to_vec())
            } else {
                None
            };
            (self.xlib.XFree)(prop_return.cast());
            values
        }
    }

    /// Returns a text property for a window.
    /// # Errors
    ///
    /// Errors if window status = 0.
    // `XGetTextProperty`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XGetTextProperty.html
    fn get_text_prop(&self, window: xlib::Window, atom: xlib::Atom) -> Result<String, XlibError> {
        unsafe {
            let mut text_prop: xlib::XTextProperty = std::mem::zeroed();
            let status: c_int =
                (self.xlib.XGetTextProperty)(self.display, window, &mut text_prop, atom);
            if status == 0 || text_prop.nitems == 0 {
                if !text_prop.value.is_null() {
                    (self.xlib.XFree)(text_prop.value.cast());
                }
                return Err(XlibError::FailedStatus);
            }
            take_xlib_string(&self.xlib, text_prop.value.cast()).ok_or(XlibError::FailedStatus)
        }
    }

    /// Returns the enabled CRTCs reported by xrandr.
    // `XRRGetScreenResources`: https://www.x.org/releases/current/doc/man/man3/Xrandr.3.xhtml
    fn get_randr_outputs(&self) -> Vec<(Xyhw, Rotation)> {
        let Some(xrandr) = &self.xrandr else {
            return vec![];
        };
        let mut outputs = vec![];
        unsafe {
            let resources = (xrandr.XRRGetScreenResources)(self.display, self.root);
            if resources.is_null() {
                return outputs;
            }
            let crtcs = slice::from_raw_parts((*resources).crtcs, (*resources).ncrtc as usize);
            for &crtc in crtcs {
                let info = (xrandr.XRRGetCrtcInfo)(self.display, resources, crtc);
                if info.is_null() {
                    continue;
                }
                // A CRTC without a mode drives nothing.
                if (*info).mode != 0 && (*info).noutput > 0 {
                    let g = Xyhw::new(
                        (*info).x,
                        (*info).y,
                        (*info).width as i32,
                        (*info).height as i32,
                    );
                    outputs.push((g, rotation_from_raw((*info).rotation)));
                }
                (xrandr.XRRFreeCrtcInfo)(info);
            }
            (xrandr.XRRFreeScreenResources)(resources);
        }
        outputs
    }

    /// Returns the Xinerama heads.
    // `XineramaQueryScreens`: https://www.x.org/releases/current/doc/man/man3/Xinerama.3.xhtml
    fn get_xinerama_outputs(&self) -> Vec<(Xyhw, Rotation)> {
        use x11_dl::xinerama::{XineramaScreenInfo, Xlib};
        let Ok(xinerama) = Xlib::open() else {
            return vec![];
        };
        unsafe {
            if (xinerama.XineramaIsActive)(self.display) == 0 {
                return vec![];
            }
            let mut screen_count = 0;
            let info_array_raw = (xinerama.XineramaQueryScreens)(self.display, &mut screen_count);
            if info_array_raw.is_null() {
                return vec![];
            }
            let infos: &[XineramaScreenInfo] =
                slice::from_raw_parts(info_array_raw, screen_count as usize);
            let outputs = infos
                .iter()
                .map(|i| {
                    let g = Xyhw::new(
                        i.x_org.into(),
                        i.y_org.into(),
                        i.width.into(),
                        i.height.into(),
                    );
                    (g, Rotation::Normal)
                })
                .collect();
            (self.xlib.XFree)(info_array_raw.cast());
            outputs
        }
    }
}

/// Maps the rotation bits of a CRTC. Reflection bits are ignored.
#[must_use]
pub fn rotation_from_raw(raw: u16) -> Rotation {
    match raw & (RR_ROTATE_0 | RR_ROTATE_90 | RR_ROTATE_180 | RR_ROTATE_270) {
        RR_ROTATE_90 => Rotation::Left,
        RR_ROTATE_180 => Rotation::Inverted,
        RR_ROTATE_270 => Rotation::Right,
        _ => Rotation::Normal,
    }
}

/// Keeps the parts of `WM_NORMAL_HINTS` whose flag is set.
#[must_use]
pub fn size_hints_from(size: &xlib::XSizeHints) -> SizeHints {
    let mut hints = SizeHints::default();
    if size.flags & xlib::PMinSize != 0 {
        hints.min_w = size.min_width.max(0);
        hints.min_h = size.min_height.max(0);
    }
    if size.flags & xlib::PMaxSize != 0 {
        hints.max_w = size.max_width.max(0);
        hints.max_h = size.max_height.max(0);
    }
    if size.flags & xlib::PBaseSize != 0 {
        hints.base_w = size.base_width.max(0);
        hints.base_h = size.base_height.max(0);
    } else if size.flags & xlib::PMinSize != 0 {
        // ICCCM: the minimum size stands in for a missing base size.
        hints.base_w = hints.min_w;
        hints.base_h = hints.min_h;
    }
    if size.flags & xlib::PResizeInc != 0 {
        hints.inc_w = size.width_inc.max(0);
        hints.inc_h = size.height_inc.max(0);
    }
    hints
}
