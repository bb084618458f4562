//! Interned atoms of the ICCCM and EWMH properties we read and write.
#![allow(non_snake_case)]
use std::ffi::CString;
use x11_dl::xlib;

/// Generates the atom collection. Each field is interned once at startup.
macro_rules! atoms {
    ($($field:ident => $name:literal,)*) => {
        #[derive(Clone, Debug)]
        pub struct XAtom {
            $(pub $field: xlib::Atom,)*
        }

        impl XAtom {
            // `XInternAtom`: https://tronche.com/gui/x/xlib/window-information/XInternAtom.html
            pub fn new(xlib: &xlib::Xlib, dpy: *mut xlib::Display) -> Self {
                Self {
                    $($field: intern(xlib, dpy, $name),)*
                }
            }

            #[must_use]
            pub fn get_name(&self, atom: xlib::Atom) -> &'static str {
                $(if atom == self.$field {
                    return $name;
                })*
                "(UNKNOWN)"
            }
        }
    };
}

atoms! {
    WMProtocols => "WM_PROTOCOLS",
    WMDelete => "WM_DELETE_WINDOW",
    WMState => "WM_STATE",
    WMChangeState => "WM_CHANGE_STATE",
    WMClass => "WM_CLASS",
    WMTakeFocus => "WM_TAKE_FOCUS",
    NetActiveWindow => "_NET_ACTIVE_WINDOW",
    NetCloseWindow => "_NET_CLOSE_WINDOW",
    NetMoveResizeWindow => "_NET_WM_MOVERESIZE",
    NetSupported => "_NET_SUPPORTED",
    NetWMName => "_NET_WM_NAME",
    NetWMPid => "_NET_WM_PID",

    NetWMState => "_NET_WM_STATE",
    NetWMStateModal => "_NET_WM_STATE_MODAL",
    NetWMStateSticky => "_NET_WM_STATE_STICKY",
    NetWMStateMaximizedVert => "_NET_WM_STATE_MAXIMIZED_VERT",
    NetWMStateMaximizedHorz => "_NET_WM_STATE_MAXIMIZED_HORZ",
    NetWMStateShaded => "_NET_WM_STATE_SHADED",
    NetWMStateSkipTaskbar => "_NET_WM_STATE_SKIP_TASKBAR",
    NetWMStateSkipPager => "_NET_WM_STATE_SKIP_PAGER",
    NetWMStateHidden => "_NET_WM_STATE_HIDDEN",
    NetWMStateFullscreen => "_NET_WM_STATE_FULLSCREEN",
    NetWMStateAbove => "_NET_WM_STATE_ABOVE",
    NetWMStateBelow => "_NET_WM_STATE_BELOW",
    NetWMStateDemandsAttention => "_NET_WM_STATE_DEMANDS_ATTENTION",

    NetWMAction => "_NET_WM_ALLOWED_ACTIONS",
    NetWMActionMove => "_NET_WM_ACTION_MOVE",
    NetWMActionResize => "_NET_WM_ACTION_RESIZE",
    NetWMActionFullscreen => "_NET_WM_ACTION_FULLSCREEN",
    NetWMActionClose => "_NET_WM_ACTION_CLOSE",

    NetWMWindowType => "_NET_WM_WINDOW_TYPE",
    NetWMWindowTypeDesktop => "_NET_WM_WINDOW_TYPE_DESKTOP",
    NetWMWindowTypeDock => "_NET_WM_WINDOW_TYPE_DOCK",
    NetWMWindowTypeToolbar => "_NET_WM_WINDOW_TYPE_TOOLBAR",
    NetWMWindowTypeMenu => "_NET_WM_WINDOW_TYPE_MENU",
    NetWMWindowTypeUtility => "_NET_WM_WINDOW_TYPE_UTILITY",
    NetWMWindowTypeSplash => "_NET_WM_WINDOW_TYPE_SPLASH",
    NetWMWindowTypeDialog => "_NET_WM_WINDOW_TYPE_DIALOG",
    NetSupportingWmCheck => "_NET_SUPPORTING_WM_CHECK",

    NetClientList => "_NET_CLIENT_LIST",
    NetDesktopViewport => "_NET_DESKTOP_VIEWPORT",
    NetNumberOfDesktops => "_NET_NUMBER_OF_DESKTOPS",
    NetCurrentDesktop => "_NET_CURRENT_DESKTOP",
    NetDesktopNames => "_NET_DESKTOP_NAMES",
    NetWMDesktop => "_NET_WM_DESKTOP",
    NetWMStrutPartial => "_NET_WM_STRUT_PARTIAL",
    NetWMStrut => "_NET_WM_STRUT",

    LatticeWorkspace => "_LATTICE_WS",
    UTF8String => "UTF8_STRING",
}

fn intern(xlib: &xlib::Xlib, dpy: *mut xlib::Display, name: &str) -> xlib::Atom {
    // Atom names are static and never contain a NUL byte.
    let Ok(cname) = CString::new(name) else {
        return 0;
    };
    unsafe { (xlib.XInternAtom)(dpy, cname.as_ptr(), xlib::False) }
}

impl XAtom {
    /// What we put in `_NET_SUPPORTED`.
    #[must_use]
    pub fn net_supported(&self) -> Vec<xlib::Atom> {
        vec![
            self.NetActiveWindow,
            self.NetCloseWindow,
            self.NetMoveResizeWindow,
            self.NetSupported,
            self.NetWMName,
            self.NetWMPid,
            self.NetWMState,
            self.NetWMStateMaximizedVert,
            self.NetWMStateMaximizedHorz,
            self.NetWMStateSkipTaskbar,
            self.NetWMStateSkipPager,
            self.NetWMStateHidden,
            self.NetWMStateFullscreen,
            self.NetWMStateAbove,
            self.NetWMStateBelow,
            self.NetWMStateDemandsAttention,
            self.NetWMAction,
            self.NetWMActionMove,
            self.NetWMActionResize,
            self.NetWMActionFullscreen,
            self.NetWMActionClose,
            self.NetWMWindowType,
            self.NetWMWindowTypeDesktop,
            self.NetWMWindowTypeDock,
            self.NetWMWindowTypeToolbar,
            self.NetWMWindowTypeMenu,
            self.NetWMWindowTypeUtility,
            self.NetWMWindowTypeSplash,
            self.NetWMWindowTypeDialog,
            self.NetSupportingWmCheck,
            self.NetClientList,
            self.NetDesktopViewport,
            self.NetNumberOfDesktops,
            self.NetCurrentDesktop,
            self.NetDesktopNames,
            self.NetWMDesktop,
            self.NetWMStrutPartial,
            self.NetWMStrut,
        ]
    }
}
