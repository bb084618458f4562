use lattice_core::GrabKind;
use std::os::raw::c_uint;
use x11_dl::xlib;

// Glyphs of the standard cursor font, see X11/cursorfont.h.
const XC_LEFT_PTR: c_uint = 68;
const XC_FLEUR: c_uint = 52;
const XC_SIZING: c_uint = 120;
const XC_QUESTION_ARROW: c_uint = 92;

#[derive(Clone, Copy, Debug)]
pub struct XCursor {
    pub normal: xlib::Cursor,
    pub resize: xlib::Cursor,
    pub move_: xlib::Cursor,
    pub search: xlib::Cursor,
}

impl XCursor {
    // `XCreateFontCursor`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XCreateFontCursor.html
    pub fn new(xlib: &xlib::Xlib, dpy: *mut xlib::Display) -> Self {
        unsafe {
            Self {
                normal: (xlib.XCreateFontCursor)(dpy, XC_LEFT_PTR),
                resize: (xlib.XCreateFontCursor)(dpy, XC_SIZING),
                move_: (xlib.XCreateFontCursor)(dpy, XC_FLEUR),
                search: (xlib.XCreateFontCursor)(dpy, XC_QUESTION_ARROW),
            }
        }
    }

    /// The cursor shown while a grab of this kind lasts.
    #[must_use]
    pub const fn for_grab(&self, kind: GrabKind) -> xlib::Cursor {
        match kind {
            GrabKind::Move => self.move_,
            GrabKind::Resize => self.resize,
            GrabKind::Search => self.search,
        }
    }

    // `XFreeCursor`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XFreeCursor.html
    pub fn free(&self, xlib: &xlib::Xlib, dpy: *mut xlib::Display) {
        for cursor in [self.normal, self.resize, self.move_, self.search] {
            unsafe { (xlib.XFreeCursor)(dpy, cursor) };
        }
    }
}
