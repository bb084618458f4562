//! Windows the window manager owns itself: the input sink and the bar of each region, and
//! the labels shown while searching.
use crate::XWrap;
use lattice_core::models::{RegionId, WindowHandle, Xyhw};
use lattice_core::DisplayEvent;
use std::os::raw::{c_int, c_uint};
use std::ptr;
use x11_dl::xlib;

const LABEL_PADDING: i32 = 4;

/// Text drawn into a window we own.
#[derive(Debug, Clone)]
pub struct Label {
    pub g: Xyhw,
    pub text: String,
}

impl XWrap {
    /// Creates the sink of a region, an input only window under everything else that
    /// reports clicks and pointer crossings on empty space. The bar is created as well
    /// when it has a geometry.
    // `XCreateWindow`: https://tronche.com/gui/x/xlib/window/XCreateWindow.html
    pub fn create_region_windows(
        &mut self,
        region: RegionId,
        g: Xyhw,
        bar: Option<Xyhw>,
    ) -> DisplayEvent {
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.override_redirect = xlib::True;
        attrs.event_mask = xlib::EnterWindowMask | xlib::ButtonPressMask;
        let (w, h) = dimensions(g);
        let sink = unsafe {
            (self.xlib.XCreateWindow)(
                self.display,
                self.root,
                g.x(),
                g.y(),
                w,
                h,
                0,
                0,
                xlib::InputOnly as c_uint,
                ptr::null_mut(),
                xlib::CWOverrideRedirect | xlib::CWEventMask,
                &mut attrs,
            )
        };
        unsafe { (self.xlib.XMapWindow)(self.display, sink) };

        let bar = bar.map(|g| WindowHandle(self.create_label_window(g, String::new())));
        if let Some(bar) = bar {
            unsafe { (self.xlib.XMapWindow)(self.display, bar.0) };
        }
        DisplayEvent::RegionWindowsCreated {
            region,
            sink: WindowHandle(sink),
            bar,
        }
    }

    // `XDestroyWindow`: https://tronche.com/gui/x/xlib/window/XDestroyWindow.html
    pub fn destroy_region_windows(&mut self, sink: Option<WindowHandle>, bar: Option<WindowHandle>) {
        for window in [sink, bar].into_iter().flatten() {
            self.labels.remove(&window.0);
            unsafe { (self.xlib.XDestroyWindow)(self.display, window.0) };
        }
    }

    // `XMoveResizeWindow`: https://tronche.com/gui/x/xlib/window/XMoveResizeWindow.html
    pub fn configure_region_windows(
        &mut self,
        sink: Option<WindowHandle>,
        g: Xyhw,
        bar: Option<(WindowHandle, Xyhw)>,
    ) {
        if let Some(sink) = sink {
            self.move_resize_window(sink.0, g);
        }
        if let Some((bar, g)) = bar {
            if let Some(label) = self.labels.get_mut(&bar.0) {
                label.g = g;
            }
            self.move_resize_window(bar.0, g);
            self.draw_label(bar.0);
        }
    }

    /// Replaces the text of a bar and redraws it.
    pub fn update_bar(&mut self, bar: WindowHandle, text: String) {
        match self.labels.get_mut(&bar.0) {
            Some(label) if label.text == text => return,
            Some(label) => label.text = text,
            None => return,
        }
        self.draw_label(bar.0);
    }

    /// Maps or unmaps a bar. The bar keeps its text and geometry while hidden.
    pub fn show_bar(&self, bar: WindowHandle, visible: bool) {
        unsafe {
            if visible {
                (self.xlib.XMapWindow)(self.display, bar.0);
            } else {
                (self.xlib.XUnmapWindow)(self.display, bar.0);
            }
        }
    }

    /// Shows a label at the top left corner of each window, on top of everything.
    // `XMapRaised`: https://tronche.com/gui/x/xlib/window/XMapRaised.html
    pub fn show_search_labels(&mut self, labels: Vec<(WindowHandle, String)>) {
        self.hide_search_labels();
        let Some(ascent_descent) = self.font_height() else {
            return;
        };
        for (target, text) in labels {
            let Ok(attrs) = self.get_window_attrs(target.0) else {
                continue;
            };
            let g = Xyhw::new(
                attrs.x,
                attrs.y,
                self.text_width(&text) + 2 * LABEL_PADDING,
                ascent_descent + 2 * LABEL_PADDING,
            );
            let window = self.create_label_window(g, text);
            unsafe { (self.xlib.XMapRaised)(self.display, window) };
            self.search_labels.push(window);
        }
    }

    pub fn hide_search_labels(&mut self) {
        for window in std::mem::take(&mut self.search_labels) {
            self.labels.remove(&window);
            unsafe { (self.xlib.XDestroyWindow)(self.display, window) };
        }
    }

    /// Draws the text of a window we own.
    // `XClearWindow`: https://tronche.com/gui/x/xlib/window/XClearWindow.html
    // `XDrawString`: https://tronche.com/gui/x/xlib/graphics/drawing-text/XDrawString.html
    pub fn draw_label(&self, window: xlib::Window) {
        let Some(label) = self.labels.get(&window) else {
            return;
        };
        if self.font.is_null() || self.gc.is_null() {
            return;
        }
        let ascent = unsafe { (*self.font).ascent };
        let descent = unsafe { (*self.font).descent };
        let baseline = (label.g.h() - ascent - descent) / 2 + ascent;
        let bytes = label.text.as_bytes();
        unsafe {
            (self.xlib.XClearWindow)(self.display, window);
            (self.xlib.XSetForeground)(self.display, self.gc, self.colors.bar_font);
            (self.xlib.XDrawString)(
                self.display,
                window,
                self.gc,
                LABEL_PADDING,
                baseline,
                bytes.as_ptr().cast(),
                bytes.len() as c_int,
            );
        }
    }

    fn create_label_window(&mut self, g: Xyhw, text: String) -> xlib::Window {
        let (w, h) = dimensions(g);
        let window = unsafe {
            (self.xlib.XCreateSimpleWindow)(
                self.display,
                self.root,
                g.x(),
                g.y(),
                w,
                h,
                0,
                self.colors.bar_font,
                self.colors.bar,
            )
        };
        let mut attrs: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attrs.override_redirect = xlib::True;
        attrs.event_mask = xlib::ExposureMask | xlib::ButtonPressMask;
        self.change_window_attributes(
            window,
            xlib::CWOverrideRedirect | xlib::CWEventMask,
            attrs,
        );
        self.labels.insert(window, Label { g, text });
        window
    }

    fn move_resize_window(&self, window: xlib::Window, g: Xyhw) {
        let (w, h) = dimensions(g);
        unsafe { (self.xlib.XMoveResizeWindow)(self.display, window, g.x(), g.y(), w, h) };
    }

    fn font_height(&self) -> Option<i32> {
        if self.font.is_null() {
            return None;
        }
        Some(unsafe { (*self.font).ascent + (*self.font).descent })
    }

    // `XTextWidth`: https://tronche.com/gui/x/xlib/graphics/font-metrics/XTextWidth.html
    fn text_width(&self, text: &str) -> i32 {
        if self.font.is_null() {
            return 0;
        }
        let bytes = text.as_bytes();
        unsafe { (self.xlib.XTextWidth)(self.font, bytes.as_ptr().cast(), bytes.len() as c_int) }
    }

    /// Whether `window` is one of the windows we draw into.
    #[must_use]
    pub fn is_label(&self, window: xlib::Window) -> bool {
        self.labels.contains_key(&window)
    }
}

/// X refuses windows without area.
fn dimensions(g: Xyhw) -> (c_uint, c_uint) {
    (g.w().max(1) as c_uint, g.h().max(1) as c_uint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_never_get_an_empty_size() {
        assert_eq!(dimensions(Xyhw::new(0, 0, 0, -3)), (1, 1));
        assert_eq!(dimensions(Xyhw::new(5, 5, 1920, 20)), (1920, 20));
    }
}
