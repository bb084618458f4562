//! `XWrap` setters.
use crate::XWrap;
use lattice_core::models::{WindowHandle, WindowState};
use std::os::raw::{c_long, c_ulong};
use x11_dl::xlib;

/// `_NET_WM_DESKTOP` value of a window shown on every workspace.
const ALL_DESKTOPS: c_long = 0xFFFF_FFFF;

impl XWrap {
    // Public functions.

    /// Replaces a window property.
    // `XChangeProperty`: https://tronche.com/gui/x/xlib/window-information/XChangeProperty.html
    pub fn replace_property_long(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        r#type: xlib::Atom,
        data: &[c_long],
    ) {
        unsafe {
            (self.xlib.XChangeProperty)(
                self.display,
                window,
                property,
                r#type,
                32,
                xlib::PropModeReplace,
                data.as_ptr().cast::<u8>(),
                data.len() as i32,
            );
        }
    }

    /// Replaces a property with text (format 8).
    // `XChangeProperty`: https://tronche.com/gui/x/xlib/window-information/XChangeProperty.html
    pub fn set_property_string(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        value: &str,
        encoding: xlib::Atom,
    ) {
        self.set_property_bytes(window, property, value.as_bytes(), encoding);
    }

    fn set_property_bytes(
        &self,
        window: xlib::Window,
        property: xlib::Atom,
        bytes: &[u8],
        encoding: xlib::Atom,
    ) {
        unsafe {
            (self.xlib.XChangeProperty)(
                self.display,
                window,
                property,
                encoding,
                8,
                xlib::PropModeReplace,
                bytes.as_ptr(),
                bytes.len() as i32,
            );
        }
    }

    /// Deletes a window property.
    // `XDeleteProperty`: https://tronche.com/gui/x/xlib/window-information/XDeleteProperty.html
    pub fn delete_property(&self, window: xlib::Window, property: xlib::Atom) {
        unsafe { (self.xlib.XDeleteProperty)(self.display, window, property) };
    }

    /// Sets `_NET_CLIENT_LIST`, oldest first.
    pub fn set_client_list(&self, windows: &[WindowHandle]) {
        let list: Vec<c_long> = windows.iter().map(|h| h.0 as c_long).collect();
        self.replace_property_long(self.root, self.atoms.NetClientList, xlib::XA_WINDOW, &list);
    }

    /// Sets `_NET_CURRENT_DESKTOP`.
    pub fn set_current_desktop(&self, index: usize) {
        self.set_desktop_prop(index as c_long, self.atoms.NetCurrentDesktop);
    }

    /// Sets `_NET_NUMBER_OF_DESKTOPS`.
    pub fn set_number_of_desktops(&self, count: usize) {
        self.set_desktop_prop(count as c_long, self.atoms.NetNumberOfDesktops);
    }

    /// Sets `_NET_DESKTOP_NAMES`: the names, each terminated by a NUL byte.
    pub fn set_desktop_names(&self, names: &[String]) {
        let bytes = join_names(names);
        self.set_property_bytes(
            self.root,
            self.atoms.NetDesktopNames,
            &bytes,
            self.atoms.UTF8String,
        );
    }

    /// Sets a cardinal property on the root.
    pub fn set_desktop_prop(&self, value: c_long, atom: c_ulong) {
        self.replace_property_long(self.root, atom, xlib::XA_CARDINAL, &[value]);
    }

    /// Sets a windows border color.
    // `XSetWindowBorder`: https://tronche.com/gui/x/xlib/window/XSetWindowBorder.html
    pub fn set_window_border_color(&self, window: xlib::Window, mut color: c_ulong) {
        unsafe {
            // Force border opacity to 0xff.
            let mut bytes = color.to_le_bytes();
            bytes[3] = 0xff;
            color = c_ulong::from_le_bytes(bytes);
            (self.xlib.XSetWindowBorder)(self.display, window, color);
        }
    }

    /// Sets a windows configuration.
    // `XConfigureWindow`: https://tronche.com/gui/x/xlib/window/XConfigureWindow.html
    pub fn set_window_config(
        &self,
        window: xlib::Window,
        mut window_changes: xlib::XWindowChanges,
        unlock: u32,
    ) {
        unsafe { (self.xlib.XConfigureWindow)(self.display, window, unlock, &mut window_changes) };
    }

    /// Stores the workspace of a window, `None` meaning every workspace.
    pub fn set_window_workspace(&self, window: xlib::Window, workspace: Option<usize>) {
        match workspace {
            Some(index) => {
                let data = [index as c_long];
                self.replace_property_long(window, self.atoms.NetWMDesktop, xlib::XA_CARDINAL, &data);
                self.replace_property_long(
                    window,
                    self.atoms.LatticeWorkspace,
                    xlib::XA_CARDINAL,
                    &data,
                );
            }
            None => {
                self.replace_property_long(
                    window,
                    self.atoms.NetWMDesktop,
                    xlib::XA_CARDINAL,
                    &[ALL_DESKTOPS],
                );
                self.delete_property(window, self.atoms.LatticeWorkspace);
            }
        }
    }

    /// Writes the window manager's states to `_NET_WM_STATE`. Atoms the window manager does
    /// not track (such as sticky or skip-taskbar) are kept as the client set them.
    pub fn set_window_states(&self, window: xlib::Window, states: &[WindowState]) {
        let tracked = self.tracked_state_atoms();
        let mut atoms: Vec<xlib::Atom> = self
            .get_window_states_atoms(window)
            .into_iter()
            .filter(|atom| !tracked.contains(atom))
            .collect();
        for state in states {
            for atom in self.atoms_for_state(*state) {
                if !atoms.contains(&atom) {
                    atoms.push(atom);
                }
            }
        }
        self.set_window_states_atoms(window, &atoms);
    }

    /// Sets the atom states of a window.
    pub fn set_window_states_atoms(&self, window: xlib::Window, states: &[xlib::Atom]) {
        let data: Vec<c_long> = states.iter().map(|x| *x as c_long).collect();
        self.replace_property_long(window, self.atoms.NetWMState, xlib::XA_ATOM, &data);
    }

    /// Sets or clears the urgency hint of `WM_HINTS`.
    pub fn set_window_urgency(&self, window: xlib::Window, is_urgent: bool) {
        if let Some(mut wmh) = self.get_wmhints(window) {
            if ((wmh.flags & xlib::XUrgencyHint) != 0) == is_urgent {
                return;
            }
            wmh.flags = if is_urgent {
                wmh.flags | xlib::XUrgencyHint
            } else {
                wmh.flags & !xlib::XUrgencyHint
            };
            self.set_wmhints(window, &mut wmh);
        }
    }

    /// Sets the `XWMHints` of a window.
    // `XSetWMHints`: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/XSetWMHints.html
    pub fn set_wmhints(&self, window: xlib::Window, wmh: &mut xlib::XWMHints) {
        unsafe { (self.xlib.XSetWMHints)(self.display, window, wmh) };
    }

    /// Sets the `WM_STATE` of a window.
    pub fn set_wm_states(&self, window: xlib::Window, states: &[c_long]) {
        self.replace_property_long(window, self.atoms.WMState, self.atoms.WMState, states);
    }

    // Internal functions.

    fn atoms_for_state(&self, state: WindowState) -> Vec<xlib::Atom> {
        let a = &self.atoms;
        match state {
            WindowState::Modal => vec![a.NetWMStateModal],
            WindowState::Sticky => vec![a.NetWMStateSticky],
            WindowState::MaximizedVert => vec![a.NetWMStateMaximizedVert],
            WindowState::MaximizedHorz => vec![a.NetWMStateMaximizedHorz],
            WindowState::Maximized => vec![a.NetWMStateMaximizedVert, a.NetWMStateMaximizedHorz],
            WindowState::Shaded => vec![a.NetWMStateShaded],
            WindowState::SkipTaskbar => vec![a.NetWMStateSkipTaskbar],
            WindowState::SkipPager => vec![a.NetWMStateSkipPager],
            WindowState::Hidden => vec![a.NetWMStateHidden],
            WindowState::Fullscreen => vec![a.NetWMStateFullscreen],
            WindowState::Above => vec![a.NetWMStateAbove],
            WindowState::Below => vec![a.NetWMStateBelow],
            WindowState::DemandsAttention => vec![a.NetWMStateDemandsAttention],
        }
    }

    fn tracked_state_atoms(&self) -> [xlib::Atom; 7] {
        let a = &self.atoms;
        [
            a.NetWMStateMaximizedVert,
            a.NetWMStateMaximizedHorz,
            a.NetWMStateHidden,
            a.NetWMStateFullscreen,
            a.NetWMStateAbove,
            a.NetWMStateBelow,
            a.NetWMStateDemandsAttention,
        ]
    }
}

fn join_names(names: &[String]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for name in names {
        bytes.extend(name.bytes().filter(|&b| b != 0));
        bytes.push(0);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_names_are_nul_terminated() {
        let names = vec!["1".to_owned(), "web".to_owned()];
        assert_eq!(join_names(&names), b"1\0web\0".to_vec());
        assert!(join_names(&[]).is_empty());
    }
}
