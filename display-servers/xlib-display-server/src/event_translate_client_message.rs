use super::{DisplayEvent, XWrap};
use lattice_core::models::{WindowHandle, WindowState};
use lattice_core::{MoveResizeDirection, StateAction};
use std::convert::TryFrom;
use std::os::raw::c_long;

use x11_dl::xlib;

// `IconicState` of a `WM_CHANGE_STATE` request.
const ICONIC_STATE_REQUEST: c_long = 3;

pub fn from_event(xw: &XWrap, event: xlib::XClientMessageEvent) -> Vec<DisplayEvent> {
    let root = xw.get_default_root();
    if !xw.managed_windows.contains(&event.window) && event.window != root {
        return vec![];
    }
    let atom_name = xw.atoms.get_name(event.message_type);
    tracing::trace!("ClientMessage: {} : {:?}", event.window, atom_name);

    let handle = WindowHandle(event.window);
    let data = |i: usize| i64::from(event.data.get_long(i));
    let message = event.message_type;

    if message == xw.atoms.NetCurrentDesktop {
        return desktop_index(data(0))
            .map(DisplayEvent::DesktopRequest)
            .into_iter()
            .collect();
    }
    // Everything below is about a client window.
    if event.window == root {
        return vec![];
    }
    if message == xw.atoms.NetWMDesktop {
        return desktop_index(data(0))
            .map(|index| DisplayEvent::WindowDesktopRequest(handle, index))
            .into_iter()
            .collect();
    }
    if message == xw.atoms.NetActiveWindow {
        return vec![DisplayEvent::ActivateRequest(handle)];
    }
    if message == xw.atoms.NetCloseWindow {
        return vec![DisplayEvent::CloseRequest(handle)];
    }
    if message == xw.atoms.NetMoveResizeWindow {
        return MoveResizeDirection::from_raw(data(2))
            .map(|direction| DisplayEvent::MoveResizeRequest(handle, direction))
            .into_iter()
            .collect();
    }
    if message == xw.atoms.WMChangeState && event.data.get_long(0) == ICONIC_STATE_REQUEST {
        return vec![DisplayEvent::StateRequest(
            handle,
            WindowState::Hidden,
            StateAction::Add,
        )];
    }
    if message == xw.atoms.NetWMState {
        let Some(action) = StateAction::from_raw(data(0)) else {
            tracing::debug!("invalid _NET_WM_STATE action {}", data(0));
            return vec![];
        };
        let first = xw.window_state_from_atom(data(1) as xlib::Atom);
        let second = xw.window_state_from_atom(data(2) as xlib::Atom);
        return merge_states(first, second)
            .into_iter()
            .map(|state| DisplayEvent::StateRequest(handle, state, action))
            .collect();
    }

    vec![]
}

/// Requests for both maximized atoms at once become a single `Maximized` request.
fn merge_states(first: Option<WindowState>, second: Option<WindowState>) -> Vec<WindowState> {
    match (first, second) {
        (Some(WindowState::MaximizedVert), Some(WindowState::MaximizedHorz))
        | (Some(WindowState::MaximizedHorz), Some(WindowState::MaximizedVert)) => {
            vec![WindowState::Maximized]
        }
        (Some(a), Some(b)) if a == b => vec![a],
        _ => first.into_iter().chain(second).collect(),
    }
}

fn desktop_index(value: i64) -> Option<usize> {
    match usize::try_from(value) {
        Ok(index) => Some(index),
        Err(err) => {
            tracing::debug!(
                "Received invalid value for desktop index ({}): {}",
                value,
                err,
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_maximized_atoms_merge() {
        assert_eq!(
            merge_states(
                Some(WindowState::MaximizedHorz),
                Some(WindowState::MaximizedVert)
            ),
            vec![WindowState::Maximized]
        );
        assert_eq!(
            merge_states(None, Some(WindowState::Fullscreen)),
            vec![WindowState::Fullscreen]
        );
        assert_eq!(
            merge_states(Some(WindowState::Above), Some(WindowState::Sticky)),
            vec![WindowState::Above, WindowState::Sticky]
        );
    }

    #[test]
    fn negative_desktops_are_rejected() {
        assert_eq!(desktop_index(-1), None);
        assert_eq!(desktop_index(3), Some(3));
    }
}
