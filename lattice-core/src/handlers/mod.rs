mod bar_handler;
mod client_request_handler;
pub mod command_handler;
pub mod display_event_handler;
mod focus_handler;
mod manipulation_handler;
mod mouse_combo_handler;
mod search_handler;
mod topology_handler;
mod window_handler;

use super::command::Command;
use super::config::Config;
use super::display_action::DisplayAction;
use super::models::{
    Manager, Mode, Quirks, RegionId, ScreenIndex, Window, WindowChange, WindowFlags,
    WindowHandle, WindowId, WorkspaceIndex, Xyhw,
};
use super::state::State;
use super::DisplayEvent;
