#[cfg(test)]
mod mock_display_server;

use crate::config::Config;
use crate::display_action::DisplayAction;
use crate::models::Window;
use crate::DisplayEvent;

use futures::prelude::*;
use std::pin::Pin;

#[cfg(test)]
pub use self::mock_display_server::MockDisplayServer;

pub trait DisplayServer {
    fn new(config: &impl Config) -> Self;

    /// Events read from the connection since the last call, in arrival order.
    fn get_next_events(&mut self) -> Vec<DisplayEvent>;

    /// Applies geometry, border and visibility of the given windows.
    fn update_windows(&self, _windows: Vec<&Window>) {}

    fn execute_action(&mut self, _act: DisplayAction) -> Option<DisplayEvent> {
        None
    }

    fn wait_readable(&self) -> Pin<Box<dyn Future<Output = ()>>>;

    fn flush(&self);
}
