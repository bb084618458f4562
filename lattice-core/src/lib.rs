//! The window, workspace and region state machine behind lattice.
// We deny clippy pedantic lints, primarily to keep code as correct as possible
// The goal of lattice is to do one thing and to do that one thing well: tile windows.
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise. However, work to ensure that each use of one of these is correct
// would be very much appreciated.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::default_trait_access
)]
mod command;
pub mod config;
mod display_action;
mod display_event;
pub mod display_servers;
pub mod errors;
mod event_loop;
mod event_queue;
mod handlers;
pub mod layouts;
pub mod models;
mod registry;
pub mod stacking;
pub mod state;
pub mod utils;

pub use command::{Command, Direction};
pub use config::{Config, Keybind};
pub use display_action::{DisplayAction, GrabKind};
pub use display_event::{DisplayEvent, MoveResizeDirection, StateAction};
pub use display_servers::DisplayServer;
pub use event_loop::ExitReason;
pub use event_queue::EventQueue;
pub use models::Manager;
pub use models::Mode;
pub use models::Window;
pub use models::Workspace;
pub use registry::WindowRegistry;
pub use state::State;
pub use utils::child_process;
pub use utils::modmask_lookup::{Button, ModMask};
pub use utils::signals::SignalEvent;
