//! Configuration and logging for the lattice window manager.
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

mod command;
mod config;
pub mod utils;

pub use command::*;
pub use config::*;
