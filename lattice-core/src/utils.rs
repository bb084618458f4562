//! Process, signal and key helpers shared by the core.
pub mod child_process;
pub mod modmask_lookup;
pub mod signals;
