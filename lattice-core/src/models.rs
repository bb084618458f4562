//! Objects (such as windows, regions and workspaces) the window manager is built from.
mod focus_policy;
mod handle;
mod manager;
mod mode;
mod quirk;
mod region;
mod screen;
mod size_hints;
mod strut;
mod window;
mod window_change;
mod window_state;
mod window_type;
mod workspace;
mod xyhw;
mod xyhw_change;

pub mod dto;

pub use focus_policy::{FocusClosePolicy, FocusMode, UnfocusPolicy};
pub use handle::{RegionId, WindowHandle, WindowId};
pub use manager::Manager;
pub use mode::{Manipulation, ManipulationKind, Mode, ResizeEdges, SearchState, Trigger};
pub use quirk::{classify, QuirkMode, QuirkRule, Quirks};
pub use region::{BarPosition, Region, Rotation};
pub use screen::Screen;
pub use size_hints::SizeHints;
pub use strut::Strut;
pub use window::{Window, WindowFlags, WindowInfo};
pub use window_change::WindowChange;
pub use window_state::WindowState;
pub use window_type::{TypeMask, WindowType};
pub use workspace::Workspace;
pub use xyhw::Xyhw;
pub use xyhw::XyhwBuilder;
pub use xyhw_change::XyhwChange;

pub type WorkspaceIndex = usize;
pub type ScreenIndex = usize;
