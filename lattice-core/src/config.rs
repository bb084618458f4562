use crate::command::Command;
use crate::layouts::{Layout, LayoutTuning};
use crate::models::{
    BarPosition, FocusClosePolicy, FocusMode, QuirkRule, UnfocusPolicy, WindowType, WorkspaceIndex,
};
use crate::utils::modmask_lookup::ModMask;
use serde::{Deserialize, Serialize};

/// A key binding: modifiers plus a keysym name, resolved by the display server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Keybind {
    pub modmask: ModMask,
    pub key: String,
    pub command: Command,
}

pub trait Config {
    /// Number of workspaces each screen may create.
    fn workspace_limit(&self) -> usize;
    fn workspace_name(&self, idx: WorkspaceIndex) -> Option<String>;

    fn default_layout(&self) -> Layout;
    fn default_tuning(&self) -> LayoutTuning;

    fn border_width(&self) -> i32;
    fn focused_border_color(&self) -> String;
    fn default_border_color(&self) -> String;
    fn urgent_border_color(&self) -> String;
    /// Gap kept between the region edge and the tiled windows.
    fn region_padding(&self) -> i32;

    fn bar_enabled(&self) -> bool;
    fn bar_height(&self) -> i32;
    fn bar_position(&self) -> BarPosition;
    fn bar_font(&self) -> String;
    fn bar_color(&self) -> String;
    fn bar_font_color(&self) -> String;
    /// Milliseconds between two bar refreshes.
    fn bar_delay(&self) -> u64;

    fn focus_mode(&self) -> FocusMode;
    fn focus_close(&self) -> FocusClosePolicy;
    /// Let the replacement focus wrap around the ends of the window list.
    fn focus_close_wrap(&self) -> bool;
    /// Focus the last window instead of the first one when a workspace without
    /// focus history is shown.
    fn focus_default_last(&self) -> bool;
    fn unfocus_policy(&self) -> UnfocusPolicy;
    /// Length of the per-screen focus recency list.
    fn focus_history_len(&self) -> usize;

    /// Upper bound of geometry updates per second while moving or resizing; zero disables it.
    fn max_updates_per_sec(&self) -> u32;
    /// Pixels of a floating window that always stay inside its region.
    fn boundary_width(&self) -> i32;
    /// Share of the parent's region given to `TRANSSZ` transients.
    fn dialog_ratio(&self) -> f32;
    /// Pixels moved or resized by one keyboard step.
    fn step_size(&self) -> i32;
    /// Skip empty workspaces when cycling.
    fn cycle_skip_empty(&self) -> bool;

    fn quirk_rules(&self) -> &[QuirkRule];
    fn keybinds(&self) -> &[Keybind];
    /// Modifier that turns button 1 into move and button 3 into resize.
    fn mousekey(&self) -> ModMask;
    /// Key that aborts a move, resize or search.
    fn cancel_key(&self) -> &str;

    /// Border of a newly managed window.
    fn window_border(&self, r#type: WindowType) -> i32 {
        if r#type.is_screen_sticky() || r#type == WindowType::Splash {
            0
        } else {
            self.border_width()
        }
    }

    fn keybind(&self, modmask: &ModMask, key: &str) -> Option<&Command> {
        self.keybinds()
            .iter()
            .find(|k| &k.modmask == modmask && k.key == key)
            .map(|k| &k.command)
    }
}

#[cfg(test)]
pub use tests::TestConfig;
