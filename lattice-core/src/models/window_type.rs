use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowType {
    Desktop,
    Dock,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Dialog,
    #[default]
    Normal,
}

bitflags! {
    /// A set of window types, used by quirk rules.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeMask: u8 {
        const DESKTOP = 1;
        const DOCK = 1 << 1;
        const TOOLBAR = 1 << 2;
        const MENU = 1 << 3;
        const UTILITY = 1 << 4;
        const SPLASH = 1 << 5;
        const DIALOG = 1 << 6;
        const NORMAL = 1 << 7;
    }
}

impl Default for TypeMask {
    fn default() -> Self {
        Self::all()
    }
}

impl From<WindowType> for TypeMask {
    fn from(t: WindowType) -> Self {
        match t {
            WindowType::Desktop => Self::DESKTOP,
            WindowType::Dock => Self::DOCK,
            WindowType::Toolbar => Self::TOOLBAR,
            WindowType::Menu => Self::MENU,
            WindowType::Utility => Self::UTILITY,
            WindowType::Splash => Self::SPLASH,
            WindowType::Dialog => Self::DIALOG,
            WindowType::Normal => Self::NORMAL,
        }
    }
}

impl std::str::FromStr for WindowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "dock" => Ok(Self::Dock),
            "toolbar" => Ok(Self::Toolbar),
            "menu" => Ok(Self::Menu),
            "utility" => Ok(Self::Utility),
            "splash" => Ok(Self::Splash),
            "dialog" => Ok(Self::Dialog),
            "normal" => Ok(Self::Normal),
            _ => Err(format!("unknown window type: {s}")),
        }
    }
}

impl WindowType {
    /// Docks and desktops belong to the screen, not to a workspace.
    #[must_use]
    pub const fn is_screen_sticky(self) -> bool {
        matches!(self, Self::Dock | Self::Desktop)
    }
}
