use super::{RegionId, ScreenIndex, WindowHandle, WorkspaceIndex, Xyhw};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Normal,
    Left,
    Inverted,
    Right,
}

impl Rotation {
    /// Rotated a quarter turn, so the output is taller than wide.
    #[must_use]
    pub const fn is_sideways(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    #[default]
    Top,
    Bottom,
}

/// A viewport onto a screen, usually one per physical output.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Region {
    pub id: RegionId,
    pub screen: ScreenIndex,
    /// The full output rectangle.
    pub g: Xyhw,
    /// What is left for windows once struts, the bar and padding are removed.
    pub usable: Xyhw,
    pub rotation: Rotation,
    /// The bound workspace. Kept in sync with `Workspace::region`.
    pub workspace: Option<WorkspaceIndex>,
    /// Workspace this region showed before it was retired into the pool.
    pub prior_workspace: Option<WorkspaceIndex>,
    pub bar: Option<WindowHandle>,
    pub bar_geometry: Option<Xyhw>,
    /// Input-only window covering the region, catching clicks on empty space.
    pub sink: Option<WindowHandle>,
}

impl Region {
    #[must_use]
    pub fn new(id: RegionId, screen: ScreenIndex, g: Xyhw, rotation: Rotation) -> Self {
        Self {
            id,
            screen,
            g,
            usable: g,
            rotation,
            workspace: None,
            prior_workspace: None,
            bar: None,
            bar_geometry: None,
            sink: None,
        }
    }

    /// Recomputes the usable area from the output rectangle.
    /// The bar keeps its geometry while hidden; only a shown bar takes space from the usable
    /// area.
    pub fn update_usable(
        &mut self,
        bar: Option<(i32, BarPosition)>,
        bar_visible: bool,
        padding: i32,
        trim: impl Fn(Xyhw) -> Xyhw,
    ) {
        let mut area = trim(self.g);
        self.bar_geometry = None;
        if let Some((height, position)) = bar.filter(|(height, _)| *height > 0) {
            let bar_g = match position {
                BarPosition::Top => Xyhw::new(area.x(), area.y(), area.w(), height),
                BarPosition::Bottom => {
                    Xyhw::new(area.x(), area.max_y() - height, area.w(), height)
                }
            };
            self.bar_geometry = Some(bar_g);
            if !bar_visible {
                self.usable = if padding > 0 { area.inset(padding) } else { area };
                return;
            }
            area = match position {
                BarPosition::Top => Xyhw::new(area.x(), area.y() + height, area.w(), area.h() - height),
                BarPosition::Bottom => Xyhw::new(area.x(), area.y(), area.w(), area.h() - height),
            };
        }
        self.usable = if padding > 0 { area.inset(padding) } else { area };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn bottom_bar_and_padding_shrink_usable_area() {
        let mut map: SlotMap<RegionId, ()> = SlotMap::with_key();
        let mut r = Region::new(map.insert(()), 0, Xyhw::new(0, 0, 1000, 800), Rotation::Normal);
        r.update_usable(Some((20, BarPosition::Bottom)), true, 5, |g| g);
        assert_eq!(r.bar_geometry, Some(Xyhw::new(0, 780, 1000, 20)));
        assert_eq!(r.usable, Xyhw::new(5, 5, 990, 770));
        r.update_usable(Some((20, BarPosition::Bottom)), false, 0, |g| g);
        assert_eq!(r.bar_geometry, Some(Xyhw::new(0, 780, 1000, 20)));
        assert_eq!(r.usable, Xyhw::new(0, 0, 1000, 800));
    }
}
