use crate::models::{RegionId, Xyhw};
use serde::{Deserialize, Serialize};

/// The anchor point of a floating window, chosen from the third of the region its center
/// falls in. Keeping the anchor fixed keeps a window visually in place when the region
/// it is relative to changes size.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Gravity {
    #[must_use]
    pub fn for_window(region: &Xyhw, g: &Xyhw) -> Self {
        let (cx, cy) = g.center();
        let col = third(cx - region.x(), region.w());
        let row = third(cy - region.y(), region.h());
        match (row, col) {
            (0, 0) => Self::NorthWest,
            (0, 1) => Self::North,
            (0, _) => Self::NorthEast,
            (1, 0) => Self::West,
            (1, 1) => Self::Center,
            (1, _) => Self::East,
            (_, 0) => Self::SouthWest,
            (_, 1) => Self::South,
            (_, _) => Self::SouthEast,
        }
    }

    /// Fractions (in halves) of the width and height where the anchor sits.
    const fn halves(self) -> (i32, i32) {
        match self {
            Self::NorthWest => (0, 0),
            Self::North => (1, 0),
            Self::NorthEast => (2, 0),
            Self::West => (0, 1),
            Self::Center => (1, 1),
            Self::East => (2, 1),
            Self::SouthWest => (0, 2),
            Self::South => (1, 2),
            Self::SouthEast => (2, 2),
        }
    }

    fn anchor(self, g: &Xyhw) -> (i32, i32) {
        let (hx, hy) = self.halves();
        (g.x() + g.w() * hx / 2, g.y() + g.h() * hy / 2)
    }
}

fn third(offset: i32, len: i32) -> u8 {
    if len <= 0 || offset * 3 < len {
        0
    } else if offset * 3 < len * 2 {
        1
    } else {
        2
    }
}

/// Floating geometry stored relative to a reference region.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatGeometry {
    pub region: RegionId,
    pub gravity: Gravity,
    /// Window anchor minus region anchor.
    pub dx: i32,
    pub dy: i32,
    pub w: i32,
    pub h: i32,
}

impl FloatGeometry {
    #[must_use]
    pub fn store(region: RegionId, region_g: &Xyhw, g: &Xyhw) -> Self {
        let gravity = Gravity::for_window(region_g, g);
        let (rx, ry) = gravity.anchor(region_g);
        let (wx, wy) = gravity.anchor(g);
        Self {
            region,
            gravity,
            dx: wx - rx,
            dy: wy - ry,
            w: g.w(),
            h: g.h(),
        }
    }

    /// Absolute geometry against the current geometry of the reference region.
    #[must_use]
    pub fn load(&self, region_g: &Xyhw) -> Xyhw {
        let (rx, ry) = self.gravity.anchor(region_g);
        let (hx, hy) = self.gravity.halves();
        Xyhw::new(
            rx + self.dx - self.w * hx / 2,
            ry + self.dy - self.h * hy / 2,
            self.w,
            self.h,
        )
    }
}

/// Keeps `g` inside `boundary`. Every edge may stick out by up to `softness` pixels; past
/// that the window is moved back, or with `resizable` the overflowing part is cut off.
/// A `softness` of zero is a hard boundary.
#[must_use]
pub fn contain(g: Xyhw, boundary: &Xyhw, softness: i32, resizable: bool) -> Xyhw {
    let softness = softness.max(0);
    let mut x = g.x();
    let mut y = g.y();
    let mut w = g.w();
    let mut h = g.h();

    let right = x + w - boundary.max_x();
    if right > softness {
        if resizable {
            w -= right - softness;
        } else {
            x -= right - softness;
        }
    }
    let left = boundary.x() - x;
    if left > softness {
        x += left - softness;
        if resizable {
            w -= left - softness;
        }
    }
    let bottom = y + h - boundary.max_y();
    if bottom > softness {
        if resizable {
            h -= bottom - softness;
        } else {
            y -= bottom - softness;
        }
    }
    let top = boundary.y() - y;
    if top > softness {
        y += top - softness;
        if resizable {
            h -= top - softness;
        }
    }
    Xyhw::new(x, y, w.max(1), h.max(1))
}

/// How far a window may leave its region so that `boundary_width` pixels stay visible.
/// Zero disables the soft boundary.
#[must_use]
pub fn softness_for(g: &Xyhw, boundary_width: i32) -> i32 {
    if boundary_width <= 0 {
        return 0;
    }
    (g.w().min(g.h()) - boundary_width).max(0)
}
