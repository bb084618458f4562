use crate::models::Xyhw;
use serde::{Deserialize, Serialize};

/// Space reserved by a dock along the edges of the root window,
/// in the layout of `_NET_WM_STRUT_PARTIAL`.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Strut {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,

    pub left_start_y: i32,
    pub left_end_y: i32,
    pub right_start_y: i32,
    pub right_end_y: i32,
    pub top_start_x: i32,
    pub top_end_x: i32,
    pub bottom_start_x: i32,
    pub bottom_end_x: i32,
}

impl From<&[i64]> for Strut {
    fn from(slice: &[i64]) -> Self {
        let at = |i: usize| slice.get(i).copied().unwrap_or_default() as i32;
        Self {
            left: at(0),
            right: at(1),
            top: at(2),
            bottom: at(3),
            left_start_y: at(4),
            left_end_y: at(5),
            right_start_y: at(6),
            right_end_y: at(7),
            top_start_x: at(8),
            top_end_x: at(9),
            bottom_start_x: at(10),
            bottom_end_x: at(11),
        }
    }
}

impl Strut {
    /// Builds a strut from the four values of the legacy `_NET_WM_STRUT`, which
    /// reserves the full length of each edge.
    #[must_use]
    pub fn full_edges(left: i32, right: i32, top: i32, bottom: i32, root: &Xyhw) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            left_start_y: root.y(),
            left_end_y: root.max_y() - 1,
            right_start_y: root.y(),
            right_end_y: root.max_y() - 1,
            top_start_x: root.x(),
            top_end_x: root.max_x() - 1,
            bottom_start_x: root.x(),
            bottom_end_x: root.max_x() - 1,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left <= 0 && self.right <= 0 && self.top <= 0 && self.bottom <= 0
    }

    /// Removes the reserved space from `area`. `root` is the geometry of the root window
    /// the strut values are relative to.
    #[must_use]
    pub fn trim(&self, area: Xyhw, root: &Xyhw) -> Xyhw {
        let mut x = area.x();
        let mut y = area.y();
        let mut max_x = area.max_x();
        let mut max_y = area.max_y();

        if self.left > 0 {
            let rect = Xyhw::new(
                root.x(),
                self.left_start_y,
                self.left,
                self.left_end_y - self.left_start_y + 1,
            );
            if rect.intersects(&area) {
                x = x.max(rect.max_x());
            }
        }
        if self.right > 0 {
            let rect = Xyhw::new(
                root.max_x() - self.right,
                self.right_start_y,
                self.right,
                self.right_end_y - self.right_start_y + 1,
            );
            if rect.intersects(&area) {
                max_x = max_x.min(rect.x());
            }
        }
        if self.top > 0 {
            let rect = Xyhw::new(
                self.top_start_x,
                root.y(),
                self.top_end_x - self.top_start_x + 1,
                self.top,
            );
            if rect.intersects(&area) {
                y = y.max(rect.max_y());
            }
        }
        if self.bottom > 0 {
            let rect = Xyhw::new(
                self.bottom_start_x,
                root.max_y() - self.bottom,
                self.bottom_end_x - self.bottom_start_x + 1,
                self.bottom,
            );
            if rect.intersects(&area) {
                max_y = max_y.min(rect.y());
            }
        }

        Xyhw::new(x, y, (max_x - x).max(1), (max_y - y).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: Xyhw = Xyhw::new(0, 0, 3840, 1080);

    #[test]
    fn top_panel_on_left_output_only_trims_left_output() {
        let strut = Strut {
            top: 24,
            top_start_x: 0,
            top_end_x: 1919,
            ..Strut::default()
        };
        let left = Xyhw::new(0, 0, 1920, 1080);
        let right = Xyhw::new(1920, 0, 1920, 1080);
        assert_eq!(strut.trim(left, &ROOT), Xyhw::new(0, 24, 1920, 1056));
        assert_eq!(strut.trim(right, &ROOT), right);
    }

    #[test]
    fn legacy_bottom_strut_spans_every_output() {
        let strut = Strut::full_edges(0, 0, 0, 30, &ROOT);
        let right = Xyhw::new(1920, 0, 1920, 1080);
        assert_eq!(strut.trim(right, &ROOT), Xyhw::new(1920, 0, 1920, 1050));
    }

    #[test]
    fn strut_from_property_values() {
        let values: [i64; 12] = [10, 0, 0, 0, 0, 1079, 0, 0, 0, 0, 0, 0];
        let strut = Strut::from(&values[..]);
        assert_eq!(strut.left, 10);
        assert_eq!(strut.left_end_y, 1079);
        assert_eq!(strut.trim(ROOT, &ROOT), Xyhw::new(10, 0, 3830, 1080));
    }
}
