use serde::{Deserialize, Serialize};

/// The parts of `WM_NORMAL_HINTS` the window manager honours.
/// A zero value means "not set".
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SizeHints {
    pub min_w: i32,
    pub min_h: i32,
    pub max_w: i32,
    pub max_h: i32,
    pub base_w: i32,
    pub base_h: i32,
    pub inc_w: i32,
    pub inc_h: i32,
}

impl SizeHints {
    #[must_use]
    pub const fn has_increments(&self) -> bool {
        self.inc_w > 1 || self.inc_h > 1
    }

    /// Returns the client height closest to `h` that is a valid increment step.
    /// Ties round down.
    #[must_use]
    pub fn nearest_height(&self, h: i32) -> i32 {
        nearest_step(h, self.base_h, self.inc_h)
    }

    /// Returns the client width closest to `w` that is a valid increment step.
    #[must_use]
    pub fn nearest_width(&self, w: i32) -> i32 {
        nearest_step(w, self.base_w, self.inc_w)
    }

    /// Clamps a client size into the min/max hints.
    #[must_use]
    pub fn clamp(&self, w: i32, h: i32) -> (i32, i32) {
        let mut w = w.max(self.min_w).max(1);
        let mut h = h.max(self.min_h).max(1);
        if self.max_w > 0 {
            w = w.min(self.max_w);
        }
        if self.max_h > 0 {
            h = h.min(self.max_h);
        }
        (w, h)
    }
}

fn nearest_step(len: i32, base: i32, inc: i32) -> i32 {
    if inc <= 1 || len <= base {
        return len;
    }
    let over = (len - base) % inc;
    if over * 2 > inc {
        len + (inc - over)
    } else {
        len - over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_height_rounds_to_closest_step() {
        let hints = SizeHints {
            base_h: 4,
            inc_h: 10,
            ..SizeHints::default()
        };
        assert_eq!(hints.nearest_height(4 + 32), 4 + 30);
        assert_eq!(hints.nearest_height(4 + 37), 4 + 40);
        assert_eq!(hints.nearest_height(4 + 35), 4 + 30);
    }

    #[test]
    fn no_increment_keeps_length() {
        let hints = SizeHints::default();
        assert_eq!(hints.nearest_width(123), 123);
    }

    #[test]
    fn clamp_respects_min_and_max() {
        let hints = SizeHints {
            min_w: 50,
            max_h: 100,
            ..SizeHints::default()
        };
        assert_eq!(hints.clamp(10, 500), (50, 100));
    }
}
