use crate::models::Xyhw;
use serde::{Deserialize, Serialize};

/// A partial geometry, as sent by clients in configure requests.
#[derive(Default, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Copy)]
pub struct XyhwChange {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub h: Option<i32>,
    pub w: Option<i32>,
}

impl From<Xyhw> for XyhwChange {
    fn from(xywh: Xyhw) -> Self {
        Self {
            x: Some(xywh.x()),
            y: Some(xywh.y()),
            w: Some(xywh.w()),
            h: Some(xywh.h()),
        }
    }
}

impl XyhwChange {
    /// Applies the set fields to `xyhw`. Returns true if anything changed.
    pub fn update(&self, xyhw: &mut Xyhw) -> bool {
        let before = *xyhw;
        if let Some(x) = self.x {
            xyhw.set_x(x);
        }
        if let Some(y) = self.y {
            xyhw.set_y(y);
        }
        if let Some(w) = self.w {
            xyhw.set_w(w.max(1));
        }
        if let Some(h) = self.h {
            xyhw.set_h(h.max(1));
        }
        before != *xyhw
    }

    #[must_use]
    pub const fn moves(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}
