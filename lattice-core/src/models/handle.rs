use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

/// The display server's identifier of a window (an X window id).
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

new_key_type! {
    /// Generational handle to a managed window record.
    ///
    /// A handle whose window has been unmanaged fails every lookup instead of
    /// reaching a recycled record.
    pub struct WindowId;

    /// Generational handle to a region, live or pooled.
    pub struct RegionId;
}
