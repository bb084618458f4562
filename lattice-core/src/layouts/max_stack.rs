use crate::models::{Window, Xyhw};

/// Layout which gives every tiled window the full usable area. Only the stacking order
/// decides which one is seen, so a focus change shows the new window without a re-layout.
pub fn update(area: Xyhw, windows: &mut [&mut Window]) {
    for window in windows.iter_mut() {
        window.g = area;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WindowId, WindowInfo};
    use slotmap::SlotMap;

    #[test]
    fn every_tile_gets_the_same_geometry() {
        let mut ids: SlotMap<WindowId, ()> = SlotMap::with_key();
        let mut ws: Vec<Window> = (0..3)
            .map(|_| Window::new(ids.insert(()), WindowInfo::default(), 0))
            .collect();
        let area = Xyhw::new(5, 5, 640, 480);
        let mut refs: Vec<&mut Window> = ws.iter_mut().collect();
        update(area, &mut refs);
        assert!(ws.iter().all(|w| w.g == area));
    }
}
