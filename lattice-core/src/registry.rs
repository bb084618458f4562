//! Arena of managed windows.
use crate::models::{ScreenIndex, Window, WindowHandle, WindowId, WindowInfo};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Owns every managed window record. Handles are generational, so a handle kept
/// past `remove` fails lookups instead of reaching a recycled record.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: SlotMap<WindowId, Window>,
    by_handle: HashMap<WindowHandle, WindowId>,
}

impl WindowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(id)
    }

    #[must_use]
    pub fn lookup(&self, handle: WindowHandle) -> Option<WindowId> {
        self.by_handle.get(&handle).copied()
    }

    #[must_use]
    pub fn by_handle(&self, handle: WindowHandle) -> Option<&Window> {
        self.get(self.lookup(handle)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.values_mut()
    }

    /// Creates the record. Returns the existing handle (and `false`) if the window is
    /// already managed.
    pub fn insert(&mut self, info: WindowInfo, screen: ScreenIndex) -> (WindowId, bool) {
        if let Some(id) = self.lookup(info.handle) {
            return (id, false);
        }
        let handle = info.handle;
        let id = self
            .windows
            .insert_with_key(|id| Window::new(id, info, screen));
        self.by_handle.insert(handle, id);
        (id, true)
    }

    /// Frees the record. The caller must already have dropped every other reference.
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let window = self.windows.remove(id)?;
        self.by_handle.remove(&window.handle);
        Some(window)
    }

    /// Walks the `parent` chain to its root. The walk is bounded by the number of managed
    /// windows, so malformed chains cannot loop forever.
    #[must_use]
    pub fn resolve_main(&self, id: WindowId) -> Option<WindowId> {
        let mut current = id;
        for _ in 0..self.len() {
            match self.get(current)?.parent {
                Some(parent) if self.contains(parent) => current = parent,
                _ => return Some(current),
            }
        }
        Some(current)
    }

    /// Ancestors of `id`, nearest first. Bounded like [`Self::resolve_main`].
    #[must_use]
    pub fn ancestors(&self, id: WindowId) -> Vec<WindowId> {
        let mut found = vec![];
        let mut current = id;
        for _ in 0..self.len() {
            match self.get(current).and_then(|w| w.parent) {
                Some(parent) if self.contains(parent) && parent != id && !found.contains(&parent) => {
                    found.push(parent);
                    current = parent;
                }
                _ => break,
            }
        }
        found
    }

    /// Windows whose transient chain ends at `main`, excluding `main` itself.
    #[must_use]
    pub fn transients_of(&self, main: WindowId) -> Vec<WindowId> {
        self.windows
            .values()
            .filter(|w| w.id != main && w.main == main)
            .map(|w| w.id)
            .collect()
    }

    #[must_use]
    pub fn related(&self, a: WindowId, b: WindowId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.main == b.main,
            _ => false,
        }
    }

    /// Resolves `transient_for` handles into `parent` links and recomputes `main` for
    /// every window. A link that would close a cycle is refused.
    pub fn relink(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().collect();
        for id in &ids {
            let Some(window) = self.get(*id) else {
                continue;
            };
            let parent = window
                .transient_for
                .and_then(|h| self.lookup(h))
                .filter(|p| p != id);
            let parent = parent.filter(|p| !self.chain_reaches(*p, *id));
            if let Some(window) = self.get_mut(*id) {
                window.parent = parent;
            }
        }
        for id in ids {
            let main = self.resolve_main(id).unwrap_or(id);
            if let Some(window) = self.get_mut(id) {
                window.main = main;
            }
        }
    }

    fn chain_reaches(&self, start: WindowId, target: WindowId) -> bool {
        let mut current = start;
        for _ in 0..self.len() {
            if current == target {
                return true;
            }
            match self.get(current).and_then(|w| w.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        true
    }

    /// Clears `parent`, `main` and `focus_redirect` fields of other windows that point at `id`.
    pub fn forget(&mut self, id: WindowId) {
        for window in self.windows.values_mut() {
            if window.parent == Some(id) {
                window.parent = None;
            }
            if window.main == id && window.id != id {
                window.main = window.id;
            }
            if window.focus_redirect == Some(id) {
                window.focus_redirect = None;
            }
        }
        let ids: Vec<WindowId> = self.windows.keys().filter(|w| *w != id).collect();
        for other in ids {
            let main = self.resolve_main(other).unwrap_or(other);
            if let Some(window) = self.get_mut(other) {
                window.main = main;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(handle: u64, transient_for: Option<u64>) -> WindowInfo {
        WindowInfo {
            handle: WindowHandle(handle),
            transient_for: transient_for.map(WindowHandle),
            ..WindowInfo::default()
        }
    }

    #[test]
    fn insert_is_idempotent() {
        let mut registry = WindowRegistry::new();
        let (a, created) = registry.insert(info(1, None), 0);
        assert!(created);
        let (b, created) = registry.insert(info(1, None), 0);
        assert!(!created);
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn chain_resolves_to_root() {
        let mut registry = WindowRegistry::new();
        let (root, _) = registry.insert(info(1, None), 0);
        let (child, _) = registry.insert(info(2, Some(1)), 0);
        let (grandchild, _) = registry.insert(info(3, Some(2)), 0);
        registry.relink();
        assert_eq!(registry.resolve_main(grandchild), Some(root));
        assert_eq!(registry.get(grandchild).unwrap().main, root);
        assert_eq!(registry.get(child).unwrap().parent, Some(root));
        assert_eq!(registry.ancestors(grandchild), vec![child, root]);
        assert_eq!(registry.transients_of(root).len(), 2);
    }

    #[test]
    fn transient_for_cycle_is_refused() {
        let mut registry = WindowRegistry::new();
        let (a, _) = registry.insert(info(1, Some(2)), 0);
        let (b, _) = registry.insert(info(2, Some(1)), 0);
        registry.relink();
        let main_a = registry.resolve_main(a).unwrap();
        let main_b = registry.resolve_main(b).unwrap();
        assert_eq!(main_a, main_b);
        assert!(registry.get(main_a).unwrap().parent.is_none());
    }

    #[test]
    fn resolve_main_terminates_on_forced_cycle() {
        let mut registry = WindowRegistry::new();
        let (a, _) = registry.insert(info(1, None), 0);
        let (b, _) = registry.insert(info(2, None), 0);
        registry.get_mut(a).unwrap().parent = Some(b);
        registry.get_mut(b).unwrap().parent = Some(a);
        assert!(registry.resolve_main(a).is_some());
        assert!(registry.ancestors(a).len() <= registry.len());
    }

    #[test]
    fn forget_clears_links_to_removed_window() {
        let mut registry = WindowRegistry::new();
        let (root, _) = registry.insert(info(1, None), 0);
        let (child, _) = registry.insert(info(2, Some(1)), 0);
        registry.relink();
        registry.get_mut(root).unwrap().focus_redirect = Some(child);

        registry.forget(root);
        registry.remove(root);

        let child = registry.get(child).unwrap();
        assert_eq!(child.parent, None);
        assert_eq!(child.main, child.id);
        assert!(registry.get(root).is_none());
        assert_eq!(registry.lookup(WindowHandle(1)), None);
    }

    #[test]
    fn stale_handle_fails_lookup_after_slot_reuse() {
        let mut registry = WindowRegistry::new();
        let (old, _) = registry.insert(info(1, None), 0);
        registry.remove(old);
        let (new, _) = registry.insert(info(5, None), 0);
        assert_ne!(old, new);
        assert!(registry.get(old).is_none());
    }
}
