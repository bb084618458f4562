#![allow(clippy::wildcard_imports)]

use super::*;
use crate::models::SearchState;
use crate::GrabKind;

impl<C: Config> State<C> {
    /// Labels every focusable window of the focused workspace with a number and grabs the
    /// keyboard until one is picked.
    pub fn begin_search(&mut self) -> bool {
        if !self.mode.is_normal() {
            return false;
        }
        let Some((screen, ws)) = self.focused_workspace() else {
            return false;
        };
        let Some(root) = self.screens.get(screen).map(|s| s.root) else {
            return false;
        };
        let candidates: Vec<WindowId> = self
            .workspace(screen, ws)
            .map(|w| {
                w.windows
                    .iter()
                    .copied()
                    .filter(|id| self.windows.get(*id).is_some_and(Window::can_focus))
                    .collect()
            })
            .unwrap_or_default();
        if candidates.is_empty() {
            return false;
        }
        let labels: Vec<(String, WindowId)> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, id)| ((i + 1).to_string(), id))
            .collect();
        let shown = labels
            .iter()
            .filter_map(|(label, id)| Some((self.windows.get(*id)?.handle, label.clone())))
            .collect();
        self.mode = Mode::Searching(SearchState {
            screen,
            labels,
            typed: String::new(),
        });
        self.actions
            .push_back(DisplayAction::BeginGrab(root, GrabKind::Search));
        self.actions.push_back(DisplayAction::ShowSearchLabels(shown));
        true
    }

    /// A key typed while the search labels are up.
    pub fn search_key(&mut self, key: &str) -> bool {
        if key == self.config.cancel_key() {
            return self.end_search(None);
        }
        let Mode::Searching(search) = &mut self.mode else {
            return false;
        };
        match key {
            "Return" | "KP_Enter" => {
                let picked = search
                    .labels
                    .iter()
                    .find(|(label, _)| *label == search.typed)
                    .map(|(_, id)| *id);
                self.end_search(picked)
            }
            "BackSpace" => search.typed.pop().is_some(),
            _ => {
                let Some(digit) = digit_of(key) else {
                    return false;
                };
                search.typed.push(digit);
                let matching: Vec<&(String, WindowId)> = search
                    .labels
                    .iter()
                    .filter(|(label, _)| label.starts_with(search.typed.as_str()))
                    .collect();
                // Typed digits stay in the buffer even without a match, so BackSpace
                // undoes exactly what was typed.
                match matching.as_slice() {
                    [(label, id)] if *label == search.typed => {
                        let id = *id;
                        self.end_search(Some(id))
                    }
                    _ => true,
                }
            }
        }
    }

    /// Takes the labels down and releases the keyboard, focusing `picked` if it is still
    /// around.
    pub fn end_search(&mut self, picked: Option<WindowId>) -> bool {
        if !matches!(self.mode, Mode::Searching(_)) {
            return false;
        }
        self.mode = Mode::Normal;
        self.actions.push_back(DisplayAction::HideSearchLabels);
        self.actions.push_back(DisplayAction::EndGrab);
        if let Some(id) = picked.filter(|id| self.windows.contains(*id)) {
            self.focus_window(id);
            self.raise_window(id);
        }
        true
    }
}

fn digit_of(key: &str) -> Option<char> {
    let key = key.strip_prefix("KP_").unwrap_or(key);
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::modmask_lookup::ModMask;

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 1000);

    fn key(name: &str) -> DisplayEvent {
        DisplayEvent::KeyPress(ModMask::empty(), name.to_owned(), 0)
    }

    #[test]
    fn unique_label_is_picked_as_soon_as_it_is_typed() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.manage_test_window(3);
        manager.state.focus_window(a);
        assert!(manager.state.begin_search());
        manager.run_pending();
        assert!(matches!(manager.state.mode, Mode::Searching(_)));

        manager.feed(key("2"));
        assert!(manager.state.mode.is_normal());
        assert_eq!(manager.state.focused_window(), Some(b));
        let executed = &manager.display_server.executed;
        assert!(executed.iter().any(|a| matches!(a, DisplayAction::HideSearchLabels)));
        assert!(executed.iter().any(|a| matches!(a, DisplayAction::EndGrab)));
    }

    #[test]
    fn ambiguous_prefix_waits_for_return() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let ids: Vec<WindowId> = (1..=11).map(|h| manager.manage_test_window(h)).collect();
        manager.state.focus_window(ids[4]);
        assert!(manager.state.begin_search());
        manager.feed(key("1"));
        assert!(matches!(manager.state.mode, Mode::Searching(_)));
        manager.feed(key("7"));
        manager.feed(key("BackSpace"));
        manager.feed(key("Return"));
        assert!(manager.state.mode.is_normal());
        assert_eq!(manager.state.focused_window(), Some(ids[0]));
    }

    #[test]
    fn return_without_a_match_keeps_focus() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let ids: Vec<WindowId> = (1..=11).map(|h| manager.manage_test_window(h)).collect();
        manager.state.focus_window(ids[4]);
        assert!(manager.state.begin_search());
        manager.feed(key("1"));
        manager.feed(key("9"));
        assert!(matches!(&manager.state.mode, Mode::Searching(search) if search.typed == "19"));
        manager.feed(key("Return"));
        assert!(manager.state.mode.is_normal());
        assert_eq!(manager.state.focused_window(), Some(ids[4]));
    }

    #[test]
    fn cancel_key_aborts_without_changing_focus() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        assert!(manager.state.begin_search());
        manager.feed(key("1"));
        assert!(manager.state.mode.is_normal());
        assert!(manager.state.begin_search());
        manager.feed(key("Escape"));
        assert!(manager.state.mode.is_normal());
        assert_ne!(manager.state.focused_window(), Some(b));
    }

    #[test]
    fn labels_of_destroyed_windows_disappear() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        manager.manage_test_window(1);
        assert!(manager.state.begin_search());
        manager.feed(DisplayEvent::WindowDestroy(WindowHandle(1)));
        assert!(manager.state.mode.is_normal());
    }

    #[test]
    fn keypad_digits_count() {
        assert_eq!(digit_of("KP_3"), Some('3'));
        assert_eq!(digit_of("a"), None);
        assert_eq!(digit_of("12"), None);
    }
}
