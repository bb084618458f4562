//! Ordered buffer of events waiting for dispatch.
use crate::DisplayEvent;
use std::collections::VecDeque;

/// Events are dispatched strictly in arrival order. `push_front` puts a peeked event back
/// at the head without disturbing the order of the rest.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: VecDeque<DisplayEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn push_back(&mut self, event: DisplayEvent) {
        self.inner.push_back(event);
    }

    pub fn push_front(&mut self, event: DisplayEvent) {
        self.inner.push_front(event);
    }

    pub fn pop_front(&mut self) -> Option<DisplayEvent> {
        self.inner.pop_front()
    }

    #[must_use]
    pub fn front(&self) -> Option<&DisplayEvent> {
        self.inner.front()
    }

    /// Drops queued button presses and releases, returning how many were dropped.
    pub fn drain_buttons(&mut self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|e| !e.is_button());
        before - self.inner.len()
    }
}

impl Extend<DisplayEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = DisplayEvent>>(&mut self, iter: T) {
        self.inner.extend(iter);
    }
}
