use super::{SizeHints, Strut, Window, WindowFlags, WindowHandle, WindowType};
use serde::{Deserialize, Serialize};

type MaybeName = Option<String>;

/// Property changes of a managed window, as reported by the display server.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WindowChange {
    pub handle: WindowHandle,
    pub transient: Option<Option<WindowHandle>>,
    pub accepts_input: Option<bool>,
    pub urgent: Option<bool>,
    pub name: Option<MaybeName>,
    pub r#type: Option<WindowType>,
    pub strut: Option<Option<Strut>>,
    pub hints: Option<SizeHints>,
}

impl WindowChange {
    #[must_use]
    pub const fn new(h: WindowHandle) -> Self {
        Self {
            handle: h,
            transient: None,
            accepts_input: None,
            urgent: None,
            name: None,
            r#type: None,
            strut: None,
            hints: None,
        }
    }

    /// Applies the change. Returns true if anything visible to the layout changed.
    /// A new transient-for target is only recorded here; linking it is up to the caller.
    pub fn update(self, window: &mut Window) -> bool {
        let mut changed = false;
        if let Some(trans) = self.transient {
            changed |= window.transient_for != trans;
            window.transient_for = trans;
        }
        if let Some(name) = self.name {
            window.name = name;
        }
        if let Some(input) = self.accepts_input {
            window.accepts_input = input;
        }
        if let Some(urgent) = self.urgent {
            let was = window.flags.contains(WindowFlags::DEMANDS_ATTENTION);
            window.flags.set(WindowFlags::DEMANDS_ATTENTION, urgent);
            changed |= was != urgent;
        }
        if let Some(r#type) = self.r#type {
            changed |= window.r#type != r#type;
            window.r#type = r#type;
        }
        if let Some(strut) = self.strut {
            changed |= window.strut != strut;
            window.strut = strut;
        }
        if let Some(hints) = self.hints {
            changed |= window.hints != hints;
            window.hints = hints;
        }
        changed
    }
}
