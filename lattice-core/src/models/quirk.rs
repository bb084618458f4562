//! Classification rules applied to windows when they are first managed.
use super::{TypeMask, WindowType, WorkspaceIndex};
use bitflags::bitflags;
use regex::Regex;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Quirks: u32 {
        /// Always float.
        const FLOAT = 1;
        /// Size transient windows relative to their parent's region.
        const TRANSSZ = 1 << 1;
        /// Keep the requested position instead of centering.
        const ANYWHERE = 1 << 2;
        /// Start fullscreen, without border.
        const FULLSCREEN = 1 << 3;
        /// Focus the previously focused window when this one closes.
        const FOCUSPREV = 1 << 4;
        /// Never take focus when mapped.
        const NOFOCUSONMAP = 1 << 5;
        /// Take focus on map only if it is the only window of its class.
        const FOCUSONMAP_SINGLE = 1 << 6;
        /// Honour `_NET_ACTIVE_WINDOW` requests from the client.
        const OBEYAPPFOCUSREQ = 1 << 7;
        /// Ignore the spawn pid when choosing a workspace.
        const IGNOREPID = 1 << 8;
        /// Ignore the pid and the stored workspace when choosing a workspace.
        const IGNORESPAWNWS = 1 << 9;
        /// Skip when cycling focus.
        const NOFOCUSCYCLE = 1 << 10;
        /// Draw no border while floating.
        const MINIMALBORDER = 1 << 11;
        /// Start in the below layer.
        const BELOW = 1 << 12;
        /// Start in the above layer.
        const ABOVE = 1 << 13;
        /// Start iconified.
        const ICONIFY = 1 << 14;
        /// Start maximized.
        const MAXIMIZE = 1 << 15;
    }
}

impl std::str::FromStr for Quirks {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bitflags::parser::from_str::<Self>(&s.to_ascii_uppercase())
            .map_err(|err| format!("unknown quirk {s}: {err}"))
    }
}

/// How a matching rule combines with what earlier rules produced.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuirkMode {
    #[default]
    Add,
    Subtract,
    Replace,
}

#[derive(Debug, Clone)]
pub struct QuirkRule {
    class: Regex,
    instance: Regex,
    name: Regex,
    pub types: TypeMask,
    pub quirks: Quirks,
    pub mode: QuirkMode,
    /// Forced workspace (0-based).
    pub ws: Option<WorkspaceIndex>,
}

impl QuirkRule {
    /// Builds a rule. The patterns must match the whole property value.
    ///
    /// # Errors
    ///
    /// Fails if any of the patterns is not a valid regular expression.
    pub fn new(
        class: &str,
        instance: &str,
        name: &str,
        types: TypeMask,
        quirks: Quirks,
        mode: QuirkMode,
        ws: Option<WorkspaceIndex>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            class: anchored(class)?,
            instance: anchored(instance)?,
            name: anchored(name)?,
            types,
            quirks,
            mode,
            ws,
        })
    }

    #[must_use]
    pub fn matches(&self, class: &str, instance: &str, name: &str, r#type: WindowType) -> bool {
        self.types.contains(r#type.into())
            && self.class.is_match(class)
            && self.instance.is_match(instance)
            && self.name.is_match(name)
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Runs every rule in order and folds the matches together.
/// Returns the resulting quirks and the forced workspace of the last matching rule that sets one.
#[must_use]
pub fn classify(
    rules: &[QuirkRule],
    class: &str,
    instance: &str,
    name: &str,
    r#type: WindowType,
) -> (Quirks, Option<WorkspaceIndex>) {
    let mut quirks = Quirks::empty();
    let mut ws = None;
    for rule in rules
        .iter()
        .filter(|rule| rule.matches(class, instance, name, r#type))
    {
        match rule.mode {
            QuirkMode::Add => quirks |= rule.quirks,
            QuirkMode::Subtract => quirks &= !rule.quirks,
            QuirkMode::Replace => quirks = rule.quirks,
        }
        if rule.ws.is_some() {
            ws = rule.ws;
        }
    }
    (quirks, ws)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(class: &str, quirks: Quirks, mode: QuirkMode, ws: Option<usize>) -> QuirkRule {
        QuirkRule::new(class, ".*", ".*", TypeMask::all(), quirks, mode, ws).unwrap()
    }

    #[test]
    fn later_subtract_overrides_earlier_add() {
        let rules = vec![
            rule(".*", Quirks::FLOAT | Quirks::ANYWHERE, QuirkMode::Add, None),
            rule("Firefox", Quirks::FLOAT, QuirkMode::Subtract, None),
        ];
        let (quirks, _) = classify(&rules, "Firefox", "Navigator", "", WindowType::Normal);
        assert_eq!(quirks, Quirks::ANYWHERE);
    }

    #[test]
    fn replace_discards_everything_before() {
        let rules = vec![
            rule(".*", Quirks::FLOAT, QuirkMode::Add, Some(2)),
            rule("mpv", Quirks::FULLSCREEN, QuirkMode::Replace, None),
        ];
        let (quirks, ws) = classify(&rules, "mpv", "gl", "video", WindowType::Normal);
        assert_eq!(quirks, Quirks::FULLSCREEN);
        assert_eq!(ws, Some(2));
    }

    #[test]
    fn patterns_match_the_whole_value() {
        let rules = vec![rule("fox", Quirks::FLOAT, QuirkMode::Add, None)];
        let (quirks, _) = classify(&rules, "Firefox", "", "", WindowType::Normal);
        assert!(quirks.is_empty());
    }

    #[test]
    fn type_mask_limits_matches() {
        let dialog_only = QuirkRule::new(
            ".*",
            ".*",
            ".*",
            TypeMask::DIALOG,
            Quirks::FLOAT,
            QuirkMode::Add,
            None,
        )
        .unwrap();
        let rules = vec![dialog_only];
        assert!(classify(&rules, "a", "b", "c", WindowType::Normal).0.is_empty());
        assert_eq!(
            classify(&rules, "a", "b", "c", WindowType::Dialog).0,
            Quirks::FLOAT
        );
    }

    #[test]
    fn quirk_names_parse_case_insensitively() {
        let quirks: Quirks = "float | anywhere".parse().unwrap();
        assert_eq!(quirks, Quirks::FLOAT | Quirks::ANYWHERE);
        assert!("NOT_A_QUIRK".parse::<Quirks>().is_err());
    }
}
