use anyhow::{anyhow, ensure, Result};
use lattice_core::models::{QuirkMode, QuirkRule, Quirks, TypeMask, WindowType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A `[[quirk]]` table.
///
/// # Example
///
/// ```toml
/// [[quirk]]
/// class = "Gimp"
/// quirks = ["FLOAT", "ANYWHERE"]
/// ws = 3
/// ```
///
/// The patterns are regular expressions matched against the whole property. `types` limits the
/// rule to some window types (all of them when empty) and `ws` forces a workspace, counted from 1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuirkConfig {
    #[serde(default = "any")]
    pub class: String,
    #[serde(default = "any")]
    pub instance: String,
    #[serde(default = "any")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default)]
    pub quirks: Vec<String>,
    #[serde(default)]
    pub mode: QuirkMode,
    pub ws: Option<usize>,
}

fn any() -> String {
    ".*".to_owned()
}

impl QuirkConfig {
    pub fn new(class: &str, instance: &str, quirks: &[&str]) -> Self {
        Self {
            class: class.to_owned(),
            instance: instance.to_owned(),
            name: any(),
            types: vec![],
            quirks: quirks.iter().map(|q| (*q).to_owned()).collect(),
            mode: QuirkMode::Add,
            ws: None,
        }
    }

    /// # Errors
    ///
    /// Fails on an invalid pattern, an unknown quirk or window type, or a workspace outside
    /// `1..=workspace_limit`.
    pub fn to_rule(&self, workspace_limit: usize) -> Result<QuirkRule> {
        let quirks = self.quirks.iter().try_fold(Quirks::empty(), |acc, name| {
            Quirks::from_str(name)
                .map(|q| acc | q)
                .map_err(|err| anyhow!(err))
        })?;
        let types = if self.types.is_empty() {
            TypeMask::all()
        } else {
            self.types.iter().try_fold(TypeMask::empty(), |acc, name| {
                WindowType::from_str(name)
                    .map(|t| acc | TypeMask::from(t))
                    .map_err(|err| anyhow!(err))
            })?
        };
        let ws = match self.ws {
            Some(number) => {
                ensure!(
                    (1..=workspace_limit).contains(&number),
                    "workspace {number} is outside 1..={workspace_limit}"
                );
                Some(number - 1)
            }
            None => None,
        };
        Ok(QuirkRule::new(
            &self.class,
            &self.instance,
            &self.name,
            types,
            quirks,
            self.mode,
            ws,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_rule_from_names() {
        let config = QuirkConfig {
            types: vec!["dialog".to_owned()],
            ws: Some(2),
            ..QuirkConfig::new("Firefox", ".*", &["float", "TRANSSZ"])
        };
        let rule = config.to_rule(10).unwrap();
        assert_eq!(rule.quirks, Quirks::FLOAT | Quirks::TRANSSZ);
        assert_eq!(rule.types, TypeMask::DIALOG);
        assert_eq!(rule.ws, Some(1));
        assert!(rule.matches("Firefox", "Navigator", "Save as", WindowType::Dialog));
        assert!(!rule.matches("Firefox", "Navigator", "Mozilla", WindowType::Normal));
    }

    #[test]
    fn broken_rules_are_errors() {
        assert!(QuirkConfig::new("(", ".*", &[]).to_rule(10).is_err());
        assert!(QuirkConfig::new("a", ".*", &["WOBBLY"]).to_rule(10).is_err());
        let outside = QuirkConfig {
            ws: Some(11),
            ..QuirkConfig::new("a", ".*", &[])
        };
        assert!(outside.to_rule(10).is_err());
    }

    #[test]
    fn missing_patterns_match_anything() {
        let config: QuirkConfig = toml::from_str("quirks = [\"FLOAT\"]").unwrap();
        assert_eq!(config.class, ".*");
        assert_eq!(config.mode, QuirkMode::Add);
        assert!(config
            .to_rule(10)
            .unwrap()
            .matches("x", "y", "z", WindowType::Normal));
    }
}
