use super::BaseCommand;
use anyhow::{bail, ensure, Context, Result};
use lattice_core::layouts::Layout;
use lattice_core::utils::modmask_lookup::{into_mod, into_modmask};
use lattice_core::{Command, Direction};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Keybind {
    pub command: BaseCommand,
    #[serde(default)]
    pub value: String,
    pub modifier: Option<Modifier>,
    pub key: String,
}

impl Keybind {
    pub fn new(modifier: &[&str], key: &str, command: BaseCommand, value: &str) -> Self {
        Self {
            command,
            value: value.to_owned(),
            modifier: Some(Modifier::List(
                modifier.iter().map(|m| (*m).to_owned()).collect(),
            )),
            key: key.to_owned(),
        }
    }

    /// Builds the command this binding runs, validating `value` on the way.
    ///
    /// # Errors
    ///
    /// Fails if the command needs a value and `value` is missing or cannot be parsed.
    pub fn command(&self, workspace_limit: usize) -> Result<Command> {
        let value = self.value.trim();
        let workspace = || -> Result<usize> {
            let number = usize::from_str(value).context("invalid workspace number")?;
            ensure!(
                (1..=workspace_limit).contains(&number),
                "workspace {number} is outside 1..={workspace_limit}"
            );
            Ok(number - 1)
        };

        let command = match self.command {
            BaseCommand::FocusNext => Command::FocusNext,
            BaseCommand::FocusPrev => Command::FocusPrev,
            BaseCommand::FocusMain => Command::FocusMain,
            BaseCommand::FocusUrgent => Command::FocusUrgent,
            BaseCommand::SwapMain => Command::SwapMain,
            BaseCommand::SwapNext => Command::SwapNext,
            BaseCommand::SwapPrev => Command::SwapPrev,
            BaseCommand::SwitchWorkspace => Command::SwitchWorkspace(workspace()?),
            BaseCommand::MoveToWorkspace => Command::MoveToWorkspace(workspace()?),
            BaseCommand::WorkspaceNext => Command::WorkspaceNext,
            BaseCommand::WorkspacePrev => Command::WorkspacePrev,
            BaseCommand::WorkspacePrior => Command::WorkspacePrior,
            BaseCommand::FocusRegionNext => Command::FocusRegionNext,
            BaseCommand::FocusRegionPrev => Command::FocusRegionPrev,
            BaseCommand::CycleLayout => Command::CycleLayout,
            BaseCommand::SetLayout => Command::SetLayout(
                Layout::from_str(value).context("could not parse layout for SetLayout")?,
            ),
            BaseCommand::RestoreLayout => Command::RestoreLayout,
            BaseCommand::MasterGrow => Command::MasterGrow,
            BaseCommand::MasterShrink => Command::MasterShrink,
            BaseCommand::MasterAdd => Command::MasterAdd,
            BaseCommand::MasterDel => Command::MasterDel,
            BaseCommand::StackInc => Command::StackInc,
            BaseCommand::StackDec => Command::StackDec,
            BaseCommand::FlipLayout => Command::FlipLayout,
            BaseCommand::ResetLayout => Command::ResetLayout,
            BaseCommand::ToggleFloat => Command::ToggleFloat,
            BaseCommand::ToggleMaximize => Command::ToggleMaximize,
            BaseCommand::ToggleFullscreen => Command::ToggleFullscreen,
            BaseCommand::Iconify => Command::Iconify,
            BaseCommand::Uniconify => Command::Uniconify,
            BaseCommand::RaiseToggle => Command::RaiseToggle,
            BaseCommand::Move => Command::Move,
            BaseCommand::Resize => Command::Resize,
            BaseCommand::MoveStep => Command::MoveStep(direction(value)?),
            BaseCommand::ResizeStep => Command::ResizeStep(direction(value)?),
            BaseCommand::SearchWindow => Command::SearchWindow,
            BaseCommand::CloseWindow => Command::CloseWindow,
            BaseCommand::KillWindow => Command::KillWindow,
            BaseCommand::Execute => {
                ensure!(!value.is_empty(), "value must not be empty");
                Command::Execute(value.to_owned())
            }
            BaseCommand::BarToggle => Command::BarToggle,
            BaseCommand::DumpState => Command::DumpState,
            BaseCommand::Restart => Command::Restart,
            BaseCommand::Quit => Command::Quit,
        };
        Ok(command)
    }

    /// Resolves the binding against the configured `modkey`.
    ///
    /// # Errors
    ///
    /// Fails on unknown modifier names and on an invalid value.
    pub fn to_core(&self, modkey: &str, workspace_limit: usize) -> Result<lattice_core::Keybind> {
        let modifiers: Vec<String> = self
            .modifier
            .iter()
            .flatten()
            .map(|m| if m == "modkey" { modkey.to_owned() } else { m })
            .filter(|m| m != "None")
            .collect();
        if let Some(unknown) = modifiers.iter().find(|m| into_mod(m).is_empty()) {
            bail!("modifier `{unknown}` is not valid");
        }
        ensure!(!self.key.is_empty(), "key must not be empty");
        Ok(lattice_core::Keybind {
            modmask: into_modmask(&modifiers),
            key: self.key.clone(),
            command: self.command(workspace_limit)?,
        })
    }
}

fn direction(value: &str) -> Result<Direction> {
    let direction = match value.to_ascii_lowercase().as_str() {
        "up" => Direction::Up,
        "down" => Direction::Down,
        "left" => Direction::Left,
        "right" => Direction::Right,
        _ => bail!("invalid direction `{value}`, expected up, down, left or right"),
    };
    Ok(direction)
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
#[serde(untagged)]
pub enum Modifier {
    Single(String),
    List(Vec<String>),
}

impl Modifier {
    pub fn is_empty(&self) -> bool {
        match self {
            Modifier::Single(single) => single.is_empty(),
            Modifier::List(list) => list.is_empty(),
        }
    }

    pub fn sort_unstable(&mut self) {
        match self {
            Self::Single(_) => {}
            Self::List(modifiers) => modifiers.sort_unstable(),
        }
    }
}

impl From<Modifier> for Vec<String> {
    fn from(m: Modifier) -> Self {
        match m {
            Modifier::Single(modifier) => vec![modifier],
            Modifier::List(modifiers) => modifiers,
        }
    }
}

impl IntoIterator for &Modifier {
    type Item = String;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        Vec::from(self.clone()).into_iter()
    }
}

impl From<&str> for Modifier {
    fn from(m: &str) -> Self {
        Self::Single(m.to_owned())
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(modifier) => write!(f, "{modifier}"),
            Self::List(modifiers) => write!(f, "{}", modifiers.join("+")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::ModMask;

    #[test]
    fn modkey_is_substituted() {
        let keybind = Keybind::new(&["modkey", "Shift"], "Return", BaseCommand::SwapMain, "");
        let core = keybind.to_core("Mod1", 10).unwrap();
        assert_eq!(core.modmask, ModMask::Mod1 | ModMask::Shift);
        assert_eq!(core.command, Command::SwapMain);
    }

    #[test]
    fn workspace_numbers_start_at_one() {
        let keybind = Keybind::new(&["modkey"], "3", BaseCommand::SwitchWorkspace, "3");
        assert_eq!(keybind.command(10).unwrap(), Command::SwitchWorkspace(2));
        let zero = Keybind::new(&["modkey"], "0", BaseCommand::SwitchWorkspace, "0");
        assert!(zero.command(10).is_err());
        let too_far = Keybind::new(&["modkey"], "0", BaseCommand::MoveToWorkspace, "11");
        assert!(too_far.command(10).is_err());
    }

    #[test]
    fn values_are_validated() {
        let empty = Keybind::new(&["modkey"], "p", BaseCommand::Execute, "");
        assert!(empty.command(10).is_err());
        let step = Keybind::new(&["modkey"], "bracketleft", BaseCommand::MoveStep, "Left");
        assert_eq!(step.command(10).unwrap(), Command::MoveStep(Direction::Left));
        let layout = Keybind::new(&["modkey"], "m", BaseCommand::SetLayout, "max");
        assert_eq!(layout.command(10).unwrap(), Command::SetLayout(Layout::MaxStack));
    }

    #[test]
    fn unknown_modifiers_are_rejected() {
        let keybind = Keybind::new(&["Hyper"], "a", BaseCommand::Quit, "");
        assert!(keybind.to_core("Mod4", 10).is_err());
        let single = Keybind {
            modifier: Some("None".into()),
            ..Keybind::new(&[], "F1", BaseCommand::BarToggle, "")
        };
        assert_eq!(single.to_core("Mod4", 10).unwrap().modmask, ModMask::empty());
    }
}
