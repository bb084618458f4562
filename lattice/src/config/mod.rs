//! `lattice` general configuration

mod checks;
mod default;
mod keybind;
mod quirk;

pub use self::keybind::{Keybind, Modifier};
pub use self::quirk::QuirkConfig;

use super::BaseCommand;
use anyhow::Result;
use lattice_core::layouts::{Layout, LayoutTuning};
use lattice_core::models::{
    BarPosition, FocusClosePolicy, FocusMode, QuirkRule, UnfocusPolicy, WorkspaceIndex,
};
use lattice_core::utils::modmask_lookup::into_modmask;
use lattice_core::ModMask;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use xdg::BaseDirectories;

/// Hard upper bound of workspaces per screen.
pub const MAX_WORKSPACES: usize = 22;

/// General configuration
#[allow(clippy::struct_excessive_bools)]
#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    pub modkey: String,
    pub mousekey: Option<Modifier>,
    pub workspace_limit: usize,
    pub workspace_names: Vec<String>,
    pub layout: Layout,
    pub border_width: i32,
    pub focused_border_color: String,
    pub default_border_color: String,
    pub urgent_border_color: String,
    pub region_padding: i32,
    pub bar_enabled: bool,
    pub bar_height: i32,
    pub bar_position: BarPosition,
    pub bar_font: String,
    pub bar_color: String,
    pub bar_font_color: String,
    /// Milliseconds between two bar refreshes.
    pub bar_delay: u64,
    pub focus_mode: FocusMode,
    pub focus_close: FocusClosePolicy,
    pub focus_close_wrap: bool,
    pub focus_default_last: bool,
    pub unfocus_policy: UnfocusPolicy,
    pub focus_history_len: usize,
    pub max_updates_per_sec: u32,
    pub boundary_width: i32,
    pub dialog_ratio: f32,
    pub step_size: i32,
    pub cycle_skip_empty: bool,
    pub cancel_key: String,
    pub log_level: String,
    // NOTE: tables must come after every plain value, or the defaults cannot be written as TOML.
    pub tuning: LayoutTuning,
    pub quirk: Vec<QuirkConfig>,
    pub keybind: Vec<Keybind>,

    #[serde(skip)]
    quirk_rules: Vec<QuirkRule>,
    #[serde(skip)]
    keybinds: Vec<lattice_core::Keybind>,
    #[serde(skip)]
    mousemask: ModMask,
    /// Problems found while compiling the configuration, shown on the bar.
    #[serde(skip)]
    pub exceptions: Vec<String>,
}

/// Loads the configuration, falling back to the defaults when the file cannot be used.
#[must_use]
pub fn load() -> Config {
    load_from_file().unwrap_or_else(|err| {
        eprintln!("ERROR LOADING CONFIG: {err:?}");
        let mut config = Config::default();
        config.exceptions.push(format!("config: {err}"));
        config.compile();
        config
    })
}

/// # Errors
///
/// Function will throw an error if `BaseDirectories` doesn't exist, if user doesn't have
/// permissions to place config.toml, if config.toml cannot be read (access rights, malformed
/// file, etc.).
/// Function can also error from inability to save config.toml (if it is the first time running
/// lattice).
pub fn load_from_file() -> Result<Config> {
    let path = BaseDirectories::with_prefix("lattice")?;
    let config_filename = path.place_config_file("config.toml")?;
    load_from_path(&config_filename)
}

/// Reads and compiles the file at `path`, writing the defaults there first if it is missing.
///
/// # Errors
///
/// Fails if the file cannot be read or written, or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<Config> {
    tracing::debug!("Loading config file {}", path.display());
    let mut config = if path.exists() {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        tracing::debug!("Config file not found. Writing the defaults.");
        let config = Config::default();
        fs::write(path, toml::to_string(&config)?)?;
        config
    };
    config.compile();
    Ok(config)
}

impl Config {
    /// Resolves quirks, key bindings and the mouse modifier. Whatever cannot be used is
    /// skipped and reported in `exceptions`.
    pub fn compile(&mut self) {
        if self.workspace_limit == 0 || self.workspace_limit > MAX_WORKSPACES {
            let limit = self.workspace_limit.clamp(1, MAX_WORKSPACES);
            self.exceptions.push(format!(
                "workspace_limit {} is outside 1..={MAX_WORKSPACES}, using {limit}",
                self.workspace_limit
            ));
            self.workspace_limit = limit;
        }

        let limit = self.workspace_limit;
        let mut exceptions = vec![];
        self.quirk_rules = self
            .quirk
            .iter()
            .filter_map(|quirk| match quirk.to_rule(limit) {
                Ok(rule) => Some(rule),
                Err(err) => {
                    exceptions.push(format!("quirk {}:{}: {err}", quirk.class, quirk.instance));
                    None
                }
            })
            .collect();
        self.keybinds = self
            .keybind
            .iter()
            .filter_map(|keybind| match keybind.to_core(&self.modkey, limit) {
                Ok(core) => Some(core),
                Err(err) => {
                    tracing::error!("Invalid key binding: {}\n{:?}", err, keybind);
                    exceptions.push(format!("keybind {}: {err}", keybind.key));
                    None
                }
            })
            .collect();
        self.exceptions.append(&mut exceptions);

        let mousekey: Vec<String> = self
            .mousekey
            .clone()
            .unwrap_or_else(|| self.modkey.as_str().into())
            .into();
        let mousekey: Vec<String> = mousekey
            .into_iter()
            .map(|m| if m == "modkey" { self.modkey.clone() } else { m })
            .collect();
        self.mousemask = into_modmask(&mousekey);
    }
}

#[must_use]
pub fn is_program_in_path(program: &str) -> bool {
    if let Ok(path) = env::var("PATH") {
        for p in path.split(':') {
            let p_str = format!("{p}/{program}");
            if fs::metadata(p_str).is_ok() {
                return true;
            }
        }
    }
    false
}

/// Returns a terminal to set for the default mod+shift+enter keybind.
fn default_terminal<'s>() -> &'s str {
    // order from least common to most common.
    // the thinking is if a machine has an uncommon terminal installed, it is intentional
    let terms = &[
        "alacritty",
        "kitty",
        "urxvt",
        "st",
        "xterm",
        "gnome-terminal",
        "xfce4-terminal",
        "konsole",
    ];

    // If no terminal found in path, default to a good one
    terms
        .iter()
        .find(|terminal| is_program_in_path(terminal))
        .unwrap_or(&"xterm")
}

impl lattice_core::Config for Config {
    fn workspace_limit(&self) -> usize {
        self.workspace_limit
    }

    fn workspace_name(&self, idx: WorkspaceIndex) -> Option<String> {
        self.workspace_names
            .get(idx)
            .filter(|name| !name.is_empty())
            .cloned()
    }

    fn default_layout(&self) -> Layout {
        self.layout
    }

    fn default_tuning(&self) -> LayoutTuning {
        self.tuning
    }

    fn border_width(&self) -> i32 {
        self.border_width
    }

    fn focused_border_color(&self) -> String {
        self.focused_border_color.clone()
    }

    fn default_border_color(&self) -> String {
        self.default_border_color.clone()
    }

    fn urgent_border_color(&self) -> String {
        self.urgent_border_color.clone()
    }

    fn region_padding(&self) -> i32 {
        self.region_padding
    }

    fn bar_enabled(&self) -> bool {
        self.bar_enabled
    }

    fn bar_height(&self) -> i32 {
        self.bar_height
    }

    fn bar_position(&self) -> BarPosition {
        self.bar_position
    }

    fn bar_font(&self) -> String {
        self.bar_font.clone()
    }

    fn bar_color(&self) -> String {
        self.bar_color.clone()
    }

    fn bar_font_color(&self) -> String {
        self.bar_font_color.clone()
    }

    fn bar_delay(&self) -> u64 {
        self.bar_delay
    }

    fn focus_mode(&self) -> FocusMode {
        self.focus_mode
    }

    fn focus_close(&self) -> FocusClosePolicy {
        self.focus_close
    }

    fn focus_close_wrap(&self) -> bool {
        self.focus_close_wrap
    }

    fn focus_default_last(&self) -> bool {
        self.focus_default_last
    }

    fn unfocus_policy(&self) -> UnfocusPolicy {
        self.unfocus_policy
    }

    fn focus_history_len(&self) -> usize {
        self.focus_history_len
    }

    fn max_updates_per_sec(&self) -> u32 {
        self.max_updates_per_sec
    }

    fn boundary_width(&self) -> i32 {
        self.boundary_width
    }

    fn dialog_ratio(&self) -> f32 {
        self.dialog_ratio
    }

    fn step_size(&self) -> i32 {
        self.step_size
    }

    fn cycle_skip_empty(&self) -> bool {
        self.cycle_skip_empty
    }

    fn quirk_rules(&self) -> &[QuirkRule] {
        &self.quirk_rules
    }

    fn keybinds(&self) -> &[lattice_core::Keybind] {
        &self.keybinds
    }

    fn mousekey(&self) -> ModMask {
        self.mousemask
    }

    fn cancel_key(&self) -> &str {
        &self.cancel_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::Command;

    #[test]
    fn default_config_survives_a_toml_round_trip() {
        let config = Config::default();
        let toml = toml::to_string(&config);
        assert!(toml.is_ok(), "Could not serialize default config");

        let mut parsed: Config = toml::from_str(&toml.unwrap()).unwrap();
        parsed.compile();
        assert!(parsed.exceptions.is_empty(), "{:?}", parsed.exceptions);
        assert_eq!(parsed.keybind.len(), config.keybind.len());
        assert_eq!(parsed.quirk, config.quirk);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = load_from_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.workspace_limit, Config::default().workspace_limit);
        assert!(!lattice_core::Config::keybinds(&config).is_empty());
    }

    #[test]
    fn broken_entries_become_exceptions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
modkey = "Mod1"
workspace_limit = 4

[[quirk]]
class = "("
quirks = ["FLOAT"]

[[quirk]]
class = "Gimp"
quirks = ["FLOAT", "ANYWHERE"]
ws = 2

[[keybind]]
command = "SwitchWorkspace"
value = "9"
modifier = ["modkey"]
key = "9"

[[keybind]]
command = "Quit"
modifier = ["modkey", "Shift"]
key = "q"
"#,
        )
        .unwrap();
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.exceptions.len(), 2, "{:?}", config.exceptions);
        assert_eq!(lattice_core::Config::quirk_rules(&config).len(), 1);
        let keybinds = lattice_core::Config::keybinds(&config);
        assert_eq!(keybinds.len(), 1);
        assert_eq!(keybinds[0].modmask, ModMask::Mod1 | ModMask::Shift);
        assert_eq!(keybinds[0].command, Command::Quit);
        assert_eq!(lattice_core::Config::mousekey(&config), ModMask::Mod1);
    }

    #[test]
    fn workspace_limit_is_clamped() {
        let mut config = Config {
            workspace_limit: 40,
            ..Config::default()
        };
        config.compile();
        assert_eq!(config.workspace_limit, MAX_WORKSPACES);
        assert_eq!(config.exceptions.len(), 1);
    }

    #[test]
    fn unnamed_workspaces_have_no_name() {
        let config = Config {
            workspace_names: vec!["www".to_owned(), String::new()],
            ..Config::default()
        };
        assert_eq!(
            lattice_core::Config::workspace_name(&config, 0).as_deref(),
            Some("www")
        );
        assert_eq!(lattice_core::Config::workspace_name(&config, 1), None);
        assert_eq!(lattice_core::Config::workspace_name(&config, 5), None);
    }
}
