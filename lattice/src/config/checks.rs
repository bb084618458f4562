use super::Config;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

impl Config {
    pub fn check_mousekey(&self, verbose: bool) {
        if verbose {
            println!("Checking if mousekey is set.");
        }
        if let Some(mousekey) = &self.mousekey {
            if verbose {
                println!("Mousekey is set.");
            }
            if mousekey.is_empty() {
                println!("Your mousekey is set to nothing, this will cause windows to move/resize with just a mouse press.");
                return;
            }
            if verbose {
                println!("Mousekey is okay.");
            }
        }
    }

    pub fn check_log_level(&self, verbose: bool) {
        if verbose {
            println!("Trying to parse log_level.");
        }
        match EnvFilter::builder().parse(&self.log_level) {
            Ok(_) if verbose => println!("Log level is ok."),
            Ok(_) => {}
            Err(err) => println!("Log level is invalid: {err}"),
        }
    }

    /// Check all keybinds to ensure that required values are provided,
    /// that keys resolve with `key_is_valid` and that no combination is bound twice.
    /// Returns the number of problems found.
    pub fn check_keybinds(&self, verbose: bool, key_is_valid: impl Fn(&str) -> bool) -> usize {
        let mut returns = Vec::new();
        println!("\x1b[0;94m::\x1b[0m Checking keybinds . . .");
        let mut bindings = HashMap::new();
        for keybind in &self.keybind {
            if verbose {
                println!(
                    "Keybind: {:?} value field is empty: {}",
                    keybind,
                    keybind.value.is_empty()
                );
            }
            if let Err(err) = keybind.to_core(&self.modkey, self.workspace_limit) {
                returns.push((Some(keybind.clone()), err.to_string()));
            }
            if !key_is_valid(&keybind.key) {
                returns.push((
                    Some(keybind.clone()),
                    format!("Key `{}` is not valid", keybind.key),
                ));
            }

            let mut modkey = keybind.modifier.clone().unwrap_or_else(|| "None".into());
            modkey.sort_unstable();
            if let Some(conflict) = bindings.insert((modkey.clone(), &keybind.key), keybind.command) {
                returns.push((
                    None,
                    format!(
                        "\x1b[0m\x1b[1mMultiple commands bound to key combination {} + {}:\
                    \n\x1b[1;91m    -> {:?}\
                    \n    -> {:?}\
                    \n\x1b[0mHelp: change one of the keybindings to something else.\n",
                        modkey, keybind.key, conflict, keybind.command,
                    ),
                ));
            }
        }
        if returns.is_empty() {
            println!("\x1b[0;92m    -> All keybinds OK\x1b[0m");
        } else {
            for error in &returns {
                match &error.0 {
                    Some(binding) => {
                        println!(
                            "\x1b[1;91mERROR: {} for keybind {binding:?}\x1b[0m",
                            error.1
                        );
                    }
                    None => {
                        println!("\x1b[1;91mERROR: {} \x1b[0m", error.1);
                    }
                }
            }
        }
        returns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{BaseCommand, Keybind};
    use super::*;

    #[test]
    fn default_keybinds_pass() {
        let config = Config::default();
        assert_eq!(config.check_keybinds(false, |_| true), 0);
    }

    #[test]
    fn duplicate_combination_is_reported() {
        let config = Config {
            keybind: vec![
                Keybind::new(&["modkey"], "q", BaseCommand::Quit, ""),
                Keybind::new(&["modkey"], "q", BaseCommand::Restart, ""),
            ],
            ..Config::default()
        };
        assert_eq!(config.check_keybinds(false, |_| true), 1);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let config = Config {
            keybind: vec![Keybind::new(&["modkey"], "NoSuchKey", BaseCommand::Quit, "")],
            ..Config::default()
        };
        assert_eq!(config.check_keybinds(false, |key| key != "NoSuchKey"), 1);
    }
}
