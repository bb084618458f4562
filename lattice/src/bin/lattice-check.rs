use anyhow::{bail, Result};
use clap::{arg, command};
use std::path::PathBuf;

fn main() -> Result<()> {
    let matches = command!("lattice-check")
        .about("Checks syntax of the configuration file")
        .help_template(lattice::utils::get_help_template())
        .args(&[
            arg!(-v --verbose "Outputs received configuration file."),
            arg!([INPUT] "Sets the input file to use. Uses $XDG_CONFIG_HOME/lattice/config.toml otherwise."),
        ])
        .get_matches();

    let config_file = matches.get_one::<String>("INPUT").map(PathBuf::from);
    let verbose = matches.get_flag("verbose");

    println!(
        "\x1b[0;94m::\x1b[0m lattice version: {}",
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "\x1b[0;94m::\x1b[0m lattice git hash: {}",
        git_version::git_version!(fallback = option_env!("GIT_HASH").unwrap_or("NONE"))
    );

    println!("\x1b[0;94m::\x1b[0m Loading configuration . . .");
    let config = match config_file {
        Some(path) if !path.exists() => bail!("{} does not exist", path.display()),
        Some(path) => lattice::load_from_path(&path)?,
        None => lattice::load_from_file()?,
    };
    println!("\x1b[0;92m    -> Configuration loaded OK \x1b[0m");
    if verbose {
        dbg!(&config);
    }

    config.check_mousekey(verbose);
    config.check_log_level(verbose);
    let mut problems = config.check_keybinds(verbose, xlib_display_server::is_valid_keysym);

    println!("\x1b[0;94m::\x1b[0m Checking quirks and workspaces . . .");
    if config.exceptions.is_empty() {
        println!("\x1b[0;92m    -> All quirks OK\x1b[0m");
    } else {
        for exception in &config.exceptions {
            println!("\x1b[1;91mERROR: {exception}\x1b[0m");
        }
        problems += config.exceptions.len();
    }

    println!("\x1b[0;94m::\x1b[0m Checking environment . . .");
    match std::env::var("XDG_RUNTIME_DIR") {
        Ok(val) => {
            if verbose {
                println!(":: XDG_RUNTIME_DIR: {val}");
            }
            println!("\x1b[0;92m    -> Environment OK \x1b[0m");
        }
        Err(_) => println!(
            "\x1b[1;93mWARN: XDG_RUNTIME_DIR is not set, DumpState will have nowhere to write.\x1b[0m"
        ),
    }

    if problems > 0 {
        bail!("found {problems} problem(s) in the configuration");
    }
    Ok(())
}
