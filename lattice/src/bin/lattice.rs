use lattice_core::{ExitReason, Manager};
use std::process::ExitCode;
use xlib_display_server::XlibDisplayServer;

fn main() -> ExitCode {
    let mut config = lattice::load();
    let (_log_guard, log_exception) = lattice::utils::log::setup_logging(&config.log_level);
    tracing::info!(
        "lattice {} ({}) booting...",
        env!("CARGO_PKG_VERSION"),
        git_version::git_version!(fallback = option_env!("GIT_HASH").unwrap_or("NONE"))
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            tracing::error!("Couldn't init Tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    // The display server spawns its socket watcher on this runtime.
    let _rt_guard = rt.enter();

    loop {
        let mut exceptions = std::mem::take(&mut config.exceptions);
        exceptions.extend(log_exception.clone());
        for exception in &exceptions {
            tracing::warn!("{exception}");
        }

        let mut manager = Manager::<lattice::Config, XlibDisplayServer>::new(config);
        manager.add_startup_exceptions(exceptions);

        match rt.block_on(manager.start_event_loop()) {
            ExitReason::Restart => {
                tracing::info!("Restarting");
                config = lattice::load();
            }
            ExitReason::Quit => {
                tracing::info!("Completed");
                return ExitCode::SUCCESS;
            }
            ExitReason::Fatal(err) => {
                tracing::error!("Completed with error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}
