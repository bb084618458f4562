use tracing::metadata::LevelFilter;
use tracing_subscriber::{filter::ParseError, layer::SubscriberExt, EnvFilter, Layer};

#[cfg(feature = "file-log")]
pub mod file;

/// Keeps the background log writers alive. Drop it last.
#[must_use]
#[derive(Default)]
pub struct LogGuard {
    #[cfg(feature = "file-log")]
    _file: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Builds the filter for `level_regex`, falling back to `debug` when it does not parse.
pub fn parse_log_level(level_regex: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse(level_regex)
    {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("debug"), Some(err)),
    }
}

/// Installs the global subscriber: stderr, plus the log file with the `file-log` feature.
/// Returns the guard and, if `level_regex` was unusable, a message for the bar.
pub fn setup_logging(level_regex: &str) -> (LogGuard, Option<String>) {
    let (filter, parse_err) = parse_log_level(level_regex);
    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .boxed();
    let subscriber = tracing_subscriber::registry().with(filter).with(stderr);

    #[cfg(feature = "file-log")]
    let (subscriber, guard) = {
        let (layer, guard) = file::layer();
        (subscriber.with(layer), LogGuard { _file: guard })
    };
    #[cfg(not(feature = "file-log"))]
    let guard = LogGuard::default();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Couldn't setup global subscriber (logger): {err}");
    }
    let exception = parse_err.map(|err| format!("log_level {level_regex:?}: {err}"));
    (guard, exception)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back_to_debug() {
        let (filter, err) = parse_log_level("lattice=loud");
        assert!(err.is_some());
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn valid_level_parses() {
        let (_, err) = parse_log_level("lattice_core=trace,info");
        assert!(err.is_none());
    }
}
