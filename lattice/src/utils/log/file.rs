use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;
use xdg::BaseDirectories;

const LOG_FILE_NAME: &str = "lattice.log";

/// A layer writing to `$XDG_CACHE_HOME/lattice/lattice.log`. Without a usable cache directory
/// there is no layer and no guard.
pub fn layer<S>() -> (Option<Box<dyn Layer<S> + Send + Sync>>, Option<WorkerGuard>)
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let dir = match BaseDirectories::with_prefix("lattice")
        .map_err(|err| err.to_string())
        .and_then(|base| base.create_cache_directory("").map_err(|err| err.to_string()))
    {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Couldn't create log directory: {err}");
            return (None, None);
        }
    };

    let writer = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking)
        .boxed();
    (Some(layer), Some(guard))
}
