//! Turns process signals into events the main loop can wait on.
use signal_hook::consts::signal::{SIGCHLD, SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// One or more children exited and can be reaped.
    ChildExited,
    Restart,
    Quit,
}

impl SignalEvent {
    #[must_use]
    pub const fn from_signal(signal: i32) -> Option<Self> {
        match signal {
            SIGCHLD => Some(Self::ChildExited),
            SIGHUP => Some(Self::Restart),
            SIGINT | SIGTERM => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Starts a thread that forwards `SIGCHLD`, `SIGHUP`, `SIGINT` and `SIGTERM` into a channel.
///
/// # Errors
///
/// Fails if the signal handlers cannot be registered.
pub fn forward_signals() -> std::io::Result<UnboundedReceiver<SignalEvent>> {
    let mut signals = Signals::new([SIGCHLD, SIGHUP, SIGINT, SIGTERM])?;
    let (tx, rx) = unbounded_channel();
    std::thread::Builder::new()
        .name("signals".to_owned())
        .spawn(move || {
            for signal in signals.forever() {
                let Some(event) = SignalEvent::from_signal(signal) else {
                    continue;
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hangup_restarts_and_terminate_quits() {
        assert_eq!(SignalEvent::from_signal(SIGHUP), Some(SignalEvent::Restart));
        assert_eq!(SignalEvent::from_signal(SIGTERM), Some(SignalEvent::Quit));
        assert_eq!(SignalEvent::from_signal(SIGCHLD), Some(SignalEvent::ChildExited));
        assert_eq!(SignalEvent::from_signal(0), None);
    }
}
