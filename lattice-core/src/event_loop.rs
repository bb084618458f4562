use crate::config::Config;
use crate::models::{Manager, Mode, Window};
use crate::utils::signals::{self, SignalEvent};
use crate::DisplayServer;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Why the event loop returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    /// Reload the configuration and start over.
    Restart,
    /// The model cannot go on, e.g. a screen has more outputs than workspaces.
    Fatal(String),
}

impl<C: Config, SERVER: DisplayServer> Manager<C, SERVER> {
    /// Runs until a command, a signal or a fatal error asks to stop.
    pub async fn start_event_loop(mut self) -> ExitReason {
        let mut signals = signals::forward_signals()
            .map_err(|err| tracing::error!("Could not listen for signals: {err}"))
            .ok();
        let mut bar_tick = interval(Duration::from_millis(self.state.config.bar_delay().max(100)));
        bar_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let initial = self.display_server.get_next_events();
        self.events.extend(initial);

        loop {
            self.process_queue();
            if let Some(reason) = self.exit.take() {
                tracing::info!("Leaving the event loop: {reason:?}");
                return reason;
            }
            self.display_server.flush();

            tokio::select! {
                () = self.display_server.wait_readable() => {
                    let events = self.display_server.get_next_events();
                    self.events.extend(events);
                }
                Some(signal) = next_signal(&mut signals) => self.signal_handler(signal),
                _ = bar_tick.tick() => self.state.update_bars(),
            }
        }
    }

    /// Dispatches events until the queue is empty, refreshing the display in between.
    pub(crate) fn process_queue(&mut self) {
        loop {
            while self.dispatch_next() {}
            self.refresh();
            self.execute_actions();
            if self.events.is_empty() {
                break;
            }
        }
    }

    /// Dispatches the event at the head of the queue. Returns false when there was none.
    pub(crate) fn dispatch_next(&mut self) -> bool {
        let Some(event) = self.events.pop_front() else {
            return false;
        };
        tracing::trace!("dispatching {event:?}");
        let was_modal = !self.state.mode.is_normal();
        self.display_event_handler(event);
        self.state.revalidate_mode();
        if was_modal && self.state.mode.is_normal() {
            let dropped = self.events.drain_buttons();
            if dropped > 0 {
                tracing::trace!("dropped {dropped} queued button events");
            }
        }
        self.execute_actions();
        true
    }

    /// Brings geometry, stacking and bars in line with the model.
    pub(crate) fn refresh(&mut self) {
        self.state.arrange_all();
        self.state.restack_all();
        self.state.update_bars();

        let windows: Vec<&Window> = match &self.state.mode {
            // While tracking only the manipulated window changes.
            Mode::Tracking(m) => self.state.windows.get(m.window).into_iter().collect(),
            _ => self.state.windows.iter().collect(),
        };
        self.display_server.update_windows(windows);
    }

    fn signal_handler(&mut self, signal: SignalEvent) {
        match signal {
            SignalEvent::ChildExited => {
                let reaped = self.children.reap();
                tracing::trace!("reaped {reaped:?}");
            }
            SignalEvent::Restart => self.exit = Some(ExitReason::Restart),
            SignalEvent::Quit => self.exit = Some(ExitReason::Quit),
        }
    }
}

async fn next_signal(signals: &mut Option<UnboundedReceiver<SignalEvent>>) -> Option<SignalEvent> {
    match signals {
        Some(rx) => rx.recv().await,
        None => futures::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::display_servers::MockDisplayServer;
    use crate::models::{WindowHandle, Xyhw};
    use crate::{Command, DisplayEvent};

    const SCREEN: Xyhw = Xyhw::new(0, 0, 1000, 1000);

    #[tokio::test]
    async fn quit_command_ends_the_loop() {
        let mut manager: Manager<TestConfig, MockDisplayServer> = Manager::new_test(TestConfig::default());
        manager.display_server.pending = vec![
            DisplayEvent::ScreenCreate(WindowHandle(1), SCREEN),
            DisplayEvent::SendCommand(Command::Quit),
        ];
        assert_eq!(manager.start_event_loop().await, ExitReason::Quit);
    }

    #[test]
    fn refresh_maps_windows_of_visible_workspaces_only() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        let a = manager.manage_test_window(1);
        let b = manager.manage_test_window(2);
        manager.state.move_window_to_workspace(b, 1);
        manager.process_queue();
        assert!(manager.state.windows.get(a).unwrap().mapped);
        assert!(!manager.state.windows.get(b).unwrap().mapped);
    }

    #[test]
    fn restart_signal_requests_an_exit() {
        let mut manager = Manager::new_test_with_outputs(vec![SCREEN]);
        manager.signal_handler(SignalEvent::Restart);
        assert_eq!(manager.exit, Some(ExitReason::Restart));
    }
}
