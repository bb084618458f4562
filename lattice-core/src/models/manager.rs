use crate::config::Config;
use crate::display_servers::DisplayServer;
use crate::event_loop::ExitReason;
use crate::event_queue::EventQueue;
use crate::state::State;
use crate::utils::child_process::Children;

/// Maintains current program state.
#[derive(Debug)]
pub struct Manager<C, SERVER> {
    pub state: State<C>,
    pub display_server: SERVER,
    pub events: EventQueue,

    pub(crate) children: Children,
    pub(crate) exit: Option<ExitReason>,
}

impl<C, SERVER> Manager<C, SERVER>
where
    C: Config,
    SERVER: DisplayServer,
{
    pub fn new(config: C) -> Self {
        let display_server = SERVER::new(&config);

        Self {
            state: State::new(config),
            display_server,
            events: EventQueue::new(),
            children: Children::default(),
            exit: None,
        }
    }

    /// Problems found while loading the configuration. They are shown on the bar.
    pub fn add_startup_exceptions(&mut self, exceptions: impl IntoIterator<Item = String>) {
        self.state.startup_exceptions.extend(exceptions);
    }

    /// Executes every queued action, feeding the events they produce back into the queue.
    pub(crate) fn execute_actions(&mut self) {
        while let Some(act) = self.state.actions.pop_front() {
            if let Some(event) = self.display_server.execute_action(act) {
                self.events.push_back(event);
            }
        }
    }
}

#[cfg(test)]
use crate::{
    config::TestConfig,
    display_servers::MockDisplayServer,
    models::{WindowHandle, WindowId, WindowInfo, Xyhw},
    DisplayEvent,
};

#[cfg(test)]
impl Manager<TestConfig, MockDisplayServer> {
    pub fn new_test(config: TestConfig) -> Self {
        Self::new(config)
    }

    /// A manager with one screen covering `outputs`, one region per output.
    pub fn new_test_with_outputs(outputs: Vec<Xyhw>) -> Self {
        Self::new_test_with_config(TestConfig::default(), outputs)
    }

    pub fn new_test_with_config(config: TestConfig, outputs: Vec<Xyhw>) -> Self {
        let mut manager = Self::new_test(config);
        let max_x = outputs.iter().map(Xyhw::max_x).max().unwrap_or(1);
        let max_y = outputs.iter().map(Xyhw::max_y).max().unwrap_or(1);
        manager.events.push_back(DisplayEvent::ScreenCreate(
            WindowHandle(1),
            Xyhw::new(0, 0, max_x, max_y),
        ));
        let outputs = outputs
            .into_iter()
            .map(|g| (g, crate::models::Rotation::Normal))
            .collect();
        manager
            .events
            .push_back(DisplayEvent::OutputsChanged(0, outputs));
        manager.run_pending();
        manager
    }

    /// Manages a plain tiled window with the given handle.
    pub fn manage_test_window(&mut self, handle: u64) -> WindowId {
        self.state
            .manage(
                WindowInfo {
                    handle: WindowHandle(handle),
                    ..WindowInfo::default()
                },
                0,
                0,
            )
            .unwrap()
    }

    /// Dispatches queued events until nothing is left, the way the event loop does.
    pub fn run_pending(&mut self) {
        self.process_queue();
    }

    /// Dispatches one event through the full pipeline.
    pub fn feed(&mut self, event: DisplayEvent) {
        self.events.push_back(event);
        self.run_pending();
    }
}
