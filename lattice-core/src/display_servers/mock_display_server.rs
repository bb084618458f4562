use super::Config;
use super::DisplayAction;
use super::DisplayEvent;
use super::DisplayServer;
use crate::models::WindowHandle;

/// Records every action and answers grabs the way a real server would.
#[derive(Debug, Default)]
pub struct MockDisplayServer {
    pub executed: Vec<DisplayAction>,
    /// Events handed out by the next `get_next_events`.
    pub pending: Vec<DisplayEvent>,
    pub refuse_grabs: bool,
    next_region_window: u64,
}

impl DisplayServer for MockDisplayServer {
    fn new(_: &impl Config) -> Self {
        Self {
            next_region_window: 10_000,
            ..Self::default()
        }
    }

    fn get_next_events(&mut self) -> Vec<DisplayEvent> {
        std::mem::take(&mut self.pending)
    }

    fn execute_action(&mut self, act: DisplayAction) -> Option<DisplayEvent> {
        let reply = match &act {
            DisplayAction::BeginGrab(handle, _) => Some(if self.refuse_grabs {
                DisplayEvent::GrabFailed(*handle)
            } else {
                DisplayEvent::GrabAcquired(*handle)
            }),
            DisplayAction::CreateRegionWindows { region, bar, .. } => {
                self.next_region_window += 2;
                Some(DisplayEvent::RegionWindowsCreated {
                    region: *region,
                    sink: WindowHandle(self.next_region_window),
                    bar: bar.map(|_| WindowHandle(self.next_region_window + 1)),
                })
            }
            _ => None,
        };
        self.executed.push(act);
        reply
    }

    fn wait_readable(&self) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()>>> {
        Box::pin(futures::future::pending())
    }

    fn flush(&self) {}
}
