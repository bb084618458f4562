use crate::config::Config;
use crate::layouts::Layout;
use crate::models::{WindowHandle, WorkspaceIndex};
use crate::state::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a region's bar shows.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BarStatus {
    pub workspace: WorkspaceIndex,
    pub workspace_name: String,
    pub layout: String,
    pub windows: usize,
    pub title: Option<String>,
    /// Workspaces, other than this one, holding a window that demands attention.
    pub urgent: Vec<String>,
    pub exceptions: Vec<String>,
}

impl fmt::Display for BarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.workspace_name, self.layout, self.windows)?;
        if !self.urgent.is_empty() {
            write!(f, " !{}", self.urgent.join(","))?;
        }
        if let Some(title) = &self.title {
            write!(f, "  {title}")?;
        }
        if !self.exceptions.is_empty() {
            write!(f, "  [config: {}]", self.exceptions.join("; "))?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ManagerState {
    pub window_title: Option<String>,
    pub screens: Vec<ScreenState>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScreenState {
    pub index: usize,
    pub regions: Vec<Viewport>,
    pub workspaces: Vec<WorkspaceState>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub workspace: Option<WorkspaceIndex>,
    pub focused: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkspaceState {
    pub index: WorkspaceIndex,
    pub name: String,
    pub layout: Layout,
    pub visible: bool,
    pub windows: Vec<ClientState>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientState {
    pub handle: WindowHandle,
    pub name: Option<String>,
    pub class: Option<String>,
    pub floating: bool,
    pub hidden: bool,
    pub focused: bool,
}

impl<C: Config> From<&State<C>> for ManagerState {
    fn from(state: &State<C>) -> Self {
        let focused = state.focused_window();
        let screens = state
            .screens
            .iter()
            .map(|screen| ScreenState {
                index: screen.idx,
                regions: screen
                    .regions
                    .iter()
                    .filter_map(|r| state.regions.get(*r))
                    .map(|r| Viewport {
                        x: r.g.x(),
                        y: r.g.y(),
                        w: r.g.w(),
                        h: r.g.h(),
                        workspace: r.workspace,
                        focused: state.focused_region == Some(r.id),
                    })
                    .collect(),
                workspaces: screen
                    .workspaces()
                    .map(|ws| WorkspaceState {
                        index: ws.idx,
                        name: ws.display_name(),
                        layout: ws.layout,
                        visible: ws.is_visible(),
                        windows: ws
                            .windows
                            .iter()
                            .filter_map(|id| state.windows.get(*id))
                            .map(|w| ClientState {
                                handle: w.handle,
                                name: w.name.clone(),
                                class: w.class.clone(),
                                floating: w.is_floating(),
                                hidden: w.is_hidden(),
                                focused: focused == Some(w.id),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            window_title: focused
                .and_then(|id| state.windows.get(id))
                .and_then(|w| w.name.clone()),
            screens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_text_lists_urgent_workspaces_and_exceptions() {
        let status = BarStatus {
            workspace: 0,
            workspace_name: "1".to_owned(),
            layout: "[|]".to_owned(),
            windows: 2,
            title: Some("term".to_owned()),
            urgent: vec!["3".to_owned()],
            exceptions: vec!["unknown key foo".to_owned()],
        };
        assert_eq!(
            status.to_string(),
            "1 [|] (2) !3  term  [config: unknown key foo]"
        );
    }
}
