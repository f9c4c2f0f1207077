use serde::{Deserialize, Serialize};

/// Client -> Daemon request messages.
///
/// Each variant maps to a JSONL message with `"type"` as the tag field.
/// All requests carry an `id` field for response correlation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Tracked window ids in MRU order.
    #[serde(rename = "window_ids")]
    WindowIds { id: String },

    /// Formatted rows for all tracked windows.
    #[serde(rename = "switcher_list")]
    SwitcherList { id: String },

    /// Formatted rows excluding the focused window's workspace.
    #[serde(rename = "pick_window_list")]
    PickWindowList { id: String },

    /// Workspace names excluding the focused window's output.
    #[serde(rename = "pick_workspace_list")]
    PickWorkspaceList { id: String },

    /// Ask for the exclusive picker slot.
    #[serde(rename = "should_open")]
    ShouldOpen { id: String, pid: u32 },

    #[serde(rename = "focus_window")]
    FocusWindow { id: String, window_id: i64 },

    /// Move a window to the focused workspace and focus it.
    #[serde(rename = "move_window_to_workspace")]
    MoveWindowToWorkspace { id: String, window_id: i64 },

    /// Move the focused window to the workspace with this number prefix.
    #[serde(rename = "move_window_to_workspace_num")]
    MoveWindowToWorkspaceNum { id: String, workspace_num: i32 },

    /// Move a named workspace to the focused window's output.
    #[serde(rename = "move_workspace_to_output")]
    MoveWorkspaceToOutput { id: String, workspace: String },

    #[serde(rename = "set_config")]
    SetConfig {
        id: String,
        mouse_follows_focus: bool,
    },

    /// Deduplicated executable names; blocks until the index is warm.
    #[serde(rename = "path_files")]
    PathFiles { id: String },

    /// Launch an indexed executable through the window manager.
    #[serde(rename = "execute_path")]
    ExecutePath { id: String, exe_path: String },

    #[serde(rename = "run_user_command")]
    RunUserCommand {
        id: String,
        name: String,
        #[serde(default)]
        args: String,
    },

    #[serde(rename = "daemon_stop")]
    DaemonStop { id: String },

    #[serde(rename = "ping")]
    Ping { id: String },
}

/// Daemon -> Client response messages.
///
/// Each variant maps to a JSONL message with `"type"` as the tag field,
/// echoing the request `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DaemonMessage {
    #[serde(rename = "window_ids")]
    WindowIds { id: String, window_ids: Vec<i64> },

    #[serde(rename = "listing")]
    Listing { id: String, rows: Vec<String> },

    #[serde(rename = "should_open_result")]
    ShouldOpenResult { id: String, should_open: bool },

    #[serde(rename = "path_files")]
    PathFiles { id: String, files: Vec<String> },

    #[serde(rename = "command_output")]
    CommandOutput { id: String, output: String },

    #[serde(rename = "error")]
    Error {
        id: String,
        code: String,
        message: String,
    },

    #[serde(rename = "ack")]
    Ack { id: String },
}

impl ClientMessage {
    /// Extract the request ID from any client message.
    pub fn id(&self) -> &str {
        match self {
            ClientMessage::WindowIds { id, .. }
            | ClientMessage::SwitcherList { id, .. }
            | ClientMessage::PickWindowList { id, .. }
            | ClientMessage::PickWorkspaceList { id, .. }
            | ClientMessage::ShouldOpen { id, .. }
            | ClientMessage::FocusWindow { id, .. }
            | ClientMessage::MoveWindowToWorkspace { id, .. }
            | ClientMessage::MoveWindowToWorkspaceNum { id, .. }
            | ClientMessage::MoveWorkspaceToOutput { id, .. }
            | ClientMessage::SetConfig { id, .. }
            | ClientMessage::PathFiles { id, .. }
            | ClientMessage::ExecutePath { id, .. }
            | ClientMessage::RunUserCommand { id, .. }
            | ClientMessage::DaemonStop { id, .. }
            | ClientMessage::Ping { id, .. } => id,
        }
    }
}
