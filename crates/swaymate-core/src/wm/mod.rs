//! Window-manager client boundary.
//!
//! The IPC transport itself is an external collaborator; the daemon consumes
//! it through [`WmClient`]. The production implementation shells out to
//! `swaymsg`, tests substitute a mock.

mod errors;
pub mod sway;
mod types;

pub use errors::WmError;
pub use types::{Node, Rect, WindowChange, WindowEvent, WindowProperties, WorkspaceInfo};

/// Capability handle for the window manager: tree snapshots, command
/// execution and workspace listing. Event subscription is a separate
/// concern (see [`sway::subscribe_window_events`]).
pub trait WmClient: Send + Sync {
    /// Fetch the full layout tree.
    fn get_tree(&self) -> Result<Node, WmError>;

    /// Run an arbitrary window-manager command.
    fn run_command(&self, cmd: &str) -> Result<(), WmError>;

    /// List workspaces with their outputs and focus state.
    fn list_workspaces(&self) -> Result<Vec<WorkspaceInfo>, WmError>;

    /// Run several commands in order, stopping at the first failure.
    fn run_commands(&self, cmds: &[String]) -> Result<(), WmError> {
        for cmd in cmds {
            self.run_command(cmd)?;
        }
        Ok(())
    }
}
