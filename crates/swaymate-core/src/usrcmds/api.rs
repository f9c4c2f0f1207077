//! Capability handle user commands are invoked with.

use crate::tracker::{Tracker, TrackerError, WindowRecord};
use crate::wm::Node;

/// Tracker and window-manager operations exposed to user commands and event
/// listeners. Object-safe so commands take `&mut dyn DaemonApi` and tests can
/// substitute the whole surface.
pub trait DaemonApi {
    fn focused_window(&self) -> Option<WindowRecord>;
    fn prev_window(&self) -> Option<WindowRecord>;
    fn list_windows(&self) -> Vec<WindowRecord>;
    fn list_spaces(&self, skip_outputs: &[String]) -> Result<Vec<String>, TrackerError>;
    fn win_tree_path(&self, id: i64) -> Result<Vec<Node>, TrackerError>;
    fn wm_command(&self, cmd: &str) -> Result<(), TrackerError>;
    fn wm_commands(&self, cmds: &[String]) -> Result<(), TrackerError>;
    fn focus_window(&self, id: i64) -> Result<(), TrackerError>;
    fn move_win_to_space(&mut self, id: i64, space: &str) -> Result<(), TrackerError>;
    fn move_win_to_space_num(&mut self, id: i64, num: i32) -> Result<(), TrackerError>;
    fn move_space_to_output(&mut self, space: &str, output: &str) -> Result<(), TrackerError>;
    fn refocus_window(&mut self, refocus: &WindowRecord) -> Result<(), TrackerError>;
    fn mouse_to_output(&mut self, output: &str) -> Result<(), TrackerError>;

    /// Case-insensitive substring match on the record's application id.
    fn win_match_app(&self, win: &WindowRecord, pattern: &str) -> bool {
        win.app.to_lowercase().contains(&pattern.to_lowercase())
    }

    /// Case-insensitive substring match on the record's title.
    fn win_match_title(&self, win: &WindowRecord, pattern: &str) -> bool {
        win.title.to_lowercase().contains(&pattern.to_lowercase())
    }
}

impl DaemonApi for Tracker {
    fn focused_window(&self) -> Option<WindowRecord> {
        self.focused().cloned()
    }

    fn prev_window(&self) -> Option<WindowRecord> {
        self.previous().cloned()
    }

    fn list_windows(&self) -> Vec<WindowRecord> {
        self.records()
    }

    fn list_spaces(&self, skip_outputs: &[String]) -> Result<Vec<String>, TrackerError> {
        Ok(Tracker::list_spaces(self, skip_outputs)?)
    }

    fn win_tree_path(&self, id: i64) -> Result<Vec<Node>, TrackerError> {
        Ok(Tracker::win_tree_path(self, id)?)
    }

    fn wm_command(&self, cmd: &str) -> Result<(), TrackerError> {
        Ok(self.wm().run_command(cmd)?)
    }

    fn wm_commands(&self, cmds: &[String]) -> Result<(), TrackerError> {
        Ok(self.wm().run_commands(cmds)?)
    }

    fn focus_window(&self, id: i64) -> Result<(), TrackerError> {
        Ok(Tracker::focus_window(self, id)?)
    }

    fn move_win_to_space(&mut self, id: i64, space: &str) -> Result<(), TrackerError> {
        Tracker::move_win_to_space(self, id, space)
    }

    fn move_win_to_space_num(&mut self, id: i64, num: i32) -> Result<(), TrackerError> {
        Tracker::move_win_to_space_num(self, id, num)
    }

    fn move_space_to_output(&mut self, space: &str, output: &str) -> Result<(), TrackerError> {
        Tracker::move_space_to_output(self, space, output)
    }

    fn refocus_window(&mut self, refocus: &WindowRecord) -> Result<(), TrackerError> {
        Tracker::refocus_window(self, refocus)
    }

    fn mouse_to_output(&mut self, output: &str) -> Result<(), TrackerError> {
        Ok(Tracker::mouse_to_output(self, output)?)
    }
}
