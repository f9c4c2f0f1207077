//! Built-in user commands.

use std::collections::HashMap;

use crate::usrcmds::api::DaemonApi;
use crate::usrcmds::errors::UsrCmdError;

/// Cycle the width of the focused window's top-most split parent between
/// 10, 50 and 90 percent of the workspace width. Returns the target width.
pub fn resize_toggle(
    api: &mut dyn DaemonApi,
    _args: &HashMap<String, String>,
) -> Result<String, UsrCmdError> {
    let focused = api.focused_window().ok_or(UsrCmdError::NoFocusedWindow)?;
    let path = api.win_tree_path(focused.id)?;
    if path.len() < 2 {
        return Err(UsrCmdError::CommandFailed {
            message: format!("window {} has no split parent", focused.id),
        });
    }

    let space = &path[0];
    // skip full-width wrappers down to the first real split
    let mut split = &path[1];
    let mut i = 2;
    while split.rect.width == space.rect.width && i < path.len() {
        split = &path[i];
        i += 1;
    }

    let half_width = space.rect.width / 2;
    let target_width = (0.9 * space.rect.width as f32) as i32;
    let ppt = if split.rect.width == half_width {
        "90ppt"
    } else if split.rect.width < target_width {
        "50ppt"
    } else {
        "10ppt"
    };

    api.wm_command(&format!("[con_id={}] resize set width {ppt}", split.id))?;
    Ok(ppt.to_string())
}

/// Toggle the focused window's titlebar between `normal` and `none`.
pub fn titlebar_toggle(
    api: &mut dyn DaemonApi,
    _args: &HashMap<String, String>,
) -> Result<String, UsrCmdError> {
    let focused = api.focused_window().ok_or(UsrCmdError::NoFocusedWindow)?;
    let path = api.win_tree_path(focused.id)?;
    let win = path.last().ok_or_else(|| UsrCmdError::CommandFailed {
        message: format!("window {} not in the current tree", focused.id),
    })?;

    let border = if win.border.as_deref() == Some("normal") {
        "none"
    } else {
        "normal"
    };
    api.wm_command(&format!("border {border}"))?;
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{TrackerError, WindowRecord};
    use crate::wm::{Node, Rect};
    use std::sync::{Arc, Mutex};

    /// Api stub with a fixed tree path and command log.
    struct PathApi {
        focused: Option<WindowRecord>,
        path: Vec<Node>,
        commands: Arc<Mutex<Vec<String>>>,
    }

    impl PathApi {
        fn new(path: Vec<Node>) -> Self {
            Self {
                focused: Some(WindowRecord {
                    id: 42,
                    ..WindowRecord::default()
                }),
                path,
                commands: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn last_command(&self) -> String {
            self.commands.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl DaemonApi for PathApi {
        fn focused_window(&self) -> Option<WindowRecord> {
            self.focused.clone()
        }
        fn prev_window(&self) -> Option<WindowRecord> {
            None
        }
        fn list_windows(&self) -> Vec<WindowRecord> {
            Vec::new()
        }
        fn list_spaces(&self, _skip: &[String]) -> Result<Vec<String>, TrackerError> {
            Ok(Vec::new())
        }
        fn win_tree_path(&self, _id: i64) -> Result<Vec<Node>, TrackerError> {
            Ok(self.path.clone())
        }
        fn wm_command(&self, cmd: &str) -> Result<(), TrackerError> {
            self.commands.lock().unwrap().push(cmd.to_string());
            Ok(())
        }
        fn wm_commands(&self, _cmds: &[String]) -> Result<(), TrackerError> {
            Ok(())
        }
        fn focus_window(&self, _id: i64) -> Result<(), TrackerError> {
            Ok(())
        }
        fn move_win_to_space(&mut self, _id: i64, _space: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        fn move_win_to_space_num(&mut self, _id: i64, _num: i32) -> Result<(), TrackerError> {
            Ok(())
        }
        fn move_space_to_output(&mut self, _space: &str, _output: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        fn refocus_window(&mut self, _refocus: &WindowRecord) -> Result<(), TrackerError> {
            Ok(())
        }
        fn mouse_to_output(&mut self, _output: &str) -> Result<(), TrackerError> {
            Ok(())
        }
    }

    fn node(id: i64, width: i32, border: Option<&str>) -> Node {
        Node {
            id,
            border: border.map(str::to_string),
            rect: Rect {
                x: 0,
                y: 0,
                width,
                height: 1080,
            },
            ..Node::default()
        }
    }

    #[test]
    fn test_resize_toggle_half_width_goes_to_90ppt() {
        let mut api = PathApi::new(vec![node(1, 1920, None), node(2, 960, None), node(42, 960, None)]);
        let out = resize_toggle(&mut api, &HashMap::new()).unwrap();
        assert_eq!(out, "90ppt");
        assert_eq!(api.last_command(), "[con_id=2] resize set width 90ppt");
    }

    #[test]
    fn test_resize_toggle_narrow_goes_to_50ppt() {
        let mut api = PathApi::new(vec![node(1, 1920, None), node(2, 192, None), node(42, 192, None)]);
        let out = resize_toggle(&mut api, &HashMap::new()).unwrap();
        assert_eq!(out, "50ppt");
    }

    #[test]
    fn test_resize_toggle_wide_goes_to_10ppt() {
        let mut api = PathApi::new(vec![node(1, 1920, None), node(2, 1800, None), node(42, 1800, None)]);
        let out = resize_toggle(&mut api, &HashMap::new()).unwrap();
        assert_eq!(out, "10ppt");
    }

    #[test]
    fn test_resize_toggle_skips_full_width_wrappers() {
        // the direct parent spans the workspace; the next level is the split
        let mut api = PathApi::new(vec![
            node(1, 1920, None),
            node(2, 1920, None),
            node(3, 960, None),
            node(42, 960, None),
        ]);
        let out = resize_toggle(&mut api, &HashMap::new()).unwrap();
        assert_eq!(out, "90ppt");
        assert_eq!(api.last_command(), "[con_id=3] resize set width 90ppt");
    }

    #[test]
    fn test_resize_toggle_without_focus_fails() {
        let mut api = PathApi::new(Vec::new());
        api.focused = None;
        let err = resize_toggle(&mut api, &HashMap::new()).unwrap_err();
        assert!(matches!(err, UsrCmdError::NoFocusedWindow));
    }

    #[test]
    fn test_titlebar_toggle_flips_border() {
        let mut api = PathApi::new(vec![node(1, 1920, None), node(42, 960, Some("normal"))]);
        titlebar_toggle(&mut api, &HashMap::new()).unwrap();
        assert_eq!(api.last_command(), "border none");

        let mut api = PathApi::new(vec![node(1, 1920, None), node(42, 960, Some("none"))]);
        titlebar_toggle(&mut api, &HashMap::new()).unwrap();
        assert_eq!(api.last_command(), "border normal");
    }
}
