use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::tracker::errors::TrackerError;
use crate::tracker::mru::FocusOrder;
use crate::tracker::types::WindowRecord;
use crate::wm::{Node, WmClient, WmError};
use crate::SELF_WINDOW_TITLE;

/// Sway's internal scratchpad pseudo-workspace, excluded from all listings.
const SCRATCH_WORKSPACE: &str = "__i3_scratch";

/// MRU-ordered window state fed by window-manager events.
///
/// The event loop is the only writer; RPC handlers read through the daemon's
/// lock, so each update (record write + MRU reorder + eviction) is atomic
/// with respect to readers.
pub struct Tracker {
    wm: Arc<dyn WmClient>,
    order: FocusOrder,
    windows: HashMap<i64, WindowRecord>,
    mouse_follows_focus: bool,
    /// Output the pointer was last mapped to, to skip redundant remaps.
    mouse_in_output: String,
    config: Config,
}

impl Tracker {
    pub fn new(wm: Arc<dyn WmClient>, config: Config) -> Self {
        Self {
            wm,
            order: FocusOrder::new(config.max_tracked),
            windows: HashMap::new(),
            mouse_follows_focus: config.mouse_follows_focus,
            mouse_in_output: String::new(),
            config,
        }
    }

    /// Fill the MRU list from the current tree, so the daemon starts with a
    /// usable window listing instead of an empty one.
    pub fn seed_from_tree(&mut self) -> Result<(), WmError> {
        let tree = self.wm.get_tree()?;
        for output in &tree.nodes {
            let output_name = output.name.clone().unwrap_or_default();
            for workspace in &output.nodes {
                let workspace_name = workspace.name.clone().unwrap_or_default();
                for container in &workspace.nodes {
                    self.ingest_node(container, &workspace_name, &output_name);
                }
            }
        }
        info!(event = "core.tracker.seeded", tracked = self.order.len());
        Ok(())
    }

    fn ingest_node(&mut self, con: &Node, workspace: &str, output: &str) {
        if con.is_window() {
            self.windows
                .insert(con.id, WindowRecord::from_node(con, workspace, output));
            let evicted = self.order.unshift(con.id);
            for id in evicted {
                self.windows.remove(&id);
            }
        }
        for child in &con.nodes {
            self.ingest_node(child, workspace, output);
        }
    }

    /// Upsert the record for a focused or new window and move it to the MRU
    /// head. Returns the updated record, or `None` when the event was for the
    /// picker's own window.
    pub fn on_focus(&mut self, con: &Node) -> Option<WindowRecord> {
        if con.name.as_deref() == Some(SELF_WINDOW_TITLE) {
            return None;
        }

        // The event container does not carry its workspace; resolve it from
        // the currently focused workspace.
        let (workspace, output) = match self.focused_workspace() {
            Ok(pair) => pair,
            Err(e) => {
                warn!(event = "core.tracker.workspace_lookup_failed", error = %e);
                (String::new(), String::new())
            }
        };

        let record = WindowRecord::from_node(con, &workspace, &output);
        self.windows.insert(con.id, record.clone());
        let evicted = self.order.unshift(con.id);
        for id in evicted {
            self.windows.remove(&id);
        }

        if self.mouse_follows_focus {
            if let Err(e) = self.mouse_to_output(&record.output) {
                warn!(event = "core.tracker.mouse_move_failed", error = %e);
            }
        }

        Some(record)
    }

    /// Drop a closed window from the MRU list and record map. Returns the
    /// removed record for listener dispatch; closing an untracked id is a
    /// no-op.
    pub fn on_close(&mut self, con: &Node) -> Option<WindowRecord> {
        self.order.remove(con.id);
        self.windows.remove(&con.id)
    }

    fn focused_workspace(&self) -> Result<(String, String), WmError> {
        let workspaces = self.wm.list_workspaces()?;
        Ok(workspaces
            .into_iter()
            .find(|w| w.focused)
            .map(|w| (w.name, w.output))
            .unwrap_or_default())
    }

    /// Record at MRU position 0, if any.
    pub fn focused(&self) -> Option<&WindowRecord> {
        self.order.get(0).and_then(|id| self.windows.get(&id))
    }

    /// Record at MRU position 1, if any.
    pub fn previous(&self) -> Option<&WindowRecord> {
        self.order.get(1).and_then(|id| self.windows.get(&id))
    }

    pub fn window(&self, id: i64) -> Option<&WindowRecord> {
        self.windows.get(&id)
    }

    /// Window ids in MRU order, most recent first.
    pub fn window_ids(&self) -> Vec<i64> {
        self.order.iter().collect()
    }

    /// All tracked records in MRU order.
    pub fn records(&self) -> Vec<WindowRecord> {
        self.order
            .iter()
            .filter_map(|id| self.windows.get(&id).cloned())
            .collect()
    }

    pub fn tracked_len(&self) -> usize {
        self.order.len()
    }

    pub fn mouse_follows_focus(&self) -> bool {
        self.mouse_follows_focus
    }

    /// Workspace names from the tree, skipping the scratchpad pseudo-workspace
    /// and any caller-specified outputs.
    pub fn list_spaces(&self, skip_outputs: &[String]) -> Result<Vec<String>, WmError> {
        let tree = self.wm.get_tree()?;
        let mut names = Vec::new();
        for output in &tree.nodes {
            let output_name = output.name.clone().unwrap_or_default();
            if skip_outputs.contains(&output_name) {
                continue;
            }
            for workspace in &output.nodes {
                let name = workspace.name.clone().unwrap_or_default();
                if name == SCRATCH_WORKSPACE {
                    continue;
                }
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Workspace names excluding the focused window's output.
    pub fn list_other_spaces(&self) -> Result<Vec<String>, WmError> {
        let skip = match self.focused() {
            Some(rec) => vec![rec.output.clone()],
            None => Vec::new(),
        };
        self.list_spaces(&skip)
    }

    /// The chain of ancestor nodes from workspace down to the window with
    /// `id`, from a fresh tree snapshot. Empty when the id is not in the tree.
    pub fn win_tree_path(&self, id: i64) -> Result<Vec<Node>, WmError> {
        let tree = self.wm.get_tree()?;
        for output in &tree.nodes {
            for workspace in &output.nodes {
                if workspace.name.as_deref() == Some(SCRATCH_WORKSPACE) {
                    continue;
                }
                let mut path = Vec::new();
                if find_path(workspace, id, &mut path) {
                    path.reverse();
                    return Ok(path);
                }
            }
        }
        Ok(Vec::new())
    }

    pub fn focus_window(&self, id: i64) -> Result<(), WmError> {
        self.wm.run_command(&format!("[con_id={id}] focus"))
    }

    /// Move a tracked window to a named workspace.
    ///
    /// Idempotent: a no-op when the tracked record already shows that
    /// workspace. On success the record's workspace field is updated as
    /// best-effort bookkeeping, not re-queried; callers needing certainty
    /// should re-query the tree.
    pub fn move_win_to_space(&mut self, win_id: i64, space: &str) -> Result<(), TrackerError> {
        let record = self
            .windows
            .get_mut(&win_id)
            .ok_or(TrackerError::WindowNotFound { id: win_id })?;

        if record.workspace == space {
            debug!(
                event = "core.tracker.move_skipped",
                window_id = win_id,
                workspace = space,
            );
            return Ok(());
        }

        self.wm
            .run_command(&format!("[con_id={win_id}] move to workspace {space}"))?;

        // run_command borrows self, so re-fetch the record for the update
        if let Some(record) = self.windows.get_mut(&win_id) {
            record.workspace = space.to_string();
        }
        Ok(())
    }

    /// Move a tracked window to the workspace whose name carries the `N:`
    /// number prefix.
    pub fn move_win_to_space_num(&mut self, win_id: i64, num: i32) -> Result<(), TrackerError> {
        let prefix = format!("{num}:");
        let space = self
            .list_spaces(&[])?
            .into_iter()
            .find(|name| name.starts_with(&prefix))
            .ok_or(TrackerError::WorkspaceNotFound { num })?;
        self.move_win_to_space(win_id, &space)
    }

    /// Move a window to the currently focused workspace and focus it.
    pub fn move_win_to_focused_space(&mut self, win_id: i64) -> Result<(), TrackerError> {
        let space = self
            .focused()
            .map(|rec| rec.workspace.clone())
            .ok_or(TrackerError::NoFocusedWindow)?;
        self.move_win_to_space(win_id, &space)?;
        self.focus_window(win_id)?;
        Ok(())
    }

    /// Activate a workspace and move it to an output. Sway applies the output
    /// change asynchronously, so callers wait out the settle delay before
    /// calling [`Tracker::refocus_window`]; that wait must not happen here,
    /// where it would sit under the daemon's tracker lock.
    pub fn move_space_to_output(&mut self, space: &str, output: &str) -> Result<(), TrackerError> {
        info!(
            event = "core.tracker.move_space",
            workspace = space,
            output = output,
        );
        self.wm.run_commands(&[
            format!("workspace {space}"),
            format!("move workspace to output {output}"),
        ])?;
        Ok(())
    }

    /// Restore focus after a workspace move, relocating the pointer when
    /// mouse-follows-focus is on.
    pub fn refocus_window(&mut self, refocus: &WindowRecord) -> Result<(), TrackerError> {
        self.focus_window(refocus.id)?;
        if self.mouse_follows_focus {
            self.mouse_to_output(&refocus.output)?;
        }
        Ok(())
    }

    /// Map the virtual pointer to an output, skipping redundant remaps.
    pub fn mouse_to_output(&mut self, output: &str) -> Result<(), WmError> {
        if self.mouse_in_output == output {
            return Ok(());
        }
        self.wm.run_command(&format!(
            r#"input 0:0:wlr_virtual_pointer_v1 map_to_output "{output}""#
        ))?;
        self.mouse_in_output = output.to_string();
        Ok(())
    }

    /// Toggle pointer-follows-focus. Disabling maps the pointer back to all
    /// outputs.
    pub fn set_mouse_follows_focus(&mut self, enabled: bool) -> Result<(), WmError> {
        info!(event = "core.tracker.set_config", mouse_follows_focus = enabled);
        self.mouse_follows_focus = enabled;
        if !enabled {
            self.wm
                .run_command(r#"input 0:0:wlr_virtual_pointer_v1 map_to_output "*""#)?;
            self.mouse_in_output.clear();
        }
        Ok(())
    }

    pub fn wm(&self) -> &Arc<dyn WmClient> {
        &self.wm
    }

    pub(crate) fn listing_widths(&self) -> &crate::config::ListingWidths {
        &self.config.listing
    }

    #[cfg(test)]
    pub(crate) fn insert_record(&mut self, record: WindowRecord) {
        let evicted = self.order.unshift(record.id);
        for id in evicted {
            self.windows.remove(&id);
        }
        self.windows.insert(record.id, record);
    }
}

/// Depth-first search for `target`, filling `path` root-first on the way
/// back out. First match short-circuits.
fn find_path(node: &Node, target: i64, path: &mut Vec<Node>) -> bool {
    if node.id == target {
        path.push(node.clone());
        return true;
    }
    for child in &node.nodes {
        if find_path(child, target, path) {
            path.push(node.clone());
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::WorkspaceInfo;
    use std::sync::Mutex;

    /// WM stub recording commands and serving a canned tree.
    struct MockWm {
        tree: Node,
        workspaces: Vec<WorkspaceInfo>,
        commands: Mutex<Vec<String>>,
    }

    impl MockWm {
        fn new(tree: Node) -> Self {
            Self {
                tree,
                workspaces: vec![WorkspaceInfo {
                    name: "1:dev".to_string(),
                    output: "eDP-1".to_string(),
                    focused: true,
                }],
                commands: Mutex::new(Vec::new()),
            }
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    impl WmClient for MockWm {
        fn get_tree(&self) -> Result<Node, WmError> {
            Ok(self.tree.clone())
        }

        fn run_command(&self, cmd: &str) -> Result<(), WmError> {
            self.commands.lock().unwrap().push(cmd.to_string());
            Ok(())
        }

        fn list_workspaces(&self) -> Result<Vec<WorkspaceInfo>, WmError> {
            Ok(self.workspaces.clone())
        }
    }

    fn window_node(id: i64, title: &str) -> Node {
        Node {
            id,
            name: Some(title.to_string()),
            app_id: Some(format!("app-{id}")),
            ..Node::default()
        }
    }

    fn sample_tree() -> Node {
        let workspace = |id: i64, name: &str, wins: Vec<Node>| Node {
            id,
            name: Some(name.to_string()),
            layout: Some("splith".to_string()),
            nodes: wins,
            ..Node::default()
        };
        let output = |id: i64, name: &str, spaces: Vec<Node>| Node {
            id,
            name: Some(name.to_string()),
            layout: Some("splith".to_string()),
            nodes: spaces,
            ..Node::default()
        };
        Node {
            id: 1,
            layout: Some("splith".to_string()),
            nodes: vec![
                output(
                    2,
                    "eDP-1",
                    vec![
                        workspace(3, "1:dev", vec![window_node(10, "vim"), window_node(11, "term")]),
                        workspace(4, "__i3_scratch", vec![window_node(12, "hidden")]),
                    ],
                ),
                output(5, "HDMI-A-1", vec![workspace(6, "2:web", vec![window_node(13, "firefox")])]),
            ],
            ..Node::default()
        }
    }

    fn tracker_with(tree: Node) -> (Tracker, Arc<MockWm>) {
        let wm = Arc::new(MockWm::new(tree));
        let tracker = Tracker::new(wm.clone(), Config::default());
        (tracker, wm)
    }

    #[test]
    fn test_seed_from_tree_tracks_windows_only() {
        let (mut tracker, _wm) = tracker_with(sample_tree());
        tracker.seed_from_tree().unwrap();
        // scratch windows are seeded too (original behavior); split
        // containers are not
        assert!(tracker.window(10).is_some());
        assert!(tracker.window(13).is_some());
        assert!(tracker.window(3).is_none());
        assert_eq!(tracker.tracked_len(), 4);
    }

    #[test]
    fn test_focus_round_trip_preserves_fields() {
        let (mut tracker, _wm) = tracker_with(sample_tree());
        let mut con = window_node(42, "editor");
        con.rect = crate::wm::Rect {
            x: 10,
            y: 20,
            width: 800,
            height: 600,
        };
        let record = tracker.on_focus(&con).unwrap();

        let focused = tracker.focused().unwrap();
        assert_eq!(focused, &record);
        assert_eq!(focused.id, 42);
        assert_eq!(focused.title, "editor");
        assert_eq!(focused.app, "app-42");
        assert_eq!(focused.workspace, "1:dev");
        assert_eq!(focused.output, "eDP-1");
        assert_eq!(focused.rect.width, 800);
    }

    #[test]
    fn test_self_window_is_filtered() {
        let (mut tracker, _wm) = tracker_with(sample_tree());
        let con = Node {
            id: 99,
            name: Some(SELF_WINDOW_TITLE.to_string()),
            ..Node::default()
        };
        assert!(tracker.on_focus(&con).is_none());
        assert_eq!(tracker.tracked_len(), 0);
    }

    #[test]
    fn test_focused_and_previous() {
        let (mut tracker, _wm) = tracker_with(sample_tree());
        assert!(tracker.focused().is_none());
        assert!(tracker.previous().is_none());

        tracker.on_focus(&window_node(1, "a"));
        tracker.on_focus(&window_node(2, "b"));
        assert_eq!(tracker.focused().unwrap().id, 2);
        assert_eq!(tracker.previous().unwrap().id, 1);
    }

    #[test]
    fn test_eviction_removes_records_atomically() {
        let wm = Arc::new(MockWm::new(sample_tree()));
        let config = Config {
            max_tracked: 2,
            ..Config::default()
        };
        let mut tracker = Tracker::new(wm, config);

        for id in 1..=3 {
            tracker.on_focus(&window_node(id, "w"));
        }
        assert_eq!(tracker.window_ids(), vec![3, 2]);
        assert!(tracker.window(1).is_none());
        // every listed id has a record
        for id in tracker.window_ids() {
            assert!(tracker.window(id).is_some());
        }
    }

    #[test]
    fn test_close_removes_any_position_and_untracked_is_noop() {
        let (mut tracker, _wm) = tracker_with(sample_tree());
        for id in 1..=3 {
            tracker.on_focus(&window_node(id, "w"));
        }
        assert!(tracker.on_close(&window_node(2, "w")).is_some());
        assert_eq!(tracker.window_ids(), vec![3, 1]);
        assert!(tracker.window(2).is_none());

        assert!(tracker.on_close(&window_node(77, "w")).is_none());
        assert_eq!(tracker.window_ids(), vec![3, 1]);
    }

    #[test]
    fn test_list_spaces_skips_scratch_and_outputs() {
        let (tracker, _wm) = tracker_with(sample_tree());
        let all = tracker.list_spaces(&[]).unwrap();
        assert_eq!(all, vec!["1:dev".to_string(), "2:web".to_string()]);

        let skipped = tracker.list_spaces(&["eDP-1".to_string()]).unwrap();
        assert_eq!(skipped, vec!["2:web".to_string()]);
    }

    #[test]
    fn test_move_win_to_space_is_idempotent() {
        let (mut tracker, wm) = tracker_with(sample_tree());
        tracker.on_focus(&window_node(42, "editor"));

        tracker.move_win_to_space(42, "2:web").unwrap();
        assert_eq!(tracker.window(42).unwrap().workspace, "2:web");
        let after_first = wm.commands().len();

        // second move to the same workspace issues no command
        tracker.move_win_to_space(42, "2:web").unwrap();
        assert_eq!(wm.commands().len(), after_first);
    }

    #[test]
    fn test_move_untracked_window_is_typed_error() {
        let (mut tracker, _wm) = tracker_with(sample_tree());
        let err = tracker.move_win_to_space(12345, "2:web").unwrap_err();
        assert!(matches!(err, TrackerError::WindowNotFound { id: 12345 }));
    }

    #[test]
    fn test_move_win_to_space_num_resolves_prefix() {
        let (mut tracker, wm) = tracker_with(sample_tree());
        tracker.on_focus(&window_node(42, "editor"));

        tracker.move_win_to_space_num(42, 2).unwrap();
        assert_eq!(tracker.window(42).unwrap().workspace, "2:web");
        assert!(wm
            .commands()
            .iter()
            .any(|c| c.contains("move to workspace 2:web")));

        let err = tracker.move_win_to_space_num(42, 9).unwrap_err();
        assert!(matches!(err, TrackerError::WorkspaceNotFound { num: 9 }));
    }

    #[test]
    fn test_win_tree_path_returns_workspace_to_window_chain() {
        let (tracker, _wm) = tracker_with(sample_tree());
        let path = tracker.win_tree_path(13).unwrap();
        let ids: Vec<i64> = path.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![6, 13]);

        assert!(tracker.win_tree_path(4242).unwrap().is_empty());
        // scratch subtree is not searched
        assert!(tracker.win_tree_path(12).unwrap().is_empty());
    }

    #[test]
    fn test_move_space_to_output_issues_activate_then_move() {
        let (mut tracker, wm) = tracker_with(sample_tree());
        tracker.move_space_to_output("2:web", "eDP-1").unwrap();
        assert_eq!(
            wm.commands(),
            vec![
                "workspace 2:web".to_string(),
                "move workspace to output eDP-1".to_string(),
            ]
        );
    }

    #[test]
    fn test_refocus_window_restores_focus_and_pointer() {
        let (mut tracker, wm) = tracker_with(sample_tree());
        tracker.set_mouse_follows_focus(true).unwrap();
        let record = WindowRecord {
            id: 42,
            output: "HDMI-A-1".to_string(),
            ..WindowRecord::default()
        };

        tracker.refocus_window(&record).unwrap();
        let commands = wm.commands();
        assert!(commands.contains(&"[con_id=42] focus".to_string()));
        assert!(commands
            .last()
            .unwrap()
            .contains(r#"map_to_output "HDMI-A-1""#));
    }

    #[test]
    fn test_mouse_to_output_dedupes() {
        let (mut tracker, wm) = tracker_with(sample_tree());
        tracker.mouse_to_output("eDP-1").unwrap();
        tracker.mouse_to_output("eDP-1").unwrap();
        assert_eq!(wm.commands().len(), 1);
        tracker.mouse_to_output("HDMI-A-1").unwrap();
        assert_eq!(wm.commands().len(), 2);
    }

    #[test]
    fn test_disabling_mouse_follows_focus_resets_mapping() {
        let (mut tracker, wm) = tracker_with(sample_tree());
        tracker.set_mouse_follows_focus(false).unwrap();
        assert!(wm.commands().last().unwrap().contains(r#"map_to_output "*""#));
    }
}
