use serde::{Deserialize, Serialize};

use crate::wm::{Node, Rect};

/// Tracked metadata for one window, owned by the tracker.
///
/// Created on the first focus/new observation, updated in place on later
/// focus events for the same id, removed on close or MRU eviction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: i64,
    pub output: String,
    pub workspace: String,
    pub title: String,
    pub app: String,
    pub rect: Rect,
}

impl WindowRecord {
    pub fn from_node(con: &Node, workspace: &str, output: &str) -> Self {
        Self {
            id: con.id,
            output: output.to_string(),
            workspace: workspace.to_string(),
            title: con.name.clone().unwrap_or_default(),
            app: con.app(),
            rect: con.rect,
        }
    }
}
