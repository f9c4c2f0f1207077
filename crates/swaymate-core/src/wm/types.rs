use serde::{Deserialize, Serialize};

/// Geometry rectangle as reported by the window manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// X11 window properties; only the class is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowProperties {
    #[serde(default)]
    pub class: Option<String>,
}

/// A node of the window-manager tree snapshot.
///
/// Mirrors the subset of the sway tree the daemon consumes. The tree is
/// acyclic by construction, so plain recursion over `nodes` is safe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub window_properties: Option<WindowProperties>,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Node {
    /// A node is a window when it is not a split/tabbed/stacked container.
    pub fn is_window(&self) -> bool {
        !matches!(
            self.layout.as_deref(),
            Some("splith") | Some("splitv") | Some("tabbed") | Some("stacked")
        )
    }

    /// Normalized application identifier: Wayland `app_id` when present,
    /// X11 window class otherwise. Resolved once at ingestion time.
    pub fn app(&self) -> String {
        if let Some(app_id) = &self.app_id {
            return app_id.clone();
        }
        self.window_properties
            .as_ref()
            .and_then(|p| p.class.clone())
            .unwrap_or_default()
    }
}

/// A workspace entry from the workspace listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
    pub output: String,
    #[serde(default)]
    pub focused: bool,
}

/// Window event kinds the daemon reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowChange {
    Focus,
    New,
    Close,
    /// Title, move, fullscreen and other changes the tracker ignores.
    #[serde(other)]
    Other,
}

/// A window-category event from the window-manager subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowEvent {
    pub change: WindowChange,
    pub container: Node,
}
