//! swaymate-core: MRU window tracking and PATH indexing for sway
//!
//! This library holds the domain logic of the swaymate daemon. It is consumed
//! by the daemon binary and by integration tests.
//!
//! # Main Entry Points
//!
//! - [`tracker`] - MRU-ordered window state fed by window-manager events
//! - [`pathindex`] - debounced executable index over `$PATH` directories
//! - [`wm`] - window-manager client boundary (tree, commands, events)
//! - [`usrcmds`] - user-command and event-listener registry
//! - [`config`] - configuration management

pub mod config;
pub mod errors;
pub mod logging;
pub mod pathindex;
pub mod process;
pub mod tracker;
pub mod usrcmds;
pub mod wm;

// Re-export commonly used types at crate root for convenience
pub use config::Config;
pub use errors::SwaymateError;
pub use pathindex::{DirPhase, PathWatcher};
pub use tracker::{Tracker, WindowRecord};
pub use usrcmds::{CommandRegistry, DaemonApi};
pub use wm::{Node, Rect, WindowChange, WindowEvent, WmClient, WorkspaceInfo};

// Re-export logging initialization
pub use logging::init_logging;

/// Title used by the picker wrapper for its own terminal window. Windows with
/// this title are excluded from focus tracking to avoid feedback loops.
pub const SELF_WINDOW_TITLE: &str = "swaymate";
