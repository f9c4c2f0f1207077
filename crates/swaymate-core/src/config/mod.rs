//! Configuration management for the swaymate daemon.
//!
//! Configuration is loaded from `~/.config/swaymate/config.toml` and merged
//! over hardcoded defaults. A missing config file is not an error; a config
//! file that fails to parse is.
//!
//! # Example Configuration
//!
//! ```toml
//! max_tracked = 100
//! picker_timeout_ms = 3000
//! debounce_ms = 1000
//! mouse_follows_focus = true
//!
//! [listing]
//! title = 60
//! ```

mod loading;

pub use loading::load;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime configuration for the swaymate daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of windows kept in the MRU list.
    pub max_tracked: usize,
    /// How long a PID can hold the picker before the lock self-expires.
    pub picker_timeout_ms: u64,
    /// Minimum interval between two listings of the same PATH directory.
    pub debounce_ms: u64,
    /// Wait after a workspace-to-output move before refocusing; sway does not
    /// apply output changes synchronously.
    pub settle_delay_ms: u64,
    /// RPC port for the normal daemon instance.
    pub port: u16,
    /// RPC port for the debug daemon instance.
    pub debug_port: u16,
    /// Relocate the pointer to the focused window's output on focus change.
    pub mouse_follows_focus: bool,
    /// Install for_window rules for the picker window at startup.
    pub autoconfig: bool,
    /// Install default keybindings at startup.
    pub default_keybindings: bool,
    /// Column widths for formatted window listings.
    pub listing: ListingWidths,
}

/// Column widths for formatted window listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingWidths {
    pub display: usize,
    pub workspace: usize,
    pub app: usize,
    pub title: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_tracked: 100,
            picker_timeout_ms: 3_000,
            debounce_ms: 1_000,
            settle_delay_ms: 100,
            port: 7853,
            debug_port: 7854,
            mouse_follows_focus: false,
            autoconfig: true,
            default_keybindings: false,
            listing: ListingWidths::default(),
        }
    }
}

impl Default for ListingWidths {
    fn default() -> Self {
        Self {
            display: 3,
            workspace: 8,
            app: 15,
            title: 40,
        }
    }
}

impl Config {
    pub fn picker_timeout(&self) -> Duration {
        Duration::from_millis(self.picker_timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// RPC listen address for the normal or debug instance.
    pub fn rpc_addr(&self, debug: bool) -> String {
        let port = if debug { self.debug_port } else { self.port };
        format!("127.0.0.1:{port}")
    }
}
