//! `swaymsg`-backed implementation of the window-manager boundary.
//!
//! Commands and queries shell out to `swaymsg` with raw JSON output; the
//! window-event subscription runs a long-lived `swaymsg -m` child process and
//! forwards parsed events over a channel. The i3/sway IPC wire format itself
//! is never spoken directly.

use std::process::Command;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::wm::errors::WmError;
use crate::wm::types::{Node, WindowEvent, WorkspaceInfo};
use crate::wm::WmClient;

const SWAYMSG: &str = "swaymsg";

/// Run a blocking `swaymsg` invocation without stalling the async runtime.
///
/// On the daemon's multi-thread runtime the worker hands its queued tasks to
/// another worker for the duration of the call; off-runtime callers (and
/// current-thread test runtimes, which never reach the real client) run the
/// closure directly.
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle)
            if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread =>
        {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// One entry of the reply array `swaymsg` prints for commands.
#[derive(Debug, Deserialize)]
struct CommandReply {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Window-manager client shelling out to `swaymsg`.
pub struct SwaymsgClient {
    log_commands: bool,
}

impl SwaymsgClient {
    /// Verify `swaymsg` is reachable and build a client.
    pub fn new() -> Result<Self, WmError> {
        which::which(SWAYMSG).map_err(|_| WmError::BinaryNotFound {
            binary: SWAYMSG.to_string(),
        })?;
        Ok(Self {
            log_commands: std::env::var("SWAYMATE_LOG").is_ok(),
        })
    }

    fn query(&self, message_type: &str) -> Result<Vec<u8>, WmError> {
        let output = run_blocking(|| {
            Command::new(SWAYMSG)
                .args(["-t", message_type, "-r"])
                .output()
        })?;
        if !output.status.success() {
            return Err(WmError::CommandRejected {
                cmd: format!("-t {message_type}"),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl WmClient for SwaymsgClient {
    fn get_tree(&self) -> Result<Node, WmError> {
        let raw = self.query("get_tree")?;
        serde_json::from_slice(&raw).map_err(|e| WmError::ParseError {
            message: e.to_string(),
        })
    }

    fn run_command(&self, cmd: &str) -> Result<(), WmError> {
        if self.log_commands {
            debug!(event = "core.wm.command", cmd = cmd);
        }

        let output = run_blocking(|| Command::new(SWAYMSG).args(["-r", "--", cmd]).output())?;
        if !output.status.success() {
            return Err(WmError::CommandRejected {
                cmd: cmd.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // swaymsg exits zero but reports per-command failures in the reply
        let replies: Vec<CommandReply> =
            serde_json::from_slice(&output.stdout).map_err(|e| WmError::ParseError {
                message: e.to_string(),
            })?;
        if let Some(failed) = replies.iter().find(|r| !r.success) {
            return Err(WmError::CommandRejected {
                cmd: cmd.to_string(),
                message: failed
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(())
    }

    fn list_workspaces(&self) -> Result<Vec<WorkspaceInfo>, WmError> {
        let raw = self.query("get_workspaces")?;
        serde_json::from_slice(&raw).map_err(|e| WmError::ParseError {
            message: e.to_string(),
        })
    }
}

/// Subscribe to window-category events.
///
/// Spawns `swaymsg -m -t subscribe '["window"]'` and forwards each parsed
/// event line over the returned channel. The channel closing means the
/// subscription child exited; callers treat that as a transport-fatal error.
pub async fn subscribe_window_events() -> Result<mpsc::UnboundedReceiver<WindowEvent>, WmError> {
    let mut child = tokio::process::Command::new(SWAYMSG)
        .args(["-m", "-r", "-t", "subscribe", r#"["window"]"#])
        .stdout(std::process::Stdio::piped())
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    let stdout = child.stdout.take().ok_or_else(|| WmError::IoError {
        source: std::io::Error::other("subscription child has no stdout"),
    })?;

    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<WindowEvent>(line) {
                        Ok(event) => {
                            if tx.send(event).is_err() {
                                // daemon is gone, stop reading
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(
                                event = "core.wm.event_parse_failed",
                                error = %e,
                            );
                        }
                    }
                }
                Ok(None) => {
                    error!(event = "core.wm.subscription_ended");
                    break;
                }
                Err(e) => {
                    error!(
                        event = "core.wm.subscription_read_failed",
                        error = %e,
                    );
                    break;
                }
            }
        }
        let _ = child.kill().await;
    });

    info!(event = "core.wm.subscribed", events = "window");
    Ok(rx)
}
