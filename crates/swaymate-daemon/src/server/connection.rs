use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

use swaymate_core::usrcmds::{parse_flags, DaemonApi};
use swaymate_core::SwaymateError;

use crate::protocol::codec::{read_message, write_message};
use crate::protocol::messages::{ClientMessage, DaemonMessage};
use crate::state::DaemonState;

/// Handle a single client connection.
///
/// Reads JSONL requests, dispatches them against the daemon state, and
/// writes one response per request.
pub async fn handle_connection(
    stream: TcpStream,
    state: Arc<DaemonState>,
    shutdown: tokio_util::sync::CancellationToken,
) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_default();
    debug!(event = "daemon.connection.accepted", peer = %peer);

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        tokio::select! {
            result = read_message::<_, ClientMessage>(&mut reader) => {
                match result {
                    Ok(Some(msg)) => {
                        let response = dispatch_message(msg, &state, &shutdown).await;
                        if let Err(e) = write_message(&mut writer, &response).await {
                            error!(
                                event = "daemon.connection.write_failed",
                                peer = %peer,
                                error = %e,
                            );
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!(event = "daemon.connection.closed", peer = %peer);
                        break;
                    }
                    Err(e) => {
                        warn!(
                            event = "daemon.connection.read_error",
                            peer = %peer,
                            error = %e,
                        );
                        break;
                    }
                }
            }
            _ = shutdown.cancelled() => {
                debug!(event = "daemon.connection.shutdown", peer = %peer);
                break;
            }
        }
    }
}

fn error_reply<E: SwaymateError>(id: String, e: &E) -> DaemonMessage {
    DaemonMessage::Error {
        id,
        code: e.error_code().to_string(),
        message: e.to_string(),
    }
}

/// Dispatch one client request to the tracker, watcher, or gate.
async fn dispatch_message(
    msg: ClientMessage,
    state: &Arc<DaemonState>,
    shutdown: &tokio_util::sync::CancellationToken,
) -> DaemonMessage {
    match msg {
        ClientMessage::WindowIds { id } => {
            let tracker = state.tracker.read().await;
            DaemonMessage::WindowIds {
                id,
                window_ids: tracker.window_ids(),
            }
        }

        ClientMessage::SwitcherList { id } => {
            let tracker = state.tracker.read().await;
            DaemonMessage::Listing {
                id,
                rows: tracker.switcher_list(),
            }
        }

        ClientMessage::PickWindowList { id } => {
            let tracker = state.tracker.read().await;
            DaemonMessage::Listing {
                id,
                rows: tracker.pick_window_list(),
            }
        }

        ClientMessage::PickWorkspaceList { id } => {
            let tracker = state.tracker.read().await;
            match tracker.list_other_spaces() {
                Ok(rows) => DaemonMessage::Listing { id, rows },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::ShouldOpen { id, pid } => DaemonMessage::ShouldOpenResult {
            id,
            should_open: state.gate.should_open(pid),
        },

        ClientMessage::FocusWindow { id, window_id } => {
            let tracker = state.tracker.read().await;
            match tracker.focus_window(window_id) {
                Ok(()) => DaemonMessage::Ack { id },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::MoveWindowToWorkspace { id, window_id } => {
            let mut tracker = state.tracker.write().await;
            match tracker.move_win_to_focused_space(window_id) {
                Ok(()) => DaemonMessage::Ack { id },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::MoveWindowToWorkspaceNum { id, workspace_num } => {
            let mut tracker = state.tracker.write().await;
            let Some(focused_id) = tracker.focused().map(|r| r.id) else {
                return error_reply(
                    id,
                    &swaymate_core::tracker::TrackerError::NoFocusedWindow,
                );
            };
            match tracker.move_win_to_space_num(focused_id, workspace_num) {
                Ok(()) => DaemonMessage::Ack { id },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::MoveWorkspaceToOutput { id, workspace } => {
            let focused = {
                let mut tracker = state.tracker.write().await;
                let Some(focused) = tracker.focused().cloned() else {
                    return error_reply(
                        id,
                        &swaymate_core::tracker::TrackerError::NoFocusedWindow,
                    );
                };
                if let Err(e) = tracker.move_space_to_output(&workspace, &focused.output) {
                    return error_reply(id, &e);
                }
                focused
            };

            // sway applies the output change asynchronously; wait it out with
            // the tracker lock released so other requests keep flowing
            tokio::time::sleep(state.config.settle_delay()).await;

            let mut tracker = state.tracker.write().await;
            match tracker.refocus_window(&focused) {
                Ok(()) => DaemonMessage::Ack { id },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::SetConfig {
            id,
            mouse_follows_focus,
        } => {
            let mut tracker = state.tracker.write().await;
            match tracker.set_mouse_follows_focus(mouse_follows_focus) {
                Ok(()) => DaemonMessage::Ack { id },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::PathFiles { id } => match state.watcher.wait_path_files().await {
            Ok(files) => DaemonMessage::PathFiles { id, files },
            Err(e) => error_reply(id, &e),
        },

        ClientMessage::ExecutePath { id, exe_path } => {
            info!(event = "daemon.rpc.execute_path", exe_path = %exe_path);
            let tracker = state.tracker.read().await;
            match tracker.wm().run_command(&format!("exec {exe_path}")) {
                Ok(()) => DaemonMessage::Ack { id },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::RunUserCommand { id, name, args } => {
            info!(event = "daemon.rpc.user_command", name = %name);
            let flags = parse_flags(&args);
            let mut tracker = state.tracker.write().await;
            let api: &mut dyn DaemonApi = &mut *tracker;
            match state.registry.run(&name, api, &flags) {
                Ok(output) => DaemonMessage::CommandOutput { id, output },
                Err(e) => error_reply(id, &e),
            }
        }

        ClientMessage::DaemonStop { id } => {
            info!(event = "daemon.server.stop_requested");
            shutdown.cancel();
            DaemonMessage::Ack { id }
        }

        ClientMessage::Ping { id } => DaemonMessage::Ack { id },
    }
}
