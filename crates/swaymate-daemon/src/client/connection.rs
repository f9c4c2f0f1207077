use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::TcpStream;
use tracing::debug;

use crate::errors::DaemonError;
use crate::protocol::codec::{read_message, write_message};
use crate::protocol::messages::{ClientMessage, DaemonMessage};

/// Every request carries a deadline so a wedged daemon cannot hang a caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed client for the daemon's RPC service.
pub struct DaemonClient {
    reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: tokio::net::tcp::OwnedWriteHalf,
    timeout: Duration,
    next_id: u64,
}

impl DaemonClient {
    /// Connect to the daemon at `addr` (e.g. `127.0.0.1:7853`).
    pub async fn connect(addr: &str) -> Result<Self, DaemonError> {
        Self::connect_with_timeout(addr, REQUEST_TIMEOUT).await
    }

    pub async fn connect_with_timeout(
        addr: &str,
        timeout: Duration,
    ) -> Result<Self, DaemonError> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                DaemonError::NotRunning
            } else {
                DaemonError::ConnectionFailed(e.to_string())
            }
        })?;

        let (reader, writer) = stream.into_split();
        debug!(event = "daemon.client.connected", addr = %addr);

        Ok(Self {
            reader: BufReader::new(reader),
            writer,
            timeout,
            next_id: 1,
        })
    }

    fn next_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("req-{id}")
    }

    /// Send a request and read the response, bounded by the client timeout.
    async fn request(&mut self, msg: &ClientMessage) -> Result<DaemonMessage, DaemonError> {
        let timeout = self.timeout;
        let exchange = async {
            write_message(&mut self.writer, msg).await?;
            read_message::<_, DaemonMessage>(&mut self.reader)
                .await?
                .ok_or_else(|| DaemonError::ConnectionFailed("connection closed".to_string()))
        };
        let response = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| DaemonError::Timeout)??;
        Self::check_error(&response)?;
        Ok(response)
    }

    /// Convert an error response into a typed client error.
    fn check_error(response: &DaemonMessage) -> Result<(), DaemonError> {
        if let DaemonMessage::Error { code, message, .. } = response {
            return Err(match code.as_str() {
                "WINDOW_NOT_FOUND" => DaemonError::WindowNotFound(message.clone()),
                "WORKSPACE_NOT_FOUND" => DaemonError::WorkspaceNotFound(message.clone()),
                "NO_FOCUSED_WINDOW" => DaemonError::NoFocusedWindow(message.clone()),
                "UNKNOWN_COMMAND" => DaemonError::UnknownCommand(message.clone()),
                _ => DaemonError::RemoteError {
                    code: code.clone(),
                    message: message.clone(),
                },
            });
        }
        Ok(())
    }

    /// Tracked window ids, most recently used first.
    pub async fn window_ids(&mut self) -> Result<Vec<i64>, DaemonError> {
        let id = self.next_id();
        let response = self.request(&ClientMessage::WindowIds { id }).await?;
        match response {
            DaemonMessage::WindowIds { window_ids, .. } => Ok(window_ids),
            _ => Err(DaemonError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }

    async fn listing(&mut self, msg: ClientMessage) -> Result<Vec<String>, DaemonError> {
        let response = self.request(&msg).await?;
        match response {
            DaemonMessage::Listing { rows, .. } => Ok(rows),
            _ => Err(DaemonError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }

    /// Formatted rows for all tracked windows.
    pub async fn switcher_list(&mut self) -> Result<Vec<String>, DaemonError> {
        let id = self.next_id();
        self.listing(ClientMessage::SwitcherList { id }).await
    }

    /// Formatted rows excluding the focused window's workspace.
    pub async fn pick_window_list(&mut self) -> Result<Vec<String>, DaemonError> {
        let id = self.next_id();
        self.listing(ClientMessage::PickWindowList { id }).await
    }

    /// Workspace names excluding the focused window's output.
    pub async fn pick_workspace_list(&mut self) -> Result<Vec<String>, DaemonError> {
        let id = self.next_id();
        self.listing(ClientMessage::PickWorkspaceList { id }).await
    }

    /// Ask for the exclusive picker slot.
    pub async fn should_open(&mut self, pid: u32) -> Result<bool, DaemonError> {
        let id = self.next_id();
        let response = self.request(&ClientMessage::ShouldOpen { id, pid }).await?;
        match response {
            DaemonMessage::ShouldOpenResult { should_open, .. } => Ok(should_open),
            _ => Err(DaemonError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }

    pub async fn focus_window(&mut self, window_id: i64) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::FocusWindow { id, window_id })
            .await?;
        Ok(())
    }

    /// Move a window to the focused workspace and focus it.
    pub async fn move_window_to_workspace(&mut self, window_id: i64) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::MoveWindowToWorkspace { id, window_id })
            .await?;
        Ok(())
    }

    /// Move the focused window to the workspace with this number prefix.
    pub async fn move_window_to_workspace_num(
        &mut self,
        workspace_num: i32,
    ) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::MoveWindowToWorkspaceNum { id, workspace_num })
            .await?;
        Ok(())
    }

    /// Move a named workspace to the focused window's output.
    pub async fn move_workspace_to_output(&mut self, workspace: &str) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::MoveWorkspaceToOutput {
            id,
            workspace: workspace.to_string(),
        })
        .await?;
        Ok(())
    }

    pub async fn set_config(&mut self, mouse_follows_focus: bool) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::SetConfig {
            id,
            mouse_follows_focus,
        })
        .await?;
        Ok(())
    }

    /// Indexed executable names; blocks server-side until the index is warm.
    pub async fn path_files(&mut self) -> Result<Vec<String>, DaemonError> {
        let id = self.next_id();
        let response = self.request(&ClientMessage::PathFiles { id }).await?;
        match response {
            DaemonMessage::PathFiles { files, .. } => Ok(files),
            _ => Err(DaemonError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }

    pub async fn execute_path(&mut self, exe_path: &str) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::ExecutePath {
            id,
            exe_path: exe_path.to_string(),
        })
        .await?;
        Ok(())
    }

    /// Run a registered user command, returning its output verbatim.
    pub async fn run_user_command(
        &mut self,
        name: &str,
        args: &str,
    ) -> Result<String, DaemonError> {
        let id = self.next_id();
        let response = self
            .request(&ClientMessage::RunUserCommand {
                id,
                name: name.to_string(),
                args: args.to_string(),
            })
            .await?;
        match response {
            DaemonMessage::CommandOutput { output, .. } => Ok(output),
            _ => Err(DaemonError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }

    pub async fn ping(&mut self) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::Ping { id }).await?;
        Ok(())
    }

    /// Request daemon shutdown.
    pub async fn shutdown(&mut self) -> Result<(), DaemonError> {
        let id = self.next_id();
        self.request(&ClientMessage::DaemonStop { id }).await?;
        Ok(())
    }
}
